//! 题目解析用到的正则
//!
//! 编号与选项标签只识别 ASCII 数字和拉丁字母 A-D。

use regex::Regex;
use std::sync::LazyLock;

/// 行首题号：`Q1)`、`1.`、`1)`
pub static QUESTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Q[0-9]+\)|[0-9]+[).])").unwrap());

/// 全文任意位置的题号（不锚定行首）
pub static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Q[0-9]+\)|[0-9]+[).])").unwrap());

/// 段落分隔：一个或多个空行
pub static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

pub static STRIP_Q_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^Q[0-9]+\)\s*").unwrap());
pub static STRIP_DOT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());
pub static STRIP_PAREN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\)\s*").unwrap());

/// 选项标签，按 A、B、C、D 顺序
pub static OPTION_LABELS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    ["A", "B", "C", "D"].map(|letter| Regex::new(&format!(r"(?i)^{letter}[).]\s+")).unwrap())
});

/// 任意选项标签（用于去掉标签）
pub static ANY_OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-D][).]\s+").unwrap());

/// 答案行关键字：`Answer:`、`Ans:`、`Correct:`
pub static ANSWER_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:answer|ans|correct)\s*:").unwrap());

/// 答案行中的字母
pub static ANSWER_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:answer|ans|correct)\s*:\s*([A-D])").unwrap());

/// 行尾星号标记的正确选项
pub static STAR_MARK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\s*$").unwrap());

/// 去掉题号前缀：依次尝试 `Q1)`、`1.`、`1)`
pub fn strip_question_number(line: &str) -> String {
    let line = STRIP_Q_NUMBER.replace(line, "");
    let line = STRIP_DOT_NUMBER.replace(&line, "");
    let line = STRIP_PAREN_NUMBER.replace(&line, "");
    line.trim().to_string()
}

/// 字母 A-D（不区分大小写）映射为 0-3
pub fn letter_index(letter: &str) -> Option<usize> {
    match letter.to_ascii_uppercase().as_str() {
        "A" => Some(0),
        "B" => Some(1),
        "C" => Some(2),
        "D" => Some(3),
        _ => None,
    }
}
