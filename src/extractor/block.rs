//! 单个题块的解析：题干、选项、答案

use super::patterns::{
    letter_index, strip_question_number, ANSWER_KEY, ANSWER_LETTER, ANY_OPTION_LABEL,
    OPTION_LABELS, QUESTION_START, STAR_MARK,
};
use crate::models::ExtractedQuestion;

/// 答案来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerSource {
    /// `Answer: B` 之类的答案行
    AnswerLine(usize),
    /// 行尾带 `*` 的选项
    Starred(usize),
    Unresolved,
}

impl AnswerSource {
    pub fn index(self) -> Option<usize> {
        match self {
            AnswerSource::AnswerLine(i) | AnswerSource::Starred(i) => Some(i),
            AnswerSource::Unresolved => None,
        }
    }
}

/// 题块解析结果（无论是否被采纳）
#[derive(Debug, Clone)]
pub(crate) struct ParsedBlock {
    pub question_text: String,
    pub options: Vec<String>,
    pub answer: AnswerSource,
}

impl ParsedBlock {
    /// 题干非空、至少 2 个选项、答案已确定且在范围内时生成题目
    pub fn into_question(self) -> Option<ExtractedQuestion> {
        let index = self.answer.index()?;
        ExtractedQuestion::try_new(self.question_text, self.options, index).ok()
    }
}

/// 解析一个题块
///
/// 题块没有任何非空行时返回 `None`
pub(crate) fn parse_block(body: &str) -> Option<ParsedBlock> {
    let lines: Vec<&str> = body
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let first = *lines.first()?;
    let question_line = lines
        .iter()
        .copied()
        .find(|l| QUESTION_START.is_match(l))
        .unwrap_or(first);
    let question_text = strip_question_number(question_line);

    // 同一字母出现多次时取第一行
    let mut options: Vec<String> = OPTION_LABELS
        .iter()
        .filter_map(|label| lines.iter().find(|l| label.is_match(l)))
        .map(|l| ANY_OPTION_LABEL.replace(l, "").trim().to_string())
        .collect();

    let answer = match lines.iter().find(|l| ANSWER_KEY.is_match(l)) {
        // 有答案行时只看答案行，字母缺失即视为无答案
        Some(line) => ANSWER_LETTER
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| letter_index(m.as_str()))
            .map_or(AnswerSource::Unresolved, AnswerSource::AnswerLine),
        None => match options.iter().position(|o| STAR_MARK.is_match(o)) {
            Some(i) => {
                let cleaned = STAR_MARK.replace(&options[i], "").trim().to_string();
                options[i] = cleaned;
                AnswerSource::Starred(i)
            }
            None => AnswerSource::Unresolved,
        },
    };

    Some(ParsedBlock {
        question_text,
        options,
        answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_line() {
        let parsed = parse_block("Q1) 2+2?\nA) 3\nB) 4\nAnswer: B").unwrap();
        assert_eq!(parsed.question_text, "2+2?");
        assert_eq!(parsed.options, vec!["3", "4"]);
        assert_eq!(parsed.answer, AnswerSource::AnswerLine(1));
    }

    #[test]
    fn test_parse_star_marker() {
        let parsed = parse_block("1. Sky color?\nA) Red\nB) Blue *\nC) Green*").unwrap();
        assert_eq!(parsed.answer, AnswerSource::Starred(1));
        // 只去掉被选中选项的星号
        assert_eq!(parsed.options, vec!["Red", "Blue", "Green*"]);
    }

    #[test]
    fn test_answer_line_without_letter_blocks_star_fallback() {
        let parsed = parse_block("1) q\nA) x*\nB) y\nCorrect: none").unwrap();
        assert_eq!(parsed.answer, AnswerSource::Unresolved);
        assert!(parsed.into_question().is_none());
    }

    #[test]
    fn test_missing_letters_are_skipped() {
        let parsed = parse_block("3) q\nA) first\nC) third\nans:c").unwrap();
        assert_eq!(parsed.options, vec!["first", "third"]);
        // 字母 C 映射为索引 2，超出 2 个选项的范围
        assert_eq!(parsed.answer, AnswerSource::AnswerLine(2));
        assert!(parsed.into_question().is_none());
    }

    #[test]
    fn test_first_match_wins_for_duplicate_letters() {
        let parsed = parse_block("1) q\nB) see below\nA) x\nB) y\nAnswer: a").unwrap();
        assert_eq!(parsed.options, vec!["x", "see below"]);
        let question = parsed.into_question().unwrap();
        assert_eq!(question.answer(), "x");
    }

    #[test]
    fn test_question_line_falls_back_to_first_line() {
        let parsed = parse_block("  What is it?\nA) a\nB) b\nAns: B").unwrap();
        assert_eq!(parsed.question_text, "What is it?");
        assert!(parsed.into_question().is_some());
    }

    #[test]
    fn test_blank_block() {
        assert!(parse_block(" \n\t\n").is_none());
    }
}
