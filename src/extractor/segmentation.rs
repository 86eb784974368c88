//! 题块切分
//!
//! 三级回退：段落切分 → 题号区间切分 → 按行分组。
//! 后一级只在当前最佳结果少于 2 个题块时尝试，且只有题块数严格更多时才替换。

use std::borrow::Cow;

use serde::Serialize;

use super::patterns::{PARAGRAPH_BREAK, QUESTION_MARKER, QUESTION_START};

/// 最终采用的切分方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentTier {
    /// 按空行切分段落
    Paragraph,
    /// 从每个题号到下一个题号
    PatternRun,
    /// 按行分组
    LineGroup,
}

impl std::fmt::Display for SegmentTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentTier::Paragraph => write!(f, "段落切分"),
            SegmentTier::PatternRun => write!(f, "题号区间切分"),
            SegmentTier::LineGroup => write!(f, "按行分组"),
        }
    }
}

/// 被认为包含一道题的连续文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuestionBlock<'a> {
    pub body: Cow<'a, str>,
}

impl<'a> QuestionBlock<'a> {
    fn borrowed(body: &'a str) -> Self {
        Self {
            body: Cow::Borrowed(body),
        }
    }

    fn owned(body: String) -> Self {
        Self {
            body: Cow::Owned(body),
        }
    }
}

/// 切分结果
#[derive(Debug)]
pub(crate) struct Segmentation<'a> {
    pub blocks: Vec<QuestionBlock<'a>>,
    pub tier: SegmentTier,
    /// 按空行切出的段落总数（与最终采用哪一级无关）
    pub paragraphs_scanned: usize,
}

/// 按三级回退规则切分题块
pub(crate) fn segment(text: &str) -> Segmentation<'_> {
    let paragraphs: Vec<&str> = PARAGRAPH_BREAK.split(text).collect();
    let paragraphs_scanned = paragraphs.len();

    let mut tier = SegmentTier::Paragraph;
    let mut blocks = by_paragraph(&paragraphs);

    if blocks.len() < 2 {
        let runs = by_pattern_run(text);
        if runs.len() > blocks.len() {
            blocks = runs;
            tier = SegmentTier::PatternRun;
        }
    }

    if blocks.len() < 2 {
        let groups = by_line_group(text);
        if groups.len() > blocks.len() {
            blocks = groups;
            tier = SegmentTier::LineGroup;
        }
    }

    Segmentation {
        blocks,
        tier,
        paragraphs_scanned,
    }
}

/// 第一级：保留去掉首尾空白后以题号开头的段落
fn by_paragraph<'a>(paragraphs: &[&'a str]) -> Vec<QuestionBlock<'a>> {
    paragraphs
        .iter()
        .filter(|p| QUESTION_START.is_match(p.trim()))
        .map(|p| QuestionBlock::borrowed(*p))
        .collect()
}

/// 第二级：全文中每个题号出现处开始，到下一个题号或文末为止
fn by_pattern_run(text: &str) -> Vec<QuestionBlock<'_>> {
    let starts: Vec<usize> = QUESTION_MARKER.find_iter(text).map(|m| m.start()).collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(text.len());
            QuestionBlock::borrowed(&text[start..end])
        })
        .collect()
}

/// 第三级：逐行扫描，题号行开启新题块，其余行并入当前题块
///
/// 第一个题号之前的行被丢弃
fn by_line_group(text: &str) -> Vec<QuestionBlock<'static>> {
    let mut groups: Vec<Vec<&str>> = Vec::new();

    for line in text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if QUESTION_START.is_match(line) {
            groups.push(vec![line]);
        } else if let Some(current) = groups.last_mut() {
            current.push(line);
        }
    }

    groups
        .into_iter()
        .map(|lines| QuestionBlock::owned(lines.join("\n")))
        .collect()
}
