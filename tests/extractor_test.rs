use quiz_import::error::ExtractError;
use quiz_import::{extract, ExtractedQuestion, QuestionExtractor, SegmentTier};

const TWO_QUESTIONS: &str =
    "Q1) 2+2?\nA) 3\nB) 4\nAnswer: B\n\nQ2) Capital of France?\nA) Paris\nB) Rome\nAns: A";

fn question(text: &str, options: &[&str], answer: usize) -> ExtractedQuestion {
    ExtractedQuestion::try_new(text, options.iter().map(|s| s.to_string()).collect(), answer)
        .expect("测试题目应当合法")
}

#[test]
fn test_answer_lines_in_separate_paragraphs() {
    let result = extract(TWO_QUESTIONS).unwrap();

    assert_eq!(
        result.accepted,
        vec![
            question("2+2?", &["3", "4"], 1),
            question("Capital of France?", &["Paris", "Rome"], 0),
        ]
    );
    assert_eq!(result.tier, SegmentTier::Paragraph);
    assert_eq!(result.total_blocks_scanned, 2);
    assert_eq!(result.matched_blocks_used, 2);
}

#[test]
fn test_starred_option_without_answer_line() {
    let result = extract("1. Sky color?\nA) Red\nB) Blue*\nC) Green").unwrap();

    assert_eq!(
        result.accepted,
        vec![question("Sky color?", &["Red", "Blue", "Green"], 1)]
    );
}

#[test]
fn test_block_without_any_answer_is_counted_but_dropped() {
    let text = format!("{}\n\nQ3) Unanswered?\nA) yes\nB) no", TWO_QUESTIONS);
    let result = extract(&text).unwrap();

    assert_eq!(result.matched_blocks_used, 3);
    assert_eq!(result.accepted.len(), 2);
    assert_eq!(result.rejected(), 1);
    assert!(result
        .accepted
        .iter()
        .all(|q| q.question_text() != "Unanswered?"));
}

#[test]
fn test_leading_bom_keeps_first_question() {
    let text = "\u{feff}Q1) One?\nA) a\nB) b\nAns: A\n\n\
                Q2) Two?\nA) a\nB) b\nAns: B\n\n\
                Q3) Three?\nA) a\nB) b\nAns: A";
    let result = extract(text).unwrap();

    assert_eq!(result.tier, SegmentTier::Paragraph);
    assert_eq!(result.matched_blocks_used, 3);
    let texts: Vec<&str> = result.accepted.iter().map(|q| q.question_text()).collect();
    assert_eq!(texts, vec!["One?", "Two?", "Three?"]);
}

#[test]
fn test_blank_text_is_empty_document() {
    assert_eq!(extract(""), Err(ExtractError::EmptyDocument));
    assert_eq!(extract("  \n\n\t  \n"), Err(ExtractError::EmptyDocument));
}

#[test]
fn test_single_option_block_is_dropped() {
    let result = extract("1) Lonely?\nA) only\nAnswer: A").unwrap();

    assert_eq!(result.matched_blocks_used, 1);
    assert!(result.accepted.is_empty());
}

#[test]
fn test_answer_line_without_letter_disables_star_fallback() {
    let result = extract("1) Pick one\nA) first*\nB) second\nAnswer: see notes").unwrap();
    assert!(result.accepted.is_empty());
}

#[test]
fn test_answer_letter_beyond_options_is_dropped() {
    let result = extract("1) Pick one\nA) first\nB) second\nCorrect: D").unwrap();
    assert!(result.accepted.is_empty());
}

#[test]
fn test_answer_line_wins_over_star() {
    let result = extract("1) Pick one\nA) first*\nB) second\nans: b").unwrap();

    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.accepted[0].answer_index(), 1);
    // 有答案行时星号不会被去掉
    assert_eq!(result.accepted[0].options()[0], "first*");
}

#[test]
fn test_duplicate_option_letter_keeps_first() {
    let result = extract("1) Which?\nA) alpha\nB) beta\nB) see below\nAnswer: B").unwrap();
    assert_eq!(result.accepted[0].options(), &["alpha", "beta"]);
}

#[test]
fn test_missing_letters_are_skipped() {
    let result = extract("1) Gap\nA) one\nC) three\nAnswer: B").unwrap();

    // 只有 2 个选项，B 映射到第二个
    assert_eq!(result.accepted[0].options(), &["one", "three"]);
    assert_eq!(result.accepted[0].answer(), "three");
}

#[test]
fn test_escalates_to_pattern_run_without_blank_lines() {
    let text = "1) First?\nA) x\nB) y\nAns: A\n2) Second?\nA) p\nB) q\nAns: B";
    let result = extract(text).unwrap();

    assert_eq!(result.tier, SegmentTier::PatternRun);
    assert_eq!(result.total_blocks_scanned, 1);
    assert_eq!(result.matched_blocks_used, 2);
    assert_eq!(result.accepted.len(), 2);
    assert_eq!(result.accepted[1].question_text(), "Second?");
}

#[test]
fn test_no_escalation_when_paragraphs_are_enough() {
    // 题干内的 "3." 在第二级会多切出题块，但第一级已有 2 个
    let text = "1) Value of 3.5 rounded?\nA) 3\nB) 4\nAns: B\n\n2) Next\nA) a\nB) b\nAns: A";
    let result = extract(text).unwrap();

    assert_eq!(result.tier, SegmentTier::Paragraph);
    assert_eq!(result.accepted.len(), 2);
}

#[test]
fn test_extraction_is_idempotent() {
    let extractor = QuestionExtractor::new();
    let first = extractor.extract(TWO_QUESTIONS).unwrap();
    let second = extractor.extract(TWO_QUESTIONS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_document_order_is_preserved() {
    let text = (1..=6)
        .map(|n| format!("{n}) Question {n}\nA) yes\nB) no\nAnswer: A"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let result = extract(&text).unwrap();

    let texts: Vec<&str> = result.accepted.iter().map(|q| q.question_text()).collect();
    assert_eq!(
        texts,
        vec!["Question 1", "Question 2", "Question 3", "Question 4", "Question 5", "Question 6"]
    );
}

#[test]
fn test_accepted_questions_always_within_bounds() {
    let samples = [
        TWO_QUESTIONS,
        "1) a\nA) x\n\n2) b\nA) x\nB) y\nC) z\nD) w\nAnswer: D",
        "Q1) c\nb) lower\na) case\nanswer:a",
        "junk\n1) d\nA) x\nB) y\nE) not an option\nAns: C\n2) e\nA) 1*\nB) 2",
        "1) f\n\nA) split\n\nB) apart\n\nAns: A",
    ];

    for sample in samples {
        let result = extract(sample).unwrap();
        assert!(result.accepted.len() <= result.matched_blocks_used);
        for q in &result.accepted {
            assert!(!q.question_text().is_empty());
            assert!((2..=4).contains(&q.options().len()));
            assert!(q.answer_index() < q.options().len());
        }
    }
}
