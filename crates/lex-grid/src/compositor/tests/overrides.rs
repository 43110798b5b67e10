use crate::compositor::Compositor;
use crate::error::CompositorError;
use crate::lm::TextLanguageModel;
use crate::node::{OverrideType, DEFAULT_OVERRIDING_SCORE};
use crate::testutil::{compose, sample_lm, walked_values, EMOJI_LM, LITCH_LM, SAMPLE_LM};
use crate::unigram::KeyValuePair;

fn pair(keys: &[&str], value: &str) -> KeyValuePair {
    KeyValuePair::new(keys.iter().map(|s| s.to_string()).collect(), value)
}

#[test]
fn test_override_splits_three_key_word() {
    let mut c = compose(sample_lm(), &["gao1", "ke1", "ji4"]);
    assert_eq!(walked_values(&mut c), vec!["高科技"]);
    c.override_candidate(&pair(&["gao1"], "膏"), 0, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["膏", "科技"]);
}

#[test]
fn test_override_sequence_stays_local() {
    let mut c = compose(sample_lm(), &["gao1", "ke1", "ji4"]);
    let steps = [
        ("膏", 0, vec!["膏", "科技"]),
        ("高科技", 1, vec!["高科技"]),
        ("膏", 0, vec!["膏", "科技"]),
        ("柯", 1, vec!["膏", "柯", "際"]),
        ("暨", 2, vec!["膏", "柯", "暨"]),
        ("高科技", 3, vec!["高科技"]),
    ];
    for (value, at, expected) in steps {
        c.override_candidate_literal(value, at, OverrideType::HighScore)
            .unwrap();
        assert_eq!(walked_values(&mut c), expected, "after {value}@{at}");
    }
}

#[test]
fn test_override_resets_crossing_nodes() {
    let lm = TextLanguageModel::parse(&format!(
        "{SAMPLE_LM}zhong1-jiang3 終講 -11.0\njiang3-jin1 槳襟 -11.0\n"
    ))
    .unwrap();
    let mut c = compose(lm, &["nian2", "zhong1", "jiang3", "jin1"]);
    assert_eq!(walked_values(&mut c), vec!["年中", "獎金"]);

    c.override_candidate_literal("終講", 1, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["年", "終講", "金"]);

    c.override_candidate_literal("槳襟", 2, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["年中", "槳襟"]);

    c.override_candidate_literal("年終", 0, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["年終", "槳襟"]);
}

#[test]
fn test_override_matches_key_array() {
    let lm = TextLanguageModel::parse(EMOJI_LM).unwrap();
    let mut c = compose(lm, &["gao1", "re4", "huo3", "yan4", "wei2", "xian3"]);
    assert_eq!(walked_values(&mut c), vec!["高熱", "火焰", "危險"]);

    c.override_candidate(&pair(&["huo3"], "🔥"), 2, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["高熱", "🔥", "焰", "危險"]);

    c.override_candidate(&pair(&["huo3", "yan4"], "🔥"), 2, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["高熱", "🔥", "危險"]);
    assert!(c.walk().nodes()[1].is_reading_mismatched());
}

#[test]
fn test_override_wrong_key_array_fails() {
    let lm = TextLanguageModel::parse(EMOJI_LM).unwrap();
    let mut c = compose(lm, &["huo3", "yan4"]);
    let before = c.grid().clone();
    let err = c
        .override_candidate(&pair(&["yan4"], "🔥"), 1, OverrideType::HighScore)
        .unwrap_err();
    assert_eq!(
        err,
        CompositorError::CandidateNotFound {
            value: "🔥".to_string(),
            location: 1
        }
    );
    assert_eq!(c.grid(), &before);
}

#[test]
fn test_override_rejects_no_override_and_empty_grid() {
    let mut c = Compositor::with_settings(sample_lm(), Default::default());
    assert!(matches!(
        c.override_candidate_literal("高", 0, OverrideType::HighScore),
        Err(CompositorError::CandidateNotFound { .. })
    ));
    c.insert_key("gao1").unwrap();
    assert_eq!(
        c.override_candidate_literal("高", 0, OverrideType::NoOverride),
        Err(CompositorError::NoOverrideRequested)
    );
}

#[test]
fn test_literal_override_on_mismatched_word() {
    let lm = TextLanguageModel::parse(LITCH_LM).unwrap();
    let mut c = compose(lm, &["nai3", "ji1"]);
    assert_eq!(walked_values(&mut c), vec!["荔枝"]);
    c.override_candidate_literal("雞", 1, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["乃", "雞"]);
}

#[test]
fn test_override_position_past_end_uses_last_key() {
    let mut c = compose(sample_lm(), &["gao1", "ke1", "ji4"]);
    c.override_candidate_literal("暨", 99, OverrideType::HighScore)
        .unwrap();
    let values = walked_values(&mut c);
    assert_eq!(values.last().map(String::as_str), Some("暨"));
}

#[test]
fn test_top_unigram_score_override() {
    let mut c = compose(sample_lm(), &["gao1", "ke1", "ji4"]);
    // 糕 scores like 高 but cannot beat 高科技 on that basis.
    c.override_candidate_literal("糕", 0, OverrideType::TopUnigramScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["高科技"]);
    let node = c.spans()[0].node_of(1).unwrap();
    assert_eq!(node.value(), "糕");
    assert!((node.score() - -7.171551).abs() < 1e-9);
}

#[test]
fn test_contained_same_value_node_is_weakened() {
    let lm = TextLanguageModel::parse("a 甲 -1\nb 乙 -1\na-b 甲 -5\n").unwrap();
    let mut c = compose(lm, &["a", "b"]);
    c.override_candidate(&pair(&["a"], "甲"), 0, OverrideType::HighScore)
        .unwrap();
    assert_eq!(walked_values(&mut c), vec!["甲", "乙"]);

    c.override_candidate(&pair(&["a", "b"], "甲"), 0, OverrideType::HighScore)
        .unwrap();
    let single = c.spans()[0].node_of(1).unwrap();
    assert_eq!(single.override_type(), OverrideType::HighScore);
    assert!((single.overriding_score() - DEFAULT_OVERRIDING_SCORE / 4.0).abs() < 1e-9);
    assert!(!c.spans()[1].node_of(1).unwrap().is_overridden());
    assert_eq!(walked_values(&mut c), vec!["甲"]);
}
