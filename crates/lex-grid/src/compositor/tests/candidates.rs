use crate::compositor::{CandidateFilter, Compositor};
use crate::lm::TextLanguageModel;
use crate::node::OverrideType;
use crate::testutil::{compose, sample_lm, SAMPLE_READINGS};

fn values(c: &Compositor<TextLanguageModel>, at: usize, filter: CandidateFilter) -> Vec<String> {
    c.fetch_candidates(at, filter)
        .into_iter()
        .map(|p| p.value)
        .collect()
}

fn longest(c: &Compositor<TextLanguageModel>, at: usize, filter: CandidateFilter) -> usize {
    c.fetch_candidates(at, filter)
        .iter()
        .map(|p| p.key_array.len())
        .max()
        .unwrap_or(0)
}

#[test]
fn test_candidates_all_filter() {
    let c = compose(sample_lm(), &SAMPLE_READINGS);
    assert_eq!(
        values(&c, 7, CandidateFilter::All),
        vec!["年中", "年終", "中", "鍾", "鐘", "終", "盅", "忠"]
    );
}

#[test]
fn test_candidates_begin_and_end_filters() {
    let c = compose(sample_lm(), &SAMPLE_READINGS);
    assert_eq!(
        values(&c, 3, CandidateFilter::BeginAt),
        vec!["公司", "工", "公", "共", "供", "紅", "攻", "功", "宮", "弓", "恭", "躬"]
    );
    let ending = values(&c, 3, CandidateFilter::EndAt);
    assert_eq!(&ending[..3], &["高科技", "科技", "際"]);
    assert_eq!(ending.len(), 2 + 18);
}

#[test]
fn test_candidates_at_cursor_end() {
    let c = compose(sample_lm(), &SAMPLE_READINGS);
    // The last key is used for the All filter; nothing begins at the end.
    assert_eq!(&values(&c, 10, CandidateFilter::All)[..2], &["獎金", "金"]);
    assert!(values(&c, 10, CandidateFilter::BeginAt).is_empty());
    assert_eq!(values(&c, 10, CandidateFilter::EndAt)[0], "獎金");
    assert!(values(&c, 0, CandidateFilter::EndAt).is_empty());
}

#[test]
fn test_candidate_filters_follow_edits() {
    let mut c = compose(sample_lm(), &["ke1", "ke1"]);
    let maxima = |c: &Compositor<TextLanguageModel>| {
        [
            longest(c, 1, CandidateFilter::BeginAt),
            longest(c, 1, CandidateFilter::EndAt),
            longest(c, 0, CandidateFilter::BeginAt),
            longest(c, 2, CandidateFilter::EndAt),
        ]
    };
    assert_eq!(maxima(&c), [1, 1, 2, 2]);
    c.set_cursor(2);
    c.insert_key("jin1").unwrap();
    assert_eq!(maxima(&c), [1, 1, 2, 2]);
}

#[test]
fn test_overlapping_nodes_shortest_first() {
    let c = compose(sample_lm(), &SAMPLE_READINGS);
    let anchors = c.fetch_overlapping_nodes(2, CandidateFilter::All);
    let shape: Vec<(usize, usize)> = anchors
        .iter()
        .map(|a| (a.location, a.span_length()))
        .collect();
    assert_eq!(shape, vec![(2, 1), (1, 2), (2, 2), (0, 3)]);
    assert!(anchors.iter().all(|a| a.location <= 2 && a.end() > 2));
}

#[test]
fn test_candidates_reflect_override_selection() {
    let mut c = compose(sample_lm(), &["gao1", "ke1", "ji4"]);
    c.override_candidate_literal("膏", 0, OverrideType::HighScore)
        .unwrap();
    // Candidate lists keep score order regardless of the selected value.
    let begin = values(&c, 0, CandidateFilter::BeginAt);
    assert_eq!(begin, vec!["高科技", "高", "膏", "糕", "篙"]);
}
