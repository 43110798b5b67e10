use serde::{Deserialize, Serialize};

use crate::unigram::{sort_by_score, KeyValuePair, Unigram};

/// Score a `HighScore` override contributes unless the grid says otherwise.
pub const DEFAULT_OVERRIDING_SCORE: f64 = 114514.0;

/// How a node's selection was pinned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideType {
    /// Search is free to pick; the node scores its current unigram.
    #[default]
    NoOverride,
    /// Keep the chosen value but score it like the node's best unigram.
    TopUnigramScore,
    /// Keep the chosen value and score it with the overriding score.
    HighScore,
}

/// A candidate word covering `span_length` consecutive keys.
///
/// Unigrams are kept sorted by descending score and are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    key_array: Vec<String>,
    unigrams: Vec<Unigram>,
    current_index: usize,
    override_type: OverrideType,
    overriding_score: f64,
}

impl Node {
    /// Returns `None` when either the keys or the unigrams are empty.
    pub fn new(key_array: Vec<String>, mut unigrams: Vec<Unigram>) -> Option<Self> {
        if key_array.is_empty() || unigrams.is_empty() {
            return None;
        }
        sort_by_score(&mut unigrams);
        Some(Self {
            key_array,
            unigrams,
            current_index: 0,
            override_type: OverrideType::NoOverride,
            overriding_score: DEFAULT_OVERRIDING_SCORE,
        })
    }

    pub fn with_overriding_score(mut self, score: f64) -> Self {
        self.overriding_score = score;
        self
    }

    pub fn key_array(&self) -> &[String] {
        &self.key_array
    }

    pub fn span_length(&self) -> usize {
        self.key_array.len()
    }

    pub fn unigrams(&self) -> &[Unigram] {
        &self.unigrams
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn override_type(&self) -> OverrideType {
        self.override_type
    }

    pub fn overriding_score(&self) -> f64 {
        self.overriding_score
    }

    pub fn is_overridden(&self) -> bool {
        self.override_type != OverrideType::NoOverride
    }

    pub fn current_unigram(&self) -> &Unigram {
        &self.unigrams[self.current_index]
    }

    pub fn value(&self) -> &str {
        &self.current_unigram().value
    }

    /// Edge weight used by the assembler.
    pub fn score(&self) -> f64 {
        match self.override_type {
            OverrideType::HighScore => self.overriding_score,
            OverrideType::TopUnigramScore => self.unigrams[0].score,
            OverrideType::NoOverride => self.current_unigram().score,
        }
    }

    pub fn joined_key(&self, separator: &str) -> String {
        self.key_array.join(separator)
    }

    pub fn current_pair(&self) -> KeyValuePair {
        KeyValuePair::new(self.key_array.clone(), self.value())
    }

    /// True when the value is not one character per key, e.g. an emoji
    /// standing in for a two-key word.
    pub fn is_reading_mismatched(&self) -> bool {
        self.key_array.len() != self.value().chars().count()
    }

    pub fn reset(&mut self) {
        self.current_index = 0;
        self.override_type = OverrideType::NoOverride;
    }

    /// Replace the unigram list. Clears the override when the value at the
    /// (clamped) current index changes. An empty list is refused.
    pub fn sync_unigrams(&mut self, mut unigrams: Vec<Unigram>) -> bool {
        if unigrams.is_empty() {
            return false;
        }
        sort_by_score(&mut unigrams);
        let old_value = std::mem::take(&mut self.unigrams[self.current_index].value);
        self.unigrams = unigrams;
        self.current_index = self.current_index.min(self.unigrams.len() - 1);
        if self.unigrams[self.current_index].value != old_value {
            self.reset();
        }
        true
    }

    /// Select the first unigram whose value matches. `NoOverride` never
    /// matches; use [`Node::reset`] to clear a selection.
    pub fn select_override_unigram(&mut self, value: &str, override_type: OverrideType) -> bool {
        if override_type == OverrideType::NoOverride {
            return false;
        }
        match self.unigrams.iter().position(|u| u.value == value) {
            Some(i) => {
                self.current_index = i;
                self.override_type = override_type;
                true
            }
            None => false,
        }
    }

    pub(crate) fn weaken_overriding_score(&mut self, divisor: f64) {
        self.overriding_score /= divisor;
    }

    /// Whether a deserialized node still satisfies the constructor's invariants.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.key_array.is_empty()
            && !self.unigrams.is_empty()
            && self.current_index < self.unigrams.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(k: &[&str]) -> Vec<String> {
        k.iter().map(|s| s.to_string()).collect()
    }

    fn gao1() -> Node {
        Node::new(
            keys(&["gao1"]),
            vec![
                Unigram::new("膏", -11.928720),
                Unigram::new("高", -7.171551),
                Unigram::new("糕", -12.390804),
            ],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_inputs() {
        assert!(Node::new(vec![], vec![Unigram::new("a", 0.0)]).is_none());
        assert!(Node::new(keys(&["a"]), vec![]).is_none());
    }

    #[test]
    fn new_sorts_descending() {
        let n = gao1();
        assert_eq!(n.value(), "高");
        assert_eq!(n.span_length(), 1);
        assert_eq!(n.unigrams()[2].value, "糕");
        assert!((n.score() - -7.171551).abs() < 1e-9);
    }

    #[test]
    fn override_scores() {
        let mut n = gao1();
        assert!(n.select_override_unigram("糕", OverrideType::TopUnigramScore));
        assert_eq!(n.value(), "糕");
        assert!((n.score() - -7.171551).abs() < 1e-9);

        assert!(n.select_override_unigram("膏", OverrideType::HighScore));
        assert_eq!(n.value(), "膏");
        assert!((n.score() - DEFAULT_OVERRIDING_SCORE).abs() < 1e-9);
        assert!(n.is_overridden());

        n.reset();
        assert_eq!(n.value(), "高");
        assert!(!n.is_overridden());
    }

    #[test]
    fn select_failures_leave_state() {
        let mut n = gao1();
        assert!(n.select_override_unigram("糕", OverrideType::HighScore));
        assert!(!n.select_override_unigram("不存在", OverrideType::HighScore));
        assert!(!n.select_override_unigram("高", OverrideType::NoOverride));
        assert_eq!(n.value(), "糕");
        assert_eq!(n.override_type(), OverrideType::HighScore);
    }

    #[test]
    fn sync_keeps_override_when_value_stays() {
        let mut n = gao1();
        n.select_override_unigram("膏", OverrideType::HighScore);
        // Index 1 still holds 膏 after the new list is sorted.
        assert!(n.sync_unigrams(vec![
            Unigram::new("高", -7.0),
            Unigram::new("膏", -8.0),
        ]));
        assert_eq!(n.value(), "膏");
        assert_eq!(n.override_type(), OverrideType::HighScore);
    }

    #[test]
    fn sync_resets_when_value_changes() {
        let mut n = gao1();
        n.select_override_unigram("糕", OverrideType::HighScore);
        assert!(n.sync_unigrams(vec![Unigram::new("高", -7.0), Unigram::new("膏", -8.0)]));
        // Index clamps to 1 which now holds 膏, so the override is dropped.
        assert_eq!(n.value(), "高");
        assert_eq!(n.current_index(), 0);
        assert!(!n.is_overridden());
    }

    #[test]
    fn sync_top_unigram_override_follows_new_top() {
        let mut n = gao1();
        n.select_override_unigram("膏", OverrideType::TopUnigramScore);
        assert!(n.sync_unigrams(vec![
            Unigram::new("膏", -9.0),
            Unigram::new("高", -3.0),
        ]));
        // 膏 is still at index 1, its score now tracks the new top (-3.0).
        assert_eq!(n.value(), "膏");
        assert!((n.score() - -3.0).abs() < 1e-9);
    }

    #[test]
    fn sync_refuses_empty() {
        let mut n = gao1();
        assert!(!n.sync_unigrams(vec![]));
        assert_eq!(n.unigrams().len(), 3);
    }

    #[test]
    fn reading_mismatch() {
        let n = Node::new(keys(&["huo3", "yan4"]), vec![Unigram::new("🔥", -8.0)]).unwrap();
        assert!(n.is_reading_mismatched());
        let n = Node::new(keys(&["huo3", "yan4"]), vec![Unigram::new("火焰", -5.6)]).unwrap();
        assert!(!n.is_reading_mismatched());
        assert_eq!(n.joined_key("-"), "huo3-yan4");
        assert_eq!(n.current_pair().value, "火焰");
    }

    #[test]
    fn weaken_divides_overriding_score() {
        let mut n = gao1().with_overriding_score(100.0);
        n.weaken_overriding_score(4.0);
        assert!((n.overriding_score() - 25.0).abs() < 1e-9);
    }
}
