use std::fmt;

use serde::{Deserialize, Serialize};

/// One candidate value for a key slice, with its log-probability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unigram {
    pub value: String,
    pub score: f64,
}

impl Unigram {
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        Self {
            value: value.into(),
            score,
        }
    }
}

impl fmt::Display for Unigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.value, self.score)
    }
}

/// Sort unigrams by descending score. Stable, so equal scores keep model order.
pub(crate) fn sort_by_score(unigrams: &mut [Unigram]) {
    unigrams.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// A key slice paired with one of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key_array: Vec<String>,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key_array: Vec<String>, value: impl Into<String>) -> Self {
        Self {
            key_array,
            value: value.into(),
        }
    }

    /// Keys joined with `separator`.
    pub fn joined_key(&self, separator: &str) -> String {
        self.key_array.join(separator)
    }

    pub fn is_valid(&self) -> bool {
        !self.key_array.is_empty()
            && self.key_array.iter().all(|k| !k.is_empty())
            && !self.value.is_empty()
    }
}

impl fmt::Display for KeyValuePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.key_array.join("-"), self.value)
    }
}
