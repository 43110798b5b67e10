use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use super::LanguageModel;
use crate::unigram::Unigram;

#[derive(Debug, thiserror::Error)]
pub enum LmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// In-memory model parsed from whitespace-separated `key value score` lines.
///
/// Multi-key entries join their keys with the model's separator, e.g.
/// `gong1-si1 公司 -6.29`. Lines starting with `#` and blank lines are skipped.
#[derive(Debug, Clone)]
pub struct TextLanguageModel {
    separator: String,
    entries: HashMap<String, Vec<Unigram>>,
}

impl Default for TextLanguageModel {
    fn default() -> Self {
        Self::with_separator("-")
    }
}

impl TextLanguageModel {
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            entries: HashMap::new(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, LmError> {
        let mut lm = Self::default();
        lm.load_str(text, false)?;
        Ok(lm)
    }

    /// Parse `value key score` lines, i.e. lookups are keyed by the second
    /// column. Used to segment plain text with keys joined by `""`.
    pub fn parse_swapped(text: &str) -> Result<Self, LmError> {
        let mut lm = Self::with_separator("");
        lm.load_str(text, true)?;
        Ok(lm)
    }

    pub fn from_path(path: &Path, swap_columns: bool) -> Result<Self, LmError> {
        let text = std::fs::read_to_string(path)?;
        let mut lm = if swap_columns {
            Self::with_separator("")
        } else {
            Self::default()
        };
        lm.load_str(&text, swap_columns)?;
        debug!(path = %path.display(), keys = lm.entries.len(), "loaded text language model");
        Ok(lm)
    }

    /// Add every line of `text` to this model.
    pub fn load_str(&mut self, text: &str, swap_columns: bool) -> Result<(), LmError> {
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut cols = line.split_whitespace();
            let (Some(a), Some(b), Some(score)) = (cols.next(), cols.next(), cols.next()) else {
                return Err(LmError::Parse {
                    line: i + 1,
                    reason: "expected `key value score`".to_string(),
                });
            };
            let score: f64 = score.parse().map_err(|_| LmError::Parse {
                line: i + 1,
                reason: format!("invalid score `{score}`"),
            })?;
            let (key, value) = if swap_columns { (b, a) } else { (a, b) };
            self.insert(key, Unigram::new(value, score));
        }
        Ok(())
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// `key` is already joined with the model separator.
    pub fn insert(&mut self, key: impl Into<String>, unigram: Unigram) {
        self.entries.entry(key.into()).or_default().push(unigram);
    }

    /// Remove every unigram of `key` whose value is `value`.
    pub fn trim(&mut self, key: &str, value: &str) {
        if let Some(list) = self.entries.get_mut(key) {
            list.retain(|u| u.value != value);
            if list.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LanguageModel for TextLanguageModel {
    fn unigrams_for(&self, key_array: &[String]) -> Vec<Unigram> {
        self.entries
            .get(&key_array.join(&self.separator))
            .cloned()
            .unwrap_or_default()
    }

    fn has_unigrams_for(&self, key_array: &[String]) -> bool {
        self.entries.contains_key(&key_array.join(&self.separator))
    }
}
