//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! A compositor only reads these when it is created; afterwards each grid
//! carries its own copy in [`CompositorSettings`].

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Lower bound for `compositor.max_span_length`.
pub const MIN_SPAN_LENGTH: usize = 6;

/// Upper bound for `compositor.max_span_length`. Every span reserves one slot
/// per possible length.
pub const MAX_SPAN_LENGTH: usize = 64;

/// Bring a requested span length limit into `MIN_SPAN_LENGTH..=MAX_SPAN_LENGTH`.
pub fn clamp_span_length(value: usize) -> usize {
    value.clamp(MIN_SPAN_LENGTH, MAX_SPAN_LENGTH)
}

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        // Custom TOML was validated in init_custom and build.rs checks the
        // embedded one, so the fallback only covers a broken build.
        parse_settings_toml(toml_str).unwrap_or_default()
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub compositor: GridSettings,
    pub node: NodeSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridSettings {
    pub max_span_length: usize,
    pub separator: String,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_span_length: 10,
            separator: "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSettings {
    pub overriding_score: f64,
    pub overlap_weaken_divisor: f64,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            overriding_score: 114514.0,
            overlap_weaken_divisor: 4.0,
        }
    }
}

/// The per-grid slice of [`Settings`] a compositor starts with.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorSettings {
    pub max_span_length: usize,
    pub separator: String,
    pub overriding_score: f64,
    pub overlap_weaken_divisor: f64,
}

impl CompositorSettings {
    pub fn from_settings(s: &Settings) -> Self {
        Self {
            max_span_length: s.compositor.max_span_length,
            separator: s.compositor.separator.clone(),
            overriding_score: s.node.overriding_score,
            overlap_weaken_divisor: s.node.overlap_weaken_divisor,
        }
    }

    /// Snapshot of the global settings.
    pub fn current() -> Self {
        Self::from_settings(settings())
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_max_span_length(mut self, max_span_length: usize) -> Self {
        self.max_span_length = clamp_span_length(max_span_length);
        self
    }
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_finite_above {
        ($section:ident . $field:ident, $min:expr) => {
            if !s.$section.$field.is_finite() || s.$section.$field <= $min {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: format!("must be a finite number greater than {}", $min),
                });
            }
        };
    }

    if !(MIN_SPAN_LENGTH..=MAX_SPAN_LENGTH).contains(&s.compositor.max_span_length) {
        return Err(SettingsError::InvalidValue {
            field: "compositor.max_span_length".to_string(),
            reason: format!("must be between {MIN_SPAN_LENGTH} and {MAX_SPAN_LENGTH}"),
        });
    }

    check_finite_above!(node.overriding_score, 0.0);
    check_finite_above!(node.overlap_weaken_divisor, 1.0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.compositor.max_span_length, 10);
        assert_eq!(s.compositor.separator, "-");
        assert!((s.node.overriding_score - 114514.0).abs() < f64::EPSILON);
        assert!((s.node.overlap_weaken_divisor - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn embedded_toml_matches_fallback() {
        let parsed = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(
            CompositorSettings::from_settings(&parsed),
            CompositorSettings::default()
        );
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[compositor]
max_span_length = 8
separator = ""

[node]
overriding_score = 1000.0
overlap_weaken_divisor = 2.0
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert_eq!(s.compositor.max_span_length, 8);
        assert_eq!(s.compositor.separator, "");
        let c = CompositorSettings::from_settings(&s);
        assert!((c.overriding_score - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn error_short_span_length() {
        let toml = r#"
[compositor]
max_span_length = 5
separator = "-"

[node]
overriding_score = 114514.0
overlap_weaken_divisor = 4.0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("compositor.max_span_length"));
    }

    #[test]
    fn error_non_positive_overriding_score() {
        let toml = r#"
[compositor]
max_span_length = 10
separator = "-"

[node]
overriding_score = 0.0
overlap_weaken_divisor = 4.0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("node.overriding_score"));
    }

    #[test]
    fn error_divisor_not_above_one() {
        let toml = r#"
[compositor]
max_span_length = 10
separator = "-"

[node]
overriding_score = 114514.0
overlap_weaken_divisor = 1.0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("node.overlap_weaken_divisor"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let toml = r#"
[compositor]
max_span_length = 10
separator = "-"
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_huge_span_length() {
        let toml = r#"
[compositor]
max_span_length = 100000
separator = "-"

[node]
overriding_score = 114514.0
overlap_weaken_divisor = 4.0
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(err.to_string().contains("compositor.max_span_length"));
    }

    #[test]
    fn builder_caps_span_length() {
        let c = CompositorSettings::default().with_max_span_length(usize::MAX);
        assert_eq!(c.max_span_length, MAX_SPAN_LENGTH);
    }

    #[test]
    fn builder_floors_span_length() {
        let c = CompositorSettings::default()
            .with_max_span_length(2)
            .with_separator("");
        assert_eq!(c.max_span_length, MIN_SPAN_LENGTH);
        assert_eq!(c.separator, "");
    }
}
