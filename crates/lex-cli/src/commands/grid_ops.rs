use std::fs;
use std::path::Path;
use std::process;
use std::str::FromStr;

use tracing::debug;
use unicode_width::UnicodeWidthStr;

use lex_grid::explain::{explain_nodes, ExplainWalk};
use lex_grid::settings::{parse_settings_toml, CompositorSettings};
use lex_grid::{
    CandidateFilter, Compositor, CompositorError, OverrideType, TextLanguageModel, WalkedPath,
};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

/// Options shared by every grid subcommand.
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    pub settings: Option<String>,
    pub separator: Option<String>,
    pub max_span: Option<usize>,
    /// Model file has `value key score` columns.
    pub swap: bool,
}

/// A `VALUE@POS` override request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub value: String,
    pub at: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PinError {
    #[error("expected VALUE@POS, got `{0}`")]
    Format(String),
    #[error("invalid position `{0}`")]
    Position(String),
}

impl FromStr for Pin {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, at) = s.rsplit_once('@').ok_or_else(|| PinError::Format(s.to_string()))?;
        if value.is_empty() {
            return Err(PinError::Format(s.to_string()));
        }
        let at = at
            .parse()
            .map_err(|_| PinError::Position(at.to_string()))?;
        Ok(Pin {
            value: value.to_string(),
            at,
        })
    }
}

/// Keys the model rejected while feeding readings, with the reason.
pub type Skipped = Vec<(String, CompositorError)>;

/// Type `readings` into a fresh compositor, then apply `pins` in order.
pub fn compose(
    lm: TextLanguageModel,
    settings: CompositorSettings,
    readings: &[String],
    pins: &[Pin],
) -> (Compositor<TextLanguageModel>, Skipped) {
    let mut c = Compositor::with_settings(lm, settings);
    let mut skipped = Vec::new();
    for reading in readings {
        if let Err(e) = c.insert_key(reading) {
            skipped.push((reading.clone(), e));
        }
    }
    for pin in pins {
        if let Err(e) = c.override_candidate_literal(&pin.value, pin.at, OverrideType::HighScore) {
            skipped.push((format!("{}@{}", pin.value, pin.at), e));
        }
    }
    debug!(keys = c.len(), skipped = skipped.len(), "composed");
    (c, skipped)
}

/// One line per segment: value, joined keys and span length, in aligned columns.
pub fn format_walk(path: &WalkedPath, separator: &str) -> String {
    let values = path.values();
    let keys = path.joined_keys(separator);
    let width = values.iter().map(|v| v.width()).max().unwrap_or(0);
    let mut out = String::new();
    for ((value, key), len) in values.iter().zip(&keys).zip(path.span_lengths()) {
        let pad = " ".repeat(width - value.width());
        out.push_str(&format!("{value}{pad}  {key} ({len})\n"));
    }
    out.push_str(&format!("score: {:.6}\n", path.score()));
    out
}

fn resolve_settings(opts: &GridOptions) -> CompositorSettings {
    let mut settings = match &opts.settings {
        Some(file) => {
            let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
            let parsed = die!(parse_settings_toml(&content), "Error: {}");
            CompositorSettings::from_settings(&parsed)
        }
        None => CompositorSettings::current(),
    };
    if let Some(sep) = &opts.separator {
        settings = settings.with_separator(sep.clone());
    }
    if let Some(max) = opts.max_span {
        settings = settings.with_max_span_length(max);
    }
    settings
}

fn open_compositor(
    lm_file: &str,
    readings: &[String],
    pins: &[Pin],
    opts: &GridOptions,
) -> Compositor<TextLanguageModel> {
    let lm = die!(
        TextLanguageModel::from_path(Path::new(lm_file), opts.swap),
        "Error opening language model: {}"
    );
    let (c, skipped) = compose(lm, resolve_settings(opts), readings, pins);
    for (what, e) in &skipped {
        eprintln!("skipped {what}: {e}");
    }
    c
}

pub fn walk_cmd(lm_file: &str, readings: &[String], pins: &[Pin], json: bool, opts: &GridOptions) {
    let mut c = open_compositor(lm_file, readings, pins, opts);
    let separator = c.separator().to_string();
    let path = c.walk();
    if json {
        let out = die!(
            serde_json::to_string_pretty(&ExplainWalk::from(path)),
            "Error: {}"
        );
        println!("{out}");
    } else {
        print!("{}", format_walk(path, &separator));
    }
}

pub fn candidates_cmd(
    lm_file: &str,
    readings: &[String],
    at: usize,
    filter: CandidateFilter,
    opts: &GridOptions,
) {
    let c = open_compositor(lm_file, readings, &[], opts);
    let candidates = c.fetch_candidates(at, filter);
    if candidates.is_empty() {
        println!("(no candidates)");
        return;
    }
    let width = candidates.iter().map(|p| p.value.width()).max().unwrap_or(0);
    for (i, pair) in candidates.iter().enumerate() {
        let pad = " ".repeat(width - pair.value.width());
        println!(
            "{:>3}. {}{pad}  {}",
            i + 1,
            pair.value,
            pair.joined_key(c.separator())
        );
    }
}

pub fn dot_cmd(lm_file: &str, readings: &[String], pins: &[Pin], opts: &GridOptions) {
    let c = open_compositor(lm_file, readings, pins, opts);
    print!("{}", c.dump_dot());
}

pub fn nodes_cmd(lm_file: &str, readings: &[String], opts: &GridOptions) {
    let c = open_compositor(lm_file, readings, &[], opts);
    let out = die!(
        serde_json::to_string_pretty(&explain_nodes(c.spans())),
        "Error: {}"
    );
    println!("{out}");
}

pub fn snapshot_cmd(lm_file: &str, readings: &[String], pins: &[Pin], opts: &GridOptions) {
    let mut c = open_compositor(lm_file, readings, pins, opts);
    c.walk();
    let out = die!(serde_json::to_string_pretty(c.grid()), "Error: {}");
    println!("{out}");
}
