// Model Helper - model id parsing
//
// Request-time model ids carry an optional best-of-N suffix:
// `gpt-4o` (single call), `gpt-4o-B5` (five candidates), `gpt-4o-B` (default count).

use serde::{Deserialize, Serialize};

/// Marker separating the base model name from the candidate count
pub const BEST_OF_N_MARKER: &str = "-B";

/// Candidate count used when the suffix carries no usable number
pub const DEFAULT_BEST_OF_N: u32 = 8;

/// Parse result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedModel {
    /// Everything before the first `-B`
    pub base_model: String,
    /// Number of candidates to generate, always >= 1
    pub best_of_n: u32,
    /// Whether a `-B` suffix was present at all
    pub has_suffix: bool,
    /// Raw text after the first `-B`, if any
    pub suffix: Option<String>,
    /// Original model id
    pub original: String,
}

/// Split a model id into its base name and best-of-N count
///
/// Only the first occurrence of `-B` splits, so a base name that itself
/// contains `-B` is cut short (`"foo-Bar-B3"` → base `"foo"`).
///
/// # Examples
/// ```
/// use quality_compute::utils::model_helper::parse_best_of_n_model;
///
/// let parsed = parse_best_of_n_model("gpt-4o-B5");
/// assert_eq!(parsed.base_model, "gpt-4o");
/// assert_eq!(parsed.best_of_n, 5);
///
/// let parsed = parse_best_of_n_model("gpt-4o");
/// assert_eq!(parsed.best_of_n, 1);
///
/// let parsed = parse_best_of_n_model("gpt-4o-B");
/// assert_eq!(parsed.best_of_n, 8);
/// ```
pub fn parse_best_of_n_model(model_id: &str) -> ParsedModel {
    match model_id.split_once(BEST_OF_N_MARKER) {
        Some((base, suffix)) => ParsedModel {
            base_model: base.to_string(),
            best_of_n: parse_candidate_count(suffix).unwrap_or(DEFAULT_BEST_OF_N),
            has_suffix: true,
            suffix: Some(suffix.to_string()),
            original: model_id.to_string(),
        },
        None => ParsedModel {
            base_model: model_id.to_string(),
            best_of_n: 1,
            has_suffix: false,
            suffix: None,
            original: model_id.to_string(),
        },
    }
}

/// Lenient integer parse of the suffix: leading whitespace is skipped and
/// parsing stops at the first non-digit. Zero, overflow and digit-less
/// suffixes yield `None`.
fn parse_candidate_count(suffix: &str) -> Option<u32> {
    let trimmed = suffix.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    trimmed[..digits_end]
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

/// Build a model id with an explicit candidate count
///
/// # Examples
/// ```
/// use quality_compute::utils::model_helper::best_of_n_model_id;
///
/// assert_eq!(best_of_n_model_id("o4-mini", 10), "o4-mini-B10");
/// ```
pub fn best_of_n_model_id(base_model: &str, best_of_n: u32) -> String {
    format!("{}{}{}", base_model, BEST_OF_N_MARKER, best_of_n.max(1))
}

/// Base name and an optional "Best of ..." label for call listings
///
/// The label echoes the raw suffix text, so `"gpt-4o-B"` gives `"Best of "`
/// exactly as the call history shows it.
pub fn display_model(model_id: &str) -> (String, Option<String>) {
    let parsed = parse_best_of_n_model(model_id);
    let label = parsed.suffix.map(|s| format!("Best of {}", s));
    (parsed.base_model, label)
}
