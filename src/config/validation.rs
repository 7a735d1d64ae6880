//! Config validation: unknown-key detection with Levenshtein suggestions
//! and parameter range checks.
//!
//! Unknown keys are found by walking the raw `toml::Value` tree before serde
//! deserialization. They only ever produce warnings.

use std::collections::HashSet;

/// A config key that no `SpectralConfig` field reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey {
    /// Dotted path, e.g. `welch.segmnt_count`
    pub field: String,
    /// Closest known key, if any is near enough
    pub suggestion: Option<String>,
}

impl std::fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suggestion {
            Some(s) => write!(f, "unknown config key '{}', did you mean '{s}'?", self.field),
            None => write!(f, "unknown config key '{}' is ignored", self.field),
        }
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `SpectralConfig`.
///
/// Must be kept in step with the structs in spectral_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        "resampling",
        "resampling.time_increment_ms",
        "welch",
        "welch.sample_spacing_ms",
        "welch.segment_count",
        "welch.overlap_percent",
        "aggregation",
        "aggregation.parallel",
    ]
    .into_iter()
    .collect()
}

/// Every key of a TOML document as a dotted path, parents before children.
pub fn dotted_keys(table: &toml::Table) -> Vec<String> {
    fn descend(table: &toml::Table, prefix: Option<&str>, out: &mut Vec<String>) {
        for (key, value) in table {
            let path = prefix.map_or_else(|| key.clone(), |p| format!("{p}.{key}"));
            if let toml::Value::Table(nested) = value {
                out.push(path.clone());
                descend(nested, Some(&path), out);
            } else {
                out.push(path);
            }
        }
    }

    let mut keys = Vec::new();
    descend(table, None, &mut keys);
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Keys in a raw TOML document that no config field reads.
///
/// A document that does not parse yields nothing here; serde reports it.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<UnknownKey> {
    let Ok(table) = raw_toml.parse::<toml::Table>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    dotted_keys(&table)
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|field| UnknownKey {
            suggestion: suggest_correction(&field, &known),
            field,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Range checks on a parsed config. Every returned message is fatal.
pub fn validate_ranges(config: &super::SpectralConfig) -> Vec<String> {
    let mut errors = Vec::new();

    let inc = config.resampling.time_increment_ms;
    if !inc.is_finite() || inc <= 0.0 {
        errors.push(format!(
            "resampling.time_increment_ms = {inc} must be a positive number"
        ));
    } else if inc.fract() != 0.0 {
        // aligned grid timestamps are whole milliseconds
        errors.push(format!(
            "resampling.time_increment_ms = {inc} must be a whole number of ms"
        ));
    }

    let w = &config.welch;
    if !w.sample_spacing_ms.is_finite() || w.sample_spacing_ms <= 0.0 {
        errors.push(format!(
            "welch.sample_spacing_ms = {} must be a positive number (used as divisor)",
            w.sample_spacing_ms
        ));
    }
    if w.segment_count == 0 {
        errors.push("welch.segment_count must be >= 1 (used as divisor)".to_string());
    }
    // 100% overlap would make the segment step zero
    if !(0.0..100.0).contains(&w.overlap_percent) {
        errors.push(format!(
            "welch.overlap_percent = {:.1} must be in [0, 100)",
            w.overlap_percent
        ));
    }

    errors
}

// ============================================================================
// Tests
// ============================================================================
