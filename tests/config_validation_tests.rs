//! Config Validation Tests
//!
//! Typo detection on raw TOML and range validation on parsed configs,
//! exercised through the public config API.

use shm_spectra::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use shm_spectra::config::{ConfigError, SpectralConfig};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_welch_key_warns_with_suggestion() {
    let toml_str = r#"
[welch]
segmnt_count = 4
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "welch.segmnt_count");
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("welch.segment_count")
    );
}

#[test]
fn typo_in_section_name_warns() {
    let toml_str = r#"
[resampleing]
time_increment_ms = 10.0
"#;
    let warnings = validate_unknown_keys(toml_str);
    // both the section and its nested key are unknown
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .any(|w| w.suggestion.as_deref() == Some("resampling")));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[resampling]
time_increment_ms = 10.0

[welch]
sample_spacing_ms = 10.0
segment_count = 4
overlap_percent = 25.0

[aggregation]
parallel = false
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce 0 warnings, got: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
}

#[test]
fn unrelated_key_has_no_suggestion() {
    let warnings = validate_unknown_keys("[server]\naddr = \"0.0.0.0:9090\"\n");
    assert!(!warnings.is_empty());
    assert!(warnings.iter().all(|w| w.suggestion.is_none()));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn malformed_toml_is_left_to_the_parser() {
    assert!(validate_unknown_keys("[welch\nsegment_count = ").is_empty());
    assert!(matches!(
        SpectralConfig::from_toml_str("[welch\nsegment_count = "),
        Err(ConfigError::Parse(..))
    ));
}

#[test]
fn known_keys_set_is_complete() {
    // Every key emitted by the default config must be known
    let toml_str = SpectralConfig::default().to_toml().unwrap();
    let warnings = validate_unknown_keys(&toml_str);
    assert!(
        warnings.is_empty(),
        "Default config emits unknown keys: {:?}",
        warnings.iter().map(|w| &w.field).collect::<Vec<_>>()
    );
    assert!(known_config_keys().contains("welch.overlap_percent"));
}

#[test]
fn suggestion_respects_distance_limit() {
    let known = known_config_keys();
    assert_eq!(
        suggest_correction("aggregation.paralel", &known).as_deref(),
        Some("aggregation.parallel")
    );
    assert_eq!(suggest_correction("completely.different", &known), None);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn zero_segment_count_rejected() {
    let err = SpectralConfig::from_toml_str("[welch]\nsegment_count = 0\n").unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("segment_count"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn fractional_time_increment_rejected() {
    // half-millisecond steps would collapse onto duplicate aligned timestamps
    let err = SpectralConfig::from_toml_str("[resampling]\ntime_increment_ms = 0.5\n").unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("resampling.time_increment_ms"));
        }
        other => panic!("expected validation error, got {other}"),
    }

    let mut config = SpectralConfig::default();
    config.resampling.time_increment_ms = 0.5;
    assert!(shm_spectra::SpectralPipeline::new(&config).is_err());
}

#[test]
fn all_range_violations_reported_together() {
    let toml_str = r#"
[resampling]
time_increment_ms = 0.0

[welch]
sample_spacing_ms = -20.0
segment_count = 0
overlap_percent = 150.0
"#;
    let config: SpectralConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(validate_ranges(&config).len(), 4);
}

#[test]
fn partial_config_fills_defaults() {
    let config = SpectralConfig::from_toml_str("[welch]\nsegment_count = 5\n").unwrap();
    assert_eq!(config.welch.segment_count, 5);
    assert_eq!(config.welch.overlap_percent, 50.0);
    assert_eq!(config.resampling.time_increment_ms, 20.0);
    assert!(config.aggregation.parallel);
}

#[test]
fn config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spectral_config.toml");

    let mut config = SpectralConfig::default();
    config.welch.segment_count = 8;
    config.aggregation.parallel = false;
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = SpectralConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SpectralConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(..)));
}
