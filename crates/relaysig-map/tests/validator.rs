//! Tests for the tiered signal validator.

use std::collections::BTreeMap;

use relaysig_map::{AliasStore, SignalValidator};
use relaysig_model::{
    AliasEntry, AnalogSignal, BinarySignal, ComtradeChannel, ComtradeConfig, MatchTier,
    RelayReference, SignalKind, XrioData,
};
use relaysig_standards::{CatalogFile, ComtradeTemplate, StandardCatalog, StandardSignal};

struct EmptyCatalog;

impl StandardCatalog for EmptyCatalog {
    fn signals(&self, _kind: SignalKind) -> Vec<StandardSignal> {
        Vec::new()
    }
}

fn config_with(analog: &[&str], digital: &[&str]) -> ComtradeConfig {
    let mut channels = Vec::new();
    for (position, name) in analog.iter().enumerate() {
        let mut channel = ComtradeChannel::analog(position as u32 + 1);
        channel.name = (*name).to_string();
        channels.push(channel);
    }
    for (position, name) in digital.iter().enumerate() {
        let mut channel = ComtradeChannel::digital(position as u32 + 1);
        channel.name = (*name).to_string();
        channels.push(channel);
    }
    ComtradeConfig {
        num_analog: analog.len(),
        num_digital: digital.len(),
        channels,
        ..ComtradeConfig::default()
    }
}

#[test]
fn exact_catalog_name_is_learned_as_validated_alias() {
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let result = SignalValidator::new(&mut store, &catalog)
        .validate_signal("IA", "REL670", SignalKind::Analog, None)
        .expect("validate");

    assert_eq!(result.tier, MatchTier::Exact);
    assert_eq!(result.standard_name, "IA");
    assert_eq!(result.confidence, 1.0);

    let alias = store.get("REL670", "IA").expect("alias recorded");
    assert!(alias.auto_detected);
    assert!(alias.validated);
}

#[test]
fn exact_match_ignores_case() {
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let result = SignalValidator::new(&mut store, &catalog)
        .validate_signal("cb_open", "REL670", SignalKind::Binary, None)
        .expect("validate");

    assert_eq!(result.tier, MatchTier::Exact);
    assert_eq!(result.standard_name, "CB_OPEN");
}

#[test]
fn exact_match_spans_both_kinds() {
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let mut validator = SignalValidator::new(&mut store, &catalog);

    let binary = validator
        .validate_signal("IA", "REL670", SignalKind::Binary, None)
        .expect("validate");
    assert_eq!(binary.tier, MatchTier::Exact);
    assert_eq!(binary.standard_name, "IA");
    assert_eq!(binary.kind, SignalKind::Binary);

    let analog = validator
        .validate_signal("TRIP", "REL670", SignalKind::Analog, None)
        .expect("validate");
    assert_eq!(analog.tier, MatchTier::Exact);
    assert_eq!(analog.standard_name, "TRIP");
    assert_eq!(analog.confidence, 1.0);

    drop(validator);
    assert_eq!(store.get("REL670", "IA").unwrap().signal_type, SignalKind::Binary);
    assert_eq!(store.get("REL670", "TRIP").unwrap().signal_type, SignalKind::Analog);
}

#[test]
fn extraction_resolves_names_of_the_other_kind_exactly() {
    let data = XrioData {
        relay: RelayReference {
            model: Some("REL670".to_string()),
            ..RelayReference::default()
        },
        analog_signals: vec![AnalogSignal::new(1, "TRIP", "A1RADR")],
        binary_signals: vec![BinarySignal::new(1, "IA", "B1RBDR")],
        ..XrioData::default()
    };
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let summary = SignalValidator::new(&mut store, &catalog)
        .summarize(&data, None)
        .expect("summarize");

    assert_eq!(summary.exact, 2);
    assert_eq!(summary.results[0].standard_name, "TRIP");
    assert_eq!(summary.results[1].standard_name, "IA");
}

#[test]
fn model_catalog_names_feed_the_cascade() {
    let mut blocks = BTreeMap::new();
    blocks.insert(
        "A1RADR".to_string(),
        vec![StandardSignal::new("UL1_RMS", SignalKind::Analog)],
    );
    blocks.insert(
        "B1RBDR".to_string(),
        vec![StandardSignal::new("ZONE1_START", SignalKind::Binary)],
    );
    let mut catalog = CatalogFile::new();
    catalog.set_model_catalog("REL670", &blocks);

    let mut store = AliasStore::in_memory();
    let mut validator = SignalValidator::new(&mut store, &catalog);

    let own = validator
        .validate_signal("ul1_rms", "rel670", SignalKind::Analog, None)
        .expect("validate");
    assert_eq!(own.tier, MatchTier::Exact);
    assert_eq!(own.standard_name, "UL1_RMS");

    let other_model = validator
        .validate_signal("ZONE1_START", "RED670", SignalKind::Binary, None)
        .expect("validate");
    assert_ne!(other_model.tier, MatchTier::Exact);

    let crossed = validator
        .validate_signal("ZONE1_START", "REL670", SignalKind::Analog, None)
        .expect("validate");
    assert_eq!(crossed.tier, MatchTier::Exact);
    assert_eq!(crossed.standard_name, "ZONE1_START");

    let suggestions = validator.suggest("ZONE1_STRT", "REL670", SignalKind::Binary, 1);
    assert_eq!(suggestions[0].standard_name, "ZONE1_START");
}

#[test]
fn unknown_name_is_new_and_leaves_store_untouched() {
    let mut store = AliasStore::in_memory();
    for catalog in [&EmptyCatalog as &dyn StandardCatalog, &ComtradeTemplate] {
        let result = SignalValidator::new(&mut store, catalog)
            .validate_signal("XYZ123", "REL670", SignalKind::Analog, None)
            .expect("validate");
        assert_eq!(result.tier, MatchTier::New);
        assert_eq!(result.confidence, 0.0);
        assert!(result.standard_name.is_empty());
    }
    assert!(store.is_empty());
}

#[test]
fn exact_tier_wins_over_stored_alias() {
    let mut store = AliasStore::in_memory();
    store
        .add(AliasEntry::new("REL670", "IA", "IB", SignalKind::Analog))
        .expect("seed");
    let catalog = ComtradeTemplate;
    let result = SignalValidator::new(&mut store, &catalog)
        .validate_signal("IA", "REL670", SignalKind::Analog, None)
        .expect("validate");

    assert_eq!(result.tier, MatchTier::Exact);
    assert_eq!(store.get("REL670", "IA").unwrap().standard_name, "IA");
}

#[test]
fn alias_for_current_model() {
    let mut store = AliasStore::in_memory();
    store
        .add(AliasEntry::new("REL670", "IL1", "IA", SignalKind::Analog))
        .expect("seed");
    let catalog = ComtradeTemplate;
    let result = SignalValidator::new(&mut store, &catalog)
        .validate_signal("IL1", "REL670", SignalKind::Analog, None)
        .expect("validate");

    assert_eq!(result.tier, MatchTier::Alias);
    assert_eq!(result.standard_name, "IA");
    assert_eq!(result.confidence, 0.95);
    assert_eq!(store.len(), 1);
}

#[test]
fn alias_from_other_model_is_copied_to_current_model() {
    let mut store = AliasStore::in_memory();
    store
        .add(AliasEntry::new("RED670", "IL1", "IA", SignalKind::Analog))
        .expect("seed");
    let catalog = ComtradeTemplate;
    let result = SignalValidator::new(&mut store, &catalog)
        .validate_signal("IL1", "REL670", SignalKind::Analog, None)
        .expect("validate");

    assert_eq!(result.tier, MatchTier::Alias);
    assert_eq!(result.standard_name, "IA");

    let learned = store.get("REL670", "IL1").expect("alias copied");
    assert_eq!(learned.standard_name, "IA");
    assert!(learned.auto_detected);
    assert!(!learned.validated);
}

#[test]
fn comtrade_channel_resolves_before_heuristics() {
    let config = config_with(&["IL1MAG"], &["TRIP_OUT"]);
    let catalog = ComtradeTemplate;

    let mut store = AliasStore::in_memory();
    let without = SignalValidator::new(&mut store, &catalog)
        .validate_signal("REL_IL1_MAG", "REL670", SignalKind::Analog, None)
        .expect("validate");
    assert_eq!(without.tier, MatchTier::New);

    let with = SignalValidator::new(&mut store, &catalog)
        .validate_signal("REL_IL1_MAG", "REL670", SignalKind::Analog, Some(&config))
        .expect("validate");
    assert_eq!(with.tier, MatchTier::Fuzzy);
    assert_eq!(with.standard_name, "IL1MAG");
    assert_eq!(with.confidence, 0.7);

    let learned = store.get("REL670", "REL_IL1_MAG").expect("alias recorded");
    assert!(learned.auto_detected);
    assert!(!learned.validated);

    let again = SignalValidator::new(&mut store, &catalog)
        .validate_signal("REL_IL1_MAG", "REL670", SignalKind::Analog, Some(&config))
        .expect("validate");
    assert_eq!(again.tier, MatchTier::Alias);
}

#[test]
fn comtrade_channels_are_matched_by_kind() {
    let config = config_with(&["TRIP_OUT"], &[]);
    let mut store = AliasStore::in_memory();
    let result = SignalValidator::new(&mut store, &EmptyCatalog)
        .validate_signal("TRIP_OUT", "REL670", SignalKind::Binary, Some(&config))
        .expect("validate");
    assert_eq!(result.tier, MatchTier::New);
}

#[test]
fn heuristic_match_is_fuzzy_without_write() {
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let mut validator = SignalValidator::new(&mut store, &catalog);

    let analog = validator
        .validate_signal("CURR_PHA", "REL670", SignalKind::Analog, None)
        .expect("validate");
    assert_eq!(analog.tier, MatchTier::Fuzzy);
    assert_eq!(analog.standard_name, "IA");
    assert_eq!(analog.confidence, 0.5);

    let binary = validator
        .validate_signal("TRIP_L1_OUT", "REL670", SignalKind::Binary, None)
        .expect("validate");
    assert_eq!(binary.tier, MatchTier::Fuzzy);
    assert_eq!(binary.standard_name, "TRIP");

    drop(validator);
    assert!(store.is_empty());
}

#[test]
fn summarize_counts_tiers() {
    let data = XrioData {
        relay: RelayReference {
            model: Some("REC670".to_string()),
            ..RelayReference::default()
        },
        analog_signals: vec![
            AnalogSignal::new(1, "IA", "A1RADR"),
            AnalogSignal::new(2, "XYZ123", "A1RADR"),
        ],
        binary_signals: vec![BinarySignal::new(1, "CB_OPEN", "B1RBDR")],
        ..XrioData::default()
    };
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let summary = SignalValidator::new(&mut store, &catalog)
        .summarize(&data, None)
        .expect("summarize");

    assert_eq!(summary.total, 3);
    assert_eq!(summary.exact, 2);
    assert_eq!(summary.new, 1);
    assert_eq!(summary.results[1].source_name, "XYZ123");
    assert!((summary.match_rate() - 2.0 / 3.0).abs() < 1e-9);
    assert!(store.get("REC670", "CB_OPEN").is_some());
}

#[test]
fn missing_model_is_recorded_as_unknown() {
    let data = XrioData {
        analog_signals: vec![AnalogSignal::new(1, "VA", "A1RADR")],
        ..XrioData::default()
    };
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    SignalValidator::new(&mut store, &catalog)
        .validate(&data, None)
        .expect("validate");
    assert!(store.get("UNKNOWN", "VA").is_some());
}

#[test]
fn suggestions_are_ranked_and_never_written() {
    let mut store = AliasStore::in_memory();
    let catalog = ComtradeTemplate;
    let validator = SignalValidator::new(&mut store, &catalog);

    let suggestions = validator.suggest("VOLT_A", "REL670", SignalKind::Analog, 3);
    assert_eq!(suggestions.len(), 3);
    assert!(
        suggestions
            .windows(2)
            .all(|pair| pair[0].score >= pair[1].score)
    );
    assert!(validator.suggest("REL_", "REL670", SignalKind::Analog, 3).is_empty());

    drop(validator);
    assert!(store.is_empty());
}
