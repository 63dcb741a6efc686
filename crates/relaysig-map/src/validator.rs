//! Tiered resolution of relay signal names to standard names.
//!
//! Each name walks the cascade below and stops at the first hit:
//!
//! | tier      | source                                   | confidence |
//! |-----------|------------------------------------------|------------|
//! | exact     | any catalog name, case-insensitive       | 1.0        |
//! | alias     | alias store, current model then any      | 0.95       |
//! | fuzzy     | channel of the loaded COMTRADE config    | 0.7        |
//! | fuzzy     | catalog heuristic                        | 0.5        |
//! | new       | nothing                                  | 0.0        |
//!
//! The exact tier compares against every catalog name, analog and binary
//! alike; the COMTRADE and heuristic tiers only consider the signal's kind.
//! Catalog, alias-fallback and COMTRADE hits are written back to the alias
//! store so the next run resolves them at the alias tier.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler;
use relaysig_model::{
    AliasEntry, ComtradeConfig, MatchTier, SignalKind, ValidationResult, ValidationSummary,
    XrioData, classify_signal_function,
};
use relaysig_standards::{StandardCatalog, StandardSignal};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::normalize::{NameNormalizer, extract_component, extract_phase};
use crate::store::AliasStore;

pub const EXACT_CONFIDENCE: f32 = 1.0;
pub const ALIAS_CONFIDENCE: f32 = 0.95;
pub const COMTRADE_CONFIDENCE: f32 = 0.7;
pub const HEURISTIC_CONFIDENCE: f32 = 0.5;

/// Candidate standard name for an unresolved signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub standard_name: String,
    /// Jaro-Winkler similarity of the normalized names (0.0 to 1.0).
    pub score: f64,
}

pub struct SignalValidator<'a> {
    store: &'a mut AliasStore,
    catalog: &'a dyn StandardCatalog,
    normalizer: NameNormalizer,
}

impl<'a> SignalValidator<'a> {
    pub fn new(store: &'a mut AliasStore, catalog: &'a dyn StandardCatalog) -> Self {
        Self {
            store,
            catalog,
            normalizer: NameNormalizer::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: NameNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Resolves every analog and binary signal of an extraction, in document order.
    pub fn validate(
        &mut self,
        data: &XrioData,
        config: Option<&ComtradeConfig>,
    ) -> Result<Vec<ValidationResult>> {
        let model = data.relay.model_key();
        let analog = self.candidates(model, SignalKind::Analog);
        let binary = self.candidates(model, SignalKind::Binary);
        let every: Vec<StandardSignal> = analog.iter().chain(&binary).cloned().collect();

        let mut results = Vec::with_capacity(data.total_signals());
        for signal in &data.analog_signals {
            let pools = Pools { every: &every, of_kind: &analog };
            results.push(self.resolve(&signal.name, model, SignalKind::Analog, pools, config)?);
        }
        for signal in &data.binary_signals {
            let pools = Pools { every: &every, of_kind: &binary };
            results.push(self.resolve(&signal.name, model, SignalKind::Binary, pools, config)?);
        }
        Ok(results)
    }

    /// Resolves a single name for `model`.
    pub fn validate_signal(
        &mut self,
        name: &str,
        model: &str,
        kind: SignalKind,
        config: Option<&ComtradeConfig>,
    ) -> Result<ValidationResult> {
        let of_kind = self.candidates(model, kind);
        let every = self.all_candidates(model);
        let pools = Pools { every: &every, of_kind: &of_kind };
        self.resolve(name, model, kind, pools, config)
    }

    /// Validates an extraction and tallies the outcome per tier.
    pub fn summarize(
        &mut self,
        data: &XrioData,
        config: Option<&ComtradeConfig>,
    ) -> Result<ValidationSummary> {
        let summary = ValidationSummary::from_results(self.validate(data, config)?);
        info!(
            model = data.relay.model_key(),
            total = summary.total,
            exact = summary.exact,
            alias = summary.alias,
            fuzzy = summary.fuzzy,
            new = summary.new,
            "validation finished"
        );
        Ok(summary)
    }

    /// Ranks catalog names by similarity to `name`, best first.
    pub fn suggest(
        &self,
        name: &str,
        model: &str,
        kind: SignalKind,
        limit: usize,
    ) -> Vec<Suggestion> {
        let normalized = self.normalizer.normalize(name);
        if normalized.is_empty() || limit == 0 {
            return Vec::new();
        }
        let mut seen = BTreeSet::new();
        let mut suggestions: Vec<Suggestion> = self
            .candidates(model, kind)
            .into_iter()
            .filter(|candidate| seen.insert(candidate.name.to_uppercase()))
            .map(|candidate| {
                let score = jaro_winkler::similarity(
                    normalized.chars(),
                    self.normalizer.normalize(&candidate.name).chars(),
                );
                Suggestion {
                    standard_name: candidate.name,
                    score,
                }
            })
            .collect();
        suggestions.sort_by(|left, right| {
            right
                .score
                .partial_cmp(&left.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| left.standard_name.cmp(&right.standard_name))
        });
        suggestions.truncate(limit);
        suggestions
    }

    fn candidates(&self, model: &str, kind: SignalKind) -> Vec<StandardSignal> {
        let mut candidates = self.catalog.signals(kind);
        candidates.extend(self.catalog.model_signals(model, kind));
        candidates
    }

    fn all_candidates(&self, model: &str) -> Vec<StandardSignal> {
        let mut every = self.candidates(model, SignalKind::Analog);
        every.extend(self.candidates(model, SignalKind::Binary));
        every
    }

    fn resolve(
        &mut self,
        name: &str,
        model: &str,
        kind: SignalKind,
        pools: Pools<'_>,
        config: Option<&ComtradeConfig>,
    ) -> Result<ValidationResult> {
        let result = self.cascade(name, model, kind, pools, config)?;
        debug!(
            name,
            model,
            tier = %result.tier,
            standard = %result.standard_name,
            "signal resolved"
        );
        Ok(result)
    }

    fn cascade(
        &mut self,
        name: &str,
        model: &str,
        kind: SignalKind,
        pools: Pools<'_>,
        config: Option<&ComtradeConfig>,
    ) -> Result<ValidationResult> {
        if let Some(standard) = pools
            .every
            .iter()
            .find(|candidate| candidate.name.eq_ignore_ascii_case(name))
        {
            let standard = standard.name.clone();
            self.learn(model, name, &standard, kind, true)?;
            let rationale = format!("exact match with standard name {standard}");
            return Ok(outcome(name, standard, kind, MatchTier::Exact, EXACT_CONFIDENCE, rationale));
        }

        if let Some(entry) = self
            .store
            .get(model, name)
            .filter(|entry| !entry.standard_name.is_empty())
        {
            let standard = entry.standard_name.clone();
            let rationale = format!("known alias for {model}: {name} -> {standard}");
            return Ok(outcome(name, standard, kind, MatchTier::Alias, ALIAS_CONFIDENCE, rationale));
        }

        if let Some((origin, standard)) = self
            .store
            .find_by_name(name)
            .into_iter()
            .find(|entry| !entry.standard_name.is_empty())
            .map(|entry| (entry.relay_model.clone(), entry.standard_name.clone()))
        {
            self.learn(model, name, &standard, kind, false)?;
            let rationale = format!("alias learned from {origin}: {name} -> {standard}");
            return Ok(outcome(name, standard, kind, MatchTier::Alias, ALIAS_CONFIDENCE, rationale));
        }

        if let Some(channel) = config.and_then(|config| {
            config
                .channels_of(kind)
                .find(|channel| self.normalizer.fuzzy_match(name, &channel.name))
        }) {
            let standard = channel.name.clone();
            self.learn(model, name, &standard, kind, false)?;
            let rationale = format!("approximate match with COMTRADE channel {standard}");
            return Ok(outcome(
                name,
                standard,
                kind,
                MatchTier::Fuzzy,
                COMTRADE_CONFIDENCE,
                rationale,
            ));
        }

        if let Some(standard) = self.heuristic(name, kind, pools.of_kind) {
            let rationale = format!("heuristic match with standard name {standard}");
            return Ok(outcome(
                name,
                standard,
                kind,
                MatchTier::Fuzzy,
                HEURISTIC_CONFIDENCE,
                rationale,
            ));
        }

        Ok(outcome(
            name,
            String::new(),
            kind,
            MatchTier::New,
            0.0,
            "no match; needs manual mapping".to_string(),
        ))
    }

    /// Containment of normalized names, or for analog signals a catalog name
    /// carrying both the phase and the voltage/current letter of `name`.
    fn heuristic(
        &self,
        name: &str,
        kind: SignalKind,
        candidates: &[StandardSignal],
    ) -> Option<String> {
        let normalized = self.normalizer.normalize(name);
        if normalized.is_empty() {
            return None;
        }
        let markers = match kind {
            SignalKind::Analog => extract_phase(&normalized).zip(extract_component(&normalized)),
            SignalKind::Binary => None,
        };
        candidates
            .iter()
            .find(|candidate| {
                let standard = self.normalizer.normalize(&candidate.name);
                if !standard.is_empty()
                    && (normalized.contains(&standard) || standard.contains(&normalized))
                {
                    return true;
                }
                markers.is_some_and(|(phase, component)| {
                    let upper = candidate.name.to_uppercase();
                    upper.contains(component.as_str()) && upper.contains(phase.as_str())
                })
            })
            .map(|candidate| candidate.name.clone())
    }

    /// Records `name -> standard` under `model` unless the store already holds
    /// the identical entry.
    fn learn(
        &mut self,
        model: &str,
        name: &str,
        standard: &str,
        kind: SignalKind,
        validated: bool,
    ) -> Result<()> {
        let mut entry = AliasEntry::new(model, name, standard, kind);
        entry.function = classify_signal_function(name).as_str().to_string();
        entry.auto_detected = true;
        entry.validated = validated;
        if self.store.get(model, name) == Some(&entry) {
            return Ok(());
        }
        self.store.add(entry)?;
        Ok(())
    }
}

/// Catalog names consulted by the cascade: all kinds for the exact tier, the
/// signal's own kind for the approximate tiers.
#[derive(Clone, Copy)]
struct Pools<'c> {
    every: &'c [StandardSignal],
    of_kind: &'c [StandardSignal],
}

fn outcome(
    name: &str,
    standard_name: String,
    kind: SignalKind,
    tier: MatchTier,
    confidence: f32,
    rationale: String,
) -> ValidationResult {
    ValidationResult {
        source_name: name.to_string(),
        standard_name,
        kind,
        tier,
        confidence,
        rationale,
    }
}
