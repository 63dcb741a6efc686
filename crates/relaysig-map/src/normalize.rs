//! Signal name normalization and the approximate-equality test.
//!
//! Relay exports decorate the same quantity in many ways (`REL_IL1_MAG`,
//! `IL1-MAG`, `il1 mag`). Normalization reduces a name to upper-case
//! alphanumerics without manufacturer prefixes so that those spellings
//! compare equal.

use relaysig_model::{Component, Phase};
use serde::{Deserialize, Serialize};

/// Manufacturer prefixes removed by default, in the order they are tried.
pub const DEFAULT_PREFIXES: &[&str] = &["REL_", "DIG_", "ANA_", "BIN_", "CH_", "SIG_"];

const VOLTAGE_TOKENS: &[&str] = &[
    "VOLT", "V_", "_V", "VA", "VB", "VC", "UA", "UB", "UC", "TENSION",
];
const CURRENT_TOKENS: &[&str] = &[
    "CURR", "I_", "_I", "IA", "IB", "IC", "AMP", "CORR",
];

/// How many characters a matched prefix removes.
///
/// Prefixes are compared against the separator-free name, so `REL_` matches
/// a name starting with `REL`. `SeparatorFree` then removes exactly those
/// letters; `Full` removes as many characters as the prefix is long,
/// separator included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixTrim {
    #[default]
    SeparatorFree,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameNormalizer {
    prefixes: Vec<String>,
    trim: PrefixTrim,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIXES.iter().copied(), PrefixTrim::default())
    }
}

impl NameNormalizer {
    pub fn new<I, S>(prefixes: I, trim: PrefixTrim) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(|prefix| prefix.as_ref().trim().to_uppercase())
                .filter(|prefix| !prefix.is_empty())
                .collect(),
            trim,
        }
    }

    pub fn with_trim(mut self, trim: PrefixTrim) -> Self {
        self.trim = trim;
        self
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn trim(&self) -> PrefixTrim {
        self.trim
    }

    /// Upper-cases, drops separators, then strips each matching prefix in order.
    pub fn normalize(&self, name: &str) -> String {
        let mut normalized: String = name
            .to_uppercase()
            .chars()
            .filter(|ch| !is_separator(*ch))
            .collect();
        for prefix in &self.prefixes {
            let bare: String = prefix.chars().filter(|ch| !is_separator(*ch)).collect();
            if bare.is_empty() || !normalized.starts_with(&bare) {
                continue;
            }
            let strip = match self.trim {
                PrefixTrim::SeparatorFree => bare.chars().count(),
                PrefixTrim::Full => prefix.chars().count(),
            };
            normalized = normalized.chars().skip(strip).collect();
        }
        normalized
    }

    /// Approximate equality of two signal names.
    ///
    /// Names match when their normalized forms are equal or one contains the
    /// other, or when both carry the same phase and the same voltage/current
    /// marker. A name that normalizes to nothing never matches.
    pub fn fuzzy_match(&self, left: &str, right: &str) -> bool {
        let left = self.normalize(left);
        let right = self.normalize(right);
        if left.is_empty() || right.is_empty() {
            return false;
        }
        if left.contains(&right) || right.contains(&left) {
            return true;
        }
        match (
            extract_phase(&left),
            extract_phase(&right),
            extract_component(&left),
            extract_component(&right),
        ) {
            (Some(left_phase), Some(right_phase), Some(left_kind), Some(right_kind)) => {
                left_phase == right_phase && left_kind == right_kind
            }
            _ => false,
        }
    }
}

fn is_separator(ch: char) -> bool {
    matches!(ch, '_' | '-' | '.') || ch.is_whitespace()
}

/// Phase letter implied by a signal name.
pub fn extract_phase(name: &str) -> Option<Phase> {
    let upper = name.to_uppercase();
    for (phase, letter) in [(Phase::A, 'A'), (Phase::B, 'B'), (Phase::C, 'C')] {
        if upper.ends_with(letter)
            || upper.contains(&format!("PH{letter}"))
            || upper.contains(&format!("_{letter}"))
        {
            return Some(phase);
        }
    }
    let tail: String = upper
        .chars()
        .rev()
        .take(2)
        .collect();
    if tail.contains('N') || upper.contains("NEUT") {
        return Some(Phase::N);
    }
    None
}

/// Voltage or current marker implied by a signal name.
pub fn extract_component(name: &str) -> Option<Component> {
    let upper = name.to_uppercase();
    if VOLTAGE_TOKENS.iter().any(|token| upper.contains(token)) {
        Some(Component::Voltage)
    } else if CURRENT_TOKENS.iter().any(|token| upper.contains(token)) {
        Some(Component::Current)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_separators_are_removed() {
        let normalizer = NameNormalizer::default();
        assert_eq!(normalizer.normalize("REL_IL1_MAG"), "IL1MAG");
        assert_eq!(normalizer.normalize("IL1MAG"), "IL1MAG");
        assert_eq!(normalizer.normalize("il1-mag"), "IL1MAG");
        assert_eq!(normalizer.normalize("ch 1.va"), "1VA");
    }

    #[test]
    fn full_trim_also_consumes_separator_length() {
        let normalizer = NameNormalizer::default().with_trim(PrefixTrim::Full);
        assert_eq!(normalizer.normalize("REL_IL1_MAG"), "L1MAG");
    }

    #[test]
    fn prefixes_are_tried_in_order() {
        let normalizer = NameNormalizer::default();
        assert_eq!(normalizer.normalize("REL_SIG_TRIP"), "TRIP");
        assert_eq!(normalizer.normalize("SIG_REL_TRIP"), "RELTRIP");
    }

    #[test]
    fn phase_and_component_markers() {
        assert_eq!(extract_phase("VA"), Some(Phase::A));
        assert_eq!(extract_phase("U_PHB_MAG"), Some(Phase::B));
        assert_eq!(extract_phase("IN"), Some(Phase::N));
        assert_eq!(extract_phase("FREQ"), None);
        assert_eq!(extract_component("VOLT_L1"), Some(Component::Voltage));
        assert_eq!(extract_component("CURR_L1"), Some(Component::Current));
        assert_eq!(extract_component("FREQ"), None);
    }

    #[test]
    fn fuzzy_match_rules() {
        let normalizer = NameNormalizer::default();
        assert!(normalizer.fuzzy_match("REL_IL1_MAG", "il1mag"));
        assert!(normalizer.fuzzy_match("IA", "IA_RMS"));
        assert!(normalizer.fuzzy_match("CURR_PHA", "IA"));
        assert!(!normalizer.fuzzy_match("VA", "IA"));
        assert!(!normalizer.fuzzy_match("REL_", "IA"));
        assert!(!normalizer.fuzzy_match("", ""));
    }
}
