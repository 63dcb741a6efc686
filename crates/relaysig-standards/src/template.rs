//! Built-in COMTRADE standard signal names.

use relaysig_model::{Phase, SignalKind};

use crate::catalog::{SignalCategory, StandardCatalog, StandardSignal};

/// `(name, phase, unit, description)`
const ANALOG_SIGNALS: &[(&str, &str, &str, &str)] = &[
    ("IA", "A", "A", "Phase A current"),
    ("IB", "B", "A", "Phase B current"),
    ("IC", "C", "A", "Phase C current"),
    ("IN", "N", "A", "Neutral current"),
    ("I0", "", "A", "Zero-sequence current"),
    ("I1", "", "A", "Positive-sequence current"),
    ("I2", "", "A", "Negative-sequence current"),
    ("VA", "A", "kV", "Phase A voltage"),
    ("VB", "B", "kV", "Phase B voltage"),
    ("VC", "C", "kV", "Phase C voltage"),
    ("VN", "N", "kV", "Neutral voltage"),
    ("V0", "", "kV", "Zero-sequence voltage"),
    ("V1", "", "kV", "Positive-sequence voltage"),
    ("V2", "", "kV", "Negative-sequence voltage"),
    ("P", "", "MW", "Active power"),
    ("Q", "", "MVAR", "Reactive power"),
    ("F", "", "Hz", "Frequency"),
];

/// `(name, description)`
const DIGITAL_SIGNALS: &[(&str, &str)] = &[
    ("TRIP", "General trip"),
    ("TRIP_A", "Phase A trip"),
    ("TRIP_B", "Phase B trip"),
    ("TRIP_C", "Phase C trip"),
    ("CLOSE", "Close command"),
    ("RECLOSE", "Automatic reclose"),
    ("21_PICKUP", "Distance protection pickup"),
    ("21_Z1", "Distance zone 1"),
    ("21_Z2", "Distance zone 2"),
    ("21_Z3", "Distance zone 3"),
    ("50_PICKUP", "Instantaneous overcurrent pickup"),
    ("51_PICKUP", "Time overcurrent pickup"),
    ("67_FWD", "Directional forward"),
    ("67_REV", "Directional reverse"),
    ("59_PICKUP", "Overvoltage pickup"),
    ("27_PICKUP", "Undervoltage pickup"),
    ("81_PICKUP", "Frequency pickup"),
    ("87_OPERATE", "Differential operate"),
    ("CB_OPEN", "Breaker open"),
    ("CB_CLOSE", "Breaker closed"),
    ("ALARM", "General alarm"),
    ("COMM_FAIL", "Communication failure"),
];

/// The model-independent COMTRADE naming template.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComtradeTemplate;

impl ComtradeTemplate {
    pub fn analog() -> Vec<StandardSignal> {
        ANALOG_SIGNALS
            .iter()
            .map(|&(name, phase, unit, description)| {
                let mut signal = StandardSignal::new(name, SignalKind::Analog);
                signal.description = description.to_string();
                signal.phase = Phase::from_code(phase);
                signal.unit = Some(unit.to_string());
                signal.group = SignalCategory::of(name, SignalKind::Analog).label().to_string();
                signal
            })
            .collect()
    }

    pub fn digital() -> Vec<StandardSignal> {
        DIGITAL_SIGNALS
            .iter()
            .map(|&(name, description)| {
                let mut signal = StandardSignal::new(name, SignalKind::Binary);
                signal.description = description.to_string();
                signal.group = SignalCategory::of(name, SignalKind::Binary).label().to_string();
                signal
            })
            .collect()
    }

    /// Every template name, analog first.
    pub fn all_names() -> Vec<&'static str> {
        ANALOG_SIGNALS
            .iter()
            .map(|entry| entry.0)
            .chain(DIGITAL_SIGNALS.iter().map(|entry| entry.0))
            .collect()
    }

    /// Template signals grouped by category, in [`SignalCategory::ALL`] order.
    pub fn by_category() -> Vec<(SignalCategory, Vec<StandardSignal>)> {
        let signals: Vec<StandardSignal> =
            Self::analog().into_iter().chain(Self::digital()).collect();
        SignalCategory::ALL
            .iter()
            .map(|&category| {
                let members = signals
                    .iter()
                    .filter(|signal| SignalCategory::of(&signal.name, signal.kind) == category)
                    .cloned()
                    .collect();
                (category, members)
            })
            .collect()
    }
}

impl StandardCatalog for ComtradeTemplate {
    fn signals(&self, kind: SignalKind) -> Vec<StandardSignal> {
        match kind {
            SignalKind::Analog => Self::analog(),
            SignalKind::Binary => Self::digital(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_sizes() {
        assert_eq!(ComtradeTemplate::analog().len(), 17);
        assert_eq!(ComtradeTemplate::digital().len(), 22);
        assert_eq!(ComtradeTemplate::all_names().len(), 39);
    }

    #[test]
    fn categories_partition_the_template() {
        let groups = ComtradeTemplate::by_category();
        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, 39);

        let names = |category: SignalCategory| -> Vec<String> {
            groups
                .iter()
                .find(|(c, _)| *c == category)
                .map(|(_, members)| members.iter().map(|s| s.name.clone()).collect())
                .unwrap_or_default()
        };
        assert_eq!(names(SignalCategory::PowerAndFrequency), ["P", "Q", "F"]);
        assert!(names(SignalCategory::Protection).contains(&"TRIP_A".to_string()));
        assert!(names(SignalCategory::Control).contains(&"CB_OPEN".to_string()));
        assert_eq!(names(SignalCategory::Supervision), ["ALARM", "COMM_FAIL"]);
    }

    #[test]
    fn analog_template_carries_phase_and_unit() {
        let ia = &ComtradeTemplate::analog()[0];
        assert_eq!(ia.phase, Some(Phase::A));
        assert_eq!(ia.unit.as_deref(), Some("A"));
        assert_eq!(ComtradeTemplate::analog()[4].phase, None);
    }
}
