//! Analog (`AxRADR`) and binary (`BxRBDR`) block discovery and signal extraction.
//!
//! Vendors encode channels in several incompatible ways, so every block is run
//! through an ordered list of strategies and the first one that recognizes at
//! least one signal wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use relaysig_model::{
    AnalogSignal, BinarySignal, Component, Phase, SignalKind, classify_signal_function,
};
use tracing::debug;

use crate::access::{Accessor, field_accessors, first_value, parameter_value};
use crate::context::ExtractContext;
use crate::tree::XmlNode;

static ANALOG_BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^A\d*RADR$").expect("Invalid analog block regex"));
static BINARY_BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^B\d*RBDR$").expect("Invalid binary block regex"));
static ANALOG_BLOCK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)A\d*RADR").expect("Invalid analog token regex"));
static BINARY_BLOCK_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)B\d*RBDR").expect("Invalid binary token regex"));
static INDEX_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+$").expect("Invalid index suffix regex"));

/// Names that are configuration fields rather than signals, compared after
/// upper-casing and replacing `_` with a space.
const METADATA_EXACT: &[&str] = &[
    "ID",
    "NAME",
    "UNIT",
    "PHASE",
    "TYPE",
    "SERIAL",
    "MODEL",
    "LOCATION",
    "USER",
    "DESCRIPTION",
    "COMMENT",
];
const METADATA_SUBSTRINGS: &[&str] = &[
    "MANUFACTURER",
    "STATION",
    "DEVICE",
    "PROTECTED OBJECT",
    "RESIDUAL FACTOR",
    "SAMPLE RATE",
    "SAMPLERATE",
    "FREQUENCY",
    "DATE",
    "TIME",
    "VERSION",
    "REVISION",
    "RECORDER",
    "TRIGGER",
    "HEADER",
    "SETTING",
    "LENGTH",
    "DURATION",
    "PREFAULT",
    "POSTFAULT",
    "HARDWARE",
    "LINE FREQ",
    "IED NAME",
    "SHORT NAME",
    "LONG NAME",
];

const NAME_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("ShortName"),
    Accessor::Attr("shortName"),
    Accessor::Attr("name"),
    Accessor::Attr("Name"),
    Accessor::Attr("id"),
    Accessor::Child("ShortName"),
    Accessor::Child("Name"),
    Accessor::Child("name"),
];
const DESCRIPTION_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("UserText"),
    Accessor::Attr("Description"),
    Accessor::Attr("LongName"),
    Accessor::Child("UserText"),
    Accessor::Child("Description"),
    Accessor::Child("LongName"),
];
const UNIT_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("unit"),
    Accessor::Attr("Unit"),
    Accessor::Child("Unit"),
    Accessor::Child("unit"),
];
const PHASE_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("phase"),
    Accessor::Attr("Phase"),
    Accessor::Child("Phase"),
];
const STATE_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("state"),
    Accessor::Attr("normalState"),
    Accessor::Attr("NormalState"),
];
const SCALING_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("primary"),
    Accessor::Attr("Primary"),
    Accessor::Attr("multiplier"),
    Accessor::Attr("Multiplier"),
];
const LAX_NAME_ACCESSORS: &[Accessor] = &[
    Accessor::Attr("name"),
    Accessor::Attr("Name"),
    Accessor::Attr("id"),
];

const ANALOG_CHANNEL_TAGS: &[&str] = &["channel", "signal", "analogchannel", "analogsignal"];
const ANALOG_IO_KEYWORDS: &[&str] = &["input", "output", "ainput", "aoutput", "analog"];
const ANALOG_LAX_SKIP: &[&str] = &["setting", "param", "header", "info", "config"];
const BINARY_CHANNEL_TAGS: &[&str] = &[
    "channel",
    "signal",
    "binarychannel",
    "binarysignal",
    "status",
    "digital",
];
const BINARY_IO_KEYWORDS: &[&str] = &["input", "output", "binary", "digital"];
const BINARY_LAX_SKIP: &[&str] = &["setting", "param", "header"];

type Strategy<T> = fn(&Block<'_>) -> Vec<T>;

const ANALOG_STRATEGIES: &[(&str, Strategy<AnalogSignal>)] = &[
    ("channel elements", analog_channel_elements),
    ("input/output elements", analog_io_elements),
    ("indexed parameters", analog_indexed_parameters),
    ("scaling attributes", analog_scaling_attributes),
];

const BINARY_STRATEGIES: &[(&str, Strategy<BinarySignal>)] = &[
    ("channel elements", binary_channel_elements),
    ("input/output elements", binary_io_elements),
    ("indexed parameters", binary_indexed_parameters),
    ("name or state attributes", binary_state_attributes),
];

/// A recognized data-record block.
#[derive(Debug, Clone)]
pub(crate) struct Block<'d> {
    /// Upper-cased block identifier such as `A1RADR`.
    pub name: String,
    pub kind: SignalKind,
    pub node: &'d XmlNode,
}

/// Identifies `node` as an analog or binary block.
///
/// Either the tag itself is the identifier (`<A1RADR>`) or the element is a
/// `Block` whose `Name` child carries it (`<Name>A1RADR: 1</Name>`).
pub(crate) fn block_identity(node: &XmlNode) -> Option<(String, SignalKind)> {
    for kind in [SignalKind::Analog, SignalKind::Binary] {
        let pattern = match kind {
            SignalKind::Analog => &ANALOG_BLOCK_TAG,
            SignalKind::Binary => &BINARY_BLOCK_TAG,
        };
        if pattern.is_match(&node.tag) {
            return Some((node.tag.to_ascii_uppercase(), kind));
        }
    }
    if node.tag == "Block"
        && let Some(name) = node.child_text("Name")
    {
        for kind in [SignalKind::Analog, SignalKind::Binary] {
            if let Some(token) = block_token(name, kind) {
                return Some((token, kind));
            }
        }
    }
    None
}

/// First block identifier of this kind appearing anywhere in `text`, upper-cased.
pub(crate) fn block_token(text: &str, kind: SignalKind) -> Option<String> {
    let pattern = match kind {
        SignalKind::Analog => &ANALOG_BLOCK_TOKEN,
        SignalKind::Binary => &BINARY_BLOCK_TOKEN,
    };
    pattern
        .find(text)
        .map(|found| found.as_str().to_ascii_uppercase())
}

pub(crate) fn discover_blocks<'d>(ctx: &ExtractContext<'d>) -> Vec<Block<'d>> {
    ctx.nodes
        .iter()
        .filter_map(|flat| {
            block_identity(flat.node).map(|(name, kind)| Block {
                name,
                kind,
                node: flat.node,
            })
        })
        .collect()
}

pub(crate) fn extract_analog_signals(ctx: &ExtractContext<'_>) -> Vec<AnalogSignal> {
    discover_blocks(ctx)
        .iter()
        .filter(|block| block.kind == SignalKind::Analog)
        .flat_map(|block| run_strategies(block, ANALOG_STRATEGIES))
        .collect()
}

pub(crate) fn extract_binary_signals(ctx: &ExtractContext<'_>) -> Vec<BinarySignal> {
    discover_blocks(ctx)
        .iter()
        .filter(|block| block.kind == SignalKind::Binary)
        .flat_map(|block| run_strategies(block, BINARY_STRATEGIES))
        .collect()
}

fn run_strategies<T>(block: &Block<'_>, strategies: &[(&str, Strategy<T>)]) -> Vec<T> {
    for (label, strategy) in strategies {
        let signals = strategy(block);
        if !signals.is_empty() {
            debug!(
                block = %block.name,
                strategy = *label,
                count = signals.len(),
                "extracted block signals"
            );
            return signals;
        }
    }
    debug!(block = %block.name, "no signals recognized in block");
    Vec::new()
}

/// True for names that describe configuration rather than a signal.
pub(crate) fn is_metadata(name: &str) -> bool {
    let upper = name.to_ascii_uppercase().replace('_', " ");
    let upper = upper.trim();
    upper.is_empty()
        || METADATA_EXACT.contains(&upper)
        || METADATA_SUBSTRINGS.iter().any(|bad| upper.contains(bad))
}

/// Phase implied by a signal name such as `IL_A`, `VB` or `I_NEUTRAL`.
pub(crate) fn infer_phase(name: &str) -> Option<Phase> {
    let upper = name.to_ascii_uppercase();
    for (phase, letter) in [(Phase::A, 'A'), (Phase::B, 'B'), (Phase::C, 'C')] {
        if upper.ends_with(letter) || upper.contains(&format!("_{letter}")) {
            return Some(phase);
        }
    }
    if upper.chars().rev().take(2).any(|c| c == 'N') || upper.contains("NEUTRAL") {
        return Some(Phase::N);
    }
    None
}

/// Voltage or current from name tokens, falling back to the unit.
pub(crate) fn infer_component(name: &str, unit: &str) -> Option<Component> {
    let upper = name.to_ascii_uppercase();
    if ["VOLT", "V_", "_V", "UA", "UB", "UC"]
        .iter()
        .any(|token| upper.contains(token))
    {
        return Some(Component::Voltage);
    }
    if ["CURR", "I_", "_I", "AMP"]
        .iter()
        .any(|token| upper.contains(token))
    {
        return Some(Component::Current);
    }
    let unit = unit.to_ascii_uppercase();
    if unit.contains('V') {
        Some(Component::Voltage)
    } else if unit.contains('A') {
        Some(Component::Current)
    } else {
        None
    }
}

/// Numbers accepted signals 1, 2, ... in the order `build` accepts them.
fn number_signals<'d, T>(
    nodes: impl Iterator<Item = &'d XmlNode>,
    build: impl Fn(&'d XmlNode, u32) -> Option<T>,
) -> Vec<T> {
    let mut signals = Vec::new();
    for node in nodes {
        let index = signals.len() as u32 + 1;
        if let Some(signal) = build(node, index) {
            signals.push(signal);
        }
    }
    signals
}

/// Descendants of the block (not the block itself) whose lower-cased tag passes `keep`.
fn elements_where<'d>(
    block: &Block<'d>,
    keep: impl Fn(&str) -> bool,
) -> impl Iterator<Item = &'d XmlNode> {
    block
        .node
        .descendants()
        .skip(1)
        .filter(move |node| keep(&node.tag.to_ascii_lowercase()))
}

fn contains_any(tag: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| tag.contains(keyword))
}

fn signal_name<'n>(node: &'n XmlNode, accessors: &[Accessor]) -> Option<&'n str> {
    first_value(node, accessors).filter(|name| !is_metadata(name))
}

fn lax_name(node: &XmlNode) -> Option<&str> {
    first_value(node, LAX_NAME_ACCESSORS)
        .or_else(|| Some(node.text.as_str()).filter(|text| !text.is_empty()))
        .filter(|name| !is_metadata(name))
}

fn normal_state(node: &XmlNode) -> u8 {
    first_value(node, STATE_ACCESSORS)
        .and_then(|state| state.parse().ok())
        .unwrap_or(0)
}

fn finish_analog(signal: &mut AnalogSignal) {
    if signal.phase.is_none() {
        signal.phase = infer_phase(&signal.name);
    }
    signal.component = infer_component(&signal.name, &signal.unit);
    signal.function = classify_signal_function(&signal.name);
}

fn analog_channel_elements(block: &Block<'_>) -> Vec<AnalogSignal> {
    let nodes = elements_where(block, |tag| ANALOG_CHANNEL_TAGS.contains(&tag));
    number_signals(nodes, |node, index| analog_from_element(node, index, &block.name))
}

fn analog_io_elements(block: &Block<'_>) -> Vec<AnalogSignal> {
    let nodes = elements_where(block, |tag| contains_any(tag, ANALOG_IO_KEYWORDS));
    number_signals(nodes, |node, index| analog_from_element(node, index, &block.name))
}

fn analog_from_element(node: &XmlNode, index: u32, block: &str) -> Option<AnalogSignal> {
    let name = signal_name(node, NAME_ACCESSORS)?;
    let mut signal = AnalogSignal::new(index, name, block);
    signal.description = first_value(node, DESCRIPTION_ACCESSORS)
        .unwrap_or_default()
        .to_string();
    signal.unit = first_value(node, UNIT_ACCESSORS)
        .unwrap_or_default()
        .to_string();
    signal.phase = first_value(node, PHASE_ACCESSORS).and_then(Phase::from_code);

    let numeric = [
        (&mut signal.multiplier, field_accessors("multiplier", "Multiplier")),
        (&mut signal.offset, field_accessors("offset", "Offset")),
        (&mut signal.min_value, field_accessors("min_value", "Min_value")),
        (&mut signal.max_value, field_accessors("max_value", "Max_value")),
        (&mut signal.primary, field_accessors("primary", "Primary")),
        (&mut signal.secondary, field_accessors("secondary", "Secondary")),
    ];
    for (slot, accessors) in numeric {
        if let Some(value) = first_value(node, &accessors).and_then(|v| v.parse().ok()) {
            *slot = value;
        }
    }

    finish_analog(&mut signal);
    Some(signal)
}

fn analog_scaling_attributes(block: &Block<'_>) -> Vec<AnalogSignal> {
    let nodes = block.node.children.iter().filter(|child| {
        !contains_any(&child.tag.to_ascii_lowercase(), ANALOG_LAX_SKIP)
            && first_value(*child, SCALING_ACCESSORS).is_some()
    });
    number_signals(nodes, |node, index| {
        let name = lax_name(node)?;
        let mut signal = AnalogSignal::new(index, name, &block.name);
        for (key, value) in &node.attributes {
            let key = key.to_ascii_lowercase();
            let value = value.trim();
            if key.contains("unit") {
                signal.unit = value.to_string();
            } else if key.contains("phase") {
                signal.phase = Phase::from_code(value);
            } else if key.contains("primary") {
                signal.primary = value.parse().unwrap_or(signal.primary);
            } else if key.contains("secondary") {
                signal.secondary = value.parse().unwrap_or(signal.secondary);
            } else if key.contains("multiplier") {
                signal.multiplier = value.parse().unwrap_or(signal.multiplier);
            }
        }
        finish_analog(&mut signal);
        Some(signal)
    })
}

/// Fields gathered for one numeric suffix of `NAME<n>`, `NomValue<n>`, ...
#[derive(Debug, Default)]
struct IndexedRecord {
    name: Option<String>,
    description: Option<String>,
    primary: Option<String>,
    status: Option<String>,
    unit: Option<String>,
}

impl IndexedRecord {
    fn signal_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !is_metadata(name))
    }
}

/// The `General` sub-block when present, otherwise the block itself.
fn general_section<'d>(block: &Block<'d>) -> &'d XmlNode {
    block
        .node
        .children
        .iter()
        .find(|child| {
            child.tag == "Block"
                && child
                    .child_text("Name")
                    .is_some_and(|name| name.eq_ignore_ascii_case("GENERAL"))
        })
        .unwrap_or(block.node)
}

/// Scans `Parameter` elements once, grouping fields by their numeric suffix.
fn indexed_records(block: &Block<'_>) -> BTreeMap<u32, IndexedRecord> {
    let mut records: BTreeMap<u32, IndexedRecord> = BTreeMap::new();
    let parameters = general_section(block)
        .descendants()
        .filter(|node| node.tag == "Parameter");
    for parameter in parameters {
        let Some(parameter_name) = parameter.child_text("Name") else {
            continue;
        };
        let Some(suffix) = INDEX_SUFFIX.find(parameter_name) else {
            continue;
        };
        let Ok(index) = suffix.as_str().parse::<u32>() else {
            continue;
        };
        let prefix = parameter_name[..suffix.start()].to_ascii_uppercase();
        let record = records.entry(index).or_default();
        match prefix.as_str() {
            "NAME" => {
                record.name = Some(parameter_value(parameter));
                record.description = parameter.child_text("Description").map(str::to_string);
            }
            "NOMVALUE" => record.primary = Some(parameter_value(parameter)),
            "OPERATION" => record.status = Some(parameter_value(parameter)),
            _ => {}
        }
        if let Some(unit) = parameter.child_text("Unit") {
            record.unit = Some(unit.to_string());
        }
    }
    records
}

fn analog_indexed_parameters(block: &Block<'_>) -> Vec<AnalogSignal> {
    indexed_records(block)
        .iter()
        .filter_map(|(&index, record)| {
            let mut signal = AnalogSignal::new(index, record.signal_name()?, &block.name);
            if let Some(primary) = record.primary.as_deref().and_then(|p| p.parse().ok()) {
                signal.primary = primary;
            }
            if let Some(unit) = &record.unit {
                signal.unit.clone_from(unit);
            }
            if let Some(description) = &record.description {
                signal.description.clone_from(description);
            }
            signal.status.clone_from(&record.status);
            finish_analog(&mut signal);
            Some(signal)
        })
        .collect()
}

fn binary_channel_elements(block: &Block<'_>) -> Vec<BinarySignal> {
    let nodes = elements_where(block, |tag| BINARY_CHANNEL_TAGS.contains(&tag));
    number_signals(nodes, |node, index| binary_from_element(node, index, &block.name))
}

fn binary_io_elements(block: &Block<'_>) -> Vec<BinarySignal> {
    let nodes = elements_where(block, |tag| contains_any(tag, BINARY_IO_KEYWORDS));
    number_signals(nodes, |node, index| binary_from_element(node, index, &block.name))
}

fn binary_from_element(node: &XmlNode, index: u32, block: &str) -> Option<BinarySignal> {
    let name = signal_name(node, NAME_ACCESSORS)?;
    let mut signal = BinarySignal::new(index, name, block);
    signal.description = first_value(node, DESCRIPTION_ACCESSORS)
        .unwrap_or_default()
        .to_string();
    signal.normal_state = normal_state(node);
    signal.function = classify_signal_function(name);
    Some(signal)
}

fn binary_indexed_parameters(block: &Block<'_>) -> Vec<BinarySignal> {
    indexed_records(block)
        .iter()
        .filter_map(|(&index, record)| {
            let name = record.signal_name()?;
            let mut signal = BinarySignal::new(index, name, &block.name);
            if let Some(description) = &record.description {
                signal.description.clone_from(description);
            }
            signal.function = classify_signal_function(name);
            Some(signal)
        })
        .collect()
}

fn binary_state_attributes(block: &Block<'_>) -> Vec<BinarySignal> {
    let nodes = block.node.children.iter().filter(|child| {
        !contains_any(&child.tag.to_ascii_lowercase(), BINARY_LAX_SKIP)
            && (first_value(*child, LAX_NAME_ACCESSORS).is_some()
                || first_value(*child, STATE_ACCESSORS).is_some())
    });
    number_signals(nodes, |node, index| {
        let name = lax_name(node)?;
        let mut signal = BinarySignal::new(index, name, &block.name);
        signal.normal_state = normal_state(node);
        signal.function = classify_signal_function(name);
        Some(signal)
    })
}
