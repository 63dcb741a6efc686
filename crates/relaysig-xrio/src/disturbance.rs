//! Disturbance-report channel configuration (`BxRBDR` / `ID_GENERAL`).

use std::collections::HashMap;

use relaysig_model::{DisturbanceReportSignal, SignalKind};
use tracing::debug;

use crate::access::parameter_value;
use crate::blocks::block_token;
use crate::context::ExtractContext;
use crate::tree::XmlNode;

/// Channels a disturbance recorder block can carry.
pub const MAX_REPORT_CHANNELS: u32 = 96;

const GENERAL_BLOCK_ID: &str = "ID_GENERAL";

#[derive(Debug, Default, Clone)]
struct ParameterEntry {
    value: String,
    description: String,
}

pub(crate) fn extract_disturbance_report(ctx: &ExtractContext<'_>) -> Vec<DisturbanceReportSignal> {
    let mut signals = Vec::new();
    for (position, flat) in ctx.nodes.iter().enumerate() {
        let node = flat.node;
        if node.tag != "Block" || node.attr("Id") != Some(GENERAL_BLOCK_ID) {
            continue;
        }
        let Some(parent) = ctx.parent_of(position) else {
            continue;
        };
        let Some(block) = recorder_name(parent) else {
            continue;
        };

        let parameters = parameter_map(node);
        let before = signals.len();
        signals.extend((1..=MAX_REPORT_CHANNELS).filter_map(|channel| {
            report_channel(&parameters, channel, &block)
        }));
        debug!(
            block = %block,
            channels = signals.len() - before,
            "extracted disturbance report channels"
        );
    }
    signals
}

/// Recorder identifier from the parent's `Id` attribute, then its `Name` child.
fn recorder_name(parent: &XmlNode) -> Option<String> {
    parent
        .attr("Id")
        .and_then(|id| block_token(id, SignalKind::Binary))
        .or_else(|| {
            parent
                .child_text("Name")
                .and_then(|name| block_token(name, SignalKind::Binary))
        })
}

/// Direct `Parameter` children keyed by their `Name`; later duplicates win.
fn parameter_map(block: &XmlNode) -> HashMap<String, ParameterEntry> {
    block
        .children
        .iter()
        .filter(|child| child.tag == "Parameter")
        .filter_map(|parameter| {
            let name = parameter.child_text("Name")?;
            let entry = ParameterEntry {
                value: parameter_value(parameter),
                description: parameter
                    .child_text("Description")
                    .unwrap_or_default()
                    .to_string(),
            };
            Some((name.to_string(), entry))
        })
        .collect()
}

fn report_channel(
    parameters: &HashMap<String, ParameterEntry>,
    channel: u32,
    block: &str,
) -> Option<DisturbanceReportSignal> {
    let name = parameters
        .get(&format!("NAME{channel}"))
        .or_else(|| parameters.get(&format!("NAME{channel:02}")))
        .filter(|entry| !entry.value.is_empty())?;

    Some(DisturbanceReportSignal {
        channel,
        name: name.value.clone(),
        description: name.description.clone(),
        trigger_operation: channel_value(parameters, "TrigDR", channel),
        trigger_level: channel_value(parameters, "TrigLevel", channel),
        indication_mask: channel_value(parameters, "IndicationMa", channel),
        set_led: channel_value(parameters, "SetLED", channel),
        block: block.to_string(),
    })
}

/// Zero-padded key first (`TrigDR05`), plain key (`TrigDR5`) when that is empty.
fn channel_value(parameters: &HashMap<String, ParameterEntry>, prefix: &str, channel: u32) -> String {
    [format!("{prefix}{channel:02}"), format!("{prefix}{channel}")]
        .iter()
        .filter_map(|key| parameters.get(key))
        .map(|entry| entry.value.as_str())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}
