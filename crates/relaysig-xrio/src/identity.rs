//! Relay identification (vendor, model, firmware, station).

use std::collections::HashMap;

use relaysig_model::RelayReference;
use tracing::debug;

use crate::context::ExtractContext;
use crate::tree::XmlNode;

/// `ForeignId` elements are only searched for near the top of the document.
const FOREIGN_ID_SCAN_LIMIT: usize = 100;

const MANUFACTURER_TAGS: &[&str] = &["manufacturer", "vendor", "make"];
const SERIAL_TAGS: &[&str] = &["serial", "serialnumber", "serial_number"];
const STATION_TAGS: &[&str] = &["stationname", "station", "substation", "station_name"];
const DEVICE_ID_TAGS: &[&str] = &["deviceid", "device_id", "devid", "ieddesc", "iedname", "name"];
const DESCRIPTION_TAGS: &[&str] = &["description", "desc", "comment"];

/// Model prefixes of the ABB Relion 670 family.
const ABB_MODEL_PREFIXES: &[&str] = &["REC", "RED", "REB", "REL", "REG"];

pub(crate) fn extract_relay_identity(ctx: &ExtractContext<'_>) -> RelayReference {
    let mut relay = RelayReference::default();

    if let Some((model, firmware)) = foreign_id(ctx) {
        relay.model = model;
        relay.firmware = firmware;
    }

    let mut first_by_tag: HashMap<String, &XmlNode> = HashMap::new();
    for flat in &ctx.nodes {
        first_by_tag
            .entry(flat.node.tag.to_ascii_lowercase())
            .or_insert(flat.node);
    }
    let fields = [
        (&mut relay.manufacturer, MANUFACTURER_TAGS),
        (&mut relay.serial, SERIAL_TAGS),
        (&mut relay.station_name, STATION_TAGS),
        (&mut relay.device_id, DEVICE_ID_TAGS),
        (&mut relay.description, DESCRIPTION_TAGS),
    ];
    for (slot, tags) in fields {
        let found = tags
            .iter()
            .filter_map(|tag| first_by_tag.get(*tag))
            .find_map(|node| element_value(node));
        if let Some(value) = found {
            *slot = Some(value.to_string());
        }
    }

    if relay.model.is_none() {
        relay.model = ctx
            .root
            .attributes
            .iter()
            .find(|(key, value)| {
                let key = key.to_ascii_lowercase();
                (key.contains("type") || key.contains("model")) && !value.trim().is_empty()
            })
            .map(|(_, value)| value.trim().to_string());
    }

    scan_settings_sections(ctx, &mut relay);

    if relay.manufacturer.is_none()
        && let Some(model) = &relay.model
    {
        let upper = model.trim().to_ascii_uppercase();
        if ABB_MODEL_PREFIXES
            .iter()
            .any(|prefix| upper.starts_with(prefix))
        {
            relay.manufacturer = Some("ABB".to_string());
        }
    }

    debug!(relay = %relay.full_id(), "resolved relay identity");
    relay
}

/// `IedIdentifier | REC670 | 2.2.4` style identifiers.
fn foreign_id(ctx: &ExtractContext<'_>) -> Option<(Option<String>, Option<String>)> {
    ctx.nodes
        .iter()
        .take(FOREIGN_ID_SCAN_LIMIT)
        .filter(|flat| flat.node.tag.eq_ignore_ascii_case("ForeignId"))
        .find_map(|flat| {
            let parts: Vec<&str> = flat.node.text.split('|').map(str::trim).collect();
            if !parts[0].to_ascii_lowercase().contains("iedidentifier") {
                return None;
            }
            let part = |i: usize| {
                parts
                    .get(i)
                    .copied()
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            };
            Some((part(1), part(2)))
        })
}

fn element_value(node: &XmlNode) -> Option<&str> {
    if !node.text.is_empty() {
        return Some(node.text.as_str());
    }
    node.attr("value")
        .or_else(|| node.attr("Value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Looks through the children of configuration, settings and header sections
/// for vendor and model entries.
fn scan_settings_sections(ctx: &ExtractContext<'_>, relay: &mut RelayReference) {
    for flat in &ctx.nodes {
        let tag = flat.node.tag.to_ascii_lowercase();
        if !(tag.contains("config") || tag.contains("setting") || tag.contains("header")) {
            continue;
        }
        for child in &flat.node.children {
            if child.text.is_empty() {
                continue;
            }
            let child_tag = child.tag.to_ascii_lowercase();
            if relay.manufacturer.is_none()
                && ["manuf", "vendor", "make"]
                    .iter()
                    .any(|key| child_tag.contains(key))
            {
                relay.manufacturer = Some(child.text.clone());
            }
            if relay.model.is_none()
                && ["model", "type", "device"]
                    .iter()
                    .any(|key| child_tag.contains(key))
            {
                relay.model = Some(child.text.clone());
            }
        }
    }
}
