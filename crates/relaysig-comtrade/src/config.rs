//! `.cfg` parser following the fixed positional layout of IEEE C37.111.

use std::path::Path;

use relaysig_model::{
    ComtradeChannel, ComtradeConfig, DEFAULT_LINE_FREQUENCY, DEFAULT_REVISION_YEAR, DataEncoding,
    SamplingRate,
};
use tracing::debug;

use crate::error::{ComtradeError, Result, read_text};

/// Reads and parses a `.cfg` file.
pub fn read_config(path: &Path) -> Result<ComtradeConfig> {
    let text = read_text(path)?;
    let mut config = parse_config(&text)?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Parses configuration text.
///
/// Fails only when fewer than two lines are present; every other malformed
/// field takes its documented default.
pub fn parse_config(text: &str) -> Result<ComtradeConfig> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    if lines.len() < 2 {
        return Err(ComtradeError::Malformed {
            message: format!("expected at least 2 lines, found {}", lines.len()),
        });
    }

    let mut cursor = LineCursor::new(&lines);
    let mut config = ComtradeConfig::default();

    // Line 1: station_name, rec_dev_id, rev_year
    if let Some(line) = cursor.next() {
        let fields = split_fields(line);
        config.station_name = field(&fields, 0).unwrap_or_default().to_string();
        config.device_id = field(&fields, 1).unwrap_or_default().to_string();
        if let Some(revision) = field(&fields, 2) {
            config.revision_year = revision.parse().unwrap_or_else(|_| {
                debug!(revision, "unparsable revision year, using default");
                DEFAULT_REVISION_YEAR
            });
        }
    }

    // Line 2: TT, ##A, ##D
    if let Some(line) = cursor.next() {
        let (analog, digital) = parse_channel_counts(line);
        config.num_analog = analog;
        config.num_digital = digital;
    }

    for position in 1..=config.num_analog {
        let Some(line) = cursor.next() else {
            break;
        };
        config
            .channels
            .push(parse_analog_channel(line, position as u32));
    }

    for position in 1..=config.num_digital {
        let Some(line) = cursor.next() else {
            break;
        };
        config
            .channels
            .push(parse_digital_channel(line, position as u32));
    }

    if let Some(line) = cursor.next() {
        config.line_frequency = line.parse().unwrap_or_else(|_| {
            debug!(line, "unparsable line frequency, using default");
            DEFAULT_LINE_FREQUENCY
        });
    }

    let rate_count = cursor
        .next()
        .map(|line| line.parse::<usize>().unwrap_or(0))
        .unwrap_or(0);

    // The standard always carries at least one rate line.
    for _ in 0..rate_count.max(1) {
        let Some(line) = cursor.next() else {
            break;
        };
        match parse_sampling_rate(line) {
            Some(rate) => config.sampling_rates.push(rate),
            None => debug!(line, "skipping unparsable sampling rate"),
        }
    }

    if let Some(line) = cursor.next() {
        config.start_timestamp = line.to_string();
    }
    if let Some(line) = cursor.next() {
        config.trigger_timestamp = line.to_string();
    }

    if let Some(line) = cursor.next() {
        config.data_encoding = DataEncoding::from_tag(line);
    }

    if let Some(line) = cursor.next() {
        config.time_multiplier = line.parse().unwrap_or(1.0);
    }

    Ok(config)
}

struct LineCursor<'a> {
    lines: &'a [&'a str],
    position: usize,
}

impl<'a> LineCursor<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, position: 0 }
    }

    fn next(&mut self) -> Option<&'a str> {
        let line = self.lines.get(self.position).copied()?;
        self.position += 1;
        Some(line)
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}

fn field<'a>(fields: &[&'a str], position: usize) -> Option<&'a str> {
    fields.get(position).copied()
}

fn field_f64(fields: &[&str], position: usize) -> Option<f64> {
    field(fields, position).and_then(|value| value.parse().ok())
}

/// Reads the `TT,##A,##D` line.
///
/// A lone field with no `A`/`D` tokens is the legacy 1991 form and is taken
/// as the analog count.
fn parse_channel_counts(line: &str) -> (usize, usize) {
    let fields = split_fields(line);
    let mut analog = 0;
    let mut digital = 0;
    for token in fields.iter().skip(1) {
        let upper = token.to_ascii_uppercase();
        if let Some(count) = upper.strip_suffix('A') {
            if let Ok(count) = count.trim().parse() {
                analog = count;
            }
        } else if let Some(count) = upper.strip_suffix('D')
            && let Ok(count) = count.trim().parse()
        {
            digital = count;
        }
    }
    if analog == 0
        && digital == 0
        && fields.len() == 1
        && let Ok(total) = fields[0].parse()
    {
        analog = total;
    }
    (analog, digital)
}

/// `An, ch_id, ph, ccbm, uu, a, b, skew, min, max, primary, secondary, PS`
fn parse_analog_channel(line: &str, position: u32) -> ComtradeChannel {
    let fields = split_fields(line);
    let mut channel = ComtradeChannel::analog(position);

    if let Some(index) = field(&fields, 0).and_then(|value| value.parse().ok()) {
        channel.index = index;
    }
    if let Some(name) = field(&fields, 1) {
        channel.name = name.to_string();
    }
    channel.phase = field(&fields, 2).unwrap_or_default().to_string();
    channel.circuit_component = field(&fields, 3).unwrap_or_default().to_string();
    channel.unit = field(&fields, 4).unwrap_or_default().to_string();

    let numeric = [
        (5, &mut channel.multiplier),
        (6, &mut channel.offset),
        (7, &mut channel.skew),
        (8, &mut channel.min_value),
        (9, &mut channel.max_value),
        (10, &mut channel.primary),
        (11, &mut channel.secondary),
    ];
    for (position, slot) in numeric {
        if let Some(value) = field_f64(&fields, position) {
            *slot = value;
        }
    }

    if let Some(selector) = field(&fields, 12) {
        channel.ps_selector = selector.to_string();
    }
    channel
}

/// `Dn, ch_id, ph, ccbm, y`
fn parse_digital_channel(line: &str, position: u32) -> ComtradeChannel {
    let fields = split_fields(line);
    let mut channel = ComtradeChannel::digital(position);

    if let Some(index) = field(&fields, 0).and_then(|value| value.parse().ok()) {
        channel.index = index;
    }
    if let Some(name) = field(&fields, 1) {
        channel.name = name.to_string();
    }
    channel.phase = field(&fields, 2).unwrap_or_default().to_string();
    channel.circuit_component = field(&fields, 3).unwrap_or_default().to_string();
    if let Some(state) = field(&fields, 4) {
        channel.normal_state = state.parse().unwrap_or(0);
    }
    channel
}

fn parse_sampling_rate(line: &str) -> Option<SamplingRate> {
    let fields = split_fields(line);
    if fields.len() < 2 {
        return None;
    }
    Some(SamplingRate {
        rate: fields[0].parse().ok()?,
        end_sample: fields[1].parse().ok()?,
    })
}
