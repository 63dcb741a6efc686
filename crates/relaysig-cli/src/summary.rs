use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use relaysig_map::Suggestion;
use relaysig_model::{AliasEntry, ComtradeConfig, MatchTier, Phase, ValidationSummary, XrioData};
use relaysig_standards::StandardSignal;

pub fn print_comtrade(config: &ComtradeConfig, samples: Option<usize>) {
    println!("Station: {}", or_dash(&config.station_name));
    println!("Device: {}", or_dash(&config.device_id));
    println!("Revision: {}", config.revision_year);
    println!("Line frequency: {} Hz", config.line_frequency);
    println!("Data encoding: {}", config.data_encoding);
    println!(
        "Start / trigger: {} / {}",
        or_dash(&config.start_timestamp),
        or_dash(&config.trigger_timestamp)
    );
    for rate in &config.sampling_rates {
        println!("Sampling: {} Hz up to sample {}", rate.rate, rate.end_sample);
    }
    if let Some(count) = samples {
        println!("Samples: {count}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Kind"),
        header_cell("Name"),
        header_cell("Phase"),
        header_cell("Unit"),
        header_cell("Multiplier"),
        header_cell("Offset"),
        header_cell("Primary/Secondary"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for channel in &config.channels {
        table.add_row(vec![
            Cell::new(channel.index),
            Cell::new(channel.kind),
            Cell::new(&channel.name).add_attribute(Attribute::Bold),
            text_cell(&channel.phase),
            text_cell(&channel.unit),
            Cell::new(channel.multiplier),
            Cell::new(channel.offset),
            Cell::new(format!(
                "{}/{} {}",
                channel.primary, channel.secondary, channel.ps_selector
            )),
        ]);
    }
    println!("{table}");
}

pub fn print_xrio(data: &XrioData) {
    let relay = &data.relay;
    println!("Relay: {}", relay.full_id());
    for (label, value) in [
        ("Serial", &relay.serial),
        ("Station", &relay.station_name),
        ("Device ID", &relay.device_id),
        ("Description", &relay.description),
    ] {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }

    if !data.analog_signals.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Block"),
            header_cell("#"),
            header_cell("Name"),
            header_cell("Phase"),
            header_cell("Unit"),
            header_cell("Function"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for signal in &data.analog_signals {
            let phase = signal.phase.map(Phase::as_str).unwrap_or_default();
            table.add_row(vec![
                Cell::new(&signal.block).fg(Color::Blue),
                Cell::new(signal.index),
                Cell::new(&signal.name).add_attribute(Attribute::Bold),
                text_cell(phase),
                text_cell(&signal.unit),
                text_cell(signal.function.as_str()),
            ]);
        }
        println!("Analog signals:");
        println!("{table}");
    }

    if !data.binary_signals.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Block"),
            header_cell("#"),
            header_cell("Name"),
            header_cell("Normal"),
            header_cell("Function"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 3, CellAlignment::Center);
        for signal in &data.binary_signals {
            table.add_row(vec![
                Cell::new(&signal.block).fg(Color::Blue),
                Cell::new(signal.index),
                Cell::new(&signal.name).add_attribute(Attribute::Bold),
                Cell::new(signal.normal_state),
                text_cell(signal.function.as_str()),
            ]);
        }
        println!("Binary signals:");
        println!("{table}");
    }

    if !data.disturbance_report_signals.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Block"),
            header_cell("Channel"),
            header_cell("Name"),
            header_cell("Trigger"),
            header_cell("Level"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for signal in &data.disturbance_report_signals {
            table.add_row(vec![
                Cell::new(&signal.block).fg(Color::Blue),
                Cell::new(signal.channel),
                Cell::new(&signal.name).add_attribute(Attribute::Bold),
                text_cell(&signal.trigger_operation),
                text_cell(&signal.trigger_level),
            ]);
        }
        println!("Disturbance report channels:");
        println!("{table}");
    }

    println!(
        "Signals: {} analog, {} binary, {} disturbance report",
        data.analog_signals.len(),
        data.binary_signals.len(),
        data.disturbance_report_signals.len()
    );
    for warning in &data.warnings {
        eprintln!("warning: {} stage failed: {}", warning.stage, warning.message);
    }
}

pub fn print_validation(
    model: &str,
    summary: &ValidationSummary,
    suggestions: &BTreeMap<String, Vec<Suggestion>>,
) {
    println!("Relay model: {model}");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Signal"),
        header_cell("Kind"),
        header_cell("Tier"),
        header_cell("Standard"),
        header_cell("Confidence"),
        header_cell("Rationale"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);
    for result in &summary.results {
        table.add_row(vec![
            Cell::new(&result.source_name).add_attribute(Attribute::Bold),
            Cell::new(result.kind),
            tier_cell(result.tier),
            text_cell(&result.standard_name),
            Cell::new(format!("{:.0}%", result.confidence * 100.0)),
            Cell::new(&result.rationale),
        ]);
    }
    println!("{table}");
    println!(
        "Exact {} / alias {} / fuzzy {} / new {} of {} ({:.1}% matched)",
        summary.exact,
        summary.alias,
        summary.fuzzy,
        summary.new,
        summary.total,
        summary.match_rate() * 100.0
    );

    if suggestions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Signal"), header_cell("Candidates")]);
    apply_table_style(&mut table);
    for (name, candidates) in suggestions {
        let listed = candidates
            .iter()
            .map(|candidate| format!("{} ({:.2})", candidate.standard_name, candidate.score))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![Cell::new(name), text_cell(&listed)]);
    }
    println!("Suggestions:");
    println!("{table}");
}

pub fn print_aliases(entries: &[&AliasEntry]) {
    if entries.is_empty() {
        println!("No aliases.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Model"),
        header_cell("Relay name"),
        header_cell("Standard"),
        header_cell("Kind"),
        header_cell("Function"),
        header_cell("Auto"),
        header_cell("Validated"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Center);
    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.relay_model).fg(Color::Blue),
            Cell::new(&entry.relay_name).add_attribute(Attribute::Bold),
            Cell::new(&entry.standard_name),
            Cell::new(entry.signal_type),
            text_cell(&entry.function),
            flag_cell(entry.auto_detected),
            flag_cell(entry.validated),
        ]);
    }
    println!("{table}");
    println!("{} alias(es)", entries.len());
}

pub fn print_catalog(groups: &[(String, Vec<StandardSignal>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for (group, signals) in groups {
        for signal in signals {
            table.add_row(vec![
                Cell::new(group).fg(Color::Blue),
                Cell::new(&signal.name).add_attribute(Attribute::Bold),
                Cell::new(signal.kind),
                text_cell(&signal.description),
            ]);
        }
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn tier_cell(tier: MatchTier) -> Cell {
    let cell = Cell::new(tier.as_str().to_uppercase());
    match tier {
        MatchTier::Exact => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        MatchTier::Alias => cell.fg(Color::Green),
        MatchTier::Fuzzy => cell.fg(Color::Yellow),
        MatchTier::New => cell.fg(Color::Red),
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓").fg(Color::Green)
    } else {
        dim_cell("-")
    }
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
