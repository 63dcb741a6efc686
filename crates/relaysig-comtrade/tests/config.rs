//! Tests for `.cfg` parsing.

use std::fs;

use proptest::prelude::*;
use relaysig_comtrade::{ComtradeError, parse_config, read_config};
use relaysig_model::{DataEncoding, SignalKind};

const WELL_FORMED: &str = "\
SUBSTATION NORTH,REL670 BAY 1,1999
5,3A,2D
1,IL1,A,LINE1,A,0.01,0,0,-32767,32767,800,1,S
2,IL2,B,LINE1,A,0.01,0,0,-32767,32767,800,1,S
3,UL1,A,LINE1,kV,0.1,0,0,-32767,32767,132,0.11,P
1,TRIP,,,0
2,CB OPEN,,,1
50
2
1000,200
4000,1200
01/02/2024,10:15:00.000000
01/02/2024,10:15:00.100000
ASCII
1
";

#[test]
fn parses_well_formed_configuration() {
    let config = parse_config(WELL_FORMED).expect("parse");
    assert_eq!(config.station_name, "SUBSTATION NORTH");
    assert_eq!(config.device_id, "REL670 BAY 1");
    assert_eq!(config.revision_year, 1999);
    assert_eq!(config.num_analog, 3);
    assert_eq!(config.num_digital, 2);
    assert_eq!(config.channels.len(), config.total_channels());
    assert_eq!(config.line_frequency, 50.0);
    assert_eq!(config.sampling_rates.len(), 2);
    assert_eq!(config.sampling_rates[1].rate, 4000.0);
    assert_eq!(config.sampling_rates[1].end_sample, 1200);
    assert_eq!(config.start_timestamp, "01/02/2024,10:15:00.000000");
    assert_eq!(config.trigger_timestamp, "01/02/2024,10:15:00.100000");
    assert_eq!(config.data_encoding, DataEncoding::Ascii);
    assert_eq!(config.time_multiplier, 1.0);

    let analog: Vec<_> = config.analog_channels().collect();
    assert_eq!(analog.len(), 3);
    assert_eq!(analog[2].name, "UL1");
    assert_eq!(analog[2].unit, "kV");
    assert_eq!(analog[2].primary, 132.0);
    assert_eq!(analog[2].secondary, 0.11);
    assert_eq!(analog[0].ps_selector, "S");

    let digital: Vec<_> = config.digital_channels().collect();
    assert_eq!(digital[1].name, "CB OPEN");
    assert_eq!(digital[1].normal_state, 1);
    assert_eq!(digital[1].kind, SignalKind::Binary);
}

#[test]
fn declared_counts_win_over_actual_lines() {
    // Line 2 declares 2A but only one analog line precedes the digital one,
    // so every following section shifts by one line.
    let text = "STATION,DEV,1999\n1,2A,1D\n1,IA,A,,A\n1,TRIP,,,0\n60\n1\n1000,100\n,\n,\nASCII\n1";
    let config = parse_config(text).expect("parse");

    assert_eq!(config.num_analog, 2);
    assert_eq!(config.num_digital, 1);
    assert_eq!(config.channels.len(), 3);

    let second = &config.channels[1];
    assert_eq!(second.kind, SignalKind::Analog);
    assert_eq!(second.name, "TRIP");
    assert_eq!(second.unit, "0");

    let digital = &config.channels[2];
    assert_eq!(digital.kind, SignalKind::Binary);
    assert_eq!(digital.index, 60);
    assert_eq!(digital.name, "D1");

    assert_eq!(config.line_frequency, 1.0);
    assert!(config.sampling_rates.is_empty());
    assert_eq!(config.start_timestamp, ",");
    assert_eq!(config.trigger_timestamp, "ASCII");
    assert_eq!(config.data_encoding, DataEncoding::Ascii);
}

#[test]
fn lowercase_count_suffixes_and_binary_encoding() {
    let text = "S,D,2013\n2,1a,1d\n1,VA,A,,V\n1,PICKUP,,,0\n60\n1\n1200,600\nstart\ntrigger\nbinary\n1000";
    let config = parse_config(text).expect("parse");
    assert_eq!(config.revision_year, 2013);
    assert_eq!(config.num_analog, 1);
    assert_eq!(config.num_digital, 1);
    assert_eq!(config.data_encoding, DataEncoding::Binary);
    assert_eq!(config.time_multiplier, 1000.0);
}

#[test]
fn truncated_configuration_keeps_defaults() {
    let text = "S,D,garbled\n3,2A,1D\n1,IA,A,,A";
    let config = parse_config(text).expect("parse");
    assert_eq!(config.revision_year, 1999);
    assert_eq!(config.channels.len(), 1);
    assert_eq!(config.line_frequency, 60.0);
    assert!(config.sampling_rates.is_empty());
    assert_eq!(config.data_encoding, DataEncoding::Ascii);
}

#[test]
fn unparsable_frequency_uses_default() {
    let text = "S,D,1999\n0,0A,0D\nfifty\n1\n1000,10";
    let config = parse_config(text).expect("parse");
    assert_eq!(config.line_frequency, 60.0);
    assert_eq!(config.sampling_rates.len(), 1);
}

#[test]
fn fewer_than_two_lines_is_malformed() {
    for text in ["", "STATION,DEV,1999"] {
        let err = parse_config(text).expect_err("too short");
        assert!(matches!(err, ComtradeError::Malformed { .. }));
    }
}

#[test]
fn read_config_records_source_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fault.cfg");
    fs::write(&path, WELL_FORMED).expect("write cfg");

    let config = read_config(&path).expect("read");
    assert_eq!(config.source.as_deref(), Some(path.as_path()));
    assert_eq!(config.channels.len(), 5);
}

#[test]
fn read_config_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = read_config(&dir.path().join("missing.cfg")).expect_err("missing");
    assert!(matches!(err, ComtradeError::FileNotFound { .. }));
}

proptest! {
    #[test]
    fn any_two_line_text_parses(lines in proptest::collection::vec("[ -~]{0,40}", 2..20)) {
        let text = lines.join("\n");
        prop_assume!(text.lines().count() >= 2);
        prop_assert!(parse_config(&text).is_ok());
    }

    #[test]
    fn channels_never_exceed_declared_counts(analog in 0usize..6, digital in 0usize..6, extra in 0usize..4) {
        let mut text = format!("S,D,1999\n{},{}A,{}D\n", analog + digital, analog, digital);
        for i in 0..(analog + digital + extra) {
            text.push_str(&format!("{},CH{},,,0\n", i + 1, i + 1));
        }
        let config = parse_config(&text).expect("parse");
        prop_assert!(config.channels.len() <= config.total_channels());
    }
}
