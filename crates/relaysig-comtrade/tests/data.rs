//! Tests for ASCII `.dat` decoding.

use relaysig_comtrade::{parse_config, parse_data_ascii};

fn two_by_two() -> relaysig_model::ComtradeConfig {
    parse_config("S,D,1999\n4,2A,2D\n1,IA,A,,A\n2,IB,B,,A\n1,TRIP,,,0\n2,CLOSE,,,0\n50")
        .expect("parse config")
}

#[test]
fn decodes_rows_in_channel_order() {
    let config = two_by_two();
    let rows = parse_data_ascii("1,0,10.5,-3,0,1\n2,250,11,-2.5,1,0\n", &config);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].sample, 1);
    assert_eq!(rows[1].timestamp, 250);
    assert_eq!(rows[0].analog, vec![10.5, -3.0]);
    assert_eq!(rows[0].digital, vec![0, 1]);
    assert_eq!(rows[1].digital, vec![1, 0]);
}

#[test]
fn short_rows_are_padded_and_garbage_is_zero() {
    let config = two_by_two();
    let rows = parse_data_ascii("1,0,x\n", &config);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].analog, vec![0.0, 0.0]);
    assert_eq!(rows[0].digital, vec![0, 0]);
}

#[test]
fn skips_blank_and_headerless_rows() {
    let config = two_by_two();
    let rows = parse_data_ascii("\n\nsample,time\n7\n3,30,1,2,1,1\n", &config);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sample, 3);
}
