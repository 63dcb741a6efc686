//! Tests for `.cfg`/`.dat` pairing and full record loading.

use std::fs;

use relaysig_comtrade::{ComtradeError, ComtradeRecord, find_config_data_pair};

#[test]
fn pairs_lowercase_extensions() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cfg = dir.path().join("fault.cfg");
    fs::write(&cfg, "").expect("write");
    fs::write(dir.path().join("fault.dat"), "").expect("write");

    let pair = find_config_data_pair(&cfg).expect("pair");
    assert_eq!(pair.config, cfg);
    assert_eq!(pair.data, dir.path().join("fault.dat"));
}

#[test]
fn pairs_from_the_data_side() {
    let dir = tempfile::tempdir().expect("temp dir");
    let dat = dir.path().join("fault.dat");
    let pair = find_config_data_pair(&dat).expect("pair");
    assert_eq!(pair.config, dir.path().join("fault.cfg"));
    assert_eq!(pair.data, dat);
}

#[test]
fn uppercase_extension_prefers_uppercase_sibling() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cfg = dir.path().join("FAULT.CFG");
    let pair = find_config_data_pair(&cfg).expect("pair");
    assert_eq!(pair.data, dir.path().join("FAULT.DAT"));
}

#[test]
fn falls_back_to_other_case_when_present() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cfg = dir.path().join("fault.cfg");
    let upper = dir.path().join("fault.DAT");
    fs::write(&upper, "").expect("write");

    let pair = find_config_data_pair(&cfg).expect("pair");
    assert_eq!(pair.data, upper);
}

#[test]
fn rejects_other_extensions() {
    let err = find_config_data_pair(std::path::Path::new("fault.txt")).expect_err("reject");
    assert!(matches!(err, ComtradeError::UnsupportedExtension { .. }));
}

#[test]
fn loads_record_from_data_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("rec.cfg"),
        "S,D,1999\n2,1A,1D\n1,IA,A,,A\n1,TRIP,,,0\n50\n1\n1000,2\nstart\ntrigger\nASCII\n1\n",
    )
    .expect("write cfg");
    fs::write(dir.path().join("rec.dat"), "1,0,5,0\n2,1000,6,1\n").expect("write dat");

    let record = ComtradeRecord::load(&dir.path().join("rec.dat")).expect("load");
    assert_eq!(record.config.num_analog, 1);
    assert_eq!(record.samples.len(), 2);
    assert_eq!(record.samples[1].digital, vec![1]);
}

#[test]
fn binary_records_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("rec.cfg"),
        "S,D,1999\n1,1A,0D\n1,IA,A,,A\n50\n1\n1000,2\nstart\ntrigger\nBINARY\n1\n",
    )
    .expect("write cfg");

    let err = ComtradeRecord::load(&dir.path().join("rec.cfg")).expect_err("binary");
    assert!(matches!(err, ComtradeError::UnsupportedEncoding { .. }));
}
