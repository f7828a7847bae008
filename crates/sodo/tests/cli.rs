use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sodo() -> Command {
    let cmd: Command = cargo_bin_cmd!("sodo").into();
    cmd
}

const SAMPLE: &str = "\
Thửa đất số:   123  tờ bản đồ số: 45
Diện tích: 100.5 m 2
Loại đất: Đất ở tại nông thôn.

Ông: Nguyen Van A, CCCD sô: 001, Địa chỉ: Ha Noi.
ký ngày 5 tháng 3 năm 2020
";

/// Write the sample OCR text into a tempdir and return its path.
/// The tempdir guard must be kept alive.
fn sample_file() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("scan.txt");
    fs::write(&path, SAMPLE).unwrap();
    (tmp, path)
}

#[test]
fn extract_prints_field_listing() {
    let (_tmp, path) = sample_file();
    sodo()
        .args(["extract", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thửa đất số: 123"))
        .stdout(predicate::str::contains("Diện tích: 100.5"))
        .stdout(predicate::str::contains("Người 1: Nguyen Van A"));
}

#[test]
fn extract_json_outputs_full_record() {
    let (_tmp, path) = sample_file();
    sodo()
        .args(["extract", "--json", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"parcel_no\": \"123\""))
        .stdout(predicate::str::contains("\"issued_at\": \"05/03/2020\""));
}

#[test]
fn extract_context_uses_template_keys() {
    let (_tmp, path) = sample_file();
    sodo()
        .args(["extract", "--context", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"SoThua\": \"123\""))
        .stdout(predicate::str::contains("\"TenNguoi_1\": \"Nguyen Van A\""))
        .stdout(predicate::str::contains("\"DiaChiNguoi_1\": \"Ha Noi\""));
}

#[test]
fn extract_reads_stdin() {
    sodo()
        .args(["extract", "-"])
        .write_stdin("Thửa đất số: 7")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thửa đất số: 7"));
}

#[test]
fn extract_succeeds_on_empty_input() {
    sodo()
        .args(["extract", "-"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Thửa đất số:"));
}

#[test]
fn extract_rejects_missing_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.txt");
    sodo()
        .args(["extract", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn normalize_repairs_and_collapses() {
    sodo()
        .args(["normalize", "-"])
        .write_stdin("Diện  tích:\t100,5 m°\n\n\nlôai đất\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Diện tích: 100,5 m\nloại đất"));
}

#[test]
fn fields_lists_default_catalog() {
    sodo()
        .args(["fields"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Thửa đất số"))
        .stdout(predicate::str::contains("Diện tích"))
        .stdout(predicate::str::contains("CHI NHÁNH"));
}
