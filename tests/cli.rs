// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn writes_a_ppm_and_reports_the_time() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("mandel.ppm");
    Command::cargo_bin("mandelgather")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "40x30", "-w", "4", "-i", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Render time:"));

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"P6"));
    assert!(bytes.len() > 40 * 30 * 3);
}

#[test]
fn accepts_negative_corners() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("window.ppm");
    Command::cargo_bin("mandelgather")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "16x16",
            "-w",
            "2",
            "-l",
            "-2.0,-1.0",
            "-r",
            "0.5,1.0",
        ])
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn more_workers_than_rows_fails() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.ppm");
    Command::cargo_bin("mandelgather")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "10x4", "-w", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
    assert!(!out.exists());
}

#[test]
fn zero_workers_fails() {
    Command::cargo_bin("mandelgather")
        .unwrap()
        .args(&["-o", "unused.ppm", "-s", "10x4", "-w", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Worker count must be at least 1"));
}

#[test]
fn fixed_stride_with_uneven_rows_fails() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("uneven.ppm");
    Command::cargo_bin("mandelgather")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "10x10", "-w", "3", "-x", "fixed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Partition mismatch"));
}
