use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("canfix"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden_log(case: &str) -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join(case)
        .join("input.log")
}

#[test]
fn help_supports_decode_aliases() {
    for name in ["decode", "analyze", "analyse"] {
        cmd().args(["log", name, "--help"]).assert().success();
    }
}

#[test]
fn version_includes_build_metadata() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("canfix"));
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("commit"));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.log");
    let report = temp.path().join("report.json");

    cmd()
        .args(["log", "decode"])
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .code(2)
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_json() {
    let assert = cmd()
        .args(["log", "analyze"])
        .arg(golden_log("node_management"))
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let report: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(report["capture_summary"]["node_specific_frames"], 7);
    assert_eq!(report["messages"].as_array().map(Vec::len), Some(7));
}

#[test]
fn report_file_is_written() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("nested").join("report.json");

    cmd()
        .args(["log", "decode"])
        .arg(golden_log("node_management"))
        .arg("-o")
        .arg(&report)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let json = std::fs::read_to_string(&report).expect("report written");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["tool"]["name"], "canfix");
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .args(["log", "decode"])
        .arg(golden_log("node_management"))
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn pretty_and_compact_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .args(["log", "decode"])
        .arg(golden_log("node_management"))
        .arg("-o")
        .arg(report)
        .arg("--pretty")
        .arg("--compact")
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = temp.path().join("bus.log");
    std::fs::copy(golden_log("node_management"), &input).expect("copy fixture");

    cmd()
        .args(["log", "decode"])
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .code(2)
        .stderr(contains("report path must differ from input"));
}

#[test]
fn glob_matching_several_files_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    for name in ["a.log", "b.log"] {
        std::fs::copy(golden_log("node_management"), temp.path().join(name))
            .expect("copy fixture");
    }
    let pattern = temp.path().join("*.log");

    cmd()
        .args(["log", "decode"])
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .code(2)
        .stderr(contains("multiple files match pattern").and(contains("hint:")));
}

#[test]
fn quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let report = temp.path().join("report.json");

    cmd()
        .args(["log", "decode"])
        .arg(golden_log("node_management"))
        .arg("-o")
        .arg(report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
}

#[test]
fn list_issues_outputs_ids() {
    cmd()
        .args(["log", "decode"])
        .arg(golden_log("malformed"))
        .arg("--stdout")
        .arg("--list-issues")
        .assert()
        .success()
        .stderr(
            contains("Decode issues:")
                .and(contains("NSM-MSG-SIZE (2)"))
                .and(contains("NSM-FIELD-RANGE")),
        );
}

#[test]
fn strict_fails_when_issues_present() {
    cmd()
        .args(["log", "decode"])
        .arg(golden_log("malformed"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(contains("undecodable node specific frames detected"));
}

#[test]
fn strict_passes_on_clean_log() {
    cmd()
        .args(["log", "decode"])
        .arg(golden_log("node_management"))
        .arg("--stdout")
        .arg("--strict")
        .assert()
        .success();
}

#[test]
fn frame_decode_prints_summary() {
    cmd()
        .args(["frame", "decode", "701#0005"])
        .assert()
        .success()
        .stdout("[1]->[5] Node Identification: request\n");
    cmd()
        .args(["frame", "decode", "705#0101FF"])
        .assert()
        .success()
        .stdout("[5]->[1] Bit Rate Set: Failure Response\n");
}

#[test]
fn frame_decode_reports_bad_input() {
    cmd()
        .args(["frame", "decode", "701#0"])
        .assert()
        .code(2)
        .stderr(contains("invalid frame").and(contains("hint:")));
    cmd()
        .args(["frame", "decode", "702#000102"])
        .assert()
        .code(2)
        .stderr(contains("message size 3 is invalid for control code 0"));
}

#[test]
fn frame_encode_identification() {
    cmd()
        .args(["frame", "encode", "identification", "--send", "1", "--dest", "5"])
        .assert()
        .success()
        .stdout("701#0005\n");
    cmd()
        .args([
            "frame",
            "encode",
            "identification",
            "--send",
            "5",
            "--dest",
            "1",
            "--device",
            "20",
            "--fwrev",
            "2",
            "--model",
            "0x123456",
        ])
        .assert()
        .success()
        .stdout("705#0001011402563412\n");
}

#[test]
fn frame_encode_identification_needs_all_fields() {
    cmd()
        .args([
            "frame",
            "encode",
            "identification",
            "--send",
            "5",
            "--dest",
            "1",
            "--device",
            "20",
        ])
        .assert()
        .code(2)
        .stderr(contains("incomplete identification response"));
}

#[test]
fn frame_encode_bit_rate_roles() {
    cmd()
        .args(["frame", "encode", "bit-rate", "--send", "1", "--dest", "5"])
        .args(["--bitrate", "500"])
        .assert()
        .success()
        .stdout("701#010503\n");
    cmd()
        .args(["frame", "encode", "bit-rate", "--send", "5", "--dest", "1"])
        .arg("--success")
        .assert()
        .success()
        .stdout("705#0101\n");
    cmd()
        .args(["frame", "encode", "bit-rate", "--send", "5", "--dest", "1"])
        .arg("--fail")
        .assert()
        .success()
        .stdout("705#0101FF\n");
    cmd()
        .args(["frame", "encode", "bit-rate", "--send", "1", "--dest", "5"])
        .args(["--bitrate", "100"])
        .assert()
        .code(2)
        .stderr(contains("bitrate out of range"));
}

#[test]
fn frame_encode_node_id() {
    cmd()
        .args(["frame", "encode", "node-id", "--send", "1", "--dest", "5"])
        .args(["--new-node", "10"])
        .assert()
        .success()
        .stdout("701#02050A\n");
    cmd()
        .args(["frame", "encode", "node-id", "--send", "5", "--dest", "1"])
        .assert()
        .success()
        .stdout("705#020100\n");
    cmd()
        .args(["frame", "encode", "node-id", "--send", "1", "--dest", "5"])
        .args(["--new-node", "0"])
        .assert()
        .code(2)
        .stderr(contains("newnode out of range"));
}

#[test]
fn describe_prints_registry_name() {
    cmd()
        .args(["describe", "1"])
        .assert()
        .success()
        .stdout("Bit Rate Set\n");
    cmd()
        .args(["describe", "0x80"])
        .assert()
        .success()
        .stdout("User Defined NSM 128\n");
    cmd().args(["describe", "256"]).assert().failure();
}
