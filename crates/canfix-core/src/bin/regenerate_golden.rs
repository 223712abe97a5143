use std::fs;
use std::process::ExitCode;

use canfix_core::analyze_candump_file;
use canfix_core::golden::{GoldenCase, discover_cases, golden_root};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<(), String> {
    let root = golden_root();
    let cases = discover_cases(&root)
        .map_err(|err| format!("failed to read {}: {err}", root.display()))?;
    if cases.is_empty() {
        return Err(format!("no golden cases under {}", root.display()));
    }
    for case in &cases {
        regenerate(case)?;
        println!("regenerated {}", case.name);
    }
    Ok(())
}

fn regenerate(case: &GoldenCase) -> Result<(), String> {
    let input = case.input();
    let mut report = analyze_candump_file(&input)
        .map_err(|err| format!("analysis failed for {}: {err}", input.display()))?;
    // Stored relative so reports do not depend on the checkout location.
    report.input.path = format!("tests/golden/{}/input.log", case.name);
    let mut json = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("JSON serialization failed: {err}"))?;
    json.push('\n');
    let output = case.expected();
    fs::write(&output, json).map_err(|err| format!("failed to write {}: {err}", output.display()))
}
