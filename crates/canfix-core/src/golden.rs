//! Golden report fixtures shared by the regeneration binary and the tests.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Log file every golden case directory must contain.
pub const INPUT_FILE: &str = "input.log";
/// Report file compared against (and rewritten by) the analyzer.
pub const EXPECTED_FILE: &str = "expected_report.json";

/// One fixture directory under the golden root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenCase {
    pub name: String,
    pub dir: PathBuf,
}

impl GoldenCase {
    pub fn input(&self) -> PathBuf {
        self.dir.join(INPUT_FILE)
    }

    pub fn expected(&self) -> PathBuf {
        self.dir.join(EXPECTED_FILE)
    }
}

/// `tests/golden` at the workspace root, independent of the working directory.
pub fn golden_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
}

/// Directories under `root` holding an input log, sorted by name.
pub fn discover_cases(root: &Path) -> io::Result<Vec<GoldenCase>> {
    let mut cases = Vec::new();
    for entry in fs::read_dir(root)? {
        let dir = entry?.path();
        if !dir.join(INPUT_FILE).is_file() {
            continue;
        }
        let Some(name) = dir.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        cases.push(GoldenCase {
            name: name.to_string(),
            dir: dir.clone(),
        });
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::{discover_cases, golden_root};

    #[test]
    fn discovers_cases_with_input_log_only() {
        let temp = tempfile::TempDir::new().unwrap();
        let temp = temp.path();
        for (name, with_input) in [("b_case", true), ("a_case", true), ("no_input", false)] {
            let dir = temp.join(name);
            std::fs::create_dir_all(&dir).unwrap();
            if with_input {
                std::fs::write(dir.join("input.log"), "").unwrap();
            }
        }
        std::fs::write(temp.join("input.log"), "").unwrap();

        let cases = discover_cases(temp).unwrap();
        let names: Vec<&str> = cases.iter().map(|case| case.name.as_str()).collect();
        assert_eq!(names, vec!["a_case", "b_case"]);
        assert!(cases[0].expected().ends_with("a_case/expected_report.json"));
    }

    #[test]
    fn root_resolves_from_manifest() {
        let cases = discover_cases(&golden_root()).unwrap();
        let names: Vec<&str> = cases.iter().map(|case| case.name.as_str()).collect();
        assert_eq!(names, vec!["malformed", "node_management"]);
    }
}
