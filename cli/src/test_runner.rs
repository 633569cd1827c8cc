use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use epp::{Diagnostic, Severity};

use crate::error::FixtureError;

const FIXTURE_SUFFIX: &str = ".test.epp";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExpectedDiagnostic {
    /// Substring that must appear in the diagnostic message.
    pub contains: String,

    /// If set, the diagnostic must sit on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Human-readable fixture description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected errors, in report order. Empty means none are allowed.
    #[serde(default)]
    pub expect_errors: Vec<ExpectedDiagnostic>,

    /// Expected warnings, in report order. Empty means none are allowed.
    #[serde(default)]
    pub expect_warnings: Vec<ExpectedDiagnostic>,
}

/// Split a `.test.epp` file into its TOML config and E++ source.
fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), FixtureError> {
    let content = content.trim_start_matches('\u{feff}');

    // The opening line's newline stays in place so an empty frontmatter
    // still has a "\n---" to find.
    let after_open = content
        .strip_prefix("---")
        .ok_or(FixtureError::MissingOpening)?;

    let close_pos = after_open
        .find("\n---")
        .ok_or(FixtureError::MissingClosing)?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig = toml::from_str(toml_str)?;
    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (config, source) = match parse_fixture(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let diagnostics = epp::validate(source);
    debug!(path = %path.display(), count = diagnostics.len(), "fixture validated");

    let failure = check_expected(&diagnostics, Severity::Error, &config.expect_errors)
        .or_else(|| check_expected(&diagnostics, Severity::Warning, &config.expect_warnings));

    TestResult {
        path: path.to_path_buf(),
        description: config.description,
        outcome: match failure {
            Some(reason) => TestOutcome::Fail(reason),
            None => TestOutcome::Pass,
        },
    }
}

/// Check actual diagnostics of one severity against expectations.
/// Returns `Some(reason)` on mismatch.
fn check_expected(
    diagnostics: &[Diagnostic],
    severity: Severity,
    expected: &[ExpectedDiagnostic],
) -> Option<String> {
    let actual: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.severity == severity).collect();

    if actual.len() != expected.len() {
        let actual_msgs: Vec<String> = actual.iter().map(|d| format!("  - {}", d)).collect();
        return Some(format!(
            "expected {} {}(s), got {}\n  actual {}s:\n{}",
            expected.len(),
            severity,
            actual.len(),
            severity,
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in actual.iter().zip(expected.iter()).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "{}[{}]: expected message containing \"{}\", got: {}",
                severity, i, expected.contains, actual.message
            ));
        }

        if let Some(expected_line) = expected.line {
            let actual_line = actual.line + 1;
            if actual_line != expected_line {
                return Some(format!(
                    "{}[{}]: expected on line {}, but reported on line {}",
                    severity, i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_fixtures(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_fixtures(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_fixtures(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(FIXTURE_SUFFIX) {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given fixture path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn result_label(no_color: bool, ok: bool) -> &'static str {
    match (ok, no_color) {
        (true, true) => "ok",
        (true, false) => "\x1b[32mok\x1b[0m",
        (false, true) => "FAILED",
        (false, false) => "\x1b[31mFAILED\x1b[0m",
    }
}

fn fixture_label(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(FIXTURE_SUFFIX))
            .unwrap_or("?")
    })
}

/// Filter discovered categories down to the requested ones.
/// A request matches a category and all of its subcategories.
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut filtered = BTreeMap::new();
    for request in requested {
        let req = request.trim_matches('/');
        let mut found = false;
        for (cat, files) in all {
            if cat == req || cat.starts_with(&format!("{}/", req)) {
                filtered.insert(cat.as_str(), files);
                found = true;
            }
        }
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    filtered
}

/// Run all fixtures under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let run_groups: Vec<(String, Vec<PathBuf>)> = if path.is_file() {
        vec![(String::new(), vec![path.to_path_buf()])]
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
            return 1;
        }
        select_categories(&all, categories)
            .into_iter()
            .map(|(cat, files)| (cat.to_string(), files.clone()))
            .collect()
    };

    if run_groups.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let single = path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_groups {
        if !single {
            let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
            eprintln!();
            eprintln!("{}", bold(header, no_color));
        }

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), fixture_label(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), fixture_label(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    let failed = failures.len();
    eprintln!();
    if failed == 0 {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            result_label(no_color, true),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            result_label(no_color, false),
            passed,
            failed,
            passed + failed
        );
        1
    }
}
