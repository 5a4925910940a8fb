use std::fs;
use std::path::{Path, PathBuf};

use slotline::Template;
use slotline::value::context_from_toml;

fn run_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/run")
}

/// Find all test directories in tests/run/
fn find_run_tests() -> Vec<PathBuf> {
    let mut test_dirs = Vec::new();

    if let Ok(entries) = fs::read_dir(run_dir()) {
        for entry in entries.flatten() {
            let path = entry.path();
            // Check if it has a template.txt file
            if path.is_dir() && path.join("template.txt").exists() {
                test_dirs.push(path);
            }
        }
    }

    test_dirs.sort();
    test_dirs
}

fn read(test_name: &str, path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| {
        format!(
            "Test '{}': failed to read {}: {}",
            test_name,
            path.display(),
            e
        )
    })
}

/// Run a single test case
fn run_test_case(test_dir: &Path) -> Result<(), String> {
    let test_name = test_dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let source = read(test_name, &test_dir.join("template.txt"))?;
    let expected_output = read(test_name, &test_dir.join("expected_output.txt"))?;

    let values_file = test_dir.join("values.toml");
    let context = if values_file.exists() {
        context_from_toml(&read(test_name, &values_file)?)
            .map_err(|e| format!("Test '{}': bad values.toml: {}", test_name, e))?
    } else {
        Default::default()
    };

    let template = Template::compile(&source)
        .map_err(|e| format!("Test '{}': compile failed: {}", test_name, e))?;
    let actual_output = template
        .fill(&context)
        .map_err(|e| format!("Test '{}': fill failed: {}", test_name, e))?;

    // Compare output
    if actual_output.trim() != expected_output.trim() {
        return Err(format!(
            "Test '{}': output mismatch\nExpected:\n{}\nActual:\n{}",
            test_name,
            expected_output.trim(),
            actual_output.trim()
        ));
    }

    Ok(())
}

#[test]
fn test_run_integration() {
    let test_dirs = find_run_tests();

    if test_dirs.is_empty() {
        panic!("No integration tests found in tests/run/");
    }

    let mut failures = Vec::new();

    for test_dir in &test_dirs {
        let test_name = test_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        print!("Running test '{}' ... ", test_name);

        match run_test_case(test_dir) {
            Ok(_) => {
                println!("ok");
            }
            Err(e) => {
                println!("FAILED");
                failures.push(e);
            }
        }
    }

    if !failures.is_empty() {
        eprintln!("\nFailures:");
        for failure in &failures {
            eprintln!("  {}", failure);
        }
        panic!("{} test(s) failed", failures.len());
    }
}

// Individual tests for each case - makes it easier to run specific tests
#[test]
fn test_run_times_table() {
    if let Err(e) = run_test_case(&run_dir().join("times_table")) {
        panic!("{}", e);
    }
}

#[test]
fn test_run_readme_sample() {
    if let Err(e) = run_test_case(&run_dir().join("readme_sample")) {
        panic!("{}", e);
    }
}

#[test]
fn test_run_builtins() {
    if let Err(e) = run_test_case(&run_dir().join("builtins")) {
        panic!("{}", e);
    }
}

#[test]
fn test_plain_text_is_reproduced() {
    let source = fs::read_to_string(run_dir().join("plain_text/template.txt")).unwrap();
    let output = Template::compile(&source)
        .unwrap()
        .fill(&Default::default())
        .unwrap();
    assert_eq!(output, source);
}
