//! Runs the fixture suite under conformance/.
//!
//! positive/*.gxl must parse, and re-parsing the printed tree must give the
//! same tree. negative/*.gxl must fail with the kind and position recorded
//! in the sibling `.expected-error.json`.

use std::path::{Path, PathBuf};

use gxl_core::testing::assert_same_tree;
use gxl_core::{parse, print, PrintOptions};

fn conformance_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../conformance")
}

fn collect_gxl_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", dir.display(), e))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |e| e == "gxl"))
        .collect();
    paths.sort();
    paths
}

#[test]
fn positive_fixtures_parse_and_round_trip() {
    let files = collect_gxl_files(&conformance_root().join("positive"));
    assert!(!files.is_empty(), "no positive fixtures found");

    let mut failures = Vec::new();
    for path in &files {
        let src = std::fs::read_to_string(path).unwrap();
        let tree = match parse(&src) {
            Ok(tree) => tree,
            Err(e) => {
                failures.push(format!("{}: {}", path.display(), e));
                continue;
            }
        };
        let printed = print(&tree, &PrintOptions::default());
        match parse(&printed) {
            Ok(reparsed) => assert_same_tree(&tree, &reparsed),
            Err(e) => failures.push(format!(
                "{}: printed form does not parse: {}\n{}",
                path.display(),
                e,
                printed
            )),
        }
    }
    assert!(
        failures.is_empty(),
        "{} of {} positive fixtures failed:\n{}",
        failures.len(),
        files.len(),
        failures.join("\n")
    );
}

#[test]
fn negative_fixtures_fail_where_expected() {
    let files = collect_gxl_files(&conformance_root().join("negative"));
    assert!(!files.is_empty(), "no negative fixtures found");

    let mut failures = Vec::new();
    for path in &files {
        let src = std::fs::read_to_string(path).unwrap();
        let expected_path = path.with_extension("expected-error.json");
        let expected: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                panic!("Missing {}: {}", expected_path.display(), e)
            }))
            .unwrap();

        let err = match parse(&src) {
            Ok(_) => {
                failures.push(format!("{}: parsed but should have failed", path.display()));
                continue;
            }
            Err(e) => e.to_json_value(),
        };
        for field in ["kind", "line", "column"] {
            if err[field] != expected[field] {
                failures.push(format!(
                    "{}: {} is {} but expected {} ({})",
                    path.display(),
                    field,
                    err[field],
                    expected[field],
                    err["message"]
                ));
            }
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn full_project_fixture_shape() {
    let src =
        std::fs::read_to_string(conformance_root().join("positive/full_project.gxl")).unwrap();
    let file = parse(&src).unwrap();
    assert_eq!(file.extern_modules().count(), 1);
    let main = file.modules().next().unwrap();
    assert_eq!(main.name.name, "main");
    assert_eq!(main.annotations.len(), 2);
    assert_eq!(main.items.len(), 9);
}
