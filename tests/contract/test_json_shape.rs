//! Contract test for JSON output shape

use crate::fixtures::{create_scenario_tree, scan_into_memory};
use fsinv::ScanOptions;
use fsinv::cli::output::{format_json, format_text};
use tempfile::TempDir;

#[test]
fn test_json_output_fields() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();

    let (summary, _) = scan_into_memory(&root, &ScanOptions::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&format_json(&summary)).unwrap();

    assert_eq!(json["root"], summary.root.as_str());
    assert_eq!(summary.root, root.to_string_lossy());
    assert_eq!(json["root_id"], summary.root_id.0);
    assert!(json["started_at"].as_f64().unwrap() > 0.0);
    assert!(json["finished_at"].as_f64().unwrap() >= json["started_at"].as_f64().unwrap());
    assert_eq!(json["error_count"], 0);
    assert!(json["errors"].is_null());

    let stats = &json["stats"];
    for field in [
        "nodes",
        "directories",
        "files",
        "others",
        "entries_with_errors",
        "insert_failures",
        "read_dir_errors",
        "max_depth",
    ] {
        assert!(stats.get(field).is_some(), "stats.{field} missing");
    }
    assert_eq!(stats["files"], 2);
}

#[test]
fn test_text_output_names_root_and_counts() {
    let temp_dir = TempDir::new().unwrap();
    let root = create_scenario_tree(temp_dir.path()).unwrap();

    let (summary, _) = scan_into_memory(&root, &ScanOptions::default()).unwrap();
    let text = format_text(&summary);

    assert!(text.starts_with(&format!("{} -> node {}", summary.root, summary.root_id)));
    assert!(text.contains("4 nodes: 2 directories, 2 files, 0 other"));
    assert!(!text.contains("Errors encountered"));
}

#[test]
fn test_errors_serialize_with_path_code_and_message() {
    let item = fsinv::ErrorItem {
        path: "/r/a".to_string(),
        code: "EACCES".to_string(),
        message: "Could not open directory: Permission denied".to_string(),
    };

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["path"], "/r/a");
    assert_eq!(json["code"], "EACCES");
    assert!(json["message"].as_str().unwrap().starts_with("Could not open directory"));
}
