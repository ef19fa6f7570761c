//! Unit tests for CLI argument parsing

use fsinv::cli::args::{Command, parse_args};

fn make_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_scan_defaults() {
    let parsed = parse_args(&make_args(&["fsinv", "scan", "/data", "--db", "d.db"])).unwrap();
    let Command::Scan(scan) = parsed.command else {
        panic!("expected scan command");
    };

    assert_eq!(scan.path, "/data");
    assert_eq!(scan.database.as_deref(), Some("d.db"));
    assert_eq!(scan.name, None);
    assert_eq!(scan.parent, 0);
    assert!(!scan.transaction);
    assert_eq!(scan.max_depth, None);
    assert_eq!(scan.chunk_size, None);
    assert!(!scan.quiet);
    assert!(!scan.json);
}

#[test]
fn test_scan_all_options() {
    let parsed = parse_args(&make_args(&[
        "fsinv",
        "scan",
        "--database",
        "d.db",
        "/data",
        "--name",
        "home",
        "--parent",
        "12",
        "--transaction",
        "--max-depth",
        "16",
        "--chunk-size",
        "4096",
        "--quiet",
        "--json",
    ]))
    .unwrap();
    let Command::Scan(scan) = parsed.command else {
        panic!("expected scan command");
    };

    assert_eq!(scan.path, "/data");
    assert_eq!(scan.name.as_deref(), Some("home"));
    assert_eq!(scan.parent, 12);
    assert!(scan.transaction);
    assert_eq!(scan.max_depth, Some(16));
    assert_eq!(scan.chunk_size, Some(4096));
    assert!(scan.quiet);
    assert!(scan.json);
}

#[test]
fn test_scan_rejects_bad_values() {
    for bad in [
        &["fsinv", "scan", "/data", "--parent", "-1"][..],
        &["fsinv", "scan", "/data", "--parent", "abc"],
        &["fsinv", "scan", "/data", "--max-depth", "deep"],
        &["fsinv", "scan", "/data", "--chunk-size", "0"],
        &["fsinv", "scan", "/data", "/other"],
        &["fsinv", "scan"],
    ] {
        assert!(parse_args(&make_args(bad)).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn test_query_positionals() {
    let parsed = parse_args(&make_args(&[
        "fsinv",
        "query",
        "d.db",
        "SELECT * FROM nodes WHERE parent = ?1 AND type = ?2",
        "1",
        "8",
    ]))
    .unwrap();
    let Command::Query(query) = parsed.command else {
        panic!("expected query command");
    };

    assert_eq!(query.database, "d.db");
    assert!(query.sql.as_deref().unwrap().starts_with("SELECT"));
    assert_eq!(query.params, vec!["1".to_string(), "8".to_string()]);
    assert!(query.foreign_keys);
}

#[test]
fn test_query_reads_stdin_without_sql() {
    let parsed = parse_args(&make_args(&["fsinv", "query", "d.db", "--no-foreign-keys"])).unwrap();
    let Command::Query(query) = parsed.command else {
        panic!("expected query command");
    };

    assert_eq!(query.sql, None);
    assert!(query.params.is_empty());
    assert!(!query.foreign_keys);
}

#[test]
fn test_unknown_command() {
    let err = parse_args(&make_args(&["fsinv", "list"])).unwrap_err();
    assert_eq!(err, "Unknown command: list");
}
