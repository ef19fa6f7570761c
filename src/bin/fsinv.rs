//! Filesystem Inventory CLI (fsinv) - Main binary entry point

use fsinv::cli::args::{Command, QueryArgs, ScanArgs, parse_args};
use fsinv::cli::output::{format_json, format_text, format_visit};
use fsinv::io::query::{open_database, run_script, run_statement};
use fsinv::{NodeId, ScanOptions, SqliteStore};
use std::ffi::OsStr;
use std::io::{BufWriter, Read, Write};
use std::process;
use std::sync::Arc;

fn main() {
    // Initialize logger (controlled by RUST_LOG environment variable)
    // Example: RUST_LOG=debug fsinv scan /path --db tree.db
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_help();
        return;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help();
            return;
        }
        "--version" | "-v" => {
            print_version();
            return;
        }
        _ => {}
    }

    let cli_args = match parse_args(&args) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Use --help for usage information");
            process::exit(2);
        }
    };

    let exit_code = match &cli_args.command {
        Command::Scan(scan_args) => handle_scan(scan_args),
        Command::Query(query_args) => handle_query(query_args),
    };

    process::exit(exit_code);
}

fn exit_code_for(err: &fsinv::Error) -> i32 {
    match err {
        fsinv::Error::InvalidInput(_) => 2,
        _ => 4,
    }
}

fn handle_scan(args: &ScanArgs) -> i32 {
    let Some(db_path) = args.database.as_deref() else {
        eprintln!("Error: --db is required for scan command");
        eprintln!("Example: fsinv scan /usr --db usr.db");
        return 2;
    };

    let mut store = match SqliteStore::open(db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Could not open database {db_path}: {e}");
            return 4;
        }
    };

    let mut opts = ScanOptions {
        use_transaction: args.transaction,
        ..ScanOptions::default()
    };
    if let Some(max_depth) = args.max_depth {
        opts.max_depth = max_depth;
    }
    if let Some(chunk_size) = args.chunk_size {
        opts.chunk_size = chunk_size;
    }
    if !args.quiet {
        opts.visit_notifier = Some(Arc::new(|object_type, path| {
            eprintln!("{}", format_visit(object_type, path));
        }));
    }

    let root_name = args.name.as_deref().unwrap_or(&args.path);
    let parent = (args.parent != 0).then_some(NodeId(args.parent));

    let summary = match fsinv::scan_tree(
        &args.path,
        OsStr::new(root_name),
        parent,
        &mut store,
        &opts,
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {e}");
            return exit_code_for(&e);
        }
    };

    if args.json {
        println!("{}", format_json(&summary));
    } else if !args.quiet {
        eprint!("{}", format_text(&summary));
    }

    if summary.errors.is_empty() {
        0
    } else {
        3 // Completed, with per-entry failures recorded
    }
}

fn handle_query(args: &QueryArgs) -> i32 {
    let conn = match open_database(&args.database, args.foreign_keys) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("Error: Could not open database {}: {e}", args.database);
            return 4;
        }
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = if let Some(sql) = args.sql.as_deref() {
        run_statement(&conn, sql, &args.params, &mut out)
    } else {
        let mut script = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut script) {
            eprintln!("Error: An error occurred while reading from standard input: {e}");
            return 4;
        }
        run_script(&conn, &script, &mut out)
    };

    let flushed = out.flush();
    match (result, flushed) {
        (Ok(rows), Ok(())) => {
            log::debug!("query returned {rows} row(s)");
            0
        }
        (Err(e), _) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
        (Ok(_), Err(e)) => {
            eprintln!("Error: Could not write output: {e}");
            4
        }
    }
}

fn print_help() {
    println!("Filesystem Inventory CLI (fsinv) - Catalogue a directory tree with file digests");
    println!();
    println!("USAGE:");
    println!("    fsinv scan <PATH> --db <FILE> [OPTIONS]");
    println!("    fsinv query <FILE> [<SQL> [<PARAM>...]] [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    scan      Walk a directory and store every entry with MD5/SHA-1/SHA-256/SHA-512");
    println!("    query     Run SQL against a node database and print CSV");
    println!();
    println!("GLOBAL OPTIONS:");
    println!("    -h, --help                 Show this help message");
    println!("    -v, --version              Show version information");
    println!();
    println!("SCAN OPTIONS:");
    println!("    --db <FILE>               SQLite database receiving the nodes (required)");
    println!("    --name <NAME>             Name stored on the root node (default: PATH)");
    println!("    --parent <ID>             Attach the root beneath an existing node (0: none)");
    println!("    --transaction             Record the whole scan in a single transaction");
    println!("    --max-depth <N>           Directory nesting limit; deeper trees abort (default: 128)");
    println!("    --chunk-size <BYTES>      Read size used while hashing (default: 65536)");
    println!("    --json                    Print the scan summary as JSON");
    println!("    --quiet                   Suppress per-entry and summary output");
    println!();
    println!("QUERY OPTIONS:");
    println!("    --no-foreign-keys         Disable foreign key enforcement");
    println!("    Without <SQL>, statements are read from standard input.");
    println!();
    println!("EXAMPLES:");
    println!("    fsinv scan /home --db home.db --transaction --name home");
    println!("    fsinv query home.db \"SELECT name, hex(sha256) FROM nodes WHERE type = 8\"");
    println!("    fsinv query home.db \"SELECT * FROM nodes WHERE parent = ?1\" 1");
}

fn print_version() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_DATE: &str = env!("GIT_DATE");
    const BUILD_TARGET: &str = env!("BUILD_TARGET");

    println!("fsinv {VERSION}");
    println!("Commit: {GIT_HASH} ({GIT_DATE})");
    println!("Target: {BUILD_TARGET}");

    #[cfg(debug_assertions)]
    println!("Build: debug");
    #[cfg(not(debug_assertions))]
    println!("Build: release");
}
