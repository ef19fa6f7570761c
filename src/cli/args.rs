//! CLI argument parsing

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
}

#[derive(Debug, Clone)]
pub enum Command {
    Scan(ScanArgs),
    Query(QueryArgs),
}

#[derive(Debug, Clone)]
pub struct ScanArgs {
    pub path: String,
    pub database: Option<String>,
    /// Name stored on the root node; defaults to the path as given.
    pub name: Option<String>,
    /// Existing node to attach the scan root to; 0 means none.
    pub parent: i64,
    pub transaction: bool,
    pub max_depth: Option<usize>,
    pub chunk_size: Option<usize>,
    pub quiet: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct QueryArgs {
    pub database: String,
    /// Statement to run; the SQL is read from standard input when absent.
    pub sql: Option<String>,
    pub params: Vec<String>,
    pub foreign_keys: bool,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            path: String::new(),
            database: None,
            name: None,
            parent: 0,
            transaction: false,
            max_depth: None,
            chunk_size: None,
            quiet: false,
            json: false,
        }
    }
}

/// Parse command line arguments
pub fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    let command = match args[1].as_str() {
        "scan" => {
            let scan_args = parse_scan_args(&args[2..])?;
            Command::Scan(scan_args)
        }
        "query" => {
            let query_args = parse_query_args(&args[2..])?;
            Command::Query(query_args)
        }
        _ => return Err(format!("Unknown command: {}", args[1])),
    };

    Ok(CliArgs { command })
}

fn take_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires {what}", args[*i - 1]))
}

fn parse_scan_args(args: &[String]) -> Result<ScanArgs, String> {
    let mut scan_args = ScanArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "--db" | "--database" => {
                scan_args.database = Some(take_value(args, &mut i, "a file path")?.to_string());
            }
            "--name" => {
                scan_args.name = Some(take_value(args, &mut i, "a value")?.to_string());
            }
            "--parent" => {
                let value = take_value(args, &mut i, "a node id")?;
                let parent: i64 = value
                    .parse()
                    .map_err(|_| "--parent must be a node id".to_string())?;
                if parent < 0 {
                    return Err("--parent must not be negative".to_string());
                }
                scan_args.parent = parent;
            }
            "--transaction" => {
                scan_args.transaction = true;
            }
            "--max-depth" => {
                let value = take_value(args, &mut i, "a value")?;
                scan_args.max_depth = Some(
                    value
                        .parse()
                        .map_err(|_| "--max-depth must be a number".to_string())?,
                );
            }
            "--chunk-size" => {
                let value = take_value(args, &mut i, "a value")?;
                let size: usize = value
                    .parse()
                    .map_err(|_| "--chunk-size must be a positive integer".to_string())?;
                if size == 0 {
                    return Err("--chunk-size must be greater than zero".to_string());
                }
                scan_args.chunk_size = Some(size);
            }
            "--quiet" => {
                scan_args.quiet = true;
            }
            "--json" => {
                scan_args.json = true;
            }
            arg if !arg.starts_with("--") => {
                if scan_args.path.is_empty() {
                    scan_args.path = arg.to_string();
                } else {
                    return Err(format!("Unexpected argument: {arg}"));
                }
            }
            _ => return Err(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    if scan_args.path.is_empty() {
        return Err("Missing required argument: PATH".to_string());
    }

    Ok(scan_args)
}

fn parse_query_args(args: &[String]) -> Result<QueryArgs, String> {
    let mut positional = Vec::new();
    let mut foreign_keys = true;

    for arg in args {
        match arg.as_str() {
            "--no-foreign-keys" => foreign_keys = false,
            "--foreign-keys" => foreign_keys = true,
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let database = positional
        .next()
        .ok_or_else(|| "Missing required argument: DATABASE".to_string())?;
    let sql = positional.next();
    let params = positional.collect();

    Ok(QueryArgs {
        database,
        sql,
        params,
        foreign_keys,
    })
}
