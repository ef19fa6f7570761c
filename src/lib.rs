//! Filesystem Inventory Library
//!
//! This library walks a directory tree and records every filesystem object as
//! a row in a node store, with MD5, SHA-1, SHA-256 and SHA-512 digests of
//! every regular file and explicit parent/child linkage. The SQLite store
//! makes the result queryable; the query module reads it back as CSV.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{Digests, ErrorItem, Node, NodeId, NodeRecord, ObjectType, Timestamps};
pub use services::store::NodeStore;
pub use services::store::memory::MemoryStore;
pub use services::store::sqlite::SqliteStore;
pub use services::traverse::{WalkStats, Walker};

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::result;
use std::sync::Arc;
use std::time::SystemTime;

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    /// The scan root exists but could not be opened as a directory.
    RootInaccessible {
        path: String,
        source: std::io::Error,
    },
    /// Descending further would exceed the configured stack depth.
    DepthExceeded { limit: usize, path: String },
    /// A node store refused a structural operation.
    Store {
        context: String,
        source: std::io::Error,
    },
    Database(rusqlite::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::RootInaccessible { path, source } => {
                write!(f, "Could not open main directory {path}: {source}")
            }
            Error::DepthExceeded { limit, path } => {
                write!(f, "Maximum directory depth {limit} exceeded at {path}")
            }
            Error::Store { context, source } => write!(f, "{context}: {source}"),
            Error::Database(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e)
            | Error::RootInaccessible { source: e, .. }
            | Error::Store { source: e, .. } => Some(e),
            Error::Database(e) => Some(e),
            Error::InvalidInput(_) | Error::DepthExceeded { .. } => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Callback invoked with every entry the walker dispatches.
pub type VisitNotifier = Arc<dyn Fn(ObjectType, &Path) + Send + Sync>;

/// Default bound on nested directory levels below the root.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for scanning a directory
#[derive(Clone)]
pub struct ScanOptions {
    /// Bracket the whole walk in one store scope (a single transaction).
    pub use_transaction: bool,
    /// Maximum number of directory levels below the root that may be
    /// descended into; going deeper aborts the scan.
    pub max_depth: usize,
    /// Read size used while hashing file contents.
    pub chunk_size: usize,
    pub visit_notifier: Option<VisitNotifier>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            use_transaction: false,
            max_depth: DEFAULT_MAX_DEPTH,
            chunk_size: services::digest::DEFAULT_CHUNK_SIZE,
            visit_notifier: None,
        }
    }
}

impl fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanOptions")
            .field("use_transaction", &self.use_transaction)
            .field("max_depth", &self.max_depth)
            .field("chunk_size", &self.chunk_size)
            .field("visit_notifier", &self.visit_notifier.is_some())
            .finish()
    }
}

/// Summary result from a scan operation
#[derive(Debug)]
pub struct Summary {
    pub root: String,
    pub root_id: NodeId,
    pub stats: WalkStats,
    pub errors: Vec<ErrorItem>,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
}

/// Scan a directory into a node store and return a summary
///
/// # Arguments
/// * `root` - The directory to scan
/// * `root_name` - Name stored on the root node
/// * `parent` - Existing node to attach the root beneath, if any
/// * `store` - Destination for the node rows
/// * `opts` - Scan options
///
/// # Returns
/// A Summary with the root node id, counters, and per-entry errors
pub fn scan_tree<P, S>(
    root: P,
    root_name: &OsStr,
    parent: Option<NodeId>,
    store: &mut S,
    opts: &ScanOptions,
) -> Result<Summary>
where
    P: AsRef<Path>,
    S: NodeStore + ?Sized,
{
    let root = root.as_ref();
    let root_path = root.to_string_lossy().to_string();

    // Anything other than a missing path or a non-directory is left to the
    // walker, which reports it as an inaccessible root.
    match std::fs::metadata(root) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::InvalidInput(format!(
                "Path does not exist: {root_path}"
            )));
        }
        Ok(metadata) if !metadata.is_dir() => {
            return Err(Error::InvalidInput(format!(
                "Path is not a directory: {root_path}"
            )));
        }
        Ok(_) | Err(_) => {}
    }

    if opts.chunk_size == 0 {
        return Err(Error::InvalidInput(
            "chunk size must be greater than zero".to_string(),
        ));
    }

    let started_at = SystemTime::now();

    if opts.use_transaction {
        store.begin_scope().map_err(|source| Error::Store {
            context: "Could not begin transaction".to_string(),
            source,
        })?;
    }

    let mut walker = Walker::new(&mut *store, opts);
    let root_id = walker.run(root, root_name, parent)?;
    let (stats, errors) = walker.finish();

    if opts.use_transaction {
        store.commit_scope().map_err(|source| Error::Store {
            context: "Could not commit transaction".to_string(),
            source,
        })?;
    }

    Ok(Summary {
        root: root_path,
        root_id,
        stats,
        errors,
        started_at,
        finished_at: SystemTime::now(),
    })
}
