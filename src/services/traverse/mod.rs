//! Explicit-stack tree walker that catalogues every entry into a node store.
//!
//! The walk is a single-threaded, non-recursive depth-first traversal. One
//! directory handle stays open per level of the current ancestor chain and at
//! most one file handle is open at any time. Invariants:
//!
//! - A node row is inserted before any row that names it as parent.
//! - Every name appended to the shared [`PathBuffer`] is removed again, either
//!   right after the entry is recorded or when the directory it opened is
//!   popped off the stack.
//! - Digests are stored for all four algorithms or for none of them.
//! - Failures on a single entry end up in that entry's row and in the
//!   collected [`ErrorItem`]s; only the conditions listed on [`Walker::run`]
//!   abort the walk.

pub mod path_buffer;
#[cfg(not(unix))]
pub mod portable;
#[cfg(unix)]
pub mod posix;

pub use path_buffer::PathBuffer;
#[cfg(not(unix))]
pub use portable::DirStream;
#[cfg(unix)]
pub use posix::DirStream;

use crate::models::{ErrorItem, NodeId, NodeRecord, ObjectType};
use crate::services::digest::digest_reader;
use crate::services::inspect::{Inspection, error_code, error_label, inspect};
use crate::services::store::NodeStore;
use crate::{Error, Result, ScanOptions};
use serde::Serialize;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io;
use std::path::Path;

/// One directory entry as reported by the directory stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: OsString,
    pub object_type: ObjectType,
}

/// Suspended state of a directory whose entries are not exhausted yet.
pub struct TraversalFrame {
    dir: DirStream,
    row: NodeId,
    path_len: usize,
}

/// What handling a single entry produced.
pub enum EntryOutcome {
    /// A row was stored without error.
    Recorded,
    /// A row was stored carrying a non-zero `capture_error`.
    RecordedWithError(i32),
    /// A directory row was stored and the directory must be walked next.
    Descend {
        frame: TraversalFrame,
        capture_error: i32,
    },
    /// `.` and `..`.
    Skipped,
    /// The store refused the row.
    NotRecorded,
}

/// Counters accumulated over one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    pub nodes: u64,
    pub directories: u64,
    pub files: u64,
    pub others: u64,
    /// Rows stored with a non-zero `capture_error`.
    pub entries_with_errors: u64,
    pub insert_failures: u64,
    pub read_dir_errors: u64,
    /// Deepest number of suspended frames seen.
    pub max_depth: usize,
}

impl WalkStats {
    fn count(&mut self, record: &NodeRecord<'_>) {
        self.nodes += 1;
        match record.object_type {
            ObjectType::Directory => self.directories += 1,
            ObjectType::RegularFile => self.files += 1,
            ObjectType::Other(_) => self.others += 1,
        }
    }

    fn tally(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::RecordedWithError(code)
            | EntryOutcome::Descend {
                capture_error: code,
                ..
            } if *code != 0 => self.entries_with_errors += 1,
            EntryOutcome::NotRecorded => self.insert_failures += 1,
            EntryOutcome::Recorded
            | EntryOutcome::RecordedWithError(_)
            | EntryOutcome::Descend { .. }
            | EntryOutcome::Skipped => {}
        }
    }
}

/// Walks one directory tree into a [`NodeStore`].
pub struct Walker<'o, S: NodeStore> {
    store: S,
    options: &'o ScanOptions,
    path: PathBuffer,
    stack: Vec<TraversalFrame>,
    chunk: Vec<u8>,
    stats: WalkStats,
    errors: Vec<ErrorItem>,
}

impl<'o, S: NodeStore> Walker<'o, S> {
    #[must_use]
    pub fn new(store: S, options: &'o ScanOptions) -> Self {
        Self {
            store,
            options,
            path: PathBuffer::default(),
            stack: Vec::new(),
            chunk: vec![0; options.chunk_size.max(1)],
            stats: WalkStats::default(),
            errors: Vec::new(),
        }
    }

    /// Walk `root`, storing it as `root_name` beneath `parent`, and return the
    /// id of the root row.
    ///
    /// # Errors
    /// Fails when the root directory cannot be opened, when the store rejects
    /// the root row, or when descending would exceed
    /// [`ScanOptions::max_depth`]. Everything else is recorded per entry.
    pub fn run(&mut self, root: &Path, root_name: &OsStr, parent: Option<NodeId>) -> Result<NodeId> {
        let dir = DirStream::open(root).map_err(|source| Error::RootInaccessible {
            path: root.to_string_lossy().to_string(),
            source,
        })?;

        let (inspection, capture_error) = match inspect(root) {
            Ok(inspection) => (inspection, 0),
            Err(err) => {
                self.errors
                    .push(describe_failure(root, "Could not stat root directory", &err));
                (Inspection::default(), error_code(&err))
            }
        };

        let record = NodeRecord {
            parent,
            object_type: ObjectType::Directory,
            name: root_name,
            size: 0,
            timestamps: inspection.timestamps,
            capture_error,
            digests: None,
        };
        let root_id = self
            .store
            .insert_node(&record)
            .map_err(|source| Error::Store {
                context: "Could not add root node".to_string(),
                source,
            })?;
        self.stats.count(&record);
        if capture_error != 0 {
            self.stats.entries_with_errors += 1;
        }

        log::info!("Scanning {} as node {root_id}", root.display());

        self.path = PathBuffer::new(root);
        let mut current = TraversalFrame {
            dir,
            row: root_id,
            path_len: self.path.len(),
        };

        loop {
            match current.dir.next_entry() {
                Some(Ok(entry)) => {
                    let outcome = self.dispatch(&entry, current.row);
                    self.stats.tally(&outcome);
                    if let EntryOutcome::Descend { frame, .. } = outcome {
                        if self.stack.len() >= self.options.max_depth {
                            return Err(Error::DepthExceeded {
                                limit: self.options.max_depth,
                                path: self.path.as_path().to_string_lossy().to_string(),
                            });
                        }
                        self.stack.push(std::mem::replace(&mut current, frame));
                        self.stats.max_depth = self.stats.max_depth.max(self.stack.len());
                    }
                    continue;
                }
                Some(Err(err)) => {
                    self.stats.read_dir_errors += 1;
                    let item = describe_failure(
                        self.path.as_path(),
                        "An error occurred while reading the directory",
                        &err,
                    );
                    self.errors.push(item);
                }
                None => {}
            }

            // Exhausted (or unreadable): close it and resume the parent.
            match self.stack.pop() {
                Some(parent_frame) => {
                    self.path.truncate(parent_frame.path_len);
                    current = parent_frame;
                }
                None => break,
            }
        }

        log::info!(
            "Finished {}: {} nodes, {} with errors",
            root.display(),
            self.stats.nodes,
            self.stats.entries_with_errors
        );

        Ok(root_id)
    }

    /// Consume the walker, returning its counters and collected errors.
    #[must_use]
    pub fn finish(self) -> (WalkStats, Vec<ErrorItem>) {
        (self.stats, self.errors)
    }

    fn dispatch(&mut self, entry: &RawEntry, parent: NodeId) -> EntryOutcome {
        if entry.name == "." || entry.name == ".." {
            return EntryOutcome::Skipped;
        }

        let mark = self.path.push_name(&entry.name);
        log::debug!("{} {}", entry.object_type.marker(), self.path.as_path().display());
        if let Some(notifier) = &self.options.visit_notifier {
            notifier(entry.object_type, self.path.as_path());
        }

        let outcome = match entry.object_type {
            ObjectType::Directory => self.handle_directory(&entry.name, parent),
            ObjectType::RegularFile => self.handle_file(&entry.name, parent),
            other => self.handle_other(&entry.name, parent, other),
        };

        if !matches!(outcome, EntryOutcome::Descend { .. }) {
            self.path.truncate(mark);
        }
        outcome
    }

    fn handle_directory(&mut self, name: &OsStr, parent: NodeId) -> EntryOutcome {
        let (inspection, stat_error) = self.inspect_current("Could not stat directory");

        let opened = DirStream::open(self.path.as_path());
        let capture_error = match &opened {
            Ok(_) => stat_error,
            Err(err) => {
                self.note_failure("Could not open directory", err);
                error_code(err)
            }
        };

        let record = NodeRecord {
            parent: Some(parent),
            object_type: ObjectType::Directory,
            name,
            size: 0,
            timestamps: inspection.timestamps,
            capture_error,
            digests: None,
        };
        let Some(row) = self.insert(&record) else {
            return EntryOutcome::NotRecorded;
        };

        match opened {
            Ok(dir) => {
                self.path.push_separator();
                EntryOutcome::Descend {
                    frame: TraversalFrame {
                        dir,
                        row,
                        path_len: self.path.len(),
                    },
                    capture_error,
                }
            }
            Err(_) => EntryOutcome::RecordedWithError(capture_error),
        }
    }

    fn handle_file(&mut self, name: &OsStr, parent: NodeId) -> EntryOutcome {
        let (inspection, stat_error) = self.inspect_current("Could not stat file");

        let (digests, io_error) = match File::open(self.path.as_path()) {
            Ok(file) => {
                let result = digest_reader(&file, &mut self.chunk);
                drop(file);
                match result {
                    Ok(digests) => (Some(digests), 0),
                    Err(err) => {
                        self.note_failure("An error occurred while reading the file", &err);
                        (None, error_code(&err))
                    }
                }
            }
            Err(err) => {
                self.note_failure("Could not open file", &err);
                (None, error_code(&err))
            }
        };

        let capture_error = if io_error != 0 { io_error } else { stat_error };
        let record = NodeRecord {
            parent: Some(parent),
            object_type: ObjectType::RegularFile,
            name,
            size: inspection.size,
            timestamps: inspection.timestamps,
            capture_error,
            digests,
        };
        self.record_outcome(&record)
    }

    /// Symlinks, devices, sockets and FIFOs are recorded by type only.
    fn handle_other(&mut self, name: &OsStr, parent: NodeId, object_type: ObjectType) -> EntryOutcome {
        let record = NodeRecord {
            parent: Some(parent),
            object_type,
            name,
            size: 0,
            timestamps: Default::default(),
            capture_error: 0,
            digests: None,
        };
        self.record_outcome(&record)
    }

    fn record_outcome(&mut self, record: &NodeRecord<'_>) -> EntryOutcome {
        match self.insert(record) {
            None => EntryOutcome::NotRecorded,
            Some(_) if record.capture_error != 0 => {
                EntryOutcome::RecordedWithError(record.capture_error)
            }
            Some(_) => EntryOutcome::Recorded,
        }
    }

    fn insert(&mut self, record: &NodeRecord<'_>) -> Option<NodeId> {
        match self.store.insert_node(record) {
            Ok(id) => {
                self.stats.count(record);
                Some(id)
            }
            Err(err) => {
                self.note_failure("Could not insert node", &err);
                None
            }
        }
    }

    /// Best-effort stat of the current path; zero-filled on failure.
    fn inspect_current(&mut self, what: &str) -> (Inspection, i32) {
        match inspect(self.path.as_path()) {
            Ok(inspection) => (inspection, 0),
            Err(err) => {
                self.note_failure(what, &err);
                (Inspection::default(), error_code(&err))
            }
        }
    }

    fn note_failure(&mut self, what: &str, err: &io::Error) {
        let item = describe_failure(self.path.as_path(), what, err);
        self.errors.push(item);
    }
}

fn describe_failure(path: &Path, what: &str, err: &io::Error) -> ErrorItem {
    log::warn!("{what}: {}: {err}", path.display());
    ErrorItem {
        path: path.to_string_lossy().to_string(),
        code: error_label(err).to_string(),
        message: format!("{what}: {err}"),
    }
}
