//! Single `lstat`-style observation of an entry, with platform-specific timestamps

use crate::models::Timestamps;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Error number stored when an I/O error carries no OS code.
pub const UNKNOWN_ERROR_CODE: i32 = -1;

/// Size and timestamps observed for one path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inspection {
    pub size: u64,
    pub timestamps: Timestamps,
}

/// Inspect `path` without following a trailing symlink.
pub fn inspect(path: &Path) -> io::Result<Inspection> {
    let metadata = fs::symlink_metadata(path)?;
    Ok(Inspection {
        size: metadata.len(),
        timestamps: timestamps_from_metadata(&metadata),
    })
}

/// Raw OS error number for `err`, used as a node's `capture_error`.
#[must_use]
pub fn error_code(err: &io::Error) -> i32 {
    err.raw_os_error().unwrap_or(UNKNOWN_ERROR_CODE)
}

/// Short label for an error, in the style of the errno name where it is common.
#[must_use]
pub fn error_label(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::NotFound => "ENOENT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::NotADirectory => "ENOTDIR",
        _ => "IO",
    }
}

#[cfg(unix)]
fn timestamps_from_metadata(metadata: &Metadata) -> Timestamps {
    Timestamps {
        accessed: metadata.atime(),
        modified: metadata.mtime(),
        changed: metadata.ctime(),
    }
}

/// Non-Unix platforms have no status-change time; creation time stands in.
#[cfg(not(unix))]
fn timestamps_from_metadata(metadata: &Metadata) -> Timestamps {
    use std::time::{SystemTime, UNIX_EPOCH};

    fn seconds(time: io::Result<SystemTime>) -> i64 {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .and_then(|d| i64::try_from(d.as_secs()).ok())
            .unwrap_or(0)
    }

    Timestamps {
        accessed: seconds(metadata.accessed()),
        modified: seconds(metadata.modified()),
        changed: seconds(metadata.created()),
    }
}
