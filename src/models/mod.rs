//! Data models for catalogued nodes, digests, and per-entry errors

use serde::{Deserialize, Serialize};
use std::ffi::{OsStr, OsString};
use std::fmt;

/// Identifier assigned by a store when a node row is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Directory entry type codes as reported by `readdir`.
pub mod type_code {
    pub const UNKNOWN: u8 = 0;
    pub const FIFO: u8 = 1;
    pub const CHAR_DEVICE: u8 = 2;
    pub const DIRECTORY: u8 = 4;
    pub const BLOCK_DEVICE: u8 = 6;
    pub const REGULAR_FILE: u8 = 8;
    pub const SYMLINK: u8 = 10;
    pub const SOCKET: u8 = 12;
}

/// Kind of filesystem object a node represents.
///
/// Anything that is neither a directory nor a regular file keeps its raw
/// dirent type code so the catalogue can still tell symlinks, devices,
/// sockets and FIFOs apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Directory,
    RegularFile,
    Other(u8),
}

impl ObjectType {
    /// Integer persisted in the `type` column.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            ObjectType::Directory => type_code::DIRECTORY,
            ObjectType::RegularFile => type_code::REGULAR_FILE,
            ObjectType::Other(code) => code,
        }
    }

    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            type_code::DIRECTORY => ObjectType::Directory,
            type_code::REGULAR_FILE => ObjectType::RegularFile,
            other => ObjectType::Other(other),
        }
    }

    /// Marker printed in front of a visited path.
    #[must_use]
    pub fn marker(self) -> String {
        match self {
            ObjectType::Directory => "D".to_string(),
            ObjectType::RegularFile => "F".to_string(),
            ObjectType::Other(code) => code.to_string(),
        }
    }
}

/// Access, modification and status-change instants in seconds since the epoch.
///
/// The default value is the zero sentinel stored when an object could not be
/// inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamps {
    pub accessed: i64,
    pub modified: i64,
    pub changed: i64,
}

impl Timestamps {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// The four content digests of a regular file.
///
/// Nodes carry `Option<Digests>`, so a partial set cannot be represented.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digests {
    pub md5: [u8; 16],
    pub sha1: [u8; 20],
    pub sha256: [u8; 32],
    pub sha512: [u8; 64],
}

impl fmt::Debug for Digests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Digests")
            .field("md5", &hex::encode(self.md5))
            .field("sha1", &hex::encode(self.sha1))
            .field("sha256", &hex::encode(self.sha256))
            .field("sha512", &hex::encode(self.sha512))
            .finish()
    }
}

/// Row description handed to a store; everything but the assigned id.
#[derive(Debug, Clone, Copy)]
pub struct NodeRecord<'a> {
    pub parent: Option<NodeId>,
    pub object_type: ObjectType,
    pub name: &'a OsStr,
    pub size: u64,
    pub timestamps: Timestamps,
    /// OS error number observed while processing the entry, 0 when none.
    pub capture_error: i32,
    pub digests: Option<Digests>,
}

/// A stored node: a record plus the id the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub object_type: ObjectType,
    pub name: OsString,
    pub size: u64,
    pub timestamps: Timestamps,
    pub capture_error: i32,
    pub digests: Option<Digests>,
}

impl Node {
    #[must_use]
    pub fn from_record(id: NodeId, record: &NodeRecord<'_>) -> Self {
        Self {
            id,
            parent: record.parent,
            object_type: record.object_type,
            name: record.name.to_os_string(),
            size: record.size,
            timestamps: record.timestamps,
            capture_error: record.capture_error,
            digests: record.digests,
        }
    }
}

/// Represents an error encountered during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}
