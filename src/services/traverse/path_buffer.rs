//! Reusable path buffer shared by every entry of one traversal.

use std::ffi::OsStr;
use std::path::{MAIN_SEPARATOR, Path};

/// Absolute path of the entry being processed, grown and truncated in place.
///
/// Bytes are kept in the platform's OS string encoding. Only whole encoded
/// names and the ASCII separator are ever appended, and truncation only
/// happens at lengths previously returned by this buffer, so the contents
/// always remain a valid encoded OS string.
#[derive(Debug, Clone, Default)]
pub struct PathBuffer {
    bytes: Vec<u8>,
}

impl PathBuffer {
    /// Start from `root`, adding a trailing separator when it has none.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let mut bytes = root.as_os_str().as_encoded_bytes().to_vec();
        if !bytes.ends_with(&[MAIN_SEPARATOR as u8]) {
            bytes.push(MAIN_SEPARATOR as u8);
        }
        Self { bytes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Append an entry name and return the length to restore afterwards.
    pub fn push_name(&mut self, name: &OsStr) -> usize {
        let previous = self.bytes.len();
        self.bytes.extend_from_slice(name.as_encoded_bytes());
        previous
    }

    /// Append the separator that turns the current entry into a directory prefix.
    pub fn push_separator(&mut self) {
        self.bytes.push(MAIN_SEPARATOR as u8);
    }

    /// Restore the buffer to a length previously returned by [`Self::push_name`]
    /// or [`Self::len`].
    pub fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.bytes.len(), "path buffer can only shrink");
        self.bytes.truncate(len);
    }

    #[must_use]
    pub fn as_os_str(&self) -> &OsStr {
        // SAFETY: the buffer only ever holds a root path's encoded bytes,
        // whole encoded entry names and ASCII separators, truncated at
        // boundaries between those pieces.
        unsafe { OsStr::from_encoded_bytes_unchecked(&self.bytes) }
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_os_str())
    }
}
