//! Directory streams built on `std::fs::read_dir` for platforms without `rustix`.

use super::RawEntry;
use crate::models::{ObjectType, type_code};
use std::fs::{self, ReadDir};
use std::io;
use std::path::Path;

pub struct DirStream {
    entries: ReadDir,
}

impl DirStream {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self {
            entries: fs::read_dir(path)?,
        })
    }

    /// Next entry, `None` once the directory is exhausted.
    pub fn next_entry(&mut self) -> Option<io::Result<RawEntry>> {
        let entry = match self.entries.next()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(err)),
        };

        let object_type = match entry.file_type() {
            Ok(ft) if ft.is_dir() => ObjectType::Directory,
            Ok(ft) if ft.is_file() => ObjectType::RegularFile,
            Ok(ft) if ft.is_symlink() => ObjectType::Other(type_code::SYMLINK),
            Ok(_) | Err(_) => ObjectType::Other(type_code::UNKNOWN),
        };

        Some(Ok(RawEntry {
            name: entry.file_name(),
            object_type,
        }))
    }
}
