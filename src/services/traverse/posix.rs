//! POSIX directory streams leveraging `rustix` primitives.
//!
//! Entry types come straight from the dirent, so dispatching an entry never
//! costs a `stat` call.

use super::RawEntry;
use crate::models::{ObjectType, type_code};
use rustix::fs::{self as rfs, Dir, FileType, Mode, OFlags};
use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// An open directory handle yielding entries in `readdir` order.
pub struct DirStream {
    dir: Dir,
}

impl DirStream {
    pub fn open(path: &Path) -> io::Result<Self> {
        let fd = rfs::openat(
            rfs::CWD,
            path,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
            Mode::empty(),
        )?;
        let dir = Dir::read_from(&fd)?;
        Ok(Self { dir })
    }

    /// Next entry, `None` once the directory is exhausted.
    pub fn next_entry(&mut self) -> Option<io::Result<RawEntry>> {
        let entry = match self.dir.read()? {
            Ok(entry) => entry,
            Err(err) => return Some(Err(err.into())),
        };

        Some(Ok(RawEntry {
            name: OsStr::from_bytes(entry.file_name().to_bytes()).to_os_string(),
            object_type: object_type_of(entry.file_type()),
        }))
    }
}

fn object_type_of(file_type: FileType) -> ObjectType {
    match file_type {
        FileType::Directory => ObjectType::Directory,
        FileType::RegularFile => ObjectType::RegularFile,
        FileType::Symlink => ObjectType::Other(type_code::SYMLINK),
        FileType::Fifo => ObjectType::Other(type_code::FIFO),
        FileType::Socket => ObjectType::Other(type_code::SOCKET),
        FileType::CharacterDevice => ObjectType::Other(type_code::CHAR_DEVICE),
        FileType::BlockDevice => ObjectType::Other(type_code::BLOCK_DEVICE),
        _ => ObjectType::Other(type_code::UNKNOWN),
    }
}
