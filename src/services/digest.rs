//! Streaming multi-algorithm content hashing

use crate::models::Digests;
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::io::{self, Read};

/// Default read chunk used when hashing file contents.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// MD5, SHA-1, SHA-256 and SHA-512 accumulators fed in lockstep.
#[derive(Clone, Default)]
pub struct MultiHasher {
    md5: Md5,
    sha1: Sha1,
    sha256: Sha256,
    sha512: Sha512,
}

impl MultiHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.md5.update(chunk);
        self.sha1.update(chunk);
        self.sha256.update(chunk);
        self.sha512.update(chunk);
    }

    #[must_use]
    pub fn finalize(self) -> Digests {
        let mut digests = Digests {
            md5: [0; 16],
            sha1: [0; 20],
            sha256: [0; 32],
            sha512: [0; 64],
        };
        digests.md5.copy_from_slice(&self.md5.finalize());
        digests.sha1.copy_from_slice(&self.sha1.finalize());
        digests.sha256.copy_from_slice(&self.sha256.finalize());
        digests.sha512.copy_from_slice(&self.sha512.finalize());
        digests
    }
}

/// Hash everything `reader` yields, `chunk.len()` bytes at a time.
///
/// A read error discards all four accumulators and is returned as-is; the
/// caller never sees digests of a partially read stream.
pub fn digest_reader<R: Read>(mut reader: R, chunk: &mut [u8]) -> io::Result<Digests> {
    if chunk.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "digest chunk buffer must not be empty",
        ));
    }

    let mut hasher = MultiHasher::new();
    loop {
        match reader.read(chunk) {
            Ok(0) => return Ok(hasher.finalize()),
            Ok(n) => hasher.update(&chunk[..n]),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
}

/// Digests of an in-memory byte slice.
#[must_use]
pub fn digest_bytes(bytes: &[u8]) -> Digests {
    let mut hasher = MultiHasher::new();
    hasher.update(bytes);
    hasher.finalize()
}
