use std::fmt;
use std::io::Read;

use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

/// Content-derived cache key for an uploaded document.
///
/// Two byte-identical uploads always produce the same fingerprint, across
/// calls and across process restarts, so the digest is safe to use as an
/// on-disk directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex_digest(&hasher.finalize()))
    }

    /// Hashes a snapshot read from `reader`. The reader is consumed to EOF;
    /// callers holding a seekable stream rewind it themselves afterwards.
    pub fn from_reader(mut reader: impl Read) -> CoreResult<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];

        loop {
            let read = reader.read(&mut buf).map_err(CoreError::fingerprint)?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }

        Ok(Self(hex_digest(&hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn hex_digest(digest: &[u8]) -> String {
    use fmt::Write;

    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(out, "{byte:02x}").expect("writing to a String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Fingerprint;

    #[test]
    fn fingerprint_is_deterministic_across_calls() {
        let first = Fingerprint::of_bytes(b"%PDF-1.4 sample");
        let second = Fingerprint::of_bytes(b"%PDF-1.4 sample");
        assert_eq!(first, second);
    }

    #[test]
    fn fingerprint_differs_for_different_bytes() {
        let a = Fingerprint::of_bytes(b"document a");
        let b = Fingerprint::of_bytes(b"document b");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_matches_known_sha256_vector() {
        let empty = Fingerprint::of_bytes(b"");
        assert_eq!(
            empty.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reader_and_byte_fingerprints_agree() {
        let bytes = vec![0xABu8; 200_000];
        let from_bytes = Fingerprint::of_bytes(&bytes);
        let from_reader = Fingerprint::from_reader(Cursor::new(&bytes))
            .expect("in-memory reader should not fail");
        assert_eq!(from_bytes, from_reader);
    }

    #[test]
    fn failing_reader_maps_to_fingerprint_error() {
        struct BrokenReader;

        impl std::io::Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "stream went away",
                ))
            }
        }

        let err = Fingerprint::from_reader(BrokenReader).expect_err("read should fail");
        assert!(matches!(err, crate::error::CoreError::Fingerprint { .. }));
    }
}
