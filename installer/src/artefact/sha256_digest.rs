//! SHA-256 digests for artifact verification.
//!
//! [`Sha256Digest`] holds a validated, lowercase hex digest.
//! [`HashingWriter`] computes one while a download is written to disk, so
//! the artifact is never buffered in memory.

use std::fmt;
use std::io::{self, Write};

use sha2::{Digest, Sha256};

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A hex digest string failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid SHA-256 digest: {reason}")]
pub struct DigestError {
    /// Description of the validation failure.
    pub reason: String,
}

/// A validated hex-encoded SHA-256 digest, normalised to lowercase.
///
/// # Examples
///
/// ```
/// use contrast_go_installer::artefact::sha256_digest::Sha256Digest;
///
/// let upper = "A".repeat(64);
/// let digest = Sha256Digest::try_from(upper.as_str()).unwrap();
/// assert_eq!(digest.as_str(), "a".repeat(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = DigestError;

    fn try_from(value: &str) -> Result<Self, DigestError> {
        let trimmed = value.trim();
        validate_sha256(trimmed)?;
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate that `value` is 64 hex digits of either case.
fn validate_sha256(value: &str) -> Result<(), DigestError> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(DigestError {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(DigestError {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}

/// A tee that forwards writes to `inner` while hashing them.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use contrast_go_installer::artefact::sha256_digest::HashingWriter;
///
/// let mut writer = HashingWriter::new(Vec::new());
/// writer.write_all(b"some data").unwrap();
/// assert_eq!(writer.bytes_written(), 9);
/// let (bytes, digest) = writer.finish();
/// assert_eq!(bytes, b"some data");
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug)]
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    bytes_written: u64,
}

impl<W: Write> HashingWriter<W> {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_written: 0,
        }
    }

    /// Number of bytes accepted by the inner writer so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Finalise the digest, returning the inner writer alongside it.
    #[must_use]
    pub fn finish(self) -> (W, Sha256Digest) {
        let hex = format!("{:x}", self.hasher.finalize());
        (self.inner, Sha256Digest(hex))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        let accepted = buf.get(..written).unwrap_or(buf);
        self.hasher.update(accepted);
        self.bytes_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
