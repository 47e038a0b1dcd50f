//! Error types for the contrast-go installer.
//!
//! Each variant carries enough context to tell the user what to do next:
//! the valid alternatives for a bad request, PATH advice for an install
//! that cannot be invoked, or a documentation link as a last resort.

use std::fmt;
use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::artefact::download::TransportError;
use crate::artefact::sha256_digest::DigestError;
use crate::version::VersionList;

/// Release notes and archive of every published version.
pub const RELEASE_ARCHIVE_URL: &str =
    "https://docs.contrastsecurity.com/en/go-agent-release-notes-and-archive.html";

/// Supported operating systems and architectures.
pub const SYSTEM_REQUIREMENTS_URL: &str =
    "https://docs.contrastsecurity.com/en/go-system-requirements.html";

/// Manual installation instructions.
pub const MANUAL_INSTALL_URL: &str = "https://docs.contrastsecurity.com/en/install-go.html";

/// Errors that can occur while installing contrast-go.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The requested version does not exist; the repository listed others.
    #[error(
        "Version {requested:?} does not exist. Available versions include\n\t{available}\n\
         For a full list of versions, see\n\t{archive}",
        archive = RELEASE_ARCHIVE_URL
    )]
    BadVersion {
        /// Versions offered by the repository.
        available: VersionList,
        /// The version the caller asked for.
        requested: String,
    },

    /// The requested version does not exist and no alternatives could be
    /// listed.
    #[error(
        "Version {requested:?} does not exist. For a full list of versions, see\n\t{archive}",
        archive = RELEASE_ARCHIVE_URL
    )]
    VersionNotFound {
        /// The version the caller asked for.
        requested: String,
    },

    /// The version exists but has no binary for the requested platform.
    #[error(
        "contrast-go is not available for platform \"{os}-{arch}\". Available platforms:\n\t{}\n\
         For system requirements, see\n\t{requirements}",
        .available.join(", "),
        requirements = SYSTEM_REQUIREMENTS_URL
    )]
    BadPlatform {
        /// `os-arch` entries offered for the version.
        available: Vec<String>,
        /// The requested operating system.
        os: String,
        /// The requested architecture.
        arch: String,
    },

    /// No HTTP response could be obtained.
    #[error(transparent)]
    Network(#[from] TransportError),

    /// The server answered with a status other than 200 or 404.
    #[error(
        "server did not return 200 for {url}: {status}\n\
         Please try again later or install manually. For the latter, see the instructions at\n\
         {manual}",
        manual = MANUAL_INSTALL_URL
    )]
    UnexpectedStatus {
        /// The URL that was requested.
        url: String,
        /// The literal status line, such as `500 Internal Server Error`.
        status: String,
    },

    /// The artifact metadata did not include a checksum.
    #[error("server did not provide a checksum for {url}; refusing to install an unverified download")]
    MissingChecksum {
        /// The artifact URL.
        url: String,
    },

    /// The checksum header is not a SHA-256 hex digest.
    #[error("server provided an unusable checksum {value:?}: {source}")]
    InvalidChecksum {
        /// The raw header value.
        value: String,
        /// Why the value was rejected.
        #[source]
        source: DigestError,
    },

    /// The downloaded bytes do not hash to the advertised digest.
    #[error("checksum mismatch, expected {expected} but downloaded file has {actual}")]
    ChecksumMismatch {
        /// Digest advertised by the server.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// The downloaded file size differs from the declared content length.
    #[error("downloaded file size {actual} does not match expected value {expected}")]
    SizeMismatch {
        /// Declared `Content-Length`.
        expected: u64,
        /// Size of the file on disk.
        actual: u64,
    },

    /// The transfer failed part-way through.
    #[error("couldn't download file ({read} bytes read of {expected} expected): {source}")]
    Interrupted {
        /// Bytes written before the failure.
        read: u64,
        /// Declared `Content-Length`, if any.
        expected: ExpectedLength,
        /// The underlying read or write failure.
        #[source]
        source: io::Error,
    },

    /// The download temp file could not be created.
    #[error("unable to create tmp for download: {0}")]
    TempFile(#[source] io::Error),

    /// The downloaded file could not be inspected.
    #[error("cannot verify download: {0}")]
    Verify(#[source] io::Error),

    /// The destination directory could not be created.
    #[error("installation directory issue: could not create {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The verified download could not be moved into place.
    #[error("rename {from} {to}: {source}")]
    Rename {
        /// The temp file.
        from: Utf8PathBuf,
        /// The destination.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The installed file could not be made executable.
    #[error("permission issue: could not make {path} executable: {source}")]
    Permission {
        /// The installed file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The install succeeded but the binary cannot be found on `PATH`.
    #[error(
        "contrast-go was installed at {destination}, but this location was not found in $PATH.\n\
         Make sure that the $PATH environment variable includes {}",
        install_dir(.destination)
    )]
    NotOnPath {
        /// Where the binary was installed.
        destination: Utf8PathBuf,
    },

    /// The install succeeded but another binary earlier on `PATH` wins.
    #[error("contrast-go installed at {destination}, but shadowed in path by {found}")]
    Shadowed {
        /// Where the binary was installed.
        destination: Utf8PathBuf,
        /// The binary that would run instead.
        found: String,
    },

    /// The repository answered in a way the diagnostics cannot explain.
    #[error(
        "Sorry, something strange happened. Please try again later or\n\
         install manually. For the latter, see the instructions at\n\
         {manual}",
        manual = MANUAL_INSTALL_URL
    )]
    Unknown,
}

impl InstallError {
    /// Return true when no binary exists for the requested platform.
    #[must_use]
    pub const fn is_bad_platform(&self) -> bool {
        matches!(self, Self::BadPlatform { .. })
    }

    /// Return true when the downloaded bytes failed verification.
    #[must_use]
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingChecksum { .. }
                | Self::InvalidChecksum { .. }
                | Self::ChecksumMismatch { .. }
                | Self::SizeMismatch { .. }
                | Self::Interrupted { .. }
        )
    }
}

fn install_dir(destination: &Utf8PathBuf) -> &str {
    destination
        .parent()
        .map_or(destination.as_str(), camino::Utf8Path::as_str)
}

/// A declared content length that may be absent; renders `-1` when unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedLength(pub Option<u64>);

impl fmt::Display for ExpectedLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(length) => write!(f, "{length}"),
            None => f.write_str("-1"),
        }
    }
}

/// Result type alias using [`InstallError`].
pub type Result<T> = std::result::Result<T, InstallError>;
