//! The install pipeline: download, verify, place, check.
//!
//! [`install`] is the production entry point. [`install_with`] takes the
//! HTTP client and executable lookup as parameters so tests can run the
//! whole pipeline without a network or a real `PATH`.

use std::env;
use std::fmt;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use log::info;

use crate::artefact::download::{ArtifactClient, HttpClient};
use crate::artefact::naming::ArtifactLocation;
use crate::error::{InstallError, Result};
use crate::fetch::download;
use crate::finalize::finalize;
use crate::lookup::{ExecutableLookup, SearchPathLookup};
use crate::output::{compatibility_notice, write_stderr_line};

/// The public contrast-go release repository.
pub const DEFAULT_SOURCE: &str = "https://pkg.contrastsecurity.com/go-agent-release";

/// An operating system and architecture pair, rendered `os/arch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system, such as `linux`.
    pub os: String,
    /// Architecture, such as `amd64`.
    pub arch: String,
}

impl Platform {
    /// Create a platform from its parts.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform to retry with when this one has no release, if any.
    ///
    /// Apple silicon runs darwin/amd64 binaries under Rosetta. Linux has no
    /// such translation layer, so no other platform falls back.
    #[must_use]
    pub fn compatibility_fallback(&self) -> Option<Self> {
        (self.os == "darwin" && self.arch == "arm64").then(|| Self::new("darwin", "amd64"))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Everything needed to install one release.
///
/// The fields are passed to the repository as given; nothing is validated
/// locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Artifact repository root URL.
    pub base_url: String,
    /// Release version or tag.
    pub version: String,
    /// Target platform.
    pub platform: Platform,
    /// Where the binary is installed.
    pub destination: Utf8PathBuf,
    /// Directory for the download temp file; the system temp dir if unset.
    pub temp_dir: Option<Utf8PathBuf>,
}

impl InstallRequest {
    /// Create a request using the system temp directory.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        version: impl Into<String>,
        platform: Platform,
        destination: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            version: version.into(),
            platform,
            destination: destination.into(),
            temp_dir: None,
        }
    }

    /// Download into `dir` instead of the system temp directory.
    ///
    /// `dir` must be on the same filesystem as the destination.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// The artifact coordinates for this request.
    #[must_use]
    pub fn location(&self) -> ArtifactLocation<'_> {
        ArtifactLocation::new(
            &self.base_url,
            &self.version,
            &self.platform.os,
            &self.platform.arch,
        )
    }
}

/// Install contrast-go `version` for `os`/`arch` at `destination`.
///
/// Uses the network and the process's `PATH`.
///
/// # Errors
///
/// Returns [`InstallError`] when the release cannot be found, downloaded,
/// verified or placed, or when the installed binary is not the one the
/// search path resolves.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use contrast_go_installer::install_flow::{DEFAULT_SOURCE, install};
///
/// install(DEFAULT_SOURCE, "latest", "linux", "amd64", Utf8Path::new("/usr/local/bin/contrast-go"))?;
/// # Ok::<(), contrast_go_installer::error::InstallError>(())
/// ```
pub fn install(
    base_url: &str,
    version: &str,
    os: &str,
    arch: &str,
    destination: &Utf8Path,
) -> Result<()> {
    let request = InstallRequest::new(base_url, version, Platform::new(os, arch), destination);
    install_with(&request, &HttpClient, &SearchPathLookup::new())
}

/// Run the install pipeline with injected dependencies.
///
/// # Errors
///
/// See [`install`].
pub fn install_with(
    request: &InstallRequest,
    client: &dyn ArtifactClient,
    lookup: &dyn ExecutableLookup,
) -> Result<()> {
    let temp_dir = match &request.temp_dir {
        Some(dir) => dir.clone(),
        None => system_temp_dir()?,
    };
    let downloaded = download(client, &request.location(), &temp_dir)?;
    finalize(&downloaded, &request.destination, lookup)
}

/// Install for the host, retrying darwin/arm64 requests as darwin/amd64.
///
/// The retry happens once and only when the first attempt failed with
/// [`InstallError::BadPlatform`]. Returns the platform actually installed.
///
/// # Errors
///
/// Returns the first attempt's error when no retry applies, otherwise the
/// retry's error.
pub fn install_for_host(
    request: &InstallRequest,
    client: &dyn ArtifactClient,
    lookup: &dyn ExecutableLookup,
    stderr: &mut dyn Write,
) -> Result<Platform> {
    let err = match install_with(request, client, lookup) {
        Ok(()) => return Ok(request.platform.clone()),
        Err(err) => err,
    };

    let Some(fallback) = request
        .platform
        .compatibility_fallback()
        .filter(|_| err.is_bad_platform())
    else {
        return Err(err);
    };

    info!("{err}");
    write_stderr_line(stderr, compatibility_notice(&request.platform, &fallback));
    let retry = InstallRequest {
        platform: fallback,
        ..request.clone()
    };
    install_with(&retry, client, lookup)?;
    Ok(retry.platform)
}

fn system_temp_dir() -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(env::temp_dir()).map_err(|path| {
        InstallError::TempFile(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("temp directory {} is not UTF-8", path.display()),
        ))
    })
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
