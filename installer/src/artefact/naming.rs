//! URL layout of the artifact repository.
//!
//! Releases are published as `{base}/{version}/{os}-{arch}/contrast-go`.
//! The intermediate directories double as listing pages used by the
//! diagnostics when the binary itself is missing.

/// File name of the released binary, both remotely and on `PATH`.
pub const ARTIFACT_NAME: &str = "contrast-go";

/// Addresses one release binary in the artifact repository.
///
/// # Examples
///
/// ```
/// use contrast_go_installer::artefact::naming::ArtifactLocation;
///
/// let location = ArtifactLocation::new("https://example.test/go", "1.2.3", "linux", "amd64");
/// assert_eq!(
///     location.artifact_url(),
///     "https://example.test/go/1.2.3/linux-amd64/contrast-go"
/// );
/// assert_eq!(location.version_url(), "https://example.test/go/1.2.3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactLocation<'a> {
    base_url: &'a str,
    version: &'a str,
    os: &'a str,
    arch: &'a str,
}

impl<'a> ArtifactLocation<'a> {
    /// Create a location. A trailing slash on `base_url` is ignored.
    #[must_use]
    pub fn new(base_url: &'a str, version: &'a str, os: &'a str, arch: &'a str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/'),
            version,
            os,
            arch,
        }
    }

    /// The `{os}-{arch}` directory name.
    #[must_use]
    pub fn platform(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }

    /// URL of the release binary.
    #[must_use]
    pub fn artifact_url(&self) -> String {
        format!(
            "{}/{}/{}/{ARTIFACT_NAME}",
            self.base_url,
            self.version,
            self.platform()
        )
    }

    /// URL of the version directory listing.
    #[must_use]
    pub fn version_url(&self) -> String {
        format!("{}/{}", self.base_url, self.version)
    }

    /// URL of the repository root listing.
    #[must_use]
    pub fn root_url(&self) -> &'a str {
        self.base_url
    }

    /// The requested version string.
    #[must_use]
    pub const fn version(&self) -> &'a str {
        self.version
    }

    /// The requested operating system.
    #[must_use]
    pub const fn os(&self) -> &'a str {
        self.os
    }

    /// The requested architecture.
    #[must_use]
    pub const fn arch(&self) -> &'a str {
        self.arch
    }
}
