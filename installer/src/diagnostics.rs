//! Explains a missing artifact.
//!
//! A 404 on the binary URL means either the version or the platform is
//! wrong. The repository only exposes nested directory listings, so the
//! cheapest way to tell the two apart is to probe the version directory and,
//! if that is missing too, the repository root. Probe failures never escape:
//! they degrade the message instead.

use log::{debug, warn};

use crate::artefact::download::ArtifactClient;
use crate::artefact::naming::ArtifactLocation;
use crate::error::InstallError;
use crate::listing::{list_platforms, list_versions};

/// A version listing with fewer platforms than this is not trusted.
const MIN_PLATFORMS_LISTED: usize = 2;

/// Build the error for a 404 on `location`'s artifact URL.
///
/// Issues at most two `GET` requests and always returns an error.
#[must_use]
pub fn not_found_error(client: &dyn ArtifactClient, location: &ArtifactLocation<'_>) -> InstallError {
    let version_url = location.version_url();
    debug!("artifact missing; probing {version_url}");

    let response = match client.get(&version_url) {
        Ok(response) => response,
        Err(err) => {
            warn!("version probe failed: {err}");
            return version_not_found(location);
        }
    };

    if !response.is_ok() {
        debug!("{version_url} returned {}", response.status_line());
        return bad_version_error(client, location);
    }

    match list_platforms(response.into_body()) {
        Ok(available) if available.len() >= MIN_PLATFORMS_LISTED => InstallError::BadPlatform {
            available,
            os: location.os().to_owned(),
            arch: location.arch().to_owned(),
        },
        Ok(available) => {
            warn!("version listing at {version_url} is ambiguous: {available:?}");
            InstallError::Unknown
        }
        Err(err) => {
            warn!("version listing at {version_url} is unreadable: {err}");
            InstallError::Unknown
        }
    }
}

/// The version itself is missing; list what the repository root offers.
fn bad_version_error(client: &dyn ArtifactClient, location: &ArtifactLocation<'_>) -> InstallError {
    let root_url = location.root_url();
    let response = match client.get(root_url) {
        Ok(response) if response.is_ok() => response,
        Ok(response) => {
            warn!("root listing {root_url} returned {}", response.status_line());
            return version_not_found(location);
        }
        Err(err) => {
            warn!("root listing probe failed: {err}");
            return version_not_found(location);
        }
    };

    match list_versions(response.into_body()) {
        Ok(available) => InstallError::BadVersion {
            available,
            requested: location.version().to_owned(),
        },
        Err(err) => {
            warn!("root listing at {root_url} is unreadable: {err}");
            version_not_found(location)
        }
    }
}

fn version_not_found(location: &ArtifactLocation<'_>) -> InstallError {
    InstallError::VersionNotFound {
        requested: location.version().to_owned(),
    }
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod tests;
