//! Download and verification of the contrast-go binary.
//!
//! The binary is streamed into a temp file while it is hashed. A file only
//! leaves this module once its digest matches the repository's
//! `X-Checksum-Sha256` header and its size matches the declared length.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::artefact::download::{ArtifactClient, ArtifactResponse};
use crate::artefact::naming::{ARTIFACT_NAME, ArtifactLocation};
use crate::artefact::sha256_digest::{HashingWriter, Sha256Digest};
use crate::diagnostics::not_found_error;
use crate::error::{ExpectedLength, InstallError, Result};

/// Download the artifact at `location` into a new file under `temp_dir`.
///
/// Issues a `HEAD` for the checksum, then a `GET` for the body. A 404 on
/// either request is explained by [`not_found_error`]. The returned file
/// has been verified; a file that fails verification is left on disk and
/// its path logged, but never returned.
///
/// # Errors
///
/// Returns [`InstallError`] for transport failures, unexpected statuses,
/// missing or malformed checksums, digest or size mismatches, and local
/// temp-file failures.
pub fn download(
    client: &dyn ArtifactClient,
    location: &ArtifactLocation<'_>,
    temp_dir: &Utf8Path,
) -> Result<Utf8PathBuf> {
    let temp = Builder::new()
        .prefix(ARTIFACT_NAME)
        .tempfile_in(temp_dir)
        .map_err(InstallError::TempFile)?;
    let url = location.artifact_url();
    debug!("downloading {url} to {}", temp.path().display());

    let head = client.head(&url)?;
    ensure_ok(client, location, &url, &head)?;
    let expected = expected_digest(&url, &head)?;

    let response = client.get(&url)?;
    ensure_ok(client, location, &url, &response)?;
    let declared = response.content_length();

    let mut writer = HashingWriter::new(temp.as_file());
    if let Err(source) = io::copy(&mut response.into_body(), &mut writer) {
        return Err(InstallError::Interrupted {
            read: writer.bytes_written(),
            expected: ExpectedLength(declared),
            source,
        });
    }
    let (_, actual) = writer.finish();
    let path = persist(temp)?;

    if actual != expected {
        debug!("rejected download left at {path}");
        return Err(InstallError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }

    if let Some(expected) = declared {
        let actual = fs::metadata(&path).map_err(InstallError::Verify)?.len();
        if actual != expected {
            debug!("rejected download left at {path}");
            return Err(InstallError::SizeMismatch { expected, actual });
        }
    }

    debug!("verified {url} ({actual})");
    Ok(path)
}

/// Fail unless `response` is a `200`, explaining a 404.
fn ensure_ok(
    client: &dyn ArtifactClient,
    location: &ArtifactLocation<'_>,
    url: &str,
    response: &ArtifactResponse,
) -> Result<()> {
    if response.is_ok() {
        return Ok(());
    }
    if response.is_not_found() {
        return Err(not_found_error(client, location));
    }
    Err(InstallError::UnexpectedStatus {
        url: url.to_owned(),
        status: response.status_line(),
    })
}

fn expected_digest(url: &str, head: &ArtifactResponse) -> Result<Sha256Digest> {
    let value = head.checksum().ok_or_else(|| InstallError::MissingChecksum {
        url: url.to_owned(),
    })?;
    Sha256Digest::try_from(value).map_err(|source| InstallError::InvalidChecksum {
        value: value.to_owned(),
        source,
    })
}

/// Detach the temp file from its drop guard so it survives this call.
fn persist(temp: NamedTempFile) -> Result<Utf8PathBuf> {
    let (_, path) = temp.keep().map_err(|err| InstallError::TempFile(err.error))?;
    Utf8PathBuf::from_path_buf(path).map_err(|path| {
        InstallError::TempFile(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("temp file path {} is not UTF-8", path.display()),
        ))
    })
}

#[cfg(test)]
#[path = "fetch_tests.rs"]
mod tests;
