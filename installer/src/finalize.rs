//! Moves a verified download into place.
//!
//! Finalisation renames the temp file over the destination, marks it
//! executable, and then checks that the search path resolves to it. The
//! post-install checks never roll the install back.

use std::fs;
use std::io;
use std::path::Path;

use camino::Utf8Path;
use log::debug;

use crate::artefact::naming::ARTIFACT_NAME;
use crate::error::{InstallError, Result};
use crate::lookup::ExecutableLookup;

/// Permission bits for the installed binary and created directories.
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Install `temp` at `destination` and confirm `lookup` resolves to it.
///
/// # Errors
///
/// Returns [`InstallError::CreateDirectory`], [`InstallError::Rename`] or
/// [`InstallError::Permission`] when the file cannot be placed, and
/// [`InstallError::NotOnPath`] or [`InstallError::Shadowed`] when it was
/// placed but will not be the one that runs.
pub fn finalize(
    temp: &Utf8Path,
    destination: &Utf8Path,
    lookup: &dyn ExecutableLookup,
) -> Result<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_str().is_empty()) {
        create_install_dir(parent).map_err(|source| InstallError::CreateDirectory {
            path: parent.to_owned(),
            source,
        })?;
    }

    fs::rename(temp, destination).map_err(|source| InstallError::Rename {
        from: temp.to_owned(),
        to: destination.to_owned(),
        source,
    })?;
    make_executable(destination).map_err(|source| InstallError::Permission {
        path: destination.to_owned(),
        source,
    })?;
    debug!("installed {destination}");

    verify_resolution(destination, lookup)
}

/// Check that the search path resolves the program name to `destination`.
fn verify_resolution(destination: &Utf8Path, lookup: &dyn ExecutableLookup) -> Result<()> {
    let program = destination.file_name().unwrap_or(ARTIFACT_NAME);
    let found = lookup.locate(program).map_err(|err| {
        debug!("{program} not resolvable: {err}");
        InstallError::NotOnPath {
            destination: destination.to_owned(),
        }
    })?;

    if same_file(&found, destination.as_std_path()) {
        Ok(())
    } else {
        Err(InstallError::Shadowed {
            destination: destination.to_owned(),
            found: found.display().to_string(),
        })
    }
}

/// Compare canonical paths, falling back to the paths as given.
fn same_file(found: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(found), fs::canonicalize(destination)) {
        (Ok(found), Ok(destination)) => found == destination,
        _ => found == destination,
    }
}

#[cfg(unix)]
fn create_install_dir(dir: &Utf8Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(EXECUTABLE_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_install_dir(dir: &Utf8Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn make_executable(path: &Utf8Path) -> io::Result<()> {
    fs::metadata(path).map(drop)
}
