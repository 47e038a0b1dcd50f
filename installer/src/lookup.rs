//! Executable resolution through the search path.
//!
//! Installation ends by asking which `contrast-go` the shell would run.
//! The question is answered through [`ExecutableLookup`] so tests can
//! substitute a deterministic answer for the process's real `PATH`.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

/// Resolves a program name to the executable that would run.
pub trait ExecutableLookup {
    /// Return the path of the first executable named `program`.
    ///
    /// # Errors
    ///
    /// Returns an error when no such executable can be found.
    fn locate(&self, program: &str) -> io::Result<PathBuf>;
}

impl<F> ExecutableLookup for F
where
    F: Fn(&str) -> io::Result<PathBuf>,
{
    fn locate(&self, program: &str) -> io::Result<PathBuf> {
        self(program)
    }
}

/// Looks programs up on a search path using `which`.
///
/// # Examples
///
/// ```no_run
/// use contrast_go_installer::lookup::{ExecutableLookup, SearchPathLookup};
///
/// let go = SearchPathLookup::new().locate("go")?;
/// println!("go is {}", go.display());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchPathLookup {
    paths: Option<OsString>,
}

impl SearchPathLookup {
    /// Search the process's `PATH`.
    #[must_use]
    pub const fn new() -> Self {
        Self { paths: None }
    }

    /// Search `paths`, formatted like `PATH`, instead of the environment.
    #[must_use]
    pub fn in_paths(paths: impl Into<OsString>) -> Self {
        Self {
            paths: Some(paths.into()),
        }
    }
}

impl ExecutableLookup for SearchPathLookup {
    fn locate(&self, program: &str) -> io::Result<PathBuf> {
        let found = match &self.paths {
            None => which::which(program),
            Some(paths) => which::which_in(program, Some(paths), env::current_dir()?),
        };
        found.map_err(|err| io::Error::new(io::ErrorKind::NotFound, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn closures_are_lookups() {
        let lookup =
            |program: &str| -> io::Result<PathBuf> { Ok(PathBuf::from("/opt/bin").join(program)) };
        let found = lookup.locate("contrast-go").expect("closure lookup");
        assert_eq!(found, PathBuf::from("/opt/bin/contrast-go"));
    }

    #[test]
    fn missing_program_is_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let lookup = SearchPathLookup::in_paths(dir.path());
        let err = lookup
            .locate("contrast-go")
            .expect_err("empty directory has no executables");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn finds_executable_in_explicit_paths() {
        use std::os::unix::fs::PermissionsExt;

        let empty = TempDir::new().expect("temp dir");
        let bin = TempDir::new().expect("temp dir");
        let program = bin.path().join("contrast-go");
        fs::write(&program, b"#!/bin/sh\n").expect("write program");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).expect("chmod");

        let paths = env::join_paths([empty.path(), bin.path()]).expect("join paths");
        let found = SearchPathLookup::in_paths(paths)
            .locate("contrast-go")
            .expect("program is on the search path");

        assert_eq!(
            fs::canonicalize(found).expect("canonical found"),
            fs::canonicalize(program).expect("canonical program")
        );
    }
}
