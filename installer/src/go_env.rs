//! Go toolchain environment discovery.
//!
//! The installer places `contrast-go` where `go install` would put a
//! binary, for the platform the local toolchain targets. Both come from
//! `go env -json`.

use std::io;
use std::process::{Command, ExitStatus, Output};

use camino::Utf8PathBuf;
use serde::Deserialize;
use thiserror::Error;

/// Path-list separator used by `GOPATH`.
#[cfg(windows)]
const GOPATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const GOPATH_SEPARATOR: char = ':';

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        Command::new(cmd).args(args).output()
    }
}

/// Errors raised while reading the Go environment.
#[derive(Debug, Error)]
pub enum GoEnvError {
    /// No `go` executable could be started.
    #[error("unable to locate go installation: {0}")]
    NotInstalled(#[source] io::Error),

    /// `go env` could not be started for another reason.
    #[error("unable to run 'go env': {0}")]
    Spawn(#[source] io::Error),

    /// `go env` exited unsuccessfully.
    #[error("unable to run 'go env': {status}{}", indented(.stderr))]
    Failed {
        /// Exit status of the command.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// `go env` printed something other than the expected JSON object.
    #[error("unexpected 'go env' output: {0}")]
    Decode(#[from] serde_json::Error),

    /// Neither `GOBIN` nor `GOPATH` names a directory.
    #[error("'go env GOBIN' and 'go env GOPATH' were empty")]
    NoInstallDir,
}

fn indented(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n\t{stderr}")
    }
}

/// The subset of `go env` the installer needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GoEnv {
    /// Target operating system.
    #[serde(rename = "GOOS")]
    pub os: String,
    /// Target architecture.
    #[serde(rename = "GOARCH")]
    pub arch: String,
    /// Explicit binary install directory; empty when unset.
    #[serde(rename = "GOBIN", default)]
    pub bin: String,
    /// Workspace path list; empty when unset.
    #[serde(rename = "GOPATH", default)]
    pub path: String,
}

impl GoEnv {
    /// Query the toolchain through `executor`.
    ///
    /// # Errors
    ///
    /// Returns [`GoEnvError`] when `go` cannot be run, fails, or prints
    /// output that does not decode.
    pub fn discover(executor: &dyn CommandExecutor) -> Result<Self, GoEnvError> {
        let output = executor
            .run("go", &["env", "-json", "GOOS", "GOARCH", "GOBIN", "GOPATH"])
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => GoEnvError::NotInstalled(err),
                _ => GoEnvError::Spawn(err),
            })?;

        if !output.status.success() {
            return Err(GoEnvError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// The directory `go install` would place binaries in.
    ///
    /// # Errors
    ///
    /// Returns [`GoEnvError::NoInstallDir`] when both `GOBIN` and `GOPATH`
    /// are empty.
    pub fn install_dir(&self) -> Result<Utf8PathBuf, GoEnvError> {
        target_dir(&self.bin, &self.path)
    }
}

/// Resolve the install directory from `GOBIN` and `GOPATH` values.
///
/// # Errors
///
/// Returns [`GoEnvError::NoInstallDir`] when `gobin` is empty and `gopath`
/// has no leading entry.
///
/// # Examples
///
/// ```
/// use contrast_go_installer::go_env::target_dir;
///
/// assert_eq!(target_dir("/opt/gobin", "/home/me/go").unwrap(), "/opt/gobin");
/// assert_eq!(target_dir("", "/home/me/go").unwrap(), "/home/me/go/bin");
/// assert!(target_dir("", "").is_err());
/// ```
pub fn target_dir(gobin: &str, gopath: &str) -> Result<Utf8PathBuf, GoEnvError> {
    if !gobin.is_empty() {
        return Ok(Utf8PathBuf::from(gobin));
    }
    gopath
        .split(GOPATH_SEPARATOR)
        .next()
        .filter(|first| !first.is_empty())
        .map(|first| Utf8PathBuf::from(first).join("bin"))
        .ok_or(GoEnvError::NoInstallDir)
}
