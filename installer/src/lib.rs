//! contrast-go installer library.
//!
//! This crate downloads a platform-specific contrast-go release from an
//! artifact repository, verifies it against the repository's SHA-256
//! checksum, and installs it as an executable. When a release is missing
//! it probes the repository's directory listings to explain whether the
//! version or the platform was wrong. It is used by the
//! `contrast-go-installer` CLI binary and can be consumed programmatically.
//!
//! # Modules
//!
//! - [`artefact`] - Artifact URLs, HTTP transport and SHA-256 digests
//! - [`cli`] - Command-line argument definitions
//! - [`diagnostics`] - Explanations for a missing artifact
//! - [`error`] - Semantic error types with corrective hints
//! - [`fetch`] - Streaming download and verification
//! - [`finalize`] - Atomic placement and search-path checks
//! - [`go_env`] - Go toolchain environment discovery
//! - [`install_flow`] - The install pipeline entry points
//! - [`listing`] - Directory-listing page parsing
//! - [`logging`] - Terminal logger setup
//! - [`lookup`] - Executable resolution through the search path
//! - [`output`] - User-facing messages
//! - [`version`] - Release version ordering

pub mod artefact;
pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod finalize;
pub mod go_env;
pub mod install_flow;
pub mod listing;
pub mod logging;
pub mod lookup;
pub mod output;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{InstallError, Result};
pub use install_flow::{InstallRequest, Platform, install, install_with};
