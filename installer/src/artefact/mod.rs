//! Artifact addressing, transport, and integrity primitives.
//!
//! # Sub-modules
//!
//! - [`naming`] - Artifact URL construction (`ArtifactLocation`).
//! - [`download`] - HTTP transport trait and `ureq` implementation.
//! - [`sha256_digest`] - SHA-256 digest newtype and hashing tee writer.

pub mod download;
pub mod naming;
pub mod sha256_digest;
