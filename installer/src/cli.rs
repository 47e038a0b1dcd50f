//! CLI argument definitions for the contrast-go installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use clap::Parser;

use crate::install_flow::DEFAULT_SOURCE;

/// Download and install contrast-go.
#[derive(Parser, Debug, Clone)]
#[command(name = "contrast-go-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "contrast-go-installer is a utility for downloading and installing contrast-go.\n\n",
    "Installation is based on the values of GOOS, GOARCH, GOBIN and GOPATH, as seen ",
    "by 'go env'. The binary is placed where 'go install' would put it.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the newest release:\n",
    "    $ contrast-go-installer latest\n\n",
    "  Install a specific release:\n",
    "    $ contrast-go-installer 2.8.0\n\n",
    "For a full list of available versions, please visit:\n",
    "  https://docs.contrastsecurity.com/en/go-agent-release-notes-and-archive.html",
))]
pub struct Cli {
    /// Release to install, such as `latest` or `2.8.0`.
    #[arg(id = "release", value_name = "VERSION")]
    pub version: String,

    /// Artifact repository to download from.
    #[arg(short = 'u', long = "source", value_name = "URL", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Log each request and diagnostic probe.
    #[arg(short, long)]
    pub verbose: bool,
}
