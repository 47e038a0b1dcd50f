//! User-facing output for the installer CLI.

use std::io::Write;

use camino::Utf8Path;

use crate::install_flow::Platform;

/// Write `message` and a newline to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after installation.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use contrast_go_installer::install_flow::Platform;
/// use contrast_go_installer::output::success_message;
///
/// let platform = Platform::new("linux", "amd64");
/// let msg = success_message("latest", &platform, Utf8Path::new("/go/bin/contrast-go"));
/// assert_eq!(
///     msg,
///     "Downloaded 'latest' release for linux/amd64 to /go/bin/contrast-go."
/// );
/// ```
#[must_use]
pub fn success_message(version: &str, platform: &Platform, destination: &Utf8Path) -> String {
    format!("Downloaded '{version}' release for {platform} to {destination}.")
}

/// Notice printed before retrying a darwin/arm64 install as darwin/amd64.
#[must_use]
pub fn compatibility_notice(requested: &Platform, fallback: &Platform) -> String {
    format!(
        "{requested} is not a release target for this contrast-go version. \
         Setting release to {fallback} to run in compatibility mode."
    )
}
