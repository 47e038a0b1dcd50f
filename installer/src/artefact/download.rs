//! HTTP transport for the artifact repository.
//!
//! Provides a trait-based abstraction over the two request kinds the
//! installer issues (`HEAD` and `GET`), enabling dependency injection for
//! testing. Non-success statuses are returned as responses rather than
//! errors so callers can run diagnostics on a 404.

use std::fmt;
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use log::debug;
use ureq::http::{HeaderMap, StatusCode, header::CONTENT_LENGTH};

/// User agent sent with every request.
pub const USER_AGENT: &str = "contrast-go-installer/0";

/// Response header carrying the hex SHA-256 of the artifact body.
pub const CHECKSUM_HEADER: &str = "x-checksum-sha256";

/// Connection establishment timeout. Transfers themselves are unbounded.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for issuing requests against the artifact repository.
///
/// # Examples
///
/// ```no_run
/// use contrast_go_installer::artefact::download::{ArtifactClient, HttpClient};
///
/// let response = HttpClient.head("https://pkg.contrastsecurity.com/go-agent-release")?;
/// println!("{}", response.status_line());
/// # Ok::<(), contrast_go_installer::artefact::download::TransportError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactClient {
    /// Issue a `HEAD` request.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response was received.
    fn head(&self, url: &str) -> Result<ArtifactResponse, TransportError>;

    /// Issue a `GET` request. The body is streamed, not buffered.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no HTTP response was received.
    fn get(&self, url: &str) -> Result<ArtifactResponse, TransportError>;
}

/// A transport-level failure: connection refused, DNS, TLS, and so on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("there is a network communication issue: {reason}")]
pub struct TransportError {
    /// The URL that was requested.
    pub url: String,
    /// A human-readable description of the failure.
    pub reason: String,
}

/// An HTTP response from the artifact repository.
pub struct ArtifactResponse {
    status: u16,
    checksum: Option<String>,
    content_length: Option<u64>,
    body: Box<dyn Read>,
}

impl ArtifactResponse {
    /// Create a response with the given status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            checksum: None,
            content_length: None,
            body: Box::new(body),
        }
    }

    /// Attach the checksum header value.
    #[must_use]
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Attach the declared content length.
    #[must_use]
    pub const fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// The numeric status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Return true for `200 OK`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Return true for `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// The status line, such as `500 Internal Server Error`.
    #[must_use]
    pub fn status_line(&self) -> String {
        StatusCode::from_u16(self.status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .map_or_else(
                || self.status.to_string(),
                |reason| format!("{} {reason}", self.status),
            )
    }

    /// The `X-Checksum-Sha256` header, if the server sent one.
    #[must_use]
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// The declared `Content-Length`, if the server sent one.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Consume the response, returning its body reader.
    #[must_use]
    pub fn into_body(self) -> Box<dyn Read> {
        self.body
    }
}

impl fmt::Debug for ArtifactResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactResponse")
            .field("status", &self.status)
            .field("checksum", &self.checksum)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// HTTP-based client using `ureq`. Redirects are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClient;

impl ArtifactClient for HttpClient {
    fn head(&self, url: &str) -> Result<ArtifactResponse, TransportError> {
        debug!("HEAD {url}");
        let response = http_agent()
            .head(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(into_artifact_response(response))
    }

    fn get(&self, url: &str) -> Result<ArtifactResponse, TransportError> {
        debug!("GET {url}");
        let response = http_agent()
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(into_artifact_response(response))
    }
}

/// Shared `ureq` agent. Status codes are surfaced as responses.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

fn into_artifact_response(response: ureq::http::Response<ureq::Body>) -> ArtifactResponse {
    let status = response.status().as_u16();
    let headers = response.headers();
    let checksum = header_value(headers, CHECKSUM_HEADER).map(str::to_owned);
    let content_length =
        header_value(headers, CONTENT_LENGTH.as_str()).and_then(|v| v.trim().parse().ok());
    debug!("{status} (content-length: {content_length:?}, checksum: {checksum:?})");

    ArtifactResponse {
        status,
        checksum,
        content_length,
        body: Box::new(response.into_body().into_reader()),
    }
}

fn header_value<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Map a ureq error to a [`TransportError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> TransportError {
    TransportError {
        url: url.to_owned(),
        reason: err.to_string(),
    }
}
