//! Shared test utilities for the installer crate.

use std::cell::RefCell;
use std::io::{self, Cursor, Read};

use sha2::{Digest, Sha256};

use crate::artefact::download::{ArtifactClient, ArtifactResponse, TransportError};

/// Return the lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Render a minimal directory listing linking to each entry.
///
/// Entries ending in `/` are rendered as directories, as a static file
/// server would.
#[must_use]
pub fn listing_html(entries: &[&str]) -> String {
    let links: String = entries
        .iter()
        .map(|entry| format!("<a href=\"{entry}\">{entry}</a>\n"))
        .collect();
    format!("<html><body><pre><a href=\"../\">../</a>\n{links}</pre></body></html>")
}

/// The HTTP method of a recorded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `HEAD`
    Head,
    /// `GET`
    Get,
}

/// A canned answer served by [`StubClient`].
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// An HTTP response.
    Respond {
        /// Status code.
        status: u16,
        /// Body bytes.
        body: Vec<u8>,
        /// `X-Checksum-Sha256` header value.
        checksum: Option<String>,
        /// `Content-Length` header value.
        content_length: Option<u64>,
        /// When true, reading fails after the body is exhausted.
        interrupted: bool,
    },
    /// A transport failure.
    Fail(String),
}

impl StubResponse {
    /// A bodiless response with `status`.
    #[must_use]
    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: Vec::new(),
            checksum: None,
            content_length: None,
            interrupted: false,
        }
    }

    /// A `200 OK` with `body` and no headers.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
            checksum: None,
            content_length: None,
            interrupted: false,
        }
    }

    /// A `200 OK` carrying `body`, its checksum, and its exact length.
    #[must_use]
    pub fn artifact(body: &[u8]) -> Self {
        Self::ok(body)
            .with_checksum(sha256_hex(body))
            .with_content_length(body.len() as u64)
    }

    /// A transport failure with `reason`.
    #[must_use]
    pub fn unreachable(reason: &str) -> Self {
        Self::Fail(reason.to_owned())
    }

    /// Set the checksum header.
    #[must_use]
    pub fn with_checksum(mut self, value: impl Into<String>) -> Self {
        if let Self::Respond { checksum, .. } = &mut self {
            *checksum = Some(value.into());
        }
        self
    }

    /// Set the content-length header.
    #[must_use]
    pub fn with_content_length(mut self, length: u64) -> Self {
        if let Self::Respond { content_length, .. } = &mut self {
            *content_length = Some(length);
        }
        self
    }

    /// Make the body fail once its bytes are exhausted.
    #[must_use]
    pub fn interrupted(mut self) -> Self {
        if let Self::Respond { interrupted, .. } = &mut self {
            *interrupted = true;
        }
        self
    }

    fn to_response(&self, url: &str) -> Result<ArtifactResponse, TransportError> {
        match self {
            Self::Respond {
                status,
                body,
                checksum,
                content_length,
                interrupted,
            } => {
                let reader = StubBody {
                    data: Cursor::new(body.clone()),
                    interrupted: *interrupted,
                };
                let mut response = ArtifactResponse::new(*status, reader);
                if let Some(value) = checksum {
                    response = response.with_checksum(value.clone());
                }
                if let Some(length) = content_length {
                    response = response.with_content_length(*length);
                }
                Ok(response)
            }
            Self::Fail(reason) => Err(TransportError {
                url: url.to_owned(),
                reason: reason.clone(),
            }),
        }
    }
}

struct StubBody {
    data: Cursor<Vec<u8>>,
    interrupted: bool,
}

impl Read for StubBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.data.read(buf)?;
        if n == 0 && self.interrupted && !buf.is_empty() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        Ok(n)
    }
}

#[derive(Debug)]
struct Route {
    method: Method,
    url: String,
    response: StubResponse,
}

/// A stub implementation of [`ArtifactClient`] for testing.
///
/// Serves canned responses keyed by method and URL; unrouted requests get
/// an empty `404`. Every request is recorded in order.
#[derive(Debug, Default)]
pub struct StubClient {
    routes: Vec<Route>,
    requests: RefCell<Vec<(Method, String)>>,
}

impl StubClient {
    /// Create a client with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `response` for `method` requests to `url`.
    #[must_use]
    pub fn route(mut self, method: Method, url: impl Into<String>, response: StubResponse) -> Self {
        self.routes.push(Route {
            method,
            url: url.into(),
            response,
        });
        self
    }

    /// Serve `response` for both `HEAD` and `GET` requests to `url`.
    #[must_use]
    pub fn route_both(self, url: &str, response: &StubResponse) -> Self {
        self.route(Method::Head, url, response.clone())
            .route(Method::Get, url, response.clone())
    }

    /// Return the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.requests.borrow().clone()
    }

    fn serve(&self, method: Method, url: &str) -> Result<ArtifactResponse, TransportError> {
        self.requests.borrow_mut().push((method, url.to_owned()));
        self.routes
            .iter()
            .find(|route| route.method == method && route.url == url)
            .map_or_else(
                || StubResponse::status(404).to_response(url),
                |route| route.response.to_response(url),
            )
    }
}

impl ArtifactClient for StubClient {
    fn head(&self, url: &str) -> Result<ArtifactResponse, TransportError> {
        self.serve(Method::Head, url)
    }

    fn get(&self, url: &str) -> Result<ArtifactResponse, TransportError> {
        self.serve(Method::Get, url)
    }
}
