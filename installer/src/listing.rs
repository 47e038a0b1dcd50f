//! Directory-index parsing for the artifact repository.
//!
//! The repository exposes no index API; its structure is only visible
//! through HTML directory listings (`version/` → `os-arch/` → binary). This
//! module extracts the immediate child entries from such a page.

use std::io::Read;

use thiserror::Error;

use crate::version::{Version, VersionList};

/// Errors raised while reading a directory listing.
#[derive(Debug, Error)]
pub enum ListingError {
    /// The listing body could not be read.
    #[error("directory listing could not be read: {0}")]
    Read(#[from] std::io::Error),

    /// The listing body is not UTF-8.
    #[error("directory listing is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// The HTML could not be tokenized.
    #[error("directory listing is not valid HTML: {0}")]
    Html(#[from] tl::ParseError),
}

/// Extract the immediate child entries linked from a directory listing.
///
/// An anchor is a child entry when its `href`, after one trailing slash is
/// stripped, contains no slash. Parent links, empty links, and query or
/// fragment links are skipped.
///
/// # Errors
///
/// Returns a [`ListingError`] when the body cannot be read or parsed.
///
/// # Examples
///
/// ```
/// use contrast_go_installer::listing::child_entries;
///
/// let page = r#"<a href="../">../</a><a href="1.0.0/">1.0.0/</a><a href="/else/">x</a>"#;
/// let entries = child_entries(page.as_bytes()).unwrap();
/// assert_eq!(entries, ["1.0.0"]);
/// ```
pub fn child_entries(mut body: impl Read) -> Result<Vec<String>, ListingError> {
    let mut raw = Vec::new();
    body.read_to_end(&mut raw)?;
    let text = String::from_utf8(raw)?;
    let dom = tl::parse(&text, tl::ParserOptions::default())?;

    let entries = dom
        .nodes()
        .iter()
        .filter_map(tl::Node::as_tag)
        .filter(|tag| tag.name().as_bytes().eq_ignore_ascii_case(b"a"))
        .filter_map(|anchor| anchor.attributes().get("href").flatten())
        .filter_map(|href| std::str::from_utf8(href.as_bytes()).ok())
        .filter_map(|href| child_name(&html_escape::decode_html_entities(href)))
        .collect();
    Ok(entries)
}

fn child_name(href: &str) -> Option<String> {
    let name = href.strip_suffix('/').unwrap_or(href);
    if name.is_empty() || name.contains('/') || matches!(name, "." | "..") {
        return None;
    }
    if name.starts_with('?') || name.starts_with('#') {
        return None;
    }
    Some(name.to_owned())
}

/// Parse a repository-root listing into the versions it offers.
///
/// # Errors
///
/// Returns a [`ListingError`] when the body cannot be read or parsed.
pub fn list_versions(body: impl Read) -> Result<VersionList, ListingError> {
    Ok(child_entries(body)?
        .iter()
        .map(|name| Version::parse(name))
        .collect())
}

/// Parse a version listing into its `os-arch` platform entries.
///
/// Every platform directory contains a dash; anything else in the listing
/// (for example `dependencies.csv`) is dropped.
///
/// # Errors
///
/// Returns a [`ListingError`] when the body cannot be read or parsed.
pub fn list_platforms(body: impl Read) -> Result<Vec<String>, ListingError> {
    Ok(child_entries(body)?
        .into_iter()
        .filter(|name| name.contains('-'))
        .collect())
}
