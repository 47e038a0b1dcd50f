//! Release version model used when listing alternatives to the user.
//!
//! Directory entries in the artifact repository are either numeric
//! `major.minor.patch` releases or opaque tags such as `latest`. Both parse
//! into [`Version`], whose ordering decides how available versions are
//! presented in diagnostics.

use std::cmp::Ordering;
use std::fmt;

/// Maximum number of versions shown when listing alternatives.
pub const MAX_VERSIONS_LISTED: usize = 5;

/// A release name from the artifact repository.
///
/// # Examples
///
/// ```
/// use contrast_go_installer::version::Version;
///
/// assert_eq!(
///     Version::parse("1.2.3"),
///     Version::Semver { major: 1, minor: 2, patch: 3 }
/// );
/// assert_eq!(Version::parse("latest"), Version::Tag("latest".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// An opaque release tag, kept verbatim.
    Tag(String),
    /// A numeric `major.minor.patch` release.
    Semver {
        /// Major component.
        major: u8,
        /// Minor component.
        minor: u8,
        /// Patch component.
        patch: u8,
    },
}

impl Version {
    /// Parse a directory entry name. Never fails: anything that is not three
    /// dot-separated decimal components fitting in a `u8` becomes a tag.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        parse_semver(name).map_or_else(
            || Self::Tag(name.to_owned()),
            |(major, minor, patch)| Self::Semver {
                major,
                minor,
                patch,
            },
        )
    }

    /// Return true when this is an opaque tag.
    #[must_use]
    pub const fn is_tag(&self) -> bool {
        matches!(self, Self::Tag(_))
    }
}

fn parse_semver(name: &str) -> Option<(u8, u8, u8)> {
    let mut parts = name.split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

/// `u8::from_str` accepts a leading `+`; release names must be bare digits.
fn parse_component(part: &str) -> Option<u8> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Ord for Version {
    /// `Greater` means "listed earlier". Tags outrank numeric releases, tags
    /// rank by ascending name, numeric releases by their triple.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Tag(lhs), Self::Tag(rhs)) => rhs.cmp(lhs),
            (Self::Tag(_), Self::Semver { .. }) => Ordering::Greater,
            (Self::Semver { .. }, Self::Tag(_)) => Ordering::Less,
            (
                Self::Semver {
                    major,
                    minor,
                    patch,
                },
                Self::Semver {
                    major: other_major,
                    minor: other_minor,
                    patch: other_patch,
                },
            ) => (major, minor, patch).cmp(&(other_major, other_minor, other_patch)),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => f.write_str(tag),
            Self::Semver {
                major,
                minor,
                patch,
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}

/// The versions found in a repository listing.
///
/// Entries are kept in listing order; [`VersionList::preferred`] and the
/// `Display` impl sort on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionList(Vec<Version>);

impl VersionList {
    /// Wrap a collection of versions.
    #[must_use]
    pub const fn new(versions: Vec<Version>) -> Self {
        Self(versions)
    }

    /// Return the versions in listing order.
    #[must_use]
    pub fn as_slice(&self) -> &[Version] {
        &self.0
    }

    /// Return the number of versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true when no versions were listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return at most `limit` versions, most preferred first.
    ///
    /// # Examples
    ///
    /// ```
    /// use contrast_go_installer::version::{Version, VersionList};
    ///
    /// let list: VersionList = ["0.1.2", "latest", "1.2.3"]
    ///     .into_iter()
    ///     .map(Version::parse)
    ///     .collect();
    /// let names: Vec<String> = list.preferred(2).iter().map(ToString::to_string).collect();
    /// assert_eq!(names, ["latest", "1.2.3"]);
    /// ```
    #[must_use]
    pub fn preferred(&self, limit: usize) -> Vec<&Version> {
        let mut sorted: Vec<&Version> = self.0.iter().collect();
        sorted.sort_by(|lhs, rhs| rhs.cmp(lhs));
        sorted.truncate(limit);
        sorted
    }
}

impl FromIterator<Version> for VersionList {
    fn from_iter<I: IntoIterator<Item = Version>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for VersionList {
    /// Comma-separated, most preferred first, capped at
    /// [`MAX_VERSIONS_LISTED`] entries.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, version) in self.preferred(MAX_VERSIONS_LISTED).into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{version}")?;
        }
        Ok(())
    }
}
