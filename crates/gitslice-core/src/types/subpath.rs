//! Requested subdirectory within a repository.

use std::fmt;

/// Path separator used inside tar archives and subpath strings.
pub const SEPARATOR: char = '/';

/// The repository subdirectory a caller wants extracted.
///
/// Stored as an ordered list of non-empty segments. Leading, trailing and
/// repeated separators in the input are dropped, so `"/a//b/"` and `"a/b"`
/// describe the same subpath. An empty subpath selects the whole repository.
///
/// # Examples
///
/// ```
/// use gitslice_core::Subpath;
///
/// let subpath = Subpath::parse("/packages//core/");
/// assert_eq!(subpath.segments(), ["packages", "core"]);
/// assert_eq!(subpath.to_string(), "packages/core");
/// assert_eq!(subpath.last(), Some("core"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Subpath {
    segments: Vec<String>,
}

impl Subpath {
    /// Parses a subpath string into its non-empty segments.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Returns the segments in order.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` when the whole repository is requested.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the final segment, the folder kept by `keep_folder_name`.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for Subpath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl From<&str> for Subpath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for Subpath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}
