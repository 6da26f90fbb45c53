//! Prefix discovery, subpath matching and entry path rewriting.
//!
//! Provider archives wrap the repository in a single generated directory
//! (`owner-repo-<sha>/` on GitHub). The resolver answers two questions per
//! entry without touching the filesystem:
//!
//! - does the entry lie strictly below the requested subpath ([`matches`])?
//! - where does it go relative to the destination ([`rewrite_path`])?
//!
//! [`Selection::resolve`] combines both into a single [`EntryAction`].

use std::fmt;

use crate::ExtractionError;
use crate::Result;
use crate::types::EntryKind;
use crate::types::Subpath;
use crate::types::subpath::SEPARATOR;

/// Root directory prefix of a provider archive, including the trailing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePrefix(String);

impl ArchivePrefix {
    /// Derives the prefix from the first entry path: everything up to and
    /// including the first separator.
    ///
    /// Returns `None` when the path contains no separator; in that case no
    /// entry of the archive can be selected.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitslice_core::resolver::ArchivePrefix;
    ///
    /// let prefix = ArchivePrefix::discover("owner-repo-abc123/src/index.ts").unwrap();
    /// assert_eq!(prefix.as_str(), "owner-repo-abc123/");
    /// assert!(ArchivePrefix::discover("README.md").is_none());
    /// ```
    #[must_use]
    pub fn discover(first_entry_path: &str) -> Option<Self> {
        first_entry_path
            .find(SEPARATOR)
            .map(|index| Self(first_entry_path[..=index].to_string()))
    }

    /// Returns the prefix string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns `true` if `entry_path` lies strictly below `subpath` once the
/// archive `prefix` is removed.
///
/// Segments are compared whole: `examples-v2/demo.ts` does not match the
/// subpath `examples`. The subpath directory itself does not match, only its
/// descendants do. An entry outside `prefix` never matches.
///
/// `prefix` must be non-empty.
///
/// # Examples
///
/// ```
/// use gitslice_core::resolver::matches;
///
/// let root = "owner-repo-abc123/";
/// assert!(matches("owner-repo-abc123/examples/demo.ts", root, &["examples"]));
/// assert!(!matches("owner-repo-abc123/examples-v2/demo.ts", root, &["examples"]));
/// assert!(!matches("owner-repo-abc123/examples/", root, &["examples"]));
/// ```
pub fn matches<S: AsRef<str>>(entry_path: &str, prefix: &str, subpath: &[S]) -> bool {
    debug_assert!(!prefix.is_empty(), "archive prefix must be discovered first");

    let Some(relative) = entry_path.strip_prefix(prefix) else {
        return false;
    };

    let mut segments = relative.split(SEPARATOR).filter(|s| !s.is_empty());
    for expected in subpath {
        if segments.next() != Some(expected.as_ref()) {
            return false;
        }
    }

    segments.next().is_some()
}

/// Drops the first `strip_count` segments of `entry_path` and rejoins the
/// rest with `/`.
///
/// Empty segments are ignored, so doubled and trailing separators do not
/// shift the count. An empty result means there is nothing to write.
///
/// # Examples
///
/// ```
/// use gitslice_core::resolver::rewrite_path;
///
/// assert_eq!(rewrite_path("root/examples/nested/deep.ts", 2), "nested/deep.ts");
/// assert_eq!(rewrite_path("root/examples/", 2), "");
/// ```
#[must_use]
pub fn rewrite_path(entry_path: &str, strip_count: usize) -> String {
    entry_path
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .skip(strip_count)
        .collect::<Vec<_>>()
        .join("/")
}

/// Number of leading segments to strip: the archive root, then every
/// subpath segment except the last one when its folder name is kept.
///
/// Always within `1..=1 + segment_count`.
#[must_use]
pub const fn strip_count(segment_count: usize, keep_folder_name: bool) -> usize {
    let kept = if keep_folder_name && segment_count > 0 {
        1
    } else {
        0
    };
    1 + segment_count - kept
}

/// What the engine should do with one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryAction {
    /// Not selected.
    Skip,
    /// Selected, but of a kind that is never materialized (links, devices).
    /// Counts as a match.
    Discard,
    /// Create this destination-relative directory and its ancestors.
    CreateDir(String),
    /// Create the ancestors of this destination-relative path and write the
    /// entry content to it.
    WriteFile(String),
}

impl EntryAction {
    /// Returns `true` if the entry lies below the requested subpath.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        !matches!(self, Self::Skip)
    }
}

/// Matching rules for one run: the requested subpath and its strip count.
#[derive(Debug, Clone)]
pub struct Selection {
    subpath: Subpath,
    strip_count: usize,
}

impl Selection {
    /// Builds the selection for `subpath`.
    #[must_use]
    pub fn new(subpath: Subpath, keep_folder_name: bool) -> Self {
        let strip_count = strip_count(subpath.len(), keep_folder_name);
        Self {
            subpath,
            strip_count,
        }
    }

    /// Returns the requested subpath.
    #[must_use]
    pub fn subpath(&self) -> &Subpath {
        &self.subpath
    }

    /// Returns the strip count for this run.
    #[must_use]
    pub fn strip_count(&self) -> usize {
        self.strip_count
    }

    /// Decides what to do with one entry.
    ///
    /// Without a discovered prefix nothing is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if a selected entry
    /// rewrites to a path with `.` or `..` segments.
    pub fn resolve(
        &self,
        entry_path: &str,
        kind: EntryKind,
        prefix: Option<&ArchivePrefix>,
    ) -> Result<EntryAction> {
        let Some(prefix) = prefix else {
            return Ok(EntryAction::Skip);
        };

        if !matches(entry_path, prefix.as_str(), self.subpath.segments()) {
            return Ok(EntryAction::Skip);
        }

        let relative = rewrite_path(entry_path, self.strip_count);
        if relative.is_empty() {
            return Ok(EntryAction::Skip);
        }

        if relative
            .split(SEPARATOR)
            .any(|segment| segment == ".." || segment == ".")
        {
            return Err(ExtractionError::PathTraversal {
                path: entry_path.to_string(),
            });
        }

        Ok(match kind {
            EntryKind::Directory => EntryAction::CreateDir(relative),
            EntryKind::File => EntryAction::WriteFile(relative),
            EntryKind::Other => EntryAction::Discard,
        })
    }
}
