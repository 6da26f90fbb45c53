//! Destination directory type.

use crate::ExtractionError;
use crate::Result;
use crate::types::subpath::SEPARATOR;
use std::path::Path;
use std::path::PathBuf;

/// The directory extracted entries are written into.
///
/// Constructing a `DestDir` creates the directory (and any missing
/// ancestors) and canonicalizes it, so every path produced by
/// [`DestDir::join`] is absolute.
///
/// # Examples
///
/// ```no_run
/// use gitslice_core::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::create("./output")?;
/// let target = dest.join("nested/deep.ts");
/// assert!(target.starts_with(dest.as_path()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates the destination directory if needed and canonicalizes it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Filesystem`] if the path exists but is not
    /// a directory, or if it cannot be created or canonicalized.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.exists() && !path.is_dir() {
            return Err(ExtractionError::filesystem(
                path,
                std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "destination exists and is not a directory",
                ),
            ));
        }

        std::fs::create_dir_all(&path).map_err(|e| ExtractionError::filesystem(&path, e))?;

        let canonical = path
            .canonicalize()
            .map_err(|e| ExtractionError::filesystem(&path, e))?;

        Ok(Self(canonical))
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `/`-separated relative entry path onto the destination.
    ///
    /// The relative path must already have been checked by the resolver; no
    /// traversal validation happens here.
    #[must_use]
    pub fn join(&self, relative: &str) -> PathBuf {
        relative
            .split(SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .fold(self.0.clone(), |path, segment| path.join(segment))
    }
}

impl AsRef<Path> for DestDir {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_existing_directory() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::create(temp.path()).unwrap();
        assert!(dest.as_path().is_absolute());
        assert!(dest.as_path().is_dir());
    }

    #[test]
    fn test_create_missing_directory() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("a").join("b");
        let dest = DestDir::create(&target).unwrap();
        assert!(target.is_dir());
        assert!(dest.as_path().ends_with("a/b"));
    }

    #[test]
    fn test_create_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        let err = DestDir::create(&file).unwrap_err();
        assert_eq!(err.path(), Some(file.as_path()));
    }

    #[test]
    fn test_join_splits_segments() {
        let temp = TempDir::new().unwrap();
        let dest = DestDir::create(temp.path()).unwrap();

        let joined = dest.join("nested/deep.ts");
        assert!(joined.starts_with(dest.as_path()));
        assert!(joined.ends_with("nested/deep.ts"));

        assert_eq!(dest.join("a//b/"), dest.as_path().join("a").join("b"));
    }
}
