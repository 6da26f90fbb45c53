//! Error conversion utilities for CLI.
//!
//! Converts gitslice-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use gitslice_core::ExtractionError;
use gitslice_core::RepoSource;
use gitslice_core::SourceError;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, repo: &RepoSource) -> anyhow::Error {
    match err {
        ExtractionError::NoFilesFound { subpath } => {
            anyhow!(
                "No files found at path '{subpath}' in {repo}\n\
                 HINT: Paths are case-sensitive. Check the spelling and the ref (-r/--ref)."
            )
        }
        ExtractionError::PathTraversal { path } => {
            anyhow!(
                "Security violation: archive entry '{path}' would be written outside the destination\n\
                 HINT: The archive may be malicious. Nothing after this entry was extracted."
            )
        }
        ExtractionError::Filesystem { path, source } => {
            anyhow!(
                "Failed to write '{}': {source}\n\
                 HINT: Check that the destination is writable and has enough free space.",
                path.display()
            )
        }
        ExtractionError::Stream(io_err) => {
            anyhow!(
                "Failed to read the archive of {repo}: {io_err}\n\
                 HINT: The download may have been interrupted, or the file is not a tar archive."
            )
        }
        other @ ExtractionError::Task(_) => {
            anyhow::Error::from(other).context(format!("Error extracting {repo}"))
        }
    }
}

/// Adds context to extraction errors
pub fn add_extraction_context<T>(
    result: Result<T, ExtractionError>,
    repo: &RepoSource,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, repo))
}

/// Converts `SourceError` to user-friendly anyhow error with context
pub fn convert_source_error(err: SourceError) -> anyhow::Error {
    match err {
        SourceError::InvalidSource { input, reason } => {
            anyhow!(
                "Invalid source '{input}': {reason}\n\
                 HINT: Use owner/repo[/path][#ref], gitlab:owner/repo, or a repository URL."
            )
        }
        SourceError::UnsupportedHost { host } => {
            anyhow!(
                "Unsupported host '{host}'\n\
                 HINT: Supported hosts are github.com, gitlab.com and bitbucket.org."
            )
        }
        SourceError::Http { url, status: 404 } => {
            anyhow!(
                "Repository or ref not found: {url}\n\
                 HINT: Check the owner, repository and ref. Private repositories need --token."
            )
        }
        SourceError::Http {
            url,
            status: status @ (401 | 403),
        } => {
            anyhow!(
                "Access denied (HTTP {status}): {url}\n\
                 HINT: Pass --token or set GITSLICE_TOKEN. Anonymous requests are rate limited."
            )
        }
        SourceError::Http { url, status } => {
            anyhow!("Download failed with HTTP {status}: {url}")
        }
        other @ SourceError::Request(_) => anyhow::Error::from(other)
            .context("Failed to download archive\nHINT: Check your network connection."),
    }
}

/// Adds context to source errors
pub fn add_source_context<T>(result: Result<T, SourceError>) -> anyhow::Result<T> {
    result.map_err(convert_source_error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;

    fn repo() -> RepoSource {
        RepoSource {
            subpath: "examples".into(),
            ..RepoSource::parse("octocat/hello-world").unwrap()
        }
    }

    #[test]
    fn test_convert_no_files_found() {
        let err = ExtractionError::NoFilesFound {
            subpath: "nonexistent".into(),
        };
        let msg = format!("{:?}", convert_extraction_error(err, &repo()));
        assert!(msg.contains("No files found at path 'nonexistent'"));
        assert!(msg.contains("github:octocat/hello-world"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_path_traversal() {
        let err = ExtractionError::PathTraversal {
            path: "root/examples/../../etc/passwd".into(),
        };
        let msg = format!("{:?}", convert_extraction_error(err, &repo()));
        assert!(msg.contains("Security violation"));
        assert!(msg.contains("../../etc/passwd"));
    }

    #[test]
    fn test_convert_filesystem_error() {
        let err = ExtractionError::filesystem(
            "/out/demo.ts",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let msg = format!("{:?}", convert_extraction_error(err, &repo()));
        assert!(msg.contains("/out/demo.ts"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_convert_http_errors() {
        let not_found = convert_source_error(SourceError::Http {
            url: "https://api.github.com/repos/o/r/tarball".into(),
            status: 404,
        });
        assert!(format!("{not_found:?}").contains("not found"));

        let denied = convert_source_error(SourceError::Http {
            url: "https://api.github.com/repos/o/r/tarball".into(),
            status: 403,
        });
        let msg = format!("{denied:?}");
        assert!(msg.contains("HTTP 403"));
        assert!(msg.contains("--token"));

        let other = convert_source_error(SourceError::Http {
            url: "https://api.github.com/repos/o/r/tarball".into(),
            status: 502,
        });
        assert!(format!("{other:?}").contains("HTTP 502"));
    }

    #[test]
    fn test_convert_invalid_source() {
        let err = RepoSource::parse("justowner").unwrap_err();
        let msg = format!("{:?}", convert_source_error(err));
        assert!(msg.contains("Invalid source 'justowner'"));
        assert!(msg.contains("HINT"));
    }
}
