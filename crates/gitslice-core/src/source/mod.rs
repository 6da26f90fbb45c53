//! Repository source strings.
//!
//! A source names a repository on a hosting provider, optionally a ref and
//! a subdirectory. Accepted forms:
//!
//! - `owner/repo[/sub/path][#ref]` (GitHub)
//! - `github:owner/repo[/sub/path][#ref]`, likewise `gitlab:` and `bitbucket:`
//! - `https://github.com/owner/repo[/tree/<ref>/<path>]`
//! - `https://gitlab.com/group[/subgroup]/repo[/-/tree/<ref>/<path>]`
//! - `https://bitbucket.org/owner/repo[/src/<ref>/<path>]`
//! - `git@github.com:owner/repo.git`
//!
//! A `.git` suffix on the repository name is ignored. An explicit `#ref`
//! takes precedence over a ref found in a web URL.

mod provider;

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::SourceError;
use crate::types::Subpath;

pub use provider::Provider;

type SourceResult<T> = std::result::Result<T, SourceError>;

/// A parsed repository source.
///
/// # Examples
///
/// ```
/// use gitslice_core::Provider;
/// use gitslice_core::RepoSource;
///
/// let source = RepoSource::parse("gitlab:inkscape/inkscape/share/icons#1.3").unwrap();
/// assert_eq!(source.provider, Provider::GitLab);
/// assert_eq!(source.repo, "inkscape");
/// assert_eq!(source.reference.as_deref(), Some("1.3"));
/// assert_eq!(source.subpath.to_string(), "share/icons");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    /// Hosting provider.
    pub provider: Provider,

    /// Repository owner. For GitLab this may contain subgroups
    /// (`group/subgroup`).
    pub owner: String,

    /// Repository name, without a `.git` suffix.
    pub repo: String,

    /// Branch, tag or commit. `None` selects the default branch.
    pub reference: Option<String>,

    /// Subdirectory to extract. Empty for the whole repository.
    pub subpath: Subpath,
}

impl RepoSource {
    /// Parses a source string.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidSource`] if the string does not name an
    /// owner and repository, and [`SourceError::UnsupportedHost`] if a URL
    /// points at an unknown host.
    pub fn parse(input: &str) -> SourceResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SourceError::invalid(input, "source is empty"));
        }

        let (body, reference) = match trimmed.split_once('#') {
            Some((_, "")) => return Err(SourceError::invalid(input, "empty ref after `#`")),
            Some((body, reference)) => (body, Some(reference.to_string())),
            None => (trimmed, None),
        };

        let mut source = if body.contains("://") {
            Self::parse_url(input, body)?
        } else if let Some(rest) = body.strip_prefix("git@") {
            Self::parse_ssh(input, rest)?
        } else {
            Self::parse_shorthand(input, body)?
        };

        if reference.is_some() {
            source.reference = reference;
        }

        Ok(source)
    }

    fn parse_shorthand(input: &str, body: &str) -> SourceResult<Self> {
        let (provider, path) = match body.split_once(':') {
            Some((tag, path)) => {
                let provider = Provider::from_tag(tag).ok_or_else(|| {
                    SourceError::invalid(input, format!("unknown provider `{tag}`"))
                })?;
                (provider, path)
            }
            None => (Provider::default(), body),
        };

        let segments = split_segments(path);
        match segments.as_slice() {
            [owner, repo, rest @ ..] => Self::build(
                input,
                provider,
                (*owner).to_string(),
                repo,
                None,
                Subpath::parse(&rest.join("/")),
            ),
            _ => Err(SourceError::invalid(input, "expected `owner/repo`")),
        }
    }

    fn parse_ssh(input: &str, rest: &str) -> SourceResult<Self> {
        let (host, path) = rest
            .split_once(':')
            .ok_or_else(|| SourceError::invalid(input, "expected `git@host:owner/repo`"))?;
        let provider = Provider::from_host(host).ok_or_else(|| SourceError::UnsupportedHost {
            host: host.to_string(),
        })?;

        let segments = split_segments(path);
        match segments.split_last() {
            Some((repo, owner)) if !owner.is_empty() => Self::build(
                input,
                provider,
                owner.join("/"),
                repo,
                None,
                Subpath::default(),
            ),
            _ => Err(SourceError::invalid(input, "expected `git@host:owner/repo`")),
        }
    }

    fn parse_url(input: &str, body: &str) -> SourceResult<Self> {
        let url = Url::parse(body).map_err(|e| SourceError::invalid(input, e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| SourceError::invalid(input, "URL has no host"))?;
        let provider = Provider::from_host(host).ok_or_else(|| SourceError::UnsupportedHost {
            host: host.to_string(),
        })?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        // GitLab namespaces nest arbitrarily deep; `-` ends the project path.
        let (repo_path, tail) = match provider {
            Provider::GitLab => match segments.iter().position(|s| *s == "-") {
                Some(index) => (&segments[..index], &segments[index + 1..]),
                None => (segments.as_slice(), &[][..]),
            },
            Provider::GitHub | Provider::Bitbucket => segments.split_at(segments.len().min(2)),
        };

        let marker = provider.tree_marker();
        let (reference, subpath) = match tail {
            [] => (None, Subpath::default()),
            [m, reference, rest @ ..] if *m == marker => (
                Some((*reference).to_string()),
                Subpath::parse(&rest.join("/")),
            ),
            _ => {
                return Err(SourceError::invalid(
                    input,
                    format!("expected `.../{marker}/<ref>/<path>` after the repository"),
                ));
            }
        };

        match repo_path.split_last() {
            Some((repo, owner)) if !owner.is_empty() => {
                Self::build(input, provider, owner.join("/"), repo, reference, subpath)
            }
            _ => Err(SourceError::invalid(
                input,
                "URL does not name an owner and repository",
            )),
        }
    }

    fn build(
        input: &str,
        provider: Provider,
        owner: String,
        repo: &str,
        reference: Option<String>,
        subpath: Subpath,
    ) -> SourceResult<Self> {
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if owner.is_empty() || repo.is_empty() {
            return Err(SourceError::invalid(input, "expected `owner/repo`"));
        }

        Ok(Self {
            provider,
            owner,
            repo: repo.to_string(),
            reference,
            subpath,
        })
    }

    /// Replaces the ref.
    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Builds the tarball download URL for this source.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitslice_core::RepoSource;
    ///
    /// let source = RepoSource::parse("rust-lang/rust#1.80.0").unwrap();
    /// assert_eq!(
    ///     source.archive_url().unwrap().as_str(),
    ///     "https://api.github.com/repos/rust-lang/rust/tarball/1.80.0"
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidSource`] if the URL cannot be built.
    pub fn archive_url(&self) -> SourceResult<Url> {
        match self.provider {
            Provider::GitHub => {
                let mut segments = vec!["repos", self.owner.as_str(), self.repo.as_str(), "tarball"];
                if let Some(reference) = &self.reference {
                    segments.push(reference.as_str());
                }
                build_url("https://api.github.com/", &segments)
            }
            Provider::GitLab => {
                let project = format!("{}/{}", self.owner, self.repo);
                let mut url = build_url(
                    "https://gitlab.com/",
                    &[
                        "api",
                        "v4",
                        "projects",
                        &project,
                        "repository",
                        "archive.tar.gz",
                    ],
                )?;
                if let Some(reference) = &self.reference {
                    url.query_pairs_mut().append_pair("sha", reference);
                }
                Ok(url)
            }
            Provider::Bitbucket => {
                let file = format!("{}.tar.gz", self.reference.as_deref().unwrap_or("HEAD"));
                build_url(
                    "https://bitbucket.org/",
                    &[self.owner.as_str(), self.repo.as_str(), "get", &file],
                )
            }
        }
    }

    /// Name of the directory a plain download would land in: the last
    /// subpath segment, or the repository name.
    #[must_use]
    pub fn default_folder_name(&self) -> &str {
        self.subpath.last().unwrap_or(&self.repo)
    }
}

impl FromStr for RepoSource {
    type Err = SourceError;

    fn from_str(s: &str) -> SourceResult<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.provider, self.owner, self.repo)?;
        if !self.subpath.is_empty() {
            write!(f, "/{}", self.subpath)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, "#{reference}")?;
        }
        Ok(())
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn build_url(base: &str, segments: &[&str]) -> SourceResult<Url> {
    let mut url = Url::parse(base).map_err(|e| SourceError::invalid(base, e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| SourceError::invalid(base, "not a base URL"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(input: &str) -> RepoSource {
        RepoSource::parse(input).unwrap()
    }

    #[test]
    fn test_parse_shorthand() {
        let source = parse("octocat/hello-world");
        assert_eq!(source.provider, Provider::GitHub);
        assert_eq!(source.owner, "octocat");
        assert_eq!(source.repo, "hello-world");
        assert_eq!(source.reference, None);
        assert!(source.subpath.is_empty());
    }

    #[test]
    fn test_parse_shorthand_with_subpath_and_ref() {
        let source = parse("octocat/hello-world/packages/core/#v1.2.0");
        assert_eq!(source.subpath.segments(), ["packages", "core"]);
        assert_eq!(source.reference.as_deref(), Some("v1.2.0"));
    }

    #[test]
    fn test_parse_provider_prefixes() {
        assert_eq!(parse("github:a/b").provider, Provider::GitHub);
        assert_eq!(parse("gitlab:a/b").provider, Provider::GitLab);

        let source = parse("bitbucket:team/tool.git/docs");
        assert_eq!(source.provider, Provider::Bitbucket);
        assert_eq!(source.repo, "tool");
        assert_eq!(source.subpath.to_string(), "docs");
    }

    #[test]
    fn test_parse_github_url() {
        let source = parse("https://github.com/octocat/hello-world");
        assert_eq!(source.owner, "octocat");
        assert_eq!(source.repo, "hello-world");
        assert_eq!(source.reference, None);

        let source = parse("https://github.com/octocat/hello-world/tree/main/src/lib/");
        assert_eq!(source.reference.as_deref(), Some("main"));
        assert_eq!(source.subpath.to_string(), "src/lib");

        let source = parse("https://github.com/octocat/hello-world.git");
        assert_eq!(source.repo, "hello-world");
    }

    #[test]
    fn test_parse_gitlab_url_with_subgroups() {
        let source = parse("https://gitlab.com/group/sub/project/-/tree/dev/docs");
        assert_eq!(source.provider, Provider::GitLab);
        assert_eq!(source.owner, "group/sub");
        assert_eq!(source.repo, "project");
        assert_eq!(source.reference.as_deref(), Some("dev"));
        assert_eq!(source.subpath.to_string(), "docs");

        let source = parse("https://gitlab.com/group/sub/project");
        assert_eq!(source.owner, "group/sub");
        assert!(source.subpath.is_empty());
    }

    #[test]
    fn test_parse_bitbucket_url() {
        let source = parse("https://bitbucket.org/team/tool/src/master/docs/api");
        assert_eq!(source.provider, Provider::Bitbucket);
        assert_eq!(source.reference.as_deref(), Some("master"));
        assert_eq!(source.subpath.to_string(), "docs/api");
    }

    #[test]
    fn test_explicit_ref_overrides_url_ref() {
        let source = parse("https://github.com/o/r/tree/main/src#v2");
        assert_eq!(source.reference.as_deref(), Some("v2"));
        assert_eq!(source.subpath.to_string(), "src");
    }

    #[test]
    fn test_parse_ssh() {
        let source = parse("git@gitlab.com:group/sub/project.git");
        assert_eq!(source.provider, Provider::GitLab);
        assert_eq!(source.owner, "group/sub");
        assert_eq!(source.repo, "project");
    }

    #[test]
    fn test_parse_errors() {
        for input in ["", "   ", "owner", "owner/", "a/b#", "gitea:a/b", "git@github.com"] {
            let err = RepoSource::parse(input).unwrap_err();
            assert!(
                matches!(err, SourceError::InvalidSource { .. }),
                "{input:?}: {err}"
            );
        }
    }

    #[test]
    fn test_parse_unsupported_host() {
        let err = RepoSource::parse("https://example.com/a/b").unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedHost { host } if host == "example.com"));
    }

    #[test]
    fn test_parse_unrecognised_url_tail() {
        let err = RepoSource::parse("https://github.com/o/r/issues/1").unwrap_err();
        assert!(err.to_string().contains("tree"));
    }

    #[test]
    fn test_archive_url_github() {
        let source = parse("octocat/hello-world");
        assert_eq!(
            source.archive_url().unwrap().as_str(),
            "https://api.github.com/repos/octocat/hello-world/tarball"
        );

        let source = source.with_reference("feature/x");
        assert_eq!(
            source.archive_url().unwrap().as_str(),
            "https://api.github.com/repos/octocat/hello-world/tarball/feature%2Fx"
        );
    }

    #[test]
    fn test_archive_url_gitlab() {
        let source = parse("https://gitlab.com/group/sub/project/-/tree/dev/docs");
        assert_eq!(
            source.archive_url().unwrap().as_str(),
            "https://gitlab.com/api/v4/projects/group%2Fsub%2Fproject/repository/archive.tar.gz?sha=dev"
        );
    }

    #[test]
    fn test_archive_url_bitbucket() {
        let source = parse("bitbucket:team/tool");
        assert_eq!(
            source.archive_url().unwrap().as_str(),
            "https://bitbucket.org/team/tool/get/HEAD.tar.gz"
        );
        assert_eq!(
            source.with_reference("v1").archive_url().unwrap().as_str(),
            "https://bitbucket.org/team/tool/get/v1.tar.gz"
        );
    }

    #[test]
    fn test_default_folder_name() {
        assert_eq!(parse("o/r").default_folder_name(), "r");
        assert_eq!(parse("o/r/a/b").default_folder_name(), "b");
    }

    #[test]
    fn test_display_and_from_str() {
        let source: RepoSource = "gitlab:g/p/docs#main".parse().unwrap();
        assert_eq!(source.to_string(), "gitlab:g/p/docs#main");
        assert_eq!(parse("o/r").to_string(), "github:o/r");
    }
}
