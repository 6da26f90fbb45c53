//! Supported Git hosting providers.

use std::fmt;

/// A Git hosting provider that serves repository tarballs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Provider {
    /// github.com
    #[default]
    GitHub,

    /// gitlab.com
    GitLab,

    /// bitbucket.org
    Bitbucket,
}

impl Provider {
    /// All supported providers.
    pub const ALL: [Self; 3] = [Self::GitHub, Self::GitLab, Self::Bitbucket];

    /// Looks up a provider by its source prefix tag (`github`, `gitlab`,
    /// `bitbucket`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|provider| provider.name().eq_ignore_ascii_case(tag))
    }

    /// Looks up a provider by web host name. A leading `www.` is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use gitslice_core::Provider;
    ///
    /// assert_eq!(Provider::from_host("www.github.com"), Some(Provider::GitHub));
    /// assert_eq!(Provider::from_host("gitlab.com"), Some(Provider::GitLab));
    /// assert_eq!(Provider::from_host("example.com"), None);
    /// ```
    #[must_use]
    pub fn from_host(host: &str) -> Option<Self> {
        let host = host.strip_prefix("www.").unwrap_or(host);
        Self::ALL
            .into_iter()
            .find(|provider| provider.host().eq_ignore_ascii_case(host))
    }

    /// Returns the lowercase provider name, which is also its source tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    /// Returns the web host of the provider.
    #[must_use]
    pub const fn host(self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::Bitbucket => "bitbucket.org",
        }
    }

    /// Path segment that separates the repository from `<ref>/<path>` in
    /// web URLs, such as `tree` in `github.com/o/r/tree/main/src`.
    pub(crate) const fn tree_marker(self) -> &'static str {
        match self {
            Self::GitHub | Self::GitLab => "tree",
            Self::Bitbucket => "src",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Provider::from_tag("github"), Some(Provider::GitHub));
        assert_eq!(Provider::from_tag("GitLab"), Some(Provider::GitLab));
        assert_eq!(Provider::from_tag("bitbucket"), Some(Provider::Bitbucket));
        assert_eq!(Provider::from_tag("sourcehut"), None);
    }

    #[test]
    fn test_from_host() {
        assert_eq!(Provider::from_host("github.com"), Some(Provider::GitHub));
        assert_eq!(
            Provider::from_host("www.bitbucket.org"),
            Some(Provider::Bitbucket)
        );
        assert_eq!(Provider::from_host("api.github.com"), None);
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(Provider::default(), Provider::GitHub);
        assert_eq!(Provider::GitLab.to_string(), "gitlab");
    }
}
