//! Archive download.

use std::io::{self};
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use futures_util::StreamExt;

use crate::Provider;
use crate::RepoSource;
use crate::SourceError;

/// A boxed stream of archive bytes.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// Default `User-Agent` header sent to providers.
pub const DEFAULT_USER_AGENT: &str = concat!("gitslice/", env!("CARGO_PKG_VERSION"));

/// Options for downloading an archive.
#[derive(Clone)]
pub struct FetchOptions {
    /// Access token for private repositories and higher rate limits.
    pub token: Option<String>,

    /// `User-Agent` header value. GitHub rejects requests without one.
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchOptions {
    /// Sets the access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl std::fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOptions")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Header carrying `token` for `provider`.
fn auth_header(provider: Provider, token: &str) -> (&'static str, String) {
    match provider {
        Provider::GitLab => ("PRIVATE-TOKEN", token.to_string()),
        Provider::GitHub | Provider::Bitbucket => ("Authorization", format!("Bearer {token}")),
    }
}

/// Requests the tarball of `source` and returns its body as a byte stream.
///
/// Redirects to the provider's download host are followed. The body is not
/// buffered; chunks arrive as the server sends them.
///
/// # Errors
///
/// Returns [`SourceError::Request`] if the request cannot be sent and
/// [`SourceError::Http`] if the provider answers with a non-success status.
/// Transport failures after the response started arrive as `Err` items in
/// the stream.
pub async fn fetch_archive(
    source: &RepoSource,
    options: &FetchOptions,
) -> Result<ByteStream, SourceError> {
    let url = source.archive_url()?;
    log::debug!("requesting {url}");

    let client = reqwest::Client::builder()
        .user_agent(options.user_agent.as_str())
        .build()?;

    let mut request = client.get(url.clone());
    if let Some(token) = &options.token {
        let (name, value) = auth_header(source.provider, token);
        request = request.header(name, value);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    log::debug!(
        "downloading from {} ({})",
        response.url(),
        response
            .content_length()
            .map_or_else(|| "unknown size".to_string(), |len| format!("{len} bytes"))
    );

    let stream = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(io::Error::other));

    Ok(Box::pin(stream))
}
