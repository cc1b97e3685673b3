//! HTTP plumbing shared by every resource operation.

use std::fmt;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::models::Record;
use crate::pagination::{Pages, next_link};
use crate::token::AccessToken;

/// Page size requested on the first request of every listing.
pub const DEFAULT_PER_PAGE: u32 = 100;

const USER_AGENT: &str = concat!("canvas-tools/", env!("CARGO_PKG_VERSION"));

/// Settings for constructing a [`CanvasClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `https://school.instructure.com/`.
    pub base_url: Url,
    /// Bearer credential attached to every request.
    pub token: AccessToken,
    /// Request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
    /// `per_page` sent with listing requests.
    pub per_page: u32,
}

impl ClientConfig {
    /// Configuration with transport defaults.
    #[must_use]
    pub const fn new(base_url: Url, token: AccessToken) -> Self {
        Self {
            base_url,
            token,
            timeout: None,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Authenticated Canvas API client.
///
/// Built once per process and passed by reference to every operation; the
/// token is held here rather than in global state.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    http: Client,
    base_url: Url,
    token: AccessToken,
    per_page: u32,
}

/// Parse and normalise a server root.
///
/// The result always ends in `/` and carries no query or fragment, so that
/// `https://host/canvas` addresses `https://host/canvas/api/v1/...`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidBaseUrl`] for unparsable or non-HTTP input.
pub fn parse_base_url(input: &str) -> ClientResult<Url> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        value: input.to_string(),
        reason,
    };

    let mut url = Url::parse(input.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "scheme '{}' is not http or https",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

impl CanvasClient {
    /// Client for `base_url` with transport defaults.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(base_url: Url, token: AccessToken) -> ClientResult<Self> {
        Self::from_config(ClientConfig::new(base_url, token))
    }

    /// Client built from an explicit [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| ClientError::HttpClient { source })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            token: config.token,
            per_page: config.per_page.max(1),
        })
    }

    /// Server root every endpoint is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch a single resource as an untyped record.
    ///
    /// `path` is relative to the base URL, e.g. `api/v1/courses/12`.
    ///
    /// # Errors
    ///
    /// Returns a remote error on non-2xx status, transport failure or
    /// malformed JSON.
    pub fn get_record(&self, path: &str, query: &[(&str, &str)]) -> ClientResult<Record> {
        let url = self.endpoint_path(path)?;
        self.get_json(url, query)
    }

    /// Lazily list a collection as untyped records, following pagination.
    #[must_use]
    pub fn list_records(&self, path: &str, query: &[(&str, &str)]) -> Pages<'_, Record> {
        Pages::new(self, self.endpoint_path(path), query)
    }

    /// Resolve slash-separated `path` beneath the base URL.
    pub(crate) fn endpoint_path(&self, path: &str) -> ClientResult<Url> {
        let segments: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
        self.endpoint(&segments).map_err(|_| ClientError::InvalidEndpoint {
            path: path.to_string(),
        })
    }

    /// Resolve `segments` beneath the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidEndpoint {
                path: segments.join("/"),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self.execute(Method::GET, url.clone(), |request| request.query(query))?;
        decode(&Method::GET, url, response)
    }

    pub(crate) fn send_json<B, T>(&self, method: Method, url: Url, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method.clone(), url.clone(), |request| request.json(body))?;
        decode(&method, url, response)
    }

    pub(crate) fn delete_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response =
            self.execute(Method::DELETE, url.clone(), |request| request.query(query))?;
        decode(&Method::DELETE, url, response)
    }

    /// Fetch one page: its items and the `next` link, if any.
    pub(crate) fn fetch_page<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(String, String)],
    ) -> ClientResult<(Vec<T>, Option<Url>)> {
        let response = self.execute(Method::GET, url.clone(), |request| request.query(query))?;
        let next = next_link(response.headers(), &url);
        let items: Vec<T> = decode(&Method::GET, url, response)?;
        Ok((items, next))
    }

    /// Refuse pagination links that would carry the token to another origin.
    pub(crate) fn check_page_link(&self, link: Url) -> ClientResult<Url> {
        if link.origin() == self.base_url.origin() {
            Ok(link)
        } else {
            tracing::warn!(link = %link, "pagination link leaves the configured server");
            Err(ClientError::ForeignPageLink {
                link,
                base: self.base_url.clone(),
            })
        }
    }

    pub(crate) const fn per_page(&self) -> u32 {
        self.per_page
    }

    fn execute(
        &self,
        method: Method,
        url: Url,
        customize: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> ClientResult<Response> {
        debug!(method = %method, url = %url, "sending request");
        let request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(self.token.as_str())
            .header(ACCEPT, "application/json");

        let response = customize(request)
            .send()
            .map_err(|source| ClientError::Transport {
                method: method.clone(),
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(method = %method, url = %url, status = %status, "received response");
        if status.is_success() {
            return Ok(response);
        }

        let body = error_body(response.text());
        Err(ClientError::Status {
            method,
            url,
            status,
            body,
        })
    }
}

/// Body of a failed response; a read failure is kept in the text.
fn error_body<E: fmt::Display>(read: Result<String, E>) -> String {
    read.unwrap_or_else(|err| {
        debug!(error = %err, "failed to read error response body");
        format!("<unreadable body: {err}>")
    })
}

fn decode<T: DeserializeOwned>(method: &Method, url: Url, response: Response) -> ClientResult<T> {
    let text = response.text().map_err(|source| ClientError::Transport {
        method: method.clone(),
        url: url.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ClientError::Decode {
        method: method.clone(),
        url,
        source,
    })
}
