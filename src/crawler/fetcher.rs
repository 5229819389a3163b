//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by the engine, including:
//! - Building HTTP clients with a proper user agent string and timeouts
//! - GET requests for page markup, following redirects manually
//! - HEAD probes for link checking, retried once with GET when the target
//!   does not support HEAD
//! - Error classification (timeout, connection failure, HTTP error)

use crate::config::{Config, FetcherConfig, UserAgentConfig};
use crate::document::{parse_document, ParsedDocument};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Redirect hops followed when fetching a page for audit
const MAX_PAGE_REDIRECTS: usize = 10;

/// Failure classes of a single request
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connection { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Http {
        url: String,
        status: u16,
        /// Response body, kept for callers that still want it
        body: String,
    },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Redirect loop detected at {url}")]
    RedirectLoop { url: String },

    #[error("Too many redirects from {url}")]
    TooManyRedirects { url: String },

    #[error("Request failed for {url}: {message}")]
    Other { url: String, message: String },
}

impl FetchError {
    /// True for the timeout class, which callers may retry
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// HTTP status for [`FetchError::Http`], `None` otherwise
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A page retrieved with GET
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested
    pub url: String,
    /// URL that answered after redirects
    pub final_url: Url,
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

/// Outcome of a HEAD (or fallback GET) probe
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The server answered; redirects are not followed
    Response {
        status: u16,
        /// `Location` header resolved against the probed URL
        location: Option<Url>,
    },
    /// No response at all
    Failed(FetchError),
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are disabled: page fetches and link probes follow them
/// manually so every hop can be recorded.
///
/// # Example
///
/// ```no_run
/// use seo_audit::config::{FetcherConfig, UserAgentConfig};
/// use seo_audit::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    fetcher: &FetcherConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_millis(fetcher.request_timeout_ms))
        .connect_timeout(Duration::from_millis(fetcher.connect_timeout_ms))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Classifies a transport error
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Other {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

fn location_of(response: &Response, base: &Url) -> Option<Url> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|location| base.join(location.trim()).ok())
}

/// Cheaply cloneable HTTP front end shared by every component
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    /// Builds a fetcher from the fetcher and user-agent sections of `config`
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.fetcher, &config.user_agent)?;
        Ok(Self::with_client(client, config.fetcher.max_body_bytes))
    }

    pub fn with_client(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a page with GET
    ///
    /// # Request Flow
    ///
    /// 1. Send GET
    /// 2. On 3xx, follow `Location` (max 10 hops, loops rejected)
    /// 3. Read the body, truncated to the configured maximum
    /// 4. 4xx/5xx → [`FetchError::Http`] carrying the body
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout | `Timeout` |
    /// | Connection refused / DNS / TLS | `Connection` |
    /// | HTTP 4xx/5xx | `Http { status, body }` |
    /// | Redirect loop | `RedirectLoop` |
    /// | Redirect chain > 10 | `TooManyRedirects` |
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let mut visited = HashSet::new();
        visited.insert(current.to_string());

        for _ in 0..=MAX_PAGE_REDIRECTS {
            tracing::debug!("GET {}", current);
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| classify_error(current.as_str(), e))?;
            let status = response.status();

            if status.is_redirection() {
                let Some(next) = location_of(&response, &current) else {
                    return Err(FetchError::Http {
                        url: current.to_string(),
                        status: status.as_u16(),
                        body: String::new(),
                    });
                };
                if !visited.insert(next.to_string()) {
                    return Err(FetchError::RedirectLoop {
                        url: next.to_string(),
                    });
                }
                tracing::debug!("{} redirected ({}) to {}", current, status, next);
                current = next;
                continue;
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            let body = self.read_body(response, current.as_str()).await?;

            if status.is_client_error() || status.is_server_error() {
                return Err(FetchError::Http {
                    url: current.to_string(),
                    status: status.as_u16(),
                    body,
                });
            }

            return Ok(FetchedPage {
                url: url.to_string(),
                final_url: current,
                status: status.as_u16(),
                content_type,
                body,
            });
        }

        Err(FetchError::TooManyRedirects {
            url: url.to_string(),
        })
    }

    /// Fetches and parses a page; relative links resolve against the final URL
    pub async fn fetch_document(&self, url: &str) -> Result<ParsedDocument, FetchError> {
        let page = self.fetch(url).await?;
        tracing::info!(
            "Fetched {} ({} bytes, status {})",
            page.final_url,
            page.body.len(),
            page.status
        );
        Ok(parse_document(&page.body, &page.final_url))
    }

    /// Reads a response body, stopping at `max_body_bytes`
    async fn read_body(&self, mut response: Response, url: &str) -> Result<String, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| classify_error(url, e))?
        {
            let remaining = self.max_body_bytes.saturating_sub(body.len());
            if chunk.len() >= remaining {
                body.extend_from_slice(&chunk[..remaining]);
                tracing::warn!("Truncated body of {} at {} bytes", url, self.max_body_bytes);
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Probes a link without downloading its body
    ///
    /// Sends HEAD; when the server answers with an error status the probe is
    /// retried once with GET (whose body is never read). Some servers reject
    /// HEAD outright or answer it with 403/404 while serving GET. If the GET
    /// itself cannot be sent, the HEAD answer stands.
    pub async fn probe(&self, url: &Url) -> ProbeOutcome {
        let head = match self.client.head(url.clone()).send().await {
            Ok(response) => Self::probe_outcome(&response, url),
            Err(e) => return ProbeOutcome::Failed(classify_error(url.as_str(), e)),
        };

        let head_status = match head {
            ProbeOutcome::Response { status, .. } if status >= 400 => status,
            _ => return head,
        };
        tracing::debug!("HEAD {} answered {}, retrying with GET", url, head_status);

        match self.client.get(url.clone()).send().await {
            Ok(response) => Self::probe_outcome(&response, url),
            Err(e) => {
                tracing::debug!("GET retry for {} failed: {}", url, e);
                head
            }
        }
    }

    fn probe_outcome(response: &Response, url: &Url) -> ProbeOutcome {
        let status = response.status();
        ProbeOutcome::Response {
            status: status.as_u16(),
            location: if status.is_redirection() {
                location_of(response, url)
            } else {
                None
            },
        }
    }
}
