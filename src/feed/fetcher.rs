use crate::feed::model::{ParsedFeed, MAX_ENTRIES};
use crate::feed::parser::parse_feed;
use crate::util::{validate_feed_url, UrlValidationError};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while fetching a feed.
///
/// These never propagate out of [`Fetcher::fetch`]; they are captured in
/// [`FetchResult::error`]. Every message names the requested URL.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Response with a status other than 2xx or 304
    #[error("HTTP status error while requesting {url}: {status}")]
    HttpStatus { url: String, status: u16 },
    /// Request and body read together exceeded the configured timeout
    #[error("Timeout while requesting {url}")]
    Timeout { url: String },
    /// Network-level error (DNS, connection, TLS, redirect loop, etc.)
    #[error("Error while requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// Response body exceeded the configured size limit
    #[error("Error while requesting {url}: response exceeds {limit} bytes")]
    ResponseTooLarge { url: String, limit: usize },
    /// URL was rejected before any request was sent
    #[error("Error while requesting {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: UrlValidationError,
    },
}

impl FetchError {
    /// The URL whose request failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::HttpStatus { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Transport { url, .. }
            | FetchError::ResponseTooLarge { url, .. }
            | FetchError::InvalidUrl { url, .. } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// Tokens for a conditional GET.
///
/// Sent as `If-None-Match` / `If-Modified-Since` on the way out, and filled
/// from the `ETag` / `Last-Modified` response headers on the way back so the
/// next fetch can reuse them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheValidators {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl CacheValidators {
    /// Builds validators from raw tokens. Empty strings mean "absent", so no
    /// header is sent for them.
    pub fn new(last_modified: impl Into<String>, etag: impl Into<String>) -> Self {
        Self {
            etag: non_blank(etag.into()),
            last_modified: non_blank(last_modified.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }

    /// Fills whichever validator is missing from `fallback`.
    fn or(self, fallback: &CacheValidators) -> Self {
        Self {
            etag: self.etag.or_else(|| fallback.etag.clone()),
            last_modified: self
                .last_modified
                .or_else(|| fallback.last_modified.clone()),
        }
    }

    fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .and_then(non_blank)
        };
        Self {
            etag: read(ETAG),
            last_modified: read(LAST_MODIFIED),
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Outcome of a single fetch.
///
/// `updated` is true only for a fresh HTTP 200. `raw_xml` holds the body of
/// whatever response arrived (including error pages) and stays empty when no
/// response was received at all.
#[derive(Debug, Default)]
pub struct FetchResult {
    /// Parsed feed, present only after an HTTP 200
    pub parsed_feed: Option<ParsedFeed>,
    /// Response body as text (lossy UTF-8)
    pub raw_xml: String,
    /// True when a new version of the feed was downloaded
    pub updated: bool,
    /// Transport or status failure, if any
    pub error: Option<FetchError>,
    /// Validators for the next conditional GET: the server's, or on a 304
    /// the request's own where the server sent none
    pub validators: CacheValidators,
}

/// Tunables for [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Bound on sending the request and reading the whole body
    pub timeout: Duration,
    /// Entries kept per feed; the rest are dropped
    pub max_entries: usize,
    /// Largest accepted response body
    pub max_feed_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_entries: MAX_ENTRIES,
            max_feed_bytes: MAX_FEED_SIZE,
            user_agent: default_user_agent(),
        }
    }
}

/// Returns the user agent string: "refeed/X.Y.Z".
pub fn default_user_agent() -> String {
    format!("refeed/{}", env!("CARGO_PKG_VERSION"))
}

/// Conditional-GET feed fetcher.
///
/// Holds no per-feed state; one `Fetcher` can serve any number of sequential
/// fetches. Cloning is cheap (the `reqwest::Client` is reference counted).
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

/// A response that made it all the way to a fully read body.
struct Received {
    status: StatusCode,
    validators: CacheValidators,
    body: Vec<u8>,
}

impl Fetcher {
    /// Builds a fetcher with its own HTTP client.
    ///
    /// The client follows redirects (reqwest's default policy) and carries
    /// the configured user agent and timeout.
    pub fn new(settings: FetchSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Builds a fetcher around a caller-owned (possibly pooled) client.
    ///
    /// The settings' timeout still bounds every fetch.
    pub fn with_client(client: reqwest::Client, settings: FetchSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetches `url`, sending `validators` as a conditional GET.
    ///
    /// Never fails: every problem ends up in [`FetchResult::error`].
    ///
    /// # Behavior
    ///
    /// - 200: body parsed with feed-rs, entries capped, `updated = true`
    /// - 304: nothing parsed, `updated = false`
    /// - other 2xx: nothing parsed, no error
    /// - anything else: [`FetchError::HttpStatus`]
    /// - timeout: [`FetchError::Timeout`]
    /// - connection, TLS, oversized body, bad URL: generic transport errors
    ///
    /// A malformed body still counts as an update; the feed comes back with
    /// `bozo` set, and a warning is logged when no entries survived.
    pub async fn fetch(&self, url: &str, validators: &CacheValidators) -> FetchResult {
        let mut result = FetchResult::default();

        let exchange =
            match tokio::time::timeout(self.settings.timeout, self.exchange(url, validators)).await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(FetchError::Timeout {
                    url: url.to_string(),
                }),
            };

        let received = match exchange {
            Ok(received) => received,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Feed fetch failed");
                result.error = Some(e);
                return result;
            }
        };

        // raw_xml is only ever assigned from a body that actually arrived
        result.raw_xml = String::from_utf8_lossy(&received.body).into_owned();
        // A 304 often omits the validators; the ones sent are still current
        result.validators = if received.status == StatusCode::NOT_MODIFIED {
            received.validators.or(validators)
        } else {
            received.validators
        };

        match received.status {
            StatusCode::OK => {
                let feed = parse_feed(&received.body, self.settings.max_entries);
                if feed.bozo && feed.entries.is_empty() {
                    tracing::warn!(
                        url = %url,
                        error = feed.bozo_exception.as_deref().unwrap_or("unknown"),
                        "Feed is malformed and yielded no entries"
                    );
                }
                result.parsed_feed = Some(feed);
                result.updated = true;
            }
            StatusCode::NOT_MODIFIED => {
                tracing::debug!(url = %url, "Feed not modified");
            }
            status if status.is_success() => {
                tracing::debug!(
                    url = %url,
                    status = status.as_u16(),
                    "Success status without a feed body, nothing to parse"
                );
            }
            status => {
                let e = FetchError::HttpStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                };
                tracing::error!(url = %url, error = %e, "Feed fetch failed");
                result.error = Some(e);
            }
        }

        result
    }

    async fn exchange(
        &self,
        url: &str,
        validators: &CacheValidators,
    ) -> Result<Received, FetchError> {
        let target = validate_feed_url(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let mut request = self.client.get(target);
        if let Some(etag) = validators.etag.as_deref() {
            request = request.header(IF_NONE_MATCH, etag);
        }
        if let Some(modified) = validators.last_modified.as_deref() {
            request = request.header(IF_MODIFIED_SINCE, modified);
        }

        tracing::info!(method = "GET", url = %url, "Request sent, waiting for response");
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(url, e))?;

        let status = response.status();
        tracing::info!(
            method = "GET",
            url = %response.url(),
            status = status.as_u16(),
            "Response received"
        );

        let validators = CacheValidators::from_headers(response.headers());
        let body = read_limited_bytes(url, response, self.settings.max_feed_bytes).await?;

        Ok(Received {
            status,
            validators,
            body,
        })
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: e,
        }
    }
}

async fn read_limited_bytes(
    url: &str,
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let too_large = || FetchError::ResponseTooLarge {
        url: url.to_string(),
        limit,
    };

    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(too_large());
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transport_error(url, e))?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(too_large());
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogCapture;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
    <title>Test</title>
    <item><guid>1</guid><title>One</title></item>
    <item><guid>2</guid><title>Two</title></item>
    <item><guid>3</guid><title>Three</title></item>
</channel></rss>"#;

    fn rss_with_items(n: usize) -> String {
        let items: String = (0..n)
            .map(|i| format!("<item><guid>item-{i}</guid><title>Item {i}</title></item>"))
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Big</title>{items}</channel></rss>"#)
    }

    fn fetcher() -> Fetcher {
        Fetcher::new(FetchSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("Content-Type", "application/xml"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert!(result.updated);
        assert!(result.error.is_none());
        assert_eq!(result.raw_xml, VALID_RSS);
        let feed = result.parsed_feed.unwrap();
        assert_eq!(feed.entries.len(), 3);
        assert_eq!(feed.entries[0].id.as_deref(), Some("1"));
        assert_eq!(feed.entries[2].id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_fetch_truncates_to_first_thousand_entries() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(rss_with_items(1200)))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        let feed = result.parsed_feed.unwrap();
        assert_eq!(feed.entries.len(), 1000);
        assert_eq!(feed.entries[0].id.as_deref(), Some("item-0"));
        assert_eq!(feed.entries[999].id.as_deref(), Some("item-999"));
    }

    #[tokio::test]
    async fn test_fetch_not_modified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("If-None-Match", "\"v1\""))
            .and(header("If-Modified-Since", "Mon, 01 Jan 2024 00:00:00 GMT"))
            .respond_with(ResponseTemplate::new(304))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let validators = CacheValidators::new("Mon, 01 Jan 2024 00:00:00 GMT", "\"v1\"");
        let result = fetcher().fetch(&url, &validators).await;

        assert!(!result.updated);
        assert!(result.parsed_feed.is_none());
        assert!(result.error.is_none());
        assert_eq!(result.raw_xml, "");
        // No validators in the 304, so the sent ones carry over
        assert_eq!(result.validators, validators);
    }

    #[tokio::test]
    async fn test_not_modified_prefers_refreshed_validators() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(304).insert_header("ETag", "\"v2\""))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let sent = CacheValidators::new("Mon, 01 Jan 2024 00:00:00 GMT", "\"v1\"");
        let result = fetcher().fetch(&url, &sent).await;

        assert_eq!(result.validators.etag.as_deref(), Some("\"v2\""));
        assert_eq!(
            result.validators.last_modified.as_deref(),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
    }

    #[tokio::test]
    async fn test_empty_validators_send_no_conditional_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        fetcher().fetch(&url, &CacheValidators::new("", "")).await;

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("if-none-match"));
        assert!(!requests[0].headers.contains_key("if-modified-since"));
    }

    #[tokio::test]
    async fn test_response_validators_are_returned() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .insert_header("ETag", "\"abc\"")
                    .insert_header("Last-Modified", "Tue, 02 Jan 2024 00:00:00 GMT"),
            )
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert_eq!(result.validators.etag.as_deref(), Some("\"abc\""));
        assert_eq!(
            result.validators.last_modified.as_deref(),
            Some("Tue, 02 Jan 2024 00:00:00 GMT")
        );
    }

    #[tokio::test]
    async fn test_fetch_500_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1) // No retries
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert!(!result.updated);
        assert!(result.parsed_feed.is_none());
        assert_eq!(result.raw_xml, "boom");
        let err = result.error.unwrap();
        match &err {
            FetchError::HttpStatus { status: 500, .. } => {}
            e => panic!("Expected HttpStatus(500), got {:?}", e),
        }
        assert_eq!(err.url(), url);
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains(&url));
    }

    #[tokio::test]
    async fn test_fetch_404_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        match result.error {
            Some(FetchError::HttpStatus { status: 404, .. }) => {}
            e => panic!("Expected HttpStatus(404), got {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let settings = FetchSettings {
            timeout: Duration::from_millis(200),
            ..FetchSettings::default()
        };
        let url = format!("{}/feed", mock_server.uri());
        let result = Fetcher::new(settings)
            .unwrap()
            .fetch(&url, &CacheValidators::default())
            .await;

        let err = result.error.unwrap();
        assert!(err.is_timeout(), "Expected timeout, got {:?}", err);
        assert!(err.to_string().starts_with("Timeout while requesting"));
        assert!(!result.updated);
        assert_eq!(result.raw_xml, "");
    }

    #[tokio::test]
    async fn test_shared_client_still_bounded_by_settings_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(VALID_RSS)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        // Caller-owned client with no timeout of its own
        let client = reqwest::Client::new();
        let settings = FetchSettings {
            timeout: Duration::from_millis(200),
            ..FetchSettings::default()
        };
        let fetcher = Fetcher::with_client(client, settings);
        assert_eq!(fetcher.settings().timeout, Duration::from_millis(200));

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher.fetch(&url, &CacheValidators::default()).await;

        let err = result.error.unwrap();
        assert!(err.is_timeout(), "Expected timeout, got {:?}", err);
        assert_eq!(err.url(), url);
        assert_eq!(result.raw_xml, "");
    }

    #[tokio::test]
    async fn test_connection_failure_leaves_raw_xml_empty() {
        // Bind then drop a listener to get a port nobody is serving
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = format!("http://127.0.0.1:{}/feed", port);
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        match &result.error {
            Some(FetchError::Transport { .. }) => {}
            e => panic!("Expected Transport error, got {:?}", e),
        }
        assert!(result
            .error
            .as_ref()
            .unwrap()
            .to_string()
            .starts_with(&format!("Error while requesting {}", url)));
        assert_eq!(result.raw_xml, "");
        assert!(!result.updated);
        assert!(result.parsed_feed.is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_transport_error() {
        let result = fetcher()
            .fetch("ftp://example.com/feed", &CacheValidators::default())
            .await;

        match result.error {
            Some(FetchError::InvalidUrl { ref url, .. }) => assert_eq!(url, "ftp://example.com/feed"),
            ref e => panic!("Expected InvalidUrl, got {:?}", e),
        }
        assert_eq!(result.raw_xml, "");
    }

    #[tokio::test]
    async fn test_follows_redirects() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("Location", format!("{}/feed", mock_server.uri()).as_str()),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/feed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let url = format!("{}/old", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert!(result.updated);
        assert_eq!(result.parsed_feed.unwrap().entries.len(), 3);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let settings = FetchSettings {
            max_feed_bytes: 16,
            ..FetchSettings::default()
        };
        let url = format!("{}/feed", mock_server.uri());
        let result = Fetcher::new(settings)
            .unwrap()
            .fetch(&url, &CacheValidators::default())
            .await;

        match result.error {
            Some(FetchError::ResponseTooLarge { limit: 16, .. }) => {}
            e => panic!("Expected ResponseTooLarge, got {:?}", e),
        }
        assert_eq!(result.raw_xml, "");
    }

    #[tokio::test]
    async fn test_malformed_feed_is_bozo_and_warns() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<not valid xml"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert!(result.updated);
        assert!(result.error.is_none());
        assert_eq!(result.raw_xml, "<not valid xml");
        let feed = result.parsed_feed.unwrap();
        assert!(feed.bozo);
        assert!(feed.entries.is_empty());

        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("Feed is malformed and yielded no entries"));
    }

    #[tokio::test]
    async fn test_request_and_response_are_logged() {
        let logs = LogCapture::default();
        let _guard = logs.install();

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        fetcher().fetch(&url, &CacheValidators::default()).await;

        let output = logs.contents();
        assert!(output.contains("Request sent, waiting for response"));
        assert!(output.contains("Response received"));
        assert!(output.contains("status=200"));
    }

    #[tokio::test]
    async fn test_other_success_status_is_not_an_update() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed", mock_server.uri());
        let result = fetcher().fetch(&url, &CacheValidators::default()).await;

        assert!(!result.updated);
        assert!(result.error.is_none());
        assert!(result.parsed_feed.is_none());
    }

    #[test]
    fn test_cache_validators_treat_blank_as_absent() {
        let v = CacheValidators::new("", "  ");
        assert!(v.is_empty());

        let v = CacheValidators::new("Mon, 01 Jan 2024 00:00:00 GMT", "\"x\"");
        assert_eq!(v.etag.as_deref(), Some("\"x\""));
        assert!(!v.is_empty());
    }

    #[test]
    fn test_default_user_agent() {
        assert!(default_user_agent().starts_with("refeed/"));
    }
}
