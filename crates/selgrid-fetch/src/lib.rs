//! selgrid-fetch — queries the Selenium Grid hub.
//!
//! [`HubClient`] performs exactly one HTTP/1.1 exchange per call against
//! the endpoint derived from the scrape URI and the active [`GridApi`].
//! The whole exchange (connect, request, body) is bounded by a fixed
//! timeout. There are no retries, and the HTTP status is not inspected:
//! whatever body the hub sends back is handed to the decoder, as long as
//! it fits in [`MAX_BODY_BYTES`].

use std::time::Duration;

use bytes::Bytes;
use http::uri::Uri;
use http::{Method, Request, header};
use http_body_util::{BodyExt, Full, Limited};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use selgrid_core::{FetchError, GridApi, HubRequest};

/// Upper bound for one hub exchange.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Largest hub response body accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const USER_AGENT: &str = concat!("selgrid-exporter/", env!("CARGO_PKG_VERSION"));

/// HTTP client bound to one hub endpoint.
#[derive(Debug, Clone)]
pub struct HubClient {
    api: GridApi,
    request: HubRequest,
    endpoint: Uri,
    /// `host:port` to dial.
    addr: String,
    /// Value of the `Host` header.
    host: String,
    timeout: Duration,
}

impl HubClient {
    /// Create a client for `scrape_uri` with the default timeout.
    pub fn new(scrape_uri: &str, api: GridApi) -> Result<Self, FetchError> {
        Self::with_timeout(scrape_uri, api, FETCH_TIMEOUT)
    }

    /// Create a client with a custom timeout (for testing).
    pub fn with_timeout(
        scrape_uri: &str,
        api: GridApi,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let request = api.request();
        let base = scrape_uri.trim().trim_end_matches('/');
        let invalid = |reason: String| FetchError::InvalidUri {
            uri: scrape_uri.to_string(),
            reason,
        };

        let endpoint = format!("{base}{}", request.path())
            .parse::<Uri>()
            .map_err(|e| invalid(e.to_string()))?;

        match endpoint.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(FetchError::UnsupportedScheme(other.to_string())),
            None => return Err(invalid("missing scheme".to_string())),
        }

        let authority = endpoint
            .authority()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let addr = format!("{}:{}", authority.host(), authority.port_u16().unwrap_or(80));
        let host = authority.as_str().to_string();

        Ok(Self {
            api,
            request,
            endpoint,
            addr,
            host,
            timeout,
        })
    }

    /// The grid API variant this client speaks.
    pub fn api(&self) -> GridApi {
        self.api
    }

    /// Full URI of the hub endpoint.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query the hub once and return the raw response body.
    pub async fn fetch(&self) -> Result<Bytes, FetchError> {
        match tokio::time::timeout(self.timeout, self.exchange()).await {
            Ok(result) => result,
            Err(_) => {
                debug!(uri = %self.endpoint, timeout = ?self.timeout, "hub request timed out");
                Err(FetchError::Timeout {
                    uri: self.endpoint.to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn exchange(&self) -> Result<Bytes, FetchError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| FetchError::Connect {
                addr: self.addr.clone(),
                source,
            })?;

        let io = TokioIo::new(stream);
        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| FetchError::Http(format!("handshake failed: {e}")))?;

        // Drive the connection in the background.
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "hub connection closed with error");
            }
        });

        let resp = sender
            .send_request(self.build_request()?)
            .await
            .map_err(|e| FetchError::Http(format!("request failed: {e}")))?;

        debug!(status = %resp.status(), uri = %self.endpoint, "hub responded");

        let body = Limited::new(resp.into_body(), MAX_BODY_BYTES)
            .collect()
            .await
            .map_err(|e| FetchError::Http(format!("reading body failed: {e}")))?
            .to_bytes();

        Ok(body)
    }

    fn build_request(&self) -> Result<Request<Full<Bytes>>, FetchError> {
        let path = self
            .endpoint
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/");

        let builder = Request::builder()
            .uri(path)
            .header(header::HOST, &self.host)
            .header(header::USER_AGENT, USER_AGENT);

        let req = match &self.request {
            HubRequest::Get { .. } => builder.method(Method::GET).body(Full::new(Bytes::new())),
            HubRequest::Post { body, .. } => builder
                .method(Method::POST)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Full::new(Bytes::from(body.clone()))),
        };

        req.map_err(|e| FetchError::Http(e.to_string()))
    }
}
