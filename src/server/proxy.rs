use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use reqwest::{redirect, Client, Url};
use thiserror::Error;
use tracing::debug;

/// Budget for the upstream to produce response headers. Once bytes are
/// flowing the stream runs until either side closes.
const FIRST_BYTE_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const FALLBACK_CONTENT_TYPE: &str = "video/mp4";

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing url parameter")]
    MissingUrl,
    #[error("invalid upstream url")]
    InvalidUrl,
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("upstream timed out")]
    Timeout,
}

impl ProxyError {
    fn status(&self) -> StatusCode {
        match self {
            Self::MissingUrl | Self::InvalidUrl => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (
            self.status(),
            axum::Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

// ── ProxyRelay – streams upstream media bytes to the caller ───────────────────

pub struct ProxyRelay {
    client: Client,
    first_byte_timeout: Duration,
}

impl Default for ProxyRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyRelay {
    pub fn new() -> Self {
        Self::with_timeouts(FIRST_BYTE_TIMEOUT, CONNECT_TIMEOUT)
    }

    /// Timeouts are injectable so the budget can be shrunk under test.
    pub fn with_timeouts(first_byte: Duration, connect: Duration) -> Self {
        // Redirects are surfaced to the caller instead of being followed on
        // this connection, so the client policy disables them entirely.
        Self {
            client: Client::builder()
                .redirect(redirect::Policy::none())
                .connect_timeout(connect)
                .build()
                .expect("Failed to build HTTP client"),
            first_byte_timeout: first_byte,
        }
    }

    /// Decode and validate the `url` query parameter. Runs before any
    /// upstream I/O: a bad target never opens a connection.
    pub fn parse_target(raw: Option<&str>) -> Result<Url, ProxyError> {
        let raw = raw.ok_or(ProxyError::MissingUrl)?;
        if raw.is_empty() {
            return Err(ProxyError::MissingUrl);
        }
        let decoded = urlencoding::decode(raw).map_err(|_| ProxyError::InvalidUrl)?;
        let url = Url::parse(&decoded).map_err(|_| ProxyError::InvalidUrl)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ProxyError::InvalidUrl),
        }
    }

    /// Open one upstream connection, forward the inbound `Range` header, and
    /// pipe the response body back without buffering it.
    pub async fn relay(
        &self,
        target: Url,
        range: Option<&HeaderValue>,
    ) -> Result<Response, ProxyError> {
        let origin = target.origin().ascii_serialization();

        let mut request = self
            .client
            .get(target.clone())
            .header(header::USER_AGENT, "Mozilla/5.0")
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_ENCODING, "identity")
            .header(header::REFERER, format!("{origin}/"));
        if let Some(range) = range {
            request = request.header(header::RANGE, range.clone());
        }

        let upstream = tokio::time::timeout(self.first_byte_timeout, request.send())
            .await
            .map_err(|_| ProxyError::Timeout)??;

        let status = upstream.status();

        // Redirects become a redirect-to-self so the caller's own redirect
        // budget bounds the chain and this request never holds two upstream
        // sockets at once.
        if matches!(status.as_u16(), 301 | 302 | 307 | 308) {
            if let Some(location) = upstream
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                debug!("upstream redirect: {} -> {location}", target);
                let reissue = format!("/video-proxy?url={}", urlencoding::encode(location));
                return Ok(Redirect::temporary(&reissue).into_response());
            }
        }

        let mut builder = Response::builder()
            .status(StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY))
            .header(header::ACCEPT_RANGES, "bytes");

        let content_type = upstream
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        builder = builder.header(header::CONTENT_TYPE, content_type);

        for name in [header::CONTENT_LENGTH, header::CONTENT_RANGE] {
            if let Some(value) = upstream.headers().get(&name).and_then(|v| v.to_str().ok()) {
                builder = builder.header(name, value);
            }
        }

        // Dropping the body stream (client went away) drops the reqwest
        // response and aborts the upstream connection with it.
        Ok(builder
            .body(Body::from_stream(upstream.bytes_stream()))
            .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response()))
    }
}
