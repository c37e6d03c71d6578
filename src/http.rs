//! HTTP transport seam used by the transaction executor.
//!
//! The executor only needs "POST this form body, give me the status and the
//! bytes back". Keeping that behind [`HttpClient`] lets callers plug in their
//! own client (or a fake one in tests); [`ReqwestClient`] is the default.

use async_trait::async_trait;

/// HTTP request to be sent by an HTTP client.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub body: Vec<u8>,
    pub content_type: &'static str,
}

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

impl HttpRequest {
    /// A form POST with an `application/x-www-form-urlencoded` body.
    pub fn form(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            content_type: FORM_CONTENT_TYPE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Low-level HTTP client.
///
/// Implementations send exactly one POST per call and must not retry: a
/// replayed payment request is not safe without a prior status query.
#[async_trait]
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};

    use super::{HttpClient, HttpRequest, HttpResponse};
    use crate::config::GatewayConfig;
    use crate::error::{Error, Result};

    /// HTTP client backed by reqwest.
    #[derive(Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        /// Default timeout: 30 seconds, certificates verified.
        pub fn new() -> Result<Self> {
            Self::build(Duration::from_secs(30), false)
        }

        pub fn from_config(config: &GatewayConfig) -> Result<Self> {
            Self::build(config.timeout(), config.accept_invalid_certs)
        }

        /// `accept_invalid_certs` disables TLS certificate verification entirely.
        pub fn build(timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
            if accept_invalid_certs {
                tracing::warn!("TLS certificate verification is disabled for gateway requests");
            }
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .danger_accept_invalid_certs(accept_invalid_certs)
                .build()
                .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

            Ok(Self { client })
        }
    }

    #[async_trait]
    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn post(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
            let response = self
                .client
                .post(&request.url)
                .header(CONTENT_TYPE, request.content_type)
                .header(CONTENT_LENGTH, request.body.len())
                .body(request.body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();

            Ok(HttpResponse { status, body })
        }
    }
}
