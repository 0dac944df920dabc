//! Valuation Transport
//!
//! Boundary to the external Monte-Carlo engine. The controller only ever
//! talks to the [`ValuationTransport`] trait; [`HttpTransport`] is the
//! production implementation over `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{CancellationToken, ValuationRequest, ValuationResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    /// Caller-side abort. Never reported to the user as a failure.
    #[error("request cancelled")]
    Cancelled,
    #[error("network error: {0}")]
    Network(String),
    #[error("valuation engine answered {status}")]
    Status { status: StatusCode, body: String },
    #[error("malformed valuation response: {0}")]
    Decode(String),
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl TransportError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled)
    }
}

/// Capability to run one valuation.
///
/// Implementations must watch `cancel` and return
/// [`TransportError::Cancelled`] once it fires, abandoning the
/// underlying operation.
#[async_trait]
pub trait ValuationTransport: Send + Sync {
    async fn evaluate(
        &self,
        request: ValuationRequest,
        cancel: CancellationToken,
    ) -> Result<ValuationResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/dcf", self.base_url.trim_end_matches('/'))
    }

    async fn post(&self, request: &ValuationRequest) -> Result<ValuationResponse, TransportError> {
        let url = self.endpoint();
        debug!("POST {} ({} inputs)", url, request.input_list.len());

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("Valuation engine returned {}: {}", status, body);
            return Err(TransportError::Status { status, body });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let decoded: ValuationResponse =
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?;

        if decoded.valuation_summary.is_empty() {
            return Err(TransportError::Decode("valuation_summary is empty".to_string()));
        }
        Ok(decoded)
    }
}

#[async_trait]
impl ValuationTransport for HttpTransport {
    async fn evaluate(
        &self,
        request: ValuationRequest,
        cancel: CancellationToken,
    ) -> Result<ValuationResponse, TransportError> {
        // Dropping the in-flight `post` future aborts the HTTP exchange.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            result = self.post(&request) => result,
        }
    }
}
