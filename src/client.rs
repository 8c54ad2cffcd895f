//! Blocking HTTP client for the signal service.
//!
//! One POST per sweep: parameters go out as JSON, the reply comes back as
//! the canonical six-column CSV. The client enforces the contract end to
//! end — non-success statuses, malformed bodies, and row-count mismatches
//! all surface as [`FetchError`] so the sweep engine treats them uniformly.

use std::time::Duration;

use crate::signal::{SampleBatch, SweepParams};
use crate::sweep::{FetchError, FetchFn};

/// HTTP transport to one service endpoint.
pub struct SignalClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl SignalClient {
    /// Client against `endpoint` with a hard per-request timeout. The
    /// timeout bounds every tick, which is what keeps a wedged service
    /// from freezing the sweep loop.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve one request: POST, check status, decode CSV, verify the
    /// row count matches what was asked for.
    pub fn fetch_batch(&self, request: &SweepParams) -> Result<SampleBatch, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        let batch =
            SampleBatch::from_csv(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        if batch.len() != request.samples {
            return Err(FetchError::Decode(format!(
                "expected {} rows, got {}",
                request.samples,
                batch.len()
            )));
        }
        Ok(batch)
    }

    /// Box this client up as the sweep engine's fetch seam.
    pub fn into_fetch_fn(self) -> FetchFn {
        Box::new(move |request| self.fetch_batch(request))
    }
}
