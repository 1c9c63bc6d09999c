//! Timetable service client.
//!
//! Hides the service's submit/poll protocol behind a single call. Each
//! `execute` opens its own session, so concurrent queries never share
//! correlation state.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use super::error::QueryError;
use super::protocol::{
    Correlation, ExchangeState, ParsedResponse, PollOutcome, QueryRequest, parse_poll,
    parse_submit,
};
use super::transport::{HttpTransport, Session, Transport};

/// Default timetable query endpoint.
const DEFAULT_BASE_URL: &str = "http://pass.rzd.ru/timetable/public/ru";

/// Default station suggestion endpoint.
const DEFAULT_SUGGEST_URL: &str = "http://pass.rzd.ru/suggester";

/// The service needs a few seconds before a submitted query has a result.
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_MAX_POLLS: u32 = 5;

/// Configuration for the timetable client.
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Timetable query endpoint
    pub base_url: String,
    /// Station suggestion endpoint
    pub suggest_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Wait between submit and the first poll
    pub settle_delay: Duration,
    /// Wait between polls while the result is pending
    pub poll_interval: Duration,
    /// Maximum number of polls per query (at least 1)
    pub max_polls: u32,
}

impl TimetableConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            suggest_url: DEFAULT_SUGGEST_URL.to_string(),
            timeout_secs: 30,
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Set a custom query endpoint (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom suggestion endpoint (for testing).
    pub fn with_suggest_url(mut self, url: impl Into<String>) -> Self {
        self.suggest_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_polls(mut self, n: u32) -> Self {
        self.max_polls = n.max(1);
        self
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the timetable service's asynchronous query protocol.
#[derive(Debug, Clone)]
pub struct AsyncQueryClient<T = HttpTransport> {
    transport: T,
    config: TimetableConfig,
}

impl AsyncQueryClient<HttpTransport> {
    /// Create a client talking HTTP to the configured endpoints.
    pub fn new(config: TimetableConfig) -> Self {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs));
        Self { transport, config }
    }
}

impl<T: Transport> AsyncQueryClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(transport: T, config: TimetableConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    /// Run one query through submit and poll, returning the final payload.
    ///
    /// Callers extract domain fields from the payload themselves.
    pub async fn execute(&self, request: &QueryRequest) -> Result<ParsedResponse, QueryError> {
        let session = self.transport.open_session()?;

        let mut state = match self.submit(&session, request).await {
            Ok(correlation) => ExchangeState::Submitted(correlation),
            Err(e) => ExchangeState::Failed(e),
        };

        loop {
            state = match state {
                ExchangeState::Submitted(correlation) => {
                    debug!(
                        structure_id = request.structure_id,
                        layer_id = request.layer_id,
                        rid = %correlation.rid,
                        has_session = correlation.session_id.is_some(),
                        "Query submitted"
                    );
                    tokio::time::sleep(self.config.settle_delay).await;
                    ExchangeState::Polling {
                        correlation,
                        attempt: 1,
                    }
                }
                ExchangeState::Polling {
                    correlation,
                    attempt,
                } => {
                    let params = request.poll_params(&correlation);
                    match self.poll(&session, &params, request).await {
                        Ok(PollOutcome::Ready(response)) => ExchangeState::Ready(response),
                        Ok(PollOutcome::Pending) if attempt < self.config.max_polls => {
                            debug!(rid = %correlation.rid, attempt, "Result pending, polling again");
                            tokio::time::sleep(self.config.poll_interval).await;
                            ExchangeState::Polling {
                                correlation,
                                attempt: attempt + 1,
                            }
                        }
                        Ok(PollOutcome::Pending) => {
                            ExchangeState::Failed(QueryError::PollExhausted { attempts: attempt })
                        }
                        Err(e) => ExchangeState::Failed(e),
                    }
                }
                ExchangeState::Ready(response) => return Ok(response),
                ExchangeState::Failed(e) => {
                    debug!(
                        structure_id = request.structure_id,
                        layer_id = request.layer_id,
                        error = %e,
                        "Query failed"
                    );
                    return Err(e);
                }
            };
        }
    }

    /// Single-request JSON fetch (used for the suggestion endpoint).
    pub async fn fetch_object(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<Value, QueryError> {
        let session = self.transport.open_session()?;
        let body = session.get(url, params).await?;
        trace!(url, bytes = body.len(), "Fetched object");

        serde_json::from_str(&body)
            .map_err(|e| QueryError::protocol_with_body(format!("malformed object: {e}"), &body))
    }

    async fn submit(
        &self,
        session: &T::Session,
        request: &QueryRequest,
    ) -> Result<Correlation, QueryError> {
        let body = session
            .get(&self.config.base_url, &request.submit_params())
            .await?;
        trace!(bytes = body.len(), "Submit response");
        parse_submit(request.format, &body)
    }

    async fn poll(
        &self,
        session: &T::Session,
        params: &[(String, String)],
        request: &QueryRequest,
    ) -> Result<PollOutcome, QueryError> {
        let body = session.get(&self.config.base_url, params).await?;
        trace!(bytes = body.len(), "Poll response");
        parse_poll(request.format, &body)
    }
}
