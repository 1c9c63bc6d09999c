//! HTTP transport for timetable queries.
//!
//! A `Session` is one connection context: the HTTP implementation keeps a
//! cookie store per session so that the service can tie a poll to its
//! submit. The traits exist so the protocol can be tested against a
//! scripted transport.

use std::time::Duration;

use super::error::QueryError;

/// Something that can open connection contexts.
pub trait Transport {
    type Session: Session;

    /// Open a fresh session with empty correlation state.
    fn open_session(&self) -> Result<Self::Session, QueryError>;
}

/// One connection context carrying correlation state between requests.
pub trait Session {
    /// Issue a GET request and return the response body.
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, QueryError>;
}

/// Transport over real HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for HttpTransport {
    type Session = HttpSession;

    fn open_session(&self) -> Result<HttpSession, QueryError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(self.timeout)
            .build()?;

        Ok(HttpSession { http })
    }
}

/// A reqwest client with its own cookie jar.
#[derive(Debug, Clone)]
pub struct HttpSession {
    http: reqwest::Client,
}

impl Session for HttpSession {
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, QueryError> {
        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        Ok(response.text().await?)
    }
}
