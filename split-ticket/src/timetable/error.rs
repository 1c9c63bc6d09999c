//! Timetable query error types.

/// Errors from a timetable service exchange.
///
/// `Http`, `Status` and `Transport` are transport failures; `Protocol` means
/// the service answered with something we couldn't interpret; `RemoteService`
/// carries the service's own error message verbatim. Nothing here is retried
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Any other transport-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Response was missing expected fields or could not be parsed
    #[error("protocol error: {message}")]
    Protocol {
        message: String,
        body: Option<String>,
    },

    /// Service explicitly reported a failure
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// The service kept reporting the result as pending
    #[error("result still pending after {attempts} polls")]
    PollExhausted { attempts: u32 },
}

impl QueryError {
    /// Protocol error without an attached body.
    pub fn protocol(message: impl Into<String>) -> Self {
        QueryError::Protocol {
            message: message.into(),
            body: None,
        }
    }

    /// Protocol error carrying a prefix of the offending body.
    pub fn protocol_with_body(message: impl Into<String>, body: &str) -> Self {
        QueryError::Protocol {
            message: message.into(),
            body: Some(body.chars().take(500).collect()),
        }
    }

    /// Whether this is a network/IO failure rather than a content problem.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            QueryError::Http(_) | QueryError::Status { .. } | QueryError::Transport(_)
        )
    }
}
