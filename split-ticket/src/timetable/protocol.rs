//! Submit/poll exchange protocol.
//!
//! The timetable service never answers a query synchronously. A submit
//! request returns a request id (`rid`), optionally with a session token;
//! the result is then fetched by polling with the same identifiers. Polling
//! with a different rid or without the session token returns unrelated
//! data, so the `Correlation` from the submit response is carried through
//! every poll unchanged.
//!
//! This module only interprets response bodies. The IO loop driving
//! [`ExchangeState`] lives in the client.

use serde_json::Value;

use super::error::QueryError;
use super::markup::MarkupElement;

const STRUCTURE_ID_PARAM: &str = "STRUCTURE_ID";
const LAYER_ID_PARAM: &str = "layer_id";
const RID_PARAM: &str = "rid";
const SESSION_ID_PARAM: &str = "SESSION_ID";

/// Object-format `result` value for a failed query.
const RESULT_ERROR: &str = "Error";
/// Object-format `result` value while the service is still computing.
const RESULT_PENDING: &str = "RID";

/// Which encoding a query's responses come back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Tree-shaped markup document.
    Markup,
    /// Key-value JSON object.
    Object,
}

/// One query against the timetable service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub structure_id: u32,
    pub layer_id: u32,
    pub format: ResponseFormat,
    pub params: Vec<(String, String)>,
}

impl QueryRequest {
    pub fn new(structure_id: u32, layer_id: u32, format: ResponseFormat) -> Self {
        Self {
            structure_id,
            layer_id,
            format,
            params: Vec::new(),
        }
    }

    /// Add a query-specific parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Parameters for the submit request.
    pub fn submit_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            (STRUCTURE_ID_PARAM.to_string(), self.structure_id.to_string()),
            (LAYER_ID_PARAM.to_string(), self.layer_id.to_string()),
        ];
        params.extend(self.params.iter().cloned());
        params
    }

    /// Parameters for a poll request: the submit parameters plus the
    /// correlation identifiers.
    pub fn poll_params(&self, correlation: &Correlation) -> Vec<(String, String)> {
        let mut params = self.submit_params();
        params.push((RID_PARAM.to_string(), correlation.rid.clone()));
        if let Some(session_id) = &correlation.session_id {
            params.push((SESSION_ID_PARAM.to_string(), session_id.clone()));
        }
        params
    }
}

/// Identifiers tying a poll to its submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub rid: String,
    /// Only issued by some object-format queries.
    pub session_id: Option<String>,
}

/// A successful, parsed final response.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Markup(MarkupElement),
    Object(Value),
}

impl ParsedResponse {
    pub fn into_markup(self) -> Result<MarkupElement, QueryError> {
        match self {
            ParsedResponse::Markup(root) => Ok(root),
            ParsedResponse::Object(_) => Err(QueryError::protocol(
                "expected a markup response, got an object",
            )),
        }
    }

    pub fn into_object(self) -> Result<Value, QueryError> {
        match self {
            ParsedResponse::Object(value) => Ok(value),
            ParsedResponse::Markup(_) => Err(QueryError::protocol(
                "expected an object response, got markup",
            )),
        }
    }
}

/// What a single poll produced.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Ready(ParsedResponse),
    /// The service is still computing; poll again with the same correlation.
    Pending,
}

/// Progress of one submit/poll exchange.
///
/// `Submitted → Polling → Ready | Failed`. Every `Polling` state carries
/// the correlation from the submit response.
#[derive(Debug)]
pub enum ExchangeState {
    Submitted(Correlation),
    Polling {
        correlation: Correlation,
        attempt: u32,
    },
    Ready(ParsedResponse),
    Failed(QueryError),
}

impl ExchangeState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExchangeState::Ready(_) | ExchangeState::Failed(_))
    }
}

/// Extract the correlation identifiers from a submit response.
pub fn parse_submit(format: ResponseFormat, body: &str) -> Result<Correlation, QueryError> {
    match format {
        ResponseFormat::Markup => {
            let root = MarkupElement::parse(body)?;
            check_markup_error(&root)?;

            let rid = root
                .child(RID_PARAM)
                .map(|n| n.text())
                .filter(|rid| !rid.is_empty())
                .ok_or_else(|| QueryError::protocol_with_body("submit response has no rid", body))?;

            Ok(Correlation {
                rid: rid.to_string(),
                session_id: None,
            })
        }
        ResponseFormat::Object => {
            let value = parse_object(body)?;
            check_object_error(&value)?;

            let rid = ["rid", "RID"]
                .iter()
                .find_map(|key| scalar_string(value.get(key)?))
                .ok_or_else(|| QueryError::protocol_with_body("submit response has no rid", body))?;
            let session_id = value.get(SESSION_ID_PARAM).and_then(scalar_string);

            Ok(Correlation { rid, session_id })
        }
    }
}

/// Interpret a poll response.
pub fn parse_poll(format: ResponseFormat, body: &str) -> Result<PollOutcome, QueryError> {
    match format {
        ResponseFormat::Markup => {
            let root = MarkupElement::parse(body)?;
            check_markup_error(&root)?;

            let only_rid = !root.children().is_empty()
                && root.children().iter().all(|c| c.name() == RID_PARAM);
            if only_rid {
                return Ok(PollOutcome::Pending);
            }

            Ok(PollOutcome::Ready(ParsedResponse::Markup(root)))
        }
        ResponseFormat::Object => {
            let value = parse_object(body)?;
            check_object_error(&value)?;

            if value.get("result").and_then(Value::as_str) == Some(RESULT_PENDING) {
                return Ok(PollOutcome::Pending);
            }

            Ok(PollOutcome::Ready(ParsedResponse::Object(value)))
        }
    }
}

fn parse_object(body: &str) -> Result<Value, QueryError> {
    serde_json::from_str(body)
        .map_err(|e| QueryError::protocol_with_body(format!("malformed object: {e}"), body))
}

fn check_markup_error(root: &MarkupElement) -> Result<(), QueryError> {
    match root.child(RESULT_ERROR) {
        Some(error) => Err(QueryError::RemoteService(error.text().to_string())),
        None => Ok(()),
    }
}

fn check_object_error(value: &Value) -> Result<(), QueryError> {
    if value.get("result").and_then(Value::as_str) == Some(RESULT_ERROR) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(QueryError::RemoteService(message.to_string()));
    }
    Ok(())
}

/// Identifiers come back as either strings or numbers.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
