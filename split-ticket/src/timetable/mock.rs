//! Scripted transport for testing without the real service.
//!
//! `MockTransport` records every request and answers through a handler.
//! `MockService` is a handler that behaves like the timetable service:
//! it hands out request ids on submit, checks that polls echo them, and
//! serves canned routes, fares and suggestions.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use super::error::QueryError;
use super::transport::{Session, Transport};

pub(crate) const TEST_BASE_URL: &str = "http://timetable.test/ru";
pub(crate) const TEST_SUGGEST_URL: &str = "http://timetable.test/suggester";

/// One request seen by the mock transport.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub session: usize,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_poll(&self) -> bool {
        self.param("rid").is_some()
    }
}

type Handler = Box<dyn Fn(&RecordedRequest) -> Result<String, QueryError> + Send + Sync>;

enum Responder {
    Queue(VecDeque<Result<String, QueryError>>),
    Handler(Handler),
}

struct State {
    responder: Responder,
    requests: Vec<RecordedRequest>,
    sessions_opened: usize,
}

#[derive(Clone)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<State>>,
}

impl MockTransport {
    /// Answer requests with `responses` in order.
    pub fn queue(responses: Vec<Result<String, QueryError>>) -> Self {
        Self::from_responder(Responder::Queue(responses.into()))
    }

    /// Answer requests by calling `handler`.
    pub fn handler(
        handler: impl Fn(&RecordedRequest) -> Result<String, QueryError> + Send + Sync + 'static,
    ) -> Self {
        Self::from_responder(Responder::Handler(Box::new(handler)))
    }

    fn from_responder(responder: Responder) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                responder,
                requests: Vec::new(),
                sessions_opened: 0,
            })),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().unwrap().sessions_opened
    }
}

impl Transport for MockTransport {
    type Session = MockSession;

    fn open_session(&self) -> Result<MockSession, QueryError> {
        let mut state = self.state.lock().unwrap();
        state.sessions_opened += 1;
        Ok(MockSession {
            id: state.sessions_opened,
            state: Arc::clone(&self.state),
        })
    }
}

pub(crate) struct MockSession {
    id: usize,
    state: Arc<Mutex<State>>,
}

impl Session for MockSession {
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, QueryError> {
        let request = RecordedRequest {
            session: self.id,
            url: url.to_string(),
            params: params.to_vec(),
        };

        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        match &mut state.responder {
            Responder::Queue(queue) => queue
                .pop_front()
                .unwrap_or_else(|| Err(QueryError::Transport("mock queue exhausted".into()))),
            Responder::Handler(handler) => handler(&request),
        }
    }
}

/// A fake timetable service.
#[derive(Default)]
pub(crate) struct MockService {
    routes: HashMap<String, String>,
    fares: HashMap<(String, String), String>,
    failing_fares: HashSet<(String, String)>,
    suggestions: HashMap<String, String>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route document served for `train_num`.
    pub fn route(mut self, train: &str, xml: impl Into<String>) -> Self {
        self.routes.insert(train.to_string(), xml.into());
        self
    }

    /// Fare object served for the `code0`/`code1` pair.
    pub fn fares(mut self, from: u64, to: u64, json: impl Into<String>) -> Self {
        self.fares
            .insert((from.to_string(), to.to_string()), json.into());
        self
    }

    /// Make fare queries for this pair fail with a service error.
    pub fn failing_fares(mut self, from: u64, to: u64) -> Self {
        self.failing_fares.insert((from.to_string(), to.to_string()));
        self
    }

    /// Suggestion list served for `stationNamePart`.
    pub fn suggestions(mut self, prefix: &str, json: impl Into<String>) -> Self {
        self.suggestions.insert(prefix.to_string(), json.into());
        self
    }

    pub fn into_transport(self) -> MockTransport {
        // session id -> (rid, session token) handed out on submit
        let issued: Mutex<HashMap<usize, (String, String)>> = Mutex::new(HashMap::new());

        MockTransport::handler(move |req| {
            if req.url == TEST_SUGGEST_URL {
                let prefix = req.param("stationNamePart").unwrap_or_default();
                return Ok(self
                    .suggestions
                    .get(prefix)
                    .cloned()
                    .unwrap_or_else(|| "[]".to_string()));
            }

            let layer = req.param("layer_id").unwrap_or_default();
            let markup = layer == "5451";

            if !req.is_poll() {
                let rid = format!("R{}", req.session);
                let token = format!("S{}", req.session);
                issued
                    .lock()
                    .unwrap()
                    .insert(req.session, (rid.clone(), token.clone()));
                return Ok(if markup {
                    format!("<Response><rid>{rid}</rid></Response>")
                } else {
                    format!(r#"{{"result":"RID","RID":"{rid}","SESSION_ID":"{token}"}}"#)
                });
            }

            let expected = issued.lock().unwrap().get(&req.session).cloned();
            let correlated = match &expected {
                Some((rid, token)) => {
                    req.param("rid") == Some(rid.as_str())
                        && (markup || req.param("SESSION_ID") == Some(token.as_str()))
                }
                None => false,
            };
            if !correlated {
                return Err(QueryError::Transport(format!(
                    "uncorrelated poll in session {}",
                    req.session
                )));
            }

            if markup {
                let train = req.param("train_num").unwrap_or_default();
                return Ok(self
                    .routes
                    .get(train)
                    .cloned()
                    .unwrap_or_else(|| "<Response><Routes/></Response>".to_string()));
            }

            let pair = (
                req.param("code0").unwrap_or_default().to_string(),
                req.param("code1").unwrap_or_default().to_string(),
            );
            if self.failing_fares.contains(&pair) {
                return Ok(r#"{"result":"Error","message":"Сервис недоступен"}"#.to_string());
            }
            Ok(self
                .fares
                .get(&pair)
                .cloned()
                .unwrap_or_else(|| r#"{"result":"OK","tp":[{"list":[]}]}"#.to_string()))
        })
    }
}

/// Fare object listing one train with the given `(class, seats, price)` cars.
pub(crate) fn fare_json(train: &str, cars: &[(&str, u32, u64)]) -> String {
    let cars: Vec<String> = cars
        .iter()
        .map(|(class, seats, price)| {
            format!(r#"{{"typeLoc":"{class}","freeSeats":{seats},"tariff":{price}}}"#)
        })
        .collect();
    format!(
        r#"{{"result":"OK","tp":[{{"list":[{{"number":"{train}","cars":[{}]}}]}}]}}"#,
        cars.join(",")
    )
}

/// Route document listing `(code, name)` stops.
pub(crate) fn route_xml(stops: &[(u64, &str)]) -> String {
    let stops: String = stops
        .iter()
        .map(|(code, name)| format!(r#"<Stop Code="{code}" Station="{name}"/>"#))
        .collect();
    format!("<Response><Routes>{stops}</Routes></Response>")
}
