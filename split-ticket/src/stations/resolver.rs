//! Station name resolution.
//!
//! Resolution order:
//! 1. normalize the name (trim, upper-case)
//! 2. built-in table, exact match, no network
//! 3. suggestion endpoint, keeping only names that start with the input
//!
//! With several matches the first few go to a [`Disambiguator`]. Without
//! one the name is reported as ambiguous rather than guessed.

use std::sync::Arc;

use tracing::debug;

use crate::domain::Station;
use crate::timetable::{AsyncQueryClient, HttpTransport, Transport};

use super::client::fetch_suggestions;
use super::error::StationError;
use super::overrides::{lookup, normalize};

/// How many candidates are offered for disambiguation.
pub const MAX_CANDIDATES: usize = 5;

/// Picks one station out of several matches (e.g. by asking the user).
pub trait Disambiguator {
    /// Return the index of the chosen candidate, or `None` to decline.
    fn choose(&self, name: &str, candidates: &[Station]) -> Option<usize>;
}

/// Resolves human-entered station names to stations.
#[derive(Clone)]
pub struct StationResolver<T = HttpTransport> {
    client: AsyncQueryClient<T>,
    disambiguator: Option<Arc<dyn Disambiguator + Send + Sync>>,
}

impl<T: Transport> StationResolver<T> {
    /// Create a non-interactive resolver: ambiguous names are errors.
    pub fn new(client: AsyncQueryClient<T>) -> Self {
        Self {
            client,
            disambiguator: None,
        }
    }

    /// Let `disambiguator` pick among multiple matches.
    pub fn with_disambiguator(
        mut self,
        disambiguator: Arc<dyn Disambiguator + Send + Sync>,
    ) -> Self {
        self.disambiguator = Some(disambiguator);
        self
    }

    /// Resolve a station name.
    pub async fn resolve(&self, name: &str) -> Result<Station, StationError> {
        let normalized = normalize(name);

        if let Some(station) = lookup(&normalized) {
            debug!(name, code = %station.code, "Station resolved from built-in table");
            return Ok(station.clone());
        }

        let suggestions = fetch_suggestions(&self.client, &normalized).await?;
        let mut candidates = filter_by_prefix(suggestions, &normalized);

        match candidates.len() {
            0 => Err(StationError::NotFound(name.to_string())),
            1 => Ok(candidates.remove(0)),
            _ => {
                candidates.truncate(MAX_CANDIDATES);
                self.disambiguate(name, candidates)
            }
        }
    }

    fn disambiguate(&self, name: &str, candidates: Vec<Station>) -> Result<Station, StationError> {
        let choice = self
            .disambiguator
            .as_ref()
            .and_then(|d| d.choose(name, &candidates))
            .and_then(|idx| candidates.get(idx).cloned());

        match choice {
            Some(station) => {
                debug!(name, code = %station.code, "Station chosen by disambiguator");
                Ok(station)
            }
            None => Err(StationError::Ambiguous {
                name: name.to_string(),
                candidates,
            }),
        }
    }
}

/// Keep candidates whose name starts with `normalized`, preserving order.
pub fn filter_by_prefix(candidates: Vec<Station>, normalized: &str) -> Vec<Station> {
    candidates
        .into_iter()
        .filter(|s| s.name.starts_with(normalized))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::StationCode;
    use crate::timetable::TimetableConfig;
    use crate::timetable::mock::{MockService, MockTransport, TEST_SUGGEST_URL};

    fn resolver(transport: MockTransport) -> StationResolver<MockTransport> {
        let config = TimetableConfig::new()
            .with_suggest_url(TEST_SUGGEST_URL)
            .with_settle_delay(Duration::ZERO);
        StationResolver::new(AsyncQueryClient::with_transport(transport, config))
    }

    fn station(code: u64, name: &str) -> Station {
        Station::new(StationCode::from_u64(code), name)
    }

    struct PickLast;

    impl Disambiguator for PickLast {
        fn choose(&self, _name: &str, candidates: &[Station]) -> Option<usize> {
            Some(candidates.len() - 1)
        }
    }

    struct Decline;

    impl Disambiguator for Decline {
        fn choose(&self, _name: &str, _candidates: &[Station]) -> Option<usize> {
            None
        }
    }

    #[tokio::test]
    async fn built_in_names_never_hit_the_network() {
        let transport = MockTransport::queue(vec![]);
        let resolver = resolver(transport.clone());

        for name in ["Москва", "москва", "МОСКВА", " Санкт-Петербург ", "ВОЛОГДА 1"] {
            assert!(resolver.resolve(name).await.is_ok(), "{name}");
        }

        assert_eq!(transport.request_count(), 0);
        assert_eq!(transport.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn single_prefix_match_is_returned() {
        let transport = MockService::new()
            .suggestions(
                "БОЛОГОЕ",
                r#"[{"c":2004460,"n":"БОЛОГОЕ-МОСКОВСКОЕ"},{"c":1,"n":"НОВОЕ БОЛОГОЕ"}]"#,
            )
            .into_transport();

        let resolved = resolver(transport).resolve("Бологое").await.unwrap();
        assert_eq!(resolved, station(2004460, "БОЛОГОЕ-МОСКОВСКОЕ"));
    }

    #[tokio::test]
    async fn suggestion_query_uses_normalized_name() {
        let transport = MockTransport::queue(vec![Ok("[]".into())]);
        let _ = resolver(transport.clone()).resolve(" бологое ").await;

        assert_eq!(
            transport.requests()[0].param("stationNamePart"),
            Some("БОЛОГОЕ")
        );
    }

    #[tokio::test]
    async fn no_prefix_match_is_not_found() {
        let transport = MockService::new()
            .suggestions("ЩЁ", r#"[{"c":1,"n":"ЗАЩЁКИНО"}]"#)
            .into_transport();

        let err = resolver(transport).resolve("щё").await.unwrap_err();
        assert!(matches!(err, StationError::NotFound(n) if n == "щё"));
    }

    #[tokio::test]
    async fn several_matches_without_disambiguator_are_ambiguous() {
        let transport = MockService::new()
            .suggestions(
                "AB",
                r#"[{"c":1,"n":"ABC"},{"c":2,"n":"ABD"},{"c":3,"n":"XYZ"}]"#,
            )
            .into_transport();

        match resolver(transport).resolve("AB").await.unwrap_err() {
            StationError::Ambiguous { name, candidates } => {
                assert_eq!(name, "AB");
                assert_eq!(candidates, vec![station(1, "ABC"), station(2, "ABD")]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn ambiguity_offers_at_most_five() {
        let list: Vec<String> = (1..=8)
            .map(|i| format!(r#"{{"c":{i},"n":"ПОСТ {i}"}}"#))
            .collect();
        let transport = MockService::new()
            .suggestions("ПОСТ", format!("[{}]", list.join(",")))
            .into_transport();

        match resolver(transport).resolve("пост").await.unwrap_err() {
            StationError::Ambiguous { candidates, .. } => {
                let codes: Vec<_> = candidates.iter().map(|s| s.code.value()).collect();
                assert_eq!(codes, vec![1, 2, 3, 4, 5]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn disambiguator_picks_among_first_five() {
        let list: Vec<String> = (1..=8)
            .map(|i| format!(r#"{{"c":{i},"n":"ПОСТ {i}"}}"#))
            .collect();
        let transport = MockService::new()
            .suggestions("ПОСТ", format!("[{}]", list.join(",")))
            .into_transport();

        let chosen = resolver(transport)
            .with_disambiguator(Arc::new(PickLast))
            .resolve("пост")
            .await
            .unwrap();
        assert_eq!(chosen.code.value(), 5);
    }

    #[tokio::test]
    async fn declined_disambiguation_is_ambiguous() {
        let transport = MockService::new()
            .suggestions("AB", r#"[{"c":1,"n":"ABC"},{"c":2,"n":"ABD"}]"#)
            .into_transport();

        let err = resolver(transport)
            .with_disambiguator(Arc::new(Decline))
            .resolve("AB")
            .await
            .unwrap_err();
        assert!(matches!(err, StationError::Ambiguous { .. }));
    }

    #[tokio::test]
    async fn query_failures_propagate() {
        let transport = MockTransport::queue(vec![Err(crate::timetable::QueryError::Transport(
            "reset".into(),
        ))]);
        let err = resolver(transport).resolve("Бологое").await.unwrap_err();
        assert!(matches!(err, StationError::Query(e) if e.is_transport()));
    }

    #[test]
    fn prefix_filter_keeps_order() {
        let filtered = filter_by_prefix(
            vec![station(1, "ABC"), station(3, "XYZ"), station(2, "ABD")],
            "AB",
        );
        assert_eq!(filtered, vec![station(1, "ABC"), station(2, "ABD")]);
    }
}
