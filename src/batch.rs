//! Sequential batch lookups against the debtor registry.
//!
//! Lookups run one at a time, in input order, paced by a `PacingPolicy`.
//! A failed lookup becomes an `Error` result in its slot so the output
//! always has one entry per input CUIT.

use crate::clock::Clock;
use crate::errors::{AppError, INVALID_BATCH_MESSAGE};
use crate::models::QueryResult;
use crate::pacing::PacingPolicy;
use crate::registry_client::RegistryLookup;
use std::sync::Arc;

#[derive(Clone)]
pub struct BatchQueryService {
    lookup: Arc<dyn RegistryLookup>,
    pacing: Arc<dyn PacingPolicy>,
    clock: Arc<dyn Clock>,
}

impl BatchQueryService {
    pub fn new(
        lookup: Arc<dyn RegistryLookup>,
        pacing: Arc<dyn PacingPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            lookup,
            pacing,
            clock,
        }
    }

    /// Checks the batch shape and runs it.
    ///
    /// An empty batch is rejected before any lookup is made.
    pub async fn query(&self, cuits: &[String]) -> Result<Vec<QueryResult>, AppError> {
        if cuits.is_empty() {
            return Err(AppError::BadRequest(INVALID_BATCH_MESSAGE.to_string()));
        }

        Ok(self.run(cuits).await)
    }

    /// Looks up every CUIT in order. Never fails: per-item failures are
    /// recorded in the returned results.
    pub async fn run(&self, cuits: &[String]) -> Vec<QueryResult> {
        let total = cuits.len();
        tracing::info!("Processing {} CUITs", total);

        let mut results = Vec::with_capacity(total);
        for (index, cuit) in cuits.iter().enumerate() {
            let delay = self.pacing.delay_before(index);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            tracing::info!("Processing CUIT {}/{}: {}", index + 1, total, cuit);

            let result = match self.lookup.lookup(cuit).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Error processing CUIT {}: {}", cuit, e);
                    QueryResult::failed(cuit, self.clock.today(), &e.to_string())
                }
            };
            results.push(result);
        }

        let failed = results.iter().filter(|r| r.is_error()).count();
        tracing::info!(
            "Batch complete: {} results, {} failed lookups",
            results.len(),
            failed
        );

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::errors::LookupError;
    use crate::models::Situation;
    use crate::pacing::{FixedDelay, NoDelay};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
    }

    /// Records calls and fails for CUITs listed in `failing`.
    #[derive(Default)]
    struct ScriptedLookup {
        failing: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RegistryLookup for ScriptedLookup {
        async fn lookup(&self, cuit: &str) -> Result<QueryResult, LookupError> {
            self.calls.lock().unwrap().push(cuit.to_string());
            if self.failing.iter().any(|f| f == cuit) {
                return Err(LookupError::Transport("connection reset".to_string()));
            }
            Ok(QueryResult {
                cuit: cuit.to_string(),
                denomination: Some(format!("Titular {}", cuit)),
                status: Situation::Normal,
                query_date: date(),
                observations: None,
                error: None,
            })
        }
    }

    fn service(lookup: Arc<ScriptedLookup>, pacing: Arc<dyn PacingPolicy>) -> BatchQueryService {
        BatchQueryService::new(lookup, pacing, Arc::new(FixedClock(date())))
    }

    fn cuits(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_single_cuit() {
        let lookup = Arc::new(ScriptedLookup::default());
        let results = service(lookup.clone(), Arc::new(NoDelay))
            .query(&cuits(&["20340232071"]))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cuit, "20340232071");
        assert_eq!(*lookup.calls.lock().unwrap(), vec!["20340232071"]);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_order_kept() {
        let input = cuits(&["20340232071", "20123456786", "30500010912", "27987654320"]);
        let lookup = Arc::new(ScriptedLookup {
            failing: vec!["30500010912".to_string()],
            ..Default::default()
        });

        let results = service(lookup.clone(), Arc::new(NoDelay))
            .query(&input)
            .await
            .unwrap();

        assert_eq!(results.len(), input.len());
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.cuit, input[i]);
            if i == 2 {
                assert_eq!(result.status, Situation::Error);
                assert_eq!(result.error.as_deref(), Some("Error en la consulta"));
                assert_eq!(
                    result.observations.as_deref(),
                    Some("Error: connection reset")
                );
                assert_eq!(result.query_date, date());
            } else {
                assert_eq!(result.status, Situation::Normal);
                assert!(!result.is_error());
            }
        }
        assert_eq!(*lookup.calls.lock().unwrap(), input);
    }

    #[tokio::test]
    async fn test_all_failures_still_return_every_slot() {
        let input = cuits(&["20340232071", "20123456786"]);
        let lookup = Arc::new(ScriptedLookup {
            failing: input.clone(),
            ..Default::default()
        });

        let results = service(lookup, Arc::new(NoDelay)).run(&input).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == Situation::Error));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_without_lookups() {
        let lookup = Arc::new(ScriptedLookup::default());
        let result = service(lookup.clone(), Arc::new(NoDelay)).query(&[]).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(lookup.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pacing_applied_between_lookups() {
        let lookup = Arc::new(ScriptedLookup::default());
        let pacing = Arc::new(FixedDelay::new(Duration::from_millis(30)));

        let started = Instant::now();
        let results = service(lookup, pacing)
            .run(&cuits(&["20340232071", "20123456786", "30500010912"]))
            .await;

        assert_eq!(results.len(), 3);
        // Two pauses for three lookups
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
