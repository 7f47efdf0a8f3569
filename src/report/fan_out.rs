//! Bounded fan-out over a batch of independent lookups
//!
//! Every item gets its own task; a counting semaphore caps how many of them
//! run their fetch at once. Results come back index-aligned with the input no
//! matter which fetch finishes first. A failed fetch yields the caller's
//! sentinel for that slot instead of failing the batch; only a task that
//! panics fails the batch, and only after every other task has finished.
//! Dropping the returned future aborts every task still in flight.

use crate::error::{ErrorCode, ReportError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// A fixed number of slots shared by the fetches of one batch kind
#[derive(Debug, Clone)]
pub struct ConcurrencyCeiling {
    semaphore: Arc<Semaphore>,
    limit: usize,
}

impl ConcurrencyCeiling {
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(ReportError::validation_with_code(
                ErrorCode::VALIDATION_OUT_OF_RANGE,
                "Concurrency ceiling must be at least 1",
                Some("limit".to_string()),
            ));
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            limit,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Slots not currently held by a running fetch
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Run `fetch` over `items` with at most `ceiling.limit()` fetches in flight.
///
/// Returns exactly one value per input, in input order. A fetch error is
/// logged and replaced by `sentinel`. Fails only if a task panicked.
pub async fn fan_out<I, T, F, Fut>(
    label: &str,
    items: Vec<I>,
    ceiling: &ConcurrencyCeiling,
    sentinel: T,
    fetch: F,
) -> Result<Vec<T>>
where
    I: Send + 'static,
    T: Clone + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let total = items.len();
    debug!(
        "Fanning out {} {} lookups (max parallel: {})",
        total,
        label,
        ceiling.limit()
    );

    let fetch = Arc::new(fetch);
    // Dropping the set aborts whatever is still running
    let mut tasks: JoinSet<(usize, Result<T>)> = JoinSet::new();
    for (index, item) in items.into_iter().enumerate() {
        let semaphore = ceiling.semaphore.clone();
        let fetch = fetch.clone();
        let sentinel = sentinel.clone();
        let label = label.to_string();

        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return (
                        index,
                        Err(ReportError::internal("Concurrency ceiling closed").with_source(e)),
                    )
                }
            };

            match fetch(item).await {
                Ok(value) => (index, Ok(value)),
                Err(e) => {
                    warn!(
                        index,
                        error = %e,
                        "{} lookup {}/{} failed; using sentinel",
                        label,
                        index + 1,
                        total
                    );
                    (index, Ok(sentinel))
                }
            }
        });
    }

    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    let mut first_failure = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(value))) => slots[index] = Some(value),
            Ok((_, Err(e))) => {
                first_failure.get_or_insert(e);
            }
            Err(join_error) => {
                first_failure.get_or_insert_with(|| {
                    ReportError::internal_with_code(
                        ErrorCode::INTERNAL_TASK_PANICKED,
                        format!("{} lookup task failed: {}", label, join_error),
                    )
                });
            }
        }
    }

    if let Some(e) = first_failure {
        return Err(e);
    }
    slots.into_iter().collect::<Option<Vec<T>>>().ok_or_else(|| {
        ReportError::internal(format!("{} lookup batch lost a result", label))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ConcurrencyProbe;
    use std::time::Duration;

    #[test]
    fn test_zero_ceiling_is_rejected() {
        let err = ConcurrencyCeiling::new(0).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VALIDATION_OUT_OF_RANGE);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let ceiling = ConcurrencyCeiling::new(3).unwrap();
        let out = fan_out("code", Vec::<u32>::new(), &ceiling, 0u32, |n| async move {
            Ok(n)
        })
        .await
        .unwrap();
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_output_follows_input_order_not_completion_order() {
        let ceiling = ConcurrencyCeiling::new(4).unwrap();
        let items: Vec<u64> = (0..8).collect();

        let out = fan_out("code", items, &ceiling, 0u64, |n| async move {
            // Later items finish first
            tokio::time::sleep(Duration::from_millis(40 - n * 5)).await;
            Ok(n * 10)
        })
        .await
        .unwrap();

        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[tokio::test]
    async fn test_failed_items_get_sentinel() {
        let ceiling = ConcurrencyCeiling::new(2).unwrap();
        let items = vec!["a", "bad", "c", "bad"];

        let out = fan_out("code", items, &ceiling, "ERROR".to_string(), |s| async move {
            if s == "bad" {
                Err(ReportError::fetch("service down"))
            } else {
                Ok(s.to_uppercase())
            }
        })
        .await
        .unwrap();

        assert_eq!(out, vec!["A", "ERROR", "C", "ERROR"]);
    }

    #[tokio::test]
    async fn test_never_exceeds_ceiling() {
        for limit in [1, 2, 5] {
            let ceiling = ConcurrencyCeiling::new(limit).unwrap();
            let probe = ConcurrencyProbe::new();
            let task_probe = probe.clone();

            let out = fan_out("salary", (0..20).collect(), &ceiling, 0, move |n: i32| {
                let probe = task_probe.clone();
                async move {
                    let _guard = probe.enter();
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    if n % 7 == 0 {
                        return Err(ReportError::fetch("flaky"));
                    }
                    Ok(n)
                }
            })
            .await
            .unwrap();

            assert_eq!(out.len(), 20);
            assert!(probe.peak() <= limit, "peak {} > {}", probe.peak(), limit);
            assert!(probe.peak() >= 1);
            assert_eq!(ceiling.available(), limit);
        }
    }

    #[tokio::test]
    async fn test_dropped_batch_aborts_pending_lookups() {
        let ceiling = ConcurrencyCeiling::new(1).unwrap();
        let probe = ConcurrencyProbe::new();
        let task_probe = probe.clone();

        let batch = fan_out("code", (0..5).collect(), &ceiling, 0, move |n: i32| {
            let probe = task_probe.clone();
            async move {
                let _guard = probe.enter();
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(n)
            }
        });
        assert!(tokio::time::timeout(Duration::from_millis(20), batch)
            .await
            .is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(probe.entered(), 1);
        assert_eq!(probe.current(), 0);
        assert_eq!(ceiling.available(), 1);
    }

    #[tokio::test]
    async fn test_panicking_task_fails_batch_and_releases_slots() {
        let ceiling = ConcurrencyCeiling::new(2).unwrap();

        let result = fan_out("salary", vec![1, 2, 3, 4], &ceiling, 0, |n: i32| async move {
            if n == 2 {
                panic!("fetcher defect");
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(n)
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), ErrorCode::INTERNAL_TASK_PANICKED);
        assert_eq!(ceiling.available(), 2);
    }
}
