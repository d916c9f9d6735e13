use tracing::{debug, warn};

use crate::constants::DEFAULT_BATCH_SIZE;
use crate::domain::RawBehavioralEvent;
use crate::store::EventStore;

/// Everything accumulated by a drain, plus the failure that ended it early
/// (if any). An error on the very first page leaves `records` empty but
/// still reports partial success the same way.
#[derive(Debug)]
pub struct DrainResult {
    pub records: Vec<RawBehavioralEvent>,
    pub failure: Option<String>,
}

/// Exhaustively drains a cursor-paginated event store in bounded batches.
/// Fetches are strictly sequential: each page's cursor is the id of the
/// previous page's last record.
pub struct PaginatedSourceFetcher<'a> {
    store: &'a dyn EventStore,
    batch_size: usize,
}

impl<'a> PaginatedSourceFetcher<'a> {
    pub fn new(store: &'a dyn EventStore) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(store: &'a dyn EventStore, batch_size: usize) -> Self {
        Self { store, batch_size }
    }

    /// Drains all records matching `action_types`, stopping at `limit`
    /// records when given. On a fetch error the drain aborts and returns
    /// whatever was accumulated so far (no partial-batch retry).
    pub async fn drain(&self, action_types: &[&str], limit: Option<usize>) -> DrainResult {
        let mut records: Vec<RawBehavioralEvent> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut failure = None;

        loop {
            let remaining = match limit {
                Some(l) => l.saturating_sub(records.len()),
                None => self.batch_size,
            };
            if remaining == 0 {
                break;
            }
            let request = remaining.min(self.batch_size);

            let batch = match self
                .store
                .fetch_page(action_types, cursor.as_deref(), request)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!("Event store fetch failed after {} records: {e}", records.len());
                    failure = Some(e.to_string());
                    break;
                }
            };

            if batch.is_empty() {
                break;
            }

            let fetched = batch.len();
            cursor = batch.last().map(|event| event.id.clone());
            records.extend(batch);
            debug!("Drained {fetched} events (total {})", records.len());

            // A short batch means the store ran out of data
            if fetched < request {
                break;
            }
        }

        if let Some(l) = limit {
            records.truncate(l);
        }
        DrainResult { records, failure }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::VIEW_PRODUCT_ACTION;
    use crate::error::{ExporterError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedStore {
        events: Vec<RawBehavioralEvent>,
        fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl ScriptedStore {
        fn new(count: usize) -> Self {
            let events = (0..count)
                .map(|i| RawBehavioralEvent {
                    id: format!("evt-{i:04}"),
                    actor_id: "user-1".to_string(),
                    target_id: "item-1".to_string(),
                    shop_id: None,
                    action_type: VIEW_PRODUCT_ACTION.to_string(),
                    target_type: None,
                    created_at: None,
                    visited_ats: Vec::new(),
                })
                .collect();
            Self {
                events,
                fail_on_call: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }
    }

    #[async_trait]
    impl EventStore for ScriptedStore {
        async fn fetch_page(
            &self,
            _action_types: &[&str],
            after: Option<&str>,
            limit: usize,
        ) -> Result<Vec<RawBehavioralEvent>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_call == Some(call) {
                return Err(ExporterError::source("events", "connection reset"));
            }
            let start = match after {
                Some(cursor) => {
                    self.events.iter().position(|e| e.id == cursor).unwrap() + 1
                }
                None => 0,
            };
            Ok(self.events[start..(start + limit).min(self.events.len())].to_vec())
        }
    }

    #[tokio::test]
    async fn test_drains_until_short_batch() {
        let store = ScriptedStore::new(7);
        let fetcher = PaginatedSourceFetcher::with_batch_size(&store, 3);

        let result = fetcher.drain(&[VIEW_PRODUCT_ACTION], None).await;
        assert_eq!(result.records.len(), 7);
        assert!(result.failure.is_none());
        // 3 + 3 + 1: the short final batch ends the loop
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exact_multiple_needs_one_empty_page() {
        let store = ScriptedStore::new(6);
        let fetcher = PaginatedSourceFetcher::with_batch_size(&store, 3);

        let result = fetcher.drain(&[VIEW_PRODUCT_ACTION], None).await;
        assert_eq!(result.records.len(), 6);
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_limit_caps_the_drain() {
        let store = ScriptedStore::new(10);
        let fetcher = PaginatedSourceFetcher::with_batch_size(&store, 4);

        let result = fetcher.drain(&[VIEW_PRODUCT_ACTION], Some(5)).await;
        assert_eq!(result.records.len(), 5);
        assert!(result.failure.is_none());
        // Second page requests min(batch, remaining) = 1
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_returns_accumulated_prefix() {
        let store = ScriptedStore::new(9).failing_on(1);
        let fetcher = PaginatedSourceFetcher::with_batch_size(&store, 3);

        let result = fetcher.drain(&[VIEW_PRODUCT_ACTION], None).await;
        assert_eq!(result.records.len(), 3);
        assert!(result.failure.is_some());
    }

    #[tokio::test]
    async fn test_error_on_first_page_reports_failure() {
        let store = ScriptedStore::new(9).failing_on(0);
        let fetcher = PaginatedSourceFetcher::with_batch_size(&store, 3);

        let result = fetcher.drain(&[VIEW_PRODUCT_ACTION], None).await;
        assert!(result.records.is_empty());
        assert!(result.failure.is_some());
    }
}
