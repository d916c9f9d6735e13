use async_trait::async_trait;

use crate::domain::{
    CategoryRecord, RawBehavioralEvent, RawProduct, RawPurchaseContext, RawReviewRecord,
};
use crate::error::Result;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Cursor-paginated behavioral telemetry store.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Fetch up to `limit` events whose action type is in `action_types`,
    /// strictly after the record identified by `after` (None = from the
    /// start). Ordering must be stable across calls; the caller feeds the
    /// last record's id back in as the next cursor.
    async fn fetch_page(
        &self,
        action_types: &[&str],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RawBehavioralEvent>>;
}

/// Order lines with their parent order already joined on.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn purchase_contexts(&self) -> Result<Vec<RawPurchaseContext>>;
}

/// Product review snapshots.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn product_reviews(&self) -> Result<Vec<RawReviewRecord>>;
}

/// Catalog rows (with embedded sub-documents), category rows, and the
/// active-shop id list. Joins, filtering and pagination are the store's
/// concern, not the pipeline's.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn products(&self, limit: Option<usize>) -> Result<Vec<RawProduct>>;
    async fn categories(&self) -> Result<Vec<CategoryRecord>>;
    async fn active_shop_ids(&self) -> Result<Vec<String>>;
}
