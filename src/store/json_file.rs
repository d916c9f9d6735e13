use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{
    CategoryRecord, RawBehavioralEvent, RawProduct, RawPurchaseContext, RawReviewRecord,
    ShopRecord,
};
use crate::error::{ExporterError, Result};
use crate::store::{CatalogStore, EventStore, FeedbackStore, OrderStore};

/// Fixture-backed store reading one JSON array file per collection from a
/// data directory. Individual records that fail to deserialize are skipped
/// with a warning; an unreadable file fails the whole source.
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn read_collection<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>> {
        let path = self.data_dir.join(file_name);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ExporterError::source(file_name, format!("cannot read {}: {e}", path.display()))
        })?;

        let rows: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            ExporterError::source(file_name, format!("{} is not a JSON array: {e}", path.display()))
        })?;

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<T>(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping malformed record {index} in {file_name}: {e}");
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn fetch_page(
        &self,
        action_types: &[&str],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RawBehavioralEvent>> {
        // The whole fixture is materialized up front; the cursor contract is
        // served from the in-memory vector the same way the real store
        // serves it from its index.
        let events: Vec<RawBehavioralEvent> = self.read_collection("tracking_activities.json").await?;
        let matching = events
            .into_iter()
            .filter(|e| action_types.contains(&e.action_type.as_str()));

        let page: Vec<RawBehavioralEvent> = match after {
            Some(cursor) => matching
                .skip_while(|e| e.id != cursor)
                .skip(1)
                .take(limit)
                .collect(),
            None => matching.take(limit).collect(),
        };
        Ok(page)
    }
}

#[async_trait]
impl OrderStore for JsonFileStore {
    async fn purchase_contexts(&self) -> Result<Vec<RawPurchaseContext>> {
        self.read_collection("order_items.json").await
    }
}

#[async_trait]
impl FeedbackStore for JsonFileStore {
    async fn product_reviews(&self) -> Result<Vec<RawReviewRecord>> {
        self.read_collection("feedbacks.json").await
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn products(&self, limit: Option<usize>) -> Result<Vec<RawProduct>> {
        let mut products: Vec<RawProduct> = self.read_collection("products.json").await?;
        if let Some(n) = limit {
            products.truncate(n);
        }
        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<CategoryRecord>> {
        self.read_collection("categories.json").await
    }

    async fn active_shop_ids(&self) -> Result<Vec<String>> {
        let shops: Vec<ShopRecord> = self.read_collection("shops.json").await?;
        Ok(shops
            .into_iter()
            .filter(|s| s.is_approved && !s.pause_mode)
            .map(|s| s.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    async fn write_fixture(dir: &Path, name: &str, value: serde_json::Value) {
        tokio::fs::write(dir.join(name), serde_json::to_vec(&value).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write_fixture(
            temp.path(),
            "feedbacks.json",
            json!([
                {"id": "f1", "user_id": "u1", "target_id": "p1", "vote_star": 4},
                {"id": "f2"},
                {"id": "f3", "user_id": "u2", "target_id": "p2", "vote_star": 5}
            ]),
        )
        .await;

        let store = JsonFileStore::new(temp.path());
        let reviews = store.product_reviews().await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[1].vote_star, 5);
    }

    #[tokio::test]
    async fn test_missing_file_is_a_source_error() {
        let temp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp.path());
        let err = store.product_reviews().await.unwrap_err();
        assert!(matches!(err, ExporterError::Source { .. }));
    }

    #[tokio::test]
    async fn test_active_shops_filtering() {
        let temp = tempfile::tempdir().unwrap();
        write_fixture(
            temp.path(),
            "shops.json",
            json!([
                {"id": "s1", "is_approved": true, "pause_mode": false},
                {"id": "s2", "is_approved": false, "pause_mode": false},
                {"id": "s3", "is_approved": true, "pause_mode": true}
            ]),
        )
        .await;

        let store = JsonFileStore::new(temp.path());
        assert_eq!(store.active_shop_ids().await.unwrap(), vec!["s1"]);
    }
}
