use async_trait::async_trait;

use crate::domain::{
    CategoryRecord, RawBehavioralEvent, RawProduct, RawPurchaseContext, RawReviewRecord,
};
use crate::error::Result;
use crate::store::{CatalogStore, EventStore, FeedbackStore, OrderStore};

/// In-memory store implementation for development/testing. Holds fixed
/// record vectors and serves the event vector through the same cursor
/// contract as the real event store.
#[derive(Default)]
pub struct MemoryStore {
    events: Vec<RawBehavioralEvent>,
    purchases: Vec<RawPurchaseContext>,
    reviews: Vec<RawReviewRecord>,
    products: Vec<RawProduct>,
    categories: Vec<CategoryRecord>,
    active_shops: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: Vec<RawBehavioralEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn with_purchases(mut self, purchases: Vec<RawPurchaseContext>) -> Self {
        self.purchases = purchases;
        self
    }

    pub fn with_reviews(mut self, reviews: Vec<RawReviewRecord>) -> Self {
        self.reviews = reviews;
        self
    }

    pub fn with_products(mut self, products: Vec<RawProduct>) -> Self {
        self.products = products;
        self
    }

    pub fn with_categories(mut self, categories: Vec<CategoryRecord>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_active_shops(mut self, shop_ids: Vec<String>) -> Self {
        self.active_shops = shop_ids;
        self
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn fetch_page(
        &self,
        action_types: &[&str],
        after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<RawBehavioralEvent>> {
        let matching = self
            .events
            .iter()
            .filter(|e| action_types.contains(&e.action_type.as_str()));

        // Skip everything up to and including the cursor record
        let page: Vec<RawBehavioralEvent> = match after {
            Some(cursor) => matching
                .skip_while(|e| e.id != cursor)
                .skip(1)
                .take(limit)
                .cloned()
                .collect(),
            None => matching.take(limit).cloned().collect(),
        };
        Ok(page)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn purchase_contexts(&self) -> Result<Vec<RawPurchaseContext>> {
        Ok(self.purchases.clone())
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn product_reviews(&self) -> Result<Vec<RawReviewRecord>> {
        Ok(self.reviews.clone())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn products(&self, limit: Option<usize>) -> Result<Vec<RawProduct>> {
        let products = match limit {
            Some(n) => self.products.iter().take(n).cloned().collect(),
            None => self.products.clone(),
        };
        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<CategoryRecord>> {
        Ok(self.categories.clone())
    }

    async fn active_shop_ids(&self) -> Result<Vec<String>> {
        Ok(self.active_shops.clone())
    }
}
