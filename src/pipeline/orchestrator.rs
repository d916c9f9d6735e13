use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::constants::{
    BEHAVIORAL_SOURCE, DEFAULT_BATCH_SIZE, PURCHASE_SOURCE, REVIEW_SOURCE, TRACKED_ACTION_TYPES,
};
use crate::domain::{InteractionEvent, ProductRecord};
use crate::error::Result;
use crate::pipeline::catalog::features::extract_product_features;
use crate::pipeline::catalog::{build_category_tree, flatten_tree};
use crate::pipeline::fetch::PaginatedSourceFetcher;
use crate::pipeline::normalize::InteractionFanoutNormalizer;
use crate::pipeline::scoring::EventValueScorer;
use crate::store::{CatalogStore, EventStore, FeedbackStore, OrderStore};

/// Per-source outcome of an interaction export run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    /// Raw records obtained from the source.
    pub fetched: usize,
    /// Interaction rows emitted (behavioral records fan out, so this can
    /// exceed `fetched`).
    pub emitted: usize,
    /// Records dropped as malformed or timestamp-less.
    pub skipped: usize,
    /// Purchases whose shipping/payment combination had no scoring rule.
    pub unscored: usize,
    /// Set when the source itself could not be (fully) read.
    pub failed: Option<String>,
}

impl SourceReport {
    fn unavailable(source: &str, message: String) -> Self {
        Self {
            source: source.to_string(),
            fetched: 0,
            emitted: 0,
            skipped: 0,
            unscored: 0,
            failed: Some(message),
        }
    }
}

/// Aggregate result of one interaction export run. Partial output is
/// always surfaced alongside the per-source reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub sources: Vec<SourceReport>,
    pub total_emitted: usize,
    pub total_skipped: usize,
}

/// Interaction rows plus the run summary.
#[derive(Debug)]
pub struct InteractionExport {
    pub events: Vec<InteractionEvent>,
    pub summary: RunSummary,
}

/// Catalog rows produced by the item export path.
#[derive(Debug)]
pub struct CatalogExport {
    pub records: Vec<ProductRecord>,
    pub total_products: usize,
}

/// Sequences source fetch → normalize → score → assemble across the three
/// interaction sources, and drives the catalog export. Sources run
/// concurrently; results merge by concatenation in a fixed source order
/// (behavioral, purchase, review) so output ordering is reproducible.
pub struct PipelineOrchestrator {
    event_store: Arc<dyn EventStore>,
    order_store: Arc<dyn OrderStore>,
    feedback_store: Arc<dyn FeedbackStore>,
    catalog_store: Arc<dyn CatalogStore>,
    scorer: EventValueScorer,
    batch_size: usize,
}

impl PipelineOrchestrator {
    pub fn new(
        event_store: Arc<dyn EventStore>,
        order_store: Arc<dyn OrderStore>,
        feedback_store: Arc<dyn FeedbackStore>,
        catalog_store: Arc<dyn CatalogStore>,
    ) -> Self {
        Self {
            event_store,
            order_store,
            feedback_store,
            catalog_store,
            scorer: EventValueScorer::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_scorer(mut self, scorer: EventValueScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Runs the full interaction export. `limit` caps the behavioral drain
    /// only; purchase and review snapshots are already materialized by
    /// their stores.
    pub async fn normalize_interactions(&self, limit: Option<usize>) -> InteractionExport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!("🚀 Starting interaction export run {run_id}");
        counter!("reco_pipeline_runs_total").increment(1);
        let t_run = std::time::Instant::now();

        let (behavioral, purchase, review) = tokio::join!(
            self.behavioral_source(limit),
            self.purchase_source(),
            self.review_source(),
        );

        let mut events = Vec::new();
        let mut sources = Vec::new();
        for (batch, report) in [behavioral, purchase, review] {
            counter!("reco_interactions_emitted_total", "source" => report.source.clone())
                .increment(report.emitted as u64);
            counter!("reco_interactions_skipped_total", "source" => report.source.clone())
                .increment(report.skipped as u64);
            if let Some(reason) = &report.failed {
                warn!("Source {} contributed partially: {reason}", report.source);
            }
            events.extend(batch);
            sources.push(report);
        }

        let total_emitted = events.len();
        let total_skipped = sources.iter().map(|s| s.skipped).sum();
        histogram!("reco_pipeline_duration_seconds").record(t_run.elapsed().as_secs_f64());
        info!("✅ Emitted {total_emitted} interactions ({total_skipped} skipped)");

        InteractionExport {
            events,
            summary: RunSummary {
                run_id,
                started_at,
                sources,
                total_emitted,
                total_skipped,
            },
        }
    }

    async fn behavioral_source(&self, limit: Option<usize>) -> (Vec<InteractionEvent>, SourceReport) {
        let t_fetch = std::time::Instant::now();
        let fetcher =
            PaginatedSourceFetcher::with_batch_size(self.event_store.as_ref(), self.batch_size);
        let drained = fetcher.drain(&TRACKED_ACTION_TYPES, limit).await;
        histogram!("reco_source_fetch_duration_seconds", "source" => BEHAVIORAL_SOURCE)
            .record(t_fetch.elapsed().as_secs_f64());
        info!("📡 Fetched {} behavioral events", drained.records.len());

        let normalizer = InteractionFanoutNormalizer::new(&self.scorer);
        let mut events = Vec::new();
        let mut skipped = 0;
        for raw in &drained.records {
            let fanned_out = normalizer.behavioral_events(raw);
            if fanned_out.is_empty() {
                skipped += 1;
                warn!("Skipping behavioral event {} with no usable timestamp", raw.id);
                continue;
            }
            events.extend(fanned_out);
        }

        let report = SourceReport {
            source: BEHAVIORAL_SOURCE.to_string(),
            fetched: drained.records.len(),
            emitted: events.len(),
            skipped,
            unscored: 0,
            failed: drained.failure,
        };
        (events, report)
    }

    async fn purchase_source(&self) -> (Vec<InteractionEvent>, SourceReport) {
        let t_fetch = std::time::Instant::now();
        let contexts = match self.order_store.purchase_contexts().await {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!("Order store unavailable: {e}");
                return (
                    Vec::new(),
                    SourceReport::unavailable(PURCHASE_SOURCE, e.to_string()),
                );
            }
        };
        histogram!("reco_source_fetch_duration_seconds", "source" => PURCHASE_SOURCE)
            .record(t_fetch.elapsed().as_secs_f64());
        info!("📡 Fetched {} purchase lines", contexts.len());

        let normalizer = InteractionFanoutNormalizer::new(&self.scorer);
        let mut events = Vec::new();
        let mut skipped = 0;
        let mut unscored = 0;
        for context in &contexts {
            match normalizer.purchase_event(context) {
                Ok((event, outcome)) => {
                    if outcome.is_unscored() {
                        unscored += 1;
                        counter!("reco_unscored_purchases_total").increment(1);
                        warn!(
                            "No scoring rule for order item {}; defaulting to 0.0",
                            context.id
                        );
                    }
                    events.push(event);
                }
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping purchase record: {e}");
                }
            }
        }

        let report = SourceReport {
            source: PURCHASE_SOURCE.to_string(),
            fetched: contexts.len(),
            emitted: events.len(),
            skipped,
            unscored,
            failed: None,
        };
        (events, report)
    }

    async fn review_source(&self) -> (Vec<InteractionEvent>, SourceReport) {
        let t_fetch = std::time::Instant::now();
        let reviews = match self.feedback_store.product_reviews().await {
            Ok(reviews) => reviews,
            Err(e) => {
                warn!("Feedback store unavailable: {e}");
                return (
                    Vec::new(),
                    SourceReport::unavailable(REVIEW_SOURCE, e.to_string()),
                );
            }
        };
        histogram!("reco_source_fetch_duration_seconds", "source" => REVIEW_SOURCE)
            .record(t_fetch.elapsed().as_secs_f64());
        info!("📡 Fetched {} reviews", reviews.len());

        let normalizer = InteractionFanoutNormalizer::new(&self.scorer);
        let mut events = Vec::new();
        let mut skipped = 0;
        for review in &reviews {
            match normalizer.review_event(review) {
                Ok(event) => events.push(event),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping review record: {e}");
                }
            }
        }

        let report = SourceReport {
            source: REVIEW_SOURCE.to_string(),
            fetched: reviews.len(),
            emitted: events.len(),
            skipped,
            unscored: 0,
            failed: None,
        };
        (events, report)
    }

    /// Runs the catalog export: build the category and active-shop
    /// snapshots once, then assemble one row per catalog item.
    pub async fn export_catalog(&self, limit: Option<usize>) -> Result<CatalogExport> {
        info!("📦 Building catalog snapshots");
        let (products, categories, shop_ids) = tokio::join!(
            self.catalog_store.products(limit),
            self.catalog_store.categories(),
            self.catalog_store.active_shop_ids(),
        );
        let products = products?;
        let categories = categories?;
        let active_shops: HashSet<String> = shop_ids?.into_iter().collect();

        let flat_categories = flatten_tree(&build_category_tree(&categories));
        let records = extract_product_features(&products, &active_shops, &flat_categories);
        info!("✅ Assembled {} catalog rows", records.len());

        Ok(CatalogExport {
            total_products: products.len(),
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CASH_PAYMENT_ID, UNKNOWN, VIEW_PRODUCT_ACTION};
    use crate::domain::{
        PaymentStatus, RawBehavioralEvent, RawOrder, RawPurchaseContext, RawReviewRecord,
        ShippingStatus,
    };
    use crate::error::ExporterError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn behavioral(id: &str, visits: Vec<i64>) -> RawBehavioralEvent {
        RawBehavioralEvent {
            id: id.to_string(),
            actor_id: "user-1".to_string(),
            target_id: "item-1".to_string(),
            shop_id: Some("shop-1".to_string()),
            action_type: VIEW_PRODUCT_ACTION.to_string(),
            target_type: None,
            created_at: None,
            visited_ats: visits.into_iter().map(ts).collect(),
        }
    }

    fn purchase(id: &str, shipping: ShippingStatus, payment: PaymentStatus) -> RawPurchaseContext {
        RawPurchaseContext {
            id: id.to_string(),
            product_id: "item-2".to_string(),
            quantity: 1,
            created_at: Some(ts(2_000)),
            variant: None,
            product: None,
            order: Some(RawOrder {
                user_id: "user-2".to_string(),
                shop_id: "shop-2".to_string(),
                payment_method_id: CASH_PAYMENT_ID.to_string(),
                shipping_status: shipping,
                payment_status: payment,
                address: None,
            }),
        }
    }

    fn review(id: &str) -> RawReviewRecord {
        RawReviewRecord {
            id: id.to_string(),
            user_id: "user-3".to_string(),
            target_id: "item-3".to_string(),
            shop_id: None,
            vote_star: 5,
            created_at: Some(ts(3_000)),
        }
    }

    fn orchestrator(store: Arc<MemoryStore>) -> PipelineOrchestrator {
        PipelineOrchestrator::new(store.clone(), store.clone(), store.clone(), store)
    }

    #[tokio::test]
    async fn test_sources_merge_in_fixed_order() {
        let store = Arc::new(
            MemoryStore::new()
                .with_events(vec![behavioral("b1", vec![100, 200])])
                .with_purchases(vec![purchase(
                    "o1",
                    ShippingStatus::Shipping,
                    PaymentStatus::Paid,
                )])
                .with_reviews(vec![review("r1")]),
        );

        let export = orchestrator(store).normalize_interactions(None).await;
        let types: Vec<&str> = export.events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["view", "view", "purchase", "review"]);
        assert_eq!(export.summary.total_emitted, 4);
        assert_eq!(export.summary.sources.len(), 3);
        assert_eq!(export.summary.sources[0].source, BEHAVIORAL_SOURCE);
        assert_eq!(export.summary.sources[0].fetched, 1);
        assert_eq!(export.summary.sources[0].emitted, 2);
        assert_eq!(export.summary.sources[1].emitted, 1);
        assert_eq!(export.summary.sources[2].emitted, 1);
    }

    #[tokio::test]
    async fn test_unscored_purchase_defaults_to_zero_and_is_counted() {
        let store = Arc::new(MemoryStore::new().with_purchases(vec![purchase(
            "o1",
            ShippingStatus::Pending,
            PaymentStatus::Paid,
        )]));

        let export = orchestrator(store).normalize_interactions(None).await;
        assert_eq!(export.events.len(), 1);
        assert_eq!(export.events[0].event_value, 0.0);
        assert_eq!(export.summary.sources[1].unscored, 1);
    }

    #[tokio::test]
    async fn test_malformed_purchase_skipped_batch_continues() {
        let mut broken = purchase("o1", ShippingStatus::Shipping, PaymentStatus::Paid);
        broken.order = None;
        let store = Arc::new(MemoryStore::new().with_purchases(vec![
            broken,
            purchase("o2", ShippingStatus::Shipping, PaymentStatus::Paid),
        ]));

        let export = orchestrator(store).normalize_interactions(None).await;
        assert_eq!(export.events.len(), 1);
        assert_eq!(export.summary.sources[1].skipped, 1);
        assert_eq!(export.summary.total_skipped, 1);
    }

    struct DownOrderStore;

    #[async_trait]
    impl OrderStore for DownOrderStore {
        async fn purchase_contexts(&self) -> crate::error::Result<Vec<RawPurchaseContext>> {
            Err(ExporterError::source("orders", "connection refused"))
        }
    }

    #[tokio::test]
    async fn test_failed_source_yields_partial_success() {
        let store = Arc::new(
            MemoryStore::new()
                .with_events(vec![behavioral("b1", vec![100])])
                .with_reviews(vec![review("r1")]),
        );
        let orchestrator = PipelineOrchestrator::new(
            store.clone(),
            Arc::new(DownOrderStore),
            store.clone(),
            store,
        );

        let export = orchestrator.normalize_interactions(None).await;
        assert_eq!(export.events.len(), 2);
        let purchase_report = &export.summary.sources[1];
        assert_eq!(purchase_report.source, PURCHASE_SOURCE);
        assert!(purchase_report.failed.is_some());
        assert_eq!(purchase_report.emitted, 0);
    }

    #[tokio::test]
    async fn test_behavioral_limit_caps_fetch() {
        let events: Vec<RawBehavioralEvent> =
            (0..10).map(|i| behavioral(&format!("b{i}"), vec![100])).collect();
        let store = Arc::new(MemoryStore::new().with_events(events));

        let export = orchestrator(store)
            .normalize_interactions(Some(4))
            .await;
        assert_eq!(export.summary.sources[0].fetched, 4);
        assert_eq!(export.events.len(), 4);
    }

    #[tokio::test]
    async fn test_catalog_export_uses_snapshots() {
        use crate::domain::catalog::{ApprovalStatus, ProductStatus, RawProduct};
        use crate::domain::CategoryRecord;

        let product = RawProduct {
            id: "p1".to_string(),
            shop_id: "shop-1".to_string(),
            name: None,
            deleted_at: None,
            is_approved: ApprovalStatus::Approved,
            allow_to_sell: true,
            is_sold_out: Some(false),
            before_sale_price: Some(120.0),
            variants: Vec::new(),
            product_details: Vec::new(),
            list_category_id: vec!["root".to_string(), "leaf".to_string()],
            created_at: Some(ts(4_000)),
        };
        let store = Arc::new(
            MemoryStore::new()
                .with_products(vec![product])
                .with_categories(vec![
                    CategoryRecord {
                        id: "root".to_string(),
                        name: "Women".to_string(),
                        parent_id: None,
                    },
                    CategoryRecord {
                        id: "leaf".to_string(),
                        name: "Dresses".to_string(),
                        parent_id: Some("root".to_string()),
                    },
                ])
                .with_active_shops(vec!["shop-1".to_string()]),
        );

        let export = orchestrator(store).export_catalog(None).await.unwrap();
        assert_eq!(export.total_products, 1);
        let record = &export.records[0];
        assert_eq!(record.item_status, ProductStatus::Active);
        assert_eq!(record.category_l1, "women");
        assert_eq!(record.category_l2, "dresses");
        assert_eq!(record.category_l3, UNKNOWN);
        assert_eq!(record.price_min, Some(120.0));
        assert_eq!(record.price_max, Some(120.0));
        assert_eq!(record.creation_timestamp, Some(4_000));
    }
}
