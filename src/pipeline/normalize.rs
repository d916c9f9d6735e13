use chrono::{DateTime, Utc};

use crate::constants::UNKNOWN;
use crate::domain::{
    DeliveryAddress, EventType, InteractionEvent, RawBehavioralEvent, RawPurchaseContext,
    RawReviewRecord,
};
use crate::error::{ExporterError, Result};
use crate::pipeline::scoring::{EventValueScorer, ScoreOutcome};
use crate::util::to_lower_strip;

/// Converts raw source records into flat interaction rows. Behavioral
/// records fan out into one row per visit timestamp; purchase and review
/// records map to exactly one row each.
pub struct InteractionFanoutNormalizer<'a> {
    scorer: &'a EventValueScorer,
}

impl<'a> InteractionFanoutNormalizer<'a> {
    pub fn new(scorer: &'a EventValueScorer) -> Self {
        Self { scorer }
    }

    /// One interaction per visit timestamp, falling back to a single row at
    /// `created_at` when the visit list is empty. A record with no usable
    /// timestamp at all produces nothing.
    pub fn behavioral_events(&self, raw: &RawBehavioralEvent) -> Vec<InteractionEvent> {
        let (event_type, event_value) = match EventType::from_action(&raw.action_type) {
            Some(event) => (
                event.as_str().to_string(),
                EventValueScorer::behavioral_value(event),
            ),
            // Untracked action types pass through unweighted
            None => (raw.action_type.clone(), 0.0),
        };

        let mut timestamps: Vec<DateTime<Utc>> = raw.visited_ats.clone();
        if timestamps.is_empty() {
            timestamps.extend(raw.created_at);
        }

        timestamps
            .into_iter()
            .map(|visited_at| InteractionEvent {
                user_id: raw.actor_id.clone(),
                item_id: raw.target_id.clone(),
                event_type: event_type.clone(),
                timestamp: visited_at.timestamp(),
                shop_id: raw.shop_id.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                event_value,
                order_value: 0.0,
                basket_size: 0,
                payment_method: UNKNOWN.to_string(),
                delivery_location: UNKNOWN.to_string(),
            })
            .collect()
    }

    /// Exactly one purchase interaction per order line. Returns the scoring
    /// outcome alongside the row so the caller can account for undefined
    /// shipping/payment combinations explicitly.
    pub fn purchase_event(
        &self,
        item: &RawPurchaseContext,
    ) -> Result<(InteractionEvent, ScoreOutcome)> {
        let order = item.order.as_ref().ok_or_else(|| {
            ExporterError::MissingField(format!("order join on order item {}", item.id))
        })?;
        let created_at = item.created_at.ok_or_else(|| {
            ExporterError::MissingField(format!("created_at on order item {}", item.id))
        })?;

        let outcome = self.scorer.purchase_outcome(order);

        let order_value = item
            .variant
            .as_ref()
            .and_then(|v| v.before_sale_price)
            .or_else(|| item.product.as_ref().and_then(|p| p.before_sale_price))
            .unwrap_or(0.0);

        let event = InteractionEvent {
            user_id: order.user_id.clone(),
            item_id: item.product_id.clone(),
            event_type: EventType::Purchase.as_str().to_string(),
            timestamp: created_at.timestamp(),
            shop_id: order.shop_id.clone(),
            event_value: outcome.value_or(0.0),
            order_value,
            basket_size: item.quantity,
            payment_method: self
                .scorer
                .payment_method_name(&order.payment_method_id)
                .to_string(),
            delivery_location: delivery_location(order.address.as_ref()),
        };
        Ok((event, outcome))
    }

    /// Exactly one review interaction; the star rating is the weight.
    pub fn review_event(&self, raw: &RawReviewRecord) -> Result<InteractionEvent> {
        let created_at = raw.created_at.ok_or_else(|| {
            ExporterError::MissingField(format!("created_at on feedback {}", raw.id))
        })?;

        Ok(InteractionEvent {
            user_id: raw.user_id.clone(),
            item_id: raw.target_id.clone(),
            event_type: EventType::Review.as_str().to_string(),
            timestamp: created_at.timestamp(),
            shop_id: raw.shop_id.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            event_value: EventValueScorer::review_value(raw.vote_star),
            order_value: 0.0,
            basket_size: 0,
            payment_method: UNKNOWN.to_string(),
            delivery_location: UNKNOWN.to_string(),
        })
    }
}

/// Domestic orders (country "VN" or left empty) deliver to a named
/// province; Singapore orders collapse to the city-state itself.
fn delivery_location(address: Option<&DeliveryAddress>) -> String {
    let Some(address) = address else {
        return UNKNOWN.to_string();
    };
    match address.country.as_deref() {
        Some("VN") | Some("") => address
            .state
            .as_ref()
            .and_then(|state| state.name.as_deref())
            .map(to_lower_strip)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        Some("SG") => "singapore".to_string(),
        _ => UNKNOWN.to_string(),
    }
}
