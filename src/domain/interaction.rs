use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interaction event types in the engine's training vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    View,
    Favorite,
    AddToCart,
    Purchase,
    Review,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::View => "view",
            EventType::Favorite => "favorite",
            EventType::AddToCart => "add_to_cart",
            EventType::Purchase => "purchase",
            EventType::Review => "review",
        }
    }

    /// Maps a raw tracker action type to the engine vocabulary.
    pub fn from_action(action_type: &str) -> Option<EventType> {
        match action_type {
            crate::constants::VIEW_PRODUCT_ACTION => Some(EventType::View),
            crate::constants::ADD_FAVORITE_ACTION => Some(EventType::Favorite),
            crate::constants::ADD_CART_ACTION => Some(EventType::AddToCart),
            crate::constants::BUY_PRODUCT_ACTION => Some(EventType::Purchase),
            _ => None,
        }
    }
}

/// A raw telemetry record from the event store. One record fans out into
/// one interaction per visit timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBehavioralEvent {
    /// Document id; doubles as the pagination cursor.
    #[serde(alias = "_id")]
    pub id: String,
    pub actor_id: String,
    pub target_id: String,
    #[serde(default)]
    pub shop_id: Option<String>,
    pub action_type: String,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub visited_ats: Vec<DateTime<Utc>>,
}

/// Order shipping lifecycle states. Junk strings classify as `Unknown`
/// rather than failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    Pending,
    WaitToPick,
    Shipping,
    Shipped,
    Canceling,
    Canceled,
    Return,
    Returning,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Order payment states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AddressState {
    #[serde(default)]
    pub name: Option<String>,
}

/// Buyer address embedded on the order; only country and state matter for
/// the delivery location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeliveryAddress {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<AddressState>,
}

/// The parent order projection joined onto each order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOrder {
    pub user_id: String,
    pub shop_id: String,
    #[serde(default)]
    pub payment_method_id: String,
    #[serde(default)]
    pub shipping_status: ShippingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub address: Option<DeliveryAddress>,
}

/// Price snapshot of the product embedded on the order line, used when the
/// line has no variant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductPriceSnapshot {
    #[serde(default)]
    pub before_sale_price: Option<f64>,
}

/// An order line joined with its parent order. Read-only snapshot; the
/// pipeline never mutates it. A context with no joined order is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPurchaseContext {
    #[serde(alias = "_id")]
    pub id: String,
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variant: Option<super::catalog::RawVariant>,
    #[serde(default)]
    pub product: Option<ProductPriceSnapshot>,
    #[serde(default)]
    pub order: Option<RawOrder>,
}

fn default_quantity() -> i64 {
    1
}

/// A product review snapshot from the feedback store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawReviewRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub user_id: String,
    pub target_id: String,
    #[serde(default)]
    pub shop_id: Option<String>,
    /// Star rating, 1-5.
    pub vote_star: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A flat interaction row in the engine's training schema. `event_value`
/// is always written by the scorer before the row is emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct InteractionEvent {
    pub user_id: String,
    pub item_id: String,
    pub event_type: String,
    pub timestamp: i64,
    pub shop_id: String,
    pub event_value: f64,
    pub order_value: f64,
    pub basket_size: i64,
    pub payment_method: String,
    pub delivery_location: String,
}
