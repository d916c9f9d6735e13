use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval states as stored on the catalog row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Draft,
    Pending,
    Rejected,
    #[serde(other)]
    #[default]
    Unknown,
}

/// Lifecycle status exported for each catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductStatus {
    Active,
    Draft,
    Deleted,
    Unavailable,
}

/// Price fields of a product variant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawVariant {
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub before_sale_price: Option<f64>,
}

/// Localized display name on a detail-group category.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalizedName {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub vi: Option<String>,
}

/// The detail-group category a product detail belongs to (Gender, Origin,
/// Style, Season, ...). Only the first entry's English name is meaningful.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDetailGroup {
    #[serde(default)]
    pub name: Option<LocalizedName>,
}

/// One product detail row: a detail group plus its selected value(s).
/// `values` takes precedence over the single `value` when both are set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RawProductDetail {
    #[serde(default)]
    pub category_info: Vec<ProductDetailGroup>,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// A raw catalog row with its embedded sub-documents, as returned by the
/// catalog store (joins are the store's responsibility).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(alias = "_id")]
    pub id: String,
    pub shop_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_approved: ApprovalStatus,
    #[serde(default)]
    pub allow_to_sell: bool,
    /// Tri-state on purpose: a missing flag does not qualify as in stock.
    #[serde(default)]
    pub is_sold_out: Option<bool>,
    #[serde(default)]
    pub before_sale_price: Option<f64>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
    #[serde(default)]
    pub product_details: Vec<RawProductDetail>,
    #[serde(default)]
    pub list_category_id: Vec<String>,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A shop row, projected down to the availability signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub pause_mode: bool,
}

/// A flat catalog item row in the engine's training schema. Built once per
/// catalog row at export time; never persisted back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ProductRecord {
    pub item_id: String,
    pub item_status: ProductStatus,
    pub gender: String,
    pub origin: String,
    pub style: String,
    pub seasons: String,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub category_l1: String,
    pub category_l2: String,
    pub category_l3: String,
    pub category_l4: String,
    #[serde(rename = "TIMESTAMP", default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<i64>,
}
