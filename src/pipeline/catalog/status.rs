use std::collections::HashSet;

use crate::domain::catalog::{ApprovalStatus, ProductStatus, RawProduct};

/// Classifies a catalog row into its exported lifecycle status. Strict
/// first-match-wins order: deletion beats everything, then shop
/// availability, then the approved/sellable/in-stock conjunction, then
/// draft. The active-shop set is a per-run snapshot shared across calls.
pub fn resolve_status(product: &RawProduct, active_shops: &HashSet<String>) -> ProductStatus {
    if product.deleted_at.is_some() {
        return ProductStatus::Deleted;
    }
    if !active_shops.contains(&product.shop_id) {
        return ProductStatus::Unavailable;
    }
    if product.is_approved == ApprovalStatus::Approved
        && product.allow_to_sell
        && product.is_sold_out == Some(false)
    {
        return ProductStatus::Active;
    }
    if product.is_approved == ApprovalStatus::Draft {
        return ProductStatus::Draft;
    }
    ProductStatus::Unavailable
}
