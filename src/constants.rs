/// Shared identifiers used across the export pipeline.
/// Payment method ids come from the production payment-methods collection;
/// the scorer only cares whether an id is the cash method or one of the
/// e-payment providers.
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Placeholder emitted wherever a source record carries no usable value.
pub const UNKNOWN: &str = "unknown";

/// Default page size when draining the cursor-paginated event store.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Category levels exported per catalog item (CATEGORY_L1..L4).
pub const MAX_CATEGORY_LEVELS: usize = 4;

// Behavioral action types as recorded by the app tracker
pub const VIEW_PRODUCT_ACTION: &str = "view_product";
pub const ADD_CART_ACTION: &str = "add_cart";
pub const ADD_FAVORITE_ACTION: &str = "add_product_to_favorite";
pub const BUY_PRODUCT_ACTION: &str = "buy_product";

/// Action types requested from the event store for the interaction export.
pub const TRACKED_ACTION_TYPES: [&str; 3] =
    [VIEW_PRODUCT_ACTION, ADD_CART_ACTION, ADD_FAVORITE_ACTION];

// Interaction source names (run reports and CLI output)
pub const BEHAVIORAL_SOURCE: &str = "behavioral";
pub const PURCHASE_SOURCE: &str = "purchase";
pub const REVIEW_SOURCE: &str = "review";

// Payment method ids
pub const CASH_PAYMENT_ID: &str = "6080f987ca33c1913de1be38";
pub const VNPAY_PAYMENT_ID: &str = "6080f24dca33c1913de1be35";
pub const MOMO_PAYMENT_ID: &str = "6080f319ca33c1913de1be36";
pub const BANK_CARD_PAYMENT_ID: &str = "632aca6e2c2071e01556e978";
pub const MASTERCARD_VISA_PAYMENT_ID: &str = "632acad12c2071e01556e979";
pub const ONEPAY_PAYMENT_ID: &str = "67c1433d444943956c790309";
pub const MASTERCARD_VISA_ONEPAY_PAYMENT_ID: &str = "67d3926bbfaa50609c736fb9";
pub const BANK_CARD_ONEPAY_PAYMENT_ID: &str = "67d39243bfaa50609c736fb8";

/// Every payment method id that classifies as an e-payment.
pub static E_PAYMENT_IDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        VNPAY_PAYMENT_ID,
        MOMO_PAYMENT_ID,
        BANK_CARD_PAYMENT_ID,
        MASTERCARD_VISA_PAYMENT_ID,
        ONEPAY_PAYMENT_ID,
        MASTERCARD_VISA_ONEPAY_PAYMENT_ID,
        BANK_CARD_ONEPAY_PAYMENT_ID,
    ])
});
