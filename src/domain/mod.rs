// Domain data shapes shared across layers
pub mod catalog;
pub mod category;
pub mod interaction;

pub use catalog::{
    ApprovalStatus, LocalizedName, ProductDetailGroup, ProductRecord, ProductStatus,
    RawProduct, RawProductDetail, RawVariant, ShopRecord,
};
pub use category::{CategoryNode, CategoryRecord, FlatCategory};
pub use interaction::{
    AddressState, DeliveryAddress, EventType, InteractionEvent, PaymentStatus,
    ProductPriceSnapshot, RawBehavioralEvent, RawOrder, RawPurchaseContext, RawReviewRecord,
    ShippingStatus,
};
