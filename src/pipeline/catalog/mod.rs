pub mod category_tree;
pub mod features;
pub mod price;
pub mod status;

pub use category_tree::{build_category_tree, build_tree, flatten_tree};
pub use features::ProductFeatureExtractor;
pub use price::{extract_price_range, variant_price_range, PriceRange, VariantPriceRange};
pub use status::resolve_status;
