use crate::domain::catalog::{RawProduct, RawVariant};

/// Running min/max over the two variant price fields, tracked
/// independently in a single scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantPriceRange {
    pub sale_min: Option<f64>,
    pub sale_max: Option<f64>,
    pub before_sale_min: Option<f64>,
    pub before_sale_max: Option<f64>,
}

/// The exported price range for one catalog row. Both bounds are `None`
/// only when no price signal exists anywhere on the row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

fn usable(price: Option<f64>) -> Option<f64> {
    price.filter(|value| *value > 0.0)
}

fn track(slot_min: &mut Option<f64>, slot_max: &mut Option<f64>, price: f64) {
    if slot_min.map_or(true, |current| price < current) {
        *slot_min = Some(price);
    }
    if slot_max.map_or(true, |current| price > current) {
        *slot_max = Some(price);
    }
}

/// Scans the variant list once, ignoring missing and non-positive prices.
pub fn variant_price_range(variants: &[RawVariant]) -> VariantPriceRange {
    let mut range = VariantPriceRange::default();

    for variant in variants {
        if let Some(price) = usable(variant.sale_price) {
            track(&mut range.sale_min, &mut range.sale_max, price);
        }
        if let Some(price) = usable(variant.before_sale_price) {
            track(&mut range.before_sale_min, &mut range.before_sale_max, price);
        }
    }
    range
}

/// The exported range is the variants' before-sale min/max; a row whose
/// variants carry no usable price falls back to its own before-sale price
/// (min == max).
pub fn extract_price_range(product: &RawProduct) -> PriceRange {
    let range = variant_price_range(&product.variants);
    if range.before_sale_min.is_some() {
        return PriceRange {
            min: range.before_sale_min,
            max: range.before_sale_max,
        };
    }

    let fallback = usable(product.before_sale_price);
    PriceRange {
        min: fallback,
        max: fallback,
    }
}
