use std::collections::HashSet;

use crate::constants::{MAX_CATEGORY_LEVELS, UNKNOWN};
use crate::domain::catalog::{ProductRecord, RawProduct, RawProductDetail};
use crate::domain::FlatCategory;
use crate::pipeline::catalog::price::extract_price_range;
use crate::pipeline::catalog::status::resolve_status;
use crate::util::to_lower_strip;

/// Assembles one engine-facing catalog row per raw product: lifecycle
/// status, demographic tags, category path, price range and creation
/// timestamp. The category snapshot and active-shop set are built once per
/// run and shared read-only.
pub struct ProductFeatureExtractor<'a> {
    categories: &'a [FlatCategory],
    active_shops: &'a HashSet<String>,
}

impl<'a> ProductFeatureExtractor<'a> {
    pub fn new(categories: &'a [FlatCategory], active_shops: &'a HashSet<String>) -> Self {
        Self {
            categories,
            active_shops,
        }
    }

    pub fn extract(&self, product: &RawProduct) -> ProductRecord {
        let tags = collect_detail_tags(&product.product_details);
        let price = extract_price_range(product);

        ProductRecord {
            item_id: product.id.clone(),
            item_status: resolve_status(product, self.active_shops),
            gender: to_lower_strip(&normalize_gender(&join_or_unknown(&tags.gender))),
            origin: to_lower_strip(&join_or_unknown(&tags.origin)),
            style: to_lower_strip(&join_or_unknown(&tags.style)),
            seasons: to_lower_strip(&join_or_unknown(&tags.seasons)),
            price_min: price.min,
            price_max: price.max,
            category_l1: self.category_name_at(product, 1),
            category_l2: self.category_name_at(product, 2),
            category_l3: self.category_name_at(product, 3),
            category_l4: self.category_name_at(product, 4),
            creation_timestamp: product.created_at.map(|at| at.timestamp()),
        }
    }

    /// Category name for one path level; the id list is ordered root-first,
    /// so level N reads index N-1. Anything missing maps to unknown.
    fn category_name_at(&self, product: &RawProduct, level: usize) -> String {
        debug_assert!((1..=MAX_CATEGORY_LEVELS).contains(&level));
        let name = product
            .list_category_id
            .get(level - 1)
            .filter(|id| !id.is_empty())
            .and_then(|id| self.categories.iter().find(|c| &c.id == id))
            .map(|category| category.name.as_str())
            .unwrap_or(UNKNOWN);
        to_lower_strip(name)
    }
}

/// Build engine catalog rows for a batch of raw products against immutable
/// per-run snapshots of the flat category list and active-shop set.
pub fn extract_product_features(
    products: &[RawProduct],
    active_shops: &HashSet<String>,
    categories: &[FlatCategory],
) -> Vec<ProductRecord> {
    let extractor = ProductFeatureExtractor::new(categories, active_shops);
    products.iter().map(|p| extractor.extract(p)).collect()
}

#[derive(Default)]
struct DetailTags {
    gender: Vec<String>,
    origin: Vec<String>,
    style: Vec<String>,
    seasons: Vec<String>,
}

fn collect_detail_tags(details: &[RawProductDetail]) -> DetailTags {
    let mut tags = DetailTags::default();

    for detail in details {
        let Some(group) = detail_group_name(detail) else {
            continue;
        };
        let collector = match group.as_str() {
            "Gender" => &mut tags.gender,
            "Origin" => &mut tags.origin,
            "Style" => &mut tags.style,
            "Season" => &mut tags.seasons,
            _ => continue,
        };
        collector.extend(detail_values(detail));
    }
    tags
}

/// The detail group is named by the first category-info entry's English
/// name.
fn detail_group_name(detail: &RawProductDetail) -> Option<String> {
    detail
        .category_info
        .first()
        .and_then(|group| group.name.as_ref())
        .and_then(|name| name.en.clone())
}

/// `values` wins over the single `value`; empty and null entries drop out.
fn detail_values(detail: &RawProductDetail) -> Vec<String> {
    if !detail.values.is_empty() {
        return detail.values.iter().filter_map(value_text).collect();
    }
    detail.value.as_ref().and_then(value_text).into_iter().collect()
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) if !text.is_empty() => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn join_or_unknown(values: &[String]) -> String {
    if values.is_empty() {
        UNKNOWN.to_string()
    } else {
        values.join("|")
    }
}

/// Source gender tags are localized; everything outside the three known
/// labels (including multi-valued joins) exports as unknown.
fn normalize_gender(joined: &str) -> String {
    match joined {
        "Nữ" => "female".to_string(),
        "Nam" => "male".to_string(),
        "Unisex" => "unisex".to_string(),
        _ => UNKNOWN.to_string(),
    }
}
