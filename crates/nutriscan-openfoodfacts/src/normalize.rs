//! Normalization from a raw [`RawProduct`] to [`FormattedProduct`].
//!
//! Formatting is total: every absent or empty source field maps to a fixed
//! fallback text, so the result never carries an empty string.

use nutriscan_core::report::{
    INGREDIENTS_UNAVAILABLE, NO_ALLERGENS, NUTRITION_LIMITED, NUTRITION_UNAVAILABLE,
    UNKNOWN_BARCODE, UNKNOWN_BRAND, UNKNOWN_CATEGORIES, UNKNOWN_PRODUCT,
};
use nutriscan_core::FormattedProduct;
use serde_json::{Map, Value};

use crate::types::{AllergenField, RawProduct};

/// Nutrients reported in the nutrition line, in display order:
/// `(nutriments key, label, unit)`.
const KEY_NUTRIENTS: [(&str, &str, &str); 8] = [
    ("energy-kcal_100g", "Energy", "kcal/100g"),
    ("fat_100g", "Fat", "g/100g"),
    ("saturated-fat_100g", "Saturated Fat", "g/100g"),
    ("sugars_100g", "Sugars", "g/100g"),
    ("salt_100g", "Salt", "g/100g"),
    ("sodium_100g", "Sodium", "g/100g"),
    ("proteins_100g", "Proteins", "g/100g"),
    ("fiber_100g", "Fiber", "g/100g"),
];

/// Normalizes a raw food-database record into display-ready strings.
#[must_use]
pub fn format_product(product: &RawProduct) -> FormattedProduct {
    let name = first_present(&[&product.product_name, &product.product_name_en])
        .unwrap_or(UNKNOWN_PRODUCT);
    let brand = first_present(&[&product.brands]).unwrap_or(UNKNOWN_BRAND);
    let barcode = first_present(&[&product.code]).unwrap_or(UNKNOWN_BARCODE);
    let categories = first_present(&[&product.categories]).unwrap_or(UNKNOWN_CATEGORIES);
    let ingredients =
        first_present(&[&product.ingredients_text, &product.ingredients_text_en]);

    // `allergens` wins over `allergens_tags` unless it is empty.
    let allergens = [&product.allergens, &product.allergens_tags]
        .into_iter()
        .flatten()
        .find(|field| !allergen_field_is_empty(field));

    FormattedProduct {
        name: name.to_owned(),
        brand: brand.to_owned(),
        barcode: barcode.to_owned(),
        ingredients: format_ingredients(ingredients),
        allergens: format_allergens(allergens),
        nutrition: format_nutrition(product.nutriments.as_ref()),
        categories: categories.to_owned(),
    }
}

/// Strips `_`/`*` emphasis markers and collapses whitespace runs.
#[must_use]
pub fn format_ingredients(ingredients: Option<&str>) -> String {
    let cleaned = ingredients
        .map(|text| {
            text.replace(['_', '*'], "")
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    if cleaned.is_empty() {
        INGREDIENTS_UNAVAILABLE.to_owned()
    } else {
        cleaned
    }
}

/// Renders allergen tags as `"Gluten, May contain nuts"`; free text passes
/// through unchanged.
#[must_use]
pub fn format_allergens(allergens: Option<&AllergenField>) -> String {
    let rendered = match allergens {
        Some(AllergenField::Text(text)) => text.trim().to_owned(),
        Some(AllergenField::Tags(tags)) => tags
            .iter()
            .filter_map(|tag| humanize_tag(tag))
            .collect::<Vec<_>>()
            .join(", "),
        None => String::new(),
    };

    if rendered.is_empty() {
        NO_ALLERGENS.to_owned()
    } else {
        rendered
    }
}

/// `"en:may-contain-nuts"` becomes `"May contain nuts"`; blank tags are dropped.
fn humanize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    let bare = tag.strip_prefix("en:").unwrap_or(tag).trim();
    if bare.is_empty() {
        None
    } else {
        Some(capitalize_first(&bare.replace('-', " ")))
    }
}

/// Renders the key per-100g nutrients as `"Label: value unit"` pairs.
#[must_use]
pub fn format_nutrition(nutriments: Option<&Map<String, Value>>) -> String {
    let Some(nutriments) = nutriments else {
        return NUTRITION_UNAVAILABLE.to_owned();
    };

    let facts: Vec<String> = KEY_NUTRIENTS
        .iter()
        .filter_map(|(key, label, unit)| {
            nutriments
                .get(*key)
                .and_then(display_value)
                .map(|value| format!("{label}: {value} {unit}"))
        })
        .collect();

    if facts.is_empty() {
        NUTRITION_LIMITED.to_owned()
    } else {
        facts.join(", ")
    }
}

/// Renders a nutriment value the way it reads in the JSON source: `12`, not
/// `12.0`. Null, empty strings and nested values count as absent.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(
            n.as_i64()
                .map(|i| i.to_string())
                .or_else(|| n.as_u64().map(|u| u.to_string()))
                .or_else(|| n.as_f64().map(|f| f.to_string()))
                .unwrap_or_else(|| n.to_string()),
        ),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|value| !value.trim().is_empty())
}

fn allergen_field_is_empty(field: &AllergenField) -> bool {
    match field {
        AllergenField::Text(text) => text.trim().is_empty(),
        AllergenField::Tags(tags) => tags.iter().all(|tag| humanize_tag(tag).is_none()),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
