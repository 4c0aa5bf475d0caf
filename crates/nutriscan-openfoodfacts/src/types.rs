//! Open Food Facts response types for `GET /api/v0/product/{barcode}.json`.
//!
//! ## Observed shape
//!
//! ### Envelope
//! `{"status": 1, "status_verbose": "product found", "code": "...", "product": {...}}`
//! for a hit and `{"status": 0, "status_verbose": "product not found"}` for a
//! miss. Only `status == 1` together with a `product` object counts as found.
//!
//! ### Text fields
//! `product_name`, `brands`, `categories` and friends are usually strings but
//! are sometimes `null`, absent, or (on very old records) numbers. Anything
//! that is not a string is treated as absent rather than failing the lookup.
//!
//! ### Allergens
//! `allergens` is normally a comma-separated tag string
//! (`"en:milk,en:nuts"`), while `allergens_tags` is an array of tags
//! (`["en:milk", "en:nuts"]`). Either key may carry either shape, so both are
//! modelled with [`AllergenField`].
//!
//! ### Nutriments
//! A flat map such as `{"fat_100g": 12, "sugars_100g": "5.1", ...}`. Values are
//! numbers or numeric strings, so the map is kept as raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub product: Option<Value>,
}

impl ProductResponse {
    /// Returns the raw product when the envelope reports a hit.
    #[must_use]
    pub fn into_product(self) -> Option<RawProduct> {
        let found = match &self.status {
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => s.trim() == "1",
            _ => false,
        };
        if !found {
            return None;
        }
        self.product
            .filter(Value::is_object)
            .and_then(|product| serde_json::from_value(product).ok())
    }
}

/// Allergen data as it appears on a product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllergenField {
    /// Free text, passed through unchanged by the formatter.
    Text(String),
    /// Namespaced tags such as `"en:may-contain-nuts"`.
    Tags(Vec<String>),
}

/// An unprocessed product record from the food database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_allergens")]
    pub allergens: Option<AllergenField>,
    #[serde(default, deserialize_with = "lenient_allergens")]
    pub allergens_tags: Option<AllergenField>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub nutriments: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub categories: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_allergens<'de, D>(deserializer: D) -> Result<Option<AllergenField>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(AllergenField::Text(s)),
        Some(Value::Array(items)) => Some(AllergenField::Tags(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        )),
        _ => None,
    })
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}
