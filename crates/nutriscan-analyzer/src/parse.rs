//! Turning the model's free-form answer into an [`Analysis`].
//!
//! The first pass is best-effort: take everything from the first `{` to the
//! last `}` and read it as the analysis schema. When that fails the named
//! [`fallback_analysis`] path builds a placeholder from the product itself.

use std::sync::LazyLock;

use nutriscan_core::report::{INGREDIENTS_UNAVAILABLE, NO_ALLERGENS};
use nutriscan_core::{Analysis, FormattedProduct};
use regex::Regex;
use serde_json::{Map, Value};

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("valid JSON object regex"));

const FALLBACK_HEALTH_SCORE: u8 = 5;
const FALLBACK_MAIN_INGREDIENTS: usize = 5;
const FALLBACK_SUMMARY: &str = "AI analysis partially available. Please review product information manually for detailed assessment.";

/// Interprets the model's answer, falling back when it cannot be parsed.
#[must_use]
pub fn interpret_response(text: &str, product: &FormattedProduct) -> Analysis {
    parse_analysis(text).unwrap_or_else(|| {
        tracing::warn!(
            barcode = %product.barcode,
            "AI response could not be parsed; using fallback analysis"
        );
        fallback_analysis(product)
    })
}

/// Extracts and reads the first brace-delimited region of `text`.
///
/// Returns `None` when there is no such region, it is not a JSON object, or
/// its `healthScore` is missing or not numeric. List fields that are missing
/// are read as empty; the score is rounded and clamped into `0..=10`.
#[must_use]
pub fn parse_analysis(text: &str) -> Option<Analysis> {
    let candidate = JSON_OBJECT.find(text)?.as_str();
    let Value::Object(object) = serde_json::from_str::<Value>(candidate).ok()? else {
        return None;
    };

    Some(Analysis {
        health_score: health_score(object.get("healthScore")?)?,
        warnings: string_list(&object, "warnings"),
        recommendations: string_list(&object, "recommendations"),
        main_ingredients: string_list(&object, "mainIngredients"),
        allergens: string_list(&object, "allergens"),
        summary: object
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
    })
}

/// Deterministic placeholder analysis used when the model's answer is
/// unusable.
#[must_use]
pub fn fallback_analysis(product: &FormattedProduct) -> Analysis {
    let main_ingredients = if product.ingredients == INGREDIENTS_UNAVAILABLE {
        vec!["Not available".to_owned()]
    } else {
        split_list(&product.ingredients)
            .take(FALLBACK_MAIN_INGREDIENTS)
            .collect()
    };

    let allergens = if product.allergens == NO_ALLERGENS {
        vec!["Not specified".to_owned()]
    } else {
        split_list(&product.allergens).collect()
    };

    Analysis {
        health_score: FALLBACK_HEALTH_SCORE,
        warnings: vec![
            "Unable to perform detailed analysis".to_owned(),
            "Please review ingredients manually".to_owned(),
        ],
        recommendations: vec![
            "Check product labels carefully".to_owned(),
            "Consult nutrition information".to_owned(),
        ],
        main_ingredients,
        allergens,
        summary: FALLBACK_SUMMARY.to_owned(),
    }
}

fn split_list(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn health_score(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !raw.is_finite() {
        return None;
    }
    // Clamped to 0..=10 before the cast, so it cannot truncate.
    Some(raw.round().clamp(0.0, 10.0) as u8)
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(ingredients: &str, allergens: &str) -> FormattedProduct {
        FormattedProduct {
            name: "Test Bar".to_owned(),
            brand: "Acme".to_owned(),
            barcode: "012345678905".to_owned(),
            ingredients: ingredients.to_owned(),
            allergens: allergens.to_owned(),
            nutrition: "Fat: 12 g/100g".to_owned(),
            categories: "Snacks".to_owned(),
        }
    }

    #[test]
    fn parses_json_wrapped_in_prose_and_fences() {
        let text = "Here is the analysis:\n```json\n{\"healthScore\": 8, \"warnings\": [\"Sugar\"], \"recommendations\": [], \"mainIngredients\": [\"Oats\"], \"allergens\": [\"Gluten\"], \"summary\": \"Good.\"}\n```\nHope that helps!";
        let analysis = parse_analysis(text).expect("embedded JSON should parse");
        assert_eq!(analysis.health_score, 8);
        assert_eq!(analysis.warnings, vec!["Sugar".to_owned()]);
        assert_eq!(analysis.main_ingredients, vec!["Oats".to_owned()]);
        assert_eq!(analysis.summary, "Good.");
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let analysis = parse_analysis(r#"{"healthScore": 4}"#).expect("should parse");
        assert_eq!(analysis.health_score, 4);
        assert!(analysis.warnings.is_empty());
        assert!(analysis.allergens.is_empty());
        assert_eq!(analysis.summary, "");
    }

    #[test]
    fn health_score_is_rounded_and_clamped() {
        assert_eq!(parse_analysis(r#"{"healthScore": 6.6}"#).unwrap().health_score, 7);
        assert_eq!(parse_analysis(r#"{"healthScore": 42}"#).unwrap().health_score, 10);
        assert_eq!(parse_analysis(r#"{"healthScore": -3}"#).unwrap().health_score, 0);
        assert_eq!(parse_analysis(r#"{"healthScore": "9"}"#).unwrap().health_score, 9);
    }

    #[test]
    fn missing_health_score_is_not_an_analysis() {
        assert!(parse_analysis(r#"{"summary": "no score"}"#).is_none());
        assert!(parse_analysis(r#"{"healthScore": "high"}"#).is_none());
    }

    #[test]
    fn text_without_braces_is_not_an_analysis() {
        assert!(parse_analysis("This product is fairly healthy.").is_none());
    }

    #[test]
    fn malformed_json_is_not_an_analysis() {
        assert!(parse_analysis("{healthScore: 7, oops}").is_none());
    }

    #[test]
    fn fallback_takes_first_five_ingredients() {
        let analysis = fallback_analysis(&product(
            "Oats, sugar, palm oil, salt, honey, cocoa, vanilla",
            "Gluten, Milk",
        ));
        assert_eq!(analysis.health_score, 5);
        assert_eq!(
            analysis.main_ingredients,
            vec!["Oats", "sugar", "palm oil", "salt", "honey"]
        );
        assert_eq!(analysis.allergens, vec!["Gluten", "Milk"]);
        assert_eq!(analysis.warnings.len(), 2);
        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(analysis.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn fallback_uses_placeholders_for_absent_data() {
        let analysis = fallback_analysis(&product(INGREDIENTS_UNAVAILABLE, NO_ALLERGENS));
        assert_eq!(analysis.main_ingredients, vec!["Not available"]);
        assert_eq!(analysis.allergens, vec!["Not specified"]);
    }

    #[test]
    fn interpret_response_falls_back_on_prose() {
        let analysis = interpret_response(
            "I cannot provide JSON today.",
            &product("Water, salt", NO_ALLERGENS),
        );
        assert_eq!(analysis.health_score, 5);
        assert_eq!(analysis.main_ingredients, vec!["Water", "salt"]);
    }
}
