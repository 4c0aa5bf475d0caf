use serde::{Deserialize, Serialize};

// Fallback texts substituted for absent food-database fields.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const UNKNOWN_BRAND: &str = "Unknown Brand";
pub const UNKNOWN_BARCODE: &str = "Unknown";
pub const UNKNOWN_CATEGORIES: &str = "Unknown";
pub const INGREDIENTS_UNAVAILABLE: &str = "Ingredients not available";
pub const NO_ALLERGENS: &str = "No allergens specified";
pub const NUTRITION_UNAVAILABLE: &str = "Nutrition information not available";
pub const NUTRITION_LIMITED: &str = "Limited nutrition data available";

/// A food-database record normalized into display-ready strings.
///
/// Every field is always a non-empty string; missing source data is replaced
/// by a fixed fallback text during formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedProduct {
    pub name: String,
    pub brand: String,
    pub barcode: String,
    pub ingredients: String,
    pub allergens: String,
    pub nutrition: String,
    pub categories: String,
}

/// Structured health assessment of a product.
///
/// Produced either from the language model's answer or from the deterministic
/// fallback; both take this exact shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// 0 (very unhealthy) to 10 (very healthy).
    pub health_score: u8,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub main_ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub summary: String,
}

/// The identity block of a [`Report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductIdentity {
    pub name: String,
    pub brand: String,
    pub barcode: String,
}

/// The externally visible result of a barcode scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub product_data: ProductIdentity,
    pub health_score: u8,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub main_ingredients: Vec<String>,
    pub allergens: Vec<String>,
    pub summary: String,
}

impl Report {
    /// Combines the product identity with its analysis.
    #[must_use]
    pub fn new(product: &FormattedProduct, analysis: Analysis) -> Self {
        Self {
            product_data: ProductIdentity {
                name: product.name.clone(),
                brand: product.brand.clone(),
                barcode: product.barcode.clone(),
            },
            health_score: analysis.health_score,
            warnings: analysis.warnings,
            recommendations: analysis.recommendations,
            main_ingredients: analysis.main_ingredients,
            allergens: analysis.allergens,
            summary: analysis.summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> FormattedProduct {
        FormattedProduct {
            name: "Nutella".to_owned(),
            brand: "Ferrero".to_owned(),
            barcode: "3017620422003".to_owned(),
            ingredients: "Sugar, palm oil, hazelnuts".to_owned(),
            allergens: "Milk, Nuts".to_owned(),
            nutrition: "Energy: 539 kcal/100g".to_owned(),
            categories: "Spreads".to_owned(),
        }
    }

    fn sample_analysis() -> Analysis {
        Analysis {
            health_score: 3,
            warnings: vec!["High sugar".to_owned()],
            recommendations: vec!["Eat sparingly".to_owned()],
            main_ingredients: vec!["Sugar".to_owned(), "Palm oil".to_owned()],
            allergens: vec!["Milk".to_owned()],
            summary: "A sweet spread.".to_owned(),
        }
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = Report::new(&sample_product(), sample_analysis());
        let json = serde_json::to_value(&report).expect("serialize report");

        assert_eq!(json["productData"]["name"], "Nutella");
        assert_eq!(json["productData"]["brand"], "Ferrero");
        assert_eq!(json["productData"]["barcode"], "3017620422003");
        assert_eq!(json["healthScore"], 3);
        assert_eq!(json["mainIngredients"][1], "Palm oil");
        assert_eq!(json["summary"], "A sweet spread.");
        assert!(json.get("ingredients").is_none());
    }

    #[test]
    fn analysis_deserializes_from_model_shape() {
        let json = serde_json::json!({
            "healthScore": 7,
            "warnings": [],
            "recommendations": ["Enjoy"],
            "mainIngredients": ["Oats"],
            "allergens": ["Gluten"],
            "summary": "Fine."
        });
        let analysis: Analysis = serde_json::from_value(json).expect("deserialize analysis");
        assert_eq!(analysis.health_score, 7);
        assert_eq!(analysis.allergens, vec!["Gluten".to_owned()]);
    }
}
