use nutriscan_core::FormattedProduct;

/// Example answer embedded in the prompt so the model mirrors the schema.
const EXAMPLE_RESPONSE: &str = r#"{
  "healthScore": 7,
  "warnings": ["High sodium content", "Contains artificial preservatives"],
  "recommendations": ["Consume in moderation", "Consider low-sodium alternatives"],
  "mainIngredients": ["Wheat flour", "Sugar", "Salt"],
  "allergens": ["Gluten", "May contain nuts"],
  "summary": "This product is moderately healthy but should be consumed in moderation due to high sodium content."
}"#;

/// Builds the health-assessment prompt for one product.
#[must_use]
pub fn build_prompt(product: &FormattedProduct) -> String {
    format!(
        "\
Please analyze this food product and provide a health assessment. Return your response as a JSON object with the following structure:

{EXAMPLE_RESPONSE}

Product Information:
- Name: {name}
- Brand: {brand}
- Ingredients: {ingredients}
- Allergens: {allergens}
- Nutrition Facts: {nutrition}

Please provide:
1. A health score from 0-10 (0=very unhealthy, 10=very healthy)
2. Specific warnings about concerning ingredients or nutritional aspects
3. Practical recommendations for consumers
4. List of main ingredients (simplified, top 5-7)
5. List of allergens present
6. A 2-3 sentence summary of the overall health assessment

Focus on practical consumer advice based on ingredients, additives, nutritional content, and potential health impacts.
",
        name = product.name,
        brand = product.brand,
        ingredients = product.ingredients,
        allergens = product.allergens,
        nutrition = product.nutrition,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_product_fields_and_schema() {
        let product = FormattedProduct {
            name: "Oat Crunch".to_owned(),
            brand: "Acme".to_owned(),
            barcode: "012345678905".to_owned(),
            ingredients: "Oats, sugar".to_owned(),
            allergens: "Gluten".to_owned(),
            nutrition: "Sugars: 12 g/100g".to_owned(),
            categories: "Cereals".to_owned(),
        };

        let prompt = build_prompt(&product);
        assert!(prompt.contains("- Name: Oat Crunch"));
        assert!(prompt.contains("- Brand: Acme"));
        assert!(prompt.contains("- Ingredients: Oats, sugar"));
        assert!(prompt.contains("- Allergens: Gluten"));
        assert!(prompt.contains("- Nutrition Facts: Sugars: 12 g/100g"));
        assert!(prompt.contains("\"healthScore\": 7"));
        assert!(prompt.contains("\"mainIngredients\""));
    }
}
