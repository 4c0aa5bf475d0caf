//! Plain-text rendering of a [`Report`] for the terminal.

use nutriscan_core::Report;

/// Qualitative band for a 0-10 health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScoreBand {
    Healthy,
    Moderate,
    Unhealthy,
}

impl ScoreBand {
    pub(crate) fn from_score(score: u8) -> Self {
        match score {
            7.. => Self::Healthy,
            4..=6 => Self::Moderate,
            _ => Self::Unhealthy,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Healthy => "[+] Healthy (7-10)",
            Self::Moderate => "[~] Moderate (4-6)",
            Self::Unhealthy => "[-] Unhealthy (0-3)",
        }
    }
}

const RULE: &str = "==================================================";

/// Renders the full text report, ending with a newline.
pub(crate) fn render(report: &Report) -> String {
    let product = &report.product_data;
    let band = ScoreBand::from_score(report.health_score);
    let summary = report.summary.trim();

    let mut lines = vec![
        "FOOD BARCODE ANALYSIS REPORT".to_owned(),
        RULE.to_owned(),
        "PRODUCT INFORMATION".to_owned(),
        format!("   Name: {}", product.name),
        format!("   Brand: {}", product.brand),
        format!("   Barcode: {}", product.barcode),
        String::new(),
        "SAFETY ASSESSMENT".to_owned(),
        format!("   Overall Health Score: {}/10", report.health_score),
        format!("   Rating: {}", band.label()),
    ];
    push_list(&mut lines, "Warnings", &report.warnings);
    push_list(&mut lines, "Recommendations", &report.recommendations);

    lines.push(String::new());
    lines.push("INGREDIENT ANALYSIS".to_owned());
    push_list(&mut lines, "Main Ingredients", &report.main_ingredients);
    push_list(&mut lines, "Allergens", &report.allergens);

    lines.push(String::new());
    lines.push("AI ANALYSIS SUMMARY".to_owned());
    lines.push(format!("   {}", if summary.is_empty() { "None" } else { summary }));
    lines.push(RULE.to_owned());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Appends `"   Title:"` followed by one trimmed bullet per non-blank item.
fn push_list(lines: &mut Vec<String>, title: &str, items: &[String]) {
    lines.push(format!("   {title}:"));
    let before = lines.len();
    lines.extend(
        items
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| format!("      * {item}")),
    );
    if lines.len() == before {
        lines.push("      None".to_owned());
    }
}
