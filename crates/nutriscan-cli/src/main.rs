mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nutriscan_analyzer::GeminiClient;
use nutriscan_core::{validate_barcode, AppConfig, Barcode, Report};
use nutriscan_openfoodfacts::{format_product, OpenFoodFactsClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nutriscan-cli")]
#[command(about = "Look up a food product by barcode and print its AI health report")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, analyze and print the health report for a barcode
    Analyze {
        /// UPC-A (12 digits) or EAN-13 (13 digits) barcode
        barcode: String,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether a barcode has a valid shape
    Validate {
        /// Barcode to check
        barcode: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = nutriscan_core::load_app_config()?;
    // Logs go to stderr so `--json` output stays machine-readable.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,nutriscan={}", config.log_level)))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { barcode, json } => {
            let report = run_analyze(&config, &barcode).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render(&report));
            }
        }
        Commands::Validate { barcode } => {
            if !validate_barcode(&barcode) {
                anyhow::bail!("'{barcode}' is not a valid barcode: expected 12 or 13 digits");
            }
            println!("{} is a valid barcode", barcode.trim());
        }
    }

    Ok(())
}

/// Runs the scan pipeline once, outside of any HTTP server.
async fn run_analyze(config: &AppConfig, input: &str) -> anyhow::Result<Report> {
    let barcode = Barcode::parse(input)?;
    let api_key = config
        .gemini_api_key
        .as_deref()
        .context("GEMINI_API_KEY is not set; add it to the environment or a .env file")?;

    let food_db = OpenFoodFactsClient::with_base_url(
        &config.food_db_url,
        config.food_db_timeout_secs,
        &config.user_agent,
    )?;
    let analyzer = GeminiClient::with_base_url(
        &config.gemini_url,
        &config.gemini_model,
        config.ai_timeout_secs,
    )?;

    let raw = food_db
        .fetch_product(&barcode)
        .await
        .with_context(|| format!("failed to look up barcode {barcode}"))?
        .with_context(|| format!("no product found for barcode {barcode}"))?;

    let product = format_product(&raw);
    let analysis = analyzer
        .analyze(&product, api_key)
        .await
        .with_context(|| format!("failed to analyze {}", product.name))?;

    Ok(Report::new(&product, analysis))
}
