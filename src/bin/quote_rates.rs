//! # quote-rates
//!
//! Runs one shipping rate request against a catalog fixture and prints the
//! grouped response as JSON.
//!
//! ```text
//! quote-rates --catalog catalog.json --request request.json
//! ```

use anyhow::Context;
use clap::Parser;
use shipping_rates::application::ShippingRateService;
use shipping_rates::application::dto::ShippingRateRequest;
use shipping_rates::config::AppConfig;
use shipping_rates::infrastructure::persistence::in_memory::{CatalogFixture, InMemoryCatalog};
use shipping_rates::telemetry;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "quote-rates")]
#[command(about = "Quote shipping rates for one request", version)]
struct Args {
    /// Path to the catalog fixture (channels, services, coverage, price table)
    #[arg(short, long)]
    catalog: String,

    /// Path to the JSON shipping rate request
    #[arg(short, long)]
    request: String,

    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = AppConfig::from_file(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;
    config.validate().context("validating configuration")?;
    telemetry::init_tracing(&config.log).context("installing tracing subscriber")?;

    info!("Starting quote-rates v{}", env!("CARGO_PKG_VERSION"));

    let fixture = CatalogFixture::from_path(&args.catalog)
        .await
        .with_context(|| format!("reading catalog {}", args.catalog))?;
    let catalog = InMemoryCatalog::from_fixture(fixture).await;

    let request_json = tokio::fs::read_to_string(&args.request)
        .await
        .with_context(|| format!("reading request {}", args.request))?;
    let request: ShippingRateRequest =
        serde_json::from_str(&request_json).context("parsing shipping rate request")?;

    let registry = config
        .build_registry(catalog.price_table.clone())
        .context("building provider registry")?;
    let cache = config.build_cache().await.context("connecting rate cache")?;

    let service = ShippingRateService::new(
        Arc::new(catalog.channels.clone()),
        Arc::new(catalog.courier_services.clone()),
        Arc::new(catalog.coverage.clone()),
        cache,
        Arc::new(registry),
        config.aggregation_config(),
    );

    let response = service.get_rate_response(&request).await?;
    let output = if args.compact {
        serde_json::to_string(&response)?
    } else {
        serde_json::to_string_pretty(&response)?
    };
    println!("{output}");

    Ok(())
}
