use anyhow::{Context, Result};
use lovacar::cleaner::{lookup, RawListingRecord};
use lovacar::core::Config;
use lovacar::pipeline;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    lovacar::core::logging::init_logging(&config.monitoring.log_level);

    tracing::info!("🚗 Lovacar market engine starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Fail fast if a descriptor table regressed; per-record unknowns still
    // resolve to Unknown at runtime.
    lookup::verify_tables()?;

    let raw = read_feed(&config.io.input_path).await?;
    tracing::info!("📥 Loaded {} raw records from {}", raw.len(), config.io.input_path);

    let report = pipeline::run_batch(&raw, &config);

    for (kind, count) in &report.rejections.counts {
        tracing::warn!("Rejected {} record(s): {}", count, kind);
    }

    write_reports(&config.io.output_dir, &report).await?;
    tracing::info!(
        "💾 Wrote {} estimates and {} offers to {}/",
        report.estimates.len(),
        report.offers.len(),
        config.io.output_dir
    );

    print_best_deals(&report, &config);
    Ok(())
}

async fn read_feed(path: &str) -> Result<Vec<RawListingRecord>> {
    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading raw listing feed {path}"))?;
    serde_json::from_str(&data).with_context(|| format!("parsing raw listing feed {path}"))
}

async fn write_reports(dir: &str, report: &pipeline::BatchReport) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let estimates = serde_json::to_string_pretty(&report.estimates)?;
    tokio::fs::write(Path::new(dir).join("estimates.json"), estimates).await?;
    let offers = serde_json::to_string_pretty(&report.offers)?;
    tokio::fs::write(Path::new(dir).join("offers.json"), offers).await?;
    Ok(())
}

fn print_best_deals(report: &pipeline::BatchReport, config: &Config) {
    let deals = report.best_deals(config.monitoring.min_deal_discount, 5);
    if deals.is_empty() {
        println!("\nNo deals above the discount threshold");
        return;
    }

    println!("\n===== BEST DEALS ({} found) =====", deals.len());
    for (i, offer) in deals.iter().enumerate() {
        let listing = report.pool.get(&offer.listing_id);
        let label = listing
            .map(|l| format!("{} {} ({})", l.make, l.model, l.year))
            .unwrap_or_else(|| offer.listing_id.clone());
        let asking = listing.map(|l| l.price).unwrap_or_default();

        println!("\n{}. {}", i + 1, label);
        println!("   Asking price: {} €", asking);
        println!("   Recommended offer: {} €", offer.recommended_price);
        println!(
            "   Negotiation band: {} € - {} €",
            offer.min_acceptable, offer.max_acceptable
        );
        println!("   Discount: {:.1}%", offer.discount_percent * 100.0);
        if let Some(l) = listing {
            println!("   URL: {}", l.source_url);
        }
    }
}
