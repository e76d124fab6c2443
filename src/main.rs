use anyhow::Context;
use clap::{Parser, Subcommand};
use omm_compactor::config::Config;
use omm_compactor::infra::http_client::ReqwestHttp;
use omm_compactor::logging;
use omm_compactor::pipeline::NormalizedBatch;
use omm_compactor::{Pipeline, SourceLocator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "omm_compactor")]
#[command(about = "Compacts OMM orbital-element catalogs into positional JSON")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./omm_compactor.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, normalize and write the compact artifact
    Compact {
        /// Local JSON file or http(s) URL
        #[arg(long)]
        source: Option<String>,
        /// Where to write the compact JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Load and normalize without writing anything
    Inspect {
        /// Local JSON file or http(s) URL
        #[arg(long)]
        source: Option<String>,
    },
}

fn print_batch(batch: &NormalizedBatch) {
    println!("   Normalized: {}", batch.records.len());
    println!("   Skipped: {}", batch.skipped_total());
    for (reason, count) in &batch.skipped {
        println!("     - {}: {}", reason, count);
    }
    for (field, count) in &batch.field_warnings {
        println!("   ⚠️  {} non-numeric value(s) in {} defaulted to 0", count, field);
    }
    for (regime, count) in &batch.regimes {
        println!("   {}: {}", regime, count);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = logging::init_logging(&config.logging);

    let http = ReqwestHttp::new(&config.http)
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
    let pipeline = Pipeline::new(Arc::new(http));

    match cli.command {
        Commands::Compact { source, output } => {
            let locator = SourceLocator::parse(&config.resolve_source(source.as_deref()));
            let output = config.resolve_output(output.as_deref());
            println!("🚀 Compacting {} -> {}", locator, output.display());

            let result = match pipeline.run(&locator, &output).await {
                Ok(result) => result,
                Err(e) => {
                    error!("Compaction failed: {}", e);
                    return Err(e).context("Compaction failed");
                }
            };

            println!("✅ Success!");
            println!("   Records in: {}", result.total_records);
            print_batch(&result.batch);
            println!("{}", result.size);
            println!("   SHA-256: {}", result.artifact.sha256);
            info!("Wrote {}", result.artifact.path.display());
        }
        Commands::Inspect { source } => {
            let locator = SourceLocator::parse(&config.resolve_source(source.as_deref()));
            println!("🔍 Inspecting {}", locator);

            let result = pipeline.inspect(&locator).await.context("Inspection failed")?;
            println!("   Records in: {}", result.total_records);
            println!("   Size: {:.2} KB", result.bytes_read as f64 / 1024.0);
            print_batch(&result.batch);
        }
    }
    Ok(())
}
