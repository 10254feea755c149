mod export;
mod fetch;
mod score;

use std::path::PathBuf;

use adscout_core::{ActiveStatus, AppConfig};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adscout")]
#[command(about = "Collect, score and export Meta Ad Library ads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    InitDb,
    /// Fetch ads from the Ad Library and store them
    Fetch {
        /// Comma-separated ISO country codes (e.g. BE,NL,DE)
        #[arg(long, value_delimiter = ',', required = true)]
        countries: Vec<String>,
        /// Keyword search (e.g. "dumbbell")
        #[arg(long)]
        terms: Option<String>,
        /// Start date, YYYY-MM-DD (accepted, not applied)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// End date, YYYY-MM-DD (accepted, not applied)
        #[arg(long)]
        until: Option<NaiveDate>,
        /// ACTIVE | INACTIVE | ALL
        #[arg(long, default_value = "ACTIVE")]
        status: ActiveStatus,
    },
    /// Recompute the score of every stored ad
    Score,
    /// Write the flat CSV report
    Export {
        /// Output file; parent directories are created
        #[arg(long, default_value = "out/ads.csv")]
        out: PathBuf,
    },
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn open_store(config: &AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = adscout_db::connect_pool(
        &config.database_url,
        adscout_db::PoolConfig::from_app_config(config),
    )
    .await
    .with_context(|| format!("failed to open database {}", config.database_url))?;

    let applied = adscout_db::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;
    tracing::debug!(applied, "migrations up to date");

    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = adscout_core::load_app_config().context("invalid configuration")?;
    init_tracing(&config);

    let pool = open_store(&config).await?;

    match cli.command {
        Commands::InitDb => println!("Database ready."),
        Commands::Fetch {
            countries,
            terms,
            since,
            until,
            status,
        } => {
            let query = fetch::build_query(countries, terms, since, until, status);
            fetch::run_fetch(&pool, &config, &query).await?;
        }
        Commands::Score => score::run_score(&pool).await?,
        Commands::Export { out } => export::run_export(&pool, &out).await?,
    }

    pool.close().await;
    Ok(())
}

#[cfg(test)]
mod tests;
