//! ranking-runner: score the stock universe and write rankings back.
//!
//! Refreshes sector and industry momentum scores, then computes the
//! technical composite and the fundamental score for every stock in
//! `stock_data`, ranks each within its market-cap tier and upserts the
//! results into `stock_rankings`.
//!
//! Usage:
//!   cargo run -p ranking-runner                       # every pipeline
//!   cargo run -p ranking-runner -- --technical --top 20
//!   cargo run -p ranking-runner -- --all --dry-run --json
//!   cargo run -p ranking-runner -- --fundamental --db rankings.db --batch-size 200

mod cli;
mod config;
mod report;
mod run;


use anyhow::Context;
use cli::CliArgs;
use config::RunnerConfig;
use ranking_store::RankingDb;
use run::{run, RunOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "ranking_runner=info,technical_score=info,fundamental_score=info,ranking_store=info";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("RANKING_LOG_JSON")
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if CliArgs::wants_help(&args) {
        CliArgs::print_usage();
        return Ok(());
    }
    let cli = CliArgs::parse(&args);

    let mut config = RunnerConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.database_url = if db.starts_with("sqlite:") {
            db.clone()
        } else {
            format!("sqlite:{}", db)
        };
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    config.validate()?;

    let options = RunOptions {
        technical: cli.technical,
        fundamental: cli.fundamental,
        sectors: cli.sectors,
        dry_run: cli.dry_run,
        top_n: cli.top_n,
    };
    tracing::info!(
        "Starting ranking run: technical={} fundamental={} sectors={} dry_run={}",
        options.technical,
        options.fundamental,
        options.sectors,
        options.dry_run
    );

    let started = Instant::now();
    let store = Arc::new(
        RankingDb::new(&config.database_url)
            .await
            .with_context(|| format!("opening {}", config.database_url))?,
    );

    let report = run(store, &config, &options).await?;
    report.log();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let failed = report.failed_rows();
    if failed > 0 {
        tracing::warn!("{} rows failed to write", failed);
    }
    if let Some(err) = report.terminal_write_failure() {
        return Err(err.into());
    }
    tracing::info!("Ranking run finished in {:.1}s", started.elapsed().as_secs_f64());
    Ok(())
}
