use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use paywatch::api;
use paywatch::core::{
    build_employer_summaries, build_future_targets, build_gap_report, build_timeline, month_range,
};

#[derive(Parser)]
#[command(name = "paywatch", about = "Salary history and inflation projection engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Build the monthly timeline from a snapshot file
    Timeline {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Per-employer gain/loss summaries from a snapshot file
    Summary {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Report the CPI months missing from the snapshot's series
    Gaps {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Project salary targets forward to the latest CPI period
    Targets {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("paywatch=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            api::run_http_server(port).await?;
        }
        Command::Timeline { input, pretty } => {
            let request = load_snapshot(&input)?;
            let timeline = build_timeline(
                &request.records,
                &request.policy,
                request.series.as_ref(),
                request.today,
            );
            print_json(&timeline, pretty)?;
        }
        Command::Summary { input, pretty } => {
            let request = load_snapshot(&input)?;
            let timeline = build_timeline(
                &request.records,
                &request.policy,
                request.series.as_ref(),
                request.today,
            );
            let summaries = build_employer_summaries(&timeline, &request.records);
            print_json(&summaries, pretty)?;
        }
        Command::Gaps { input, pretty } => {
            let request = load_snapshot(&input)?;
            let series = request
                .series
                .as_ref()
                .context("snapshot has no inflationSeries to check for gaps")?;
            let range = month_range(&request.records, request.today);
            print_json(&build_gap_report(&range, series), pretty)?;
        }
        Command::Targets { input, pretty } => {
            let request = load_snapshot(&input)?;
            let targets = build_future_targets(
                &request.records,
                request.series.as_ref(),
                request.manual_record_id,
            );
            print_json(&targets, pretty)?;
        }
    }
    Ok(())
}

fn load_snapshot(path: &PathBuf) -> anyhow::Result<api::SnapshotRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot file {}", path.display()))?;
    api::parse_snapshot(&raw).map_err(anyhow::Error::msg)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}
