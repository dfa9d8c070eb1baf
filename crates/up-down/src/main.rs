//! up-down: score funds against their benchmarks and compare them on a bell curve.
//!
//! Usage:
//!   up-down template --out ./templates
//!   up-down score --workbook "./uploads/alpha" --export
//!   up-down list
//!   up-down delete "Alpha Growth" --yes
//!   up-down backup | snapshots | restore [--file PATH]
//!   up-down bell-curve [--input finals.csv] [--seed 42]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use score_store::{SnapshotManager, SqliteScoreStore};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use config::AppConfig;

/// Up/down market batting averages for funds versus their benchmarks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL, overriding DATABASE_URL.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write blank upload templates.
    Template(TemplateArgs),
    /// Score a workbook directory ("Fund Info.csv" + "Data.csv").
    Score(ScoreArgs),
    /// List every stored fund with its averages.
    List,
    /// Delete a stored fund.
    Delete(DeleteArgs),
    /// Snapshot the score table to the backup directory.
    Backup,
    /// Replace the score table with a snapshot.
    Restore(RestoreArgs),
    /// List available snapshots.
    Snapshots,
    /// Build the distribution of final scores and render it.
    BellCurve(BellCurveArgs),
}

#[derive(Parser)]
struct TemplateArgs {
    /// Output directory (defaults to OUTPUT_DIR).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser)]
struct ScoreArgs {
    /// Directory holding the workbook sections as CSV files.
    #[arg(long)]
    workbook: PathBuf,

    /// Also write the combined sheet to OUTPUT_DIR.
    #[arg(long)]
    export: bool,

    /// Compute and display without saving to the store.
    #[arg(long)]
    no_save: bool,
}

#[derive(Parser)]
struct DeleteArgs {
    /// Fund name to delete.
    fund_name: String,

    /// Confirm the deletion.
    #[arg(long)]
    yes: bool,
}

#[derive(Parser)]
struct RestoreArgs {
    /// Snapshot file (defaults to the newest in BACKUP_DIR).
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Parser)]
struct BellCurveArgs {
    /// CSV table with "Fund" and "Final" columns instead of the store.
    #[arg(long)]
    input: Option<PathBuf>,

    /// SVG output path (defaults to OUTPUT_DIR/bell_curve.svg).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Jitter seed, overriding JITTER_SEED.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of funds to highlight, overriding HIGHLIGHT_TOP_N.
    #[arg(long)]
    top: Option<usize>,
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    tracing::debug!(
        "Using database {} (backups in {})",
        config.database_url,
        config.backup_dir.display()
    );

    // Templates need no database
    if let Commands::Template(args) = &cli.command {
        let out = args.out.clone().unwrap_or_else(|| config.output_dir.clone());
        for path in commands::template(&out)? {
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let store = SqliteScoreStore::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;
    let snapshots = SnapshotManager::new(&config.backup_dir);

    match cli.command {
        Commands::Template(_) => {}
        Commands::Score(args) => {
            let export_dir = args.export.then_some(config.output_dir.as_path());
            let outcome =
                commands::score(&store, &args.workbook, !args.no_save, export_dir).await?;

            println!("{}", output::scorecard_table(&outcome.scorecard));
            let undefined = outcome.scorecard.metrics.undefined_metrics();
            if !undefined.is_empty() {
                println!("Undefined (zero volatility): {}", undefined.join(", "));
            }
            if outcome.saved {
                println!("Saved '{}'", outcome.scorecard.identity.fund_name);
            }
            if let Some(path) = outcome.export_path {
                println!("Exported {}", path.display());
            }
        }
        Commands::List => {
            let records = commands::list(&store).await?;
            if records.is_empty() {
                println!("No funds stored yet");
            } else {
                println!("{}", output::records_table(&records));
            }
        }
        Commands::Delete(args) => {
            if !args.yes {
                tracing::warn!("Refusing to delete '{}' without --yes", args.fund_name);
            }
            commands::delete(&store, &args.fund_name, args.yes)
                .await
                .context("Re-run with --yes to confirm the deletion")?;
            println!("Deleted '{}'", args.fund_name);
        }
        Commands::Backup => {
            let path = commands::backup(&store, &snapshots).await?;
            println!("Backup written to {}", path.display());
        }
        Commands::Restore(args) => {
            let (path, count) =
                commands::restore(&store, &snapshots, args.file.as_deref()).await?;
            println!("Restored {} funds from {}", count, path.display());
        }
        Commands::Snapshots => {
            let list = commands::snapshots(&snapshots)?;
            if list.is_empty() {
                println!("No snapshots in {}", snapshots.dir().display());
            } else {
                println!("{}", output::snapshots_table(&list));
            }
        }
        Commands::BellCurve(args) => {
            let mut options = config.distribution_options();
            if let Some(seed) = args.seed {
                options.seed = Some(seed);
            }
            if let Some(top) = args.top {
                options.top_n = top;
            }
            let out = args
                .out
                .unwrap_or_else(|| config.output_dir.join(commands::BELL_CURVE_FILE));

            let model =
                commands::bell_curve(&store, args.input.as_deref(), &out, &options).await?;
            println!(
                "Mean {:.4}, std dev {:.4} across {} funds",
                model.mean,
                model.std_dev,
                model.points.len()
            );
            println!("{}", output::distribution_table(&model));
            println!("Chart written to {}", out.display());
        }
    }

    Ok(())
}
