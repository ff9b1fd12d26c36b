//! Vet CLI - claim and review vetting work units
//!
//! Several reviewers may run `vet` against the same directory at once;
//! lock markers guarantee each file is reviewed by one of them at a time.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vetting_core::application::constants::{DEFAULT_TASK_SUFFIX, REALS_TASK_SUFFIX};
use vetting_core::application::{builder_for, WorkUnitProvider, WorkloadSession};
use vetting_core::domain::{WorkUnit, WorkUnitKind};
use vetting_core::port::id_provider::{IdProvider, UuidProvider};
use vetting_core::port::time_provider::SystemTimeProvider;
use vetting_core::port::{DirectoryLister, ProgressTracker};
use vetting_infra_fs::{FileProgressTracker, FsDirectoryLister, JsonParser};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "warn,vetting_core=info,vetting_infra_fs=info";

#[derive(Parser)]
#[command(name = "vet")]
#[command(about = "Detection vetting work distribution", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the backing files
    #[arg(long, env = "VET_DIR", default_value = ".")]
    dir: String,

    /// Directory holding lock/done markers (defaults to --dir)
    #[arg(long, env = "VET_PROGRESS_DIR")]
    progress_dir: Option<String>,

    /// Task suffix selecting eligible files
    /// (default: .cands.astrom for candidates, .reals.astrom for reals)
    #[arg(long, env = "VET_TASK")]
    task: Option<String>,

    /// Review granularity: candidates (per source) or reals (per reading)
    #[arg(long, env = "VET_KIND", default_value = "candidates")]
    kind: WorkUnitKind,

    /// Reviewer identity used for locks (default: random UUID)
    #[arg(long, env = "VET_REVIEWER")]
    reviewer: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List eligible files with their progress
    List,

    /// Lock the next available file and show its summary
    Claim,

    /// Interactively review work units until none are left
    Review,

    /// Mark a file as fully reviewed and release its lock
    Complete {
        /// File name (as listed)
        file: String,
    },

    /// Release this reviewer's lock on a file
    Release {
        /// File name (as listed)
        file: String,
    },
}

#[derive(Tabled)]
struct FileRow {
    file: String,
    done: String,
    locked_by: String,
}

impl Cli {
    fn task(&self) -> String {
        self.task.clone().unwrap_or_else(|| {
            match self.kind {
                WorkUnitKind::Candidates => DEFAULT_TASK_SUFFIX,
                WorkUnitKind::Reals => REALS_TASK_SUFFIX,
            }
            .to_string()
        })
    }
}

struct Wiring {
    task: String,
    lister: Arc<FsDirectoryLister>,
    tracker: Arc<FileProgressTracker>,
    provider: WorkUnitProvider,
}

fn init_logging() -> Result<()> {
    let log_format = std::env::var("VET_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    // stderr keeps the interactive review output on stdout readable
    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn wire(cli: &Cli) -> Wiring {
    let dir = PathBuf::from(shellexpand::tilde(&cli.dir).into_owned());
    let progress_dir = cli
        .progress_dir
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
        .unwrap_or_else(|| dir.clone());
    let reviewer = cli
        .reviewer
        .clone()
        .unwrap_or_else(|| UuidProvider.generate_id());

    let lister = Arc::new(FsDirectoryLister::new(dir));
    let tracker = Arc::new(FileProgressTracker::new(
        progress_dir,
        reviewer,
        Arc::new(SystemTimeProvider),
    ));
    let task = cli.task();
    let provider = WorkUnitProvider::new(
        task.clone(),
        lister.clone(),
        tracker.clone(),
        builder_for(cli.kind, Arc::new(JsonParser::new())),
    );

    Wiring {
        task,
        lister,
        tracker,
        provider,
    }
}

fn describe(unit: &WorkUnit) -> String {
    let reading = unit.current_reading();
    let status = match unit.kind() {
        WorkUnitKind::Candidates => unit.current_source().status(),
        WorkUnitKind::Reals => reading.status(),
    };
    format!(
        "{} source {}/{} reading {}/{} [{}] frame={} x={:.2} y={:.2} ({}/{} done)",
        unit.filename().bold(),
        unit.current_source_number() + 1,
        unit.source_count(),
        unit.current_obs_number() + 1,
        unit.obs_count(),
        status,
        reading.item().frame,
        reading.item().x,
        reading.item().y,
        unit.processed_count(),
        unit.item_count(),
    )
}

fn print_help() {
    println!("  a  accept current item      r  reject current item");
    println!("  n  next vettable item       w  next work unit");
    println!("  s/S next/previous source    o/O next/previous reading");
    println!("  q  release and quit         ?  this help");
}

/// Claim the next unit; false when there is no work left
async fn next_unit(session: &mut WorkloadSession) -> Result<bool> {
    match session.advance().await {
        Ok(unit) => {
            println!("{} {}", "▶ Claimed".green().bold(), unit.filename());
            Ok(true)
        }
        Err(e) if e.is_no_available_work() => {
            println!("{}", "No more work available".yellow());
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

async fn review(provider: WorkUnitProvider) -> Result<()> {
    let mut session = WorkloadSession::new(provider);
    let outcome = review_units(&mut session).await;

    // the current lock is given back whichever way the loop ended
    let released = session.release().await;
    info!(
        workunits = session.workunit_number(),
        "Review session ended"
    );
    outcome?;
    released?;
    Ok(())
}

async fn review_units(session: &mut WorkloadSession) -> Result<()> {
    if !next_unit(session).await? {
        return Ok(());
    }
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(unit) = session.current_mut() else {
            break;
        };
        println!("{}", describe(unit));

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let mut move_on = false;
        match line.trim() {
            "a" => {
                unit.accept_current_item();
                unit.next_vettable_item();
            }
            "r" => {
                unit.reject_current_item();
                unit.next_vettable_item();
            }
            "n" => unit.next_vettable_item(),
            "s" => unit.next_source(),
            "S" => unit.previous_source(),
            "o" => unit.next_obs(),
            "O" => unit.previous_obs(),
            "w" => move_on = true,
            "q" => break,
            "?" | "h" | "" => print_help(),
            other => println!("{} {}", "Unknown command:".red(), other),
        }

        if move_on || unit.is_complete() {
            if unit.is_complete() {
                println!("{} {}", "✓ Finished".green().bold(), unit.filename());
            }
            if !next_unit(session).await? {
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    let wiring = wire(&cli);

    info!(
        version = VERSION,
        task = %wiring.task,
        kind = %cli.kind,
        reviewer = %wiring.tracker.owner(),
        "vet starting"
    );

    match cli.command {
        Commands::List => {
            let names = wiring.lister.list(&wiring.task).await?;
            if names.is_empty() {
                println!("{}", "No eligible files".yellow());
                return Ok(());
            }

            let mut rows = Vec::with_capacity(names.len());
            for file in names {
                let done = wiring.tracker.is_done(&file).await?;
                let locked_by = wiring.tracker.lock_owner(&file).await?;
                rows.push(FileRow {
                    file,
                    done: if done { "yes".to_string() } else { "no".to_string() },
                    locked_by: locked_by.unwrap_or_else(|| "-".to_string()),
                });
            }
            println!("{}", Table::new(rows));
        }

        Commands::Claim => match wiring.provider.get_workunit().await {
            Ok(unit) => {
                println!("{}", format!("✓ Claimed {}", unit.filename()).green().bold());
                println!("  {} {}", "Reviewer:".bold(), wiring.tracker.owner());
                println!("  {} {}", "Kind:".bold(), unit.kind());
                println!("  {} {}", "Sources:".bold(), unit.source_count());
                println!("  {} {}", "Items:".bold(), unit.item_count());
            }
            Err(e) if e.is_no_available_work() => {
                println!("{}", "No available work".yellow());
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Review => review(wiring.provider).await?,

        Commands::Complete { file } => {
            wiring.tracker.mark_done(&file).await?;
            wiring.tracker.unlock(&file).await?;
            println!("{}", format!("✓ {} marked done", file).green().bold());
        }

        Commands::Release { file } => {
            wiring.tracker.unlock(&file).await?;
            println!("{}", format!("✓ {} released", file).green().bold());
        }
    }

    Ok(())
}
