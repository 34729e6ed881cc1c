mod harvest;
mod prompt;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use fareharvest_core::{AppConfig, DateWindow, Route};
use fareharvest_scraper::{KayakClient, Pacing, SessionConfig};
use fareharvest_store::{DatasetSummary, DiagnosticFile, TableStore};
use tracing_subscriber::EnvFilter;

use crate::harvest::{HarvestPlan, HarvestState, Harvester};
use crate::prompt::ConsolePrompt;

#[derive(Debug, Parser)]
#[command(name = "fareharvest")]
#[command(about = "Harvest direct-flight offers into a CSV table")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every date in the window and append its offers to the store
    Harvest(HarvestArgs),
    /// Print row counts and date coverage of the store
    Summary {
        /// Store file to read (defaults to `FAREHARVEST_STORE_PATH`)
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

/// Overrides for the configured harvest. Unset flags fall back to config.
#[derive(Debug, Default, Args)]
struct HarvestArgs {
    /// Route as `ORIGIN-DESTINATION`, e.g. `LAX-ATL`
    #[arg(long)]
    route: Option<Route>,

    /// First day offset from today (inclusive)
    #[arg(long, allow_hyphen_values = true)]
    start: Option<i64>,

    /// Last day offset from today (exclusive)
    #[arg(long, allow_hyphen_values = true)]
    end: Option<i64>,

    /// Store file to append to
    #[arg(long)]
    store: Option<PathBuf>,

    /// Skip dates that already hold offers retrieved today
    #[arg(long)]
    skip_recorded: bool,

    /// Print the planned dates and URLs without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl HarvestArgs {
    fn plan(&self, config: &AppConfig) -> anyhow::Result<HarvestPlan> {
        let window = DateWindow::new(
            self.start.unwrap_or(config.window.start()),
            self.end.unwrap_or(config.window.end()),
        )?;
        Ok(HarvestPlan {
            route: self.route.clone().unwrap_or_else(|| config.route.clone()),
            window,
            base_url: config.base_url.clone(),
            skip_recorded: self.skip_recorded,
        })
    }

    fn store_path(&self, config: &AppConfig) -> PathBuf {
        self.store
            .clone()
            .unwrap_or_else(|| config.store_path.clone())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = fareharvest_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Harvest(args)) => run_harvest(&config, &args).await,
        Some(Commands::Summary { store }) => {
            run_summary(&store.unwrap_or_else(|| config.store_path.clone()))
        }
        None => run_harvest(&config, &HarvestArgs::default()).await,
    }
}

async fn run_harvest(config: &AppConfig, args: &HarvestArgs) -> anyhow::Result<()> {
    let plan = args.plan(config)?;
    let store_path = args.store_path(config);
    let today = Local::now().date_naive();

    if args.dry_run {
        let targets = plan.targets(today)?;
        println!(
            "dry-run: would harvest {} dates for {} into {}",
            targets.len(),
            plan.route,
            store_path.display()
        );
        for target in &targets {
            println!("  {}  {}", target.flight_date, target.url);
        }
        return Ok(());
    }

    let session = SessionConfig::from_app_config(config);
    if session.cookie.is_none() {
        tracing::warn!("no session cookie configured; the provider is more likely to serve a challenge page");
    } else if session.cookie_is_stale(today) {
        tracing::warn!(
            age_days = session.cookie_age_days(today),
            max_age_days = session.cookie_max_age_days,
            "session cookie is older than its maximum age; capture a fresh one from a browser"
        );
    }
    let client = KayakClient::new(&session, config.request_timeout_secs)
        .context("failed to build HTTP client")?;

    let mut harvester = Harvester::new(
        client,
        TableStore::new(store_path),
        ConsolePrompt::stdio(),
        DiagnosticFile::new(config.diagnostic_path.clone()),
        || Local::now().naive_local(),
        Pacing::new(config.inter_request_delay_ms),
    );
    let report = harvester.run(&plan).await?;

    let ending = match report.state {
        HarvestState::Aborted { flight_date } => format!("stopped at {flight_date}"),
        HarvestState::Completed | HarvestState::Running(_) => "complete".to_owned(),
    };
    println!(
        "harvest {ending}: {} dates recorded, {} skipped, {} offer rows, {} placeholder rows, {} pages fetched",
        report.dates_recorded,
        report.dates_skipped,
        report.offer_rows,
        report.placeholder_rows,
        report.pages_fetched
    );
    Ok(())
}

fn run_summary(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("no store at {}", path.display());
        return Ok(());
    }
    let rows = TableStore::new(path)
        .load()
        .with_context(|| format!("failed to read {}", path.display()))?;
    print!("{}", render_summary(path, &DatasetSummary::from_rows(&rows)));
    Ok(())
}

fn render_summary(path: &Path, summary: &DatasetSummary) -> String {
    let mut out = format!(
        "{}: {} rows ({} offers, {} EmptyContent, {} Blocked, {} ExtractionError)\n",
        path.display(),
        summary.total_rows,
        summary.offer_rows,
        summary.empty_content_rows,
        summary.blocked_rows,
        summary.extraction_error_rows,
    );
    for (route, coverage) in &summary.routes {
        let span = match (
            coverage.dates_with_offers.first(),
            coverage.dates_with_offers.last(),
        ) {
            (Some(first), Some(last)) => format!(" ({first} to {last})"),
            _ => String::new(),
        };
        out.push_str(&format!(
            "  {route}: {} dates with offers{span}, {} dates without offers\n",
            coverage.dates_with_offers.len(),
            coverage.dates_without_offers.len(),
        ));
        for date in &coverage.dates_without_offers {
            out.push_str(&format!("    missing {date}\n"));
        }
    }
    out
}
