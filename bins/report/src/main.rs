//! Fluxo report harness
//!
//! Loads a spreadsheet export or a JSON document dump, runs it through the live engine and prints
//! render-ready JSON.

mod cli;
mod source;

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use chrono::Local;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fluxo_core::aggregate::Aggregator;
use fluxo_core::calendar::CalendarService;
use fluxo_core::dashboard::{DashboardService, DashboardView};
use fluxo_core::feed::{AccessGrant, LiveView, Scope, ViewOutput};
use fluxo_core::goals::Goals;
use fluxo_core::recurring::{RecurringService, RecurringTemplate};
use fluxo_core::sheet::SheetService;
use fluxo_core::transaction::{Transaction, from_json_documents};
use fluxo_core::view::ViewConfig;
use fluxo_shared::AppConfig;
use fluxo_shared::types::{GroupId, UserId};

use crate::cli::{Cli, Command, SummaryArgs};
use crate::source::LoadedSource;

const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct SummaryReport<'a> {
    output: &'a ViewOutput,
    dashboard: DashboardView,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr, reports to stdout
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "fluxo=debug".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    match cli.command {
        Command::Summary(args) => summary(&config, &args).await?,
        Command::Calendar { input, month } => {
            let transactions = load_transactions(&input)?;
            print_json(&CalendarService::month_view(&transactions, month))?;
        }
        Command::Day { input, date } => {
            let transactions = load_transactions(&input)?;
            print_json(&CalendarService::day_detail(&transactions, date))?;
        }
        Command::Expand { templates, start } => {
            let text = fs::read_to_string(&templates)
                .with_context(|| format!("failed to read {}", templates.display()))?;
            let templates: Vec<RecurringTemplate> =
                serde_json::from_str(&text).context("invalid recurring templates")?;
            let rows = RecurringService::expand(&templates, start);
            info!(templates = templates.len(), rows = rows.len(), "expanded templates");
            SheetService::export(io::stdout().lock(), &rows)?;
        }
        Command::Template => SheetService::export_template(io::stdout().lock())?,
    }

    Ok(())
}

async fn summary(config: &AppConfig, args: &SummaryArgs) -> anyhow::Result<()> {
    let transactions = load_transactions(&args.input)?;
    let goals = match &args.goals {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Goals::from_json(&text)?
        }
        None => Goals::new(),
    };
    let view = ViewConfig::for_months(args.from, args.to)?
        .with_status_mode(args.mode)
        .with_filters(args.filters())
        .with_sort(args.sort());

    let user = UserId::new(args.user.as_str());
    let scope = match &args.group {
        Some(group) => Scope::Group(GroupId::new(group.as_str())),
        None => Scope::Personal(user.clone()),
    };

    let source = Arc::new(LoadedSource::new(transactions, config.feed.channel_capacity));
    let live = LiveView::new(source, Aggregator::new(&config.engine), view);
    live.set_goals(goals);

    let mut outputs = live.subscribe_outputs();
    let generation = live.switch_scope(&AccessGrant::allow(user), scope)?;
    outputs.mark_unchanged();
    tokio::time::timeout(SNAPSHOT_TIMEOUT, outputs.changed())
        .await
        .context("timed out waiting for snapshot")??;

    let output = live.current();
    if let Some(err) = live.last_error() {
        bail!("snapshot failed: {err}");
    }
    if output.generation != generation {
        bail!("snapshot belongs to generation {}", output.generation);
    }

    info!(
        rows = output.rows.len(),
        skipped = output.aggregate.skipped_records,
        "summary ready"
    );
    print_json(&SummaryReport {
        output: &output,
        dashboard: DashboardService::build(&output.aggregate),
    })?;

    live.cancel();
    Ok(())
}

fn load_transactions(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        let text =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let transactions = from_json_documents(&text).context("invalid transaction documents")?;
        info!(path = %path.display(), loaded = transactions.len(), "loaded documents");
        return Ok(transactions);
    }

    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let import = SheetService::import(BufReader::new(file), Local::now().date_naive())?;
    info!(
        path = %path.display(),
        imported = import.transactions.len(),
        skipped = import.skipped_rows,
        "loaded spreadsheet"
    );
    Ok(import.transactions)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
