//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use fluxo_core::period::YearMonth;
use fluxo_core::view::{SortColumn, SortDirection, SortSpec, StatusMode, TextFilters};

/// Fluxo report harness.
#[derive(Debug, Parser)]
#[command(name = "fluxo-report", version, about)]
pub struct Cli {
    /// Report to produce.
    #[command(subcommand)]
    pub command: Command,
}

/// Available reports.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// KPIs, period buckets, breakdowns and goals for a month range
    Summary(SummaryArgs),
    /// Month grid with per-day totals
    Calendar {
        /// Spreadsheet CSV export, or a JSON array of documents
        #[arg(long)]
        input: PathBuf,
        /// Month as YYYY-MM
        #[arg(long)]
        month: YearMonth,
    },
    /// Transactions and totals of one day
    Day {
        /// Spreadsheet CSV export, or a JSON array of documents
        #[arg(long)]
        input: PathBuf,
        /// Day as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
    /// Expand recurring templates into pending rows, printed as CSV
    Expand {
        /// JSON array of recurring templates
        #[arg(long)]
        templates: PathBuf,
        /// First occurrence as YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
    },
    /// Print an empty spreadsheet template
    Template,
}

/// Arguments of the `summary` report.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Spreadsheet CSV export, or a JSON array of documents
    #[arg(long)]
    pub input: PathBuf,
    /// JSON object mapping category to spending limit
    #[arg(long)]
    pub goals: Option<PathBuf>,
    /// First month as YYYY-MM
    #[arg(long)]
    pub from: YearMonth,
    /// Last month as YYYY-MM, defaults to `--from`
    #[arg(long)]
    pub to: Option<YearMonth>,
    /// `realized` or `all`
    #[arg(long, default_value = "realized")]
    pub mode: StatusMode,
    /// Day-of-month filter
    #[arg(long)]
    pub day: Option<String>,
    /// Description filter
    #[arg(long)]
    pub description: Option<String>,
    /// Category filter
    #[arg(long)]
    pub category: Option<String>,
    /// Responsibility filter
    #[arg(long)]
    pub responsibility: Option<String>,
    /// Sort column
    #[arg(long, default_value = "date")]
    pub sort: SortColumn,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Read a group scope instead of the personal one
    #[arg(long)]
    pub group: Option<String>,
    /// Signed-in user
    #[arg(long, default_value = "local")]
    pub user: String,
}

impl SummaryArgs {
    /// Text filters given on the command line.
    #[must_use]
    pub fn filters(&self) -> TextFilters {
        TextFilters {
            day: self.day.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            responsibility: self.responsibility.clone().unwrap_or_default(),
        }
    }

    /// Requested sort.
    #[must_use]
    pub const fn sort(&self) -> SortSpec {
        SortSpec {
            column: self.sort,
            direction: if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary() {
        let cli = Cli::try_parse_from([
            "fluxo-report",
            "summary",
            "--input",
            "data.csv",
            "--from",
            "2026-01",
            "--to",
            "2026-03",
            "--mode",
            "all",
            "--category",
            "food",
            "--sort",
            "value",
            "--desc",
        ])
        .unwrap();

        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.from, YearMonth::new(2026, 1).unwrap());
        assert_eq!(args.to, YearMonth::new(2026, 3));
        assert_eq!(args.mode, StatusMode::All);
        assert_eq!(args.filters().category, "food");
        assert!(args.filters().description.is_empty());
        assert_eq!(args.sort(), SortSpec::descending(SortColumn::Value));
        assert_eq!(args.user, "local");
    }

    #[test]
    fn test_rejects_bad_month() {
        assert!(
            Cli::try_parse_from(["fluxo-report", "calendar", "--input", "a.csv", "--month", "2026-13"])
                .is_err()
        );
    }
}
