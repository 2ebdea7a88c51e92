use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::filter::{
  CalendarMonth, CalendarYear, MonthSelector, PeriodFilters, PeriodKind, Scope, WeekSelector, YearSelector,
};
use crate::ingest::SnapshotPaths;
use crate::params::build_period_filters;
use crate::util;

/// Which reporting period(s) to compute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PeriodChoice {
  #[value(name = "weekly")]
  Weekly,
  #[value(name = "monthly")]
  Monthly,
  #[value(name = "overall")]
  Overall,
  #[value(name = "90days")]
  Rolling90,
  #[value(name = "all")]
  All,
}

impl PeriodChoice {
  pub fn single(self) -> Option<PeriodKind> {
    match self {
      PeriodChoice::Weekly => Some(PeriodKind::Weekly),
      PeriodChoice::Monthly => Some(PeriodKind::Monthly),
      PeriodChoice::Overall => Some(PeriodKind::Overall),
      PeriodChoice::Rolling90 => Some(PeriodKind::Rolling90),
      PeriodChoice::All => None,
    }
  }

  fn covers(self, kind: PeriodKind) -> bool {
    self.single().map_or(true, |k| k == kind)
  }
}

#[derive(Parser, Debug)]
#[command(
    name = "workforce-metrics",
    version,
    about = "Utilization, capacity, EBR and gross-margin reports from time-tracking exports",
    long_about = None
)]
pub struct Cli {
  /// Time entries table export (JSON); required unless --gen-man
  #[arg(long)]
  pub time_entries: Option<PathBuf>,

  /// Revenue table export (JSON)
  #[arg(long)]
  pub revenue: Option<PathBuf>,

  /// Job-costing table export (JSON); unreadable files are skipped with a warning
  #[arg(long)]
  pub costs: Option<PathBuf>,

  /// Reporting period to compute
  #[arg(long, value_enum, default_value_t = PeriodChoice::All)]
  pub period: PeriodChoice,

  /// Exact employee name, or "all"
  #[arg(long, default_value = "all")]
  pub employee: Scope,

  /// Exact team (workspace) name, or "all"
  #[arg(long, default_value = "all")]
  pub team: Scope,

  /// Weekly period: last | current | all | YYYY-Www
  #[arg(long, default_value = "last")]
  pub week: WeekSelector,

  /// Monthly period: last | current | all | 1-12
  #[arg(long, default_value = "last")]
  pub month: MonthSelector,

  /// Monthly period year: current | all | YYYY
  #[arg(long, default_value = "current")]
  pub year: YearSelector,

  /// Overall period year: all | YYYY
  #[arg(long, default_value = "all")]
  pub overall_year: CalendarYear,

  /// Overall period month: all | 1-12
  #[arg(long, default_value = "all")]
  pub overall_month: CalendarMonth,

  /// Lower date bound (YYYY-MM-DD) for the overall and 90-day periods
  #[arg(long)]
  pub date_from: Option<NaiveDate>,

  /// Upper date bound (YYYY-MM-DD) for the overall and 90-day periods
  #[arg(long)]
  pub date_to: Option<NaiveDate>,

  /// Include revenue, direct costs, EBR and gross margin in the overall period
  #[arg(long)]
  pub overall_financials: bool,

  /// Print the employees, teams, years, months and weeks present in the time entries, then exit
  #[arg(long)]
  pub list_options: bool,

  /// Output location:
  /// - single period: file path (default stdout "-")
  /// - `--period all`: base directory (default: auto-named temp dir)
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Log filter used when RUST_LOG is unset (e.g. info, debug)
  #[arg(long, default_value = "warn")]
  pub log_level: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub sources: SnapshotPaths, // absolute paths for stability
  pub period: PeriodChoice,
  pub filters: PeriodFilters,
  pub overall_financials: bool,
  pub list_options: bool,
  pub out: String,
  pub now_override: Option<String>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(time_entries) = cli.time_entries.as_deref() else {
    bail!("Provide --time-entries <FILE>")
  };

  if let (Some(from), Some(to)) = (cli.date_from, cli.date_to) {
    if from > to {
      bail!("--date-from {from} is after --date-to {to}");
    }
  }

  // Selector flags must belong to a period being computed
  let p = cli.period;
  if cli.week != WeekSelector::default() && !p.covers(PeriodKind::Weekly) {
    bail!("--week only applies to --period weekly or all");
  }
  if (cli.month != MonthSelector::default() || cli.year != YearSelector::default()) && !p.covers(PeriodKind::Monthly) {
    bail!("--month/--year only apply to --period monthly or all");
  }
  let overall_only =
    cli.overall_year != CalendarYear::default() || cli.overall_month != CalendarMonth::default() || cli.overall_financials;
  if overall_only && !p.covers(PeriodKind::Overall) {
    bail!("--overall-year/--overall-month/--overall-financials only apply to --period overall or all");
  }
  let has_range = cli.date_from.is_some() || cli.date_to.is_some();
  if has_range && !(p.covers(PeriodKind::Overall) || p.covers(PeriodKind::Rolling90)) {
    bail!("--date-from/--date-to only apply to --period overall, 90days or all");
  }

  let sources = SnapshotPaths {
    time_entries: util::canonicalize_lossy(time_entries),
    revenue: cli.revenue.as_deref().map(util::canonicalize_lossy),
    costs: cli.costs.as_deref().map(util::canonicalize_lossy),
  };

  Ok(EffectiveConfig {
    sources,
    period: cli.period,
    filters: build_period_filters(&cli),
    overall_financials: cli.overall_financials,
    list_options: cli.list_options,
    out: cli.out,
    now_override: cli.now_override.clone(),
  })
}
