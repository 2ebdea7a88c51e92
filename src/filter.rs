// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Closed filter variants per reporting period and the record selection built on them
// role: filtering/engine
// inputs: TimeEntry slice, PeriodFilter value, reference `now`
// outputs: Ordered subset of the input (references, never copies or reorders)
// invariants:
// - a record without a work date is never selected
// - Scope::All is a no-op on its axis; Scope::Only is exact, case-sensitive equality
// - identical inputs yield identical selections (no hidden state; `now` is explicit)
// errors: Selector parsing (FromStr) rejects unknown sentinels and out-of-range numbers
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::record::TimeEntry;
use crate::window::{self, DateWindow, WeekKey};

/// The four fixed reporting periods.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize, ValueEnum)]
pub enum PeriodKind {
  #[serde(rename = "weekly")]
  #[value(name = "weekly")]
  Weekly,
  #[serde(rename = "monthly")]
  #[value(name = "monthly")]
  Monthly,
  #[serde(rename = "overall")]
  #[value(name = "overall")]
  Overall,
  #[serde(rename = "90days")]
  #[value(name = "90days")]
  Rolling90,
}

impl PeriodKind {
  pub const ALL: [PeriodKind; 4] = [PeriodKind::Weekly, PeriodKind::Monthly, PeriodKind::Overall, PeriodKind::Rolling90];

  pub fn label(self) -> &'static str {
    match self {
      PeriodKind::Weekly => "weekly",
      PeriodKind::Monthly => "monthly",
      PeriodKind::Overall => "overall",
      PeriodKind::Rolling90 => "90days",
    }
  }
}

impl fmt::Display for PeriodKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// --- Selectors ---

/// Employee or team restriction: everything, or one exact value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Scope {
  #[default]
  All,
  Only(String),
}

impl Scope {
  pub fn only(value: &str) -> Self {
    Scope::Only(value.to_string())
  }

  /// A missing field never matches a narrowed scope.
  pub fn admits(&self, value: Option<&str>) -> bool {
    match self {
      Scope::All => true,
      Scope::Only(expected) => value == Some(expected.as_str()),
    }
  }
}

impl FromStr for Scope {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "all" | "" => Ok(Scope::All),
      other => Ok(Scope::Only(other.to_string())),
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeekSelector {
  #[default]
  Last,
  Current,
  All,
  Specific(WeekKey),
}

impl FromStr for WeekSelector {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "last" => Ok(WeekSelector::Last),
      "current" => Ok(WeekSelector::Current),
      "all" => Ok(WeekSelector::All),
      other => Ok(WeekSelector::Specific(other.parse()?)),
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthSelector {
  #[default]
  Last,
  Current,
  All,
  Specific(u32),
}

impl FromStr for MonthSelector {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "last" => Ok(MonthSelector::Last),
      "current" => Ok(MonthSelector::Current),
      "all" => Ok(MonthSelector::All),
      other => Ok(MonthSelector::Specific(parse_month(other)?)),
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YearSelector {
  #[default]
  Current,
  All,
  Specific(i32),
}

impl FromStr for YearSelector {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "current" => Ok(YearSelector::Current),
      "all" => Ok(YearSelector::All),
      other => Ok(YearSelector::Specific(parse_year(other)?)),
    }
  }
}

/// Overall-period year: no "current" sentinel there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalendarYear {
  #[default]
  All,
  Specific(i32),
}

impl FromStr for CalendarYear {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "all" => Ok(CalendarYear::All),
      other => Ok(CalendarYear::Specific(parse_year(other)?)),
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalendarMonth {
  #[default]
  All,
  Specific(u32),
}

impl FromStr for CalendarMonth {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim() {
      "all" => Ok(CalendarMonth::All),
      other => Ok(CalendarMonth::Specific(parse_month(other)?)),
    }
  }
}

fn parse_month(s: &str) -> Result<u32> {
  let m: u32 = s.parse().with_context(|| format!("invalid month '{s}', expected last|current|all|1-12"))?;
  if !(1..=12).contains(&m) {
    bail!("invalid month '{s}', expected 1-12");
  }
  Ok(m)
}

fn parse_year(s: &str) -> Result<i32> {
  s.parse().with_context(|| format!("invalid year '{s}'"))
}

// --- Per-period filters ---

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklyFilter {
  pub employee: Scope,
  pub team: Scope,
  pub week: WeekSelector,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MonthlyFilter {
  pub employee: Scope,
  pub team: Scope,
  pub month: MonthSelector,
  pub year: YearSelector,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverallFilter {
  pub employee: Scope,
  pub team: Scope,
  pub year: CalendarYear,
  pub month: CalendarMonth,
  pub date_from: Option<NaiveDate>,
  pub date_to: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RollingFilter {
  pub employee: Scope,
  pub team: Scope,
  pub date_from: Option<NaiveDate>,
  pub date_to: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeriodFilter {
  Weekly(WeeklyFilter),
  Monthly(MonthlyFilter),
  Overall(OverallFilter),
  Rolling90(RollingFilter),
}

/// Date-side membership test resolved once against a fixed `now`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Membership {
  Any,
  Nothing,
  /// Record day (time normalized away) inside the window.
  Days(DateWindow),
  /// Raw record instant inside the window.
  Instants(DateWindow),
  Week(WeekKey),
  Month { year: i32, month: u32 },
  Calendar {
    year: Option<i32>,
    month: Option<u32>,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
  },
}

impl Membership {
  pub fn admits(&self, at: NaiveDateTime) -> bool {
    match self {
      Membership::Any => true,
      Membership::Nothing => false,
      Membership::Days(w) => w.contains_day(at),
      Membership::Instants(w) => w.contains(at),
      Membership::Week(key) => WeekKey::of(at.date()) == *key,
      Membership::Month { year, month } => at.year() == *year && at.month() == *month,
      Membership::Calendar { year, month, from, to } => {
        year.map_or(true, |y| at.year() == y)
          && month.map_or(true, |m| at.month() == m)
          && from.map_or(true, |f| at >= f)
          && to.map_or(true, |t| at <= t)
      }
    }
  }
}

impl WeeklyFilter {
  pub fn membership(&self, now: NaiveDateTime) -> Membership {
    match self.week {
      WeekSelector::Last => Membership::Days(window::last_week(now)),
      WeekSelector::Current => Membership::Days(window::current_week(now)),
      WeekSelector::All => Membership::Any,
      WeekSelector::Specific(key) => Membership::Week(key),
    }
  }
}

impl MonthlyFilter {
  fn restricted_year(&self) -> Option<i32> {
    match self.year {
      YearSelector::Specific(y) => Some(y),
      YearSelector::Current | YearSelector::All => None,
    }
  }

  /// Month the selector points at; None for `All`.
  pub fn target_month(&self, now: NaiveDateTime) -> Option<(i32, u32)> {
    match self.month {
      MonthSelector::Last => Some(window::last_month(now)),
      MonthSelector::Current => Some(window::current_month(now)),
      MonthSelector::Specific(m) => Some((self.restricted_year().unwrap_or(now.year()), m)),
      MonthSelector::All => None,
    }
  }

  pub fn membership(&self, now: NaiveDateTime) -> Membership {
    let restricted = self.restricted_year();
    match (self.target_month(now), restricted) {
      (Some((y, _)), Some(r)) if y != r => Membership::Nothing,
      (Some((year, month)), _) => Membership::Month { year, month },
      (None, Some(r)) => Membership::Calendar { year: Some(r), month: None, from: None, to: None },
      (None, None) => Membership::Any,
    }
  }

  /// Range used for revenue and cost sums; mirrors the record membership.
  pub fn financial_window(&self, now: NaiveDateTime) -> DateWindow {
    let resolved = match self.membership(now) {
      Membership::Month { year, month } => window::month_window(year, month),
      Membership::Calendar { year: Some(year), .. } => window::year_window(year),
      Membership::Nothing => self
        .target_month(now)
        .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        .map(DateWindow::empty_at),
      _ => None,
    };
    resolved.unwrap_or_else(DateWindow::unbounded)
  }

}

impl OverallFilter {
  pub fn membership(&self) -> Membership {
    Membership::Calendar {
      year: match self.year {
        CalendarYear::All => None,
        CalendarYear::Specific(y) => Some(y),
      },
      month: match self.month {
        CalendarMonth::All => None,
        CalendarMonth::Specific(m) => Some(m),
      },
      from: self.date_from.map(window::start_of_day),
      to: self.date_to.map(window::end_of_day),
    }
  }

  /// Date bounds narrowed by the selected year (and month, when a year is set).
  pub fn financial_window(&self) -> DateWindow {
    let bounds = DateWindow::new(
      self.date_from.map(window::start_of_day).unwrap_or(NaiveDateTime::MIN),
      self.date_to.map(window::end_of_day).unwrap_or(NaiveDateTime::MAX),
    );
    let calendar = match (self.year, self.month) {
      (CalendarYear::Specific(y), CalendarMonth::Specific(m)) => window::month_window(y, m),
      (CalendarYear::Specific(y), CalendarMonth::All) => window::year_window(y),
      (CalendarYear::All, _) => None,
    };
    match calendar {
      Some(cal) => bounds.intersect(&cal).unwrap_or_else(|| DateWindow::empty_at(cal.start.date())),
      None => bounds,
    }
  }
}

impl RollingFilter {
  /// The explicit range, only when both bounds are given.
  pub fn override_range(&self) -> Option<DateWindow> {
    match (self.date_from, self.date_to) {
      (Some(from), Some(to)) => Some(window::explicit_range(from, to)),
      _ => None,
    }
  }

  pub fn membership(&self, now: NaiveDateTime) -> Membership {
    match self.override_range() {
      Some(range) => Membership::Instants(range),
      None => Membership::Days(window::rolling_90(now)),
    }
  }

  /// An explicit range replaces the rolling bound; it is not intersected with it.
  pub fn financial_window(&self, now: NaiveDateTime) -> DateWindow {
    self.override_range().unwrap_or_else(|| window::rolling_90(now))
  }
}

impl PeriodFilter {
  pub fn kind(&self) -> PeriodKind {
    match self {
      PeriodFilter::Weekly(_) => PeriodKind::Weekly,
      PeriodFilter::Monthly(_) => PeriodKind::Monthly,
      PeriodFilter::Overall(_) => PeriodKind::Overall,
      PeriodFilter::Rolling90(_) => PeriodKind::Rolling90,
    }
  }

  /// Reset values: everyone, every team, and the period's default window.
  pub fn default_for(kind: PeriodKind) -> Self {
    match kind {
      PeriodKind::Weekly => PeriodFilter::Weekly(WeeklyFilter::default()),
      PeriodKind::Monthly => PeriodFilter::Monthly(MonthlyFilter::default()),
      PeriodKind::Overall => PeriodFilter::Overall(OverallFilter::default()),
      PeriodKind::Rolling90 => PeriodFilter::Rolling90(RollingFilter::default()),
    }
  }

  pub fn baseline(&self) -> Self {
    Self::default_for(self.kind())
  }

  pub fn employee(&self) -> &Scope {
    match self {
      PeriodFilter::Weekly(f) => &f.employee,
      PeriodFilter::Monthly(f) => &f.employee,
      PeriodFilter::Overall(f) => &f.employee,
      PeriodFilter::Rolling90(f) => &f.employee,
    }
  }

  pub fn team(&self) -> &Scope {
    match self {
      PeriodFilter::Weekly(f) => &f.team,
      PeriodFilter::Monthly(f) => &f.team,
      PeriodFilter::Overall(f) => &f.team,
      PeriodFilter::Rolling90(f) => &f.team,
    }
  }

  pub fn membership(&self, now: NaiveDateTime) -> Membership {
    match self {
      PeriodFilter::Weekly(f) => f.membership(now),
      PeriodFilter::Monthly(f) => f.membership(now),
      PeriodFilter::Overall(f) => f.membership(),
      PeriodFilter::Rolling90(f) => f.membership(now),
    }
  }
}

/// One active filter per period, as the caller holds them between requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodFilters {
  pub weekly: WeeklyFilter,
  pub monthly: MonthlyFilter,
  pub overall: OverallFilter,
  pub rolling90: RollingFilter,
}

impl PeriodFilters {
  pub fn get(&self, kind: PeriodKind) -> PeriodFilter {
    match kind {
      PeriodKind::Weekly => PeriodFilter::Weekly(self.weekly.clone()),
      PeriodKind::Monthly => PeriodFilter::Monthly(self.monthly.clone()),
      PeriodKind::Overall => PeriodFilter::Overall(self.overall.clone()),
      PeriodKind::Rolling90 => PeriodFilter::Rolling90(self.rolling90.clone()),
    }
  }
}

/// Keep the records in the period whose employee and team pass the filter.
pub fn select<'a>(records: &'a [TimeEntry], filter: &PeriodFilter, now: NaiveDateTime) -> Vec<&'a TimeEntry> {
  let membership = filter.membership(now);
  let employee = filter.employee();
  let team = filter.team();

  records
    .iter()
    .filter(|r| match r.work_date {
      Some(at) => membership.admits(at),
      None => false,
    })
    .filter(|r| employee.admits(r.employee.as_deref()))
    .filter(|r| team.admits(r.team.as_deref()))
    .collect()
}
