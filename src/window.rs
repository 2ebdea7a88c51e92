// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Pure date-window arithmetic for weeks, months, years, rolling windows and explicit ranges
// role: windows/calculator
// inputs: A reference `now` (NaiveDateTime) or calendar coordinates
// outputs: Inclusive DateWindow pairs and WeekKey membership keys
// invariants:
// - weeks run Monday 00:00:00.000 through Sunday 23:59:59.999
// - every window end is 23:59:59.999 of its last day; every start is 00:00:00.000
// - WeekKey renders as `{calendar year}-W{iso week, 2 digits}`
// errors: Only WeekKey parsing fails; window helpers return Option for impossible calendar inputs
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

pub const ROLLING_WINDOW_DAYS: i64 = 90;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

static WEEK_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-W(\d{2})$").expect("week key pattern"));

/// Inclusive `[start, end]` instant range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateWindow {
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
}

impl DateWindow {
  pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
    Self { start, end }
  }

  /// Whole days from `first` 00:00:00.000 through `last` 23:59:59.999.
  pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
    Self::new(start_of_day(first), end_of_day(last))
  }

  pub fn unbounded() -> Self {
    Self::new(NaiveDateTime::MIN, NaiveDateTime::MAX)
  }

  /// A window that contains nothing, rendered as the instant just before `anchor`'s midnight.
  pub fn empty_at(anchor: NaiveDate) -> Self {
    let start = start_of_day(anchor);
    Self::new(start, start - Duration::milliseconds(1))
  }

  pub fn is_empty(&self) -> bool {
    self.start > self.end
  }

  pub fn is_unbounded(&self) -> bool {
    self.start == NaiveDateTime::MIN && self.end == NaiveDateTime::MAX
  }

  /// Raw instant comparison; time of day is significant.
  pub fn contains(&self, at: NaiveDateTime) -> bool {
    at >= self.start && at <= self.end
  }

  /// Day-granular comparison; the instant is normalized to its midnight first.
  pub fn contains_day(&self, at: NaiveDateTime) -> bool {
    self.contains(start_of_day(at.date()))
  }

  /// Overlap of two windows, or None when they are disjoint.
  pub fn intersect(&self, other: &DateWindow) -> Option<DateWindow> {
    let start = self.start.max(other.start);
    let end = self.end.min(other.end);
    if start > end { None } else { Some(DateWindow::new(start, end)) }
  }
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
  date.and_time(NaiveTime::MIN)
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
  start_of_day(date) + Duration::milliseconds(MILLIS_PER_DAY - 1)
}

/// Render with millisecond precision, e.g. `2024-01-11T00:00:00.000`.
pub fn iso_millis(dt: NaiveDateTime) -> String {
  dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

// --- Weeks ---

/// Composite week identifier matched by equality, never by date range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
  pub year: i32,
  pub week: u32,
}

impl WeekKey {
  pub fn new(year: i32, week: u32) -> Self {
    Self { year, week }
  }

  /// Calendar year of the date paired with its ISO week number.
  ///
  /// The year is deliberately not the ISO week-year: 2024-12-30 falls in ISO
  /// week 1 and keys as `2024-W01`.
  pub fn of(date: NaiveDate) -> Self {
    Self::new(date.year(), week_number(date))
  }
}

impl fmt::Display for WeekKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-W{:02}", self.year, self.week)
  }
}

impl FromStr for WeekKey {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    let caps = match WEEK_KEY_RE.captures(s.trim()) {
      Some(c) => c,
      None => bail!("invalid week key '{s}', expected YYYY-Www (e.g. 2024-W05)"),
    };
    let year: i32 = caps[1].parse().context("parsing year in week key")?;
    let week: u32 = caps[2].parse().context("parsing week in week key")?;

    if !(1..=53).contains(&week) {
      bail!("invalid week number in '{s}', expected 01-53");
    }
    Ok(Self::new(year, week))
  }
}

impl Serialize for WeekKey {
  fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// ISO week-of-year: the week holding the year's first Thursday is week 1.
pub fn week_number(date: NaiveDate) -> u32 {
  date.iso_week().week()
}

pub fn start_of_week(date: NaiveDate) -> NaiveDate {
  let weekday = date.weekday().num_days_from_monday() as i64;
  date - Duration::days(weekday)
}

/// Monday through Sunday of the week containing `date`.
pub fn week_window(date: NaiveDate) -> DateWindow {
  let monday = start_of_week(date);
  DateWindow::days(monday, monday + Duration::days(6))
}

pub fn current_week(now: NaiveDateTime) -> DateWindow {
  week_window(now.date())
}

pub fn last_week(now: NaiveDateTime) -> DateWindow {
  week_window(now.date() - Duration::days(7))
}

// --- Months and years ---

pub fn month_window(year: i32, month: u32) -> Option<DateWindow> {
  let first = NaiveDate::from_ymd_opt(year, month, 1)?;
  let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  let last = NaiveDate::from_ymd_opt(next_y, next_m, 1)?.pred_opt()?;
  Some(DateWindow::days(first, last))
}

pub fn year_window(year: i32) -> Option<DateWindow> {
  let first = NaiveDate::from_ymd_opt(year, 1, 1)?;
  let last = NaiveDate::from_ymd_opt(year, 12, 31)?;
  Some(DateWindow::days(first, last))
}

/// `(year, month)` of `now`.
pub fn current_month(now: NaiveDateTime) -> (i32, u32) {
  (now.year(), now.month())
}

/// Previous calendar month; January rolls back to December of the prior year.
pub fn last_month(now: NaiveDateTime) -> (i32, u32) {
  let (y, m) = current_month(now);
  if m == 1 { (y - 1, 12) } else { (y, m - 1) }
}

// --- Rolling and explicit ranges ---

/// `[now - days @ 00:00:00.000, now @ 23:59:59.999]`.
pub fn rolling_window(now: NaiveDateTime, days: i64) -> DateWindow {
  let today = now.date();
  DateWindow::days(today - Duration::days(days), today)
}

pub fn rolling_90(now: NaiveDateTime) -> DateWindow {
  rolling_window(now, ROLLING_WINDOW_DAYS)
}

/// User-supplied bounds: `from` at midnight through `to` at end of day.
pub fn explicit_range(from: NaiveDate, to: NaiveDate) -> DateWindow {
  DateWindow::days(from, to)
}
