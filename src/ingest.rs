// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decode exported tables (time entries, revenue, job costing) into typed records with canonical fields
// role: ingest/decoder
// inputs: JSON table exports on disk ({"records": [...]} or a bare array; rows flat or under "fields")
// outputs: Snapshot plus per-table TableStats
// side_effects: Reads files; logs per-table stats and fail-open warnings
// invariants:
// - alternative field names are resolved here, once; records carry a single canonical value
// - a missing or unparseable number becomes 0 and is tallied, never fatal
// - an unparseable date becomes None (record stays, date-bounded sums skip it)
// errors: Unreadable/undecodable time-entry or revenue tables are errors; the cost table fails open
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ext::serde_json::JsonFetch;
use crate::record::{CostEntry, RevenueEntry, Snapshot, TimeEntry};
use crate::window;

/// Column names as they appear in the exports.
pub mod fields {
  pub const EMPLOYEE: &str = "Employee Name";
  pub const TEAM: &str = "Workspace Name";
  pub const WORK_DATE: &str = "Worklog Date";
  pub const BILLABLE: &str = "Billable Hours";
  pub const NON_BILLABLE: &str = "Non-Billable Hours";

  pub const REVENUE_DATE: &[&str] = &["Date", "Invoice Date", "Created"];
  pub const REVENUE_AMOUNT: &[&str] = &["Revenue", "Amount", "Total"];

  pub const COST_DATE: &[&str] = &["Date", "Cost Date"];
  pub const COST_AMOUNT: &[&str] = &["Direct Cost", "Labor Cost", "Cost"];
  pub const IS_CHANGE_ORDER: &str = "Is Change Order";
  pub const CHANGE_ORDER: &str = "Change Order";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
  MissingField,
  UnparseableValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
  pub rows: usize,
  pub missing_fields: usize,
  pub unparseable_values: usize,
}

impl TableStats {
  pub fn note(&mut self, issue: FieldIssue) {
    match issue {
      FieldIssue::MissingField => self.missing_fields += 1,
      FieldIssue::UnparseableValue => self.unparseable_values += 1,
    }
  }

  pub fn issues(&self) -> usize {
    self.missing_fields + self.unparseable_values
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
  pub time_entries: TableStats,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub revenue: Option<TableStats>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub costs: Option<TableStats>,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotPaths {
  pub time_entries: PathBuf,
  pub revenue: Option<PathBuf>,
  pub costs: Option<PathBuf>,
}

/// Parse a record date.
///
/// Accepts RFC 3339 (wall-clock time kept as written, offset dropped),
/// `YYYY-MM-DDTHH:MM:SS[.fff]` and plain `YYYY-MM-DD` (midnight).
pub fn parse_record_date(s: &str) -> Option<NaiveDateTime> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }
  if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(dt);
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(window::start_of_day)
}

/// Rows of a table export, accepting either `{"records": [...]}` or a bare array.
pub fn table_rows(doc: &Value) -> Result<&[Value]> {
  if let Some(rows) = doc.as_array() {
    return Ok(rows.as_slice());
  }
  match doc.get("records").and_then(Value::as_array) {
    Some(rows) => Ok(rows.as_slice()),
    None => bail!("expected a JSON array or an object with a \"records\" array"),
  }
}

/// Field object of a row: its `fields` member when present, else the row itself.
fn row_fields(row: &Value) -> &Value {
  match row.get("fields") {
    Some(f) if f.is_object() => f,
    _ => row,
  }
}

fn read_date(fields: &Value, keys: &[&str], stats: &mut TableStats) -> Option<NaiveDateTime> {
  let Some(raw) = fields.fetch_first(keys).value() else {
    stats.note(FieldIssue::MissingField);
    return None;
  };
  let parsed = raw.as_str().and_then(parse_record_date);
  if parsed.is_none() {
    stats.note(FieldIssue::UnparseableValue);
  }
  parsed
}

fn read_hours(fields: &Value, key: &str, stats: &mut TableStats) -> f64 {
  let fetched = fields.fetch(key);
  if !fetched.is_present() {
    stats.note(FieldIssue::MissingField);
    return 0.0;
  }
  match fetched.to_f64() {
    Some(h) if h >= 0.0 => h,
    _ => {
      stats.note(FieldIssue::UnparseableValue);
      0.0
    }
  }
}

fn read_amount(fields: &Value, keys: &[&str], stats: &mut TableStats) -> f64 {
  let fetched = fields.fetch_first(keys);
  if !fetched.is_present() {
    stats.note(FieldIssue::MissingField);
    return 0.0;
  }
  fetched.to_f64().unwrap_or_else(|| {
    stats.note(FieldIssue::UnparseableValue);
    0.0
  })
}

pub fn decode_time_entries(doc: &Value) -> Result<(Vec<TimeEntry>, TableStats)> {
  let rows = table_rows(doc)?;
  let mut stats = TableStats { rows: rows.len(), ..Default::default() };
  let entries = rows
    .iter()
    .map(|row| {
      let f = row_fields(row);
      TimeEntry {
        employee: f.fetch(fields::EMPLOYEE).to_text(),
        team: f.fetch(fields::TEAM).to_text(),
        work_date: read_date(f, &[fields::WORK_DATE], &mut stats),
        billable_hours: read_hours(f, fields::BILLABLE, &mut stats),
        non_billable_hours: read_hours(f, fields::NON_BILLABLE, &mut stats),
      }
    })
    .collect();
  Ok((entries, stats))
}

pub fn decode_revenue(doc: &Value) -> Result<(Vec<RevenueEntry>, TableStats)> {
  let rows = table_rows(doc)?;
  let mut stats = TableStats { rows: rows.len(), ..Default::default() };
  let entries = rows
    .iter()
    .map(|row| {
      let f = row_fields(row);
      RevenueEntry {
        date: read_date(f, fields::REVENUE_DATE, &mut stats),
        amount: read_amount(f, fields::REVENUE_AMOUNT, &mut stats),
      }
    })
    .collect();
  Ok((entries, stats))
}

pub fn decode_costs(doc: &Value) -> Result<(Vec<CostEntry>, TableStats)> {
  let rows = table_rows(doc)?;
  let mut stats = TableStats { rows: rows.len(), ..Default::default() };
  let entries = rows
    .iter()
    .map(|row| {
      let f = row_fields(row);
      CostEntry {
        date: read_date(f, fields::COST_DATE, &mut stats),
        amount: read_amount(f, fields::COST_AMOUNT, &mut stats),
        is_change_order: f.fetch(fields::IS_CHANGE_ORDER).is_truthy()
          || f.get(fields::CHANGE_ORDER) == Some(&Value::Bool(true)),
      }
    })
    .collect();
  Ok((entries, stats))
}

pub fn read_table(path: &Path) -> Result<Value> {
  let buf = std::fs::read(path).with_context(|| format!("reading table {}", path.display()))?;
  serde_json::from_slice(&buf).with_context(|| format!("decoding JSON in {}", path.display()))
}

fn log_stats(table: &str, stats: &TableStats) {
  debug!(
    table,
    rows = stats.rows,
    missing = stats.missing_fields,
    unparseable = stats.unparseable_values,
    "table decoded"
  );
  if stats.issues() > 0 {
    warn!(table, issues = stats.issues(), "fields coerced to zero or left undated");
  }
}

/// Load every table named in `paths`.
///
/// Time entries are required. Revenue is optional but must be readable when
/// given. Costs fail open: any read or decode error logs a warning and yields
/// an empty cost set.
pub fn load_snapshot(paths: &SnapshotPaths) -> Result<(Snapshot, SourceStats)> {
  let (time_entries, time_stats) = decode_time_entries(&read_table(&paths.time_entries)?)
    .with_context(|| format!("time entries in {}", paths.time_entries.display()))?;
  log_stats("time_entries", &time_stats);

  let (revenue, revenue_stats) = match &paths.revenue {
    Some(p) => {
      let (rows, stats) = decode_revenue(&read_table(p)?).with_context(|| format!("revenue in {}", p.display()))?;
      log_stats("revenue", &stats);
      (rows, Some(stats))
    }
    None => (Vec::new(), None),
  };

  let (costs, cost_stats) = match &paths.costs {
    Some(p) => match read_table(p).and_then(|doc| decode_costs(&doc)) {
      Ok((rows, stats)) => {
        log_stats("costs", &stats);
        (rows, Some(stats))
      }
      Err(e) => {
        warn!(path = %p.display(), error = %format!("{e:#}"), "cost table unavailable; continuing without costs");
        (Vec::new(), None)
      }
    },
    None => (Vec::new(), None),
  };

  let stats = SourceStats { time_entries: time_stats, revenue: revenue_stats, costs: cost_stats };
  Ok((Snapshot::new(time_entries, revenue, costs), stats))
}
