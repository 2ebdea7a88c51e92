// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed records consumed by the engine (time entries, revenue, job costing) and the snapshot that holds them
// role: model/records
// outputs: Immutable record values with canonical fields already resolved at ingestion
// invariants:
// - hours and amounts are finite; hours are >= 0
// - a missing date is kept as None so filters can exclude it explicitly
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDateTime;

/// Bucket used when a time entry carries no employee name.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown";

/// One worklog row: who, which team, when, and how many hours of each kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
  pub employee: Option<String>,
  pub team: Option<String>,
  pub work_date: Option<NaiveDateTime>,
  pub billable_hours: f64,
  pub non_billable_hours: f64,
}

impl TimeEntry {
  pub fn new(
    employee: Option<&str>,
    team: Option<&str>,
    work_date: Option<NaiveDateTime>,
    billable_hours: f64,
    non_billable_hours: f64,
  ) -> Self {
    Self {
      employee: employee.map(str::to_string),
      team: team.map(str::to_string),
      work_date,
      billable_hours,
      non_billable_hours,
    }
  }

  /// Name used for per-employee grouping.
  pub fn employee_or_unknown(&self) -> &str {
    self.employee.as_deref().unwrap_or(UNKNOWN_EMPLOYEE)
  }

  pub fn total_hours(&self) -> f64 {
    self.billable_hours + self.non_billable_hours
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueEntry {
  pub date: Option<NaiveDateTime>,
  pub amount: f64,
}

/// Job-costing row. Change orders never count toward direct costs.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
  pub date: Option<NaiveDateTime>,
  pub amount: f64,
  pub is_change_order: bool,
}

/// Fully materialized record set for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
  pub time_entries: Vec<TimeEntry>,
  pub revenue: Vec<RevenueEntry>,
  pub costs: Vec<CostEntry>,
}

impl Snapshot {
  pub fn new(time_entries: Vec<TimeEntry>, revenue: Vec<RevenueEntry>, costs: Vec<CostEntry>) -> Self {
    Self { time_entries, revenue, costs }
  }
}
