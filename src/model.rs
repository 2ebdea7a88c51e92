// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (per-employee metrics, period metrics, reports, ranges) emitted by the facade
// role: model/types
// outputs: Serializable structs with stable field names; financial fields present only when computed
// invariants: ordered maps/sets only, so the same inputs serialize byte-identically; numbers are plain (no formatting)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::filter::PeriodKind;
use crate::window::{self, DateWindow, WeekKey};

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct EmployeeMetrics {
  pub billable: f64,
  pub non_billable: f64,
  pub distinct_weeks: BTreeSet<WeekKey>,
  pub utilization: f64,
  pub capacity: f64,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Financials {
  pub total_revenue: f64,
  pub direct_costs: f64,
  pub ebr: f64,
  pub gross_margin_percent: f64,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct PeriodMetrics {
  pub total_billable: f64,
  pub total_non_billable: f64,
  pub total_hours: f64,
  pub avg_utilization: f64,
  pub avg_capacity: f64,
  pub distinct_weeks: usize,
  pub employee_count: usize,
  pub employees: BTreeMap<String, EmployeeMetrics>,
  #[serde(flatten, skip_serializing_if = "Option::is_none")]
  pub financials: Option<Financials>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RangeInfo {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end: Option<String>,
}

impl RangeInfo {
  /// Open ends of an unbounded window are left out rather than rendered as sentinel dates.
  pub fn from_window(label: &str, w: &DateWindow) -> Self {
    let start = (w.start != chrono::NaiveDateTime::MIN).then(|| window::iso_millis(w.start));
    let end = (w.end != chrono::NaiveDateTime::MAX).then(|| window::iso_millis(w.end));
    Self { label: label.to_string(), start, end }
  }
}

/// What the facade hands to callers for one period.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PeriodReport {
  pub period: PeriodKind,
  pub filtered_count: usize,
  pub baseline_count: usize,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub financial_window: Option<RangeInfo>,
  pub metrics: PeriodMetrics,
}
