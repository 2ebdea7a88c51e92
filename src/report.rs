// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reporting facade: one entry point per period kind (baseline count, narrowed selection, aggregation)
// role: reporting/facade
// inputs: Snapshot (time, revenue, cost), the period's filter value, reference `now`
// outputs: PeriodReport { period, filtered_count, baseline_count, financial_window?, metrics }
// invariants:
// - baseline_count always uses the period's default filter
// - monthly and rolling reports carry financials; overall only when asked
// - the four periods are independent and may run in parallel over the same snapshot
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::NaiveDateTime;
use rayon::prelude::*;
use tracing::info;

use crate::filter::{
  self, MonthlyFilter, OverallFilter, PeriodFilter, PeriodFilters, PeriodKind, RollingFilter, WeeklyFilter,
};
use crate::metrics;
use crate::model::{PeriodMetrics, PeriodReport, RangeInfo};
use crate::record::Snapshot;
use crate::window::DateWindow;

fn baseline_count(snapshot: &Snapshot, kind: PeriodKind, now: NaiveDateTime) -> usize {
  filter::select(&snapshot.time_entries, &PeriodFilter::default_for(kind), now).len()
}

fn build(
  snapshot: &Snapshot,
  filter: &PeriodFilter,
  now: NaiveDateTime,
  financial_window: Option<DateWindow>,
) -> PeriodReport {
  let kind = filter.kind();
  let selected = filter::select(&snapshot.time_entries, filter, now);
  let filtered_count = selected.len();
  let metrics = match &financial_window {
    Some(w) => metrics::aggregate_with_financials(selected, w, &snapshot.revenue, &snapshot.costs),
    None => metrics::aggregate(selected),
  };
  let report = PeriodReport {
    period: kind,
    filtered_count,
    baseline_count: baseline_count(snapshot, kind, now),
    financial_window: financial_window.map(|w| RangeInfo::from_window(kind.label(), &w)),
    metrics,
  };
  log_summary(&report);
  report
}

fn log_summary(report: &PeriodReport) {
  let PeriodMetrics { total_billable, avg_utilization, avg_capacity, .. } = &report.metrics;
  match &report.metrics.financials {
    Some(f) => info!(
      period = %report.period,
      shown = report.filtered_count,
      of = report.baseline_count,
      billable = total_billable,
      utilization = avg_utilization,
      capacity = avg_capacity,
      revenue = f.total_revenue,
      direct_costs = f.direct_costs,
      ebr = f.ebr,
      gross_margin = f.gross_margin_percent,
      "period computed"
    ),
    None => info!(
      period = %report.period,
      shown = report.filtered_count,
      of = report.baseline_count,
      billable = total_billable,
      utilization = avg_utilization,
      capacity = avg_capacity,
      "period computed"
    ),
  }
}

pub fn weekly_report(snapshot: &Snapshot, f: &WeeklyFilter, now: NaiveDateTime) -> PeriodReport {
  build(snapshot, &PeriodFilter::Weekly(f.clone()), now, None)
}

pub fn monthly_report(snapshot: &Snapshot, f: &MonthlyFilter, now: NaiveDateTime) -> PeriodReport {
  let window = f.financial_window(now);
  build(snapshot, &PeriodFilter::Monthly(f.clone()), now, Some(window))
}

/// Financials are opt-in for the overall period.
pub fn overall_report(snapshot: &Snapshot, f: &OverallFilter, now: NaiveDateTime, with_financials: bool) -> PeriodReport {
  let window = with_financials.then(|| f.financial_window());
  build(snapshot, &PeriodFilter::Overall(f.clone()), now, window)
}

pub fn rolling90_report(snapshot: &Snapshot, f: &RollingFilter, now: NaiveDateTime) -> PeriodReport {
  let window = f.financial_window(now);
  build(snapshot, &PeriodFilter::Rolling90(f.clone()), now, Some(window))
}

pub fn period_report(
  snapshot: &Snapshot,
  filter: &PeriodFilter,
  now: NaiveDateTime,
  overall_financials: bool,
) -> PeriodReport {
  match filter {
    PeriodFilter::Weekly(f) => weekly_report(snapshot, f, now),
    PeriodFilter::Monthly(f) => monthly_report(snapshot, f, now),
    PeriodFilter::Overall(f) => overall_report(snapshot, f, now, overall_financials),
    PeriodFilter::Rolling90(f) => rolling90_report(snapshot, f, now),
  }
}

/// All four periods, evaluated in parallel; output order is weekly, monthly, overall, 90days.
pub fn all_reports(
  snapshot: &Snapshot,
  filters: &PeriodFilters,
  now: NaiveDateTime,
  overall_financials: bool,
) -> Vec<PeriodReport> {
  PeriodKind::ALL
    .par_iter()
    .map(|kind| period_report(snapshot, &filters.get(*kind), now, overall_financials))
    .collect()
}
