// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Reduce a selected record set into utilization/capacity metrics and, optionally, revenue/cost financials
// role: metrics/aggregator
// inputs: Iterator of &TimeEntry; optional DateWindow with revenue and cost slices
// outputs: PeriodMetrics (fresh value per call)
// invariants:
// - utilization in [0,1]; capacity >= 0; both are 0 when billable hours are 0
// - every ratio guards its denominator (floored to 1 or returns 0); no NaN/inf leaks out
// - change-order costs never count toward direct costs
// - undated records still count hours but contribute no week key
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{EmployeeMetrics, Financials, PeriodMetrics};
use crate::record::{CostEntry, RevenueEntry, TimeEntry};
use crate::window::{DateWindow, WeekKey};

/// Hours in the assumed standard work week.
pub const STANDARD_WEEK_HOURS: f64 = 40.0;

pub fn utilization(billable: f64, non_billable: f64) -> f64 {
  let total = billable + non_billable;
  if total > 0.0 { billable / total } else { 0.0 }
}

/// Billable hours against 40h per active week; weeks floored to 1.
pub fn capacity(billable: f64, active_weeks: usize) -> f64 {
  billable / (STANDARD_WEEK_HOURS * active_weeks.max(1) as f64)
}

pub fn ebr(total_revenue: f64, billable_hours: f64) -> f64 {
  if billable_hours > 0.0 { total_revenue / billable_hours } else { 0.0 }
}

pub fn gross_margin_percent(total_revenue: f64, direct_costs: f64) -> f64 {
  if total_revenue > 0.0 {
    (total_revenue - direct_costs) / total_revenue * 100.0
  } else {
    0.0
  }
}

pub fn aggregate<'a, I>(records: I) -> PeriodMetrics
where
  I: IntoIterator<Item = &'a TimeEntry>,
{
  let mut employees: BTreeMap<String, EmployeeMetrics> = BTreeMap::new();
  let mut all_weeks: BTreeSet<WeekKey> = BTreeSet::new();
  let mut total_billable = 0.0;
  let mut total_non_billable = 0.0;

  for r in records {
    let slot = employees.entry(r.employee_or_unknown().to_string()).or_default();
    slot.billable += r.billable_hours;
    slot.non_billable += r.non_billable_hours;
    if let Some(at) = r.work_date {
      let key = WeekKey::of(at.date());
      slot.distinct_weeks.insert(key);
      all_weeks.insert(key);
    }
    total_billable += r.billable_hours;
    total_non_billable += r.non_billable_hours;
  }

  for m in employees.values_mut() {
    m.utilization = utilization(m.billable, m.non_billable);
    m.capacity = capacity(m.billable, m.distinct_weeks.len());
  }

  let employee_count = employees.len();
  let capacity_denominator = STANDARD_WEEK_HOURS * all_weeks.len().max(1) as f64 * employee_count.max(1) as f64;

  PeriodMetrics {
    total_billable,
    total_non_billable,
    total_hours: total_billable + total_non_billable,
    avg_utilization: utilization(total_billable, total_non_billable),
    avg_capacity: total_billable / capacity_denominator,
    distinct_weeks: all_weeks.len(),
    employee_count,
    employees,
    financials: None,
  }
}

/// Revenue dated inside the window (day granularity); undated rows are skipped.
pub fn revenue_in(window: &DateWindow, revenue: &[RevenueEntry]) -> f64 {
  revenue
    .iter()
    .filter(|e| e.date.is_some_and(|d| window.contains_day(d)))
    .map(|e| e.amount)
    .sum()
}

/// Non-change-order costs dated inside the window.
pub fn direct_costs_in(window: &DateWindow, costs: &[CostEntry]) -> f64 {
  costs
    .iter()
    .filter(|e| !e.is_change_order)
    .filter(|e| e.date.is_some_and(|d| window.contains_day(d)))
    .map(|e| e.amount)
    .sum()
}

pub fn financials(total_billable: f64, window: &DateWindow, revenue: &[RevenueEntry], costs: &[CostEntry]) -> Financials {
  let total_revenue = revenue_in(window, revenue);
  let direct_costs = direct_costs_in(window, costs);
  Financials {
    total_revenue,
    direct_costs,
    ebr: ebr(total_revenue, total_billable),
    gross_margin_percent: gross_margin_percent(total_revenue, direct_costs),
  }
}

pub fn aggregate_with_financials<'a, I>(
  records: I,
  window: &DateWindow,
  revenue: &[RevenueEntry],
  costs: &[CostEntry],
) -> PeriodMetrics
where
  I: IntoIterator<Item = &'a TimeEntry>,
{
  let mut metrics = aggregate(records);
  metrics.financials = Some(financials(metrics.total_billable, window, revenue, costs));
  metrics
}
