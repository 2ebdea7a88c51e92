use std::path::PathBuf;

use chrono::NaiveDateTime;
use workforce_metrics::filter::{
  MonthSelector, MonthlyFilter, OverallFilter, PeriodFilters, PeriodKind, RollingFilter, Scope, WeekSelector,
  WeeklyFilter,
};
use workforce_metrics::ingest::{SnapshotPaths, load_snapshot};
use workforce_metrics::record::Snapshot;
use workforce_metrics::report;
use test_support::{FIXTURE_NOW, fixtures_dir, init_tracing};

fn now() -> NaiveDateTime {
  NaiveDateTime::parse_from_str(FIXTURE_NOW, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn fixture(name: &str) -> PathBuf {
  fixtures_dir().join(name)
}

fn snapshot() -> Snapshot {
  init_tracing();
  let paths = SnapshotPaths {
    time_entries: fixture("time_entries.json"),
    revenue: Some(fixture("revenue.json")),
    costs: Some(fixture("costs.json")),
  };
  let (snap, stats) = load_snapshot(&paths).expect("fixtures load");
  assert_eq!(stats.time_entries.rows, 11);
  // recT06 lacks non-billable hours, recT08 its date; recT11 has "abc" hours
  assert_eq!(stats.time_entries.missing_fields, 2);
  assert_eq!(stats.time_entries.unparseable_values, 1);
  snap
}

#[test]
fn ingest_resolves_canonical_fields() {
  let snap = snapshot();
  assert_eq!(snap.time_entries.len(), 11);
  assert_eq!(snap.time_entries[5].billable_hours, 7.5);
  assert_eq!(snap.time_entries[6].employee_or_unknown(), "Unknown");
  assert!(snap.time_entries[7].work_date.is_none());

  let revenue: Vec<f64> = snap.revenue.iter().map(|r| r.amount).collect();
  assert_eq!(revenue, vec![6000.0, 4000.0, 2500.0, 9000.0, 1000.0]);
  let change_orders = snap.costs.iter().filter(|c| c.is_change_order).count();
  assert_eq!(change_orders, 2);
}

#[test]
fn specific_week_matches_by_key() {
  let snap = snapshot();
  let f = WeeklyFilter { week: "2024-W12".parse().unwrap(), ..Default::default() };
  let r = report::weekly_report(&snap, &f, now());
  assert_eq!(r.filtered_count, 2);
  assert_eq!(r.metrics.total_billable, 9.5);

  let all = WeeklyFilter { week: WeekSelector::All, ..Default::default() };
  assert_eq!(report::weekly_report(&snap, &all, now()).filtered_count, 10);
}

#[test]
fn monthly_team_filter_and_current_month() {
  let snap = snapshot();
  let f = MonthlyFilter { team: Scope::only("Build"), ..Default::default() };
  let r = report::monthly_report(&snap, &f, now());
  assert_eq!(r.filtered_count, 3);
  assert_eq!(r.baseline_count, 3);

  let current = MonthlyFilter { month: MonthSelector::Current, ..Default::default() };
  let r = report::monthly_report(&snap, &current, now());
  assert_eq!(r.filtered_count, 4);
  let fin = r.metrics.financials.unwrap();
  assert_eq!(fin.total_revenue, 2500.0);
  // 2024-04-05 is a change order; only the 04-03 cost counts
  assert_eq!(fin.direct_costs, 700.0);
}

#[test]
fn rolling_employee_scope_counts() {
  let snap = snapshot();
  let f = RollingFilter { employee: Scope::only("Ana"), ..Default::default() };
  let r = report::rolling90_report(&snap, &f, now());
  assert_eq!(r.filtered_count, 4);
  assert_eq!(r.baseline_count, 9);
  let ana = &r.metrics.employees["Ana"];
  assert_eq!(ana.billable, 26.0);
  assert_eq!(ana.distinct_weeks.len(), 3);
}

#[test]
fn overall_month_without_year_spans_years() {
  let snap = snapshot();
  let f = OverallFilter { month: "12".parse().unwrap(), ..Default::default() };
  let r = report::overall_report(&snap, &f, now(), true);
  assert_eq!(r.filtered_count, 1);
  // month without a year does not narrow the financial window
  assert_eq!(r.metrics.financials.unwrap().total_revenue, 21_500.0);
}

#[test]
fn all_reports_match_individual_calls() {
  let snap = snapshot();
  let filters = PeriodFilters::default();
  let all = report::all_reports(&snap, &filters, now(), false);
  for r in &all {
    let single = report::period_report(&snap, &filters.get(r.period), now(), false);
    assert_eq!(*r, single);
  }
  assert_eq!(all.iter().find(|r| r.period == PeriodKind::Overall).unwrap().filtered_count, 10);
}
