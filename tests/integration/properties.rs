use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use workforce_metrics::filter::{
  self, MonthSelector, MonthlyFilter, PeriodFilter, PeriodKind, Scope, WeeklyFilter, YearSelector,
};
use workforce_metrics::metrics;
use workforce_metrics::record::{CostEntry, TimeEntry};
use workforce_metrics::window::DateWindow;

const NAMES: [&str; 3] = ["Ana", "Ben", "Cara"];
const TEAMS: [&str; 2] = ["Build", "Design"];

fn now() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2024, 4, 10).unwrap().and_hms_opt(9, 30, 0).unwrap()
}

fn base() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

prop_compose! {
  fn entry()(
    emp in proptest::option::weighted(0.9, 0..NAMES.len()),
    team in proptest::option::weighted(0.9, 0..TEAMS.len()),
    minutes in proptest::option::weighted(0.9, 0i64..(2 * 366 * 24 * 60)),
    billable in 0.0f64..12.0,
    non_billable in 0.0f64..12.0,
  ) -> TimeEntry {
    TimeEntry::new(
      emp.map(|i| NAMES[i]),
      team.map(|i| TEAMS[i]),
      minutes.map(|m| base() + Duration::minutes(m)),
      billable,
      non_billable,
    )
  }
}

fn entries() -> impl Strategy<Value = Vec<TimeEntry>> {
  proptest::collection::vec(entry(), 0..60)
}

proptest! {
  #[test]
  fn ratios_stay_in_range(records in entries()) {
    let m = metrics::aggregate(&records);
    prop_assert!((0.0..=1.0).contains(&m.avg_utilization));
    prop_assert!(m.avg_capacity >= 0.0);
    for e in m.employees.values() {
      prop_assert!((0.0..=1.0).contains(&e.utilization));
      prop_assert!(e.capacity >= 0.0);
      if e.billable == 0.0 {
        prop_assert_eq!(e.utilization, 0.0);
        prop_assert_eq!(e.capacity, 0.0);
      }
    }
  }

  #[test]
  fn employee_all_is_a_superset(records in entries(), who in 0..NAMES.len()) {
    for kind in PeriodKind::ALL {
      let broad = filter::select(&records, &PeriodFilter::default_for(kind), now());
      let narrow_filter = match PeriodFilter::default_for(kind) {
        PeriodFilter::Weekly(f) => PeriodFilter::Weekly(WeeklyFilter { employee: Scope::only(NAMES[who]), ..f }),
        PeriodFilter::Monthly(f) => PeriodFilter::Monthly(MonthlyFilter { employee: Scope::only(NAMES[who]), ..f }),
        PeriodFilter::Overall(mut f) => { f.employee = Scope::only(NAMES[who]); PeriodFilter::Overall(f) }
        PeriodFilter::Rolling90(mut f) => { f.employee = Scope::only(NAMES[who]); PeriodFilter::Rolling90(f) }
      };
      let narrow = filter::select(&records, &narrow_filter, now());
      prop_assert!(narrow.iter().all(|r| broad.iter().any(|b| std::ptr::eq(*b, *r))));
    }
  }

  #[test]
  fn selection_preserves_order_and_is_repeatable(records in entries()) {
    let f = PeriodFilter::default_for(PeriodKind::Overall);
    let first = filter::select(&records, &f, now());
    let second = filter::select(&records, &f, now());
    prop_assert_eq!(&first, &second);
    let positions: Vec<usize> = first
      .iter()
      .map(|r| records.iter().position(|x| std::ptr::eq(x, *r)).unwrap())
      .collect();
    prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    prop_assert_eq!(metrics::aggregate(first.iter().copied()), metrics::aggregate(second.iter().copied()));
  }

  #[test]
  fn specific_months_partition_a_year(records in entries(), year in 2023i32..=2024) {
    let monthly = |month| PeriodFilter::Monthly(MonthlyFilter {
      month,
      year: YearSelector::Specific(year),
      ..Default::default()
    });
    let whole = filter::select(&records, &monthly(MonthSelector::All), now());
    let mut covered = 0;
    for m in 1..=12 {
      let part = filter::select(&records, &monthly(MonthSelector::Specific(m)), now());
      prop_assert!(part.iter().all(|r| whole.iter().any(|w| std::ptr::eq(*w, *r))));
      covered += part.len();
    }
    prop_assert_eq!(covered, whole.len());
  }

  #[test]
  fn change_orders_never_move_direct_costs(
    amounts in proptest::collection::vec((0.0f64..5_000.0, any::<bool>()), 0..20),
  ) {
    let window = DateWindow::days(
      NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );
    let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(12, 0, 0);
    let costs: Vec<CostEntry> = amounts
      .iter()
      .map(|(amount, co)| CostEntry { date, amount: *amount, is_change_order: *co })
      .collect();
    let without: Vec<CostEntry> = costs.iter().filter(|c| !c.is_change_order).cloned().collect();
    prop_assert_eq!(metrics::direct_costs_in(&window, &costs), metrics::direct_costs_in(&window, &without));
  }
}
