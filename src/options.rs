// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Discover the selectable filter values (employees, teams, years, months, weeks) present in a record set
// role: filtering/options
// inputs: TimeEntry slice
// outputs: FilterOptions with deterministic ordering
// invariants: employees/teams/months ascending; years/weeks descending (newest first); only dated records contribute dates
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Serialize;

use crate::record::TimeEntry;
use crate::window::WeekKey;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
  pub employees: Vec<String>,
  pub teams: Vec<String>,
  pub years: Vec<i32>,
  pub months: Vec<u32>,
  pub weeks: Vec<WeekKey>,
}

pub fn discover(records: &[TimeEntry]) -> FilterOptions {
  let mut employees = BTreeSet::new();
  let mut teams = BTreeSet::new();
  let mut years = BTreeSet::new();
  let mut months = BTreeSet::new();
  let mut weeks = BTreeSet::new();

  for r in records {
    if let Some(e) = &r.employee {
      employees.insert(e.clone());
    }
    if let Some(t) = &r.team {
      teams.insert(t.clone());
    }
    if let Some(at) = r.work_date {
      years.insert(at.year());
      months.insert(at.month());
      weeks.insert(WeekKey::of(at.date()));
    }
  }

  FilterOptions {
    employees: employees.into_iter().collect(),
    teams: teams.into_iter().collect(),
    years: years.into_iter().rev().collect(),
    months: months.into_iter().collect(),
    weeks: weeks.into_iter().rev().collect(),
  }
}
