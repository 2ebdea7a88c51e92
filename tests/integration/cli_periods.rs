use predicates::prelude::*;
use test_support::{BIN, FIXTURE_NOW, cmd_bin, fixture_arg, fixture_cmd, tempdir};

fn run_json(args: &[&str]) -> serde_json::Value {
  let out = fixture_cmd().args(args).output().unwrap();
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).expect("stdout is JSON")
}

#[test]
fn weekly_defaults_to_last_week() {
  let v = run_json(&["--period", "weekly"]);
  assert_eq!(v["period"], "weekly");
  assert_eq!(v["filtered_count"], 3);
  assert_eq!(v["baseline_count"], 3);
  let m = &v["metrics"];
  assert_eq!(m["total_billable"].as_f64(), Some(17.0));
  assert_eq!(m["avg_utilization"].as_f64(), Some(17.0 / 24.0));
  assert_eq!(m["avg_capacity"].as_f64(), Some(0.2125));
  assert_eq!(m["employees"]["Ana"]["capacity"].as_f64(), Some(0.325));
  assert_eq!(m["employees"]["Ana"]["distinct_weeks"], serde_json::json!(["2024-W14"]));
  assert!(m.get("total_revenue").is_none());
}

#[test]
fn weekly_narrowed_by_employee_keeps_baseline() {
  let v = run_json(&["--period", "weekly", "--employee", "Ben"]);
  assert_eq!(v["filtered_count"], 1);
  assert_eq!(v["baseline_count"], 3);
  assert_eq!(v["metrics"]["employee_count"], 1);
}

#[test]
fn monthly_last_month_with_financials() {
  let v = run_json(&["--period", "monthly"]);
  assert_eq!(v["filtered_count"], 3);
  let m = &v["metrics"];
  assert_eq!(m["total_billable"].as_f64(), Some(14.5));
  assert_eq!(m["total_revenue"].as_f64(), Some(10_000.0));
  assert_eq!(m["direct_costs"].as_f64(), Some(4_000.0));
  assert_eq!(m["gross_margin_percent"].as_f64(), Some(60.0));
  assert_eq!(m["ebr"].as_f64(), Some(10_000.0 / 14.5));
  assert_eq!(m["employees"]["Unknown"]["billable"].as_f64(), Some(2.0));
  assert_eq!(v["financial_window"]["start"], "2024-03-01T00:00:00.000");
  assert_eq!(v["financial_window"]["end"], "2024-03-31T23:59:59.999");
}

#[test]
fn rolling_window_sums_ninety_days() {
  let v = run_json(&["--period", "90days"]);
  assert_eq!(v["filtered_count"], 9);
  let m = &v["metrics"];
  assert_eq!(m["total_billable"].as_f64(), Some(48.5));
  assert_eq!(m["total_non_billable"].as_f64(), Some(12.0));
  assert_eq!(m["total_revenue"].as_f64(), Some(12_500.0));
  assert_eq!(m["direct_costs"].as_f64(), Some(4_700.0));
  assert_eq!(m["gross_margin_percent"].as_f64(), Some(62.4));
  assert_eq!(v["financial_window"]["start"], "2024-01-11T00:00:00.000");
}

#[test]
fn rolling_override_replaces_window() {
  let v = run_json(&["--period", "90days", "--date-from", "2023-12-01", "--date-to", "2023-12-31"]);
  assert_eq!(v["filtered_count"], 1);
  assert_eq!(v["metrics"]["employees"]["Ben"]["billable"].as_f64(), Some(6.0));
  assert_eq!(v["metrics"]["total_revenue"].as_f64(), Some(0.0));
  assert_eq!(v["metrics"]["gross_margin_percent"].as_f64(), Some(0.0));
}

#[test]
fn overall_financials_opt_in() {
  let plain = run_json(&["--period", "overall"]);
  assert_eq!(plain["filtered_count"], 10);
  assert_eq!(plain["metrics"]["employee_count"], 4);
  assert!(plain.get("financial_window").is_none());

  let v = run_json(&["--period", "overall", "--overall-year", "2023", "--overall-financials"]);
  assert_eq!(v["filtered_count"], 1);
  assert_eq!(v["metrics"]["total_revenue"].as_f64(), Some(9_000.0));
}

#[test]
fn single_period_out_file_is_written() {
  let td = tempdir();
  let path = td.path().join("weekly.json");
  fixture_cmd()
    .args(["--period", "weekly", "--out", path.to_str().unwrap()])
    .assert()
    .success()
    .stdout(predicate::str::is_empty());
  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
  assert_eq!(v["period"], "weekly");
}

#[test]
fn all_periods_write_reports_and_manifest() {
  let td = tempdir();
  let out = fixture_cmd().args(["--out", td.path().to_str().unwrap()]).output().unwrap();
  assert!(out.status.success());
  let ptr: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(ptr["manifest"], "manifest.json");

  let dir = std::path::Path::new(ptr["dir"].as_str().unwrap());
  for name in ["report-weekly.json", "report-monthly.json", "report-overall.json", "report-90days.json"] {
    assert!(dir.join(name).exists(), "missing {name}");
  }
  let manifest: serde_json::Value = serde_json::from_slice(&std::fs::read(dir.join("manifest.json")).unwrap()).unwrap();
  assert_eq!(manifest["generated_at"], "2024-04-10T09:30:00");
  assert_eq!(manifest["periods"][3]["filtered_count"], 9);
  assert_eq!(manifest["sources"]["stats"]["time_entries"]["rows"], 11);
}

#[test]
fn list_options_prints_discovered_values() {
  fixture_cmd()
    .arg("--list-options")
    .assert()
    .success()
    .stdout(predicate::str::contains("\"2024-W15\"").and(predicate::str::contains("\"Cara\"")));
}

#[test]
fn missing_time_entries_fails() {
  cmd_bin(BIN)
    .args(["--period", "weekly"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--time-entries"));
}

#[test]
fn overall_flags_rejected_for_other_periods() {
  fixture_cmd()
    .args(["--period", "weekly", "--overall-financials"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("only apply to --period overall"));
}

#[test]
fn invalid_week_key_is_a_usage_error() {
  fixture_cmd()
    .args(["--period", "weekly", "--week", "2024-W5"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid week key"));
}

#[test]
fn unreadable_costs_fail_open() {
  let td = tempdir();
  let bad = td.path().join("costs.json");
  std::fs::write(&bad, "not json").unwrap();
  let out = cmd_bin(BIN)
    .args([
      "--time-entries",
      fixture_arg("time_entries.json").as_str(),
      "--revenue",
      fixture_arg("revenue.json").as_str(),
      "--costs",
      bad.to_str().unwrap(),
      "--now-override",
      FIXTURE_NOW,
      "--period",
      "monthly",
    ])
    .output()
    .unwrap();
  assert!(out.status.success());
  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["metrics"]["direct_costs"].as_f64(), Some(0.0));
  assert_eq!(v["metrics"]["gross_margin_percent"].as_f64(), Some(100.0));
  assert!(String::from_utf8_lossy(&out.stderr).contains("cost table unavailable"));
}
