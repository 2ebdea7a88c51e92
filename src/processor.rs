// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate period processing: compute one or all period reports and save artifacts; assemble the manifest for all-period runs
// role: processing/orchestrator
// inputs: EffectiveConfig, loaded Snapshot with its SourceStats, resolved `now`
// outputs: Files on disk (reports, manifest.json); stdout JSON or pointer per state
// side_effects: Creates directories; writes JSON files; prints to stdout
// invariants:
// - per-period report file name is report-<period>.json when written to a directory
// - --period all ⇒ manifest.json exists and pointer {dir, manifest} printed
// - single period ⇒ JSON printed, written to --out file, or written into --out dir with pointer {dir, file}
// errors: Propagates save/write errors with file path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::info;

use crate::cli::EffectiveConfig;
use crate::filter::PeriodKind;
use crate::ingest::SourceStats;
use crate::manifest::{OverallManifest, PeriodEntry};
use crate::model::PeriodReport;
use crate::record::Snapshot;
use crate::report;
use crate::util;

pub fn report_file_name(kind: PeriodKind) -> String {
  format!("report-{}.json", kind.label())
}

/// JSON to print for a single-period run; None when the report went to a file.
pub fn save_period_report(out: &str, report: &PeriodReport) -> Result<Option<serde_json::Value>> {
  if out == "-" {
    return Ok(Some(serde_json::to_value(report)?));
  }
  let out_path = Path::new(out);
  let is_dir_like = out.ends_with('/') || out_path.is_dir();
  if is_dir_like {
    let file = report_file_name(report.period);
    util::write_json(&out_path.join(&file), report)?;
    Ok(Some(serde_json::json!({"dir": out_path, "file": file})))
  } else {
    util::write_json(out_path, report)?;
    info!(path = %out_path.display(), "report written");
    Ok(None)
  }
}

/// Write every report under `base_dir` and return the manifest entries.
pub fn save_all_reports(base_dir: &Path, reports: &[PeriodReport]) -> Result<Vec<PeriodEntry>> {
  reports
    .iter()
    .map(|r| -> Result<PeriodEntry> {
      let file = report_file_name(r.period);
      util::write_json(&base_dir.join(&file), r)?;
      Ok(PeriodEntry {
        period: r.period,
        file,
        filtered_count: r.filtered_count,
        baseline_count: r.baseline_count,
      })
    })
    .collect()
}

pub fn process_periods(
  cfg: &EffectiveConfig,
  snapshot: &Snapshot,
  stats: &SourceStats,
  now: NaiveDateTime,
) -> Result<()> {
  if let Some(kind) = cfg.period.single() {
    let r = report::period_report(snapshot, &cfg.filters.get(kind), now, cfg.overall_financials);
    if let Some(v) = save_period_report(&cfg.out, &r)? {
      println!("{}", serde_json::to_string_pretty(&v)?);
    }
    return Ok(());
  }

  let base_dir: PathBuf = util::prepare_out_dir(&cfg.out, now)?;
  let reports = report::all_reports(snapshot, &cfg.filters, now, cfg.overall_financials);
  let entries = save_all_reports(&base_dir, &reports)?;

  let mut manifest = OverallManifest::new(now, cfg.overall_financials, &cfg.sources, stats);
  for e in entries {
    manifest.push(e);
  }
  let manifest_path = manifest.write_to(&base_dir)?;
  info!(path = %manifest_path.display(), periods = reports.len(), "manifest written");

  println!(
    "{}",
    serde_json::to_string_pretty(&serde_json::json!({"dir": base_dir, "manifest": "manifest.json"}))?
  );
  Ok(())
}
