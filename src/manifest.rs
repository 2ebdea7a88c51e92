// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build and write the manifest for all-period runs
// role: persistence/manifest
// inputs: generated_at, source paths and stats, base_dir, PeriodEntry[]
// outputs: manifest.json file written under base_dir
// side_effects: Writes to filesystem
// invariants:
// - periods[] keeps the order entries were provided (weekly, monthly, overall, 90days)
// - file paths in entries are relative to base_dir and point to report-<period>.json
// - generated_at is serialized in %Y-%m-%dT%H:%M:%S
// errors: IO errors surfaced with full path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::filter::PeriodKind;
use crate::ingest::{SnapshotPaths, SourceStats};
use crate::util;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodEntry {
  pub period: PeriodKind,
  pub file: String,
  pub filtered_count: usize,
  pub baseline_count: usize,
}

#[derive(Debug, Serialize)]
struct Sources {
  time_entries: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  revenue: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  costs: Option<String>,
  stats: SourceStats,
}

/// Top-level manifest for a multi-period run.
#[derive(Debug, Serialize)]
pub struct OverallManifest {
  generated_at: String,
  overall_financials: bool,
  sources: Sources,
  periods: Vec<PeriodEntry>,
}

impl OverallManifest {
  pub fn new(
    generated_at: NaiveDateTime,
    overall_financials: bool,
    paths: &SnapshotPaths,
    stats: &SourceStats,
  ) -> Self {
    let show = |p: &Path| p.to_string_lossy().to_string();
    Self {
      generated_at: generated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
      overall_financials,
      sources: Sources {
        time_entries: show(paths.time_entries.as_path()),
        revenue: paths.revenue.as_deref().map(show),
        costs: paths.costs.as_deref().map(show),
        stats: stats.clone(),
      },
      periods: Vec::new(),
    }
  }

  pub fn push(&mut self, entry: PeriodEntry) {
    self.periods.push(entry);
  }

  pub fn write_to(&self, base_dir: &Path) -> Result<PathBuf> {
    let path = base_dir.join("manifest.json");
    util::write_json(&path, self)?;
    Ok(path)
  }
}
