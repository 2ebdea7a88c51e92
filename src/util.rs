// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, the effective `now`, output directories, JSON file writes and man page rendering
// role: utilities/helpers
// inputs: Various primitives; NaiveDateTime; paths; clap CommandFactory
// outputs: Canonicalized paths, resolved `now`, directories ensured, man page text
// side_effects: prepare_out_dir and write_json create directories and files
// invariants:
// - prepare_out_dir returns an existing directory (either provided or temp timestamped)
// - an explicit now override always wins over the wall clock
// errors: Invalid --now-override values are rejected; IO errors bubble with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDateTime};
use clap::CommandFactory;
use serde::Serialize;

use crate::ingest;

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> PathBuf {
  let p = p.as_ref();
  match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  }
}

/// Returns the effective "now" given an optional override.
///
/// Centralizes test determinism without sprinkling `Local::now()` through the engine.
pub fn effective_now(override_now: Option<NaiveDateTime>) -> NaiveDateTime {
  override_now.unwrap_or_else(|| Local::now().naive_local())
}

/// Parse the hidden `--now-override` flag (same shapes as record dates).
pub fn parse_now_override(raw: Option<&str>) -> Result<Option<NaiveDateTime>> {
  match raw {
    None => Ok(None),
    Some(s) => match ingest::parse_record_date(s) {
      Some(dt) => Ok(Some(dt)),
      None => bail!("invalid --now-override '{s}', expected RFC 3339, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD"),
    },
  }
}

/// Prepare an output directory for all-period runs.
///
/// - When `out` is not "-", it is treated as the target directory; it will be created if needed.
/// - When `out` is "-", a temp directory is created with a timestamped name.
pub fn prepare_out_dir(out: &str, now: NaiveDateTime) -> Result<PathBuf> {
  let dir = if out != "-" {
    PathBuf::from(out)
  } else {
    std::env::temp_dir().join(format!("metrics-{}", now.format("%Y%m%d-%H%M%S")))
  };
  std::fs::create_dir_all(&dir).with_context(|| format!("creating output dir {}", dir.display()))?;

  Ok(dir)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(path, serde_json::to_vec_pretty(value)?).with_context(|| format!("writing {}", path.display()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
