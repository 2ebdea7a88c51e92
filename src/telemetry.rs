// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Initialize the global tracing subscriber for the CLI
// role: observability/logging
// inputs: RUST_LOG (wins when set) or the --log-level value
// outputs: Compact, non-ANSI log lines on stderr
// invariants: stdout carries only JSON; all logs go to stderr
// errors: Invalid filter directives and double initialization surface as anyhow errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

pub fn filter_for(log_level: &str) -> Result<EnvFilter> {
  match EnvFilter::try_from_default_env() {
    Ok(filter) => Ok(filter),
    Err(_) => EnvFilter::try_new(log_level).with_context(|| format!("invalid log level/filter '{log_level}'")),
  }
}

pub fn init(log_level: &str) -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(filter_for(log_level)?)
    .with_writer(std::io::stderr)
    .with_target(false)
    .compact()
    .with_ansi(false)
    .try_init()
    .map_err(|e| anyhow!("telemetry init failed: {e}"))
}
