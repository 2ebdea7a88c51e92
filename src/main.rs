use anyhow::Result;
use clap::Parser;
use tracing::debug;

use workforce_metrics::cli::{Cli, normalize};
use workforce_metrics::{ingest, options, processor, telemetry, util};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  telemetry::init(&cli.log_level)?;

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: resolve now and load the snapshot
  let now = util::effective_now(util::parse_now_override(cfg.now_override.as_deref())?);
  debug!(%now, period = ?cfg.period, "resolved reference time");
  let (snapshot, stats) = ingest::load_snapshot(&cfg.sources)?;

  if cfg.list_options {
    let found = options::discover(&snapshot.time_entries);
    println!("{}", serde_json::to_string_pretty(&found)?);
    return Ok(());
  }

  // Phase 3: compute one or all periods in a unified flow
  processor::process_periods(&cfg, &snapshot, &stats, now)
}
