//! Period-scoped workforce and financial metrics (utilization, capacity,
//! effective billing rate, gross margin) over time-tracking, revenue and
//! job-costing exports.
//!
//! The engine (`window`, `filter`, `metrics`, `report`) is pure and
//! infallible; `ingest` turns table exports into a [`record::Snapshot`]; the
//! remaining modules make up the command-line front end.

pub mod cli;
pub mod ext;
pub mod filter;
pub mod ingest;
pub mod manifest;
pub mod metrics;
pub mod model;
pub mod options;
pub mod params;
pub mod processor;
pub mod record;
pub mod report;
pub mod telemetry;
pub mod util;
pub mod window;
