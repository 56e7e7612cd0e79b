// Air-quality analysis over a CSV of per-city pollutant readings.
//
// Load and clean once with `loader`, wrap the result in an
// `analysis::Dataset`, then run the queries in `analysis`.

pub mod aggregate;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod ranking;
pub mod search;
pub mod types;
pub mod util;
