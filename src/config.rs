use clap::Parser;
use std::path::PathBuf;

/// Runtime settings, taken from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "air_quality_report")]
#[command(about = "Analyze city air-quality readings from a CSV export", long_about = None)]
pub struct Config {
    /// CSV file with city, pollutant_id and pollutant_avg columns
    #[arg(short, long = "data", env = "AQ_DATA_PATH", default_value = "air_quality_data.csv")]
    pub data_path: PathBuf,

    /// How many cities the most-polluted and cleanest rankings show
    #[arg(short = 'n', long = "top", env = "AQ_TOP_N", default_value_t = 5)]
    pub top_n: usize,

    /// Also write every query result into this directory
    #[arg(short, long, env = "AQ_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Rows shown in the preview printed after loading
    #[arg(long, default_value_t = 5)]
    pub preview_rows: usize,

    /// Log filter directive, e.g. `debug` or `air_quality_report=trace`
    #[arg(long = "log", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}
