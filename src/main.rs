// Entry point and interactive menu.
//
// - Option [1] loads and cleans the CSV, printing its shape, columns and a
//   short preview.
// - Options [2]-[5] run queries against the loaded snapshot.
// - Option [6] prints reference notes on the common pollutants.
use air_quality_report::analysis::{self, Dataset};
use air_quality_report::config::Config;
use air_quality_report::error::AirQualityError;
use air_quality_report::types::RankingResult;
use air_quality_report::{loader, output, util};
use clap::Parser;
use std::io::{self, Write};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

struct AppState {
    config: Config,
    dataset: Option<Dataset>,
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn loaded(state: &AppState) -> Option<&Dataset> {
    if state.dataset.is_none() {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
    }
    state.dataset.as_ref()
}

/// Handle option [1]: load and clean the CSV file.
///
/// A successful load replaces the whole snapshot; a failed one leaves no
/// dataset loaded.
fn handle_load(state: &mut AppState) {
    let path = &state.config.data_path;
    state.dataset = None;
    let (cleaned, report) = match loader::load_and_clean(path) {
        Ok(v) => v,
        Err(e @ AirQualityError::Schema { .. }) => {
            error!(path = %path.display(), "{}", e);
            println!("Error: {}. No queries are possible until a valid file is loaded.\n", e);
            return;
        }
        Err(e) => {
            error!(path = %path.display(), "failed to load dataset: {}", e);
            println!("Failed to load file: {}\n", e);
            return;
        }
    };

    println!("Dataset Loaded Successfully!");
    println!(
        "Number of Rows and Columns: ({}, {})",
        util::format_int(cleaned.len()),
        report.columns.len()
    );
    println!(
        "Processing dataset... ({} rows read, {} kept after cleaning)",
        util::format_int(report.total_rows),
        util::format_int(report.clean_rows)
    );
    println!(
        "Note: {} rows missing required fields, {} non-numeric averages, {} duplicates, {} unreadable.",
        util::format_int(report.dropped_missing),
        util::format_int(report.invalid_values),
        util::format_int(report.duplicates_removed),
        util::format_int(report.parse_errors)
    );
    println!("\nColumns in Dataset:\n{:?}\n", report.columns);
    println!("First {} Rows:\n", state.config.preview_rows);
    output::preview_dataset(&cleaned, state.config.preview_rows);

    if let Some(dir) = &state.config.export_dir {
        if let Err(e) = output::export_cleaned(dir, &cleaned) {
            eprintln!("Write error: {}", e);
        }
    }

    let dataset = Dataset::new(cleaned);
    println!("{} cities available.\n", util::format_int(dataset.universe().len()));
    state.dataset = Some(dataset);
}

/// Handle option [2]. Free text that is not an exact city name is treated
/// as a search and the candidates are offered instead.
fn handle_analyze(state: &AppState) {
    let Some(dataset) = loaded(state) else {
        return;
    };
    let Some(input) = read_line("City: ") else {
        return;
    };
    if input.is_empty() {
        println!("Warning: Please select a city.\n");
        return;
    }

    let city = if dataset.universe().contains(&input) {
        input
    } else {
        let candidates = dataset.search(&input);
        match candidates.as_slice() {
            [] => {
                println!("No data available for this city.\n");
                return;
            }
            [only] => only.clone(),
            many => {
                println!("Did you mean one of:");
                for c in many {
                    println!("  {}", c);
                }
                println!();
                return;
            }
        }
    };

    let result = match analysis::analyze_city(dataset, &city) {
        Ok(r) => r,
        Err(e @ AirQualityError::EmptyInput { .. }) => {
            warn!("{}", e);
            println!("No data available for this city.\n");
            return;
        }
        Err(e) => {
            eprintln!("Error: {}\n", e);
            return;
        }
    };

    println!();
    println!("City: {}", result.city);
    println!("Average AQI: {}", util::format_number(result.average_aqi, 2));
    println!("Status: {}", result.status);
    println!("Last Updated: {}", result.last_update);
    println!("Health Advice: {}\n", result.advice);
    println!("Pollutant Levels in {}\n", result.city);
    output::preview_table_rows(&output::pollutant_rows(&result), usize::MAX);

    if let Some(dir) = &state.config.export_dir {
        match output::export_city(dir, &result) {
            Ok(p) => println!("(Full analysis exported to {})\n", p.display()),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }
}

fn show_ranking(state: &AppState, ranking: RankingResult) {
    println!("\n{}\n", ranking.title);
    output::preview_table_rows(&output::ranking_rows(&ranking), usize::MAX);
    if let Some(dir) = &state.config.export_dir {
        match output::export_ranking(dir, &ranking) {
            Ok(p) => println!("(Full table exported to {})\n", p.display()),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }
}

fn handle_top(state: &AppState) {
    if let Some(dataset) = loaded(state) {
        show_ranking(state, analysis::most_polluted(dataset, state.config.top_n));
    }
}

fn handle_cleanest(state: &AppState) {
    if let Some(dataset) = loaded(state) {
        show_ranking(state, analysis::cleanest(dataset, state.config.top_n));
    }
}

/// Handle option [5]: repeated searches until an empty line.
fn handle_search(state: &AppState) {
    let Some(dataset) = loaded(state) else {
        return;
    };
    println!("Type part of a city name (blank line to return).");
    while let Some(query) = read_line("Search: ") {
        if query.is_empty() {
            break;
        }
        let hits = dataset.search(&query);
        if hits.is_empty() {
            println!("(no matches)");
        }
        for city in &hits {
            println!("  {}", city);
        }
        println!();
    }
}

fn handle_info() {
    println!("\nCommon Air Pollutants and Their Effects:\n");
    output::preview_table_rows(analysis::pollutant_info(), usize::MAX);
}

fn main() {
    let config = Config::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(io::stderr)
        .init();

    let mut state = AppState {
        config,
        dataset: None,
    };

    loop {
        println!("Smart Air Quality Analysis System");
        println!("[1] Load the file");
        println!("[2] Analyze City");
        println!("[3] Show Top {} Polluted Cities", state.config.top_n);
        println!("[4] Show Top {} Cleanest Cities", state.config.top_n);
        println!("[5] Search Cities");
        println!("[6] View Pollutant Information");
        println!("[0] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => handle_load(&mut state),
            "2" => handle_analyze(&state),
            "3" => handle_top(&state),
            "4" => handle_cleanest(&state),
            "5" => handle_search(&state),
            "6" => handle_info(),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter a number from 0 to 6.\n"),
        }
    }
}
