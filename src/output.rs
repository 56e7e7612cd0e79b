use crate::classify::classify;
use crate::error::Result;
use crate::types::{
    AnalyzeCityResult, CleanedDataset, Direction, PollutantRow, RankingResult, RankingRow,
};
use crate::util::format_number;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the surviving source rows, every original column included.
///
/// Rows keep the width they were read with, so short rows stay short.
pub fn write_cleaned(path: &Path, dataset: &CleanedDataset) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    wtr.write_record(dataset.headers())?;
    for row in dataset.raw_rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn ranking_rows(ranking: &RankingResult) -> Vec<RankingRow> {
    ranking
        .entries
        .iter()
        .enumerate()
        .map(|(idx, agg)| RankingRow {
            rank: idx + 1,
            city: agg.city.clone(),
            average_aqi: format_number(agg.average_aqi, 2),
            status: classify(agg.average_aqi).status.to_string(),
        })
        .collect()
}

pub fn pollutant_rows(result: &AnalyzeCityResult) -> Vec<PollutantRow> {
    result
        .pollutant_summary
        .iter()
        .map(|(id, avg)| PollutantRow {
            pollutant_id: id.clone(),
            average: format_number(*avg, 2),
        })
        .collect()
}

/// File names derived from free-text city names keep only safe characters.
fn slug(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn export_city(dir: &Path, result: &AnalyzeCityResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("city_{}.json", slug(&result.city)));
    write_json(&path, result)?;
    info!(path = %path.display(), "exported city analysis");
    Ok(path)
}

pub fn export_ranking(dir: &Path, ranking: &RankingResult) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = match ranking.direction {
        Direction::Descending => "ranking_most_polluted.csv",
        Direction::Ascending => "ranking_cleanest.csv",
    };
    let path = dir.join(name);
    write_csv(&path, &ranking_rows(ranking))?;
    info!(path = %path.display(), "exported ranking");
    Ok(path)
}

pub fn export_cleaned(dir: &Path, dataset: &CleanedDataset) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("cleaned_dataset.csv");
    write_cleaned(&path, dataset)?;
    info!(path = %path.display(), rows = dataset.len(), "exported cleaned dataset");
    Ok(path)
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// First `max_rows` source rows under their original headers.
pub fn preview_dataset(dataset: &CleanedDataset, max_rows: usize) {
    if dataset.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = tabled::builder::Builder::default();
    builder.push_record(dataset.headers().iter().cloned());
    for row in dataset.raw_rows().iter().take(max_rows) {
        builder.push_record(row.iter().map(str::to_string));
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
