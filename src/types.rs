use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use tabled::Tabled;

use crate::classify::AirQualityStatus;

/// Header-resolved rows exactly as they came out of the CSV reader.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
    /// Records the CSV layer itself could not decode.
    pub parse_errors: usize,
}

/// One cleaned observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub city: String,
    pub pollutant_id: String,
    pub pollutant_avg: f64,
    pub last_update: Option<NaiveDateTime>,
}

/// Cleaned, de-duplicated records in input order. Read-only once built.
///
/// The surviving source rows are kept alongside the typed records so the
/// dataset can be written back out with every original column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedDataset {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
    records: Vec<Record>,
}

impl CleanedDataset {
    pub(crate) fn new(headers: Vec<String>, rows: Vec<csv::StringRecord>, records: Vec<Record>) -> Self {
        debug_assert_eq!(rows.len(), records.len());
        Self {
            headers,
            rows,
            records,
        }
    }

    /// The surviving source rows as a table that `loader::clean` accepts.
    pub fn to_raw_table(&self) -> RawTable {
        RawTable {
            headers: self.headers.clone(),
            rows: self.rows.clone(),
            parse_errors: 0,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn raw_rows(&self) -> &[csv::StringRecord] {
        &self.rows
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mean `pollutant_avg` per pollutant id for one city, ordered by id.
pub type PollutantSummary = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityAggregate {
    pub city: String,
    pub average_aqi: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeCityResult {
    pub city: String,
    pub average_aqi: f64,
    pub status: AirQualityStatus,
    pub advice: String,
    pub last_update: String,
    pub pollutant_summary: PollutantSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Descending,
    Ascending,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingResult {
    pub title: String,
    pub direction: Direction,
    pub entries: Vec<CityAggregate>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "AverageAQI")]
    #[tabled(rename = "AverageAQI")]
    pub average_aqi: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PollutantRow {
    #[tabled(rename = "Pollutant")]
    pub pollutant_id: String,
    #[tabled(rename = "Average")]
    pub average: String,
}

#[derive(Debug, Serialize, Tabled, Clone, Copy)]
pub struct PollutantInfo {
    #[tabled(rename = "Pollutant")]
    pub pollutant: &'static str,
    #[tabled(rename = "Effect")]
    pub effect: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub columns: Vec<String>,
    pub total_rows: usize,
    pub parse_errors: usize,
    pub dropped_missing: usize,
    pub invalid_values: usize,
    pub duplicates_removed: usize,
    pub clean_rows: usize,
}
