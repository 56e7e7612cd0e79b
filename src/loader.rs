use crate::error::{AirQualityError, Result};
use crate::types::{CleanedDataset, LoadReport, RawTable, Record};
use crate::util::{non_empty, parse_f64_safe, parse_timestamp_safe};
use csv::{ReaderBuilder, Trim};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub const CITY: &str = "city";
pub const POLLUTANT_ID: &str = "pollutant_id";
pub const POLLUTANT_AVG: &str = "pollutant_avg";

pub const REQUIRED_COLUMNS: [&str; 3] = [CITY, POLLUTANT_ID, POLLUTANT_AVG];

/// Accepted names for the last-update column, first match wins.
pub const LAST_UPDATE_ALIASES: [&str; 2] = ["last_update", "Last Updated"];

/// Column positions resolved once from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    city: usize,
    pollutant_id: usize,
    pollutant_avg: usize,
    last_update: Option<usize>,
}

fn position(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self> {
        let find = |name: &str| position(headers, name);
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| position(headers, c).is_none())
            .map(|c| c.to_string())
            .collect();
        match (find(CITY), find(POLLUTANT_ID), find(POLLUTANT_AVG)) {
            (Some(city), Some(pollutant_id), Some(pollutant_avg)) => Ok(Self {
                city,
                pollutant_id,
                pollutant_avg,
                last_update: LAST_UPDATE_ALIASES
                    .iter()
                    .find_map(|a| position(headers, a)),
            }),
            _ => Err(AirQualityError::Schema { missing }),
        }
    }
}

/// Read the header row and every record from a CSV source.
///
/// Rows the CSV layer cannot decode are counted and skipped; nothing about
/// their content is interpreted here.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    let mut parse_errors = 0usize;
    for result in rdr.records() {
        match result {
            Ok(r) => rows.push(r),
            Err(e) => {
                debug!(error = %e, "skipping undecodable CSV row");
                parse_errors += 1;
            }
        }
    }
    Ok(RawTable {
        headers,
        rows,
        parse_errors,
    })
}

pub fn load_table(path: impl AsRef<Path>) -> Result<RawTable> {
    let file = File::open(path.as_ref())?;
    read_table(file)
}

/// Turn raw rows into a `CleanedDataset`.
///
/// Order of operations: drop rows missing a mandatory field, drop exact
/// duplicate rows (whole source row, first occurrence wins), then coerce
/// `pollutant_avg` and drop rows whose value is not numeric.
pub fn clean(table: &RawTable) -> Result<(CleanedDataset, LoadReport)> {
    let cols = Columns::resolve(&table.headers)?;

    let mut seen: HashSet<Vec<&str>> = HashSet::with_capacity(table.rows.len());
    let mut rows = Vec::new();
    let mut records = Vec::new();
    let mut dropped_missing = 0usize;
    let mut duplicates_removed = 0usize;
    let mut invalid_values = 0usize;

    for (line, row) in table.rows.iter().enumerate() {
        let (Some(city), Some(pollutant_id), Some(raw_avg)) = (
            non_empty(row.get(cols.city)),
            non_empty(row.get(cols.pollutant_id)),
            non_empty(row.get(cols.pollutant_avg)),
        ) else {
            debug!(line, "dropping row with missing mandatory field");
            dropped_missing += 1;
            continue;
        };

        if !seen.insert(row.iter().collect()) {
            duplicates_removed += 1;
            continue;
        }

        let Some(pollutant_avg) = parse_f64_safe(Some(raw_avg.as_str())) else {
            debug!(line, value = %raw_avg, "dropping row with non-numeric pollutant_avg");
            invalid_values += 1;
            continue;
        };

        let last_update = cols
            .last_update
            .and_then(|i| parse_timestamp_safe(row.get(i)));

        rows.push(row.clone());
        records.push(Record {
            city,
            pollutant_id,
            pollutant_avg,
            last_update,
        });
    }

    let report = LoadReport {
        columns: table.headers.clone(),
        total_rows: table.rows.len() + table.parse_errors,
        parse_errors: table.parse_errors,
        dropped_missing,
        invalid_values,
        duplicates_removed,
        clean_rows: records.len(),
    };
    info!(
        total = report.total_rows,
        clean = report.clean_rows,
        missing = dropped_missing,
        invalid = invalid_values,
        duplicates = duplicates_removed,
        "dataset cleaned"
    );
    Ok((
        CleanedDataset::new(table.headers.clone(), rows, records),
        report,
    ))
}

pub fn load_and_clean(path: impl AsRef<Path>) -> Result<(CleanedDataset, LoadReport)> {
    let table = load_table(path)?;
    clean(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> RawTable {
        read_table(csv.as_bytes()).unwrap()
    }

    #[test]
    fn keeps_valid_rows_in_input_order() {
        let t = table(
            "city,pollutant_id,pollutant_avg\n\
             Delhi,PM2.5,120\n\
             Delhi,PM10,80\n\
             Mumbai,PM2.5,40\n",
        );
        let (ds, report) = clean(&t).unwrap();
        let cities: Vec<&str> = ds.records().iter().map(|r| r.city.as_str()).collect();
        assert_eq!(cities, vec!["Delhi", "Delhi", "Mumbai"]);
        assert_eq!(ds.records()[1].pollutant_avg, 80.0);
        assert_eq!(report.clean_rows, 3);
        assert_eq!(report.total_rows, 3);
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let t = table("city,pollutant_id,value\nDelhi,PM2.5,120\n");
        match clean(&t) {
            Err(AirQualityError::Schema { missing }) => {
                assert_eq!(missing, vec!["pollutant_avg".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn empty_cells_are_not_schema_errors() {
        let t = table("city,pollutant_id,pollutant_avg\n,,\n");
        let (ds, report) = clean(&t).unwrap();
        assert!(ds.is_empty());
        assert_eq!(report.dropped_missing, 1);
    }

    #[test]
    fn drops_rows_with_missing_or_non_numeric_values() {
        let t = table(
            "city,pollutant_id,pollutant_avg\n\
             Delhi,PM2.5,high\n\
             ,PM10,80\n\
             Pune,,30\n\
             Pune,NO2,\n\
             Pune,CO,12\n",
        );
        let (ds, report) = clean(&t).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].pollutant_id, "CO");
        assert_eq!(report.dropped_missing, 3);
        assert_eq!(report.invalid_values, 1);
    }

    #[test]
    fn na_tokens_count_as_missing_fields() {
        let t = table(
            "city,pollutant_id,pollutant_avg\n\
             NA,PM2.5,10\n\
             Pune,N/A,10\n\
             Pune,CO,NA\n\
             Pune,CO,null\n\
             Pune,SO2,4\n",
        );
        let (ds, report) = clean(&t).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(report.dropped_missing, 4);
        assert_eq!(report.invalid_values, 0);
    }

    #[test]
    fn scientific_notation_values_are_kept() {
        let t = table(
            "city,pollutant_id,pollutant_avg\n\
             Delhi,PM2.5,1.2e2\n\
             Delhi,PM10,80\n\
             Delhi,CO,5E-1\n",
        );
        let (ds, report) = clean(&t).unwrap();
        assert_eq!(report.clean_rows, 3);
        assert_eq!(report.invalid_values, 0);
        assert_eq!(ds.records()[0].pollutant_avg, 120.0);
        assert_eq!(ds.records()[2].pollutant_avg, 0.5);
    }

    #[test]
    fn identical_rows_collapse_to_first() {
        let t = table(
            "city,station,pollutant_id,pollutant_avg\n\
             Delhi,Anand Vihar,PM2.5,120\n\
             Delhi,Anand Vihar,PM2.5,120\n\
             Delhi,ITO,PM2.5,120\n",
        );
        let (ds, report) = clean(&t).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(ds.raw_rows()[1].get(1), Some("ITO"));
    }

    #[test]
    fn last_update_resolves_first_alias_present() {
        let t = table(
            "city,Last Updated,pollutant_id,pollutant_avg\n\
             Delhi,21-01-2025 10:00:00,PM2.5,120\n\
             Delhi,garbage,PM10,80\n",
        );
        let (ds, _) = clean(&t).unwrap();
        assert!(ds.records()[0].last_update.is_some());
        assert_eq!(ds.records()[1].last_update, None);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let t = table(
            "city,pollutant_id,pollutant_avg,last_update\n\
             Delhi,PM2.5,120,21-01-2025 10:00:00\n\
             Delhi,PM2.5,120,21-01-2025 10:00:00\n\
             Agra,SO2,oops,\n\
             Agra,SO2,9.5,\n",
        );
        let (once, _) = clean(&t).unwrap();
        let (twice, report) = clean(&once.to_raw_table()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(report.clean_rows, report.total_rows);
    }

    #[test]
    fn short_rows_are_treated_as_missing() {
        let t = table("city,pollutant_id,pollutant_avg\nDelhi,PM2.5\nDelhi,PM10,5\n");
        let (ds, report) = clean(&t).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(report.dropped_missing, 1);
    }
}
