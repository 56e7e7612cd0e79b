// The queries behind each menu entry, run against one loaded snapshot.

use crate::aggregate::{all_city_averages, city_average, pollutant_summary};
use crate::classify::classify;
use crate::error::{AirQualityError, Result};
use crate::ranking::top_n;
use crate::search::CityUniverse;
use crate::types::{AnalyzeCityResult, CleanedDataset, Direction, PollutantInfo, RankingResult};
use crate::util::DISPLAY_FORMAT;
use tracing::debug;

pub const NOT_AVAILABLE: &str = "Not Available";

/// A cleaned dataset together with the city universe derived from it.
///
/// Built in one step so a reload swaps both at once.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    cleaned: CleanedDataset,
    universe: CityUniverse,
}

impl Dataset {
    pub fn new(cleaned: CleanedDataset) -> Self {
        let universe = CityUniverse::build(&cleaned);
        Self { cleaned, universe }
    }

    pub fn cleaned(&self) -> &CleanedDataset {
        &self.cleaned
    }

    pub fn universe(&self) -> &CityUniverse {
        &self.universe
    }

    pub fn search(&self, query: &str) -> Vec<String> {
        self.universe.search(query)
    }
}

pub fn analyze_city(dataset: &Dataset, city: &str) -> Result<AnalyzeCityResult> {
    if city.trim().is_empty() {
        return Err(AirQualityError::empty_input(city));
    }
    let summary = pollutant_summary(&dataset.cleaned, city);
    if summary.is_empty() {
        return Err(AirQualityError::empty_input(city));
    }
    let average_aqi = city_average(&summary)?;
    let c = classify(average_aqi);

    let last_update = dataset
        .cleaned
        .records()
        .iter()
        .rev()
        .filter(|r| r.city == city)
        .find_map(|r| r.last_update)
        .map(|ts| ts.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    debug!(city, average_aqi, status = %c.status, "analyzed city");
    Ok(AnalyzeCityResult {
        city: city.to_string(),
        average_aqi,
        status: c.status,
        advice: c.advice,
        last_update,
        pollutant_summary: summary,
    })
}

pub fn most_polluted(dataset: &Dataset, n: usize) -> RankingResult {
    rank(dataset, n, Direction::Descending)
}

pub fn cleanest(dataset: &Dataset, n: usize) -> RankingResult {
    rank(dataset, n, Direction::Ascending)
}

fn rank(dataset: &Dataset, n: usize, direction: Direction) -> RankingResult {
    let title = match direction {
        Direction::Descending => format!("Top {} Most Polluted Cities", n),
        Direction::Ascending => format!("Top {} Cleanest Cities (Lowest Pollution)", n),
    };
    let aggregates = all_city_averages(&dataset.cleaned);
    let n = i64::try_from(n).unwrap_or(i64::MAX);
    RankingResult {
        title,
        direction,
        entries: top_n(&aggregates, n, direction),
    }
}

/// Reference notes on the common pollutants found in the feed.
pub fn pollutant_info() -> &'static [PollutantInfo] {
    const INFO: &[PollutantInfo] = &[
        PollutantInfo {
            pollutant: "PM2.5",
            effect: "Fine particles that affect lungs and heart.",
        },
        PollutantInfo {
            pollutant: "PM10",
            effect: "Larger dust particles that irritate eyes and throat.",
        },
        PollutantInfo {
            pollutant: "NO2",
            effect: "Causes breathing difficulties and asthma.",
        },
        PollutantInfo {
            pollutant: "SO2",
            effect: "Affects respiratory system and causes coughing.",
        },
        PollutantInfo {
            pollutant: "O3 (Ozone)",
            effect: "Triggers asthma attacks and chest pain.",
        },
        PollutantInfo {
            pollutant: "CO",
            effect: "Reduces oxygen in the blood and is harmful to the heart.",
        },
    ];
    INFO
}
