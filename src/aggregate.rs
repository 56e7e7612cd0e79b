use crate::error::{AirQualityError, Result};
use crate::types::{CityAggregate, CleanedDataset, PollutantSummary, Record};
use crate::util::average;
use std::collections::{BTreeMap, HashMap};

/// Mean `pollutant_avg` per pollutant for rows whose city matches exactly.
///
/// An unknown city yields an empty summary; the caller decides how to report
/// that.
pub fn pollutant_summary(dataset: &CleanedDataset, city: &str) -> PollutantSummary {
    summarize(dataset.records().iter().filter(|r| r.city == city))
}

fn summarize<'a>(records: impl Iterator<Item = &'a Record>) -> PollutantSummary {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.pollutant_id.as_str())
            .or_default()
            .push(r.pollutant_avg);
    }
    groups
        .into_iter()
        .filter_map(|(id, values)| average(&values).map(|m| (id.to_string(), m)))
        .collect()
}

/// Mean of the per-pollutant means (not of the raw readings).
pub fn city_average(summary: &PollutantSummary) -> Result<f64> {
    let means: Vec<f64> = summary.values().copied().collect();
    average(&means).ok_or_else(|| AirQualityError::empty_input("pollutant summary"))
}

/// One aggregate per city, in order of first appearance in the dataset.
pub fn all_city_averages(dataset: &CleanedDataset) -> Vec<CityAggregate> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_city: HashMap<&str, Vec<&Record>> = HashMap::new();
    for r in dataset.records() {
        by_city
            .entry(r.city.as_str())
            .or_insert_with(|| {
                order.push(r.city.as_str());
                Vec::new()
            })
            .push(r);
    }

    order
        .into_iter()
        .filter_map(|city| {
            let summary = summarize(by_city.remove(city)?.into_iter());
            let average_aqi = city_average(&summary).ok()?;
            Some(CityAggregate {
                city: city.to_string(),
                average_aqi,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{clean, read_table};

    fn dataset(csv: &str) -> CleanedDataset {
        clean(&read_table(csv.as_bytes()).unwrap()).unwrap().0
    }

    fn sample() -> CleanedDataset {
        dataset(
            "city,pollutant_id,pollutant_avg\n\
             Delhi,PM2.5,120\n\
             Delhi,PM10,80\n\
             Mumbai,PM2.5,40\n",
        )
    }

    #[test]
    fn summary_groups_by_pollutant() {
        let s = pollutant_summary(&sample(), "Delhi");
        assert_eq!(s.len(), 2);
        assert_eq!(s["PM2.5"], 120.0);
        assert_eq!(s["PM10"], 80.0);
        assert_eq!(city_average(&s).unwrap(), 100.0);
    }

    #[test]
    fn summary_matches_city_exactly() {
        assert!(pollutant_summary(&sample(), "delhi").is_empty());
        assert!(pollutant_summary(&sample(), "Delhi ").is_empty());
        assert!(pollutant_summary(&sample(), "Chennai").is_empty());
    }

    #[test]
    fn empty_summary_has_no_average() {
        let err = city_average(&PollutantSummary::new()).unwrap_err();
        assert!(matches!(err, AirQualityError::EmptyInput { .. }));
    }

    #[test]
    fn city_average_is_mean_of_pollutant_means() {
        // PM2.5 mean is 100 over three readings, NO2 is 10 over one.
        let ds = dataset(
            "city,station,pollutant_id,pollutant_avg\n\
             Agra,a,PM2.5,90\n\
             Agra,b,PM2.5,100\n\
             Agra,c,PM2.5,110\n\
             Agra,a,NO2,10\n",
        );
        let s = pollutant_summary(&ds, "Agra");
        assert_eq!(s["PM2.5"], 100.0);
        assert_eq!(city_average(&s).unwrap(), 55.0);
    }

    #[test]
    fn all_city_averages_follow_first_appearance() {
        let ds = dataset(
            "city,pollutant_id,pollutant_avg\n\
             Pune,CO,10\n\
             Agra,CO,30\n\
             Pune,NO2,20\n",
        );
        assert_eq!(
            all_city_averages(&ds),
            vec![
                CityAggregate {
                    city: "Pune".into(),
                    average_aqi: 15.0
                },
                CityAggregate {
                    city: "Agra".into(),
                    average_aqi: 30.0
                },
            ]
        );
    }

    #[test]
    fn every_present_city_has_a_finite_average() {
        let ds = sample();
        for agg in all_city_averages(&ds) {
            assert!(agg.average_aqi.is_finite());
            let direct = city_average(&pollutant_summary(&ds, &agg.city)).unwrap();
            assert_eq!(direct, agg.average_aqi);
        }
    }
}
