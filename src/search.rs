use crate::types::CleanedDataset;
use std::collections::BTreeSet;

/// Distinct city names in byte-wise (case-sensitive) sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityUniverse {
    cities: Vec<String>,
}

impl CityUniverse {
    pub fn build(dataset: &CleanedDataset) -> Self {
        let set: BTreeSet<&str> = dataset.records().iter().map(|r| r.city.as_str()).collect();
        Self {
            cities: set.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities
            .binary_search_by(|c| c.as_str().cmp(city))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Case-insensitive substring filter, results in universe order.
    ///
    /// A blank query returns every city.
    pub fn search(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.cities.clone();
        }
        self.cities
            .iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}
