use crate::types::{CityAggregate, Direction};
use std::cmp::Ordering;

/// Stable sort by `average_aqi` in `direction`, then keep the first `n`.
///
/// Ties keep their input order in both directions. `n <= 0` yields nothing.
pub fn top_n(aggregates: &[CityAggregate], n: i64, direction: Direction) -> Vec<CityAggregate> {
    if n <= 0 {
        return Vec::new();
    }
    let mut sorted = aggregates.to_vec();
    sorted.sort_by(|a, b| {
        let ord = a
            .average_aqi
            .partial_cmp(&b.average_aqi)
            .unwrap_or(Ordering::Equal);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
    sorted.truncate(usize::try_from(n).unwrap_or(usize::MAX));
    sorted
}
