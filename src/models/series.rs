// ============================================================================
// SeriesPoint / NormalizedSeries
// ============================================================================
// Plot-ready representation of a commodity's price history. A series only
// ever exists in normalized form: points sorted ascending by date, every
// value a finite number. The raw provider payload never crosses into the
// rest of the application.
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One price observation at day resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// An ordered price series for one commodity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    /// Catalog id of the commodity this series belongs to.
    pub commodity_id: u32,

    /// Display label (= commodity name).
    pub label: String,

    /// Points sorted ascending by date, oldest first.
    pub points: Vec<SeriesPoint>,
}

impl NormalizedSeries {
    /// Builds a series, sorting the points ascending by date.
    ///
    /// Charting renders left-to-right chronologically regardless of the
    /// source payload's native ordering, so the sort happens here, once.
    pub fn new(commodity_id: u32, label: String, mut points: Vec<SeriesPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self {
            commodity_id,
            label,
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Lowest value in the series, for axis bounds.
    pub fn min_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(None, |min, v| Some(min.map_or(v, |m: f64| m.min(v))))
    }

    /// Highest value in the series, for axis bounds.
    pub fn max_value(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|p| p.value)
            .fold(None, |max, v| Some(max.map_or(v, |m: f64| m.max(v))))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_points_sorted_on_construction() {
        let series = NormalizedSeries::new(
            1,
            "Gold".to_string(),
            vec![
                SeriesPoint::new(date("2024-03-01"), 3.0),
                SeriesPoint::new(date("2024-01-01"), 1.0),
                SeriesPoint::new(date("2024-02-01"), 2.0),
            ],
        );

        let dates: Vec<NaiveDate> = series.points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]
        );
        assert_eq!(series.first().unwrap().value, 1.0);
        assert_eq!(series.last().unwrap().value, 3.0);
    }

    #[test]
    fn test_value_bounds() {
        let series = NormalizedSeries::new(
            1,
            "Gold".to_string(),
            vec![
                SeriesPoint::new(date("2024-01-01"), 1900.5),
                SeriesPoint::new(date("2024-02-01"), 2044.1),
                SeriesPoint::new(date("2024-03-01"), 1875.0),
            ],
        );

        assert_eq!(series.min_value(), Some(1875.0));
        assert_eq!(series.max_value(), Some(2044.1));
    }

    #[test]
    fn test_empty_series_has_no_bounds() {
        let series = NormalizedSeries::new(1, "Gold".to_string(), vec![]);
        assert!(series.is_empty());
        assert!(series.min_value().is_none());
        assert!(series.max_value().is_none());
    }
}
