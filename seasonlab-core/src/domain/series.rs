//! Monthly series — one value per calendar month, contiguous by construction.

use super::month::Month;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A labelled monthly value, the serialized form of a series entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: Month,
    pub value: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("months must be consecutive: {previous} is followed by {next}")]
    NotContiguous { previous: Month, next: Month },
}

/// Gap-free monthly series.
///
/// Stored as a start month plus values, so position `i` is always
/// `start + i` months: there is exactly one entry per calendar month and
/// no duplicates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "Vec<MonthlyPoint>", try_from = "Vec<MonthlyPoint>")]
pub struct MonthlySeries {
    start: Option<Month>,
    values: Vec<f64>,
}

impl MonthlySeries {
    pub fn new(start: Month, values: Vec<f64>) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        Self {
            start: Some(start),
            values,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from labelled points, rejecting gaps and duplicates.
    pub fn from_points(points: &[MonthlyPoint]) -> Result<Self, SeriesError> {
        for pair in points.windows(2) {
            if pair[0].month.months_until(&pair[1].month) != 1 {
                return Err(SeriesError::NotContiguous {
                    previous: pair[0].month,
                    next: pair[1].month,
                });
            }
        }
        match points.first() {
            Some(first) => Ok(Self::new(
                first.month,
                points.iter().map(|p| p.value).collect(),
            )),
            None => Ok(Self::empty()),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn start(&self) -> Option<Month> {
        self.start
    }

    pub fn end(&self) -> Option<Month> {
        self.start
            .map(|s| s.plus(self.values.len().saturating_sub(1) as u32))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn month_at(&self, index: usize) -> Option<Month> {
        if index >= self.values.len() {
            return None;
        }
        self.start.map(|s| s.plus(index as u32))
    }

    /// Months of the series, in order.
    pub fn months(&self) -> Vec<Month> {
        (0..self.values.len())
            .filter_map(|i| self.month_at(i))
            .collect()
    }

    pub fn points(&self) -> Vec<MonthlyPoint> {
        self.months()
            .into_iter()
            .zip(self.values.iter().copied())
            .map(|(month, value)| MonthlyPoint { month, value })
            .collect()
    }

    /// Keep the months whose month-end label lies in `start..=end`.
    pub fn filter_range(&self, start: NaiveDate, end: NaiveDate) -> MonthlySeries {
        let months = self.months();
        let first = months
            .iter()
            .position(|m| m.last_day() >= start && m.last_day() <= end);
        let Some(first) = first else {
            return Self::empty();
        };
        let count = months[first..]
            .iter()
            .take_while(|m| m.last_day() <= end)
            .count();
        Self::new(months[first], self.values[first..first + count].to_vec())
    }
}

impl From<MonthlySeries> for Vec<MonthlyPoint> {
    fn from(series: MonthlySeries) -> Self {
        series.points()
    }
}

impl TryFrom<Vec<MonthlyPoint>> for MonthlySeries {
    type Error = SeriesError;

    fn try_from(points: Vec<MonthlyPoint>) -> Result<Self, Self::Error> {
        Self::from_points(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn five_years() -> MonthlySeries {
        MonthlySeries::new(month(2018, 1), (0..60).map(|i| i as f64).collect())
    }

    #[test]
    fn end_and_month_at() {
        let s = MonthlySeries::new(month(2018, 11), vec![1.0, 2.0, 3.0]);
        assert_eq!(s.end(), Some(month(2019, 1)));
        assert_eq!(s.month_at(1), Some(month(2018, 12)));
        assert_eq!(s.month_at(3), None);
    }

    #[test]
    fn empty_values_have_no_start() {
        let s = MonthlySeries::new(month(2018, 1), vec![]);
        assert!(s.is_empty());
        assert_eq!(s.start(), None);
        assert_eq!(s.end(), None);
    }

    #[test]
    fn from_points_rejects_gaps() {
        let points = vec![
            MonthlyPoint { month: month(2018, 1), value: 1.0 },
            MonthlyPoint { month: month(2018, 3), value: 2.0 },
        ];
        assert!(matches!(
            MonthlySeries::from_points(&points),
            Err(SeriesError::NotContiguous { .. })
        ));
    }

    #[test]
    fn from_points_rejects_duplicates() {
        let points = vec![
            MonthlyPoint { month: month(2018, 1), value: 1.0 },
            MonthlyPoint { month: month(2018, 1), value: 2.0 },
        ];
        assert!(MonthlySeries::from_points(&points).is_err());
    }

    #[test]
    fn filter_range_is_inclusive_on_month_end_labels() {
        let s = five_years();
        let filtered = s.filter_range(date("2020-01-01"), date("2021-12-31"));
        assert_eq!(filtered.len(), 24);
        assert_eq!(filtered.start(), Some(month(2020, 1)));
        assert_eq!(filtered.end(), Some(month(2021, 12)));
        assert_eq!(filtered.values()[0], 24.0);
    }

    #[test]
    fn filter_range_excludes_month_whose_end_is_after_range() {
        let s = five_years();
        // Dec 2021 ends on the 31st, so a range ending on the 30th drops it.
        let filtered = s.filter_range(date("2020-01-01"), date("2021-12-30"));
        assert_eq!(filtered.end(), Some(month(2021, 11)));
    }

    #[test]
    fn filter_range_outside_data_is_empty() {
        let s = five_years();
        assert!(s.filter_range(date("2030-01-01"), date("2031-01-01")).is_empty());
        assert!(s.filter_range(date("2020-06-01"), date("2020-06-15")).is_empty());
    }

    #[test]
    fn serializes_as_point_list() {
        let s = MonthlySeries::new(month(2018, 1), vec![1.5, 2.5]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(
            json,
            r#"[{"month":"2018-01","value":1.5},{"month":"2018-02","value":2.5}]"#
        );
        let back: MonthlySeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
