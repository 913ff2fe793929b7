//! Window of engineered feature rows

use super::{FeatureColumn, FeatureRow, FEATURE_COUNT};
use chrono::NaiveDate;
use ndarray::{Array2, Array3};
use serde::{Deserialize, Serialize};

/// Consecutive engineered days forming one model input window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(rows: Vec<FeatureRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// Number of rows (days)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Dates of every row
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// All values of one column
    pub fn column(&self, column: FeatureColumn) -> Vec<f64> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }

    /// `(rows, FEATURE_COUNT)` matrix in training column order
    pub fn to_matrix(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows.len(), FEATURE_COUNT), |(i, j)| {
            self.rows[i].value(FeatureColumn::ALL[j])
        })
    }

    /// `(1, rows, FEATURE_COUNT)` batch of one sequence
    pub fn to_batch(&self) -> Array3<f64> {
        self.to_matrix().insert_axis(ndarray::Axis(0))
    }
}

impl From<Vec<FeatureRow>> for FeatureTable {
    fn from(rows: Vec<FeatureRow>) -> Self {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Season;

    fn row(day: u32) -> FeatureRow {
        FeatureRow {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            minimum_nights: 1,
            maximum_nights: 7,
            price_lag: 100.0,
            day_of_week: (day + 3) % 7,
            month: 3,
            season: Season::Spring,
            quarter: 1,
            is_holiday: false,
            day,
            year: 2024,
        }
    }

    #[test]
    fn test_matrix_shape_and_values() {
        let table = FeatureTable::new((1..=3).map(row).collect());
        let matrix = table.to_matrix();
        assert_eq!(matrix.dim(), (3, FEATURE_COUNT));
        assert_eq!(matrix[[2, FeatureColumn::Day.index()]], 3.0);
        assert_eq!(matrix[[0, FeatureColumn::PriceLag.index()]], 100.0);
    }

    #[test]
    fn test_batch_adds_leading_axis() {
        let table = FeatureTable::new((1..=14).map(row).collect());
        assert_eq!(table.to_batch().dim(), (1, 14, FEATURE_COUNT));
    }

    #[test]
    fn test_column_extraction() {
        let table = FeatureTable::new((1..=4).map(row).collect());
        assert_eq!(table.column(FeatureColumn::Day), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(table.dates().len(), 4);
    }

    #[test]
    fn test_empty_table() {
        let table = FeatureTable::new(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.to_matrix().dim(), (0, FEATURE_COUNT));
    }
}
