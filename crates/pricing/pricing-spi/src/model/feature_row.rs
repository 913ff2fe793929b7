//! One engineered calendar day

use super::{FeatureColumn, Season, FEATURE_COUNT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Engineered features for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    /// Calendar day the features describe
    pub date: NaiveDate,
    pub minimum_nights: u32,
    pub maximum_nights: u32,
    /// Stand-in for a lagged price: the user supplied average price
    pub price_lag: f64,
    /// Monday = 0
    pub day_of_week: u32,
    pub month: u32,
    pub season: Season,
    pub quarter: u32,
    pub is_holiday: bool,
    pub day: u32,
    pub year: i32,
}

impl FeatureRow {
    /// Numeric value of one column
    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::MinimumNights => self.minimum_nights as f64,
            FeatureColumn::MaximumNights => self.maximum_nights as f64,
            FeatureColumn::PriceLag => self.price_lag,
            FeatureColumn::DayOfWeek => self.day_of_week as f64,
            FeatureColumn::Month => self.month as f64,
            FeatureColumn::Season => self.season.code() as f64,
            FeatureColumn::Quarter => self.quarter as f64,
            FeatureColumn::IsHoliday => {
                if self.is_holiday {
                    1.0
                } else {
                    0.0
                }
            }
            FeatureColumn::Day => self.day as f64,
            FeatureColumn::Year => self.year as f64,
        }
    }

    /// All column values in training order
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        FeatureColumn::ALL.map(|c| self.value(c))
    }
}
