//! Forecast request and result

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User inputs for one forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// First day of the feature window
    pub start_date: NaiveDate,
    /// Average nightly price, used as the price lag feature
    pub avg_price: f64,
    pub min_nights: u32,
    pub max_nights: u32,
}

impl ForecastRequest {
    pub fn new(start_date: NaiveDate, avg_price: f64, min_nights: u32, max_nights: u32) -> Self {
        Self {
            start_date,
            avg_price,
            min_nights,
            max_nights,
        }
    }
}

/// Model output aligned one-to-one with the input window dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub start_date: NaiveDate,
    /// Dates of the input window
    pub dates: Vec<NaiveDate>,
    /// One predicted price per window date
    pub prices: Vec<f64>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// The first `n` predictions (fewer when the forecast is shorter)
    pub fn leading(&self, n: usize) -> &[f64] {
        &self.prices[..n.min(self.prices.len())]
    }
}
