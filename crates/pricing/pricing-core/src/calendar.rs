//! Calendar feature engineering
//!
//! Expands a start date and three listing inputs into a fixed window of
//! engineered feature rows.

use chrono::{Datelike, Days, NaiveDate};
use pricing_spi::{FeatureRow, FeatureTable, ForecastRequest, PricingError, Result, Season};

/// Days in one model input window
pub const WINDOW_DAYS: usize = 14;

/// Holidays as (month, day), matched regardless of year
pub const HOLIDAYS: [(u32, u32); 9] = [
    (1, 1),
    (2, 14),
    (7, 4),
    (11, 11),
    (11, 23),
    (11, 27),
    (11, 28),
    (12, 25),
    (12, 31),
];

/// Whether the date's month-day is in [`HOLIDAYS`]
pub fn is_holiday(date: NaiveDate) -> bool {
    HOLIDAYS.contains(&(date.month(), date.day()))
}

/// Calendar quarter (1-4) of a month (1-12)
pub fn quarter(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// Builds feature windows of a fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureEngineer {
    window: usize,
}

impl FeatureEngineer {
    pub fn new() -> Self {
        Self {
            window: WINDOW_DAYS,
        }
    }

    /// Engineer with a non-standard window length
    pub fn with_window(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Dates covered by a window starting at `start`
    pub fn window_dates(&self, start: NaiveDate) -> Result<Vec<NaiveDate>> {
        (0..self.window as u64)
            .map(|offset| {
                start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                    PricingError::invalid_parameter(
                        "start_date",
                        format!("{} + {} days is outside the supported calendar", start, offset),
                    )
                })
            })
            .collect()
    }

    /// Engineer one row per window day.
    ///
    /// Inputs are not range checked; `min_nights`, `max_nights` and
    /// `avg_price` are broadcast unchanged to every row.
    pub fn generate(
        &self,
        start_date: NaiveDate,
        avg_price: f64,
        min_nights: u32,
        max_nights: u32,
    ) -> Result<FeatureTable> {
        let rows = self
            .window_dates(start_date)?
            .into_iter()
            .map(|date| FeatureRow {
                date,
                minimum_nights: min_nights,
                maximum_nights: max_nights,
                price_lag: avg_price,
                day_of_week: date.weekday().num_days_from_monday(),
                month: date.month(),
                season: Season::from_month(date.month()),
                quarter: quarter(date.month()),
                is_holiday: is_holiday(date),
                day: date.day(),
                year: date.year(),
            })
            .collect::<Vec<_>>();
        Ok(FeatureTable::new(rows))
    }

    /// [`FeatureEngineer::generate`] driven by a request
    pub fn generate_for(&self, request: &ForecastRequest) -> Result<FeatureTable> {
        self.generate(
            request.start_date,
            request.avg_price,
            request.min_nights,
            request.max_nights,
        )
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}
