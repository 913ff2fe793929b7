//! User-facing forecast report
//!
//! Turns a [`Forecast`] into the rows shown to the user: the leading
//! predictions, each labelled with the day after its window position.

use chrono::{Days, NaiveDate};
use pricing_core::Forecast;
use serde::Serialize;
use std::fmt::Write;

/// One displayed day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// "Day #1", "Day #2", ...
    pub label: String,
    pub date: NaiveDate,
    /// e.g. "January 02, 2024"
    pub date_display: String,
    pub price: f64,
    /// e.g. "$123.45"
    pub price_display: String,
    /// e.g. "Tuesday"
    pub weekday: String,
}

/// Rows surfaced from one forecast
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub start_date: NaiveDate,
    pub rows: Vec<ReportRow>,
    /// Every model output, including the ones not displayed
    pub raw_predictions: Vec<f64>,
}

/// "Month DD, YYYY"
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// "$X.XX"
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Full English weekday name
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

impl ForecastReport {
    /// Surface the first `horizon` predictions.
    ///
    /// Row `i` shows prediction `i` dated `start_date + i + 1`.
    pub fn from_forecast(forecast: &Forecast, horizon: usize) -> Self {
        let rows = forecast
            .leading(horizon)
            .iter()
            .enumerate()
            .map_while(|(i, &price)| {
                let date = forecast
                    .start_date
                    .checked_add_days(Days::new(i as u64 + 1))?;
                Some(ReportRow {
                    label: format!("Day #{}", i + 1),
                    date,
                    date_display: format_date(date),
                    price,
                    price_display: format_price(price),
                    weekday: weekday_name(date),
                })
            })
            .collect();

        Self {
            start_date: forecast.start_date,
            rows,
            raw_predictions: forecast.prices.clone(),
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price).collect()
    }

    /// Plain-text table for terminals
    pub fn to_text_table(&self) -> String {
        let date_width = self
            .rows
            .iter()
            .map(|r| r.date_display.len())
            .max()
            .unwrap_or(0)
            .max("Date".len());
        let price_width = self
            .rows
            .iter()
            .map(|r| r.price_display.len())
            .max()
            .unwrap_or(0)
            .max("Predicted Price".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<7}  {:<dw$}  {:>pw$}  {}",
            "",
            "Date",
            "Predicted Price",
            "Day of the Week",
            dw = date_width,
            pw = price_width
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<7}  {:<dw$}  {:>pw$}  {}",
                row.label,
                row.date_display,
                row.price_display,
                row.weekday,
                dw = date_width,
                pw = price_width
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn forecast() -> Forecast {
        let start = date(2024, 1, 1);
        Forecast {
            start_date: start,
            dates: (0..14).map(|i| start + Days::new(i)).collect(),
            prices: (0..14).map(|i| 100.0 + i as f64 * 1.5).collect(),
        }
    }

    #[test]
    fn test_surfaces_first_seven() {
        let report = ForecastReport::from_forecast(&forecast(), 7);
        assert_eq!(report.rows.len(), 7);
        assert_eq!(report.raw_predictions.len(), 14);
        assert_eq!(report.prices(), forecast().prices[..7].to_vec());
    }

    #[test]
    fn test_dates_are_offset_by_one_day() {
        let report = ForecastReport::from_forecast(&forecast(), 7);
        let expected: Vec<NaiveDate> = (1..=7).map(|d| date(2024, 1, 1 + d)).collect();
        assert_eq!(report.dates(), expected);
    }

    #[test]
    fn test_row_formatting() {
        let report = ForecastReport::from_forecast(&forecast(), 7);
        let first = &report.rows[0];
        assert_eq!(first.label, "Day #1");
        assert_eq!(first.date_display, "January 02, 2024");
        assert_eq!(first.price_display, "$100.00");
        assert_eq!(first.weekday, "Tuesday");

        let last = &report.rows[6];
        assert_eq!(last.label, "Day #7");
        assert_eq!(last.date_display, "January 08, 2024");
        assert_eq!(last.price_display, "$109.00");
        assert_eq!(last.weekday, "Monday");
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(99.999), "$100.00");
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(-3.456), "$-3.46");
    }

    #[test]
    fn test_short_forecast() {
        let mut short = forecast();
        short.prices.truncate(3);
        let report = ForecastReport::from_forecast(&short, 7);
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn test_text_table() {
        let table = ForecastReport::from_forecast(&forecast(), 7).to_text_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("Predicted Price"));
        assert!(lines[0].contains("Day of the Week"));
        assert!(lines[1].starts_with("Day #1"));
        assert!(lines[1].contains("January 02, 2024"));
        assert!(lines[1].contains("$100.00"));
        assert!(lines[1].ends_with("Tuesday"));
    }
}
