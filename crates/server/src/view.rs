//! HTML page rendering

use crate::chart::LineChart;
use chrono::NaiveDate;
use handlebars::{Handlebars, RenderError, TemplateError};
use pricing_facade::{ForecastReport, ForecastRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;

const INDEX: &str = "index";

/// Input form values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictForm {
    pub avg_price: f64,
    pub min_nights: u32,
    pub max_nights: u32,
    pub start_date: NaiveDate,
}

impl PredictForm {
    /// Form as first shown: 100.0, 1 night, 7 nights, starting `today`
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            avg_price: 100.0,
            min_nights: 1,
            max_nights: 7,
            start_date: today,
        }
    }

    pub fn request(&self) -> ForecastRequest {
        ForecastRequest::new(
            self.start_date,
            self.avg_price,
            self.min_nights,
            self.max_nights,
        )
    }
}

/// Compiled page templates
pub struct Views {
    templates: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut templates = Handlebars::new();
        templates.register_template_string(INDEX, include_str!("../templates/index.hbs"))?;
        Ok(Self { templates })
    }

    /// The form alone
    pub fn form(&self, form: &PredictForm) -> Result<String, RenderError> {
        self.templates.render(INDEX, &json!({ "form": form }))
    }

    /// The form with the forecast table and chart
    pub fn report(&self, form: &PredictForm, report: &ForecastReport) -> Result<String, RenderError> {
        let chart = LineChart::prices(&report.dates(), &report.prices()).render();
        self.templates.render(
            INDEX,
            &json!({ "form": form, "report": report, "chart": chart }),
        )
    }

    /// The form with an inline error message
    pub fn error(&self, form: &PredictForm, message: &str) -> Result<String, RenderError> {
        self.templates
            .render(INDEX, &json!({ "form": form, "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use pricing_facade::Forecast;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn report() -> ForecastReport {
        let start = today();
        let forecast = Forecast {
            start_date: start,
            dates: (0..14).map(|i| start + Days::new(i)).collect(),
            prices: (0..14).map(|i| 90.0 + i as f64).collect(),
        };
        ForecastReport::from_forecast(&forecast, 7)
    }

    #[test]
    fn test_form_defaults() {
        let html = Views::new().unwrap().form(&PredictForm::defaults(today())).unwrap();
        assert!(html.contains(r#"value="2024-01-01""#));
        assert!(html.contains(r#"name="avg_price""#));
        assert!(html.contains("Predict Prices"));
        assert!(!html.contains("An error occurred"));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_price_input_accepts_any_amount() {
        let html = Views::new().unwrap().form(&PredictForm::defaults(today())).unwrap();
        let input = html
            .lines()
            .find(|line| line.contains(r#"name="avg_price""#))
            .unwrap();
        assert!(input.contains(r#"min="0""#));
        assert!(input.contains(r#"step="any""#));
        assert!(!input.contains(r#"step="10""#));
    }

    #[test]
    fn test_report_page() {
        let html = Views::new()
            .unwrap()
            .report(&PredictForm::defaults(today()), &report())
            .unwrap();
        assert!(html.contains("<th>Predicted Price</th>"));
        assert!(html.contains("<td>Day #1</td>"));
        assert!(html.contains("<td>Day #7</td>"));
        assert!(html.contains("<td>January 02, 2024</td>"));
        assert!(html.contains("<td>$90.00</td>"));
        assert!(html.contains("<td>Tuesday</td>"));
        assert!(html.contains("#4CAF50"));
        // Chart markup is inserted unescaped
        assert!(html.contains("<svg"));
        assert_eq!(html.matches("<circle").count(), 7);
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = Views::new()
            .unwrap()
            .error(&PredictForm::defaults(today()), "bad <input>")
            .unwrap();
        assert!(html.contains("An error occurred: bad &lt;input&gt;"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_form_request() {
        let form = PredictForm {
            avg_price: 80.0,
            min_nights: 2,
            max_nights: 9,
            start_date: today(),
        };
        let request = form.request();
        assert_eq!(request.avg_price, 80.0);
        assert_eq!(request.min_nights, 2);
        assert_eq!(request.max_nights, 9);
        assert_eq!(request.start_date, today());
    }
}
