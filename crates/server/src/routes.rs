//! Route handlers

use crate::view::PredictForm;
use crate::AppState;
use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use chrono::{Local, NaiveDate};
use pricing_facade::{ForecastReport, ForecastRequest, PricingError, ReportRow};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub model: String,
    pub scaler_source: String,
    pub start_date: NaiveDate,
    pub rows: Vec<ReportRow>,
    pub predictions: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON error with its status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        let status = match &err {
            PricingError::InvalidParameter { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Forecast on the blocking pool so the forward pass never holds a runtime worker
async fn run_forecast(
    state: &AppState,
    request: ForecastRequest,
) -> Result<(ForecastReport, String), ApiError> {
    let registry = Arc::clone(&state.registry);
    let horizon_days = state.horizon_days;
    tokio::task::spawn_blocking(move || -> pricing_facade::Result<(ForecastReport, String)> {
        let predictor = registry.get()?;
        let forecast = predictor.forecast(&request)?;
        let report = ForecastReport::from_forecast(&forecast, horizon_days);
        Ok((report, predictor.metadata().name.clone()))
    })
    .await
    .map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Forecast task failed: {}", e),
        )
    })?
    .map_err(ApiError::from)
}

fn page(rendered: Result<String, handlebars::RenderError>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Form with default inputs
pub async fn index(State(state): State<AppState>) -> Response {
    page(state.views.form(&PredictForm::defaults(today())))
}

/// Form submission; failures render inline on the same page
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> Response {
    let rendered = match form {
        Ok(Form(form)) => match run_forecast(&state, form.request()).await {
            Ok((report, _)) => state.views.report(&form, &report),
            Err(e) => {
                warn!("Prediction failed: {}", e.message);
                state.views.error(&form, &e.message)
            }
        },
        Err(rejection) => {
            warn!("Rejected form submission: {}", rejection);
            state
                .views
                .error(&PredictForm::defaults(today()), &rejection.body_text())
        }
    };
    page(rendered)
}

pub async fn forecast(
    State(state): State<AppState>,
    body: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(request) = body?;
    let (report, model) = run_forecast(&state, request).await?;
    Ok(Json(ForecastResponse {
        model,
        scaler_source: state.registry.scaler_source().to_string(),
        start_date: report.start_date,
        rows: report.rows,
        predictions: report.raw_predictions,
    }))
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - is the model loaded?
pub async fn readiness(State(state): State<AppState>) -> Response {
    let status = if state.registry.is_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = serde_json::json!({
        "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "model_path": state.registry.path().display().to_string(),
        "scaler_source": state.registry.scaler_source().to_string(),
    });
    (status, Json(body)).into_response()
}
