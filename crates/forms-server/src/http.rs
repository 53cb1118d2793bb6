//! HTTP surface of the form service.
//!
//! One route per template plus the email forwarder. Validation
//! failures map to 400 with the message the intake clients already
//! display; anything that goes wrong past validation is a 500 with a
//! generic body, details going to the log only.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use forms_core::fill::{FormFiller, TemplateSource};
use forms_core::mapper::map_fields;
use forms_core::report::{
    render_value, AuditReportRequest, Form1728Request, IndividualSurveyRequest,
};
use forms_core::{FormError, ReportKind};

use crate::email::{EmailClient, EmailRequest};

/// Headers the browser clients send on fill requests.
const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<dyn TemplateSource>,
    pub filler: Arc<dyn FormFiller>,
    pub email: EmailClient,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/fill-audit-report", post(fill_audit_report))
        .route("/fill-form-1728", post(fill_form_1728))
        .route("/fill-individual-survey", post(fill_individual_survey))
        .route("/fill-audit-report-test", post(fill_audit_report_test))
        .route("/send-email", post(send_email))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

/// Browser clients call these routes cross-origin, so every response
/// carries the allow-origin header and preflights short-circuit here.
async fn cors_middleware(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return (
            StatusCode::NO_CONTENT,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
                (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            ],
        )
            .into_response();
    }
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Request failure, split by whose fault it is.
enum ApiError {
    Validation(String),
    Internal(anyhow::Error),
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        if err.is_validation() {
            ApiError::Validation(err.to_string())
        } else {
            ApiError::Internal(err.into())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "fill request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fill PDF").into_response()
            }
        }
    }
}

fn pdf_response(file_name: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={file_name}"),
            ),
        ],
        bytes,
    )
        .into_response()
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn fill_audit_report(
    State(state): State<AppState>,
    Json(req): Json<AuditReportRequest>,
) -> Result<Response, ApiError> {
    let (period, year) = req.validate()?;
    let payload = map_fields(AuditReportRequest::scheme(period), &req.logical_values()?);
    let template = state.templates.template(ReportKind::Audit).await?;
    let bytes = state.filler.fill(&template, &payload).await?;
    tracing::info!(period = %period, fields = payload.len(), "audit report filled");
    Ok(pdf_response(&req.file_name(period, year), bytes))
}

async fn fill_form_1728(
    State(state): State<AppState>,
    Json(req): Json<Form1728Request>,
) -> Result<Response, ApiError> {
    req.validate()?;
    let payload = map_fields(Form1728Request::scheme(), &req.logical_values());
    let template = state.templates.template(ReportKind::Form1728).await?;
    let bytes = state.filler.fill(&template, &payload).await?;
    Ok(pdf_response(req.file_name(), bytes))
}

async fn fill_individual_survey(
    State(state): State<AppState>,
    Json(req): Json<IndividualSurveyRequest>,
) -> Result<Response, ApiError> {
    let year = req.validate()?;
    let file_name = req.file_name(year);
    let payload = req.field_values()?;
    let template = state.templates.template(ReportKind::IndividualSurvey).await?;
    let bytes = state.filler.fill(&template, &payload).await?;
    Ok(pdf_response(&file_name, bytes))
}

/// Maintenance route: every body key is treated as a field id and
/// filled verbatim against the audit template. Ids the template does
/// not carry are ignored downstream.
async fn fill_audit_report_test(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Response, ApiError> {
    tracing::info!(fields = body.len(), "raw fill against audit template");
    let payload: Vec<(String, String)> = body
        .iter()
        .map(|(k, v)| (k.clone(), render_value(v)))
        .collect();
    let template = state.templates.template(ReportKind::Audit).await?;
    let bytes = state.filler.fill(&template, &payload).await?;
    Ok(pdf_response("filled_audit_test.pdf", bytes))
}

async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<EmailRequest>,
) -> Response {
    let (to, subject, body, request_id) = match req.validate() {
        Ok(fields) => fields,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response();
        }
    };
    match state.email.send(to, subject, body, request_id).await {
        Ok(message) => {
            (StatusCode::OK, Json(json!({ "success": true, "message": message }))).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, request_id, "email delivery failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
