//! The `/generate` endpoint: one enquiry in, one dispatched report out.
//!
//! Validation runs before any provider spend: a blank query or an empty
//! recipient roster rejects the request while it is still cheap. After
//! that the stages run in a fixed order (retrieve, generate, structure,
//! render, write, dispatch) and each failure maps to one status code.

use std::path::Path;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use chrono_tz::Europe::London;
use ledgerbrief_core::delivery::DeliveryJob;
use ledgerbrief_core::enquiry::Enquiry;
use ledgerbrief_delivery::build_recipients;
use ledgerbrief_pipeline::structure;
use ledgerbrief_render::{
    document_path, plan_document, render_pdf, write_document, COPYRIGHT, DISCLAIMER,
};
use serde::Serialize;
use tracing::{error, info};

use crate::SharedState;

/// Characters of retrieved context echoed back to the caller.
const PREVIEW_CHARS: usize = 200;

const SUCCESS_MESSAGE: &str = "AI response generated, reviewed and dispatched by email.";

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub disclaimer: &'static str,
    pub copyright: &'static str,
    pub context_preview: String,
    pub delivery_status: u16,
    pub delivery_response: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type Rejection = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, error: impl Into<String>) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

pub async fn generate_handler(
    State(state): State<SharedState>,
    payload: Result<Json<Enquiry>, JsonRejection>,
) -> Result<Json<GenerateResponse>, Rejection> {
    let Json(enquiry) = payload
        .map_err(|_| reject(StatusCode::BAD_REQUEST, "Invalid JSON input"))?;

    if enquiry.query.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Query text is required."));
    }

    // Delivery is the whole point of a report. Refuse before spending
    // provider tokens when there is nobody to send it to.
    let recipients = build_recipients(&enquiry).map_err(|_| {
        reject(
            StatusCode::BAD_REQUEST,
            "No valid email addresses provided.",
        )
    })?;

    let submitted_at = Utc::now();
    let submitted_stamp = submitted_at.format("%Y-%m-%d %H:%M:%S").to_string();
    info!(
        requester = %enquiry.full_name,
        discipline = %enquiry.discipline,
        recipients = recipients.len(),
        "Enquiry accepted"
    );

    let context = state.retriever.retrieve(&enquiry.query).await;

    let answer_text = state
        .generator
        .respond(&enquiry, &context.joined())
        .await
        .map_err(|e| {
            error!(error = %e, "Generation failed");
            reject(StatusCode::BAD_GATEWAY, e.to_string())
        })?;

    let answer = structure(&answer_text);

    let generated_at = Utc::now().with_timezone(&London);
    let blocks = plan_document(&answer, &enquiry.query, &enquiry.full_name, generated_at);
    let title = format!("Response for {}", enquiry.full_name);
    let document = render_pdf(&title, &blocks).map_err(|e| {
        error!(error = %e, "Document rendering failed");
        reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let path = document_path(
        Path::new(&state.config.output.dir),
        &enquiry.discipline,
        &enquiry.full_name,
        submitted_at,
    );
    write_document(&path, &document).map_err(|e| {
        error!(error = %e, "Document write failed");
        reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let attachment_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("report.pdf")
        .to_string();

    let job = DeliveryJob {
        recipients,
        subject: format!("AI Analysis for {} - {}", enquiry.full_name, submitted_stamp),
        requester: enquiry.full_name.clone(),
        submitted_at: submitted_stamp,
        attachment_name,
        document,
    };

    let receipt = state.dispatcher.dispatch(&job).await.map_err(|e| {
        error!(error = %e, "Mail dispatch failed");
        reject(StatusCode::BAD_GATEWAY, e.to_string())
    })?;

    info!(
        vendor_status = receipt.status_code,
        path = %path.display(),
        "Report dispatched"
    );

    Ok(Json(GenerateResponse {
        status: "ok",
        message: SUCCESS_MESSAGE,
        disclaimer: DISCLAIMER,
        copyright: COPYRIGHT,
        context_preview: context.preview(PREVIEW_CHARS),
        delivery_status: receipt.status_code,
        delivery_response: receipt.body,
    }))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
