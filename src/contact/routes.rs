//! REST endpoint relaying contact form submissions by email.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Datelike;
use serde_json::Value;
use tracing::{error, info, warn};

use super::mailer::{Mailer, OutgoingEmail};
use super::request::ContactRequest;
use super::template::{self, EmailContext};
use crate::error::RequestError;
use crate::storage::{AssetSigner, signed_logo_url};

pub const SUCCESS_MESSAGE: &str =
    "Request sent successfully. We'll get back to you within 24 hours.";

/// Shared state for the contact route.
#[derive(Clone)]
pub struct ContactRouteState {
    pub mailer: Arc<dyn Mailer>,
    /// Signs the logo URL. `None` sends emails without a logo.
    pub signer: Option<Arc<dyn AssetSigner>>,
    pub company_name: String,
    pub logo_name: Option<String>,
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RequestError::InvalidSubject(_) => (StatusCode::BAD_REQUEST, "Invalid request subject"),
            RequestError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "Invalid request body"),
            RequestError::Transport(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error processing the request")
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// POST /api/sendRequest
///
/// Accepts `{"subject": "Holobox Request" | "Workshop Booking Request", ...}`
/// and emails it to the fixed recipient.
async fn send_request(
    State(state): State<ContactRouteState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, RequestError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "Rejected contact request body");
        RequestError::InvalidBody(e.body_text())
    })?;

    let request = ContactRequest::from_json(body).inspect_err(|e| {
        warn!(error = %e, "Rejected contact request");
    })?;

    let logo_url = signed_logo_url(state.signer.as_deref(), state.logo_name.as_deref());
    let html = template::render(
        &request,
        &EmailContext {
            company_name: &state.company_name,
            logo_url: logo_url.as_deref(),
            year: chrono::Utc::now().year(),
        },
    );

    let email = OutgoingEmail {
        subject: request.subject().to_string(),
        html,
    };
    state.mailer.send(email).await.map_err(|e| {
        error!(subject = request.subject(), error = %e, "Failed to send contact email");
        RequestError::Transport(e)
    })?;

    info!(subject = request.subject(), "Contact request relayed");
    Ok(Json(serde_json::json!({
        "success": true,
        "message": SUCCESS_MESSAGE,
    })))
}

/// Build the contact routes.
pub fn contact_routes(state: ContactRouteState) -> Router {
    Router::new()
        .route("/api/sendRequest", post(send_request))
        .with_state(state)
}
