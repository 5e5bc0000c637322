use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

use notehub_types::api::{Ack, ContactRequest};

use crate::auth::AppState;
use crate::error::ApiError;

/// POST /api/users/contact — store a contact-form inquiry for the admin
/// dashboard. Inquiries are never mutated afterwards.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    let email = req.email.trim();
    let subject = req.subject.trim();
    let message = req.message.trim();

    if name.is_empty() || email.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(ApiError::validation("All fields are required"));
    }

    state
        .db
        .insert_inquiry(&Uuid::new_v4().to_string(), name, email, subject, message)?;

    Ok((
        StatusCode::CREATED,
        Json(Ack {
            success: true,
            message: "Inquiry sent successfully".to_string(),
        }),
    ))
}
