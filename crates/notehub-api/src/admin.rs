use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use notehub_types::api::{
    Ack, InquiriesResponse, NotesWithOwnerResponse, StatsResponse, UsersResponse,
};
use notehub_types::models::{Category, Stats};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::notes::remove_blobs;

/// GET /api/admin/all-users — every user with a derived count of their
/// active notes, newest first.
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_users_with_note_counts())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(UsersResponse {
        success: true,
        users: rows.into_iter().map(|r| r.into_user()).collect(),
    }))
}

/// DELETE /api/admin/user/{id} — remove the user and cascade-delete their
/// notes in one transaction, then clean up the blobs.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let files = tokio::task::spawn_blocking(move || db.db.delete_user_cascade(&uid))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    remove_blobs(&state.storage, &files).await;

    Ok(Json(Ack {
        success: true,
        message: "User and related notes deleted successfully".to_string(),
    }))
}

/// GET /api/admin/all-notes — active notes joined with owner name/email.
/// Also mounted unauthenticated at /api/public/notes for the browse
/// catalog.
pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.active_notes_with_owner())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(NotesWithOwnerResponse {
        success: true,
        notes: rows.into_iter().map(|r| r.into_note()).collect(),
    }))
}

/// PATCH /api/admin/trash-note/{id}
pub async fn trash_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = note_id.to_string();
    let found = tokio::task::spawn_blocking(move || db.db.set_trash_status(&id, true))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    if !found {
        return Err(ApiError::not_found("Note not found"));
    }

    Ok(Json(Ack {
        success: true,
        message: "Note moved to trash".to_string(),
    }))
}

/// PATCH /api/admin/restore-note/{id} — idempotent, missing ids included.
pub async fn restore_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = note_id.to_string();
    tokio::task::spawn_blocking(move || db.db.set_trash_status(&id, false))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(Ack {
        success: true,
        message: "Note restored".to_string(),
    }))
}

/// DELETE /api/admin/note-delete/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = note_id.to_string();
    let file = tokio::task::spawn_blocking(move || db.db.delete_note(&id))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    if let Some(file) = file {
        remove_blobs(&state.storage, &[file]).await;
    }

    Ok(Json(Ack {
        success: true,
        message: "Note permanently deleted".to_string(),
    }))
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let stats = tokio::task::spawn_blocking(move || {
        Ok::<_, anyhow::Error>(Stats {
            total_notes: db.db.count_notes(false)?,
            trash_count: db.db.count_notes(true)?,
            total_users: db.db.count_users()?,
            message_count: db.db.count_inquiries()?,
            total_categories: Category::ALL.len() as u64,
        })
    })
    .await
    .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}

/// GET /api/admin/queries
pub async fn list_inquiries(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_inquiries())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(InquiriesResponse {
        success: true,
        queries: rows.into_iter().map(|r| r.into_inquiry()).collect(),
    }))
}

/// DELETE /api/admin/query/{id} — idempotent.
pub async fn delete_inquiry(
    State(state): State<AppState>,
    Path(inquiry_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = inquiry_id.to_string();
    tokio::task::spawn_blocking(move || db.db.delete_inquiry(&id))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(Ack {
        success: true,
        message: "Query deleted".to_string(),
    }))
}

/// GET /api/admin/trash-notes — flagged notes joined with owner, most
/// recently touched first.
pub async fn list_trash(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.trashed_notes_with_owner())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(NotesWithOwnerResponse {
        success: true,
        notes: rows.into_iter().map(|r| r.into_note()).collect(),
    }))
}

/// DELETE /api/admin/empty-trash — drop every flagged note, any owner.
pub async fn empty_all_trash(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let files = tokio::task::spawn_blocking(move || db.db.empty_all_trash())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    remove_blobs(&state.storage, &files).await;

    Ok(Json(Ack {
        success: true,
        message: "Trash cleared".to_string(),
    }))
}

/// POST /api/admin/restore-all-trash
pub async fn restore_all_trash(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.restore_all_trash())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(Ack {
        success: true,
        message: "All notes restored".to_string(),
    }))
}
