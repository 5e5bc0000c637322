use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use notehub_types::api::{Ack, NotesResponse, SetTrashRequest, UploadNoteResponse, UserClaims};
use notehub_types::models::Category;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::storage::Storage;

/// 50 MB upload limit for note files
pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

/// GET /api/users/notes/user/{userId} — every note the user owns, newest
/// first, trashed included. The client splits active and trash views
/// locally.
pub async fn list_user_notes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Extension(_claims): Extension<UserClaims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let rows = tokio::task::spawn_blocking(move || db.db.notes_by_user(&uid))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(NotesResponse {
        success: true,
        notes: rows.into_iter().map(|r| r.into_note()).collect(),
    }))
}

/// POST /api/users/upload-note — multipart form with `title`, `category`,
/// optional `userId` and the `file` part. The blob lands in storage under a
/// generated name; the note row references that name.
pub async fn upload_note(
    State(state): State<AppState>,
    Extension(claims): Extension<UserClaims>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut title = String::new();
    let mut category_raw = String::new();
    let mut body_user_id: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = field.text().await.map_err(bad_multipart)?,
            "category" => category_raw = field.text().await.map_err(bad_multipart)?,
            "userId" => body_user_id = Some(field.text().await.map_err(bad_multipart)?),
            "file" => {
                let original = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((original, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (original_name, bytes) = file.ok_or_else(|| ApiError::validation("No file was attached"))?;
    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::validation("File exceeds the upload size limit"));
    }

    let title = title.trim().to_string();
    let category = Category::parse(&category_raw);
    if title.is_empty() || category.is_none() {
        return Err(ApiError::validation(
            "A valid title and category are required",
        ));
    }
    let category = category.unwrap();

    // Owner comes from the form body when present, else from the token the
    // middleware already verified.
    let owner_id: Uuid = match body_user_id.filter(|s| !s.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ApiError::validation("Invalid user reference"))?,
        None => claims.sub,
    };

    let stored_name = state.storage.store(&original_name, &bytes).await?;

    let db = state.clone();
    let note_id = Uuid::new_v4().to_string();
    let uid = owner_id.to_string();
    let cat = category.as_str().to_string();
    let fname = stored_name.clone();
    let note_title = title.clone();
    let row = tokio::task::spawn_blocking(move || {
        db.db.insert_note(&note_id, &note_title, &cat, &fname, &uid)
    })
    .await
    .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))?;

    let row = match row {
        Ok(row) => row,
        Err(e) => {
            // The blob is already on disk; don't leave it orphaned when the
            // row insert fails (e.g. unknown owner).
            if let Err(del) = state.storage.delete(&stored_name).await {
                warn!("Failed to remove blob {} after insert error: {}", stored_name, del);
            }
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadNoteResponse {
            success: true,
            message: "Document uploaded and saved successfully".to_string(),
            note: row.into_note(),
        }),
    ))
}

/// PATCH /api/users/notes/trash/{id} — idempotent soft-delete flag write.
pub async fn set_trash_status(
    State(state): State<AppState>,
    Path(note_id): Path<Uuid>,
    Json(req): Json<SetTrashRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let id = note_id.to_string();
    tokio::task::spawn_blocking(move || db.db.set_trash_status(&id, req.is_deleted))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    let message = if req.is_deleted {
        "Item moved to trash successfully"
    } else {
        "Item restored successfully"
    };
    Ok(Json(Ack {
        success: true,
        message: message.to_string(),
    }))
}

/// DELETE /api/users/notes/{id} — unconditional permanent delete; a missing
/// id still succeeds.
pub async fn delete_permanently(
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
        message: "Note permanently removed from database".to_string(),
    }))
}

/// DELETE /api/users/notes/trash/empty/{userId} — drop the user's flagged
/// notes only.
pub async fn empty_trash(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let files = tokio::task::spawn_blocking(move || db.db.empty_trash_for_user(&uid))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    remove_blobs(&state.storage, &files).await;

    Ok(Json(Ack {
        success: true,
        message: "Trash folder cleared successfully".to_string(),
    }))
}

/// POST /api/users/notes/trash/restore-all/{userId}
pub async fn restore_all_trash(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    tokio::task::spawn_blocking(move || db.db.restore_trash_for_user(&uid))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    Ok(Json(Ack {
        success: true,
        message: "All items in trash have been restored".to_string(),
    }))
}

/// Best-effort blob removal after row deletes; failures are logged, never
/// surfaced.
pub(crate) async fn remove_blobs(storage: &Storage, files: &[String]) {
    for file in files {
        if let Err(e) = storage.delete(file).await {
            warn!("Failed to remove blob {}: {}", file, e);
        }
    }
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::validation(format!("Malformed upload body: {}", e))
}
