use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use notehub_types::api::UpdateProfileResponse;
use notehub_types::models::UserProfile;

use crate::error::ApiError;
use crate::auth::AppState;
use crate::password;

/// POST /api/users/update-profile — multipart form with `userId`,
/// `currentPassword` and any of `firstName`, `newPassword`, `profileImage`.
/// Every change, image-only included, re-authenticates against the current
/// password.
pub async fn update_profile(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut user_id = String::new();
    let mut first_name = String::new();
    let mut current_password = String::new();
    let mut new_password = String::new();
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "userId" => user_id = field.text().await.map_err(bad_multipart)?,
            "firstName" => first_name = field.text().await.map_err(bad_multipart)?,
            "currentPassword" => current_password = field.text().await.map_err(bad_multipart)?,
            "newPassword" => new_password = field.text().await.map_err(bad_multipart)?,
            "profileImage" => {
                let original = field.file_name().unwrap_or("profile").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                image = Some((original, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let user_id: Uuid = user_id
        .trim()
        .parse()
        .map_err(|_| ApiError::validation("Invalid user reference"))?;

    let user = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or_else(|| ApiError::not_found("Target user profile not found"))?;

    if !password::verify(&current_password, &user.password)? {
        return Err(ApiError::unauthorized(
            "Verification failed: Current password is incorrect",
        ));
    }

    let first_name = {
        let trimmed = first_name.trim();
        if trimmed.is_empty() {
            user.first_name.clone()
        } else {
            trimmed.to_string()
        }
    };

    // Password changes only apply when the new one clears the length floor.
    let password_hash = if new_password.trim().len() >= 6 {
        password::hash(new_password.trim())?
    } else {
        user.password.clone()
    };

    let img = match image {
        Some((original, bytes)) => state.storage.store(&original, &bytes).await?,
        None => user.img.clone(),
    };

    state
        .db
        .update_user(&user_id.to_string(), &first_name, &password_hash, &img)?;

    info!("Profile updated for user {}", user_id);

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: "User profile updated successfully".to_string(),
        user: UserProfile {
            id: user_id,
            first_name,
            email: user.email,
            profile_image: img,
        },
    }))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::validation(format!("Malformed upload body: {}", e))
}
