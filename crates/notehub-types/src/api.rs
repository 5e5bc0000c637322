use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Inquiry, Note, NoteWithOwner, Stats, UserProfile, UserWithNoteCount};

// -- JWT Claims --

/// Claims carried by a logged-in user's token. Canonical definition lives
/// here so the API middleware and the client agree on the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

/// Claims carried by an admin token. No identity reference, only the role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub role: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub first_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

// -- Generic envelope --

/// The plain `{ success, message }` acknowledgement used by writes that
/// return no payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

// -- Notes --

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetTrashRequest {
    pub is_deleted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesResponse {
    pub success: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotesWithOwnerResponse {
    pub success: bool,
    pub notes: Vec<NoteWithOwner>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadNoteResponse {
    pub success: bool,
    pub message: String,
    pub note: Note,
}

// -- Profile --

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
}

// -- Contact --

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

// -- Admin --

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserWithNoteCount>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Stats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InquiriesResponse {
    pub success: bool,
    pub queries: Vec<Inquiry>,
}
