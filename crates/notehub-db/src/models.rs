//! Database row types — these map directly to SQLite rows.
//! Distinct from the notehub-types API models to keep the DB layer
//! independent; `into_*` conversions bridge the two.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use notehub_types::models::{Category, Inquiry, Note, NoteWithOwner, UserWithNoteCount};

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
    pub img: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct UserWithCountRow {
    pub user: UserRow,
    pub notes_count: u64,
}

pub struct NoteRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub file_name: String,
    pub user_id: String,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct NoteWithOwnerRow {
    pub note: NoteRow,
    pub owner_name: String,
    pub owner_email: String,
}

pub struct InquiryRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: String,
}

pub struct AdminRow {
    pub id: String,
    pub email: String,
    pub password: String,
}

/// Parse a stored uuid, falling back to the nil uuid on corrupt data.
pub(crate) fn parse_uuid(s: &str, context: &str) -> Uuid {
    s.parse().unwrap_or_else(|e| {
        warn!("Corrupt uuid '{}' in {}: {}", s, context, e);
        Uuid::default()
    })
}

/// Parse a stored timestamp. Rows written by this crate are RFC 3339; the
/// naive `YYYY-MM-DD HH:MM:SS` fallback covers values SQLite generated
/// itself.
pub(crate) fn parse_ts(s: &str, context: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' in {}: {}", s, context, e);
            DateTime::default()
        })
}

fn parse_category(s: &str, context: &str) -> Category {
    Category::parse(s).unwrap_or_else(|| {
        warn!("Unknown category '{}' in {}", s, context);
        Category::Notes
    })
}

impl NoteRow {
    pub fn into_note(self) -> Note {
        Note {
            user_id: parse_uuid(&self.user_id, "notes.user_id"),
            category: parse_category(&self.category, "notes.category"),
            created_at: parse_ts(&self.created_at, "notes.created_at"),
            updated_at: parse_ts(&self.updated_at, "notes.updated_at"),
            id: parse_uuid(&self.id, "notes.id"),
            title: self.title,
            file_name: self.file_name,
            is_deleted: self.is_deleted,
        }
    }
}

impl NoteWithOwnerRow {
    pub fn into_note(self) -> NoteWithOwner {
        let n = self.note;
        NoteWithOwner {
            id: parse_uuid(&n.id, "notes.id"),
            category: parse_category(&n.category, "notes.category"),
            user_id: parse_uuid(&n.user_id, "notes.user_id"),
            created_at: parse_ts(&n.created_at, "notes.created_at"),
            updated_at: parse_ts(&n.updated_at, "notes.updated_at"),
            title: n.title,
            file_name: n.file_name,
            is_deleted: n.is_deleted,
            owner_name: self.owner_name,
            owner_email: self.owner_email,
        }
    }
}

impl UserWithCountRow {
    pub fn into_user(self) -> UserWithNoteCount {
        let u = self.user;
        UserWithNoteCount {
            id: parse_uuid(&u.id, "users.id"),
            created_at: parse_ts(&u.created_at, "users.created_at"),
            first_name: u.first_name,
            username: u.username,
            email: u.email,
            profile_image: u.img,
            notes_count: self.notes_count,
        }
    }
}

impl InquiryRow {
    pub fn into_inquiry(self) -> Inquiry {
        Inquiry {
            id: parse_uuid(&self.id, "inquiries.id"),
            created_at: parse_ts(&self.created_at, "inquiries.created_at"),
            name: self.name,
            email: self.email,
            subject: self.subject,
            message: self.message,
        }
    }
}
