use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of note categories. Stored as plain text in the database;
/// parsed back through [`Category::parse`] when rows are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Notes,
    Assignments,
    Papers,
    Books,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Notes,
        Category::Assignments,
        Category::Papers,
        Category::Books,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Notes => "Notes",
            Category::Assignments => "Assignments",
            Category::Papers => "Papers",
            Category::Books => "Books",
        }
    }

    /// Case-insensitive lookup against the fixed set.
    pub fn parse(s: &str) -> Option<Category> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub file_name: String,
    pub user_id: Uuid,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A note joined with its owner's name and email, as shown on the admin
/// dashboard and the public browse catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteWithOwner {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub file_name: String,
    pub user_id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The minimal user projection returned by login and profile updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub first_name: String,
    pub email: String,
    pub profile_image: String,
}

/// A user as listed on the admin dashboard, with a derived count of their
/// active (non-trashed) notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithNoteCount {
    pub id: Uuid,
    pub first_name: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub notes_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_notes: u64,
    pub total_users: u64,
    pub message_count: u64,
    pub trash_count: u64,
    pub total_categories: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            total_notes: 0,
            total_users: 0,
            message_count: 0,
            trash_count: 0,
            total_categories: Category::ALL.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("notes"), Some(Category::Notes));
        assert_eq!(Category::parse("  PAPERS "), Some(Category::Papers));
        assert_eq!(Category::parse("Recipes"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn category_round_trips_through_as_str() {
        for c in Category::ALL {
            assert_eq!(Category::parse(c.as_str()), Some(c));
        }
    }
}
