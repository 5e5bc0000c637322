use uuid::Uuid;

use notehub_types::models::{Inquiry, NoteWithOwner, Stats, UserWithNoteCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Overview,
    Users,
    Notes,
    Trash,
    Queries,
}

/// Local view state for the admin dashboard. Each list keeps a backup copy
/// so search can filter instantly and restore the full list when the term
/// is cleared.
#[derive(Debug, Default)]
pub struct AdminDashboard {
    users: Vec<UserWithNoteCount>,
    users_backup: Vec<UserWithNoteCount>,
    notes: Vec<NoteWithOwner>,
    notes_backup: Vec<NoteWithOwner>,
    trash: Vec<NoteWithOwner>,
    queries: Vec<Inquiry>,
    stats: Stats,
    pub tab: AdminTab,
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn set_users(&mut self, users: Vec<UserWithNoteCount>) {
        self.stats.total_users = users.len() as u64;
        self.users_backup = users.clone();
        self.users = users;
    }

    pub fn set_notes(&mut self, notes: Vec<NoteWithOwner>) {
        self.stats.total_notes = notes.len() as u64;
        self.notes_backup = notes.clone();
        self.notes = notes;
    }

    pub fn set_trash(&mut self, trash: Vec<NoteWithOwner>) {
        self.stats.trash_count = trash.len() as u64;
        self.trash = trash;
    }

    pub fn set_queries(&mut self, queries: Vec<Inquiry>) {
        self.stats.message_count = queries.len() as u64;
        self.queries = queries;
    }

    pub fn users(&self) -> &[UserWithNoteCount] {
        &self.users
    }

    pub fn notes(&self) -> &[NoteWithOwner] {
        &self.notes
    }

    pub fn trash(&self) -> &[NoteWithOwner] {
        &self.trash
    }

    pub fn queries(&self) -> &[Inquiry] {
        &self.queries
    }

    /// Instant search over name/email; clearing the term restores the full
    /// backup list.
    pub fn search_users(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        self.users = if term.is_empty() {
            self.users_backup.clone()
        } else {
            self.users_backup
                .iter()
                .filter(|u| {
                    u.first_name.to_lowercase().contains(&term)
                        || u.email.to_lowercase().contains(&term)
                })
                .cloned()
                .collect()
        };
    }

    /// Instant search over title/category.
    pub fn search_notes(&mut self, term: &str) {
        let term = term.trim().to_lowercase();
        self.notes = if term.is_empty() {
            self.notes_backup.clone()
        } else {
            self.notes_backup
                .iter()
                .filter(|n| {
                    n.title.to_lowercase().contains(&term)
                        || n.category.as_str().to_lowercase().contains(&term)
                })
                .cloned()
                .collect()
        };
    }

    /// Optimistic removal after a successful user delete; the user's notes
    /// disappear with them.
    pub fn remove_user(&mut self, user_id: Uuid) {
        self.users_backup.retain(|u| u.id != user_id);
        self.users.retain(|u| u.id != user_id);
        self.notes_backup.retain(|n| n.user_id != user_id);
        self.notes.retain(|n| n.user_id != user_id);
        self.stats.total_users = self.users_backup.len() as u64;
        self.stats.total_notes = self.notes_backup.len() as u64;
    }

    /// Optimistic move of a note between the active and trash lists.
    pub fn move_note_to_trash(&mut self, note_id: Uuid) {
        if let Some(pos) = self.notes_backup.iter().position(|n| n.id == note_id) {
            let mut note = self.notes_backup.remove(pos);
            note.is_deleted = true;
            self.notes.retain(|n| n.id != note_id);
            self.trash.insert(0, note);
        }
        self.stats.total_notes = self.notes_backup.len() as u64;
        self.stats.trash_count = self.trash.len() as u64;
    }

    pub fn remove_query(&mut self, inquiry_id: Uuid) {
        self.queries.retain(|q| q.id != inquiry_id);
        self.stats.message_count = self.queries.len() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use notehub_types::models::Category;

    fn user(name: &str, email: &str, notes_count: u64) -> UserWithNoteCount {
        UserWithNoteCount {
            id: Uuid::new_v4(),
            first_name: name.to_string(),
            username: name.to_lowercase(),
            email: email.to_string(),
            profile_image: String::new(),
            created_at: Utc::now(),
            notes_count,
        }
    }

    fn note(title: &str, owner: Uuid) -> NoteWithOwner {
        NoteWithOwner {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category: Category::Notes,
            file_name: format!("{title}.pdf"),
            user_id: owner,
            owner_name: "Ada".to_string(),
            owner_email: "ada@x.com".to_string(),
            is_deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn user_search_matches_name_or_email_and_restores_on_clear() {
        let mut admin = AdminDashboard::new();
        admin.set_users(vec![
            user("Ada", "ada@x.com", 2),
            user("Grace", "grace@y.org", 0),
        ]);

        admin.search_users("ADA");
        assert_eq!(admin.users().len(), 1);

        admin.search_users("y.org");
        assert_eq!(admin.users().len(), 1);
        assert_eq!(admin.users()[0].first_name, "Grace");

        admin.search_users("");
        assert_eq!(admin.users().len(), 2);
    }

    #[test]
    fn note_search_matches_title_or_category() {
        let mut admin = AdminDashboard::new();
        let owner = Uuid::new_v4();
        admin.set_notes(vec![note("Calculus", owner), note("History", owner)]);

        admin.search_notes("calc");
        assert_eq!(admin.notes().len(), 1);

        admin.search_notes("notes");
        assert_eq!(admin.notes().len(), 2);

        admin.search_notes("   ");
        assert_eq!(admin.notes().len(), 2);
    }

    #[test]
    fn removing_a_user_drops_their_notes_and_updates_stats() {
        let mut admin = AdminDashboard::new();
        let ada = user("Ada", "ada@x.com", 1);
        let grace = user("Grace", "grace@y.org", 1);
        let ada_id = ada.id;
        let grace_id = grace.id;
        admin.set_users(vec![ada, grace]);
        admin.set_notes(vec![note("Ada's", ada_id), note("Grace's", grace_id)]);

        admin.remove_user(ada_id);
        assert_eq!(admin.users().len(), 1);
        assert_eq!(admin.notes().len(), 1);
        assert_eq!(admin.stats().total_users, 1);
        assert_eq!(admin.stats().total_notes, 1);
    }

    #[test]
    fn moving_a_note_to_trash_swaps_lists() {
        let mut admin = AdminDashboard::new();
        let owner = Uuid::new_v4();
        let notes = vec![note("Keep", owner), note("Toss", owner)];
        let toss_id = notes[1].id;
        admin.set_notes(notes);

        admin.move_note_to_trash(toss_id);
        assert_eq!(admin.notes().len(), 1);
        assert_eq!(admin.trash().len(), 1);
        assert!(admin.trash()[0].is_deleted);
        assert_eq!(admin.stats().trash_count, 1);
    }

    #[test]
    fn query_removal_updates_count() {
        let mut admin = AdminDashboard::new();
        let q = Inquiry {
            id: Uuid::new_v4(),
            name: "Sam".to_string(),
            email: "s@x.com".to_string(),
            subject: "Hi".to_string(),
            message: "Question".to_string(),
            created_at: Utc::now(),
        };
        let id = q.id;
        admin.set_queries(vec![q]);
        assert_eq!(admin.stats().message_count, 1);

        admin.remove_query(id);
        assert!(admin.queries().is_empty());
        assert_eq!(admin.stats().message_count, 0);
    }
}
