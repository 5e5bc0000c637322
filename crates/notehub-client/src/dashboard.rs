use uuid::Uuid;

use notehub_types::models::{Category, Note};

/// Pages the user dashboard can show. The only client-side state machine is
/// which page is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Overview,
    MyNotes,
    Upload,
    CategoryDetail,
    Trash,
    Settings,
}

/// Local view state for the user dashboard.
///
/// Holds the full cached copy of the owner's notes (the server returns
/// trashed rows too) and recomputes every derived view from it, so search
/// and tab switches never need a round-trip. Writes are applied
/// optimistically via [`Dashboard::mark_deleted`]/[`Dashboard::remove_note`]
/// and the next [`Dashboard::set_notes`] from an authoritative refetch
/// replaces the cache.
#[derive(Debug, Default)]
pub struct Dashboard {
    notes: Vec<Note>,
    pub page: Page,
    pub search_text: String,
    pub selected_category: Option<Category>,
    total_notes: usize,
    trash_count: usize,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with a fresh fetch (newest first, trash included).
    pub fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.refresh_stats();
    }

    pub fn change_page(&mut self, page: Page) {
        self.page = page;
        self.selected_category = None;
    }

    pub fn view_category(&mut self, category: Category) {
        self.selected_category = Some(category);
        self.page = Page::CategoryDetail;
    }

    /// Active notes matching the search box: case-insensitive substring on
    /// title or category.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        let term = self.search_text.trim().to_lowercase();
        self.active_notes()
            .filter(|n| {
                term.is_empty()
                    || n.title.to_lowercase().contains(&term)
                    || n.category.as_str().to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Active notes in the selected category, if one is open.
    pub fn category_notes(&self) -> Vec<&Note> {
        match self.selected_category {
            Some(category) => self
                .active_notes()
                .filter(|n| n.category == category)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn trash_notes(&self) -> Vec<&Note> {
        self.notes.iter().filter(|n| n.is_deleted).collect()
    }

    /// The five most recent active notes.
    pub fn recent_notes(&self) -> Vec<&Note> {
        self.active_notes().take(5).collect()
    }

    pub fn total_notes(&self) -> usize {
        self.total_notes
    }

    pub fn trash_count(&self) -> usize {
        self.trash_count
    }

    /// Optimistic flag flip after a successful trash/restore write.
    pub fn mark_deleted(&mut self, note_id: Uuid, is_deleted: bool) {
        if let Some(note) = self.notes.iter_mut().find(|n| n.id == note_id) {
            note.is_deleted = is_deleted;
        }
        self.refresh_stats();
    }

    /// Optimistic removal after a successful permanent delete.
    pub fn remove_note(&mut self, note_id: Uuid) {
        self.notes.retain(|n| n.id != note_id);
        self.refresh_stats();
    }

    fn active_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|n| !n.is_deleted)
    }

    fn refresh_stats(&mut self) {
        self.total_notes = self.notes.iter().filter(|n| !n.is_deleted).count();
        self.trash_count = self.notes.len() - self.total_notes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(title: &str, category: Category, is_deleted: bool, minute: u32) -> Note {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap();
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category,
            file_name: format!("{title}.pdf"),
            user_id: Uuid::new_v4(),
            is_deleted,
            created_at: at,
            updated_at: at,
        }
    }

    fn loaded() -> Dashboard {
        let mut dash = Dashboard::new();
        // Newest first, as the server returns them.
        dash.set_notes(vec![
            note("Calculus Syllabus", Category::Notes, false, 9),
            note("Essay Draft", Category::Papers, false, 8),
            note("Old Homework", Category::Assignments, true, 7),
            note("Algebra Notes", Category::Notes, false, 6),
        ]);
        dash
    }

    #[test]
    fn search_is_case_insensitive_and_skips_trash() {
        let mut dash = loaded();

        dash.search_text = "SYLLABUS".to_string();
        let hits = dash.filtered_notes();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Calculus Syllabus");

        // Category text matches too.
        dash.search_text = "papers".to_string();
        assert_eq!(dash.filtered_notes().len(), 1);

        // Trashed notes never surface, even on a direct hit.
        dash.search_text = "Old Homework".to_string();
        assert!(dash.filtered_notes().is_empty());
    }

    #[test]
    fn empty_search_returns_all_active() {
        let dash = loaded();
        assert_eq!(dash.filtered_notes().len(), 3);
        assert_eq!(dash.trash_notes().len(), 1);
    }

    #[test]
    fn category_view_filters_active_notes() {
        let mut dash = loaded();
        dash.view_category(Category::Notes);
        assert_eq!(dash.page, Page::CategoryDetail);
        assert_eq!(dash.category_notes().len(), 2);

        dash.change_page(Page::Overview);
        assert_eq!(dash.selected_category, None);
        assert!(dash.category_notes().is_empty());
    }

    #[test]
    fn recent_notes_are_the_latest_five_active() {
        let mut dash = Dashboard::new();
        let mut notes: Vec<Note> = (0..8)
            .map(|i| note(&format!("n{i}"), Category::Notes, false, 50 - i))
            .collect();
        notes[0].is_deleted = true; // newest is trashed
        dash.set_notes(notes);

        let recent = dash.recent_notes();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].title, "n1");
        assert_eq!(recent[4].title, "n5");
    }

    #[test]
    fn optimistic_trash_and_restore_update_counts() {
        let mut dash = loaded();
        let id = dash.filtered_notes()[0].id;

        dash.mark_deleted(id, true);
        assert_eq!(dash.total_notes(), 2);
        assert_eq!(dash.trash_count(), 2);

        dash.mark_deleted(id, false);
        assert_eq!(dash.total_notes(), 3);
        assert_eq!(dash.trash_count(), 1);
    }

    #[test]
    fn optimistic_permanent_delete_shrinks_the_cache() {
        let mut dash = loaded();
        let id = dash.trash_notes()[0].id;

        dash.remove_note(id);
        assert_eq!(dash.trash_count(), 0);
        assert_eq!(dash.total_notes(), 3);

        // Unknown ids are a no-op.
        dash.remove_note(Uuid::new_v4());
        assert_eq!(dash.total_notes(), 3);
    }
}
