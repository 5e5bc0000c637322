use notehub_types::models::{Category, NoteWithOwner};

/// Local view state for the public browse catalog: the fetched list plus a
/// filtered copy recomputed on every filter change.
#[derive(Debug, Default)]
pub struct Browse {
    all: Vec<NoteWithOwner>,
    filtered: Vec<NoteWithOwner>,
    pub search_text: String,
    pub selected_category: Option<Category>,
}

impl Browse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with a fresh fetch. Trashed rows are dropped in
    /// case the server ever hands them over.
    pub fn set_notes(&mut self, notes: Vec<NoteWithOwner>) {
        self.all = notes.into_iter().filter(|n| !n.is_deleted).collect();
        self.apply_filters();
    }

    /// Substring match on title plus exact category match.
    pub fn apply_filters(&mut self) {
        let term = self.search_text.to_lowercase();
        self.filtered = self
            .all
            .iter()
            .filter(|n| {
                let matches_text = n.title.to_lowercase().contains(&term);
                let matches_category = self
                    .selected_category
                    .is_none_or(|c| n.category == c);
                matches_text && matches_category
            })
            .cloned()
            .collect();
    }

    pub fn notes(&self) -> &[NoteWithOwner] {
        &self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn note(title: &str, category: Category, is_deleted: bool) -> NoteWithOwner {
        NoteWithOwner {
            id: Uuid::new_v4(),
            title: title.to_string(),
            category,
            file_name: format!("{title}.pdf"),
            user_id: Uuid::new_v4(),
            owner_name: "Ada".to_string(),
            owner_email: "ada@x.com".to_string(),
            is_deleted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn catalog_drops_trashed_rows() {
        let mut browse = Browse::new();
        browse.set_notes(vec![
            note("Visible", Category::Notes, false),
            note("Hidden", Category::Notes, true),
        ]);
        assert_eq!(browse.notes().len(), 1);
        assert_eq!(browse.notes()[0].title, "Visible");
    }

    #[test]
    fn filters_combine_text_and_category() {
        let mut browse = Browse::new();
        browse.set_notes(vec![
            note("Linear Algebra", Category::Notes, false),
            note("Linear Regression", Category::Papers, false),
            note("Graph Theory", Category::Notes, false),
        ]);

        browse.search_text = "linear".to_string();
        browse.apply_filters();
        assert_eq!(browse.notes().len(), 2);

        browse.selected_category = Some(Category::Papers);
        browse.apply_filters();
        assert_eq!(browse.notes().len(), 1);
        assert_eq!(browse.notes()[0].title, "Linear Regression");

        browse.search_text.clear();
        browse.selected_category = None;
        browse.apply_filters();
        assert_eq!(browse.notes().len(), 3);
    }
}
