use crate::Database;
use crate::models::{AdminRow, InquiryRow, NoteRow, NoteWithOwnerRow, UserRow, UserWithCountRow};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Row, params};

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        first_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, first_name, email, password, img, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, '', ?6, ?6)",
                params![id, username, first_name, email, password_hash, now],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{USER_COLS} WHERE email = ?1"))?;
            let row = stmt.query_row([email], map_user).optional()?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{USER_COLS} WHERE id = ?1"))?;
            let row = stmt.query_row([id], map_user).optional()?;
            Ok(row)
        })
    }

    /// Full-value profile write; callers load the row first and pass the
    /// merged state back.
    pub fn update_user(
        &self,
        id: &str,
        first_name: &str,
        password_hash: &str,
        img: &str,
    ) -> Result<()> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET first_name = ?2, password = ?3, img = ?4, updated_at = ?5
                 WHERE id = ?1",
                params![id, first_name, password_hash, img, now],
            )?;
            Ok(())
        })
    }

    pub fn list_users_with_note_counts(&self) -> Result<Vec<UserWithCountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.first_name, u.email, u.password, u.img,
                        u.created_at, u.updated_at,
                        (SELECT COUNT(*) FROM notes n
                          WHERE n.user_id = u.id AND n.is_deleted = 0) AS notes_count
                 FROM users u
                 ORDER BY u.created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(UserWithCountRow {
                        user: map_user(row)?,
                        notes_count: row.get::<_, i64>(8)? as u64,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete a user and every note they own in one transaction.
    /// Returns the deleted notes' file names for blob cleanup, or None when
    /// no such user exists.
    pub fn delete_user_cascade(&self, id: &str) -> Result<Option<Vec<String>>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let exists = tx
                .query_row("SELECT id FROM users WHERE id = ?1", [id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?;
            if exists.is_none() {
                return Ok(None);
            }

            let files = {
                let mut stmt = tx.prepare("SELECT file_name FROM notes WHERE user_id = ?1")?;
                stmt.query_map([id], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };

            tx.execute("DELETE FROM notes WHERE user_id = ?1", [id])?;
            tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            tx.commit()?;

            Ok(Some(files))
        })
    }

    pub fn count_users(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM users")
    }

    // -- Notes --

    /// Insert a note and return the stored row.
    pub fn insert_note(
        &self,
        id: &str,
        title: &str,
        category: &str,
        file_name: &str,
        user_id: &str,
    ) -> Result<NoteRow> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO notes (id, title, category, file_name, user_id, is_deleted, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
                params![id, title, category, file_name, user_id, now],
            )?;
            Ok(NoteRow {
                id: id.to_string(),
                title: title.to_string(),
                category: category.to_string(),
                file_name: file_name.to_string(),
                user_id: user_id.to_string(),
                is_deleted: false,
                created_at: now.clone(),
                updated_at: now,
            })
        })
    }

    /// Every note owned by the user, newest first, trashed included.
    pub fn notes_by_user(&self, user_id: &str) -> Result<Vec<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{NOTE_COLS} WHERE user_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt
                .query_map([user_id], map_note)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_note(&self, id: &str) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{NOTE_COLS} WHERE id = ?1"))?;
            let row = stmt.query_row([id], map_note).optional()?;
            Ok(row)
        })
    }

    /// Idempotent flag write. Returns false when no such note exists.
    pub fn set_trash_status(&self, id: &str, is_deleted: bool) -> Result<bool> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE notes SET is_deleted = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, is_deleted, now],
            )?;
            Ok(changed > 0)
        })
    }

    /// Unconditional delete. Returns the file name for blob cleanup when the
    /// row existed.
    pub fn delete_note(&self, id: &str) -> Result<Option<String>> {
        self.with_conn_mut(|conn| {
            let file = conn
                .query_row("SELECT file_name FROM notes WHERE id = ?1", [id], |row| {
                    row.get::<_, String>(0)
                })
                .optional()?;
            conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
            Ok(file)
        })
    }

    /// Delete the user's flagged notes only. Returns their file names.
    pub fn empty_trash_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn_mut(|conn| {
            let files = {
                let mut stmt = conn
                    .prepare("SELECT file_name FROM notes WHERE user_id = ?1 AND is_deleted = 1")?;
                stmt.query_map([user_id], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };
            conn.execute(
                "DELETE FROM notes WHERE user_id = ?1 AND is_deleted = 1",
                [user_id],
            )?;
            Ok(files)
        })
    }

    pub fn restore_trash_for_user(&self, user_id: &str) -> Result<usize> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE notes SET is_deleted = 0, updated_at = ?2
                 WHERE user_id = ?1 AND is_deleted = 1",
                params![user_id, now],
            )?;
            Ok(changed)
        })
    }

    /// Active notes joined with owner name/email, newest first.
    pub fn active_notes_with_owner(&self) -> Result<Vec<NoteWithOwnerRow>> {
        self.notes_with_owner("WHERE n.is_deleted = 0 ORDER BY n.created_at DESC")
    }

    /// Trashed notes joined with owner, most recently touched first.
    pub fn trashed_notes_with_owner(&self) -> Result<Vec<NoteWithOwnerRow>> {
        self.notes_with_owner("WHERE n.is_deleted = 1 ORDER BY n.updated_at DESC")
    }

    fn notes_with_owner(&self, tail: &str) -> Result<Vec<NoteWithOwnerRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT n.id, n.title, n.category, n.file_name, n.user_id, n.is_deleted,
                        n.created_at, n.updated_at, u.first_name, u.email
                 FROM notes n
                 JOIN users u ON n.user_id = u.id
                 {tail}"
            ))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(NoteWithOwnerRow {
                        note: map_note(row)?,
                        owner_name: row.get(8)?,
                        owner_email: row.get(9)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete every flagged note regardless of owner. Returns file names.
    pub fn empty_all_trash(&self) -> Result<Vec<String>> {
        self.with_conn_mut(|conn| {
            let files = {
                let mut stmt = conn.prepare("SELECT file_name FROM notes WHERE is_deleted = 1")?;
                stmt.query_map([], |row| row.get::<_, String>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };
            conn.execute("DELETE FROM notes WHERE is_deleted = 1", [])?;
            Ok(files)
        })
    }

    pub fn restore_all_trash(&self) -> Result<usize> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE notes SET is_deleted = 0, updated_at = ?1 WHERE is_deleted = 1",
                [now],
            )?;
            Ok(changed)
        })
    }

    pub fn count_notes(&self, deleted: bool) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM notes WHERE is_deleted = ?1",
                [deleted],
                |row| row.get(0),
            )?;
            Ok(n as u64)
        })
    }

    // -- Inquiries --

    pub fn insert_inquiry(
        &self,
        id: &str,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<()> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO inquiries (id, name, email, subject, message, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, name, email, subject, message, now],
            )?;
            Ok(())
        })
    }

    pub fn list_inquiries(&self) -> Result<Vec<InquiryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, subject, message, created_at
                 FROM inquiries ORDER BY created_at DESC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(InquiryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        subject: row.get(3)?,
                        message: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_inquiry(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM inquiries WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    pub fn count_inquiries(&self) -> Result<u64> {
        self.count("SELECT COUNT(*) FROM inquiries")
    }

    // -- Admin principals --

    pub fn get_admin_by_email(&self, email: &str) -> Result<Option<AdminRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, email, password FROM admins WHERE email = ?1")?;
            let row = stmt
                .query_row([email], |row| {
                    Ok(AdminRow {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        password: row.get(2)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    pub fn create_admin(&self, id: &str, email: &str, password_hash: &str) -> Result<()> {
        let now = now_rfc3339();
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO admins (id, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, email, password_hash, now],
            )?;
            Ok(())
        })
    }

    fn count(&self, sql: &str) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as u64)
        })
    }
}

const USER_COLS: &str = "SELECT id, username, first_name, email, password, img, created_at, updated_at FROM users";
const NOTE_COLS: &str = "SELECT id, title, category, file_name, user_id, is_deleted, created_at, updated_at FROM notes";

fn map_user(row: &Row) -> std::result::Result<UserRow, rusqlite::Error> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        email: row.get(3)?,
        password: row.get(4)?,
        img: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_note(row: &Row) -> std::result::Result<NoteRow, rusqlite::Error> {
    Ok(NoteRow {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        file_name: row.get(3)?,
        user_id: row.get(4)?,
        is_deleted: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
