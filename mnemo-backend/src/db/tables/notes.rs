//! Note database operations — owner-scoped CRUD with FTS5 index maintenance.
//!
//! The FTS5 table `notes_fts` indexes note text and summary, keyed by note id.
//! It is kept in sync inside the same transaction as every note write, so a
//! note and its index row never diverge.
//!
//! Update and delete use a single `WHERE id = ? AND user_id = ?` predicate:
//! a missing note and someone else's note are the same outcome, and callers
//! cannot tell them apart.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::super::{Database, DbResult};
use crate::models::Note;

impl Database {
    /// Insert a note (and its FTS row) for `user_id`.
    pub fn create_note(
        &self,
        user_id: &str,
        note_text: &str,
        note_html: &str,
        summary: &str,
        tags: &[String],
    ) -> DbResult<Note> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());

        tx.execute(
            "INSERT INTO notes (id, user_id, note_text, note_html, summary, tags, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            rusqlite::params![id, user_id, note_text, note_html, summary, tags_json, now.to_rfc3339()],
        )?;
        tx.execute(
            "INSERT INTO notes_fts (note_id, note_text, summary) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, note_text, summary],
        )?;

        tx.commit()?;

        Ok(Note {
            id,
            user_id: user_id.to_string(),
            note_text: note_text.to_string(),
            note_html: note_html.to_string(),
            summary: summary.to_string(),
            tags: tags.to_vec(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Full replace of text/html/summary/tags, only when the note exists AND
    /// belongs to `user_id`. Returns `None` otherwise.
    pub fn update_note_for_user(
        &self,
        user_id: &str,
        note_id: &str,
        note_text: &str,
        note_html: &str,
        summary: &str,
        tags: &[String],
    ) -> DbResult<Option<Note>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let now = Utc::now();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());

        let rows = tx.execute(
            "UPDATE notes SET note_text = ?3, note_html = ?4, summary = ?5, tags = ?6, updated_at = ?7
             WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![note_id, user_id, note_text, note_html, summary, tags_json, now.to_rfc3339()],
        )?;
        if rows == 0 {
            return Ok(None);
        }

        // Reindex the one row: delete then insert
        tx.execute("DELETE FROM notes_fts WHERE note_id = ?1", [note_id])?;
        tx.execute(
            "INSERT INTO notes_fts (note_id, note_text, summary) VALUES (?1, ?2, ?3)",
            rusqlite::params![note_id, note_text, summary],
        )?;

        let note = tx.query_row(
            "SELECT id, user_id, note_text, note_html, summary, tags, created_at, updated_at
             FROM notes WHERE id = ?1",
            [note_id],
            Self::row_to_note,
        )?;

        tx.commit()?;
        Ok(Some(note))
    }

    /// Delete a note owned by `user_id`. Returns false when it is missing or
    /// owned by someone else.
    pub fn delete_note_for_user(&self, user_id: &str, note_id: &str) -> DbResult<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let rows = tx.execute(
            "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
            [note_id, user_id],
        )?;
        if rows > 0 {
            tx.execute("DELETE FROM notes_fts WHERE note_id = ?1", [note_id])?;
        }

        tx.commit()?;
        Ok(rows > 0)
    }

    /// List the caller's notes, newest first. `query` filters through the FTS
    /// index over text+summary; `tag` filters by exact tag membership. Both
    /// filters AND together when present.
    pub fn list_notes(
        &self,
        user_id: &str,
        query: Option<&str>,
        tag: Option<&str>,
    ) -> DbResult<Vec<Note>> {
        let conn = self.conn()?;

        let mut sql = String::from(
            "SELECT n.id, n.user_id, n.note_text, n.note_html, n.summary, n.tags, n.created_at, n.updated_at
             FROM notes n",
        );
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        let mut conditions: Vec<String> = Vec::new();

        if let Some(q) = query {
            let escaped = escape_fts5_query(q);
            if escaped.is_empty() {
                return Ok(vec![]);
            }
            sql.push_str(" JOIN notes_fts ON notes_fts.note_id = n.id");
            params.push(Box::new(escaped));
            conditions.push(format!("notes_fts MATCH ?{}", params.len()));
        }

        params.push(Box::new(user_id.to_string()));
        conditions.push(format!("n.user_id = ?{}", params.len()));

        if let Some(t) = tag {
            params.push(Box::new(t.to_string()));
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each(n.tags) WHERE json_each.value = ?{})",
                params.len()
            ));
        }

        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
        sql.push_str(" ORDER BY n.created_at DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let notes = stmt
            .query_map(params_ref.as_slice(), Self::row_to_note)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(notes)
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let tags_json: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        Ok(Note {
            id: row.get(0)?,
            user_id: row.get(1)?,
            note_text: row.get(2)?,
            note_html: row.get(3)?,
            summary: row.get(4)?,
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}

/// Escape special characters for FTS5 query, matching words with OR
fn escape_fts5_query(query: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.is_empty() {
        return String::new();
    }

    let escaped: Vec<String> = words
        .iter()
        .map(|word| {
            if word
                .chars()
                .any(|c| matches!(c, '"' | '*' | ':' | '^' | '(' | ')' | '+' | '-'))
            {
                format!("\"{}\"", word.replace('"', "\"\""))
            } else {
                word.to_string()
            }
        })
        .collect();

    escaped.join(" OR ")
}
