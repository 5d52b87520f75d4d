//! User account database operations

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::super::{Database, DbResult};
use crate::models::User;

impl Database {
    /// Insert a new user. The email column is UNIQUE; a duplicate surfaces
    /// as a constraint violation (see `DbError::is_unique_violation`).
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        let conn = self.conn()?;
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, name, email, password_hash, created_at.to_rfc3339()],
        )?;

        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }

    /// Look up a user by email (used by both register and login)
    pub fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let conn = self.conn()?;

        let user = conn
            .query_row(
                "SELECT id, name, email, password_hash, created_at
                 FROM users WHERE email = ?1",
                [email],
                Self::row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;

        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
        })
    }
}
