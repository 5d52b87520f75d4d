use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored note. `note_text` is the normalized plain text; `summary` is
/// derived on every write. The owner never changes after creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub note_text: String,
    pub note_html: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload. All fields optional at the wire level; the
/// normalization step decides whether enough of them is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    #[serde(default)]
    pub note_text: Option<String>,
    #[serde(default)]
    pub note_html: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
