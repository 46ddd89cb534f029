use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job posting
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct JobRow {
    pub id: i32,
    pub title: String,
    pub company: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub job_type: String,
    pub experience_level: String,
    pub salary: i64,
}

/// Full user record, including the password hash. Never rendered.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The public part of a user, as shown in the administrative listing
/// and carried by an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
}

/// Direction for the salary listing.
///
/// This is the only way a caller can influence the ORDER BY clause; each
/// variant maps to a fixed statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Interpret a raw `order` query parameter.
    ///
    /// Accepts `asc`/`ascending` and `desc`/`descending` in any case.
    /// Anything else, including a missing value, falls back to ascending.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") | Some("descending") => SortOrder::Descending,
            Some("asc") | Some("ascending") => SortOrder::Ascending,
            _ => SortOrder::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}
