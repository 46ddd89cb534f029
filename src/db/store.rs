use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::job::JobInput;
use crate::db::models::{JobRow, SortOrder, UserRow, UserSummary};

/// Persistence operations for job postings.
///
/// Every method is a single statement against the store. Implementations
/// must not retry and must not hold a connection between calls.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a job and return the id assigned by the store.
    async fn create(&self, job: &JobInput) -> Result<i32, sqlx::Error>;

    /// All jobs, in whatever order the store yields them.
    async fn get_all(&self) -> Result<Vec<JobRow>, sqlx::Error>;

    /// `Ok(None)` when no job has this id.
    async fn get_by_id(&self, id: i32) -> Result<Option<JobRow>, sqlx::Error>;

    async fn get_all_sorted_by_salary(&self, order: SortOrder) -> Result<Vec<JobRow>, sqlx::Error>;

    /// Overwrite every field of the job with this id. Returns the number of
    /// rows affected; zero is not an error.
    async fn update(&self, id: i32, job: &JobInput) -> Result<u64, sqlx::Error>;

    /// Remove the job with this id. Returns the number of rows affected;
    /// zero is not an error.
    async fn delete(&self, id: i32) -> Result<u64, sqlx::Error>;

    /// Round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

/// Users and login sessions, consumed by the authentication gate and the
/// administrative listing.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i32, sqlx::Error>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, sqlx::Error>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, sqlx::Error>;

    /// Store a new session and drop every session that has already expired.
    async fn create_session(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error>;

    /// Resolve a session token to its user. Expired sessions resolve to `None`.
    async fn find_session_user(&self, token: &str) -> Result<Option<UserSummary>, sqlx::Error>;

    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error>;
}
