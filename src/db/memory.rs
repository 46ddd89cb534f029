use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::job::JobInput;
use crate::db::models::{JobRow, SortOrder, UserRow, UserSummary};
use crate::db::store::{AccountStore, JobStore};

#[derive(Default)]
struct State {
    next_job_id: i32,
    jobs: BTreeMap<i32, JobRow>,
    next_user_id: i32,
    users: BTreeMap<i32, UserRow>,
    sessions: HashMap<String, (i32, DateTime<Utc>)>,
}

/// Process-local store used by `serve --ephemeral` and the test-suite.
///
/// Mirrors the Postgres schema: ids start at 1 and are never reused,
/// usernames are unique, sessions cascade with their user.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn row_from_input(id: i32, job: &JobInput) -> JobRow {
    JobRow {
        id,
        title: job.title.clone(),
        company: job.company.clone(),
        job_type: job.job_type.clone(),
        experience_level: job.experience_level.clone(),
        salary: job.salary,
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create(&self, job: &JobInput) -> Result<i32, sqlx::Error> {
        let mut state = self.lock();
        state.next_job_id += 1;
        let id = state.next_job_id;
        state.jobs.insert(id, row_from_input(id, job));
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        Ok(self.lock().jobs.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        Ok(self.lock().jobs.get(&id).cloned())
    }

    async fn get_all_sorted_by_salary(&self, order: SortOrder) -> Result<Vec<JobRow>, sqlx::Error> {
        let mut jobs: Vec<JobRow> = self.lock().jobs.values().cloned().collect();
        match order {
            SortOrder::Ascending => jobs.sort_by_key(|job| job.salary),
            SortOrder::Descending => jobs.sort_by(|a, b| b.salary.cmp(&a.salary)),
        }
        Ok(jobs)
    }

    async fn update(&self, id: i32, job: &JobInput) -> Result<u64, sqlx::Error> {
        let mut state = self.lock();
        match state.jobs.get_mut(&id) {
            Some(row) => {
                *row = row_from_input(id, job);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i32) -> Result<u64, sqlx::Error> {
        Ok(self.lock().jobs.remove(&id).map_or(0, |_| 1))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i32, sqlx::Error> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.username == username) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: username={}",
                username
            )));
        }
        state.next_user_id += 1;
        let id = state.next_user_id;
        state.users.insert(
            id,
            UserRow {
                id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, sqlx::Error> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, sqlx::Error> {
        Ok(self
            .lock()
            .users
            .values()
            .map(|u| UserSummary {
                id: u.id,
                username: u.username.clone(),
            })
            .collect())
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        let mut state = self.lock();
        if !state.users.contains_key(&user_id) {
            return Err(sqlx::Error::Protocol(format!(
                "foreign key violation: no user with id={}",
                user_id
            )));
        }
        let now = Utc::now();
        state.sessions.retain(|_, (_, expires)| *expires > now);
        state.sessions.insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn find_session_user(&self, token: &str) -> Result<Option<UserSummary>, sqlx::Error> {
        let state = self.lock();
        let user = state
            .sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .and_then(|(user_id, _)| state.users.get(user_id))
            .map(|u| UserSummary {
                id: u.id,
                username: u.username.clone(),
            });
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error> {
        self.lock().sessions.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job(title: &str, salary: i64) -> JobInput {
        JobInput {
            title: title.to_string(),
            company: "Acme".to_string(),
            job_type: "Full-time".to_string(),
            experience_level: "Mid".to_string(),
            salary,
        }
    }

    #[tokio::test]
    async fn created_job_reads_back_with_assigned_id() {
        let store = MemoryStore::new();
        let input = job("Backend Engineer", 85_000);

        let id = store.create(&input).await.unwrap();
        let row = store.get_by_id(id).await.unwrap().expect("job exists");

        assert_eq!(row.id, id);
        assert_eq!(row.title, input.title);
        assert_eq!(row.company, input.company);
        assert_eq!(row.job_type, input.job_type);
        assert_eq!(row.experience_level, input.experience_level);
        assert_eq!(row.salary, input.salary);
    }

    #[tokio::test]
    async fn ids_are_unique_and_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create(&job("a", 1)).await.unwrap();
        store.delete(first).await.unwrap();
        let second = store.create(&job("b", 2)).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn deleted_job_is_not_found() {
        let store = MemoryStore::new();
        let id = store.create(&job("Designer", 60_000)).await.unwrap();

        assert_eq!(store.delete(id).await.unwrap(), 1);
        assert!(store.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_every_field() {
        let store = MemoryStore::new();
        let id = store.create(&job("Designer", 60_000)).await.unwrap();
        let replacement = JobInput {
            title: "Lead Designer".to_string(),
            company: "Globex".to_string(),
            job_type: "Contract".to_string(),
            experience_level: "Senior".to_string(),
            salary: 95_000,
        };

        assert_eq!(store.update(id, &replacement).await.unwrap(), 1);

        let row = store.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(row, row_from_input(id, &replacement));
    }

    #[tokio::test]
    async fn missing_ids_are_noops_for_update_and_delete() {
        let store = MemoryStore::new();
        let id = store.create(&job("Keeper", 50_000)).await.unwrap();
        let before = store.get_all().await.unwrap();

        assert_eq!(store.update(id + 100, &job("Ghost", 1)).await.unwrap(), 0);
        assert_eq!(store.delete(id + 100).await.unwrap(), 0);

        assert_eq!(store.get_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn sorted_listing_orders_salaries_and_keeps_every_job() {
        let store = MemoryStore::new();
        for (title, salary) in [("c", 70_000), ("a", 40_000), ("d", 70_000), ("b", 55_000)] {
            store.create(&job(title, salary)).await.unwrap();
        }

        let asc = store.get_all_sorted_by_salary(SortOrder::Ascending).await.unwrap();
        let desc = store.get_all_sorted_by_salary(SortOrder::Descending).await.unwrap();

        assert!(asc.windows(2).all(|w| w[0].salary <= w[1].salary));
        assert!(desc.windows(2).all(|w| w[0].salary >= w[1].salary));

        let mut all_ids: Vec<i32> = store.get_all().await.unwrap().iter().map(|j| j.id).collect();
        let mut asc_ids: Vec<i32> = asc.iter().map(|j| j.id).collect();
        let mut desc_ids: Vec<i32> = desc.iter().map(|j| j.id).collect();
        all_ids.sort();
        asc_ids.sort();
        desc_ids.sort();
        assert_eq!(all_ids, asc_ids);
        assert_eq!(all_ids, desc_ids);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.create_user("ana", "hash").await.unwrap();
        assert!(store.create_user("ana", "other").await.is_err());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn expired_and_deleted_sessions_do_not_resolve() {
        let store = MemoryStore::new();
        let user_id = store.create_user("ana", "hash").await.unwrap();

        store
            .create_session("live", user_id, Utc::now() + Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session("stale", user_id, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        let user = store.find_session_user("live").await.unwrap().unwrap();
        assert_eq!(user.username, "ana");
        assert!(store.find_session_user("stale").await.unwrap().is_none());

        store.delete_session("live").await.unwrap();
        assert!(store.find_session_user("live").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn new_sessions_purge_expired_ones() {
        let store = MemoryStore::new();
        let ana = store.create_user("ana", "hash").await.unwrap();
        let bob = store.create_user("bob", "hash").await.unwrap();

        for i in 0..100 {
            let user = if i % 2 == 0 { ana } else { bob };
            store
                .create_session(&format!("old-{}", i), user, Utc::now() - Duration::hours(1))
                .await
                .unwrap();
        }
        store
            .create_session("bob-live", bob, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        store
            .create_session("fresh", ana, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.session_count(), 2);
        assert!(store.find_session_user("bob-live").await.unwrap().is_some());
        assert!(store.find_session_user("fresh").await.unwrap().is_some());
    }
}
