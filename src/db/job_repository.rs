use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::debug;

use crate::api::job::JobInput;
use crate::db::models::{JobRow, SortOrder};
use crate::db::store::JobStore;

const SELECT_ALL: &str =
    r#"SELECT id, title, company, "type", experience_level, salary FROM jobs"#;

const SELECT_BY_SALARY_ASC: &str = r#"
    SELECT id, title, company, "type", experience_level, salary
    FROM jobs
    ORDER BY salary ASC
"#;

const SELECT_BY_SALARY_DESC: &str = r#"
    SELECT id, title, company, "type", experience_level, salary
    FROM jobs
    ORDER BY salary DESC
"#;

/// Repository for job postings backed by PostgreSQL
#[derive(Clone)]
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for JobRepository {
    async fn create(&self, job: &JobInput) -> Result<i32, sqlx::Error> {
        debug!("Creating job: title={}, company={}", job.title, job.company);

        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO jobs (title, company, "type", experience_level, salary)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.job_type)
        .bind(&job.experience_level)
        .bind(job.salary)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job created with id={}", id);
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<JobRow>, sqlx::Error> {
        sqlx::query_as::<_, JobRow>(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<JobRow>, sqlx::Error> {
        debug!("Fetching job id={}", id);
        sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, title, company, "type", experience_level, salary
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_all_sorted_by_salary(&self, order: SortOrder) -> Result<Vec<JobRow>, sqlx::Error> {
        let statement = match order {
            SortOrder::Ascending => SELECT_BY_SALARY_ASC,
            SortOrder::Descending => SELECT_BY_SALARY_DESC,
        };
        debug!("Fetching jobs sorted by salary {}", order.as_str());

        sqlx::query_as::<_, JobRow>(statement)
            .fetch_all(&self.pool)
            .await
    }

    async fn update(&self, id: i32, job: &JobInput) -> Result<u64, sqlx::Error> {
        debug!("Updating job id={}", id);

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = $1, company = $2, "type" = $3, experience_level = $4, salary = $5
            WHERE id = $6
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.job_type)
        .bind(&job.experience_level)
        .bind(job.salary)
        .bind(id)
        .execute(&self.pool)
        .await?;

        debug!("Update of job id={} affected {} rows", id, result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, sqlx::Error> {
        debug!("Deleting job id={}", id);

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
