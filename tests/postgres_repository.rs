//! Repository tests against a live PostgreSQL. Run with
//! `DATABASE_URL=... cargo test --features postgres-tests`.
#![cfg(feature = "postgres-tests")]

use chrono::{Duration, Utc};
use job_board::{
    api::job::JobInput,
    db::{AccountRepository, AccountStore, JobRepository, JobStore, models::SortOrder},
};
use sqlx::PgPool;

fn job(title: &str, salary: i64) -> JobInput {
    JobInput {
        title: title.to_string(),
        company: "Acme".to_string(),
        job_type: "Full-time".to_string(),
        experience_level: "Mid".to_string(),
        salary,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn create_then_get_returns_every_field(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = JobRepository::new(pool);
    let input = job("Backend Engineer", 85_000);

    let id = repo.create(&input).await?;
    let row = repo.get_by_id(id).await?.expect("job exists");

    assert_eq!(row.id, id);
    assert_eq!(row.title, input.title);
    assert_eq!(row.company, input.company);
    assert_eq!(row.job_type, input.job_type);
    assert_eq!(row.experience_level, input.experience_level);
    assert_eq!(row.salary, input.salary);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn update_targets_only_the_given_id(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = JobRepository::new(pool);
    let target = repo.create(&job("Target", 10_000)).await?;
    let bystander = repo.create(&job("Bystander", 20_000)).await?;

    let replacement = JobInput {
        title: "Replaced".to_string(),
        company: "Globex".to_string(),
        job_type: "Contract".to_string(),
        experience_level: "Senior".to_string(),
        salary: 99_000,
    };
    assert_eq!(repo.update(target, &replacement).await?, 1);

    let updated = repo.get_by_id(target).await?.expect("target exists");
    assert_eq!(updated.title, "Replaced");
    assert_eq!(updated.job_type, "Contract");
    assert_eq!(updated.salary, 99_000);

    let untouched = repo.get_by_id(bystander).await?.expect("bystander exists");
    assert_eq!(untouched.title, "Bystander");
    assert_eq!(untouched.salary, 20_000);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_ids_are_noops(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = JobRepository::new(pool);
    let id = repo.create(&job("Keeper", 50_000)).await?;

    assert_eq!(repo.update(id + 1000, &job("Ghost", 1)).await?, 0);
    assert_eq!(repo.delete(id + 1000).await?, 0);
    assert_eq!(repo.get_all().await?.len(), 1);

    assert_eq!(repo.delete(id).await?, 1);
    assert!(repo.get_by_id(id).await?.is_none());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn salary_ordering(pool: PgPool) -> Result<(), sqlx::Error> {
    let repo = JobRepository::new(pool);
    for (title, salary) in [("b", 55_000), ("a", 40_000), ("c", 70_000), ("d", 70_000)] {
        repo.create(&job(title, salary)).await?;
    }

    let asc = repo.get_all_sorted_by_salary(SortOrder::Ascending).await?;
    let desc = repo.get_all_sorted_by_salary(SortOrder::Descending).await?;
    assert!(asc.windows(2).all(|w| w[0].salary <= w[1].salary));
    assert!(desc.windows(2).all(|w| w[0].salary >= w[1].salary));

    let mut all: Vec<i32> = repo.get_all().await?.into_iter().map(|j| j.id).collect();
    let mut sorted: Vec<i32> = asc.into_iter().map(|j| j.id).collect();
    all.sort();
    sorted.sort();
    assert_eq!(all, sorted);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn sessions_resolve_until_expiry(pool: PgPool) -> Result<(), sqlx::Error> {
    let accounts = AccountRepository::new(pool.clone());
    let user_id = accounts.create_user("ana", "hash").await?;
    assert!(accounts.create_user("ana", "hash").await.is_err());

    accounts
        .create_session("live", user_id, Utc::now() + Duration::hours(1))
        .await?;
    accounts
        .create_session("stale", user_id, Utc::now() - Duration::hours(1))
        .await?;

    let user = accounts.find_session_user("live").await?.expect("live session");
    assert_eq!(user.username, "ana");
    assert!(accounts.find_session_user("stale").await?.is_none());

    accounts
        .create_session("newer", user_id, Utc::now() + Duration::hours(1))
        .await?;
    let (remaining,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE token = 'stale'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0);

    accounts.delete_session("live").await?;
    assert!(accounts.find_session_user("live").await?.is_none());
    Ok(())
}
