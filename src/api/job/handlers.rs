use actix_web::{
    HttpResponse, get, post, route,
    http::StatusCode,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Form;

use crate::api::auth::CurrentUser;
use crate::api::error::ServiceError;
use crate::api::redirect;
use crate::api::views::{DeleteJobPage, JobFormPage, JobPage, JobsPage, ManageJobsPage, render};
use crate::db::models::SortOrder;
use crate::db::store::AccountStore;
use super::models::{JobInput, SortQuery};
use super::service::JobService;

const MANAGE_JOBS_PATH: &str = "/manage-jobs";

fn not_found() -> Result<HttpResponse, ServiceError> {
    render(StatusCode::NOT_FOUND, &JobPage { job: None })
}

#[get("")]
async fn list_jobs(jobs: Data<JobService>) -> Result<HttpResponse, ServiceError> {
    let jobs = jobs.list_jobs().await?;
    render(StatusCode::OK, &JobsPage { jobs, sorted: None })
}

#[get("/sort")]
async fn list_jobs_by_salary(
    jobs: Data<JobService>,
    query: Query<SortQuery>,
) -> Result<HttpResponse, ServiceError> {
    let order = SortOrder::from_param(query.order.as_deref());
    let jobs = jobs.list_jobs_by_salary(order).await?;
    render(StatusCode::OK, &JobsPage {
        jobs,
        sorted: Some(order.as_str()),
    })
}

#[get("/new")]
async fn new_job_form(_user: CurrentUser) -> Result<HttpResponse, ServiceError> {
    render(StatusCode::OK, &JobFormPage::blank())
}

#[post("")]
async fn create_job(
    _user: CurrentUser,
    jobs: Data<JobService>,
    form: Form<JobInput>,
) -> Result<HttpResponse, ServiceError> {
    jobs.create_job(&form).await?;
    Ok(redirect(MANAGE_JOBS_PATH))
}

#[get("/{id}")]
async fn view_job(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    match jobs.find_job(path.into_inner()).await? {
        Some(job) => render(StatusCode::OK, &JobPage { job: Some(job) }),
        None => not_found(),
    }
}

#[get("/{id}/edit")]
async fn edit_job_form(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    match jobs.find_job(path.into_inner()).await? {
        Some(job) => render(StatusCode::OK, &JobFormPage::edit(job)),
        None => not_found(),
    }
}

#[route("/{id}", method = "PUT", method = "POST")]
async fn update_job(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
    form: Form<JobInput>,
) -> Result<HttpResponse, ServiceError> {
    jobs.replace_job(path.into_inner(), &form).await?;
    Ok(redirect(MANAGE_JOBS_PATH))
}

#[get("/{id}/delete")]
async fn confirm_delete_job(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    match jobs.find_job(path.into_inner()).await? {
        Some(job) => render(StatusCode::OK, &DeleteJobPage { job }),
        None => not_found(),
    }
}

#[route("/{id}", method = "DELETE")]
async fn delete_job(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    jobs.remove_job(path.into_inner()).await?;
    Ok(redirect(MANAGE_JOBS_PATH))
}

/// Form-friendly twin of `DELETE /jobs/{id}`.
#[post("/{id}/delete")]
async fn delete_job_form(
    _user: CurrentUser,
    jobs: Data<JobService>,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    jobs.remove_job(path.into_inner()).await?;
    Ok(redirect(MANAGE_JOBS_PATH))
}

#[get("/manage-jobs")]
async fn manage_jobs(
    _user: CurrentUser,
    jobs: Data<JobService>,
    accounts: Data<dyn AccountStore>,
) -> Result<HttpResponse, ServiceError> {
    let users = accounts
        .list_users()
        .await
        .map_err(ServiceError::database("Error fetching jobs and users"))?;
    let jobs = jobs.list_jobs().await?;
    render(StatusCode::OK, &ManageJobsPage { jobs, users })
}

pub fn job_config(config: &mut ServiceConfig) {
    // Literal segments are registered before `/{id}` so they win the match.
    config
        .service(
            scope("/jobs")
                .service(list_jobs)
                .service(create_job)
                .service(list_jobs_by_salary)
                .service(new_job_form)
                .service(view_job)
                .service(update_job)
                .service(delete_job)
                .service(edit_job_form)
                .service(confirm_delete_job)
                .service(delete_job_form),
        )
        .service(manage_jobs);
}
