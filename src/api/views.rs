use actix_web::{HttpResponse, http::StatusCode, http::header::ContentType};
use askama::Template;

use crate::api::error::ServiceError;
use crate::db::models::{JobRow, UserSummary};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub user: Option<UserSummary>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    pub error: Option<&'static str>,
}

/// Public job listing, optionally sorted by salary.
#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsPage {
    pub jobs: Vec<JobRow>,
    pub sorted: Option<&'static str>,
}

#[derive(Template)]
#[template(path = "manage_jobs.html")]
pub struct ManageJobsPage {
    pub jobs: Vec<JobRow>,
    pub users: Vec<UserSummary>,
}

/// Detail page; `job` is `None` when the id did not match.
#[derive(Template)]
#[template(path = "view_job.html")]
pub struct JobPage {
    pub job: Option<JobRow>,
}

/// Add and edit share one form; only the target and the prefilled values differ.
#[derive(Template)]
#[template(path = "job_form.html")]
pub struct JobFormPage {
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub company: String,
    pub job_type: String,
    pub experience_level: String,
    pub salary: String,
}

impl JobFormPage {
    pub fn blank() -> Self {
        Self {
            heading: "Add job",
            action: "/jobs".to_string(),
            title: String::new(),
            company: String::new(),
            job_type: String::new(),
            experience_level: String::new(),
            salary: String::new(),
        }
    }

    pub fn edit(job: JobRow) -> Self {
        Self {
            heading: "Edit job",
            action: format!("/jobs/{}", job.id),
            title: job.title,
            company: job.company,
            job_type: job.job_type,
            experience_level: job.experience_level,
            salary: job.salary.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "delete_job.html")]
pub struct DeleteJobPage {
    pub job: JobRow,
}

/// Render a page into an HTML response with the given status.
pub fn render<T: Template>(status: StatusCode, page: &T) -> Result<HttpResponse, ServiceError> {
    let body = page.render()?;
    Ok(HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobRow {
        JobRow {
            id: 7,
            title: "Rust <Engineer>".into(),
            company: "Acme".into(),
            job_type: "Remote".into(),
            experience_level: "Senior".into(),
            salary: 120_000,
        }
    }

    #[test]
    fn job_fields_are_html_escaped() {
        let html = JobPage { job: Some(job()) }.render().unwrap();
        assert!(html.contains("Rust &lt;Engineer&gt;"));
        assert!(!html.contains("Rust <Engineer>"));
    }

    #[test]
    fn missing_job_renders_a_notice() {
        let html = JobPage { job: None }.render().unwrap();
        assert!(html.contains("Job not found"));
    }

    #[test]
    fn edit_form_targets_the_job() {
        let html = JobFormPage::edit(job()).render().unwrap();
        assert!(html.contains(r#"action="/jobs/7""#));
        assert!(html.contains(r#"value="120000""#));
    }
}
