pub mod auth;
pub mod error;
pub mod health;
pub mod job;
pub mod validation;
pub mod views;

use actix_web::{HttpResponse, HttpResponseBuilder, http::header, web::{self, ServiceConfig}};

/// 303 builder pointing at `location`, for handlers that attach cookies.
pub fn see_other(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

/// Post/redirect/get response after a successful mutation.
pub fn redirect(location: &str) -> HttpResponse {
    see_other(location).finish()
}

/// Request body limits. Form extractors keep their own limit and ignore
/// `PayloadConfig`, so each is set explicitly.
pub fn body_limits(limit: usize) -> impl FnOnce(&mut ServiceConfig) {
    move |config| {
        config
            .app_data(web::PayloadConfig::default().limit(limit))
            .app_data(web::FormConfig::default().limit(limit))
            .app_data(validation::form_config(limit));
    }
}

/// Every route of the application.
///
/// Callers register `Data<JobService>`, `Data<dyn JobStore>`,
/// `Data<dyn AccountStore>` and `Data<AuthSettings>`, and configure
/// `body_limits`.
pub fn routes(config: &mut ServiceConfig) {
    config
        .configure(health::health_config)
        .configure(auth::handlers::auth_config)
        .configure(job::handlers::job_config);
}
