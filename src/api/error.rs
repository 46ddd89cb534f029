use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;
use tracing::error;

/// Failures a handler can surface to the client.
///
/// Every variant becomes a fixed plain-text 500; the underlying cause only
/// goes to the log.
#[derive(Debug)]
pub enum ServiceError {
    /// Store operation failed. `context` is the static message sent to the client.
    Database {
        context: &'static str,
        source: sqlx::Error,
    },

    /// A page template failed to render
    Template(askama::Error),

    /// Password hashing or verification failed
    Hashing(String),
}

impl ServiceError {
    /// Adapter for `map_err` on repository results.
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> ServiceError {
        move |source| ServiceError::Database { context, source }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Database { context, source } => write!(f, "{}: {}", context, source),
            ServiceError::Template(e) => write!(f, "Template error: {}", e),
            ServiceError::Hashing(msg) => write!(f, "Hashing error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<askama::Error> for ServiceError {
    fn from(e: askama::Error) -> Self {
        ServiceError::Template(e)
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ServiceError::Database { context, source } => {
                error!("Database error ({}): {:?}", context, source);
                *context
            }
            ServiceError::Template(e) => {
                error!("Template error: {}", e);
                "Failed to render page"
            }
            ServiceError::Hashing(msg) => {
                error!("Hashing error: {}", msg);
                "Failed to process credentials"
            }
        };

        HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(message)
    }
}
