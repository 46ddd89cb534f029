//! Authentication gate for routes that require a logged-in user.
//!
//! Gated handlers take a [`CurrentUser`] parameter. Extraction resolves the
//! session cookie through the `AccountStore` and then applies [`authorize`];
//! a denied request is redirected to `/login` before the handler body runs.

use std::fmt;

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, ResponseError,
    dev::Payload,
    http::{StatusCode, header},
    web::Data,
};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::api::error::ServiceError;
use crate::db::models::UserSummary;
use crate::db::store::AccountStore;

pub const SESSION_COOKIE: &str = "job_board_session";

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, PartialEq, Eq)]
pub enum Access {
    Allow(UserSummary),
    Deny,
}

/// Allow exactly when the request carries a live session.
pub fn authorize(session_user: Option<UserSummary>) -> Access {
    match session_user {
        Some(user) => Access::Allow(user),
        None => Access::Deny,
    }
}

/// Denial from the gate. Renders as a redirect, not a 4xx.
#[derive(Debug)]
pub struct LoginRequired;

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "login required")
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::SEE_OTHER
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_PATH))
            .finish()
    }
}

/// Resolve the request's session cookie to its user, if any.
///
/// Returns a future that owns everything it needs, so extractors can box it.
fn resolve_session_user(
    req: &HttpRequest,
) -> impl std::future::Future<Output = Result<Option<UserSummary>, ServiceError>> + 'static {
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    let accounts = req.app_data::<Data<dyn AccountStore>>().cloned();
    let path = req.path().to_string();

    async move {
        match (token, accounts) {
            (Some(token), Some(accounts)) => accounts
                .find_session_user(&token)
                .await
                .map_err(ServiceError::database("Error checking session")),
            (_, None) => {
                warn!("No account store registered; no session for {}", path);
                Ok(None)
            }
            (None, _) => Ok(None),
        }
    }
}

/// The user behind the request's session. Extraction fails with
/// [`LoginRequired`] when there is none.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserSummary);

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session_user = resolve_session_user(req);
        let path = req.path().to_string();

        Box::pin(async move {
            match authorize(session_user.await?) {
                Access::Allow(user) => Ok(CurrentUser(user)),
                Access::Deny => {
                    warn!("Unauthenticated request to {}, redirecting to login", path);
                    Err(LoginRequired.into())
                }
            }
        })
    }
}

/// The session's user on pages that also serve anonymous visitors.
///
/// Absence is not a denial; store failures still surface as errors.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<UserSummary>);

impl FromRequest for OptionalUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session_user = resolve_session_user(req);
        Box::pin(async move { Ok(OptionalUser(session_user.await?)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{cookie::Cookie, test::TestRequest};
    use chrono::{Duration, Utc};

    use crate::db::MemoryStore;

    fn request_with(store: Arc<MemoryStore>, token: Option<&str>) -> HttpRequest {
        let accounts: Data<dyn AccountStore> = Data::from(store as Arc<dyn AccountStore>);
        let mut req = TestRequest::get().uri("/").app_data(accounts);
        if let Some(token) = token {
            req = req.cookie(Cookie::new(SESSION_COOKIE, token.to_string()));
        }
        req.to_http_request()
    }

    #[actix_web::test]
    async fn optional_user_is_none_for_anonymous_visitors() {
        let store = Arc::new(MemoryStore::new());

        let OptionalUser(user) = OptionalUser::extract(&request_with(store.clone(), None))
            .await
            .unwrap();
        assert!(user.is_none());

        let OptionalUser(user) = OptionalUser::extract(&request_with(store, Some("forged")))
            .await
            .unwrap();
        assert!(user.is_none());
    }

    #[actix_web::test]
    async fn optional_user_resolves_a_live_session() {
        let store = Arc::new(MemoryStore::new());
        let id = store.create_user("ana", "hash").await.unwrap();
        store
            .create_session("tok", id, Utc::now() + Duration::hours(1))
            .await
            .unwrap();

        let OptionalUser(user) = OptionalUser::extract(&request_with(store.clone(), Some("tok")))
            .await
            .unwrap();
        assert_eq!(user.unwrap().username, "ana");

        let CurrentUser(user) = CurrentUser::extract(&request_with(store, Some("tok")))
            .await
            .unwrap();
        assert_eq!(user.id, id);
    }

    #[actix_web::test]
    async fn current_user_denies_without_a_session() {
        let store = Arc::new(MemoryStore::new());
        let err = CurrentUser::extract(&request_with(store, None)).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn sessions_allow_and_absence_denies() {
        let user = UserSummary {
            id: 1,
            username: "ana".into(),
        };
        assert_eq!(authorize(Some(user.clone())), Access::Allow(user));
        assert_eq!(authorize(None), Access::Deny);
    }

    #[test]
    fn denial_redirects_to_login() {
        let resp = LoginRequired.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }
}
