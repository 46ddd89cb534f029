use actix_web::{
    HttpRequest, HttpResponse, get, post, route,
    cookie::{Cookie, SameSite},
    http::StatusCode,
    web::{Data, Form, ServiceConfig},
};
use chrono::Utc;
use rand::{Rng, distributions::Alphanumeric};
use serde::Deserialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::api::error::ServiceError;
use crate::api::{redirect, see_other};
use crate::api::views::{IndexPage, LoginPage, RegisterPage, render};
use crate::db::store::AccountStore;
use super::guard::{OptionalUser, SESSION_COOKIE};
use super::password::{hash_password, verify_password};
use super::AuthSettings;

const SESSION_TOKEN_LENGTH: usize = 48;

/// bcrypt ignores everything past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Deserialize, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Validate)]
pub struct Registration {
    #[validate(length(min = 1, max = 64, message = "Username must be between 1 and 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Registration {
    /// Field rules plus the byte limit bcrypt imposes on passwords.
    pub fn is_acceptable(&self) -> bool {
        self.validate().is_ok() && self.password.len() <= MAX_PASSWORD_BYTES
    }
}

pub fn new_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[get("/")]
async fn home(OptionalUser(user): OptionalUser) -> Result<HttpResponse, ServiceError> {
    render(StatusCode::OK, &IndexPage { user })
}

#[get("/register")]
async fn register_form() -> Result<HttpResponse, ServiceError> {
    render(StatusCode::OK, &RegisterPage { error: None })
}

#[post("/register")]
async fn register(
    accounts: Data<dyn AccountStore>,
    settings: Data<AuthSettings>,
    form: Form<Registration>,
) -> Result<HttpResponse, ServiceError> {
    let registration = form.into_inner();
    if !registration.is_acceptable() {
        warn!("Rejected registration for username={}", registration.username);
        return render(StatusCode::OK, &RegisterPage {
            error: Some("Registration failed."),
        });
    }
    let Registration { username, password } = registration;

    let result = match hash_password(&password, settings.bcrypt_cost).await {
        Ok(hashed) => accounts
            .create_user(&username, &hashed)
            .await
            .map_err(ServiceError::database("Registration failed.")),
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => {
            info!("Registered user {} with id={}", username, id);
            Ok(redirect("/login"))
        }
        Err(e) => {
            error!("Error during registration: {}", e);
            render(StatusCode::OK, &RegisterPage {
                error: Some("Registration failed."),
            })
        }
    }
}

#[get("/login")]
async fn login_form() -> Result<HttpResponse, ServiceError> {
    render(StatusCode::OK, &LoginPage { error: None })
}

#[post("/login")]
async fn login(
    accounts: Data<dyn AccountStore>,
    settings: Data<AuthSettings>,
    form: Form<Credentials>,
) -> Result<HttpResponse, ServiceError> {
    let user = accounts
        .find_user_by_username(&form.username)
        .await
        .map_err(ServiceError::database("Error during login"))?;

    let verified = match &user {
        Some(user) => verify_password(&form.password, &user.password_hash).await?,
        None => false,
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!("Failed login attempt for username={}", form.username);
            return render(StatusCode::UNAUTHORIZED, &LoginPage {
                error: Some("Invalid username or password."),
            });
        }
    };

    let token = new_session_token();
    let expires_at = Utc::now() + settings.session_ttl;
    accounts
        .create_session(&token, user.id, expires_at)
        .await
        .map_err(ServiceError::database("Error during login"))?;

    info!("User {} logged in", user.username);

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(settings.secure_cookie)
        .same_site(SameSite::Lax)
        .finish();

    Ok(see_other("/").cookie(cookie).finish())
}

#[route("/logout", method = "GET", method = "POST")]
async fn logout(req: HttpRequest, accounts: Data<dyn AccountStore>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Err(e) = accounts.delete_session(cookie.value()).await {
            error!("Failed to delete session on logout: {:?}", e);
        }
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    see_other("/").cookie(removal).finish()
}

pub fn auth_config(config: &mut ServiceConfig) {
    config
        .service(home)
        .service(register_form)
        .service(register)
        .service(login_form)
        .service(login)
        .service(logout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_are_long_and_distinct() {
        let a = new_session_token();
        let b = new_session_token();
        assert_eq!(a.len(), SESSION_TOKEN_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn password_limit_counts_bytes() {
        assert!(registration("ana", &"a".repeat(MAX_PASSWORD_BYTES)).is_acceptable());
        assert!(!registration("ana", &"a".repeat(MAX_PASSWORD_BYTES + 1)).is_acceptable());
        // 40 characters, 80 bytes
        assert!(!registration("ana", &"é".repeat(40)).is_acceptable());
    }

    #[test]
    fn empty_fields_are_not_acceptable() {
        assert!(!registration("", "pw").is_acceptable());
        assert!(!registration("ana", "").is_acceptable());
        assert!(!registration(&"u".repeat(65), "pw").is_acceptable());
    }
}
