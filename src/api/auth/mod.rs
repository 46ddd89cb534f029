pub mod guard;
pub mod handlers;
pub mod password;

pub use guard::{CurrentUser, OptionalUser, SESSION_COOKIE};

/// Knobs for login sessions and password hashing.
#[derive(Clone, Debug)]
pub struct AuthSettings {
    pub session_ttl: chrono::Duration,
    pub secure_cookie: bool,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::hours(24),
            secure_cookie: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}
