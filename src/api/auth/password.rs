use bcrypt::{hash, verify};

use crate::api::error::ServiceError;

/// Hash a password with bcrypt on the blocking thread pool.
pub async fn hash_password(password: &str, cost: u32) -> Result<String, ServiceError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        hash(password, cost).map_err(|e| ServiceError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| ServiceError::Hashing(format!("Task join error: {}", e)))?
}

/// `Ok(false)` on mismatch; `Err` only when the hash itself is unusable.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, ServiceError> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();

    tokio::task::spawn_blocking(move || {
        verify(password, &password_hash).map_err(|e| ServiceError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| ServiceError::Hashing(format!("Task join error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("hunter22", 4).await.unwrap();
        assert_ne!(hashed, "hunter22");
        assert!(verify_password("hunter22", &hashed).await.unwrap());
        assert!(!verify_password("hunter23", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_password("pw", "not-a-bcrypt-hash").await.is_err());
    }
}
