//! # Authentication Module
//!
//! Password hashing and admin authentication for the Muster API.
//!
//! Passwords are hashed with Argon2 before storage. Admin-gated endpoints
//! authenticate with HTTP Basic credentials checked against the `users`
//! table.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::http::HeaderMap;
use base64::Engine;
use eyre::Result;
use muster_core::{errors::MusterError, models::config::AdminUser};
use sqlx::PgPool;

/// Hashes a password using the Argon2 algorithm
///
/// Generates a random salt per password and returns the hash in PHC
/// string format.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a plain text password against a stored PHC hash string.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is malformed: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authenticates the request's Basic credentials against the users table
/// and requires the matched account to be an active admin.
///
/// Returns `Unauthorized` when credentials are absent or wrong and
/// `Forbidden` when the account exists but is not an active admin.
pub async fn require_admin(pool: &PgPool, headers: &HeaderMap) -> Result<AdminUser, MusterError> {
    let (username, password) = basic_credentials(headers)
        .ok_or_else(|| MusterError::Unauthorized("Basic credentials required".to_string()))?;

    let user = muster_db::repositories::users::get_user_by_username(pool, &username)
        .await
        .map_err(MusterError::Database)?
        .ok_or_else(|| MusterError::Unauthorized("Unknown username or password".to_string()))?;

    let matches =
        verify_password(&password, &user.password_hash).map_err(MusterError::Database)?;
    if !matches {
        return Err(MusterError::Unauthorized(
            "Unknown username or password".to_string(),
        ));
    }

    if !user.is_active || !user.is_admin {
        return Err(MusterError::Forbidden(
            "Admin privileges required".to_string(),
        ));
    }

    Ok(user.into())
}

/// Extracts a username/password pair from an `Authorization: Basic` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
