//! Startup provisioning of the first staff account.
//!
//! Every route except login and password reset needs a token, so a fresh
//! database needs one user before anyone can sign in.

use wardwatch_core::error::CoreError;
use wardwatch_core::patient::{validate_email, validate_required};
use wardwatch_db::models::user::CreateUser;
use wardwatch_db::repositories::UserRepo;
use wardwatch_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::config::AdminAccount;
use crate::error::{AppError, AppResult};

/// Create `account` unless a user with that username already exists.
///
/// Returns `true` when a user was created. An existing user is left as is,
/// including its password.
pub async fn ensure_admin_user(
    pool: &DbPool,
    account: &AdminAccount,
    min_password_length: usize,
) -> AppResult<bool> {
    let username = account.username.trim();
    validate_required(username, "ADMIN_USERNAME")?;

    if let Some(existing) = UserRepo::find_by_username(pool, username).await? {
        tracing::debug!(user_id = existing.id, "Admin user already present");
        return Ok(false);
    }

    let email = account.email.trim();
    validate_email(email)?;
    validate_password_strength(&account.password, min_password_length)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&account.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Admin user created");
    Ok(true)
}
