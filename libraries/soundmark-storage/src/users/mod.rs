//! User account and credential queries

use crate::StorageError;
use soundmark_core::types::{User, UserId};
use sqlx::{Row, SqlitePool};

type Result<T> = std::result::Result<T, StorageError>;

/// Insert a new user row
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user` - User to persist; the caller builds it via `User::new`
pub async fn create(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query("INSERT INTO users (id, email, created_at) VALUES (?, ?, ?)")
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.created_at)
        .execute(pool)
        .await?;

    Ok(())
}

/// Look up a user by id
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, created_at FROM users WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }))
}

/// Look up a user by login email
pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT id, email, created_at FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }))
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query("SELECT id, email, created_at FROM users ORDER BY email")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| User {
            id: row.get("id"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Number of accounts, for the signup cap
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Get user's password hash for authentication
///
/// # Returns
///
/// Returns the password hash if found, or None if the user has no
/// credentials
pub async fn get_password_hash(pool: &SqlitePool, user_id: &UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM user_credentials WHERE user_id = ?")
        .bind(user_id.as_str())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.get("password_hash")))
}

/// Create or update user credentials
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `password_hash` - Hashed password (should already be hashed with bcrypt)
pub async fn set_password_hash(
    pool: &SqlitePool,
    user_id: &UserId,
    password_hash: &str,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_credentials (user_id, password_hash, updated_at)
         VALUES (?, ?, datetime('now'))
         ON CONFLICT(user_id)
         DO UPDATE SET password_hash = excluded.password_hash, updated_at = datetime('now')",
    )
    .bind(user_id.as_str())
    .bind(password_hash)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a user; credentials and entries cascade
pub async fn delete(pool: &SqlitePool, id: &UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id.as_str()));
    }

    Ok(())
}
