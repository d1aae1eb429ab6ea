//! Test helpers and fixtures for import integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! to match production behavior and properly test migrations, constraints, and indexes.

use soundmark_core::types::{CreateEntry, ImportRow, LibraryEntry, Status, User, UserId};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = soundmark_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        soundmark_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a test user
pub async fn create_test_user(pool: &SqlitePool, email: &str) -> UserId {
    let user = User::new(email);
    soundmark_storage::users::create(pool, &user)
        .await
        .expect("Failed to create test user");
    user.id
}

/// Test fixture: Bare import row with just artist and title
pub fn row(artist: &str, title: &str) -> ImportRow {
    ImportRow {
        artist: artist.to_string(),
        title: title.to_string(),
        ..ImportRow::default()
    }
}

/// Test fixture: Create a minimal entry and return it
pub async fn create_test_entry(
    pool: &SqlitePool,
    user_id: &UserId,
    artist: &str,
    title: &str,
) -> LibraryEntry {
    let entry = CreateEntry {
        user_id: user_id.clone(),
        artist: artist.to_string(),
        title: title.to_string(),
        release_year: None,
        genre: None,
        subgenre: None,
        country: None,
        status: Status::Queued,
        rating: None,
        influence_notes: None,
        cover_image_url: None,
        lastfm_url: None,
        album_wiki: None,
        tracks: Vec::new(),
        similar_artists: Vec::new(),
    };
    soundmark_storage::entries::create(pool, entry)
        .await
        .expect("Failed to create test entry")
}
