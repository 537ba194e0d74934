// src/repository/mod.rs

//! Persistence collaborators. Handlers only see these traits; `main` decides
//! whether they are backed by Postgres or kept in memory.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{test_result::TestResult, user::User},
};

pub mod memory;
pub mod postgres;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the username is taken.
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}

/// Append-only store of finished tests.
#[async_trait]
pub trait TestResultRepository: Send + Sync {
    async fn insert(&self, result: &TestResult) -> Result<(), AppError>;

    /// The user's results, most recent first.
    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<TestResult>, AppError>;
}

/// Per-user set of bookmarked qids. Every call returns the resulting set, sorted.
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    async fn list(&self, user_id: i64) -> Result<Vec<String>, AppError>;

    /// Adding a qid that is already bookmarked is a no-op.
    async fn add(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError>;

    async fn remove(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError>;
}

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub results: Arc<dyn TestResultRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            results: Arc::new(postgres::PgTestResultRepository::new(pool.clone())),
            bookmarks: Arc::new(postgres::PgBookmarkRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserRepository::default()),
            results: Arc::new(memory::MemoryTestResultRepository::default()),
            bookmarks: Arc::new(memory::MemoryBookmarkRepository::default()),
        }
    }
}
