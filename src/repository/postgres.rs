// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::{test_result::TestResult, user::User},
    repository::{BookmarkRepository, TestResultRepository, UserRepository},
};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id, username, password, role, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Username '{}' already exists", username))
            }
            _ => {
                tracing::error!("Failed to register user: {:?}", e);
                AppError::from(e)
            }
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(user)
    }
}

pub struct PgTestResultRepository {
    pool: PgPool,
}

impl PgTestResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestResultRepository for PgTestResultRepository {
    async fn insert(&self, result: &TestResult) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO test_results
            (id, user_id, is_guest, category, score, total_questions, correct_answers,
             wrong_answers, time_taken, answers, normalized_score, grade, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(result.id)
        .bind(result.user_id)
        .bind(result.is_guest)
        .bind(&result.category)
        .bind(result.score)
        .bind(result.total_questions)
        .bind(result.correct_answers)
        .bind(result.wrong_answers)
        .bind(result.time_taken)
        .bind(&result.answers)
        .bind(result.normalized_score)
        .bind(&result.grade)
        .bind(result.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert test result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<TestResult>, AppError> {
        let results = sqlx::query_as::<_, TestResult>(
            r#"
            SELECT
                id, user_id, is_guest, category, score, total_questions, correct_answers,
                wrong_answers, time_taken, answers, normalized_score, grade, created_at
            FROM test_results
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch test results: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

        Ok(results)
    }
}

pub struct PgBookmarkRepository {
    pool: PgPool,
}

impl PgBookmarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookmarkRepository for PgBookmarkRepository {
    async fn list(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let qids = sqlx::query_scalar::<_, String>(
            "SELECT qid FROM bookmarks WHERE user_id = $1 ORDER BY qid",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(qids)
    }

    async fn add(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError> {
        sqlx::query(
            r#"
            INSERT INTO bookmarks (user_id, qid)
            VALUES ($1, $2)
            ON CONFLICT (user_id, qid) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(qid)
        .execute(&self.pool)
        .await?;

        self.list(user_id).await
    }

    async fn remove(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError> {
        sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND qid = $2")
            .bind(user_id)
            .bind(qid)
            .execute(&self.pool)
            .await?;

        self.list(user_id).await
    }
}
