// src/repository/memory.rs

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::AppError,
    models::{test_result::TestResult, user::User},
    repository::{BookmarkRepository, TestResultRepository, UserRepository},
};

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "Username '{}' already exists",
                username
            )));
        }

        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password: password_hash.to_string(),
            role: "user".to_string(),
            created_at: Some(chrono::Utc::now()),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTestResultRepository {
    /// Insertion order; the newest result is last.
    results: RwLock<Vec<TestResult>>,
}

#[async_trait]
impl TestResultRepository for MemoryTestResultRepository {
    async fn insert(&self, result: &TestResult) -> Result<(), AppError> {
        self.results.write().await.push(result.clone());
        Ok(())
    }

    async fn recent_for_user(&self, user_id: i64, limit: i64) -> Result<Vec<TestResult>, AppError> {
        let results = self.results.read().await;
        Ok(results
            .iter()
            .rev()
            .filter(|r| r.user_id == Some(user_id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryBookmarkRepository {
    sets: RwLock<HashMap<i64, BTreeSet<String>>>,
}

#[async_trait]
impl BookmarkRepository for MemoryBookmarkRepository {
    async fn list(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let sets = self.sets.read().await;
        Ok(sets
            .get(&user_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError> {
        let mut sets = self.sets.write().await;
        let set = sets.entry(user_id).or_default();
        set.insert(qid.to_string());
        Ok(set.iter().cloned().collect())
    }

    async fn remove(&self, user_id: i64, qid: &str) -> Result<Vec<String>, AppError> {
        let mut sets = self.sets.write().await;
        let set = sets.entry(user_id).or_default();
        set.remove(qid);
        Ok(set.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;
    use uuid::Uuid;

    use super::*;

    fn result(user_id: Option<i64>, score: i32) -> TestResult {
        TestResult {
            id: Uuid::new_v4(),
            user_id,
            is_guest: user_id.is_none(),
            category: "psychology".to_string(),
            score,
            total_questions: 1,
            correct_answers: 1,
            wrong_answers: 0,
            time_taken: 5,
            answers: Json(vec![]),
            normalized_score: None,
            grade: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn bookmark_add_is_idempotent() {
        let repo = MemoryBookmarkRepository::default();
        repo.add(1, "p_7").await.unwrap();
        let qids = repo.add(1, "p_7").await.unwrap();
        assert_eq!(qids, vec!["p_7".to_string()]);

        repo.add(1, "c_2").await.unwrap();
        assert_eq!(repo.list(1).await.unwrap(), vec!["c_2", "p_7"]);
        assert!(repo.list(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bookmark_remove_of_missing_qid_is_harmless() {
        let repo = MemoryBookmarkRepository::default();
        repo.add(1, "p_7").await.unwrap();
        assert!(repo.remove(1, "p_7").await.unwrap().is_empty());
        assert!(repo.remove(1, "p_7").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn results_are_newest_first_and_capped() {
        let repo = MemoryTestResultRepository::default();
        for score in 0..15 {
            repo.insert(&result(Some(1), score)).await.unwrap();
        }
        repo.insert(&result(None, 99)).await.unwrap();
        repo.insert(&result(Some(2), 98)).await.unwrap();

        let recent = repo.recent_for_user(1, 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].score, 14);
        assert_eq!(recent[9].score, 5);
    }

    #[tokio::test]
    async fn duplicate_usernames_conflict() {
        let repo = MemoryUserRepository::default();
        let user = repo.create("alice", "hash").await.unwrap();
        assert_eq!(user.id, 1);
        assert!(matches!(
            repo.create("alice", "hash").await,
            Err(AppError::Conflict(_))
        ));
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }
}
