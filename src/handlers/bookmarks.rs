// src/handlers/bookmarks.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::bookmark::{BookmarkRequest, BookmarkResponse},
    quiz::bank::QuestionBank,
    repository::Repositories,
    utils::jwt::AuthUser,
};

pub async fn list_bookmarks(
    State(repos): State<Repositories>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookmarked_qids = repos.bookmarks.list(user.id).await?;

    Ok(Json(BookmarkResponse { bookmarked_qids }))
}

/// Bookmarks a question. Bookmarking it twice is harmless.
pub async fn add_bookmark(
    State(repos): State<Repositories>,
    State(bank): State<Arc<QuestionBank>>,
    user: AuthUser,
    Json(payload): Json<BookmarkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if bank.find(&payload.qid).is_none() {
        return Err(AppError::NotFound(format!("Question '{}' not found", payload.qid)));
    }

    let bookmarked_qids = repos.bookmarks.add(user.id, &payload.qid).await?;

    Ok(Json(BookmarkResponse { bookmarked_qids }))
}

/// Removing a qid that is not bookmarked leaves the set unchanged.
pub async fn remove_bookmark(
    State(repos): State<Repositories>,
    user: AuthUser,
    Json(payload): Json<BookmarkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let bookmarked_qids = repos.bookmarks.remove(user.id, &payload.qid).await?;

    Ok(Json(BookmarkResponse { bookmarked_qids }))
}
