// src/models/bookmark.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// DTO for adding or removing a bookmark.
#[derive(Debug, Deserialize, Validate)]
pub struct BookmarkRequest {
    #[validate(length(min = 3, max = 64))]
    pub qid: String,
}

/// The user's bookmark set, sorted by qid.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub bookmarked_qids: Vec<String>,
}
