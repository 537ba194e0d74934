// src/handlers/mod.rs

pub mod auth;
pub mod bookmarks;
pub mod questions;
pub mod sessions;
pub mod test_results;
