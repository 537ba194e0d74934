// src/models/mod.rs

pub mod bookmark;
pub mod question;
pub mod stats;
pub mod test_result;
pub mod user;
