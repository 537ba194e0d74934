// src/quiz/mod.rs

//! Test-session engine: question selection, attempt tracking, scoring and
//! cross-session wrong-answer statistics. Everything here is free of HTTP
//! and storage concerns.

pub mod aggregate;
pub mod bank;
pub mod scoring;
pub mod shuffle;
pub mod source;
pub mod timer;
pub mod tracker;
pub mod transport;
