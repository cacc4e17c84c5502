// src/models/mod.rs

pub mod course;
pub mod enrollment;
pub mod progress;
pub mod quiz_result;
pub mod user;
