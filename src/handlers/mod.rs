// src/handlers/mod.rs

pub mod auth;
pub mod catalog;
pub mod courses;
pub mod enrollment;
pub mod metrics;
pub mod payment;
pub mod progress;
