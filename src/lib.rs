// src/lib.rs

pub mod achievements;
pub mod config;
pub mod constants;
pub mod database;
pub mod engine;
pub mod error;
pub mod leveling;
pub mod models;
pub mod repository;
pub mod service;
pub mod streak;

pub use engine::{ProgressEngine, ProgressTables};
pub use error::ProgressError;
pub use service::ProgressService;
