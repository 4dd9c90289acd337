// src/config.rs

use crate::constants::{APP_DIR_NAME, DEFAULT_DB_FILE};
use crate::error::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bloom-progress", version, about = "Lesson XP, levels, streaks and achievements")]
pub struct Cli {
    /// SQLite database file. Defaults to the platform data directory.
    #[arg(long, global = true, env = "BLOOM_DB")]
    pub db: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the schema and seed the lesson catalog.
    Init,
    /// List published lessons.
    Lessons,
    /// Record a lesson completion for a user.
    Complete {
        #[arg(long)]
        user: String,
        #[arg(long)]
        lesson: String,
        /// Quiz percentage, omitted for lessons without a quiz.
        #[arg(long, allow_negative_numbers = true)]
        quiz: Option<i32>,
    },
    /// Show a user's progress summary.
    Show {
        #[arg(long)]
        user: String,
    },
}

impl Cli {
    /// Resolves the database path and makes sure its directory exists.
    pub fn db_path(&self) -> Result<PathBuf> {
        let path = match &self.db {
            Some(p) => p.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR_NAME)
                .join(DEFAULT_DB_FILE),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating data directory {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }
        Ok(path)
    }
}
