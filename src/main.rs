// src/main.rs

use anyhow::Context;
use bloom_progress::config::{Cli, Command};
use bloom_progress::models::CompletionRequest;
use bloom_progress::{database, ProgressEngine, ProgressService, ProgressTables};
use chrono::Utc;
use clap::Parser;
use log::info;
use rusqlite::Connection;
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let db_path = cli.db_path()?;
    info!("Database path: {:?}", db_path);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    // Init Database (Schema + Seeds)
    database::init_db(&conn).context("failed to initialise database")?;

    let service = ProgressService::new(conn, ProgressEngine::new(ProgressTables::default()));

    match cli.command {
        Command::Init => info!("Database ready"),
        Command::Lessons => print_json(&service.lessons()?)?,
        Command::Complete { user, lesson, quiz } => {
            let request = CompletionRequest {
                user_id: user,
                lesson_id: lesson,
                quiz_score: quiz,
            };
            let outcome = service.complete_lesson(&request, Utc::now())?;
            for def in &outcome.unlocked {
                info!("{} Achievement unlocked: {} (+{} XP)", def.icon, def.name, def.xp_bonus);
            }
            print_json(&outcome)?;
        }
        Command::Show { user } => print_json(&service.summary(&user)?)?,
    }

    Ok(())
}
