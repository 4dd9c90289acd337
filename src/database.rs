// src/database.rs

use crate::error::Result;
use crate::models::JsonLesson;
use log::{debug, info};
use rusqlite::{params, Connection};

pub fn init_db(conn: &Connection) -> Result<()> {
    debug!("init_db: Checking database schema...");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            xp_reward INTEGER NOT NULL CHECK (xp_reward >= 0),
            published INTEGER NOT NULL DEFAULT 1
        );
        CREATE INDEX IF NOT EXISTS idx_lessons_category ON lessons (category);
        CREATE TABLE IF NOT EXISTS progress (
            user_id TEXT PRIMARY KEY,
            version INTEGER NOT NULL,
            total_xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            current_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            last_activity_ts INTEGER,
            total_lessons_completed INTEGER NOT NULL DEFAULT 0,
            total_quizzes_passed INTEGER NOT NULL DEFAULT 0,
            perfect_scores INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS completed_lessons (
            user_id TEXT NOT NULL,
            lesson_id TEXT NOT NULL,
            completed_at INTEGER NOT NULL,
            xp_earned INTEGER NOT NULL,
            quiz_score INTEGER NOT NULL CHECK (quiz_score BETWEEN 0 AND 100),
            PRIMARY KEY (user_id, lesson_id)
        );
        CREATE TABLE IF NOT EXISTS user_achievements (
            user_id TEXT NOT NULL,
            achievement_id TEXT NOT NULL,
            unlocked_at INTEGER NOT NULL,
            PRIMARY KEY (user_id, achievement_id)
        );
        CREATE TABLE IF NOT EXISTS category_progress (
            user_id TEXT NOT NULL,
            category TEXT NOT NULL,
            percent INTEGER NOT NULL CHECK (percent BETWEEN 0 AND 100),
            PRIMARY KEY (user_id, category)
        );
        ",
    )?;

    let count: i64 = conn.query_row("SELECT count(*) FROM lessons", [], |row| row.get(0))?;
    if count == 0 {
        info!("init_db: Lesson catalog empty. Seeding data...");
        seed_lessons(conn, include_str!("data/lessons.json"))?;
    }

    Ok(())
}

/// Inserts (or replaces) the lessons described by a JSON array.
pub fn seed_lessons(conn: &Connection, json: &str) -> Result<usize> {
    let lessons: Vec<JsonLesson> = serde_json::from_str(json)?;

    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO lessons (id, title, category, xp_reward, published) VALUES (?, ?, ?, ?, ?)",
    )?;
    for l in &lessons {
        stmt.execute(params![l.id, l.title, l.category, l.xp_reward, l.published])?;
    }

    info!("Seeded {} lessons", lessons.len());
    Ok(lessons.len())
}
