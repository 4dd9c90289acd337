// src/repository.rs

use crate::error::{ProgressError, Result};
use crate::models::{
    CategoryLessons, CompletedLesson, Lesson, ProgressRecord, UnlockedAchievement,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};

// --- Lesson Catalog ---

fn lesson_from_row(row: &Row) -> rusqlite::Result<Lesson> {
    Ok(Lesson {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        xp_reward: row.get(3)?,
        published: row.get(4)?,
    })
}

/// Resolves a published lesson by id.
pub fn get_lesson(conn: &Connection, lesson_id: &str) -> Result<Option<Lesson>> {
    let lesson = conn
        .query_row(
            "SELECT id, title, category, xp_reward, published
             FROM lessons
             WHERE id = ? AND published = 1",
            [lesson_id],
            lesson_from_row,
        )
        .optional()?;
    Ok(lesson)
}

pub fn list_lessons(conn: &Connection) -> Result<Vec<Lesson>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, category, xp_reward, published
         FROM lessons
         WHERE published = 1
         ORDER BY category, id",
    )?;
    let lessons = stmt
        .query_map([], lesson_from_row)?
        .collect::<rusqlite::Result<Vec<Lesson>>>()?;
    Ok(lessons)
}

/// Loads every published lesson id of a category in one query.
pub fn published_lesson_ids(conn: &Connection, category: &str) -> Result<CategoryLessons> {
    let mut stmt =
        conn.prepare("SELECT id FROM lessons WHERE category = ? AND published = 1")?;
    let ids = stmt
        .query_map([category], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;

    debug!("[DB] Category {} has {} published lessons", category, ids.len());
    Ok(CategoryLessons::new(category, ids))
}

// --- Progress Store ---

/// Loads a user's progress, or a fresh zero record if none was ever saved.
pub fn load_progress(conn: &Connection, user_id: &str) -> Result<ProgressRecord> {
    let base = conn
        .query_row(
            "SELECT version, total_xp, level, current_streak, longest_streak, last_activity_ts,
                    total_lessons_completed, total_quizzes_passed, perfect_scores
             FROM progress
             WHERE user_id = ?",
            [user_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, u8>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, Option<i64>>(5)?,
                    row.get::<_, u32>(6)?,
                    row.get::<_, u32>(7)?,
                    row.get::<_, u32>(8)?,
                ))
            },
        )
        .optional()?;

    let Some((version, total_xp, level, current, longest, last_ts, lessons, quizzes, perfect)) =
        base
    else {
        debug!("[DB] No progress for {}, starting fresh", user_id);
        return Ok(ProgressRecord::new(user_id));
    };

    let mut record = ProgressRecord::new(user_id);
    record.version = to_u64(version, "version")?;
    record.total_xp = to_u64(total_xp, "total_xp")?;
    record.level = level;
    record.current_streak = current;
    record.longest_streak = longest;
    record.last_activity = last_ts.map(from_ts).transpose()?;
    record.total_lessons_completed = lessons;
    record.total_quizzes_passed = quizzes;
    record.perfect_scores = perfect;

    let mut stmt = conn.prepare(
        "SELECT lesson_id, completed_at, xp_earned, quiz_score
         FROM completed_lessons
         WHERE user_id = ?
         ORDER BY completed_at, rowid",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, u8>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (lesson_id, completed_at, xp_earned, quiz_score) in rows {
        record.completed_lessons.push(CompletedLesson {
            lesson_id,
            completed_at: from_ts(completed_at)?,
            xp_earned: to_u64(xp_earned, "xp_earned")?,
            quiz_score,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT achievement_id, unlocked_at
         FROM user_achievements
         WHERE user_id = ?
         ORDER BY unlocked_at, rowid",
    )?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    for (id, unlocked_at) in rows {
        record.achievements.push(UnlockedAchievement {
            id,
            unlocked_at: from_ts(unlocked_at)?,
        });
    }

    let mut stmt =
        conn.prepare("SELECT category, percent FROM category_progress WHERE user_id = ?")?;
    let rows = stmt
        .query_map([user_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u8>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    record.category_progress.extend(rows);

    debug!(
        "[DB] Loaded progress for {} (v{}, {} XP)",
        user_id, record.version, record.total_xp
    );
    Ok(record)
}

/// Persists a record with an optimistic version check and returns the new version.
///
/// Must run inside a transaction: the header row and the child rows are written
/// by separate statements. Fails with `ConcurrentUpdate` when the stored version
/// no longer matches `record.version`.
pub fn save_progress(conn: &Connection, record: &ProgressRecord) -> Result<u64> {
    let next_version = record.version + 1;
    let last_ts = record.last_activity.map(|ts| ts.timestamp());

    let changed = if record.version == 0 {
        conn.execute(
            "INSERT OR IGNORE INTO progress (
                user_id, version, total_xp, level, current_streak, longest_streak,
                last_activity_ts, total_lessons_completed, total_quizzes_passed, perfect_scores
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                record.user_id,
                to_i64(next_version)?,
                to_i64(record.total_xp)?,
                record.level,
                record.current_streak,
                record.longest_streak,
                last_ts,
                record.total_lessons_completed,
                record.total_quizzes_passed,
                record.perfect_scores
            ],
        )?
    } else {
        conn.execute(
            "UPDATE progress
             SET version = ?, total_xp = ?, level = ?, current_streak = ?, longest_streak = ?,
                 last_activity_ts = ?, total_lessons_completed = ?, total_quizzes_passed = ?,
                 perfect_scores = ?
             WHERE user_id = ? AND version = ?",
            params![
                to_i64(next_version)?,
                to_i64(record.total_xp)?,
                record.level,
                record.current_streak,
                record.longest_streak,
                last_ts,
                record.total_lessons_completed,
                record.total_quizzes_passed,
                record.perfect_scores,
                record.user_id,
                to_i64(record.version)?
            ],
        )?
    };

    if changed == 0 {
        warn!(
            "[DB] Version mismatch saving {} (expected v{})",
            record.user_id, record.version
        );
        return Err(ProgressError::ConcurrentUpdate {
            user_id: record.user_id.clone(),
        });
    }

    // Completions and achievements are append-only; existing rows are left alone.
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO completed_lessons (user_id, lesson_id, completed_at, xp_earned, quiz_score)
         VALUES (?, ?, ?, ?, ?)",
    )?;
    for c in &record.completed_lessons {
        stmt.execute(params![
            record.user_id,
            c.lesson_id,
            c.completed_at.timestamp(),
            to_i64(c.xp_earned)?,
            c.quiz_score
        ])?;
    }

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at) VALUES (?, ?, ?)",
    )?;
    for a in &record.achievements {
        stmt.execute(params![record.user_id, a.id, a.unlocked_at.timestamp()])?;
    }

    let mut stmt = conn.prepare(
        "INSERT OR REPLACE INTO category_progress (user_id, category, percent) VALUES (?, ?, ?)",
    )?;
    for (category, percent) in &record.category_progress {
        stmt.execute(params![record.user_id, category, percent])?;
    }

    debug!("[DB] Saved progress for {} as v{}", record.user_id, next_version);
    Ok(next_version)
}

// --- Conversions ---

fn from_ts(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| ProgressError::CorruptRecord(format!("timestamp {ts} out of range")))
}

fn to_u64(value: i64, field: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| ProgressError::CorruptRecord(format!("{field} is negative ({value})")))
}

fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| ProgressError::InvalidInput(format!("{value} does not fit in storage")))
}
