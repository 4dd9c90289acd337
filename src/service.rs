// src/service.rs

use crate::constants::MAX_SAVE_ATTEMPTS;
use crate::engine::ProgressEngine;
use crate::error::{ProgressError, Result};
use crate::models::{
    AchievementView, CompletionOutcome, CompletionRequest, CompletionStatus, Lesson,
    ProgressRecord, ProgressSummary,
};
use crate::{achievements, repository};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Mutex, MutexGuard};

/// Owns the store connection and runs each completion as one exclusive
/// load-compute-save cycle.
pub struct ProgressService {
    db: Mutex<Connection>,
    engine: ProgressEngine,
}

impl ProgressService {
    pub fn new(conn: Connection, engine: ProgressEngine) -> Self {
        ProgressService {
            db: Mutex::new(conn),
            engine,
        }
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| ProgressError::LockPoisoned)
    }

    pub fn complete_lesson(
        &self,
        request: &CompletionRequest,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        info!(
            "Processing completion of {} for user {}",
            request.lesson_id, request.user_id
        );
        let mut conn = self.conn()?;

        let mut attempt = 1;
        loop {
            match self.try_complete(&mut conn, request, now) {
                Err(e) if e.is_retryable() && attempt < MAX_SAVE_ATTEMPTS => {
                    warn!(
                        "Retrying completion for {} after conflict (attempt {}/{})",
                        request.user_id, attempt, MAX_SAVE_ATTEMPTS
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn try_complete(
        &self,
        conn: &mut Connection,
        request: &CompletionRequest,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        // IMMEDIATE takes the write lock up front so other writers wait for us
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let lesson = repository::get_lesson(&tx, &request.lesson_id)?
            .ok_or_else(|| ProgressError::LessonNotFound(request.lesson_id.clone()))?;
        let record = repository::load_progress(&tx, &request.user_id)?;
        let category = repository::published_lesson_ids(&tx, &lesson.category)?;

        let mut outcome =
            self.engine
                .complete_lesson(&record, &lesson, request.quiz_score, &category, now)?;

        if outcome.status == CompletionStatus::Recorded {
            outcome.record.version = repository::save_progress(&tx, &outcome.record)?;
            tx.commit()?;
        }
        // a duplicate leaves nothing to write; dropping `tx` rolls back

        Ok(outcome)
    }

    pub fn load(&self, user_id: &str) -> Result<ProgressRecord> {
        let conn = self.conn()?;
        repository::load_progress(&conn, user_id)
    }

    pub fn summary(&self, user_id: &str) -> Result<ProgressSummary> {
        let record = self.load(user_id)?;
        let tables = self.engine.tables();

        let achievements = record
            .achievements
            .iter()
            .filter_map(|a| {
                let def = achievements::find(&tables.achievements, &a.id);
                if def.is_none() {
                    warn!("Unknown achievement {} on {}, skipping", a.id, user_id);
                }
                def.map(|d| AchievementView {
                    id: d.id.to_string(),
                    name: d.name.to_string(),
                    icon: d.icon.to_string(),
                    description: d.description.to_string(),
                    unlocked_at: a.unlocked_at,
                })
            })
            .collect();

        Ok(ProgressSummary {
            user_id: record.user_id.clone(),
            total_xp: record.total_xp,
            level: tables.levels.progress(record.total_xp),
            current_streak: record.current_streak,
            longest_streak: record.longest_streak,
            total_lessons_completed: record.total_lessons_completed,
            total_quizzes_passed: record.total_quizzes_passed,
            perfect_scores: record.perfect_scores,
            category_progress: record.category_progress,
            achievements,
        })
    }

    pub fn lessons(&self) -> Result<Vec<Lesson>> {
        let conn = self.conn()?;
        repository::list_lessons(&conn)
    }
}
