// src/engine.rs

use crate::achievements::{self, AchievementDefinition, CompletionFacts};
use crate::constants::*;
use crate::error::{ProgressError, Result};
use crate::leveling::LevelTable;
use crate::models::{
    CategoryLessons, CompletedLesson, CompletionOutcome, CompletionStatus, Lesson, ProgressRecord,
    UnlockedAchievement,
};
use crate::streak;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

/// Immutable rule tables the engine is built with.
#[derive(Debug, Clone)]
pub struct ProgressTables {
    pub levels: LevelTable,
    pub achievements: Vec<AchievementDefinition>,
}

impl Default for ProgressTables {
    fn default() -> Self {
        ProgressTables {
            levels: LevelTable::default(),
            achievements: achievements::default_achievements(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressEngine {
    tables: ProgressTables,
}

impl ProgressEngine {
    pub fn new(tables: ProgressTables) -> Self {
        ProgressEngine { tables }
    }

    pub fn tables(&self) -> &ProgressTables {
        &self.tables
    }

    pub fn level_from_xp(&self, xp: u64) -> u8 {
        self.tables.levels.level_from_xp(xp)
    }

    pub fn level_title(&self, level: u8) -> &'static str {
        self.tables.levels.title(level)
    }

    pub fn xp_for_next_level(&self, level: u8) -> u64 {
        self.tables.levels.xp_for_next_level(level)
    }

    /// Applies one lesson completion to `record` and returns the updated copy.
    ///
    /// `category` must list the published lessons of `lesson.category`.
    /// Completing a lesson that is already recorded is a no-op.
    pub fn complete_lesson(
        &self,
        record: &ProgressRecord,
        lesson: &Lesson,
        quiz_score: Option<i32>,
        category: &CategoryLessons,
        now: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        let quiz_score = validate(lesson, quiz_score)?;

        if record.has_completed(&lesson.id) {
            warn!(
                "[Engine] {} already completed lesson {}, ignoring",
                record.user_id, lesson.id
            );
            return Ok(CompletionOutcome {
                status: CompletionStatus::AlreadyCompleted,
                record: record.clone(),
                unlocked: Vec::new(),
                xp_earned: 0,
                previous_level: record.level,
            });
        }

        let mut next = record.clone();
        let old_level = record.level;

        // 1. XP for the lesson itself
        let xp_earned = u64::from(lesson.xp_reward)
            + if quiz_score == PERFECT_QUIZ_SCORE {
                PERFECT_SCORE_BONUS_XP
            } else {
                0
            };

        // 2. Completion + counters
        next.completed_lessons.push(CompletedLesson {
            lesson_id: lesson.id.clone(),
            completed_at: now,
            xp_earned,
            quiz_score,
        });
        next.total_lessons_completed += 1;
        if quiz_score >= QUIZ_PASS_THRESHOLD {
            next.total_quizzes_passed += 1;
        }
        if quiz_score == PERFECT_QUIZ_SCORE {
            next.perfect_scores += 1;
        }

        // 3. Streak
        streak::advance(&mut next, now);

        // 4. Lesson XP
        next.total_xp = next.total_xp.saturating_add(xp_earned);
        let leveled_up = self.level_from_xp(next.total_xp) > old_level;
        debug!(
            "[Engine Input] {}: lesson {} (+{} XP, quiz {}), level-up before bonuses: {}",
            next.user_id, lesson.id, xp_earned, quiz_score, leveled_up
        );

        // 5. Achievements, all judged against the same post-lesson state
        let facts = CompletionFacts {
            quiz_score,
            leveled_up,
        };
        let unlocked: Vec<AchievementDefinition> =
            achievements::newly_unlocked(&self.tables.achievements, &next, facts)
                .into_iter()
                .cloned()
                .collect();
        for def in &unlocked {
            next.achievements.push(UnlockedAchievement {
                id: def.id.to_string(),
                unlocked_at: now,
            });
            next.total_xp = next.total_xp.saturating_add(def.xp_bonus);
            info!(
                "[Achievement] {} unlocked {} (+{} XP)",
                next.user_id, def.id, def.xp_bonus
            );
        }

        // 6. Final level
        next.level = self.level_from_xp(next.total_xp);

        // 7. Category progress
        let percent = category_percent(next.completed_in(category), category.published_count());
        next.category_progress.insert(lesson.category.clone(), percent);

        info!(
            "[Engine Result] {}: XP {} -> {}, Level {} -> {}, Streak {}, {} = {}%",
            next.user_id,
            record.total_xp,
            next.total_xp,
            old_level,
            next.level,
            next.current_streak,
            lesson.category,
            percent
        );

        Ok(CompletionOutcome {
            status: CompletionStatus::Recorded,
            record: next,
            unlocked,
            xp_earned,
            previous_level: old_level,
        })
    }
}

fn validate(lesson: &Lesson, quiz_score: Option<i32>) -> Result<u8> {
    if lesson.id.trim().is_empty() {
        return Err(ProgressError::InvalidInput("lesson id is empty".into()));
    }
    if lesson.category.trim().is_empty() {
        return Err(ProgressError::InvalidInput(format!(
            "lesson {} has no category",
            lesson.id
        )));
    }
    match quiz_score.unwrap_or(0) {
        s @ 0..=100 => Ok(s as u8),
        s => Err(ProgressError::InvalidInput(format!(
            "quiz score {s} is outside 0..=100"
        ))),
    }
}

fn category_percent(completed: usize, published: usize) -> u8 {
    if published == 0 {
        return 0;
    }
    let pct = (100.0 * completed as f64 / published as f64).round();
    pct.clamp(0.0, 100.0) as u8
}
