// src/models.rs

use crate::achievements::AchievementDefinition;
use crate::constants::MIN_LEVEL;
use crate::leveling::LevelProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// --- Catalog Models ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub category: String,
    pub xp_reward: u32,
    pub published: bool,
}

/// Published lesson ids of one category, resolved before the engine runs.
#[derive(Debug, Clone, Default)]
pub struct CategoryLessons {
    pub category: String,
    pub lesson_ids: HashSet<String>,
}

impl CategoryLessons {
    pub fn new<I, S>(category: &str, lesson_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryLessons {
            category: category.to_string(),
            lesson_ids: lesson_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn published_count(&self) -> usize {
        self.lesson_ids.len()
    }
}

// Used for seeding
#[derive(Deserialize)]
pub struct JsonLesson {
    pub id: String,
    pub title: String,
    pub category: String,
    pub xp_reward: u32,
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

// --- Requests ---

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionRequest {
    pub user_id: String,
    pub lesson_id: String,
    /// Percentage; absent when the lesson has no quiz.
    #[serde(default)]
    pub quiz_score: Option<i32>,
}

// --- Progress State ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletedLesson {
    pub lesson_id: String,
    pub completed_at: DateTime<Utc>,
    pub xp_earned: u64,
    pub quiz_score: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub id: String,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    pub user_id: String,
    /// Store-managed; 0 until the record is first saved.
    pub version: u64,
    pub total_xp: u64,
    pub level: u8,
    pub completed_lessons: Vec<CompletedLesson>,
    pub achievements: Vec<UnlockedAchievement>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_activity: Option<DateTime<Utc>>,
    pub category_progress: BTreeMap<String, u8>,
    pub total_lessons_completed: u32,
    pub total_quizzes_passed: u32,
    pub perfect_scores: u32,
}

impl ProgressRecord {
    pub fn new(user_id: &str) -> Self {
        ProgressRecord {
            user_id: user_id.to_string(),
            version: 0,
            total_xp: 0,
            level: MIN_LEVEL,
            completed_lessons: Vec::new(),
            achievements: Vec::new(),
            current_streak: 0,
            longest_streak: 0,
            last_activity: None,
            category_progress: BTreeMap::new(),
            total_lessons_completed: 0,
            total_quizzes_passed: 0,
            perfect_scores: 0,
        }
    }

    pub fn has_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons
            .iter()
            .any(|c| c.lesson_id == lesson_id)
    }

    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == achievement_id)
    }

    /// Number of completed lessons that belong to the given category.
    pub fn completed_in(&self, category: &CategoryLessons) -> usize {
        self.completed_lessons
            .iter()
            .filter(|c| category.lesson_ids.contains(&c.lesson_id))
            .count()
    }
}

// --- Engine Output ---

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Recorded,
    AlreadyCompleted,
}

#[derive(Serialize, Debug, Clone)]
pub struct CompletionOutcome {
    pub status: CompletionStatus,
    pub record: ProgressRecord,
    pub unlocked: Vec<AchievementDefinition>,
    pub xp_earned: u64,
    pub previous_level: u8,
}

impl CompletionOutcome {
    pub fn leveled_up(&self) -> bool {
        self.record.level > self.previous_level
    }
}

// --- Views ---

#[derive(Serialize, Debug, Clone)]
pub struct ProgressSummary {
    pub user_id: String,
    pub total_xp: u64,
    pub level: LevelProgress,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_lessons_completed: u32,
    pub total_quizzes_passed: u32,
    pub perfect_scores: u32,
    pub category_progress: BTreeMap<String, u8>,
    pub achievements: Vec<AchievementView>,
}

#[derive(Serialize, Debug, Clone)]
pub struct AchievementView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
}
