// src/achievements.rs
//! Achievement definitions and the predicates that unlock them.
//!
//! Definitions are plain data so alternate tables can be handed to the engine.
//! Every rule is checked independently; several can fire on one completion.

use crate::constants::*;
use crate::models::ProgressRecord;
use serde::Serialize;

/// Condition under which an achievement unlocks.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AchievementRule {
    LessonsCompletedExactly(u32),
    LessonsCompletedAtLeast(u32),
    PerfectScoreThisEvent,
    StreakAtLeast(u32),
    QuizzesPassedAtLeast(u32),
    LevelUp,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub xp_bonus: u64,
    pub rule: AchievementRule,
}

impl AchievementDefinition {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        icon: &'static str,
        xp_bonus: u64,
        rule: AchievementRule,
    ) -> Self {
        Self {
            id,
            name,
            description,
            icon,
            xp_bonus,
            rule,
        }
    }
}

/// What happened in the completion being evaluated, beyond the record's counters.
#[derive(Debug, Clone, Copy)]
pub struct CompletionFacts {
    pub quiz_score: u8,
    pub leveled_up: bool,
}

pub fn default_achievements() -> Vec<AchievementDefinition> {
    use AchievementRule::*;
    vec![
        // Lesson milestones
        AchievementDefinition::new(
            FIRST_STEPS,
            "First Steps",
            "Complete your first lesson",
            "🌱",
            FIRST_STEPS_BONUS_XP,
            LessonsCompletedExactly(1),
        ),
        AchievementDefinition::new(
            FIVE_LESSONS,
            "Getting Into The Flow",
            "Complete 5 lessons",
            "🌸",
            FIVE_LESSONS_BONUS_XP,
            LessonsCompletedAtLeast(FIVE_LESSONS_THRESHOLD),
        ),
        AchievementDefinition::new(
            TEN_LESSONS,
            "Knowledge Bloom",
            "Complete 10 lessons",
            "🌺",
            TEN_LESSONS_BONUS_XP,
            LessonsCompletedAtLeast(TEN_LESSONS_THRESHOLD),
        ),
        // Quiz
        AchievementDefinition::new(
            PERFECT_SCORE,
            "Perfect Score",
            "Score 100% on a lesson quiz",
            "⭐",
            PERFECT_SCORE_ACHIEVEMENT_XP,
            PerfectScoreThisEvent,
        ),
        // Streaks
        AchievementDefinition::new(
            ON_FIRE_3,
            "On Fire",
            "Learn 3 days in a row",
            "🔥",
            ON_FIRE_BONUS_XP,
            StreakAtLeast(ON_FIRE_STREAK_DAYS),
        ),
        AchievementDefinition::new(
            UNSTOPPABLE_7,
            "Unstoppable",
            "Learn 7 days in a row",
            "🚀",
            UNSTOPPABLE_BONUS_XP,
            StreakAtLeast(UNSTOPPABLE_STREAK_DAYS),
        ),
        AchievementDefinition::new(
            QUIZ_MASTER,
            "Quiz Master",
            "Pass 10 quizzes",
            "🧠",
            QUIZ_MASTER_BONUS_XP,
            QuizzesPassedAtLeast(QUIZ_MASTER_THRESHOLD),
        ),
        AchievementDefinition::new(
            LEVEL_UP,
            "Level Up",
            "Reach a new level",
            "🏆",
            LEVEL_UP_BONUS_XP,
            LevelUp,
        ),
    ]
}

pub fn find<'a>(
    definitions: &'a [AchievementDefinition],
    id: &str,
) -> Option<&'a AchievementDefinition> {
    definitions.iter().find(|d| d.id == id)
}

pub fn is_satisfied(rule: AchievementRule, record: &ProgressRecord, facts: CompletionFacts) -> bool {
    match rule {
        AchievementRule::LessonsCompletedExactly(n) => record.total_lessons_completed == n,
        AchievementRule::LessonsCompletedAtLeast(n) => record.total_lessons_completed >= n,
        AchievementRule::PerfectScoreThisEvent => facts.quiz_score == PERFECT_QUIZ_SCORE,
        AchievementRule::StreakAtLeast(n) => record.current_streak >= n,
        AchievementRule::QuizzesPassedAtLeast(n) => record.total_quizzes_passed >= n,
        AchievementRule::LevelUp => facts.leveled_up,
    }
}

/// Definitions whose rule holds and which the record does not hold yet, in table order.
pub fn newly_unlocked<'a>(
    definitions: &'a [AchievementDefinition],
    record: &ProgressRecord,
    facts: CompletionFacts,
) -> Vec<&'a AchievementDefinition> {
    definitions
        .iter()
        .filter(|d| !record.has_achievement(d.id))
        .filter(|d| is_satisfied(d.rule, record, facts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(quiz_score: u8, leveled_up: bool) -> CompletionFacts {
        CompletionFacts {
            quiz_score,
            leveled_up,
        }
    }

    fn record_with(lessons: u32, quizzes: u32, streak: u32) -> ProgressRecord {
        let mut r = ProgressRecord::new("u1");
        r.total_lessons_completed = lessons;
        r.total_quizzes_passed = quizzes;
        r.current_streak = streak;
        r.longest_streak = streak;
        r
    }

    fn ids(defs: &[&AchievementDefinition]) -> Vec<&'static str> {
        defs.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_default_table_ids_are_unique() {
        let defs = default_achievements();
        let mut seen: Vec<_> = defs.iter().map(|d| d.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), defs.len());
        assert_eq!(defs.len(), 8);
    }

    #[test]
    fn test_first_lesson_unlocks_first_steps_only() {
        let defs = default_achievements();
        let unlocked = newly_unlocked(&defs, &record_with(1, 0, 1), facts(0, false));
        assert_eq!(ids(&unlocked), vec![FIRST_STEPS]);
    }

    #[test]
    fn test_first_steps_is_exact_count() {
        let defs = default_achievements();
        let unlocked = newly_unlocked(&defs, &record_with(2, 0, 1), facts(0, false));
        assert!(unlocked.is_empty());
    }

    #[test]
    fn test_rules_stack_in_one_event() {
        let defs = default_achievements();
        let unlocked = newly_unlocked(&defs, &record_with(10, 10, 7), facts(100, true));
        assert_eq!(
            ids(&unlocked),
            vec![
                FIVE_LESSONS,
                TEN_LESSONS,
                PERFECT_SCORE,
                ON_FIRE_3,
                UNSTOPPABLE_7,
                QUIZ_MASTER,
                LEVEL_UP
            ]
        );
    }

    #[test]
    fn test_already_held_is_skipped() {
        let defs = default_achievements();
        let mut record = record_with(6, 0, 3);
        record.achievements.push(crate::models::UnlockedAchievement {
            id: FIVE_LESSONS.to_string(),
            unlocked_at: chrono::Utc::now(),
        });
        let unlocked = newly_unlocked(&defs, &record, facts(0, false));
        assert_eq!(ids(&unlocked), vec![ON_FIRE_3]);
    }

    #[test]
    fn test_find_definition() {
        let defs = default_achievements();
        assert_eq!(find(&defs, PERFECT_SCORE).map(|d| d.xp_bonus), Some(75));
        assert!(find(&defs, "nope").is_none());
    }
}
