//! Property-based tests for the progress engine invariants.

use std::collections::HashSet;

use bloom_progress::leveling::LevelTable;
use bloom_progress::models::{CategoryLessons, CompletionStatus, Lesson, ProgressRecord};
use bloom_progress::ProgressEngine;
use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

const LESSON_POOL: usize = 15;

/// One submitted completion: which lesson, quiz score, and hours since the previous event.
fn arb_event() -> impl Strategy<Value = (usize, Option<i32>, i64)> {
    (
        0..LESSON_POOL,
        prop_oneof![Just(None), (0i32..=100).prop_map(Some)],
        0i64..=80,
    )
}

fn lesson(idx: usize) -> Lesson {
    Lesson {
        id: format!("lesson-{idx}"),
        title: format!("Lesson {idx}"),
        category: if idx % 2 == 0 { "wellness" } else { "nutrition" }.to_string(),
        xp_reward: (idx as u32 + 1) * 15,
        published: true,
    }
}

fn category_of(target: &Lesson) -> CategoryLessons {
    let ids = (0..LESSON_POOL)
        .map(lesson)
        .filter(|l| l.category == target.category)
        .map(|l| l.id);
    CategoryLessons::new(&target.category, ids)
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn xp_and_level_never_decrease(events in prop::collection::vec(arb_event(), 1..40)) {
        let engine = ProgressEngine::default();
        let mut record = ProgressRecord::new("p");
        let mut now = start();

        for (idx, quiz, gap_hours) in events {
            now += Duration::hours(gap_hours);
            let l = lesson(idx);
            let out = engine.complete_lesson(&record, &l, quiz, &category_of(&l), now).unwrap();

            prop_assert!(out.record.total_xp >= record.total_xp);
            prop_assert!(out.record.level >= record.level);
            prop_assert_eq!(out.record.level, engine.level_from_xp(out.record.total_xp));
            prop_assert!(out.record.longest_streak >= out.record.current_streak);
            record = out.record;
        }
    }

    #[test]
    fn ids_stay_unique(events in prop::collection::vec(arb_event(), 1..60)) {
        let engine = ProgressEngine::default();
        let mut record = ProgressRecord::new("p");
        let mut now = start();

        for (idx, quiz, gap_hours) in events {
            now += Duration::hours(gap_hours);
            let l = lesson(idx);
            record = engine.complete_lesson(&record, &l, quiz, &category_of(&l), now).unwrap().record;
        }

        let lessons: HashSet<_> = record.completed_lessons.iter().map(|c| &c.lesson_id).collect();
        prop_assert_eq!(lessons.len(), record.completed_lessons.len());
        prop_assert_eq!(record.total_lessons_completed as usize, record.completed_lessons.len());

        let achievements: HashSet<_> = record.achievements.iter().map(|a| &a.id).collect();
        prop_assert_eq!(achievements.len(), record.achievements.len());

        for pct in record.category_progress.values() {
            prop_assert!(*pct <= 100);
        }
    }

    #[test]
    fn duplicate_submission_is_idempotent(
        events in prop::collection::vec(arb_event(), 1..20),
        replay in 0..LESSON_POOL,
    ) {
        let engine = ProgressEngine::default();
        let mut record = ProgressRecord::new("p");
        let mut now = start();
        for (idx, quiz, gap_hours) in events {
            now += Duration::hours(gap_hours);
            let l = lesson(idx);
            record = engine.complete_lesson(&record, &l, quiz, &category_of(&l), now).unwrap().record;
        }

        let l = lesson(replay);
        let once = engine.complete_lesson(&record, &l, Some(100), &category_of(&l), now).unwrap();
        let twice = engine.complete_lesson(&once.record, &l, Some(100), &category_of(&l), now).unwrap();

        prop_assert_eq!(twice.status, CompletionStatus::AlreadyCompleted);
        prop_assert_eq!(&twice.record, &once.record);
        prop_assert!(twice.unlocked.is_empty());
    }

    #[test]
    fn rejected_scores_never_mutate(score in prop_oneof![i32::MIN..0, 101..i32::MAX]) {
        let engine = ProgressEngine::default();
        let record = ProgressRecord::new("p");
        let l = lesson(0);
        prop_assert!(engine.complete_lesson(&record, &l, Some(score), &category_of(&l), start()).is_err());
        prop_assert_eq!(record, ProgressRecord::new("p"));
    }

    #[test]
    fn level_from_xp_is_monotonic(a in any::<u64>(), b in any::<u64>()) {
        let table = LevelTable::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.level_from_xp(lo) <= table.level_from_xp(hi));
        prop_assert_eq!(table.level_from_xp(a), table.level_from_xp(a));
        prop_assert!((1..=10).contains(&table.level_from_xp(a)));
    }
}
