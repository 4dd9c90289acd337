// src/constants.rs

// --- XP Rules ---
pub const PERFECT_QUIZ_SCORE: u8 = 100;
pub const PERFECT_SCORE_BONUS_XP: u64 = 25;
pub const QUIZ_PASS_THRESHOLD: u8 = 70;

// --- Levels ---
pub const LEVEL_COUNT: usize = 10;
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = LEVEL_COUNT as u8;

pub const LEVEL_THRESHOLDS: [u64; LEVEL_COUNT] =
    [0, 100, 250, 500, 1000, 1750, 2750, 4000, 5500, 7500];

pub const LEVEL_TITLES: [&str; LEVEL_COUNT] = [
    "Curious Newcomer",
    "Cycle Learner",
    "Body Explorer",
    "Wellness Seeker",
    "Rhythm Reader",
    "Health Advocate",
    "Cycle Scholar",
    "Wellness Guide",
    "Community Mentor",
    "Cycle Sage",
];

// --- Achievement Ids ---
pub const FIRST_STEPS: &str = "first_steps";
pub const FIVE_LESSONS: &str = "five_lessons";
pub const TEN_LESSONS: &str = "ten_lessons";
pub const PERFECT_SCORE: &str = "perfect_score";
pub const ON_FIRE_3: &str = "on_fire_3";
pub const UNSTOPPABLE_7: &str = "unstoppable_7";
pub const QUIZ_MASTER: &str = "quiz_master";
pub const LEVEL_UP: &str = "level_up";

// --- Achievement Bonuses ---
pub const FIRST_STEPS_BONUS_XP: u64 = 50;
pub const FIVE_LESSONS_BONUS_XP: u64 = 100;
pub const TEN_LESSONS_BONUS_XP: u64 = 200;
pub const PERFECT_SCORE_ACHIEVEMENT_XP: u64 = 75;
pub const ON_FIRE_BONUS_XP: u64 = 75;
pub const UNSTOPPABLE_BONUS_XP: u64 = 150;
pub const QUIZ_MASTER_BONUS_XP: u64 = 150;
pub const LEVEL_UP_BONUS_XP: u64 = 50;

// --- Achievement Thresholds ---
pub const FIVE_LESSONS_THRESHOLD: u32 = 5;
pub const TEN_LESSONS_THRESHOLD: u32 = 10;
pub const ON_FIRE_STREAK_DAYS: u32 = 3;
pub const UNSTOPPABLE_STREAK_DAYS: u32 = 7;
pub const QUIZ_MASTER_THRESHOLD: u32 = 10;

// --- Store ---
pub const MAX_SAVE_ATTEMPTS: usize = 3;
pub const DEFAULT_DB_FILE: &str = "progress.db";
pub const APP_DIR_NAME: &str = "bloom-progress";
