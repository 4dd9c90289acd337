// src/leveling.rs

use crate::constants::{LEVEL_COUNT, LEVEL_THRESHOLDS, LEVEL_TITLES, MAX_LEVEL, MIN_LEVEL};
use crate::error::{ProgressError, Result};
use serde::Serialize;

/// Ascending XP thresholds with a parallel table of titles, one entry per level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    thresholds: [u64; LEVEL_COUNT],
    titles: [&'static str; LEVEL_COUNT],
}

/// Where a given XP total sits inside its level.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelProgress {
    pub level: u8,
    pub title: &'static str,
    pub xp_into_level: u64,
    /// XP between this level's threshold and the next; 0 at max level.
    pub xp_span: u64,
    pub next_level_xp: u64,
    pub percent: u8,
}

impl Default for LevelTable {
    fn default() -> Self {
        LevelTable {
            thresholds: LEVEL_THRESHOLDS,
            titles: LEVEL_TITLES,
        }
    }
}

impl LevelTable {
    /// Builds a table, rejecting thresholds that do not start at 0 or do not strictly ascend.
    pub fn new(
        thresholds: [u64; LEVEL_COUNT],
        titles: [&'static str; LEVEL_COUNT],
    ) -> Result<Self> {
        if thresholds[0] != 0 {
            return Err(ProgressError::InvalidTable(format!(
                "first threshold must be 0, got {}",
                thresholds[0]
            )));
        }
        if let Some(w) = thresholds.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ProgressError::InvalidTable(format!(
                "thresholds must strictly ascend ({} followed by {})",
                w[0], w[1]
            )));
        }
        Ok(LevelTable { thresholds, titles })
    }

    pub fn level_from_xp(&self, xp: u64) -> u8 {
        // thresholds[0] == 0, so at least one entry always matches
        let reached = self.thresholds.iter().take_while(|&&t| xp >= t).count();
        reached.max(1) as u8
    }

    pub fn title(&self, level: u8) -> &'static str {
        self.titles[Self::index(level)]
    }

    /// Total XP needed to reach the level after `level`; saturates at the last threshold.
    pub fn xp_for_next_level(&self, level: u8) -> u64 {
        let idx = Self::index(level);
        self.thresholds[(idx + 1).min(LEVEL_COUNT - 1)]
    }

    pub fn threshold(&self, level: u8) -> u64 {
        self.thresholds[Self::index(level)]
    }

    pub fn progress(&self, xp: u64) -> LevelProgress {
        let level = self.level_from_xp(xp);
        let floor = self.threshold(level);
        let next_level_xp = self.xp_for_next_level(level);
        let xp_into_level = xp - floor;

        let (xp_span, percent) = if level >= MAX_LEVEL {
            (0, 100)
        } else {
            let span = next_level_xp - floor;
            let pct = (xp_into_level * 100 / span).min(100) as u8;
            (span, pct)
        };

        LevelProgress {
            level,
            title: self.title(level),
            xp_into_level,
            xp_span,
            next_level_xp,
            percent,
        }
    }

    fn index(level: u8) -> usize {
        (level.clamp(MIN_LEVEL, MAX_LEVEL) - 1) as usize
    }
}
