use serde::{Deserialize, Serialize};

use crate::game::{
    BOARD_HEIGHT, BOARD_WIDTH, DROP_INTERVAL_STEP_MS, FRAME_INTERVAL_MS, INITIAL_DROP_INTERVAL_MS,
    MIN_DROP_INTERVAL_MS, POINTS_PER_LINE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_drop_interval_ms: u64,
    pub min_drop_interval_ms: u64,
    pub drop_interval_step_ms: u64,
    pub frame_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_drop_interval_ms: INITIAL_DROP_INTERVAL_MS,
            min_drop_interval_ms: MIN_DROP_INTERVAL_MS,
            drop_interval_step_ms: DROP_INTERVAL_STEP_MS,
            frame_interval_ms: FRAME_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_line: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_line: POINTS_PER_LINE,
        }
    }
}

/// When a hard-dropped piece gets merged into the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardDropLock {
    /// The piece rests on the stack and locks on the next automatic descent check.
    #[default]
    Deferred,
    /// The piece locks, lines clear and the next piece spawns within the same command.
    Immediate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub hard_drop_lock: HardDropLock,
    // Fixed seed for reproducible piece sequences
    pub seed: Option<u64>,
}
