pub mod loader;
pub mod sections;

use serde::{Deserialize, Serialize};

pub use loader::ConfigError;
pub use sections::{BoardConfig, GameplayConfig, HardDropLock, ScoringConfig, TimingConfig};

use crate::game::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub timing: TimingConfig,
    pub scoring: ScoringConfig,
    pub gameplay: GameplayConfig,
}

impl Config {
    /// Rejects settings under which a fresh board could never host a piece,
    /// the board would not fit a terminal, or the speed ramp would run
    /// backwards.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width < MIN_BOARD_WIDTH || self.board.height < MIN_BOARD_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "board must be at least {MIN_BOARD_WIDTH}x{MIN_BOARD_HEIGHT}, got {}x{}",
                self.board.width, self.board.height
            )));
        }

        if self.board.width > MAX_BOARD_WIDTH || self.board.height > MAX_BOARD_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "board must be at most {MAX_BOARD_WIDTH}x{MAX_BOARD_HEIGHT}, got {}x{}",
                self.board.width, self.board.height
            )));
        }

        if self.timing.min_drop_interval_ms > self.timing.initial_drop_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "min_drop_interval_ms ({}) exceeds initial_drop_interval_ms ({})",
                self.timing.min_drop_interval_ms, self.timing.initial_drop_interval_ms
            )));
        }

        if self.timing.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
