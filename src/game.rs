#![warn(clippy::all, clippy::pedantic)]

// Default board dimensions in cells
pub const BOARD_WIDTH: usize = 15;
pub const BOARD_HEIGHT: usize = 20;

// Automatic descent timing (milliseconds)
pub const INITIAL_DROP_INTERVAL_MS: u64 = 1000;
pub const MIN_DROP_INTERVAL_MS: u64 = 100;
pub const DROP_INTERVAL_STEP_MS: u64 = 50; // Removed from the interval per cleared line

// Flat per-line reward, no multi-line bonus
pub const POINTS_PER_LINE: u32 = 100;

// Render cadence, independent from the drop interval
pub const FRAME_INTERVAL_MS: u64 = 33; // ~30 FPS

// Next-piece preview is a 4x4 area; the piece is drawn one cell in from the corner
pub const PREVIEW_SIZE: usize = 4;
pub const PREVIEW_OFFSET: usize = 1;

// Smallest board on which every piece can spawn unrotated
pub const MIN_BOARD_WIDTH: usize = 4;
pub const MIN_BOARD_HEIGHT: usize = 2;

// Largest board the terminal layout is sized for
pub const MAX_BOARD_WIDTH: usize = 100;
pub const MAX_BOARD_HEIGHT: usize = 100;
