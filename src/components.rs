#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::config::{Config, HardDropLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    T,
    L,
    J,
    O,
    S,
    Z,
}

impl PieceKind {
    pub const ALL: [Self; 7] = [
        PieceKind::I,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Spawn orientation, 1 = occupied.
    #[must_use]
    pub fn template(self) -> &'static [&'static [u8]] {
        match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::T => &[&[1, 1, 1], &[0, 1, 0]],
            PieceKind::L => &[&[1, 1, 1], &[1, 0, 0]],
            PieceKind::J => &[&[1, 1, 1], &[0, 0, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::S => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::Z => &[&[0, 1, 1], &[1, 1, 0]],
        }
    }

    #[must_use]
    pub fn color(self) -> CellColor {
        match self {
            PieceKind::I => CellColor(0x00_f0_f0),
            PieceKind::T => CellColor(0xf0_f0_00),
            PieceKind::L => CellColor(0xf0_00_f0),
            PieceKind::J => CellColor(0xf0_a0_00),
            PieceKind::O => CellColor(0x00_00_f0),
            PieceKind::S => CellColor(0x00_f0_00),
            PieceKind::Z => CellColor(0xf0_00_00),
        }
    }
}

/// 24-bit RGB colour stored in locked board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellColor(pub u32);

impl CellColor {
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();
        (r, g, b)
    }

    #[must_use]
    pub fn to_color(self) -> ratatui::style::Color {
        let (r, g, b) = self.rgb();
        ratatui::style::Color::Rgb(r, g, b)
    }
}

/// `None` is an empty cell.
pub type Cell = Option<CellColor>;

/// Rectangular occupancy matrix. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    #[must_use]
    pub fn from_template(template: &[&[u8]]) -> Self {
        Self {
            cells: template
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Occupied cells as `(dx, dy)` offsets from the shape origin.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(dy, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(dx, _)| (dx, dy))
        })
    }

    /// Clockwise quarter turn: transpose, then reverse each resulting row,
    /// so `new[i][j] == old[rows - 1 - j][i]`.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        let rows = self.rows();
        let cells = (0..self.cols())
            .map(|i| (0..rows).map(|j| self.cells[rows - 1 - j][i]).collect())
            .collect();
        Self { cells }
    }
}

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: CellColor,
}

impl Piece {
    #[must_use]
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: Shape::from_template(kind.template()),
            color: kind.color(),
        }
    }

    /// Same piece turned a quarter clockwise. Placement is not checked here.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated_clockwise(),
            color: self.color,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

// Marks the single falling piece entity
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ActivePiece;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    OutOfRange { x: i32, y: i32 },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfRange { x, y } => write!(f, "cell ({x}, {y}) is outside the board"),
        }
    }
}

impl std::error::Error for BoardError {}

/// Locked cells, `rows[y][x]` with row 0 at the top.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![None; width]; height],
        }
    }

    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> Result<bool, BoardError> {
        if !self.in_bounds(x, y) {
            return Err(BoardError::OutOfRange { x, y });
        }
        Ok(self.rows[y as usize][x as usize].is_some())
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn set_cell(&mut self, x: i32, y: i32, color: CellColor) -> Result<(), BoardError> {
        if !self.in_bounds(x, y) {
            return Err(BoardError::OutOfRange { x, y });
        }
        self.rows[y as usize][x as usize] = Some(color);
        Ok(())
    }

    /// Removes row `y`, leaving the board one row short until
    /// [`Board::insert_empty_row_at_top`] restores it.
    pub fn remove_row(&mut self, y: usize) -> Option<Vec<Cell>> {
        (y < self.rows.len()).then(|| self.rows.remove(y))
    }

    pub fn insert_empty_row_at_top(&mut self) {
        self.rows.insert(0, vec![None; self.width]);
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows
            .get(y)
            .is_some_and(|row| row.iter().all(Option::is_some))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(Option::is_none))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// True iff every occupied cell of `piece` at `position` lands inside the
    /// board on an empty cell. Empty shape cells are unconstrained.
    #[must_use]
    pub fn is_valid_position(&self, position: Position, piece: &Piece) -> bool {
        piece.shape.occupied_cells().all(|(dx, dy)| {
            let x = position.x + dx as i32;
            let y = position.y + dy as i32;
            matches!(self.is_occupied(x, y), Ok(false))
        })
    }

    /// Centred horizontally with floor division, top row.
    #[must_use]
    pub fn spawn_position(&self, piece: &Piece) -> Position {
        Position {
            x: (self.width / 2) as i32 - (piece.shape.cols() / 2) as i32,
            y: 0,
        }
    }

    /// Writes the piece's colour into every cell it occupies.
    pub fn merge_piece(&mut self, position: Position, piece: &Piece) -> Result<(), BoardError> {
        for (dx, dy) in piece.shape.occupied_cells() {
            self.set_cell(position.x + dx as i32, position.y + dy as i32, piece.color)?;
        }
        Ok(())
    }

    /// Removes full rows scanning bottom to top. Each removal drops everything
    /// above by one row, so the same index is examined again.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = self.height;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.remove_row(row);
                self.insert_empty_row_at_top();
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }
}

/// Gameplay rules resolved from [`Config`].
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub board_width: usize,
    pub board_height: usize,
    pub initial_drop_interval: Duration,
    pub min_drop_interval: Duration,
    pub drop_interval_step: Duration,
    pub points_per_line: u32,
    pub hard_drop_lock: HardDropLock,
}

impl From<&Config> for Rules {
    fn from(config: &Config) -> Self {
        Self {
            board_width: config.board.width,
            board_height: config.board.height,
            initial_drop_interval: Duration::from_millis(config.timing.initial_drop_interval_ms),
            min_drop_interval: Duration::from_millis(config.timing.min_drop_interval_ms),
            drop_interval_step: Duration::from_millis(config.timing.drop_interval_step_ms),
            points_per_line: config.scoring.points_per_line,
            hard_drop_lock: config.gameplay.hard_drop_lock,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Spawning,
    Falling,
    Locking,
    LineClearing,
    GameOver,
}

/// Run flag for the automatic-descent loop. Only one loop exists, so
/// starting or halting twice is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickLoop {
    running: bool,
}

impl TickLoop {
    /// Returns true if the loop was not already running.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    /// Returns true if the loop was running.
    pub fn halt(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    #[must_use]
    pub fn is_running(self) -> bool {
        self.running
    }
}

#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub score: u32,
    pub drop_interval: Duration,
    pub last_drop: Duration,
    pub next_piece: Piece,
    pub phase: GamePhase,
    pub tick_loop: TickLoop,
    pub session: u64,
    pub lines_cleared: u32,
    game_over_reported: bool,
}

impl GameState {
    #[must_use]
    pub fn new(next_piece: Piece, rules: &Rules, now: Duration, session: u64) -> Self {
        Self {
            score: 0,
            drop_interval: rules.initial_drop_interval,
            last_drop: now,
            next_piece,
            phase: GamePhase::Spawning,
            tick_loop: TickLoop::default(),
            session,
            lines_cleared: 0,
            game_over_reported: false,
        }
    }

    /// Strictly more than one interval since the last automatic drop.
    #[must_use]
    pub fn drop_due(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_drop) > self.drop_interval
    }

    /// Flat points per line and one interval step per line, applied once per
    /// lock. Returns true when the score changed.
    pub fn apply_line_clear(&mut self, cleared: usize, rules: &Rules) -> bool {
        if cleared == 0 {
            return false;
        }

        let lines = u32::try_from(cleared).unwrap_or(u32::MAX);
        self.score = self
            .score
            .saturating_add(lines.saturating_mul(rules.points_per_line));
        self.lines_cleared = self.lines_cleared.saturating_add(lines);
        self.drop_interval = self
            .drop_interval
            .saturating_sub(rules.drop_interval_step.saturating_mul(lines))
            .max(rules.min_drop_interval);
        true
    }

    /// Marks the session's game over as reported. Returns false if it already was.
    pub fn report_game_over(&mut self) -> bool {
        !std::mem::replace(&mut self.game_over_reported, true)
    }
}

/// Where new pieces come from. `Random` draws uniformly and independently
/// over all seven kinds; `Sequence` cycles through a fixed list.
#[derive(Resource, Debug, Clone)]
pub enum PieceSource {
    Random(fastrand::Rng),
    Sequence { kinds: Vec<PieceKind>, cursor: usize },
}

impl PieceSource {
    #[must_use]
    pub fn random() -> Self {
        PieceSource::Random(fastrand::Rng::new())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        PieceSource::Random(fastrand::Rng::with_seed(seed))
    }

    #[must_use]
    pub fn sequence(kinds: Vec<PieceKind>) -> Self {
        let kinds = if kinds.is_empty() {
            PieceKind::ALL.to_vec()
        } else {
            kinds
        };
        PieceSource::Sequence { kinds, cursor: 0 }
    }

    pub fn next_kind(&mut self) -> PieceKind {
        match self {
            PieceSource::Random(rng) => PieceKind::ALL[rng.usize(..PieceKind::ALL.len())],
            PieceSource::Sequence { kinds, cursor } => {
                let kind = kinds[*cursor % kinds.len()];
                *cursor = (*cursor + 1) % kinds.len();
                kind
            }
        }
    }

    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::random()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

// Commands received since the last input pass
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pending: VecDeque<Command>,
}

impl Input {
    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Command> + '_ {
        self.pending.drain(..)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Notifications for the outside world: score display and end-of-game notice.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SessionStarted { session: u64 },
    ScoreChanged { score: u32 },
    GameOver { final_score: u32, session: u64 },
}
