use bevy_ecs::prelude::*;
use std::time::Duration;

use crate::components::{Board, CellColor, PieceKind, PieceSource, Position, Rules};
use crate::systems::{self, setup_game};
use crate::{ManualClock, Time};

/// A started game on the default board with a scripted piece sequence and a
/// clock that only moves when the test advances it.
pub fn create_test_world(kinds: &[PieceKind]) -> (World, ManualClock) {
    create_test_world_with_rules(Rules::default(), kinds)
}

pub fn create_test_world_with_rules(rules: Rules, kinds: &[PieceKind]) -> (World, ManualClock) {
    let clock = ManualClock::new();
    let mut world = World::new();
    setup_game(
        &mut world,
        rules,
        Time::with_source(clock.clone()),
        PieceSource::sequence(kinds.to_vec()),
    );
    (world, clock)
}

/// Advances the clock just past the current drop interval and runs one tick.
pub fn tick_after_interval(world: &mut World, clock: &ManualClock) -> bool {
    let interval = world.resource::<crate::components::GameState>().drop_interval;
    clock.advance(interval + Duration::from_millis(1));
    systems::game_tick_system(world)
}

#[must_use]
pub fn active_position(world: &mut World) -> Position {
    systems::active_piece(world)
        .map(|(_, _, position)| position)
        .expect("an active piece")
}

pub const FILLER: CellColor = CellColor(0x80_80_80);

/// Fills row `y` except the listed columns.
pub fn fill_row(board: &mut Board, y: usize, gaps: &[usize]) {
    for x in 0..board.width {
        if !gaps.contains(&x) {
            board
                .set_cell(x as i32, y as i32, FILLER)
                .expect("row inside the board");
        }
    }
}
