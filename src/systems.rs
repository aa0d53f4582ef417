#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, error, info, trace};

use crate::Time;
use crate::components::{
    ActivePiece, Board, Command, GameEvent, GamePhase, GameState, Input, Piece, PieceSource,
    Position, Rules,
};
use crate::config::HardDropLock;

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub current: Option<(Piece, Position)>,
    pub next: Piece,
    pub score: u32,
    pub session: u64,
    pub phase: GamePhase,
}

/// Inserts every resource a game needs and starts the first session.
pub fn setup_game(world: &mut World, rules: Rules, time: Time, source: PieceSource) {
    world.insert_resource(Board::new(rules.board_width, rules.board_height));
    world.insert_resource(rules);
    world.insert_resource(time);
    world.insert_resource(source);
    world.insert_resource(Input::default());
    world.init_resource::<Events<GameEvent>>();

    start_session(world, 1);
}

fn start_session(world: &mut World, session: u64) {
    let now = world.resource::<Time>().now();
    let next_piece = world.resource_mut::<PieceSource>().next_piece();
    let state = GameState::new(next_piece, world.resource::<Rules>(), now, session);
    world.insert_resource(state);

    info!("Starting session {session}");
    world.send_event(GameEvent::SessionStarted { session });
    world.send_event(GameEvent::ScoreChanged { score: 0 });

    if spawn_next_piece(world) {
        world.resource_mut::<GameState>().tick_loop.start();
    }
}

/// Fresh empty board, score 0, initial interval, and a new session.
pub fn reset_game(world: &mut World) {
    let session = world
        .get_resource::<GameState>()
        .map_or(1, |state| state.session + 1);

    despawn_active_pieces(world);

    let (width, height) = {
        let rules = world.resource::<Rules>();
        (rules.board_width, rules.board_height)
    };
    world.insert_resource(Board::new(width, height));

    start_session(world, session);
}

fn despawn_active_pieces(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<ActivePiece>>()
        .iter(world)
        .collect();

    for entity in entities {
        world.despawn(entity);
    }
}

#[must_use]
pub fn active_piece(world: &mut World) -> Option<(Entity, Piece, Position)> {
    world
        .query_filtered::<(Entity, &Piece, &Position), With<ActivePiece>>()
        .iter(world)
        .next()
        .map(|(entity, piece, position)| (entity, piece.clone(), *position))
}

/// Promotes the next piece, draws a new one and places the promoted piece
/// centred on the top row. Returns false if the session ended instead.
pub fn spawn_next_piece(world: &mut World) -> bool {
    world.resource_mut::<GameState>().phase = GamePhase::Spawning;

    let drawn = world.resource_mut::<PieceSource>().next_piece();
    let piece = std::mem::replace(&mut world.resource_mut::<GameState>().next_piece, drawn);

    let (position, valid, board_empty) = {
        let board = world.resource::<Board>();
        let position = board.spawn_position(&piece);
        (
            position,
            board.is_valid_position(position, &piece),
            board.is_empty(),
        )
    };

    if !valid {
        if board_empty {
            // A fresh board that rejects a spawn would reset forever
            error!(
                "{:?} piece cannot spawn on an empty board; halting the session",
                piece.kind
            );
            end_session(world);
        } else {
            debug!("Spawn of {:?} blocked at {position:?}", piece.kind);
            game_over(world);
        }
        return false;
    }

    debug!("Spawned {:?} at {position:?}", piece.kind);
    world.spawn((piece, position, ActivePiece));
    world.resource_mut::<GameState>().phase = GamePhase::Falling;
    true
}

/// Ends the current session: halts the tick loop, reports the final score
/// once, then starts a new session.
pub fn game_over(world: &mut World) {
    if end_session(world) {
        reset_game(world);
    }
}

// Halts the loop and sends GameOver; false if this session already ended
fn end_session(world: &mut World) -> bool {
    let (final_score, session) = {
        let mut state = world.resource_mut::<GameState>();
        state.phase = GamePhase::GameOver;
        state.tick_loop.halt();
        if !state.report_game_over() {
            return false;
        }
        (state.score, state.session)
    };

    info!("Game over in session {session} with score {final_score}");
    world.send_event(GameEvent::GameOver {
        final_score,
        session,
    });
    true
}

fn accepts_commands(world: &World) -> bool {
    world.get_resource::<GameState>().is_some_and(|state| {
        state.phase == GamePhase::Falling && state.tick_loop.is_running()
    })
}

/// Shifts the active piece if the target position is valid.
pub fn try_move(world: &mut World, dx: i32, dy: i32) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let target = position.offset(dx, dy);
    if !world.resource::<Board>().is_valid_position(target, &piece) {
        trace!("Rejected move by ({dx}, {dy}) from {position:?}");
        return false;
    }

    world.entity_mut(entity).insert(target);
    true
}

/// Replaces the active piece with its clockwise rotation if that fits where
/// it stands. No kicks are attempted.
pub fn rotate_piece(world: &mut World) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let rotated = piece.rotated();
    if !world.resource::<Board>().is_valid_position(position, &rotated) {
        debug!("Rejected rotation of {:?} at {position:?}", piece.kind);
        return false;
    }

    world.entity_mut(entity).insert(rotated);
    true
}

/// Lowest valid row for the piece at its current column.
#[must_use]
pub fn drop_position(board: &Board, position: Position, piece: &Piece) -> Position {
    let mut landing = position;
    while board.is_valid_position(landing.offset(0, 1), piece) {
        landing = landing.offset(0, 1);
    }
    landing
}

/// Moves the active piece straight down as far as it fits. Whether it locks
/// right away depends on [`Rules::hard_drop_lock`].
pub fn hard_drop(world: &mut World) -> bool {
    if !accepts_commands(world) {
        return false;
    }
    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    let landing = drop_position(world.resource::<Board>(), position, &piece);
    let moved = landing != position;
    if moved {
        world.entity_mut(entity).insert(landing);
    }
    debug!("Hard drop of {:?} from {position:?} to {landing:?}", piece.kind);

    let lock_mode = world.resource::<Rules>().hard_drop_lock;
    match lock_mode {
        HardDropLock::Deferred => moved,
        HardDropLock::Immediate => {
            let now = world.resource::<Time>().now();
            world.resource_mut::<GameState>().last_drop = now;
            lock_piece(world);
            true
        }
    }
}

pub fn handle_command(world: &mut World, command: Command) -> bool {
    match command {
        Command::MoveLeft => try_move(world, -1, 0),
        Command::MoveRight => try_move(world, 1, 0),
        Command::SoftDrop => try_move(world, 0, 1),
        Command::Rotate => rotate_piece(world),
        Command::HardDrop => hard_drop(world),
    }
}

/// Applies every queued command in order. Returns true if any was accepted.
pub fn input_system(world: &mut World) -> bool {
    let commands: Vec<Command> = world.resource_mut::<Input>().drain().collect();

    let mut accepted = false;
    for command in commands {
        accepted |= handle_command(world, command);
    }
    accepted
}

/// One logic step. Only automatic descent is time-gated; returns true when
/// the state changed.
pub fn game_tick_system(world: &mut World) -> bool {
    let now = world.resource::<Time>().now();
    {
        let state = world.resource::<GameState>();
        if !state.tick_loop.is_running() || state.phase != GamePhase::Falling {
            return false;
        }
        if !state.drop_due(now) {
            return false;
        }
    }

    let Some((entity, piece, position)) = active_piece(world) else {
        return false;
    };

    world.resource_mut::<GameState>().last_drop = now;

    let below = position.offset(0, 1);
    if world.resource::<Board>().is_valid_position(below, &piece) {
        trace!("Automatic descent to {below:?}");
        world.entity_mut(entity).insert(below);
    } else {
        lock_piece(world);
    }
    true
}

/// Merges the active piece into the board, clears lines and spawns the next piece.
pub fn lock_piece(world: &mut World) {
    let Some((entity, piece, position)) = active_piece(world) else {
        return;
    };

    world.resource_mut::<GameState>().phase = GamePhase::Locking;
    info!("Locking {:?} at {position:?}", piece.kind);

    if let Err(err) = world
        .resource_mut::<Board>()
        .merge_piece(position, &piece)
    {
        error!("Failed to merge {:?}: {err}", piece.kind);
    }
    world.despawn(entity);

    world.resource_mut::<GameState>().phase = GamePhase::LineClearing;
    clear_lines(world);

    spawn_next_piece(world);
}

/// Clears full rows and applies score and speed once for the whole scan.
pub fn clear_lines(world: &mut World) -> usize {
    let cleared = world.resource_mut::<Board>().clear_full_rows();
    if cleared == 0 {
        return 0;
    }

    let rules = world.resource::<Rules>().clone();
    let (score, interval) = {
        let mut state = world.resource_mut::<GameState>();
        state.apply_line_clear(cleared, &rules);
        (state.score, state.drop_interval)
    };

    info!("Cleared {cleared} lines, score {score}, drop interval {interval:?}");
    world.send_event(GameEvent::ScoreChanged { score });
    cleared
}

#[must_use]
pub fn snapshot(world: &mut World) -> Snapshot {
    let current = active_piece(world).map(|(_, piece, position)| (piece, position));
    let board = world.resource::<Board>().clone();
    let state = world.resource::<GameState>();

    Snapshot {
        board,
        current,
        next: state.next_piece.clone(),
        score: state.score,
        session: state.session,
        phase: state.phase,
    }
}

pub fn drain_events(world: &mut World) -> Vec<GameEvent> {
    let Some(mut events) = world.get_resource_mut::<Events<GameEvent>>() else {
        return Vec::new();
    };
    let drained: Vec<GameEvent> = events.drain().collect();
    drained
}
