#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info};
use std::time::Duration;

use crate::Time;
use crate::components::{Command, GameEvent, GameState, Input, PieceSource, Rules};
use crate::config::Config;
use crate::systems::{self, Snapshot};

pub type AppResult<T> = anyhow::Result<T>;

/// What the side panel shows besides the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    // Final score of the session that just ended, shown until dismissed
    pub game_over_notice: Option<u32>,
    pub sessions_finished: u32,
}

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub hud: Hud,
    frame_interval: Duration,
    needs_redraw: bool,
}

impl App {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let source = config
            .gameplay
            .seed
            .map_or_else(PieceSource::random, PieceSource::seeded);

        Self::with_parts(
            Rules::from(config),
            Time::new(),
            source,
            Duration::from_millis(config.timing.frame_interval_ms),
        )
    }

    /// Builds an app around an explicit clock and piece source.
    #[must_use]
    pub fn with_parts(
        rules: Rules,
        time: Time,
        source: PieceSource,
        frame_interval: Duration,
    ) -> Self {
        let mut world = World::new();
        systems::setup_game(&mut world, rules, time, source);

        let mut app = Self {
            world,
            should_quit: false,
            hud: Hud::default(),
            frame_interval,
            needs_redraw: true,
        };
        app.process_events();
        app
    }

    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        if self.hud.game_over_notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.dismiss_game_over_notice();
            }
            return;
        }

        if let Some(command) = key_to_command(key) {
            self.submit(command);
        }
    }

    /// Queues one command and applies it right away. Accepted commands
    /// request a redraw.
    pub fn submit(&mut self, command: Command) -> bool {
        self.world.resource_mut::<Input>().push(command);
        let accepted = systems::input_system(&mut self.world);
        if accepted {
            self.needs_redraw = true;
        } else {
            debug!("Command {command:?} rejected");
        }
        self.process_events();
        accepted
    }

    /// Frame-paced update: runs the time-gated logic step unless the
    /// game-over notice is up.
    pub fn on_tick(&mut self) {
        if self.hud.game_over_notice.is_some() {
            return;
        }
        if systems::game_tick_system(&mut self.world) {
            self.needs_redraw = true;
        }
        self.process_events();
    }

    /// Closes the notice and lets the new session start falling, with a full
    /// interval before its first automatic drop.
    pub fn dismiss_game_over_notice(&mut self) {
        if self.hud.game_over_notice.take().is_none() {
            return;
        }

        let now = self.world.resource::<Time>().now();
        let mut state = self.world.resource_mut::<GameState>();
        state.last_drop = now;
        state.tick_loop.start();
        self.needs_redraw = true;
    }

    fn process_events(&mut self) {
        for event in systems::drain_events(&mut self.world) {
            match event {
                GameEvent::SessionStarted { session } => {
                    debug!("Session {session} started");
                }
                GameEvent::ScoreChanged { score } => {
                    self.hud.score = score;
                }
                GameEvent::GameOver {
                    final_score,
                    session,
                } => {
                    info!("Session {session} ended with score {final_score}");
                    self.hud.game_over_notice = Some(final_score);
                    self.hud.sessions_finished += 1;
                    // The next session waits behind the notice
                    self.world.resource_mut::<GameState>().tick_loop.halt();
                }
            }
            self.needs_redraw = true;
        }
    }

    #[must_use]
    pub fn snapshot(&mut self) -> Snapshot {
        systems::snapshot(&mut self.world)
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

#[must_use]
pub fn key_to_command(key: KeyEvent) -> Option<Command> {
    match key.code {
        KeyCode::Left | KeyCode::Char('a') => Some(Command::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') => Some(Command::MoveRight),
        KeyCode::Down | KeyCode::Char('s') => Some(Command::SoftDrop),
        KeyCode::Up | KeyCode::Char('w') => Some(Command::Rotate),
        KeyCode::Char(' ') => Some(Command::HardDrop),
        _ => None,
    }
}
