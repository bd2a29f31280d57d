//! Game state machine
//!
//! Exactly one state is active. The driver calls [`GameState::update`] once per
//! tick with a [`StateContext`] borrowing everything the state may touch; the
//! returned value is the state for the next tick.

pub mod action;
pub mod lobby;
pub mod scoreboard;

pub use action::ActionState;
pub use lobby::LobbyState;
pub use scoreboard::ScoreboardState;

use crate::config::GameConfig;
use crate::game::grid::Grid;
use crate::game::snake::Snake;
use crate::game::state::{GamePhase, SimulationState};
use crate::game::systems::{PhysicsEngine, ScoringEngine};
use crate::input::{ControllerInput, ControllerMap};
use crate::util::random::RandomSource;

/// Everything a state may read or mutate during one update
pub struct StateContext<'a> {
    pub snakes: &'a mut Vec<Snake>,
    pub grid: &'a mut Grid,
    pub controllers: &'a ControllerMap,
    pub physics: &'a PhysicsEngine,
    pub scoring: &'a ScoringEngine,
    pub random: &'a mut dyn RandomSource,
    pub config: &'a GameConfig,
    pub sim: &'a mut SimulationState,
}

impl<'a> StateContext<'a> {
    /// Controller driving `snake`, if it is active this tick
    pub fn controller_for(&self, snake: &Snake) -> Option<&'a dyn ControllerInput> {
        let controllers: &'a ControllerMap = self.controllers;
        controllers.get(&snake.controller_id).map(|c| c.as_ref())
    }
}

/// Roster index of the snake owned by `controller_id`
pub(crate) fn find_snake_index(snakes: &[Snake], controller_id: &str) -> Option<usize> {
    snakes.iter().position(|s| s.controller_id == controller_id)
}

/// Signal propagated out of the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("User requested exit")]
    UserExit,
}

/// The active state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Lobby(LobbyState),
    Action(ActionState),
    Scoreboard(ScoreboardState),
}

impl Default for GameState {
    fn default() -> Self {
        GameState::Lobby(LobbyState)
    }
}

impl GameState {
    /// Run one tick of the active state and return the next one
    pub fn update(self, ctx: &mut StateContext<'_>) -> Result<GameState, SimulationError> {
        match self {
            GameState::Lobby(state) => state.update(ctx),
            GameState::Action(state) => state.update(ctx),
            GameState::Scoreboard(state) => state.update(ctx),
        }
    }

    pub fn phase(&self) -> GamePhase {
        match self {
            GameState::Lobby(_) => GamePhase::Lobby,
            GameState::Action(_) => GamePhase::Action,
            GameState::Scoreboard(_) => GamePhase::Scoreboard,
        }
    }

    pub fn name(&self) -> &'static str {
        self.phase().name()
    }
}
