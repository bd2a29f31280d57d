//! Snakehem simulation engine
//!
//! A tick-driven arena game for up to nine local players: snakes grow by
//! eating apples and by biting rivals' tails, racing to a target score on a
//! toroidal grid.
//!
//! The engine is a three-state machine (Lobby, Action, Scoreboard) driven once
//! per fixed tick by [`Simulation`]. Input, randomness and rendering are
//! injected through the [`InputProvider`], [`RandomSource`] and [`Renderer`]
//! traits so everything runs deterministically under test.

pub mod config;
pub mod game;
pub mod input;
pub mod util;

pub use config::{ConfigError, GameConfig};
pub use game::driver::{BuildError, Simulation, SimulationBuilder};
pub use game::snapshot::{GameSnapshot, Renderer};
pub use game::state::GamePhase;
pub use game::states::SimulationError;
pub use input::{ControllerInput, InputProvider};
pub use util::random::RandomSource;
