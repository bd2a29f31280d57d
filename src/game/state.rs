//! Shared simulation counters and the phase tag
//!
//! The driver owns one [`SimulationState`]; whichever game state is active
//! mutates it in place during its update.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::game::grid::Apple;

/// Which state of the state machine is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players joining
    #[default]
    Lobby,
    /// Countdown and play
    Action,
    /// Final standings
    Scoreboard,
}

impl GamePhase {
    pub fn name(self) -> &'static str {
        match self {
            GamePhase::Lobby => "Lobby",
            GamePhase::Action => "Action",
            GamePhase::Scoreboard => "Scoreboard",
        }
    }
}

/// Mutable per-game counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Ticks left in the pre-game countdown
    pub countdown: u32,
    /// Ticks since the game (or restart) began
    pub elapsed_frames: u64,
    /// Ticks left in the end-of-game fade; 0 while nobody has won
    pub fade_countdown: u32,
    /// The apple, if one is on the board
    pub apple: Option<Apple>,
}

impl SimulationState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            countdown: config.countdown_ticks(),
            elapsed_frames: 0,
            fade_countdown: 0,
            apple: None,
        }
    }

    /// Back to the values of a fresh game
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    #[inline]
    pub fn apple_present(&self) -> bool {
        self.apple.is_some()
    }

    /// True while the pre-game countdown blocks movement
    #[inline]
    pub fn in_countdown(&self, config: &GameConfig) -> bool {
        self.countdown > config.tps()
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fade_countdown > 0
    }
}
