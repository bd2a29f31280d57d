//! Read-only view of the simulation for renderers
//!
//! Built after a tick completes; nothing in here can reach back into the
//! simulation.

use serde::Serialize;

use crate::config::GameConfig;
use crate::game::direction::Direction;
use crate::game::grid::Apple;
use crate::game::snake::{ControllerId, Snake, SnakeId};
use crate::game::state::{GamePhase, SimulationState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub x: i32,
    pub y: i32,
    pub health_percent: i8,
    pub redness: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnakeView {
    pub id: SnakeId,
    pub controller_id: ControllerId,
    pub color: [u8; 4],
    /// Capped at the target score
    pub score: u32,
    pub approaching_target: bool,
    pub direction: Direction,
    pub links: Vec<LinkView>,
}

impl SnakeView {
    pub fn from_snake(snake: &Snake, config: &GameConfig) -> Self {
        Self {
            id: snake.id,
            controller_id: snake.controller_id.clone(),
            color: config
                .snake_colors
                .get(snake.color_index)
                .copied()
                .unwrap_or([255, 255, 255, 255]),
            score: snake.display_score(config),
            approaching_target: snake.is_approaching_target(config),
            direction: snake.direction,
            links: snake
                .links
                .iter()
                .map(|l| LinkView {
                    x: l.x,
                    y: l.y,
                    health_percent: l.health_percent,
                    redness: l.redness,
                })
                .collect(),
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub grid_size: usize,
    pub countdown: u32,
    /// Whole seconds left on the countdown, for the on-screen timer
    pub countdown_seconds: u32,
    pub elapsed_frames: u64,
    pub fade_countdown: u32,
    pub apple: Option<Apple>,
    pub snakes: Vec<SnakeView>,
}

impl GameSnapshot {
    pub fn capture(
        phase: GamePhase,
        sim: &SimulationState,
        snakes: &[Snake],
        config: &GameConfig,
    ) -> Self {
        Self {
            phase,
            grid_size: config.grid_size,
            countdown: sim.countdown,
            countdown_seconds: sim.countdown / config.tps().max(1),
            elapsed_frames: sim.elapsed_frames,
            fade_countdown: sim.fade_countdown,
            apple: sim.apple,
            snakes: snakes.iter().map(|s| SnakeView::from_snake(s, config)).collect(),
        }
    }

    /// Fraction of the end-of-game fade already played, in [0, 1]
    pub fn fade_progress(&self, config: &GameConfig) -> f32 {
        if self.fade_countdown == 0 || config.grid_fade_countdown == 0 {
            return 0.0;
        }
        1.0 - self.fade_countdown as f32 / config.grid_fade_countdown as f32
    }
}

/// Consumer of snapshots (terminal, window, recorder...)
pub trait Renderer {
    fn draw(&mut self, snapshot: &GameSnapshot);
}
