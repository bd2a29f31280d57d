//! Snake and link entities
//!
//! A snake owns its links outright. A link refers back to its snake only by
//! [`SnakeId`]; lookups go through the roster, so there are no reference cycles.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::game::constants::{redness, snake};
use crate::game::direction::Direction;

/// Stable controller identifier (e.g. "keyboard-arrows", "gamepad-0")
pub type ControllerId = String;

/// Roster slot of a snake
///
/// Snakes are only ever appended to the roster (restarts keep them), so the
/// slot never changes for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnakeId(pub usize);

/// One body segment. Index 0 of [`Snake::links`] is the head.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Owning snake
    pub snake: SnakeId,
    pub x: i32,
    pub y: i32,
    /// Durability against bites, nipped at <= 0
    pub health_percent: i8,
    /// Visual flash in [0, 1]
    pub redness: f32,
}

impl Link {
    pub fn new(snake: SnakeId, x: i32, y: i32) -> Self {
        Self {
            snake,
            x,
            y,
            health_percent: snake::FULL_HEALTH_PERCENT,
            redness: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Nudge redness by `delta / tps_multiplier`, clamped to [0, 1]
    pub fn change_redness(&mut self, delta: f32, tps_multiplier: u32) {
        self.redness = (self.redness + delta / tps_multiplier as f32).clamp(0.0, redness::FULL);
    }

    pub fn flash(&mut self) {
        self.redness = redness::FULL;
    }
}

/// A player's snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    pub id: SnakeId,
    pub controller_id: ControllerId,
    /// Index into the configured colour palette
    pub color_index: usize,
    /// Never empty; `links[0]` is the head
    pub links: Vec<Link>,
    pub direction: Direction,
    pub score: u32,
    /// Sign of the head pulse (+1 brightening, -1 fading)
    pub head_redness_growth: f32,
}

impl Snake {
    /// New single-link snake with a flashed head at the origin
    pub fn new(id: SnakeId, controller_id: ControllerId, color_index: usize) -> Self {
        let mut head = Link::new(id, 0, 0);
        head.flash();
        Self {
            id,
            controller_id,
            color_index,
            links: vec![head],
            direction: Direction::None,
            score: 0,
            head_redness_growth: snake::INITIAL_HEAD_REDNESS_GROWTH,
        }
    }

    #[inline]
    pub fn head(&self) -> &Link {
        &self.links[0]
    }

    #[inline]
    pub fn head_mut(&mut self) -> &mut Link {
        &mut self.links[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Always false: a snake keeps at least its head
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Face away from the grid centre along the axis with the larger offset
    ///
    /// Equal offsets resolve on the y axis.
    pub fn pick_initial_direction(&mut self, grid_size: usize) {
        let (x, y) = self.head().position();
        let mid = (grid_size / 2 + 1) as i32;

        self.direction = if (mid - x).abs() > (mid - y).abs() {
            if mid < x {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if mid < y {
            Direction::Down
        } else {
            Direction::Up
        };
    }

    /// Drop all progress, keeping identity and colour
    pub fn reset_progress(&mut self) {
        self.score = 0;
        self.links.truncate(1);
        self.head_redness_growth = snake::INITIAL_HEAD_REDNESS_GROWTH;
    }

    /// Score as shown to players (capped at the target)
    pub fn display_score(&self, config: &GameConfig) -> u32 {
        self.score.min(config.target_score)
    }

    pub fn has_won(&self, config: &GameConfig) -> bool {
        self.score >= config.target_score
    }

    /// Within striking distance of the target but not there yet
    pub fn is_approaching_target(&self, config: &GameConfig) -> bool {
        !self.has_won(config)
            && config.target_score - self.score <= config.approaching_target_score_gap
    }
}
