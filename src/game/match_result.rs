//! Scoreboard standings
//!
//! Computes the final ranking shown after a game.

use serde::Serialize;

use crate::config::GameConfig;
use crate::game::snake::{ControllerId, Snake, SnakeId};

/// One row of the scoreboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub snake_id: SnakeId,
    pub controller_id: ControllerId,
    pub color_index: usize,
    /// 1-based; equal scores still get distinct ranks
    pub rank: u32,
    /// Capped at the target score
    pub score: u32,
    pub length: usize,
    pub winner: bool,
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub winner: Option<ControllerId>,
    pub standings: Vec<Standing>,
}

/// Rank snakes by raw score, ties broken by join order
///
/// Only the reported score is capped; ranking past the target still uses
/// the full score.
pub fn determine_standings(snakes: &[Snake], config: &GameConfig) -> MatchResult {
    let mut ranked: Vec<&Snake> = snakes.iter().collect();
    // Stable sort keeps join order among equal scores
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    let standings: Vec<Standing> = ranked
        .into_iter()
        .enumerate()
        .map(|(i, s)| Standing {
            snake_id: s.id,
            controller_id: s.controller_id.clone(),
            color_index: s.color_index,
            rank: (i + 1) as u32,
            score: s.display_score(config),
            length: s.len(),
            winner: s.has_won(config),
        })
        .collect();

    let winner = standings
        .first()
        .filter(|s| s.winner)
        .map(|s| s.controller_id.clone());

    MatchResult { winner, standings }
}
