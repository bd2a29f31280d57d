use tracing::info;

use crate::config::GameConfig;
use crate::game::snake::Snake;

/// Point computation and win detection
///
/// The engine computes points but never adds them: callers apply the returned
/// value to the scorer. Reaching the target arms the fade countdown instead of
/// switching state, so the fade-out plays before the scoreboard appears.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    apple_score: u32,
    bit_link_score: u32,
    nipped_tail_link_bonus_multiplier: u32,
    target_score: u32,
    grid_fade_countdown: u32,
}

impl ScoringEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            apple_score: config.apple_score,
            bit_link_score: config.bit_link_score,
            nipped_tail_link_bonus_multiplier: config.nipped_tail_link_bonus_multiplier,
            target_score: config.target_score,
            grid_fade_countdown: config.grid_fade_countdown,
        }
    }

    /// Points for eating an apple
    pub fn process_apple(&self, snake: &Snake, fade_countdown: &mut u32) -> u32 {
        let points = self.apple_score;
        self.check_target(snake, points, fade_countdown);
        points
    }

    /// Points for `biter` biting link `link_index` of `victim`
    ///
    /// Call after the bite has been applied to the link's health. A bite that
    /// depleted the link also pays for every link from `link_index` to the
    /// tail, counted as `len - link_index + 1`. Self-bites pay nothing.
    pub fn process_bite(
        &self,
        biter: &Snake,
        victim: &Snake,
        link_index: usize,
        fade_countdown: &mut u32,
    ) -> u32 {
        if biter.id == victim.id {
            return 0;
        }

        let mut points = self.bit_link_score;

        let depleted = victim
            .links
            .get(link_index)
            .is_some_and(|link| link.health_percent <= 0);
        if depleted {
            let remaining = (victim.len() - link_index + 1) as u32;
            points += remaining * self.nipped_tail_link_bonus_multiplier;
        }

        self.check_target(biter, points, fade_countdown);
        points
    }

    /// True if any snake reached the target
    pub fn has_winner(&self, snakes: &[Snake]) -> bool {
        snakes.iter().any(|s| s.score >= self.target_score)
    }

    fn check_target(&self, snake: &Snake, points: u32, fade_countdown: &mut u32) {
        if snake.score + points >= self.target_score {
            info!(
                controller = %snake.controller_id,
                score = snake.score + points,
                "Target score reached"
            );
            *fade_countdown = self.grid_fade_countdown;
        }
    }
}
