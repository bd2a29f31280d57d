use tracing::info;

use crate::game::constants::redness;
use crate::game::states::lobby::layout_snakes;
use crate::game::states::{find_snake_index, GameState, LobbyState, SimulationError, StateContext};

/// Final standings, waiting for a restart or exit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreboardState;

impl ScoreboardState {
    /// Only controllers that own a snake are heard here
    pub fn update(self, ctx: &mut StateContext<'_>) -> Result<GameState, SimulationError> {
        let tps_multiplier = ctx.config.tps_multiplier;
        let controllers = ctx.controllers;

        for controller in controllers.values() {
            let Some(index) = find_snake_index(ctx.snakes.as_slice(), controller.id()) else {
                continue;
            };

            if controller.is_start_just_pressed() {
                Self::restart(ctx);
                info!(controller = %controller.id(), "Scoreboard -> Lobby");
                return Ok(GameState::Lobby(LobbyState));
            }

            if controller.is_exit_just_pressed() {
                info!(controller = %controller.id(), "Exit requested from scoreboard");
                return Err(SimulationError::UserExit);
            }

            let snake = &mut ctx.snakes[index];
            for link in snake.links.iter_mut() {
                link.change_redness(redness::DECAY_STEP, tps_multiplier);
            }
            if controller.is_any_just_pressed() {
                snake.head_mut().flash();
            }
        }

        Ok(GameState::Scoreboard(self))
    }

    /// Fresh board and counters, same roster
    fn restart(ctx: &mut StateContext<'_>) {
        ctx.grid.clear_all();
        ctx.sim.reset(ctx.config);

        for snake in ctx.snakes.iter_mut() {
            snake.reset_progress();
        }

        layout_snakes(ctx.snakes.as_mut_slice(), &mut *ctx.grid, ctx.config);
    }
}
