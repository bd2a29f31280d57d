use std::f64::consts::PI;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::game::constants::redness;
use crate::game::grid::{Cell, Grid};
use crate::game::snake::{Snake, SnakeId};
use crate::game::states::{find_snake_index, ActionState, GameState, SimulationError, StateContext};

/// Players joining before a game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LobbyState;

impl LobbyState {
    /// Start is judged against the roster as it stood before this tick's
    /// joins, so a press that joins a snake never starts the game too.
    pub fn update(self, ctx: &mut StateContext<'_>) -> Result<GameState, SimulationError> {
        let start = Self::should_transition_to_action(ctx);

        let tps_multiplier = ctx.config.tps_multiplier;
        for snake in ctx.snakes.iter_mut() {
            snake.head_mut().change_redness(redness::DECAY_STEP, tps_multiplier);
        }

        let controllers = ctx.controllers;
        for controller in controllers.values() {
            if controller.is_any_just_pressed() {
                Self::handle_press(ctx, controller.id());
            }
        }

        if start {
            info!(snakes = ctx.snakes.len(), "Lobby -> Action");
            return Ok(GameState::Action(ActionState));
        }

        Ok(GameState::Lobby(self))
    }

    /// At least two snakes and a Start press from one of their controllers
    ///
    /// Start from a controller without a snake never starts the game.
    pub fn should_transition_to_action(ctx: &StateContext<'_>) -> bool {
        if ctx.snakes.len() < 2 {
            return false;
        }

        ctx.controllers.values().any(|controller| {
            controller.is_start_just_pressed()
                && find_snake_index(ctx.snakes.as_slice(), controller.id()).is_some()
        })
    }

    fn handle_press(ctx: &mut StateContext<'_>, controller_id: &str) {
        match find_snake_index(ctx.snakes.as_slice(), controller_id) {
            Some(index) => ctx.snakes[index].head_mut().flash(),
            None if ctx.snakes.len() < ctx.config.max_snakes => Self::add_new_snake(ctx, controller_id),
            None => debug!(controller = %controller_id, "Lobby full, ignoring join"),
        }
    }

    fn add_new_snake(ctx: &mut StateContext<'_>, controller_id: &str) {
        for snake in ctx.snakes.iter() {
            let (x, y) = snake.head().position();
            ctx.grid.clear(x, y);
        }

        let id = SnakeId(ctx.snakes.len());
        ctx.snakes.push(Snake::new(id, controller_id.to_string(), id.0));
        info!(controller = %controller_id, snakes = ctx.snakes.len(), "Snake joined");

        layout_snakes(ctx.snakes.as_mut_slice(), &mut *ctx.grid, ctx.config);
    }
}

/// Head positions for `count` snakes spread evenly around a circle
///
/// The first sits straight above the centre, the rest follow clockwise.
pub fn layout_positions(count: usize, grid_size: usize) -> Vec<(i32, i32)> {
    let size = grid_size as i32;
    let radius = grid_size as f64 / 3.0;
    let delta = 2.0 * PI / count as f64;

    (0..count)
        .map(|i| {
            let alpha = delta * i as f64;
            // `as i32` truncates toward zero
            let y = size / 2 - (alpha.cos() * radius) as i32;
            let x = size / 2 + (alpha.sin() * radius) as i32;
            (x, y)
        })
        .collect()
}

/// Place every snake's head on its circle position, facing away from the centre
pub fn layout_snakes(snakes: &mut [Snake], grid: &mut Grid, config: &GameConfig) {
    let positions = layout_positions(snakes.len(), config.grid_size);

    for (snake, (x, y)) in snakes.iter_mut().zip(positions) {
        let id = snake.id;
        let head = snake.head_mut();
        head.x = x;
        head.y = y;
        grid.set(x, y, Cell::Link { snake: id, index: 0 });

        snake.pick_initial_direction(config.grid_size);
    }
}
