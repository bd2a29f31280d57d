use tracing::{debug, info};

use crate::game::constants::{haptics, redness};
use crate::game::direction::Direction;
use crate::game::grid::{Apple, Cell};
use crate::game::snake::{Link, SnakeId};
use crate::game::states::{GameState, ScoreboardState, SimulationError, StateContext};

/// Countdown, then play until someone reaches the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState;

impl ActionState {
    pub fn update(self, ctx: &mut StateContext<'_>) -> Result<GameState, SimulationError> {
        if ctx.sim.countdown > 0 {
            ctx.sim.countdown -= 1;
        }

        if ctx.sim.fade_countdown > 0 {
            ctx.sim.fade_countdown -= 1;
            if ctx.sim.fade_countdown == 0 {
                info!("Action -> Scoreboard");
                return Ok(GameState::Scoreboard(ScoreboardState));
            }
        }

        Self::update_redness(ctx);

        if ctx.sim.in_countdown(ctx.config) {
            return Ok(GameState::Action(self));
        }

        if ctx.sim.elapsed_frames % ctx.config.tps_multiplier as u64 == 0 {
            Self::move_snakes(ctx);
        }

        if !ctx.sim.apple_present()
            && ctx.random.int_n(ctx.config.new_apple_probability_param as usize) == 0
        {
            Self::try_spawn_apple(ctx);
        }

        Ok(GameState::Action(self))
    }

    /// Head pulse during the countdown, input flashes afterwards, body fade always
    fn update_redness(ctx: &mut StateContext<'_>) {
        let tps_multiplier = ctx.config.tps_multiplier;
        let in_countdown = ctx.sim.in_countdown(ctx.config);
        let fading = ctx.sim.is_fading();
        let controllers = ctx.controllers;

        for snake in ctx.snakes.iter_mut() {
            if in_countdown {
                let growth = snake.head_redness_growth;
                let head = snake.head_mut();
                head.change_redness(redness::PULSE_STEP * growth, tps_multiplier);
                if head.redness >= redness::FULL || head.redness <= 0.0 {
                    snake.head_redness_growth = -growth;
                }
            } else {
                let pressed = controllers
                    .get(&snake.controller_id)
                    .is_some_and(|c| c.is_any_just_pressed());
                if pressed && !fading {
                    snake.head_mut().flash();
                } else {
                    snake.head_mut().change_redness(redness::DECAY_STEP, tps_multiplier);
                }
            }

            for link in snake.links.iter_mut().skip(1) {
                link.change_redness(redness::DECAY_STEP, tps_multiplier);
            }
        }
    }

    fn move_snakes(ctx: &mut StateContext<'_>) {
        for index in 0..ctx.snakes.len() {
            let mut direction = Self::direction_from_input(ctx, index);

            let snake = &ctx.snakes[index];
            let (mut x, mut y) = ctx.physics.calculate_new_head_position(snake, direction);

            // Reversing into the neck keeps the current heading
            if snake.len() > 1 && (x, y) == snake.links[1].position() {
                direction = snake.direction;
                (x, y) = ctx.physics.calculate_new_head_position(snake, direction);
            }

            match ctx.grid.get(x, y) {
                Cell::Empty => Self::move_snake(ctx, index, x, y),
                Cell::Apple => {
                    Self::move_snake(ctx, index, x, y);
                    Self::eat_apple(ctx, index);
                }
                Cell::Link { snake: victim, index: link_index } => {
                    // Heads never get bitten
                    if !ctx.sim.is_fading() && link_index > 0 {
                        Self::bite(ctx, index, victim, link_index);
                    }
                }
            }

            ctx.snakes[index].direction = direction;
        }
    }

    fn direction_from_input(ctx: &StateContext<'_>, index: usize) -> Direction {
        let snake = &ctx.snakes[index];
        if ctx.sim.is_fading() {
            return snake.direction;
        }

        let Some(controller) = ctx.controller_for(snake) else {
            return snake.direction;
        };

        let direction = if controller.is_up_just_pressed() {
            Direction::Up
        } else if controller.is_down_just_pressed() {
            Direction::Down
        } else if controller.is_left_just_pressed() {
            Direction::Left
        } else if controller.is_right_just_pressed() {
            Direction::Right
        } else {
            return snake.direction;
        };

        debug!(controller = %snake.controller_id, direction = direction.name(), "New direction");
        direction
    }

    /// Slide every link one step toward the head and put the head at `(x, y)`
    ///
    /// Below the target length the old tail cell gets a fresh link; at the
    /// target length it is vacated.
    fn move_snake(ctx: &mut StateContext<'_>, index: usize, x: i32, y: i32) {
        let grow = ctx.snakes[index].len() < ctx.config.snake_target_length;
        let snake = &mut ctx.snakes[index];

        let (tail_x, tail_y) = snake.links[snake.len() - 1].position();
        for i in (1..snake.len()).rev() {
            let (prev_x, prev_y) = snake.links[i - 1].position();
            snake.links[i].x = prev_x;
            snake.links[i].y = prev_y;
        }
        snake.head_mut().x = x;
        snake.head_mut().y = y;

        if grow {
            snake.links.push(Link::new(snake.id, tail_x, tail_y));
        } else {
            ctx.grid.clear(tail_x, tail_y);
        }

        for (link_index, link) in snake.links.iter().enumerate() {
            ctx.grid.set(
                link.x,
                link.y,
                Cell::Link {
                    snake: snake.id,
                    index: link_index,
                },
            );
        }
    }

    fn eat_apple(ctx: &mut StateContext<'_>, index: usize) {
        let points = ctx
            .scoring
            .process_apple(&ctx.snakes[index], &mut ctx.sim.fade_countdown);
        let snake = &mut ctx.snakes[index];
        snake.score += points;
        ctx.sim.apple = None;
        debug!(controller = %snake.controller_id, score = snake.score, "Apple eaten");
    }

    fn bite(ctx: &mut StateContext<'_>, biter: usize, victim_id: SnakeId, link_index: usize) {
        let Some(victim) = ctx.snakes.iter().position(|s| s.id == victim_id) else {
            return;
        };

        let damage = ctx.config.health_reduction_per_bite;
        let health = {
            let Some(link) = ctx.snakes[victim].links.get_mut(link_index) else {
                return;
            };
            link.health_percent = link.health_percent.saturating_sub(damage);
            link.flash();
            link.health_percent
        };

        if let Some(controller) = ctx.controller_for(&ctx.snakes[victim]) {
            controller.vibrate(haptics::BITE_VIBRATION);
        }

        let points = ctx.scoring.process_bite(
            &ctx.snakes[biter],
            &ctx.snakes[victim],
            link_index,
            &mut ctx.sim.fade_countdown,
        );
        ctx.snakes[biter].score += points;

        if health <= 0 {
            Self::remove_tail(ctx, victim, link_index);
        }
    }

    /// Drop links `from..` of snake `index` from both the grid and the snake
    fn remove_tail(ctx: &mut StateContext<'_>, index: usize, from: usize) {
        let snake = &mut ctx.snakes[index];
        for link in &snake.links[from..] {
            ctx.grid.clear(link.x, link.y);
        }
        snake.links.truncate(from);
        info!(controller = %snake.controller_id, length = snake.len(), "Tail nipped");
    }

    fn try_spawn_apple(ctx: &mut StateContext<'_>) {
        if let Some((x, y)) = ctx.grid.find_random_empty(&mut *ctx.random) {
            ctx.grid.set(x, y, Cell::Apple);
            ctx.sim.apple = Some(Apple { x, y });
            debug!(x, y, "Apple spawned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::state::GamePhase;
    use crate::game::states::fixture::Harness;
    use crate::input::{Button, ControllerSnapshot};
    use crate::util::random::SequenceRandom;

    /// Harness past the countdown, on a movement frame
    fn playing(config: GameConfig) -> Harness {
        let mut harness = Harness::new(config);
        harness.sim.countdown = 0;
        harness.sim.elapsed_frames = 0;
        harness
    }

    fn tick(harness: &mut Harness) -> GameState {
        ActionState.update(&mut harness.ctx()).unwrap()
    }

    fn link_cell(snake: usize, index: usize) -> Cell {
        Cell::Link {
            snake: SnakeId(snake),
            index,
        }
    }

    #[test]
    fn test_snake_grows_while_short() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p1", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;

        let state = tick(&mut harness);

        assert_eq!(state.phase(), GamePhase::Action);
        let snake = &harness.snakes[0];
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head().position(), (6, 5));
        assert_eq!(snake.links[1].position(), (5, 5));
        assert_eq!(harness.grid.get(6, 5), link_cell(0, 0));
        assert_eq!(harness.grid.get(5, 5), link_cell(0, 1));
    }

    #[test]
    fn test_snake_slides_at_target_length() {
        let mut harness = playing(GameConfig {
            snake_target_length: 3,
            ..GameConfig::default()
        });
        harness.add_snake("p1", &[(5, 5), (4, 5), (3, 5)]);
        harness.snakes[0].direction = Direction::Right;

        tick(&mut harness);

        let snake = &harness.snakes[0];
        assert_eq!(snake.len(), 3);
        let positions: Vec<(i32, i32)> = snake.links.iter().map(|l| l.position()).collect();
        assert_eq!(positions, vec![(6, 5), (5, 5), (4, 5)]);
        assert_eq!(harness.grid.get(3, 5), Cell::Empty);
        assert_eq!(harness.grid.get(4, 5), link_cell(0, 2));
        assert_eq!(harness.grid.occupied_count(), 3);
    }

    #[test]
    fn test_moves_only_on_cadence_frames() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p1", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.sim.elapsed_frames = 1;

        tick(&mut harness);

        assert_eq!(harness.snakes[0].head().position(), (5, 5));
        assert_eq!(harness.snakes[0].len(), 1);
    }

    #[test]
    fn test_direction_input_applies() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p1", &[(5, 5), (4, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.set_controller(ControllerSnapshot::new("p1").with_pressed(Button::Up));

        tick(&mut harness);

        assert_eq!(harness.snakes[0].direction, Direction::Up);
        assert_eq!(harness.snakes[0].head().position(), (5, 4));
    }

    #[test]
    fn test_reversal_into_neck_is_ignored() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p1", &[(5, 5), (4, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.set_controller(ControllerSnapshot::new("p1").with_pressed(Button::Left));

        tick(&mut harness);

        assert_eq!(harness.snakes[0].direction, Direction::Right);
        assert_eq!(harness.snakes[0].head().position(), (6, 5));
    }

    #[test]
    fn test_wraps_across_edge() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p1", &[(62, 7)]);
        harness.snakes[0].direction = Direction::Right;

        tick(&mut harness);

        assert_eq!(harness.snakes[0].head().position(), (0, 7));
        assert_eq!(harness.grid.get(0, 7), link_cell(0, 0));
    }

    #[test]
    fn test_bite_nips_tail() {
        let mut harness = playing(GameConfig::default());
        let biter = harness.add_snake("p0", &[(9, 12)]);
        let victim = harness.add_snake(
            "p1",
            &[(10, 10), (10, 11), (10, 12), (10, 13), (10, 14)],
        );
        harness.snakes[biter].direction = Direction::Right;
        harness.snakes[victim].links[2].health_percent = 10;

        let (tx, rx) = crossbeam_channel::bounded(4);
        harness.set_controller(ControllerSnapshot::new("p1").with_haptics(tx));

        tick(&mut harness);

        // 1 + (5 - 2 + 1) * 2
        assert_eq!(harness.snakes[biter].score, 9);
        assert_eq!(harness.snakes[victim].len(), 2);
        assert_eq!(harness.grid.get(10, 12), Cell::Empty);
        assert_eq!(harness.grid.get(10, 13), Cell::Empty);
        assert_eq!(harness.grid.get(10, 14), Cell::Empty);
        assert_eq!(harness.grid.get(10, 11), link_cell(1, 1));

        // A bite does not move the biter
        assert_eq!(harness.snakes[biter].head().position(), (9, 12));

        let request = rx.try_recv().unwrap();
        assert_eq!(request.controller_id, "p1");
        assert_eq!(request.duration, haptics::BITE_VIBRATION);
    }

    #[test]
    fn test_bite_healthy_link_scores_and_flashes() {
        let mut harness = playing(GameConfig::default());
        let biter = harness.add_snake("p0", &[(9, 12)]);
        let victim = harness.add_snake("p1", &[(10, 10), (10, 11), (10, 12)]);
        harness.snakes[biter].direction = Direction::Right;

        tick(&mut harness);

        assert_eq!(harness.snakes[biter].score, 1);
        let bitten = &harness.snakes[victim].links[2];
        assert_eq!(bitten.health_percent, 90);
        // Flashed to 1 this tick; body decay ran before movement
        assert_eq!(bitten.redness, 1.0);
        assert_eq!(harness.snakes[victim].len(), 3);
    }

    #[test]
    fn test_head_on_collision_does_nothing() {
        let mut harness = playing(GameConfig::default());
        let a = harness.add_snake("p0", &[(9, 12)]);
        let b = harness.add_snake("p1", &[(10, 12), (11, 12)]);
        harness.snakes[a].direction = Direction::Right;

        tick(&mut harness);

        assert_eq!(harness.snakes[a].score, 0);
        assert_eq!(harness.snakes[a].head().position(), (9, 12));
        assert_eq!(harness.snakes[b].head().health_percent, 100);
    }

    #[test]
    fn test_self_bite_scores_nothing() {
        let mut harness = playing(GameConfig::default());
        // Head at (5,5) turning down into its own body at (5,6)
        harness.add_snake("p0", &[(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)]);
        harness.snakes[0].direction = Direction::Right;
        harness.set_controller(ControllerSnapshot::new("p0").with_pressed(Button::Down));

        tick(&mut harness);

        assert_eq!(harness.snakes[0].score, 0);
        assert_eq!(harness.snakes[0].links[3].health_percent, 90);
    }

    #[test]
    fn test_eats_apple() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.snakes[0].score = 100;
        harness.grid.set(6, 5, Cell::Apple);
        harness.sim.apple = Some(Apple { x: 6, y: 5 });

        tick(&mut harness);

        assert_eq!(harness.snakes[0].score, 145);
        assert_eq!(harness.snakes[0].head().position(), (6, 5));
        assert_eq!(harness.grid.get(6, 5), link_cell(0, 0));
        assert!(harness.sim.apple.is_none());
        assert_eq!(harness.sim.fade_countdown, 0);
    }

    #[test]
    fn test_winning_apple_arms_fade() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.snakes[0].score = 960;
        harness.grid.set(6, 5, Cell::Apple);
        harness.sim.apple = Some(Apple { x: 6, y: 5 });

        let state = tick(&mut harness);

        assert_eq!(state.phase(), GamePhase::Action);
        assert_eq!(harness.snakes[0].score, 1005);
        assert_eq!(harness.sim.fade_countdown, 90);
    }

    #[test]
    fn test_fade_reaching_zero_goes_to_scoreboard() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.sim.fade_countdown = 1;

        let state = tick(&mut harness);

        assert_eq!(state.phase(), GamePhase::Scoreboard);
        assert_eq!(harness.sim.fade_countdown, 0);
        assert_eq!(harness.snakes[0].head().position(), (5, 5));
    }

    #[test]
    fn test_input_ignored_while_fading() {
        let mut harness = playing(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;
        harness.sim.fade_countdown = 10;
        harness.set_controller(ControllerSnapshot::new("p0").with_pressed(Button::Up));

        tick(&mut harness);

        assert_eq!(harness.snakes[0].direction, Direction::Right);
        assert_eq!(harness.snakes[0].head().position(), (6, 5));
        assert_eq!(harness.sim.fade_countdown, 9);
    }

    #[test]
    fn test_no_bites_while_fading() {
        let mut harness = playing(GameConfig::default());
        let biter = harness.add_snake("p0", &[(9, 12)]);
        let victim = harness.add_snake("p1", &[(10, 10), (10, 11), (10, 12)]);
        harness.snakes[biter].direction = Direction::Right;
        harness.sim.fade_countdown = 10;

        tick(&mut harness);

        assert_eq!(harness.snakes[biter].score, 0);
        assert_eq!(harness.snakes[victim].links[2].health_percent, 100);
    }

    #[test]
    fn test_countdown_blocks_movement_and_apples() {
        let mut harness = Harness::new(GameConfig::default());
        harness.random = SequenceRandom::new(vec![0]);
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;

        tick(&mut harness);

        assert_eq!(harness.sim.countdown, 239);
        assert_eq!(harness.snakes[0].head().position(), (5, 5));
        assert!(harness.sim.apple.is_none());
    }

    #[test]
    fn test_last_second_allows_movement() {
        let mut harness = Harness::new(GameConfig::default());
        harness.sim.countdown = 61;
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].direction = Direction::Right;

        tick(&mut harness);

        assert_eq!(harness.sim.countdown, 60);
        assert_eq!(harness.snakes[0].head().position(), (6, 5));
    }

    #[test]
    fn test_spawns_apple_on_roll() {
        let mut harness = playing(GameConfig::default());
        // Apple roll, then the search origin (x, y)
        harness.random = SequenceRandom::new(vec![0, 2, 3]);

        tick(&mut harness);

        assert_eq!(harness.sim.apple, Some(Apple { x: 2, y: 3 }));
        assert_eq!(harness.grid.get(2, 3), Cell::Apple);
    }

    #[test]
    fn test_no_second_apple() {
        let mut harness = playing(GameConfig::default());
        harness.random = SequenceRandom::new(vec![0, 2, 3]);
        harness.grid.set(7, 7, Cell::Apple);
        harness.sim.apple = Some(Apple { x: 7, y: 7 });

        tick(&mut harness);

        assert_eq!(harness.grid.occupied_count(), 1);
        assert_eq!(harness.random.draws(), 0);
    }

    #[test]
    fn test_head_pulses_during_countdown() {
        let mut harness = Harness::new(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].head_mut().redness = 1.0;

        tick(&mut harness);

        // 0.2 * -1 / 6
        let expected = 1.0 - 0.2 / 6.0;
        assert!((harness.snakes[0].head().redness - expected).abs() < 1e-6);
        assert_eq!(harness.snakes[0].head_redness_growth, -1.0);
    }

    #[test]
    fn test_head_pulse_flips_at_bounds() {
        let mut harness = Harness::new(GameConfig::default());
        harness.add_snake("p0", &[(5, 5)]);
        harness.snakes[0].head_mut().redness = 0.01;

        tick(&mut harness);

        assert_eq!(harness.snakes[0].head().redness, 0.0);
        assert_eq!(harness.snakes[0].head_redness_growth, 1.0);
    }

    #[test]
    fn test_head_flashes_on_press_after_countdown() {
        let mut harness = playing(GameConfig::default());
        harness.sim.elapsed_frames = 1;
        harness.add_snake("p0", &[(5, 5)]);
        harness.set_controller(ControllerSnapshot::new("p0").with_pressed(Button::Start));

        tick(&mut harness);
        assert_eq!(harness.snakes[0].head().redness, 1.0);

        harness.clear_controllers();
        tick(&mut harness);
        assert!(harness.snakes[0].head().redness < 1.0);
    }

    #[test]
    fn test_body_links_decay() {
        let mut harness = playing(GameConfig::default());
        harness.sim.elapsed_frames = 1;
        harness.add_snake("p0", &[(5, 5), (4, 5)]);
        harness.snakes[0].links[1].redness = 1.0;

        tick(&mut harness);

        let expected = 1.0 - 0.1 / 6.0;
        assert!((harness.snakes[0].links[1].redness - expected).abs() < 1e-6);
    }
}
