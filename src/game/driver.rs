//! Fixed-tick simulation driver
//!
//! [`Simulation`] owns the grid, the snakes, the counters and the active state.
//! Each [`Simulation::tick`] polls input once, lets the active state update,
//! swaps in the state it returns and advances the frame counter. Renderers
//! only ever see a [`GameSnapshot`] taken between ticks.

use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig};
use crate::game::grid::{Apple, Grid};
use crate::game::match_result::{determine_standings, MatchResult};
use crate::game::snake::Snake;
use crate::game::snapshot::{GameSnapshot, Renderer};
use crate::game::state::{GamePhase, SimulationState};
use crate::game::states::{GameState, SimulationError, StateContext};
use crate::game::systems::{PhysicsEngine, ScoringEngine};
use crate::input::InputProvider;
use crate::util::random::{RandomSource, StdRandom};

pub struct Simulation {
    config: GameConfig,
    grid: Grid,
    snakes: Vec<Snake>,
    sim: SimulationState,
    state: GameState,
    physics: PhysicsEngine,
    scoring: ScoringEngine,
    random: Box<dyn RandomSource>,
    input: Box<dyn InputProvider>,
}

impl Simulation {
    pub fn builder() -> SimulationBuilder {
        SimulationBuilder::new()
    }

    /// Advance the simulation by one tick
    ///
    /// `Err(UserExit)` is the only error and means the process should stop.
    /// The frame counter does not advance on an exit tick.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        let frame = self.input.poll();
        if frame.global_exit {
            info!("Global exit pressed");
            return Err(SimulationError::UserExit);
        }
        let controllers = frame.into_controller_map();

        let mut ctx = StateContext {
            snakes: &mut self.snakes,
            grid: &mut self.grid,
            controllers: &controllers,
            physics: &self.physics,
            scoring: &self.scoring,
            random: &mut *self.random,
            config: &self.config,
            sim: &mut self.sim,
        };
        self.state = self.state.update(&mut ctx)?;
        self.sim.elapsed_frames += 1;

        Ok(())
    }

    /// Run up to `ticks` ticks, stopping early on exit
    pub fn run_ticks(&mut self, ticks: u64) -> Result<(), SimulationError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    /// Frames are drawn once per movement step, not every tick
    pub fn should_render(&self) -> bool {
        self.sim.elapsed_frames % self.config.tps_multiplier as u64 == 0
    }

    /// Draw through `renderer` if this is a render frame; returns whether it drew
    pub fn render(&self, renderer: &mut dyn Renderer) -> bool {
        if !self.should_render() {
            return false;
        }
        renderer.draw(&self.snapshot());
        true
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self.state.phase(), &self.sim, &self.snakes, &self.config)
    }

    pub fn standings(&self) -> MatchResult {
        determine_standings(&self.snakes, &self.config)
    }

    pub fn has_winner(&self) -> bool {
        self.scoring.has_winner(&self.snakes)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn countdown(&self) -> u32 {
        self.sim.countdown
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.sim.elapsed_frames
    }

    pub fn fade_countdown(&self) -> u32 {
        self.sim.fade_countdown
    }

    pub fn apple(&self) -> Option<Apple> {
        self.sim.apple
    }
}

/// Wires a [`Simulation`] together
///
/// The input provider is required. Config defaults to [`GameConfig::default`]
/// and randomness to an entropy-seeded [`StdRandom`].
#[derive(Default)]
pub struct SimulationBuilder {
    config: Option<GameConfig>,
    input: Option<Box<dyn InputProvider>>,
    random: Option<Box<dyn RandomSource>>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_input_provider(mut self, input: impl InputProvider + 'static) -> Self {
        self.input = Some(Box::new(input));
        self
    }

    pub fn with_random_source(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Box::new(random));
        self
    }

    pub fn build(self) -> Result<Simulation, BuildError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let input = self.input.ok_or(BuildError::MissingInputProvider)?;
        let random = self.random.unwrap_or_else(|| {
            debug!("No random source given, seeding from entropy");
            Box::new(StdRandom::from_entropy())
        });

        info!(
            grid_size = config.grid_size,
            tps = config.tps(),
            max_snakes = config.max_snakes,
            target_score = config.target_score,
            "Simulation ready"
        );

        Ok(Simulation {
            grid: Grid::new(config.grid_size),
            snakes: Vec::with_capacity(config.max_snakes),
            sim: SimulationState::new(&config),
            state: GameState::default(),
            physics: PhysicsEngine::new(&config),
            scoring: ScoringEngine::new(&config),
            random,
            input,
            config,
        })
    }
}

/// Wiring errors, reported before the first tick
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Input provider is required")]
    MissingInputProvider,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
