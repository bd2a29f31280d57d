use serde::{Deserialize, Serialize};

use crate::game::constants::{grid, scoring, snake, timing, SNAKE_COLORS};
use crate::game::states::lobby::layout_positions;

/// Game configuration
///
/// Every component receives this by reference at construction; nothing reads
/// tunables from globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Movement steps per second
    pub game_speed_fps: u32,
    /// Simulation ticks per movement step
    pub tps_multiplier: u32,
    /// Side length of the toroidal grid
    pub grid_size: usize,
    /// Pre-game countdown length in seconds
    pub countdown_seconds: u32,
    /// Ticks the arena fades out before the scoreboard
    pub grid_fade_countdown: u32,
    /// Apple spawn probability denominator (per tick)
    pub new_apple_probability_param: u32,
    /// Maximum snake length
    pub snake_target_length: usize,
    /// Durability removed per bite
    pub health_reduction_per_bite: i8,
    /// Points per nipped link
    pub nipped_tail_link_bonus_multiplier: u32,
    /// Points per bite
    pub bit_link_score: u32,
    /// Points per apple
    pub apple_score: u32,
    /// Winning score
    pub target_score: u32,
    /// Gap below the target at which a snake counts as approaching it
    pub approaching_target_score_gap: u32,
    /// Snake palette (RGBA); its length bounds the number of snakes
    pub snake_colors: Vec<[u8; 4]>,
    /// Maximum number of snakes
    pub max_snakes: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_speed_fps: timing::GAME_SPEED_FPS,
            tps_multiplier: timing::TPS_MULTIPLIER,
            grid_size: grid::SIZE,
            countdown_seconds: timing::COUNTDOWN_SECONDS,
            grid_fade_countdown: timing::GRID_FADE_COUNTDOWN,
            new_apple_probability_param: timing::NEW_APPLE_PROBABILITY_PARAM,
            snake_target_length: snake::TARGET_LENGTH,
            health_reduction_per_bite: snake::HEALTH_REDUCTION_PER_BITE,
            nipped_tail_link_bonus_multiplier: scoring::NIPPED_TAIL_LINK_BONUS_MULTIPLIER,
            bit_link_score: scoring::BIT_LINK_SCORE,
            apple_score: scoring::APPLE_SCORE,
            target_score: scoring::TARGET_SCORE,
            approaching_target_score_gap: scoring::APPROACHING_TARGET_SCORE_GAP,
            snake_colors: SNAKE_COLORS.to_vec(),
            max_snakes: SNAKE_COLORS.len(),
        }
    }
}

impl GameConfig {
    /// Simulation ticks per second
    ///
    /// Saturates; [`GameConfig::validate`] rejects configs where it would.
    pub fn tps(&self) -> u32 {
        self.game_speed_fps.saturating_mul(self.tps_multiplier)
    }

    /// Initial value of the pre-game countdown, in ticks
    pub fn countdown_ticks(&self) -> u32 {
        self.tps().saturating_mul(self.countdown_seconds)
    }

    fn checked_countdown_ticks(&self) -> Option<u32> {
        self.game_speed_fps
            .checked_mul(self.tps_multiplier)?
            .checked_mul(self.countdown_seconds)
    }

    /// Most points a single nip can award: every link plus one
    fn checked_max_nip_bonus(&self) -> Option<u32> {
        u32::try_from(self.snake_target_length)
            .ok()?
            .checked_add(1)?
            .checked_mul(self.nipped_tail_link_bonus_multiplier)
    }

    /// Recompute the values derived from the timing fields
    ///
    /// Call after changing `game_speed_fps` or `tps_multiplier` by hand.
    pub fn recompute_derived(&mut self) {
        self.grid_fade_countdown = self.tps_multiplier.saturating_mul(15);
        self.new_apple_probability_param = self.tps().saturating_mul(3);
        self.approaching_target_score_gap = u32::try_from(self.snake_target_length)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.nipped_tail_link_bonus_multiplier)
            .saturating_sub(1);
        self.max_snakes = self.max_snakes.min(self.snake_colors.len());
    }

    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Some(fps) = env_parse::<u32>("SNAKEHEM_GAME_SPEED_FPS") {
            config.game_speed_fps = fps;
        }

        if let Some(multiplier) = env_parse::<u32>("SNAKEHEM_TPS_MULTIPLIER") {
            config.tps_multiplier = multiplier;
        }

        if let Some(size) = env_parse::<usize>("SNAKEHEM_GRID_SIZE") {
            if (2..=1024).contains(&size) {
                config.grid_size = size;
            } else {
                tracing::warn!("SNAKEHEM_GRID_SIZE must be 2-1024, using default");
            }
        }

        if let Some(seconds) = env_parse::<u32>("SNAKEHEM_COUNTDOWN_SECONDS") {
            config.countdown_seconds = seconds;
        }

        if let Some(length) = env_parse::<usize>("SNAKEHEM_SNAKE_TARGET_LENGTH") {
            config.snake_target_length = length;
        }

        if let Some(target) = env_parse::<u32>("SNAKEHEM_TARGET_SCORE") {
            config.target_score = target;
        }

        if let Some(score) = env_parse::<u32>("SNAKEHEM_APPLE_SCORE") {
            config.apple_score = score;
        }

        if let Some(max) = env_parse::<usize>("SNAKEHEM_MAX_SNAKES") {
            config.max_snakes = max;
        }

        config.recompute_derived();
        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.game_speed_fps == 0 || self.tps_multiplier == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.new_apple_probability_param == 0 {
            return Err(ConfigError::ZeroAppleProbability);
        }
        if self.snake_target_length == 0 {
            return Err(ConfigError::ZeroTargetLength);
        }
        if self.max_snakes == 0 {
            return Err(ConfigError::NoSnakes);
        }
        if self.max_snakes > self.snake_colors.len() {
            return Err(ConfigError::NotEnoughColors {
                max_snakes: self.max_snakes,
                colors: self.snake_colors.len(),
            });
        }
        if self.health_reduction_per_bite <= 0 {
            return Err(ConfigError::NonPositiveBiteDamage);
        }
        if self.checked_countdown_ticks().is_none()
            || self.tps_multiplier.checked_mul(15).is_none()
            || self.tps().checked_mul(3).is_none()
        {
            return Err(ConfigError::TimingOverflow);
        }
        if self.checked_max_nip_bonus().is_none() {
            return Err(ConfigError::ScoreOverflow);
        }

        // Every roster size must get one cell per head
        for count in 2..=self.max_snakes {
            let mut positions = layout_positions(count, self.grid_size);
            positions.sort_unstable();
            positions.dedup();
            if positions.len() < count {
                return Err(ConfigError::GridTooCrowded {
                    grid_size: self.grid_size,
                    snakes: count,
                });
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid size must be at least 2, got {0}")]
    GridTooSmall(usize),
    #[error("Tick rate must be positive")]
    ZeroTickRate,
    #[error("Apple probability parameter must be positive")]
    ZeroAppleProbability,
    #[error("Snake target length must be at least 1")]
    ZeroTargetLength,
    #[error("At least one snake must be allowed")]
    NoSnakes,
    #[error("{max_snakes} snakes allowed but only {colors} colours defined")]
    NotEnoughColors { max_snakes: usize, colors: usize },
    #[error("Bite damage must be positive")]
    NonPositiveBiteDamage,
    #[error("Tick rate and countdown overflow a 32-bit tick counter")]
    TimingOverflow,
    #[error("Snake length and nip multiplier overflow a 32-bit score")]
    ScoreOverflow,
    #[error("Grid of size {grid_size} cannot seat {snakes} snakes apart")]
    GridTooCrowded { grid_size: usize, snakes: usize },
}
