/// Tick timing constants
pub mod timing {
    /// Visible movement steps per second
    pub const GAME_SPEED_FPS: u32 = 10;
    /// Simulation ticks per movement step
    /// Movement and rendering run once every TPS_MULTIPLIER ticks
    pub const TPS_MULTIPLIER: u32 = 6;
    /// Simulation ticks per second
    pub const TPS: u32 = GAME_SPEED_FPS * TPS_MULTIPLIER;
    /// Pre-game countdown length in seconds
    pub const COUNTDOWN_SECONDS: u32 = 4;
    /// Ticks the arena fades out for once a winner is known
    pub const GRID_FADE_COUNTDOWN: u32 = TPS_MULTIPLIER * 15;
    /// An apple spawns with probability 1/NEW_APPLE_PROBABILITY_PARAM per tick
    pub const NEW_APPLE_PROBABILITY_PARAM: u32 = TPS * 3;
}

/// Arena constants
pub mod grid {
    /// Side length of the square toroidal grid (cells)
    pub const SIZE: usize = 63;
}

/// Snake body constants
pub mod snake {
    /// Snakes grow by one link per move until they reach this length
    pub const TARGET_LENGTH: usize = 50;
    /// Starting durability of every link
    pub const FULL_HEALTH_PERCENT: i8 = 100;
    /// Durability removed from a link on each bite
    pub const HEALTH_REDUCTION_PER_BITE: i8 = 10;
    /// Initial sign of the head redness oscillation
    pub const INITIAL_HEAD_REDNESS_GROWTH: f32 = -1.0;
}

/// Scoring constants
pub mod scoring {
    /// Points per bite on a rival's body
    pub const BIT_LINK_SCORE: u32 = 1;
    /// Points per link cut off a rival when a bite nips its tail
    pub const NIPPED_TAIL_LINK_BONUS_MULTIPLIER: u32 = 2;
    /// Points per apple
    pub const APPLE_SCORE: u32 = 45;
    /// First snake to reach this score wins
    pub const TARGET_SCORE: u32 = 999;
    /// Scores within this gap of the target are flagged as approaching it
    pub const APPROACHING_TARGET_SCORE_GAP: u32 =
        super::snake::TARGET_LENGTH as u32 * NIPPED_TAIL_LINK_BONUS_MULTIPLIER - 1;
}

/// Visual flash constants (per-link redness)
pub mod redness {
    /// Redness change per tick while fading out (scaled by 1/TPS_MULTIPLIER)
    pub const DECAY_STEP: f32 = -0.1;
    /// Redness change per tick while a head pulses (scaled by 1/TPS_MULTIPLIER)
    pub const PULSE_STEP: f32 = 0.2;
    /// Fully flashed
    pub const FULL: f32 = 1.0;
}

/// Controller feedback constants
pub mod haptics {
    use std::time::Duration;

    /// Rumble applied to a victim's controller on every bite
    pub const BITE_VIBRATION: Duration = Duration::from_millis(200);
}

/// Snake colour palette, RGBA. The palette size bounds the number of snakes.
pub const SNAKE_COLORS: [[u8; 4]; 9] = [
    [211, 211, 211, 255], // light grey
    [255, 128, 10, 255],
    [255, 255, 0, 255], // yellow
    [100, 170, 0, 255],
    [0, 255, 255, 255], // cyan
    [0, 0, 255, 255],   // blue
    [0, 0, 100, 255],
    [100, 0, 84, 255],
    [255, 0, 255, 255], // magenta
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_timing() {
        assert_eq!(timing::TPS, 60);
        assert_eq!(timing::GRID_FADE_COUNTDOWN, 90);
        assert_eq!(timing::NEW_APPLE_PROBABILITY_PARAM, 180);
    }

    #[test]
    fn test_approaching_gap() {
        assert_eq!(scoring::APPROACHING_TARGET_SCORE_GAP, 99);
    }
}
