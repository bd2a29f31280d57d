use crate::config::GameConfig;
use crate::game::direction::Direction;
use crate::game::snake::Snake;

/// Movement arithmetic on the toroidal grid
///
/// Pure: nothing here touches the grid or the snake.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsEngine {
    grid_size: i32,
}

impl PhysicsEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            grid_size: config.grid_size as i32,
        }
    }

    /// Where the head lands after one step in `direction`
    ///
    /// Steps are unit length, so a single wrap per axis is enough:
    /// `-1` becomes `size - 1` and `size` becomes `0`.
    pub fn calculate_new_head_position(&self, snake: &Snake, direction: Direction) -> (i32, i32) {
        let head = snake.head();
        (
            self.wrap(head.x + direction.dx()),
            self.wrap(head.y + direction.dy()),
        )
    }

    #[inline]
    fn wrap(&self, coord: i32) -> i32 {
        if coord < 0 {
            self.grid_size - 1
        } else if coord >= self.grid_size {
            0
        } else {
            coord
        }
    }
}
