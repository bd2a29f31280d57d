use serde::{Deserialize, Serialize};

/// Heading of a snake on the grid
///
/// `y` grows downwards, so `Up` is `dy = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            _ => 0,
        }
    }

    #[inline]
    pub fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::None => "None",
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_vectors() {
        assert_eq!((Direction::Up.dx(), Direction::Up.dy()), (0, -1));
        assert_eq!((Direction::Down.dx(), Direction::Down.dy()), (0, 1));
        assert_eq!((Direction::Left.dx(), Direction::Left.dy()), (-1, 0));
        assert_eq!((Direction::Right.dx(), Direction::Right.dy()), (1, 0));
        assert_eq!((Direction::None.dx(), Direction::None.dy()), (0, 0));
    }

    #[test]
    fn test_default_is_none() {
        assert_eq!(Direction::default(), Direction::None);
    }
}
