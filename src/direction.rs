use crate::Coords;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// The cell next to `from` in this direction. `bounds` holds the largest
    /// valid (x, y); stepping off one edge comes back in on the other.
    pub fn step(self, from: Coords, bounds: Coords) -> Coords {
        let (x, y) = from;
        let (max_x, max_y) = bounds;

        match self {
            Left => (if x == 0 { max_x } else { x - 1 }, y),
            Right => (if x >= max_x { 0 } else { x + 1 }, y),
            Up => (x, if y == 0 { max_y } else { y - 1 }),
            Down => (x, if y >= max_y { 0 } else { y + 1 }),
        }
    }
}
