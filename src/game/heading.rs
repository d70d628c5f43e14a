use serde::{Deserialize, Serialize};

/// Axis-aligned direction the snake travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Heading) -> bool {
        matches!(
            (self, other),
            (Heading::Up, Heading::Down)
                | (Heading::Down, Heading::Up)
                | (Heading::Left, Heading::Right)
                | (Heading::Right, Heading::Left)
        )
    }

    /// Returns the unit step (dx, dy) for this heading
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// Heading that takes effect on the next tick.
    ///
    /// A pending reversal is dropped and the current heading kept; it is not
    /// remembered for later ticks.
    pub fn resolve(self, pending: Heading) -> Heading {
        if self.is_opposite(pending) {
            self
        } else {
            pending
        }
    }
}
