use serde::{Deserialize, Serialize};

/// Heading the snake moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
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

    /// Returns the delta (dx, dy) for one unit of movement. `y` grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }
}

/// Discrete input signals accepted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    TogglePause,
    Reset,
    SetDirection(Heading),
}

impl From<Heading> for Signal {
    fn from(heading: Heading) -> Self {
        Signal::SetDirection(heading)
    }
}
