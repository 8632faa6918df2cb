use std::collections::{BTreeSet, VecDeque};

use super::action::Heading;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move cell one unit in a heading
    pub fn moved_in(&self, heading: Heading) -> Self {
        let (dx, dy) = heading.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Cell>,
    /// Heading committed on the last tick
    heading: Heading,
}

impl Snake {
    /// Create a new snake with given head, heading and length.
    /// Segments trail behind the head, opposite to the heading.
    pub fn new(head: Cell, heading: Heading, length: usize) -> Self {
        let (dx, dy) = heading.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body, heading }
    }

    /// Build a snake from explicit segments, head first.
    /// Returns `None` when there are no segments.
    #[cfg(test)]
    pub(crate) fn from_cells(
        cells: impl IntoIterator<Item = Cell>,
        heading: Heading,
    ) -> Option<Self> {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self { body, heading })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub(crate) fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// All segments, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    /// Drop the tail segment, keeping at least the head
    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false: a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Kind of food item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodKind {
    Normal,
    Bonus,
    Hazard,
}

/// A food item on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodItem {
    pub cell: Cell,
    pub kind: FoodKind,
    /// Ticks left before a special item vanishes; `None` for Normal food
    pub remaining: Option<u32>,
}

impl FoodItem {
    pub fn normal(cell: Cell) -> Self {
        Self {
            cell,
            kind: FoodKind::Normal,
            remaining: None,
        }
    }

    pub fn special(cell: Cell, kind: FoodKind, lifetime: u32) -> Self {
        Self {
            cell,
            kind,
            remaining: Some(lifetime),
        }
    }
}

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Over,
}

/// What the head ran into on a fatal tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Left the grid
    Boundary,
    /// Hit its own body
    SelfCollision,
    /// Hit a wall cell
    Wall,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Heading to commit on the next tick
    pub pending_heading: Heading,
    pub normal: Option<FoodItem>,
    pub bonus: Option<FoodItem>,
    pub hazard: Option<FoodItem>,
    pub walls: BTreeSet<Cell>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    pub tick_interval_ms: u64,
    pub phase: Phase,
    /// Set when the game ended on a new best score
    pub new_best: bool,
    pub ticks: u64,
    /// Ticks until the next Bonus spawn roll is allowed
    pub bonus_cooldown: u32,
    /// Ticks until the next Hazard spawn roll is allowed
    pub hazard_cooldown: u32,
}

impl GameState {
    /// Create an Idle state with no food and no walls
    pub fn new(snake: Snake, grid_width: usize, grid_height: usize, tick_interval_ms: u64) -> Self {
        Self {
            pending_heading: snake.heading(),
            snake,
            normal: None,
            bonus: None,
            hazard: None,
            walls: BTreeSet::new(),
            grid_width,
            grid_height,
            score: 0,
            level: 1,
            tick_interval_ms,
            phase: Phase::Idle,
            new_best: false,
            ticks: 0,
            bonus_cooldown: 0,
            hazard_cooldown: 0,
        }
    }

    /// Check if a cell is within the grid bounds
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.x < self.grid_width as i32
            && cell.y >= 0
            && cell.y < self.grid_height as i32
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }

    /// Live food items, Normal first
    pub fn food_items(&self) -> impl Iterator<Item = &FoodItem> {
        self.normal
            .iter()
            .chain(self.bonus.iter())
            .chain(self.hazard.iter())
    }

    /// True if the cell holds the snake, a wall or any food item
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.contains(cell)
            || self.is_wall(cell)
            || self.food_items().any(|item| item.cell == cell)
    }
}
