//! Fundamental geometric and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 2D position on the board (world units; one grid cell = 1.0 unit).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// 2D velocity (world units per second).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Discrete board cell. Column grows East, row grows South.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Distance to another position in world units.
    pub fn range_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }

    /// Unit vector from this position toward another.
    /// Zero vector if the two positions coincide.
    pub fn toward(&self, other: &Position) -> Vec2 {
        (other.0 - self.0).normalize_or_zero()
    }

    /// The cell containing this position.
    pub fn cell(&self) -> GridCell {
        GridCell {
            col: self.0.x.floor() as i32,
            row: self.0.y.floor() as i32,
        }
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Speed magnitude (world units per second).
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl GridCell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Center of this cell in world units.
    pub fn center(&self) -> Position {
        Position::new(self.col as f32 + 0.5, self.row as f32 + 0.5)
    }

    /// Whether this cell lies inside a board of the given dimensions.
    pub fn in_bounds(&self, cols: i32, rows: i32) -> bool {
        self.col >= 0 && self.col < cols && self.row >= 0 && self.row < rows
    }
}

impl SimTime {
    /// Advance by one tick of the given duration.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
