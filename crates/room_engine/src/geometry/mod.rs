mod grid;
mod transform;

pub use grid::{Footprint, GridPos, Rotation};
pub use transform::{
    elevation_px, grid_to_screen, screen_to_grid, screen_to_world, snap_to_grid, world_to_screen,
    HEIGHT_PX_PER_UNIT, TILE_H_HALF, TILE_W_HALF,
};

use serde::{Deserialize, Serialize};

/// A point in either screen pixels or continuous world-grid units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Continuous render position; `z` is elevation in stack units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl VisualPosition {
    pub fn at(pos: GridPos, z: f64) -> Self {
        Self {
            x: f64::from(pos.x),
            y: f64::from(pos.y),
            z,
        }
    }

    pub fn ground(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Moves toward `target` by at most `max_step` on the ground plane and
    /// on the vertical axis independently. Returns true once arrived.
    pub fn step_toward(&mut self, target: VisualPosition, max_step: f64, arrival: f64) -> bool {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance <= arrival || max_step >= distance {
            self.x = target.x;
            self.y = target.y;
        } else {
            let scale = max_step / distance;
            self.x += dx * scale;
            self.y += dy * scale;
        }

        let dz = target.z - self.z;
        if dz.abs() <= arrival || max_step >= dz.abs() {
            self.z = target.z;
        } else {
            self.z += max_step.copysign(dz);
        }

        self.x == target.x && self.y == target.y && self.z == target.z
    }
}
