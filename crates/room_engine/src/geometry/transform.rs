use crate::camera::Camera;

use super::{GridPos, Point};

pub const TILE_W_HALF: f64 = 32.0;
pub const TILE_H_HALF: f64 = 16.0;
pub const HEIGHT_PX_PER_UNIT: f64 = 32.0;

pub fn world_to_screen(camera: &Camera, world: Point) -> Point {
    Point {
        x: (world.x - world.y) * TILE_W_HALF * camera.zoom + camera.x,
        y: (world.x + world.y) * TILE_H_HALF * camera.zoom + camera.y,
    }
}

pub fn screen_to_world(camera: &Camera, screen: Point) -> Point {
    let diff = (screen.x - camera.x) / (TILE_W_HALF * camera.zoom);
    let sum = (screen.y - camera.y) / (TILE_H_HALF * camera.zoom);
    Point {
        x: (sum + diff) * 0.5,
        y: (sum - diff) * 0.5,
    }
}

pub fn snap_to_grid(world: Point) -> GridPos {
    GridPos::new(world.x.round() as i32, world.y.round() as i32)
}

pub fn screen_to_grid(camera: &Camera, screen: Point) -> GridPos {
    snap_to_grid(screen_to_world(camera, screen))
}

pub fn grid_to_screen(camera: &Camera, pos: GridPos) -> Point {
    world_to_screen(camera, pos.to_world())
}

/// Upward screen offset for something drawn `z` units above the floor.
pub fn elevation_px(camera: &Camera, z: f64) -> f64 {
    z * HEIGHT_PX_PER_UNIT * camera.zoom
}
