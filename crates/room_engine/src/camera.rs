use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::geometry::{screen_to_world, world_to_screen, Point};

const ROOM_CENTER_X_FRACTION: f64 = 0.5;
const ROOM_CENTER_Y_FRACTION: f64 = 1.0 / 3.0;

/// Pan offset in screen pixels plus a zoom multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ZoomBounds {
    min: f64,
    max: f64,
    default: f64,
}

impl ZoomBounds {
    fn clamp(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.default;
        }
        zoom.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    viewport: Viewport,
    bounds: ZoomBounds,
    step_factor: f64,
    epsilon: f64,
}

impl CameraController {
    pub fn new(config: &EngineConfig) -> Self {
        let bounds = ZoomBounds {
            min: config.min_zoom,
            max: config.max_zoom,
            default: config.default_zoom,
        };
        Self {
            camera: Camera {
                zoom: bounds.clamp(config.default_zoom),
                ..Camera::default()
            },
            viewport: Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            bounds,
            step_factor: config.zoom_step_factor,
            epsilon: config.zoom_epsilon,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.viewport = Viewport { width, height };
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.camera.x += dx;
        self.camera.y += dy;
    }

    /// Scales zoom by `factor` keeping the world point under `pivot` fixed on
    /// screen. Returns false when the clamped zoom is unchanged.
    pub fn zoom(&mut self, factor: f64, pivot: Point) -> bool {
        let target = self.bounds.clamp(self.camera.zoom * factor);
        if (target - self.camera.zoom).abs() <= self.epsilon || !pivot.is_finite() {
            return false;
        }

        let anchor_world = screen_to_world(&self.camera, pivot);
        self.camera.zoom = target;
        let projected = world_to_screen(&self.camera, anchor_world);
        self.camera.x += pivot.x - projected.x;
        self.camera.y += pivot.y - projected.y;
        true
    }

    /// Wheel-style zoom: positive steps zoom in by `zoom_step_factor` each.
    pub fn zoom_steps(&mut self, steps: i32, pivot: Point) -> bool {
        if steps == 0 {
            return false;
        }
        self.zoom(self.step_factor.powi(steps), pivot)
    }

    pub fn center_on_room(&mut self, cols: u32, rows: u32) {
        let center = Point::new(
            (f64::from(cols) - 1.0) * 0.5,
            (f64::from(rows) - 1.0) * 0.5,
        );
        let unpanned = Camera {
            x: 0.0,
            y: 0.0,
            zoom: self.camera.zoom,
        };
        let projected = world_to_screen(&unpanned, center);
        self.camera.x = self.viewport.width * ROOM_CENTER_X_FRACTION - projected.x;
        self.camera.y = self.viewport.height * ROOM_CENTER_Y_FRACTION - projected.y;
    }

    pub fn reset(&mut self) {
        self.camera = Camera {
            zoom: self.bounds.default,
            ..Camera::default()
        };
    }
}
