use serde::{Deserialize, Serialize};

use super::Point;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn depth(self) -> i64 {
        i64::from(self.x) + i64::from(self.y)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn to_world(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Quarter turns clockwise, `0..=3`. Odd turns swap footprint width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    pub const NORTH: Self = Self(0);
    pub const EAST: Self = Self(1);
    pub const SOUTH: Self = Self(2);
    pub const WEST: Self = Self(3);

    pub const fn new(turns: u8) -> Self {
        Self(turns % 4)
    }

    pub fn turns(self) -> u8 {
        self.0
    }

    pub fn next(self) -> Self {
        Self::new(self.0 + 1)
    }

    pub fn swaps_axes(self) -> bool {
        self.0 % 2 == 1
    }
}

impl From<u8> for Rotation {
    fn from(turns: u8) -> Self {
        Self::new(turns)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// Tiles covered by a shape anchored at `origin`, growing toward +x/+y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    origin: GridPos,
    width: u32,
    height: u32,
}

impl Footprint {
    pub fn new(origin: GridPos, width: u32, height: u32, rotation: Rotation) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (width, height) = if rotation.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        };
        Self {
            origin,
            width,
            height,
        }
    }

    pub fn origin(&self) -> GridPos {
        self.origin
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        let dx = i64::from(pos.x) - i64::from(self.origin.x);
        let dy = i64::from(pos.y) - i64::from(self.origin.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    pub fn tiles(&self) -> impl Iterator<Item = GridPos> + '_ {
        let origin = self.origin;
        let width = self.width;
        let step = |d: u32| i32::try_from(d).unwrap_or(i32::MAX);
        (0..self.height).flat_map(move |dy| {
            (0..width).map(move |dx| origin.offset(step(dx), step(dy)))
        })
    }

    /// Covered tiles inside a `cols` x `rows` grid anchored at (0, 0). Work is
    /// bounded by the clipped area, not the full footprint.
    pub fn tiles_within(&self, cols: u32, rows: u32) -> impl Iterator<Item = GridPos> + '_ {
        let clip = |start: i32, len: u32, limit: u32| {
            let start = i64::from(start);
            let lo = start.max(0);
            let hi = (start + i64::from(len))
                .min(i64::from(limit))
                .min(i64::from(i32::MAX) + 1);
            (lo, hi.max(lo))
        };
        let (x0, x1) = clip(self.origin.x, self.width, cols);
        let (y0, y1) = clip(self.origin.y, self.height, rows);
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| GridPos::new(x as i32, y as i32)))
    }
}
