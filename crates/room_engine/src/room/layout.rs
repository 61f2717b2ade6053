use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GridPos, Point};

pub const MAX_ROOM_DIMENSION: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    Floor,
    Wall,
    AltFloor,
    Hole,
}

impl TileType {
    pub fn is_floor(self) -> bool {
        matches!(self, Self::Floor | Self::AltFloor)
    }

    pub fn blocks_placement(self) -> bool {
        matches!(self, Self::Wall | Self::Hole)
    }
}

/// Static tile-type grid of one room. Row-major: `layout[y][x]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomLayout {
    cols: u32,
    rows: u32,
    tiles: Vec<TileType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("room must have at least one column and one row, got {cols}x{rows}")]
    Empty { cols: u32, rows: u32 },
    #[error("room {cols}x{rows} exceeds the {max}x{max} limit")]
    TooLarge { cols: u32, rows: u32, max: u32 },
    #[error("layout row count mismatch: expected {expected}, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("layout row {row} length mismatch: expected {expected}, got {actual}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl RoomLayout {
    pub fn from_rows(cols: u32, rows: u32, layout: &[Vec<TileType>]) -> Result<Self, LayoutError> {
        check_dimensions(cols, rows)?;
        if layout.len() != rows as usize {
            return Err(LayoutError::RowCountMismatch {
                expected: rows as usize,
                actual: layout.len(),
            });
        }

        let mut tiles = Vec::with_capacity(cols as usize * rows as usize);
        for (row, line) in layout.iter().enumerate() {
            if line.len() != cols as usize {
                return Err(LayoutError::RowLengthMismatch {
                    row,
                    expected: cols as usize,
                    actual: line.len(),
                });
            }
            tiles.extend_from_slice(line);
        }

        Ok(Self { cols, rows, tiles })
    }

    pub fn filled(cols: u32, rows: u32, tile: TileType) -> Result<Self, LayoutError> {
        check_dimensions(cols, rows)?;
        Ok(Self {
            cols,
            rows,
            tiles: vec![tile; cols as usize * rows as usize],
        })
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(y as usize * self.cols as usize + x as usize)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.index_of(pos).is_some()
    }

    pub fn tile_at(&self, pos: GridPos) -> Option<TileType> {
        self.index_of(pos)
            .and_then(|index| self.tiles.get(index).copied())
    }

    pub fn center_world(&self) -> Point {
        Point::new(
            (f64::from(self.cols) - 1.0) * 0.5,
            (f64::from(self.rows) - 1.0) * 0.5,
        )
    }
}

fn check_dimensions(cols: u32, rows: u32) -> Result<(), LayoutError> {
    if cols == 0 || rows == 0 {
        return Err(LayoutError::Empty { cols, rows });
    }
    if cols > MAX_ROOM_DIMENSION || rows > MAX_ROOM_DIMENSION {
        return Err(LayoutError::TooLarge {
            cols,
            rows,
            max: MAX_ROOM_DIMENSION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_indexes_row_major() {
        let layout = RoomLayout::from_rows(
            3,
            2,
            &[
                vec![TileType::Floor, TileType::Wall, TileType::Floor],
                vec![TileType::Hole, TileType::AltFloor, TileType::Floor],
            ],
        )
        .expect("layout");
        assert_eq!(layout.tile_at(GridPos::new(1, 0)), Some(TileType::Wall));
        assert_eq!(layout.tile_at(GridPos::new(0, 1)), Some(TileType::Hole));
        assert_eq!(layout.tile_at(GridPos::new(1, 1)), Some(TileType::AltFloor));
    }

    #[test]
    fn out_of_bounds_lookups_return_none() {
        let layout = RoomLayout::filled(4, 4, TileType::Floor).expect("layout");
        assert_eq!(layout.tile_at(GridPos::new(-1, 0)), None);
        assert_eq!(layout.tile_at(GridPos::new(4, 0)), None);
        assert_eq!(layout.tile_at(GridPos::new(0, 4)), None);
        assert!(layout.contains(GridPos::new(3, 3)));
    }

    #[test]
    fn short_row_is_rejected() {
        let error = RoomLayout::from_rows(
            2,
            2,
            &[vec![TileType::Floor, TileType::Floor], vec![TileType::Floor]],
        )
        .expect_err("short row");
        assert_eq!(
            error,
            LayoutError::RowLengthMismatch {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn row_count_must_match_declared_rows() {
        let error = RoomLayout::from_rows(1, 3, &[vec![TileType::Floor]]).expect_err("rows");
        assert_eq!(
            error,
            LayoutError::RowCountMismatch {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn empty_and_oversized_rooms_are_rejected() {
        assert!(matches!(
            RoomLayout::filled(0, 5, TileType::Floor),
            Err(LayoutError::Empty { .. })
        ));
        assert!(matches!(
            RoomLayout::filled(MAX_ROOM_DIMENSION + 1, 5, TileType::Floor),
            Err(LayoutError::TooLarge { .. })
        ));
    }

    #[test]
    fn tile_type_serializes_snake_case() {
        let json = serde_json::to_string(&TileType::AltFloor).expect("encode");
        assert_eq!(json, "\"alt_floor\"");
    }
}
