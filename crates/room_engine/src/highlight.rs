use std::collections::HashMap;

use serde::Serialize;

use crate::geometry::{Footprint, GridPos, Rotation};
use crate::placement::PlacementValidator;
use crate::room::{FurnitureDefinition, ObjectId, PlaceableObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightColor {
    PlacementOk,
    PlacementBlocked,
    Move,
    Edit,
    Hover,
    Selected,
}

impl HighlightColor {
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            HighlightColor::PlacementOk => [0x4c, 0xd9, 0x64, 0x90],
            HighlightColor::PlacementBlocked => [0xe0, 0x3c, 0x3c, 0x90],
            HighlightColor::Move => [0x3c, 0x9c, 0xe0, 0x90],
            HighlightColor::Edit => [0xf0, 0xc8, 0x3c, 0x80],
            HighlightColor::Hover => [0xff, 0xff, 0xff, 0x50],
            HighlightColor::Selected => [0xff, 0xa5, 0x00, 0x70],
        }
    }
}

/// What the overlay should show this frame.
#[derive(Debug, Clone, Copy)]
pub enum HighlightIntent<'a> {
    Place {
        definition: &'a FurnitureDefinition,
        rotation: Rotation,
    },
    Move {
        definition: &'a FurnitureDefinition,
        rotation: Rotation,
        object_id: ObjectId,
    },
    Browse {
        layout_paint: bool,
        selected: Option<&'a PlaceableObject>,
    },
}

/// Per-tile tint for the current frame. Rebuilt from scratch on every
/// recompute, so stale entries cannot survive a state change.
#[derive(Debug, Clone, Default)]
pub struct HighlightOverlay {
    tiles: HashMap<GridPos, HighlightColor>,
}

impl HighlightOverlay {
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// Returns the placement verdict when the intent is a placement or move
    /// with a hovered tile, `None` otherwise.
    pub fn recompute(
        &mut self,
        intent: HighlightIntent<'_>,
        hovered_tile: Option<GridPos>,
        hovered_object: Option<&PlaceableObject>,
        validator: &PlacementValidator<'_>,
    ) -> Option<bool> {
        self.tiles.clear();

        match intent {
            HighlightIntent::Place {
                definition,
                rotation,
            } => {
                let origin = hovered_tile?;
                let valid = validator.is_valid(definition, origin, rotation, None);
                let color = if valid {
                    HighlightColor::PlacementOk
                } else {
                    HighlightColor::PlacementBlocked
                };
                self.paint(&definition.footprint(origin, rotation), color, validator);
                Some(valid)
            }
            HighlightIntent::Move {
                definition,
                rotation,
                object_id,
            } => {
                let origin = hovered_tile?;
                let valid = validator.is_valid(definition, origin, rotation, Some(object_id));
                let color = if valid {
                    HighlightColor::Move
                } else {
                    HighlightColor::PlacementBlocked
                };
                self.paint(&definition.footprint(origin, rotation), color, validator);
                Some(valid)
            }
            HighlightIntent::Browse {
                layout_paint: true,
                ..
            } => {
                if let Some(tile) = hovered_tile.filter(|tile| validator.occupancy().is_valid_tile(*tile)) {
                    self.tiles.insert(tile, HighlightColor::Edit);
                }
                None
            }
            HighlightIntent::Browse {
                layout_paint: false,
                selected,
            } => {
                let interactive = hovered_object
                    .filter(|object| object.definition.interaction.is_interactive());
                if let Some(object) = interactive {
                    self.paint(&object.footprint(), HighlightColor::Hover, validator);
                } else if let Some(tile) = hovered_tile {
                    if validator.occupancy().is_walkable(tile) {
                        self.tiles.insert(tile, HighlightColor::Hover);
                    }
                }
                if let Some(object) = selected {
                    self.paint(&object.footprint(), HighlightColor::Selected, validator);
                }
                None
            }
        }
    }

    pub fn color_at(&self, pos: GridPos) -> Option<HighlightColor> {
        self.tiles.get(&pos).copied()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridPos, HighlightColor)> + '_ {
        self.tiles.iter().map(|(pos, color)| (*pos, *color))
    }

    fn paint(
        &mut self,
        footprint: &Footprint,
        color: HighlightColor,
        validator: &PlacementValidator<'_>,
    ) {
        let layout = validator.occupancy().layout();
        for pos in footprint.tiles_within(layout.cols(), layout.rows()) {
            self.tiles.insert(pos, color);
        }
    }
}
