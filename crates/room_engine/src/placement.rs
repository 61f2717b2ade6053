use thiserror::Error;

use crate::geometry::{GridPos, Rotation};
use crate::room::{FurnitureDefinition, ObjectId, Occupancy, TileType};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackLimits {
    pub stack_unit: f64,
    pub max_stack_z: f64,
    pub epsilon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementReport {
    pub base_z: f64,
    pub top_z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PlacementRejection {
    #[error("tile {x},{y} is outside the room")]
    OutOfBounds { x: i32, y: i32 },
    #[error("tile {x},{y} is {tile:?}")]
    BlockedTerrain { x: i32, y: i32, tile: TileType },
    #[error("tile {x},{y} is capped by non-stackable object {object_id:?}")]
    NotStackable {
        x: i32,
        y: i32,
        object_id: ObjectId,
    },
    #[error("stack would reach z {top_z}, above the {max_z} limit")]
    TooHigh { top_z: f64, max_z: f64 },
}

/// Client-side legality check for placing or moving furniture. Advisory only;
/// the server re-validates every request.
#[derive(Debug, Clone, Copy)]
pub struct PlacementValidator<'a> {
    occupancy: Occupancy<'a>,
    limits: StackLimits,
}

impl<'a> PlacementValidator<'a> {
    pub fn new(occupancy: Occupancy<'a>, limits: StackLimits) -> Self {
        Self { occupancy, limits }
    }

    pub fn occupancy(&self) -> &Occupancy<'a> {
        &self.occupancy
    }

    pub fn is_valid(
        &self,
        definition: &FurnitureDefinition,
        origin: GridPos,
        rotation: Rotation,
        ignore: Option<ObjectId>,
    ) -> bool {
        self.check(definition, origin, rotation, ignore).is_ok()
    }

    pub fn check(
        &self,
        definition: &FurnitureDefinition,
        origin: GridPos,
        rotation: Rotation,
        ignore: Option<ObjectId>,
    ) -> Result<PlacementReport, PlacementRejection> {
        let footprint = definition.footprint(origin, rotation);
        let mut surface_z = 0.0f64;

        for pos in footprint.tiles() {
            let tile = self
                .occupancy
                .layout_type_at(pos)
                .ok_or(PlacementRejection::OutOfBounds { x: pos.x, y: pos.y })?;
            if tile.blocks_placement() {
                return Err(PlacementRejection::BlockedTerrain {
                    x: pos.x,
                    y: pos.y,
                    tile,
                });
            }
            if !definition.is_flat {
                if let Some(blocker) = self.occupancy.blocking_occupant(pos, ignore) {
                    return Err(PlacementRejection::NotStackable {
                        x: pos.x,
                        y: pos.y,
                        object_id: blocker.id,
                    });
                }
            }
            surface_z = surface_z.max(self.occupancy.stack_top_z(pos, ignore));
        }

        let base_z = surface_z + definition.z_offset;
        let top_z = base_z + definition.own_height(self.limits.stack_unit);
        // Exact fit: top_z == max_stack_z is accepted, only exceeding it rejects.
        if top_z > self.limits.max_stack_z + self.limits.epsilon {
            return Err(PlacementRejection::TooHigh {
                top_z,
                max_z: self.limits.max_stack_z,
            });
        }

        Ok(PlacementReport { base_z, top_z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{DefinitionId, ObjectStore, PlaceableObject, RoomLayout};

    const LIMITS: StackLimits = StackLimits {
        stack_unit: 1.0,
        max_stack_z: 4.0,
        epsilon: 1e-4,
    };

    fn cube() -> FurnitureDefinition {
        FurnitureDefinition::new(DefinitionId(1), 1, 1)
    }

    fn simulate_place(
        store: &mut ObjectStore,
        layout: &RoomLayout,
        id: u64,
        definition: FurnitureDefinition,
        origin: GridPos,
    ) {
        let validator = PlacementValidator::new(Occupancy::new(layout, store, 1.0), LIMITS);
        let report = validator
            .check(&definition, origin, Rotation::NORTH, None)
            .expect("placement");
        store.insert(PlaceableObject::new(
            ObjectId(id),
            definition,
            origin,
            report.base_z,
            Rotation::NORTH,
        ));
    }

    #[test]
    fn simple_placement_on_open_floor() {
        let layout = RoomLayout::filled(5, 5, TileType::Floor).expect("layout");
        let mut store = ObjectStore::new();
        let tile = GridPos::new(2, 2);
        {
            let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
            assert!(validator.is_valid(&cube(), tile, Rotation::NORTH, None));
        }
        simulate_place(&mut store, &layout, 1, cube(), tile);
        let occupancy = Occupancy::new(&layout, &store, 1.0);
        assert_eq!(occupancy.stack_top_z(tile, None), LIMITS.stack_unit);
    }

    #[test]
    fn walls_and_holes_reject_any_definition() {
        let layout = RoomLayout::from_rows(
            3,
            1,
            &[vec![TileType::Floor, TileType::Wall, TileType::Hole]],
        )
        .expect("layout");
        let store = ObjectStore::new();
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        let definitions = [
            cube(),
            cube().with_flat(true),
            cube().with_walkable(true).with_stack_height(0.0),
            FurnitureDefinition::new(DefinitionId(2), 2, 1),
        ];
        for definition in &definitions {
            assert!(!validator.is_valid(definition, GridPos::new(1, 0), Rotation::NORTH, None));
            assert!(!validator.is_valid(definition, GridPos::new(2, 0), Rotation::NORTH, None));
        }
        assert_eq!(
            validator.check(&definitions[3], GridPos::new(0, 0), Rotation::NORTH, None),
            Err(PlacementRejection::BlockedTerrain {
                x: 1,
                y: 0,
                tile: TileType::Wall
            })
        );
    }

    #[test]
    fn footprint_leaving_the_room_is_rejected() {
        let layout = RoomLayout::filled(3, 3, TileType::Floor).expect("layout");
        let store = ObjectStore::new();
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        let bench = FurnitureDefinition::new(DefinitionId(3), 2, 1);
        assert!(validator.is_valid(&bench, GridPos::new(1, 2), Rotation::NORTH, None));
        assert_eq!(
            validator.check(&bench, GridPos::new(2, 2), Rotation::NORTH, None),
            Err(PlacementRejection::OutOfBounds { x: 3, y: 2 })
        );
        assert!(!validator.is_valid(&bench, GridPos::new(1, 2), Rotation::EAST, None));
    }

    #[test]
    fn stacking_stops_at_height_limit() {
        let layout = RoomLayout::filled(2, 2, TileType::Floor).expect("layout");
        let mut store = ObjectStore::new();
        let tile = GridPos::new(0, 0);
        let mut next_id = 1;
        loop {
            let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
            if !validator.is_valid(&cube(), tile, Rotation::NORTH, None) {
                break;
            }
            simulate_place(&mut store, &layout, next_id, cube(), tile);
            next_id += 1;
            assert!(next_id < 100, "stacking never hit the limit");
        }
        let occupancy = Occupancy::new(&layout, &store, 1.0);
        assert_eq!(occupancy.stack_top_z(tile, None), LIMITS.max_stack_z);
        let validator = PlacementValidator::new(occupancy, LIMITS);
        assert!(matches!(
            validator.check(&cube(), tile, Rotation::NORTH, None),
            Err(PlacementRejection::TooHigh { .. })
        ));
    }

    #[test]
    fn exact_fit_survives_float_jitter() {
        let layout = RoomLayout::filled(1, 1, TileType::Floor).expect("layout");
        let mut store = ObjectStore::new();
        let tenth = cube().with_stack_height(0.1);
        for id in 0..39 {
            simulate_place(&mut store, &layout, id, tenth.clone(), GridPos::new(0, 0));
        }
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        assert!(validator.is_valid(&tenth, GridPos::new(0, 0), Rotation::NORTH, None));
    }

    #[test]
    fn non_stackable_occupant_blocks_solid_but_not_flat_candidates() {
        let layout = RoomLayout::filled(2, 2, TileType::Floor).expect("layout");
        let mut store = ObjectStore::new();
        store.insert(PlaceableObject::new(
            ObjectId(9),
            cube().with_stackable(false),
            GridPos::new(0, 0),
            0.0,
            Rotation::NORTH,
        ));
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        assert_eq!(
            validator.check(&cube(), GridPos::new(0, 0), Rotation::NORTH, None),
            Err(PlacementRejection::NotStackable {
                x: 0,
                y: 0,
                object_id: ObjectId(9)
            })
        );
        assert!(validator.is_valid(&cube().with_flat(true), GridPos::new(0, 0), Rotation::NORTH, None));
        assert!(validator.is_valid(&cube(), GridPos::new(0, 0), Rotation::NORTH, Some(ObjectId(9))));
    }

    #[test]
    fn moving_object_does_not_block_itself() {
        let layout = RoomLayout::filled(3, 3, TileType::Floor).expect("layout");
        let mut store = ObjectStore::new();
        let tall = cube().with_stack_height(4.0);
        simulate_place(&mut store, &layout, 1, tall.clone(), GridPos::new(1, 1));
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        assert!(!validator.is_valid(&tall, GridPos::new(1, 1), Rotation::NORTH, None));
        assert!(validator.is_valid(&tall, GridPos::new(1, 1), Rotation::NORTH, Some(ObjectId(1))));
    }

    #[test]
    fn z_offset_lifts_base() {
        let layout = RoomLayout::filled(1, 1, TileType::Floor).expect("layout");
        let store = ObjectStore::new();
        let validator = PlacementValidator::new(Occupancy::new(&layout, &store, 1.0), LIMITS);
        let shelf = cube().with_z_offset(0.5);
        let report = validator
            .check(&shelf, GridPos::new(0, 0), Rotation::NORTH, None)
            .expect("valid");
        assert_eq!(report.base_z, 0.5);
        assert_eq!(report.top_z, 1.5);
    }
}
