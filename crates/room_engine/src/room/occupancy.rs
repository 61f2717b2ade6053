use crate::geometry::GridPos;

use super::{ObjectId, ObjectStore, PlaceableObject, RoomLayout, TileType};

/// Read-only queries over a room's layout grid and live object cache.
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    layout: &'a RoomLayout,
    objects: &'a ObjectStore,
    stack_unit: f64,
}

impl<'a> Occupancy<'a> {
    pub fn new(layout: &'a RoomLayout, objects: &'a ObjectStore, stack_unit: f64) -> Self {
        Self {
            layout,
            objects,
            stack_unit,
        }
    }

    pub fn layout(&self) -> &'a RoomLayout {
        self.layout
    }

    pub fn stack_unit(&self) -> f64 {
        self.stack_unit
    }

    pub fn is_valid_tile(&self, pos: GridPos) -> bool {
        self.layout.contains(pos)
    }

    pub fn layout_type_at(&self, pos: GridPos) -> Option<TileType> {
        self.layout.tile_at(pos)
    }

    pub fn occupants(
        &self,
        pos: GridPos,
        ignore: Option<ObjectId>,
    ) -> impl Iterator<Item = &'a PlaceableObject> + 'a {
        self.objects
            .occupying(pos)
            .filter(move |object| Some(object.id) != ignore)
    }

    pub fn is_walkable(&self, pos: GridPos) -> bool {
        let floor = self
            .layout_type_at(pos)
            .is_some_and(TileType::is_floor);
        floor
            && !self
                .occupants(pos, None)
                .any(|object| object.definition.is_solid())
    }

    /// Highest top surface among stackable occupants, 0 when there are none.
    pub fn stack_top_z(&self, pos: GridPos, ignore: Option<ObjectId>) -> f64 {
        self.occupants(pos, ignore)
            .filter(|object| object.definition.stackable)
            .map(|object| object.top_z(self.stack_unit))
            .fold(0.0, f64::max)
    }

    /// Any non-stackable occupant caps the tile regardless of its height.
    pub fn blocking_occupant(
        &self,
        pos: GridPos,
        ignore: Option<ObjectId>,
    ) -> Option<&'a PlaceableObject> {
        self.occupants(pos, ignore)
            .filter(|object| !object.definition.stackable)
            .min_by_key(|object| object.id)
    }

    pub fn top_object_at(
        &self,
        pos: GridPos,
        ignore: Option<ObjectId>,
    ) -> Option<&'a PlaceableObject> {
        let stack_unit = self.stack_unit;
        self.occupants(pos, ignore).max_by(|a, b| {
            a.top_z(stack_unit)
                .total_cmp(&b.top_z(stack_unit))
                .then_with(|| a.z.total_cmp(&b.z))
                .then_with(|| a.id.cmp(&b.id))
        })
    }

    /// Walkable, or covered by something an avatar can stand on or use.
    pub fn is_reachable(&self, pos: GridPos) -> bool {
        if self.is_walkable(pos) {
            return true;
        }
        self.top_object_at(pos, None).is_some_and(|object| {
            object.definition.is_walkable || object.definition.interaction.is_interactive()
        }) && self.layout_type_at(pos).is_some_and(TileType::is_floor)
    }
}
