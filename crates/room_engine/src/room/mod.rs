mod characters;
mod layout;
mod objects;
mod occupancy;

pub use characters::{Character, CharacterId, CharacterKind, CharacterStore};
pub use layout::{LayoutError, RoomLayout, TileType, MAX_ROOM_DIMENSION};
pub use objects::{
    DefinitionCatalog, DefinitionId, FurnitureDefinition, Interaction, ObjectId, ObjectStore,
    PlaceableObject,
};
pub use occupancy::Occupancy;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(pub u64);

/// Cached mirror of one room: static layout plus live furniture and characters.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub layout: RoomLayout,
    pub objects: ObjectStore,
    pub characters: CharacterStore,
}

impl Room {
    pub fn new(id: RoomId, layout: RoomLayout) -> Self {
        Self {
            id,
            layout,
            objects: ObjectStore::new(),
            characters: CharacterStore::default(),
        }
    }

    pub fn occupancy(&self, stack_unit: f64) -> Occupancy<'_> {
        Occupancy::new(&self.layout, &self.objects, stack_unit)
    }
}
