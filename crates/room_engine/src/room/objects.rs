use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Footprint, GridPos, Rotation, VisualPosition};

use super::layout::MAX_ROOM_DIMENSION;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DefinitionId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interaction {
    #[default]
    None,
    Door,
    Usable,
    Sittable,
}

impl Interaction {
    pub fn is_interactive(self) -> bool {
        !matches!(self, Self::None)
    }
}

fn default_dimension() -> u32 {
    1
}

fn default_stack_height() -> f64 {
    1.0
}

fn default_stackable() -> bool {
    true
}

/// Shape and stacking metadata shared by every instance of a furniture type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureDefinition {
    pub id: DefinitionId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
    #[serde(default)]
    pub is_flat: bool,
    #[serde(default)]
    pub is_walkable: bool,
    #[serde(default = "default_stackable")]
    pub stackable: bool,
    #[serde(default = "default_stack_height")]
    pub stack_height: f64,
    #[serde(default)]
    pub z_offset: f64,
    #[serde(default)]
    pub interaction: Interaction,
    #[serde(default)]
    pub recolorable: bool,
}

impl FurnitureDefinition {
    pub fn new(id: DefinitionId, width: u32, height: u32) -> Self {
        Self {
            id,
            name: String::new(),
            width,
            height,
            is_flat: false,
            is_walkable: false,
            stackable: true,
            stack_height: default_stack_height(),
            z_offset: 0.0,
            interaction: Interaction::None,
            recolorable: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_flat(mut self, is_flat: bool) -> Self {
        self.is_flat = is_flat;
        self
    }

    pub fn with_walkable(mut self, is_walkable: bool) -> Self {
        self.is_walkable = is_walkable;
        self
    }

    pub fn with_stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    pub fn with_stack_height(mut self, stack_height: f64) -> Self {
        self.stack_height = stack_height;
        self
    }

    pub fn with_z_offset(mut self, z_offset: f64) -> Self {
        self.z_offset = z_offset;
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn with_recolorable(mut self, recolorable: bool) -> Self {
        self.recolorable = recolorable;
        self
    }

    pub fn footprint(&self, origin: GridPos, rotation: Rotation) -> Footprint {
        Footprint::new(origin, self.width, self.height, rotation)
    }

    /// Neither walkable nor flat: blocks traversal of every covered tile.
    pub fn is_solid(&self) -> bool {
        !self.is_walkable && !self.is_flat
    }

    /// Vertical extent contributed to a stack, in world z.
    pub fn own_height(&self, stack_unit: f64) -> f64 {
        if self.is_flat {
            0.0
        } else {
            self.stack_height * stack_unit
        }
    }

    /// Shapes wider or longer than the largest possible room are rejected.
    pub fn is_well_formed(&self) -> bool {
        (1..=MAX_ROOM_DIMENSION).contains(&self.width)
            && (1..=MAX_ROOM_DIMENSION).contains(&self.height)
            && self.stack_height.is_finite()
            && self.stack_height >= 0.0
            && self.z_offset.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceableObject {
    pub id: ObjectId,
    pub definition: FurnitureDefinition,
    pub position: GridPos,
    pub z: f64,
    pub rotation: Rotation,
    pub visual: VisualPosition,
    pub color: Option<String>,
}

impl PlaceableObject {
    pub fn new(
        id: ObjectId,
        definition: FurnitureDefinition,
        position: GridPos,
        z: f64,
        rotation: Rotation,
    ) -> Self {
        Self {
            id,
            definition,
            position,
            z,
            rotation,
            visual: VisualPosition::at(position, z),
            color: None,
        }
    }

    pub fn footprint(&self) -> Footprint {
        self.definition.footprint(self.position, self.rotation)
    }

    pub fn occupies(&self, pos: GridPos) -> bool {
        self.footprint().contains(pos)
    }

    pub fn top_z(&self, stack_unit: f64) -> f64 {
        self.z + self.definition.own_height(stack_unit)
    }

    pub fn authoritative_visual(&self) -> VisualPosition {
        VisualPosition::at(self.position, self.z)
    }
}

/// Id-indexed mirror of the furniture currently in the room.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: HashMap<ObjectId, PlaceableObject>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces by id. Returns the replaced object, if any.
    pub fn insert(&mut self, object: PlaceableObject) -> Option<PlaceableObject> {
        self.objects.insert(object.id, object)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<PlaceableObject> {
        self.objects.remove(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlaceableObject> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlaceableObject> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceableObject> {
        self.objects.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlaceableObject> {
        self.objects.values_mut()
    }

    pub fn occupying(&self, pos: GridPos) -> impl Iterator<Item = &PlaceableObject> {
        self.objects.values().filter(move |object| object.occupies(pos))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

/// Known furniture definitions, from room snapshots and inventory.
#[derive(Debug, Clone, Default)]
pub struct DefinitionCatalog {
    definitions: HashMap<DefinitionId, FurnitureDefinition>,
}

impl DefinitionCatalog {
    pub fn register(&mut self, definition: FurnitureDefinition) {
        self.definitions.insert(definition.id, definition);
    }

    pub fn extend(&mut self, definitions: impl IntoIterator<Item = FurnitureDefinition>) {
        for definition in definitions {
            self.register(definition);
        }
    }

    pub fn get(&self, id: DefinitionId) -> Option<&FurnitureDefinition> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: DefinitionId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sofa() -> FurnitureDefinition {
        FurnitureDefinition::new(DefinitionId(3), 2, 1).with_name("sofa")
    }

    #[test]
    fn multi_tile_object_occupies_whole_footprint() {
        let object = PlaceableObject::new(
            ObjectId(1),
            sofa(),
            GridPos::new(2, 2),
            0.0,
            Rotation::NORTH,
        );
        assert!(object.occupies(GridPos::new(2, 2)));
        assert!(object.occupies(GridPos::new(3, 2)));
        assert!(!object.occupies(GridPos::new(2, 3)));

        let turned = PlaceableObject {
            rotation: Rotation::EAST,
            ..object
        };
        assert!(turned.occupies(GridPos::new(2, 3)));
        assert!(!turned.occupies(GridPos::new(3, 2)));
    }

    #[test]
    fn flat_objects_add_no_height() {
        let rug = FurnitureDefinition::new(DefinitionId(4), 3, 3)
            .with_flat(true)
            .with_stack_height(2.0);
        assert_eq!(rug.own_height(1.0), 0.0);
        assert!(!rug.is_solid());
        assert_eq!(sofa().own_height(0.5), 0.5);
        assert!(sofa().is_solid());
    }

    #[test]
    fn store_lists_every_object_covering_a_tile() {
        let mut store = ObjectStore::new();
        store.insert(PlaceableObject::new(
            ObjectId(1),
            sofa(),
            GridPos::new(0, 0),
            0.0,
            Rotation::NORTH,
        ));
        store.insert(PlaceableObject::new(
            ObjectId(2),
            FurnitureDefinition::new(DefinitionId(5), 1, 1),
            GridPos::new(1, 0),
            1.0,
            Rotation::NORTH,
        ));
        let mut ids: Vec<ObjectId> = store
            .occupying(GridPos::new(1, 0))
            .map(|object| object.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![ObjectId(1), ObjectId(2)]);
    }

    #[test]
    fn definition_defaults_fill_missing_wire_fields() {
        let definition: FurnitureDefinition =
            serde_json::from_value(serde_json::json!({ "id": 9 })).expect("decode");
        assert_eq!(definition.width, 1);
        assert_eq!(definition.height, 1);
        assert!(definition.stackable);
        assert_eq!(definition.stack_height, 1.0);
        assert_eq!(definition.interaction, Interaction::None);
    }

    #[test]
    fn oversized_definitions_are_malformed() {
        assert!(FurnitureDefinition::new(DefinitionId(1), MAX_ROOM_DIMENSION, 1).is_well_formed());
        assert!(!FurnitureDefinition::new(DefinitionId(1), MAX_ROOM_DIMENSION + 1, 1).is_well_formed());
        assert!(!FurnitureDefinition::new(DefinitionId(1), 1, 20_000).is_well_formed());
        assert!(!FurnitureDefinition::new(DefinitionId(1), 0, 1).is_well_formed());
    }

    #[test]
    fn catalog_replaces_definitions_by_id() {
        let mut catalog = DefinitionCatalog::default();
        catalog.register(sofa());
        catalog.register(sofa().with_name("sofa_v2"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(DefinitionId(3)).map(|d| d.name.as_str()),
            Some("sofa_v2")
        );
    }
}
