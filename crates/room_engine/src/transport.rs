use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{GridPos, Rotation};
use crate::room::{
    Character, CharacterId, CharacterKind, DefinitionCatalog, DefinitionId, FurnitureDefinition,
    LayoutError, ObjectId, PlaceableObject, Room, RoomId, RoomLayout, TileType,
};

/// Full room state sent on room entry and on resync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub cols: u32,
    pub rows: u32,
    pub layout: Vec<Vec<TileType>>,
    #[serde(default)]
    pub definitions: Vec<FurnitureDefinition>,
    #[serde(default)]
    pub objects: Vec<ObjectDto>,
    #[serde(default)]
    pub characters: Vec<CharacterDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectDto {
    #[serde(default)]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub definition_id: Option<DefinitionId>,
    pub x: i64,
    pub y: i64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default)]
    pub definition_id: Option<DefinitionId>,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub rotation: Option<Rotation>,
    /// An empty string clears the tint.
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterDto {
    #[serde(default)]
    pub id: Option<CharacterId>,
    #[serde(default)]
    pub kind: CharacterKind,
    #[serde(default)]
    pub name: String,
    pub x: i64,
    pub y: i64,
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub is_self: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub x: Option<i64>,
    #[serde(default)]
    pub y: Option<i64>,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Incremental room changes pushed by the server between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    ObjectAdded { object: ObjectDto },
    ObjectRemoved { id: ObjectId },
    ObjectUpdated { id: ObjectId, patch: ObjectPatch },
    CharacterAdded { character: CharacterDto },
    CharacterRemoved { id: CharacterId },
    CharacterUpdated { id: CharacterId, patch: CharacterPatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MoveTarget {
    Furniture(ObjectId),
    Avatar,
}

/// Fire-and-forget requests for the server. The local cache is never
/// mutated when one is issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum TransportRequest {
    Place {
        definition_id: DefinitionId,
        x: i32,
        y: i32,
        rotation: Rotation,
    },
    Move {
        target: MoveTarget,
        x: i32,
        y: i32,
    },
    Rotate {
        object_id: ObjectId,
    },
    Pickup {
        object_id: ObjectId,
    },
    Recolor {
        object_id: ObjectId,
        color: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InboundError {
    #[error("{entity} is missing its id")]
    MissingId { entity: &'static str },
    #[error("object {0:?} has no definition id")]
    MissingDefinition(ObjectId),
    #[error("object {object_id:?} references unknown definition {definition_id:?}")]
    UnknownDefinition {
        object_id: ObjectId,
        definition_id: DefinitionId,
    },
    #[error("definition {0:?} has an invalid shape")]
    MalformedDefinition(DefinitionId),
    #[error("coordinates {x},{y} are outside the room")]
    OutOfRange { x: i64, y: i64 },
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },
    #[error("no object {0:?} in the room")]
    UnknownObject(ObjectId),
    #[error("no character {0:?} in the room")]
    UnknownCharacter(CharacterId),
}

/// A room rebuilt from a snapshot plus every entry that had to be dropped.
#[derive(Debug)]
pub struct RoomBuild {
    pub room: Room,
    pub rejected: Vec<InboundError>,
}

impl RoomSnapshot {
    /// Registers the snapshot's definitions and converts its entities. Only
    /// a malformed layout fails the whole snapshot.
    pub fn into_room(self, catalog: &mut DefinitionCatalog) -> Result<RoomBuild, LayoutError> {
        let layout = RoomLayout::from_rows(self.cols, self.rows, &self.layout)?;
        let mut rejected = Vec::new();

        for definition in self.definitions {
            if definition.is_well_formed() {
                catalog.register(definition);
            } else {
                rejected.push(InboundError::MalformedDefinition(definition.id));
            }
        }

        let mut room = Room::new(self.id, layout);
        for dto in self.objects {
            match dto.into_object(&room.layout, catalog) {
                Ok(object) => {
                    room.objects.insert(object);
                }
                Err(err) => rejected.push(err),
            }
        }
        for dto in self.characters {
            match dto.into_character(&room.layout) {
                Ok(character) => {
                    room.characters.insert(character);
                }
                Err(err) => rejected.push(err),
            }
        }

        Ok(RoomBuild { room, rejected })
    }
}

impl ObjectDto {
    pub fn into_object(
        self,
        layout: &RoomLayout,
        catalog: &DefinitionCatalog,
    ) -> Result<PlaceableObject, InboundError> {
        let id = self.id.ok_or(InboundError::MissingId { entity: "object" })?;
        let definition_id = self.definition_id.ok_or(InboundError::MissingDefinition(id))?;
        let definition = resolve_definition(catalog, id, definition_id)?;
        let position = in_room(layout, self.x, self.y)?;
        let z = finite("z", self.z)?;

        let mut object = PlaceableObject::new(id, definition.clone(), position, z, self.rotation);
        object.color = self.color.filter(|color| !color.is_empty());
        Ok(object)
    }
}

impl ObjectPatch {
    /// Validates every field before touching the object, so a rejected patch
    /// leaves it unchanged. The visual position is left to interpolate.
    pub fn apply_to(
        &self,
        object: &mut PlaceableObject,
        layout: &RoomLayout,
        catalog: &DefinitionCatalog,
    ) -> Result<(), InboundError> {
        let definition = self
            .definition_id
            .map(|definition_id| resolve_definition(catalog, object.id, definition_id))
            .transpose()?;
        let position = in_room(
            layout,
            self.x.unwrap_or(i64::from(object.position.x)),
            self.y.unwrap_or(i64::from(object.position.y)),
        )?;
        let z = self.z.map(|z| finite("z", z)).transpose()?;

        if let Some(definition) = definition {
            object.definition = definition.clone();
        }
        object.position = position;
        if let Some(z) = z {
            object.z = z;
        }
        if let Some(rotation) = self.rotation {
            object.rotation = rotation;
        }
        if let Some(color) = &self.color {
            object.color = (!color.is_empty()).then(|| color.clone());
        }
        Ok(())
    }
}

impl CharacterDto {
    pub fn into_character(self, layout: &RoomLayout) -> Result<Character, InboundError> {
        let id = self.id.ok_or(InboundError::MissingId {
            entity: "character",
        })?;
        let position = in_room(layout, self.x, self.y)?;
        let z = finite("z", self.z)?;

        let mut character = Character::new(id, self.kind, position, z);
        character.name = self.name;
        character.is_self = self.is_self;
        Ok(character)
    }
}

impl CharacterPatch {
    pub fn apply_to(&self, character: &mut Character, layout: &RoomLayout) -> Result<(), InboundError> {
        let position = in_room(
            layout,
            self.x.unwrap_or(i64::from(character.position.x)),
            self.y.unwrap_or(i64::from(character.position.y)),
        )?;
        let z = self.z.map(|z| finite("z", z)).transpose()?;

        character.position = position;
        if let Some(z) = z {
            character.z = z;
        }
        if let Some(name) = &self.name {
            character.name = name.clone();
        }
        Ok(())
    }
}

fn resolve_definition(
    catalog: &DefinitionCatalog,
    object_id: ObjectId,
    definition_id: DefinitionId,
) -> Result<&FurnitureDefinition, InboundError> {
    catalog
        .get(definition_id)
        .ok_or(InboundError::UnknownDefinition {
            object_id,
            definition_id,
        })
}

fn in_room(layout: &RoomLayout, x: i64, y: i64) -> Result<GridPos, InboundError> {
    let pos = i32::try_from(x)
        .ok()
        .zip(i32::try_from(y).ok())
        .map(|(x, y)| GridPos::new(x, y))
        .filter(|pos| layout.contains(*pos));
    pos.ok_or(InboundError::OutOfRange { x, y })
}

fn finite(field: &'static str, value: f64) -> Result<f64, InboundError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InboundError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_json() -> serde_json::Value {
        json!({
            "id": 12,
            "cols": 3,
            "rows": 2,
            "layout": [["floor", "floor", "wall"], ["alt_floor", "floor", "hole"]],
            "definitions": [
                { "id": 1, "name": "crate" },
                { "id": 2, "name": "rug", "width": 2, "is_flat": true },
                { "id": 3, "name": "broken", "stack_height": -1.0 }
            ],
            "objects": [
                { "id": 100, "definition_id": 1, "x": 0, "y": 0 },
                { "id": 101, "definition_id": 2, "x": 0, "y": 1, "rotation": 1, "color": "" },
                { "definition_id": 1, "x": 1, "y": 1 },
                { "id": 102, "x": 1, "y": 1 },
                { "id": 103, "definition_id": 9, "x": 1, "y": 1 },
                { "id": 104, "definition_id": 1, "x": 7, "y": 0 }
            ],
            "characters": [
                { "id": 5, "x": 1, "y": 0, "is_self": true },
                { "id": 6, "kind": "npc", "x": -1, "y": 0 }
            ]
        })
    }

    #[test]
    fn snapshot_keeps_valid_entries_and_reports_the_rest() {
        let snapshot: RoomSnapshot =
            serde_json::from_value(snapshot_json()).expect("snapshot should parse");
        let mut catalog = DefinitionCatalog::default();
        let build = snapshot.into_room(&mut catalog).expect("layout is valid");

        assert_eq!(build.room.id, RoomId(12));
        assert_eq!(build.room.objects.len(), 2);
        assert_eq!(build.room.characters.len(), 1);
        assert!(catalog.contains(DefinitionId(1)));
        assert!(!catalog.contains(DefinitionId(3)));

        let rug = build.room.objects.get(ObjectId(101)).expect("rug");
        assert_eq!(rug.rotation, Rotation::EAST);
        assert_eq!(rug.color, None);
        assert_eq!(
            build.room.characters.own_avatar().map(|c| c.id),
            Some(CharacterId(5))
        );

        assert_eq!(
            build.rejected,
            vec![
                InboundError::MalformedDefinition(DefinitionId(3)),
                InboundError::MissingId { entity: "object" },
                InboundError::MissingDefinition(ObjectId(102)),
                InboundError::UnknownDefinition {
                    object_id: ObjectId(103),
                    definition_id: DefinitionId(9)
                },
                InboundError::OutOfRange { x: 7, y: 0 },
                InboundError::OutOfRange { x: -1, y: 0 },
            ]
        );
    }

    #[test]
    fn malformed_layout_fails_the_snapshot() {
        let mut raw = snapshot_json();
        raw["rows"] = json!(3);
        let snapshot: RoomSnapshot = serde_json::from_value(raw).expect("snapshot should parse");
        let err = snapshot
            .into_room(&mut DefinitionCatalog::default())
            .expect_err("row count mismatch");
        assert_eq!(
            err,
            LayoutError::RowCountMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn events_decode_from_tagged_json() {
        let event: RoomEvent = serde_json::from_value(json!({
            "type": "object_updated",
            "id": 4,
            "patch": { "x": 2, "color": "#ff0000" }
        }))
        .expect("event should parse");
        assert_eq!(
            event,
            RoomEvent::ObjectUpdated {
                id: ObjectId(4),
                patch: ObjectPatch {
                    x: Some(2),
                    color: Some("#ff0000".to_string()),
                    ..ObjectPatch::default()
                }
            }
        );
    }

    #[test]
    fn rejected_patch_leaves_object_untouched() {
        let layout = RoomLayout::filled(3, 3, TileType::Floor).expect("layout");
        let mut catalog = DefinitionCatalog::default();
        catalog.register(FurnitureDefinition::new(DefinitionId(1), 1, 1));
        let mut object = ObjectDto {
            id: Some(ObjectId(1)),
            definition_id: Some(DefinitionId(1)),
            x: 1,
            y: 1,
            color: Some("#00ff00".to_string()),
            ..ObjectDto::default()
        }
        .into_object(&layout, &catalog)
        .expect("object");
        let before = object.clone();

        let bad = ObjectPatch {
            x: Some(0),
            z: Some(f64::NAN),
            ..ObjectPatch::default()
        };
        assert_eq!(
            bad.apply_to(&mut object, &layout, &catalog),
            Err(InboundError::NonFinite { field: "z" })
        );
        assert_eq!(object, before);

        let clear = ObjectPatch {
            y: Some(2),
            color: Some(String::new()),
            ..ObjectPatch::default()
        };
        clear
            .apply_to(&mut object, &layout, &catalog)
            .expect("valid patch");
        assert_eq!(object.position, GridPos::new(1, 2));
        assert_eq!(object.color, None);
        assert_eq!(object.visual, before.visual);
    }

    #[test]
    fn requests_serialize_with_request_tag() {
        let request = TransportRequest::Move {
            target: MoveTarget::Furniture(ObjectId(3)),
            x: 1,
            y: 2,
        };
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({
                "request": "move",
                "target": { "kind": "furniture", "id": 3 },
                "x": 1,
                "y": 2
            })
        );
        assert_eq!(
            serde_json::to_value(MoveTarget::Avatar).expect("encode"),
            json!({ "kind": "avatar" })
        );
    }
}
