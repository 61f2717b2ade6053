use std::cmp::Ordering;

use serde::Serialize;

use crate::camera::Camera;
use crate::geometry::{elevation_px, world_to_screen, GridPos, Point, TILE_H_HALF};
use crate::room::{
    Character, CharacterId, CharacterKind, CharacterStore, ObjectId, ObjectStore, PlaceableObject,
};

const FURNITURE_MIN_HEIGHT_PX: f64 = 8.0;
const CHARACTER_HALF_WIDTH_PX: f64 = 16.0;
const CHARACTER_HEIGHT_PX: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PickTarget {
    Furniture(ObjectId),
    Avatar(CharacterId),
    Npc(CharacterId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ScreenRect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Paint order: grid depth, then elevation, then furniture before characters,
/// then id. Later keys are drawn on top.
#[derive(Debug, Clone, Copy)]
pub struct DrawOrderKey {
    pub depth: i64,
    pub z: f64,
    pub layer: u8,
    pub id: u64,
}

impl DrawOrderKey {
    pub fn for_object(object: &PlaceableObject) -> Self {
        Self {
            depth: object.position.depth(),
            z: object.visual.z,
            layer: 0,
            id: object.id.0,
        }
    }

    pub fn for_character(character: &Character) -> Self {
        Self {
            depth: character.position.depth(),
            z: character.visual.z,
            layer: 1,
            id: character.id.0,
        }
    }

}

impl Ord for DrawOrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth
            .cmp(&other.depth)
            .then_with(|| self.z.total_cmp(&other.z))
            .then_with(|| self.layer.cmp(&other.layer))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for DrawOrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DrawOrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DrawOrderKey {}

/// Approximate screen-space hit testing. Bounds are rebuilt from the live
/// caches on every query.
#[derive(Debug, Clone, Copy)]
pub struct Picker<'a> {
    camera: &'a Camera,
    objects: &'a ObjectStore,
    characters: &'a CharacterStore,
    stack_unit: f64,
}

impl<'a> Picker<'a> {
    pub fn new(
        camera: &'a Camera,
        objects: &'a ObjectStore,
        characters: &'a CharacterStore,
        stack_unit: f64,
    ) -> Self {
        Self {
            camera,
            objects,
            characters,
            stack_unit,
        }
    }

    pub fn furniture_bounds(&self, object: &PlaceableObject) -> ScreenRect {
        let footprint = object.footprint();
        let w = f64::from(footprint.width());
        let h = f64::from(footprint.height());
        let vx = object.visual.x;
        let vy = object.visual.y;

        let left = world_to_screen(self.camera, Point::new(vx - 0.5, vy + h - 0.5)).x;
        let right = world_to_screen(self.camera, Point::new(vx + w - 0.5, vy - 0.5)).x;
        let top = world_to_screen(self.camera, Point::new(vx - 0.5, vy - 0.5)).y;
        let bottom = world_to_screen(self.camera, Point::new(vx + w - 0.5, vy + h - 0.5)).y;

        let lift = elevation_px(self.camera, object.visual.z);
        let extent = if object.definition.is_flat {
            0.0
        } else {
            elevation_px(self.camera, object.definition.own_height(self.stack_unit))
                .max(FURNITURE_MIN_HEIGHT_PX * self.camera.zoom)
        };

        ScreenRect {
            left,
            top: top - lift - extent,
            right,
            bottom: bottom - lift,
        }
    }

    pub fn character_bounds(&self, character: &Character) -> ScreenRect {
        let feet = world_to_screen(self.camera, character.visual.ground());
        let zoom = self.camera.zoom;
        let bottom = feet.y - elevation_px(self.camera, character.visual.z) + TILE_H_HALF * 0.5 * zoom;
        ScreenRect {
            left: feet.x - CHARACTER_HALF_WIDTH_PX * zoom,
            top: bottom - CHARACTER_HEIGHT_PX * zoom,
            right: feet.x + CHARACTER_HALF_WIDTH_PX * zoom,
            bottom,
        }
    }

    pub fn furniture_at(&self, screen: Point) -> Option<ObjectId> {
        topmost(
            self.objects
                .iter()
                .filter(|object| self.furniture_bounds(object).contains(screen))
                .map(|object| (DrawOrderKey::for_object(object), object.id)),
        )
    }

    pub fn avatar_at(&self, screen: Point) -> Option<CharacterId> {
        self.character_of_kind_at(screen, Some(CharacterKind::Avatar))
    }

    pub fn npc_at(&self, screen: Point) -> Option<CharacterId> {
        self.character_of_kind_at(screen, Some(CharacterKind::Npc))
    }

    pub fn character_at(&self, screen: Point) -> Option<CharacterId> {
        self.character_of_kind_at(screen, None)
    }

    /// Topmost thing of any class under the point.
    pub fn pick(&self, screen: Point) -> Option<PickTarget> {
        let furniture = self
            .objects
            .iter()
            .filter(|object| self.furniture_bounds(object).contains(screen))
            .map(|object| (DrawOrderKey::for_object(object), PickTarget::Furniture(object.id)));
        let characters = self
            .characters
            .iter()
            .filter(|character| self.character_bounds(character).contains(screen))
            .map(|character| {
                let target = match character.kind {
                    CharacterKind::Avatar => PickTarget::Avatar(character.id),
                    CharacterKind::Npc => PickTarget::Npc(character.id),
                };
                (DrawOrderKey::for_character(character), target)
            });
        topmost(furniture.chain(characters))
    }

    pub fn tile_of(&self, target: PickTarget) -> Option<GridPos> {
        match target {
            PickTarget::Furniture(id) => self.objects.get(id).map(|object| object.position),
            PickTarget::Avatar(id) | PickTarget::Npc(id) => {
                self.characters.get(id).map(|character| character.position)
            }
        }
    }

    fn character_of_kind_at(
        &self,
        screen: Point,
        kind: Option<CharacterKind>,
    ) -> Option<CharacterId> {
        topmost(
            self.characters
                .iter()
                .filter(|character| kind.map_or(true, |kind| character.kind == kind))
                .filter(|character| self.character_bounds(character).contains(screen))
                .map(|character| (DrawOrderKey::for_character(character), character.id)),
        )
    }
}

fn topmost<T>(candidates: impl Iterator<Item = (DrawOrderKey, T)>) -> Option<T> {
    let mut hits: Vec<(DrawOrderKey, T)> = candidates.collect();
    hits.sort_by(|a, b| a.0.cmp(&b.0));
    hits.pop().map(|(_, target)| target)
}
