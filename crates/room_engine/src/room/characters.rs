use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{GridPos, VisualPosition};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CharacterId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    #[default]
    Avatar,
    Npc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub kind: CharacterKind,
    pub name: String,
    pub position: GridPos,
    pub z: f64,
    pub visual: VisualPosition,
    pub is_self: bool,
}

impl Character {
    pub fn new(id: CharacterId, kind: CharacterKind, position: GridPos, z: f64) -> Self {
        Self {
            id,
            kind,
            name: String::new(),
            position,
            z,
            visual: VisualPosition::at(position, z),
            is_self: false,
        }
    }

    pub fn authoritative_visual(&self) -> VisualPosition {
        VisualPosition::at(self.position, self.z)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CharacterStore {
    characters: HashMap<CharacterId, Character>,
}

impl CharacterStore {
    pub fn insert(&mut self, character: Character) -> Option<Character> {
        self.characters.insert(character.id, character)
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        self.characters.remove(&id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.characters.values_mut()
    }

    pub fn own_avatar(&self) -> Option<&Character> {
        self.characters.values().find(|character| character.is_self)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
