use std::fs;
use std::path::{Path, PathBuf};

use room_engine::{DefinitionId, FurnitureDefinition, PointerButton, RoomEvent, RoomSnapshot};
use serde::Deserialize;
use thiserror::Error;

/// A recorded client session: the room to enter plus the input and transport
/// traffic to feed through it, in order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ReplayScript {
    #[serde(default)]
    pub(crate) viewport: Option<ViewportSize>,
    #[serde(default)]
    pub(crate) definitions: Vec<FurnitureDefinition>,
    #[serde(default)]
    pub(crate) inventory: Vec<InventoryEntry>,
    pub(crate) snapshot: RoomSnapshot,
    #[serde(default)]
    pub(crate) steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ViewportSize {
    pub(crate) width: f64,
    pub(crate) height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct InventoryEntry {
    pub(crate) definition_id: DefinitionId,
    pub(crate) count: u32,
}

fn primary() -> PointerButton {
    PointerButton::Primary
}

fn pressed() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub(crate) enum ReplayStep {
    EditMode {
        enabled: bool,
    },
    LayoutPaint {
        enabled: bool,
    },
    Inventory {
        definition_id: DefinitionId,
        count: u32,
    },
    SelectInventory {
        definition_id: DefinitionId,
    },
    Deselect,
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: PointerButton,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default = "primary")]
        button: PointerButton,
    },
    /// Press and release on the centre of a grid tile.
    ClickTile {
        x: i32,
        y: i32,
    },
    /// Press on one tile, move to another, release.
    DragTile {
        from: [i32; 2],
        to: [i32; 2],
    },
    HoverTile {
        x: i32,
        y: i32,
    },
    Wheel {
        steps: i32,
        x: f64,
        y: f64,
    },
    Key {
        key: String,
        #[serde(default = "pressed")]
        down: bool,
    },
    Rotate,
    Pickup,
    Recolor {
        color: String,
    },
    Event {
        event: RoomEvent,
    },
    Snapshot {
        snapshot: RoomSnapshot,
    },
    Tick {
        dt: f64,
    },
    Leave,
    Disconnect,
}

#[derive(Debug, Error)]
pub(crate) enum ScriptError {
    #[error("failed to read replay script {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("replay script {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub(crate) fn load_script(path: &Path) -> Result<ReplayScript, ScriptError> {
    let raw = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script_json(&raw).map_err(|message| ScriptError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub(crate) fn parse_script_json(raw: &str) -> Result<ReplayScript, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, ReplayScript>(&mut deserializer) {
        Ok(script) => Ok(script),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse replay json: {source}"))
            } else {
                Err(format!("parse replay json at {path}: {source}"))
            }
        }
    }
}
