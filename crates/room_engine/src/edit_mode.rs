use serde::Serialize;
use thiserror::Error;

use crate::geometry::{GridPos, Rotation};
use crate::room::{DefinitionId, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditModeKind {
    Navigate,
    Placing,
    Selected,
    Dragging,
}

/// Each variant carries exactly the selection it needs, so a placing
/// session can never hold a floor object and vice versa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditState {
    Navigate,
    Placing {
        definition_id: DefinitionId,
        rotation: Rotation,
    },
    Selected {
        object_id: ObjectId,
    },
    Dragging {
        object_id: ObjectId,
        origin: GridPos,
        origin_z: f64,
    },
}

impl EditState {
    pub fn kind(&self) -> EditModeKind {
        match self {
            EditState::Navigate => EditModeKind::Navigate,
            EditState::Placing { .. } => EditModeKind::Placing,
            EditState::Selected { .. } => EditModeKind::Selected,
            EditState::Dragging { .. } => EditModeKind::Dragging,
        }
    }
}

/// Presentation-facing notifications, drained once per frame by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditEvent {
    ModeChanged {
        from: EditModeKind,
        to: EditModeKind,
    },
    InventorySelected {
        definition_id: DefinitionId,
    },
    InventoryCleared {
        definition_id: DefinitionId,
    },
    ObjectSelected {
        object_id: ObjectId,
    },
    SelectionCleared {
        object_id: ObjectId,
    },
    DragStarted {
        object_id: ObjectId,
        origin: GridPos,
    },
    DragEnded {
        object_id: ObjectId,
    },
    PanelsHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditModeError {
    #[error("edit mode is disabled")]
    Disabled,
    #[error("object {0:?} is not the current selection")]
    NotSelected(ObjectId),
    #[error("cannot {action} while in {mode:?} mode")]
    InvalidInMode {
        action: &'static str,
        mode: EditModeKind,
    },
}

/// Flat view of the edit state for button and panel styling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EditSnapshot {
    pub enabled: bool,
    pub mode: EditModeKind,
    pub selected_inventory_def_id: Option<DefinitionId>,
    pub selected_object_id: Option<ObjectId>,
    pub dragged_object_id: Option<ObjectId>,
    pub drag_origin: Option<GridPos>,
    pub placement_rotation: Rotation,
    pub placement_valid: bool,
}

impl EditSnapshot {
    pub fn selection_count(&self) -> usize {
        usize::from(self.selected_inventory_def_id.is_some())
            + usize::from(self.selected_object_id.is_some())
            + usize::from(self.dragged_object_id.is_some())
    }
}

#[derive(Debug, Clone)]
pub struct EditModeStateMachine {
    enabled: bool,
    state: EditState,
    placement_valid: bool,
    events: Vec<EditEvent>,
}

impl Default for EditModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl EditModeStateMachine {
    pub fn new() -> Self {
        Self {
            enabled: false,
            state: EditState::Navigate,
            placement_valid: false,
            events: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn kind(&self) -> EditModeKind {
        self.state.kind()
    }

    pub fn selected_inventory(&self) -> Option<DefinitionId> {
        match self.state {
            EditState::Placing { definition_id, .. } => Some(definition_id),
            _ => None,
        }
    }

    pub fn selected_object(&self) -> Option<ObjectId> {
        match self.state {
            EditState::Selected { object_id } => Some(object_id),
            _ => None,
        }
    }

    pub fn dragged_object(&self) -> Option<ObjectId> {
        match self.state {
            EditState::Dragging { object_id, .. } => Some(object_id),
            _ => None,
        }
    }

    /// Object currently held in either `Selected` or `Dragging`.
    pub fn focused_object(&self) -> Option<ObjectId> {
        self.selected_object().or_else(|| self.dragged_object())
    }

    pub fn drag_origin(&self) -> Option<(GridPos, f64)> {
        match self.state {
            EditState::Dragging {
                origin, origin_z, ..
            } => Some((origin, origin_z)),
            _ => None,
        }
    }

    pub fn placement_rotation(&self) -> Rotation {
        match self.state {
            EditState::Placing { rotation, .. } => rotation,
            _ => Rotation::NORTH,
        }
    }

    pub fn placement_valid(&self) -> bool {
        self.placement_valid
    }

    /// Only placing and dragging carry a verdict; other modes keep it false.
    pub fn set_placement_valid(&mut self, valid: bool) {
        self.placement_valid = valid
            && matches!(
                self.state,
                EditState::Placing { .. } | EditState::Dragging { .. }
            );
    }

    pub fn snapshot(&self) -> EditSnapshot {
        EditSnapshot {
            enabled: self.enabled,
            mode: self.kind(),
            selected_inventory_def_id: self.selected_inventory(),
            selected_object_id: self.selected_object(),
            dragged_object_id: self.dragged_object(),
            drag_origin: self.drag_origin().map(|(origin, _)| origin),
            placement_rotation: self.placement_rotation(),
            placement_valid: self.placement_valid,
        }
    }

    pub fn drain_events(&mut self) -> Vec<EditEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns true when the flag changed. Turning edit mode off unwinds
    /// every selection and hides all panels.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if !enabled {
            self.unwind();
            self.events.push(EditEvent::PanelsHidden);
        }
        true
    }

    /// Back to `Navigate` without touching the enabled flag. Used on room
    /// change.
    pub fn reset(&mut self) {
        self.unwind();
    }

    pub fn select_inventory(&mut self, definition_id: DefinitionId) -> Result<(), EditModeError> {
        if !self.enabled {
            return Err(EditModeError::Disabled);
        }
        if self.selected_inventory() != Some(definition_id) {
            self.unwind();
            self.events
                .push(EditEvent::InventorySelected { definition_id });
        }
        self.transition(EditState::Placing {
            definition_id,
            rotation: Rotation::NORTH,
        });
        self.placement_valid = false;
        Ok(())
    }

    /// Returns false when nothing was selected from the inventory.
    pub fn clear_inventory(&mut self) -> bool {
        if self.selected_inventory().is_none() {
            return false;
        }
        self.unwind();
        true
    }

    /// Selecting the already selected object toggles it off.
    pub fn select_object(&mut self, object_id: ObjectId) -> Result<(), EditModeError> {
        if !self.enabled {
            return Err(EditModeError::Disabled);
        }
        match self.state {
            EditState::Dragging { .. } => Err(EditModeError::InvalidInMode {
                action: "select an object",
                mode: EditModeKind::Dragging,
            }),
            EditState::Selected { object_id: current } if current == object_id => {
                self.deselect();
                Ok(())
            }
            _ => {
                self.unwind();
                self.events.push(EditEvent::ObjectSelected { object_id });
                self.transition(EditState::Selected { object_id });
                Ok(())
            }
        }
    }

    /// Returns false when no floor object was selected.
    pub fn deselect(&mut self) -> bool {
        if self.selected_object().is_none() {
            return false;
        }
        self.unwind();
        true
    }

    pub fn start_drag(
        &mut self,
        object_id: ObjectId,
        origin: GridPos,
        origin_z: f64,
    ) -> Result<(), EditModeError> {
        if !self.enabled {
            return Err(EditModeError::Disabled);
        }
        if self.selected_object() != Some(object_id) {
            return Err(EditModeError::NotSelected(object_id));
        }
        self.events
            .push(EditEvent::DragStarted { object_id, origin });
        self.transition(EditState::Dragging {
            object_id,
            origin,
            origin_z,
        });
        self.placement_valid = false;
        Ok(())
    }

    /// Ends a drag, keeping the object selected when `keep_selected` is set.
    /// Returns the dragged id and its recorded origin.
    pub fn end_drag(&mut self, keep_selected: bool) -> Option<(ObjectId, GridPos)> {
        let EditState::Dragging {
            object_id, origin, ..
        } = self.state
        else {
            return None;
        };
        if keep_selected {
            self.events.push(EditEvent::DragEnded { object_id });
            self.transition(EditState::Selected { object_id });
        } else {
            self.unwind();
        }
        Some((object_id, origin))
    }

    /// Rotates the inventory candidate locally. Rotating a floor object goes
    /// through the transport instead.
    pub fn rotate_placement(&mut self) -> Result<Rotation, EditModeError> {
        match self.state {
            EditState::Placing {
                definition_id,
                rotation,
            } => {
                let next = rotation.next();
                self.state = EditState::Placing {
                    definition_id,
                    rotation: next,
                };
                Ok(next)
            }
            _ => Err(EditModeError::InvalidInMode {
                action: "rotate the placement candidate",
                mode: self.kind(),
            }),
        }
    }

    /// Escape semantics: peel back to `Navigate` from any state. Returns
    /// false when already navigating.
    pub fn cancel(&mut self) -> bool {
        if matches!(self.state, EditState::Navigate) {
            return false;
        }
        self.unwind();
        true
    }

    /// Drops the selection or drag that references a removed object.
    pub fn forget_object(&mut self, object_id: ObjectId) -> bool {
        if self.focused_object() != Some(object_id) {
            return false;
        }
        self.unwind();
        true
    }

    fn unwind(&mut self) {
        match self.state {
            EditState::Navigate => {}
            EditState::Placing { definition_id, .. } => {
                self.events
                    .push(EditEvent::InventoryCleared { definition_id });
            }
            EditState::Selected { object_id } => {
                self.events.push(EditEvent::SelectionCleared { object_id });
            }
            EditState::Dragging { object_id, .. } => {
                self.events.push(EditEvent::DragEnded { object_id });
                self.events.push(EditEvent::SelectionCleared { object_id });
            }
        }
        self.transition(EditState::Navigate);
        self.placement_valid = false;
    }

    fn transition(&mut self, next: EditState) {
        let from = self.kind();
        self.state = next;
        let to = self.kind();
        if from != to {
            self.events.push(EditEvent::ModeChanged { from, to });
        }
    }
}
