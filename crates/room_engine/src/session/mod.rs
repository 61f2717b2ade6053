use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::camera::{Camera, CameraController};
use crate::config::EngineConfig;
use crate::edit_mode::{EditEvent, EditModeError, EditModeStateMachine, EditSnapshot, EditState};
use crate::geometry::{screen_to_grid, GridPos, Point, Rotation};
use crate::highlight::{HighlightColor, HighlightIntent, HighlightOverlay};
use crate::input::{ActionStates, InputAction, PointerButton};
use crate::picker::{PickTarget, Picker};
use crate::placement::{PlacementRejection, PlacementReport, PlacementValidator};
use crate::room::{
    DefinitionCatalog, DefinitionId, FurnitureDefinition, LayoutError, ObjectId, Room,
};
use crate::transport::{MoveTarget, RoomEvent, RoomSnapshot, TransportRequest};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditModeError),
    #[error("no room is loaded")]
    NoRoom,
    #[error("definition {0:?} is not in the catalog")]
    UnknownDefinition(DefinitionId),
    #[error("definition {0:?} is not in the inventory")]
    NotOwned(DefinitionId),
    #[error("object {0:?} is not in the room")]
    UnknownObject(ObjectId),
    #[error("object {0:?} cannot be recolored")]
    NotRecolorable(ObjectId),
    #[error("no floor object is selected")]
    NothingSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureMode {
    Pending,
    Panning,
    Dragging,
}

#[derive(Debug, Clone, Copy)]
struct PointerGesture {
    button: PointerButton,
    start: Point,
    last: Point,
    pressed_object: Option<ObjectId>,
    mode: GestureMode,
}

/// Owns every piece of mutable state for one connected client: camera, room
/// cache, edit state, overlay and the outgoing request queue. Components only
/// ever borrow from it for the duration of a query.
#[derive(Debug)]
pub struct RoomSession {
    config: EngineConfig,
    camera: CameraController,
    catalog: DefinitionCatalog,
    room: Option<Room>,
    edit: EditModeStateMachine,
    overlay: HighlightOverlay,
    inventory: HashMap<DefinitionId, u32>,
    layout_paint: bool,
    pointer: Option<Point>,
    gesture: Option<PointerGesture>,
    keys: ActionStates,
    outbox: Vec<TransportRequest>,
}

impl RoomSession {
    pub fn new(config: EngineConfig) -> Self {
        let camera = CameraController::new(&config);
        Self {
            config,
            camera,
            catalog: DefinitionCatalog::default(),
            room: None,
            edit: EditModeStateMachine::new(),
            overlay: HighlightOverlay::default(),
            inventory: HashMap::new(),
            layout_paint: false,
            pointer: None,
            gesture: None,
            keys: ActionStates::default(),
            outbox: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        self.camera.camera()
    }

    pub fn camera_controller_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn catalog(&self) -> &DefinitionCatalog {
        &self.catalog
    }

    pub fn register_definitions(
        &mut self,
        definitions: impl IntoIterator<Item = FurnitureDefinition>,
    ) {
        for definition in definitions {
            if definition.is_well_formed() {
                self.catalog.register(definition);
            } else {
                warn!(definition_id = definition.id.0, "definition_rejected_malformed");
            }
        }
        self.refresh();
    }

    // Room lifecycle

    /// Replaces the whole room cache. On a malformed layout the previous
    /// state is kept and the error returned.
    pub fn load_snapshot(&mut self, snapshot: RoomSnapshot) -> Result<(), LayoutError> {
        let room_id = snapshot.id;
        let build = match snapshot.into_room(&mut self.catalog) {
            Ok(build) => build,
            Err(error) => {
                warn!(room_id = room_id.0, error = %error, "room_snapshot_rejected");
                return Err(error);
            }
        };
        for rejected in &build.rejected {
            warn!(room_id = room_id.0, error = %rejected, "snapshot_entry_dropped");
        }

        self.edit.reset();
        self.gesture = None;
        self.keys.clear();
        self.camera.reset();
        self.camera
            .center_on_room(build.room.layout.cols(), build.room.layout.rows());
        info!(
            room_id = room_id.0,
            cols = build.room.layout.cols(),
            rows = build.room.layout.rows(),
            objects = build.room.objects.len(),
            characters = build.room.characters.len(),
            dropped = build.rejected.len(),
            "room_snapshot_loaded"
        );
        self.room = Some(build.room);
        self.refresh();
        Ok(())
    }

    /// Applies one incremental change. Malformed or unknown entries are
    /// logged and dropped.
    pub fn apply_event(&mut self, event: RoomEvent) {
        let Some(room) = self.room.as_mut() else {
            warn!("room_event_without_room");
            return;
        };

        match event {
            RoomEvent::ObjectAdded { object } => {
                match object.into_object(&room.layout, &self.catalog) {
                    Ok(object) => {
                        let id = object.id;
                        if room.objects.insert(object).is_some() {
                            debug!(object_id = id.0, "object_added_replaced_existing");
                        }
                    }
                    Err(error) => warn!(error = %error, "object_added_dropped"),
                }
            }
            RoomEvent::ObjectRemoved { id } => {
                if room.objects.remove(id).is_none() {
                    debug!(object_id = id.0, "object_removed_unknown");
                }
                if self.edit.forget_object(id) {
                    info!(object_id = id.0, "selection_dropped_object_removed");
                }
            }
            RoomEvent::ObjectUpdated { id, patch } => match room.objects.get_mut(id) {
                Some(object) => {
                    if let Err(error) = patch.apply_to(object, &room.layout, &self.catalog) {
                        warn!(object_id = id.0, error = %error, "object_update_dropped");
                    }
                }
                None => warn!(object_id = id.0, "object_update_for_unknown_object"),
            },
            RoomEvent::CharacterAdded { character } => {
                match character.into_character(&room.layout) {
                    Ok(character) => {
                        room.characters.insert(character);
                    }
                    Err(error) => warn!(error = %error, "character_added_dropped"),
                }
            }
            RoomEvent::CharacterRemoved { id } => {
                if room.characters.remove(id).is_none() {
                    debug!(character_id = id.0, "character_removed_unknown");
                }
            }
            RoomEvent::CharacterUpdated { id, patch } => match room.characters.get_mut(id) {
                Some(character) => {
                    if let Err(error) = patch.apply_to(character, &room.layout) {
                        warn!(character_id = id.0, error = %error, "character_update_dropped");
                    }
                }
                None => warn!(character_id = id.0, "character_update_for_unknown_character"),
            },
        }

        self.refresh();
    }

    pub fn leave_room(&mut self) {
        if let Some(room) = self.room.take() {
            info!(room_id = room.id.0, "room_left");
        }
        self.edit.reset();
        self.gesture = None;
        self.overlay.clear();
    }

    /// Drops the room and every pending request; edit mode is switched off.
    pub fn disconnect(&mut self) {
        self.leave_room();
        self.edit.set_enabled(false);
        self.inventory.clear();
        self.keys.clear();
        let pending = self.outbox.len();
        self.outbox.clear();
        info!(pending_requests_dropped = pending, "session_disconnected");
    }

    // Edit mode

    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.edit.set_enabled(enabled) {
            if !enabled {
                self.gesture = None;
            }
            info!(enabled, "edit_mode_changed");
            self.refresh();
        }
    }

    pub fn toggle_edit_mode(&mut self) {
        self.set_edit_mode(!self.edit.is_enabled());
    }

    pub fn set_layout_paint(&mut self, enabled: bool) {
        self.layout_paint = enabled;
        self.refresh();
    }

    pub fn set_inventory(&mut self, items: impl IntoIterator<Item = (DefinitionId, u32)>) {
        self.inventory = items.into_iter().filter(|(_, count)| *count > 0).collect();
        self.refresh();
    }

    /// A count of zero means the item is no longer owned; a placing session
    /// for it ends.
    pub fn set_inventory_count(&mut self, definition_id: DefinitionId, count: u32) {
        if count == 0 {
            self.inventory.remove(&definition_id);
        } else {
            self.inventory.insert(definition_id, count);
        }
        self.refresh();
    }

    pub fn inventory_count(&self, definition_id: DefinitionId) -> u32 {
        self.inventory.get(&definition_id).copied().unwrap_or(0)
    }

    pub fn select_inventory(&mut self, definition_id: DefinitionId) -> Result<(), SessionError> {
        if !self.catalog.contains(definition_id) {
            return Err(SessionError::UnknownDefinition(definition_id));
        }
        if self.inventory_count(definition_id) == 0 {
            return Err(SessionError::NotOwned(definition_id));
        }
        self.edit.select_inventory(definition_id)?;
        self.gesture = None;
        debug!(definition_id = definition_id.0, "inventory_selected");
        self.refresh();
        Ok(())
    }

    pub fn select_object(&mut self, object_id: ObjectId) -> Result<(), SessionError> {
        let room = self.room.as_ref().ok_or(SessionError::NoRoom)?;
        if !room.objects.contains(object_id) {
            return Err(SessionError::UnknownObject(object_id));
        }
        self.edit.select_object(object_id)?;
        self.refresh();
        Ok(())
    }

    /// Explicit deselect from the presentation layer: drops either the
    /// inventory or the floor selection.
    pub fn deselect(&mut self) -> bool {
        let changed = self.edit.clear_inventory() || self.edit.deselect();
        if changed {
            self.refresh();
        }
        changed
    }

    /// Escape: unwinds any interaction, including a drag in progress.
    pub fn cancel(&mut self) -> bool {
        let changed = self.edit.cancel();
        if changed {
            debug!("edit_interaction_cancelled");
            self.refresh();
        }
        changed
    }

    // Furniture actions

    /// In `Placing` the candidate turns locally. In `Selected` a rotate
    /// request is queued when the turned footprint would still fit; the
    /// cached object only changes once the server confirms.
    pub fn rotate(&mut self) -> Result<bool, SessionError> {
        match *self.edit.state() {
            EditState::Placing { .. } => {
                let rotation = self.edit.rotate_placement()?;
                debug!(rotation = rotation.turns(), "placement_rotated");
                self.refresh();
                Ok(true)
            }
            EditState::Selected { object_id } => {
                let verdict = {
                    let room = self.room.as_ref().ok_or(SessionError::NoRoom)?;
                    let object = room
                        .objects
                        .get(object_id)
                        .ok_or(SessionError::UnknownObject(object_id))?;
                    self.validator(room).check(
                        &object.definition,
                        object.position,
                        object.rotation.next(),
                        Some(object_id),
                    )
                };
                match verdict {
                    Ok(_) => {
                        self.send(TransportRequest::Rotate { object_id });
                        Ok(true)
                    }
                    Err(reason) => {
                        debug!(object_id = object_id.0, reason = %reason, "rotate_rejected_locally");
                        Ok(false)
                    }
                }
            }
            _ => Err(EditModeError::InvalidInMode {
                action: "rotate",
                mode: self.edit.kind(),
            }
            .into()),
        }
    }

    pub fn pickup(&mut self) -> Result<(), SessionError> {
        let object_id = self
            .edit
            .selected_object()
            .ok_or(SessionError::NothingSelected)?;
        self.send(TransportRequest::Pickup { object_id });
        Ok(())
    }

    /// An empty color clears the tint.
    pub fn recolor(&mut self, color: &str) -> Result<(), SessionError> {
        let object_id = self
            .edit
            .selected_object()
            .ok_or(SessionError::NothingSelected)?;
        let room = self.room.as_ref().ok_or(SessionError::NoRoom)?;
        let object = room
            .objects
            .get(object_id)
            .ok_or(SessionError::UnknownObject(object_id))?;
        if !object.definition.recolorable {
            return Err(SessionError::NotRecolorable(object_id));
        }
        self.send(TransportRequest::Recolor {
            object_id,
            color: color.to_string(),
        });
        Ok(())
    }

    // Input

    pub fn pointer_move(&mut self, at: Point) {
        if !at.is_finite() {
            return;
        }
        self.pointer = Some(at);

        if let Some(mut gesture) = self.gesture {
            let dx = at.x - gesture.last.x;
            let dy = at.y - gesture.last.y;
            gesture.last = at;

            match (gesture.button, gesture.mode) {
                (PointerButton::Middle, _) | (_, GestureMode::Panning) => {
                    gesture.mode = GestureMode::Panning;
                    self.camera.pan(dx, dy);
                }
                (PointerButton::Primary, GestureMode::Pending)
                    if distance(gesture.start, at) > self.config.pan_threshold_px =>
                {
                    gesture.mode = if self.try_start_drag(gesture.pressed_object) {
                        GestureMode::Dragging
                    } else {
                        self.camera
                            .pan(at.x - gesture.start.x, at.y - gesture.start.y);
                        GestureMode::Panning
                    };
                }
                _ => {}
            }
            self.gesture = Some(gesture);
        }

        self.refresh();
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.refresh();
    }

    pub fn pointer_down(&mut self, button: PointerButton, at: Point) {
        if !at.is_finite() {
            return;
        }
        self.pointer = Some(at);
        if self
            .gesture
            .is_some_and(|active| active.button != button && active.mode != GestureMode::Pending)
        {
            debug!(button = ?button, "pointer_down_ignored_during_gesture");
            return;
        }
        let pressed_object = self.picker().and_then(|picker| picker.furniture_at(at));
        self.gesture = Some(PointerGesture {
            button,
            start: at,
            last: at,
            pressed_object,
            mode: GestureMode::Pending,
        });
    }

    pub fn pointer_up(&mut self, button: PointerButton, at: Point) {
        if !at.is_finite() {
            return;
        }
        self.pointer = Some(at);
        let gesture = self.gesture.filter(|active| active.button == button);
        if gesture.is_some() {
            self.gesture = None;
        }

        if button == PointerButton::Secondary {
            // Right click unwinds any interaction, a drag included.
            self.cancel();
        } else if let Some(gesture) = gesture {
            match (button, gesture.mode) {
                (PointerButton::Primary, GestureMode::Dragging) => {
                    if self.edit.dragged_object().is_some() {
                        self.release_drag(at);
                    }
                }
                (PointerButton::Primary, GestureMode::Pending) => self.click(at),
                _ => {}
            }
        }

        self.refresh();
    }

    /// Positive steps zoom in around `at`.
    pub fn wheel(&mut self, steps: i32, at: Point) {
        if self.camera.zoom_steps(steps, at) {
            self.refresh();
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
    }

    /// Maps a host key name through the default bindings. Returns the action
    /// when it fired.
    pub fn key(&mut self, key: &str, is_down: bool) -> Option<InputAction> {
        let action = InputAction::from_key(key)?;
        if !self.keys.press_edge(action, is_down) {
            return None;
        }
        self.trigger(action);
        Some(action)
    }

    pub fn trigger(&mut self, action: InputAction) {
        match action {
            InputAction::Cancel => {
                self.cancel();
            }
            InputAction::Rotate => {
                if let Err(error) = self.rotate() {
                    debug!(error = %error, "rotate_ignored");
                }
            }
            InputAction::Pickup => {
                if let Err(error) = self.pickup() {
                    debug!(error = %error, "pickup_ignored");
                }
            }
            InputAction::ToggleEditMode => self.toggle_edit_mode(),
        }
    }

    // Frame

    /// Advances visual interpolation, then revalidates and repaints.
    pub fn update(&mut self, dt_seconds: f64) {
        if let Some(room) = self.room.as_mut() {
            if dt_seconds.is_finite() && dt_seconds > 0.0 {
                let max_step = self.config.visual_speed_tiles_per_second * dt_seconds;
                let arrival = self.config.arrival_epsilon;
                for object in room.objects.iter_mut() {
                    let target = object.authoritative_visual();
                    object.visual.step_toward(target, max_step, arrival);
                }
                for character in room.characters.iter_mut() {
                    let target = character.authoritative_visual();
                    character.visual.step_toward(target, max_step, arrival);
                }
            }
        }
        self.refresh();
    }

    /// Drops dangling selections, then rebuilds the overlay from the current
    /// pointer position and edit state.
    pub fn refresh(&mut self) {
        let Some(room) = self.room.as_ref() else {
            self.overlay.clear();
            self.edit.set_placement_valid(false);
            return;
        };

        if let Some(object_id) = self.edit.focused_object() {
            if !room.objects.contains(object_id) && self.edit.forget_object(object_id) {
                info!(object_id = object_id.0, "selection_dropped_missing_object");
            }
        }
        if let Some(definition_id) = self.edit.selected_inventory() {
            let owned = self.inventory.get(&definition_id).is_some_and(|count| *count > 0);
            if (!owned || !self.catalog.contains(definition_id)) && self.edit.clear_inventory() {
                info!(definition_id = definition_id.0, "inventory_selection_dropped");
            }
        }

        let stack_unit = self.config.stack_unit;
        let camera = self.camera.camera();
        let hovered_tile = self.pointer.map(|at| screen_to_grid(camera, at));
        let picker = Picker::new(camera, &room.objects, &room.characters, stack_unit);
        let hovered_object = self
            .pointer
            .and_then(|at| picker.furniture_at(at))
            .and_then(|id| room.objects.get(id));
        let validator = PlacementValidator::new(
            room.occupancy(stack_unit),
            self.config.stack_limits(),
        );

        let intent = match *self.edit.state() {
            EditState::Placing {
                definition_id,
                rotation,
            } => self
                .catalog
                .get(definition_id)
                .map(|definition| HighlightIntent::Place {
                    definition,
                    rotation,
                }),
            EditState::Dragging { object_id, .. } => {
                room.objects
                    .get(object_id)
                    .map(|object| HighlightIntent::Move {
                        definition: &object.definition,
                        rotation: object.rotation,
                        object_id,
                    })
            }
            EditState::Selected { object_id } => Some(HighlightIntent::Browse {
                layout_paint: self.layout_paint,
                selected: room.objects.get(object_id),
            }),
            EditState::Navigate => Some(HighlightIntent::Browse {
                layout_paint: self.layout_paint,
                selected: None,
            }),
        };

        let verdict = match intent {
            Some(intent) => {
                self.overlay
                    .recompute(intent, hovered_tile, hovered_object, &validator)
            }
            None => {
                self.overlay.clear();
                None
            }
        };
        self.edit.set_placement_valid(verdict.unwrap_or(false));
    }

    // Queries

    pub fn edit_snapshot(&self) -> EditSnapshot {
        self.edit.snapshot()
    }

    pub fn edit_state(&self) -> &EditState {
        self.edit.state()
    }

    pub fn placement_valid(&self) -> bool {
        self.edit.placement_valid()
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    pub fn highlight_at(&self, pos: GridPos) -> Option<HighlightColor> {
        self.overlay.color_at(pos)
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn hovered_tile(&self) -> Option<GridPos> {
        self.pointer
            .map(|at| screen_to_grid(self.camera.camera(), at))
    }

    pub fn picker(&self) -> Option<Picker<'_>> {
        let room = self.room.as_ref()?;
        Some(Picker::new(
            self.camera.camera(),
            &room.objects,
            &room.characters,
            self.config.stack_unit,
        ))
    }

    pub fn pick_at(&self, at: Point) -> Option<PickTarget> {
        self.picker()?.pick(at)
    }

    /// Full verdict for a candidate placement, for explaining disabled
    /// affordances.
    pub fn check_placement(
        &self,
        definition_id: DefinitionId,
        origin: GridPos,
        rotation: Rotation,
    ) -> Result<PlacementReport, SessionPlacementError> {
        let room = self.room.as_ref().ok_or(SessionPlacementError::NoRoom)?;
        let definition = self
            .catalog
            .get(definition_id)
            .ok_or(SessionPlacementError::UnknownDefinition(definition_id))?;
        Ok(self
            .validator(room)
            .check(definition, origin, rotation, None)?)
    }

    pub fn pending_requests(&self) -> &[TransportRequest] {
        &self.outbox
    }

    pub fn drain_requests(&mut self) -> Vec<TransportRequest> {
        std::mem::take(&mut self.outbox)
    }

    pub fn drain_events(&mut self) -> Vec<EditEvent> {
        self.edit.drain_events()
    }

    // Internals

    fn validator<'a>(&self, room: &'a Room) -> PlacementValidator<'a> {
        PlacementValidator::new(
            room.occupancy(self.config.stack_unit),
            self.config.stack_limits(),
        )
    }

    fn send(&mut self, request: TransportRequest) {
        debug!(request = ?request, "transport_request_queued");
        self.outbox.push(request);
    }

    fn try_start_drag(&mut self, pressed_object: Option<ObjectId>) -> bool {
        let Some(object_id) = self.edit.selected_object() else {
            return false;
        };
        if pressed_object != Some(object_id) {
            return false;
        }
        let Some(object) = self
            .room
            .as_ref()
            .and_then(|room| room.objects.get(object_id))
        else {
            return false;
        };
        let (origin, origin_z) = (object.position, object.z);
        match self.edit.start_drag(object_id, origin, origin_z) {
            Ok(()) => {
                debug!(object_id = object_id.0, x = origin.x, y = origin.y, "drag_started");
                true
            }
            Err(error) => {
                debug!(error = %error, "drag_not_started");
                false
            }
        }
    }

    /// Drop inside the room keeps the object selected and requests a move
    /// when the target differs and fits. Dropping outside abandons the drag.
    fn release_drag(&mut self, at: Point) {
        let tile = screen_to_grid(self.camera.camera(), at);
        let request = self.room.as_ref().and_then(|room| {
            if !room.layout.contains(tile) {
                return None;
            }
            let (origin, _) = self.edit.drag_origin()?;
            let object_id = self.edit.dragged_object()?;
            let object = room.objects.get(object_id)?;
            if tile == origin {
                return Some(None);
            }
            let verdict =
                self.validator(room)
                    .check(&object.definition, tile, object.rotation, Some(object_id));
            match verdict {
                Ok(_) => Some(Some(TransportRequest::Move {
                    target: MoveTarget::Furniture(object_id),
                    x: tile.x,
                    y: tile.y,
                })),
                Err(reason) => {
                    debug!(object_id = object_id.0, reason = %reason, "move_rejected_locally");
                    Some(None)
                }
            }
        });

        match request {
            Some(request) => {
                self.edit.end_drag(true);
                if let Some(request) = request {
                    self.send(request);
                }
            }
            None => {
                self.edit.end_drag(false);
                debug!(x = tile.x, y = tile.y, "drag_abandoned");
            }
        }
    }

    fn click(&mut self, at: Point) {
        let Some(room) = self.room.as_ref() else {
            return;
        };
        let camera = self.camera.camera();
        let tile = screen_to_grid(camera, at);
        let picker = Picker::new(camera, &room.objects, &room.characters, self.config.stack_unit);

        if let EditState::Placing {
            definition_id,
            rotation,
        } = *self.edit.state()
        {
            let Some(definition) = self.catalog.get(definition_id) else {
                return;
            };
            match self.validator(room).check(definition, tile, rotation, None) {
                Ok(report) => {
                    info!(
                        definition_id = definition_id.0,
                        x = tile.x,
                        y = tile.y,
                        rotation = rotation.turns(),
                        base_z = report.base_z,
                        "place_requested"
                    );
                    self.send(TransportRequest::Place {
                        definition_id,
                        x: tile.x,
                        y: tile.y,
                        rotation,
                    });
                }
                Err(reason) => {
                    debug!(x = tile.x, y = tile.y, reason = %reason, "place_rejected_locally")
                }
            }
            return;
        }

        match picker.pick(at) {
            Some(PickTarget::Furniture(object_id)) if self.edit.is_enabled() => {
                if let Err(error) = self.edit.select_object(object_id) {
                    debug!(error = %error, "object_selection_ignored");
                }
                return;
            }
            Some(PickTarget::Avatar(character_id)) | Some(PickTarget::Npc(character_id)) => {
                debug!(character_id = character_id.0, "character_clicked");
                return;
            }
            Some(PickTarget::Furniture(_)) | None => {}
        }

        let destination = picker
            .furniture_at(at)
            .and_then(|object_id| picker.tile_of(PickTarget::Furniture(object_id)))
            .unwrap_or(tile);
        let reachable = room.occupancy(self.config.stack_unit).is_reachable(destination);
        self.edit.deselect();
        if reachable {
            self.send(TransportRequest::Move {
                target: MoveTarget::Avatar,
                x: destination.x,
                y: destination.y,
            });
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionPlacementError {
    #[error("no room is loaded")]
    NoRoom,
    #[error("definition {0:?} is not in the catalog")]
    UnknownDefinition(DefinitionId),
    #[error(transparent)]
    Rejected(#[from] PlacementRejection),
}

fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}
