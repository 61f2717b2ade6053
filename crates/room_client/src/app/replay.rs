use std::process::ExitCode;

use room_engine::{
    grid_to_screen, EditEvent, EditSnapshot, GridPos, HighlightColor, LayoutError, Point,
    PointerButton, RoomSession, TransportRequest,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::bootstrap::AppWiring;
use super::script::{load_script, ReplayScript, ReplayStep};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct HighlightEntry {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) color: HighlightColor,
}

/// Everything the session emitted while replaying, in emission order.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReplaySummary {
    pub(crate) steps: usize,
    pub(crate) requests: Vec<TransportRequest>,
    pub(crate) events: Vec<EditEvent>,
    pub(crate) final_state: EditSnapshot,
    pub(crate) highlights: Vec<HighlightEntry>,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let script = match load_script(&app.script_path) {
        Ok(script) => script,
        Err(err) => {
            error!(error = %err, "replay_script_failed");
            return ExitCode::FAILURE;
        }
    };

    let mut session = RoomSession::new(app.config);
    let summary = match replay(&mut session, script) {
        Ok(summary) => summary,
        Err(err) => {
            error!(error = %err, "replay_snapshot_rejected");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(error = %err, "replay_summary_encode_failed");
            return ExitCode::FAILURE;
        }
    }
    info!(
        steps = summary.steps,
        requests = summary.requests.len(),
        events = summary.events.len(),
        "replay_finished"
    );
    ExitCode::SUCCESS
}

/// Feeds a script through the session. Only the opening snapshot can fail
/// the replay; step errors are logged and skipped.
pub(crate) fn replay(
    session: &mut RoomSession,
    script: ReplayScript,
) -> Result<ReplaySummary, LayoutError> {
    if let Some(viewport) = script.viewport {
        session.set_viewport(viewport.width, viewport.height);
    }
    session.register_definitions(script.definitions);
    session.set_inventory(
        script
            .inventory
            .iter()
            .map(|entry| (entry.definition_id, entry.count)),
    );
    session.load_snapshot(script.snapshot)?;

    let mut requests = session.drain_requests();
    let mut events = session.drain_events();
    let steps = script.steps.len();
    for (index, step) in script.steps.into_iter().enumerate() {
        apply_step(session, index, step);
        for request in session.drain_requests() {
            info!(step = index, request = ?request, "request_emitted");
            requests.push(request);
        }
        for event in session.drain_events() {
            debug!(step = index, event = ?event, "edit_event");
            events.push(event);
        }
    }

    let mut highlights: Vec<HighlightEntry> = session
        .overlay()
        .iter()
        .map(|(pos, color)| HighlightEntry {
            x: pos.x,
            y: pos.y,
            color,
        })
        .collect();
    highlights.sort_by_key(|entry| (entry.y, entry.x));

    Ok(ReplaySummary {
        steps,
        requests,
        events,
        final_state: session.edit_snapshot(),
        highlights,
    })
}

fn apply_step(session: &mut RoomSession, index: usize, step: ReplayStep) {
    match step {
        ReplayStep::EditMode { enabled } => session.set_edit_mode(enabled),
        ReplayStep::LayoutPaint { enabled } => session.set_layout_paint(enabled),
        ReplayStep::Inventory {
            definition_id,
            count,
        } => session.set_inventory_count(definition_id, count),
        ReplayStep::SelectInventory { definition_id } => {
            if let Err(err) = session.select_inventory(definition_id) {
                warn!(step = index, error = %err, "select_inventory_failed");
            }
        }
        ReplayStep::Deselect => {
            session.deselect();
        }
        ReplayStep::PointerMove { x, y } => session.pointer_move(Point::new(x, y)),
        ReplayStep::PointerDown { x, y, button } => session.pointer_down(button, Point::new(x, y)),
        ReplayStep::PointerUp { x, y, button } => session.pointer_up(button, Point::new(x, y)),
        ReplayStep::ClickTile { x, y } => {
            let at = tile_center(session, x, y);
            session.pointer_move(at);
            session.pointer_down(PointerButton::Primary, at);
            session.pointer_up(PointerButton::Primary, at);
        }
        ReplayStep::DragTile { from, to } => {
            let start = tile_center(session, from[0], from[1]);
            session.pointer_move(start);
            session.pointer_down(PointerButton::Primary, start);
            let end = tile_center(session, to[0], to[1]);
            session.pointer_move(end);
            session.pointer_up(PointerButton::Primary, end);
        }
        ReplayStep::HoverTile { x, y } => {
            let at = tile_center(session, x, y);
            session.pointer_move(at);
        }
        ReplayStep::Wheel { steps, x, y } => session.wheel(steps, Point::new(x, y)),
        ReplayStep::Key { key, down } => {
            if session.key(&key, down).is_none() && down {
                debug!(step = index, key = %key, "key_ignored");
            }
        }
        ReplayStep::Rotate => match session.rotate() {
            Ok(true) => {}
            Ok(false) => debug!(step = index, "rotate_blocked"),
            Err(err) => warn!(step = index, error = %err, "rotate_failed"),
        },
        ReplayStep::Pickup => {
            if let Err(err) = session.pickup() {
                warn!(step = index, error = %err, "pickup_failed");
            }
        }
        ReplayStep::Recolor { color } => {
            if let Err(err) = session.recolor(&color) {
                warn!(step = index, error = %err, "recolor_failed");
            }
        }
        ReplayStep::Event { event } => session.apply_event(event),
        ReplayStep::Snapshot { snapshot } => {
            if let Err(err) = session.load_snapshot(snapshot) {
                warn!(step = index, error = %err, "snapshot_step_rejected");
            }
        }
        ReplayStep::Tick { dt } => session.update(dt),
        ReplayStep::Leave => session.leave_room(),
        ReplayStep::Disconnect => session.disconnect(),
    }
}

fn tile_center(session: &RoomSession, x: i32, y: i32) -> Point {
    grid_to_screen(session.camera(), GridPos::new(x, y))
}
