//! Text command protocol spoken over the WebSocket.
//!
//! Each inbound frame is `COMMAND` or `COMMAND:payload`; each reply is
//! `KIND_UPDATE:json`. Dispatch is synchronous and owns no I/O so it can be
//! driven directly from tests.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use venn_core::diagram::{CircleId, DrawCommand, Frame};
use venn_core::geometry::Point2;
use venn_core::naming;
use venn_core::selection::SelectionFilter;
use venn_core::{DiagramSession, EngineError};

/// Format an error as a JSON message for the frontend
pub fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!(
        "ERROR_UPDATE:{}",
        json!({
            "code": code,
            "message": message,
            "severity": severity
        })
    )
}

fn engine_error(err: &EngineError) -> String {
    format_error(err.code(), &err.to_string(), "error")
}

#[derive(Serialize)]
struct FrameUpdate<'a> {
    frame: &'a Frame,
    commands: Vec<DrawCommand>,
}

#[derive(Serialize)]
struct SelectionUpdate {
    targets: Vec<String>,
    selected_region: Option<String>,
}

#[derive(Deserialize)]
struct AddCircleCmd {
    x: f64,
    y: f64,
    radius: Option<f64>,
}

#[derive(Deserialize)]
struct MoveCircleCmd {
    id: CircleId,
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct ResizeCircleCmd {
    id: CircleId,
    radius: f64,
}

#[derive(Deserialize)]
struct PointCmd {
    x: f64,
    y: f64,
}

/// A target named either by label ("AB") or by circle ids.
#[derive(Deserialize)]
struct TargetCmd {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    ids: Option<Vec<CircleId>>,
    /// "replace" (default), "add", "remove" or "toggle"
    #[serde(default)]
    modifier: Option<String>,
}

impl TargetCmd {
    fn resolve(&self) -> Result<Vec<CircleId>, EngineError> {
        match (&self.ids, &self.label) {
            (Some(ids), _) => Ok(ids.clone()),
            (None, Some(label)) => naming::parse_label(label),
            (None, None) => Err(EngineError::UnknownLabel(String::new())),
        }
    }
}

/// Accepts either a numeric id or a circle letter.
fn parse_circle_ref(text: &str) -> Option<CircleId> {
    let text = text.trim();
    text.parse::<u32>()
        .ok()
        .map(CircleId)
        .or_else(|| naming::name_to_id(text))
}

fn frame_update(session: &mut DiagramSession) -> Vec<String> {
    match session.recompute() {
        Ok(frame) => {
            let update = FrameUpdate {
                commands: frame.draw_commands(),
                frame: &frame,
            };
            let json = serde_json::to_string(&update).unwrap_or("{}".into());
            vec![format!("FRAME_UPDATE:{}", json)]
        }
        Err(e) => {
            warn!("Recompute failed: {}", e);
            vec![engine_error(&e)]
        }
    }
}

fn pieces_update(session: &mut DiagramSession) -> Vec<String> {
    match session.pieces() {
        Ok(pieces) => {
            let json = serde_json::to_string(&pieces).unwrap_or("[]".into());
            vec![format!("PIECES_UPDATE:{}", json)]
        }
        Err(e) => vec![engine_error(&e)],
    }
}

fn selection_update(session: &DiagramSession) -> String {
    let selection = session.selection();
    let update = SelectionUpdate {
        targets: selection.targets().map(|k| k.label()).collect(),
        selected_region: selection.selected_region().map(|k| k.label()),
    };
    let json = serde_json::to_string(&update).unwrap_or("{}".into());
    format!("SELECTION_UPDATE:{}", json)
}

fn groups_update(session: &DiagramSession) -> String {
    let groups = session.selection().list_groups();
    let json = serde_json::to_string(&groups).unwrap_or("[]".into());
    format!("SELECTION_GROUPS_UPDATE:{}", json)
}

/// Geometry changed: send a fresh frame and the piece list.
fn geometry_changed(session: &mut DiagramSession) -> Vec<String> {
    let mut replies = frame_update(session);
    replies.extend(pieces_update(session));
    replies
}

/// Selection changed: send the selection and a fresh frame.
fn selection_changed(session: &mut DiagramSession) -> Vec<String> {
    let mut replies = vec![selection_update(session)];
    replies.extend(frame_update(session));
    replies
}

fn parse_json<T: DeserializeOwned>(command: &str, payload: &str) -> Result<T, String> {
    serde_json::from_str(payload).map_err(|e| {
        warn!("Failed to parse {} payload: {}", command, payload);
        format_error("BAD_PAYLOAD", &format!("{}: {}", command, e), "warning")
    })
}

/// Applies one inbound command to the session and returns the replies to send.
pub fn handle_command(session: &mut DiagramSession, text: &str) -> Vec<String> {
    let (command, payload) = match text.split_once(':') {
        Some((command, payload)) => (command, payload),
        None => (text, ""),
    };

    match command {
        "REFRESH" => geometry_changed(session),

        "ADD_CIRCLE" => match parse_json::<AddCircleCmd>(command, payload) {
            Ok(cmd) => match session.add_circle(cmd.x, cmd.y, cmd.radius) {
                Ok(id) => {
                    info!("Added circle {} ({})", id, naming::id_to_name(id));
                    geometry_changed(session)
                }
                Err(e) => vec![engine_error(&e)],
            },
            Err(reply) => vec![reply],
        },

        "MOVE_CIRCLE" => match parse_json::<MoveCircleCmd>(command, payload) {
            Ok(cmd) => match session.move_circle(cmd.id, cmd.x, cmd.y) {
                Ok(()) => geometry_changed(session),
                Err(e) => vec![engine_error(&e)],
            },
            Err(reply) => vec![reply],
        },

        "RESIZE_CIRCLE" => match parse_json::<ResizeCircleCmd>(command, payload) {
            Ok(cmd) => match session.resize_circle(cmd.id, cmd.radius) {
                Ok(()) => geometry_changed(session),
                Err(e) => vec![engine_error(&e)],
            },
            Err(reply) => vec![reply],
        },

        "DELETE_CIRCLE" => match parse_circle_ref(payload) {
            Some(id) => match session.remove_circle(id) {
                Ok((_, report)) => {
                    info!("Deleted circle {}", id);
                    let mut replies = geometry_changed(session);
                    if !report.lost.is_empty() {
                        info!("Removed {} stale items from selection", report.lost.len());
                        replies.push(selection_update(session));
                    }
                    replies
                }
                Err(e) => vec![engine_error(&e)],
            },
            None => {
                warn!("Invalid circle reference for DELETE_CIRCLE: {}", payload);
                vec![format_error("BAD_PAYLOAD", "DELETE_CIRCLE needs an id or letter", "warning")]
            }
        },

        "TOGGLE_CIRCLE" => match parse_circle_ref(payload) {
            Some(id) => match session.toggle_circle(id) {
                Ok(selected) => {
                    info!("Circle {} outline selected: {}", id, selected);
                    frame_update(session)
                }
                Err(e) => vec![engine_error(&e)],
            },
            None => vec![format_error("BAD_PAYLOAD", "TOGGLE_CIRCLE needs an id or letter", "warning")],
        },

        "DRAG_START" => match parse_json::<PointCmd>(command, payload) {
            Ok(cmd) => match session.begin_drag(Point2::new(cmd.x, cmd.y)) {
                Some(id) => {
                    info!("Dragging circle {}", id);
                    Vec::new()
                }
                None => Vec::new(),
            },
            Err(reply) => vec![reply],
        },

        "DRAG_MOVE" => match parse_json::<PointCmd>(command, payload) {
            Ok(cmd) => match session.drag_to(Point2::new(cmd.x, cmd.y)) {
                Ok(true) => frame_update(session),
                Ok(false) => Vec::new(),
                Err(e) => vec![engine_error(&e)],
            },
            Err(reply) => vec![reply],
        },

        "DRAG_END" => match session.end_drag() {
            Some(_) => geometry_changed(session),
            None => Vec::new(),
        },

        "SELECT" => match parse_json::<TargetCmd>(command, payload) {
            Ok(cmd) => {
                let modifier = cmd.modifier.as_deref().unwrap_or("replace");
                let applied = cmd.resolve().and_then(|ids| match modifier {
                    "add" => session.choose(&ids, true).map(|_| ()),
                    "remove" => {
                        session.unchoose(&ids);
                        Ok(())
                    }
                    "toggle" => session.toggle(&ids).map(|_| ()),
                    _ => session.choose(&ids, false).map(|_| ()),
                });
                match applied {
                    Ok(()) => {
                        info!("Selection updated (mod: {}): {}", modifier, payload);
                        selection_changed(session)
                    }
                    Err(e) => vec![engine_error(&e)],
                }
            }
            Err(reply) => vec![reply],
        },

        "SELECT_REGION" if payload == "CLEAR" => match session.select_region(None) {
            Ok(()) => selection_changed(session),
            Err(e) => vec![engine_error(&e)],
        },

        "SELECT_REGION" => match parse_json::<TargetCmd>(command, payload) {
            Ok(cmd) => match cmd
                .resolve()
                .and_then(|ids| session.select_region(Some(ids.as_slice())))
            {
                Ok(()) => selection_changed(session),
                Err(e) => vec![engine_error(&e)],
            },
            Err(reply) => vec![reply],
        },

        "CLEAR_SELECTION" => {
            session.clear_selection();
            info!("Cleared all selections");
            selection_changed(session)
        }

        "SELECTION_GROUP_CREATE" => {
            if payload.is_empty() {
                warn!("Empty group name provided");
                vec![format_error("BAD_PAYLOAD", "Group name is empty", "warning")]
            } else {
                session.selection_mut().create_group(payload);
                info!("Created selection group '{}'", payload);
                vec![groups_update(session)]
            }
        }

        "SELECTION_GROUP_RESTORE" => match session.restore_group(payload) {
            Some(report) => {
                info!(
                    "Restored selection group '{}' ({} kept, {} lost)",
                    payload,
                    report.kept.len(),
                    report.lost.len()
                );
                selection_changed(session)
            }
            None => {
                warn!("Selection group '{}' not found", payload);
                vec![format_error("UNKNOWN_GROUP", payload, "warning")]
            }
        },

        "SELECTION_GROUP_DELETE" => {
            if session.selection_mut().delete_group(payload) {
                info!("Deleted selection group '{}'", payload);
                vec![groups_update(session)]
            } else {
                warn!("Selection group '{}' not found for deletion", payload);
                vec![format_error("UNKNOWN_GROUP", payload, "warning")]
            }
        }

        "SELECTION_GROUPS_LIST" => vec![groups_update(session)],

        "SET_FILTER" => {
            let filter = match payload {
                "Circle" => SelectionFilter::Circle,
                "Region" => SelectionFilter::Region,
                _ => SelectionFilter::Any,
            };
            session.selection_mut().set_filter(filter);
            info!("Selection Filter set to {:?}", filter);
            Vec::new()
        }

        _ => {
            warn!("Unknown command: {}", text);
            vec![format_error("UNKNOWN_COMMAND", command, "warning")]
        }
    }
}
