//! Decoder for robot-state feed frames
//!
//! Frames are JSON objects `{"type": ..., "payload": {...}}`. Only
//! `STATE_UPDATE` moves the arm; move and program events are surfaced as
//! activity. Anything else, including invalid JSON, decodes to `None`.

use super::pose::{Joint, PoseUpdate};
use serde_json::Value;
use tracing::trace;

/// Default step duration the backend applies when a move omits it
pub const DEFAULT_MOVE_DURATION_MS: u64 = 1000;

/// Queue a move came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveMode {
    Sequential,
    Parallel,
}

/// One queued movement as echoed by the backend
#[derive(Clone, Debug, PartialEq)]
pub struct Movement {
    pub mode: MoveMode,
    /// Joints this movement drives and their goal angles
    pub target: PoseUpdate,
    pub duration_ms: u64,
}

/// Decoded feed event
#[derive(Clone, Debug, PartialEq)]
pub enum FeedEvent {
    StateUpdate(PoseUpdate),
    MoveStarted(Movement),
    MoveFinished(Movement),
    ProgramCompleted {
        program_id: Option<String>,
        name: Option<String>,
    },
}

impl FeedEvent {
    pub fn pose_update(&self) -> Option<&PoseUpdate> {
        match self {
            FeedEvent::StateUpdate(update) => Some(update),
            _ => None,
        }
    }

    /// One-line human summary for activity displays
    pub fn describe(&self) -> String {
        match self {
            FeedEvent::StateUpdate(update) => format!("state {}", describe_update(update)),
            FeedEvent::MoveStarted(m) => format!("{:?} move started: {}", m.mode, describe_update(&m.target)),
            FeedEvent::MoveFinished(m) => format!("{:?} move finished: {}", m.mode, describe_update(&m.target)),
            FeedEvent::ProgramCompleted { name, program_id } => format!(
                "program completed: {}",
                name.as_deref().or(program_id.as_deref()).unwrap_or("?")
            ),
        }
    }
}

fn describe_update(update: &PoseUpdate) -> String {
    let parts: Vec<String> = Joint::ALL
        .into_iter()
        .filter_map(|j| update.get(j).map(|v| format!("{}={:.0}", j.label(), v)))
        .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

/// Decode one frame. Never fails loudly: unrecognized frames are traced and dropped.
pub fn parse_frame(msg: &str) -> Option<FeedEvent> {
    let event = decode(msg);
    if event.is_none() {
        trace!(len = msg.len(), "Frame ignored");
    }
    event
}

fn decode(msg: &str) -> Option<FeedEvent> {
    let json: Value = serde_json::from_str(msg).ok()?;
    let payload = json.get("payload").filter(|p| p.is_object())?;

    match json.get("type")?.as_str()? {
        "STATE_UPDATE" => Some(FeedEvent::StateUpdate(pose_fields(payload))),
        "MOVE_SEQ_START" => sequential_move(payload).map(FeedEvent::MoveStarted),
        "MOVE_SEQ_END" => sequential_move(payload).map(FeedEvent::MoveFinished),
        "MOVE_PAR_START" => Some(FeedEvent::MoveStarted(parallel_move(payload))),
        "MOVE_PAR_END" => Some(FeedEvent::MoveFinished(parallel_move(payload))),
        "PROGRAM_COMPLETED" => Some(FeedEvent::ProgramCompleted {
            program_id: string_field(payload, "program_id"),
            name: string_field(payload, "name"),
        }),
        _ => None,
    }
}

// Non-numeric joint values are skipped, same as absent ones
fn pose_fields(payload: &Value) -> PoseUpdate {
    let mut update = PoseUpdate::default();
    for joint in Joint::ALL {
        if let Some(v) = payload.get(joint.wire_name()).and_then(Value::as_f64) {
            update.set(joint, v);
        }
    }
    update
}

fn sequential_move(payload: &Value) -> Option<Movement> {
    let joint = Joint::from_wire_name(payload.get("joint")?.as_str()?)?;
    let angle = payload.get("angle")?.as_f64()?;
    let mut target = PoseUpdate::default();
    target.set(joint, angle);
    Some(Movement {
        mode: MoveMode::Sequential,
        target,
        duration_ms: duration_field(payload),
    })
}

fn parallel_move(payload: &Value) -> Movement {
    Movement {
        mode: MoveMode::Parallel,
        target: pose_fields(payload),
        duration_ms: duration_field(payload),
    }
}

fn duration_field(payload: &Value) -> u64 {
    payload
        .get("duration_ms")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_MOVE_DURATION_MS)
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_state_update() {
        let msg = r#"{"type":"STATE_UPDATE","payload":{"base":90,"hombro":0,"codo":180}}"#;
        let event = parse_frame(msg).unwrap();
        assert_eq!(
            event,
            FeedEvent::StateUpdate(PoseUpdate {
                base: Some(90.0),
                shoulder: Some(0.0),
                elbow: Some(180.0),
            })
        );
    }

    #[test]
    fn test_parse_partial_state_update() {
        let event = parse_frame(r#"{"type":"STATE_UPDATE","payload":{"base":45}}"#).unwrap();
        let update = event.pose_update().unwrap();
        assert_eq!(update.base, Some(45.0));
        assert_eq!(update.shoulder, None);
        assert_eq!(update.elbow, None);
    }

    #[test]
    fn test_non_numeric_fields_skipped() {
        let event =
            parse_frame(r#"{"type":"STATE_UPDATE","payload":{"base":"x","codo":12.5}}"#).unwrap();
        let update = event.pose_update().unwrap();
        assert_eq!(update.base, None);
        assert_eq!(update.elbow, Some(12.5));
    }

    #[test]
    fn test_ignore_malformed_and_foreign_frames() {
        assert!(parse_frame("Message received: hola").is_none());
        assert!(parse_frame(r#"{"type":"STATE_UPDATE""#).is_none());
        assert!(parse_frame(r#"{"type":"STATE_UPDATE"}"#).is_none());
        assert!(parse_frame(r#"{"type":"STATE_UPDATE","payload":5}"#).is_none());
        assert!(parse_frame(r#"{"type":"HELLO","payload":{"base":1}}"#).is_none());
        assert!(parse_frame(r#"[1,2,3]"#).is_none());
    }

    #[test]
    fn test_parse_sequential_move() {
        let msg = r#"{"type":"MOVE_SEQ_START","payload":{"joint":"hombro","angle":120,"duration_ms":500}}"#;
        let FeedEvent::MoveStarted(movement) = parse_frame(msg).unwrap() else {
            panic!("expected move start");
        };
        assert_eq!(movement.mode, MoveMode::Sequential);
        assert_eq!(movement.target.shoulder, Some(120.0));
        assert_eq!(movement.duration_ms, 500);
    }

    #[test]
    fn test_sequential_move_with_unknown_joint_ignored() {
        let msg = r#"{"type":"MOVE_SEQ_END","payload":{"joint":"wrist","angle":10}}"#;
        assert!(parse_frame(msg).is_none());
    }

    #[test]
    fn test_parse_parallel_move_defaults_duration() {
        let msg = r#"{"type":"MOVE_PAR_END","payload":{"base":10,"codo":20}}"#;
        let FeedEvent::MoveFinished(movement) = parse_frame(msg).unwrap() else {
            panic!("expected move end");
        };
        assert_eq!(movement.mode, MoveMode::Parallel);
        assert_eq!(movement.duration_ms, DEFAULT_MOVE_DURATION_MS);
        assert_eq!(movement.target.base, Some(10.0));
        assert_eq!(movement.target.shoulder, None);
    }

    #[test]
    fn test_parse_program_completed() {
        let msg = r#"{"type":"PROGRAM_COMPLETED","payload":{"program_id":"seq_1_demo","name":"demo","type":"sequential"}}"#;
        let event = parse_frame(msg).unwrap();
        assert!(event.pose_update().is_none());
        assert_eq!(event.describe(), "program completed: demo");
    }
}
