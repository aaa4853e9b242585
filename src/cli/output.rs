use serde::Serialize;

use crate::model::{EngineEvent, EngineState, PlaybackPhase};
use crate::ops::resolve;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct InitJson {
    pub path: String,
    pub overwritten: bool,
}

#[derive(Serialize)]
pub struct EnhanceJson {
    pub prompt: String,
    pub enhanced_prompt: String,
}

/// One line of `director play --json`
#[derive(Serialize)]
pub struct SnapshotJson {
    pub frame: u32,
    pub paused: bool,
    pub phase: PlaybackPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Frame of the schedule entry in effect, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_frame: Option<u32>,
    pub scheduled: usize,
}

#[derive(Serialize)]
pub struct EventJson {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

pub fn snapshot_to_json(state: &EngineState, phase: PlaybackPhase) -> SnapshotJson {
    let active = resolve::resolve_active(&state.scheduled_prompts, state.current_frame);
    SnapshotJson {
        frame: state.current_frame,
        paused: state.paused,
        phase,
        prompt: state
            .current_prompt
            .clone()
            .or_else(|| active.as_ref().map(|p| p.text.clone())),
        active_frame: active.map(|p| p.frame),
        scheduled: state.scheduled_prompts.len(),
    }
}

pub fn event_to_json(event: &EngineEvent) -> EventJson {
    EventJson {
        event: event.event.clone(),
        message: event.message.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `frame 42  paused=false  prompt="temple at dawn"`
pub fn format_snapshot(snap: &SnapshotJson) -> String {
    let mut line = format!("frame {}  paused={}", snap.frame, snap.paused);
    match &snap.prompt {
        Some(p) => line.push_str(&format!("  prompt={:?}", p)),
        None => line.push_str("  prompt=-"),
    }
    line
}

pub fn format_event(event: &EventJson) -> String {
    match &event.message {
        Some(msg) => format!("event {}: {}", event.event, msg),
        None => format!("event {}", event.event),
    }
}
