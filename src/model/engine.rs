use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::schedule::Schedule;

/// The engine's view of the world, mirrored locally.
///
/// Whenever a snapshot arrives it replaces this wholesale; between snapshots
/// it also carries optimistic local edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub current_frame: u32,
    pub current_prompt: Option<String>,
    pub paused: bool,
    pub scheduled_prompts: Schedule,
}

impl Default for EngineState {
    fn default() -> Self {
        EngineState {
            current_frame: 0,
            current_prompt: None,
            paused: true,
            scheduled_prompts: Schedule::new(),
        }
    }
}

/// Body of a `state` message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub current_frame: u32,
    #[serde(default)]
    pub current_prompt: Option<String>,
    #[serde(default)]
    pub paused: bool,
    /// Frame keys arrive as decimal strings in JSON objects
    #[serde(default)]
    pub scheduled_prompts: BTreeMap<u32, String>,
}

/// Body of an `event` message. Purely informational apart from the few
/// event names in [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_prompt: Option<String>,
}

/// Event names the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    GenerationStarted,
    GenerationReset,
    Error,
    Other,
}

impl EngineEvent {
    pub fn kind(&self) -> EventKind {
        match self.event.as_str() {
            "generation_started" => EventKind::GenerationStarted,
            "generation_reset" => EventKind::GenerationReset,
            "error" => EventKind::Error,
            _ => EventKind::Other,
        }
    }

    /// One-line human summary for logs and the status row
    pub fn summary(&self) -> String {
        let mut out = self.event.replace('_', " ");
        if let Some(frame) = self.frame {
            out.push_str(&format!(" @{}", frame));
        }
        if let Some(msg) = &self.message {
            out.push_str(": ");
            out.push_str(msg);
        } else if let Some(prompt) = &self.new_prompt {
            out.push_str(": ");
            out.push_str(prompt);
        }
        out
    }
}

/// Inbound message from the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum EngineMessage {
    State(StateSnapshot),
    Event(EngineEvent),
}

/// Outbound command to the engine. Fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    SchedulePrompt { new_prompt: String, timestamp: u32 },
}

#[derive(Serialize)]
struct WireCommand<'a> {
    command: &'a str,
    data: serde_json::Value,
}

impl Command {
    /// Protocol name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
            Command::SchedulePrompt { .. } => "schedule_prompt",
        }
    }

    pub fn payload(&self) -> serde_json::Value {
        match self {
            Command::SchedulePrompt {
                new_prompt,
                timestamp,
            } => serde_json::json!({
                "new_prompt": new_prompt,
                "timestamp": timestamp,
            }),
            _ => serde_json::json!({}),
        }
    }

    /// Encode as a `{"command": ..., "data": ...}` text frame
    pub fn to_json(&self) -> String {
        let wire = WireCommand {
            command: self.name(),
            data: self.payload(),
        };
        // A map of strings and integers always serializes.
        serde_json::to_string(&wire).unwrap_or_default()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Transport connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    /// Handshake done, engine not yet assigned
    Waiting,
    Ready,
}

impl ConnectionStatus {
    pub fn is_ready(self) -> bool {
        self == ConnectionStatus::Ready
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Waiting => write!(f, "waiting"),
            ConnectionStatus::Ready => write!(f, "ready"),
        }
    }
}
