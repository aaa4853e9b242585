//! The single owner of timeline and playback state.
//!
//! Every mutation goes through here: either an optimistic local write
//! immediately followed by a command to the engine, or a wholesale
//! replacement when the engine pushes a snapshot. Nothing is ever merged.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use log::{debug, error, info, warn};

use crate::io::link::{CommandSink, TransportError};
use crate::model::{
    Command, ConnectionStatus, EngineEvent, EngineMessage, EngineState, EventKind,
    PlaybackPhase, Schedule, ScheduleError, ScheduledPrompt, StateSnapshot, TimelineConfig,
};
use crate::ops::hit_test::{self, HitTarget};
use crate::ops::playback::{self, PlaybackMachine, Refusal, Transport, TransportControls};
use crate::ops::resolve;

/// How many engine events are kept for display
pub const EVENT_HISTORY: usize = 50;

/// Error type for director handlers
#[derive(Debug, thiserror::Error)]
pub enum DirectorError {
    #[error("cannot {command} while disconnected")]
    NotConnected { command: &'static str },
    #[error("cannot {command} while {phase}")]
    NotAllowed {
        command: &'static str,
        phase: PlaybackPhase,
    },
    #[error("cannot start: add a prompt at frame 0 first")]
    NoOpeningPrompt,
    #[error("frame {frame} is outside the timeline (0..{max_frames})")]
    FrameOutOfRange { frame: u32, max_frames: u32 },
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error("{command} failed: {source}")]
    Transport {
        command: &'static str,
        #[source]
        source: TransportError,
    },
}

/// A connection status change, reported once per actual change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionTransition {
    pub from: ConnectionStatus,
    pub to: ConnectionStatus,
}

impl ConnectionTransition {
    /// Was connected (or on the way), now isn't
    pub fn is_disconnect(&self) -> bool {
        self.from != ConnectionStatus::Disconnected && self.to == ConnectionStatus::Disconnected
    }
}

/// What an inbound message did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Snapshot,
    Event(EventKind),
}

/// An engine event with its arrival time
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub at: DateTime<Local>,
    pub event: EngineEvent,
}

pub struct Director<S> {
    sink: S,
    timeline: TimelineConfig,
    state: EngineState,
    playback: PlaybackMachine,
    connection: ConnectionStatus,
    events: VecDeque<EventRecord>,
    last_engine_error: Option<String>,
    dirty: bool,
}

impl<S: CommandSink> Director<S> {
    pub fn new(sink: S, timeline: TimelineConfig) -> Self {
        Director {
            sink,
            timeline,
            state: EngineState::default(),
            playback: PlaybackMachine::default(),
            connection: ConnectionStatus::Disconnected,
            events: VecDeque::new(),
            last_engine_error: None,
            dirty: true,
        }
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.state.scheduled_prompts
    }

    pub fn current_frame(&self) -> u32 {
        self.state.current_frame
    }

    /// The prompt the engine says it is generating
    pub fn current_prompt(&self) -> Option<&str> {
        self.state.current_prompt.as_deref()
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.playback.phase()
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_ready()
    }

    pub fn can_start(&self) -> bool {
        playback::can_start(self.schedule())
    }

    /// The scheduled prompt in effect at the current frame
    pub fn active_prompt(&self) -> Option<ScheduledPrompt> {
        resolve::resolve_active(self.schedule(), self.state.current_frame)
    }

    pub fn transport(&self) -> TransportControls {
        playback::transport_controls(&self.playback, self.schedule(), self.is_connected())
    }

    /// Edit-vs-create decision for an interaction at `frame`
    pub fn classify(&self, frame: u32) -> HitTarget {
        hit_test::classify(frame, self.schedule(), self.timeline.tolerance)
    }

    /// Most recent engine events, oldest first
    pub fn recent_events(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    pub fn last_engine_error(&self) -> Option<&str> {
        self.last_engine_error.as_deref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Read and lower the redraw flag
    pub fn take_dirty(&mut self) -> bool {
        let schedule_dirty = self.state.scheduled_prompts.take_dirty();
        std::mem::take(&mut self.dirty) | schedule_dirty
    }

    // -----------------------------------------------------------------------
    // Transport handlers
    // -----------------------------------------------------------------------

    pub fn start(&mut self) -> Result<(), DirectorError> {
        self.guard(Transport::Start)?;
        self.playback.on_start_sent();
        self.dirty = true;
        self.send(Command::Start)
    }

    pub fn pause(&mut self) -> Result<(), DirectorError> {
        self.guard(Transport::Pause)?;
        self.send(Command::Pause)
    }

    pub fn resume(&mut self) -> Result<(), DirectorError> {
        self.guard(Transport::Resume)?;
        self.send(Command::Resume)
    }

    /// Ask the engine for a fresh session and drop all local state now,
    /// without waiting for the engine to confirm.
    pub fn reset(&mut self) -> Result<(), DirectorError> {
        self.guard(Transport::Reset)?;
        self.clear_local();
        self.send(Command::Reset)
    }

    /// Play/pause button: start, pause or resume depending on phase.
    pub fn toggle_play(&mut self) -> Result<(), DirectorError> {
        match self.transport().action {
            Transport::Start => self.start(),
            Transport::Pause => self.pause(),
            Transport::Resume => self.resume(),
            Transport::Reset => self.reset(),
        }
    }

    // -----------------------------------------------------------------------
    // Schedule handlers
    // -----------------------------------------------------------------------

    /// Put `text` at `frame` locally and tell the engine. Used for both new
    /// and edited prompts; the engine overwrites whatever is at that frame.
    ///
    /// A send failure keeps the local entry. The next snapshot decides.
    pub fn schedule_prompt(&mut self, frame: u32, text: &str) -> Result<(), DirectorError> {
        if !self.is_connected() {
            return Err(DirectorError::NotConnected {
                command: "schedule_prompt",
            });
        }
        if frame >= self.timeline.max_frames {
            return Err(DirectorError::FrameOutOfRange {
                frame,
                max_frames: self.timeline.max_frames,
            });
        }
        let text = text.trim();
        self.state.scheduled_prompts.upsert(frame, text)?;
        self.send(Command::SchedulePrompt {
            new_prompt: text.to_string(),
            timestamp: frame,
        })
    }

    /// Drop the prompt at `frame` from the local schedule only.
    ///
    /// The engine has no delete command: it still holds this prompt, and the
    /// next snapshot will bring it back. Only a reset makes it go away.
    pub fn delete_prompt(&mut self, frame: u32) -> Option<String> {
        let removed = self.state.scheduled_prompts.remove(frame);
        if removed.is_some() {
            warn!(
                "prompt at frame {} deleted locally; the engine keeps it until reset",
                frame
            );
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Apply one inbound message. Call in arrival order.
    pub fn apply_message(&mut self, message: EngineMessage) -> Applied {
        match message {
            EngineMessage::State(snapshot) => {
                self.apply_snapshot(snapshot);
                Applied::Snapshot
            }
            EngineMessage::Event(event) => Applied::Event(self.apply_event(event)),
        }
    }

    /// Replace frame, prompt, pause flag and the whole schedule with the
    /// engine's values. Local edits the engine hasn't echoed are lost.
    pub fn apply_snapshot(&mut self, snapshot: StateSnapshot) {
        debug!(
            "snapshot: frame={} paused={} prompts={}",
            snapshot.current_frame,
            snapshot.paused,
            snapshot.scheduled_prompts.len()
        );
        self.state.current_frame = snapshot.current_frame;
        self.state.current_prompt = snapshot.current_prompt;
        self.state.paused = snapshot.paused;
        self.state
            .scheduled_prompts
            .replace_all(snapshot.scheduled_prompts);
        self.playback
            .on_snapshot(snapshot.current_frame, snapshot.paused);
        self.dirty = true;
    }

    fn apply_event(&mut self, event: EngineEvent) -> EventKind {
        let kind = event.kind();
        match kind {
            EventKind::GenerationStarted => {
                info!("engine: generation started");
                self.playback.on_generation_started();
            }
            EventKind::GenerationReset => {
                info!("engine: generation reset");
                self.clear_local();
            }
            EventKind::Error => {
                let message = event
                    .message
                    .clone()
                    .unwrap_or_else(|| "engine error".to_string());
                error!("engine error: {}", message);
                self.last_engine_error = Some(message);
            }
            EventKind::Other => {
                info!("engine event: {}", event.summary());
            }
        }
        if self.events.len() == EVENT_HISTORY {
            self.events.pop_front();
        }
        self.events.push_back(EventRecord {
            at: Local::now(),
            event,
        });
        self.dirty = true;
        kind
    }

    /// Record a connection status change. Returns the transition only when
    /// the status actually changed; losing the connection clears all local
    /// state exactly once.
    pub fn set_connection(&mut self, status: ConnectionStatus) -> Option<ConnectionTransition> {
        if status == self.connection {
            return None;
        }
        let transition = ConnectionTransition {
            from: self.connection,
            to: status,
        };
        self.connection = status;
        info!("connection: {} -> {}", transition.from, transition.to);
        if transition.is_disconnect() {
            self.clear_local();
        }
        self.dirty = true;
        Some(transition)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn clear_local(&mut self) {
        self.state = EngineState::default();
        self.playback.clear();
        self.events.clear();
        self.last_engine_error = None;
        self.dirty = true;
    }

    fn guard(&self, request: Transport) -> Result<(), DirectorError> {
        let verdict = self
            .playback
            .check(request, self.schedule(), self.is_connected());
        verdict.map_err(|refusal| {
            warn!("refused {}: {:?}", request.name(), refusal);
            match refusal {
                Refusal::NotConnected => DirectorError::NotConnected {
                    command: request.name(),
                },
                Refusal::NoOpeningPrompt => DirectorError::NoOpeningPrompt,
                Refusal::WrongPhase(phase) => DirectorError::NotAllowed {
                    command: request.name(),
                    phase,
                },
            }
        })
    }

    fn send(&mut self, command: Command) -> Result<(), DirectorError> {
        info!("sending {}", command.name());
        self.sink.send(&command).map_err(|source| {
            error!("failed to send {}: {}", command.name(), source);
            DirectorError::Transport {
                command: command.name(),
                source,
            }
        })
    }
}
