use crate::model::{PlaybackPhase, Schedule};

/// Transport requests a user can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Start,
    Pause,
    Resume,
    Reset,
}

impl Transport {
    pub fn name(self) -> &'static str {
        match self {
            Transport::Start => "start",
            Transport::Pause => "pause",
            Transport::Resume => "resume",
            Transport::Reset => "reset",
        }
    }
}

/// Why a transport request is not legal right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    NotConnected,
    /// Start needs a prompt at frame 0
    NoOpeningPrompt,
    WrongPhase(PlaybackPhase),
}

/// Generation on the engine counts as started once the engine says so
/// (frame > 0 in a snapshot, or a `generation_started` event), or
/// optimistically once we send `start`.
///
/// Frame 0 with nothing running looks exactly like "not started yet", so a
/// reset that lands back on frame 0 mid-session briefly reads as stopped
/// until the next snapshot moves the frame on.
pub fn infer_started(current_frame: u32) -> bool {
    current_frame > 0
}

/// Playback phase tracker and transport gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackMachine {
    started: bool,
    paused: bool,
}

impl Default for PlaybackMachine {
    fn default() -> Self {
        PlaybackMachine {
            started: false,
            paused: true,
        }
    }
}

impl PlaybackMachine {
    pub fn phase(&self) -> PlaybackPhase {
        PlaybackPhase::from_flags(self.started, self.paused)
    }

    /// The "is playing" signal the transport controls read
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Adopt the engine's frame and pause flag
    pub fn on_snapshot(&mut self, current_frame: u32, paused: bool) {
        self.started = infer_started(current_frame);
        self.paused = paused;
    }

    /// The engine announced it began generating; it does not start paused.
    pub fn on_generation_started(&mut self) {
        self.started = true;
        self.paused = false;
    }

    /// Optimistic transition after sending `start`
    pub fn on_start_sent(&mut self) {
        self.on_generation_started();
    }

    /// Back to the initial state (reset, disconnect)
    pub fn clear(&mut self) {
        *self = PlaybackMachine::default();
    }

    /// Check whether `request` is legal given the schedule and connection.
    pub fn check(
        &self,
        request: Transport,
        schedule: &Schedule,
        connected: bool,
    ) -> Result<(), Refusal> {
        if !connected {
            return Err(Refusal::NotConnected);
        }
        let phase = self.phase();
        match request {
            Transport::Start => {
                if phase != PlaybackPhase::NotStarted {
                    Err(Refusal::WrongPhase(phase))
                } else if !can_start(schedule) {
                    Err(Refusal::NoOpeningPrompt)
                } else {
                    Ok(())
                }
            }
            Transport::Pause if phase != PlaybackPhase::Playing => Err(Refusal::WrongPhase(phase)),
            Transport::Resume if phase != PlaybackPhase::Paused => Err(Refusal::WrongPhase(phase)),
            Transport::Pause | Transport::Resume | Transport::Reset => Ok(()),
        }
    }
}

/// Playback can begin only once something is scheduled at frame 0.
pub fn can_start(schedule: &Schedule) -> bool {
    schedule.contains(0)
}

/// What the play/pause and stop affordances look like right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportControls {
    /// Show ▶ (true) or ❚❚ (false)
    pub show_play: bool,
    pub play_disabled: bool,
    pub reset_disabled: bool,
    /// What pressing play/pause would do
    pub action: Transport,
    pub play_tooltip: &'static str,
    pub reset_tooltip: &'static str,
}

/// Derive the transport affordances from phase, schedule and connection.
pub fn transport_controls(
    machine: &PlaybackMachine,
    schedule: &Schedule,
    connected: bool,
) -> TransportControls {
    let playing = machine.started();
    let paused = machine.paused();
    let startable = can_start(schedule);

    let action = if !playing {
        Transport::Start
    } else if paused {
        Transport::Resume
    } else {
        Transport::Pause
    };
    let show_play = !playing || paused;
    let play_disabled = !connected || (!startable && !playing);

    let play_tooltip = if !connected {
        "Connect first"
    } else if !startable && !playing {
        "Add a prompt at frame 0 to start"
    } else if show_play {
        if playing && paused { "Resume" } else { "Play" }
    } else {
        "Pause"
    };

    TransportControls {
        show_play,
        play_disabled,
        reset_disabled: !connected,
        action,
        play_tooltip,
        reset_tooltip: if connected { "Reset" } else { "Connect first" },
    }
}
