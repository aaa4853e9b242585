use std::thread;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::cli::commands::PlayArgs;
use crate::cli::output::{event_to_json, format_event, format_snapshot, snapshot_to_json};
use crate::io::link::{CommandSink, EngineLink, LinkEvent};
use crate::io::schedule_file;
use crate::model::{ConnectionStatus, DirectorConfig, EngineMessage};
use crate::ops::director::{Applied, Director};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Error type for headless playback
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("engine at {url} was not ready after {secs}s")]
    ConnectTimeout { url: String, secs: u64 },
    #[error("could not connect to {0}")]
    ConnectFailed(String),
    #[error("{command} failed: {error}")]
    CommandFailed { command: &'static str, error: String },
}

/// What one link event produced
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Step {
    /// Line for stdout
    pub line: Option<String>,
    /// Stop playing: target frame reached or engine gone
    pub done: bool,
}

pub fn cmd_play(
    args: PlayArgs,
    config: &DirectorConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let schedule = schedule_file::read_schedule(&args.file, config.timeline.max_frames)?;
    let until = args
        .until_frame
        .unwrap_or(config.timeline.max_frames.saturating_sub(1));

    let mut director = Director::new(EngineLink::new(&config.engine.url), config.timeline);
    director.sink_mut().connect();
    wait_ready(
        &mut director,
        Duration::from_secs(args.connect_timeout),
        &config.engine.url,
    )?;

    info!(
        "scheduling {} prompt(s) from {}",
        schedule.len(),
        args.file.display()
    );
    for (frame, text) in schedule.iter() {
        director.schedule_prompt(frame, text)?;
    }
    director.start()?;

    loop {
        for evt in director.sink_mut().poll() {
            let step = step(&mut director, evt, until, json)?;
            if let Some(line) = step.line {
                println!("{}", line);
            }
            if step.done {
                director.sink_mut().disconnect();
                return Ok(());
            }
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Poll until the link reports `Ready`, applying whatever arrives meanwhile.
fn wait_ready(
    director: &mut Director<EngineLink>,
    timeout: Duration,
    url: &str,
) -> Result<(), PlayError> {
    let deadline = Instant::now() + timeout;
    loop {
        for evt in director.sink_mut().poll() {
            match evt {
                LinkEvent::Status(status) => {
                    director.set_connection(status);
                    if status == ConnectionStatus::Disconnected {
                        return Err(PlayError::ConnectFailed(url.to_string()));
                    }
                }
                LinkEvent::Message(msg) => {
                    director.apply_message(msg);
                }
                LinkEvent::CommandFailed { command, error } => {
                    return Err(PlayError::CommandFailed { command, error });
                }
            }
        }
        if director.is_connected() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            director.sink_mut().disconnect();
            return Err(PlayError::ConnectTimeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Apply one link event and decide what to print.
pub fn step<S: CommandSink>(
    director: &mut Director<S>,
    evt: LinkEvent,
    until: u32,
    json: bool,
) -> Result<Step, PlayError> {
    match evt {
        LinkEvent::Status(status) => {
            let lost = director
                .set_connection(status)
                .is_some_and(|t| t.is_disconnect());
            if lost {
                warn!("engine disconnected before frame {}", until);
            }
            Ok(Step {
                line: None,
                done: lost,
            })
        }
        LinkEvent::Message(msg) => {
            let event = match &msg {
                EngineMessage::Event(e) => Some(event_to_json(e)),
                EngineMessage::State(_) => None,
            };
            match director.apply_message(msg) {
                Applied::Snapshot => {
                    let snap = snapshot_to_json(director.state(), director.phase());
                    let line = if json {
                        serde_json::to_string(&snap).ok()
                    } else {
                        Some(format_snapshot(&snap))
                    };
                    Ok(Step {
                        line,
                        done: snap.frame >= until,
                    })
                }
                Applied::Event(_) => {
                    let line = event.and_then(|e| {
                        if json {
                            serde_json::to_string(&e).ok()
                        } else {
                            Some(format_event(&e))
                        }
                    });
                    Ok(Step { line, done: false })
                }
            }
        }
        LinkEvent::CommandFailed { command, error } => {
            Err(PlayError::CommandFailed { command, error })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::link::TransportError;
    use crate::model::{Command, EngineEvent, StateSnapshot, TimelineConfig};

    struct Discard;

    impl CommandSink for Discard {
        fn send(&mut self, _command: &Command) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn ready() -> Director<Discard> {
        let mut d = Director::new(Discard, TimelineConfig::default());
        d.set_connection(ConnectionStatus::Ready);
        d
    }

    fn state(frame: u32) -> LinkEvent {
        LinkEvent::Message(EngineMessage::State(StateSnapshot {
            current_frame: frame,
            current_prompt: Some("temple".into()),
            paused: false,
            scheduled_prompts: [(0, "temple".to_string())].into_iter().collect(),
        }))
    }

    #[test]
    fn prints_snapshots_until_target() {
        let mut d = ready();
        let s = step(&mut d, state(10), 20, false).unwrap();
        assert_eq!(
            s,
            Step {
                line: Some("frame 10  paused=false  prompt=\"temple\"".into()),
                done: false,
            }
        );
        assert!(step(&mut d, state(20), 20, false).unwrap().done);
    }

    #[test]
    fn json_lines() {
        let mut d = ready();
        let s = step(&mut d, state(10), 20, true).unwrap();
        let line = s.line.unwrap();
        assert!(line.starts_with("{\"frame\":10,"));
    }

    #[test]
    fn events_are_printed() {
        let mut d = ready();
        let evt = LinkEvent::Message(EngineMessage::Event(EngineEvent {
            event: "error".into(),
            frame: None,
            message: Some("GPU lost".into()),
            new_prompt: None,
            previous_prompt: None,
        }));
        let s = step(&mut d, evt, 20, false).unwrap();
        assert_eq!(s.line.as_deref(), Some("event error: GPU lost"));
        assert!(!s.done);
    }

    #[test]
    fn disconnect_ends_playback() {
        let mut d = ready();
        let s = step(
            &mut d,
            LinkEvent::Status(ConnectionStatus::Disconnected),
            20,
            false,
        )
        .unwrap();
        assert!(s.done);
        assert!(d.schedule().is_empty());
    }

    #[test]
    fn late_write_failure_is_fatal() {
        let mut d = ready();
        let evt = LinkEvent::CommandFailed {
            command: "start",
            error: "broken pipe".into(),
        };
        assert!(matches!(
            step(&mut d, evt, 20, false),
            Err(PlayError::CommandFailed { command: "start", .. })
        ));
    }
}
