use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{Schedule, ScheduledPrompt};

/// Error type for reading a schedule file
#[derive(Debug, thiserror::Error)]
pub enum ScheduleFileError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("prompt at frame {frame} is outside the timeline (0..{max_frames})")]
    OutOfRange { frame: u32, max_frames: u32 },
    #[error("prompt at frame {0} has no text")]
    EmptyText(u32),
    #[error("schedule file has no prompts")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    #[serde(default)]
    prompt: Vec<ScheduledPrompt>,
}

/// Parse schedule TOML (`[[prompt]]` tables with `frame` and `text`).
/// Later entries for the same frame replace earlier ones.
pub fn parse_schedule(
    text: &str,
    path: &Path,
    max_frames: u32,
) -> Result<Schedule, ScheduleFileError> {
    let file: ScheduleFile = toml::from_str(text).map_err(|e| ScheduleFileError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    if file.prompt.is_empty() {
        return Err(ScheduleFileError::Empty);
    }
    let mut schedule = Schedule::new();
    for p in file.prompt {
        if p.frame >= max_frames {
            return Err(ScheduleFileError::OutOfRange {
                frame: p.frame,
                max_frames,
            });
        }
        schedule
            .upsert(p.frame, p.text.trim())
            .map_err(|_| ScheduleFileError::EmptyText(p.frame))?;
    }
    schedule.take_dirty();
    Ok(schedule)
}

pub fn read_schedule(path: &Path, max_frames: u32) -> Result<Schedule, ScheduleFileError> {
    let text = fs::read_to_string(path).map_err(|e| ScheduleFileError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_schedule(&text, path, max_frames)
}
