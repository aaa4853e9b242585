use std::collections::BTreeMap;

/// Default hit-test tolerance window, in frames.
pub const DEFAULT_TOLERANCE: u32 = 5;

/// A prompt pinned to a frame on the timeline
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScheduledPrompt {
    pub frame: u32,
    pub text: String,
}

impl ScheduledPrompt {
    pub fn new(frame: u32, text: impl Into<String>) -> Self {
        ScheduledPrompt {
            frame,
            text: text.into(),
        }
    }
}

/// Error type for schedule mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("prompt text for frame {0} is empty")]
    EmptyText(u32),
}

/// A stretch of the timeline governed by one prompt: `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub start: u32,
    pub end: u32,
    pub text: &'a str,
}

/// Sparse frame → prompt mapping.
///
/// Keys are unique and iteration is always in ascending frame order. Any
/// frame without an entry has no prompt; lookups say so with `None` rather
/// than falling back to a neighbour (that is [`Schedule::nearest_at_or_before`]'s
/// job, and only when asked).
///
/// Every mutation raises the dirty flag so the front end knows to redraw.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: BTreeMap<u32, String>,
    dirty: bool,
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Schedule {}

impl From<BTreeMap<u32, String>> for Schedule {
    fn from(entries: BTreeMap<u32, String>) -> Self {
        Schedule {
            entries,
            dirty: true,
        }
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for Schedule {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        let entries: BTreeMap<u32, String> =
            iter.into_iter().map(|(f, t)| (f, t.into())).collect();
        Schedule::from(entries)
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the prompt at `frame`.
    ///
    /// Only the text is validated; keeping `frame` inside the timeline is the
    /// caller's business.
    pub fn upsert(&mut self, frame: u32, text: impl Into<String>) -> Result<(), ScheduleError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ScheduleError::EmptyText(frame));
        }
        self.entries.insert(frame, text);
        self.dirty = true;
        Ok(())
    }

    /// Remove the prompt at `frame`, returning its text.
    pub fn remove(&mut self, frame: u32) -> Option<String> {
        let removed = self.entries.remove(&frame);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    /// Replace every entry at once.
    pub fn replace_all(&mut self, entries: BTreeMap<u32, String>) {
        self.entries = entries;
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.dirty = true;
        }
        self.entries.clear();
    }

    pub fn get(&self, frame: u32) -> Option<&str> {
        self.entries.get(&frame).map(|s| s.as_str())
    }

    pub fn contains(&self, frame: u32) -> bool {
        self.entries.contains_key(&frame)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending frame order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(f, t)| (*f, t.as_str()))
    }

    pub fn frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// The entry with the largest frame ≤ `frame`.
    pub fn nearest_at_or_before(&self, frame: u32) -> Option<ScheduledPrompt> {
        self.entries
            .range(..=frame)
            .next_back()
            .map(|(f, t)| ScheduledPrompt::new(*f, t.clone()))
    }

    /// The entry closest to `frame` whose distance is strictly less than
    /// `tolerance`. Ties go to the smaller frame.
    pub fn find_within_tolerance(&self, frame: u32, tolerance: u32) -> Option<ScheduledPrompt> {
        if tolerance == 0 {
            return None;
        }
        let reach = tolerance - 1;
        let lo = frame.saturating_sub(reach);
        let hi = frame.saturating_add(reach);
        self.entries
            .range(lo..=hi)
            .min_by_key(|(f, _)| (f.abs_diff(frame), **f))
            .map(|(f, t)| ScheduledPrompt::new(*f, t.clone()))
    }

    /// The last entry strictly before `frame`
    pub fn before(&self, frame: u32) -> Option<ScheduledPrompt> {
        self.entries
            .range(..frame)
            .next_back()
            .map(|(f, t)| ScheduledPrompt::new(*f, t.clone()))
    }

    /// The first entry strictly after `frame`
    pub fn after(&self, frame: u32) -> Option<ScheduledPrompt> {
        let start = frame.checked_add(1)?;
        self.entries
            .range(start..)
            .next()
            .map(|(f, t)| ScheduledPrompt::new(*f, t.clone()))
    }

    /// All entries strictly before `frame`, ascending.
    pub fn entries_before(&self, frame: u32) -> Vec<ScheduledPrompt> {
        self.entries
            .range(..frame)
            .map(|(f, t)| ScheduledPrompt::new(*f, t.clone()))
            .collect()
    }

    /// Split `[0, max_frames)` into the stretches each entry governs. Each
    /// segment runs from its entry to the next entry (or `max_frames`).
    /// Entries at or past `max_frames` produce no segment.
    pub fn segments(&self, max_frames: u32) -> Vec<Segment<'_>> {
        let mut segments = Vec::new();
        let mut iter = self.entries.range(..max_frames).peekable();
        while let Some((start, text)) = iter.next() {
            let end = iter.peek().map_or(max_frames, |(next, _)| **next);
            segments.push(Segment {
                start: *start,
                end,
                text,
            });
        }
        segments
    }

    /// A copy of the raw entries, for handing to other owners
    pub fn to_map(&self) -> BTreeMap<u32, String> {
        self.entries.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and lower the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
