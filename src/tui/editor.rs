use crate::io::enhance::EnhanceRequest;
use crate::model::{EditorSession, Schedule};
use crate::util::unicode;

/// Single-buffer text input with a grapheme-aware byte cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
}

impl TextField {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        TextField { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the contents and put the cursor at the end
    pub fn set(&mut self, text: impl Into<String>) {
        *self = TextField::new(text);
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert pasted text; line breaks become spaces.
    pub fn insert_str(&mut self, s: &str) {
        let clean: String = s
            .chars()
            .filter(|&c| c != '\r')
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        self.text.insert_str(self.cursor, &clean);
        self.cursor += clean.len();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    /// Delete back to the start of the previous word
    pub fn delete_word(&mut self) {
        let start = unicode::word_boundary_left(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_grapheme_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn word_left(&mut self) {
        self.cursor = unicode::word_boundary_left(&self.text, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = unicode::word_boundary_right(&self.text, self.cursor);
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }
}

/// Which field of the dialog has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Prompt,
    Enhanced,
}

/// The open prompt dialog: session plus transient UI state.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub session: EditorSession,
    pub prompt: TextField,
    pub enhanced: TextField,
    pub focus: Field,
    /// Ticket of the enhancement in flight, if any
    pub enhancing: Option<u64>,
    pub enhance_error: Option<String>,
}

impl EditorState {
    pub fn new(session: EditorSession) -> Self {
        EditorState {
            prompt: TextField::new(session.initial_text.clone()),
            enhanced: TextField::default(),
            focus: Field::Prompt,
            enhancing: None,
            enhance_error: None,
            session,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            Field::Prompt => &mut self.prompt,
            Field::Enhanced => &mut self.enhanced,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Prompt => Field::Enhanced,
            Field::Enhanced => Field::Prompt,
        };
    }

    /// Text to save: the enhanced version when filled in, else the prompt.
    /// `None` when both are blank.
    pub fn final_text(&self) -> Option<String> {
        [&self.enhanced, &self.prompt]
            .into_iter()
            .find(|f| !f.is_blank())
            .map(|f| f.text().trim().to_string())
    }

    pub fn can_enhance(&self) -> bool {
        self.enhancing.is_none() && !self.prompt.is_blank()
    }

    /// Enhancement request for the prompt field, with the prompts scheduled
    /// before this frame as context.
    pub fn enhance_request(&self, schedule: &Schedule) -> EnhanceRequest {
        EnhanceRequest::for_frame(self.prompt.text(), schedule, self.session.frame)
    }

    /// Adopt a finished enhancement if it is the one still awaited.
    /// Returns false for stale tickets.
    pub fn finish_enhance(&mut self, ticket: u64, result: Result<String, String>) -> bool {
        if self.enhancing != Some(ticket) {
            return false;
        }
        self.enhancing = None;
        match result {
            Ok(text) => {
                self.enhanced.set(text);
                self.enhance_error = None;
            }
            Err(message) => self.enhance_error = Some(message),
        }
        true
    }
}
