/// Whether the editor is adding a new prompt or changing an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// An open prompt editor. Lives only while the dialog is up; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    pub frame: u32,
    pub initial_text: String,
    pub mode: EditorMode,
}

impl EditorSession {
    pub fn create(frame: u32) -> Self {
        EditorSession {
            frame,
            initial_text: String::new(),
            mode: EditorMode::Create,
        }
    }

    pub fn edit(frame: u32, text: impl Into<String>) -> Self {
        EditorSession {
            frame,
            initial_text: text.into(),
            mode: EditorMode::Edit,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.mode == EditorMode::Edit
    }

    /// Deleting is offered only for existing prompts, and never for the
    /// opening prompt at frame 0.
    pub fn can_delete(&self) -> bool {
        self.is_edit() && self.frame != 0
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::Create => "Add Prompt",
            EditorMode::Edit => "Edit Prompt",
        }
    }

    pub fn description(&self) -> String {
        match self.mode {
            EditorMode::Create => format!("Add a new prompt starting at frame {}", self.frame),
            EditorMode::Edit => format!("Editing prompt at frame {}", self.frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_is_never_offered_at_frame_zero() {
        assert!(!EditorSession::edit(0, "opening").can_delete());
        assert!(EditorSession::edit(12, "later").can_delete());
        assert!(!EditorSession::create(12).can_delete());
    }

    #[test]
    fn titles() {
        assert_eq!(EditorSession::create(5).title(), "Add Prompt");
        assert_eq!(
            EditorSession::edit(5, "x").description(),
            "Editing prompt at frame 5"
        );
    }
}
