//! The editor side of the service
//!
//! The host owns the real documents and views. The runtime calls back into
//! it to move the cursor, hand focus back, apply expansion edits, and show
//! transient messages.

use crate::expand::ExpansionEdit;
use crate::model::DocumentId;

pub trait EditorHost {
    /// Put the cursor of the active view at the end of `line` (0-indexed)
    fn move_cursor_to_line_end(&mut self, line: usize);

    /// Return keyboard focus to the editing surface
    fn focus_editor(&mut self) {}

    /// Replace `edit.range` with `edit.text` in one step, then place the
    /// cursor at `edit.cursor` if set. The host reports the change back as
    /// a regular text change.
    fn apply_edit(&mut self, document_id: DocumentId, edit: &ExpansionEdit);

    /// Show a short, non-fatal message
    fn show_message(&mut self, message: &str);
}
