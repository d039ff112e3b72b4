use super::{internal, Service};
use crate::contract::{MaintenanceError, NewNote, NewNoteComment, Note, NoteComment, NoteSummary};
use crate::domain::validation::normalize_text;

impl Service {
    // ===== Notes =====

    /// All notes, or those whose item serial number contains `serial_no`
    pub async fn list_notes(
        &self,
        serial_no: Option<&str>,
    ) -> Result<Vec<NoteSummary>, MaintenanceError> {
        let mut notes = match serial_no.map(str::trim).filter(|s| !s.is_empty()) {
            Some(serial) => self
                .repos
                .notes
                .notes_like_serial(serial)
                .await
                .map_err(internal)?,
            None => self.repos.notes.all_notes().await.map_err(internal)?,
        };
        notes.sort_by(|a, b| b.note_date.cmp(&a.note_date).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    pub async fn get_note(&self, id: i32) -> Result<Note, MaintenanceError> {
        self.repos
            .notes
            .find(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Note", id))
    }

    /// Notes may be added to inactive items
    pub async fn create_note(&self, note: NewNote) -> Result<Note, MaintenanceError> {
        self.get_item(note.item_id).await?;
        let text = normalize_text("Note", &note.note, self.config.max_note_length)?;
        let note = NewNote { note: text, ..note };
        let created = self.repos.notes.create(&note).await.map_err(internal)?;
        tracing::info!(note_id = created.id, item_id = created.item_id, "note created");
        Ok(created)
    }

    pub async fn update_note(&self, id: i32, note: &str) -> Result<Note, MaintenanceError> {
        self.get_note(id).await?;
        let text = normalize_text("Note", note, self.config.max_note_length)?;
        let updated = self
            .repos
            .notes
            .update_text(id, &text)
            .await
            .map_err(internal)?;
        tracing::info!(note_id = id, "note updated");
        Ok(updated)
    }

    /// Delete a note together with its comments
    pub async fn delete_note(&self, id: i32) -> Result<(), MaintenanceError> {
        self.get_note(id).await?;
        self.repos.notes.delete(id).await.map_err(internal)?;
        tracing::info!(note_id = id, "note deleted");
        Ok(())
    }

    // ===== Comments =====

    /// Comments of a note, oldest first
    pub async fn note_comments(&self, note_id: i32) -> Result<Vec<NoteComment>, MaintenanceError> {
        self.get_note(note_id).await?;
        let mut comments = self
            .repos
            .notes
            .comments(note_id)
            .await
            .map_err(internal)?;
        comments.sort_by_key(|c| (c.comment_date, c.id));
        Ok(comments)
    }

    pub async fn add_note_comment(
        &self,
        comment: NewNoteComment,
    ) -> Result<NoteComment, MaintenanceError> {
        self.get_note(comment.note_id).await?;
        let text = normalize_text("Comment", &comment.comment, self.config.max_note_length)?;
        let comment = NewNoteComment {
            comment: text,
            ..comment
        };
        let created = self
            .repos
            .notes
            .create_comment(&comment)
            .await
            .map_err(internal)?;
        tracing::info!(comment_id = created.id, note_id = created.note_id, "note comment added");
        Ok(created)
    }

    pub async fn delete_note_comment(&self, id: i32) -> Result<(), MaintenanceError> {
        self.repos
            .notes
            .find_comment(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Note comment", id))?;
        self.repos.notes.delete_comment(id).await.map_err(internal)?;
        tracing::info!(comment_id = id, "note comment deleted");
        Ok(())
    }
}
