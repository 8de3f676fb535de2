use super::state::{Clip, ClipId};

/// Rename in progress: which clip and the name typed so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEdit {
    pub clip_id: ClipId,
    pub candidate: String,
}

/// Transient per-item edit state for the clip list
///
/// Holds at most one rename and at most one delete awaiting confirmation.
/// Targets are tracked by [`ClipId`] so list changes cannot retarget them.
#[derive(Debug, Default)]
pub struct ClipEditor {
    rename: Option<RenameEdit>,
    pending_delete: Option<ClipId>,
}

impl ClipEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the rename field for `clip`, replacing any other open rename
    pub fn begin_rename(&mut self, clip: &Clip) {
        self.rename = Some(RenameEdit {
            clip_id: clip.id,
            candidate: clip.title().to_string(),
        });
    }

    /// Update the typed name; ignored when no rename is open
    pub fn set_candidate(&mut self, candidate: impl Into<String>) {
        if let Some(edit) = &mut self.rename {
            edit.candidate = candidate.into();
        }
    }

    pub fn rename(&self) -> Option<&RenameEdit> {
        self.rename.as_ref()
    }

    pub fn is_renaming(&self, id: ClipId) -> bool {
        self.rename.as_ref().is_some_and(|edit| edit.clip_id == id)
    }

    pub fn cancel_rename(&mut self) -> Option<RenameEdit> {
        self.rename.take()
    }

    pub fn propose_delete(&mut self, id: ClipId) {
        self.pending_delete = Some(id);
    }

    pub fn pending_delete(&self) -> Option<ClipId> {
        self.pending_delete
    }

    pub fn take_pending_delete(&mut self) -> Option<ClipId> {
        self.pending_delete.take()
    }

    /// Drop edit state that points at a clip which no longer exists
    pub fn forget(&mut self, id: ClipId) {
        if self.is_renaming(id) {
            self.rename = None;
        }
        if self.pending_delete == Some(id) {
            self.pending_delete = None;
        }
    }
}
