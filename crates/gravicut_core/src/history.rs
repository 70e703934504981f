use crate::error::{CoreError, Result};
use crate::types::Track;

/// Arrangement captured before a committed mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub description: String,
    pub tracks: Vec<Track>,
}

/// Bounded undo/redo stack of whole-arrangement snapshots.
///
/// Mutations route through gravity compaction, so replaying inverse operations would not land
/// clips back where they were; restoring the prior track list always does.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_size: usize,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Record the state before a new mutation. Clears the redo stack.
    pub fn record(&mut self, description: impl Into<String>, before: Vec<Track>) {
        if self.max_size == 0 {
            return;
        }
        self.redo_stack.clear();
        self.undo_stack.push(Snapshot {
            description: description.into(),
            tracks: before,
        });
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Swap `current` for the last recorded state. Returns the description undone.
    pub fn undo(&mut self, current: &mut Vec<Track>) -> Result<String> {
        let snapshot = self.undo_stack.pop().ok_or(CoreError::NothingToUndo)?;
        let redo_tracks = std::mem::replace(current, snapshot.tracks);
        self.redo_stack.push(Snapshot {
            description: snapshot.description.clone(),
            tracks: redo_tracks,
        });
        Ok(snapshot.description)
    }

    /// Re-apply the last undone state. Returns the description redone.
    pub fn redo(&mut self, current: &mut Vec<Track>) -> Result<String> {
        let snapshot = self.redo_stack.pop().ok_or(CoreError::NothingToRedo)?;
        let undo_tracks = std::mem::replace(current, snapshot.tracks);
        self.undo_stack.push(Snapshot {
            description: snapshot.description.clone(),
            tracks: undo_tracks,
        });
        Ok(snapshot.description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|s| s.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|s| s.description.as_str())
    }
}
