use std::mem;

use crate::error::{EditError, EditResult};
use crate::song::clip::ClipSnapshot;

/// State of every clip of a track at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
  clips: Vec<ClipSnapshot>,
}

impl Checkpoint {
  pub fn new(clips: Vec<ClipSnapshot>) -> Checkpoint {
    Checkpoint { clips }
  }

  pub fn clips(&self) -> &[ClipSnapshot] {
    self.clips.as_slice()
  }
}

/// Bookkeeping of a transaction between `begin` and `commit`/`rollback`.
#[derive(Debug)]
pub(crate) struct OpenCheckpoint {
  was_enabled: bool,
  unrecorded: Option<Checkpoint>,
  redo: Vec<Checkpoint>,
}

/// Undo and redo history of one track.
#[derive(Debug)]
pub struct Journal {
  undo: Vec<Checkpoint>,
  redo: Vec<Checkpoint>,
  enabled: bool,
  open: bool,
}

impl Default for Journal {
  fn default() -> Journal {
    Journal::new()
  }
}

impl Journal {
  pub fn new() -> Journal {
    Journal {
      undo: Vec::new(),
      redo: Vec::new(),
      enabled: true,
      open: false,
    }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn can_undo(&self) -> bool {
    !self.undo.is_empty()
  }

  pub fn can_redo(&self) -> bool {
    !self.redo.is_empty()
  }

  pub fn undo_len(&self) -> usize {
    self.undo.len()
  }

  /// Records a checkpoint unless journalling is switched off.
  pub fn add_checkpoint(&mut self, checkpoint: Checkpoint) -> bool {
    if !self.enabled {
      return false;
    }
    self.undo.push(checkpoint);
    self.redo.clear();
    true
  }

  /// Records the pre-state of a mutation and suspends journalling until the
  /// transaction ends, so the mutation itself does not add checkpoints.
  pub(crate) fn begin(&mut self, checkpoint: Checkpoint) -> EditResult<OpenCheckpoint> {
    if self.open {
      return Err(EditError::CheckpointOpen);
    }
    let redo = mem::take(&mut self.redo);
    let unrecorded = if self.enabled {
      self.undo.push(checkpoint);
      None
    } else {
      Some(checkpoint)
    };
    let was_enabled = self.enabled;
    self.enabled = false;
    self.open = true;
    Ok(OpenCheckpoint {
      was_enabled,
      unrecorded,
      redo,
    })
  }

  /// Closes the transaction. With journalling off nothing was recorded, so
  /// the redo history stays as it was.
  pub(crate) fn commit(&mut self, open: OpenCheckpoint) {
    if !open.was_enabled {
      self.redo = open.redo;
    }
    self.enabled = open.was_enabled;
    self.open = false;
  }

  /// Forgets the transaction and hands back the pre-state to restore.
  pub(crate) fn rollback(&mut self, open: OpenCheckpoint) -> Option<Checkpoint> {
    let checkpoint = match open.unrecorded {
      Some(checkpoint) => Some(checkpoint),
      None => self.undo.pop(),
    };
    self.redo = open.redo;
    self.enabled = open.was_enabled;
    self.open = false;
    checkpoint
  }

  pub(crate) fn pop_undo(&mut self) -> Option<Checkpoint> {
    self.undo.pop()
  }

  pub(crate) fn pop_redo(&mut self) -> Option<Checkpoint> {
    self.redo.pop()
  }

  pub(crate) fn push_undo(&mut self, checkpoint: Checkpoint) {
    self.undo.push(checkpoint);
  }

  pub(crate) fn push_redo(&mut self, checkpoint: Checkpoint) {
    self.redo.push(checkpoint);
  }
}
