mod edit;

pub use self::edit::{EditTransaction, SampleFileChange};

use log::{debug, warn};

use crate::error::{EditError, EditResult};
use crate::song::{
  clip::{ClipId, SampleClip},
  events::{ClipEvent, ClipObserver, Observers, SubscriptionId},
  journal::{Checkpoint, Journal},
};

/// Arrangement a track lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
  /// The main song arrangement.
  Song,
  /// A pattern (beat/bassline) sub-arrangement.
  Pattern,
}

#[derive(Debug)]
pub struct Track {
  name: String,
  container: Container,
  clips: Vec<SampleClip>,
  journal: Journal,
  observers: Observers,
}

impl Track {
  pub fn new<T>(name: T, container: Container) -> Track
  where
    T: Into<String>,
  {
    Track {
      name: name.into(),
      container,
      clips: Vec::new(),
      journal: Journal::new(),
      observers: Observers::new(),
    }
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn container(&self) -> Container {
    self.container
  }

  pub fn clips(&self) -> &[SampleClip] {
    self.clips.as_slice()
  }

  pub fn clip(&self, id: ClipId) -> Option<&SampleClip> {
    self.clips.iter().find(|clip| clip.get_id() == id)
  }

  pub fn clip_mut(&mut self, id: ClipId) -> Option<&mut SampleClip> {
    self.clips.iter_mut().find(|clip| clip.get_id() == id)
  }

  pub fn contains(&self, id: ClipId) -> bool {
    self.clip(id).is_some()
  }

  pub fn add_clip(&mut self, clip: SampleClip) -> ClipId {
    let id = clip.get_id();
    self.clips.push(clip);
    id
  }

  /// Takes a clip off the track. Observers get a `Removed` event so any
  /// editor bound to it lets go.
  pub fn remove_clip(&mut self, id: ClipId) -> Option<SampleClip> {
    let index = self.clips.iter().position(|clip| clip.get_id() == id)?;
    let clip = self.clips.remove(index);
    self.observers.notify(id, ClipEvent::Removed);
    Some(clip)
  }

  pub fn subscribe(&mut self, observer: Box<dyn ClipObserver>) -> SubscriptionId {
    self.observers.subscribe(observer)
  }

  pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
    self.observers.unsubscribe(id)
  }

  pub fn journal(&self) -> &Journal {
    &self.journal
  }

  pub fn journal_mut(&mut self) -> &mut Journal {
    &mut self.journal
  }

  pub fn checkpoint(&self) -> EditResult<Checkpoint> {
    let clips = self
      .clips
      .iter()
      .map(SampleClip::snapshot)
      .collect::<EditResult<Vec<_>>>()?;
    Ok(Checkpoint::new(clips))
  }

  /// Records the current state without bracketing a mutation.
  pub fn add_checkpoint(&mut self) -> EditResult<bool> {
    if self.journal.is_open() {
      return Err(EditError::CheckpointOpen);
    }
    let checkpoint = self.checkpoint()?;
    Ok(self.journal.add_checkpoint(checkpoint))
  }

  /// Opens the single transaction allowed on this track. Dropping the
  /// returned guard without committing restores the pre-state.
  pub fn begin_edit(&mut self) -> EditResult<EditTransaction<'_>> {
    if self.journal.is_open() {
      return Err(EditError::CheckpointOpen);
    }
    let checkpoint = self.checkpoint()?;
    let open = self.journal.begin(checkpoint)?;
    Ok(EditTransaction::new(self, open))
  }

  pub fn undo(&mut self) -> EditResult<bool> {
    if self.journal.is_open() {
      return Err(EditError::CheckpointOpen);
    }
    let current = self.checkpoint()?;
    match self.journal.pop_undo() {
      Some(checkpoint) => {
        self.journal.push_redo(current);
        self.restore_and_notify(&checkpoint);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  pub fn redo(&mut self) -> EditResult<bool> {
    if self.journal.is_open() {
      return Err(EditError::CheckpointOpen);
    }
    let current = self.checkpoint()?;
    match self.journal.pop_redo() {
      Some(checkpoint) => {
        self.journal.push_undo(current);
        self.restore_and_notify(&checkpoint);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  pub(crate) fn find_clip(&self, id: ClipId) -> EditResult<&SampleClip> {
    self.clip(id).ok_or(EditError::ClipNotFound { id })
  }

  pub(crate) fn find_clip_mut(&mut self, id: ClipId) -> EditResult<&mut SampleClip> {
    self.clip_mut(id).ok_or(EditError::ClipNotFound { id })
  }

  pub(crate) fn notify(&mut self, id: ClipId, event: ClipEvent) {
    self.observers.notify(id, event);
  }

  /// Inserts `clip` right after the clip `after`, or at the end.
  pub(crate) fn insert_clip_after(&mut self, after: ClipId, clip: SampleClip) {
    match self.clips.iter().position(|c| c.get_id() == after) {
      Some(index) => self.clips.insert(index + 1, clip),
      None => self.clips.push(clip),
    }
  }

  /// Puts the clips back as recorded in `checkpoint`. Returns the clips that
  /// did not exist at that point.
  pub(crate) fn restore(&mut self, checkpoint: &Checkpoint) -> Vec<ClipId> {
    let mut current = std::mem::take(&mut self.clips);
    for snapshot in checkpoint.clips() {
      let clip = match current.iter().position(|c| c.get_id() == snapshot.get_id()) {
        Some(index) => {
          let mut clip = current.swap_remove(index);
          clip.restore(snapshot);
          clip
        }
        None => SampleClip::from_snapshot(snapshot.clone()),
      };
      self.clips.push(clip);
    }
    current.iter().map(SampleClip::get_id).collect()
  }

  fn restore_and_notify(&mut self, checkpoint: &Checkpoint) {
    let dropped = self.restore(checkpoint);
    debug!(
      "Track '{}' restored {} clips, dropped {}",
      self.name,
      checkpoint.clips().len(),
      dropped.len()
    );
    for id in dropped {
      self.observers.notify(id, ClipEvent::Removed);
    }
    for snapshot in checkpoint.clips() {
      self.observers.notify(snapshot.get_id(), ClipEvent::Changed);
    }
  }

  pub(crate) fn rollback(&mut self, checkpoint: &Checkpoint) {
    let dropped = self.restore(checkpoint);
    warn!(
      "Track '{}' rolled back an edit ({} clips discarded)",
      self.name,
      dropped.len()
    );
  }
}
