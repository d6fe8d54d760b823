use std::ops::{Deref, DerefMut};
use std::path::Path;

use log::debug;

use super::Track;
use crate::audio::SampleLoader;
use crate::error::{EditError, EditResult};
use crate::song::{
  clip::{load_sample, ClipId, ClipState},
  events::ClipEvent,
  journal::OpenCheckpoint,
};
use crate::time::{TicksTime, TimeMap};

/// An open checkpoint on a track.
///
/// The pre-state has already been journalled when the transaction is handed
/// out. `commit` closes it; dropping it without committing puts the clips
/// back the way they were and forgets the checkpoint.
pub struct EditTransaction<'a> {
  track: &'a mut Track,
  open: Option<OpenCheckpoint>,
}

impl<'a> EditTransaction<'a> {
  pub(super) fn new(track: &'a mut Track, open: OpenCheckpoint) -> EditTransaction<'a> {
    EditTransaction {
      track,
      open: Some(open),
    }
  }

  pub fn commit(mut self) {
    if let Some(open) = self.open.take() {
      self.track.journal.commit(open);
    }
  }
}

impl<'a> Deref for EditTransaction<'a> {
  type Target = Track;

  fn deref(&self) -> &Track {
    self.track
  }
}

impl<'a> DerefMut for EditTransaction<'a> {
  fn deref_mut(&mut self) -> &mut Track {
    self.track
  }
}

impl<'a> Drop for EditTransaction<'a> {
  fn drop(&mut self) {
    if let Some(open) = self.open.take() {
      if let Some(checkpoint) = self.track.journal.rollback(open) {
        self.track.rollback(&checkpoint);
      }
    }
  }
}

/// What `Track::set_sample_file` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFileChange {
  /// Empty path, nothing happened.
  Ignored,
  /// Same file as before, only the length was reset to the buffer.
  Reset(TicksTime),
  /// A new sample was loaded, with the given length.
  Loaded(TicksTime),
}

impl Track {
  /// Cuts a clip in two at `tick` (relative to the clip start). Returns the
  /// id of the new right-hand clip.
  pub fn split_clip(&mut self, id: ClipId, tick: TicksTime, time_map: &TimeMap) -> EditResult<ClipId> {
    let length = self.find_clip(id)?.get_length();
    if tick.is_zero() || tick >= length {
      return Err(EditError::ZeroLengthResult);
    }

    let tail_id = {
      let mut edit = self.begin_edit()?;
      let tail = edit.find_clip_mut(id)?.split_off(tick, time_map)?;
      let tail_id = tail.get_id();
      edit.insert_clip_after(id, tail);
      edit.commit();
      tail_id
    };

    debug!("Split clip {} at {:?} into {}", id, tick, tail_id);
    self.notify(id, ClipEvent::Changed);
    self.notify(tail_id, ClipEvent::Changed);
    Ok(tail_id)
  }

  /// Deletes the selected range of a clip. A selection running past the
  /// clip end is cut back to the end first. Returns the removed length.
  pub fn delete_section(
    &mut self,
    id: ClipId,
    start: TicksTime,
    end: TicksTime,
    time_map: &TimeMap,
  ) -> EditResult<TicksTime> {
    let length = self.find_clip(id)?.get_length();
    let end = if end > length && start < length { length } else { end };
    if start >= end || end > length {
      return Err(EditError::InvalidRange {
        start: start.into(),
        end: end.into(),
        limit: length.into(),
      });
    }
    if end - start >= length {
      return Err(EditError::ZeroLengthResult);
    }

    let removed = {
      let mut edit = self.begin_edit()?;
      let removed = edit.find_clip_mut(id)?.remove_section(start, end, time_map)?;
      edit.commit();
      removed
    };

    debug!("Deleted {:?}..{:?} from clip {}", start, end, id);
    self.notify(id, ClipEvent::Changed);
    Ok(removed)
  }

  /// Moves the audio of `[start, end)` by `delta` ticks inside the clip.
  pub fn move_section(
    &mut self,
    id: ClipId,
    start: TicksTime,
    end: TicksTime,
    delta: i64,
    time_map: &TimeMap,
  ) -> EditResult<()> {
    let length = self.find_clip(id)?.get_length();
    if start.is_zero() || start >= end || end > length {
      return Err(EditError::InvalidRange {
        start: start.into(),
        end: end.into(),
        limit: length.into(),
      });
    }

    {
      let mut edit = self.begin_edit()?;
      edit
        .find_clip_mut(id)?
        .move_section(start, end, delta, time_map)?;
      edit.commit();
    }

    debug!("Moved {:?}..{:?} of clip {} by {}", start, end, id, delta);
    self.notify(id, ClipEvent::Changed);
    Ok(())
  }

  /// Flips a clip's playback direction. Not journalled.
  pub fn reverse_clip(&mut self, id: ClipId) -> EditResult<bool> {
    let reversed = self.find_clip_mut(id)?.toggle_reversed()?;
    self.notify(id, ClipEvent::Reversed);
    Ok(reversed)
  }

  pub fn change_clip_length(&mut self, id: ClipId, length: TicksTime) -> EditResult<()> {
    if length.is_zero() {
      return Err(EditError::ZeroLengthResult);
    }
    self.find_clip(id)?;

    {
      let mut edit = self.begin_edit()?;
      edit.find_clip_mut(id)?.change_length(length)?;
      edit.commit();
    }

    self.notify(id, ClipEvent::Changed);
    Ok(())
  }

  /// Makes the clip as long as its buffer again.
  pub fn reset_clip_length(&mut self, id: ClipId, time_map: &TimeMap) -> EditResult<TicksTime> {
    let length = self.find_clip(id)?.buffer_length(time_map)?;
    if length.is_zero() {
      return Err(EditError::ZeroLengthResult);
    }

    {
      let mut edit = self.begin_edit()?;
      edit.find_clip_mut(id)?.change_length(length)?;
      edit.commit();
    }

    self.notify(id, ClipEvent::Changed);
    Ok(length)
  }

  /// Points a clip at another sample file. Picking the file the clip already
  /// plays only resets its length.
  pub fn set_sample_file<L>(
    &mut self,
    id: ClipId,
    path: &Path,
    loader: &L,
    time_map: &TimeMap,
  ) -> EditResult<SampleFileChange>
  where
    L: SampleLoader + ?Sized,
  {
    if path.as_os_str().is_empty() {
      return Ok(SampleFileChange::Ignored);
    }

    let current = self.find_clip(id)?.audio_file()?;
    if current.as_ref().map(|file| file.as_path()) == Some(path) {
      return self.reset_clip_length(id, time_map).map(SampleFileChange::Reset);
    }

    let buffer = load_sample(loader, path)?;
    let length = {
      let mut edit = self.begin_edit()?;
      let clip = edit.find_clip_mut(id)?;
      clip.replace_buffer(buffer, time_map)?;
      let length = clip.get_length();
      edit.commit();
      length
    };

    debug!("Clip {} now plays {}", id, path.display());
    self.notify(id, ClipEvent::Changed);
    Ok(SampleFileChange::Loaded(length))
  }

  /// Applies a persisted clip state as one undoable step.
  pub fn apply_clip_state<L>(&mut self, id: ClipId, state: &ClipState, loader: &L) -> EditResult<()>
  where
    L: SampleLoader + ?Sized,
  {
    self.find_clip(id)?;

    {
      let mut edit = self.begin_edit()?;
      edit.find_clip_mut(id)?.apply_state(state, loader)?;
      edit.commit();
    }

    self.notify(id, ClipEvent::Changed);
    Ok(())
  }

  pub fn set_clip_recording(&mut self, id: ClipId, recording: bool) -> EditResult<()> {
    self.find_clip_mut(id)?.set_recording(recording);
    Ok(())
  }
}

#[cfg(test)]
mod test {

  use std::cell::RefCell;
  use std::path::Path;
  use std::rc::Rc;

  use super::SampleFileChange;
  use crate::error::EditError;
  use crate::song::clip::test::{clip_100, time_map, FramesLoader};
  use crate::song::clip::ClipId;
  use crate::song::events::ClipEvent;
  use crate::song::track::{Container, Track};
  use crate::time::TicksTime;

  type Events = Rc<RefCell<Vec<(ClipId, ClipEvent)>>>;

  fn track_with_clip() -> (Track, ClipId, Events) {
    let mut track = Track::new("drums", Container::Song);
    let id = track.add_clip(clip_100());
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    track.subscribe(Box::new(move |clip: ClipId, event: ClipEvent| {
      sink.borrow_mut().push((clip, event))
    }));
    (track, id, events)
  }

  #[test]
  pub fn split_clip() {
    let (mut track, id, events) = track_with_clip();
    let tail = track.split_clip(id, TicksTime::new(40), &time_map()).unwrap();

    assert_eq!(track.clips().len(), 2);
    assert_eq!(track.clips()[1].get_id(), tail);
    assert_eq!(track.clip(id).unwrap().get_length(), TicksTime::new(40));
    assert_eq!(track.clip(tail).unwrap().get_length(), TicksTime::new(60));
    assert_eq!(track.clip(tail).unwrap().get_position(), TicksTime::new(424));
    assert_eq!(track.journal().undo_len(), 1);
    assert_eq!(
      *events.borrow(),
      vec![(id, ClipEvent::Changed), (tail, ClipEvent::Changed)]
    );
  }

  #[test]
  pub fn split_clip_at_edges_is_a_no_op() {
    let (mut track, id, events) = track_with_clip();
    for tick in &[0, 100] {
      let result = track.split_clip(id, TicksTime::new(*tick), &time_map());
      assert_eq!(result, Err(EditError::ZeroLengthResult));
    }
    assert_eq!(track.clips().len(), 1);
    assert!(!track.journal().can_undo());
    assert!(events.borrow().is_empty());
  }

  #[test]
  pub fn split_clip_failure_rolls_back() {
    let (mut track, id, _) = track_with_clip();
    track
      .change_clip_length(id, TicksTime::new(200))
      .unwrap();
    let before = track.checkpoint().unwrap();

    // tick 150 is beyond the 4800 buffer frames
    assert!(track.split_clip(id, TicksTime::new(150), &time_map()).is_err());
    assert_eq!(track.checkpoint().unwrap(), before);
    assert_eq!(track.journal().undo_len(), 1);
    assert!(!track.journal().is_open());
  }

  #[test]
  pub fn delete_section_clamps_to_clip_end() {
    let (mut track, id, events) = track_with_clip();
    let removed = track
      .delete_section(id, TicksTime::new(90), TicksTime::new(120), &time_map())
      .unwrap();
    assert_eq!(removed, TicksTime::new(10));
    assert_eq!(track.clip(id).unwrap().get_length(), TicksTime::new(90));
    assert_eq!(track.clip(id).unwrap().frame_count().unwrap(), 4320);
    assert_eq!(*events.borrow(), vec![(id, ClipEvent::Changed)]);
  }

  #[test]
  pub fn delete_section_outside_clip() {
    let (mut track, id, _) = track_with_clip();
    let result = track.delete_section(id, TicksTime::new(110), TicksTime::new(120), &time_map());
    assert!(result.is_err());
    let result = track.delete_section(id, TicksTime::new(50), TicksTime::new(50), &time_map());
    assert!(result.is_err());
    let result = track.delete_section(id, TicksTime::zero(), TicksTime::new(150), &time_map());
    assert_eq!(result, Err(EditError::ZeroLengthResult));
    assert!(!track.journal().can_undo());
  }

  #[test]
  pub fn move_section() {
    let (mut track, id, _) = track_with_clip();
    track
      .move_section(id, TicksTime::new(10), TicksTime::new(20), 30, &time_map())
      .unwrap();
    assert_eq!(track.clip(id).unwrap().get_length(), TicksTime::new(100));
    assert_eq!(track.journal().undo_len(), 1);

    let result = track.move_section(id, TicksTime::zero(), TicksTime::new(20), 30, &time_map());
    assert!(result.is_err());
    assert_eq!(track.journal().undo_len(), 1);
  }

  #[test]
  pub fn reverse_clip_is_not_journalled() {
    let (mut track, id, events) = track_with_clip();
    assert_eq!(track.reverse_clip(id), Ok(true));
    assert!(!track.journal().can_undo());
    assert_eq!(*events.borrow(), vec![(id, ClipEvent::Reversed)]);
  }

  #[test]
  pub fn set_sample_file() {
    let (mut track, id, _) = track_with_clip();
    let loader = FramesLoader;

    let change = track
      .set_sample_file(id, Path::new(""), &loader, &time_map())
      .unwrap();
    assert_eq!(change, SampleFileChange::Ignored);

    track.change_clip_length(id, TicksTime::new(10)).unwrap();
    let change = track
      .set_sample_file(id, Path::new("/samples/loop.wav"), &loader, &time_map())
      .unwrap();
    assert_eq!(change, SampleFileChange::Reset(TicksTime::new(100)));

    let change = track
      .set_sample_file(id, Path::new("/samples/960.wav"), &loader, &time_map())
      .unwrap();
    assert_eq!(change, SampleFileChange::Loaded(TicksTime::new(20)));
    assert_eq!(track.clip(id).unwrap().get_name(), "960");
    assert_eq!(track.journal().undo_len(), 3);
  }

  #[test]
  pub fn set_same_sample_file_twice() {
    let (mut track, id, _) = track_with_clip();
    let data = track.clip(id).unwrap().buffer().read().unwrap().data().to_vec();
    let path = Path::new("/samples/loop.wav");

    for _ in 0..2 {
      let change = track
        .set_sample_file(id, path, &FramesLoader, &time_map())
        .unwrap();
      assert_eq!(change, SampleFileChange::Reset(TicksTime::new(100)));
      let clip = track.clip(id).unwrap();
      assert_eq!(clip.get_length(), TicksTime::new(100));
      assert_eq!(clip.buffer().read().unwrap().data(), data.as_slice());
    }
  }

  #[test]
  pub fn set_sample_file_load_failure() {
    let (mut track, id, _) = track_with_clip();
    let result = track.set_sample_file(id, Path::new("/samples/broken.wav"), &FramesLoader, &time_map());
    match result {
      Err(EditError::Load { .. }) => {}
      other => panic!("unexpected {:?}", other),
    }
    assert_eq!(track.clip(id).unwrap().get_length(), TicksTime::new(100));
    assert!(!track.journal().can_undo());
  }

  #[test]
  pub fn dropped_transaction_rolls_back() {
    let (mut track, id, _) = track_with_clip();
    let redo = track.checkpoint().unwrap();
    track.journal_mut().push_redo(redo);
    let before = track.checkpoint().unwrap();
    {
      let mut edit = track.begin_edit().unwrap();
      edit
        .find_clip_mut(id)
        .unwrap()
        .change_length(TicksTime::new(7))
        .unwrap();
      assert_eq!(edit.begin_edit().err(), Some(EditError::CheckpointOpen));
    }
    assert_eq!(track.checkpoint().unwrap(), before);
    assert!(!track.journal().can_undo());
    assert!(track.journal().can_redo());
  }

  #[test]
  pub fn unknown_clip() {
    let (mut track, _, _) = track_with_clip();
    let other = ClipId::new();
    assert_eq!(
      track.reverse_clip(other),
      Err(EditError::ClipNotFound { id: other })
    );
  }
}
