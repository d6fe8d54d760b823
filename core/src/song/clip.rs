use std::fmt;
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::{BufferAccess, SampleBuffer, SampleLoader, SharedBuffer};
use crate::error::{EditError, EditResult};
use crate::time::{Frames, SampleRate, TicksTime, TimeMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(Uuid);

impl ClipId {
  pub fn new() -> ClipId {
    ClipId(Uuid::new_v4())
  }
}

impl Default for ClipId {
  fn default() -> ClipId {
    ClipId::new()
  }
}

impl fmt::Display for ClipId {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// The persisted form of a clip, owned by the project serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipState {
  pub position: u64,
  pub length: u64,
  pub file: Option<PathBuf>,
  pub reversed: bool,
}

/// Full copy of a clip, used by the journal to undo edits.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSnapshot {
  id: ClipId,
  name: String,
  position: TicksTime,
  length: TicksTime,
  recording: bool,
  buffer: SampleBuffer,
}

impl ClipSnapshot {
  pub fn get_id(&self) -> ClipId {
    self.id
  }

  pub fn get_length(&self) -> TicksTime {
    self.length
  }
}

/// A positioned region of audio on a track.
///
/// Positions handed to the edit operations are relative to the clip start,
/// so a valid tick lies in `[0, length]`.
#[derive(Debug)]
pub struct SampleClip {
  id: ClipId,
  name: String,
  position: TicksTime,
  length: TicksTime,
  buffer: SharedBuffer,
  recording: bool,
}

impl SampleClip {
  /// Creates a clip as long as its buffer.
  pub fn new(buffer: SampleBuffer, position: TicksTime, time_map: &TimeMap) -> EditResult<SampleClip> {
    let length = time_map.frames_to_ticks(buffer.frame_count(), buffer.sample_rate());
    SampleClip::with_length(buffer, position, length)
  }

  pub fn with_length(
    buffer: SampleBuffer,
    position: TicksTime,
    length: TicksTime,
  ) -> EditResult<SampleClip> {
    if length.is_zero() {
      return Err(EditError::ZeroLengthResult);
    }
    Ok(SampleClip {
      id: ClipId::new(),
      name: name_of(buffer.audio_file()),
      position,
      length,
      buffer: buffer.into_shared(),
      recording: false,
    })
  }

  /// Rebuilds a clip from its persisted form.
  pub fn from_state<L>(state: &ClipState, loader: &L) -> EditResult<SampleClip>
  where
    L: SampleLoader + ?Sized,
  {
    let path = state.file.as_ref().ok_or_else(|| EditError::Load {
      cause: "the clip has no sample file".to_string(),
    })?;
    let mut buffer = load_sample(loader, path)?;
    buffer.set_reversed(state.reversed);
    SampleClip::with_length(
      buffer,
      TicksTime::new(state.position),
      TicksTime::new(state.length),
    )
  }

  pub(crate) fn from_snapshot(snapshot: ClipSnapshot) -> SampleClip {
    SampleClip {
      id: snapshot.id,
      name: snapshot.name,
      position: snapshot.position,
      length: snapshot.length,
      buffer: snapshot.buffer.into_shared(),
      recording: snapshot.recording,
    }
  }

  pub fn get_id(&self) -> ClipId {
    self.id
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_position(&self) -> TicksTime {
    self.position
  }

  pub fn set_position(&mut self, position: TicksTime) {
    self.position = position;
  }

  pub fn get_length(&self) -> TicksTime {
    self.length
  }

  /// Timeline position right after the last tick of the clip.
  pub fn get_end(&self) -> TicksTime {
    self.position + self.length
  }

  pub fn is_recording(&self) -> bool {
    self.recording
  }

  pub fn set_recording(&mut self, recording: bool) {
    self.recording = recording;
  }

  /// Handle for the audio engine. Reads must go through the lock.
  pub fn buffer(&self) -> &SharedBuffer {
    &self.buffer
  }

  pub fn frame_count(&self) -> EditResult<Frames> {
    Ok(self.buffer.read_buffer()?.frame_count())
  }

  pub fn sample_rate(&self) -> EditResult<SampleRate> {
    Ok(self.buffer.read_buffer()?.sample_rate())
  }

  pub fn audio_file(&self) -> EditResult<Option<PathBuf>> {
    Ok(self.buffer.read_buffer()?.audio_file().map(Path::to_path_buf))
  }

  pub fn is_reversed(&self) -> EditResult<bool> {
    Ok(self.buffer.read_buffer()?.reversed())
  }

  pub fn change_length(&mut self, length: TicksTime) -> EditResult<()> {
    if length.is_zero() {
      return Err(EditError::ZeroLengthResult);
    }
    self.length = length;
    Ok(())
  }

  /// Length the buffer covers at the current tempo.
  pub fn buffer_length(&self, time_map: &TimeMap) -> EditResult<TicksTime> {
    let buffer = self.buffer.read_buffer()?;
    Ok(time_map.frames_to_ticks(buffer.frame_count(), buffer.sample_rate()))
  }

  pub fn reset_length(&mut self, time_map: &TimeMap) -> EditResult<TicksTime> {
    let length = self.buffer_length(time_map)?;
    self.change_length(length)?;
    Ok(length)
  }

  /// Cuts the clip at `tick`, keeping the head and returning the tail as a
  /// new clip that starts where the cut happened.
  pub fn split_off(&mut self, tick: TicksTime, time_map: &TimeMap) -> EditResult<SampleClip> {
    if tick.is_zero() || tick >= self.length {
      return Err(EditError::ZeroLengthResult);
    }

    let (split_frame, tail_buffer) = {
      let buffer = self.buffer.read_buffer()?;
      let split_frame = time_map.tick_to_frame(tick, buffer.sample_rate());
      let mut tail = buffer.clone();
      tail.trim(split_frame, buffer.frame_count())?;
      (split_frame, tail)
    };

    self.buffer.write_buffer()?.trim(0, split_frame)?;

    let tail = SampleClip {
      id: ClipId::new(),
      name: self.name.clone(),
      position: self.position + tick,
      length: self.length - tick,
      buffer: tail_buffer.into_shared(),
      recording: false,
    };
    self.length = tick;

    Ok(tail)
  }

  /// Deletes `[start, end)` from the clip and joins the remaining audio.
  /// Returns the removed length.
  pub fn remove_section(
    &mut self,
    start: TicksTime,
    end: TicksTime,
    time_map: &TimeMap,
  ) -> EditResult<TicksTime> {
    self.check_section(start, end)?;
    let removed = end - start;
    if removed >= self.length {
      return Err(EditError::ZeroLengthResult);
    }

    {
      let mut buffer = self.buffer.write_buffer()?;
      let sample_rate = buffer.sample_rate();
      let start_frame = time_map.tick_to_frame(start, sample_rate);
      let end_frame = time_map
        .tick_to_frame(end, sample_rate)
        .min(buffer.frame_count());
      buffer.remove_section(start_frame, end_frame)?;
    }

    self.length -= removed;
    Ok(removed)
  }

  /// Moves the audio in `[start, end)` by `delta` ticks inside the clip.
  pub fn move_section(
    &mut self,
    start: TicksTime,
    end: TicksTime,
    delta: i64,
    time_map: &TimeMap,
  ) -> EditResult<()> {
    self.check_section(start, end)?;
    if start.is_zero() {
      return Err(EditError::InvalidRange {
        start: start.into(),
        end: end.into(),
        limit: self.length.into(),
      });
    }

    let length = {
      let mut buffer = self.buffer.write_buffer()?;
      let sample_rate = buffer.sample_rate();
      let start_frame = time_map.tick_to_frame(start, sample_rate);
      let end_frame = time_map
        .tick_to_frame(end, sample_rate)
        .min(buffer.frame_count());
      let delta_frames = time_map.tick_delta_to_frames(delta, sample_rate);
      buffer.move_section(start_frame, end_frame, delta_frames)?;
      time_map.frames_to_ticks(buffer.frame_count(), sample_rate)
    };

    if !length.is_zero() {
      self.length = length;
    }
    Ok(())
  }

  /// Flips the playback direction. Returns the new direction.
  pub fn toggle_reversed(&mut self) -> EditResult<bool> {
    let mut buffer = self.buffer.write_buffer()?;
    let reversed = !buffer.reversed();
    buffer.set_reversed(reversed);
    Ok(reversed)
  }

  /// Swaps in the audio of another file and takes over its length.
  pub fn replace_buffer(&mut self, buffer: SampleBuffer, time_map: &TimeMap) -> EditResult<()> {
    let length = time_map.frames_to_ticks(buffer.frame_count(), buffer.sample_rate());
    if length.is_zero() {
      return Err(EditError::ZeroLengthResult);
    }
    let name = name_of(buffer.audio_file());
    self.buffer.write_buffer()?.replace_with(buffer);
    self.name = name;
    self.length = length;
    Ok(())
  }

  pub fn state(&self) -> EditResult<ClipState> {
    let buffer = self.buffer.read_buffer()?;
    Ok(ClipState {
      position: self.position.into(),
      length: self.length.into(),
      file: buffer.audio_file().map(Path::to_path_buf),
      reversed: buffer.reversed(),
    })
  }

  /// Applies a persisted state. The sample is only reloaded when the file
  /// reference differs from the current one.
  pub fn apply_state<L>(&mut self, state: &ClipState, loader: &L) -> EditResult<()>
  where
    L: SampleLoader + ?Sized,
  {
    if state.length == 0 {
      return Err(EditError::ZeroLengthResult);
    }
    let current_file = self.audio_file()?;
    let replacement = match &state.file {
      Some(path) if current_file.as_ref() != Some(path) => Some(load_sample(loader, path)?),
      _ => None,
    };

    {
      let mut buffer = self.buffer.write_buffer()?;
      if let Some(replacement) = replacement {
        self.name = name_of(replacement.audio_file());
        buffer.replace_with(replacement);
      }
      buffer.set_reversed(state.reversed);
    }

    self.position = TicksTime::new(state.position);
    self.length = TicksTime::new(state.length);
    Ok(())
  }

  pub(crate) fn snapshot(&self) -> EditResult<ClipSnapshot> {
    Ok(ClipSnapshot {
      id: self.id,
      name: self.name.clone(),
      position: self.position,
      length: self.length,
      recording: self.recording,
      buffer: self.buffer.read_buffer()?.clone(),
    })
  }

  /// Restores a snapshot of this clip. The buffer handle stays the same so
  /// the engine keeps reading the right clip.
  pub(crate) fn restore(&mut self, snapshot: &ClipSnapshot) {
    debug_assert_eq!(self.id, snapshot.id);
    self.name = snapshot.name.clone();
    self.position = snapshot.position;
    self.length = snapshot.length;
    self.recording = snapshot.recording;
    let restored = match self.buffer.write() {
      Ok(mut buffer) => {
        *buffer = snapshot.buffer.clone();
        true
      }
      Err(_) => false,
    };
    if !restored {
      // poisoned by a panicking reader, start over with a fresh handle
      self.buffer = snapshot.buffer.clone().into_shared();
    }
  }

  fn check_section(&self, start: TicksTime, end: TicksTime) -> EditResult<()> {
    if start >= end || end > self.length {
      Err(EditError::InvalidRange {
        start: start.into(),
        end: end.into(),
        limit: self.length.into(),
      })
    } else {
      Ok(())
    }
  }
}

pub(crate) fn load_sample<L>(loader: &L, path: &Path) -> EditResult<SampleBuffer>
where
  L: SampleLoader + ?Sized,
{
  loader
    .load(path)
    .map(|buffer| match buffer.audio_file() {
      Some(_) => buffer,
      None => buffer.with_audio_file(path),
    })
    .map_err(|err| EditError::Load {
      cause: err.to_string(),
    })
}

fn name_of(path: Option<&Path>) -> String {
  path
    .and_then(Path::file_stem)
    .map(|stem| stem.to_string_lossy().into_owned())
    .unwrap_or_default()
}
