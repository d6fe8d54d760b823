use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use failure::Error;

use crate::error::{EditError, EditResult};
use crate::time::{Frames, SampleRate};

/// Buffer shared between the editor and the audio engine. Mutations take the
/// write lock, so the engine never observes a half edited buffer.
pub type SharedBuffer = Arc<RwLock<SampleBuffer>>;

/// Interleaved audio frames of one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
  data: Vec<f32>,
  channels: usize,
  sample_rate: SampleRate,
  reversed: bool,
  audio_file: Option<PathBuf>,
}

impl SampleBuffer {
  pub fn new(data: Vec<f32>, channels: usize, sample_rate: SampleRate) -> SampleBuffer {
    assert!(channels > 0);
    debug_assert_eq!(data.len() % channels, 0);
    SampleBuffer {
      data,
      channels,
      sample_rate,
      reversed: false,
      audio_file: None,
    }
  }

  pub fn silence(frames: Frames, channels: usize, sample_rate: SampleRate) -> SampleBuffer {
    SampleBuffer::new(vec![0.0; frames * channels], channels, sample_rate)
  }

  pub fn with_audio_file<P>(mut self, path: P) -> SampleBuffer
  where
    P: Into<PathBuf>,
  {
    self.audio_file = Some(path.into());
    self
  }

  pub fn frame_count(&self) -> Frames {
    self.data.len() / self.channels
  }

  pub fn sample_rate(&self) -> SampleRate {
    self.sample_rate
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  pub fn data(&self) -> &[f32] {
    self.data.as_slice()
  }

  pub fn audio_file(&self) -> Option<&Path> {
    self.audio_file.as_deref()
  }

  pub fn reversed(&self) -> bool {
    self.reversed
  }

  pub fn set_reversed(&mut self, reversed: bool) {
    self.reversed = reversed;
  }

  /// Keeps the frames in `[start, end)`.
  pub fn trim(&mut self, start: Frames, end: Frames) -> EditResult<()> {
    self.check_range(start, end)?;
    self.data.truncate(end * self.channels);
    self.data.drain(..start * self.channels);
    Ok(())
  }

  /// Deletes the frames in `[start, end)`, joining what remains.
  pub fn remove_section(&mut self, start: Frames, end: Frames) -> EditResult<()> {
    self.check_range(start, end)?;
    self.data.drain(start * self.channels..end * self.channels);
    Ok(())
  }

  /// Lifts the frames in `[start, end)` out of the buffer and reinserts them
  /// `delta` frames away. The destination is clamped to the buffer bounds.
  pub fn move_section(&mut self, start: Frames, end: Frames, delta: i64) -> EditResult<()> {
    self.check_range(start, end)?;
    let section: Vec<f32> = self
      .data
      .drain(start * self.channels..end * self.channels)
      .collect();
    let remaining = self.frame_count() as i64;
    let target = (start as i64 + delta).max(0).min(remaining) as usize;
    let offset = target * self.channels;
    self.data.splice(offset..offset, section);
    Ok(())
  }

  /// Replaces the frames and the source file, keeping the direction flag.
  pub fn replace_with(&mut self, other: SampleBuffer) {
    let reversed = self.reversed;
    *self = other;
    self.reversed = reversed;
  }

  pub fn into_shared(self) -> SharedBuffer {
    Arc::new(RwLock::new(self))
  }

  fn check_range(&self, start: Frames, end: Frames) -> EditResult<()> {
    let frames = self.frame_count();
    if start >= end || end > frames {
      Err(EditError::InvalidRange {
        start: start as u64,
        end: end as u64,
        limit: frames as u64,
      })
    } else {
      Ok(())
    }
  }
}

/// Lock access returning edit errors instead of poisoning panics.
pub trait BufferAccess {
  fn read_buffer(&self) -> EditResult<RwLockReadGuard<'_, SampleBuffer>>;
  fn write_buffer(&self) -> EditResult<RwLockWriteGuard<'_, SampleBuffer>>;
}

impl BufferAccess for SharedBuffer {
  fn read_buffer(&self) -> EditResult<RwLockReadGuard<'_, SampleBuffer>> {
    self.read().map_err(|_| EditError::BufferLock)
  }

  fn write_buffer(&self) -> EditResult<RwLockWriteGuard<'_, SampleBuffer>> {
    self.write().map_err(|_| EditError::BufferLock)
  }
}

/// Decodes audio files into sample buffers. Implemented by the host.
pub trait SampleLoader {
  fn load(&self, path: &Path) -> Result<SampleBuffer, Error>;
}
