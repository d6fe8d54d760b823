use failure::Fail;

use crate::song::clip::ClipId;

#[derive(Debug, Fail, PartialEq)]
pub enum EditError {
  #[fail(display = "Invalid range [{}, {}) for an extent of {}", start, end, limit)]
  InvalidRange { start: u64, end: u64, limit: u64 },

  #[fail(display = "No clip is bound to the editor")]
  NoActiveClip,

  #[fail(display = "The edit would leave a clip without length")]
  ZeroLengthResult,

  #[fail(display = "An edit transaction is already open on this track")]
  CheckpointOpen,

  #[fail(display = "Clip not found: {}", id)]
  ClipNotFound { id: ClipId },

  #[fail(display = "Failed to lock the sample buffer")]
  BufferLock,

  #[fail(display = "Failed to load the sample: {}", cause)]
  Load { cause: String },
}

pub type EditResult<T> = Result<T, EditError>;
