use log::{debug, info};

use crate::song::{track::Container, ClipRef};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
  Stopped,
  /// Playing or paused.
  Playing,
  Recording,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
  /// Only the clip plays, without monitoring it.
  Solo,
  /// The container of the clip's track plays along.
  Accompany,
}

/// Playback and record requests of the editor, and what it believes the
/// transport is doing for it.
#[derive(Debug, Clone)]
pub struct Playback {
  state: PlaybackState,
  scroll_back: bool,
}

impl Default for Playback {
  fn default() -> Playback {
    Playback::new()
  }
}

impl Playback {
  pub fn new() -> Playback {
    Playback {
      state: PlaybackState::Stopped,
      scroll_back: false,
    }
  }

  pub fn get_state(&self) -> PlaybackState {
    self.state
  }

  pub fn is_recording(&self) -> bool {
    self.state == PlaybackState::Recording
  }

  /// Starts the clip when the transport is stopped, otherwise pauses or
  /// resumes whatever it plays.
  pub fn play<T>(&mut self, transport: &mut T, clip: ClipRef)
  where
    T: Transport + ?Sized,
  {
    if transport.is_stopped() {
      transport.play_clip(clip, true);
    } else {
      transport.toggle_pause();
    }
    if self.state == PlaybackState::Stopped {
      self.state = PlaybackState::Playing;
    }
  }

  pub fn stop<T>(&mut self, transport: &mut T, container: Container)
  where
    T: Transport + ?Sized,
  {
    transport.stop(container);
    if self.state != PlaybackState::Stopped {
      debug!("Playback stopped");
    }
    self.state = PlaybackState::Stopped;
    self.scroll_back = true;
  }

  /// Arms capture and starts the transport. The caller has already
  /// stopped any running playback and marked the clip.
  pub fn record<T>(&mut self, transport: &mut T, clip: ClipRef, container: Container, mode: RecordMode)
  where
    T: Transport + ?Sized,
  {
    info!("Recording into clip {} ({:?})", clip.clip, mode);
    self.state = PlaybackState::Recording;
    transport.record();
    match (mode, container) {
      (RecordMode::Solo, _) => transport.play_clip(clip, false),
      (RecordMode::Accompany, Container::Song) => transport.play_song(),
      (RecordMode::Accompany, Container::Pattern) => transport.play_pattern(),
    }
  }

  /// The engine stopped on its own (end of song, stop from another window).
  /// Returns whether this playback was still running.
  pub fn transport_stopped(&mut self) -> bool {
    if self.state == PlaybackState::Stopped {
      return false;
    }
    debug!("Transport stopped under {:?} playback", self.state);
    self.state = PlaybackState::Stopped;
    self.scroll_back = true;
    true
  }

  /// Whether the view should jump back to the playhead, once.
  pub fn take_scroll_back(&mut self) -> bool {
    std::mem::replace(&mut self.scroll_back, false)
  }

  /// Forgets the state of a clip that is no longer edited.
  pub fn reset(&mut self) {
    self.state = PlaybackState::Stopped;
  }
}
