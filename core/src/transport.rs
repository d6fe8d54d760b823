use log::debug;

use crate::song::{track::Container, ClipRef};
use crate::time::{BarsTime, Signature, TicksTime};

/// What the audio engine is asked to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
  None,
  /// A single clip, as previewed from the editor.
  Clip(ClipRef),
  Song,
  Pattern,
}

/// Commands the editor issues to the audio engine.
pub trait Transport {
  /// Producing audio right now.
  fn is_playing(&self) -> bool;

  /// Neither playing nor paused.
  fn is_stopped(&self) -> bool;

  /// What was last started.
  fn get_mode(&self) -> PlayMode;

  fn toggle_pause(&mut self);

  /// Plays a single clip. With `monitor` off the clip itself is not heard,
  /// which is what recording into it needs.
  fn play_clip(&mut self, clip: ClipRef, monitor: bool);

  fn play_song(&mut self);

  fn play_pattern(&mut self);

  /// Stops whatever plays in the given container.
  fn stop(&mut self, container: Container);

  /// Arms capture for the next play command.
  fn record(&mut self);
}

/// Transport state kept on the control side, mirroring what was requested
/// from the engine.
#[derive(Debug, Clone)]
pub struct TransportState {
  signature: Signature,

  playing: bool,
  paused: bool,
  recording: bool,
  monitor: bool,

  mode: PlayMode,
  last_stopped: Option<Container>,

  start_position: TicksTime,
  current_position: TicksTime,
}

impl Default for TransportState {
  fn default() -> TransportState {
    TransportState::new(Signature::default())
  }
}

impl TransportState {
  pub fn new(signature: Signature) -> TransportState {
    TransportState {
      signature,

      playing: false,
      paused: false,
      recording: false,
      monitor: true,

      mode: PlayMode::None,
      last_stopped: None,

      start_position: TicksTime::zero(),
      current_position: TicksTime::zero(),
    }
  }

  pub fn set_signature(&mut self, signature: Signature) {
    self.signature = signature;
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn is_recording(&self) -> bool {
    self.recording
  }

  pub fn is_monitoring(&self) -> bool {
    self.monitor
  }

  /// Container of the last `stop` request.
  pub fn last_stopped(&self) -> Option<Container> {
    self.last_stopped
  }

  pub fn set_position(&mut self, position: BarsTime) {
    self.current_position = position.to_ticks(self.signature);
  }

  pub fn get_position(&self) -> BarsTime {
    BarsTime::from_ticks(self.current_position, self.signature)
  }

  pub fn set_ticks(&mut self, position: TicksTime) {
    self.current_position = position;
  }

  pub fn get_ticks(&self) -> TicksTime {
    self.current_position
  }

  fn start(&mut self, mode: PlayMode) {
    debug!("Transport playing {:?}", mode);
    self.mode = mode;
    self.playing = true;
    self.paused = false;
    self.current_position = self.start_position;
  }

  fn reset_position(&mut self) {
    self.current_position = self.start_position;
  }
}

impl Transport for TransportState {
  fn is_playing(&self) -> bool {
    self.playing
  }

  fn is_stopped(&self) -> bool {
    !self.playing && !self.paused
  }

  fn get_mode(&self) -> PlayMode {
    self.mode
  }

  fn toggle_pause(&mut self) {
    if self.playing {
      self.playing = false;
      self.paused = true;
    } else if self.paused {
      self.playing = true;
      self.paused = false;
    }
  }

  fn play_clip(&mut self, clip: ClipRef, monitor: bool) {
    self.monitor = monitor;
    self.start(PlayMode::Clip(clip));
  }

  fn play_song(&mut self) {
    self.monitor = true;
    self.start(PlayMode::Song);
  }

  fn play_pattern(&mut self) {
    self.monitor = true;
    self.start(PlayMode::Pattern);
  }

  fn stop(&mut self, container: Container) {
    debug!("Transport stopped in {:?}", container);
    self.playing = false;
    self.paused = false;
    self.recording = false;
    self.mode = PlayMode::None;
    self.last_stopped = Some(container);
    self.reset_position();
  }

  fn record(&mut self) {
    self.recording = true;
  }
}

#[cfg(test)]
mod test {

  use super::{PlayMode, Transport, TransportState};
  use crate::song::{track::Container, ClipRef};
  use crate::song::clip::ClipId;
  use crate::time::{BarsTime, Signature, TicksTime};

  #[test]
  pub fn new() {
    let transport = TransportState::default();
    assert!(!transport.is_playing());
    assert!(transport.is_stopped());
    assert!(!transport.is_recording());
    assert_eq!(transport.get_mode(), PlayMode::None);
    assert_eq!(transport.get_ticks(), TicksTime::zero());
  }

  #[test]
  pub fn play_and_pause() {
    let mut transport = TransportState::default();
    let clip = ClipRef::new(0, ClipId::new());
    transport.play_clip(clip, true);
    assert!(transport.is_playing());
    assert_eq!(transport.get_mode(), PlayMode::Clip(clip));

    transport.toggle_pause();
    assert!(!transport.is_playing());
    assert!(!transport.is_stopped());
    assert!(transport.is_paused());

    transport.toggle_pause();
    assert!(transport.is_playing());
  }

  #[test]
  pub fn toggle_pause_while_stopped() {
    let mut transport = TransportState::default();
    transport.toggle_pause();
    assert!(transport.is_stopped());
  }

  #[test]
  pub fn stop() {
    let mut transport = TransportState::default();
    transport.record();
    transport.play_pattern();
    transport.set_ticks(TicksTime::new(300));

    transport.stop(Container::Pattern);
    assert!(transport.is_stopped());
    assert!(!transport.is_recording());
    assert_eq!(transport.last_stopped(), Some(Container::Pattern));
    assert_eq!(transport.get_ticks(), TicksTime::zero());
  }

  #[test]
  pub fn position() {
    let mut transport = TransportState::new(Signature::new(3, 4));
    transport.set_position(BarsTime::new(1, 2, 10));
    assert_eq!(transport.get_ticks(), TicksTime::new(144 + 96 + 10));
    assert_eq!(transport.get_position(), BarsTime::new(1, 2, 10));
  }
}
