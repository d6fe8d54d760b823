use crate::time::{
  ticks::DEFAULT_TICKS_PER_BAR, Frames, SampleRate, Signature, Tempo, TicksTime,
};

/// Converts between timeline ticks and sample buffer frames for the song
/// tempo. The conversion only depends on the tempo, the signature is kept
/// to express positions in bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeMap {
  signature: Signature,
  tempo: Tempo,
}

impl TimeMap {
  pub fn new(signature: Signature, tempo: Tempo) -> TimeMap {
    TimeMap { signature, tempo }
  }

  pub fn get_signature(&self) -> Signature {
    self.signature
  }

  pub fn get_tempo(&self) -> Tempo {
    self.tempo
  }

  pub fn ticks_per_bar(&self) -> u64 {
    self.signature.ticks_per_bar()
  }

  pub fn frames_per_tick(&self, sample_rate: SampleRate) -> f64 {
    f64::from(sample_rate) * 60.0 * 4.0 / (f64::from(self.tempo) * DEFAULT_TICKS_PER_BAR as f64)
  }

  pub fn tick_to_frame(&self, tick: TicksTime, sample_rate: SampleRate) -> Frames {
    (f64::from(tick) * self.frames_per_tick(sample_rate)).round() as Frames
  }

  /// The one place where a frame extent becomes a clip length. Callers pass
  /// the sample rate of the buffer the frames belong to.
  pub fn frames_to_ticks(&self, frames: Frames, sample_rate: SampleRate) -> TicksTime {
    TicksTime::new((frames as f64 / self.frames_per_tick(sample_rate)).round() as u64)
  }

  pub fn tick_delta_to_frames(&self, delta: i64, sample_rate: SampleRate) -> i64 {
    (delta as f64 * self.frames_per_tick(sample_rate)).round() as i64
  }
}

impl Default for TimeMap {
  fn default() -> TimeMap {
    TimeMap::new(Signature::default(), Tempo::new(140))
  }
}
