use std::fmt;

use crate::time::{Signature, TicksTime};

/// Musical position split into bars, beats and remaining ticks.
#[derive(PartialEq, Clone, Copy)]
pub struct BarsTime {
  bars: u32,
  beats: u16,
  ticks: u16,
}

impl BarsTime {
  pub fn new(bars: u32, beats: u16, ticks: u16) -> BarsTime {
    BarsTime { bars, beats, ticks }
  }

  pub fn from_ticks(ticks_time: TicksTime, signature: Signature) -> BarsTime {
    let num_ticks = u64::from(ticks_time);
    let ticks_per_beat = signature.ticks_per_beat();
    let total_beats = num_ticks / ticks_per_beat;
    let num_beats = u64::from(signature.get_num_beats());
    BarsTime {
      bars: (total_beats / num_beats) as u32,
      beats: (total_beats % num_beats) as u16,
      ticks: (num_ticks % ticks_per_beat) as u16,
    }
  }

  pub fn get_bars(&self) -> u32 {
    self.bars
  }

  pub fn get_beats(&self) -> u16 {
    self.beats
  }

  pub fn get_ticks(&self) -> u16 {
    self.ticks
  }

  pub fn to_ticks(&self, signature: Signature) -> TicksTime {
    TicksTime::new(
      u64::from(self.bars) * signature.ticks_per_bar()
        + u64::from(self.beats) * signature.ticks_per_beat()
        + u64::from(self.ticks),
    )
  }
}

impl fmt::Debug for BarsTime {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "{:04}:{:02}:{:03}",
      self.bars + 1,
      self.beats + 1,
      self.ticks
    )
  }
}

#[cfg(test)]
mod test {

  use super::BarsTime;
  use crate::time::{Signature, TicksTime};

  #[test]
  pub fn new() {
    let time = BarsTime::new(10, 1, 20);
    assert_eq!(time.get_bars(), 10);
    assert_eq!(time.get_beats(), 1);
    assert_eq!(time.get_ticks(), 20);
  }

  #[test]
  pub fn from_ticks() {
    let ticks = TicksTime::new(
      144 * 10 + // 10 bars
          48 * 2 + // 2 beats
          30, // 30 ticks
    );

    let time = BarsTime::from_ticks(ticks, Signature::new(3, 4));
    assert_eq!(time.get_bars(), 10);
    assert_eq!(time.get_beats(), 2);
    assert_eq!(time.get_ticks(), 30);
  }

  #[test]
  pub fn to_ticks() {
    let signature = Signature::new(3, 4);
    let ticks = TicksTime::new(123_456);
    let time = BarsTime::from_ticks(ticks, signature);
    assert_eq!(u64::from(time.to_ticks(signature)), 123_456);
  }

  #[test]
  pub fn debug_format() {
    let time = BarsTime::new(0, 2, 7);
    assert_eq!(format!("{:?}", time), "0001:03:007");
  }
}
