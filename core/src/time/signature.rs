use super::ticks::DEFAULT_TICKS_PER_BAR;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signature {
  num_beats: u8,  // numerator
  note_value: u8, // denominator
}

impl Signature {
  pub fn new(num_beats: u8, note_value: u8) -> Signature {
    assert!(num_beats > 0);
    assert!(note_value > 0 && note_value <= 16);
    Signature {
      num_beats,
      note_value,
    }
  }

  pub fn get_num_beats(&self) -> u8 {
    self.num_beats
  }

  pub fn get_note_value(&self) -> u8 {
    self.note_value
  }

  pub fn ticks_per_beat(&self) -> u64 {
    DEFAULT_TICKS_PER_BAR / u64::from(self.note_value)
  }

  pub fn ticks_per_bar(&self) -> u64 {
    self.ticks_per_beat() * u64::from(self.num_beats)
  }
}

impl Default for Signature {
  fn default() -> Signature {
    Signature::new(4, 4)
  }
}

#[cfg(test)]
mod test {

  use super::Signature;

  #[test]
  pub fn signature_new() {
    let signature = Signature::new(3, 4);
    assert_eq!(signature.get_num_beats(), 3);
    assert_eq!(signature.get_note_value(), 4);
  }

  #[test]
  pub fn ticks_per_bar() {
    assert_eq!(Signature::new(4, 4).ticks_per_bar(), 192);
    assert_eq!(Signature::new(3, 4).ticks_per_bar(), 144);
    assert_eq!(Signature::new(6, 8).ticks_per_bar(), 144);
  }
}
