use std::{
  cmp::{min, Ordering},
  ops::{Add, AddAssign, Sub, SubAssign},
};

/// Ticks in one bar of a 4/4 signature. Every timeline position is
/// expressed with this resolution.
pub const DEFAULT_TICKS_PER_BAR: u64 = 192;

#[derive(Debug, Eq, Copy, Clone, Hash, Default)]
pub struct TicksTime(u64);

impl TicksTime {
  pub fn new(ticks: u64) -> TicksTime {
    TicksTime(ticks)
  }

  pub fn zero() -> TicksTime {
    TicksTime(0)
  }

  pub fn is_zero(&self) -> bool {
    self.0 == 0
  }

  /// Start of the bar containing this position.
  pub fn bar_start(&self, ticks_per_bar: u64) -> TicksTime {
    TicksTime(self.0 - self.0 % ticks_per_bar)
  }

  /// Shift by a signed amount of ticks, saturating at zero.
  pub fn offset(&self, delta: i64) -> TicksTime {
    if delta < 0 {
      TicksTime(self.0.saturating_sub(delta.unsigned_abs()))
    } else {
      TicksTime(self.0.saturating_add(delta as u64))
    }
  }
}

impl Ord for TicksTime {
  fn cmp(&self, other: &TicksTime) -> Ordering {
    self.0.cmp(&other.0)
  }
}

impl PartialOrd for TicksTime {
  fn partial_cmp(&self, other: &TicksTime) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for TicksTime {
  fn eq(&self, other: &TicksTime) -> bool {
    self.0 == other.0
  }
}

impl Add for TicksTime {
  type Output = TicksTime;
  fn add(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 + rhs.0)
  }
}

impl AddAssign for TicksTime {
  fn add_assign(&mut self, rhs: TicksTime) {
    *self = *self + rhs;
  }
}

impl Sub for TicksTime {
  type Output = TicksTime;
  fn sub(self, rhs: TicksTime) -> Self {
    TicksTime::new(self.0 - min(self.0, rhs.0))
  }
}

impl SubAssign for TicksTime {
  fn sub_assign(&mut self, rhs: TicksTime) {
    *self = *self - rhs;
  }
}

impl From<u64> for TicksTime {
  fn from(item: u64) -> Self {
    TicksTime(item)
  }
}

impl From<TicksTime> for f64 {
  fn from(item: TicksTime) -> Self {
    item.0 as f64
  }
}

impl From<TicksTime> for u64 {
  fn from(item: TicksTime) -> Self {
    item.0
  }
}

impl From<TicksTime> for i64 {
  fn from(item: TicksTime) -> Self {
    item.0 as i64
  }
}
