use crate::time::TicksTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
  Idle,
  /// Pointer held down, the range follows it.
  Selecting,
  /// Released with a non-empty range.
  Done,
}

/// Tick range picked with the pointer, relative to the clip start.
#[derive(Debug, Clone)]
pub struct Selection {
  state: SelectionState,
  anchor: TicksTime,
  start: TicksTime,
  end: TicksTime,
}

impl Default for Selection {
  fn default() -> Selection {
    Selection::new()
  }
}

impl Selection {
  pub fn new() -> Selection {
    Selection {
      state: SelectionState::Idle,
      anchor: TicksTime::zero(),
      start: TicksTime::zero(),
      end: TicksTime::zero(),
    }
  }

  pub fn get_state(&self) -> SelectionState {
    self.state
  }

  pub fn is_selecting(&self) -> bool {
    self.state == SelectionState::Selecting
  }

  pub fn get_start(&self) -> TicksTime {
    self.start
  }

  pub fn get_end(&self) -> TicksTime {
    self.end
  }

  pub fn is_empty(&self) -> bool {
    self.start >= self.end
  }

  pub fn press(&mut self, tick: TicksTime) {
    self.state = SelectionState::Selecting;
    self.anchor = tick;
    self.start = tick;
    self.end = tick;
  }

  /// Stretches the range between the press point and `tick`.
  pub fn drag(&mut self, tick: TicksTime) {
    if self.state != SelectionState::Selecting {
      return;
    }
    if tick > self.anchor {
      self.start = self.anchor;
      self.end = tick;
    } else {
      self.start = tick;
      self.end = self.anchor;
    }
  }

  pub fn release(&mut self) {
    if self.state == SelectionState::Selecting {
      self.state = if self.is_empty() {
        SelectionState::Idle
      } else {
        SelectionState::Done
      };
    }
  }

  pub fn clear(&mut self) {
    *self = Selection::new();
  }

  /// The selected range, if there is one.
  pub fn range(&self) -> Option<(TicksTime, TicksTime)> {
    if self.is_empty() {
      None
    } else {
      Some((self.start, self.end))
    }
  }

  /// The range as a delete would use it on a clip of `length` ticks: an end
  /// past the clip is pulled back when the start is still inside.
  pub fn clamped(&self, length: TicksTime) -> Option<(TicksTime, TicksTime)> {
    let (start, end) = self.range()?;
    let end = if end > length && start < length { length } else { end };
    if start < end && end <= length {
      Some((start, end))
    } else {
      None
    }
  }
}

#[cfg(test)]
mod test {

  use super::{Selection, SelectionState};
  use crate::time::TicksTime;

  fn ticks(value: u64) -> TicksTime {
    TicksTime::new(value)
  }

  #[test]
  pub fn select_forward() {
    let mut selection = Selection::new();
    selection.press(ticks(10));
    assert_eq!(selection.get_state(), SelectionState::Selecting);
    assert_eq!(selection.range(), None);

    selection.drag(ticks(30));
    selection.release();
    assert_eq!(selection.get_state(), SelectionState::Done);
    assert_eq!(selection.range(), Some((ticks(10), ticks(30))));
  }

  #[test]
  pub fn select_backwards() {
    let mut selection = Selection::new();
    selection.press(ticks(50));
    selection.drag(ticks(70));
    selection.drag(ticks(20));
    assert_eq!(selection.range(), Some((ticks(20), ticks(50))));
  }

  #[test]
  pub fn empty_release_goes_idle() {
    let mut selection = Selection::new();
    selection.press(ticks(50));
    selection.release();
    assert_eq!(selection.get_state(), SelectionState::Idle);
  }

  #[test]
  pub fn drag_without_press() {
    let mut selection = Selection::new();
    selection.drag(ticks(20));
    assert!(selection.is_empty());
    assert_eq!(selection.get_state(), SelectionState::Idle);
  }

  #[test]
  pub fn clamped() {
    let mut selection = Selection::new();
    selection.press(ticks(90));
    selection.drag(ticks(120));
    assert_eq!(selection.clamped(ticks(100)), Some((ticks(90), ticks(100))));

    selection.press(ticks(110));
    selection.drag(ticks(120));
    assert_eq!(selection.clamped(ticks(100)), None);
  }

  #[test]
  pub fn clear() {
    let mut selection = Selection::new();
    selection.press(ticks(1));
    selection.drag(ticks(2));
    selection.clear();
    assert_eq!(selection.get_state(), SelectionState::Idle);
    assert_eq!(selection.range(), None);
  }
}
