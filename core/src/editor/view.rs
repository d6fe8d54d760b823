use log::debug;

use crate::config::EditorConfig;
use crate::time::{TicksTime, DEFAULT_TICKS_PER_BAR};

/// Keyboard moves of the playhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
  Left,
  Right,
  Home,
}

/// Horizontal mapping between the editor area and the clip timeline.
///
/// `x` is measured in pixels from the left border of the editor, ticks from
/// the clip start. The first `left_margin` pixels are not part of the
/// timeline.
#[derive(Debug, Clone)]
pub struct View {
  base_pixels_per_bar: f64,
  zoom_levels: Vec<f64>,
  zoom: usize,
  ticks_per_bar: u64,
  left_margin: i64,
  width: i64,
  scroll: TicksTime,
  navigation_step: u64,
}

impl View {
  pub fn new(config: &EditorConfig) -> View {
    let zoom_levels = if config.zoom_levels.is_empty() {
      vec![1.0]
    } else {
      config.zoom_levels.clone()
    };
    let zoom = config.default_zoom.min(zoom_levels.len() - 1);
    View {
      base_pixels_per_bar: config.pixels_per_bar,
      zoom_levels,
      zoom,
      ticks_per_bar: DEFAULT_TICKS_PER_BAR,
      left_margin: config.left_margin,
      width: 0,
      scroll: TicksTime::zero(),
      navigation_step: config.navigation_step,
    }
  }

  pub fn pixels_per_bar(&self) -> f64 {
    self.base_pixels_per_bar * self.zoom_levels[self.zoom]
  }

  pub fn get_zoom(&self) -> usize {
    self.zoom
  }

  pub fn zoom_levels(&self) -> &[f64] {
    self.zoom_levels.as_slice()
  }

  pub fn set_zoom(&mut self, zoom: usize) -> bool {
    if zoom >= self.zoom_levels.len() {
      return false;
    }
    debug!("Zoom level {}", self.zoom_levels[zoom]);
    self.zoom = zoom;
    true
  }

  /// Zooms keeping the tick under `x` where it is.
  pub fn zoom_at(&mut self, zoom: usize, x: i64) -> bool {
    let before = self.unscrolled_ticks(x);
    if !self.set_zoom(zoom) {
      return false;
    }
    let after = self.unscrolled_ticks(x);
    self.scroll = self.scroll.offset(before - after);
    true
  }

  pub fn get_ticks_per_bar(&self) -> u64 {
    self.ticks_per_bar
  }

  pub fn set_ticks_per_bar(&mut self, ticks_per_bar: u64) {
    debug_assert!(ticks_per_bar > 0);
    self.ticks_per_bar = ticks_per_bar;
  }

  pub fn get_left_margin(&self) -> i64 {
    self.left_margin
  }

  pub fn get_width(&self) -> i64 {
    self.width
  }

  pub fn set_width(&mut self, width: i64) {
    self.width = width.max(0);
  }

  pub fn get_scroll(&self) -> TicksTime {
    self.scroll
  }

  pub fn scroll_to(&mut self, tick: TicksTime) {
    self.scroll = tick;
  }

  pub fn x_of_tick(&self, tick: TicksTime) -> i64 {
    let ticks = i64::from(tick) - i64::from(self.scroll);
    self.left_margin + (ticks as f64 * self.pixels_per_bar() / self.ticks_per_bar as f64).floor() as i64
  }

  /// The tick drawn at `x`, or `None` left of the timeline start.
  pub fn tick_of_x(&self, x: i64) -> Option<TicksTime> {
    let ticks = self.unscrolled_ticks(x) + i64::from(self.scroll);
    if ticks < 0 {
      None
    } else {
      Some(TicksTime::new(ticks as u64))
    }
  }

  /// Ticks that fit in the timeline part of the view.
  pub fn visible_ticks(&self) -> u64 {
    let pixels = (self.width - self.left_margin).max(0);
    (pixels as f64 * self.ticks_per_bar as f64 / self.pixels_per_bar()).floor() as u64
  }

  /// Scrolls so that `playhead` is visible again, to the start of a bar.
  /// Returns whether the view moved.
  pub fn follow(&mut self, playhead: TicksTime) -> bool {
    let visible = self.visible_ticks();
    let scroll = if playhead > self.scroll + TicksTime::new(visible) {
      playhead.bar_start(self.ticks_per_bar)
    } else if playhead < self.scroll {
      (playhead - TicksTime::new(visible)).bar_start(self.ticks_per_bar)
    } else {
      return false;
    };
    let moved = scroll != self.scroll;
    self.scroll = scroll;
    moved
  }

  /// New playhead position after a navigation key.
  pub fn navigate(&self, playhead: TicksTime, navigation: Navigation) -> TicksTime {
    let step = self.navigation_step as i64;
    match navigation {
      Navigation::Left => playhead.offset(-step),
      Navigation::Right => playhead.offset(step),
      Navigation::Home => TicksTime::zero(),
    }
  }

  fn unscrolled_ticks(&self, x: i64) -> i64 {
    let pixels = (x - self.left_margin) as f64;
    (pixels * self.ticks_per_bar as f64 / self.pixels_per_bar()).floor() as i64
  }
}

#[cfg(test)]
mod test {

  use super::{Navigation, View};
  use crate::config::EditorConfig;
  use crate::time::TicksTime;

  fn view() -> View {
    let mut view = View::new(&EditorConfig::default());
    view.set_width(64 + 384);
    view
  }

  #[test]
  pub fn new() {
    let view = view();
    assert_eq!(view.pixels_per_bar(), 192.0);
    assert_eq!(view.get_zoom(), 3);
    assert_eq!(view.get_scroll(), TicksTime::zero());
    assert_eq!(view.visible_ticks(), 384);
  }

  #[test]
  pub fn tick_x_mapping() {
    let mut view = view();
    assert_eq!(view.x_of_tick(TicksTime::zero()), 64);
    assert_eq!(view.x_of_tick(TicksTime::new(96)), 160);
    assert_eq!(view.tick_of_x(160), Some(TicksTime::new(96)));
    assert_eq!(view.tick_of_x(63), None);

    view.scroll_to(TicksTime::new(192));
    assert_eq!(view.x_of_tick(TicksTime::new(192)), 64);
    assert_eq!(view.tick_of_x(32), Some(TicksTime::new(160)));
    for tick in &[0, 1, 95, 300, 1000] {
      let tick = TicksTime::new(*tick);
      assert_eq!(view.tick_of_x(view.x_of_tick(tick)), Some(tick));
    }
  }

  #[test]
  pub fn zoom() {
    let mut view = view();
    assert!(view.set_zoom(4));
    assert_eq!(view.pixels_per_bar(), 384.0);
    assert_eq!(view.tick_of_x(64 + 384), Some(TicksTime::new(192)));
    assert!(!view.set_zoom(7));
    assert_eq!(view.get_zoom(), 4);
  }

  #[test]
  pub fn zoom_at_keeps_pointer_tick() {
    let mut view = view();
    view.scroll_to(TicksTime::new(384));
    let x = 64 + 192;
    let tick = view.tick_of_x(x);
    assert!(view.zoom_at(4, x));
    assert_eq!(view.tick_of_x(x), tick);
  }

  #[test]
  pub fn follow() {
    let mut view = view();
    assert!(!view.follow(TicksTime::new(200)));

    assert!(view.follow(TicksTime::new(500)));
    assert_eq!(view.get_scroll(), TicksTime::new(384));

    assert!(view.follow(TicksTime::new(100)));
    assert_eq!(view.get_scroll(), TicksTime::zero());
  }

  #[test]
  pub fn follow_back_keeps_playhead_visible() {
    let mut view = view();
    view.scroll_to(TicksTime::new(1920));
    assert!(view.follow(TicksTime::new(1000)));
    assert_eq!(view.get_scroll(), TicksTime::new(576));
    assert!(view.get_scroll() <= TicksTime::new(1000));
  }

  #[test]
  pub fn navigate() {
    let view = view();
    let playhead = TicksTime::new(10);
    assert_eq!(view.navigate(playhead, Navigation::Right), TicksTime::new(26));
    assert_eq!(view.navigate(playhead, Navigation::Left), TicksTime::zero());
    assert_eq!(
      view.navigate(TicksTime::new(40), Navigation::Left),
      TicksTime::new(24)
    );
    assert_eq!(view.navigate(playhead, Navigation::Home), TicksTime::zero());
  }
}
