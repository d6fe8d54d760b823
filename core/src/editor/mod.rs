pub mod playback;
pub mod selection;
pub mod view;

pub use self::playback::{Playback, PlaybackState, RecordMode};
pub use self::selection::{Selection, SelectionState};
pub use self::view::{Navigation, View};

use std::path::Path;

use log::{debug, info};

use crate::audio::SampleLoader;
use crate::config::EditorConfig;
use crate::error::{EditError, EditResult};
use crate::song::{
  clip::ClipId,
  events::ClipEvent,
  track::{SampleFileChange, Track},
  ClipRef, Song,
};
use crate::time::{TicksTime, TimeMap};
use crate::transport::{PlayMode, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
  /// Selects.
  Primary,
  /// Cuts the clip where pressed.
  Secondary,
}

/// Editing front of one sample clip.
///
/// Input arrives as already decoded intents (press at `x`, drag, release,
/// delete, navigate...). Every operation checks that a clip is bound and
/// still exists, and turns failures into a logged no-op: the return value
/// tells whether anything changed.
#[derive(Debug)]
pub struct SampleEditor {
  target: Option<ClipRef>,
  selection: Selection,
  view: View,
  playback: Playback,
  playhead: TicksTime,
}

impl SampleEditor {
  pub fn new(config: &EditorConfig) -> SampleEditor {
    SampleEditor {
      target: None,
      selection: Selection::new(),
      view: View::new(config),
      playback: Playback::new(),
      playhead: TicksTime::zero(),
    }
  }

  /// Binds the editor to a clip, or unbinds it with `None`.
  pub fn set_current_clip(&mut self, song: &Song, target: Option<ClipRef>) -> bool {
    if let Some(clip_ref) = target {
      if !song.contains(clip_ref) {
        debug!("Ignoring unknown clip {}", clip_ref.clip);
        return false;
      }
    }
    self.target = target;
    self.after_clip_change(song);
    true
  }

  pub fn current_clip(&self) -> Option<ClipRef> {
    self.target
  }

  /// The bound clip if it still exists. A clip that went away unbinds the
  /// editor.
  pub fn valid_clip(&mut self, song: &Song) -> Option<ClipRef> {
    let clip_ref = self.target?;
    if song.contains(clip_ref) {
      Some(clip_ref)
    } else {
      info!("Clip {} is gone, unbinding the editor", clip_ref.clip);
      self.unbind();
      None
    }
  }

  /// Reacts to a notification from the track of the bound clip. Returns
  /// whether the editor needs to be redrawn.
  pub fn handle_event(&mut self, clip: ClipId, event: ClipEvent) -> bool {
    match self.target {
      Some(clip_ref) if clip_ref.clip == clip => {
        if event == ClipEvent::Removed {
          self.unbind();
        }
        true
      }
      _ => false,
    }
  }

  pub fn title(&self, song: &Song) -> String {
    match self.target.and_then(|clip_ref| song.clip(clip_ref)) {
      Some(clip) => format!("Sample Editor - {}", clip.get_name()),
      None => "Sample Editor - no sample".to_string(),
    }
  }

  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  pub fn view(&self) -> &View {
    &self.view
  }

  pub fn playback(&self) -> &Playback {
    &self.playback
  }

  pub fn get_playhead(&self) -> TicksTime {
    self.playhead
  }

  pub fn press(&mut self, song: &mut Song, x: i64, button: Button) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    self.sync_view(song.time_map());
    let tick = match self.view.tick_of_x(x) {
      Some(tick) => tick,
      None => return false,
    };

    match button {
      Button::Primary => {
        let length = song
          .clip(clip_ref)
          .map(|clip| clip.get_length())
          .unwrap_or_default();
        if tick > length {
          return false;
        }
        self.selection.press(tick);
        true
      }
      Button::Secondary => {
        let result = with_track(song, clip_ref, |track, time_map| {
          track.split_clip(clip_ref.clip, tick, time_map)
        });
        applied("split", result).is_some()
      }
    }
  }

  pub fn drag(&mut self, song: &Song, x: i64) -> bool {
    if !self.selection.is_selecting() || self.valid_clip(song).is_none() {
      return false;
    }
    self.sync_view(song.time_map());
    let tick = self.view.tick_of_x(x).unwrap_or_default();
    self.selection.drag(tick);
    true
  }

  pub fn release(&mut self) -> bool {
    if !self.selection.is_selecting() {
      return false;
    }
    self.selection.release();
    true
  }

  /// Removes the selected audio from the clip.
  pub fn delete_selection(&mut self, song: &mut Song) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let length = song
      .clip(clip_ref)
      .map(|clip| clip.get_length())
      .unwrap_or_default();
    let (start, end) = match self.selection.clamped(length) {
      Some(range) => range,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, time_map| {
      track.delete_section(clip_ref.clip, start, end, time_map)
    });
    if applied("delete selection", result).is_some() {
      self.selection.clear();
      true
    } else {
      false
    }
  }

  /// Moves the selected audio by `delta` ticks inside the clip.
  pub fn move_selection(&mut self, song: &mut Song, delta: i64) -> bool {
    let (clip_ref, start, end) = match self.selected(song) {
      Some(selected) => selected,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, time_map| {
      track.move_section(clip_ref.clip, start, end, delta, time_map)
    });
    if applied("move selection", result).is_some() {
      self.selection.clear();
      true
    } else {
      false
    }
  }

  pub fn reverse(&mut self, song: &mut Song) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, _| track.reverse_clip(clip_ref.clip));
    applied("reverse", result).is_some()
  }

  /// Loads `path` into the clip, as picked in a file dialog. An empty path
  /// means the dialog was cancelled.
  pub fn open_sample_file<L>(&mut self, song: &mut Song, path: &Path, loader: &L) -> bool
  where
    L: SampleLoader + ?Sized,
  {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, time_map| {
      track.set_sample_file(clip_ref.clip, path, loader, time_map)
    });
    match applied("open sample file", result) {
      Some(SampleFileChange::Loaded(_)) => {
        self.after_clip_change(song);
        true
      }
      Some(SampleFileChange::Reset(_)) => true,
      Some(SampleFileChange::Ignored) | None => false,
    }
  }

  pub fn reset_length(&mut self, song: &mut Song) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, time_map| {
      track.reset_clip_length(clip_ref.clip, time_map)
    });
    applied("reset length", result).is_some()
  }

  pub fn undo(&mut self, song: &mut Song) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, _| track.undo());
    let done = applied("undo", result).unwrap_or(false);
    self.valid_clip(song);
    done
  }

  pub fn redo(&mut self, song: &mut Song) -> bool {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let result = with_track(song, clip_ref, |track, _| track.redo());
    let done = applied("redo", result).unwrap_or(false);
    self.valid_clip(song);
    done
  }

  pub fn navigate(&mut self, navigation: Navigation) -> bool {
    let playhead = self.view.navigate(self.playhead, navigation);
    let moved = playhead != self.playhead;
    self.playhead = playhead;
    moved
  }

  /// Playhead update from the engine. The view follows it while the
  /// transport plays this clip alone, and once after a stop. Accompanied
  /// recording plays the whole container, so the view stays put.
  pub fn update_position<T>(&mut self, song: &mut Song, transport: &T, position: TicksTime) -> bool
  where
    T: Transport + ?Sized,
  {
    self.playhead = position;
    self.sync_transport(song, transport);
    let following = transport.is_playing()
      && self.playback.get_state() != PlaybackState::Stopped
      && self.plays_clip(transport);
    if following || self.playback.take_scroll_back() {
      self.view.follow(position)
    } else {
      false
    }
  }

  /// Catches up with a transport that stopped without the editor asking,
  /// like the song reaching its end. A recording clip is released.
  pub fn sync_transport<T>(&mut self, song: &mut Song, transport: &T) -> bool
  where
    T: Transport + ?Sized,
  {
    if !transport.is_stopped() || !self.playback.transport_stopped() {
      return false;
    }
    if let Some(clip_ref) = self.valid_clip(song) {
      let result = with_track(song, clip_ref, |track, _| {
        track.set_clip_recording(clip_ref.clip, false)
      });
      applied("release recording clip", result);
    }
    true
  }

  pub fn set_width(&mut self, width: i64) {
    self.view.set_width(width);
  }

  pub fn set_zoom(&mut self, zoom: usize) -> bool {
    self.view.set_zoom(zoom)
  }

  /// Zooms around the pointer at `x`.
  pub fn zoom_at(&mut self, zoom: usize, x: i64) -> bool {
    self.view.zoom_at(zoom, x)
  }

  pub fn scroll_to(&mut self, tick: TicksTime) {
    self.view.scroll_to(tick);
  }

  pub fn play<T>(&mut self, song: &mut Song, transport: &mut T) -> bool
  where
    T: Transport + ?Sized,
  {
    self.sync_transport(song, &*transport);
    match self.valid_clip(song) {
      Some(clip_ref) => {
        self.playback.play(transport, clip_ref);
        true
      }
      None => false,
    }
  }

  pub fn stop<T>(&mut self, song: &mut Song, transport: &mut T) -> bool
  where
    T: Transport + ?Sized,
  {
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let container = match song.container_of(clip_ref) {
      Some(container) => container,
      None => return false,
    };
    self.playback.stop(transport, container);
    let result = with_track(song, clip_ref, |track, _| {
      track.set_clip_recording(clip_ref.clip, false)
    });
    applied("stop", result);
    true
  }

  /// Records into the clip with only the clip playing.
  pub fn record<T>(&mut self, song: &mut Song, transport: &mut T) -> bool
  where
    T: Transport + ?Sized,
  {
    self.start_recording(song, transport, RecordMode::Solo)
  }

  /// Records into the clip while its container plays along.
  pub fn record_accompany<T>(&mut self, song: &mut Song, transport: &mut T) -> bool
  where
    T: Transport + ?Sized,
  {
    self.start_recording(song, transport, RecordMode::Accompany)
  }

  fn start_recording<T>(&mut self, song: &mut Song, transport: &mut T, mode: RecordMode) -> bool
  where
    T: Transport + ?Sized,
  {
    self.sync_transport(song, &*transport);
    if transport.is_playing() {
      self.stop(song, transport);
    }
    if self.playback.is_recording() {
      return false;
    }
    let clip_ref = match self.valid_clip(song) {
      Some(clip_ref) => clip_ref,
      None => return false,
    };
    let container = match song.container_of(clip_ref) {
      Some(container) => container,
      None => return false,
    };

    let result = with_track(song, clip_ref, |track, _| {
      track.add_checkpoint()?;
      track.set_clip_recording(clip_ref.clip, true)
    });
    if applied("record", result).is_none() {
      return false;
    }
    self.playback.record(transport, clip_ref, container, mode);
    true
  }

  fn selected(&mut self, song: &Song) -> Option<(ClipRef, TicksTime, TicksTime)> {
    let clip_ref = self.valid_clip(song)?;
    let (start, end) = self.selection.range()?;
    Some((clip_ref, start, end))
  }

  fn plays_clip<T>(&self, transport: &T) -> bool
  where
    T: Transport + ?Sized,
  {
    match (self.target, transport.get_mode()) {
      (Some(target), PlayMode::Clip(playing)) => target == playing,
      _ => false,
    }
  }

  fn sync_view(&mut self, time_map: &TimeMap) {
    self.view.set_ticks_per_bar(time_map.ticks_per_bar());
  }

  fn after_clip_change(&mut self, song: &Song) {
    self.selection.clear();
    self.view.scroll_to(TicksTime::zero());
    self.sync_view(song.time_map());
  }

  fn unbind(&mut self) {
    self.target = None;
    self.selection.clear();
    self.playback.reset();
  }
}

fn with_track<T, F>(song: &mut Song, clip_ref: ClipRef, action: F) -> EditResult<T>
where
  F: FnOnce(&mut Track, &TimeMap) -> EditResult<T>,
{
  match song.track_and_time_map(clip_ref.track) {
    Some((track, time_map)) => action(track, time_map),
    None => Err(EditError::ClipNotFound { id: clip_ref.clip }),
  }
}

fn applied<T>(action: &str, result: EditResult<T>) -> Option<T> {
  match result {
    Ok(value) => Some(value),
    Err(err) => {
      debug!("Skipped {}: {}", action, err);
      None
    }
  }
}
