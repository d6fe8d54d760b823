use log::info;

use crate::config::Config;
use crate::editor::SampleEditor;
use crate::song::Song;
use crate::time::{Signature, TicksTime};
use crate::transport::TransportState;

/// Everything the control thread owns: the configuration, the song being
/// edited, the sample editor and the transport state.
pub struct Studio {
  config: Config,
  song: Song,
  editor: SampleEditor,
  transport: TransportState,
}

impl Studio {
  pub fn new(config: Config) -> Studio {
    let sample_rate = config.audio.sample_rate;
    let song = Song::from_config("untitled", sample_rate, &config.song);
    let editor = SampleEditor::new(&config.editor);
    let transport = TransportState::new(Signature::new(config.song.num_beats, config.song.note_value));
    info!(
      "Studio ready at {} Hz, {} bpm",
      sample_rate,
      song.get_tempo().get_value()
    );
    Studio {
      config,
      song,
      editor,
      transport,
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn song(&self) -> &Song {
    &self.song
  }

  pub fn song_mut(&mut self) -> &mut Song {
    &mut self.song
  }

  pub fn editor(&self) -> &SampleEditor {
    &self.editor
  }

  pub fn transport(&self) -> &TransportState {
    &self.transport
  }

  /// Split borrow for driving the editor.
  pub fn parts_mut(&mut self) -> (&mut Song, &mut SampleEditor, &mut TransportState) {
    (&mut self.song, &mut self.editor, &mut self.transport)
  }

  pub fn play(&mut self) -> bool {
    self.editor.play(&mut self.song, &mut self.transport)
  }

  /// Playhead report from the engine.
  pub fn update_position(&mut self, position: TicksTime) -> bool {
    self.transport.set_ticks(position);
    self.editor.update_position(&mut self.song, &self.transport, position)
  }

  pub fn stop(&mut self) -> bool {
    self.editor.stop(&mut self.song, &mut self.transport)
  }
}

#[cfg(test)]
mod test {

  use super::Studio;
  use crate::config::Config;
  use crate::editor::PlaybackState;
  use crate::song::clip::test::clip_100;
  use crate::song::track::{Container, Track};
  use crate::song::ClipRef;
  use crate::time::{Tempo, TicksTime};
  use crate::transport::Transport;

  #[test]
  pub fn new() {
    let studio = Studio::new(Config::default());
    assert_eq!(studio.song().get_sample_rate(), 44100);
    assert_eq!(studio.song().get_tempo(), Tempo::new(140));
    assert_eq!(studio.editor().current_clip(), None);
    assert!(studio.transport().is_stopped());
  }

  #[test]
  pub fn play_bound_clip() {
    let mut studio = Studio::new(Config::default());
    assert!(!studio.play());

    let mut track = Track::new("drums", Container::Song);
    let id = track.add_clip(clip_100());
    let index = studio.song_mut().add_track(track);

    {
      let (song, editor, _) = studio.parts_mut();
      assert!(editor.set_current_clip(song, Some(ClipRef::new(index, id))));
    }
    assert!(studio.play());
    assert!(studio.transport().is_playing());
    assert!(studio.stop());
    assert!(studio.transport().is_stopped());
  }

  #[test]
  pub fn engine_stop_ends_recording() {
    let mut studio = Studio::new(Config::default());
    let mut track = Track::new("drums", Container::Song);
    let id = track.add_clip(clip_100());
    let index = studio.song_mut().add_track(track);
    let clip_ref = ClipRef::new(index, id);

    {
      let (song, editor, transport) = studio.parts_mut();
      assert!(editor.set_current_clip(song, Some(clip_ref)));
      assert!(editor.record(song, transport));
      transport.stop(Container::Song);
    }
    studio.update_position(TicksTime::zero());
    assert_eq!(studio.editor().playback().get_state(), PlaybackState::Stopped);
    assert!(!studio.song().clip(clip_ref).unwrap().is_recording());
  }
}
