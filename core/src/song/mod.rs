pub mod clip;
pub mod events;
pub mod journal;
pub mod track;

use log::info;

use crate::config::SongConfig;
use crate::time::{SampleRate, Signature, Tempo, TimeMap};

use self::{
  clip::{ClipId, SampleClip},
  track::{Container, Track},
};

pub type TrackIndex = usize;

/// Where a clip lives: its track and its id on that track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipRef {
  pub track: TrackIndex,
  pub clip: ClipId,
}

impl ClipRef {
  pub fn new(track: TrackIndex, clip: ClipId) -> ClipRef {
    ClipRef { track, clip }
  }
}

#[derive(Debug)]
pub struct Song {
  name: String,
  sample_rate: SampleRate,
  time_map: TimeMap,
  tracks: Vec<Track>,
}

impl Song {
  pub fn new<T>(name: T, sample_rate: SampleRate) -> Song
  where
    T: Into<String>,
  {
    Song {
      name: name.into(),
      sample_rate,
      time_map: TimeMap::default(),
      tracks: Vec::new(),
    }
  }

  pub fn from_config<T>(name: T, sample_rate: SampleRate, config: &SongConfig) -> Song
  where
    T: Into<String>,
  {
    let mut song = Song::new(name, sample_rate);
    song.set_signature(Signature::new(config.num_beats, config.note_value));
    song.set_tempo(Tempo::new(config.tempo));
    song
  }

  pub fn set_name<T>(&mut self, name: T)
  where
    T: Into<String>,
  {
    self.name = name.into();
  }

  pub fn get_name(&self) -> &str {
    self.name.as_str()
  }

  pub fn get_sample_rate(&self) -> SampleRate {
    self.sample_rate
  }

  pub fn set_tempo(&mut self, tempo: Tempo) {
    info!("Tempo set to {} bpm", tempo.get_value());
    self.time_map = TimeMap::new(self.time_map.get_signature(), tempo);
  }

  pub fn get_tempo(&self) -> Tempo {
    self.time_map.get_tempo()
  }

  pub fn set_signature(&mut self, signature: Signature) {
    self.time_map = TimeMap::new(signature, self.time_map.get_tempo());
  }

  pub fn get_signature(&self) -> Signature {
    self.time_map.get_signature()
  }

  pub fn time_map(&self) -> &TimeMap {
    &self.time_map
  }

  pub fn add_track(&mut self, track: Track) -> TrackIndex {
    self.tracks.push(track);
    self.tracks.len() - 1
  }

  pub fn tracks(&self) -> &[Track] {
    self.tracks.as_slice()
  }

  pub fn track(&self, index: TrackIndex) -> Option<&Track> {
    self.tracks.get(index)
  }

  pub fn track_mut(&mut self, index: TrackIndex) -> Option<&mut Track> {
    self.tracks.get_mut(index)
  }

  /// The track together with the tempo map, for edits that need both.
  pub fn track_and_time_map(&mut self, index: TrackIndex) -> Option<(&mut Track, &TimeMap)> {
    let time_map = &self.time_map;
    self.tracks.get_mut(index).map(|track| (track, time_map))
  }

  pub fn clip(&self, clip_ref: ClipRef) -> Option<&SampleClip> {
    self.track(clip_ref.track)?.clip(clip_ref.clip)
  }

  pub fn contains(&self, clip_ref: ClipRef) -> bool {
    self.clip(clip_ref).is_some()
  }

  pub fn container_of(&self, clip_ref: ClipRef) -> Option<Container> {
    self.track(clip_ref.track).map(Track::container)
  }
}

#[cfg(test)]
mod test {

  use super::{ClipRef, Song};
  use crate::config::SongConfig;
  use crate::song::clip::test::clip_100;
  use crate::song::clip::ClipId;
  use crate::song::track::{Container, Track};
  use crate::time::{Signature, Tempo};

  #[test]
  pub fn new() {
    let song = Song::new("untitled", 44100);
    assert_eq!(song.get_name(), "untitled");
    assert_eq!(song.get_sample_rate(), 44100);
    assert_eq!(song.get_tempo(), Tempo::new(140));
    assert_eq!(song.get_signature(), Signature::new(4, 4));
    assert!(song.tracks().is_empty());
  }

  #[test]
  pub fn from_config() {
    let config = SongConfig {
      tempo: 90,
      num_beats: 3,
      note_value: 4,
    };
    let song = Song::from_config("waltz", 48000, &config);
    assert_eq!(song.get_tempo(), Tempo::new(90));
    assert_eq!(song.time_map().ticks_per_bar(), 144);
  }

  #[test]
  pub fn clip_lookup() {
    let mut song = Song::new("untitled", 9600);
    let mut track = Track::new("drums", Container::Pattern);
    let id = track.add_clip(clip_100());
    let index = song.add_track(track);

    let clip_ref = ClipRef::new(index, id);
    assert!(song.contains(clip_ref));
    assert_eq!(song.clip(clip_ref).unwrap().get_id(), id);
    assert_eq!(song.container_of(clip_ref), Some(Container::Pattern));

    assert!(!song.contains(ClipRef::new(index, ClipId::new())));
    assert!(!song.contains(ClipRef::new(index + 1, id)));
  }
}
