use failure::{bail, Error};

use serde_derive::Deserialize;

use std::env;
use std::fs::File;
use std::io::Read;

pub const CONFIG_PATH_ENV: &str = "SAMPLE_EDITOR_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "sample-editor.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Audio {
  pub sample_rate: u32,
}

impl Default for Audio {
  fn default() -> Audio {
    Audio { sample_rate: 44100 }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SongConfig {
  pub tempo: u16,
  pub num_beats: u8,
  pub note_value: u8,
}

impl Default for SongConfig {
  fn default() -> SongConfig {
    SongConfig {
      tempo: 140,
      num_beats: 4,
      note_value: 4,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
  /// Width of one bar at zoom 1.0.
  pub pixels_per_bar: f64,
  pub zoom_levels: Vec<f64>,
  /// Index into `zoom_levels`.
  pub default_zoom: usize,
  /// Pixels left of the first tick.
  pub left_margin: i64,
  /// Ticks the playhead moves per navigation step.
  pub navigation_step: u64,
}

impl Default for EditorConfig {
  fn default() -> EditorConfig {
    EditorConfig {
      pixels_per_bar: 192.0,
      zoom_levels: vec![0.125, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0],
      default_zoom: 3,
      left_margin: 64,
      navigation_step: 16,
    }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  pub audio: Audio,
  pub song: SongConfig,
  pub editor: EditorConfig,
}

impl Default for Config {
  fn default() -> Config {
    Config {
      audio: Audio::default(),
      song: SongConfig::default(),
      editor: EditorConfig::default(),
    }
  }
}

impl Config {
  pub fn from_file<'a, T>(path: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let mut content = String::new();
    let path_str = path.into();
    let mut file = File::open(path_str)?;
    file.read_to_string(&mut content)?;
    Config::from_str(content.as_str())
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    config.validate()?;
    Ok(config)
  }

  /// Loads the file named by `SAMPLE_EDITOR_CONFIG`, or the default one.
  pub fn from_env() -> Result<Config, Error> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Config::from_file(path.as_str())
  }

  fn validate(&self) -> Result<(), Error> {
    if self.audio.sample_rate == 0 {
      bail!("audio.sample_rate must be positive");
    }
    if self.song.tempo == 0 {
      bail!("song.tempo must be positive");
    }
    if self.song.num_beats == 0 {
      bail!("song.num_beats must be positive");
    }
    if self.song.note_value == 0 || self.song.note_value > 16 {
      bail!("song.note_value must be in 1..=16");
    }
    if self.editor.pixels_per_bar <= 0.0 {
      bail!("editor.pixels_per_bar must be positive");
    }
    if self.editor.zoom_levels.iter().any(|zoom| *zoom <= 0.0) {
      bail!("editor.zoom_levels must be positive");
    }
    if self.editor.default_zoom >= self.editor.zoom_levels.len() {
      bail!(
        "editor.default_zoom {} is not one of the {} zoom levels",
        self.editor.default_zoom,
        self.editor.zoom_levels.len()
      );
    }
    Ok(())
  }
}

#[cfg(test)]
mod test {

  use super::{Config, EditorConfig};

  #[test]
  pub fn defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.audio.sample_rate, 44100);
    assert_eq!(config.song.tempo, 140);
    assert_eq!(config.editor.zoom_levels[config.editor.default_zoom], 1.0);
  }

  #[test]
  pub fn from_str() {
    let config = Config::from_str(
      r#"
      [audio]
      sample_rate = 48000

      [song]
      tempo = 120
      num_beats = 3

      [editor]
      zoom_levels = [1.0, 2.0]
      default_zoom = 1
      "#,
    )
    .unwrap();
    assert_eq!(config.audio.sample_rate, 48000);
    assert_eq!(config.song.tempo, 120);
    assert_eq!(config.song.num_beats, 3);
    assert_eq!(config.song.note_value, 4);
    assert_eq!(config.editor.zoom_levels, vec![1.0, 2.0]);
    assert_eq!(config.editor.left_margin, EditorConfig::default().left_margin);
  }

  #[test]
  pub fn invalid_values() {
    assert!(Config::from_str("[song]\ntempo = 0").is_err());
    assert!(Config::from_str("[song]\nnote_value = 32").is_err());
    assert!(Config::from_str("[editor]\nzoom_levels = []").is_err());
    assert!(Config::from_str("[editor]\ndefault_zoom = 7").is_err());
    assert!(Config::from_str("[audio]\nsample_rate = \"fast\"").is_err());
  }

  #[test]
  pub fn missing_file() {
    assert!(Config::from_file("/nonexistent/sample-editor.toml").is_err());
  }
}
