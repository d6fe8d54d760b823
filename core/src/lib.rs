pub mod audio;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod song;
pub mod studio;
pub mod time;
pub mod transport;
