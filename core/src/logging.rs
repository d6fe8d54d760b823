use failure::{Error, Fail};

pub const LOG_CONFIG_ENV: &str = "SAMPLE_EDITOR_LOG_CONFIG";
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yaml";

#[derive(Debug, Fail)]
pub enum LoggingError {
  #[fail(display = "Failed to init logging: {}", cause)]
  Init { cause: String },
}

/// Initialises log4rs from the file named by `SAMPLE_EDITOR_LOG_CONFIG`,
/// or from `log4rs.yaml` in the working directory.
pub fn init_logging() -> Result<(), Error> {
  let log_config_path =
    std::env::var(LOG_CONFIG_ENV).unwrap_or_else(|_| DEFAULT_LOG_CONFIG.to_string());
  init_logging_from(log_config_path.as_str())
}

pub fn init_logging_from(path: &str) -> Result<(), Error> {
  log4rs::init_file(path, Default::default()).map_err(|err| LoggingError::Init {
    cause: err.to_string(),
  })?;
  Ok(())
}
