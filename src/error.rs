use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapGenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("A generation run is already in progress")]
    RunInProgress,

    #[error("No generation run is active")]
    NoRunActive,

    #[error("Generation worker panicked")]
    WorkerPanicked,

    #[error("Population is empty")]
    EmptyPopulation,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config source error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, MapGenError>;
