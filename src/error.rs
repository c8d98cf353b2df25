use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("malformed route: {0}")]
    MalformedInput(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to parse GPX file: {0}")]
    Gpx(String),
    #[error("failed to write plot: {0}")]
    Plot(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
