use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid {frame} frame: width={width}, height={height}")]
    InvalidFrame {
        frame: &'static str,
        width: f64,
        height: f64,
    },

    #[error("{family} chart requires the `{role}` accessor")]
    MissingAccessor {
        family: &'static str,
        role: &'static str,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("circular link in sankey graph: {0}")]
    CircularLink(String),

    #[error("unknown filter option `{0}`")]
    UnknownFilterOption(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("io error: {0}")]
    Io(String),
}
