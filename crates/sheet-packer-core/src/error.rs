use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetPackerError {
    #[error(
        "Invalid dimensions: container width {container_width} and max section height {max_section_height} must be positive and finite"
    )]
    InvalidDimensions {
        container_width: f64,
        max_section_height: f64,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Too many requests: {count} exceeds the limit of {limit}")]
    TooManyRequests { count: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, SheetPackerError>;
