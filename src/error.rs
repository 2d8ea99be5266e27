use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("invalid hex colour: {0:?} (expected '#' followed by 6 or 8 hex digits)")]
    InvalidColourFormat(String),

    #[error("inversion midpoint {0} leaves no room on one side")]
    DegenerateMidpoint(f32),

    #[error("invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("input and output palettes do not correspond: {0}")]
    PaletteMismatch(String),

    #[error("cannot build a matcher for {count} colours: {reason}")]
    MatcherTooLarge { count: usize, reason: String },
}
