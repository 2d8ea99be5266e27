//! Palette recolouring: shift hue, invert and brighten a whole set of colours
//! at once, then carry the result back into arbitrary text.

pub mod app;
pub mod cli;
pub mod color;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod store;
pub mod tui;

pub use error::{Error, Result};
