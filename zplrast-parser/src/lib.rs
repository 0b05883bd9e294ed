mod commands;
mod params;
mod tokenize;

pub use commands::*;
pub use params::Params;
pub use tokenize::{strip_vertical_whitespace, tokenize};
