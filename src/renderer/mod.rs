//! Terminal output for typewriter frames.

pub mod line;

pub use line::LineRenderer;
