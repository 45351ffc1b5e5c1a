//! Output sink implementations

mod filesystem;

pub use filesystem::{FileOutputSink, OutputSettings};
