//! File input and output, run configuration, errors and progress reporting

pub mod configuration;
pub mod error;
pub mod export;
pub mod image;
pub mod progress;
