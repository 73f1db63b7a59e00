//! colorquant - palette quantization with error-diffusion dithering
//!
//! Command-line front end around `colorquant-core`: decoding, encoding,
//! configuration and batch processing.
//! This library exposes modules for integration testing.

pub mod codec;
pub mod error;
pub mod models;
pub mod services;
