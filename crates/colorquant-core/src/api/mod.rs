//! Public API: the quantizer, its error type and cancellation.

mod cancel;
mod error;
mod quantizer;

pub use cancel::CancelToken;
pub use error::QuantizeError;
pub use quantizer::{PassState, Quantizer};
