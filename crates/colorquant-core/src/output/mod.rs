//! Output types for quantization results.

mod quantized_image;

pub use quantized_image::QuantizedImage;
