pub mod config;

pub use config::{AppConfig, ImageType, KernelConfig, CONFIG_ENV};
