use crate::error::ProcessError;
use colorquant_core::{KernelTable, Palette, DEFAULT_KERNEL};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV: &str = "COLORQUANT_CONFIG";

/// Output container format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Baseline JPEG (quality from `compression`)
    #[default]
    #[serde(alias = "jpeg")]
    #[value(alias = "jpeg")]
    Jpg,
    /// Indexed PNG
    Png,
}

impl ImageType {
    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpg => "jpg",
            ImageType::Png => "png",
        }
    }
}

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Output directory (relative paths are resolved next to the input directory)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Diffusion kernel name
    #[serde(default = "default_ditherer")]
    pub ditherer: String,

    /// Output format
    #[serde(default)]
    pub image_type: ImageType,

    /// JPEG quality, 1-100
    #[serde(default = "default_compression")]
    pub compression: u8,

    /// Number of palette entries to use
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    /// Alternate scan direction on odd rows
    #[serde(default)]
    pub serpentine: bool,

    /// Re-compress PNG output with oxipng
    #[serde(default)]
    pub optimize_png: bool,

    /// Concurrent images (default: available parallelism)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Hex colors replacing the web-safe palette
    #[serde(default)]
    pub colors: Option<Vec<String>>,

    /// Extra kernels registered next to the predefined ones
    #[serde(default)]
    pub kernels: BTreeMap<String, KernelConfig>,
}

fn default_output() -> PathBuf {
    PathBuf::from("output")
}

fn default_ditherer() -> String {
    DEFAULT_KERNEL.to_string()
}

fn default_compression() -> u8 {
    100
}

fn default_palette_size() -> usize {
    256
}

/// A user-defined diffusion kernel
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct KernelConfig {
    /// Weight rows; row 0 starts with the zero anchor cell
    pub matrix: Vec<Vec<f32>>,

    /// Declared fraction of the error propagated (default: 1.0)
    #[serde(default)]
    pub propagation: Option<f32>,
}

impl AppConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ProcessError> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| ProcessError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or from `$COLORQUANT_CONFIG` when no path is given.
    ///
    /// A missing file falls back to defaults with a warning; a file that
    /// exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ProcessError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match std::env::var_os(CONFIG_ENV) {
                Some(p) => PathBuf::from(p),
                None => return Ok(Self::default()),
            },
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config = Self::from_yaml(&content)?;
                tracing::info!(
                    path = %path.display(),
                    kernels = config.kernels.len(),
                    "Loaded configuration"
                );
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), ProcessError> {
        if !(1..=100).contains(&self.compression) {
            return Err(ProcessError::Config(format!(
                "compression must be between 1 and 100, got {}",
                self.compression
            )));
        }
        if self.palette_size == 0 {
            return Err(ProcessError::Config(
                "palette_size must be at least 1".to_string(),
            ));
        }
        if self.workers == Some(0) {
            return Err(ProcessError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The palette to quantize against
    pub fn palette(&self) -> Result<Palette, ProcessError> {
        match &self.colors {
            Some(colors) => Ok(Palette::from_hex(colors)?),
            None => Ok(Palette::web_safe()),
        }
    }

    /// Predefined kernels plus the configured extras.
    ///
    /// Extras are registered in name order; a malformed one fails the whole table.
    pub fn kernel_table(&self) -> Result<KernelTable, ProcessError> {
        let mut table = KernelTable::builtin();
        for (name, kernel) in &self.kernels {
            match kernel.propagation {
                Some(p) => table.register_with_propagation(name, kernel.matrix.as_slice(), p)?,
                None => table.register(name, kernel.matrix.as_slice())?,
            }
        }
        Ok(table)
    }

    /// Concurrent image limit
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            ditherer: default_ditherer(),
            image_type: ImageType::default(),
            compression: default_compression(),
            palette_size: default_palette_size(),
            serpentine: false,
            optimize_png: false,
            workers: None,
            colors: None,
            kernels: BTreeMap::new(),
        }
    }
}
