//! Registry of named diffusion kernels.

use super::kernel::{Kernel, KernelDefect, BUILTIN_KERNELS};
use crate::api::QuantizeError;

/// Immutable-after-construction registry of named kernels.
///
/// Kernels are validated when they are registered, so a malformed matrix is
/// reported at startup and never in the middle of a scan. Once built, the
/// table is shared by reference; quantization never mutates it.
///
/// # Example
///
/// ```
/// use colorquant_core::KernelTable;
///
/// let mut table = KernelTable::builtin();
/// table
///     .register("Right", &[[0.0f32, 1.0]])
///     .unwrap();
///
/// assert!(table.lookup("FloydSteinberg").is_ok());
/// assert!(table.lookup("Right").is_ok());
/// assert!(table.lookup("Bayer").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KernelTable {
    kernels: Vec<Kernel>,
}

impl KernelTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table holding the seven predefined kernels.
    ///
    /// Atkinson (6/8) and Burkes (44/32) are registered with their
    /// historical propagation; all others must conserve energy.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for spec in BUILTIN_KERNELS {
            let matrix = spec.matrix();
            let registered = if spec.conserves_energy() {
                table.register(spec.name, &matrix)
            } else {
                table.register_with_propagation(spec.name, &matrix, spec.propagation())
            };
            debug_assert!(
                registered.is_ok(),
                "builtin kernel {} failed validation: {:?}",
                spec.name,
                registered
            );
        }
        table
    }

    /// Register an energy-conserving kernel.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::MalformedKernel`] if the matrix is empty, ragged,
    /// has negative or non-finite weights, has no zero anchor cell in row 0,
    /// does not sum to 1.0 within 1e-6, or the name is taken.
    pub fn register<R: AsRef<[f32]>>(
        &mut self,
        name: &str,
        matrix: &[R],
    ) -> Result<(), QuantizeError> {
        self.register_with_propagation(name, matrix, 1.0)
    }

    /// Register a kernel that deliberately propagates `propagation` of the
    /// residual instead of all of it.
    ///
    /// The weights must sum to `propagation` within 1e-6.
    pub fn register_with_propagation<R: AsRef<[f32]>>(
        &mut self,
        name: &str,
        matrix: &[R],
        propagation: f32,
    ) -> Result<(), QuantizeError> {
        let malformed = |reason| QuantizeError::MalformedKernel {
            name: name.to_string(),
            reason,
        };

        if self.contains(name) {
            return Err(malformed(KernelDefect::DuplicateName));
        }

        let kernel = Kernel::from_matrix(name, matrix, propagation).map_err(malformed)?;
        tracing::trace!(
            kernel = name,
            rows = kernel.rows(),
            cols = kernel.cols(),
            propagation,
            "Registered kernel"
        );
        self.kernels.push(kernel);
        Ok(())
    }

    /// Look up a kernel by its exact name.
    pub fn lookup(&self, name: &str) -> Result<&Kernel, QuantizeError> {
        self.kernels
            .iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| QuantizeError::UnknownKernel(name.to_string()))
    }

    /// Returns true if a kernel with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.kernels.iter().any(|k| k.name() == name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kernels.iter().map(Kernel::name)
    }

    /// Registered kernels in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Kernel> {
        self.kernels.iter()
    }

    /// Number of registered kernels.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Returns true if no kernels are registered.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}
