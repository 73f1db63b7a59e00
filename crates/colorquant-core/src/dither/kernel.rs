//! Error diffusion kernel definitions.
//!
//! A kernel is a weight matrix whose row 0 contains the pixel being
//! processed (the anchor) followed by the not-yet-visited pixels to its
//! right; subsequent rows lie below. Each non-zero cell becomes a [`Tap`]
//! `(dx, dy, weight)` relative to the anchor.
//!
//! The seven historical matrices are listed as integer numerators over a
//! common divisor, exactly as they have always been tabulated. Downstream
//! golden images depend on these values; do not "fix" them.

use thiserror::Error;

/// Allowed deviation between a kernel's weight sum and its declared propagation.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One non-zero kernel cell, relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tap {
    /// Horizontal offset (positive = right, flipped for serpentine rows)
    pub dx: i32,
    /// Vertical offset (0 = current row)
    pub dy: usize,
    /// Fraction of the residual delivered to this neighbor
    pub weight: f32,
}

/// Why a matrix was refused at registration time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelDefect {
    /// No rows, or rows without cells
    #[error("matrix is empty")]
    Empty,
    /// A row has a different length from row 0
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Offending row
        row: usize,
        /// Length of row 0
        expected: usize,
        /// Length of the offending row
        found: usize,
    },
    /// Weight is NaN, infinite or negative
    #[error("weight at row {row}, column {col} is {value} (must be finite and non-negative)")]
    InvalidWeight {
        /// Row of the cell
        row: usize,
        /// Column of the cell
        col: usize,
        /// The rejected value
        value: f32,
    },
    /// Row 0 starts with a non-zero weight, so there is no anchor cell
    #[error("row 0 must start with a zero-weight anchor cell")]
    NoAnchor,
    /// Declared propagation is not a finite positive number
    #[error("propagation {0} must be finite and positive")]
    InvalidPropagation(f32),
    /// Weights do not add up to the declared propagation
    #[error("weights sum to {actual:.9}, expected {expected}")]
    WeightSum {
        /// Declared propagation (1.0 for energy-conserving kernels)
        expected: f32,
        /// Actual sum of all weights
        actual: f64,
    },
    /// A kernel with the same name is already registered
    #[error("a kernel with this name is already registered")]
    DuplicateName,
}

/// A validated error diffusion kernel.
///
/// Built through [`KernelTable`](super::KernelTable) registration, which
/// guarantees the matrix is rectangular, non-negative and sums to the
/// declared propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    name: String,
    rows: usize,
    cols: usize,
    /// Row-major weights
    weights: Vec<f32>,
    anchor: usize,
    propagation: f32,
    taps: Vec<Tap>,
}

impl Kernel {
    /// Validate a weight matrix and precompute its taps.
    pub(crate) fn from_matrix<R: AsRef<[f32]>>(
        name: &str,
        matrix: &[R],
        propagation: f32,
    ) -> Result<Self, KernelDefect> {
        let rows = matrix.len();
        let cols = matrix.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if rows == 0 || cols == 0 {
            return Err(KernelDefect::Empty);
        }

        let mut weights = Vec::with_capacity(rows * cols);
        for (row, cells) in matrix.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != cols {
                return Err(KernelDefect::Ragged {
                    row,
                    expected: cols,
                    found: cells.len(),
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(KernelDefect::InvalidWeight { row, col, value });
                }
                weights.push(value);
            }
        }

        if !propagation.is_finite() || propagation <= 0.0 {
            return Err(KernelDefect::InvalidPropagation(propagation));
        }

        let leading_zeros = weights[..cols].iter().take_while(|&&w| w == 0.0).count();
        let anchor = match leading_zeros {
            0 => return Err(KernelDefect::NoAnchor),
            // Kernels that only diffuse downward are centred.
            n if n == cols => (cols - 1) / 2,
            n => n - 1,
        };

        let actual: f64 = weights.iter().map(|&w| w as f64).sum();
        if (actual - propagation as f64).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(KernelDefect::WeightSum {
                expected: propagation,
                actual,
            });
        }

        let taps = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(i, &weight)| Tap {
                dx: (i % cols) as i32 - anchor as i32,
                dy: i / cols,
                weight,
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            rows,
            cols,
            weights,
            anchor,
            propagation,
            taps,
        })
    }

    /// Registered name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of matrix rows, which is also the error buffer depth.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of matrix columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Column of the current pixel within row 0.
    #[inline]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Declared fraction of the residual this kernel propagates.
    #[inline]
    pub fn propagation(&self) -> f32 {
        self.propagation
    }

    /// Weight of a single matrix cell.
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.cols + col]
    }

    /// Sum of all weights.
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().map(|&w| w as f64).sum()
    }

    /// Non-zero cells relative to the anchor, in row-major order.
    #[inline]
    pub fn taps(&self) -> &[Tap] {
        &self.taps
    }

    /// Horizontal reach on either side of the anchor.
    #[inline]
    pub fn overhang(&self) -> usize {
        self.anchor.max(self.cols - 1 - self.anchor)
    }
}

/// A historical kernel, tabulated as integer numerators over a divisor.
#[derive(Debug, Clone, Copy)]
pub struct KernelSpec {
    /// Name the kernel is registered under
    pub name: &'static str,
    /// Weight numerators, row 0 first
    pub numerators: &'static [&'static [u8]],
    /// Common divisor
    pub divisor: u8,
}

impl KernelSpec {
    /// Float weight matrix.
    pub fn matrix(&self) -> Vec<Vec<f32>> {
        let divisor = self.divisor as f32;
        self.numerators
            .iter()
            .map(|row| row.iter().map(|&n| n as f32 / divisor).collect())
            .collect()
    }

    /// Sum of the numerators.
    pub fn numerator_sum(&self) -> u32 {
        self.numerators
            .iter()
            .flat_map(|row| row.iter())
            .map(|&n| n as u32)
            .sum()
    }

    /// True when the numerators add up to the divisor.
    pub fn conserves_energy(&self) -> bool {
        self.numerator_sum() == self.divisor as u32
    }

    /// Fraction of the residual this table propagates.
    pub fn propagation(&self) -> f32 {
        self.numerator_sum() as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg as historically tabulated by this tool.
///
/// The 3x5 table over 48 is the Jarvis-Judice-Ninke spread; it is kept
/// verbatim under this name for output compatibility.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1     (/48)
/// ```
pub const FLOYD_STEINBERG: KernelSpec = KernelSpec {
    name: "FloydSteinberg",
    numerators: &[&[0, 0, 0, 7, 5], &[3, 5, 7, 5, 3], &[1, 3, 5, 3, 1]],
    divisor: 48,
};

/// Burkes.
///
/// The historical table carries a fourth row that diffuses back and down,
/// so its numerators add up to 44 over a divisor of 32 (137.5%).
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    .   .   .   .   .
///    4   8              (/32)
/// ```
pub const BURKES: KernelSpec = KernelSpec {
    name: "Burkes",
    numerators: &[
        &[0, 0, 0, 8, 4],
        &[2, 4, 8, 4, 2],
        &[0, 0, 0, 0, 0],
        &[4, 8, 0, 0, 0],
    ],
    divisor: 32,
};

/// Stucki.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1     (/42)
/// ```
pub const STUCKI: KernelSpec = KernelSpec {
    name: "Stucki",
    numerators: &[&[0, 0, 0, 8, 4], &[2, 4, 8, 4, 2], &[1, 2, 4, 2, 1]],
    divisor: 42,
};

/// Atkinson.
///
/// Distributes error to 6 neighbors with 75% total propagation (6/8). The
/// lost quarter lightens the result and reduces bleeding with small palettes.
///
/// ```text
///        X   1   1
///    1   1   1
///        1             (/8)
/// ```
pub const ATKINSON: KernelSpec = KernelSpec {
    name: "Atkinson",
    numerators: &[&[0, 0, 1, 1], &[1, 1, 1, 0], &[0, 1, 0, 0]],
    divisor: 8,
};

/// Sierra (full, three rows).
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2         (/32)
/// ```
pub const SIERRA_3: KernelSpec = KernelSpec {
    name: "Sierra-3",
    numerators: &[&[0, 0, 0, 5, 3], &[2, 4, 5, 4, 2], &[0, 2, 3, 2, 0]],
    divisor: 32,
};

/// Sierra two-row. The third row is empty.
///
/// ```text
///            X   4   3
///    1   2   3   2   1     (/16)
/// ```
pub const SIERRA_2: KernelSpec = KernelSpec {
    name: "Sierra-2",
    numerators: &[&[0, 0, 0, 4, 3], &[1, 2, 3, 2, 1], &[0, 0, 0, 0, 0]],
    divisor: 16,
};

/// Sierra Lite. The third row is empty.
///
/// ```text
///    X   2
///    1   1     (/4)
/// ```
pub const SIERRA_LITE: KernelSpec = KernelSpec {
    name: "Sierra-Lite",
    numerators: &[&[0, 0, 2], &[1, 1, 0], &[0, 0, 0]],
    divisor: 4,
};

/// The predefined kernels in registration order.
pub const BUILTIN_KERNELS: [KernelSpec; 7] = [
    FLOYD_STEINBERG,
    BURKES,
    STUCKI,
    ATKINSON,
    SIERRA_3,
    SIERRA_2,
    SIERRA_LITE,
];
