use ndarray::ArrayViewD;
use tr_core::Error;

/// 2D projective map from output pixel `(x, y)` to source pixel.
///
/// Coefficients are `[a0, a1, a2, b0, b1, b2, c0, c1]`:
///
/// ```text
/// k     = c0 * x + c1 * y + 1
/// x_src = (a0 * x + a1 * y + a2) / k
/// y_src = (b0 * x + b1 * y + b2) / k
/// ```
///
/// With `c0 = c1 = 0` this is an affine map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectiveTransform {
    pub coeffs: [f64; 8],
}

impl ProjectiveTransform {
    pub const IDENTITY: Self = Self {
        coeffs: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    };

    pub fn new(coeffs: [f64; 8]) -> Self {
        Self { coeffs }
    }

    /// `x_src = sx * x`, `y_src = sy * y`.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new([sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0])
    }

    /// `x_src = x + dx`, `y_src = y + dy`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new([1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0])
    }

    pub fn from_slice(row: &[f64]) -> Result<Self, Error> {
        let coeffs: [f64; 8] = row
            .try_into()
            .map_err(|_| Error::InvalidTransformLength(row.len()))?;
        Ok(Self { coeffs })
    }

    pub fn is_affine(&self) -> bool {
        self.coeffs[6] == 0.0 && self.coeffs[7] == 0.0
    }

    /// Source position `(x_src, y_src)` of output pixel `(x, y)`.
    #[inline]
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let [a0, a1, a2, b0, b1, b2, c0, c1] = self.coeffs;
        let k = c0 * x + c1 * y + 1.0;
        ((a0 * x + a1 * y + a2) / k, (b0 * x + b1 * y + b2) / k)
    }
}

impl Default for ProjectiveTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One transform for every image, or one row per image of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSet {
    Single(ProjectiveTransform),
    Batched(Vec<ProjectiveTransform>),
}

impl TransformSet {
    /// Reads a rank-1 `(8,)` or rank-2 `(rows, 8)` coefficient array.
    pub fn from_array(transform: &ArrayViewD<'_, f64>) -> Result<Self, Error> {
        match transform.ndim() {
            1 => {
                let row: Vec<f64> = transform.iter().copied().collect();
                ProjectiveTransform::from_slice(&row).map(Self::Single)
            }
            2 => transform
                .outer_iter()
                .map(|row| {
                    let row: Vec<f64> = row.iter().copied().collect();
                    ProjectiveTransform::from_slice(&row)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Batched),
            rank => Err(Error::InvalidTransformRank(rank)),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batched(rows) => rows.len(),
        }
    }

    /// Transform applied to image `i` of a batch.
    ///
    /// A single transform, or a batch of one row, applies to every image.
    pub fn get(&self, i: usize) -> Option<&ProjectiveTransform> {
        match self {
            Self::Single(t) => Some(t),
            Self::Batched(rows) if rows.len() == 1 => rows.first(),
            Self::Batched(rows) => rows.get(i),
        }
    }

    /// Checks that the rows fit `batch` images (`None` for a single image).
    pub fn check_batch(&self, batch: Option<usize>) -> Result<(), Error> {
        let rows = self.rows();
        let expected = batch.unwrap_or(1);
        if rows == 1 || rows == expected {
            Ok(())
        } else {
            Err(Error::TransformBatchMismatch {
                expected,
                actual: rows,
            })
        }
    }
}

impl From<ProjectiveTransform> for TransformSet {
    fn from(transform: ProjectiveTransform) -> Self {
        Self::Single(transform)
    }
}
