use core::fmt;
use core::str::FromStr;

use crate::Error;

/// How an integer index outside `[0, size)` is brought back into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Clamp for gathering; out-of-range samples are replaced by the fill value.
    #[default]
    Constant,
    /// Clamp to the nearest edge sample.
    Nearest,
    /// Periodic tiling, `index mod size`.
    Wrap,
    /// Reflect about the edge samples without repeating them (`dcb|abcd|cba`).
    Mirror,
    /// Reflect about the array edges, repeating the edge sample (`cba|abcd|dcb`).
    Reflect,
}

impl FillMode {
    pub const ALL: [FillMode; 5] = [
        FillMode::Constant,
        FillMode::Nearest,
        FillMode::Wrap,
        FillMode::Mirror,
        FillMode::Reflect,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Nearest => "nearest",
            Self::Wrap => "wrap",
            Self::Mirror => "mirror",
            Self::Reflect => "reflect",
        }
    }

    /// Whether out-of-range samples are masked and replaced by the fill value.
    pub fn uses_validity_mask(self) -> bool {
        matches!(self, Self::Constant)
    }

    /// Maps `index` into `[0, size)`.
    ///
    /// Total over `i64`. An empty axis (`size == 0`) has no valid index and
    /// maps everything to 0; callers must not gather from it.
    pub fn fix_index(self, index: i64, size: usize) -> i64 {
        if size == 0 {
            return 0;
        }

        let i = i128::from(index);
        let n = size as i128;
        let fixed = match self {
            Self::Constant | Self::Nearest => i.clamp(0, n - 1),
            Self::Wrap => i.rem_euclid(n),
            Self::Mirror => mirror(i, n),
            Self::Reflect => (mirror(2 * i + 1, 2 * n + 1) - 1).div_euclid(2),
        };
        // `fixed` lies in `[0, size)`, which always fits in i64 for real axes.
        fixed as i64
    }
}

/// Triangular wave with half-period `size - 1`.
fn mirror(i: i128, n: i128) -> i128 {
    let s = n - 1;
    if s == 0 {
        return 0;
    }
    ((i + s).rem_euclid(2 * s) - s).abs()
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FillMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownFillMode(s.to_owned()))
    }
}
