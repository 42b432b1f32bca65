use core::fmt;

use tr_core::Error;

/// Spline order used along every interpolated axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationOrder {
    /// Order 0: one tap at the rounded coordinate.
    Nearest,
    /// Order 1: two taps at `floor(c)` and `floor(c) + 1`.
    #[default]
    Linear,
}

impl InterpolationOrder {
    pub fn order(self) -> usize {
        match self {
            Self::Nearest => 0,
            Self::Linear => 1,
        }
    }

    /// Taps produced per coordinate along one axis.
    pub fn taps_per_axis(self) -> usize {
        self.order() + 1
    }

    /// Expands each coordinate into its `(index, weight)` taps.
    ///
    /// One [`Tap`] is returned per kernel position; entry `p` of each tap
    /// belongs to `coordinates[p]`.
    pub fn expand(self, coordinates: &[f64]) -> Vec<Tap> {
        match self {
            Self::Nearest => vec![Tap {
                index: coordinates.iter().map(|&c| nearest_index(c)).collect(),
                weight: Weight::One,
            }],
            Self::Linear => {
                let mut lower = Vec::with_capacity(coordinates.len());
                let mut upper = Vec::with_capacity(coordinates.len());
                let mut lower_w = Vec::with_capacity(coordinates.len());
                let mut upper_w = Vec::with_capacity(coordinates.len());
                for &c in coordinates {
                    let floor = c.floor();
                    let frac = c - floor;
                    let i0 = floor as i64;
                    lower.push(i0);
                    upper.push(i0.saturating_add(1));
                    lower_w.push(1.0 - frac);
                    upper_w.push(frac);
                }
                vec![
                    Tap {
                        index: lower,
                        weight: Weight::PerSample(lower_w),
                    },
                    Tap {
                        index: upper,
                        weight: Weight::PerSample(upper_w),
                    },
                ]
            }
        }
    }
}

impl TryFrom<usize> for InterpolationOrder {
    type Error = Error;

    fn try_from(order: usize) -> Result<Self, Self::Error> {
        match order {
            0 => Ok(Self::Nearest),
            1 => Ok(Self::Linear),
            _ => Err(Error::UnsupportedOrder(order)),
        }
    }
}

impl fmt::Display for InterpolationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("nearest"),
            Self::Linear => f.write_str("linear"),
        }
    }
}

/// Interpolation weight of one tap.
#[derive(Debug, Clone, PartialEq)]
pub enum Weight {
    /// Exactly 1 for every sample; the multiply is skipped.
    One,
    PerSample(Vec<f64>),
}

impl Weight {
    #[inline]
    pub fn at(&self, p: usize) -> f64 {
        match self {
            Self::One => 1.0,
            Self::PerSample(w) => w[p],
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Self::One)
    }
}

/// One kernel position along one axis: unfixed integer indices plus weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Tap {
    pub index: Vec<i64>,
    pub weight: Weight,
}

/// Rounds half-way cases to the even neighbour, so `0.5 -> 0`, `1.5 -> 2`.
///
/// Saturates at the `i64` range; NaN maps to 0.
#[inline]
pub fn nearest_index(c: f64) -> i64 {
    c.round_ties_even() as i64
}

#[cfg(test)]
mod tests {
    use super::{InterpolationOrder, Weight, nearest_index};
    use tr_core::{Error, ErrorKind};

    #[test]
    fn nearest_rounds_half_to_even() {
        assert_eq!(nearest_index(0.5), 0);
        assert_eq!(nearest_index(1.5), 2);
        assert_eq!(nearest_index(2.5), 2);
        assert_eq!(nearest_index(-0.5), 0);
        assert_eq!(nearest_index(-1.5), -2);
        assert_eq!(nearest_index(1.2), 1);
        assert_eq!(nearest_index(1.6), 2);
        assert_eq!(nearest_index(f64::NAN), 0);
        assert_eq!(nearest_index(1e300), i64::MAX);
    }

    #[test]
    fn nearest_yields_a_single_unit_tap() {
        let taps = InterpolationOrder::Nearest.expand(&[0.0, 2.0, -3.0, 1.4]);
        assert_eq!(taps.len(), 1);
        assert_eq!(taps[0].index, vec![0, 2, -3, 1]);
        assert!(taps[0].weight.is_one());
        assert_eq!(taps[0].weight.at(3), 1.0);
    }

    #[test]
    fn linear_splits_weight_between_floor_and_next() {
        let taps = InterpolationOrder::Linear.expand(&[1.25, -0.5]);
        assert_eq!(taps.len(), 2);
        assert_eq!(taps[0].index, vec![1, -1]);
        assert_eq!(taps[1].index, vec![2, 0]);
        assert_eq!(taps[0].weight, Weight::PerSample(vec![0.75, 0.5]));
        assert_eq!(taps[1].weight, Weight::PerSample(vec![0.25, 0.5]));
    }

    #[test]
    fn linear_on_integer_coordinates_puts_all_weight_on_floor() {
        let taps = InterpolationOrder::Linear.expand(&[0.0, 3.0, -2.0]);
        for p in 0..3 {
            assert_eq!(taps[0].weight.at(p), 1.0);
            assert_eq!(taps[1].weight.at(p), 0.0);
        }
        assert_eq!(taps[0].index, vec![0, 3, -2]);
    }

    #[test]
    fn order_parsing() {
        assert_eq!(InterpolationOrder::try_from(0), Ok(InterpolationOrder::Nearest));
        assert_eq!(InterpolationOrder::try_from(1), Ok(InterpolationOrder::Linear));
        let err = InterpolationOrder::try_from(3).expect_err("cubic is not available");
        assert_eq!(err, Error::UnsupportedOrder(3));
        assert_eq!(err.kind(), ErrorKind::NotSupported);
        assert_eq!(InterpolationOrder::Linear.taps_per_axis(), 2);
    }
}
