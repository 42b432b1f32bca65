//! Coordinate-based resampling of N-dimensional tensors.
//!
//! Sampling coordinates are continuous indices: integer coordinates hit
//! element centers. Nearest (order 0) rounds half to even; linear (order 1)
//! blends `floor(c)` and `floor(c) + 1` per axis and combines axes
//! separably, `2^K` taps for `K` interpolated axes.
//!
//! Out-of-range taps are remapped by [`FillMode`]. Under
//! [`FillMode::Constant`] they are masked instead and contribute the fill
//! value.

mod combos;
mod kernel;
mod resample;

use ndarray::{ArrayD, ArrayViewD};
use tr_core::{Element, Error, FillMode};

pub use combos::Combinations;
pub use kernel::{InterpolationOrder, Tap, Weight, nearest_index};
pub use resample::{ResampleParams, resample};

/// Samples `input` at `coordinates`, one coordinate array per input axis.
///
/// `order` must be 0 (nearest) or 1 (linear). The coordinate arrays are
/// broadcast together and the output takes their common shape and the dtype
/// of `input`.
pub fn map_coordinates<T: Element>(
    input: &ArrayViewD<'_, T>,
    coordinates: &[ArrayViewD<'_, f64>],
    order: usize,
    fill_mode: FillMode,
    fill_value: f64,
) -> Result<ArrayD<T>, Error> {
    if coordinates.len() != input.ndim() {
        return Err(Error::CoordinateCountMismatch {
            expected: input.ndim(),
            actual: coordinates.len(),
        });
    }
    let order = InterpolationOrder::try_from(order)?;

    tracing::debug!(
        shape = ?input.shape(),
        dtype = %T::DTYPE,
        %order,
        %fill_mode,
        "map_coordinates"
    );

    resample(
        input,
        coordinates,
        &ResampleParams::new(order, fill_mode).with_fill_value(fill_value),
    )
}
