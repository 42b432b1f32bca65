use ndarray::{Array3, ArrayD, Axis};
use tr_core::Error;

use crate::transform::TransformSet;

/// Source coordinates of every pixel of a `(height, width)` output grid.
///
/// For a single image (`batch == None`) returns `[y_src, x_src]`, each of
/// shape `(H, W)`. For a batch returns `[b, y_src, x_src]` where `b` is
/// `0..batch` shaped `(batch, 1, 1)` and the source grids have shape
/// `(rows, H, W)` with `rows` either 1 or `batch`. The batch coordinate is
/// integer-valued, so linear interpolation selects each image exactly.
pub fn generate_coordinates(
    transforms: &TransformSet,
    target: (usize, usize),
    batch: Option<usize>,
) -> Result<Vec<ArrayD<f64>>, Error> {
    transforms.check_batch(batch)?;

    let (height, width) = target;
    let rows = if batch.is_some() { transforms.rows() } else { 1 };

    let mut x_src = Array3::<f64>::zeros((rows, height, width));
    let mut y_src = Array3::<f64>::zeros((rows, height, width));
    for r in 0..rows {
        let t = transforms
            .get(r)
            .ok_or(Error::TransformBatchMismatch {
                expected: rows,
                actual: transforms.rows(),
            })?;
        for y in 0..height {
            for x in 0..width {
                let (xs, ys) = t.map(x as f64, y as f64);
                x_src[[r, y, x]] = xs;
                y_src[[r, y, x]] = ys;
            }
        }
    }

    Ok(match batch {
        None => vec![
            y_src.index_axis_move(Axis(0), 0).into_dyn(),
            x_src.index_axis_move(Axis(0), 0).into_dyn(),
        ],
        Some(n) => {
            let b = Array3::from_shape_fn((n, 1, 1), |(i, _, _)| i as f64);
            vec![b.into_dyn(), y_src.into_dyn(), x_src.into_dyn()]
        }
    })
}
