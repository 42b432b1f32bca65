use ndarray::{ArrayD, ArrayViewD, IxDyn};
use tr_core::{Element, Error, FillMode, broadcast_shapes, row_major_strides};

use crate::combos::Combinations;
use crate::kernel::{InterpolationOrder, Weight};

/// Knobs of a single [`resample`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResampleParams {
    pub order: InterpolationOrder,
    pub fill_mode: FillMode,
    /// Substituted for out-of-range samples when `check_validity` is set.
    pub fill_value: f64,
    pub check_validity: bool,
    /// Leading coordinate axes used as raw indices: truncated to integers,
    /// never interpolated, never boundary-fixed.
    pub pass_through_axes: usize,
}

impl ResampleParams {
    /// Validity checking follows the fill mode: on for `constant` only.
    pub fn new(order: InterpolationOrder, fill_mode: FillMode) -> Self {
        Self {
            order,
            fill_mode,
            fill_value: 0.0,
            check_validity: fill_mode.uses_validity_mask(),
            pass_through_axes: 0,
        }
    }

    pub fn with_fill_value(mut self, fill_value: f64) -> Self {
        self.fill_value = fill_value;
        self
    }

    pub fn with_validity_check(mut self, check_validity: bool) -> Self {
        self.check_validity = check_validity;
        self
    }

    pub fn with_pass_through_axes(mut self, axes: usize) -> Self {
        self.pass_through_axes = axes;
        self
    }
}

/// A tap after boundary fixing, with indices pre-multiplied by the axis stride.
#[derive(Debug)]
struct FixedTap {
    offset: Vec<usize>,
    valid: Vec<bool>,
    weight: Weight,
}

/// Samples `source` at `coordinates`.
///
/// Coordinate `k` indexes axis `k` of `source`; all coordinate arrays are
/// broadcast to a common sample shape. Axes of `source` beyond the last
/// coordinate are carried whole, so the output shape is the sample shape
/// followed by `source.shape()[coordinates.len()..]`.
///
/// Per interpolated axis, every tap index is fixed by the fill mode and
/// checked against `[0, size)` before fixing. Taps are combined in
/// [`Combinations`] order; a combination with any out-of-range tap
/// contributes the fill value instead of the gathered sample when
/// `check_validity` is set. Integer dtypes round the blended result half to
/// even. Order 0 gathers elements as-is without a float round trip.
pub fn resample<T: Element>(
    source: &ArrayViewD<'_, T>,
    coordinates: &[ArrayViewD<'_, f64>],
    params: &ResampleParams,
) -> Result<ArrayD<T>, Error> {
    let n = coordinates.len();
    if n > source.ndim() {
        return Err(Error::CoordinateCountMismatch {
            expected: source.ndim(),
            actual: n,
        });
    }
    if params.pass_through_axes > n {
        return Err(Error::CoordinateCountMismatch {
            expected: params.pass_through_axes,
            actual: n,
        });
    }

    let shapes: Vec<&[usize]> = coordinates.iter().map(|c| c.shape()).collect();
    let sample_shape = broadcast_shapes(&shapes)?;
    let positions: usize = sample_shape.iter().product();

    let src_shape = source.shape();
    let strides = row_major_strides(src_shape);
    let inner: usize = src_shape[n..].iter().product();
    let mut out_shape = sample_shape.clone();
    out_shape.extend_from_slice(&src_shape[n..]);

    if positions > 0
        && let Some(axis) = (params.pass_through_axes..n).find(|&axis| src_shape[axis] == 0)
    {
        return Err(Error::EmptyAxis { axis });
    }

    let flat = coordinates
        .iter()
        .map(|c| broadcast_flat(c, &sample_shape))
        .collect::<Result<Vec<_>, _>>()?;

    let mut base = vec![0usize; positions];
    for (axis, coords) in flat.iter().enumerate().take(params.pass_through_axes) {
        let size = src_shape[axis];
        for (slot, &c) in base.iter_mut().zip(coords) {
            let index = c as i64;
            if index < 0 || index as u64 >= size as u64 {
                return Err(Error::IndexOutOfRange { axis, index, size });
            }
            *slot += index as usize * strides[axis];
        }
    }

    let axes: Vec<Vec<FixedTap>> = (params.pass_through_axes..n)
        .map(|axis| fix_taps(params, &flat[axis], src_shape[axis], strides[axis]))
        .collect();

    let src = source.as_standard_layout();
    let data = src.as_slice().expect("standard layout is contiguous");

    let unit = axes
        .iter()
        .all(|taps| taps.len() == 1 && taps[0].weight.is_one());
    let fill = T::fill_from_f64(params.fill_value);
    let fill = params.check_validity.then_some(fill);

    let values = if unit {
        gather(data, &base, &axes, inner, fill)
    } else {
        accumulate(data, &base, &axes, inner, fill.map(Element::to_f64))
    };

    ArrayD::from_shape_vec(IxDyn(&out_shape), values).map_err(|_| Error::SizeMismatch {
        expected: out_shape.iter().product(),
        actual: positions * inner,
    })
}

fn broadcast_flat(coords: &ArrayViewD<'_, f64>, shape: &[usize]) -> Result<Vec<f64>, Error> {
    let view = coords.broadcast(shape).ok_or_else(|| Error::NotBroadcastable {
        lhs: coords.shape().to_vec(),
        rhs: shape.to_vec(),
    })?;
    Ok(view.iter().copied().collect())
}

fn fix_taps(params: &ResampleParams, coords: &[f64], size: usize, stride: usize) -> Vec<FixedTap> {
    params
        .order
        .expand(coords)
        .into_iter()
        .map(|tap| FixedTap {
            offset: tap
                .index
                .iter()
                .map(|&i| params.fill_mode.fix_index(i, size) as usize * stride)
                .collect(),
            valid: tap
                .index
                .iter()
                .map(|&i| i >= 0 && (i as u64) < size as u64)
                .collect(),
            weight: tap.weight,
        })
        .collect()
}

/// Single unit-weight combination: copy elements straight through.
fn gather<T: Element>(
    data: &[T],
    base: &[usize],
    axes: &[Vec<FixedTap>],
    inner: usize,
    fill: Option<T>,
) -> Vec<T> {
    let mut out = Vec::with_capacity(base.len() * inner);
    for (p, &b) in base.iter().enumerate() {
        let mut offset = b;
        let mut valid = true;
        for taps in axes {
            offset += taps[0].offset[p];
            valid &= taps[0].valid[p];
        }
        match fill {
            Some(v) if !valid => out.extend(std::iter::repeat_n(v, inner)),
            _ => out.extend_from_slice(&data[offset..offset + inner]),
        }
    }
    out
}

fn accumulate<T: Element>(
    data: &[T],
    base: &[usize],
    axes: &[Vec<FixedTap>],
    inner: usize,
    fill: Option<f64>,
) -> Vec<T> {
    let counts: Vec<usize> = axes.iter().map(Vec::len).collect();
    let combos = Combinations::new(&counts);
    tracing::trace!(
        combinations = combos.total(),
        positions = base.len(),
        inner,
        "accumulating interpolation taps"
    );

    let mut acc = vec![0.0f64; base.len() * inner];
    for combo in combos {
        let taps: Vec<&FixedTap> = combo.iter().zip(axes).map(|(&k, taps)| &taps[k]).collect();
        let unit_weight = taps.iter().all(|tap| tap.weight.is_one());

        for (p, &b) in base.iter().enumerate() {
            let mut offset = b;
            let mut valid = true;
            let mut weight = 1.0f64;
            for tap in &taps {
                offset += tap.offset[p];
                valid &= tap.valid[p];
                if !unit_weight {
                    weight *= tap.weight.at(p);
                }
            }

            let dst = &mut acc[p * inner..(p + 1) * inner];
            match fill {
                Some(v) if !valid => {
                    let contribution = if unit_weight { v } else { v * weight };
                    dst.iter_mut().for_each(|slot| *slot += contribution);
                }
                _ => {
                    for (slot, &s) in dst.iter_mut().zip(&data[offset..offset + inner]) {
                        let s = s.to_f64();
                        *slot += if unit_weight { s } else { s * weight };
                    }
                }
            }
        }
    }

    if T::is_integer() {
        acc.into_iter()
            .map(|v| T::from_f64(v.round_ties_even()))
            .collect()
    } else {
        acc.into_iter().map(T::from_f64).collect()
    }
}
