use crate::Error;

/// Common shape of `shapes` under trailing-dimension broadcasting.
///
/// Shapes are right-aligned; a missing leading dimension counts as 1 and a
/// dimension of 1 stretches to its counterpart. An empty list broadcasts to
/// the scalar shape `[]`.
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>, Error> {
    let rank = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut out = vec![1usize; rank];

    for shape in shapes {
        let offset = rank - shape.len();
        for (axis, &dim) in shape.iter().enumerate() {
            let slot = &mut out[offset + axis];
            if *slot == dim || dim == 1 {
                continue;
            }
            if *slot == 1 {
                *slot = dim;
                continue;
            }
            return Err(Error::NotBroadcastable {
                lhs: out.clone(),
                rhs: shape.to_vec(),
            });
        }
    }

    Ok(out)
}

/// Element strides of a contiguous row-major array with `shape`.
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::{broadcast_shapes, row_major_strides};
    use crate::Error;

    #[test]
    fn trailing_alignment_with_unit_expansion() {
        let shape = broadcast_shapes(&[&[3, 1, 1], &[1, 4, 5], &[4, 5]]).expect("broadcastable");
        assert_eq!(shape, vec![3, 4, 5]);

        let shape = broadcast_shapes(&[&[2], &[]]).expect("scalar broadcasts");
        assert_eq!(shape, vec![2]);

        assert_eq!(broadcast_shapes(&[]).expect("empty"), Vec::<usize>::new());
    }

    #[test]
    fn zero_sized_dims_broadcast_against_one() {
        let shape = broadcast_shapes(&[&[0, 3], &[1, 3]]).expect("broadcastable");
        assert_eq!(shape, vec![0, 3]);
    }

    #[test]
    fn incompatible_dims_are_rejected() {
        let err = broadcast_shapes(&[&[2, 3], &[4, 3]]).expect_err("incompatible");
        assert!(matches!(err, Error::NotBroadcastable { .. }));
    }

    #[test]
    fn strides_for_common_ranks() {
        assert_eq!(row_major_strides(&[]), Vec::<usize>::new());
        assert_eq!(row_major_strides(&[5]), vec![1]);
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
    }
}
