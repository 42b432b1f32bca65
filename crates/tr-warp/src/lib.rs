//! Projective image warps on top of `tr-interp`.
//!
//! Images are rank 3 `(H, W, C)` or rank 4 `(B, H, W, C)`; channels-first
//! input is permuted to channels-last for sampling and permuted back after.
//!
//! Grid generation:
//! - Every output pixel `(x, y)` is mapped through a [`ProjectiveTransform`]
//!   to a source position, giving one `(H, W)` coordinate grid per axis.
//! - Batches prepend an integer image-index coordinate, so the batch axis
//!   runs through the same interpolation path and selects exactly.
//!
//! [`resize`] is the special case of a pure per-axis scale. Antialiasing is
//! not implemented and is rejected.

mod coords;
mod transform;
mod warp;

pub use coords::generate_coordinates;
pub use transform::{ProjectiveTransform, TransformSet};
pub use warp::{AffineConfig, Interpolation, ResizeConfig, affine_transform, resize};
