//! Umbrella crate for the `tensor-resample` workspace.
//!
//! Re-exports the dtype/boundary primitives, the N-dimensional resampler and
//! the image warps.

pub use tr_core::*;
pub use tr_interp::*;
pub use tr_warp::*;
