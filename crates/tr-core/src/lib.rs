//! Foundational primitives for coordinate-based tensor resampling.
//!
//! ## Tensors
//! Tensors are dense `ndarray` arrays of dynamic rank. The element types a
//! resampler accepts are described by [`Element`]: signed and unsigned
//! integers from 8 to 64 bits plus `f32` and `f64`. Every operation returns a
//! freshly allocated array with the same dtype as its source.
//!
//! ## Fill Modes
//! [`FillMode`] maps an out-of-range integer index back into `[0, size)`:
//! clamp (`constant`, `nearest`), true modulo (`wrap`), reflection without a
//! repeated edge sample (`mirror`) and reflection with a repeated edge sample
//! (`reflect`). Only `constant` substitutes a fill value for out-of-range
//! samples; the resampler handles that through a validity mask.
//!
//! ## Broadcasting
//! Shapes broadcast numpy-style: aligned at the trailing dimension, missing
//! leading dimensions count as 1, and a size-1 dimension stretches to match.

mod border;
mod dtype;
mod error;
mod layout;
mod shape;

pub use border::FillMode;
pub use dtype::{DType, Element};
pub use error::{Error, ErrorKind};
pub use layout::{DataFormat, from_channels_last, to_channels_last};
pub use shape::{broadcast_shapes, row_major_strides};
