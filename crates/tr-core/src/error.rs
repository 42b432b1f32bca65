use core::fmt;

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotSupported,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    CoordinateCountMismatch { expected: usize, actual: usize },
    UnknownFillMode(String),
    UnsupportedOrder(usize),
    UnknownInterpolation(String),
    UnknownDataFormat(String),
    InvalidImageRank(usize),
    InvalidTransformRank(usize),
    InvalidTransformLength(usize),
    TransformBatchMismatch { expected: usize, actual: usize },
    NotBroadcastable { lhs: Vec<usize>, rhs: Vec<usize> },
    IndexOutOfRange { axis: usize, index: i64, size: usize },
    EmptyAxis { axis: usize },
    InvalidTargetSize { height: usize, width: usize },
    AntialiasUnsupported,
    SizeMismatch { expected: usize, actual: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedOrder(_) | Self::AntialiasUnsupported => ErrorKind::NotSupported,
            _ => ErrorKind::InvalidArgument,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordinateCountMismatch { expected, actual } => write!(
                f,
                "coordinates must have one entry per input axis: expected {expected}, got {actual}"
            ),
            Self::UnknownFillMode(mode) => write!(
                f,
                "invalid fill mode `{mode}`, expected one of constant, nearest, wrap, mirror, reflect"
            ),
            Self::UnsupportedOrder(order) => {
                write!(f, "interpolation order {order} is not supported, expected 0 or 1")
            }
            Self::UnknownInterpolation(name) => write!(
                f,
                "invalid interpolation `{name}`, expected one of nearest, bilinear"
            ),
            Self::UnknownDataFormat(name) => write!(
                f,
                "invalid data format `{name}`, expected channels_last or channels_first"
            ),
            Self::InvalidImageRank(rank) => write!(
                f,
                "invalid image rank {rank}: expected 3 (single image) or 4 (batch of images)"
            ),
            Self::InvalidTransformRank(rank) => write!(
                f,
                "invalid transform rank {rank}: expected 1 (single transform) or 2 (batch of transforms)"
            ),
            Self::InvalidTransformLength(len) => {
                write!(f, "transform rows must hold 8 coefficients, got {len}")
            }
            Self::TransformBatchMismatch { expected, actual } => write!(
                f,
                "transform batch mismatch: expected 1 or {expected} rows, got {actual}"
            ),
            Self::NotBroadcastable { lhs, rhs } => {
                write!(f, "shapes {lhs:?} and {rhs:?} are not broadcastable")
            }
            Self::IndexOutOfRange { axis, index, size } => write!(
                f,
                "index {index} out of range for axis {axis} with size {size}"
            ),
            Self::EmptyAxis { axis } => write!(f, "cannot interpolate along empty axis {axis}"),
            Self::InvalidTargetSize { height, width } => {
                write!(f, "invalid target size {height}x{width}")
            }
            Self::AntialiasUnsupported => write!(f, "antialiased resampling is not implemented"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for Error {}
