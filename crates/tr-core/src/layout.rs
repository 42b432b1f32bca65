use core::fmt;
use core::str::FromStr;

use ndarray::{ArrayD, ArrayViewD};

use crate::Error;

/// Position of the channel axis in a rank-3 `(H, W, C)` / rank-4
/// `(B, H, W, C)` image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataFormat {
    #[default]
    ChannelsLast,
    ChannelsFirst,
}

impl DataFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ChannelsLast => "channels_last",
            Self::ChannelsFirst => "channels_first",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "channels_last" => Ok(Self::ChannelsLast),
            "channels_first" => Ok(Self::ChannelsFirst),
            _ => Err(Error::UnknownDataFormat(s.to_owned())),
        }
    }
}

fn check_image_rank(rank: usize) -> Result<(), Error> {
    if rank == 3 || rank == 4 {
        Ok(())
    } else {
        Err(Error::InvalidImageRank(rank))
    }
}

/// Reorders the axes of `image` so that channels come last.
///
/// Returns a view; no data is copied.
pub fn to_channels_last<'a, T>(
    image: ArrayViewD<'a, T>,
    format: DataFormat,
) -> Result<ArrayViewD<'a, T>, Error> {
    check_image_rank(image.ndim())?;
    Ok(match (format, image.ndim()) {
        (DataFormat::ChannelsLast, _) => image,
        (DataFormat::ChannelsFirst, 3) => image.permuted_axes(&[1, 2, 0][..]),
        (DataFormat::ChannelsFirst, _) => image.permuted_axes(&[0, 2, 3, 1][..]),
    })
}

/// Inverse of [`to_channels_last`], materialized in standard layout.
pub fn from_channels_last<T: Clone>(image: ArrayD<T>, format: DataFormat) -> Result<ArrayD<T>, Error> {
    check_image_rank(image.ndim())?;
    Ok(match (format, image.ndim()) {
        (DataFormat::ChannelsLast, _) => image,
        (DataFormat::ChannelsFirst, 3) => {
            image.permuted_axes(&[2, 0, 1][..]).as_standard_layout().into_owned()
        }
        (DataFormat::ChannelsFirst, _) => {
            image.permuted_axes(&[0, 3, 1, 2][..]).as_standard_layout().into_owned()
        }
    })
}
