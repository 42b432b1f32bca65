use core::fmt;
use core::str::FromStr;

use ndarray::{ArrayD, ArrayViewD};
use tr_core::{DataFormat, Element, Error, FillMode, from_channels_last, to_channels_last};
use tr_interp::{InterpolationOrder, ResampleParams, resample};

use crate::coords::generate_coordinates;
use crate::transform::{ProjectiveTransform, TransformSet};

/// Interpolation names accepted by the image operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
}

impl Interpolation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
        }
    }

    pub fn order(self) -> InterpolationOrder {
        match self {
            Self::Nearest => InterpolationOrder::Nearest,
            Self::Bilinear => InterpolationOrder::Linear,
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interpolation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Self::Nearest),
            "bilinear" => Ok(Self::Bilinear),
            _ => Err(Error::UnknownInterpolation(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineConfig {
    pub interpolation: Interpolation,
    pub fill_mode: FillMode,
    pub fill_value: f64,
    pub data_format: DataFormat,
}

impl Default for AffineConfig {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Bilinear,
            fill_mode: FillMode::Constant,
            fill_value: 0.0,
            data_format: DataFormat::ChannelsLast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeConfig {
    pub interpolation: Interpolation,
    /// Not implemented; `true` always fails with [`Error::AntialiasUnsupported`].
    pub antialias: bool,
    pub data_format: DataFormat,
}

/// Warps an image through a per-pixel projective transform.
///
/// `image` is `(H, W, C)` or `(B, H, W, C)` (channels first when
/// `cfg.data_format` says so). `transform` is a `(8,)` coefficient array or a
/// `(rows, 8)` batch with `rows` equal to 1 or `B`; each output pixel
/// `(x, y)` samples the source at `transform.map(x, y)`. The output has the
/// shape, layout and dtype of `image`.
pub fn affine_transform<T: Element>(
    image: &ArrayViewD<'_, T>,
    transform: &ArrayViewD<'_, f64>,
    cfg: &AffineConfig,
) -> Result<ArrayD<T>, Error> {
    if !matches!(image.ndim(), 3 | 4) {
        return Err(Error::InvalidImageRank(image.ndim()));
    }
    let transforms = TransformSet::from_array(transform)?;

    let src = to_channels_last(image.view(), cfg.data_format)?;
    let target = spatial_size(src.shape());

    tracing::debug!(
        shape = ?image.shape(),
        dtype = %T::DTYPE,
        interpolation = %cfg.interpolation,
        fill_mode = %cfg.fill_mode,
        rows = transforms.rows(),
        "affine_transform"
    );

    let params = ResampleParams::new(cfg.interpolation.order(), cfg.fill_mode)
        .with_fill_value(cfg.fill_value);
    let out = warp(&src, &transforms, target, &params)?;
    from_channels_last(out, cfg.data_format)
}

/// Resizes the spatial axes of an image to `size = (height, width)`.
///
/// A pure scale: output pixel `(x, y)` samples the source at
/// `(x * W_in / W_out, y * H_in / H_out)`. Scaled coordinates never leave
/// the source grid by more than one tap, which is clamped, so no fill value
/// is ever used.
pub fn resize<T: Element>(
    image: &ArrayViewD<'_, T>,
    size: (usize, usize),
    cfg: &ResizeConfig,
) -> Result<ArrayD<T>, Error> {
    if cfg.antialias {
        return Err(Error::AntialiasUnsupported);
    }
    if !matches!(image.ndim(), 3 | 4) {
        return Err(Error::InvalidImageRank(image.ndim()));
    }
    let (out_h, out_w) = size;
    if out_h == 0 || out_w == 0 {
        return Err(Error::InvalidTargetSize {
            height: out_h,
            width: out_w,
        });
    }

    let src = to_channels_last(image.view(), cfg.data_format)?;
    let (in_h, in_w) = spatial_size(src.shape());
    let scale = ProjectiveTransform::scale(in_w as f64 / out_w as f64, in_h as f64 / out_h as f64);

    tracing::debug!(
        from = ?(in_h, in_w),
        to = ?size,
        interpolation = %cfg.interpolation,
        "resize"
    );

    let params = ResampleParams::new(cfg.interpolation.order(), FillMode::Constant)
        .with_validity_check(false);
    let out = warp(&src, &TransformSet::from(scale), size, &params)?;
    from_channels_last(out, cfg.data_format)
}

/// `(H, W)` of a channels-last rank-3 or rank-4 shape.
fn spatial_size(shape: &[usize]) -> (usize, usize) {
    let n = shape.len();
    (shape[n - 3], shape[n - 2])
}

/// Samples a channels-last image on the grid generated by `transforms`.
fn warp<T: Element>(
    src: &ArrayViewD<'_, T>,
    transforms: &TransformSet,
    target: (usize, usize),
    params: &ResampleParams,
) -> Result<ArrayD<T>, Error> {
    let batch = (src.ndim() == 4).then(|| src.shape()[0]);
    let coords = generate_coordinates(transforms, target, batch)?;
    let views: Vec<ArrayViewD<'_, f64>> = coords.iter().map(|c| c.view()).collect();
    resample(src, &views, params)
}

#[cfg(test)]
mod tests {
    use ndarray::{Array, ArrayD, IxDyn, arr1, arr2};
    use tr_core::{DataFormat, Error, ErrorKind, FillMode};

    use super::{AffineConfig, Interpolation, ResizeConfig, affine_transform, resize};

    fn identity() -> ArrayD<f64> {
        arr1(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]).into_dyn()
    }

    fn hwc(h: usize, w: usize, c: usize) -> ArrayD<u8> {
        Array::from_shape_fn(IxDyn(&[h, w, c]), |ix| (ix[0] * 40 + ix[1] * 7 + ix[2]) as u8)
    }

    #[test]
    fn identity_transform_returns_the_source() {
        let img = hwc(3, 4, 2);
        let t = identity();
        for interpolation in [Interpolation::Nearest, Interpolation::Bilinear] {
            for fill_mode in FillMode::ALL {
                let cfg = AffineConfig {
                    interpolation,
                    fill_mode,
                    ..AffineConfig::default()
                };
                let out = affine_transform(&img.view(), &t.view(), &cfg).expect("valid");
                assert_eq!(out, img, "{interpolation} {fill_mode}");
            }
        }
    }

    #[test]
    fn identity_transform_on_a_channels_first_batch() {
        let img = Array::from_shape_fn(IxDyn(&[2, 3, 2, 4]), |ix| {
            (ix[0] * 100 + ix[1] * 10 + ix[2] * 4 + ix[3]) as f32
        });
        let t = arr2(&[
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
        ])
        .into_dyn();
        let cfg = AffineConfig {
            data_format: DataFormat::ChannelsFirst,
            ..AffineConfig::default()
        };

        let out = affine_transform(&img.view(), &t.view(), &cfg).expect("valid");
        assert_eq!(out, img);
        assert!(out.is_standard_layout());
    }

    #[test]
    fn translation_shifts_and_fills() {
        let img = arr2(&[[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]])
            .into_shape_with_order(IxDyn(&[2, 3, 1]))
            .expect("valid shape");
        // Output pixel (x, y) samples source (x + 1, y).
        let t = arr1(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0]).into_dyn();

        let cfg = AffineConfig {
            fill_value: -1.0,
            ..AffineConfig::default()
        };
        let out = affine_transform(&img.view(), &t.view(), &cfg).expect("valid");
        assert_eq!(out.as_slice(), Some(&[2.0, 3.0, -1.0, 5.0, 6.0, -1.0][..]));

        let cfg = AffineConfig {
            fill_mode: FillMode::Wrap,
            ..AffineConfig::default()
        };
        let out = affine_transform(&img.view(), &t.view(), &cfg).expect("valid");
        assert_eq!(out.as_slice(), Some(&[2.0, 3.0, 1.0, 5.0, 6.0, 4.0][..]));
    }

    #[test]
    fn batched_transforms_apply_per_image() {
        let img = Array::from_shape_fn(IxDyn(&[2, 1, 3, 1]), |ix| (ix[0] * 10 + ix[2]) as i32);
        let t = arr2(&[
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.0, 0.0],
        ])
        .into_dyn();
        let cfg = AffineConfig {
            fill_mode: FillMode::Nearest,
            ..AffineConfig::default()
        };

        let out = affine_transform(&img.view(), &t.view(), &cfg).expect("valid");
        // Image 1 is sampled half a pixel to the right: 10.5 -> 10, 11.5 -> 12, 12 (clamped).
        assert_eq!(out.as_slice(), Some(&[0, 1, 2, 10, 12, 12][..]));
    }

    #[test]
    fn affine_validation() {
        let img = hwc(2, 2, 1);
        let cfg = AffineConfig::default();

        let flat = ArrayD::<u8>::zeros(IxDyn(&[2, 2]));
        assert_eq!(
            affine_transform(&flat.view(), &identity().view(), &cfg),
            Err(Error::InvalidImageRank(2))
        );

        let cube = ArrayD::<f64>::zeros(IxDyn(&[1, 1, 8]));
        assert_eq!(
            affine_transform(&img.view(), &cube.view(), &cfg),
            Err(Error::InvalidTransformRank(3))
        );

        let two = ArrayD::<f64>::zeros(IxDyn(&[2, 8]));
        assert_eq!(
            affine_transform(&img.view(), &two.view(), &cfg),
            Err(Error::TransformBatchMismatch {
                expected: 1,
                actual: 2
            })
        );

        let err = "bicubic".parse::<Interpolation>().expect_err("unknown");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn nearest_upscale_repeats_each_pixel_in_a_block() {
        let img = arr2(&[[1u8, 2], [3, 4]])
            .into_shape_with_order(IxDyn(&[2, 2, 1]))
            .expect("valid shape");
        let cfg = ResizeConfig {
            interpolation: Interpolation::Nearest,
            ..ResizeConfig::default()
        };

        let out = resize(&img.view(), (4, 4), &cfg).expect("valid");
        assert_eq!(out.shape(), &[4, 4, 1]);
        let expected = [
            1u8, 1, 2, 2, //
            1, 1, 2, 2, //
            3, 3, 4, 4, //
            3, 3, 4, 4,
        ];
        assert_eq!(out.as_slice(), Some(&expected[..]));
    }

    #[test]
    fn bilinear_upscale_blends_and_clamps_the_edge() {
        let img = arr2(&[[0.0f32, 10.0]])
            .into_shape_with_order(IxDyn(&[1, 2, 1]))
            .expect("valid shape");
        let out = resize(&img.view(), (1, 4), &ResizeConfig::default()).expect("valid");
        assert_eq!(out.as_slice(), Some(&[0.0f32, 5.0, 10.0, 10.0][..]));
    }

    #[test]
    fn non_square_resize_scales_each_axis() {
        let img = Array::from_shape_fn(IxDyn(&[2, 4, 1]), |ix| (ix[0] * 10 + ix[1]) as u16);
        let cfg = ResizeConfig {
            interpolation: Interpolation::Nearest,
            ..ResizeConfig::default()
        };

        let out = resize(&img.view(), (4, 2), &cfg).expect("valid");
        assert_eq!(out.shape(), &[4, 2, 1]);
        // Rows sample 0, 0.5 -> 0, 1, 1.5 -> 2 (clamped to 1); columns sample 0, 2.
        assert_eq!(out.as_slice(), Some(&[0u16, 2, 0, 2, 10, 12, 10, 12][..]));
    }

    #[test]
    fn resize_channels_first_batch() {
        let img = Array::from_shape_fn(IxDyn(&[2, 3, 2, 2]), |ix| {
            (ix[0] * 100 + ix[1] * 10 + ix[2] * 2 + ix[3]) as f64
        });
        let cfg = ResizeConfig {
            data_format: DataFormat::ChannelsFirst,
            ..ResizeConfig::default()
        };
        let out = resize(&img.view(), (2, 2), &cfg).expect("valid");
        assert_eq!(out, img);

        let up = resize(&img.view(), (4, 4), &cfg).expect("valid");
        assert_eq!(up.shape(), &[2, 3, 4, 4]);
        assert_eq!(up[[1, 2, 1, 1]], 120.0 + 0.5 * 2.0 + 0.5);
    }

    #[test]
    fn resize_validation() {
        let img = hwc(2, 2, 1);
        let antialias = ResizeConfig {
            antialias: true,
            ..ResizeConfig::default()
        };
        let err = resize(&img.view(), (4, 4), &antialias).expect_err("antialias");
        assert_eq!(err, Error::AntialiasUnsupported);
        assert_eq!(err.kind(), ErrorKind::NotSupported);

        let flat = ArrayD::<u8>::zeros(IxDyn(&[2, 2]));
        assert_eq!(
            resize(&flat.view(), (4, 4), &antialias),
            Err(Error::AntialiasUnsupported)
        );
        assert_eq!(
            resize(&flat.view(), (4, 4), &ResizeConfig::default()),
            Err(Error::InvalidImageRank(2))
        );
        assert_eq!(
            resize(&img.view(), (0, 4), &ResizeConfig::default()),
            Err(Error::InvalidTargetSize {
                height: 0,
                width: 4
            })
        );
    }
}
