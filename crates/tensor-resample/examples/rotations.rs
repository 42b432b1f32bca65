//! Example: rotate one image by several angles in a single batched warp.
//!
//! Stacks N copies of an RGB image into a `(N, H, W, 3)` batch, builds one
//! rotation-about-the-center row per copy and runs `affine_transform` once.
//! Each frame is written as `<stem>_rot<i>.png` next to the output JSON.
//!
//! Run from the workspace root:
//!   cargo run -p tensor-resample --example rotations -- --help
//!   cargo run -p tensor-resample --example rotations -- --input data/in.png

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::{ImageReader, RgbImage};
use ndarray::{Array2, Array4, ArrayD, Axis};
use serde::Serialize;
use tensor_resample::{AffineConfig, FillMode, Interpolation, affine_transform};

#[derive(Parser, Debug)]
#[command(about = "Rotate an image by several angles with one batched warp")]
struct Args {
    #[arg(long, required = true)]
    input: PathBuf,

    /// Number of evenly spaced angles in `[0, 360)`.
    #[arg(long, default_value_t = 8)]
    n_angles: usize,

    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,

    #[arg(long, default_value = "constant")]
    fill_mode: FillMode,

    /// Output directory (default: next to the input)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct FrameDto {
    index: usize,
    angle_deg: f64,
    transform: [f64; 8],
    path: String,
}

#[derive(Serialize)]
struct Summary {
    input_shape: Vec<usize>,
    batch_shape: Vec<usize>,
    interpolation: &'static str,
    fill_mode: &'static str,
    elapsed_ms: f64,
    frames: Vec<FrameDto>,
}

/// Output-to-source map of a rotation by `theta` about `(cx, cy)`.
fn rotation_about(theta: f64, cx: f64, cy: f64) -> [f64; 8] {
    let (s, c) = theta.sin_cos();
    [
        c,
        -s,
        cx - c * cx + s * cy,
        s,
        c,
        cy - s * cx - c * cy,
        0.0,
        0.0,
    ]
}

fn save_frame(path: &Path, frame: ArrayD<u8>) -> Result<()> {
    let &[h, w, 3] = frame.shape() else {
        bail!("expected an (H, W, 3) frame, got {:?}", frame.shape());
    };
    let data: Vec<u8> = frame.iter().copied().collect();
    RgbImage::from_raw(w as u32, h as u32, data)
        .context("constructing RgbImage from raw bytes")?
        .save(path)
        .with_context(|| format!("saving {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.n_angles == 0 {
        bail!("--n-angles must be > 0");
    }

    let rgb = ImageReader::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?
        .decode()
        .with_context(|| format!("decoding {}", args.input.display()))?
        .into_rgb8();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);
    let raw = rgb.into_raw();

    let n = args.n_angles;
    let batch = Array4::from_shape_fn((n, h, w, 3), |(_, y, x, ch)| raw[(y * w + x) * 3 + ch]);

    let (cx, cy) = ((w as f64 - 1.0) * 0.5, (h as f64 - 1.0) * 0.5);
    let angles: Vec<f64> = (0..n).map(|i| 360.0 * i as f64 / n as f64).collect();
    let mut transforms = Array2::<f64>::zeros((n, 8));
    for (mut row, &deg) in transforms.axis_iter_mut(Axis(0)).zip(&angles) {
        row.assign(&ndarray::arr1(&rotation_about(deg.to_radians(), cx, cy)));
    }

    let cfg = AffineConfig {
        interpolation: args.interpolation,
        fill_mode: args.fill_mode,
        ..AffineConfig::default()
    };

    let t0 = Instant::now();
    let out = affine_transform(
        &batch.view().into_dyn(),
        &transforms.view().into_dyn(),
        &cfg,
    )
    .context("warping batch")?;
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;
    println!("warped {n} frames of {w}x{h} in {elapsed_ms:.2} ms");

    let out_dir = args.out.clone().unwrap_or_else(|| {
        args.input
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf()
    });
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let stem = args
        .input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();

    let mut frames = Vec::with_capacity(n);
    for (i, frame) in out.axis_iter(Axis(0)).enumerate() {
        let path = out_dir.join(format!("{stem}_rot{i}.png"));
        save_frame(&path, frame.to_owned())?;
        frames.push(FrameDto {
            index: i,
            angle_deg: angles[i],
            transform: rotation_about(angles[i].to_radians(), cx, cy),
            path: path.to_string_lossy().into_owned(),
        });
    }

    let summary = Summary {
        input_shape: vec![h, w, 3],
        batch_shape: out.shape().to_vec(),
        interpolation: cfg.interpolation.as_str(),
        fill_mode: cfg.fill_mode.as_str(),
        elapsed_ms,
        frames,
    };
    let json_path = out_dir.join(format!("{stem}_rotations.json"));
    let file = std::fs::File::create(&json_path)
        .with_context(|| format!("creating {}", json_path.display()))?;
    serde_json::to_writer_pretty(file, &summary)
        .with_context(|| format!("writing JSON to {}", json_path.display()))?;

    println!("results written to {}", json_path.display());
    Ok(())
}
