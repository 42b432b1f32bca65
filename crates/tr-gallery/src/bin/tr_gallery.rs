use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbImage;
use ndarray::{Array, ArrayD, IxDyn};
use serde::Serialize;
use tensor_resample::{
    AffineConfig, DataFormat, FillMode, Interpolation, ProjectiveTransform, ResizeConfig,
    affine_transform, map_coordinates, resize,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tr_gallery")]
#[command(about = "Run tensor resampling operations on external images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "resize")]
    Resize(ResizeArgs),
    #[command(name = "affine")]
    Affine(AffineArgs),
    #[command(name = "shift")]
    Shift(ShiftArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ResizeArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, required = true)]
    height: usize,
    #[arg(long, required = true)]
    width: usize,
    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,
    #[arg(long, default_value_t = false)]
    antialias: bool,
}

#[derive(Args, Debug, Clone)]
struct AffineArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Eight comma-separated coefficients `a0,a1,a2,b0,b1,b2,c0,c1`.
    #[arg(long, value_delimiter = ',', default_value = "1,0,0,0,1,0,0,0")]
    transform: Vec<f64>,
    #[arg(long, default_value = "bilinear")]
    interpolation: Interpolation,
    #[arg(long, default_value = "constant")]
    fill_mode: FillMode,
    #[arg(long, default_value_t = 0.0)]
    fill_value: f64,
}

#[derive(Args, Debug, Clone)]
struct ShiftArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, default_value_t = 0.0)]
    dy: f64,
    #[arg(long, default_value_t = 0.0)]
    dx: f64,
    #[arg(long, default_value_t = 1)]
    order: usize,
    #[arg(long, default_value = "constant")]
    fill_mode: FillMode,
    #[arg(long, default_value_t = 0.0)]
    fill_value: f64,
}

#[derive(Debug, Serialize)]
struct MetaResize {
    case: &'static str,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    interpolation: &'static str,
    antialias: bool,
    data_format: &'static str,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct MetaAffine {
    case: &'static str,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    transform: [f64; 8],
    projective: bool,
    interpolation: &'static str,
    fill_mode: &'static str,
    fill_value: f64,
    elapsed_ms: f64,
}

#[derive(Debug, Serialize)]
struct MetaShift {
    case: &'static str,
    input_shape: Vec<usize>,
    output_shape: Vec<usize>,
    dy: f64,
    dx: f64,
    order: usize,
    fill_mode: &'static str,
    fill_value: f64,
    elapsed_ms: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Resize(args) => run_resize(args),
        Command::Affine(args) => run_affine(args),
        Command::Shift(args) => run_shift(args),
    }
}

fn run_resize(args: ResizeArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "resize")?;
    let img = load_input_rgb(&args.common.input)?;

    let cfg = ResizeConfig {
        interpolation: args.interpolation,
        antialias: args.antialias,
        data_format: DataFormat::ChannelsLast,
    };

    let start = Instant::now();
    let out = resize(&img.view(), (args.height, args.width), &cfg)
        .with_context(|| format!("resizing to {}x{}", args.height, args.width))?;
    let elapsed_ms = elapsed_ms(start);
    tracing::info!(?elapsed_ms, shape = ?out.shape(), "resize done");

    save_rgb_image(case_dir.join("resize.png"), &out)?;
    write_json(
        case_dir.join("resize.json"),
        &MetaResize {
            case: "resize",
            input_shape: img.shape().to_vec(),
            output_shape: out.shape().to_vec(),
            interpolation: cfg.interpolation.as_str(),
            antialias: cfg.antialias,
            data_format: cfg.data_format.as_str(),
            elapsed_ms,
        },
    )?;

    Ok(())
}

fn run_affine(args: AffineArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "affine")?;
    let img = load_input_rgb(&args.common.input)?;

    let transform = ProjectiveTransform::from_slice(&args.transform)
        .context("parsing --transform coefficients")?;
    let coeffs = Array::from_vec(transform.coeffs.to_vec()).into_dyn();
    let cfg = AffineConfig {
        interpolation: args.interpolation,
        fill_mode: args.fill_mode,
        fill_value: args.fill_value,
        data_format: DataFormat::ChannelsLast,
    };

    let start = Instant::now();
    let out = affine_transform(&img.view(), &coeffs.view(), &cfg)
        .context("applying affine transform")?;
    let elapsed_ms = elapsed_ms(start);
    tracing::info!(?elapsed_ms, shape = ?out.shape(), "affine done");

    save_rgb_image(case_dir.join("affine.png"), &out)?;
    write_json(
        case_dir.join("affine.json"),
        &MetaAffine {
            case: "affine",
            input_shape: img.shape().to_vec(),
            output_shape: out.shape().to_vec(),
            transform: transform.coeffs,
            projective: !transform.is_affine(),
            interpolation: cfg.interpolation.as_str(),
            fill_mode: cfg.fill_mode.as_str(),
            fill_value: cfg.fill_value,
            elapsed_ms,
        },
    )?;

    Ok(())
}

fn run_shift(args: ShiftArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "shift")?;
    let img = load_input_rgb(&args.common.input)?;

    let (h, w, c) = (img.shape()[0], img.shape()[1], img.shape()[2]);
    let ys = Array::from_shape_fn(IxDyn(&[h, 1, 1]), |ix| ix[0] as f64 - args.dy);
    let xs = Array::from_shape_fn(IxDyn(&[1, w, 1]), |ix| ix[1] as f64 - args.dx);
    let cs = Array::from_shape_fn(IxDyn(&[1, 1, c]), |ix| ix[2] as f64);

    let start = Instant::now();
    let out = map_coordinates(
        &img.view(),
        &[ys.view(), xs.view(), cs.view()],
        args.order,
        args.fill_mode,
        args.fill_value,
    )
    .with_context(|| format!("shifting by ({}, {})", args.dy, args.dx))?;
    let elapsed_ms = elapsed_ms(start);
    tracing::info!(?elapsed_ms, shape = ?out.shape(), "shift done");

    save_rgb_image(case_dir.join("shift.png"), &out)?;
    write_json(
        case_dir.join("shift.json"),
        &MetaShift {
            case: "shift",
            input_shape: img.shape().to_vec(),
            output_shape: out.shape().to_vec(),
            dy: args.dy,
            dx: args.dx,
            order: args.order,
            fill_mode: args.fill_mode.as_str(),
            fill_value: args.fill_value,
            elapsed_ms,
        },
    )?;

    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    fs::copy(&common.input, case_dir.join("input.png")).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            case_dir.join("input.png").display()
        )
    })?;

    Ok(case_dir)
}

/// Loads `path` as an `(H, W, 3)` channels-last `u8` tensor.
fn load_input_rgb(path: &Path) -> Result<ArrayD<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = rgb.dimensions();

    Array::from_shape_vec(IxDyn(&[h as usize, w as usize, 3]), rgb.into_raw())
        .with_context(|| format!("constructing tensor from {}", path.display()))
}

fn save_rgb_image(path: PathBuf, tensor: &ArrayD<u8>) -> Result<()> {
    let &[h, w, 3] = tensor.shape() else {
        bail!("expected an (H, W, 3) tensor, got {:?}", tensor.shape());
    };
    let data: Vec<u8> = tensor.iter().copied().collect();
    let rgb = RgbImage::from_raw(w as u32, h as u32, data)
        .context("constructing RgbImage from raw bytes")?;
    rgb.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
