use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use qrstyle::{
    Color, ErrorCorrection, FillSpec, Logo, ModuleMatrix, ModuleShape, RasterOpts, SymbolConfig,
};

/// Longest text accepted for encoding.
const MAX_TEXT_CHARS: usize = 2048;
/// Per-channel difference below which two pixels count as equal in `--check-parity`.
const PARITY_TOLERANCE: u8 = 48;

#[derive(Parser, Debug)]
#[command(name = "qrstyle", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a PNG.
    Png(PngArgs),
    /// Render an SVG document.
    Svg(SvgArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Text to encode.
    #[arg(long)]
    text: Option<String>,

    /// Precomputed module matrix JSON (`{"size", "modules"}` or a list of `#`/`.` rows).
    #[arg(long)]
    matrix: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Base configuration JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output side length in pixels (128..=1024).
    #[arg(long)]
    size: Option<u32>,

    /// Quiet zone in modules (0..=10).
    #[arg(long)]
    margin: Option<u32>,

    #[arg(long, value_enum)]
    shape: Option<ShapeChoice>,

    /// Foreground color, or the first gradient stop.
    #[arg(long)]
    fg: Option<String>,

    /// Background color.
    #[arg(long)]
    bg: Option<String>,

    /// Gradient kind (`linear` or `radial`); anything else renders solid.
    #[arg(long)]
    gradient: Option<String>,

    /// Second gradient stop.
    #[arg(long)]
    fg2: Option<String>,

    /// Logo image (PNG, JPEG, GIF, WebP, BMP or SVG).
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Error-correction level used when encoding `--text`.
    #[arg(long, value_enum, ignore_case = true)]
    ecl: Option<EclChoice>,
}

#[derive(Parser, Debug)]
struct PngArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    /// Device pixel ratio; the bitmap is `size * dpr` pixels square.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Also render the SVG output and report how many pixels differ from the PNG.
    #[arg(long)]
    check_parity: bool,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeChoice {
    Square,
    Rounded,
    Dots,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EclChoice {
    L,
    M,
    Q,
    H,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Png(args) => cmd_png(args),
        Command::Svg(args) => cmd_svg(args),
    }
}

fn cmd_png(args: PngArgs) -> anyhow::Result<()> {
    let config = build_config(&args.style)?;
    let Some(matrix) = load_matrix(&args.input, config.error_correction)? else {
        eprintln!("nothing to render; no file written");
        return Ok(());
    };

    let opts = RasterOpts {
        device_pixel_ratio: args.dpr,
    };
    let Some(image) = qrstyle::export_raster(&matrix, &config, opts)? else {
        eprintln!("nothing to render; no file written");
        return Ok(());
    };

    if args.check_parity
        && let Some(doc) = qrstyle::export_vector(&matrix, &config)?
    {
        let preview = doc.rasterize(args.dpr)?;
        let ratio = image.mismatch_ratio(&preview, PARITY_TOLERANCE)?;
        eprintln!("parity: {:.3}% of pixels differ", ratio * 100.0);
    }

    let png = image.encode_png()?;
    write_output(&args.out, &png)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let config = build_config(&args.style)?;
    let Some(matrix) = load_matrix(&args.input, config.error_correction)? else {
        eprintln!("nothing to render; no file written");
        return Ok(());
    };

    let Some(doc) = qrstyle::export_vector(&matrix, &config)? else {
        eprintln!("nothing to render; no file written");
        return Ok(());
    };

    write_output(&args.out, doc.as_str().as_bytes())?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn build_config(style: &StyleArgs) -> anyhow::Result<SymbolConfig> {
    let mut config = match &style.config {
        Some(path) => SymbolConfig::from_path(path)?,
        None => SymbolConfig::default(),
    };

    if let Some(size) = style.size {
        config.size_px = size;
    }
    if let Some(margin) = style.margin {
        config.margin_modules = margin;
    }
    if let Some(shape) = style.shape {
        config.shape = match shape {
            ShapeChoice::Square => ModuleShape::Square,
            ShapeChoice::Rounded => ModuleShape::Rounded,
            ShapeChoice::Dots => ModuleShape::Dots,
        };
    }
    if let Some(bg) = &style.bg {
        config.background = Color::parse(bg).with_context(|| "parse --bg")?;
    }
    if style.fg.is_some() || style.fg2.is_some() || style.gradient.is_some() {
        let primary = match &style.fg {
            Some(fg) => Color::parse(fg).with_context(|| "parse --fg")?,
            None => config.fill.primary().clone(),
        };
        let secondary = style
            .fg2
            .as_deref()
            .map(Color::parse)
            .transpose()
            .with_context(|| "parse --fg2")?;
        let kind = style.gradient.as_deref().unwrap_or("solid");
        config.fill = FillSpec::from_parts(kind, primary, secondary);
    }
    if let Some(ecl) = style.ecl {
        config.error_correction = match ecl {
            EclChoice::L => ErrorCorrection::L,
            EclChoice::M => ErrorCorrection::M,
            EclChoice::Q => ErrorCorrection::Q,
            EclChoice::H => ErrorCorrection::H,
        };
    }
    if let Some(path) = &style.logo {
        config = config.with_logo(Logo::from_path(path)?);
    }

    config.validate()?;
    Ok(config)
}

/// Resolve the module matrix, or `None` when the input text is empty.
fn load_matrix(input: &InputArgs, ecl: ErrorCorrection) -> anyhow::Result<Option<ModuleMatrix>> {
    if let Some(path) = &input.matrix {
        return read_matrix_json(path).map(Some);
    }

    let text = input.text.as_deref().unwrap_or_default();
    if text.is_empty() {
        return Ok(None);
    }
    validate_text(text)?;

    let level = match ecl {
        ErrorCorrection::L => qrcode::EcLevel::L,
        ErrorCorrection::M => qrcode::EcLevel::M,
        ErrorCorrection::Q => qrcode::EcLevel::Q,
        ErrorCorrection::H => qrcode::EcLevel::H,
    };
    let code = qrcode::QrCode::with_error_correction_level(text.as_bytes(), level)
        .with_context(|| "encode text as a QR code")?;
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    Ok(Some(ModuleMatrix::new(code.width(), modules)?))
}

/// Reject text that is too long, or that starts like an http(s) URL but does not parse as one.
fn validate_text(text: &str) -> anyhow::Result<()> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        anyhow::bail!("text is {chars} characters; at most {MAX_TEXT_CHARS} are accepted");
    }
    if text.starts_with("http://") || text.starts_with("https://") {
        url::Url::parse(text).with_context(|| format!("invalid URL '{text}'"))?;
    }
    Ok(())
}

fn read_matrix_json(path: &Path) -> anyhow::Result<ModuleMatrix> {
    let f = File::open(path).with_context(|| format!("open matrix '{}'", path.display()))?;
    let matrix: ModuleMatrix = serde_json::from_reader(BufReader::new(f))
        .with_context(|| "parse module matrix JSON")?;
    Ok(matrix)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}
