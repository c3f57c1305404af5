use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "memeforge", version)]
struct Cli {
    /// JSON config file; `MEMEFORGE_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite an image with captions into a PNG.
    Render(RenderArgs),
    /// Downscale and re-encode an image for upload.
    Optimize(OptimizeArgs),
    /// Write a JPEG thumbnail.
    Thumbnail(ThumbnailArgs),
    /// Print the dimension validation report as JSON.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Image reference: path, file://, http(s):// or data: URL.
    #[arg(long)]
    image: String,

    #[arg(long, default_value = "")]
    top: String,

    #[arg(long, default_value = "")]
    bottom: String,

    /// Canvas width (defaults to config).
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (defaults to config).
    #[arg(long)]
    height: Option<u32>,

    /// Export quality in [0, 1] (defaults to config).
    #[arg(long)]
    quality: Option<f32>,

    /// Caption font file.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct OptimizeArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    max_width: Option<u32>,

    #[arg(long)]
    max_height: Option<u32>,

    #[arg(long)]
    quality: Option<f32>,

    /// png, jpeg or webp; picks the best supported lossy format when omitted.
    #[arg(long)]
    format: Option<memeforge::OutputFormat>,
}

#[derive(Parser, Debug)]
struct ThumbnailArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    out: PathBuf,

    /// Longer side in pixels (defaults to config).
    #[arg(long)]
    size: Option<u32>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Render(args) => cmd_render(config, args).await,
        Command::Optimize(args) => cmd_optimize(config, args).await,
        Command::Thumbnail(args) => cmd_thumbnail(config, args).await,
        Command::Validate(args) => cmd_validate(config, args).await,
    }
}

#[cfg(feature = "http")]
fn image_loader() -> anyhow::Result<memeforge::ImageLoader> {
    let fetcher = memeforge::HttpFetcher::new()?;
    Ok(memeforge::ImageLoader::new(
        std::sync::Arc::new(fetcher),
        memeforge::ObjectUrlRegistry::new(),
    ))
}

#[cfg(not(feature = "http"))]
fn image_loader() -> anyhow::Result<memeforge::ImageLoader> {
    Ok(memeforge::ImageLoader::default())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<memeforge::MemeforgeConfig> {
    let mut config = match path {
        Some(p) => memeforge::MemeforgeConfig::load(p)?,
        None => memeforge::MemeforgeConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}

async fn cmd_render(config: memeforge::MemeforgeConfig, args: RenderArgs) -> anyhow::Result<()> {
    let mut opts = config.compositor;
    if args.width.is_some() || args.height.is_some() {
        opts.canvas = memeforge::Canvas::new(
            args.width.unwrap_or(opts.canvas.width),
            args.height.unwrap_or(opts.canvas.height),
        )?;
    }
    if let Some(q) = args.quality {
        opts.quality = memeforge::Quality::new(q)?;
    }
    if args.font.is_some() {
        opts.font_path = args.font;
    }

    let compositor = memeforge::Compositor::from_opts(image_loader()?, &opts);
    let composite = memeforge::MemeComposite::new(args.image, args.top, args.bottom, &opts);
    let raster = compositor.render(&composite).await?;
    memeforge::download(&raster, &args.out).await?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_optimize(config: memeforge::MemeforgeConfig, args: OptimizeArgs) -> anyhow::Result<()> {
    let mut opts = config.optimize;
    if let Some(w) = args.max_width {
        opts.max_width = w;
    }
    if let Some(h) = args.max_height {
        opts.max_height = h;
    }
    if let Some(q) = args.quality {
        opts.quality = memeforge::Quality::new(q)?;
    }
    if args.format.is_some() {
        opts.format = args.format;
    }

    let file = memeforge::UploadFile::from_path(&args.in_path).await?;
    let optimized = memeforge::ImageOptimizer::default()
        .optimize(&file, &opts)
        .await?;
    write_output(&args.out, &optimized.blob.bytes).await?;

    eprintln!(
        "wrote {} ({}x{}, {} -> {} bytes, ratio {:.3})",
        args.out.display(),
        optimized.width,
        optimized.height,
        optimized.original_size_bytes,
        optimized.optimized_size_bytes,
        optimized.compression_ratio
    );
    Ok(())
}

async fn cmd_thumbnail(config: memeforge::MemeforgeConfig, args: ThumbnailArgs) -> anyhow::Result<()> {
    let mut opts = config.thumbnail;
    if let Some(size) = args.size {
        opts.size = size;
    }

    let file = memeforge::UploadFile::from_path(&args.in_path).await?;
    let data_url = memeforge::ImageOptimizer::default()
        .create_thumbnail_with(&file, &opts)
        .await?;
    let source = memeforge::ImageSource::parse(&data_url)?;
    let memeforge::ImageSource::Data { bytes, .. } = source else {
        anyhow::bail!("thumbnail was not returned as a data url");
    };
    write_output(&args.out, &bytes).await?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_validate(config: memeforge::MemeforgeConfig, args: ValidateArgs) -> anyhow::Result<()> {
    let file = memeforge::UploadFile::from_path(&args.in_path).await?;
    let report = memeforge::ImageOptimizer::default()
        .validate_dimensions(&file, &config.dimensions)
        .await;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize dimension report")?
    );
    Ok(())
}

async fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("write output '{}'", path.display()))
}
