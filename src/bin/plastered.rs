use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use plastered::{
    BackendPreference, ExportDecision, ExportPreset, ExportSize, PosterContent, PosterRenderer,
    ReleaseInfo, RendererOpts,
};

#[derive(Parser, Debug)]
#[command(name = "plastered", version, about = "Render album posters to PNG")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster content file to PNG.
    Render(RenderArgs),
    /// Sample a suggested palette from a cover image.
    Palette(PaletteArgs),
    /// Print geometry, tracklist flow and draw commands as JSON.
    Plan(PlanArgs),
    /// Build poster content from normalized release metadata.
    Release(ReleaseArgs),
    /// List export presets.
    Presets,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input poster content JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path. Defaults to `Plastered-<album>.png` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Custom output size, `WxH`.
    #[arg(long, conflicts_with = "preset")]
    size: Option<ExportSize>,

    /// Export preset (extra-small, small, medium, large).
    #[arg(long)]
    preset: Option<ExportPreset>,

    /// Downscale an oversize request to a safe width.
    #[arg(long, conflicts_with = "force")]
    downscale: bool,

    /// Render an oversize request at the requested size anyway.
    #[arg(long)]
    force: bool,

    #[arg(long, value_enum)]
    backend: Option<BackendChoice>,

    /// Base for relative image paths. Defaults to the content file's directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Write the auto-fitted title size back into the content file.
    #[arg(long)]
    commit_fit: bool,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Cover image to sample.
    #[arg(long)]
    image: PathBuf,

    /// Content file to update with the sampled colors.
    #[arg(long)]
    apply: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    size: Option<ExportSize>,
}

#[derive(Parser, Debug)]
struct ReleaseArgs {
    /// Release metadata JSON (`title`, `artists`, `tracks`, `date`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Cover image reference to attach.
    #[arg(long)]
    cover: Option<String>,

    /// Output content JSON. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Auto,
    Cpu,
    Gpu,
}

impl From<BackendChoice> for BackendPreference {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Auto => Self::Auto,
            BackendChoice::Cpu => Self::Cpu,
            BackendChoice::Gpu => Self::Gpu,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Palette(args) => cmd_palette(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Release(args) => cmd_release(args),
        Command::Presets => cmd_presets(),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("plastered=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json + "\n").with_context(|| format!("write '{}'", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn renderer_for(
    in_path: &Path,
    assets_root: Option<PathBuf>,
    backend: Option<BackendChoice>,
) -> anyhow::Result<PosterRenderer> {
    let mut opts = RendererOpts::from_env();
    if let Some(root) = assets_root {
        opts.assets_root = root;
    } else if std::env::var_os(plastered::config::ASSETS_ROOT_ENV).is_none() {
        opts.assets_root = match in_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
    }
    if let Some(choice) = backend {
        opts = opts.with_backend(choice.into());
    }
    PosterRenderer::new(&opts).context("create renderer")
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let content: PosterContent = read_json(&args.in_path, "poster content")?;

    let requested = match (args.size, args.preset) {
        (Some(size), _) => size,
        (None, Some(preset)) => preset.size(),
        (None, None) => ExportSize::BASE,
    };
    let size = match plastered::govern(requested) {
        ExportDecision::Proceed { size } => size,
        ExportDecision::Confirm { pending } if args.downscale => pending.downscale(),
        ExportDecision::Confirm { pending } if args.force => pending.proceed_anyway(),
        ExportDecision::Confirm { pending } => {
            anyhow::bail!(
                "{requested} exceeds {} pixels; pass --downscale (renders {}) or --force",
                plastered::export::PIXEL_CEILING,
                pending.downscaled_size()
            );
        }
    };

    let mut renderer = renderer_for(&args.in_path, args.assets_root, args.backend)?;
    let poster = renderer.render(&content, size)?;

    for skipped in &poster.report.skipped {
        eprintln!("warning: {:?} layer skipped: {}", skipped.layer, skipped.reason);
    }

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(plastered::export_file_name(&content.album_name)));
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, poster.png.as_slice())
        .with_context(|| format!("write png '{}'", out.display()))?;

    if args.commit_fit
        && let Some(fit) = poster.title_fit
    {
        write_json(&args.in_path, &content.commit_title_fit(&fit))?;
        eprintln!("committed title size {}", fit.base_size);
    }

    eprintln!("wrote {} ({size}, {} bytes)", out.display(), poster.png.len());
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(&args.image).with_context(|| format!("read '{}'", args.image.display()))?;
    let Some(palette) = plastered::sample_palette_bytes(&bytes) else {
        eprintln!("no palette: image could not be sampled");
        return Ok(());
    };
    print_json(&palette)?;

    if let Some(path) = args.apply {
        let content: PosterContent = read_json(&path, "poster content")?;
        write_json(&path, &content.apply_palette(&palette))?;
        eprintln!("applied palette to {}", path.display());
    }
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let content: PosterContent = read_json(&args.in_path, "poster content")?;
    let mut renderer = renderer_for(&args.in_path, None, None)?;
    let plan = renderer.plan(&content, args.size.unwrap_or(ExportSize::BASE));
    print_json(&plan)
}

fn cmd_release(args: ReleaseArgs) -> anyhow::Result<()> {
    let release: ReleaseInfo = read_json(&args.in_path, "release")?;
    let mut content = release.apply_to(&PosterContent::default());
    if let Some(cover) = args.cover {
        content = content.with_cover(cover, None);
    }
    match args.out {
        Some(path) => {
            write_json(&path, &content)?;
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        None => print_json(&content),
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for preset in ExportPreset::ALL {
        let size = preset.size();
        let action = match plastered::govern(size) {
            ExportDecision::Proceed { .. } => "proceeds".to_string(),
            ExportDecision::Confirm { pending } => {
                format!("needs confirmation (downscale: {})", pending.downscaled_size())
            }
        };
        writeln!(
            out,
            "{:<12} {:<12} {:>6.1} MP  {action}",
            preset.to_string(),
            size.to_string(),
            size.pixels() as f64 / 1_000_000.0
        )?;
    }
    Ok(())
}
