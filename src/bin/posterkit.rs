use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "posterkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a poster and save it as PNG.
    Render(RenderArgs),
    /// Print the layout as JSON, optionally resolved to pixel coordinates.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Background template image.
    #[arg(long)]
    template: PathBuf,

    /// Photo to cover-crop into the photo slot.
    #[arg(long)]
    photo: Option<PathBuf>,

    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    unit: String,

    /// Date of birth, drawn verbatim.
    #[arg(long, default_value = "")]
    dob: String,

    /// Font file(s) for the text fields. Required when any text field is set.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Layout JSON; the built-in template layout is used when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Horizontal crop focus for the photo, 0 (left) to 1 (right).
    #[arg(long)]
    focus_x: Option<f64>,

    /// Vertical crop focus for the photo, 0 (top) to 1 (bottom).
    #[arg(long)]
    focus_y: Option<f64>,

    /// Output directory (timestamped file name) or `.png` path.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Layout JSON; the built-in template layout is used when omitted.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Canvas width to resolve against.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Canvas height to resolve against.
    #[arg(long, requires = "width")]
    height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn read_layout(path: Option<&PathBuf>) -> anyhow::Result<posterkit::LayoutSpec> {
    match path {
        Some(p) => posterkit::LayoutSpec::load(p)
            .with_context(|| format!("load layout '{}'", p.display())),
        None => Ok(posterkit::LayoutSpec::default()),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut layout = read_layout(args.layout.as_ref())?;
    if args.focus_x.is_some() || args.focus_y.is_some() {
        let current = layout.photo.focus;
        let focus = posterkit::Focus::new(
            args.focus_x.unwrap_or(current.x),
            args.focus_y.unwrap_or(current.y),
        );
        layout = layout.with_focus(focus.clamped());
    }

    let has_text = [&args.name, &args.unit, &args.dob]
        .iter()
        .any(|s| !s.is_empty());
    if has_text && args.fonts.is_empty() {
        anyhow::bail!("text fields need a font: pass --font <path-to-ttf>");
    }

    let mut fonts = posterkit::FontBook::new();
    for path in &args.fonts {
        fonts.load(path)?;
    }

    let mut session = posterkit::PosterSession::new(layout, fonts)?;
    session.set_name(args.name)?;
    session.set_unit(args.unit)?;
    session.set_dob(args.dob)?;

    let template = posterkit::load_image(&args.template)
        .with_context(|| format!("load template '{}'", args.template.display()))?;
    session.set_template(template)?;

    if let Some(photo_path) = &args.photo {
        let bytes = std::fs::read(photo_path)
            .with_context(|| format!("read photo '{}'", photo_path.display()))?;
        session.load_photo_async(bytes);
        for applied in session.wait_idle()? {
            if !applied.ok {
                anyhow::bail!("could not decode photo '{}'", photo_path.display());
            }
        }
    }

    match session.download(&args.out) {
        Ok(path) => {
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            Err(err.into())
        }
    }
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let layout = read_layout(args.layout.as_ref())?;
    let json = match (args.width, args.height) {
        (Some(width), Some(height)) => {
            let resolved =
                posterkit::ResolvedLayout::resolve(&layout, posterkit::Canvas::new(width, height));
            serde_json::to_string_pretty(&resolved).context("serialize resolved layout")?
        }
        _ => layout.to_json_pretty()?,
    };
    println!("{json}");
    Ok(())
}
