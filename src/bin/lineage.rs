use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lineage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a diagram description as an SVG file.
    Render(RenderArgs),
    /// Dump generated boundary points as JSON.
    Points(PointsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input diagram JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    /// Override the samples per curve declared in the input.
    #[arg(long)]
    resolution: Option<usize>,

    /// Solve bundles and compile lineages in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct PointsArgs {
    /// Input diagram JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Points(args) => cmd_points(args),
    }
}

fn load(path: &Path, resolution: Option<usize>) -> anyhow::Result<lineage::Diagram> {
    let spec = lineage::DiagramSpec::from_path(path)?;
    let mut built = spec
        .build()
        .with_context(|| format!("build diagram from '{}'", path.display()))?;
    if let Some(n) = resolution {
        built.diagram.set_resolution(n)?;
    }
    Ok(built.diagram)
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut diagram = load(&args.in_path, args.resolution)?;
    let opts = lineage::GenerateOpts {
        parallel: args.parallel,
        threads: args.threads,
    };
    let generated = diagram.generate(&opts)?;
    let svg = lineage::to_svg_document(&diagram, &generated);

    ensure_parent(&args.out)?;
    std::fs::write(&args.out, svg)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_points(args: PointsArgs) -> anyhow::Result<()> {
    let mut diagram = load(&args.in_path, None)?;
    let generated = diagram.generate(&lineage::GenerateOpts::default())?;
    let json = serde_json::to_string_pretty(&generated).context("serialize outlines")?;

    match args.out {
        Some(out) => {
            ensure_parent(&out)?;
            std::fs::write(&out, json)
                .with_context(|| format!("write points '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
