use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use man2site::{Mandoc, Settings};

#[derive(Parser)]
#[command(
    name = "man2site",
    about = "Render man pages to HTML fragments and generate Sphinx pages for them"
)]
struct Cli {
    /// Man pages dir (holds man1 … man8)
    man_dir: PathBuf,
    /// Sphinx docs dir
    out_dir: PathBuf,
    /// Renderer program, called as `<renderer> -T html -O fragment <page>`
    #[arg(long)]
    renderer: Option<String>,
    /// Source repository base URL used for `github_url` links
    #[arg(long)]
    repo_url: Option<String>,
    /// Settings file (toml, yaml, json, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Do not draw a progress bar while rendering
    #[arg(long)]
    no_progress: bool,
    /// More logging (-v debug, -vv trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Scoped to this call instead of installed process-wide
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.verbose))
        .finish();
    tracing::subscriber::with_default(subscriber, || convert(cli))
}

fn env_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn convert(cli: Cli) -> anyhow::Result<()> {
    let t0 = Instant::now();

    let settings = Settings::load(cli.config.as_deref())
        .context("Failed to load settings")?
        .with_overrides(cli.renderer, cli.repo_url, cli.no_progress);

    let renderer = Mandoc::new(settings.renderer.clone());
    let summary = man2site::run(&cli.man_dir, &cli.out_dir, &settings, &renderer)
        .with_context(|| format!("Failed to convert man pages in {:?}", cli.man_dir))?;

    println!(
        "Rendered {} pages in {} sections ({} stubs, {} fragments crosslinked).",
        summary.pages, summary.sections, summary.stubs, summary.crosslinked
    );

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("Done in {}", format_duration(elapsed));
    }
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
