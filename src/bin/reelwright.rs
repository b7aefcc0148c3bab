use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelwright", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a script into a numbered PNG sequence.
    Render(RenderArgs),
    /// Build a script's effect graph and report configuration errors.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Output path template such as `out/frame_%04d.png`; overrides the script.
    #[arg(long)]
    out: Option<String>,

    /// First frame to render (inclusive); overrides the script.
    #[arg(long)]
    first: Option<u64>,

    /// Last frame to render (inclusive); overrides the script.
    #[arg(long)]
    last: Option<u64>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input script JSON.
    #[arg(long)]
    script: PathBuf,
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
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut script = reelwright::Script::from_path(&args.script)?;
    if let Some(first) = args.first {
        script.run_mut().first_frame = first;
    }
    if let Some(last) = args.last {
        script.run_mut().last_frame = last;
    }

    let director = reelwright::Director::new(script);
    let stats = director.render_png(args.out.as_deref())?;
    eprintln!(
        "wrote {} frames ({} committed, {} fallback)",
        stats.frames_written, stats.frames_committed, stats.frames_fallback
    );
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let script = reelwright::Script::from_path(&args.script)?;
    let controller = reelwright::Director::new(script).build()?;
    let range = controller.range();
    eprintln!(
        "ok: {} effects, {} keepers, frames {}..={} at {}",
        controller.effects().len(),
        controller.keeper_count(),
        range.start.0,
        range.last().0,
        controller.size()
    );
    Ok(())
}
