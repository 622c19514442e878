use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use ft_core::package::image_name;
use ft_core::{Config, DirPackage, import_package};
use ft_player::TestSession;
use std::path::{Path, PathBuf};

mod script;

#[derive(Parser, Debug)]
#[command(name = "frametest", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the frames and boxes of an unpacked package directory.
    Inspect(InspectArgs),
    /// Play a package through a scripted session and print the score.
    Replay(ReplayArgs),
    /// Validate a JSON config override file and print the merged result.
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    package: PathBuf,
}

#[derive(Args, Debug)]
struct ReplayArgs {
    package: PathBuf,
    script: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the review of every frame as JSON after the score.
    #[arg(long)]
    review: bool,
}

#[derive(Args, Debug)]
struct CheckConfigArgs {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Replay(args) => cmd_replay(args),
        Command::CheckConfig(args) => cmd_check_config(args),
    }
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let frames = import_package(&DirPackage::new(&args.package))
        .with_context(|| format!("import package '{}'", args.package.display()))?;

    for (i, frame) in frames.iter().enumerate() {
        println!(
            "{}  {}x{}  hotspots={}  inputs={}",
            image_name(i),
            frame.width,
            frame.height,
            frame.hotspot_count(),
            frame.input_fields().count()
        );
        for b in frame.hotspots() {
            println!("  hotspot #{}  {:?}  {}", b.order().unwrap_or_default(), b.rect, b.label);
        }
        for b in frame.input_fields() {
            println!(
                "  input  {:?}  {} = {:?}",
                b.rect,
                b.label,
                b.expected().unwrap_or_default()
            );
        }
    }
    eprintln!("{} frames in '{}'", frames.len(), args.package.display());
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let frames = import_package(&DirPackage::new(&args.package))
        .with_context(|| format!("import package '{}'", args.package.display()))?;
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("read script '{}'", args.script.display()))?;
    let steps = script::parse(&text)?;

    let session = TestSession::start(&frames, config.session)?;
    let mut replay = script::Replay::new(session);
    replay.run_all(&steps)?;

    let session = replay.session();
    let score = session.score();
    println!("score {} / {}", score.score, score.total_possible);
    println!("mistake frames {}", score.mistake_frames);
    if !session.is_reviewing() {
        let progress = session.progress();
        eprintln!(
            "script ended on frame {} of {} before review",
            progress.frame, progress.of
        );
    }

    if args.review {
        let reviews: Vec<_> = (0..session.frames().len())
            .filter_map(|i| {
                let answers = session.answers(i)?;
                Some(ft_player::score::review_frame(i, &session.frames()[i], answers))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reviews)?);
    }
    Ok(())
}

fn cmd_check_config(args: CheckConfigArgs) -> anyhow::Result<()> {
    let config = load_config(&args.path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    Config::from_json_str(&text).with_context(|| format!("parse config '{}'", path.display()))
}
