use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use thumbsmith::{ComposerConfig, ThumbnailComposer, ThumbnailJob};

#[derive(Parser, Debug)]
#[command(name = "thumbsmith", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a thumbnail from a background image and a title.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background image (PNG or JPEG).
    #[arg(long)]
    background: PathBuf,

    /// Title text drawn over the background.
    #[arg(long)]
    title: String,

    /// Accent bar color as #RRGGBB.
    #[arg(long, default_value = "#FFD000")]
    accent: String,

    /// Optional logo image pasted into the bottom-right corner.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Output directory for the encoded thumbnail.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Composer configuration JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filename stem; a timestamp is used when omitted.
    #[arg(long)]
    request_id: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ComposerConfig> {
    let Some(path) = path else {
        return Ok(ComposerConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg: ComposerConfig =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse composer config JSON")?;
    Ok(cfg)
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let composer = ThumbnailComposer::with_system_fonts(config)?;

    let background_bytes = std::fs::read(&args.background)
        .with_context(|| format!("read background '{}'", args.background.display()))?;
    let background = thumbsmith::decode_background(&background_bytes)?;

    let logo = match &args.logo {
        Some(path) => Some(
            std::fs::read(path).with_context(|| format!("read logo '{}'", path.display()))?,
        ),
        None => None,
    };

    let job = ThumbnailJob {
        title: args.title,
        accent_color: args.accent,
        logo,
        request_id: args.request_id,
    };
    job.validate()?;

    let path = composer.compose_to_dir(&background, &job, &args.out_dir)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
