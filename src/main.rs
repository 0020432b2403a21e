use anyhow::Result;
use clap::Parser;
use planzo::config::{self, Config};
use planzo::{app, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "planzo",
    about = "A terminal AI development assistant with a project knowledge map",
    version
)]
struct Args {
    /// Folder to load into the knowledge map at startup
    folder: Option<PathBuf>,

    /// Store a Gemini API key and exit
    #[arg(long)]
    setup: bool,

    /// Model to use for this session (overrides the config file)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.setup {
        config::setup_api_key_interactive().map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let mut config = Config::load();
    if let Some(model) = args.model {
        config.model = model;
    }

    if let Some(path) = logging::default_log_path() {
        if let Err(e) = logging::init(&path, &config.log_level) {
            eprintln!("  Warning: {}", e);
        }
    }

    if let Some(folder) = &args.folder {
        if !folder.is_dir() {
            anyhow::bail!("Not a folder: {}", folder.display());
        }
    }

    if config.get_api_key().is_none() {
        eprintln!(
            "  No Gemini API key found. Run 'planzo --setup' or set {}.",
            config::API_KEY_ENV
        );
        eprintln!("  Chat and commands will fail until a key is configured.");
        eprintln!();
    }

    app::run_tui(config, args.folder).await
}
