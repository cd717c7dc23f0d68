//! dossier CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use dossier::{
    commands::{build_engine, cmd_ask, cmd_chat},
    config::Config,
    error::Result,
    provider::OpenAiClient,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dossier")]
#[command(version, about = "Ask questions about a local document collection", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question about a document directory
    Ask {
        /// Directory containing the documents
        dir: PathBuf,

        /// The question to answer
        question: String,

        /// Number of fragments to ground the answer on
        #[arg(short, long)]
        k: Option<usize>,

        /// Response language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Build the index once, then answer questions interactively
    Chat {
        /// Directory containing the documents
        dir: PathBuf,

        /// Number of fragments to ground each answer on
        #[arg(short, long)]
        k: Option<usize>,

        /// Response language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Handle completions command (doesn't need config or credentials)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "dossier", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_deref())?;

    // The provider credential gates everything; check before touching documents
    let client = OpenAiClient::from_env(&config.provider)?;

    match cli.command {
        Commands::Ask {
            dir,
            question,
            k,
            lang,
        } => {
            if let Some(lang) = lang {
                config.query.language = lang;
            }
            let k = k.unwrap_or(config.query.default_k);

            let engine = build_engine(&config, client, &dir).await?;
            cmd_ask(&engine, &question, k, cli.json).await?;
        }

        Commands::Chat { dir, k, lang } => {
            if let Some(lang) = lang {
                config.query.language = lang;
            }
            let k = k.unwrap_or(config.query.default_k);

            let engine = build_engine(&config, client, &dir).await?;
            cmd_chat(&engine, k).await?;
        }

        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
