//! # eliza CLI
//!
//! Command-line front end for the eliza conversation engine.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eliza")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an engine configuration file (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hold a conversation on stdin/stdout
    Play {
        /// Builtin script name or path to a script file
        #[arg(long, default_value = commands::DEFAULT_SCRIPT)]
        script: String,

        /// Read these input lines first, echoing each, then continue on stdin
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print the session transcript when the conversation ends
        #[arg(short, long)]
        recap: bool,

        /// Log every state transition
        #[arg(long)]
        trace: bool,
    },

    /// Print the keyword table layout of a script
    Dump {
        /// Builtin script name or path to a script file
        #[arg(long, default_value = commands::DEFAULT_SCRIPT)]
        script: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the builtin scripts
    Scripts,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match &cli.command {
        Commands::Play { trace: true, .. } => tracing::Level::TRACE,
        _ if cli.verbose => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };

    // Logs go to stderr so the conversation on stdout stays clean
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Play {
            script,
            file,
            recap,
            trace: _,
        } => {
            let opts = commands::PlayOptions {
                script,
                file,
                recap,
            };
            commands::play(cli.config.as_deref(), opts)
        }
        Commands::Dump { script, json } => commands::dump_script(&script, json),
        Commands::Scripts => commands::list_scripts(),
    }
}
