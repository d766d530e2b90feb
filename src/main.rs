use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "ados")]
#[command(version, about = "adOS production workflow board")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Directory containing .ados/ados.toml (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the board stages in column order
    Stages,
    /// Show the workflow board for an account
    Board {
        /// Ad account id (defaults to board.default_account)
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Move a task to another stage
    Move {
        /// Task id
        task: i64,
        /// Target stage ("In Production", in_production) or another task's id
        target: String,
        /// Ad account id (defaults to board.default_account)
        #[arg(short, long)]
        account: Option<String>,
    },
    /// Show a task's ad-block versions
    Detail {
        /// Task id
        task: i64,
        /// Ad account id, used to show the task's own fields
        #[arg(short, long)]
        account: Option<String>,
    },
    /// View, validate or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default ados.toml file
    Init,
}

fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("ADOS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    init_tracing(cli.verbose, cli.log_json);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Stages => cmd::cmd_stages()?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, command)?,
        Commands::Board { account } => {
            let config = ados::config::AdosConfig::load(project_dir)?;
            cmd::cmd_board(&config, account.as_deref()).await?;
        }
        Commands::Move {
            task,
            target,
            account,
        } => {
            let config = ados::config::AdosConfig::load(project_dir)?;
            cmd::cmd_move(&config, account.as_deref(), task, &target).await?;
        }
        Commands::Detail { task, account } => {
            let config = ados::config::AdosConfig::load(project_dir)?;
            cmd::cmd_detail(&config, account.as_deref(), task).await?;
        }
    }

    Ok(())
}
