//! `openui` command-line front end.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::OpenUiConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "openui", about = "OpenUI: describe a UI, stream back the HTML")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "openui.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new component from a prompt
    Generate {
        prompt: String,
        /// Screenshot to replicate
        #[arg(long)]
        image: Option<PathBuf>,
        /// Offer the built-in tools to the model
        #[arg(long)]
        tools: bool,
        /// Write the extracted HTML here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Change existing HTML
    Refine {
        /// HTML file or saved markdown answer
        file: PathBuf,
        prompt: String,
        #[arg(long)]
        tools: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Turn HTML into a framework component
    Convert {
        file: PathBuf,
        /// Target framework, e.g. React, Svelte, Vue
        #[arg(short, long)]
        framework: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Inspect and run the built-in tools
    Tools {
        #[command(subcommand)]
        action: ToolsAction,
    },
}

#[derive(Subcommand)]
enum ToolsAction {
    /// List the tool catalog
    List,
    /// Execute one tool with JSON arguments
    Run { name: String, args: String },
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = OpenUiConfig::load(&cli.config)?;
    init_logging(config.logging.json);

    match cli.command {
        Commands::Generate {
            prompt,
            image,
            tools,
            output,
        } => {
            let image = image.as_deref();
            commands::generate(&config, prompt, image, tools, output.as_deref()).await?;
        }
        Commands::Refine {
            file,
            prompt,
            tools,
            output,
        } => {
            commands::refine(&config, &file, prompt, tools, output.as_deref()).await?;
        }
        Commands::Convert {
            file,
            framework,
            output,
        } => {
            commands::convert(&config, &file, &framework, output.as_deref()).await?;
        }
        Commands::Tools { action } => match action {
            ToolsAction::List => commands::list_tools(&config),
            ToolsAction::Run { name, args } => {
                if !commands::run_tool(&config, &name, &args).await? {
                    std::process::exit(1);
                }
            }
        },
    }

    Ok(())
}
