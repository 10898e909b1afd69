mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Result;
use btp_catalog::CrawlTarget;
use btp_catalog_github::{GitHubClient, GitHubClientConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "btp-catalog")]
#[command(about = "Crawl the BTP service metadata folder into a single JSON catalog")]
struct Cli {
    /// Log debug output, including every request
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Config file (defaults to ~/.config/btp-catalog/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inline every file's content into one document
    Merge {
        /// Output file (defaults to merged.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Build the small service catalog from the JSON documents
    Services {
        /// Output file (defaults to catalog.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn initialize_logger(verbose: bool) -> Result<()> {
    let filter = if verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("btp_catalog")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

fn build_client() -> GitHubClient {
    GitHubClient::new(GitHubClientConfig {
        target: CrawlTarget::default(),
        token: github_token(),
        api_base_url: None,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    initialize_logger(cli.verbose)?;

    let app_config = config::load_config(cli.config.as_deref());
    let client = build_client();

    match cli.command {
        Command::Merge { output } => {
            let output = output.unwrap_or_else(|| app_config.merged_output.clone());
            commands::merge::run(&client, &app_config.crawl_options(), &output).await
        }
        Command::Services { output } => {
            let output = output.unwrap_or_else(|| app_config.catalog_output.clone());
            commands::services::run(&client, &output).await
        }
    }
}
