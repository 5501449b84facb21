use clap::{ArgAction, Parser, Subcommand};
use commands::{config, export, links, scrape, ScrapeOverrides};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "kinotop")]
#[command(about = "kinotop - Export the Kinopoisk Top 250 to a spreadsheet with posters")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output_format: output::OutputFormat,

    /// Config file (defaults to ~/.config/kinotop/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the ranking and write the spreadsheet
    #[command(long_about = "Open a browser, walk the listing pages, visit every movie, download posters and write a spreadsheet sorted by release year (newest first). The first listing page waits 10 seconds so a captcha can be solved by hand.")]
    Scrape {
        #[command(flatten)]
        overrides: ScrapeOverrides,

        /// Spreadsheet to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory for downloaded posters
        #[arg(long, value_name = "DIR")]
        image_dir: Option<PathBuf>,

        /// Also dump the sorted records as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Only collect detail page links and print them
    Links {
        #[command(flatten)]
        overrides: ScrapeOverrides,
    },
    /// Rebuild the spreadsheet from a JSON dump, no browser needed
    Export {
        /// JSON dump written by `scrape --json`
        #[arg(long, value_name = "FILE")]
        from: PathBuf,

        /// Spreadsheet to write
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a config file with all defaults filled in
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output_format, cli.quiet);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Scrape { overrides, output: out, image_dir, json } => {
            scrape::run_scrape(config_path, overrides, out, image_dir, json, &output).await
        }
        Commands::Links { overrides } => links::run_links(config_path, overrides, &output).await,
        Commands::Export { from, output: out } => export::run_export(config_path, from, out, &output),
        Commands::Config { cmd } => config::run_config(config_path, cmd, &output),
    }
}
