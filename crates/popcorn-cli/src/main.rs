use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, detail, search, watched};

mod commands;
mod logging;
mod output;
mod render;

#[derive(Parser)]
#[command(name = "popcorn")]
#[command(about = "usePopcorn - search movies, rate what you've watched, keep score")]
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
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    #[command(long_about = "Search the movie index by title. Queries shorter than the configured minimum (3 characters by default) are not sent.")]
    Search {
        /// Title to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show full detail for one title
    Show {
        /// IMDb id (e.g. tt0068646)
        id: String,
    },
    /// Rate a title and add it to the watched list
    Add {
        /// IMDb id (e.g. tt0068646)
        id: String,

        /// Your rating, 1-10
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },
    /// Remove a title from the watched list
    Remove {
        /// IMDb id (e.g. tt0068646)
        id: String,
    },
    /// Show the watched list and summary statistics
    List,
    /// Interactive search, rate and add session
    #[command(long_about = "Interactive session: type a query, pick a result, rate it. Esc closes the open movie; Enter on an empty rating goes back to the search prompt. Logs go to the log file instead of the terminal.")]
    Browse,
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show,
    /// Store the OMDb API key in the config file
    SetKey {
        /// OMDb API key
        key: String,
    },
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Interactive mode keeps the terminal for prompts and logs to a file instead
    let log_file = matches!(cli.command, Commands::Browse)
        .then(|| popcorn_config::PathManager::default().log_file());
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Search { query } => search::run_search(query.join(" "), &output).await,
        Commands::Show { id } => detail::run_show(id, &output).await,
        Commands::Add { id, rating } => watched::run_add(id, rating, &output).await,
        Commands::Remove { id } => watched::run_remove(id, &output),
        Commands::List => watched::run_list(&output),
        Commands::Browse => browse::run_browse(&output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
