//! `docent`: ingest Markdown documentation, search it, and record feedback.

mod commands;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use docent_core::bootstrap::resolve_config_path;
use docent_core::config::Config;

#[derive(Parser, Debug)]
#[command(name = "docent")]
#[command(about = "Documentation retrieval with intent-boosted search and feedback learning")]
#[command(version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chunk, embed and store every Markdown file under a directory
    Ingest {
        dir: PathBuf,

        /// Keep chunks already in the store instead of rebuilding it
        #[arg(long)]
        append: bool,
    },

    /// Rank stored chunks against a query
    Search {
        query: String,

        /// Maximum number of chunks to return
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as an LLM context block
        #[arg(long)]
        context: bool,
    },

    /// Record the outcome of an answered query
    #[command(group(ArgGroup::new("outcome").required(true).args(["success", "failure"])))]
    Record {
        #[arg(long)]
        query: String,

        #[arg(long)]
        response: String,

        /// Chunk id used for the answer; repeatable
        #[arg(long = "chunk")]
        chunks: Vec<String>,

        #[arg(long)]
        success: bool,

        #[arg(long)]
        failure: bool,
    },

    /// Show the learned score of a chunk
    Score { chunk_id: String },

    /// Register a phrasing variation for a canonical query
    Pattern { canonical: String, variation: String },

    /// Register an alias for a command
    Alias { command: String, alias: String },

    /// Summarize recorded interactions
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)?;
    config.validate()?;

    match cli.command {
        Command::Ingest { dir, append } => commands::ingest(&config, &dir, append).await,
        Command::Search {
            query,
            limit,
            context,
        } => {
            let limit = limit.unwrap_or(config.index.search_limit);
            commands::search(&config, &query, limit, context).await
        }
        Command::Record {
            query,
            response,
            chunks,
            success,
            ..
        } => commands::record(&config, query, response, chunks, success),
        Command::Score { chunk_id } => commands::score(&config, &chunk_id),
        Command::Pattern {
            canonical,
            variation,
        } => commands::pattern(&config, &canonical, &variation),
        Command::Alias { command, alias } => commands::alias(&config, &command, &alias),
        Command::Stats => commands::stats(&config),
    }
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn record_requires_an_outcome() {
        let parsed = Cli::try_parse_from(["docent", "record", "--query", "q", "--response", "r"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "docent", "record", "--query", "q", "--response", "r", "--success", "--failure",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn record_collects_repeated_chunks() {
        let cli = Cli::try_parse_from([
            "docent",
            "record",
            "--query",
            "how do i tail logs",
            "--response",
            "use -f",
            "--chunk",
            "logs.md:1-4",
            "--chunk",
            "logs.md:5-9",
            "--failure",
        ])
        .unwrap();
        match cli.command {
            Command::Record {
                chunks, success, ..
            } => {
                assert_eq!(chunks, vec!["logs.md:1-4", "logs.md:5-9"]);
                assert!(!success);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["docent", "stats", "--config", "/etc/docent.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/docent.toml")));
    }
}
