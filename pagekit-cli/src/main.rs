use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::page::{CursorArgs, OffsetArgs};

/// pagekit - paginate a JSON document collection
#[derive(Parser)]
#[command(name = "pagekit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file; the default search path is used when omitted
    #[arg(long, global = true, value_name = "FILE", env = "PAGEKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the collection over HTTP
    Serve {
        /// JSON array of documents to load
        #[arg(long, value_name = "FILE")]
        seed: PathBuf,
    },
    /// Print one cursor-paginated page
    Cursor(CursorArgs),
    /// Print one offset-paginated page
    Offset(OffsetArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { seed } => commands::serve::execute(cli.config, seed).await,
        Commands::Cursor(args) => commands::page::cursor(cli.config, args).await,
        Commands::Offset(args) => commands::page::offset(cli.config, args).await,
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_offset() {
        let cli = Cli::parse_from([
            "pagekit",
            "offset",
            "--seed",
            "people.json",
            "--page",
            "2",
            "--per-page",
            "5",
            "--sort-field",
            "age",
            "--sort-direction",
            "-1",
        ]);
        let Commands::Offset(args) = cli.command else {
            panic!("expected offset");
        };
        assert_eq!(args.page, 2);
        assert_eq!(args.per_page, Some(5));
        assert_eq!(args.sort_field.as_deref(), Some("age"));
        assert_eq!(args.sort_direction, -1);
    }

    #[test]
    fn test_parse_cursor_with_global_config() {
        let cli = Cli::parse_from([
            "pagekit",
            "cursor",
            "--seed",
            "people.json",
            "--limit",
            "3",
            "--config",
            "pagekit.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("pagekit.toml")));
        let Commands::Cursor(args) = cli.command else {
            panic!("expected cursor");
        };
        assert_eq!(args.limit, Some(3));
        assert!(args.cursor.is_none());
    }
}
