//! Collate CLI
//!
//! Groups static site content by category into named collations.
//!
//! This is the binary entry point. The command implementations are in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;
use collate::cmd::collate::CollateOptions;

/// Command-line interface for Collate.
#[derive(Parser)]
#[command(
    name = "collate",
    version,
    about = "Group static site content by category"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "collate.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Collect content and print its collations as JSON
    Collate {
        /// Content directory (defaults to content.dir from the configuration)
        #[arg(long)]
        content: Option<std::path::PathBuf>,
        /// Include draft content
        #[arg(long)]
        drafts: bool,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Validate configuration and content categories
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    collate::init_tracing(cli.verbose);

    match cli.command {
        Commands::Collate {
            content,
            drafts,
            pretty,
            output,
        } => {
            let options = CollateOptions {
                content: content.as_deref(),
                drafts,
                pretty,
                output: output.as_deref(),
            };
            collate::cmd::collate::run(&cli.config, &options)?;
        }
        Commands::Check { strict } => {
            collate::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_collate_command_parsing() {
        let args = ["collate", "collate", "--content", "site/content", "--pretty"];
        let cli = Cli::parse_from(args);

        assert_eq!(cli.config, std::path::PathBuf::from("collate.toml"));
        assert_eq!(cli.verbose, 0);

        match cli.command {
            Commands::Collate {
                content,
                drafts,
                pretty,
                output,
            } => {
                assert_eq!(content, Some(std::path::PathBuf::from("site/content")));
                assert!(!drafts);
                assert!(pretty);
                assert!(output.is_none());
            }
            _ => panic!("Expected Collate command"),
        }
    }

    #[test]
    fn test_cli_collate_with_output() {
        let args = ["collate", "collate", "-o", "collations.json", "--drafts"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Collate { output, drafts, .. } => {
                assert_eq!(output, Some(std::path::PathBuf::from("collations.json")));
                assert!(drafts);
            }
            _ => panic!("Expected Collate command"),
        }
    }

    #[test]
    fn test_cli_check_command_parsing() {
        let args = ["collate", "check", "--strict"];
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Check { strict } => {
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_cli_verbosity_flags() {
        let args = ["collate", "-vvv", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_cli_custom_config_path() {
        let args = ["collate", "--config", "site.toml", "check"];
        let cli = Cli::parse_from(args);
        assert_eq!(cli.config, std::path::PathBuf::from("site.toml"));
    }
}
