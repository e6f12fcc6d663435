//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// sheetscope - stylesheet resolution and scoped adoption
///
/// Loads stylesheets once, caches the outcome, and adopts them into
/// document and shadow-root scopes.
#[derive(Parser, Debug)]
#[command(name = "sheetscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SHEETSCOPE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load stylesheets and report their state
    Resolve(ResolveArgs),

    /// Adopt stylesheets into scopes described by a manifest
    Adopt(AdoptArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Stylesheet identifiers (paths, file:// or http(s):// URLs)
    #[arg(required = true)]
    pub identifiers: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error if any load fails
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the adopt command
#[derive(Parser, Debug)]
pub struct AdoptArgs {
    /// Adoption manifest (TOML)
    pub manifest: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error if any load fails
    #[arg(long, conflicts_with = "no_wait")]
    pub strict: bool,

    /// Report immediately instead of waiting for loads to settle
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve() {
        let cli = Cli::try_parse_from(["sheetscope", "resolve", "a.css", "b.css", "--json"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.identifiers, ["a.css", "b.css"]);
                assert!(args.json);
                assert!(!args.strict);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn resolve_requires_identifiers() {
        assert!(Cli::try_parse_from(["sheetscope", "resolve"]).is_err());
    }

    #[test]
    fn strict_conflicts_with_no_wait() {
        let result =
            Cli::try_parse_from(["sheetscope", "adopt", "adopt.toml", "--strict", "--no-wait"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbose_counts() {
        let cli = Cli::try_parse_from(["sheetscope", "-vv", "config", "path"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
