//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded on every log event of a run (e.g. "build", "alias").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Build { .. } => "build",
        Commands::Alias { .. } => "alias",
        Commands::Verify { .. } => "verify",
        Commands::Clean => "clean",
        Commands::Inspect { .. } => "inspect",
        Commands::Config => "config",
    }
}
