//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{
    format_alias_outcome, format_build_summary_json, format_build_summary_text,
    format_listing_json, format_listing_text, format_progress, format_verify_ok,
};
pub use route::RunContext;
