//! Integration tests for the distmerge build merger

mod cli_verify;
mod config_loading;
mod merge_scenarios;
mod test_utils;
