//! Distmerge: Dual-Variant Build Merging
//!
//! Builds two variants of a web front-end into separate output trees and merges
//! them into one deployable directory, with the baseline variant's shared files
//! taking precedence and each variant keeping its own HTML entry file.

pub mod alias;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod pipeline;
pub mod tree;
pub mod variant;
