//! Output trees on disk
//!
//! Walking, copying, and digesting the directory trees produced by the
//! build tool and the merged tree assembled from them.

pub mod copy;
pub mod hasher;
pub mod listing;
pub mod path;
pub mod walker;
