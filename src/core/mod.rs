//! Core helpers shared by the tools
//!
//! This module contains:
//! - Audio file discovery
//! - Naming helpers (genre cleanup, prefixes, collision-free destinations)
//! - Interactive prompts
//! - Run statistics and summaries

pub mod naming;
pub mod prompt;
pub mod report;
pub mod scanning;

pub use prompt::{Answer, DirectoryKind, FolderChoice, Prompt};
pub use report::RunReport;
pub use scanning::{
    expand_inputs, recursive_audio_files, subdirectories, top_level_audio_files, InputPath,
};
