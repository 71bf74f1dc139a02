//! Cartograph Core — static analysis engine for mapping a project's files.
//!
//! This crate contains all analysis logic: the tree walk, per-language symbol
//! extraction, import resolution, the file dependency graph and cycle detection.

pub mod config;
pub mod error;
pub mod graph;
pub mod languages;
pub mod output;
pub mod phases;
pub mod pipeline;
