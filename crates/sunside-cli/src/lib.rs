//! Sunside CLI library.
//!
//! This crate provides command-line interface utilities for the sunside
//! route analyzer, including terminal styling and output formatting.

pub mod output;
pub mod terminal;
