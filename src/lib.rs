//! Workspace root package.
//!
//! Carries workspace-level tooling (the rusty-hook pre-commit configuration).
//! The library and CLI live under `crates/`.
