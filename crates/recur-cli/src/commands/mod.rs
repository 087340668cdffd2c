//! CLI subcommand implementations.

pub mod check;
pub mod infer;
pub mod input;
