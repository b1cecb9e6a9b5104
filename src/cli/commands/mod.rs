//! Subcommand implementations.

pub mod external;
pub mod package;
