//! Shared constants used by the chain client and the CLI.

pub mod paths;
