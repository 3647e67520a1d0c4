//! CLI command handlers.
//!
//! Each handler performs one remote call (or one local action) and returns a
//! value whose `Display` output is what the CLI prints. Printing, prompting
//! and exit codes stay in the binary.

pub mod build;
pub mod call;
pub mod deploy;
pub mod pods;
pub mod remediate;
pub mod settings;
pub mod tools;
