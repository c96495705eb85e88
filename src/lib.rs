//! Symlink farm manager.
//!
//! Merges self-contained package trees (`<prefix>/<name>/<version>`) into a
//! shared hierarchy such as `/usr/local` by creating symbolic links, and
//! removes them again.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: resolve roots, package identity and options for a run
//! - **[`farm`]**: classify destination entries and walk package trees
//! - **[`commands`]**: the install and remove sequences
//! - **[`logging`]**: console and log-file output through `tracing`
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod farm;
pub mod logging;
pub mod operations;
pub mod paths;
