//! CLI argument definitions using clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use placeboard_core::{InvalidateTarget, ResourceKind};

/// Placement analytics cache and storage guard
#[derive(Parser, Debug)]
#[command(name = "placeboard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Use an in-memory store instead of the on-disk one
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Also write logs to this file
    #[arg(long, global = true, env = "PLACEBOARD_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one resource as JSON
    Get {
        /// companies, years, students, all_students, all_companies, rounds, dashboard
        kind: ResourceKind,
    },

    /// Drop cached data so the next read goes to the network
    Invalidate {
        /// A resource kind, or "all"
        target: InvalidateTarget,
    },

    /// Show where each resource kind is cached
    Status,

    /// Remove sensitive keys from durable storage and report them
    Sweep,

    /// List keys in durable storage
    Keys,

    /// Write a key through the storage guard
    Set { key: String, value: String },

    /// Save a bearer token to the OS keychain (read from PLACEBOARD_TOKEN or stdin)
    Login { username: String },

    /// Delete the saved token and clear all cached data
    Logout,
}
