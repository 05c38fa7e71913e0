//! Warden CLI - inspect and edit a virtual filesystem snapshot.
//!
//! Every command loads the JSON snapshot named by `--store` (or the
//! configured `store.snapshot`), runs one engine operation, optionally behind
//! a ticket, and writes the snapshot back when the store changed.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config_bridge;
mod context;
mod store;
mod theme;

use commands::{config, files, flags, host, init, snapshot, ticket};
use context::Context;

/// Warden - capability-gated virtual filesystem
#[derive(Parser)]
#[command(name = "warden")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Snapshot file to operate on
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Ticket (JSON) to gate every operation with
    #[arg(long, global = true)]
    ticket: Option<PathBuf>,

    /// Use this config file instead of the layered lookup
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty store
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,

        /// Create the configured zone roots
        #[arg(long)]
        layout: bool,
    },

    /// List a directory
    Ls {
        /// Directory to list
        #[arg(default_value = ".")]
        path: String,

        /// Include hidden items
        #[arg(short, long)]
        all: bool,
    },

    /// Print a file
    Cat {
        /// File to print
        path: String,
    },

    /// Write a file (content from stdin when omitted)
    Write {
        /// File to write
        path: String,
        /// New content
        content: Option<String>,
    },

    /// Append to a file (content from stdin when omitted)
    Append {
        /// File to append to
        path: String,
        /// Content to add
        content: Option<String>,

        /// Do not insert a newline before the new content
        #[arg(long)]
        no_newline: bool,
    },

    /// Create an empty file
    Touch {
        /// File to create
        path: String,
    },

    /// Create a directory
    Mkdir {
        /// Directory to create
        path: String,
    },

    /// Remove a file
    Rm {
        /// File to remove
        path: String,
    },

    /// Remove a directory
    Rmdir {
        /// Directory to remove
        path: String,

        /// Remove contents too
        #[arg(short, long)]
        recursive: bool,
    },

    /// Copy a file
    Cp {
        /// Source file
        src: String,
        /// Destination path
        dst: String,
    },

    /// Move a file
    Mv {
        /// Source file
        src: String,
        /// Destination path
        dst: String,
    },

    /// Move a file or directory with its metadata
    Rename {
        /// Item to move
        src: String,
        /// New path
        dst: String,

        /// Only require the permission matching the item type
        #[arg(long)]
        strict: bool,
    },

    /// Manage item flags
    Flag {
        #[command(subcommand)]
        command: FlagCommands,
    },

    /// Show an item's metadata
    Stat {
        /// Item to describe
        path: String,
    },

    /// Print a directory snapshot as JSON
    ExportFolder {
        /// Directory to export
        path: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Import a directory snapshot
    ImportFolder {
        /// Snapshot file
        file: PathBuf,

        /// Where to place it (defaults to the exported path)
        #[arg(long)]
        dest: Option<String>,

        /// Replace an existing item at the destination
        #[arg(long)]
        force: bool,
    },

    /// Evaluate the ticket for an action on a path
    Check {
        /// Action token, e.g. `file/read`
        action: String,
        /// Path to check
        path: String,
    },

    /// Show the level a path requires
    Level {
        /// Path to classify
        path: String,
    },

    /// Build a ticket and print it as JSON
    Ticket {
        /// Privilege level
        #[arg(long, default_value = "user")]
        level: String,

        /// Granted action token (repeatable), e.g. `file/read`
        #[arg(long = "allow")]
        allow: Vec<String>,

        /// Accessible folder (repeatable)
        #[arg(long = "folder")]
        folders: Vec<String>,

        /// Grant everything
        #[arg(long)]
        wildcard: bool,
    },

    /// Operate on the configured host directory
    Host {
        /// Host directory (overrides `host.root`)
        #[arg(long)]
        root: Option<PathBuf>,

        #[command(subcommand)]
        command: HostCommands,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FlagCommands {
    /// Add flags (letters from `hru`)
    Add {
        /// Item to flag
        path: String,
        /// Flag letters
        flags: String,
    },
    /// Remove flags
    Remove {
        /// Item to unflag
        path: String,
        /// Flag letters
        flags: String,
    },
    /// Print an item's flags
    Show {
        /// Item to inspect
        path: String,
    },
}

#[derive(Subcommand)]
enum HostCommands {
    /// List a host directory
    Ls {
        /// Directory to list
        #[arg(default_value = "/")]
        path: String,
    },
    /// Print a host file
    Cat {
        /// File to print
        path: String,
    },
    /// Write a host file (content from stdin when omitted)
    Write {
        /// File to write
        path: String,
        /// New content
        content: Option<String>,
    },
    /// Create a host directory
    Mkdir {
        /// Directory to create
        path: String,
    },
    /// Remove a host file
    Rm {
        /// File to remove
        path: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        /// Output format: toml, json, or sources
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_deref(), cli.store, cli.ticket.as_deref())?;

    let mut log_config = warden_telemetry::LogConfig::from(&ctx.config.logging);
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = warden_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match cli.command {
        Commands::Init { force, layout } => init::run_init(&ctx, force, layout),
        Commands::Ls { path, all } => files::list(&ctx, &path, all),
        Commands::Cat { path } => files::cat(&ctx, &path),
        Commands::Write { path, content } => files::write(&ctx, &path, content),
        Commands::Append {
            path,
            content,
            no_newline,
        } => files::append(&ctx, &path, content, no_newline),
        Commands::Touch { path } => files::touch(&ctx, &path),
        Commands::Mkdir { path } => files::mkdir(&ctx, &path),
        Commands::Rm { path } => files::remove(&ctx, &path),
        Commands::Rmdir { path, recursive } => files::remove_dir(&ctx, &path, recursive),
        Commands::Cp { src, dst } => files::copy(&ctx, &src, &dst),
        Commands::Mv { src, dst } => files::move_file(&ctx, &src, &dst),
        Commands::Rename { src, dst, strict } => files::rename(&ctx, &src, &dst, strict),
        Commands::Flag { command } => match command {
            FlagCommands::Add { path, flags: letters } => flags::add(&ctx, &path, &letters),
            FlagCommands::Remove { path, flags: letters } => flags::remove(&ctx, &path, &letters),
            FlagCommands::Show { path } => flags::show(&ctx, &path),
        },
        Commands::Stat { path } => flags::stat(&ctx, &path),
        Commands::ExportFolder { path, out } => snapshot::export_folder(&ctx, &path, out.as_deref()),
        Commands::ImportFolder { file, dest, force } => {
            snapshot::import_folder(&ctx, &file, dest.as_deref(), force)
        },
        Commands::Check { action, path } => ticket::check(&ctx, &action, &path),
        Commands::Level { path } => ticket::level(&ctx, &path),
        Commands::Ticket {
            level,
            allow,
            folders,
            wildcard,
        } => ticket::build(&level, &allow, &folders, wildcard),
        Commands::Host { root, command } => {
            let gated = host::open(&ctx, root)?;
            match command {
                HostCommands::Ls { path } => host::list(&gated, &path).await,
                HostCommands::Cat { path } => host::cat(&gated, &path).await,
                HostCommands::Write { path, content } => host::write(&gated, &path, content).await,
                HostCommands::Mkdir { path } => host::mkdir(&gated, &path).await,
                HostCommands::Rm { path } => host::remove(&gated, &path).await,
            }
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show { format } => config::show(&ctx, &format),
        },
    }
}
