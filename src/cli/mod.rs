//! Command-line interface for tt
//!
//! This module defines the CLI structure using clap derive macros.
//! The task commands live in the `task` submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// tt - Task Tracker
///
/// A local task list with priorities, search and manual ordering.
#[derive(Parser, Debug)]
#[command(name = "tt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "TT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the task data
    #[arg(long, global = true, env = "TT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority: low, medium, high (defaults to the configured priority)
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Edit a task
    Edit {
        /// Task ID (or unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// List tasks in display order
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show a single task
    Show {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Move a task between two positions of the displayed list
    Move {
        /// Displayed position of the task to move (0-based)
        from: usize,

        /// Displayed position of the task it takes the place of (0-based)
        to: usize,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Drop a dragged task before or after another one in the displayed list
    Drop {
        /// Displayed position of the dragged task (0-based)
        dragged: usize,

        /// Displayed position of the task it is dropped on (0-based)
        target: usize,

        /// Insert before the target
        #[arg(long, conflicts_with = "after", required_unless_present = "after")]
        before: bool,

        /// Insert after the target
        #[arg(long)]
        after: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Filter and search applied to the displayed list
#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// Priority filter: all, low, medium, high
    #[arg(short, long, default_value = "all")]
    pub priority: String,

    /// Case-insensitive search in title and description
    #[arg(short, long, default_value = "")]
    pub search: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let env = task::Env {
            config: self.config,
            data_dir: self.data_dir,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Add {
                title,
                description,
                priority,
            } => task::run_add(
                env,
                task::AddOptions {
                    title,
                    description,
                    priority,
                },
            ),
            Commands::Edit {
                id,
                title,
                description,
                priority,
            } => task::run_edit(
                env,
                task::EditOptions {
                    id,
                    title,
                    description,
                    priority,
                },
            ),
            Commands::Delete { id } => task::run_delete(env, task::DeleteOptions { id }),
            Commands::List { view } => task::run_list(env, task::ListOptions { view }),
            Commands::Show { id } => task::run_show(env, task::ShowOptions { id }),
            Commands::Move { from, to, view } => {
                task::run_move(env, task::MoveOptions { from, to, view })
            }
            Commands::Drop {
                dragged,
                target,
                before,
                after: _,
                view,
            } => task::run_drop(
                env,
                task::DropOptions {
                    dragged,
                    target,
                    before,
                    view,
                },
            ),
        }
    }
}
