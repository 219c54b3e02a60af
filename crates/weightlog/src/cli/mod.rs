//! Command-line interface for weightlog.
//!
//! This module provides the CLI structure and output rendering for the
//! `wlog` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DashboardCommand, GroupingArg, HabitAddArgs, HabitCommand, JournalCommand,
    KindArg, MealAddArgs, MealCommand, OutputFormat, PortionArg, QualityArg, ReductionArg,
    ShowCommand, StatusCommand, SummaryCommand, TrendCommand, UnitArg, WeightAddArgs,
    WeightCommand, WindowArg,
};

/// wlog - Log meals, weight and habits to plain CSV files
///
/// Every entry is appended to a CSV log in the data directory. Summaries,
/// trends and the dashboard are computed from those files on demand.
#[derive(Debug, Parser)]
#[command(name = "wlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log meals
    #[command(subcommand)]
    Meal(MealCommand),

    /// Log weigh-ins
    #[command(subcommand)]
    Weight(WeightCommand),

    /// Log daily habits
    #[command(subcommand)]
    Habit(HabitCommand),

    /// Show the rows of a log
    Show(ShowCommand),

    /// Group and reduce a column of a log
    Summary(SummaryCommand),

    /// Show the weight trend
    Trend(TrendCommand),

    /// Show the progress dashboard
    Dashboard(DashboardCommand),

    /// Show the meal photo journal
    Journal(JournalCommand),

    /// Show log file statistics
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
