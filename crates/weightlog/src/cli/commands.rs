//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::aggregate::{Grouping, Reduction};
use crate::records::{FoodQuality, Portion, RecordKind, WeightUnit};

/// Meal commands.
#[derive(Debug, Subcommand)]
pub enum MealCommand {
    /// Log a meal or snack
    Add(MealAddArgs),
}

/// Arguments for logging a meal.
#[derive(Debug, Args)]
pub struct MealAddArgs {
    /// What was eaten
    #[arg(short, long)]
    pub meal: String,

    /// Estimated calories
    #[arg(short = 'k', long)]
    pub calories: u32,

    /// Portion size
    #[arg(short, long, value_enum, default_value = "medium")]
    pub portion: PortionArg,

    /// Food quality
    #[arg(long, value_enum, default_value = "whole-food")]
    pub quality: QualityArg,

    /// Protein in grams
    #[arg(long, default_value_t = 0.0)]
    pub protein: f64,

    /// Fiber in grams
    #[arg(long, default_value_t = 0.0)]
    pub fiber: f64,

    /// Mood before eating
    #[arg(long, default_value = "")]
    pub mood_before: String,

    /// Mood after eating
    #[arg(long, default_value = "")]
    pub mood_after: String,

    /// Hunger before eating (1-10)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub hunger_before: u8,

    /// Hunger after eating (1-10)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub hunger_after: u8,

    /// Photo of the meal (.jpg, .jpeg or .png)
    #[arg(long, value_name = "FILE")]
    pub photo: Option<PathBuf>,

    /// Day of the meal (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Weight commands.
#[derive(Debug, Subcommand)]
pub enum WeightCommand {
    /// Log a weigh-in
    Add(WeightAddArgs),
}

/// Arguments for logging a weigh-in.
#[derive(Debug, Args)]
pub struct WeightAddArgs {
    /// Measured weight
    pub weight: f64,

    /// Unit of the weight
    #[arg(short, long, value_enum, default_value = "kg")]
    pub unit: UnitArg,

    /// Waist measurement in centimetres
    #[arg(short, long)]
    pub waist: Option<f64>,

    /// Day of the weigh-in (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Habit commands.
#[derive(Debug, Subcommand)]
pub enum HabitCommand {
    /// Log a daily habit check-in
    Add(HabitAddArgs),
}

/// Arguments for a habit check-in.
#[derive(Debug, Args)]
pub struct HabitAddArgs {
    /// Took a 10-minute walk
    #[arg(long)]
    pub walk: bool,

    /// Drank 2L of water
    #[arg(long)]
    pub water: bool,

    /// Ate 2+ servings of fruit
    #[arg(long)]
    pub fruit: bool,

    /// A habit of your own
    #[arg(long)]
    pub custom: Option<String>,

    /// Free-form reflection
    #[arg(short, long)]
    pub reflection: Option<String>,

    /// Day of the check-in (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Which log to show
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Show only the last N rows
    #[arg(short, long)]
    pub last: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Which log to summarize
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Column to reduce
    #[arg(long)]
    pub column: String,

    /// How rows are grouped
    #[arg(short, long, value_enum, default_value = "day")]
    pub by: GroupingArg,

    /// How each group is reduced
    #[arg(short, long, value_enum, default_value = "sum")]
    pub reduce: ReductionArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Trend command arguments.
#[derive(Debug, Args)]
pub struct TrendCommand {
    /// Which trend window to show
    #[arg(short, long, value_enum, default_value = "short")]
    pub window: WindowArg,

    /// Display unit (defaults to the configured unit)
    #[arg(short, long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Dashboard command arguments.
#[derive(Debug, Args)]
pub struct DashboardCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Journal command arguments.
#[derive(Debug, Args)]
pub struct JournalCommand {
    /// Show only the N most recent meals
    #[arg(short, long)]
    pub last: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Record kind argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    /// Meal log
    Meal,
    /// Weight log
    Weight,
    /// Photo log
    Photo,
    /// Habit log
    Habit,
}

impl From<KindArg> for RecordKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Meal => Self::Meal,
            KindArg::Weight => Self::Weight,
            KindArg::Photo => Self::Photo,
            KindArg::Habit => Self::Habit,
        }
    }
}

/// Grouping argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupingArg {
    /// Every row
    Entry,
    /// Per day
    Day,
    /// Per ISO week
    Week,
    /// Per month
    Month,
}

impl From<GroupingArg> for Grouping {
    fn from(arg: GroupingArg) -> Self {
        match arg {
            GroupingArg::Entry => Self::Entry,
            GroupingArg::Day => Self::Day,
            GroupingArg::Week => Self::Week,
            GroupingArg::Month => Self::Month,
        }
    }
}

/// Reduction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReductionArg {
    /// Total
    Sum,
    /// Average
    Mean,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// Last value
    Last,
    /// Number of values
    Count,
}

impl From<ReductionArg> for Reduction {
    fn from(arg: ReductionArg) -> Self {
        match arg {
            ReductionArg::Sum => Self::Sum,
            ReductionArg::Mean => Self::Mean,
            ReductionArg::Min => Self::Min,
            ReductionArg::Max => Self::Max,
            ReductionArg::Last => Self::Last,
            ReductionArg::Count => Self::Count,
        }
    }
}

/// Weight unit argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    /// Kilograms
    Kg,
    /// Pounds
    Lb,
}

impl From<UnitArg> for WeightUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Kg => Self::Kg,
            UnitArg::Lb => Self::Lb,
        }
    }
}

/// Portion argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PortionArg {
    /// Small portion
    Small,
    /// Medium portion
    Medium,
    /// Large portion
    Large,
}

impl From<PortionArg> for Portion {
    fn from(arg: PortionArg) -> Self {
        match arg {
            PortionArg::Small => Self::Small,
            PortionArg::Medium => Self::Medium,
            PortionArg::Large => Self::Large,
        }
    }
}

/// Food quality argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    /// Whole food
    WholeFood,
    /// Minimally processed
    MinimallyProcessed,
    /// Ultra-processed
    UltraProcessed,
}

impl From<QualityArg> for FoodQuality {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::WholeFood => Self::WholeFood,
            QualityArg::MinimallyProcessed => Self::MinimallyProcessed,
            QualityArg::UltraProcessed => Self::UltraProcessed,
        }
    }
}

/// Trend window argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WindowArg {
    /// Short-term window
    #[default]
    Short,
    /// Long-term window
    Long,
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
