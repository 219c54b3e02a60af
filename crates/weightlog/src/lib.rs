//! `weightlog` - A personal meal, weight and habit log backed by CSV files
//!
//! This library provides the record store, the typed record kinds, the
//! aggregate and dashboard views, and photo hosting used by the `wlog` CLI.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logbook;
pub mod logging;
pub mod photos;
pub mod records;
pub mod store;

pub use aggregate::{Grouping, Metric, Point, Reduction};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use records::{HabitRecord, MealRecord, PhotoRecord, Record, RecordKind, WeightRecord, WeightUnit};
pub use store::{KindStats, RecordStore, Row, Table};
