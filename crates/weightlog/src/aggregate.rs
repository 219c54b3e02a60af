//! Derived views over loaded tables.
//!
//! Aggregation groups rows by a key derived from their `date` column and
//! reduces one numeric column per group. Everything here is a pure function
//! of the table passed in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::records::RecordKind;
use crate::store::Table;

/// How rows are grouped before reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Every row is its own point.
    Entry,
    /// One point per calendar day.
    #[default]
    Day,
    /// One point per ISO week, keyed by its Monday.
    Week,
    /// One point per month, keyed by its first day.
    Month,
}

impl Grouping {
    /// The group key of `date`.
    #[must_use]
    pub fn key(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Entry | Self::Day => date,
            Self::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// How the values of a group are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    /// Total of the values.
    Sum,
    /// Arithmetic mean.
    Mean,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
    /// Value of the last row in file order.
    Last,
    /// Number of non-empty cells.
    Count,
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Mean => write!(f, "mean"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Last => write!(f, "last"),
            Self::Count => write!(f, "count"),
        }
    }
}

impl FromStr for Reduction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" | "total" => Ok(Self::Sum),
            "mean" | "avg" | "average" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "last" => Ok(Self::Last),
            "count" => Ok(Self::Count),
            _ => Err(format!("unknown reduction: {s}")),
        }
    }
}

/// A column and the reduction applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Column to reduce.
    pub column: String,
    /// Reduction to apply.
    pub reduction: Reduction,
}

impl Metric {
    /// Create a metric.
    #[must_use]
    pub fn new(column: impl Into<String>, reduction: Reduction) -> Self {
        Self {
            column: column.into(),
            reduction,
        }
    }

    /// Sum of a column.
    #[must_use]
    pub fn sum(column: impl Into<String>) -> Self {
        Self::new(column, Reduction::Sum)
    }

    /// Check the metric applies to `kind`.
    ///
    /// `Count` accepts any column of the kind; every other reduction needs a
    /// numeric column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuery`] if it does not.
    pub fn check(&self, kind: RecordKind) -> Result<()> {
        if !kind.has_column(&self.column) {
            return Err(Error::invalid_query(format!(
                "{kind} logs have no column '{}'",
                self.column
            )));
        }
        if self.reduction != Reduction::Count
            && !kind.numeric_columns().contains(&self.column.as_str())
        {
            return Err(Error::invalid_query(format!(
                "column '{}' of {kind} logs is not numeric; only count applies",
                self.column
            )));
        }
        Ok(())
    }
}

/// One point of an aggregated series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Group key.
    pub date: NaiveDate,
    /// Reduced value.
    pub value: f64,
    /// Number of values that went into the point.
    pub count: usize,
}

#[derive(Debug, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
    min: f64,
    max: f64,
    last: f64,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.sum += value;
        self.last = value;
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, reduction: Reduction) -> f64 {
        match reduction {
            Reduction::Sum => self.sum,
            Reduction::Mean => self.sum / self.count as f64,
            Reduction::Min => self.min,
            Reduction::Max => self.max,
            Reduction::Last => self.last,
            Reduction::Count => self.count as f64,
        }
    }
}

/// Group `table` by `grouping` and reduce `metric` within each group.
///
/// Empty cells are skipped, and groups without any value produce no point.
/// Points come back in chronological order; with [`Grouping::Entry`] rows
/// sharing a date keep their file order. An empty table yields an empty
/// series.
///
/// # Errors
///
/// Returns [`Error::InvalidQuery`] if the metric does not apply to the table's
/// kind, or [`Error::InvalidRecord`] if a date or numeric cell is malformed.
pub fn aggregate(table: &Table, grouping: Grouping, metric: &Metric) -> Result<Vec<Point>> {
    let kind = table.kind();
    metric.check(kind)?;

    let mut observations = Vec::with_capacity(table.len());
    for (index, row) in table.iter().enumerate() {
        let cell = row.get(&metric.column).unwrap_or_default();
        if cell.is_empty() {
            continue;
        }
        let date = parse_date(kind, index, row.get("date").unwrap_or_default())?;
        let value = if metric.reduction == Reduction::Count {
            1.0
        } else {
            parse_number(kind, index, &metric.column, cell)?
        };
        observations.push((date, value));
    }

    if grouping == Grouping::Entry {
        observations.sort_by_key(|(date, _)| *date);
        return Ok(observations
            .into_iter()
            .map(|(date, value)| {
                let mut acc = Accumulator::default();
                acc.push(value);
                Point {
                    date,
                    value: acc.finish(metric.reduction),
                    count: 1,
                }
            })
            .collect());
    }

    let mut groups: BTreeMap<NaiveDate, Accumulator> = BTreeMap::new();
    for (date, value) in observations {
        groups.entry(grouping.key(date)).or_default().push(value);
    }

    Ok(groups
        .into_iter()
        .map(|(date, acc)| Point {
            date,
            value: acc.finish(metric.reduction),
            count: acc.count,
        })
        .collect())
}

fn parse_date(kind: RecordKind, index: usize, cell: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%Y-%m-%d").map_err(|e| {
        Error::invalid_record(kind, format!("row {}: invalid date '{cell}': {e}", index + 1))
    })
}

fn parse_number(kind: RecordKind, index: usize, column: &str, cell: &str) -> Result<f64> {
    match cell {
        "true" => Ok(1.0),
        "false" => Ok(0.0),
        _ => cell.parse::<f64>().map_err(|_| {
            Error::invalid_record(
                kind,
                format!("row {}: {column} value '{cell}' is not a number", index + 1),
            )
        }),
    }
}
