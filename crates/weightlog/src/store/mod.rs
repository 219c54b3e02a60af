//! Storage layer for weightlog.
//!
//! This module provides CSV-backed persistent storage for logged records.
//! Every record kind lives in its own file inside the data directory. Each
//! operation reads the whole file; appends rewrite it through a temporary
//! file that is atomically renamed over the original, so a reader never sees
//! a half-written log.
//!
//! There is no locking. Two processes appending to the same log at the same
//! moment can lose one of the appends.

mod table;

pub use table::{Row, Table};

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::aggregate::{self, Grouping, Metric, Point};
use crate::error::{Error, Result};
use crate::records::{Record, RecordKind};

/// Store of CSV record logs rooted at a data directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory holding one CSV file per record kind.
    data_dir: PathBuf,
}

impl RecordStore {
    /// Open a store rooted at `data_dir`.
    ///
    /// Creates the directory if it doesn't exist. Log files are created lazily
    /// on first append.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|source| Error::DirectoryCreate {
                path: data_dir.clone(),
                source,
            })?;
        }

        debug!("Opened record store at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    /// Get the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the CSV file path for a record kind.
    #[must_use]
    pub fn path(&self, kind: RecordKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    /// Load every row of a kind, in file order.
    ///
    /// A missing or empty file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] if the header or any row does not
    /// match the kind's columns, or [`Error::IoFailure`] if reading fails.
    pub fn load(&self, kind: RecordKind) -> Result<Table> {
        let headers = canonical_header(kind);
        let rows = self
            .read_raw(kind)?
            .iter()
            .map(|record| Row::from_record(&headers, record))
            .collect();
        Ok(Table::new(kind, rows))
    }

    /// Load every record of a kind as typed values, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] if the file does not match the
    /// schema or a cell cannot be parsed, or [`Error::IoFailure`] if reading
    /// fails.
    pub fn load_records<R: Record>(&self) -> Result<Vec<R>> {
        let kind = R::KIND;
        let headers = canonical_header(kind);
        self.read_raw(kind)?
            .iter()
            .map(|record| {
                record.deserialize::<R>(Some(&headers)).map_err(|e| {
                    Error::schema_mismatch(kind, self.path(kind), format!("{}: {e}", line_of(record)))
                })
            })
            .collect()
    }

    /// Append a typed record.
    ///
    /// The caller keeps ownership of `record`, so a failed append can be
    /// retried without re-entering the data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRecord`] if the record fails validation,
    /// [`Error::SchemaMismatch`] if the existing file is malformed, or
    /// [`Error::IoFailure`] if the file cannot be rewritten. The file is left
    /// unchanged in every error case.
    pub fn append<R: Record>(&self, record: &R) -> Result<()> {
        record.validate()?;
        let kind = R::KIND;
        let existing = self.read_raw(kind)?;
        self.rewrite(kind, &existing, |writer| writer.serialize(record))?;
        info!("Appended {} record for {}", kind, record.date());
        Ok(())
    }

    /// Append an untyped row.
    ///
    /// The row must carry exactly the kind's columns, and its values must
    /// parse as that kind's record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaMismatch`] if columns are missing or unknown,
    /// [`Error::InvalidRecord`] if a value is invalid, or
    /// [`Error::IoFailure`] if the file cannot be rewritten. The file is left
    /// unchanged in every error case.
    pub fn append_row(&self, kind: RecordKind, row: &Row) -> Result<()> {
        let columns = kind.columns();

        let unknown: Vec<&str> = row.columns().filter(|c| !kind.has_column(c)).collect();
        if !unknown.is_empty() {
            return Err(Error::schema_mismatch(
                kind,
                self.path(kind),
                format!("unknown columns: {}", unknown.join(", ")),
            ));
        }

        let record = row.to_record(columns).map_err(|missing| {
            Error::schema_mismatch(
                kind,
                self.path(kind),
                format!("missing columns: {}", missing.join(", ")),
            )
        })?;
        kind.check_row(&canonical_header(kind), &record)?;

        let existing = self.read_raw(kind)?;
        self.rewrite(kind, &existing, |writer| writer.write_record(&record))?;
        info!("Appended {} row", kind);
        Ok(())
    }

    /// Compute a derived view over one kind's log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be loaded or the metric does not
    /// apply to the kind.
    pub fn aggregate(&self, kind: RecordKind, grouping: Grouping, metric: &Metric) -> Result<Vec<Point>> {
        let table = self.load(kind)?;
        aggregate::aggregate(&table, grouping, metric)
    }

    /// Get statistics for every record kind.
    ///
    /// # Errors
    ///
    /// Returns an error if any log cannot be loaded.
    pub fn stats(&self) -> Result<Vec<KindStats>> {
        RecordKind::ALL
            .iter()
            .map(|&kind| self.kind_stats(kind))
            .collect()
    }

    fn kind_stats(&self, kind: RecordKind) -> Result<KindStats> {
        let table = self.load(kind)?;
        let dates: Vec<NaiveDate> = table
            .iter()
            .filter_map(|row| row.get("date"))
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect();

        let path = self.path(kind);
        let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Ok(KindStats {
            kind,
            rows: table.len(),
            first_date: dates.iter().min().copied(),
            last_date: dates.iter().max().copied(),
            size_bytes,
        })
    }

    /// Read and validate the raw records of a kind's file.
    fn read_raw(&self, kind: RecordKind) -> Result<Vec<StringRecord>> {
        let path = self.path(kind);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} log yet at {}", kind, path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::io_failure(&path, e)),
        };

        let is_empty = file
            .metadata()
            .map_err(|e| Error::io_failure(&path, e))?
            .len()
            == 0;
        if is_empty {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| read_error(kind, &path, e))?
            .clone();
        // Blank lines only, e.g. a file saved empty by an editor
        if headers.iter().all(str::is_empty) {
            debug!("{} log at {} has no header", kind, path.display());
            return Ok(Vec::new());
        }
        check_header(kind, &path, &headers)?;

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| read_error(kind, &path, e))?;

        debug!("Loaded {} {} rows from {}", records.len(), kind, path.display());
        Ok(records)
    }

    /// Write header, `existing` rows and one new row to a temporary file, then
    /// rename it over the kind's log.
    fn rewrite<F>(&self, kind: RecordKind, existing: &[StringRecord], write_new: F) -> Result<()>
    where
        F: FnOnce(&mut csv::Writer<&mut NamedTempFile>) -> csv::Result<()>,
    {
        let path = self.path(kind);
        let mut tmp =
            NamedTempFile::new_in(&self.data_dir).map_err(|e| Error::io_failure(&self.data_dir, e))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut tmp);
            writer
                .write_record(kind.columns())
                .map_err(|e| write_error(&path, e))?;
            for record in existing {
                writer
                    .write_record(record)
                    .map_err(|e| write_error(&path, e))?;
            }
            write_new(&mut writer).map_err(|e| write_error(&path, e))?;
            writer.flush().map_err(|e| Error::io_failure(&path, e))?;
        }

        tmp.flush().map_err(|e| Error::io_failure(&path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::io_failure(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| Error::io_failure(&path, e.error))?;

        debug!(
            "Rewrote {} with {} rows",
            path.display(),
            existing.len() + 1
        );
        Ok(())
    }
}

/// Statistics about one record kind's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindStats {
    /// The record kind.
    pub kind: RecordKind,
    /// Number of rows.
    pub rows: usize,
    /// Earliest logged date.
    pub first_date: Option<NaiveDate>,
    /// Latest logged date.
    pub last_date: Option<NaiveDate>,
    /// Size of the CSV file in bytes.
    pub size_bytes: u64,
}

fn canonical_header(kind: RecordKind) -> StringRecord {
    StringRecord::from(kind.columns().to_vec())
}

fn check_header(kind: RecordKind, path: &Path, headers: &StringRecord) -> Result<()> {
    let expected = kind.columns();
    if headers.iter().eq(expected.iter().copied()) {
        return Ok(());
    }

    let found: Vec<&str> = headers.iter().collect();
    let missing: Vec<&str> = expected
        .iter()
        .copied()
        .filter(|c| !found.contains(c))
        .collect();
    let unknown: Vec<&str> = found
        .iter()
        .copied()
        .filter(|c| !expected.contains(c))
        .collect();

    let message = if missing.is_empty() && unknown.is_empty() {
        format!(
            "columns out of order: expected [{}], found [{}]",
            expected.join(","),
            found.join(",")
        )
    } else {
        format!(
            "header mismatch: missing [{}], unknown [{}]",
            missing.join(","),
            unknown.join(",")
        )
    };
    Err(Error::schema_mismatch(kind, path, message))
}

fn line_of(record: &StringRecord) -> String {
    record
        .position()
        .map_or_else(|| "unknown line".to_string(), |p| format!("line {}", p.line()))
}

fn read_error(kind: RecordKind, path: &Path, err: csv::Error) -> Error {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return Error::io_failure(path, source);
        }
        return Error::schema_mismatch(kind, path, "unreadable file");
    }
    Error::schema_mismatch(kind, path, err.to_string())
}

fn write_error(path: &Path, err: csv::Error) -> Error {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        if let csv::ErrorKind::Io(source) = err.into_kind() {
            return Error::io_failure(path, source);
        }
        return Error::io_failure(path, std::io::Error::other("CSV write failed"));
    }
    Error::Csv(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Reduction;
    use crate::records::{HabitRecord, MealRecord, WeightRecord, WeightUnit};
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = RecordStore::open(dir.path().join("data")).expect("failed to open store");
        (dir, store)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weight_row(date: &str, weight: &str, unit: &str) -> Row {
        Row::new()
            .with("date", date)
            .with("weight", weight)
            .with("unit", unit)
            .with("waist_cm", "")
    }

    #[test]
    fn test_open_creates_data_dir() {
        let (_dir, store) = create_test_store();
        assert!(store.data_dir().is_dir());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let (_dir, store) = create_test_store();
        for kind in RecordKind::ALL {
            let table = store.load(kind).unwrap();
            assert!(table.is_empty());
            assert_eq!(table.columns(), kind.columns());
        }
        assert!(store.load_records::<MealRecord>().unwrap().is_empty());
    }

    #[test]
    fn test_load_empty_file_is_empty() {
        let (_dir, store) = create_test_store();
        std::fs::write(store.path(RecordKind::Weight), "").unwrap();
        assert!(store.load(RecordKind::Weight).unwrap().is_empty());
    }

    #[test]
    fn test_blank_line_file_is_empty() {
        let (_dir, store) = create_test_store();
        std::fs::write(store.path(RecordKind::Weight), "\n").unwrap();
        assert!(store.load(RecordKind::Weight).unwrap().is_empty());

        let record = WeightRecord::new(date("2024-01-01"), 80.0, WeightUnit::Kg).unwrap();
        store.append(&record).unwrap();
        let contents = std::fs::read_to_string(store.path(RecordKind::Weight)).unwrap();
        assert!(contents.starts_with("date,weight,unit,waist_cm\n2024-01-01,80"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let (_dir, store) = create_test_store();
        std::fs::write(store.path(RecordKind::Weight), "date,weight,unit,waist_cm\n").unwrap();
        assert!(store.load(RecordKind::Weight).unwrap().is_empty());
    }

    #[test]
    fn test_append_then_load() {
        let (_dir, store) = create_test_store();
        let record = WeightRecord::new(date("2024-01-01"), 80.5, WeightUnit::Kg)
            .unwrap()
            .with_waist(90.0);
        store.append(&record).unwrap();

        let loaded = store.load_records::<WeightRecord>().unwrap();
        assert_eq!(loaded, vec![record]);

        let table = store.load(RecordKind::Weight).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get("weight"), Some("80.5"));
        assert_eq!(table.rows()[0].get("waist_cm"), Some("90.0"));
    }

    #[test]
    fn test_append_preserves_order_and_places_new_row_last() {
        let (_dir, store) = create_test_store();
        let first = MealRecord::new(date("2024-01-02"), "Eggs", 300).unwrap();
        let second = MealRecord::new(date("2024-01-01"), "Back-dated soup", 250).unwrap();
        let third = MealRecord::new(date("2024-01-03"), "Rice", 500).unwrap();

        store.append(&first).unwrap();
        store.append(&second).unwrap();
        let before = store.load_records::<MealRecord>().unwrap();
        store.append(&third).unwrap();
        let after = store.load_records::<MealRecord>().unwrap();

        assert_eq!(after.len(), 3);
        assert_eq!(&after[..2], &before[..]);
        assert_eq!(after.last(), Some(&third));
        assert_eq!(after[1], second);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let (_dir, store) = create_test_store();
        let meal = MealRecord::new(date("2024-01-01"), "Apple", 95).unwrap();
        store.append(&meal).unwrap();
        store.append(&meal).unwrap();

        let loaded = store.load_records::<MealRecord>().unwrap();
        assert_eq!(loaded, vec![meal.clone(), meal]);
    }

    #[test]
    fn test_text_with_commas_quotes_and_newlines() {
        let (_dir, store) = create_test_store();
        let habit = HabitRecord {
            date: date("2024-02-01"),
            walk: true,
            water: false,
            fruit: true,
            custom_habit: "stretch, 5 min".to_string(),
            reflection: "Felt \"great\"\nslept well".to_string(),
        };
        store.append(&habit).unwrap();
        assert_eq!(store.load_records::<HabitRecord>().unwrap(), vec![habit]);
    }

    #[test]
    fn test_append_row_then_load() {
        let (_dir, store) = create_test_store();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-01", "180", "lb"))
            .unwrap();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-02", "178", "lb"))
            .unwrap();

        let table = store.load(RecordKind::Weight).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.last().unwrap().get("weight"), Some("178"));
        assert_eq!(table.rows()[0].get("date"), Some("2024-01-01"));
    }

    #[test]
    fn test_append_row_missing_field_leaves_file_unchanged() {
        let (_dir, store) = create_test_store();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-01", "180", "lb"))
            .unwrap();
        let before = std::fs::read(store.path(RecordKind::Weight)).unwrap();

        let incomplete = Row::new().with("date", "2024-01-02").with("weight", "178");
        let err = store.append_row(RecordKind::Weight, &incomplete).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("unit"));

        let after = std::fs::read(store.path(RecordKind::Weight)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_append_row_missing_field_on_first_run_creates_nothing() {
        let (_dir, store) = create_test_store();
        let incomplete = Row::new().with("date", "2024-01-02");
        let err = store.append_row(RecordKind::Weight, &incomplete).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(!store.path(RecordKind::Weight).exists());
    }

    #[test]
    fn test_append_row_unknown_column() {
        let (_dir, store) = create_test_store();
        let row = weight_row("2024-01-01", "80", "kg").with("bmi", "24");
        let err = store.append_row(RecordKind::Weight, &row).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("bmi"));
    }

    #[test]
    fn test_append_row_invalid_value() {
        let (_dir, store) = create_test_store();
        let row = weight_row("2024-01-01", "heavy", "kg");
        let err = store.append_row(RecordKind::Weight, &row).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
        assert!(!store.path(RecordKind::Weight).exists());
    }

    #[test]
    fn test_append_invalid_record_is_rejected() {
        let (_dir, store) = create_test_store();
        let mut record = WeightRecord::new(date("2024-01-01"), 80.0, WeightUnit::Kg).unwrap();
        record.weight = -1.0;
        let err = store.append(&record).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_wrong_header_is_schema_mismatch() {
        let (_dir, store) = create_test_store();
        let path = store.path(RecordKind::Weight);
        std::fs::write(&path, "date,weight,waist\n2024-01-01,80,90\n").unwrap();

        let err = store.load(RecordKind::Weight).unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("waist"));

        let record = WeightRecord::new(date("2024-01-02"), 79.0, WeightUnit::Kg).unwrap();
        let err = store.append(&record).unwrap_err();
        assert!(err.is_schema_mismatch());

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "date,weight,waist\n2024-01-01,80,90\n");
    }

    #[test]
    fn test_reordered_header_is_schema_mismatch() {
        let (_dir, store) = create_test_store();
        std::fs::write(
            store.path(RecordKind::Weight),
            "weight,date,unit,waist_cm\n80,2024-01-01,kg,\n",
        )
        .unwrap();
        let err = store.load(RecordKind::Weight).unwrap_err();
        assert!(err.to_string().contains("out of order"));
    }

    #[test]
    fn test_short_row_is_schema_mismatch() {
        let (_dir, store) = create_test_store();
        std::fs::write(
            store.path(RecordKind::Weight),
            "date,weight,unit,waist_cm\n2024-01-01,80\n",
        )
        .unwrap();
        let err = store.load(RecordKind::Weight).unwrap_err();
        assert!(err.is_schema_mismatch());
    }

    #[test]
    fn test_unparseable_cell_is_schema_mismatch_on_typed_load() {
        let (_dir, store) = create_test_store();
        std::fs::write(
            store.path(RecordKind::Weight),
            "date,weight,unit,waist_cm\n2024-01-01,eighty,kg,\n",
        )
        .unwrap();

        assert_eq!(store.load(RecordKind::Weight).unwrap().len(), 1);
        let err = store.load_records::<WeightRecord>().unwrap_err();
        assert!(err.is_schema_mismatch());
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, store) = create_test_store();
        let record = WeightRecord::new(date("2024-01-01"), 80.0, WeightUnit::Kg).unwrap();
        store.append(&record).unwrap();
        store.append(&record).unwrap();

        let entries: Vec<_> = std::fs::read_dir(store.data_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("weight_logs.csv")]);
    }

    #[test]
    fn test_file_format_on_disk() {
        let (_dir, store) = create_test_store();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-01", "180", "lb"))
            .unwrap();
        let contents = std::fs::read_to_string(store.path(RecordKind::Weight)).unwrap();
        assert_eq!(contents, "date,weight,unit,waist_cm\n2024-01-01,180,lb,\n");
    }

    #[test]
    fn test_aggregate_weight_trend_scenario() {
        let (_dir, store) = create_test_store();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-01", "180", "lb"))
            .unwrap();
        store
            .append_row(RecordKind::Weight, &weight_row("2024-01-02", "178", "lb"))
            .unwrap();

        let points = store
            .aggregate(
                RecordKind::Weight,
                Grouping::Day,
                &Metric::new("weight", Reduction::Last),
            )
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date("2024-01-01"));
        assert!((points[0].value - 180.0).abs() < f64::EPSILON);
        assert_eq!(points[1].date, date("2024-01-02"));
        assert!((points[1].value - 178.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_empty_store() {
        let (_dir, store) = create_test_store();
        let points = store
            .aggregate(
                RecordKind::Meal,
                Grouping::Day,
                &Metric::new("calories", Reduction::Mean),
            )
            .unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_stats() {
        let (_dir, store) = create_test_store();
        store
            .append(&MealRecord::new(date("2024-01-03"), "Oats", 350).unwrap())
            .unwrap();
        store
            .append(&MealRecord::new(date("2024-01-01"), "Toast", 200).unwrap())
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.len(), RecordKind::ALL.len());

        let meals = stats.iter().find(|s| s.kind == RecordKind::Meal).unwrap();
        assert_eq!(meals.rows, 2);
        assert_eq!(meals.first_date, Some(date("2024-01-01")));
        assert_eq!(meals.last_date, Some(date("2024-01-03")));
        assert!(meals.size_bytes > 0);

        let weights = stats.iter().find(|s| s.kind == RecordKind::Weight).unwrap();
        assert_eq!(weights.rows, 0);
        assert_eq!(weights.size_bytes, 0);
        assert!(weights.first_date.is_none());
    }

    #[test]
    fn test_write_error_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = write_error(Path::new("/data/weight_logs.csv"), csv::Error::from(io));
        assert!(err.is_io_failure());
        assert!(err.to_string().contains("weight_logs.csv"));
    }

    #[test]
    fn test_unreadable_log_is_io_failure() {
        let (_dir, store) = create_test_store();
        let meal = MealRecord::new(date("2024-01-01"), "Oats", 300).unwrap();
        store.append(&meal).unwrap();
        let meals_before = std::fs::read(store.path(RecordKind::Meal)).unwrap();

        // A directory where the weight log should be cannot be read or replaced
        std::fs::create_dir(store.path(RecordKind::Weight)).unwrap();
        let record = WeightRecord::new(date("2024-01-02"), 80.0, WeightUnit::Kg).unwrap();
        let err = store.append(&record).unwrap_err();
        assert!(err.is_io_failure(), "unexpected error: {err}");

        // The caller still holds the record, and nothing else was touched
        assert!((record.weight - 80.0).abs() < f64::EPSILON);
        assert!(store.path(RecordKind::Weight).is_dir());
        assert_eq!(std::fs::read(store.path(RecordKind::Meal)).unwrap(), meals_before);
        let entries = std::fs::read_dir(store.data_dir()).unwrap().count();
        assert_eq!(entries, 2);
    }
}
