//! Reading and writing the data file and its report

pub mod error;
pub mod legacy;
pub mod parse;
pub mod report;
pub mod write;

use log::{debug, info};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::lib::{date::Date, record::Record};

/// Where records are persisted
#[derive(Debug, Clone)]
pub struct Store {
    data: PathBuf,
    report: Option<PathBuf>,
}

/// Failure to persist the records
#[derive(Debug)]
pub enum StoreError {
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Write { path, source } => {
                write!(f, "failed to write `{}`: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Write { source, .. } => Some(source),
        }
    }
}

impl Store {
    pub fn new(data: PathBuf, report: Option<PathBuf>) -> Self {
        Self { data, report }
    }

    pub fn data_path(&self) -> &Path {
        &self.data
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report.as_deref()
    }

    /// Read all records, see `read_records`
    pub fn load(&self, errs: &mut error::Record) -> Option<Vec<Record>> {
        read_records(&self.data, errs)
    }

    /// Overwrite the data file, then the report if there is one
    pub fn save(&self, records: &[Record], today: Date) -> Result<(), StoreError> {
        overwrite(&self.data, &write::encode(records))?;
        if let Some(report) = &self.report {
            overwrite(report, &report::render(records, today))?;
        }
        info!(
            "event=save path={} records={} report={}",
            self.data.display(),
            records.len(),
            self.report.is_some(),
        );
        Ok(())
    }
}

fn overwrite(path: &Path, contents: &str) -> Result<(), StoreError> {
    std::fs::write(path, contents).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Get the records stored in `path`
///
/// A file that does not exist holds no records. `None` is returned only
/// when a fatal error was registered in `errs`, warnings leave the
/// successfully read records available.
pub fn read_records(path: &Path, errs: &mut error::Record) -> Option<Vec<Record>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("event=load path={} status=missing records=0", path.display());
            return Some(Vec::new());
        }
        Err(e) => {
            errs.make("Unreadable data file")
                .text(format!("Could not read '{}': {}", path.display(), e))
                .hint("check that the file is readable and encoded in UTF-8");
            return None;
        }
    };
    let name = path.display().to_string();
    let records = if parse::is_versioned(&contents) {
        parse::extract(&name, errs, &contents)
    } else {
        debug!("event=load path={} format=legacy", name);
        legacy::decode(&name, &contents)
    };
    if errs.is_fatal() {
        return None;
    }
    info!(
        "event=load path={} status=ok records={} warnings={}",
        name,
        records.len(),
        errs.count_warnings(),
    );
    Some(records)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::record::{Category, Priority, Progress};

    fn today() -> Date {
        "16/10/2026".parse().unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            Record::new(Category::Task, "Pay the rent")
                .with_due("01/01/2000".parse().ok())
                .with_priority(Priority::High),
            Record::new(Category::Habit, "drink water")
                .with_progress(Progress::new(2, 8, "glasses").unwrap()),
            Record::new(Category::Expense, "transport"),
        ]
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut errs = error::Record::new();
        let records = read_records(&dir.path().join("nothing.txt"), &mut errs);
        assert_eq!(records, Some(Vec::new()));
        assert!(errs.is_empty());
    }

    #[test]
    fn unreadable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut errs = error::Record::new();
        // a directory can't be read as a file
        assert!(read_records(dir.path(), &mut errs).is_none());
        assert!(errs.is_fatal());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("tracker.txt"), Some(dir.path().join("report.txt")));
        store.save(&sample(), today()).unwrap();
        let mut errs = error::Record::new();
        assert_eq!(store.load(&mut errs), Some(sample()));
        assert!(errs.is_empty());
        let report = std::fs::read_to_string(dir.path().join("report.txt")).unwrap();
        assert!(report.contains("========== TASKS 📝 =========="));
        assert!(report.contains("Due Date : 01/01/2000 ⚠️ Overdue"));
        assert!(report.contains("Progress : [███-------] 2/8 glasses"));
        assert!(report.contains("Description : transport 🚗"));
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("tracker.txt"), None);
        store.save(&sample(), today()).unwrap();
        store.save(&sample()[..1], today()).unwrap();
        let mut errs = error::Record::new();
        assert_eq!(store.load(&mut errs).unwrap().len(), 1);
        assert!(!dir.path().join("report.txt").exists());
    }

    #[test]
    fn report_is_not_read_back() {
        // loading a report (e.g. written by an older version under the data file name)
        // gives nothing rather than garbage
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.txt");
        std::fs::write(&path, report::render(&sample(), today())).unwrap();
        let mut errs = error::Record::new();
        assert_eq!(read_records(&path, &mut errs), Some(Vec::new()));
    }

    #[test]
    fn legacy_file_loses_priority_and_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.txt");
        std::fs::write(&path, "task | Pay the rent | 01/01/2000\nhabit | drink water |  | 2 | 8\nbroken line\n").unwrap();
        let mut errs = error::Record::new();
        let records = read_records(&path, &mut errs).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].priority(), Priority::Medium);
        assert_eq!(records[1].progress().unwrap().unit, "times");
        assert!(errs.is_empty());
    }

    #[test]
    fn write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("missing").join("tracker.txt"), None);
        let err = store.save(&sample(), today()).unwrap_err();
        assert!(format!("{}", err).contains("failed to write"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
