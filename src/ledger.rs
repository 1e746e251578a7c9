use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::APP_DIR_NAME;
use crate::error::LedgerError;

const RESULTS_FILE_NAME: &str = "results.json";

/// One finished game.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub player_name: String,
    pub level: u32,
    pub elapsed_secs: u64,
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - level {} - {}",
            self.player_name,
            self.level,
            format_elapsed(self.elapsed_secs)
        )
    }
}

/// Formats seconds as `mm:ss`.
#[must_use]
pub fn format_elapsed(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

/// Backing storage for finished-game results.
pub trait ResultsStore {
    /// Persists one more entry after all existing ones.
    fn append(&mut self, entry: &ResultEntry) -> Result<(), LedgerError>;

    /// Returns every stored entry in insertion order.
    fn load_all(&self) -> Result<Vec<ResultEntry>, LedgerError>;

    /// Forgets every stored entry.
    fn clear_all(&mut self) -> Result<(), LedgerError>;
}

/// Keeps results in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Vec<ResultEntry>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }
}

impl ResultsStore for MemoryStore {
    fn append(&mut self, entry: &ResultEntry) -> Result<(), LedgerError> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ResultEntry>, LedgerError> {
        Ok(self.entries.clone())
    }

    fn clear_all(&mut self) -> Result<(), LedgerError> {
        self.entries.clear();
        Ok(())
    }
}

/// Stores results as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns a store at the platform-correct results path.
    #[must_use]
    pub fn at_default_path() -> Option<Self> {
        default_results_path().map(Self::new)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_all(&self, entries: &[ResultEntry]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ResultsStore for JsonFileStore {
    fn append(&mut self, entry: &ResultEntry) -> Result<(), LedgerError> {
        let mut entries = self.load_all()?;
        entries.push(entry.clone());
        self.write_all(&entries)
    }

    fn load_all(&self) -> Result<Vec<ResultEntry>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    fn clear_all(&mut self) -> Result<(), LedgerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Returns the platform-correct results file path.
#[must_use]
pub fn default_results_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join(APP_DIR_NAME).join(RESULTS_FILE_NAME))
}

/// Ordered results table backed by a [`ResultsStore`].
///
/// Entries are kept in insertion order, most recent last.
pub struct ResultsLedger {
    entries: Vec<ResultEntry>,
    store: Box<dyn ResultsStore>,
}

impl fmt::Debug for ResultsLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultsLedger")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ResultsLedger {
    /// Loads existing entries from `store`.
    pub fn open(store: Box<dyn ResultsStore>) -> Result<Self, LedgerError> {
        let entries = store.load_all()?;
        Ok(Self { entries, store })
    }

    /// Creates an empty ledger that keeps nothing beyond this process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            entries: Vec::new(),
            store: Box::new(MemoryStore::new()),
        }
    }

    /// Appends `entry`. The in-memory table is updated even when the store
    /// fails.
    pub fn record(&mut self, entry: ResultEntry) -> Result<(), LedgerError> {
        let persisted = self.store.append(&entry);
        self.entries.push(entry);
        persisted
    }

    /// Removes every entry from the table and the store.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.store.clear_all()?;
        self.entries.clear();
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        JsonFileStore, MemoryStore, ResultEntry, ResultsLedger, ResultsStore, format_elapsed,
    };
    use crate::error::LedgerError;

    fn entry(name: &str, level: u32, elapsed_secs: u64) -> ResultEntry {
        ResultEntry {
            player_name: name.to_owned(),
            level,
            elapsed_secs,
        }
    }

    #[test]
    fn elapsed_time_is_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(75), "01:15");
        assert_eq!(format_elapsed(6_000), "100:00");
    }

    #[test]
    fn entry_display_uses_clock_format() {
        assert_eq!(entry("ada", 3, 61).to_string(), "ada - level 3 - 01:01");
    }

    #[test]
    fn ledger_loads_existing_entries_and_appends_last() {
        let store = MemoryStore::with_entries(vec![entry("first", 1, 10)]);
        let mut ledger = ResultsLedger::open(Box::new(store)).expect("memory store loads");

        ledger.record(entry("second", 2, 20)).expect("memory store appends");

        let names: Vec<&str> = ledger
            .entries()
            .iter()
            .map(|e| e.player_name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn ledger_keeps_entry_when_store_fails() {
        struct BrokenStore;

        impl ResultsStore for BrokenStore {
            fn append(&mut self, _entry: &ResultEntry) -> Result<(), LedgerError> {
                Err(std::io::Error::other("disk full").into())
            }

            fn load_all(&self) -> Result<Vec<ResultEntry>, LedgerError> {
                Ok(Vec::new())
            }

            fn clear_all(&mut self) -> Result<(), LedgerError> {
                Ok(())
            }
        }

        let mut ledger = ResultsLedger::open(Box::new(BrokenStore)).expect("load succeeds");

        assert!(ledger.record(entry("ada", 1, 5)).is_err());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn file_store_round_trip_preserves_order() {
        let path = unique_test_path("round_trip");
        let mut store = JsonFileStore::new(&path);

        store.append(&entry("a", 1, 1)).expect("append should succeed");
        store.append(&entry("b", 2, 2)).expect("append should succeed");
        let reopened = ResultsLedger::open(Box::new(JsonFileStore::new(&path)))
            .expect("reload should succeed");

        assert_eq!(reopened.entries(), [entry("a", 1, 1), entry("b", 2, 2)]);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_results_file_loads_empty() {
        let path = unique_test_path("missing");

        let loaded = JsonFileStore::new(&path)
            .load_all()
            .expect("missing file should be empty");

        assert!(loaded.is_empty());
    }

    #[test]
    fn malformed_results_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        assert!(matches!(
            JsonFileStore::new(&path).load_all(),
            Err(LedgerError::Format(_))
        ));
        cleanup_test_path(&path);
    }

    #[test]
    fn clearing_removes_file_and_entries() {
        let path = unique_test_path("clear");
        let mut ledger =
            ResultsLedger::open(Box::new(JsonFileStore::new(&path))).expect("empty load");
        ledger.record(entry("a", 1, 1)).expect("append should succeed");

        ledger.clear().expect("clear should succeed");

        assert!(ledger.is_empty());
        assert!(!path.exists());
        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("grid-snake-results-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
