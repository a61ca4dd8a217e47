use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::identity::Identity;
use crate::store::schema::{HISTORY_LIMIT, HistoryData, HistoryEntry};

const HISTORY_FILE: &str = "history.json";
const IDENTITY_FILE: &str = "identity.json";

/// JSON persistence rooted in the platform data directory. Writes go through
/// a tmp file plus rename so a crash mid-write never corrupts existing data.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typewise");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self) -> HistoryData {
        let data: HistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            HistoryData::default()
        } else {
            data
        }
    }

    pub fn save_history(&self, data: &HistoryData) -> Result<()> {
        self.save(HISTORY_FILE, data)
    }

    /// Append-to-front, capped at `HISTORY_LIMIT`. Single synchronous
    /// read-modify-write; not safe against concurrent writers, which is
    /// acceptable for a single-user client.
    pub fn append_history(&self, entry: HistoryEntry) -> Result<()> {
        let mut data = self.load_history();
        data.entries.insert(0, entry);
        data.entries.truncate(HISTORY_LIMIT);
        self.save_history(&data)
    }

    /// Entries owned by the given identity, newest first.
    pub fn history_for(&self, owner_id: &str) -> Vec<HistoryEntry> {
        self.load_history()
            .entries
            .into_iter()
            .filter(|e| e.owner_id == owner_id)
            .collect()
    }

    /// Current signed-in identity record, if any. A file that exists but
    /// cannot be parsed reads as signed out.
    pub fn load_identity(&self) -> Option<Identity> {
        let path = self.file_path(IDENTITY_FILE);
        let content = fs::read_to_string(&path).ok()?;
        serde_json::from_str(&content).ok()
    }

    pub fn save_identity(&self, identity: &Identity) -> Result<()> {
        self.save(IDENTITY_FILE, identity)
    }

    pub fn clear_identity(&self) -> Result<()> {
        let path = self.file_path(IDENTITY_FILE);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::session::record::ResultRecord;
    use crate::store::schema::SCHEMA_VERSION;

    use super::*;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn make_entry(id: u32, owner_id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            created_at: Utc::now(),
            source_file_name: "sample.txt".to_string(),
            reference_text: "the cat sat".to_string(),
            typed_text: "the cat sat".to_string(),
            elapsed_seconds: 5,
            owner_id: owner_id.to_string(),
            record: ResultRecord::compose("the cat sat", "the cat sat", 5, Default::default()),
        }
    }

    #[test]
    fn empty_store_loads_default() {
        let (_dir, store) = make_test_store();
        let data = store.load_history();
        assert!(data.entries.is_empty());
    }

    #[test]
    fn append_is_newest_first() {
        let (_dir, store) = make_test_store();
        store.append_history(make_entry(1, "sam")).unwrap();
        store.append_history(make_entry(2, "sam")).unwrap();

        let data = store.load_history();
        assert_eq!(data.entries[0].id, "2");
        assert_eq!(data.entries[1].id, "1");
    }

    #[test]
    fn append_caps_at_fifty_dropping_oldest() {
        let (_dir, store) = make_test_store();
        for i in 0..51 {
            store.append_history(make_entry(i, "sam")).unwrap();
        }

        let data = store.load_history();
        assert_eq!(data.entries.len(), HISTORY_LIMIT);
        assert_eq!(data.entries[0].id, "50");
        // Entry 0, the oldest, fell off the end.
        assert!(data.entries.iter().all(|e| e.id != "0"));
        assert_eq!(data.entries.last().unwrap().id, "1");
    }

    #[test]
    fn history_for_filters_by_owner() {
        let (_dir, store) = make_test_store();
        store.append_history(make_entry(1, "sam")).unwrap();
        store.append_history(make_entry(2, "alex")).unwrap();
        store.append_history(make_entry(3, "sam")).unwrap();

        let sams = store.history_for("sam");
        assert_eq!(sams.len(), 2);
        assert!(sams.iter().all(|e| e.owner_id == "sam"));
        assert_eq!(sams[0].id, "3");

        assert!(store.history_for("nobody").is_empty());
    }

    #[test]
    fn corrupt_history_file_reads_as_empty() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(HISTORY_FILE), "not json at all").unwrap();
        assert!(store.load_history().entries.is_empty());
    }

    #[test]
    fn stale_schema_version_resets() {
        let (_dir, store) = make_test_store();
        let json = format!(
            r#"{{"schema_version": {}, "entries": []}}"#,
            SCHEMA_VERSION + 9
        );
        fs::write(store.file_path(HISTORY_FILE), json).unwrap();
        let data = store.load_history();
        assert_eq!(data.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.append_history(make_entry(1, "sam")).unwrap();

        let tmp_files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn identity_round_trip_and_clear() {
        let (_dir, store) = make_test_store();
        assert!(store.load_identity().is_none());

        let identity = Identity::from_name("Ada");
        store.save_identity(&identity).unwrap();
        assert_eq!(store.load_identity(), Some(identity));

        store.clear_identity().unwrap();
        assert!(store.load_identity().is_none());
        // Clearing twice is fine.
        store.clear_identity().unwrap();
    }
}
