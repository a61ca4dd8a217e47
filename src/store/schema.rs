use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::record::ResultRecord;
use crate::session::state::Session;

pub(crate) const SCHEMA_VERSION: u32 = 1;

/// Hard cap on persisted history entries. The list is newest-first; anything
/// past the cap is dropped on append.
pub const HISTORY_LIMIT: usize = 50;

/// One immutable record of a completed session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub source_file_name: String,
    pub reference_text: String,
    pub typed_text: String,
    pub elapsed_seconds: u64,
    pub owner_id: String,
    pub record: ResultRecord,
}

impl HistoryEntry {
    /// Snapshot a completed session for the given owner. Returns None unless
    /// the session actually holds a result record.
    pub fn from_session(session: &Session, owner_id: &str, elapsed_seconds: u64) -> Option<Self> {
        let record = session.record.clone()?;
        let created_at = Utc::now();
        Some(Self {
            id: created_at.timestamp_millis().to_string(),
            created_at,
            source_file_name: session.source_name.clone(),
            reference_text: session.reference_text.clone(),
            typed_text: session.typed_text.clone(),
            elapsed_seconds,
            owner_id: owner_id.to_string(),
            record,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    pub entries: Vec<HistoryEntry>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: Vec::new(),
        }
    }
}

impl HistoryData {
    /// Loaded data with an unknown schema version is reset rather than
    /// reinterpreted.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
