use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Mistake categories documented in the analysis contract. The service is
/// untrusted structured output, so anything outside the documented set
/// deserializes to `Other` instead of failing the whole report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MistakeCategory {
    Spelling,
    Grammar,
    Punctuation,
    Omission,
    Substitution,
    #[serde(other)]
    Other,
}

impl MistakeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MistakeCategory::Spelling => "spelling",
            MistakeCategory::Grammar => "grammar",
            MistakeCategory::Punctuation => "punctuation",
            MistakeCategory::Omission => "omission",
            MistakeCategory::Substitution => "substitution",
            MistakeCategory::Other => "other",
        }
    }
}

impl fmt::Display for MistakeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mistake as reported by the analysis service. `start`/`end` index into
/// the reference text and are accepted as given; the local side does not
/// re-validate them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mistake {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(rename = "type")]
    pub category: MistakeCategory,
    #[serde(default)]
    pub correction: Option<String>,
}

/// Context sent to the analysis service. `elapsed_secs` rides along for
/// future prompt revisions; the current prompt does not use it.
#[derive(Clone, Debug)]
pub struct AnalysisRequest {
    pub reference_text: String,
    pub typed_text: String,
    pub elapsed_secs: u64,
}

/// Validated analysis result. Deliberately carries no accuracy/WPM/timing
/// fields: those are computed locally and only locally.
#[derive(Clone, Debug, Default)]
pub struct AnalysisReport {
    pub mistakes: Vec<Mistake>,
    pub error_summary: BTreeMap<String, u32>,
    pub highlighted_html: String,
    pub overall_remarks: String,
}

/// Wire shape of the analysis payload, before coercion.
#[derive(Debug, Deserialize)]
pub(crate) struct RawAnalysis {
    #[serde(default)]
    mistakes: Vec<Mistake>,
    #[serde(default, rename = "errorSummary")]
    error_summary: serde_json::Value,
    #[serde(default, rename = "highlightedText")]
    highlighted_text: String,
    #[serde(default, rename = "overallRemarks")]
    overall_remarks: String,
}

impl From<RawAnalysis> for AnalysisReport {
    fn from(raw: RawAnalysis) -> Self {
        // Parse-or-default: a missing or non-mapping errorSummary becomes an
        // empty map, and non-numeric counts are dropped entry by entry.
        let error_summary = match raw.error_summary.as_object() {
            Some(map) => map
                .iter()
                .filter_map(|(k, v)| v.as_u64().map(|n| (k.clone(), n as u32)))
                .collect(),
            None => BTreeMap::new(),
        };

        AnalysisReport {
            mistakes: raw.mistakes,
            error_summary,
            highlighted_html: raw.highlighted_text,
            overall_remarks: raw.overall_remarks,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTranscription {
    pub transcription: String,
}

/// Audio file content plus the MIME type the transcription service expects.
#[derive(Clone, Debug)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl AudioPayload {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        Ok(Self {
            bytes,
            mime_type: mime_for_extension(ext.as_deref()),
        })
    }
}

pub fn mime_for_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

/// Extensions routed through the transcription path; anything else is read
/// as a plain text file.
pub fn is_audio_extension(ext: &str) -> bool {
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "mp3" | "wav" | "m4a" | "aac" | "ogg" | "flac" | "webm"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_summary_coerces_missing_to_empty() {
        let raw: RawAnalysis = serde_json::from_str(r#"{"mistakes": []}"#).unwrap();
        let report = AnalysisReport::from(raw);
        assert!(report.error_summary.is_empty());
        assert!(report.mistakes.is_empty());
    }

    #[test]
    fn error_summary_coerces_non_mapping_to_empty() {
        for bad in [r#""three""#, "3", "[1, 2]", "null", "true"] {
            let json = format!(r#"{{"errorSummary": {bad}}}"#);
            let raw: RawAnalysis = serde_json::from_str(&json).unwrap();
            let report = AnalysisReport::from(raw);
            assert!(report.error_summary.is_empty(), "not coerced for {bad}");
        }
    }

    #[test]
    fn error_summary_keeps_numeric_counts_only() {
        let json = r#"{"errorSummary": {"spelling": 2, "omission": "lots", "grammar": 1}}"#;
        let raw: RawAnalysis = serde_json::from_str(json).unwrap();
        let report = AnalysisReport::from(raw);
        assert_eq!(report.error_summary.get("spelling"), Some(&2));
        assert_eq!(report.error_summary.get("grammar"), Some(&1));
        assert!(!report.error_summary.contains_key("omission"));
    }

    #[test]
    fn unknown_category_maps_to_other() {
        let json = r#"{"start": 0, "end": 4, "type": "capitalization"}"#;
        let mistake: Mistake = serde_json::from_str(json).unwrap();
        assert_eq!(mistake.category, MistakeCategory::Other);
        assert!(mistake.correction.is_none());
    }

    #[test]
    fn documented_categories_round_trip() {
        let json = r#"{"start": 3, "end": 8, "type": "omission", "correction": "brown"}"#;
        let mistake: Mistake = serde_json::from_str(json).unwrap();
        assert_eq!(mistake.category, MistakeCategory::Omission);
        assert_eq!(mistake.correction.as_deref(), Some("brown"));

        let back = serde_json::to_value(&mistake).unwrap();
        assert_eq!(back["type"], "omission");
    }

    #[test]
    fn audio_extensions() {
        assert!(is_audio_extension("mp3"));
        assert!(is_audio_extension("WAV"));
        assert!(!is_audio_extension("txt"));
        assert_eq!(mime_for_extension(Some("mp3")), "audio/mpeg");
        assert_eq!(mime_for_extension(None), "application/octet-stream");
    }
}
