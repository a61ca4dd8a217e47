use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::types::{AnalysisReport, Mistake};
use crate::scoring::{accuracy, speed, timing};

/// The scored outcome of one completed session. Accuracy, WPM and the timing
/// label always come from the local scoring routines; the analysis service
/// contributes only the mistake list, summary, highlight and remarks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultRecord {
    pub accuracy: f64,
    pub typing_speed_wpm: f64,
    pub timing_label: String,
    pub mistakes: Vec<Mistake>,
    pub error_summary: BTreeMap<String, u32>,
    pub highlighted_reference_html: String,
    pub overall_remarks: String,
}

impl ResultRecord {
    pub fn compose(
        reference: &str,
        typed: &str,
        elapsed_secs: u64,
        analysis: AnalysisReport,
    ) -> Self {
        Self {
            accuracy: accuracy::score(reference, typed),
            typing_speed_wpm: speed::words_per_minute(typed, elapsed_secs),
            timing_label: timing::classify(elapsed_secs).to_string(),
            mistakes: analysis.mistakes,
            error_summary: analysis.error_summary,
            highlighted_reference_html: analysis.highlighted_html,
            overall_remarks: analysis.overall_remarks,
        }
    }
}
