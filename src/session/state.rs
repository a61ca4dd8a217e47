use std::time::Instant;

use thiserror::Error;

use crate::analysis::client::{AnalysisError, MistakeAnalyzer};
use crate::analysis::types::AnalysisRequest;
use crate::identity::Identity;
use crate::scoring::speed;
use crate::session::record::ResultRecord;
use crate::session::timer::SessionTimer;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FileLoading,
    TextReady,
    Typing,
    Scoring,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Audio,
    Text,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("sign in before starting a practice session")]
    SignInRequired,
    #[error("type something before requesting a result")]
    NothingTyped,
    #[error("operation not valid in the current session phase")]
    WrongPhase,
}

#[derive(Debug, Error)]
pub enum FinishError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// One practice session from file selection to scored result.
///
/// Phases: Idle -> FileLoading -> TextReady -> Typing -> Scoring -> Result,
/// with Idle reachable from anywhere via `reset`. Exactly one ResultRecord
/// is produced per completed session, and never for empty typed text.
#[derive(Debug, Default)]
pub struct Session {
    phase: Phase,
    pub source_name: String,
    pub source_kind: Option<SourceKind>,
    pub reference_text: String,
    pub typed_text: String,
    pub timer: SessionTimer,
    pub record: Option<ResultRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Idle -> FileLoading. Rejected without a signed-in identity; the
    /// rejection happens before any file read or transcription work.
    pub fn begin_load(
        &mut self,
        identity: Option<&Identity>,
        source_name: &str,
        kind: SourceKind,
    ) -> Result<(), SessionError> {
        if identity.is_none() {
            return Err(SessionError::SignInRequired);
        }
        if self.phase != Phase::Idle {
            return Err(SessionError::WrongPhase);
        }
        self.source_name = source_name.to_string();
        self.source_kind = Some(kind);
        self.phase = Phase::FileLoading;
        Ok(())
    }

    /// FileLoading -> TextReady with the derived reference text.
    pub fn text_ready(&mut self, reference: String) -> Result<(), SessionError> {
        if self.phase != Phase::FileLoading {
            return Err(SessionError::WrongPhase);
        }
        self.reference_text = reference;
        self.phase = Phase::TextReady;
        Ok(())
    }

    /// FileLoading -> Idle. In-memory session data is discarded.
    pub fn load_failed(&mut self) {
        self.reset();
    }

    /// Replace the typed text. The first non-empty input starts the clock
    /// (TextReady -> Typing); clearing all input stops and resets it
    /// (Typing -> TextReady).
    pub fn set_typed(&mut self, text: String, now: Instant) {
        match self.phase {
            Phase::TextReady => {
                if !text.is_empty() {
                    self.timer.start(now);
                    self.phase = Phase::Typing;
                }
                self.typed_text = text;
            }
            Phase::Typing => {
                if text.is_empty() {
                    self.timer.clear();
                    self.phase = Phase::TextReady;
                }
                self.typed_text = text;
            }
            // Input is ignored outside the typing phases.
            _ => {}
        }
    }

    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.timer.elapsed_secs(now)
    }

    /// WPM over the text typed so far, for the live header.
    pub fn live_wpm(&self, now: Instant) -> f64 {
        speed::words_per_minute(&self.typed_text, self.timer.elapsed_secs(now))
    }

    /// Typing -> Scoring. Freezes the elapsed time to the wall-clock delta
    /// at `now` and returns it. Empty or whitespace-only typed text is a
    /// no-op error with no transition.
    pub fn begin_scoring(&mut self, now: Instant) -> Result<u64, SessionError> {
        if self.phase != Phase::Typing {
            return Err(SessionError::WrongPhase);
        }
        if self.typed_text.trim().is_empty() {
            return Err(SessionError::NothingTyped);
        }
        self.phase = Phase::Scoring;
        Ok(self.timer.freeze(now))
    }

    /// Scoring -> Typing. Typed text is preserved and the clock resumes so
    /// the user can retry.
    pub fn scoring_failed(&mut self) {
        if self.phase == Phase::Scoring {
            self.timer.thaw();
            self.phase = Phase::Typing;
        }
    }

    /// Scoring -> Result with the composed record.
    pub fn complete(&mut self, record: ResultRecord) {
        if self.phase == Phase::Scoring {
            self.record = Some(record);
            self.phase = Phase::Result;
        }
    }

    /// The whole "show result" transition: freeze timing, run the external
    /// analysis, compose the record from local scoring plus the report. On
    /// analysis failure the session rolls back to Typing.
    pub fn finish(
        &mut self,
        analyzer: &dyn MistakeAnalyzer,
        now: Instant,
    ) -> Result<(), FinishError> {
        let elapsed = self.begin_scoring(now)?;
        let request = AnalysisRequest {
            reference_text: self.reference_text.clone(),
            typed_text: self.typed_text.clone(),
            elapsed_secs: elapsed,
        };
        match analyzer.analyze(&request) {
            Ok(report) => {
                let record =
                    ResultRecord::compose(&self.reference_text, &self.typed_text, elapsed, report);
                self.complete(record);
                Ok(())
            }
            Err(err) => {
                self.scoring_failed();
                Err(FinishError::Analysis(err))
            }
        }
    }

    /// Any phase -> Idle, discarding in-memory session data.
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}
