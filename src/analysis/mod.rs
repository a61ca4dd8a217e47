pub mod client;
pub mod prompt;
pub mod types;

pub use client::{AnalysisError, GenAiClient, MistakeAnalyzer, Transcriber};
pub use types::{AnalysisReport, AnalysisRequest, AudioPayload, Mistake, MistakeCategory};
