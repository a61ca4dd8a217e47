use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::client::{GenAiClient, MistakeAnalyzer, Transcriber};
use crate::analysis::types::{AudioPayload, is_audio_extension};
use crate::config::Config;
use crate::identity::Identity;
use crate::session::state::{FinishError, Session, SessionError, SourceKind};
use crate::store::json_store::JsonStore;
use crate::store::schema::HistoryEntry;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Practice,
    Result,
    History,
    HistoryDetail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
pub struct Status {
    pub text: String,
    pub level: StatusLevel,
}

pub struct App {
    pub screen: AppScreen,
    pub session: Session,
    pub config: Config,
    pub theme: Theme,
    pub store: Option<JsonStore>,
    pub identity: Option<Identity>,
    pub history: Vec<HistoryEntry>,
    pub history_selected: usize,
    pub path_input: String,
    pub status: Option<Status>,
    pub should_quit: bool,
    client: Option<GenAiClient>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = Theme::load(&config.theme);
        let store = JsonStore::new().ok();
        let identity = store.as_ref().and_then(|s| s.load_identity());
        let history = match (&store, &identity) {
            (Some(store), Some(identity)) => store.history_for(&identity.id),
            _ => Vec::new(),
        };

        Self {
            screen: AppScreen::Home,
            session: Session::new(),
            config,
            theme,
            store,
            identity,
            history,
            history_selected: 0,
            path_input: String::new(),
            status: None,
            should_quit: false,
            client: None,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level: StatusLevel::Info,
        });
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level: StatusLevel::Warning,
        });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            level: StatusLevel::Error,
        });
    }

    fn ensure_client(&mut self) -> Result<(), String> {
        if self.client.is_none() {
            let client = GenAiClient::from_config(&self.config).map_err(|e| e.to_string())?;
            self.client = Some(client);
        }
        Ok(())
    }

    /// Load the file named in the path input: audio goes through the
    /// transcription service, anything else is read as text. Failure of
    /// either path aborts the session back to Idle.
    pub fn select_file(&mut self) {
        self.status = None;
        let path = PathBuf::from(self.path_input.trim());
        if path.as_os_str().is_empty() {
            self.info("Enter the path of an audio or text file to begin.");
            return;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path_input.trim().to_string());
        let kind = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if is_audio_extension(ext) => SourceKind::Audio,
            _ => SourceKind::Text,
        };

        // The signed-in guard fires before any file or network work.
        if let Err(err) = self
            .session
            .begin_load(self.identity.as_ref(), &file_name, kind)
        {
            self.error(format!("{err}. Run `typewise login <name>` first."));
            return;
        }

        let loaded = match kind {
            SourceKind::Text => fs::read_to_string(&path).map_err(|e| e.to_string()),
            SourceKind::Audio => self.transcribe_file(&path),
        };

        match loaded {
            Ok(text) if !text.trim().is_empty() => {
                // begin_load put us in FileLoading, so this cannot fail.
                if self.session.text_ready(text).is_ok() {
                    self.screen = AppScreen::Practice;
                    self.path_input.clear();
                } else {
                    self.session.load_failed();
                }
            }
            Ok(_) => {
                self.session.load_failed();
                self.error("The file produced no reference text. Try a different one.");
            }
            Err(err) => {
                self.session.load_failed();
                self.error(format!("Could not process the file: {err}"));
            }
        }
    }

    fn transcribe_file(&mut self, path: &Path) -> Result<String, String> {
        self.ensure_client()?;
        let client = self.client.as_ref().ok_or("client unavailable")?;
        let payload = AudioPayload::from_path(path).map_err(|e| e.to_string())?;
        client.transcribe(&payload).map_err(|e| e.to_string())
    }

    pub fn type_char(&mut self, ch: char) {
        let mut text = self.session.typed_text.clone();
        text.push(ch);
        self.session.set_typed(text, Instant::now());
    }

    pub fn backspace(&mut self) {
        let mut text = self.session.typed_text.clone();
        text.pop();
        self.session.set_typed(text, Instant::now());
    }

    /// The "show result" action: freeze timing, run the analysis, compose and
    /// persist the result. Analysis failure keeps the typing state so the
    /// user can retry.
    pub fn show_result(&mut self) {
        self.status = None;
        if let Err(err) = self.ensure_client() {
            self.error(err);
            return;
        }
        let Some(client) = self.client.as_ref() else {
            return;
        };

        let now = Instant::now();
        match self.session.finish(client as &dyn MistakeAnalyzer, now) {
            Ok(()) => {
                self.screen = AppScreen::Result;
                self.persist_result(now);
            }
            Err(FinishError::Session(SessionError::NothingTyped)) => {
                self.info("Please type something before showing results.");
            }
            Err(FinishError::Session(_)) => {}
            Err(FinishError::Analysis(err)) => {
                self.error(format!(
                    "Could not analyze your text: {err}. Your input is preserved, try again."
                ));
            }
        }
    }

    fn persist_result(&mut self, now: Instant) {
        let Some(identity) = self.identity.clone() else {
            return;
        };
        let elapsed = self.session.elapsed_secs(now);
        let Some(entry) = HistoryEntry::from_session(&self.session, &identity.id, elapsed) else {
            return;
        };

        let Some(store) = &self.store else {
            self.warn("Result shown but no history store is available.");
            return;
        };
        let appended = store.append_history(entry);
        let history = store.history_for(&identity.id);

        // A failed write is non-fatal: the result is still on screen, it
        // just will not appear in history.
        if let Err(err) = appended {
            self.warn(format!("Result shown but not saved to history: {err}"));
        }
        self.history = history;
        self.history_selected = 0;
    }

    /// Explicit reset: back to Idle/Home, discarding in-memory session data.
    pub fn reset(&mut self) {
        self.session.reset();
        self.path_input.clear();
        self.status = None;
        self.screen = AppScreen::Home;
    }

    pub fn open_history(&mut self) {
        self.history_selected = 0;
        self.screen = AppScreen::History;
    }

    pub fn history_next(&mut self) {
        if !self.history.is_empty() {
            self.history_selected = (self.history_selected + 1).min(self.history.len() - 1);
        }
    }

    pub fn history_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn selected_entry(&self) -> Option<&HistoryEntry> {
        self.history.get(self.history_selected)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::analysis::client::AnalysisError;
    use crate::analysis::types::{AnalysisReport, AnalysisRequest};
    use crate::session::state::Phase;

    use super::*;

    fn test_app() -> App {
        let mut app = App::new(Config::default());
        // Unit tests never touch the real data dir or network.
        app.store = None;
        app.identity = None;
        app.history.clear();
        app
    }

    #[test]
    fn select_file_without_identity_stays_home_and_idle() {
        let mut app = test_app();
        app.path_input = "/tmp/sample.txt".to_string();
        app.select_file();

        assert_eq!(app.screen, AppScreen::Home);
        assert_eq!(app.session.phase(), Phase::Idle);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("login"));
    }

    #[test]
    fn empty_path_prompts_instead_of_loading() {
        let mut app = test_app();
        app.identity = Some(Identity::from_name("Sam"));
        app.select_file();
        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.status.as_ref().unwrap().level, StatusLevel::Info);
    }

    #[test]
    fn missing_text_file_aborts_to_idle() {
        let mut app = test_app();
        app.identity = Some(Identity::from_name("Sam"));
        app.path_input = "/definitely/not/a/real/file.txt".to_string();
        app.select_file();

        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.status.as_ref().unwrap().level, StatusLevel::Error);
    }

    struct StubAnalyzer;

    impl MistakeAnalyzer for StubAnalyzer {
        fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
            Ok(AnalysisReport::default())
        }
    }

    fn finished_app(identity: &Identity, now: Instant) -> App {
        let mut app = test_app();
        app.identity = Some(identity.clone());
        app.session
            .begin_load(Some(identity), "sample.txt", SourceKind::Text)
            .unwrap();
        app.session.text_ready("the cat sat".to_string()).unwrap();
        app.session.set_typed("the cat sat".to_string(), now);
        app.session
            .finish(&StubAnalyzer, now + Duration::from_secs(3))
            .unwrap();
        app
    }

    #[test]
    fn persist_result_appends_and_reloads_history() {
        let t0 = Instant::now();
        let dir = TempDir::new().unwrap();
        let identity = Identity::from_name("Sam");
        let mut app = finished_app(&identity, t0);
        app.store = Some(JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap());

        app.persist_result(t0 + Duration::from_secs(3));

        assert!(app.status.is_none());
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.history[0].owner_id, identity.id);
        assert_eq!(app.history[0].elapsed_seconds, 3);
        assert_eq!(app.history_selected, 0);
    }

    #[test]
    fn persist_result_without_store_warns() {
        let t0 = Instant::now();
        let identity = Identity::from_name("Sam");
        let mut app = finished_app(&identity, t0);

        app.persist_result(t0 + Duration::from_secs(3));

        assert!(app.history.is_empty());
        assert_eq!(app.status.as_ref().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn history_navigation_is_bounded() {
        let mut app = test_app();
        app.history_next();
        assert_eq!(app.history_selected, 0);
        app.history_prev();
        assert_eq!(app.history_selected, 0);
    }
}
