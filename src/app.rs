use crate::menu::{MenuError, MenuItem, Selection, Session};
use crate::platform::PlatformInfo;
use chrono::{DateTime, Local};
use std::path::PathBuf;

// UI constants
pub const NARROW_WIDTH_THRESHOLD: u16 = 60;
pub const ERROR_TTL_SECS: u64 = 10;

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub platform: PlatformInfo,
    pub workdir: Option<PathBuf>,
}

/// Outcome of the most recent command, shown in the footer.
#[derive(Debug, Clone)]
pub struct LastRun {
    pub command: String,
    pub outcome: String,
    pub success: bool,
    pub finished_at: DateTime<Local>,
}

pub struct AppState {
    pub config: AppConfig,
    pub session: Session,

    // Navigation
    pub cursor: usize,
    cursor_stack: Vec<usize>,
    /// Keys typed so far while they are a prefix of a multi-character key.
    pub pending: String,

    pub last_run: Option<LastRun>,
    error: Option<(String, std::time::Instant)>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(session: Session, config: AppConfig) -> Self {
        Self {
            config,
            session,
            cursor: 0,
            cursor_stack: Vec::new(),
            pending: String::new(),
            last_run: None,
            error: None,
            should_quit: false,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        self.session.items()
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        let len = self.items().len();
        if len > 0 && self.cursor < len - 1 {
            self.cursor += 1;
        }
    }

    /// Feeds one typed character. Returns the command to run when the typed
    /// keys select a leaf.
    pub fn type_char(&mut self, c: char) -> Option<String> {
        self.pending.push(c);

        if self.session.find(&self.pending).is_some() {
            let key = std::mem::take(&mut self.pending);
            let result = self.session.select(&key);
            return self.apply(result);
        }
        if self.session.matches_prefix(&self.pending) {
            return None;
        }

        // dead end: start over from this character alone
        let restart = self.pending.chars().count() > 1;
        self.pending.clear();
        if restart {
            self.type_char(c)
        } else {
            None
        }
    }

    /// Activates the item under the cursor.
    pub fn activate_current(&mut self) -> Option<String> {
        self.pending.clear();
        let result = self.session.activate(self.cursor);
        self.apply(result)
    }

    fn apply(&mut self, result: Result<Selection, MenuError>) -> Option<String> {
        match result {
            Ok(Selection::Run(command)) => Some(command),
            Ok(Selection::Entered) => {
                self.cursor_stack.push(self.cursor);
                self.cursor = 0;
                None
            }
            Ok(Selection::Unknown) => None,
            Err(e) => {
                tracing::warn!("menu error: {e}");
                self.set_error(e.to_string());
                None
            }
        }
    }

    /// Leaves the current sub-menu. Returns false at the root.
    pub fn go_back(&mut self) -> bool {
        self.pending.clear();
        if self.session.back() {
            self.cursor = self.cursor_stack.pop().unwrap_or(0);
            true
        } else {
            false
        }
    }

    /// `q` quits only when no key in the current menu starts with it.
    pub fn quit_key_free(&self) -> bool {
        !self.session.matches_prefix("q")
    }

    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    pub fn record_run(&mut self, command: String, outcome: String, success: bool) {
        if !success {
            self.set_error(format!("`{command}` failed: {outcome}"));
        }
        self.last_run = Some(LastRun {
            command,
            outcome,
            success,
            finished_at: Local::now(),
        });
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, std::time::Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}
