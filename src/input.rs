use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    /// Drop a partly typed multi-character key.
    ClearPending,
    Back,
    MoveUp,
    MoveDown,
    Activate,
    /// A character that may select an item by key.
    Type(char),
    None,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone)]
pub struct InputContext {
    pub has_error: bool,
    pub at_root: bool,
    /// No item in the current menu uses `q` as its key.
    pub quit_key_free: bool,
    /// Part of a multi-character key has been typed.
    pub pending: bool,
}

impl Default for InputContext {
    fn default() -> Self {
        Self {
            has_error: false,
            at_root: true,
            quit_key_free: true,
            pending: false,
        }
    }
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else if ctx.pending {
                Action::ClearPending
            } else if ctx.at_root {
                Action::Quit
            } else {
                Action::Back
            }
        }
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::Enter | KeyCode::Right => Action::Activate,
        KeyCode::Backspace | KeyCode::Left if ctx.pending => Action::ClearPending,
        KeyCode::Backspace | KeyCode::Left => Action::Back,
        KeyCode::Char('q') if ctx.quit_key_free && !ctx.pending => Action::Quit,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Action::Type(c),
        _ => Action::None,
    }
}
