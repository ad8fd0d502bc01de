use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{InputMode, Screen};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    OpenArticle,
    Back,
    Refresh,
    OpenAdmin,
    ShowHelp,
    HideHelp,
    // Search input actions
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,
    // Admin actions
    DeleteArticle,
    NewArticle,
    SignOut,
    // Sign-in form actions
    SignInChar(char),
    SignInBackspace,
    SignInNextField,
    SignInToggleMode,
    SignInConfirm,
    SignInCancel,
    // Compose form actions
    ComposeChar(char),
    ComposeBackspace,
    ComposeNewline,
    ComposeNextField,
    ComposePrevField,
    ComposeCursorLeft,
    ComposeCursorRight,
    ComposeCursorHome,
    ComposeCursorEnd,
    ComposeSubmit,
    ComposeCancel,
    // Image upload prompt actions
    AttachImageStart,
    UploadChar(char),
    UploadBackspace,
    UploadConfirm,
    UploadCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    screen: Screen,
    mode: InputMode,
    show_help: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match mode {
        InputMode::Search => match key.code {
            KeyCode::Enter => Some(AppAction::SearchConfirm),
            KeyCode::Esc => Some(AppAction::SearchCancel),
            KeyCode::Backspace => Some(AppAction::SearchBackspace),
            KeyCode::Char(c) => Some(AppAction::SearchChar(c)),
            _ => None,
        },

        InputMode::SignIn => match key.code {
            KeyCode::Enter => Some(AppAction::SignInConfirm),
            KeyCode::Esc => Some(AppAction::SignInCancel),
            KeyCode::Tab | KeyCode::BackTab => Some(AppAction::SignInNextField),
            KeyCode::Backspace => Some(AppAction::SignInBackspace),
            KeyCode::Char('t') if ctrl => Some(AppAction::SignInToggleMode),
            KeyCode::Char(c) if !ctrl => Some(AppAction::SignInChar(c)),
            _ => None,
        },

        InputMode::Compose => match key.code {
            KeyCode::Char('s') if ctrl => Some(AppAction::ComposeSubmit),
            KeyCode::Char('u') if ctrl => Some(AppAction::AttachImageStart),
            KeyCode::Esc => Some(AppAction::ComposeCancel),
            KeyCode::Tab => Some(AppAction::ComposeNextField),
            KeyCode::BackTab => Some(AppAction::ComposePrevField),
            KeyCode::Enter => Some(AppAction::ComposeNewline),
            KeyCode::Backspace => Some(AppAction::ComposeBackspace),
            KeyCode::Left => Some(AppAction::ComposeCursorLeft),
            KeyCode::Right => Some(AppAction::ComposeCursorRight),
            KeyCode::Home => Some(AppAction::ComposeCursorHome),
            KeyCode::End => Some(AppAction::ComposeCursorEnd),
            KeyCode::Char(c) if !ctrl => Some(AppAction::ComposeChar(c)),
            _ => None,
        },

        InputMode::UploadPath => match key.code {
            KeyCode::Enter => Some(AppAction::UploadConfirm),
            KeyCode::Esc => Some(AppAction::UploadCancel),
            KeyCode::Backspace => Some(AppAction::UploadBackspace),
            KeyCode::Char(c) if !ctrl => Some(AppAction::UploadChar(c)),
            _ => None,
        },

        InputMode::Normal => handle_normal_key(key, screen),
    }
}

fn handle_normal_key(key: KeyEvent, screen: Screen) -> Option<AppAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Esc, _) | (KeyCode::Backspace, _) | (KeyCode::Char('h'), _) => {
            match screen {
                Screen::Listing => None,
                Screen::Detail | Screen::Admin => Some(AppAction::Back),
            }
        }

        (KeyCode::Char('r'), _) => Some(AppAction::Refresh),
        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        (code, _) => match screen {
            Screen::Listing => match code {
                KeyCode::Enter | KeyCode::Char('l') => Some(AppAction::OpenArticle),
                KeyCode::Char('/') => Some(AppAction::StartSearch),
                KeyCode::Char('a') => Some(AppAction::OpenAdmin),
                _ => None,
            },
            Screen::Detail => None,
            Screen::Admin => match code {
                KeyCode::Enter | KeyCode::Char('l') => Some(AppAction::OpenArticle),
                KeyCode::Char('n') => Some(AppAction::NewArticle),
                KeyCode::Char('d') => Some(AppAction::DeleteArticle),
                KeyCode::Char('L') => Some(AppAction::SignOut),
                _ => None,
            },
        },
    }
}
