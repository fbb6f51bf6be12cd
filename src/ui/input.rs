//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState};
use crate::models::Field;

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // A pending notice swallows everything until acknowledged
    if app.notice.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_notice();
        }
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    handle_form_input(app, key).await;
    Ok(false)
}

async fn handle_form_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.focus_next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.focus_prev();
        }
        KeyCode::Left | KeyCode::Right => {
            app.switch_tab();
        }
        KeyCode::Enter => {
            if app.focus == Field::Submit {
                app.submit().await;
            } else {
                app.focus_next();
            }
        }
        KeyCode::Backspace => {
            app.backspace();
        }
        KeyCode::Char(c) => {
            app.input_char(c);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crossterm::event::KeyModifiers;

    use crate::api::ApiClient;
    use crate::app::{AuthTab, MSG_FILL_ALL_FIELDS};
    use crate::auth::storage::MemoryStorage;
    use crate::config::Config;

    fn test_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).expect("client");
        App::with_parts(&Config::default(), api, Box::new(MemoryStorage::default()))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, press(KeyCode::Char(c))).await.expect("input");
        }
    }

    #[tokio::test]
    async fn test_typing_fills_login_form() {
        let mut app = test_app();
        type_str(&mut app, "ada@example.com").await;
        handle_input(&mut app, press(KeyCode::Enter)).await.expect("input");
        type_str(&mut app, "pw").await;

        assert_eq!(app.login_form.email, "ada@example.com");
        assert_eq!(app.login_form.password, "pw");
        assert_eq!(app.focus, Field::Password);
    }

    #[tokio::test]
    async fn test_q_is_text_not_quit() {
        let mut app = test_app();
        let quit = handle_input(&mut app, press(KeyCode::Char('q'))).await.expect("input");
        assert!(!quit);
        assert_eq!(app.login_form.email, "q");
    }

    #[tokio::test]
    async fn test_submit_empty_login_raises_notice_then_dismisses() {
        let mut app = test_app();
        handle_input(&mut app, press(KeyCode::BackTab)).await.expect("input");
        assert_eq!(app.focus, Field::Submit);
        handle_input(&mut app, press(KeyCode::Enter)).await.expect("input");

        let notice = app.notice.clone().expect("notice");
        assert_eq!(notice.message, MSG_FILL_ALL_FIELDS);

        // Typing is ignored while the notice is up
        handle_input(&mut app, press(KeyCode::Char('x'))).await.expect("input");
        assert!(app.notice.is_some());

        handle_input(&mut app, press(KeyCode::Enter)).await.expect("input");
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_arrows_switch_tabs() {
        let mut app = test_app();
        handle_input(&mut app, press(KeyCode::Right)).await.expect("input");
        assert_eq!(app.auth_tab, AuthTab::Register);
        assert_eq!(app.focus, Field::Name);
        handle_input(&mut app, press(KeyCode::Left)).await.expect("input");
        assert_eq!(app.auth_tab, AuthTab::Login);
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = test_app();
        handle_input(&mut app, press(KeyCode::Esc)).await.expect("input");
        assert_eq!(app.state, AppState::ConfirmingQuit);

        handle_input(&mut app, press(KeyCode::Char('n'))).await.expect("input");
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, press(KeyCode::Esc)).await.expect("input");
        let quit = handle_input(&mut app, press(KeyCode::Char('y'))).await.expect("input");
        assert!(quit);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_help_overlay_toggles() {
        let mut app = test_app();
        handle_input(&mut app, press(KeyCode::F(1))).await.expect("input");
        assert_eq!(app.state, AppState::ShowingHelp);
        type_str(&mut app, "abc").await;
        assert!(app.login_form.email.is_empty());
        handle_input(&mut app, press(KeyCode::Esc)).await.expect("input");
        assert_eq!(app.state, AppState::Normal);
    }
}
