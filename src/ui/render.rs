use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, AuthTab, NoticeKind, ProfileTab, View};
use crate::models::{Field, Form};
use crate::utils::{field_display, mask, truncate};

use super::styles;

/// Width of the value box for every form field
const FIELD_WIDTH: usize = 28;

/// Width of the form card
const CARD_WIDTH: u16 = 58;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }

    // Notices sit above everything else until acknowledged
    if app.notice.is_some() {
        render_notice_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view() {
        View::Unauthenticated => "  authdesk".to_string(),
        View::Authenticated => format!("  Welcome, {}", truncate(app.profile.display_name(), 40)),
    };
    let help_hint = "[F1] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.chars().count() + help_hint.len() + 4),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = match app.view() {
        View::Unauthenticated => vec![
            (AuthTab::Login.title(), app.auth_tab == AuthTab::Login),
            (AuthTab::Register.title(), app.auth_tab == AuthTab::Register),
        ],
        View::Authenticated => vec![
            (ProfileTab::Info.title(), app.profile_tab == ProfileTab::Info),
            (ProfileTab::Logout.title(), app.profile_tab == ProfileTab::Logout),
        ],
    };

    let mut spans = vec![Span::raw(" ")];
    for (i, (label, selected)) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(*label, styles::tab_style(*selected)));
    }
    spans.push(Span::styled("   ←/→ switch", styles::muted_style()));

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match (app.view(), app.profile_tab) {
        (View::Authenticated, ProfileTab::Logout) => render_logout_card(frame, app, area),
        _ => {
            if let Some(form) = app.active_form() {
                render_form_card(frame, app, form, area);
            }
        }
    }
}

/// Field label for the visible form
fn field_label(view: View, field: Field) -> &'static str {
    match (view, field) {
        (_, Field::Name) => "Name",
        (_, Field::Email) => "Email",
        (View::Unauthenticated, Field::Password) => "Password",
        (View::Unauthenticated, Field::Confirmation) => "Confirm Password",
        (View::Authenticated, Field::Password) => "New Password (optional)",
        (View::Authenticated, Field::Confirmation) => "Confirm New Password",
        (_, Field::Submit) => "",
    }
}

fn submit_label(app: &App) -> &'static str {
    match (app.view(), app.auth_tab, app.profile_tab) {
        (View::Unauthenticated, AuthTab::Login, _) => "Login",
        (View::Unauthenticated, AuthTab::Register, _) => "Register",
        (View::Authenticated, _, ProfileTab::Info) => "Update Profile",
        (View::Authenticated, _, ProfileTab::Logout) => "Logout",
    }
}

fn button_line(label: &str, focused: bool, style: Style) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("   ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn render_form_card(frame: &mut Frame, app: &App, form: &dyn Form, area: Rect) {
    let view = app.view();
    let mut lines = vec![];

    let heading = match view {
        View::Unauthenticated => app.auth_tab.title(),
        View::Authenticated => "Update Profile",
    };
    lines.push(Line::from(Span::styled(format!(" {}", heading), styles::highlight_style())));
    lines.push(Line::from(""));

    for &field in form.fields() {
        if field == Field::Submit {
            continue;
        }
        let focused = app.focus == field;
        let raw = form.value(field).unwrap_or_default();
        let shown = match field {
            Field::Password | Field::Confirmation => mask(raw),
            _ => raw.to_string(),
        };
        let value_style = if focused {
            styles::selected_style()
        } else {
            styles::input_style()
        };
        let cursor = if focused { "▌" } else { " " };

        lines.push(Line::from(Span::styled(
            format!("   {}", field_label(view, field)),
            styles::muted_style(),
        )));
        lines.push(Line::from(vec![
            Span::styled("   [", styles::muted_style()),
            Span::styled(
                format!("{}{}", field_display(&shown, FIELD_WIDTH), cursor),
                value_style,
            ),
            Span::styled("]", styles::muted_style()),
        ]));
    }

    lines.push(Line::from(""));
    let submit_focused = app.focus == Field::Submit;
    let button_style = if submit_focused {
        styles::selected_style()
    } else {
        styles::input_style()
    };
    lines.push(button_line(submit_label(app), submit_focused, button_style));

    let height = lines.len() as u16 + 2;
    let card = centered_rect_fixed(CARD_WIDTH, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.notice.is_none()));

    frame.render_widget(Paragraph::new(lines).block(block), card);
}

fn render_logout_card(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(" Logout", styles::highlight_style())),
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to logout?",
            styles::input_style(),
        )),
        Line::from(""),
        button_line(
            submit_label(app),
            app.focus == Field::Submit,
            styles::danger_button_style(app.focus == Field::Submit),
        ),
    ];

    let height = lines.len() as u16 + 2;
    let card = centered_rect_fixed(CARD_WIDTH, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.notice.is_none()));

    frame.render_widget(Paragraph::new(lines).block(block), card);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.view() {
        View::Authenticated => format!(" Signed in as {} ", app.profile.email),
        View::Unauthenticated => " Not signed in ".to_string(),
    };
    let right_text = format!(" {} ", app.api.base_url());

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let Some(ref notice) = app.notice else {
        return;
    };

    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let title_style = match notice.kind {
        NoticeKind::Success => styles::success_style(),
        NoticeKind::Error => styles::error_style(),
    };

    let lines = vec![
        Line::from(Span::styled(format!(" {}", notice.title()), title_style)),
        Line::from(""),
        Line::from(Span::styled(format!(" {}", notice.message), styles::input_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Press ", styles::muted_style()),
            Span::styled("Enter", styles::help_key_style()),
            Span::styled(" to continue", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", k), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(" authdesk", styles::title_style())),
        Line::from(Span::styled(format!(" version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Keys", styles::highlight_style())),
        key("Tab / ↓", "Next field"),
        key("S-Tab / ↑", "Previous field"),
        key("← / →", "Switch tab"),
        key("Enter", "Next field, or press the button"),
        key("Backspace", "Delete a character"),
        key("Esc", "Quit"),
        key("Ctrl+C", "Quit immediately"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use ratatui::{backend::TestBackend, Terminal};

    use crate::api::ApiClient;
    use crate::app::Notice;
    use crate::auth::storage::MemoryStorage;
    use crate::config::Config;
    use crate::models::UserProfile;

    fn test_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).expect("client");
        App::with_parts(&Config::default(), api, Box::new(MemoryStorage::default()))
    }

    fn signed_in(mut app: App) -> App {
        app.session.store_token("t1").expect("store token");
        app.session.mark_authenticated();
        app.profile = UserProfile {
            name: "Ada".into(),
            email: "ada@example.com".into(),
        };
        app.reset_focus();
        app
    }

    /// Draw one frame and flatten the buffer into text
    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).expect("terminal");
        terminal.draw(|f| render(f, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_signed_out_shows_auth_tabs() {
        let mut app = test_app();
        app.login_form.password = "hunter2".into();
        let text = screen(&app);

        assert!(text.contains("Login | Register"));
        assert!(text.contains("Not signed in"));
        assert!(text.contains("*******"));
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("Welcome"));
        assert!(!text.contains("Profile Info"));
    }

    #[test]
    fn test_signed_in_shows_profile_tabs() {
        let app = signed_in(test_app());
        let text = screen(&app);

        assert!(text.contains("Welcome, Ada"));
        assert!(text.contains("Profile Info | Logout"));
        assert!(text.contains("Signed in as ada@example.com"));
        assert!(text.contains("New Password (optional)"));
        assert!(!text.contains("Login | Register"));
    }

    #[test]
    fn test_logout_tab_shows_confirmation() {
        let mut app = signed_in(test_app());
        app.switch_tab();
        let text = screen(&app);

        assert!(text.contains("Are you sure you want to logout?"));
        assert!(!text.contains("Update Profile"));
    }

    #[test]
    fn test_notice_overlay_shows_title_and_message() {
        let mut app = test_app();
        app.notice = Some(Notice {
            kind: NoticeKind::Error,
            message: "Passwords do not match".into(),
        });
        let text = screen(&app);

        assert!(text.contains("Error"));
        assert!(text.contains("Passwords do not match"));
        assert!(text.contains("to continue"));
    }
}
