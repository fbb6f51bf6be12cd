use ratatui::style::{Color, Modifier, Style};

// Night palette with a violet accent
pub const VIOLET: Color = Color::Rgb(139, 92, 246);
pub const LAVENDER: Color = Color::Rgb(196, 181, 253);
pub const DANGER: Color = Color::Rgb(239, 68, 68);
pub const OK: Color = Color::Rgb(74, 222, 128);
pub const DIM: Color = Color::Rgb(113, 113, 140);
pub const TEXT: Color = Color::Rgb(229, 231, 235);
pub const SURFACE: Color = Color::Rgb(26, 26, 46);
pub const BACKDROP: Color = Color::Rgb(15, 15, 35);

pub fn title_style() -> Style {
    Style::default().fg(VIOLET).add_modifier(Modifier::BOLD)
}

/// Focused input box or button
pub fn selected_style() -> Style {
    Style::default().bg(SURFACE).fg(LAVENDER).add_modifier(Modifier::BOLD)
}

pub fn input_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(DIM)
}

/// Card headings and prompts
pub fn highlight_style() -> Style {
    Style::default().fg(LAVENDER).add_modifier(Modifier::BOLD)
}

pub fn success_style() -> Style {
    Style::default().fg(OK).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(DANGER).add_modifier(Modifier::BOLD)
}

pub fn tab_style(selected: bool) -> Style {
    match selected {
        true => Style::default()
            .fg(VIOLET)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        false => muted_style(),
    }
}

/// Card borders dim while a notice covers them
pub fn border_style(active: bool) -> Style {
    Style::default().fg(if active { VIOLET } else { DIM })
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BACKDROP).fg(TEXT)
}

pub fn help_key_style() -> Style {
    Style::default().fg(VIOLET).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    input_style()
}

pub fn danger_button_style(focused: bool) -> Style {
    match focused {
        true => Style::default().bg(DANGER).fg(TEXT).add_modifier(Modifier::BOLD),
        false => Style::default().fg(DANGER),
    }
}
