/// Replace every character with `*` for password fields
pub fn mask(s: &str) -> String {
    "*".repeat(s.chars().count())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Fit an input value into a box `width` chars wide, keeping the end
/// (where the cursor is) visible and padding short values.
pub fn field_display(value: &str, width: usize) -> String {
    let len = value.chars().count();
    let visible: String = if len > width {
        value.chars().skip(len - width).collect()
    } else {
        value.to_string()
    };
    format!("{:<width$}", visible, width = width)
}
