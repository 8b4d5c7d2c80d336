//! Key hint line, e.g. "n new  e edit  d delete".

use ratatui::text::{Line, Span};

use crate::theme;

/// Build a hint line from `(key, description)` pairs.
pub fn hint_line<'a>(hints: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }
        spans.push(Span::styled(*key, theme::key_hint_key()));
        spans.push(Span::styled(format!(" {desc}"), theme::key_hint()));
    }
    Line::from(spans)
}
