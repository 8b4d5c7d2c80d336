//! Single-line text input backed by `tui-input`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Rows a field occupies: label plus a bordered box.
pub const FIELD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Default)]
pub struct TextField {
    label: &'static str,
    placeholder: &'static str,
    required: bool,
    input: Input,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.input = Input::new(value.into());
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Apply an editing key. Returns `true` if the value changed.
    ///
    /// Keys that are not editing keys (Tab, Enter, Esc, ...) are left to the
    /// caller and return `false`.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let request = match key.code {
            KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
            KeyCode::Char('a') if ctrl => InputRequest::GoToStart,
            KeyCode::Char('e') if ctrl => InputRequest::GoToEnd,
            KeyCode::Char(_) if ctrl => return false,
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return false,
        };
        self.input
            .handle(request)
            .is_some_and(|changed| changed.value)
    }

    /// Draw the label line and the input box. The terminal cursor is placed
    /// in the box when `active`.
    pub fn render(&self, frame: &mut Frame, area: Rect, active: bool) {
        if area.height < 2 {
            return;
        }

        let mut label = vec![Span::styled(
            format!("  {}", self.label),
            theme::field_label(active),
        )];
        if self.required {
            label.push(Span::styled("*", Style::default().fg(theme::ERROR_RED)));
        }
        frame.render_widget(
            Paragraph::new(Line::from(label)),
            Rect::new(area.x, area.y, area.width, 1),
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::field_border(active));
        let box_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height - 1));
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        if self.input.value().is_empty() && !active {
            frame.render_widget(
                Paragraph::new(Span::styled(self.placeholder, theme::key_hint())),
                inner,
            );
            return;
        }

        let width = usize::from(inner.width.max(1) - 1);
        let scroll = self.input.visual_scroll(width);
        frame.render_widget(
            Paragraph::new(Span::styled(
                self.input.value(),
                Style::default().fg(theme::NEON_CYAN),
            ))
            .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
            inner,
        );

        if active {
            let offset = self.input.visual_cursor().saturating_sub(scroll);
            let x = inner
                .x
                .saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, text: &str) {
        for c in text.chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_and_editing() {
        let mut field = TextField::new("Name").required();
        type_str(&mut field, "Acme Outreaj");
        assert!(field.handle_key(key(KeyCode::Backspace)));
        type_str(&mut field, "ch");
        assert_eq!(field.value(), "Acme Outreach");

        assert!(!field.handle_key(key(KeyCode::Tab)));
        assert!(!field.handle_key(key(KeyCode::Left)));

        field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn set_value_and_clear() {
        let mut field = TextField::new("Description");
        field.set_value("hello");
        assert_eq!(field.value(), "hello");
        type_str(&mut field, "!");
        assert_eq!(field.value(), "hello!");
        field.clear();
        assert_eq!(field.value(), "");
    }
}
