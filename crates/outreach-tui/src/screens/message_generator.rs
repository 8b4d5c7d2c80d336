//! Message Generator screen: draft a personalized outreach message from a
//! LinkedIn profile.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use outreach_core::{LinkedInProfile, REQUIRED_FIELDS_MESSAGE};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field::FIELD_HEIGHT;
use crate::widgets::{TextField, hint_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Field {
    #[default]
    Name,
    JobTitle,
    Company,
    Location,
    Summary,
    Message,
}

impl Field {
    const ORDER: [Field; 6] = [
        Self::Name,
        Self::JobTitle,
        Self::Company,
        Self::Location,
        Self::Summary,
        Self::Message,
    ];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

pub struct MessageGeneratorScreen {
    focused: bool,
    /// Keys go to the form only while editing; otherwise global shortcuts work.
    editing: bool,
    field: Field,
    name: TextField,
    job_title: TextField,
    company: TextField,
    location: TextField,
    summary: TextField,
    message: String,
    generating: bool,
    throbber_state: ThrobberState,
}

impl MessageGeneratorScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            editing: false,
            field: Field::Name,
            name: TextField::new("Name").required().placeholder("John Doe"),
            job_title: TextField::new("Job Title")
                .required()
                .placeholder("Software Engineer"),
            company: TextField::new("Company").required().placeholder("TechCorp"),
            location: TextField::new("Location")
                .required()
                .placeholder("San Francisco, CA"),
            summary: TextField::new("Profile Summary").placeholder("Experienced in AI & ML..."),
            message: String::new(),
            generating: false,
            throbber_state: ThrobberState::default(),
        }
    }

    fn profile(&self) -> LinkedInProfile {
        let summary = self.summary.value().trim();
        LinkedInProfile {
            name: self.name.value().trim().to_owned(),
            job_title: self.job_title.value().trim().to_owned(),
            company: self.company.value().trim().to_owned(),
            location: self.location.value().trim().to_owned(),
            summary: (!summary.is_empty()).then(|| summary.to_owned()),
        }
    }

    fn generate(&mut self) -> Option<Action> {
        if self.generating {
            return None;
        }
        let profile = self.profile();
        if !profile.missing_required_fields().is_empty() {
            return Some(Action::Notify(Notification::warning(REQUIRED_FIELDS_MESSAGE)));
        }
        self.generating = true;
        Some(Action::GenerateMessage(profile))
    }

    fn copy(&self) -> Option<Action> {
        if self.message.is_empty() {
            return None;
        }
        Some(Action::CopyToClipboard(self.message.clone()))
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut TextField> {
        match field {
            Field::Name => Some(&mut self.name),
            Field::JobTitle => Some(&mut self.job_title),
            Field::Company => Some(&mut self.company),
            Field::Location => Some(&mut self.location),
            Field::Summary => Some(&mut self.summary),
            Field::Message => None,
        }
    }

    fn edit_message(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.message.push('\n'),
            KeyCode::Backspace => {
                self.message.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.message.push(c);
            }
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn active(&self, field: Field) -> bool {
        self.editing && self.field == field
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" LinkedIn Message Generator ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused && self.editing && self.field != Field::Message {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(1),
        ])
        .split(inner);
        let halves = |area: Rect| {
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .spacing(1)
                .split(area)
        };

        let top = halves(rows[0]);
        self.name.render(frame, top[0], self.active(Field::Name));
        self.job_title
            .render(frame, top[1], self.active(Field::JobTitle));
        let middle = halves(rows[1]);
        self.company
            .render(frame, middle[0], self.active(Field::Company));
        self.location
            .render(frame, middle[1], self.active(Field::Location));
        self.summary
            .render(frame, rows[2], self.active(Field::Summary));

        if self.generating {
            let throbber = Throbber::default()
                .label(" Generating...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, rows[3], &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        "[ Generate Message ]",
                        Style::default()
                            .fg(theme::ELECTRIC_PURPLE)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  Ctrl+g", theme::key_hint_key()),
                ]))
                .alignment(Alignment::Center),
                rows[3],
            );
        }
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Generated Message ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.active(Field::Message) {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let body = if self.message.is_empty() {
            Paragraph::new(Span::styled(
                "Fill in the profile and generate a message.",
                theme::key_hint(),
            ))
        } else {
            let mut text = self.message.clone();
            if self.active(Field::Message) {
                text.push('\u{2588}');
            }
            Paragraph::new(text).style(Style::default().fg(theme::DIM_WHITE))
        };
        frame.render_widget(body.wrap(Wrap { trim: false }), inner);
    }
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for MessageGeneratorScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('y') {
            return Ok(self.copy());
        }
        if ctrl && key.code == KeyCode::Char('g') {
            return Ok(self.generate());
        }

        if !self.editing {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('i')) {
                self.editing = true;
            }
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Esc => {
                self.editing = false;
                None
            }
            KeyCode::Tab => {
                self.field = self.field.next();
                None
            }
            KeyCode::BackTab => {
                self.field = self.field.prev();
                None
            }
            _ if self.field == Field::Message => {
                self.edit_message(key);
                None
            }
            KeyCode::Enter => self.generate(),
            _ => {
                if let Some(input) = self.input_mut(self.field) {
                    input.handle_key(key);
                }
                None
            }
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::MessageGenerated(result) => {
                self.generating = false;
                if let Ok(message) = result {
                    message.clone_into(&mut self.message);
                    self.field = Field::Message;
                }
            }
            Action::Tick => {
                if self.generating {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT * 3 + 3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_form(frame, layout[0]);
        self.render_message(frame, layout[1]);

        let hints = if self.editing {
            hint_line(&[
                ("Tab", "next field"),
                ("Enter", "generate"),
                ("Ctrl+y", "copy"),
                ("Esc", "done"),
            ])
        } else {
            hint_line(&[("i", "edit"), ("Ctrl+g", "generate"), ("Ctrl+y", "copy")])
        };
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            layout[2],
        );
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "message-generator"
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn fill(screen: &mut MessageGeneratorScreen, values: &[&str]) {
        let _ = screen.handle_key_event(key(KeyCode::Char('i')));
        for value in values {
            for c in value.chars() {
                let _ = screen.handle_key_event(key(KeyCode::Char(c)));
            }
            let _ = screen.handle_key_event(key(KeyCode::Tab));
        }
    }

    #[test]
    fn incomplete_profile_only_warns() {
        let mut screen = MessageGeneratorScreen::new();
        fill(&mut screen, &["Jane", "CTO", "", "Berlin"]);

        let action = screen.handle_key_event(ctrl('g')).ok().flatten();
        let Some(Action::Notify(n)) = action else {
            panic!("expected a notice");
        };
        assert_eq!(n.message, "Please fill in the required fields");
        assert!(!screen.generating);
    }

    #[test]
    fn complete_profile_is_sent() {
        let mut screen = MessageGeneratorScreen::new();
        fill(&mut screen, &["Jane", "CTO", "TechCorp", "Berlin"]);

        let action = screen.handle_key_event(ctrl('g')).ok().flatten();
        let Some(Action::GenerateMessage(profile)) = action else {
            panic!("expected a request");
        };
        assert_eq!(
            profile,
            LinkedInProfile {
                name: "Jane".into(),
                job_title: "CTO".into(),
                company: "TechCorp".into(),
                location: "Berlin".into(),
                summary: None,
            }
        );
        assert!(screen.generating);

        // A second request waits for the first.
        assert!(screen.handle_key_event(ctrl('g')).ok().flatten().is_none());
    }

    #[test]
    fn generated_message_is_editable_and_copyable() {
        let mut screen = MessageGeneratorScreen::new();
        assert!(screen.handle_key_event(ctrl('y')).ok().flatten().is_none());

        let _ = screen.update(&Action::MessageGenerated(Ok("Hi Jane".into())));
        screen.editing = true;
        let _ = screen.handle_key_event(key(KeyCode::Char('!')));

        let action = screen.handle_key_event(ctrl('y')).ok().flatten();
        let Some(Action::CopyToClipboard(text)) = action else {
            panic!("expected a copy");
        };
        assert_eq!(text, "Hi Jane!");
    }

    #[test]
    fn failure_keeps_the_form() {
        let mut screen = MessageGeneratorScreen::new();
        fill(&mut screen, &["Jane", "CTO", "TechCorp", "Berlin"]);
        let _ = screen.handle_key_event(ctrl('g'));

        let _ = screen.update(&Action::MessageGenerated(Err("boom".into())));
        assert!(!screen.generating);
        assert_eq!(screen.name.value(), "Jane");
        assert!(screen.message.is_empty());
    }
}
