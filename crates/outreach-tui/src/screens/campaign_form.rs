//! Create/edit campaign dialog, drawn over the campaigns list.
//!
//! Wraps the core `CampaignForm` state machine. Text fields mirror the
//! draft on every keystroke; the lead and account lists are edited through
//! an input box where Enter adds and Backspace on an empty box removes the
//! last entry.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use outreach_core::{Campaign, CampaignDraft, CampaignForm, CampaignStatus, CoreError};

use crate::action::{Action, Notification};
use crate::theme;
use crate::widgets::text_field::FIELD_HEIGHT;
use crate::widgets::{TextField, hint_line, status_badge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FormField {
    #[default]
    Name,
    Description,
    /// Only shown when editing.
    Status,
    Leads,
    Accounts,
}

impl FormField {
    fn order(editing: bool) -> &'static [FormField] {
        if editing {
            &[
                Self::Name,
                Self::Description,
                Self::Status,
                Self::Leads,
                Self::Accounts,
            ]
        } else {
            &[Self::Name, Self::Description, Self::Leads, Self::Accounts]
        }
    }
}

pub struct CampaignFormDialog {
    form: CampaignForm,
    focus: FormField,
    name: TextField,
    description: TextField,
    lead_input: TextField,
    account_input: TextField,
    error: Option<String>,
}

impl CampaignFormDialog {
    pub fn new() -> Self {
        Self {
            form: CampaignForm::Closed,
            focus: FormField::Name,
            name: TextField::new("Campaign Name")
                .required()
                .placeholder("Q3 founders outreach"),
            description: TextField::new("Description").placeholder("Who and why"),
            lead_input: TextField::new("Add lead").placeholder("https://linkedin.com/in/..."),
            account_input: TextField::new("Add account ID").placeholder("acc-123"),
            error: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.form.is_open()
    }

    pub fn open_create(&mut self) {
        self.form.open_create();
        self.reset_fields();
    }

    pub fn open_edit(&mut self, campaign: &Campaign) -> Result<(), CoreError> {
        self.form.open_edit(campaign)?;
        self.reset_fields();
        Ok(())
    }

    fn reset_fields(&mut self) {
        let draft = self.form.draft().cloned().unwrap_or_default();
        self.name.set_value(draft.name);
        self.description.set_value(draft.description);
        self.lead_input.clear();
        self.account_input.clear();
        self.focus = FormField::Name;
        self.error = None;
    }

    fn draft(&self) -> Option<&CampaignDraft> {
        self.form.draft()
    }

    fn focus_next(&mut self) {
        let order = FormField::order(self.form.is_editing());
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + 1) % order.len()];
    }

    fn focus_prev(&mut self) {
        let order = FormField::order(self.form.is_editing());
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(idx + order.len() - 1) % order.len()];
    }

    /// Validate and close. On failure the dialog stays open with its error.
    fn submit(&mut self) -> Option<Action> {
        match self.form.submit() {
            Ok(submission) => {
                self.error = None;
                Some(Action::SubmitCampaign(submission))
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Some(Action::Notify(Notification::warning(message)))
            }
        }
    }

    fn cycle_status(&mut self) {
        if let Some(draft) = self.form.draft_mut() {
            draft.status = draft.status.toggled();
        }
    }

    /// Enter on a list input adds the typed value to the draft.
    fn add_list_entry(&mut self) {
        let Some(draft) = self.form.draft_mut() else {
            return;
        };
        match self.focus {
            FormField::Leads => {
                draft.add_lead(self.lead_input.value());
                self.lead_input.clear();
            }
            FormField::Accounts => {
                draft.add_account_id(self.account_input.value());
                self.account_input.clear();
            }
            _ => {}
        }
    }

    /// Backspace on an empty list input drops the last entry.
    fn remove_last_entry(&mut self) {
        let Some(draft) = self.form.draft_mut() else {
            return;
        };
        match self.focus {
            FormField::Leads => {
                if let Some(last) = draft.leads.last().cloned() {
                    draft.remove_lead(&last);
                }
            }
            FormField::Accounts => {
                if let Some(last) = draft.account_ids.last().cloned() {
                    draft.remove_account_id(&last);
                }
            }
            _ => {}
        }
    }

    fn active_input_mut(&mut self) -> Option<&mut TextField> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::Leads => Some(&mut self.lead_input),
            FormField::Accounts => Some(&mut self.account_input),
            FormField::Status => None,
        }
    }

    fn sync_draft(&mut self) {
        let name = self.name.value().to_owned();
        let description = self.description.value().to_owned();
        if let Some(draft) = self.form.draft_mut() {
            draft.name = name;
            draft.description = description;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.is_open() {
            return None;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.form.cancel();
                return None;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('s')) => return self.submit(),
            (_, KeyCode::Tab) => {
                self.focus_next();
                return None;
            }
            (_, KeyCode::BackTab) => {
                self.focus_prev();
                return None;
            }
            _ => {}
        }

        match self.focus {
            FormField::Status => {
                if matches!(
                    key.code,
                    KeyCode::Char(' ' | 'h' | 'l') | KeyCode::Left | KeyCode::Right
                ) {
                    self.cycle_status();
                } else if key.code == KeyCode::Enter {
                    return self.submit();
                }
            }
            FormField::Leads | FormField::Accounts => match key.code {
                KeyCode::Enter => self.add_list_entry(),
                KeyCode::Backspace
                    if self
                        .active_input_mut()
                        .is_some_and(|input| input.value().is_empty()) =>
                {
                    self.remove_last_entry();
                }
                _ => {
                    if let Some(input) = self.active_input_mut() {
                        input.handle_key(key);
                    }
                }
            },
            FormField::Name | FormField::Description => {
                if key.code == KeyCode::Enter {
                    return self.submit();
                }
                let changed = self
                    .active_input_mut()
                    .is_some_and(|input| input.handle_key(key));
                if changed {
                    self.error = None;
                    self.sync_draft();
                }
            }
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(draft) = self.draft() else {
            return;
        };
        let editing = self.form.is_editing();

        let width = 72u16.min(area.width.saturating_sub(4));
        let height = (if editing { 33u16 } else { 29 }).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(format!(" {} ", self.form.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let mut constraints = vec![
            Constraint::Length(FIELD_HEIGHT), // name
            Constraint::Length(FIELD_HEIGHT), // description
        ];
        if editing {
            constraints.push(Constraint::Length(FIELD_HEIGHT)); // status
        }
        constraints.extend([
            Constraint::Length(FIELD_HEIGHT), // lead input
            Constraint::Length(4),            // lead chips
            Constraint::Length(FIELD_HEIGHT), // account input
            Constraint::Length(2),            // account chips
            Constraint::Min(0),
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ]);
        let fields = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        let chunks = Layout::vertical(constraints).split(fields);

        let mut i = 0;
        self.name
            .render(frame, chunks[i], self.focus == FormField::Name);
        i += 1;
        self.description
            .render(frame, chunks[i], self.focus == FormField::Description);
        i += 1;

        if editing {
            render_status_selector(
                frame,
                chunks[i],
                draft.status,
                self.focus == FormField::Status,
            );
            i += 1;
        }

        self.lead_input
            .render(frame, chunks[i], self.focus == FormField::Leads);
        i += 1;
        render_chips(frame, chunks[i], &draft.leads, "No leads added");
        i += 1;

        self.account_input
            .render(frame, chunks[i], self.focus == FormField::Accounts);
        i += 1;
        render_chips(frame, chunks[i], &draft.account_ids, "No accounts linked");
        i += 2;

        if let Some(err) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    err.as_str(),
                    Style::default().fg(theme::ERROR_RED),
                ))
                .alignment(Alignment::Center),
                chunks[i],
            );
        }
        i += 1;

        let submit_label = if editing {
            "save changes"
        } else {
            "create campaign"
        };
        frame.render_widget(
            Paragraph::new(hint_line(&[
                ("Tab", "next"),
                ("Enter", "add / submit"),
                ("Ctrl+s", submit_label),
                ("Esc", "cancel"),
            ]))
            .alignment(Alignment::Center),
            chunks[i],
        );
    }
}

fn render_status_selector(frame: &mut Frame, area: Rect, status: CampaignStatus, active: bool) {
    frame.render_widget(
        Paragraph::new(Span::styled("  Status", theme::field_label(active))),
        Rect::new(area.x, area.y, area.width, 1),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::field_border(active));
    let box_area = Rect::new(area.x, area.y + 1, area.width, 3.min(area.height.saturating_sub(1)));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let arrow_style = if active {
        Style::default().fg(theme::ELECTRIC_PURPLE)
    } else {
        Style::default().fg(theme::BORDER_GRAY)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" \u{25C2}", arrow_style),
            status_badge(status),
            Span::styled("\u{25B8}", arrow_style),
        ])),
        inner,
    );
}

fn render_chips(frame: &mut Frame, area: Rect, values: &[String], empty: &str) {
    let line = if values.is_empty() {
        Line::from(Span::styled(format!("  {empty}"), theme::key_hint()))
    } else {
        let mut spans = vec![Span::raw("  ")];
        for value in values {
            spans.push(Span::styled(
                format!("[{value}]"),
                Style::default()
                    .fg(theme::NEON_CYAN)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), area);
}
