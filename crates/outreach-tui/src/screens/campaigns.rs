//! Campaigns screen: card list of every campaign with inline actions.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use outreach_core::{Campaign, QueryState};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::campaign_form::CampaignFormDialog;
use crate::theme;
use crate::widgets::{hint_line, status_badge};

/// Rows per campaign card, borders included.
const CARD_HEIGHT: u16 = 6;
/// Lead URLs previewed on a card.
const LEAD_PREVIEW: usize = 2;
/// Placeholder cards drawn while the first fetch runs.
const SKELETON_CARDS: usize = 3;

pub struct CampaignsScreen {
    focused: bool,
    state: QueryState<Vec<Campaign>>,
    selected: usize,
    dialog: CampaignFormDialog,
}

impl CampaignsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            state: QueryState::default(),
            selected: 0,
            dialog: CampaignFormDialog::new(),
        }
    }

    fn campaigns(&self) -> &[Campaign] {
        self.state.data.as_deref().map(Vec::as_slice).unwrap_or_default()
    }

    fn selected_campaign(&self) -> Option<&Campaign> {
        self.campaigns().get(self.selected)
    }

    fn select_next(&mut self) {
        let len = self.campaigns().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.campaigns().len().saturating_sub(1));
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let campaigns = self.campaigns();
        let visible = usize::from((area.height / CARD_HEIGHT).max(1));
        let offset = (self.selected + 1).saturating_sub(visible);

        let mut y = area.y;
        for (i, campaign) in campaigns.iter().enumerate().skip(offset).take(visible) {
            let card = Rect::new(area.x, y, area.width, CARD_HEIGHT.min(area.bottom() - y));
            render_card(frame, card, campaign, self.focused && i == self.selected);
            y += CARD_HEIGHT;
        }
    }

    fn render_skeleton(frame: &mut Frame, area: Rect) {
        let mut y = area.y;
        for _ in 0..SKELETON_CARDS {
            if y + CARD_HEIGHT > area.bottom() {
                break;
            }
            let card = Rect::new(area.x, y, area.width, CARD_HEIGHT);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme::SKELETON));
            let inner = block.inner(card);
            frame.render_widget(block, card);

            let bar = |w: u16| {
                Line::from(Span::styled(
                    "\u{2591}".repeat(usize::from(w)),
                    Style::default().fg(theme::SKELETON),
                ))
            };
            let w = inner.width.saturating_sub(2);
            frame.render_widget(
                Paragraph::new(vec![bar(w / 3), bar(w * 2 / 3), bar(w / 2), bar(w / 4)]),
                inner,
            );
            y += CARD_HEIGHT;
        }
    }

    fn render_empty(frame: &mut Frame, area: Rect) {
        let height = 7u16.min(area.height);
        let width = 50u16.min(area.width);
        let panel = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height - height) / 2,
            width,
            height,
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("No campaigns yet", theme::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Press ", theme::key_hint()),
                    Span::styled("n", theme::key_hint_key()),
                    Span::styled(" to create your first campaign", theme::key_hint()),
                ]),
            ])
            .alignment(Alignment::Center),
            inner,
        );
    }

    fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ERROR_RED));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" \u{2717} ", Style::default().fg(theme::ERROR_RED)),
                Span::styled(
                    format!("Failed to load campaigns: {message}"),
                    Style::default().fg(theme::DIM_WHITE),
                ),
                Span::styled("   r retry", theme::key_hint()),
            ])),
            inner,
        );
    }
}

fn render_card(frame: &mut Frame, area: Rect, campaign: &Campaign, selected: bool) {
    let border = if selected {
        theme::border_focused()
    } else {
        theme::border_default()
    };
    let title_style = if selected {
        theme::table_selected()
    } else {
        theme::title_style()
    };
    let block = Block::default()
        .title(Span::styled(format!(" {} ", campaign.name), title_style))
        .title_top(Line::from(status_badge(campaign.status)).right_aligned())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let description = if campaign.description.is_empty() {
        Span::styled(" No description", theme::key_hint())
    } else {
        Span::styled(format!(" {}", campaign.description), theme::table_row())
    };

    let leads = match campaign.leads.len() {
        0 => Line::from(Span::styled(" No leads", theme::key_hint())),
        n => {
            let mut spans = vec![Span::styled(
                format!(" Leads ({n}): "),
                Style::default().fg(theme::DIM_WHITE),
            )];
            for (i, lead) in campaign.leads.iter().take(LEAD_PREVIEW).enumerate() {
                if i > 0 {
                    spans.push(Span::styled(", ", theme::key_hint()));
                }
                spans.push(Span::styled(lead.as_str(), theme::link()));
            }
            if n > LEAD_PREVIEW {
                spans.push(Span::styled(
                    format!(" +{} more", n - LEAD_PREVIEW),
                    theme::key_hint(),
                ));
            }
            Line::from(spans)
        }
    };

    let mut accounts = vec![Span::styled(
        " Accounts: ",
        Style::default().fg(theme::DIM_WHITE),
    )];
    if campaign.account_ids.is_empty() {
        accounts.push(Span::styled("none", theme::key_hint()));
    }
    for account in &campaign.account_ids {
        accounts.push(Span::styled(
            format!("[{account}]"),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        ));
        accounts.push(Span::raw(" "));
    }

    frame.render_widget(
        Paragraph::new(vec![Line::from(description), leads, Line::from(accounts)]),
        inner,
    );
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for CampaignsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.dialog.is_open() {
            return Ok(self.dialog.handle_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.campaigns().len().saturating_sub(1);
                None
            }
            KeyCode::Char('n') => {
                self.dialog.open_create();
                None
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let campaign = self.selected_campaign().cloned();
                match campaign.map(|c| self.dialog.open_edit(&c)) {
                    Some(Err(e)) => Some(Action::Notify(Notification::error(e.to_string()))),
                    _ => None,
                }
            }
            KeyCode::Char('d') => self.selected_campaign().and_then(|c| {
                c.id.clone().map(|id| Action::DeleteCampaign {
                    id,
                    name: c.name.clone(),
                })
            }),
            KeyCode::Char(' ') => self
                .selected_campaign()
                .map(|c| Action::ToggleCampaignStatus(c.clone())),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::CampaignsUpdated(state) = action {
            self.state = state.clone();
            self.clamp_selection();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let count = self.campaigns().len();
        let title = if self.state.is_fetching && self.state.data.is_some() {
            format!(" Campaigns ({count}) \u{21bb} ")
        } else {
            format!(" Campaigns ({count}) ")
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let banner_height = if self.state.error.is_some() { 3 } else { 0 };
        let layout = Layout::vertical([
            Constraint::Length(banner_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        if let Some(err) = &self.state.error {
            Self::render_error_banner(frame, layout[0], &err.to_string());
        }

        let body = layout[1];
        if self.state.is_pending {
            Self::render_skeleton(frame, body);
        } else if self.campaigns().is_empty() {
            if self.state.data.is_some() {
                Self::render_empty(frame, body);
            }
        } else {
            self.render_cards(frame, body);
        }

        frame.render_widget(
            Paragraph::new(hint_line(&[
                ("n", "new"),
                ("e", "edit"),
                ("d", "delete"),
                ("space", "toggle status"),
                ("r", "refresh"),
            ]))
            .alignment(Alignment::Center),
            layout[2],
        );

        if self.dialog.is_open() {
            self.dialog.render(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.dialog.is_open()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "campaigns"
    }
}
