//! Leads Scraper screen: start a LinkedIn people search and browse the
//! stored results in a filterable, paginated table.

use std::sync::Arc;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::{Throbber, ThrobberState};

use outreach_core::{
    LeadTable, LinkedinResult, PageLink, QueryState, SEARCH_URL_REQUIRED_MESSAGE,
    leads_from_results,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::text_field::FIELD_HEIGHT;
use crate::widgets::{TextField, hint_line};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeadsFocus {
    Url,
    Count,
    Filter,
    Table,
}

pub struct LeadsScreen {
    focused: bool,
    focus: LeadsFocus,
    url: TextField,
    count: TextField,
    filter: TextField,
    table: LeadTable,
    state: QueryState<Vec<LinkedinResult>>,
    searching: bool,
    throbber_state: ThrobberState,
    /// Row within the current page.
    selected_row: usize,
}

impl LeadsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            focus: LeadsFocus::Table,
            url: TextField::new("LinkedIn search URL")
                .required()
                .placeholder("https://www.linkedin.com/search/results/people/?keywords=..."),
            count: TextField::new("Results").placeholder("default"),
            filter: TextField::new("Filter leads")
                .placeholder("name, company, title or location"),
            table: LeadTable::default(),
            state: QueryState::default(),
            searching: false,
            throbber_state: ThrobberState::default(),
            selected_row: 0,
        }
    }

    fn editing(&self) -> bool {
        self.focus != LeadsFocus::Table
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            LeadsFocus::Url => LeadsFocus::Count,
            LeadsFocus::Count => LeadsFocus::Filter,
            LeadsFocus::Filter | LeadsFocus::Table => LeadsFocus::Url,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            LeadsFocus::Url | LeadsFocus::Table => LeadsFocus::Filter,
            LeadsFocus::Count => LeadsFocus::Url,
            LeadsFocus::Filter => LeadsFocus::Count,
        };
    }

    /// Validate the search inputs and build the request action.
    fn start_search(&mut self) -> Option<Action> {
        let url = self.url.value().trim().to_owned();
        if url.is_empty() {
            return Some(Action::Notify(Notification::warning(
                SEARCH_URL_REQUIRED_MESSAGE,
            )));
        }
        let count = match self.count.value().trim() {
            "" => None,
            raw => match raw.parse::<u32>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Some(Action::Notify(Notification::warning(
                        "Result count must be a positive number",
                    )));
                }
            },
        };

        self.searching = true;
        Some(Action::SearchLeads { url, count })
    }

    fn set_results(&mut self, results: &[LinkedinResult]) {
        self.table.set_leads(Arc::new(leads_from_results(results)));
        self.clamp_row();
    }

    fn clamp_row(&mut self) {
        let rows = self.table.page_rows().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.focus = LeadsFocus::Table;
                None
            }
            KeyCode::Tab => {
                self.focus_next();
                None
            }
            KeyCode::BackTab => {
                self.focus_prev();
                None
            }
            KeyCode::Enter => match self.focus {
                LeadsFocus::Url | LeadsFocus::Count => {
                    if self.searching {
                        None
                    } else {
                        self.start_search()
                    }
                }
                LeadsFocus::Filter | LeadsFocus::Table => {
                    self.focus = LeadsFocus::Table;
                    None
                }
            },
            _ => {
                match self.focus {
                    LeadsFocus::Url => {
                        self.url.handle_key(key);
                    }
                    LeadsFocus::Count => {
                        self.count.handle_key(key);
                    }
                    LeadsFocus::Filter => {
                        if self.filter.handle_key(key) {
                            self.table.set_search(self.filter.value());
                            self.selected_row = 0;
                        }
                    }
                    LeadsFocus::Table => {}
                }
                None
            }
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let rows = self.table.page_rows().len();
                if self.selected_row + 1 < rows {
                    self.selected_row += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                self.table.next_page();
                self.selected_row = 0;
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                self.table.prev_page();
                self.selected_row = 0;
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.table.set_page(1);
                self.selected_row = 0;
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.table.set_page(self.table.page_count());
                self.selected_row = 0;
            }
            KeyCode::Char('u') => self.focus = LeadsFocus::Url,
            KeyCode::Char('/') => self.focus = LeadsFocus::Filter,
            _ => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_search_panel(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" LinkedIn Search ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([Constraint::Length(FIELD_HEIGHT), Constraint::Length(1)])
            .split(inner);
        let cols = Layout::horizontal([Constraint::Min(20), Constraint::Length(14)]).split(rows[0]);
        self.url.render(frame, cols[0], self.focus == LeadsFocus::Url);
        self.count
            .render(frame, cols[1], self.focus == LeadsFocus::Count);

        let status = rows[1];
        if self.searching {
            let throbber = Throbber::default()
                .label(" Searching...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            frame.render_stateful_widget(throbber, status, &mut self.throbber_state.clone());
        } else if let Some(err) = &self.state.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  Failed to load leads: {err}"),
                    Style::default().fg(theme::ERROR_RED),
                )),
                status,
            );
        } else if let Some(newest) = self.newest_scrape() {
            frame.render_widget(
                Paragraph::new(Span::styled(format!("  Last scrape {newest}"), theme::key_hint())),
                status,
            );
        }
    }

    fn newest_scrape(&self) -> Option<String> {
        self.state
            .data
            .as_deref()?
            .iter()
            .map(|r| r.created_at)
            .max()
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " Leads ({}/{}) ",
            self.table.filtered_len(),
            self.table.total_len()
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused && self.focus == LeadsFocus::Table {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.state.is_pending {
            frame.render_widget(
                Paragraph::new(Span::styled("Loading leads...", theme::key_hint()))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }
        if let Some(message) = self.table.empty_message() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(message, theme::key_hint())),
                ])
                .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        let header = Row::new(["Name", "Job Title", "Company", "Location", "Profile"])
            .style(theme::table_header());
        let rows = self.table.page_rows().into_iter().map(|lead| {
            Row::new(vec![
                Cell::from(lead.full_name.as_str()),
                Cell::from(lead.job_title.as_str()),
                Cell::from(lead.company.as_str()),
                Cell::from(lead.location.as_str()),
                Cell::from(Span::styled(lead.profile_url.as_str(), theme::link())),
            ])
            .style(theme::table_row())
        });
        let widths = [
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(18),
            Constraint::Percentage(14),
            Constraint::Percentage(28),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        if self.focused && self.focus == LeadsFocus::Table {
            state.select(Some(self.selected_row));
        }
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn pagination_line(&self) -> Line<'static> {
        let edge = |label: &'static str, enabled: bool| {
            if enabled {
                Span::styled(label, theme::key_hint_key())
            } else {
                Span::styled(label, theme::key_hint())
            }
        };

        let mut spans = vec![edge("\u{2039} Prev ", self.table.has_prev())];
        for link in self.table.page_window() {
            spans.push(match link {
                PageLink::Page {
                    number,
                    current: true,
                } => Span::styled(
                    format!(" [{number}] "),
                    theme::tab_active().add_modifier(Modifier::BOLD),
                ),
                PageLink::Page { number, .. } => {
                    Span::styled(format!(" {number} "), theme::tab_inactive())
                }
                PageLink::Ellipsis => Span::styled(" \u{2026} ", theme::key_hint()),
            });
        }
        spans.push(edge(" Next \u{203a}", self.table.has_next()));
        Line::from(spans)
    }
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for LeadsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing() {
            return Ok(self.handle_text_key(key));
        }
        self.handle_table_key(key);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::LatestResultsUpdated(state) => {
                if let Some(results) = &state.data {
                    self.set_results(results);
                }
                self.state = state.clone();
            }
            Action::LeadSearchFinished(result) => {
                self.searching = false;
                if result.is_ok() {
                    self.url.clear();
                    self.count.clear();
                    self.focus = LeadsFocus::Table;
                }
            }
            Action::Tick => {
                if self.searching {
                    self.throbber_state.calc_next();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT + 3), // search panel
            Constraint::Length(FIELD_HEIGHT),     // filter
            Constraint::Min(5),                   // table
            Constraint::Length(1),                // pagination
            Constraint::Length(1),                // hints
        ])
        .split(area);

        self.render_search_panel(frame, layout[0]);
        self.filter
            .render(frame, layout[1], self.focus == LeadsFocus::Filter);
        self.render_table(frame, layout[2]);

        frame.render_widget(
            Paragraph::new(self.pagination_line()).alignment(Alignment::Center),
            layout[3],
        );

        let hints = if self.editing() {
            hint_line(&[
                ("Enter", "search"),
                ("Tab", "next field"),
                ("Esc", "back to table"),
            ])
        } else {
            hint_line(&[
                ("u", "search URL"),
                ("/", "filter"),
                ("j/k", "row"),
                ("h/l", "page"),
            ])
        };
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            layout[4],
        );
    }

    fn captures_input(&self) -> bool {
        self.editing()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "leads"
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use outreach_core::PersonCard;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(screen: &mut LeadsScreen, text: &str) {
        for c in text.chars() {
            let _ = screen.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    fn results(n: usize) -> QueryState<Vec<LinkedinResult>> {
        let people = (0..n)
            .map(|i| PersonCard {
                name: Some(format!("Person {i}")),
                country: Some(if i % 2 == 0 { "Germany" } else { "France" }.into()),
                ..PersonCard::default()
            })
            .collect();
        QueryState {
            data: Some(Arc::new(vec![LinkedinResult {
                id: "run-1".into(),
                url: "https://www.linkedin.com/search/results/people/?keywords=rust".into(),
                count: u32::try_from(n).unwrap_or(u32::MAX),
                people,
                created_at: Utc::now(),
            }])),
            ..QueryState::default()
        }
    }

    #[test]
    fn blank_url_warns_without_searching() {
        let mut screen = LeadsScreen::new();
        let _ = screen.handle_key_event(key(KeyCode::Char('u')));
        assert!(screen.captures_input());

        let action = screen.handle_key_event(key(KeyCode::Enter)).ok().flatten();
        let Some(Action::Notify(n)) = action else {
            panic!("expected a notice");
        };
        assert_eq!(n, Notification::warning("Search URL required"));
        assert!(!screen.searching);
    }

    #[test]
    fn enter_starts_a_search_with_optional_count() {
        let mut screen = LeadsScreen::new();
        let _ = screen.handle_key_event(key(KeyCode::Char('u')));
        type_str(&mut screen, "https://www.linkedin.com/search/results/people/?keywords=go");
        let _ = screen.handle_key_event(key(KeyCode::Tab));
        type_str(&mut screen, "25");

        let action = screen.handle_key_event(key(KeyCode::Enter)).ok().flatten();
        let Some(Action::SearchLeads { url, count }) = action else {
            panic!("expected a search");
        };
        assert_eq!(url, "https://www.linkedin.com/search/results/people/?keywords=go");
        assert_eq!(count, Some(25));
        assert!(screen.searching);

        let _ = screen.update(&Action::LeadSearchFinished(Ok(3)));
        assert!(!screen.searching);
        assert_eq!(screen.url.value(), "");
    }

    #[test]
    fn bad_count_is_rejected() {
        let mut screen = LeadsScreen::new();
        let _ = screen.handle_key_event(key(KeyCode::Char('u')));
        type_str(&mut screen, "https://www.linkedin.com/search/results/people/");
        let _ = screen.handle_key_event(key(KeyCode::Tab));
        type_str(&mut screen, "0");

        let action = screen.handle_key_event(key(KeyCode::Enter)).ok().flatten();
        assert!(matches!(action, Some(Action::Notify(_))));
        assert!(!screen.searching);
    }

    #[test]
    fn results_fill_the_table_and_filter_resets_page() {
        let mut screen = LeadsScreen::new();
        let _ = screen.update(&Action::LatestResultsUpdated(results(25)));
        assert_eq!(screen.table.total_len(), 25);
        assert_eq!(screen.table.page_count(), 3);

        let _ = screen.handle_key_event(key(KeyCode::Char('l')));
        let _ = screen.handle_key_event(key(KeyCode::Char('l')));
        assert_eq!(screen.table.page(), 3);

        let _ = screen.handle_key_event(key(KeyCode::Char('/')));
        type_str(&mut screen, "germany");
        assert_eq!(screen.table.page(), 1);
        assert_eq!(screen.table.filtered_len(), 13);

        let _ = screen.handle_key_event(key(KeyCode::Esc));
        assert!(!screen.captures_input());
    }

    #[test]
    fn failed_refetch_keeps_rows() {
        let mut screen = LeadsScreen::new();
        let _ = screen.update(&Action::LatestResultsUpdated(results(4)));

        let failed = QueryState {
            data: None,
            error: Some(outreach_core::CoreError::Timeout),
            ..QueryState::default()
        };
        let _ = screen.update(&Action::LatestResultsUpdated(failed));
        assert_eq!(screen.table.total_len(), 4);
    }
}
