//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use outreach_core::{Console, CoreError, QueryKey, Submission};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up.
const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    console: Console,
    active_screen: ScreenId,
    /// Previous screen for GoBack.
    previous_screen: Option<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Active toast with its display timestamp.
    notification: Option<(Notification, Instant)>,
    terminal_size: (u16, u16),
    /// Stops the data bridge on exit.
    data_cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(console: Console, start: ScreenId) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        Self {
            console,
            active_screen: start,
            previous_screen: None,
            screens,
            running: true,
            help_visible: false,
            notification: None,
            terminal_size: (0, 0),
            data_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
            debug!(screen = screen.id(), "screen mounted");
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop until quit.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));
        self.init_screens()?;

        {
            let console = self.console.clone();
            let cancel = self.data_cancel.clone();
            let tx = self.action_tx.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(console, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(screen = %self.active_screen, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        self.console.shutdown();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here unless
    /// the active screen is taking text input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = u8::try_from(c).map_or(0, |b| b - b'0');
                if let Some(target) = ScreenId::from_number(n) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }

            (KeyModifiers::NONE, KeyCode::Esc) => {
                return Ok(Some(if self.notification.is_some() {
                    Action::DismissNotification
                } else {
                    Action::GoBack
                }));
            }

            _ => {}
        }

        screen.handle_key_event(key)
    }

    /// Update app state for one action and propagate it to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(w, h) => self.terminal_size = (*w, *h),

            Action::SwitchScreen(target) => self.switch_screen(*target),

            Action::GoBack => {
                if let Some(prev) = self.previous_screen.take() {
                    self.action_tx.send(Action::SwitchScreen(prev))?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Render => {}

            Action::Notify(n) => {
                debug!(level = ?n.level, message = %n.message, "notification");
                self.notification = Some((n.clone(), Instant::now()));
            }

            Action::DismissNotification => self.notification = None,

            Action::Refresh => {
                self.console.invalidate(&QueryKey::campaigns());
                self.console
                    .invalidate(&QueryKey::latest_results(self.console.config().latest_limit));
                self.action_tx
                    .send(Action::Notify(Notification::info("Refreshing...")))?;
            }

            Action::SubmitCampaign(_)
            | Action::DeleteCampaign { .. }
            | Action::ToggleCampaignStatus(_)
            | Action::SearchLeads { .. }
            | Action::GenerateMessage(_)
            | Action::CopyToClipboard(_) => self.dispatch_command(action),

            other if other.is_broadcast() => {
                if matches!(other, Action::Tick) {
                    self.expire_notification();
                }
                let mut follow_ups = Vec::new();
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(other)? {
                        follow_ups.push(follow_up);
                    }
                }
                for follow_up in follow_ups {
                    self.action_tx.send(follow_up)?;
                }
            }

            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn switch_screen(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.previous_screen = Some(self.active_screen);
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
    }

    fn expire_notification(&mut self) {
        if self
            .notification
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
        {
            self.notification = None;
        }
    }

    // ── Command execution ─────────────────────────────────────────

    /// Run a command against the console on a background task. Results come
    /// back as actions.
    fn dispatch_command(&self, action: &Action) {
        let console = self.console.clone();
        match action.clone() {
            Action::SubmitCampaign(submission) => {
                let success = match &submission {
                    Submission::Create(dto) => format!("Created {}", dto.name),
                    Submission::Update { .. } => "Campaign updated".to_owned(),
                };
                self.execute(
                    async move { console.submit(&submission).await },
                    success,
                    |e| failure(e, "Failed to save campaign"),
                );
            }
            Action::DeleteCampaign { id, name } => {
                self.execute(
                    async move { console.delete_campaign(&id).await },
                    format!("Deleted {name}"),
                    |e| failure(e, "Failed to delete campaign"),
                );
            }
            Action::ToggleCampaignStatus(campaign) => {
                self.execute(
                    async move { console.toggle_status(&campaign).await },
                    "Campaign status updated successfully".to_owned(),
                    |_| Notification::error("Failed to update campaign status"),
                );
            }
            Action::SearchLeads { url, count } => {
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match console.search_leads(&url, count).await {
                        Ok(response) => {
                            let found = response.people.len();
                            let _ = tx.send(Action::LeadSearchFinished(Ok(found)));
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Leads retrieved: found {found} leads from the search results"
                            ))));
                        }
                        Err(e) => {
                            warn!(error = %e, "lead search failed");
                            let _ = tx.send(Action::LeadSearchFinished(Err(e.to_string())));
                            let _ = tx.send(Action::Notify(failure(&e, "Error retrieving leads")));
                        }
                    }
                });
            }
            Action::GenerateMessage(profile) => {
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match console.generate_message(&profile).await {
                        Ok(generated) => {
                            let _ = tx.send(Action::MessageGenerated(Ok(generated.message)));
                        }
                        Err(e) => {
                            warn!(error = %e, "message generation failed");
                            let _ = tx.send(Action::MessageGenerated(Err(e.to_string())));
                            let _ = tx.send(Action::Notify(failure(
                                &e,
                                "Failed to generate message",
                            )));
                        }
                    }
                });
            }
            Action::CopyToClipboard(text) => {
                let notification = match arboard::Clipboard::new()
                    .and_then(|mut clipboard| clipboard.set_text(text))
                {
                    Ok(()) => Notification::success("Copied to clipboard"),
                    Err(e) => {
                        warn!(error = %e, "clipboard write failed");
                        Notification::error(format!("Clipboard unavailable: {e}"))
                    }
                };
                let _ = self.action_tx.send(Action::Notify(notification));
            }
            _ => {}
        }
    }

    /// Spawn a mutation and toast its outcome.
    fn execute<T, Fut, F>(&self, task: Fut, success: String, on_error: F)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, CoreError>> + Send + 'static,
        F: FnOnce(&CoreError) -> Notification + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let notification = match task.await {
                Ok(_) => Notification::success(success),
                Err(e) => {
                    warn!(error = %e, "command failed");
                    on_error(&e)
                }
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let narrow = self.terminal_size.0 < 70;
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                let label = if narrow { id.label_short() } else { id.label() };
                Line::from(Span::styled(format!(" {} {label} ", id.number()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(ScreenId::ALL.iter().position(|&s| s == self.active_screen));

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let backend = match self.console.client().base_url() {
            Some(url) => Span::styled(
                format!("\u{25CF} {url}"),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            None => Span::styled(
                "\u{25CB} no backend configured",
                Style::default().fg(theme::ERROR_RED),
            ),
        };

        let route = self.active_screen.route().unwrap_or("?");
        let line = Line::from(vec![
            Span::raw(" "),
            backend,
            Span::styled(format!(" \u{2502} {route}"), theme::tab_inactive()),
            Span::styled(" \u{2502} ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    /// Toast in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len
            .saturating_add(6)
            .clamp(20, 70)
            .min(area.width.saturating_sub(2));
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SUCCESS_GREEN, "\u{2713}"),
            NotificationLevel::Error => (theme::ERROR_RED, "\u{2717}"),
            NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
            NotificationLevel::Info => (theme::NEON_CYAN, "\u{b7}"),
        };

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 60u16.min(area.width.saturating_sub(4));
        let help_height = 24u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            [
                Line::from(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(theme::NEON_CYAN),
                )),
                Line::from(Span::styled(
                    format!("  {}", "\u{2500}".repeat(title.len())),
                    theme::key_hint(),
                )),
            ]
        };
        let entry = |keys: &'static str, desc: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(desc, theme::key_hint()),
            ])
        };

        let mut help_text = vec![Line::from("")];
        help_text.extend(section("Navigation"));
        help_text.extend([
            entry("1-3", "Jump to screen"),
            entry("Tab", "Next screen"),
            entry("j/k \u{2191}/\u{2193}", "Move up/down"),
            entry("Esc", "Dismiss toast / back"),
            Line::from(""),
        ]);
        help_text.extend(section("Campaigns"));
        help_text.extend([
            entry("n", "New campaign"),
            entry("e", "Edit selected"),
            entry("d", "Delete selected"),
            entry("space", "Toggle active/inactive"),
            entry("r", "Refresh"),
            Line::from(""),
        ]);
        help_text.extend(section("Forms"));
        help_text.extend([
            entry("Ctrl+s", "Save campaign"),
            entry("Ctrl+g", "Generate message"),
            entry("Ctrl+y", "Copy message"),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ]);

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

/// Validation problems are the user's to fix; everything else is an error.
fn failure(error: &CoreError, context: &str) -> Notification {
    if error.is_validation() {
        Notification::warning(error.to_string())
    } else {
        Notification::error(format!("{context}: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validation_failures_are_warnings() {
        let n = failure(&CoreError::validation("Search URL required"), "Error retrieving leads");
        assert_eq!(n, Notification::warning("Search URL required"));

        let n = failure(&CoreError::Timeout, "Error retrieving leads");
        assert_eq!(n.level, NotificationLevel::Error);
        assert!(n.message.starts_with("Error retrieving leads: "));
    }
}
