//! Catch-all screen for unknown routes.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::component::Component;
use crate::theme;

pub struct NotFoundScreen;

impl Component for NotFoundScreen {
    fn render(&self, frame: &mut Frame, area: Rect) {
        let top = area.height.saturating_sub(5) / 2;
        let mut lines = vec![Line::from(""); usize::from(top)];
        lines.extend([
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(theme::ELECTRIC_PURPLE)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled("Oops! Page not found", theme::title_style())),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", theme::key_hint()),
                Span::styled("1", theme::key_hint_key()),
                Span::styled(" to return to Campaigns", theme::key_hint()),
            ]),
        ]);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn id(&self) -> &'static str {
        "not-found"
    }
}
