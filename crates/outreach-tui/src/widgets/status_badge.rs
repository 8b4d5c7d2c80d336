//! Campaign status badge: ●/○/✗ with color mapping.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use outreach_core::CampaignStatus;

use crate::theme;

/// Styled badge for a campaign's status.
pub fn status_badge(status: CampaignStatus) -> Span<'static> {
    let (symbol, color) = match status {
        CampaignStatus::Active => ("●", theme::SUCCESS_GREEN),
        CampaignStatus::Inactive => ("○", theme::BORDER_GRAY),
        CampaignStatus::Deleted => ("✗", theme::ERROR_RED),
    };
    Span::styled(
        format!(" {symbol} {status} "),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
