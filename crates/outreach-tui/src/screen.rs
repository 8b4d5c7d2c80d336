//! Screen identifiers and route resolution.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Campaigns, // 1
    MessageGenerator, // 2
    Leads,            // 3
    /// Catch-all for unknown routes. Not in the tab bar.
    NotFound,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Campaigns, Self::MessageGenerator, Self::Leads];

    /// Resolve a path. Trailing slashes are ignored; anything unknown is
    /// `NotFound`.
    pub fn from_route(route: &str) -> Self {
        let path = route.trim();
        let path = path.split(['?', '#']).next().unwrap_or(path);
        match path.trim_end_matches('/') {
            "" => Self::Campaigns,
            "/message-generator" => Self::MessageGenerator,
            "/leads" => Self::Leads,
            _ => Self::NotFound,
        }
    }

    /// Canonical path of this screen.
    pub fn route(self) -> Option<&'static str> {
        match self {
            Self::Campaigns => Some("/"),
            Self::MessageGenerator => Some("/message-generator"),
            Self::Leads => Some("/leads"),
            Self::NotFound => None,
        }
    }

    /// Numeric key (1-3). NotFound has no key.
    pub fn number(self) -> u8 {
        match self {
            Self::Campaigns => 1,
            Self::MessageGenerator => 2,
            Self::Leads => 3,
            Self::NotFound => 0,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Campaigns),
            2 => Some(Self::MessageGenerator),
            3 => Some(Self::Leads),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Campaigns => "Campaigns",
            Self::MessageGenerator => "Message Generator",
            Self::Leads => "Leads Scraper",
            Self::NotFound => "Not Found",
        }
    }

    /// Compact label for narrow terminals (< 70 cols).
    pub fn label_short(self) -> &'static str {
        match self {
            Self::Campaigns => "Camp",
            Self::MessageGenerator => "Msg",
            Self::Leads => "Leads",
            Self::NotFound => "404",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn known_routes_resolve() {
        assert_eq!(ScreenId::from_route("/"), ScreenId::Campaigns);
        assert_eq!(ScreenId::from_route(""), ScreenId::Campaigns);
        assert_eq!(
            ScreenId::from_route("/message-generator"),
            ScreenId::MessageGenerator
        );
        assert_eq!(ScreenId::from_route("/leads/"), ScreenId::Leads);
        assert_eq!(ScreenId::from_route(" /leads?page=2 "), ScreenId::Leads);
    }

    #[test]
    fn unknown_routes_are_not_found() {
        for route in ["/campaigns", "/leads/42", "leads", "/LEADS"] {
            assert_eq!(ScreenId::from_route(route), ScreenId::NotFound, "{route}");
        }
        assert_eq!(ScreenId::NotFound.route(), None);
    }

    #[test]
    fn route_round_trips_for_tab_screens() {
        for id in ScreenId::ALL {
            let route = id.route().unwrap_or_default();
            assert_eq!(ScreenId::from_route(route), id);
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(4), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Leads.next(), ScreenId::Campaigns);
        assert_eq!(ScreenId::Campaigns.prev(), ScreenId::Leads);
        assert_eq!(ScreenId::NotFound.next(), ScreenId::MessageGenerator);
        assert_eq!(ScreenId::MessageGenerator.to_string(), "Message Generator");
    }
}
