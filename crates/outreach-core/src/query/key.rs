use std::fmt;

/// Which read a [`QueryKey`] addresses. Each kind lives in its own cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// The full campaign list.
    Campaigns,
    /// One campaign by id.
    Campaign,
    /// The newest scrape runs, by limit.
    LatestResults,
}

impl QueryKind {
    /// Backend path the read goes to, without parameters.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Campaigns | Self::Campaign => "campaigns",
            Self::LatestResults => "linkedin/latest",
        }
    }
}

/// Address of one cached read: a kind plus its parameters.
///
/// Keys compare by exact equality; there is no prefix matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: QueryKind,
    params: Vec<String>,
}

impl QueryKey {
    /// The full campaign list.
    pub fn campaigns() -> Self {
        Self {
            kind: QueryKind::Campaigns,
            params: Vec::new(),
        }
    }

    /// One campaign by id.
    pub fn campaign(id: &str) -> Self {
        Self {
            kind: QueryKind::Campaign,
            params: vec![id.to_owned()],
        }
    }

    /// The newest `limit` scrape runs.
    pub fn latest_results(limit: u32) -> Self {
        Self {
            kind: QueryKind::LatestResults,
            params: vec![limit.to_string()],
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn operation(&self) -> &'static str {
        self.kind.operation()
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn is_latest_results(&self) -> bool {
        self.kind == QueryKind::LatestResults
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation())?;
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}
