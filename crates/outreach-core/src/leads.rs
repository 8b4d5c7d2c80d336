// ── Lead table: filter and pagination ──
//
// Pure view state over an immutable lead list. The search term and the
// 1-indexed current page are the only local state.

use std::sync::Arc;

use outreach_api::{LeadProfile, LinkedinResult};

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Page numbers shown in the pagination strip.
pub const PAGE_WINDOW: usize = 5;

/// One item of the pagination strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

#[derive(Debug, Clone)]
pub struct LeadTable {
    leads: Arc<Vec<LeadProfile>>,
    search: String,
    page: usize,
    /// Indices into `leads` matching `search`, in order.
    matches: Vec<usize>,
}

impl Default for LeadTable {
    fn default() -> Self {
        Self::new(Arc::new(Vec::new()))
    }
}

impl LeadTable {
    pub fn new(leads: Arc<Vec<LeadProfile>>) -> Self {
        let mut table = Self {
            leads,
            search: String::new(),
            page: 1,
            matches: Vec::new(),
        };
        table.refilter();
        table
    }

    /// Swap in a new lead list, keeping the search term. The current page is
    /// clamped to the new page count.
    pub fn set_leads(&mut self, leads: Arc<Vec<LeadProfile>>) {
        self.leads = leads;
        self.refilter();
        self.page = self.clamp_page(self.page);
    }

    pub fn leads(&self) -> &Arc<Vec<LeadProfile>> {
        &self.leads
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Change the search term. A different term returns to page 1.
    pub fn set_search(&mut self, term: &str) {
        if self.search == term {
            return;
        }
        term.clone_into(&mut self.search);
        self.refilter();
        self.page = 1;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Jump to `page`, clamped to `1..=max(page_count, 1)`.
    pub fn set_page(&mut self, page: usize) {
        self.page = self.clamp_page(page);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    /// Leads matching the search term, in list order.
    pub fn filtered(&self) -> impl Iterator<Item = &LeadProfile> {
        self.matches.iter().filter_map(|&i| self.leads.get(i))
    }

    pub fn filtered_len(&self) -> usize {
        self.matches.len()
    }

    pub fn total_len(&self) -> usize {
        self.leads.len()
    }

    pub fn page_count(&self) -> usize {
        self.matches.len().div_ceil(PAGE_SIZE)
    }

    /// Rows of the current page.
    pub fn page_rows(&self) -> Vec<&LeadProfile> {
        self.filtered()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    /// Pagination strip: up to five page numbers around the current page,
    /// then an ellipsis and the last page when it is out of view. Empty
    /// when everything fits on one page.
    pub fn page_window(&self) -> Vec<PageLink> {
        let total = self.page_count();
        if total <= 1 {
            return Vec::new();
        }

        let first = if total <= PAGE_WINDOW || self.page <= 3 {
            1
        } else if self.page >= total - 2 {
            total + 1 - PAGE_WINDOW
        } else {
            self.page - 2
        };
        let last = (first + PAGE_WINDOW - 1).min(total);

        let mut links: Vec<PageLink> = (first..=last)
            .map(|number| PageLink::Page {
                number,
                current: number == self.page,
            })
            .collect();

        if total > PAGE_WINDOW && self.page + 2 < total {
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page {
                number: total,
                current: false,
            });
        }
        links
    }

    /// Placeholder text when there are no rows to show.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.matches.is_empty() {
            Some(if self.search.is_empty() {
                "No leads found"
            } else {
                "No matches found"
            })
        } else {
            None
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn refilter(&mut self) {
        let needle = self.search.to_lowercase();
        self.matches = self
            .leads
            .iter()
            .enumerate()
            .filter(|(_, lead)| matches_term(lead, &needle))
            .map(|(i, _)| i)
            .collect();
    }

    fn clamp_page(&self, page: usize) -> usize {
        page.clamp(1, self.page_count().max(1))
    }
}

/// Flatten stored scrape runs into lead rows, newest run first.
pub fn leads_from_results(results: &[LinkedinResult]) -> Vec<LeadProfile> {
    let mut runs: Vec<&LinkedinResult> = results.iter().collect();
    runs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    runs.into_iter()
        .flat_map(|run| {
            run.people
                .iter()
                .enumerate()
                .filter_map(move |(i, card)| LeadProfile::from_person_card(&run.id, i, card))
        })
        .collect()
}

/// Case-insensitive substring match on name, company, job title or location.
/// `needle` must already be lowercase.
fn matches_term(lead: &LeadProfile, needle: &str) -> bool {
    needle.is_empty()
        || [&lead.full_name, &lead.company, &lead.job_title, &lead.location]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}
