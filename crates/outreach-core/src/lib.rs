//! Data layer between `outreach-api` and the terminal console.
//!
//! This crate owns everything the views need besides drawing:
//!
//! - **[`Console`]**: Facade over the backend client. Reads go through
//!   per-type [`QueryCache`]s, so repeated reads inside the stale window are
//!   free and concurrent reads of one key share a single request. Mutations
//!   call the backend and then invalidate the keys they affect; every
//!   invalidation is broadcast so a view can refetch.
//!
//! - **[`QueryCache`] / [`QueryKey`] / [`QueryState`]**: Keyed request cache
//!   publishing `{ data, is_pending, is_fetching, error }` through `watch`
//!   channels ([`QueryStream`]). A failed fetch keeps the last good data.
//!
//! - **[`CampaignForm`]**: Create/edit dialog as a tagged union
//!   (`Closed | Creating | Editing`). Submitting validates the draft, closes
//!   the dialog, and yields a [`Submission`] for the console to send.
//!
//! - **[`LeadTable`]**: Case-insensitive filter and 10-row pagination over
//!   an immutable lead list.
//!
//! - **[`CoreError`]**: User-facing errors. Cloneable so one failed fetch
//!   can be handed to every caller that awaited it.

pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod leads;
pub mod query;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{CacheConfig, ConsoleConfig};
pub use console::{Console, REQUIRED_FIELDS_MESSAGE, SEARCH_URL_REQUIRED_MESSAGE};
pub use error::CoreError;
pub use form::{CampaignDraft, CampaignForm, Submission};
pub use leads::{LeadTable, PAGE_SIZE, PageLink, leads_from_results};
pub use query::{QueryCache, QueryKey, QueryKind, QueryState, QueryStream};

// Wire types the views need alongside the console.
pub use outreach_api::{
    BackendClient, Campaign, CampaignStatus, CreateCampaignDto, CreateStatus, GeneratedMessage,
    LeadProfile, LinkedInProfile, LinkedinResult, PersonCard, SearchResponse, TransportConfig,
    UpdateCampaignDto,
};
