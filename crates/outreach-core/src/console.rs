// ── Console facade ──
//
// Single entry point for the views: cached reads, mutations, and the
// invalidation rules that tie them together. Cheaply cloneable; each
// instance owns its own caches.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use outreach_api::{
    BackendClient, Campaign, CreateCampaignDto, GeneratedMessage, LeadProfile, LinkedInProfile,
    LinkedinResult, SearchRequest, SearchResponse, UpdateCampaignDto,
};

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::form::Submission;
use crate::leads::leads_from_results;
use crate::query::{QueryCache, QueryKey, QueryKind, QueryState, QueryStream};

const INVALIDATION_CHANNEL_SIZE: usize = 64;

/// Shown when a message-generation profile is incomplete.
pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in the required fields";

/// Shown when a lead search is started without a URL.
pub const SEARCH_URL_REQUIRED_MESSAGE: &str = "Search URL required";

/// Cached access to the outreach backend.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    client: BackendClient,
    config: ConsoleConfig,
    campaigns: QueryCache<Vec<Campaign>>,
    campaign: QueryCache<Option<Campaign>>,
    latest: QueryCache<Vec<LinkedinResult>>,
    invalidations: broadcast::Sender<QueryKey>,
}

impl Console {
    pub fn new(client: BackendClient, config: ConsoleConfig) -> Self {
        let stale_time = config.cache.stale_time;
        let (invalidations, _) = broadcast::channel(INVALIDATION_CHANNEL_SIZE);

        Self {
            inner: Arc::new(ConsoleInner {
                client,
                config,
                campaigns: QueryCache::new(stale_time),
                campaign: QueryCache::new(stale_time),
                latest: QueryCache::new(stale_time),
                invalidations,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &BackendClient {
        &self.inner.client
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// All campaigns.
    pub async fn campaigns(&self) -> Result<Arc<Vec<Campaign>>, CoreError> {
        let client = self.inner.client.clone();
        self.inner
            .campaigns
            .fetch(&QueryKey::campaigns(), move || async move {
                client.list_campaigns().await.map_err(CoreError::from)
            })
            .await
    }

    /// One campaign. `None` when the backend does not know the id.
    pub async fn campaign(&self, id: &str) -> Result<Arc<Option<Campaign>>, CoreError> {
        let client = self.inner.client.clone();
        let owned = id.to_owned();
        self.inner
            .campaign
            .fetch(&QueryKey::campaign(id), move || async move {
                client.get_campaign(&owned).await.map_err(CoreError::from)
            })
            .await
    }

    /// The newest `limit` stored scrape runs.
    pub async fn latest_results(
        &self,
        limit: u32,
    ) -> Result<Arc<Vec<LinkedinResult>>, CoreError> {
        let client = self.inner.client.clone();
        self.inner
            .latest
            .fetch(&QueryKey::latest_results(limit), move || async move {
                client
                    .fetch_latest_linkedin_results(limit)
                    .await
                    .map_err(CoreError::from)
            })
            .await
    }

    /// Lead rows from the configured number of latest scrape runs.
    pub async fn latest_leads(&self) -> Result<Vec<LeadProfile>, CoreError> {
        let results = self.latest_results(self.inner.config.latest_limit).await?;
        Ok(leads_from_results(&results))
    }

    pub fn campaigns_state(&self) -> QueryState<Vec<Campaign>> {
        self.inner.campaigns.state(&QueryKey::campaigns())
    }

    pub fn watch_campaigns(&self) -> QueryStream<Vec<Campaign>> {
        self.inner.campaigns.subscribe(&QueryKey::campaigns())
    }

    pub fn campaign_state(&self, id: &str) -> QueryState<Option<Campaign>> {
        self.inner.campaign.state(&QueryKey::campaign(id))
    }

    pub fn latest_state(&self, limit: u32) -> QueryState<Vec<LinkedinResult>> {
        self.inner.latest.state(&QueryKey::latest_results(limit))
    }

    pub fn watch_latest(&self, limit: u32) -> QueryStream<Vec<LinkedinResult>> {
        self.inner.latest.subscribe(&QueryKey::latest_results(limit))
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create_campaign(&self, dto: &CreateCampaignDto) -> Result<Campaign, CoreError> {
        let created = self
            .inner
            .client
            .create_campaign(dto)
            .await
            .inspect_err(|e| warn!(error = %e, "create campaign failed"))?;
        info!(name = %created.name, "campaign created");
        self.invalidate(&QueryKey::campaigns());
        Ok(created)
    }

    pub async fn update_campaign(
        &self,
        id: &str,
        dto: &UpdateCampaignDto,
    ) -> Result<Campaign, CoreError> {
        let updated = self
            .inner
            .client
            .update_campaign(id, dto)
            .await
            .inspect_err(|e| warn!(id, error = %e, "update campaign failed"))?;
        info!(id, "campaign updated");
        self.invalidate_campaign(id);
        Ok(updated)
    }

    pub async fn delete_campaign(&self, id: &str) -> Result<(), CoreError> {
        self.inner
            .client
            .delete_campaign(id)
            .await
            .inspect_err(|e| warn!(id, error = %e, "delete campaign failed"))?;
        info!(id, "campaign deleted");
        self.invalidate_campaign(id);
        Ok(())
    }

    /// Flip a campaign between active and inactive. Only `status` is sent.
    pub async fn toggle_status(&self, campaign: &Campaign) -> Result<Campaign, CoreError> {
        let id = campaign
            .id
            .as_deref()
            .ok_or_else(|| CoreError::validation("Campaign has not been saved yet"))?;
        let status = campaign.status.toggled();
        debug!(id, %status, "toggling campaign status");
        self.update_campaign(id, &UpdateCampaignDto::status_only(status))
            .await
    }

    /// Send what a closed campaign form produced.
    pub async fn submit(&self, submission: &Submission) -> Result<Campaign, CoreError> {
        match submission {
            Submission::Create(dto) => self.create_campaign(dto).await,
            Submission::Update { id, dto } => self.update_campaign(id, dto).await,
        }
    }

    /// Start a scrape of a LinkedIn people-search URL.
    ///
    /// `count` falls back to the configured default.
    pub async fn search_leads(
        &self,
        url: &str,
        count: Option<u32>,
    ) -> Result<SearchResponse, CoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CoreError::validation(SEARCH_URL_REQUIRED_MESSAGE));
        }
        let request = SearchRequest {
            url: url.to_owned(),
            count: count.or(self.inner.config.default_search_count),
        };

        let response = self
            .inner
            .client
            .search_linkedin_people(&request)
            .await
            .inspect_err(|e| warn!(error = %e, "lead search failed"))?;
        info!(id = %response.id, people = response.people.len(), "lead search started");

        for key in self.inner.latest.keys() {
            self.invalidate(&key);
        }
        Ok(response)
    }

    /// Ask the backend for a personalized message. Nothing is cached.
    pub async fn generate_message(
        &self,
        profile: &LinkedInProfile,
    ) -> Result<GeneratedMessage, CoreError> {
        let missing = profile.missing_required_fields();
        if !missing.is_empty() {
            debug!(?missing, "message profile incomplete");
            return Err(CoreError::validation(REQUIRED_FIELDS_MESSAGE));
        }
        Ok(self
            .inner
            .client
            .generate_message(profile)
            .await
            .inspect_err(|e| warn!(error = %e, "message generation failed"))?)
    }

    // ── Invalidation ─────────────────────────────────────────────────

    /// Mark `key` stale and tell every invalidation subscriber about it.
    pub fn invalidate(&self, key: &QueryKey) {
        match key.kind() {
            QueryKind::Campaigns => self.inner.campaigns.invalidate(key),
            QueryKind::Campaign => self.inner.campaign.invalidate(key),
            QueryKind::LatestResults => self.inner.latest.invalidate(key),
        };
        // No subscribers is fine.
        let _ = self.inner.invalidations.send(key.clone());
    }

    fn invalidate_campaign(&self, id: &str) {
        self.invalidate(&QueryKey::campaigns());
        self.invalidate(&QueryKey::campaign(id));
    }

    /// Keys invalidated from now on.
    pub fn subscribe_invalidations(&self) -> broadcast::Receiver<QueryKey> {
        self.inner.invalidations.subscribe()
    }

    /// Drop every cached entry.
    pub fn shutdown(&self) {
        self.inner.campaigns.clear();
        self.inner.campaign.clear();
        self.inner.latest.clear();
        debug!("console caches cleared");
    }
}
