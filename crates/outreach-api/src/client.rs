// Hand-crafted async HTTP client for the outreach backend.
//
// JSON REST endpoints under the configured base URL:
// /campaigns, /personalized-message, /linkedin/search, /linkedin/latest

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::{ParseError, Url};

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{
    Campaign, CreateCampaignDto, GeneratedMessage, LinkedInProfile, LinkedinResult,
    SearchRequest, SearchResponse, UpdateCampaignDto,
};

// ── Error response shape ─────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the outreach backend.
///
/// The base URL is kept as configured and only resolved when a request is
/// made, so a missing or malformed URL fails the request rather than
/// startup.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl BackendClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: Option<String>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: Some(base_url.to_owned()),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"campaigns"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(Error::MissingBaseUrl)?;

        let mut base = Url::parse(raw)?;
        // Ensure a trailing slash so `join` appends instead of replacing
        // the last path segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(path)?)
    }

    /// URL of one item in `collection`. The id is pushed as a single
    /// escaped segment, so `/`, `?` or `#` in it stay part of the id.
    fn item_url(&self, collection: &str, id: &str) -> Result<Url, Error> {
        let mut url = self.url(collection)?;
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, Error> {
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|err| err.message.or(err.error))
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Backend {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Campaigns ────────────────────────────────────────────────────

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        self.get(self.url("campaigns")?).await
    }

    /// Fetch one campaign. A 404 is reported as `Ok(None)`.
    pub async fn get_campaign(&self, id: &str) -> Result<Option<Campaign>, Error> {
        match self.get(self.item_url("campaigns", id)?).await {
            Ok(campaign) => Ok(Some(campaign)),
            Err(e) if e.is_not_found() => {
                debug!(id, "campaign not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn create_campaign(&self, dto: &CreateCampaignDto) -> Result<Campaign, Error> {
        self.post("campaigns", dto).await
    }

    pub async fn update_campaign(
        &self,
        id: &str,
        dto: &UpdateCampaignDto,
    ) -> Result<Campaign, Error> {
        self.put(self.item_url("campaigns", id)?, dto).await
    }

    pub async fn delete_campaign(&self, id: &str) -> Result<(), Error> {
        self.delete(self.item_url("campaigns", id)?).await
    }

    // ── Message generation ───────────────────────────────────────────

    pub async fn generate_message(
        &self,
        profile: &LinkedInProfile,
    ) -> Result<GeneratedMessage, Error> {
        self.post("personalized-message", profile).await
    }

    // ── Lead search ──────────────────────────────────────────────────

    /// Start a server-side scrape of a LinkedIn people-search URL.
    pub async fn search_linkedin_people(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResponse, Error> {
        self.post("linkedin/search", request).await
    }

    /// Most recent stored scrape runs, newest first.
    pub async fn fetch_latest_linkedin_results(
        &self,
        limit: u32,
    ) -> Result<Vec<LinkedinResult>, Error> {
        self.get_with_params("linkedin/latest", &[("limit", limit.to_string())])
            .await
    }
}
