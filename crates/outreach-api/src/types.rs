// Wire types for the outreach backend.
//
// Field names follow the backend's JSON (`_id`, `accountIDs`, camelCase
// lead fields, snake_case `job_title` on the message-generation profile).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ── Campaigns ───────────────────────────────────────────────────────

/// Activation status of a campaign.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    #[default]
    Active,
    Inactive,
    Deleted,
}

impl CampaignStatus {
    /// Status after flipping the activation switch.
    ///
    /// A deleted campaign shows the switch off, so flipping it activates.
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive | Self::Deleted => Self::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/// Status values accepted when creating a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateStatus {
    Active,
    Inactive,
}

impl From<CreateStatus> for CampaignStatus {
    fn from(status: CreateStatus) -> Self {
        match status {
            CreateStatus::Active => Self::Active,
            CreateStatus::Inactive => Self::Inactive,
        }
    }
}

/// A named outreach effort bundling target leads and linked accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    /// Backend-assigned identifier. `None` means the campaign was never persisted.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub leads: Vec<String>,
    #[serde(rename = "accountIDs", default)]
    pub account_ids: Vec<String>,
}

impl Campaign {
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Payload for `POST /campaigns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCampaignDto {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CreateStatus>,
    pub leads: Vec<String>,
    #[serde(rename = "accountIDs")]
    pub account_ids: Vec<String>,
}

/// Payload for `PUT /campaigns/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCampaignDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<String>>,
    #[serde(rename = "accountIDs", default, skip_serializing_if = "Option::is_none")]
    pub account_ids: Option<Vec<String>>,
}

impl UpdateCampaignDto {
    /// An update that changes nothing but the status.
    pub fn status_only(status: CampaignStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// ── Message generation ──────────────────────────────────────────────

/// Profile fields fed to `POST /personalized-message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInProfile {
    pub name: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl LinkedInProfile {
    /// Labels of required fields that are blank.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("job title", &self.job_title),
            ("company", &self.company),
            ("location", &self.location),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(label, _)| label)
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMessage {
    pub message: String,
}

// ── Lead search ─────────────────────────────────────────────────────

/// Body of `POST /linkedin/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// One person scraped from a search page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

/// Response of `POST /linkedin/search`. The scrape itself continues server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub people: Vec<PersonCard>,
}

/// One stored scrape run, as returned by `GET /linkedin/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedinResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub people: Vec<PersonCard>,
    pub created_at: DateTime<Utc>,
}

// ── Leads ───────────────────────────────────────────────────────────

/// A prospect profile shown in the lead table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl LeadProfile {
    /// Build a lead from a scraped person card.
    ///
    /// Cards without a name carry nothing to show and yield `None`. The id is
    /// derived from the scrape run id and the card position.
    pub fn from_person_card(result_id: &str, index: usize, card: &PersonCard) -> Option<Self> {
        let full_name = card.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        Some(Self {
            id: format!("{result_id}:{index}"),
            full_name: full_name.to_owned(),
            location: card.country.clone().unwrap_or_default(),
            profile_url: card.profile_url.clone().unwrap_or_default(),
            avatar_url: card.photo_url.clone(),
            ..Self::default()
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn campaign_uses_backend_field_names() {
        let campaign: Campaign = serde_json::from_value(json!({
            "_id": "c1",
            "name": "Acme Outreach",
            "description": "Q3 push",
            "status": "INACTIVE",
            "leads": ["https://linkedin.com/in/a"],
            "accountIDs": ["acc-1"],
            "__v": 0
        }))
        .unwrap();

        assert_eq!(campaign.id.as_deref(), Some("c1"));
        assert_eq!(campaign.status, CampaignStatus::Inactive);
        assert_eq!(campaign.account_ids, vec!["acc-1".to_string()]);
        assert!(campaign.is_persisted());
    }

    #[test]
    fn unpersisted_campaign_omits_id() {
        let campaign = Campaign {
            id: None,
            name: "Draft".into(),
            description: String::new(),
            status: CampaignStatus::Active,
            leads: vec![],
            account_ids: vec![],
        };
        let value = serde_json::to_value(&campaign).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["accountIDs"], json!([]));
    }

    #[test]
    fn status_only_update_serializes_one_field() {
        let dto = UpdateCampaignDto::status_only(CampaignStatus::Inactive);
        assert_eq!(serde_json::to_value(&dto).unwrap(), json!({ "status": "INACTIVE" }));
    }

    #[test]
    fn toggle_flips_between_active_and_inactive() {
        assert_eq!(CampaignStatus::Active.toggled(), CampaignStatus::Inactive);
        assert_eq!(CampaignStatus::Inactive.toggled(), CampaignStatus::Active);
        assert_eq!(CampaignStatus::Deleted.toggled(), CampaignStatus::Active);
    }

    #[test]
    fn status_display_matches_wire_value() {
        assert_eq!(CampaignStatus::Deleted.to_string(), "DELETED");
        assert_eq!("ACTIVE".parse::<CampaignStatus>().unwrap(), CampaignStatus::Active);
    }

    #[test]
    fn missing_required_fields_lists_blank_ones() {
        let profile = LinkedInProfile {
            name: "Jane".into(),
            job_title: "  ".into(),
            company: String::new(),
            location: "Berlin".into(),
            summary: None,
        };
        assert_eq!(profile.missing_required_fields(), vec!["job title", "company"]);
    }

    #[test]
    fn person_card_without_name_is_skipped() {
        let card = PersonCard::default();
        assert!(LeadProfile::from_person_card("r1", 0, &card).is_none());

        let card = PersonCard {
            name: Some("Ada Lovelace".into()),
            country: Some("United Kingdom".into()),
            photo_url: None,
            profile_url: Some("https://linkedin.com/in/ada".into()),
        };
        let lead = LeadProfile::from_person_card("r1", 3, &card).unwrap();
        assert_eq!(lead.id, "r1:3");
        assert_eq!(lead.location, "United Kingdom");
    }
}
