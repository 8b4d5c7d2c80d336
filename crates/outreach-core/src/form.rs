// ── Campaign create/edit dialog state ──
//
// The dialog is either closed, creating a new campaign, or editing a
// persisted one. The draft is the dialog's own copy; the cached campaign
// list is never touched until a mutation succeeds and invalidates it.

use outreach_api::{Campaign, CampaignStatus, CreateCampaignDto, CreateStatus, UpdateCampaignDto};

use crate::error::CoreError;

/// Editable copy of a campaign's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    pub name: String,
    pub description: String,
    pub status: CampaignStatus,
    pub leads: Vec<String>,
    pub account_ids: Vec<String>,
}

impl CampaignDraft {
    pub fn from_campaign(campaign: &Campaign) -> Self {
        Self {
            name: campaign.name.clone(),
            description: campaign.description.clone(),
            status: campaign.status,
            leads: campaign.leads.clone(),
            account_ids: campaign.account_ids.clone(),
        }
    }

    /// Append a lead URL. Blank or duplicate values are ignored.
    /// Returns `true` if the list changed.
    pub fn add_lead(&mut self, lead: &str) -> bool {
        push_unique(&mut self.leads, lead)
    }

    pub fn remove_lead(&mut self, lead: &str) -> bool {
        remove_exact(&mut self.leads, lead)
    }

    /// Append a linked account id. Blank or duplicate values are ignored.
    pub fn add_account_id(&mut self, account_id: &str) -> bool {
        push_unique(&mut self.account_ids, account_id)
    }

    pub fn remove_account_id(&mut self, account_id: &str) -> bool {
        remove_exact(&mut self.account_ids, account_id)
    }

    /// Required-field check run before anything is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("Campaign name is required"));
        }
        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_owned());
    true
}

fn remove_exact(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|v| v != value);
    list.len() != before
}

fn not_open() -> CoreError {
    CoreError::validation("No campaign form is open")
}

/// What a successful submit asks the backend to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(CreateCampaignDto),
    Update { id: String, dto: UpdateCampaignDto },
}

/// The campaign dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CampaignForm {
    #[default]
    Closed,
    Creating(CampaignDraft),
    Editing {
        id: String,
        draft: CampaignDraft,
    },
}

impl CampaignForm {
    /// Open the dialog with an empty draft.
    pub fn open_create(&mut self) {
        *self = Self::Creating(CampaignDraft::default());
    }

    /// Open the dialog on a copy of `campaign`.
    ///
    /// Only persisted campaigns can be edited.
    pub fn open_edit(&mut self, campaign: &Campaign) -> Result<(), CoreError> {
        let Some(id) = campaign.id.clone() else {
            return Err(CoreError::validation("Campaign has not been saved yet"));
        };
        *self = Self::Editing {
            id,
            draft: CampaignDraft::from_campaign(campaign),
        };
        Ok(())
    }

    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Validate the draft and turn it into a backend request.
    ///
    /// On success the dialog closes before the request is even made. On a
    /// validation failure it stays open with the draft intact.
    pub fn submit(&mut self) -> Result<Submission, CoreError> {
        self.draft().ok_or_else(not_open)?.validate()?;

        match std::mem::take(self) {
            Self::Creating(draft) => Ok(Submission::Create(CreateCampaignDto {
                name: draft.name.trim().to_owned(),
                description: draft.description,
                status: Some(CreateStatus::Active),
                leads: draft.leads,
                account_ids: draft.account_ids,
            })),
            Self::Editing { id, draft } => Ok(Submission::Update {
                id,
                dto: UpdateCampaignDto {
                    name: Some(draft.name.trim().to_owned()),
                    description: Some(draft.description),
                    status: Some(draft.status),
                    leads: Some(draft.leads),
                    account_ids: Some(draft.account_ids),
                },
            }),
            Self::Closed => Err(not_open()),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn draft(&self) -> Option<&CampaignDraft> {
        match self {
            Self::Closed => None,
            Self::Creating(draft) | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut CampaignDraft> {
        match self {
            Self::Closed => None,
            Self::Creating(draft) | Self::Editing { draft, .. } => Some(draft),
        }
    }

    /// Dialog heading.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Editing { .. } => "Edit Campaign",
            Self::Creating(_) | Self::Closed => "Create New Campaign",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn persisted(status: CampaignStatus) -> Campaign {
        Campaign {
            id: Some("c1".into()),
            name: "Beta Push".into(),
            description: "follow-ups".into(),
            status,
            leads: vec!["https://linkedin.com/in/a".into()],
            account_ids: vec!["acc-1".into()],
        }
    }

    #[test]
    fn create_flow_forces_active_status() {
        let mut form = CampaignForm::default();
        form.open_create();
        form.draft_mut().unwrap().name = "Acme Outreach".into();

        let submission = form.submit().unwrap();
        assert_eq!(
            submission,
            Submission::Create(CreateCampaignDto {
                name: "Acme Outreach".into(),
                description: String::new(),
                status: Some(CreateStatus::Active),
                leads: vec![],
                account_ids: vec![],
            })
        );
        assert_eq!(form, CampaignForm::Closed);
    }

    #[test]
    fn untouched_edit_keeps_status() {
        let mut form = CampaignForm::Closed;
        form.open_edit(&persisted(CampaignStatus::Inactive)).unwrap();
        assert!(form.is_editing());

        let Submission::Update { id, dto } = form.submit().unwrap() else {
            panic!("expected update");
        };
        assert_eq!(id, "c1");
        assert_eq!(dto.status, Some(CampaignStatus::Inactive));
        assert_eq!(dto.leads, Some(vec!["https://linkedin.com/in/a".to_string()]));
        assert!(!form.is_open());
    }

    #[test]
    fn blank_name_keeps_form_open() {
        let mut form = CampaignForm::Closed;
        form.open_create();
        form.draft_mut().unwrap().name = "   ".into();

        assert!(form.submit().unwrap_err().is_validation());
        assert!(form.is_open());
    }

    #[test]
    fn unsaved_campaign_cannot_be_edited() {
        let mut campaign = persisted(CampaignStatus::Active);
        campaign.id = None;

        let mut form = CampaignForm::Closed;
        assert!(form.open_edit(&campaign).is_err());
        assert_eq!(form, CampaignForm::Closed);
    }

    #[test]
    fn submit_on_closed_form_fails() {
        assert!(CampaignForm::Closed.submit().is_err());
    }

    #[test]
    fn cancel_discards_draft() {
        let mut form = CampaignForm::Closed;
        form.open_edit(&persisted(CampaignStatus::Active)).unwrap();
        form.draft_mut().unwrap().name = "changed".into();
        form.cancel();
        assert!(form.draft().is_none());
    }

    #[test]
    fn add_lead_is_idempotent() {
        let mut draft = CampaignDraft::default();
        assert!(draft.add_lead("https://linkedin.com/in/a"));
        let once = draft.clone();
        assert!(!draft.add_lead("https://linkedin.com/in/a"));
        assert_eq!(draft, once);
    }

    #[test]
    fn blank_values_are_not_added() {
        let mut draft = CampaignDraft::default();
        assert!(!draft.add_lead("   "));
        assert!(!draft.add_account_id(""));
        assert!(draft.add_account_id("  acc-2 "));
        assert_eq!(draft.account_ids, vec!["acc-2".to_string()]);
    }

    #[test]
    fn remove_matches_exactly() {
        let mut draft = CampaignDraft::from_campaign(&persisted(CampaignStatus::Active));
        assert!(!draft.remove_lead("https://linkedin.com/in"));
        assert!(draft.remove_lead("https://linkedin.com/in/a"));
        assert!(draft.leads.is_empty());
        assert!(draft.remove_account_id("acc-1"));
    }

    #[test]
    fn title_follows_mode() {
        let mut form = CampaignForm::Closed;
        form.open_create();
        assert_eq!(form.title(), "Create New Campaign");
        form.open_edit(&persisted(CampaignStatus::Active)).unwrap();
        assert_eq!(form.title(), "Edit Campaign");
    }
}
