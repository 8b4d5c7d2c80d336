// outreach-api: Async Rust client for the outreach campaign backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::BackendClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    Campaign, CampaignStatus, CreateCampaignDto, CreateStatus, GeneratedMessage, LeadProfile,
    LinkedInProfile, LinkedinResult, PersonCard, SearchRequest, SearchResponse,
    UpdateCampaignDto,
};
