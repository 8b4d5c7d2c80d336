//! Screen implementations. Each screen is a top-level Component.

pub mod campaign_form;
pub mod campaigns;
pub mod leads;
pub mod message_generator;
pub mod not_found;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per screen, the not-found page included.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Campaigns,
            Box::new(campaigns::CampaignsScreen::new()),
        ),
        (
            ScreenId::MessageGenerator,
            Box::new(message_generator::MessageGeneratorScreen::new()),
        ),
        (ScreenId::Leads, Box::new(leads::LeadsScreen::new())),
        (ScreenId::NotFound, Box::new(not_found::NotFoundScreen)),
    ]
}
