#![allow(clippy::unwrap_used)]
// End-to-end tests for `Console` against a wiremock backend.

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outreach_core::{
    BackendClient, Campaign, CampaignForm, CampaignStatus, Console, ConsoleConfig, CoreError,
    QueryKey,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let client = BackendClient::from_reqwest(&server.uri(), reqwest::Client::new());
    (server, Console::new(client, ConsoleConfig::default()))
}

fn campaign_json(id: &str, name: &str, status: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "status": status,
        "leads": [],
        "accountIDs": []
    })
}

fn ids(campaigns: &[Campaign]) -> Vec<&str> {
    campaigns.iter().filter_map(|c| c.id.as_deref()).collect()
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn repeated_reads_hit_backend_once() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([campaign_json("c1", "A", "ACTIVE")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (a, b, c) = tokio::join!(console.campaigns(), console.campaigns(), console.campaigns());
    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    assert_eq!(c.unwrap().len(), 1);

    console.campaigns().await.unwrap();
    assert_eq!(console.campaigns_state().data.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_campaign_reads_as_none() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(console.campaign("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_read_is_reported_in_state() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = console.campaigns().await.unwrap_err();
    assert_eq!(
        err,
        CoreError::Api {
            message: "maintenance".into(),
            status: Some(503)
        }
    );

    let state = console.campaigns_state();
    assert!(state.data.is_none());
    assert!(state.error.is_some());
    assert!(!state.is_pending);
}

#[tokio::test]
async fn detail_invalidation_refetches_only_the_detail() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([campaign_json("c1", "A", "ACTIVE")])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(campaign_json("c1", "A", "ACTIVE")))
        .expect(2)
        .mount(&server)
        .await;

    console.campaigns().await.unwrap();
    console.campaign("c1").await.unwrap();

    console.invalidate(&QueryKey::campaign("c1"));
    console.campaigns().await.unwrap();
    let detail = console.campaign("c1").await.unwrap();
    assert_eq!((*detail).as_ref().unwrap().name, "A");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_list_refetches_without_the_campaign() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            campaign_json("c1", "Keep", "ACTIVE"),
            campaign_json("c2", "Drop", "ACTIVE"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/campaigns/c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([campaign_json("c1", "Keep", "ACTIVE")])),
        )
        .mount(&server)
        .await;

    let before = console.campaigns().await.unwrap();
    assert_eq!(ids(&before), vec!["c1", "c2"]);

    let mut invalidations = console.subscribe_invalidations();
    console.delete_campaign("c2").await.unwrap();
    assert_eq!(invalidations.recv().await.unwrap(), QueryKey::campaigns());
    assert_eq!(invalidations.recv().await.unwrap(), QueryKey::campaign("c2"));

    let after = console.campaigns().await.unwrap();
    assert_eq!(ids(&after), vec!["c1"]);
}

#[tokio::test]
async fn list_failure_after_delete_does_not_revive_stale_list() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            campaign_json("c1", "Keep", "ACTIVE"),
            campaign_json("c2", "Drop", "ACTIVE"),
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/campaigns/c2"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([campaign_json("c1", "Keep", "ACTIVE")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    console.campaigns().await.unwrap();
    console.delete_campaign("c2").await.unwrap();

    console.campaigns().await.unwrap_err();
    let stale = console.campaigns_state();
    assert_eq!(ids(stale.data.as_deref().unwrap()), vec!["c1", "c2"]);
    assert!(stale.error.is_some());

    let after = console.campaigns().await.unwrap();
    assert_eq!(ids(&after), vec!["c1"]);
    assert!(console.campaigns_state().error.is_none());
}

#[tokio::test]
async fn toggle_sends_only_the_flipped_status() {
    let (server, console) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/campaigns/c1"))
        .and(body_json(json!({ "status": "INACTIVE" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(campaign_json("c1", "Acme", "INACTIVE")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let campaign = Campaign {
        id: Some("c1".into()),
        name: "Acme".into(),
        description: "long description".into(),
        status: CampaignStatus::Active,
        leads: vec!["https://linkedin.com/in/a".into()],
        account_ids: vec!["acc-1".into()],
    };
    let updated = console.toggle_status(&campaign).await.unwrap();
    assert_eq!(updated.status, CampaignStatus::Inactive);
}

#[tokio::test]
async fn create_form_submission_posts_active_campaign() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/campaigns"))
        .and(body_json(json!({
            "name": "Acme Outreach",
            "description": "",
            "status": "ACTIVE",
            "leads": [],
            "accountIDs": []
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(campaign_json("n1", "Acme Outreach", "ACTIVE")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut form = CampaignForm::Closed;
    form.open_create();
    form.draft_mut().unwrap().name = "Acme Outreach".into();
    let submission = form.submit().unwrap();
    assert!(!form.is_open());

    let mut invalidations = console.subscribe_invalidations();
    let created = console.submit(&submission).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("n1"));
    assert_eq!(invalidations.recv().await.unwrap(), QueryKey::campaigns());
}

#[tokio::test]
async fn failed_mutation_invalidates_nothing() {
    let (server, console) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/campaigns/c1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut invalidations = console.subscribe_invalidations();
    assert!(console.delete_campaign("c1").await.is_err());
    assert!(invalidations.try_recv().is_err());
}

// ── Leads & messages ────────────────────────────────────────────────

#[tokio::test]
async fn search_invalidates_latest_results() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/linkedin/latest"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "run-1",
            "url": "https://www.linkedin.com/search/results/people/?keywords=rust",
            "count": 2,
            "people": [{ "name": "Ada", "country": "UK" }, { "country": "FR" }],
            "createdAt": "2024-05-01T10:00:00Z"
        }])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/linkedin/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "run-2",
            "people": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let leads = console.latest_leads().await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].full_name, "Ada");

    console
        .search_leads("https://www.linkedin.com/search/results/people/?keywords=go", None)
        .await
        .unwrap();

    // Stale after the search, so this goes back to the backend.
    console.latest_leads().await.unwrap();
}

#[tokio::test]
async fn blank_search_url_never_reaches_backend() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/linkedin/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = console.search_leads("   ", Some(5)).await.unwrap_err();
    assert_eq!(err.to_string(), "Search URL required");
}

#[tokio::test]
async fn incomplete_profile_is_rejected_before_request() {
    let (server, console) = setup().await;

    Mock::given(method("POST"))
        .and(path("/personalized-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "hi" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut profile = outreach_core::LinkedInProfile {
        name: "Jane".into(),
        job_title: "CTO".into(),
        company: String::new(),
        location: "Berlin".into(),
        summary: None,
    };
    let err = console.generate_message(&profile).await.unwrap_err();
    assert_eq!(err.to_string(), "Please fill in the required fields");

    profile.company = "TechCorp".into();
    assert_eq!(console.generate_message(&profile).await.unwrap().message, "hi");
}

#[tokio::test]
async fn shutdown_clears_cached_reads() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    console.campaigns().await.unwrap();
    console.shutdown();
    assert!(console.campaigns_state().data.is_none());
    console.campaigns().await.unwrap();
}
