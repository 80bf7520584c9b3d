//! Lead-source client tests against a mock pipeline API

use leadtrawl::config::LeadsConfig;
use leadtrawl::leads::{LeadClient, LeadsError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn leads_config(api_base: &str) -> LeadsConfig {
    LeadsConfig {
        api_base: api_base.to_string(),
        auth_token: "token".to_string(),
        user_id: "user-1".to_string(),
        saved_item_id: "item-1".to_string(),
        company_count: 3,
        sector: "Technology".to_string(),
        output_key: "urls".to_string(),
        poll_interval_secs: 1,
    }
}

#[tokio::test]
async fn test_start_poll_and_collect_urls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start_pipeline"))
        .and(query_param("user_id", "user-1"))
        .and(query_param("saved_item_id", "item-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "run_id": "run-42"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // First poll still running, second poll done.
    Mock::given(method("GET"))
        .and(path("/get_pl_run"))
        .and(query_param("run_id", "run-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "RUNNING"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_pl_run"))
        .and(query_param("run_id", "run-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "DONE",
            "outputs": { "urls": ["acme.example", "https://widgets.example"] }
        })))
        .mount(&server)
        .await;

    let client = LeadClient::new(leads_config(&server.uri())).unwrap();
    let urls = client.fetch_lead_urls().await.unwrap();

    assert_eq!(urls, vec!["acme.example", "https://widgets.example"]);
}

#[tokio::test]
async fn test_failed_run_surfaces_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start_pipeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "run_id": "run-7"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get_pl_run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "FAILED"
        })))
        .mount(&server)
        .await;

    let client = LeadClient::new(leads_config(&server.uri())).unwrap();
    let result = client.fetch_lead_urls().await;

    assert!(matches!(result, Err(LeadsError::RunFailed(state)) if state == "FAILED"));
}

#[tokio::test]
async fn test_missing_run_id_is_payload_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start_pipeline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = LeadClient::new(leads_config(&server.uri())).unwrap();
    let result = client.fetch_lead_urls().await;

    assert!(matches!(result, Err(LeadsError::Payload(_))));
}

#[tokio::test]
async fn test_http_error_from_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/start_pipeline"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = LeadClient::new(leads_config(&server.uri())).unwrap();
    let result = client.fetch_lead_urls().await;

    assert!(matches!(result, Err(LeadsError::Http(_))));
}
