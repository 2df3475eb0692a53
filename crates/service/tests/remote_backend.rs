use std::sync::Arc;

use models::{FeaturedData, SiteSection};
use serde_json::json;
use service::remote::RestClient;
use service::{AuditOutcome, Fetched, SiteStore, DEFAULT_AUDIT_LIMIT, MAX_ENTRIES};
use wiremock::matchers::{body_json, body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> SiteStore {
    SiteStore::remote(Arc::new(RestClient::new(server.uri(), "secret")), "audit:entries", MAX_ENTRIES)
}

#[tokio::test]
async fn section_write_then_read_through_rest_api() -> Result<(), anyhow::Error> {
    let server = MockServer::start().await;
    let featured = FeaturedData { featured_title: "Hello".into(), ..Default::default() };
    let text = serde_json::to_string(&serde_json::to_value(&featured)?)?;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!(["SET", "featured", text.clone()])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!(["GET", "featured"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": text })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.sections().set_section(SiteSection::Featured, &featured).await?;
    let got = store.sections().featured(FeaturedData::default()).await;
    assert_eq!(got, Fetched::Stored(featured));
    Ok(())
}

#[tokio::test]
async fn outage_falls_back_and_drops_audit_entries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.sections().featured(FeaturedData::default()).await.is_fallback());
    assert!(store.sections().set("featured", &json!({})).await.is_err());
    assert!(matches!(store.audit().log("login", None).await, AuditOutcome::Dropped { .. }));
    assert_eq!(store.audit().recent(DEFAULT_AUDIT_LIMIT).await, Fetched::Fallback(Vec::new()));
}

#[tokio::test]
async fn audit_log_uses_list_commands() -> Result<(), anyhow::Error> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!(["LPUSH", "audit:entries"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!(["LTRIM", "audit:entries", "0", "499"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!(["LRANGE", "audit:entries", "0", "99"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": [
            "{\"id\":\"1\",\"ts\":1700000000000,\"action\":\"login\"}"
        ]})))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.audit().log("login", None).await.is_recorded());
    let recent = store.audit().recent(DEFAULT_AUDIT_LIMIT).await;
    assert!(recent.is_stored());
    assert_eq!(recent.value()[0].action, "login");
    Ok(())
}
