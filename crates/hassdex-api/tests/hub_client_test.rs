#![allow(clippy::unwrap_used)]
// Integration tests for `HubClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hassdex_api::{DeviceInfoLookup, Error, HubClient, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, HubClient) {
    let server = MockServer::start().await;
    let token: SecretString = "test-token".to_string().into();
    let client = HubClient::from_token(&server.uri(), &token, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── States & config ─────────────────────────────────────────────────

#[tokio::test]
async fn test_get_states_sends_bearer_token() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/states"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "entity_id": "light.kitchen",
                "state": "on",
                "attributes": { "friendly_name": "Kitchen" }
            },
            { "entity_id": "sun.sun", "state": "below_horizon" }
        ])))
        .mount(&server)
        .await;

    let states = client.get_states().await.unwrap();

    assert_eq!(states.len(), 2);
    assert_eq!(states[0].entity_id, "light.kitchen");
    assert_eq!(states[0].attribute_str("friendly_name"), Some("Kitchen"));
    assert!(states[1].attributes.is_empty());
}

#[tokio::test]
async fn test_get_config() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "2026.1.1",
            "location_name": "Cabin",
            "unit_system": {}
        })))
        .mount(&server)
        .await;

    let config = client.get_config().await.unwrap();

    assert_eq!(config.version.as_deref(), Some("2026.1.1"));
    assert_eq!(config.location_name.as_deref(), Some("Cabin"));
}

// ── Templates ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_areas_parses_pairs() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .and(body_string_contains("areas()"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("kitchen|Kitchen\ngarage|Garage | Workshop\n"),
        )
        .mount(&server)
        .await;

    let areas = client.list_areas().await.unwrap();

    assert_eq!(areas.len(), 2);
    assert_eq!(areas[0].id, "kitchen");
    assert_eq!(areas[1].id, "garage");
    assert_eq!(areas[1].name, "Garage | Workshop");
}

#[tokio::test]
async fn test_area_entities_posts_template() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .and(body_partial_json(json!({
            "template": "{{ area_entities('kitchen') | join(',') }}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("light.kitchen,sensor.kitchen_temp"))
        .mount(&server)
        .await;

    let entities = client.area_entities("kitchen").await.unwrap();

    assert_eq!(entities, vec!["light.kitchen", "sensor.kitchen_temp"]);
}

#[tokio::test]
async fn test_empty_template_response_is_empty_list() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    assert!(client.device_entities("dev1").await.unwrap().is_empty());
    assert!(client.device_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_device_info_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .and(body_string_contains("device_attr"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"id": "dev1", "name": "Hue Bridge", "manufacturer": "Signify", "model": "BSB002", "area_id": "hall", "area_name": "Hall"}"#,
        ))
        .mount(&server)
        .await;

    match client.device_info("dev1").await {
        DeviceInfoLookup::Found(info) => {
            assert_eq!(info.name, "Hue Bridge");
            assert_eq!(info.area_id, "hall");
        }
        other @ DeviceInfoLookup::Malformed { .. } => panic!("expected Found, got {other:?}"),
    }
}

#[tokio::test]
async fn test_device_info_falls_back_on_bad_json() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\": \"dev1\", \"name\": "))
        .mount(&server)
        .await;

    let lookup = client.device_info("dev1").await;
    assert!(matches!(lookup, DeviceInfoLookup::Malformed { .. }));
}

#[tokio::test]
async fn test_device_info_falls_back_on_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/template"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Error rendering template"))
        .mount(&server)
        .await;

    match client.device_info("dev1").await {
        DeviceInfoLookup::Malformed { device_id, raw } => {
            assert_eq!(device_id, "dev1");
            assert!(raw.contains("400"), "expected status in {raw}");
        }
        DeviceInfoLookup::Found(info) => panic!("expected Malformed, got {info:?}"),
    }
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_is_authentication_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get_states().await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_states_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/states"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    match client.get_states().await {
        Err(Error::Deserialization { body, .. }) => {
            assert_eq!(body, "<html>proxy error</html>");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(503).set_body_string("starting up"))
        .mount(&server)
        .await;

    let err = client.get_config().await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "starting up");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
