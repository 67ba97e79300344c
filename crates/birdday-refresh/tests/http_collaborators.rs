//! Integration tests for the selector and publisher HTTP clients using
//! wiremock HTTP mocks.

use birdday_core::Location;
use birdday_refresh::{
    BirdDescriptor, BirdSelector, CollaboratorError, ContentPublisher, HttpBirdSelector,
    HttpContentPublisher,
};
use wiremock::matchers::{bearer_token, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reykjavik() -> Location {
    Location::new("Reykjavik", "Capital Region", "Iceland", 64.1466, -21.9426)
}

fn puffin() -> BirdDescriptor {
    BirdDescriptor {
        name: "Atlantic Puffin".to_string(),
        scientific_name: Some("Fratercula arctica".to_string()),
        audio_url: "https://cdn.example/puffin.mp3".to_string(),
        narration: "Clown of the sea.".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn selector_posts_location_and_decodes_bird() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/bird-of-the-day"))
        .and(body_partial_json(serde_json::json!({
            "city": "Reykjavik",
            "country": "Iceland",
            "latitude": 64.1466
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Atlantic Puffin",
            "scientific_name": "Fratercula arctica",
            "audio_url": "https://cdn.example/puffin.mp3",
            "narration": "Clown of the sea."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let selector = HttpBirdSelector::new(&server.uri(), 5, "birdday-test").expect("client");
    let bird = selector
        .select_bird_of_day(&reykjavik())
        .await
        .expect("select");

    assert_eq!(bird, puffin());
}

#[tokio::test]
async fn selector_error_body_is_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/bird-of-the-day"))
        .respond_with(ResponseTemplate::new(503).set_body_string("no birds today\n"))
        .mount(&server)
        .await;

    let selector = HttpBirdSelector::new(&server.uri(), 5, "birdday-test").expect("client");
    let err = selector
        .select_bird_of_day(&reykjavik())
        .await
        .expect_err("503 should fail");

    match err {
        CollaboratorError::Status {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "bird selector");
            assert_eq!(status, 503);
            assert_eq!(body, "no birds today");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn selector_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/bird-of-the-day"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"bird":"?"}"#))
        .mount(&server)
        .await;

    let selector = HttpBirdSelector::new(&server.uri(), 5, "birdday-test").expect("client");
    let err = selector
        .select_bird_of_day(&reykjavik())
        .await
        .expect_err("missing fields should fail");

    assert!(matches!(err, CollaboratorError::Deserialize { .. }));
}

#[tokio::test]
async fn publisher_sends_bird_intro_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cards/card-77/refresh"))
        .and(bearer_token("s3cret"))
        .and(body_partial_json(serde_json::json!({
            "bird": { "name": "Atlantic Puffin" },
            "intro_reference": "intro-9",
            "location": { "city": "Reykjavik" }
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let publisher = HttpContentPublisher::new(
        &format!("{}/api/", server.uri()),
        Some("s3cret".to_string()),
        5,
        "birdday-test",
    )
    .expect("client");

    publisher
        .publish_refresh("card-77", &puffin(), Some("intro-9"), &reykjavik())
        .await
        .expect("publish");
}

#[tokio::test]
async fn publisher_without_token_sends_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cards/card-1/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let publisher =
        HttpContentPublisher::new(&server.uri(), None, 5, "birdday-test").expect("client");
    publisher
        .publish_refresh("card-1", &puffin(), None, &reykjavik())
        .await
        .expect("publish");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert!(body["intro_reference"].is_null());
}

#[tokio::test]
async fn publisher_rejection_surfaces_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/cards/card-1/refresh"))
        .respond_with(ResponseTemplate::new(409).set_body_string("card offline"))
        .mount(&server)
        .await;

    let publisher =
        HttpContentPublisher::new(&server.uri(), None, 5, "birdday-test").expect("client");
    let err = publisher
        .publish_refresh("card-1", &puffin(), None, &reykjavik())
        .await
        .expect_err("409 should fail");

    assert_eq!(err.to_string(), "content publisher returned 409: card offline");
}
