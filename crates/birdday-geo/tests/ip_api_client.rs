//! Integration tests for `IpApiClient` using wiremock HTTP mocks.

use std::net::IpAddr;

use birdday_core::placeholder_location;
use birdday_geo::{GeoError, IpApiClient, IpLocationResolver, Resolution};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> IpApiClient {
    IpApiClient::new(base_url, 5, "birdday-test", placeholder_location())
        .expect("client construction should not fail")
}

fn ip(s: &str) -> IpAddr {
    s.parse().expect("ip literal")
}

#[tokio::test]
async fn resolves_real_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/8.8.8.8"))
        .and(query_param(
            "fields",
            "status,message,city,regionName,country,lat,lon,query",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "country": "United States",
            "regionName": "California",
            "city": "Mountain View",
            "lat": 37.386,
            "lon": -122.0838,
            "query": "8.8.8.8"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolution = client.resolve(ip("8.8.8.8")).await.expect("resolve");

    let Resolution::Resolved(location) = resolution else {
        panic!("expected a resolved location");
    };
    assert_eq!(location.city, "Mountain View");
    assert_eq!(location.region, "California");
    assert_eq!(location.source_ip, Some(ip("8.8.8.8")));
}

#[tokio::test]
async fn data_center_default_is_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/203.0.113.10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "country": "United States",
            "regionName": "New York",
            "city": "New York",
            "lat": 40.7128,
            "lon": -74.006,
            "query": "203.0.113.10"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let resolution = client.resolve(ip("203.0.113.10")).await.expect("resolve");
    assert_eq!(resolution, Resolution::Placeholder);
}

#[tokio::test]
async fn provider_failure_is_lookup_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/10.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range",
            "query": "10.0.0.1"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.resolve(ip("10.0.0.1")).await.unwrap_err();
    assert!(
        matches!(err, GeoError::Lookup { ref message, .. } if message == "private range"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn rate_limited_response_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.resolve(ip("1.1.1.1")).await.unwrap_err();
    assert!(matches!(err, GeoError::Http(_)), "got: {err:?}");
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.resolve(ip("1.1.1.1")).await.unwrap_err();
    assert!(matches!(err, GeoError::Deserialize { .. }), "got: {err:?}");
}
