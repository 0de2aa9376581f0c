use std::{net::Ipv4Addr, time::Duration};

use jash_extern_contracts::upstream::{UpstreamApiService, UpstreamError};
use jash_extern_impl::{
    http::HttpClient,
    upstream::{UpstreamApiServiceConfig, UpstreamApiServiceImpl},
};
use jash_models::{
    contact::{ContactFields, ContactSubmission},
    upstream::UpstreamBody,
};
use jash_testing::upstream::{Behavior, FakeUpstream};
use jash_utils::assert_matches;
use serde_json::json;
use url::Url;

fn submission() -> ContactSubmission {
    ContactFields {
        name: "Max Mustermann".into(),
        email: "max@example.de".into(),
        category: "General".into(),
        message: "Hello World!".into(),
        website: String::new(),
    }
    .validate()
    .unwrap()
}

fn service(base_url: Url, timeout: Duration) -> UpstreamApiServiceImpl {
    let config = UpstreamApiServiceConfig::new(base_url, timeout).unwrap();
    UpstreamApiServiceImpl::new(config, HttpClient::new().unwrap())
}

async fn spawn(behavior: Behavior) -> (FakeUpstream, UpstreamApiServiceImpl) {
    let upstream = FakeUpstream::spawn(behavior).await.unwrap();
    let sut = service(upstream.url(), Duration::from_secs(10));
    (upstream, sut)
}

#[tokio::test]
async fn forward_accepted() {
    let (upstream, sut) = spawn(Behavior::Accept).await;

    let result = sut.forward(&submission()).await.unwrap();

    assert!(result.ok);
    assert_eq!(result.status, 201);
    assert_eq!(result.body, UpstreamBody::Json(json!({"id": 1, "ok": true})));
    assert_eq!(
        upstream.received(),
        [json!({
            "name": "Max Mustermann",
            "email": "max@example.de",
            "category": "General",
            "message": "Hello World!",
        })]
    );
}

#[tokio::test]
async fn forward_rejected() {
    let (_upstream, sut) = spawn(Behavior::Reject).await;

    let result = sut.forward(&submission()).await.unwrap();

    assert!(!result.ok);
    assert_eq!(result.status, 400);
    assert_eq!(
        result.body,
        UpstreamBody::Json(json!({"email": ["Enter a valid email address."]}))
    );
}

#[tokio::test]
async fn forward_server_error() {
    let (_upstream, sut) = spawn(Behavior::Fail).await;

    let result = sut.forward(&submission()).await.unwrap();

    assert!(!result.ok);
    assert_eq!(result.status, 500);
    assert_eq!(
        result.body,
        UpstreamBody::Text("<h1>Server Error (500)</h1>".into())
    );
}

#[tokio::test]
async fn forward_text_and_empty() {
    let (_upstream, sut) = spawn(Behavior::Text).await;
    let result = sut.forward(&submission()).await.unwrap();
    assert!(result.ok);
    assert_eq!(result.body, UpstreamBody::Text("Thanks for reaching out!".into()));

    let (_upstream, sut) = spawn(Behavior::Empty).await;
    let result = sut.forward(&submission()).await.unwrap();
    assert!(result.ok);
    assert_eq!(result.status, 200);
    assert_eq!(result.body, UpstreamBody::Empty);
}

#[tokio::test]
async fn forward_timeout() {
    let upstream = FakeUpstream::spawn(Behavior::Hang).await.unwrap();
    let sut = service(upstream.url(), Duration::from_millis(200));

    let result = sut.forward(&submission()).await;

    assert_matches!(result, Err(UpstreamError::Timeout));
}

#[tokio::test]
async fn forward_unreachable() {
    let listener = std::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let sut = service(
        format!("http://{addr}/").parse().unwrap(),
        Duration::from_secs(10),
    );

    let result = sut.forward(&submission()).await;

    assert_matches!(result, Err(UpstreamError::Network(_)));
}

#[tokio::test]
async fn probe() {
    let (_upstream, sut) = spawn(Behavior::Accept).await;
    let result = sut.probe().await.unwrap();
    assert!(result.ok);
    assert_eq!(result.status, 200);

    let (_upstream, sut) = spawn(Behavior::Fail).await;
    let result = sut.probe().await.unwrap();
    assert!(!result.ok);
    assert_eq!(result.status, 503);
}
