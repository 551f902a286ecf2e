//! Backend client tests (using WireMock)
//! These tests are fast and don't require any running backend service.

use forum_gateway::backend::http::build_client;
use forum_gateway::backend::{
    CommentBackend, CommentClient, ContentBackend, ContentClient, CredentialCache,
    IdentityBackend, IdentityClient, StatsBackend, StatsClient,
};
use forum_gateway::error::BackendError;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client() -> reqwest::Client {
    build_client(Duration::from_secs(2)).unwrap()
}

fn create_identity_client(base_url: &str) -> IdentityClient {
    IdentityClient::new(
        base_url,
        http_client(),
        CredentialCache::new("UserAPI", "test-secret"),
    )
}

fn user_json() -> serde_json::Value {
    json!({"uid": "u1", "username": "alice", "is_admin": false})
}

async fn mount_service_token(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path("/service-token"))
        .and(body_json(json!({"app_id": "UserAPI", "app_secret": "test-secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_service_token_is_issued_once_and_reused() {
    let mock_server = MockServer::start().await;
    mount_service_token(&mock_server, "svc-1", 1).await;

    Mock::given(method("GET"))
        .and(path("/users/by-token"))
        .and(header("authorization", "Bearer svc-1"))
        .and(header("x-user-token", "user-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_identity_client(&mock_server.uri());

    for _ in 0..2 {
        let user = client.get_user_by_access_token("user-token").await.unwrap();
        assert_eq!(user.uid, "u1");
    }
    assert_eq!(client.credential().cached().await.as_deref(), Some("svc-1"));
}

#[tokio::test]
async fn test_rejected_service_token_is_refreshed_exactly_once() {
    let mock_server = MockServer::start().await;
    mount_service_token(&mock_server, "svc-old", 1).await;
    mount_service_token(&mock_server, "svc-new", 1).await;

    Mock::given(method("GET"))
        .and(path("/users/by-token"))
        .and(header("authorization", "Bearer svc-old"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/by-token"))
        .and(header("authorization", "Bearer svc-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_identity_client(&mock_server.uri());
    let user = client.get_user_by_access_token("user-token").await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(client.credential().cached().await.as_deref(), Some("svc-new"));
}

#[tokio::test]
async fn test_second_rejection_is_surfaced() {
    let mock_server = MockServer::start().await;
    mount_service_token(&mock_server, "svc-1", 1).await;
    mount_service_token(&mock_server, "svc-2", 1).await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(403).set_body_string("revoked"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = create_identity_client(&mock_server.uri());
    let result = client
        .create_user(&forum_gateway::domain::CreateUserInput {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })
        .await;

    assert_eq!(
        result.unwrap_err(),
        BackendError::Unauthenticated("identity: revoked".to_string())
    );
}

#[tokio::test]
async fn test_public_identity_lookups_carry_no_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // No service-token mock: issuing one would hit an unmatched route
    let client = create_identity_client(&mock_server.uri());
    let user = client.get_user_info("u1").await.unwrap();

    assert_eq!(user.uid, "u1");
    assert_eq!(client.credential().cached().await, None);
}

#[tokio::test]
async fn test_unavailable_backend_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stats/p1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = StatsClient::new(&mock_server.uri(), http_client());
    let err = client.get_post_stats("p1").await.unwrap_err();

    assert!(err.is_unavailable());
}

#[tokio::test]
async fn test_unreachable_backend_is_unavailable() {
    // Nothing listens on the discard port
    let client = ContentClient::new("http://127.0.0.1:9", http_client());
    let err = client.get_post("p1").await.unwrap_err();

    assert!(err.is_unavailable(), "{:?}", err);
}

#[tokio::test]
async fn test_not_found_carries_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts/missing/owner"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such post"})))
        .mount(&mock_server)
        .await;

    let client = ContentClient::new(&mock_server.uri(), http_client());
    let err = client.get_post_owner("missing").await.unwrap_err();

    assert_eq!(err, BackendError::NotFound("content: no such post".to_string()));
}

#[tokio::test]
async fn test_list_posts_sends_pagination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("page", "2"))
        .and(query_param("size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "uid": "p1",
            "user_uid": "u1",
            "category_uid": "c1",
            "title": "Hello",
            "url": "",
            "created_at": "2024-01-01T00:00:00Z",
            "modified_at": "2024-01-01T00:00:00Z"
        }])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ContentClient::new(&format!("{}/", mock_server.uri()), http_client());
    let posts = client.list_posts(2, 5).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Hello");
}

#[tokio::test]
async fn test_like_posts_user_uid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/stats/p1/like"))
        .and(body_json(json!({"user_uid": "u1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "first_time": false})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StatsClient::new(&mock_server.uri(), http_client());
    let vote = client.like_post("p1", "u1").await.unwrap();

    assert!(vote.success);
    assert!(!vote.first_time);
}

#[tokio::test]
async fn test_remove_content_conflict_is_invalid_argument() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments/k1/remove-content"))
        .respond_with(ResponseTemplate::new(409).set_body_string("already removed"))
        .mount(&mock_server)
        .await;

    let client = CommentClient::new(&mock_server.uri(), http_client());
    let err = client.remove_content("k1").await.unwrap_err();

    assert_eq!(err.kind(), "invalid_argument");
}
