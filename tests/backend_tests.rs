// Tests for the hosted backend REST clients against a mock server

use chrono::Utc;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;
use todotrip_compat::models::{PersonalityResult, TraitProfile};
use todotrip_compat::services::{
    AuthClient, AuthError, AuthProvider, HostedError, HostedStore, ProfileStore, SessionMachine, StoreError,
};
use uuid::Uuid;

const TABLE_PATH: &str = "/rest/v1/personality_results";

fn store(url: String) -> HostedStore {
    HostedStore::new(
        url,
        "service-key".to_string(),
        "personality_results".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn auth(url: String) -> AuthClient {
    AuthClient::new(url, "anon-key".to_string(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_existing_row() {
    let mut server = Server::new_async().await;
    let test_id = Uuid::new_v4();

    let mock = server
        .mock("GET", TABLE_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_id".into(), "eq.user-1".into()),
            Matcher::UrlEncoded("select".into(), "*".into()),
        ]))
        .match_header("apikey", "service-key")
        .match_header("authorization", "Bearer service-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "test_id": test_id,
                "user_id": "user-1",
                "openness": 80.0,
                "conscientiousness": 40.0,
                "extraversion": 25.0,
                "agreeableness": 60.0,
                "neuroticism": 35.0,
                "completed_at": "2025-06-01T12:00:00Z"
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let result = store(server.url()).fetch("user-1").await.unwrap().unwrap();

    assert_eq!(result.test_id, test_id);
    assert_eq!(result.profile, TraitProfile::new(80.0, 40.0, 25.0, 60.0, 35.0));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_missing_row_is_none() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", TABLE_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    assert_eq!(store(server.url()).fetch("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn test_upsert_sends_merge_duplicates() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", TABLE_PATH)
        .match_query(Matcher::UrlEncoded("on_conflict".into(), "user_id".into()))
        .match_header("prefer", Matcher::Regex("resolution=merge-duplicates".into()))
        .match_body(Matcher::Regex(r#""user_id":"user-1""#.into()))
        .with_status(201)
        .create_async()
        .await;

    let result = PersonalityResult {
        test_id: Uuid::new_v4(),
        user_id: "user-1".to_string(),
        profile: TraitProfile::uniform(50.0),
        completed_at: Utc::now(),
    };

    store(server.url()).upsert(&result).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_store_error_mapping() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", TABLE_PATH)
        .match_query(Matcher::Regex("user_id=eq.locked".into()))
        .with_status(401)
        .create_async()
        .await;
    server
        .mock("GET", TABLE_PATH)
        .match_query(Matcher::Regex("user_id=eq.broken".into()))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let store = store(server.url());

    assert!(matches!(
        store.fetch("locked").await,
        Err(StoreError::Hosted(HostedError::Unauthorized))
    ));
    assert!(matches!(
        store.fetch("broken").await,
        Err(StoreError::Hosted(HostedError::ApiError(_)))
    ));
}

#[tokio::test]
async fn test_delete_reports_removed_rows() {
    let mut server = Server::new_async().await;

    server
        .mock("DELETE", TABLE_PATH)
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.user-1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "user_id": "user-1" }]).to_string())
        .create_async()
        .await;

    assert!(store(server.url()).delete("user-1").await.unwrap());
}

fn token_body() -> String {
    json!({
        "access_token": "access-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": { "id": "user-1", "email": "traveller@todotrip.test" }
    })
    .to_string()
}

#[tokio::test]
async fn test_password_sign_in_through_state_machine() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .match_header("apikey", "anon-key")
        .match_body(Matcher::Json(json!({ "email": "traveller@todotrip.test", "password": "secret-pw" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(token_body())
        .create_async()
        .await;

    let client = auth(server.url());
    let mut machine = SessionMachine::new();
    let session = machine
        .sign_in(&client, "traveller@todotrip.test", "secret-pw")
        .await
        .unwrap();

    assert_eq!(session.user_id, "user-1");
    assert_eq!(session.refresh_token, "refresh-1");
    assert!(session.expires_at > Utc::now());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bad_credentials_and_expired_refresh() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "password".into()))
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/auth/v1/token")
        .match_query(Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()))
        .with_status(400)
        .create_async()
        .await;

    let client = auth(server.url());

    assert!(matches!(
        client.sign_in_with_password("a@b.test", "nope").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        client.refresh_session("stale").await,
        Err(AuthError::SessionExpired)
    ));
}

#[tokio::test]
async fn test_sign_out_tolerates_revoked_token() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/auth/v1/logout")
        .match_header("authorization", "Bearer access-1")
        .with_status(401)
        .create_async()
        .await;

    assert!(auth(server.url()).sign_out("access-1").await.is_ok());
}
