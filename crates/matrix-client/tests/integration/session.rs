use assert_matches::assert_matches;
use matrix_client::{config::ClientConfig, Client, Error, HttpError, SessionFile};
use matrix_client_test::{test_json, TEST_ACCESS_TOKEN, TEST_USER_ID};
use serde_json::json;
use tempfile::tempdir;
use url::Url;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::{logged_in_client_with_server, mock_sync};

#[tokio::test]
async fn save_and_load_state() {
    let (client, server) = logged_in_client_with_server().await;
    client.api().set_refresh_token(Some("zyx987".to_owned()));

    let dir = tempdir().unwrap();
    let file = dir.path().join("session.json");
    client.save_state(&file).unwrap();

    let saved: serde_json::Value = serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
    assert_json_diff::assert_json_eq!(
        saved,
        json!({
            "base_url": format!("{}/", server.uri()),
            "validate_certificate": true,
            "user_id": TEST_USER_ID,
            "homeserver_name": "localhost",
            "access_token": TEST_ACCESS_TOKEN,
            "refresh_token": "zyx987",
        })
    );

    let restored = Client::load_state(&file, ClientConfig::new()).unwrap();
    assert_eq!(restored.homeserver(), client.homeserver());
    similar_asserts::assert_eq!(restored.session(), client.session());
    assert!(restored.logged_in());

    // The restored client can talk to the homeserver right away.
    mock_sync(&server, &*test_json::SYNC, None).await;
    restored.sync_once(Default::default()).await.unwrap();
    assert!(restored.sync_token().is_some());
}

#[tokio::test]
async fn logged_out_state_has_no_tokens() {
    let server = MockServer::start().await;
    let client = Client::new(Url::parse(&server.uri()).unwrap()).unwrap();

    let dir = tempdir().unwrap();
    let file = dir.path().join("session.json");
    client.save_state(&file).unwrap();

    let saved = SessionFile::load(&file).unwrap();
    assert!(saved.access_token.is_none());
    assert!(saved.user_id.is_none());

    let restored = Client::load_state(&file, ClientConfig::new()).unwrap();
    assert!(!restored.logged_in());
    assert_matches!(
        restored.api().get_profile(TEST_USER_ID).await,
        Err(Error::Http(HttpError::AuthenticationRequired))
    );
}

#[tokio::test]
async fn validate_certificate_comes_from_the_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, r#"{ "base_url": "https://example.org", "validate_certificate": false }"#)
        .unwrap();

    let restored = Client::load_state(&file, ClientConfig::new()).unwrap();
    let path = dir.path().join("saved.json");
    restored.save_state(&path).unwrap();

    assert!(!SessionFile::load(&path).unwrap().validate_certificate);
}

#[tokio::test]
async fn broken_session_files() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert_matches!(Client::load_state(&missing, ClientConfig::new()), Err(Error::Io(_)));

    let incomplete = dir.path().join("incomplete.json");
    std::fs::write(&incomplete, r#"{ "base_url": "https://example.org" }"#).unwrap();
    assert_matches!(
        Client::load_state(&incomplete, ClientConfig::new()),
        Err(Error::SerdeJson(_))
    );

    let bad_url = dir.path().join("bad_url.json");
    std::fs::write(&bad_url, r#"{ "base_url": "not a url", "validate_certificate": true }"#)
        .unwrap();
    assert_matches!(Client::load_state(&bad_url, ClientConfig::new()), Err(Error::Url(_)));
}

#[tokio::test]
async fn login_then_save() {
    let server = MockServer::start().await;
    let client = Client::new(Url::parse(&server.uri()).unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::LOGIN))
        .mount(&server)
        .await;

    client.login_with_password("example", "wordpass", None).await.unwrap();

    let dir = tempdir().unwrap();
    let file = dir.path().join("session.json");
    client.save_state(&file).unwrap();

    let saved = SessionFile::load(&file).unwrap();
    assert_eq!(saved.user_id.as_deref(), Some(TEST_USER_ID));
    assert_eq!(saved.access_token.as_deref(), Some(TEST_ACCESS_TOKEN));
    assert_eq!(saved.homeserver_name.as_deref(), Some("localhost"));
}
