use assert_matches::assert_matches;
use matrix_client::{ErrorKind, PollingNotice, PollingState, RefreshTokenError};
use matrix_client_test::{test_json, TEST_ACCESS_TOKEN};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::{logged_in_client, logged_in_client_with_server, wait_until};

async fn mock_rejected_token(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("access_token", TEST_ACCESS_TOKEN))
        .respond_with(ResponseTemplate::new(401).set_body_json(&*test_json::UNKNOWN_TOKEN))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_stores_the_refresh_token() {
    let server = MockServer::start().await;
    let client = logged_in_client(&server);

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&*test_json::LOGIN_WITH_REFRESH_TOKEN),
        )
        .mount(&server)
        .await;

    client.login_with_password("example", "wordpass", None).await.unwrap();

    assert_eq!(client.session().refresh_token.as_deref(), Some("zyx987"));
}

#[tokio::test]
async fn refresh_access_token() {
    let (client, server) = logged_in_client_with_server().await;
    client.api().set_refresh_token(Some("zyx987".to_owned()));

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/tokenrefresh"))
        .and(body_json(json!({ "refresh_token": "zyx987" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::REFRESH_TOKEN))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.refresh_access_token().await.unwrap(), "5678");

    let session = client.session();
    assert_eq!(session.access_token.as_deref(), Some("5678"));
    assert_eq!(session.refresh_token.as_deref(), Some("wxyz"));
    // The identity of the session is kept.
    assert_eq!(session.user_id.as_deref(), Some("@example:localhost"));
}

#[tokio::test]
async fn refresh_without_a_new_token() {
    let (client, server) = logged_in_client_with_server().await;
    client.api().set_refresh_token(Some("zyx987".to_owned()));

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/tokenrefresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&*test_json::REFRESH_TOKEN_WITHOUT_TOKEN),
        )
        .mount(&server)
        .await;

    assert_matches!(client.refresh_access_token().await, Err(RefreshTokenError::NoAccessToken));
    assert_eq!(client.session().access_token.as_deref(), Some(TEST_ACCESS_TOKEN));
}

#[tokio::test]
async fn polling_stops_when_the_refresh_fails() {
    let (client, server) = logged_in_client_with_server().await;
    client.api().set_refresh_token(Some("zyx987".to_owned()));
    mock_rejected_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/tokenrefresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(&*test_json::REFRESH_TOKEN_WITHOUT_TOKEN),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut notices = client.subscribe_to_polling_state();
    client.begin_polling();

    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);
    let error =
        assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(Some(e)) => e);

    // The error that stopped polling is the rejected token, not the refresh.
    assert_eq!(error.api_error_kind(), Some(&ErrorKind::UnknownToken));
    assert_eq!(client.polling_state(), PollingState::Stopped);

    let session = client.session();
    assert!(session.access_token.is_none());
    assert!(session.refresh_token.is_none());
    assert!(!client.logged_in());
}

#[tokio::test]
async fn polling_stops_without_a_refresh_token() {
    let (client, server) = logged_in_client_with_server().await;
    mock_rejected_token(&server).await;

    let mut notices = client.subscribe_to_polling_state();
    client.begin_polling();

    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);
    let error =
        assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(Some(e)) => e);
    assert!(error.is_auth_error());
    assert!(server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .all(|request| request.url.path() != "/_matrix/client/r0/tokenrefresh"));
}

#[tokio::test]
async fn polling_resumes_after_a_refresh() {
    let (client, server) = logged_in_client_with_server().await;
    client.api().set_refresh_token(Some("zyx987".to_owned()));
    mock_rejected_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/tokenrefresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::REFRESH_TOKEN))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("access_token", "5678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::SYNC))
        .mount(&server)
        .await;

    let mut notices = client.subscribe_to_polling_state();
    client.begin_polling();
    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);

    wait_until(|| client.sync_token().is_some()).await;
    assert_eq!(client.polling_state(), PollingState::Polling);
    assert_eq!(client.session().refresh_token.as_deref(), Some("wxyz"));

    client.stop_polling(true);
    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(None));
}
