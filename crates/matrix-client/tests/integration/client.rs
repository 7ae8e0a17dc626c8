use assert_matches::assert_matches;
use matrix_client::{
    config::{SyncFilter, SyncSettings},
    events::{
        enums::Presence,
        message::TextMessage,
        room::{RoomMessageEvent, RoomTopicEvent},
        EventError,
    },
    Client, Error,
};
use matrix_client_test::{test_json, DEFAULT_TEST_ROOM_ID};
use serde_json::json;
use url::Url;
use wiremock::{
    matchers::{body_partial_json, method, path, path_regex, query_param},
    Mock, MockServer, ResponseTemplate,
};

use crate::{logged_in_client_with_server, mock_sync};

#[tokio::test]
async fn login() {
    let server = MockServer::start().await;
    let client = Client::new(Url::parse(&server.uri()).unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/login"))
        .and(body_partial_json(json!({
            "type": "m.login.password",
            "user": "example",
            "password": "wordpass",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::LOGIN))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!client.logged_in(), "Client should not be logged in");

    let response = client.login_with_password("example", "wordpass", None).await.unwrap();

    assert!(client.logged_in(), "Client should be logged in");
    assert_eq!(response.device_id.as_deref(), Some("GHTYAJCE"));
    assert_eq!(client.user_id().as_deref(), Some("@example:localhost"));
    assert_eq!(client.session().homeserver_name.as_deref(), Some("localhost"));
    assert_eq!(client.base_client().user_id().unwrap(), "@example:localhost");
}

#[tokio::test]
async fn login_error() {
    let server = MockServer::start().await;
    let client = Client::new(Url::parse(&server.uri()).unwrap()).unwrap();

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/login"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&*test_json::FORBIDDEN))
        .mount(&server)
        .await;

    let error = client.login_with_password("example", "wrong", None).await.unwrap_err();

    assert!(error.is_auth_error());
    assert!(!client.logged_in());
}

#[tokio::test]
async fn logout_clears_the_session() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    client.sync_once(SyncSettings::new()).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();

    assert!(!client.logged_in());
    assert!(client.rooms().is_empty());
    assert!(client.sync_token().is_none());
}

#[tokio::test]
async fn profile_is_fetched_then_cached() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/profile/@bob:localhost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::PROFILE))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client.get_user_profile("@bob:localhost", None).await.unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Alice Margatroid"));
    assert_eq!(profile.avatar_url.as_deref(), Some("mxc://localhost/wefuiwegh8742w"));

    // Served from the cache, the mock only answers once.
    let profile = client.get_user_profile("@bob:localhost", None).await.unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Alice Margatroid"));
}

#[tokio::test]
async fn member_profile_comes_from_the_room() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    client.sync_once(SyncSettings::new()).await.unwrap();

    let profile =
        client.get_user_profile("@alice:localhost", Some(DEFAULT_TEST_ROOM_ID)).await.unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Alice Margatroid"));
}

#[tokio::test]
async fn presence_is_fetched_then_cached() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/presence/@bob:localhost/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::PRESENCE_STATUS))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_user_presence("@bob:localhost").await.unwrap(), Presence::Unavailable);
    assert_eq!(client.get_user_presence("@bob:localhost").await.unwrap(), Presence::Unavailable);
}

#[tokio::test]
async fn presence_from_sync() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    client.sync_once(SyncSettings::new()).await.unwrap();

    assert_eq!(client.get_user_presence("@example:localhost").await.unwrap(), Presence::Online);
}

#[tokio::test]
async fn send_message() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("PUT"))
        .and(path_regex(
            r"^/_matrix/client/r0/rooms/!testroom:example.org/send/m\.room\.message/m\d+\.\d+$",
        ))
        .and(body_partial_json(json!({ "msgtype": "m.text", "body": "Hello world" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EVENT_ID))
        .expect(2)
        .mount(&server)
        .await;

    let event = RoomMessageEvent::new(TextMessage::plain("Hello world"));
    let event_id = client.send("!testroom:example.org", &event).await.unwrap();
    assert_eq!(event_id, "$h29iv0s8:example.com");

    client.send("!testroom:example.org", &event).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].url.path(), requests[1].url.path(), "Transaction ids are reused");
}

#[tokio::test]
async fn send_state_with_an_empty_state_key() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("PUT"))
        .and(path("/_matrix/client/r0/rooms/!testroom:example.org/state/m.room.topic/"))
        .and(body_partial_json(json!({ "topic": "Hello" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EVENT_ID))
        .expect(1)
        .mount(&server)
        .await;

    let event = RoomTopicEvent::new("Hello");
    let event_id = client.send_state("!testroom:example.org", &event).await.unwrap();
    assert_eq!(event_id, "$h29iv0s8:example.com");
}

#[tokio::test]
async fn incomplete_event_sends_nothing() {
    let (client, server) = logged_in_client_with_server().await;

    let event = RoomTopicEvent::default();
    assert_matches!(
        client.send_state("!testroom:example.org", &event).await,
        Err(Error::Event(EventError::Incomplete { .. }))
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn join_leave_and_forget() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    client.sync_once(SyncSettings::new()).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/join/!testroom:example.org"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::ROOM_ID))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/_matrix/client/r0/rooms/.*/(leave|forget)$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .mount(&server)
        .await;

    let room_id = client.join_room("!testroom:example.org").await.unwrap();
    assert_eq!(room_id, "!testroom:example.org");

    client.leave_room(DEFAULT_TEST_ROOM_ID).await.unwrap();
    assert!(client.get_room_by_id(DEFAULT_TEST_ROOM_ID).is_some(), "Left rooms stay cached");

    client.forget_room(DEFAULT_TEST_ROOM_ID).await.unwrap();
    assert!(client.get_room_by_id(DEFAULT_TEST_ROOM_ID).is_none());
}

#[tokio::test]
async fn room_lookup_by_alias() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    client.sync_once(SyncSettings::new()).await.unwrap();

    let room = client.get_room_by_alias("#tutorial:localhost").unwrap();
    assert_eq!(room.room_id(), DEFAULT_TEST_ROOM_ID);
    assert!(client.get_room_by_alias("#nowhere:localhost").is_none());
}

#[tokio::test]
async fn sync_filter_by_id() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("filter", "66696p746572"))
        .and(query_param("set_presence", "offline"))
        .and(query_param("full_state", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::SYNC))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SyncSettings::new()
        .filter(SyncFilter::FilterId("66696p746572".to_owned()))
        .set_presence(Presence::Offline)
        .full_state(true);
    client.sync_once(settings).await.unwrap();
}
