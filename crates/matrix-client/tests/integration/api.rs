use assert_matches::assert_matches;
use bytes::Bytes;
use matrix_client::{
    api::{CreateRoomRequest, NewPushRule},
    events::enums::{PushRuleKind, ResizeMethod, RoomVisibility},
    Error, ErrorKind, HttpError,
};
use matrix_client_test::test_json;
use serde_json::json;
use wiremock::{
    matchers::{
        body_json, body_partial_json, header, method, path, query_param, query_param_is_missing,
    },
    Mock, ResponseTemplate,
};

use crate::logged_in_client_with_server;

#[tokio::test]
async fn errcodes_are_mapped() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/profile/@teapot:localhost"))
        .respond_with(ResponseTemplate::new(418).set_body_json(&*test_json::UNKNOWN_ERRCODE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/profile/@broken:localhost"))
        .respond_with(ResponseTemplate::new(500).set_body_json(&*test_json::UNSPECIFIED_ERROR))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/profile/@nobody:localhost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&*test_json::NOT_FOUND))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/profile/@gone:localhost"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let error = client.api().get_profile("@teapot:localhost").await.unwrap_err();
    assert_eq!(
        error.api_error_kind(),
        Some(&ErrorKind::UnknownHomeserverError("ORG_EXAMPLE_TEAPOT".to_owned()))
    );
    assert_eq!(error.as_api_error().unwrap().message, "I'm a teapot.");

    let error = client.api().get_profile("@broken:localhost").await.unwrap_err();
    assert_eq!(error.api_error_kind(), Some(&ErrorKind::Unspecified));

    let error = client.api().get_profile("@nobody:localhost").await.unwrap_err();
    assert_eq!(error.api_error_kind(), Some(&ErrorKind::NotFound));
    assert_eq!(error.as_api_error().unwrap().status, 404);

    let error = client.api().get_profile("@gone:localhost").await.unwrap_err();
    assert_matches!(error, Error::Http(HttpError::Status(status)) if status == 502);
}

#[tokio::test]
async fn access_token_is_a_query_parameter() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("PUT"))
        .and(path("/_matrix/client/r0/profile/@example:localhost/displayname"))
        .and(query_param("access_token", "abc123"))
        .and(body_json(json!({ "displayname": "Example" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;

    client.api().set_display_name("@example:localhost", Some("Example")).await.unwrap();
}

#[tokio::test]
async fn unauthenticated_requests_carry_no_token() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/versions"))
        .and(query_param_is_missing("access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::VERSIONS))
        .expect(1)
        .mount(&server)
        .await;

    let versions = client.api().versions().await.unwrap();
    assert_eq!(versions.len(), 7);
    assert_eq!(versions.last().map(String::as_str), Some("r0.6.0"));
}

#[tokio::test]
async fn missing_parameters_fail_before_sending() {
    let (client, server) = logged_in_client_with_server().await;

    assert_matches!(client.api().get_profile("").await, Err(Error::MissingParameter("user_id")));
    assert_matches!(client.join_room("").await, Err(Error::MissingParameter(_)));
    assert_matches!(
        client.api().set_typing("!room:localhost", "@example:localhost", true, None).await,
        Err(Error::MissingParameter("timeout"))
    );

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn push_rules() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/pushrules/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::PUSH_RULES_RESPONSE))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/_matrix/client/r0/pushrules/global/content/cake"))
        .and(query_param("before", "nocake"))
        .and(body_json(json!({ "actions": ["notify"], "pattern": "cake*lie" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/_matrix/client/r0/pushrules/global/room/!room:localhost/enabled"))
        .and(body_json(json!({ "enabled": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;

    let rules = client.api().get_push_rules().await.unwrap();
    assert!(rules.get("global").is_some());

    let rule = NewPushRule {
        actions: vec![json!("notify")],
        pattern: Some("cake*lie".to_owned()),
        before: Some("nocake".to_owned()),
        ..Default::default()
    };
    client.api().add_push_rule("global", PushRuleKind::Content, "cake", &rule).await.unwrap();

    client
        .api()
        .set_push_rule_enabled("global", PushRuleKind::Room, "!room:localhost", false)
        .await
        .unwrap();

    let without_pattern = NewPushRule { actions: vec![json!("notify")], ..Default::default() };
    assert_matches!(
        client.api().add_push_rule("global", PushRuleKind::Content, "cake", &without_pattern).await,
        Err(Error::MissingParameter("pattern"))
    );
}

#[tokio::test]
async fn media() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("POST"))
        .and(path("/_matrix/media/r0/upload"))
        .and(query_param("filename", "cat.png"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::UPLOAD))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/media/r0/download/example.com/AQwafuaFswefuhsfAFAgsw"))
        .and(query_param_is_missing("access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"cat".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/media/r0/thumbnail/example.com/AQwafuaFswefuhsfAFAgsw"))
        .and(query_param("width", "32"))
        .and(query_param("height", "32"))
        .and(query_param("method", "crop"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"kitten".to_vec()))
        .mount(&server)
        .await;

    let uri = client
        .api()
        .upload(&mime::IMAGE_PNG, Some("cat.png"), Bytes::from_static(b"cat"))
        .await
        .unwrap();
    assert_eq!(uri, "mxc://example.com/AQwafuaFswefuhsfAFAgsw");

    assert_eq!(client.api().download_mxc(&uri).await.unwrap(), Bytes::from_static(b"cat"));

    let thumbnail = client
        .api()
        .thumbnail(
            "example.com",
            "AQwafuaFswefuhsfAFAgsw",
            Some(32),
            Some(32),
            Some(ResizeMethod::Crop),
        )
        .await
        .unwrap();
    assert_eq!(thumbnail, Bytes::from_static(b"kitten"));

    assert_matches!(
        client.api().download_mxc("https://example.com").await,
        Err(Error::InvalidArgument(_))
    );
}

#[tokio::test]
async fn thumbnail_without_a_size() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/media/r0/thumbnail/example.com/AQwafuaFswefuhsfAFAgsw"))
        .and(query_param_is_missing("width"))
        .and(query_param_is_missing("height"))
        .and(query_param_is_missing("method"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"kitten".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let thumbnail = client
        .api()
        .thumbnail("example.com", "AQwafuaFswefuhsfAFAgsw", None, None, None)
        .await
        .unwrap();
    assert_eq!(thumbnail, Bytes::from_static(b"kitten"));
}

#[tokio::test]
async fn rooms_and_membership() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/createRoom"))
        .and(body_partial_json(json!({ "name": "Cake", "visibility": "private" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::CREATE_ROOM))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/rooms/!testroom:example.org/invite"))
        .and(body_json(json!({ "user_id": "@alice:localhost" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/_matrix/client/r0/rooms/!testroom:example.org/kick"))
        .and(body_json(json!({ "user_id": "@alice:localhost", "reason": "Ate the cake" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::EMPTY))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/directory/room/%23tutorial:localhost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::GET_ALIAS))
        .mount(&server)
        .await;

    let request = CreateRoomRequest {
        name: Some("Cake".to_owned()),
        visibility: Some(RoomVisibility::Private),
        ..Default::default()
    };
    let room_id = client.api().create_room(&request).await.unwrap();
    assert!(room_id.starts_with('!'));

    client.api().invite_user("!testroom:example.org", "@alice:localhost").await.unwrap();
    client
        .api()
        .kick_user("!testroom:example.org", "@alice:localhost", Some("Ate the cake"))
        .await
        .unwrap();

    let alias = client.api().get_room_id("#tutorial:localhost").await.unwrap();
    assert!(alias.room_id.starts_with('!'));
}
