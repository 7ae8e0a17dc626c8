use std::time::Duration;

use matrix_client::{Client, SessionFile};
use matrix_client_test::{test_json, TEST_ACCESS_TOKEN, TEST_USER_ID};
use serde::Serialize;
use url::Url;
use wiremock::{
    matchers::{method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

mod api;
mod client;
mod refresh_token;
mod session;
mod sync;

matrix_client_test::init_tracing_for_tests!();

/// A client for the given mock server with a restored session.
fn logged_in_client(server: &MockServer) -> Client {
    let client = Client::new(Url::parse(&server.uri()).unwrap()).unwrap();
    client.restore_session(&SessionFile {
        base_url: server.uri(),
        validate_certificate: true,
        user_id: Some(TEST_USER_ID.to_owned()),
        homeserver_name: Some("localhost".to_owned()),
        access_token: Some(TEST_ACCESS_TOKEN.to_owned()),
        refresh_token: None,
    });

    client
}

async fn logged_in_client_with_server() -> (Client, MockServer) {
    let server = MockServer::start().await;
    let client = logged_in_client(&server);
    (client, server)
}

/// Mount a Mock on the given server to handle the `GET /sync` endpoint with
/// an optional `since` param that returns a 200 status code with the given
/// response body.
async fn mock_sync(server: &MockServer, response_body: impl Serialize, since: Option<&str>) {
    let mut builder = Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("access_token", TEST_ACCESS_TOKEN));

    if let Some(since) = since {
        builder = builder.and(query_param("since", since));
    } else {
        builder = builder.and(query_param_is_missing("since"));
    }

    builder
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .mount(server)
        .await;
}

/// Wait until `condition` holds, failing the test after a few seconds.
async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
