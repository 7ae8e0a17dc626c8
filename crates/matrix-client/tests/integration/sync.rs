use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use assert_matches::assert_matches;
use matrix_client::{
    async_trait,
    base::RoomState,
    config::SyncSettings,
    events::room::RoomTopicEvent,
    Client, Error, ErrorKind, EventEmitter, PollingNotice, PollingState, Room,
};
use matrix_client_test::{test_json, DEFAULT_TEST_ROOM_ID};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::{logged_in_client_with_server, mock_sync, wait_until};

const FIRST_BATCH: &str = "s526_47314_0_7_1_1_1_11444_1";

#[tokio::test]
async fn sync_once_folds_the_response() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;

    let response = client.sync_once(SyncSettings::new()).await.unwrap();

    assert_eq!(response.next_batch, FIRST_BATCH);
    assert_eq!(client.sync_token().as_deref(), Some(FIRST_BATCH));

    let room = client.get_room_by_id(DEFAULT_TEST_ROOM_ID).unwrap();
    assert_eq!(room.state, RoomState::Joined);
    assert_eq!(room.topic.as_deref(), Some("😀"));
    assert!(room.get_member("@alice:localhost").is_some());
}

#[tokio::test]
async fn sync_once_reuses_the_previous_token() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    mock_sync(&server, &*test_json::LEAVE_SYNC, Some(FIRST_BATCH)).await;

    client.sync_once(SyncSettings::new()).await.unwrap();
    let response = client.sync_once(SyncSettings::new()).await.unwrap();

    assert_eq!(response.next_batch, "s526_47314_0_7_1_1_1_11444_3");
    assert_eq!(client.sync_token().as_deref(), Some("s526_47314_0_7_1_1_1_11444_3"));
}

#[tokio::test]
async fn sync_with_a_specific_token() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::INVITE_SYNC, Some("s1234")).await;

    client.sync_once(SyncSettings::new().token("s1234")).await.unwrap();

    let room = client.get_room_by_id("!696r7674:example.com").unwrap();
    assert_eq!(room.state, RoomState::Invited);
}

#[tokio::test]
async fn first_poll_does_not_wait() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("timeout", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::SYNC))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .and(query_param("timeout", "30000"))
        .and(query_param("since", FIRST_BATCH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&*test_json::SYNC))
        .mount(&server)
        .await;

    client.begin_polling();

    tokio::time::timeout(Duration::from_secs(5), async {
        while server.received_requests().await.unwrap().len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    client.stop_polling(true);
}

#[tokio::test]
async fn polling_start_and_stop() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;
    mock_sync(&server, &*test_json::SYNC, Some(FIRST_BATCH)).await;

    let mut notices = client.subscribe_to_polling_state();
    assert_eq!(client.polling_state(), PollingState::Idle);

    client.begin_polling();
    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);
    assert_eq!(client.polling_state(), PollingState::Polling);

    // Beginning again is a no-op.
    client.begin_polling();

    wait_until(|| client.get_room_by_id(DEFAULT_TEST_ROOM_ID).is_some()).await;

    client.stop_polling(true);
    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(None));
    assert_eq!(client.polling_state(), PollingState::Stopped);
    assert!(notices.try_recv().is_err(), "Only one start was announced");
}

#[tokio::test]
async fn polling_stops_on_error() {
    let (client, server) = logged_in_client_with_server().await;

    Mock::given(method("GET"))
        .and(path("/_matrix/client/r0/sync"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&*test_json::NOT_FOUND))
        .mount(&server)
        .await;

    let mut notices = client.subscribe_to_polling_state();
    client.begin_polling();

    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);
    let error =
        assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(Some(e)) => e);
    assert_eq!(error.api_error_kind(), Some(&ErrorKind::NotFound));
    assert_eq!(client.polling_state(), PollingState::Stopped);
}

struct StopOnTopic {
    client: Client,
    seen: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl EventEmitter for StopOnTopic {
    async fn on_room_topic(&self, room: &Room, event: &RoomTopicEvent) {
        self.seen.lock().unwrap().push(event.topic.clone().unwrap_or_default());
        assert_eq!(room.room_id(), DEFAULT_TEST_ROOM_ID);
        self.client.stop_polling(false);
    }
}

#[tokio::test]
async fn emitter_can_stop_polling() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    client.add_event_emitter(Box::new(StopOnTopic { client: client.clone(), seen: seen.clone() }));

    let mut notices = client.subscribe_to_polling_state();
    client.begin_polling();

    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Started);
    assert_matches!(notices.recv().await.unwrap(), PollingNotice::Stopped(None));

    // The response that stopped polling was applied in full.
    wait_until(|| client.sync_token().is_some()).await;
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|topic| topic == "😀"));
}

struct SyncOnTopic {
    client: Client,
    result: Arc<Mutex<Option<matrix_client::Result<()>>>>,
}

#[async_trait]
impl EventEmitter for SyncOnTopic {
    async fn on_room_topic(&self, _: &Room, _: &RoomTopicEvent) {
        let result = self.client.sync_once(SyncSettings::new()).await.map(|_| ());
        *self.result.lock().unwrap() = Some(result);
    }
}

#[tokio::test]
async fn syncing_from_an_emitter_fails_instead_of_hanging() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;

    let result = Arc::new(Mutex::new(None));
    let emitter = SyncOnTopic { client: client.clone(), result: result.clone() };
    client.add_event_emitter(Box::new(emitter));

    tokio::time::timeout(Duration::from_secs(5), client.sync_once(SyncSettings::new()))
        .await
        .expect("the sync finished")
        .unwrap();

    assert_matches!(result.lock().unwrap().take(), Some(Err(Error::InvalidState(_))));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn a_stopped_client_does_not_sync_again() {
    let (client, server) = logged_in_client_with_server().await;
    mock_sync(&server, &*test_json::SYNC, None).await;

    client.begin_polling();
    client.stop_polling(true);

    assert_eq!(client.polling_state(), PollingState::Stopped);
    // A request started before stopping is dropped, its response never
    // applied.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(client.sync_token().is_none());
}
