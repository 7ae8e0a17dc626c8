// Copyright 2024 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    fmt::{self, Debug},
    path::Path,
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use matrix_client_base::{
    events::{
        enums::{AccountKind, Presence},
        Event, EventFactory, JsonValue,
    },
    sync::SyncResponse,
    BaseClient, EventEmitter, Profile, Room,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::{
    api::{require, Api, LoginResponse, SessionTokens},
    config::{ClientConfig, SyncSettings, SyncToken},
    http_client::{ReqwestTransport, Transport},
    session::SessionFile,
    Error, HttpError, RefreshTokenError, Result,
};

tokio::task_local! {
    /// Set while a sync response is folded into the caches.
    static APPLYING_SYNC: ();
}

/// The state of the sync loop of a [`Client`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollingState {
    /// Polling was never started.
    #[default]
    Idle,
    /// A sync request is in flight, or its response is being applied.
    Polling,
    /// The access token was rejected and a new one is being requested.
    Reauthenticating,
    /// Polling was stopped, explicitly or because of an error.
    Stopped,
}

/// A notification about the sync loop, see
/// [`Client::subscribe_to_polling_state`].
#[derive(Clone, Debug)]
pub enum PollingNotice {
    /// Polling started.
    Started,
    /// Polling stopped, with the error that stopped it if it didn't stop
    /// because of [`Client::stop_polling`].
    Stopped(Option<Arc<Error>>),
}

#[derive(Debug, Default)]
struct PollingControl {
    state: PollingState,
    /// Bumped each time polling starts or stops, a loop only keeps going
    /// while this is the run it was started for.
    run: u64,
    /// Aborts the sync request in flight.
    abort: Option<AbortHandle>,
}

struct ClientInner {
    api: Api,
    base_client: BaseClient,
    validate_certificate: bool,
    sync_settings: RwLock<SyncSettings>,
    polling: Mutex<PollingControl>,
    /// Held while a sync request is in flight and its response applied, so
    /// there is only ever one.
    sync_lock: tokio::sync::Mutex<()>,
    polling_notices: broadcast::Sender<PollingNotice>,
}

/// An async/await enabled Matrix client.
///
/// All of the state is held in an `Arc` so the `Client` can be cloned freely.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[cfg(not(tarpaulin_include))]
impl Debug for Client {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "Client {{ homeserver: {} }}", self.homeserver())
    }
}

impl Client {
    /// Creates a new client for making HTTP requests to the given homeserver.
    ///
    /// # Arguments
    ///
    /// * `homeserver_url` - The homeserver that the client should connect to.
    pub fn new(homeserver_url: Url) -> Result<Self> {
        Self::new_with_config(homeserver_url, ClientConfig::new())
    }

    /// Create a new client with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `homeserver_url` - The homeserver that the client should connect to.
    ///
    /// * `config` - Configuration for the client.
    pub fn new_with_config(homeserver_url: Url, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::with_config(&config)?;
        Self::with_transport(homeserver_url, config, Arc::new(transport))
    }

    /// Create a new client sending its requests through `transport`.
    ///
    /// The proxy, user agent and certificate settings of `config` are up to
    /// the transport.
    pub fn with_transport(
        homeserver_url: Url,
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let api = Api::new(homeserver_url, transport, config.timeout)?;
        let base_client = match config.event_factory {
            Some(factory) => BaseClient::with_event_factory(factory),
            None => BaseClient::new(),
        };
        let (polling_notices, _) = broadcast::channel(16);

        let inner = ClientInner {
            api,
            base_client,
            validate_certificate: config.validate_certificate,
            sync_settings: RwLock::new(SyncSettings::new()),
            polling: Default::default(),
            sync_lock: Default::default(),
            polling_notices,
        };

        Ok(Self { inner: Arc::new(inner) })
    }

    /// Create a client from a session file written by
    /// [`Client::save_state`].
    ///
    /// The certificate validation setting of the file overrides the one of
    /// `config`.
    pub fn load_state(path: impl AsRef<Path>, config: ClientConfig) -> Result<Self> {
        let file = SessionFile::load(path)?;
        let homeserver_url = Url::parse(&file.base_url)?;

        let config = config.validate_certificate(file.validate_certificate);
        let client = Self::new_with_config(homeserver_url, config)?;
        client.restore_session(&file);

        Ok(client)
    }

    /// Write the homeserver and the session of the client to a file.
    pub fn save_state(&self, path: impl AsRef<Path>) -> Result<()> {
        let session = self.inner.api.session();

        let file = SessionFile {
            base_url: self.homeserver().to_string(),
            validate_certificate: self.inner.validate_certificate,
            user_id: session.user_id,
            homeserver_name: session.homeserver_name,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        };

        file.save(path)
    }

    /// Restore the session of a session file.
    pub fn restore_session(&self, file: &SessionFile) {
        self.inner.api.set_session(file.tokens());
        self.inner.base_client.set_user_id(file.user_id.clone());
    }

    /// The Homeserver of the client.
    pub fn homeserver(&self) -> &Url {
        self.inner.api.homeserver()
    }

    /// The API client, with a method for every endpoint.
    pub fn api(&self) -> &Api {
        &self.inner.api
    }

    /// The sans-IO client holding the room, profile and presence caches.
    pub fn base_client(&self) -> &BaseClient {
        &self.inner.base_client
    }

    /// The factory events are decoded with.
    pub fn event_factory(&self) -> &Arc<EventFactory> {
        self.inner.base_client.event_factory()
    }

    /// Is the client logged in.
    pub fn logged_in(&self) -> bool {
        self.inner.api.access_token().is_some()
    }

    /// Get the user id of the current owner of the client.
    pub fn user_id(&self) -> Option<String> {
        self.inner.api.session().user_id
    }

    /// The tokens and identity of the session.
    pub fn session(&self) -> SessionTokens {
        self.inner.api.session()
    }

    /// Add `EventEmitter` to `Client`.
    ///
    /// The methods of `EventEmitter` are called when the respective events
    /// are received during sync.
    pub fn add_event_emitter(&self, emitter: Box<dyn EventEmitter>) {
        self.inner.base_client.add_event_emitter(emitter);
    }

    /// Login with a user name and password.
    ///
    /// # Arguments
    ///
    /// * `user` - The user that should be logged in to the homeserver.
    ///
    /// * `password` - The password of the user.
    ///
    /// * `device_id` - A unique id that will be associated with this session.
    ///   If not given the homeserver will create one.
    #[instrument(skip(self, password))]
    pub async fn login_with_password(
        &self,
        user: &str,
        password: &str,
        device_id: Option<&str>,
    ) -> Result<LoginResponse> {
        let response = self.inner.api.login(user, password, device_id, None).await?;
        self.inner.base_client.set_user_id(Some(response.user_id.clone()));

        Ok(response)
    }

    /// Register a user account and log in as that user.
    #[instrument(skip(self, password))]
    pub async fn register_with_password(
        &self,
        username: &str,
        password: &str,
        device_id: Option<&str>,
    ) -> Result<LoginResponse> {
        let username = require(username, "username")?;
        let password = require(password, "password")?;

        let response = self
            .inner
            .api
            .register(AccountKind::User, Some(username), Some(password), device_id, None)
            .await?;
        self.inner.base_client.set_user_id(Some(response.user_id.clone()));

        Ok(response)
    }

    /// Log out, stopping any polling and dropping the cached state.
    pub async fn logout(&self) -> Result<()> {
        self.stop_polling(true);
        self.inner.api.logout().await?;
        self.inner.base_client.clear();

        Ok(())
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// The new tokens are stored in the client, the new access token is
    /// returned.
    pub async fn refresh_access_token(&self) -> Result<String, RefreshTokenError> {
        let refresh_token =
            self.inner.api.refresh_token().ok_or(RefreshTokenError::RefreshTokenRequired)?;

        let response = self
            .inner
            .api
            .refresh_access_token(&refresh_token)
            .await
            .map_err(|e| RefreshTokenError::Request(Arc::new(e)))?;

        response.access_token.ok_or(RefreshTokenError::NoAccessToken)
    }

    /// Get the profile of a user.
    ///
    /// With a `room_id`, the profile the user has in that room is looked up
    /// first. Profiles that aren't cached are fetched from the homeserver
    /// and cached.
    pub async fn get_user_profile(&self, user_id: &str, room_id: Option<&str>) -> Result<Profile> {
        let user_id = require(user_id, "user_id")?;
        let base = &self.inner.base_client;

        if let Some(profile) = room_id.and_then(|room_id| base.member_profile(room_id, user_id)) {
            return Ok(profile);
        }
        if let Some(profile) = base.profile(user_id) {
            return Ok(profile);
        }

        let response = self.inner.api.get_profile(user_id).await?;
        let profile = Profile::new(response.displayname, response.avatar_url);
        base.set_profile(user_id, profile.clone());

        Ok(profile)
    }

    /// Get the presence of a user, from the cache or else the homeserver.
    pub async fn get_user_presence(&self, user_id: &str) -> Result<Presence> {
        let user_id = require(user_id, "user_id")?;

        if let Some(presence) = self.inner.base_client.presence(user_id) {
            return Ok(presence);
        }

        let status = self.inner.api.get_presence(user_id).await?;
        self.inner.base_client.set_presence(user_id, status.presence.clone());

        Ok(status.presence)
    }

    /// Get a snapshot of a known room.
    pub fn get_room_by_id(&self, room_id: &str) -> Option<Room> {
        self.inner.base_client.get_room(room_id)
    }

    /// Find a known room by one of its aliases.
    pub fn get_room_by_alias(&self, alias: &str) -> Option<Room> {
        self.inner.base_client.get_room_by_alias(alias)
    }

    /// Snapshots of all known rooms, including left ones.
    pub fn rooms(&self) -> Vec<Room> {
        self.inner.base_client.rooms()
    }

    /// Send a message event to a room, returning its event id.
    ///
    /// The event is serialized before anything is sent, an event missing a
    /// required field fails with [`EventError::Incomplete`].
    ///
    /// [`EventError::Incomplete`]: matrix_client_base::events::EventError::Incomplete
    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn send(&self, room_id: &str, event: &dyn Event) -> Result<String> {
        let room_id = require(room_id, "room_id")?;
        if event.state_event().is_some() {
            return Err(Error::InvalidArgument(format!(
                "`{}` is a state event, use `send_state`",
                event.event_type()
            )));
        }

        let json = event.to_json()?;
        let content =
            json.get("content").and_then(JsonValue::as_object).cloned().unwrap_or_default();
        let txn_id = self.inner.api.next_transaction_id();

        self.inner.api.send_event(room_id, event.event_type(), &txn_id, &content).await
    }

    /// Send a state event to a room, returning its event id.
    ///
    /// The event needs a state key; like [`Client::send`] it is serialized
    /// before anything is sent.
    #[instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn send_state(&self, room_id: &str, event: &dyn Event) -> Result<String> {
        let room_id = require(room_id, "room_id")?;
        let state = event.state_event().ok_or_else(|| {
            Error::InvalidArgument(format!("`{}` isn't a state event", event.event_type()))
        })?;

        let json = event.to_json()?;
        let content =
            json.get("content").and_then(JsonValue::as_object).cloned().unwrap_or_default();
        let state_key = state.state_key.as_deref().ok_or(Error::MissingParameter("state_key"))?;

        self.inner.api.send_state_event(room_id, event.event_type(), state_key, &content).await
    }

    /// Join a room by id or alias, returning the room id.
    pub async fn join_room(&self, room_id_or_alias: &str) -> Result<String> {
        self.inner.api.join_room(room_id_or_alias).await
    }

    /// Leave a room. The room stays cached until it's forgotten.
    pub async fn leave_room(&self, room_id: &str) -> Result<()> {
        self.inner.api.leave_room(room_id).await
    }

    /// Forget a left room, on the homeserver and in the cache.
    pub async fn forget_room(&self, room_id: &str) -> Result<()> {
        self.inner.api.forget_room(room_id).await?;
        self.inner.base_client.forget_room(room_id);

        Ok(())
    }

    /// Replace the settings the sync loop starts with.
    ///
    /// Takes effect the next time polling begins.
    pub fn set_sync_settings(&self, settings: SyncSettings) {
        *self.inner.sync_settings.write().unwrap() = settings;
    }

    /// The current sync continuation token.
    pub fn sync_token(&self) -> Option<String> {
        self.inner.base_client.sync_token()
    }

    /// Synchronize the client's state with the latest state on the server,
    /// once.
    ///
    /// The events of the response are applied to the caches before it is
    /// returned.
    ///
    /// Fails with [`Error::InvalidState`] when called from an
    /// [`EventEmitter`] callback, those run while a response is being
    /// applied.
    #[instrument(skip(self))]
    pub async fn sync_once(&self, sync_settings: SyncSettings) -> Result<SyncResponse> {
        let timeout = sync_settings.timeout;
        self.sync_step(&sync_settings, timeout, None).await
    }

    /// Send one sync request and apply its response.
    ///
    /// Fails with [`HttpError::Aborted`] if the request was aborted through
    /// `abort`, the response is never applied in that case.
    async fn sync_step(
        &self,
        settings: &SyncSettings,
        timeout: Option<Duration>,
        abort: Option<AbortRegistration>,
    ) -> Result<SyncResponse> {
        // Waiting for the lock from inside the fold would never finish.
        if APPLYING_SYNC.try_with(|_| ()).is_ok() {
            let message = "can't sync while a response is being applied";
            return Err(Error::InvalidState(message.to_owned()));
        }

        let _guard = self.inner.sync_lock.lock().await;

        let since = match &settings.token {
            SyncToken::Specific(token) => Some(token.clone()),
            SyncToken::NoToken => None,
            SyncToken::ReusePrevious => self.sync_token(),
        };

        let request = self.inner.api.sync(
            settings.filter.as_ref(),
            since.as_deref(),
            settings.full_state,
            Some(&settings.set_presence),
            timeout,
        );

        let response = match abort {
            Some(registration) => {
                Abortable::new(request, registration).await.map_err(|_| HttpError::Aborted)??
            }
            None => request.await?,
        };

        APPLYING_SYNC
            .scope((), self.inner.base_client.receive_sync_response(response.clone()))
            .await;

        Ok(response)
    }

    /// The current state of the sync loop.
    pub fn polling_state(&self) -> PollingState {
        self.inner.polling.lock().unwrap().state
    }

    /// Get notified when polling starts or stops.
    pub fn subscribe_to_polling_state(&self) -> broadcast::Receiver<PollingNotice> {
        self.inner.polling_notices.subscribe()
    }

    /// Start the sync loop in the background.
    ///
    /// Each response is applied to the caches, the next request is sent
    /// right after. The first request doesn't wait for new events unless
    /// [`SyncSettings::ignore_timeout_on_first_sync`] is turned off.
    ///
    /// Does nothing if the client is already polling. If the access token is
    /// rejected, the loop tries to refresh it once, and stops if that fails.
    /// Other errors stop the loop right away; they are delivered as
    /// [`PollingNotice::Stopped`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    pub fn begin_polling(&self) {
        let run = {
            let mut control = self.inner.polling.lock().unwrap();
            if matches!(control.state, PollingState::Polling | PollingState::Reauthenticating) {
                debug!("Already polling");
                return;
            }

            control.run += 1;
            control.state = PollingState::Polling;
            control.run
        };

        info!("Polling started");
        let _ = self.inner.polling_notices.send(PollingNotice::Started);

        let settings = self.inner.sync_settings.read().unwrap().clone();
        tokio::spawn(self.clone().poll(run, settings));
    }

    /// Stop the sync loop.
    ///
    /// With `cancel_ongoing`, the request in flight is aborted and its
    /// response dropped. Otherwise it completes and is applied, but no
    /// further request is sent.
    pub fn stop_polling(&self, cancel_ongoing: bool) {
        let was_polling = {
            let mut control = self.inner.polling.lock().unwrap();
            let was_polling =
                matches!(control.state, PollingState::Polling | PollingState::Reauthenticating);

            control.run += 1;
            control.state = PollingState::Stopped;
            if let Some(handle) = control.abort.take() {
                if cancel_ongoing {
                    handle.abort();
                }
            }

            was_polling
        };

        if was_polling {
            info!(cancel_ongoing, "Polling stopped");
            let _ = self.inner.polling_notices.send(PollingNotice::Stopped(None));
        }
    }

    async fn poll(self, run: u64, mut settings: SyncSettings) {
        let mut first = true;

        loop {
            // Read after the previous response was applied, an event emitter
            // may have stopped polling.
            let registration = {
                let mut control = self.inner.polling.lock().unwrap();
                if control.run != run || control.state != PollingState::Polling {
                    debug!("Polling run is over");
                    return;
                }

                let (handle, registration) = AbortHandle::new_pair();
                control.abort = Some(handle);
                registration
            };

            let timeout = settings.poll_timeout(first);

            match self.sync_step(&settings, timeout, Some(registration)).await {
                Ok(_) => {
                    first = false;
                    settings.token = SyncToken::ReusePrevious;
                    settings.full_state = false;
                }
                Err(Error::Http(HttpError::Aborted)) => {
                    debug!("Sync request aborted");
                    return;
                }
                Err(error) if error.is_auth_error() => {
                    if !self.reauthenticate(run, error).await {
                        return;
                    }
                }
                Err(error) => {
                    self.stop_with_error(run, error);
                    return;
                }
            }
        }
    }

    /// Try to get a new access token after the current one was rejected.
    ///
    /// Returns whether polling goes on.
    async fn reauthenticate(&self, run: u64, error: Error) -> bool {
        {
            let mut control = self.inner.polling.lock().unwrap();
            if control.run != run {
                return false;
            }
            control.state = PollingState::Reauthenticating;
            control.abort = None;
        }

        warn!(%error, "The access token was rejected, refreshing it");
        self.inner.api.set_access_token(None);

        match self.refresh_access_token().await {
            Ok(_) => {
                let mut control = self.inner.polling.lock().unwrap();
                if control.run != run {
                    return false;
                }
                control.state = PollingState::Polling;
                info!("Refreshed the access token, polling resumes");
                true
            }
            Err(refresh_error) => {
                warn!(%refresh_error, "Couldn't refresh the access token");
                self.inner.api.set_refresh_token(None);
                self.stop_with_error(run, error);
                false
            }
        }
    }

    fn stop_with_error(&self, run: u64, error: Error) {
        {
            let mut control = self.inner.polling.lock().unwrap();
            if control.run != run {
                debug!(%error, "Ignoring the error of a stopped polling run");
                return;
            }
            control.state = PollingState::Stopped;
            control.abort = None;
        }

        error!(%error, "Polling stopped because of an error");
        let _ = self.inner.polling_notices.send(PollingNotice::Stopped(Some(Arc::new(error))));
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use bytes::Bytes;
    use matrix_client_base::events::{
        message::TextMessage,
        room::{RoomMessageEvent, RoomTopicEvent},
        EventError,
    };

    use super::*;
    use crate::HttpResult;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn send_request(
            &self,
            _: http::Request<Bytes>,
            _: Duration,
        ) -> HttpResult<http::Response<Bytes>> {
            panic!("no request should be sent");
        }
    }

    fn client() -> Client {
        let homeserver = Url::parse("https://example.org").unwrap();
        let client =
            Client::with_transport(homeserver, ClientConfig::new(), Arc::new(Unreachable)).unwrap();
        client.api().set_access_token(Some("abc123".to_owned()));
        client
    }

    #[tokio::test]
    async fn state_events_are_not_sent_as_messages() {
        let client = client();
        let event = RoomTopicEvent::new("Hello");

        assert_matches!(
            client.send("!room:example.org", &event).await,
            Err(Error::InvalidArgument(_))
        );
    }

    #[tokio::test]
    async fn incomplete_events_fail_before_sending() {
        let client = client();

        let event = RoomMessageEvent::default();
        assert_matches!(
            client.send("!room:example.org", &event).await,
            Err(Error::Event(EventError::Incomplete { field: "message", .. }))
        );

        let mut event = RoomTopicEvent::new("Hello");
        event.state.state_key = None;
        assert_matches!(
            client.send_state("!room:example.org", &event).await,
            Err(Error::Event(EventError::Incomplete { field: "state_key", .. }))
        );

        let event = RoomMessageEvent::new(TextMessage::plain("Hello"));
        assert_matches!(
            client.send_state("!room:example.org", &event).await,
            Err(Error::InvalidArgument(_))
        );
        assert_matches!(client.send("", &event).await, Err(Error::MissingParameter("room_id")));
    }

    #[test]
    fn stopping_an_idle_client_sends_no_notice() {
        let client = client();
        let mut notices = client.subscribe_to_polling_state();

        assert_eq!(client.polling_state(), PollingState::Idle);
        client.stop_polling(true);

        assert_eq!(client.polling_state(), PollingState::Stopped);
        assert_matches!(notices.try_recv(), Err(broadcast::error::TryRecvError::Empty));
    }

    #[tokio::test]
    async fn refresh_requires_a_refresh_token() {
        let client = client();
        assert_matches!(
            client.refresh_access_token().await,
            Err(RefreshTokenError::RefreshTokenRequired)
        );
    }

    #[test]
    fn restore_session() {
        let client = client();
        let file = SessionFile {
            base_url: "https://example.org".to_owned(),
            validate_certificate: true,
            user_id: Some("@example:localhost".to_owned()),
            homeserver_name: Some("localhost".to_owned()),
            access_token: Some("def456".to_owned()),
            refresh_token: None,
        };

        client.restore_session(&file);

        assert!(client.logged_in());
        assert_eq!(client.user_id().as_deref(), Some("@example:localhost"));
        assert_eq!(client.base_client().user_id().unwrap(), "@example:localhost");
        assert_eq!(client.session().access_token.as_deref(), Some("def456"));
    }
}
