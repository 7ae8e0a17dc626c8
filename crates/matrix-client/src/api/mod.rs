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

//! Request shaping for the Matrix client-server API.
//!
//! [`Api`] has one method per endpoint. Each checks its required arguments,
//! builds the path, query and body of the request and hands it to the
//! [`Transport`]. Error responses are mapped to [`ApiError`]s, and any
//! successful response carrying an `access_token` updates the stored
//! [`SessionTokens`].

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, RwLock,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use bytes::Bytes;
use http::{header::CONTENT_TYPE, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use tracing::debug;
use url::Url;

use crate::{http_client::Transport, ApiError, Error, HttpError, Result};

mod account;
mod filter;
mod media;
mod membership;
mod misc;
mod presence;
mod profile;
mod push_rules;
mod room_events;
mod rooms;
mod sync;

pub use account::{LoginResponse, RefreshResponse, ThirdPartyCredentials, ThirdPartyIdentifier};
pub use filter::{EventFilter, FilterDefinition, RoomEventFilter, RoomFilter};
pub use misc::{SearchResults, TurnServer};
pub use presence::PresenceStatus;
pub use profile::ProfileResponse;
pub use push_rules::NewPushRule;
pub use rooms::{CreateRoomRequest, PublicRoom, PublicRoomsResponse, RoomAliasResponse};

/// The tokens and identity of a logged in session.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionTokens {
    /// The token authenticating requests.
    pub access_token: Option<String>,
    /// The token used to get a new access token once the current one is
    /// rejected.
    pub refresh_token: Option<String>,
    /// The user the session belongs to.
    pub user_id: Option<String>,
    /// The server name of the homeserver, as reported at login.
    pub homeserver_name: Option<String>,
    /// The device of the session.
    pub device_id: Option<String>,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("user_id", &self.user_id)
            .field("homeserver_name", &self.homeserver_name)
            .field("device_id", &self.device_id)
            .finish_non_exhaustive()
    }
}

/// Where the path of an endpoint is rooted.
#[derive(Clone, Copy, Debug)]
enum Prefix {
    /// `/_matrix/client/r0/`
    Client,
    /// `/_matrix/media/r0/`
    Media,
    /// `/_matrix/client/`
    Unversioned,
}

impl Prefix {
    fn segments(self) -> &'static [&'static str] {
        match self {
            Prefix::Client => &["_matrix", "client", "r0"],
            Prefix::Media => &["_matrix", "media", "r0"],
            Prefix::Unversioned => &["_matrix", "client"],
        }
    }
}

#[derive(Debug)]
enum RequestBody {
    Json(JsonValue),
    Bytes { content_type: String, data: Bytes },
}

/// A request to a single endpoint, before it's bound to a homeserver.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    method: Method,
    prefix: Prefix,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    body: Option<RequestBody>,
    authenticated: bool,
    timeout: Option<Duration>,
}

impl ApiRequest {
    fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            prefix: Prefix::Client,
            segments: segments.iter().map(|s| (*s).to_owned()).collect(),
            query: Vec::new(),
            body: None,
            authenticated: true,
            timeout: None,
        }
    }

    pub(crate) fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub(crate) fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub(crate) fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub(crate) fn delete(segments: &[&str]) -> Self {
        Self::new(Method::DELETE, segments)
    }

    fn media(mut self) -> Self {
        self.prefix = Prefix::Media;
        self
    }

    fn unversioned(mut self) -> Self {
        self.prefix = Prefix::Unversioned;
        self
    }

    fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn query(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    fn query_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    fn bytes(mut self, content_type: &mime::Mime, data: Bytes) -> Self {
        self.body = Some(RequestBody::Bytes { content_type: content_type.to_string(), data });
        self
    }
}

/// Fail with [`Error::MissingParameter`] if `value` is empty.
pub(crate) fn require<'a>(value: &'a str, name: &'static str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::MissingParameter(name))
    } else {
        Ok(value)
    }
}

/// Client for the Matrix client-server API.
///
/// The `Api` holds the session tokens; every authenticated request sends the
/// access token as the `access_token` query parameter.
pub struct Api {
    homeserver: Url,
    transport: Arc<dyn Transport>,
    session: RwLock<SessionTokens>,
    request_timeout: Duration,
    txn_prefix: u128,
    next_txn_id: AtomicU64,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("homeserver", &self.homeserver.as_str())
            .field("session", &*self.session.read().unwrap())
            .finish_non_exhaustive()
    }
}

impl Api {
    /// Create a client for the homeserver at `homeserver`.
    ///
    /// Fails if the URL can't be the base of a path, e.g. a `data:` URL.
    pub fn new(
        homeserver: Url,
        transport: Arc<dyn Transport>,
        request_timeout: Duration,
    ) -> Result<Self> {
        if homeserver.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!("`{homeserver}` can't be a homeserver URL")));
        }

        let txn_prefix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Ok(Self {
            homeserver,
            transport,
            session: Default::default(),
            request_timeout,
            txn_prefix,
            next_txn_id: AtomicU64::new(0),
        })
    }

    /// The URL of the homeserver.
    pub fn homeserver(&self) -> &Url {
        &self.homeserver
    }

    /// A snapshot of the session tokens.
    pub fn session(&self) -> SessionTokens {
        self.session.read().unwrap().clone()
    }

    /// Replace the session tokens, e.g. with ones loaded from disk.
    pub fn set_session(&self, session: SessionTokens) {
        *self.session.write().unwrap() = session;
    }

    /// The access token, if there is one.
    pub fn access_token(&self) -> Option<String> {
        self.session.read().unwrap().access_token.clone()
    }

    /// Set or clear the access token.
    pub fn set_access_token(&self, token: Option<String>) {
        self.session.write().unwrap().access_token = token;
    }

    /// The refresh token, if there is one.
    pub fn refresh_token(&self) -> Option<String> {
        self.session.read().unwrap().refresh_token.clone()
    }

    /// Set or clear the refresh token.
    pub fn set_refresh_token(&self, token: Option<String>) {
        self.session.write().unwrap().refresh_token = token;
    }

    /// Get a fresh transaction id, unique for the lifetime of this client.
    ///
    /// Safe to call concurrently.
    pub fn next_transaction_id(&self) -> String {
        let counter = self.next_txn_id.fetch_add(1, Ordering::SeqCst);
        format!("m{}.{counter}", self.txn_prefix)
    }

    fn build_http_request(&self, request: ApiRequest) -> Result<http::Request<Bytes>> {
        let ApiRequest { method, prefix, segments, mut query, body, authenticated, timeout: _ } =
            request;

        if authenticated {
            let token = self.access_token().ok_or(HttpError::AuthenticationRequired)?;
            query.push(("access_token", token));
        }

        let mut url = self.homeserver.clone();
        let not_a_base =
            || Error::InvalidArgument(format!("`{}` can't be a homeserver URL", self.homeserver));
        url.path_segments_mut()
            .map_err(|()| not_a_base())?
            .pop_if_empty()
            .extend(prefix.segments())
            .extend(&segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let builder = http::Request::builder().method(&method).uri(url.as_str());

        let (builder, body) = match body {
            Some(RequestBody::Json(json)) => {
                let body = Bytes::from(serde_json::to_vec(&json)?);
                (builder.header(CONTENT_TYPE, "application/json"), body)
            }
            Some(RequestBody::Bytes { content_type, data }) => {
                (builder.header(CONTENT_TYPE, content_type), data)
            }
            // Endpoints taking a body want at least an empty object.
            None if method == Method::POST || method == Method::PUT => {
                (builder.header(CONTENT_TYPE, "application/json"), Bytes::from_static(b"{}"))
            }
            None => (builder, Bytes::new()),
        };

        Ok(builder.body(body).map_err(HttpError::from)?)
    }

    async fn send_request(&self, request: ApiRequest) -> Result<http::Response<Bytes>> {
        let timeout = request.timeout.unwrap_or(self.request_timeout);
        let request = self.build_http_request(request)?;

        Ok(self.transport.send_request(request, timeout).await?)
    }

    /// Send a request and deserialize the JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send_request(request).await?;
        let status = response.status();
        let body = response.body();

        let json: JsonValue = if body.is_empty() {
            json!({})
        } else {
            match serde_json::from_slice(body) {
                Ok(json) => json,
                Err(e) if status.is_success() => return Err(HttpError::Json(e).into()),
                Err(_) => return Err(HttpError::Status(status).into()),
            }
        };

        if let Some(error) = ApiError::from_body(status, &json) {
            debug!(%status, kind = %error.kind, "The homeserver returned an error");
            return Err(HttpError::Api(error).into());
        }

        if !status.is_success() {
            return Err(HttpError::Status(status).into());
        }

        self.receive_session(&json);

        Ok(serde_json::from_value(json)?)
    }

    /// Send a request whose successful response is raw bytes.
    pub(crate) async fn send_for_bytes(&self, request: ApiRequest) -> Result<Bytes> {
        let response = self.send_request(request).await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.into_body());
        }

        let error = serde_json::from_slice::<JsonValue>(response.body())
            .ok()
            .and_then(|json| ApiError::from_body(status, &json))
            .map_or(HttpError::Status(status), HttpError::Api);

        Err(error.into())
    }

    /// Store the session a response hands out.
    ///
    /// This is how login, registration and token refresh responses update
    /// the client, no matter which method sent the request.
    fn receive_session(&self, json: &JsonValue) {
        let Some(access_token) = json.get("access_token").and_then(JsonValue::as_str) else {
            return;
        };

        let field = |name: &str| json.get(name).and_then(JsonValue::as_str).map(ToOwned::to_owned);

        let mut session = self.session.write().unwrap();
        session.access_token = Some(access_token.to_owned());

        if let Some(refresh_token) = field("refresh_token") {
            session.refresh_token = Some(refresh_token);
        }
        if let Some(user_id) = field("user_id") {
            session.user_id = Some(user_id);
        }
        if let Some(homeserver_name) = field("home_server") {
            session.homeserver_name = Some(homeserver_name);
        }
        if let Some(device_id) = field("device_id") {
            session.device_id = Some(device_id);
        }

        debug!(user_id = ?session.user_id, "Stored new session tokens");
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;

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

    fn api(homeserver: &str) -> Api {
        let homeserver = Url::parse(homeserver).unwrap();
        Api::new(homeserver, Arc::new(Unreachable), Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn path_segments_are_encoded() {
        let api = api("https://example.org/base/");
        api.set_access_token(Some("secret".to_owned()));

        let request = ApiRequest::get(&["directory", "room", "#room alias:example.org"])
            .query("limit", 10);
        let request = api.build_http_request(request).unwrap();

        assert_eq!(
            request.uri().to_string(),
            "https://example.org/base/_matrix/client/r0/directory/room/%23room%20alias:example.org\
             ?limit=10&access_token=secret"
        );
        assert!(request.body().is_empty());
    }

    #[test]
    fn authentication_is_required() {
        let api = api("https://example.org");
        let request = ApiRequest::post(&["rooms", "!a:example.org", "forget"]);

        assert_matches!(
            api.build_http_request(request),
            Err(Error::Http(HttpError::AuthenticationRequired))
        );

        let request = ApiRequest::get(&["versions"]).unversioned().unauthenticated();
        let request = api.build_http_request(request).unwrap();
        assert_eq!(request.uri().to_string(), "https://example.org/_matrix/client/versions");
    }

    #[test]
    fn empty_body_for_post() {
        let api = api("https://example.org");
        let request =
            api.build_http_request(ApiRequest::post(&["logout"]).unauthenticated()).unwrap();

        assert_eq!(request.body().as_ref(), b"{}");
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn transaction_ids_are_unique() {
        let api = api("https://example.org");
        assert_ne!(api.next_transaction_id(), api.next_transaction_id());
    }

    #[test]
    fn login_like_responses_update_the_session() {
        let api = api("https://example.org");
        api.receive_session(&json!({ "user_id": "@other:example.org" }));
        assert_eq!(api.session(), SessionTokens::default());

        api.receive_session(&json!({
            "access_token": "abc",
            "refresh_token": "def",
            "user_id": "@example:example.org",
            "home_server": "example.org",
        }));
        let session = api.session();
        assert_eq!(session.access_token.as_deref(), Some("abc"));
        assert_eq!(session.refresh_token.as_deref(), Some("def"));
        assert_eq!(session.homeserver_name.as_deref(), Some("example.org"));

        // A refresh response only carries the tokens.
        api.receive_session(&json!({ "access_token": "ghi" }));
        let session = api.session();
        assert_eq!(session.access_token.as_deref(), Some("ghi"));
        assert_eq!(session.refresh_token.as_deref(), Some("def"));
        assert_eq!(session.user_id.as_deref(), Some("@example:example.org"));
    }

    #[test]
    fn cannot_be_a_base() {
        let result = Api::new(
            Url::parse("mailto:admin@example.org").unwrap(),
            Arc::new(Unreachable),
            Duration::from_secs(1),
        );
        assert_matches!(result, Err(Error::InvalidArgument(_)));
    }
}
