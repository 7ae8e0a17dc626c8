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

use matrix_client_events::enums::{AccountKind, ThirdPartyIdMedium};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tracing::{info, instrument};

use super::{require, Api, ApiRequest};
use crate::Result;

/// The response to a login or registration.
///
/// The [`Api`] stores the session it carries on its own.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    /// The fully qualified id of the user.
    pub user_id: String,
    /// The access token of the new session.
    pub access_token: String,
    /// The server name of the homeserver.
    #[serde(default, rename = "home_server")]
    pub homeserver_name: Option<String>,
    /// The device of the new session.
    #[serde(default)]
    pub device_id: Option<String>,
    /// A token to get a new access token with.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// The response to a token refresh.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RefreshResponse {
    /// The new access token, `None` if the homeserver didn't hand one out.
    #[serde(default)]
    pub access_token: Option<String>,
    /// The refresh token to use next time.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Credentials of a third party identifier validated by an identity server.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ThirdPartyCredentials {
    /// The client secret used in the validation session.
    pub client_secret: String,
    /// The identity server that validated the identifier.
    pub id_server: String,
    /// The validation session id.
    pub sid: String,
}

/// A third party identifier bound to the account.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ThirdPartyIdentifier {
    /// The medium of the identifier.
    pub medium: ThirdPartyIdMedium,
    /// The identifier itself, e.g. an email address.
    pub address: String,
}

impl Api {
    /// Login with a user name and password.
    ///
    /// `POST /login`
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        user: &str,
        password: &str,
        device_id: Option<&str>,
        initial_device_display_name: Option<&str>,
    ) -> Result<LoginResponse> {
        let user = require(user, "user")?;
        let password = require(password, "password")?;
        info!(homeserver = %self.homeserver, "Logging in");

        let mut body = Map::new();
        body.insert("type".to_owned(), "m.login.password".into());
        body.insert("user".to_owned(), user.into());
        body.insert("password".to_owned(), password.into());
        if let Some(device_id) = device_id {
            body.insert("device_id".to_owned(), device_id.into());
        }
        if let Some(name) = initial_device_display_name {
            body.insert("initial_device_display_name".to_owned(), name.into());
        }

        self.send(ApiRequest::post(&["login"]).unauthenticated().json(body.into())).await
    }

    /// Invalidate the access token and forget the session.
    ///
    /// `POST /logout`
    pub async fn logout(&self) -> Result<()> {
        let _: JsonValue = self.send(ApiRequest::post(&["logout"])).await?;
        self.set_session(Default::default());
        Ok(())
    }

    /// Register a new account.
    ///
    /// Without a `username` the homeserver generates one. `auth` is the
    /// interactive authentication data, if the homeserver asked for it.
    ///
    /// `POST /register`
    #[instrument(skip(self, password, auth))]
    pub async fn register(
        &self,
        kind: AccountKind,
        username: Option<&str>,
        password: Option<&str>,
        device_id: Option<&str>,
        auth: Option<JsonValue>,
    ) -> Result<LoginResponse> {
        info!(homeserver = %self.homeserver, "Registering");

        let mut body = Map::new();
        if let Some(username) = username {
            body.insert("username".to_owned(), username.into());
        }
        if let Some(password) = password {
            body.insert("password".to_owned(), password.into());
        }
        if let Some(device_id) = device_id {
            body.insert("device_id".to_owned(), device_id.into());
        }
        if let Some(auth) = auth {
            body.insert("auth".to_owned(), auth);
        }

        let request =
            ApiRequest::post(&["register"]).unauthenticated().query("kind", kind).json(body.into());
        self.send(request).await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// `POST /tokenrefresh`
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let refresh_token = require(refresh_token, "refresh_token")?;
        let request = ApiRequest::post(&["tokenrefresh"])
            .unauthenticated()
            .json(json!({ "refresh_token": refresh_token }));

        self.send(request).await
    }

    /// Bind a validated third party identifier to the account.
    ///
    /// `POST /account/3pid`
    pub async fn add_3pid(&self, credentials: &ThirdPartyCredentials, bind: bool) -> Result<()> {
        require(&credentials.sid, "sid")?;
        let body = json!({ "three_pid_creds": credentials, "bind": bind });

        let _: JsonValue = self.send(ApiRequest::post(&["account", "3pid"]).json(body)).await?;
        Ok(())
    }

    /// The third party identifiers bound to the account.
    ///
    /// `GET /account/3pid`
    pub async fn get_3pids(&self) -> Result<Vec<ThirdPartyIdentifier>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            threepids: Vec<ThirdPartyIdentifier>,
        }

        let response: Response = self.send(ApiRequest::get(&["account", "3pid"])).await?;
        Ok(response.threepids)
    }

    /// Remove a third party identifier from the account.
    ///
    /// `POST /account/3pid/delete`
    pub async fn delete_3pid(&self, medium: ThirdPartyIdMedium, address: &str) -> Result<()> {
        let address = require(address, "address")?;
        let body = json!({ "medium": medium, "address": address });

        let request = ApiRequest::post(&["account", "3pid", "delete"]).json(body);
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Change the password of the account.
    ///
    /// `POST /account/password`
    #[instrument(skip_all)]
    pub async fn change_password(&self, new_password: &str, auth: Option<JsonValue>) -> Result<()> {
        let new_password = require(new_password, "new_password")?;

        let mut body = Map::new();
        body.insert("new_password".to_owned(), new_password.into());
        if let Some(auth) = auth {
            body.insert("auth".to_owned(), auth);
        }

        let request = ApiRequest::post(&["account", "password"]).json(body.into());
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
