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

use matrix_client_events::enums::Presence;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::{require, Api, ApiRequest};
use crate::Result;

/// The presence of a user, as returned by the homeserver.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PresenceStatus {
    /// The presence state.
    pub presence: Presence,
    /// Milliseconds since the user was last active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active_ago: Option<u64>,
    /// The status message of the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_msg: Option<String>,
    /// Whether the user is using a client right now.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currently_active: Option<bool>,
}

impl Api {
    /// Get the presence of a user.
    ///
    /// `GET /presence/{user_id}/status`
    pub async fn get_presence(&self, user_id: &str) -> Result<PresenceStatus> {
        let user_id = require(user_id, "user_id")?;
        self.send(ApiRequest::get(&["presence", user_id, "status"])).await
    }

    /// Set the presence of the user.
    ///
    /// `PUT /presence/{user_id}/status`
    pub async fn set_presence(
        &self,
        user_id: &str,
        presence: Presence,
        status_msg: Option<&str>,
    ) -> Result<()> {
        let user_id = require(user_id, "user_id")?;

        let mut body = Map::new();
        body.insert("presence".to_owned(), presence.into());
        if let Some(status_msg) = status_msg {
            body.insert("status_msg".to_owned(), status_msg.into());
        }

        let request = ApiRequest::put(&["presence", user_id, "status"]).json(body.into());
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// The presence events of the users on the presence list of a user.
    ///
    /// `GET /presence/list/{user_id}`
    pub async fn get_presence_list(&self, user_id: &str) -> Result<Vec<JsonValue>> {
        let user_id = require(user_id, "user_id")?;
        self.send(ApiRequest::get(&["presence", "list", user_id])).await
    }

    /// Add users to, and remove users from, the presence list of a user.
    ///
    /// `POST /presence/list/{user_id}`
    pub async fn update_presence_list(
        &self,
        user_id: &str,
        invite: &[&str],
        drop: &[&str],
    ) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        if invite.is_empty() && drop.is_empty() {
            let message = "nothing to change on the presence list";
            return Err(crate::Error::InvalidArgument(message.to_owned()));
        }

        let request = ApiRequest::post(&["presence", "list", user_id])
            .json(json!({ "invite": invite, "drop": drop }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
