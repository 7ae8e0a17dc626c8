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

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::{require, Api, ApiRequest};
use crate::Result;

/// The public profile of a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProfileResponse {
    /// The display name of the user.
    #[serde(default)]
    pub displayname: Option<String>,
    /// The `mxc://` URI of the avatar of the user.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Api {
    /// Get the display name and avatar of a user.
    ///
    /// `GET /profile/{user_id}`
    pub async fn get_profile(&self, user_id: &str) -> Result<ProfileResponse> {
        let user_id = require(user_id, "user_id")?;
        self.send(ApiRequest::get(&["profile", user_id])).await
    }

    /// Get the display name of a user.
    ///
    /// `GET /profile/{user_id}/displayname`
    pub async fn get_display_name(&self, user_id: &str) -> Result<Option<String>> {
        let user_id = require(user_id, "user_id")?;
        let request = ApiRequest::get(&["profile", user_id, "displayname"]);
        let response: ProfileResponse = self.send(request).await?;
        Ok(response.displayname)
    }

    /// Set or remove the display name of a user.
    ///
    /// `PUT /profile/{user_id}/displayname`
    pub async fn set_display_name(&self, user_id: &str, display_name: Option<&str>) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        let request = ApiRequest::put(&["profile", user_id, "displayname"])
            .json(json!({ "displayname": display_name }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Get the avatar URL of a user.
    ///
    /// `GET /profile/{user_id}/avatar_url`
    pub async fn get_avatar_url(&self, user_id: &str) -> Result<Option<String>> {
        let user_id = require(user_id, "user_id")?;
        let request = ApiRequest::get(&["profile", user_id, "avatar_url"]);
        let response: ProfileResponse = self.send(request).await?;
        Ok(response.avatar_url)
    }

    /// Set or remove the avatar URL of a user.
    ///
    /// `PUT /profile/{user_id}/avatar_url`
    pub async fn set_avatar_url(&self, user_id: &str, avatar_url: Option<&str>) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        let request = ApiRequest::put(&["profile", user_id, "avatar_url"])
            .json(json!({ "avatar_url": avatar_url }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
