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

//! Tags, account data, search, server administration and VoIP.

use matrix_client_events::{
    enums::{SearchGroupBy, SearchOrder},
    JsonObject,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::{require, Api, ApiRequest};
use crate::Result;

/// Credentials of the TURN server of the homeserver.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TurnServer {
    /// The user name to authenticate with.
    pub username: String,
    /// The password to authenticate with.
    pub password: String,
    /// The TURN URIs.
    pub uris: Vec<String>,
    /// How long the credentials are valid, in seconds.
    pub ttl: u64,
}

/// The room events matching a search.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchResults {
    /// An estimate of the number of results.
    #[serde(default)]
    pub count: Option<u64>,
    /// Words to highlight in the results.
    #[serde(default)]
    pub highlights: Vec<String>,
    /// The results, each with a `rank` and the matching event as `result`.
    #[serde(default)]
    pub results: Vec<JsonValue>,
    /// Token of the next page.
    #[serde(default)]
    pub next_batch: Option<String>,
}

impl Api {
    /// The tags of a room.
    ///
    /// `GET /user/{user_id}/rooms/{room_id}/tags`
    pub async fn get_room_tags(&self, user_id: &str, room_id: &str) -> Result<JsonObject> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            tags: JsonObject,
        }

        let user_id = require(user_id, "user_id")?;
        let room_id = require(room_id, "room_id")?;

        let request = ApiRequest::get(&["user", user_id, "rooms", room_id, "tags"]);
        let response: Response = self.send(request).await?;
        Ok(response.tags)
    }

    /// Tag a room, `order` positioning it among the rooms with the same tag.
    ///
    /// `PUT /user/{user_id}/rooms/{room_id}/tags/{tag}`
    pub async fn add_room_tag(
        &self,
        user_id: &str,
        room_id: &str,
        tag: &str,
        order: Option<f64>,
    ) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        let room_id = require(room_id, "room_id")?;
        let tag = require(tag, "tag")?;

        let mut body = Map::new();
        if let Some(order) = order {
            body.insert("order".to_owned(), order.into());
        }

        let request =
            ApiRequest::put(&["user", user_id, "rooms", room_id, "tags", tag]).json(body.into());
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Remove a tag from a room.
    ///
    /// `DELETE /user/{user_id}/rooms/{room_id}/tags/{tag}`
    pub async fn delete_room_tag(&self, user_id: &str, room_id: &str, tag: &str) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        let room_id = require(room_id, "room_id")?;
        let tag = require(tag, "tag")?;

        let request = ApiRequest::delete(&["user", user_id, "rooms", room_id, "tags", tag]);
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Store account data, for a room if `room_id` is given.
    ///
    /// `PUT /user/{user_id}/account_data/{type}`,
    /// `PUT /user/{user_id}/rooms/{room_id}/account_data/{type}`
    pub async fn set_account_data(
        &self,
        user_id: &str,
        room_id: Option<&str>,
        event_type: &str,
        content: &JsonObject,
    ) -> Result<()> {
        let user_id = require(user_id, "user_id")?;
        let event_type = require(event_type, "event_type")?;

        let request = match room_id {
            Some(room_id) => {
                let room_id = require(room_id, "room_id")?;
                ApiRequest::put(&["user", user_id, "rooms", room_id, "account_data", event_type])
            }
            None => ApiRequest::put(&["user", user_id, "account_data", event_type]),
        };

        let _: JsonValue = self.send(request.json(JsonValue::Object(content.clone()))).await?;
        Ok(())
    }

    /// Search the room events for `search_term`.
    ///
    /// `POST /search`
    pub async fn search(
        &self,
        search_term: &str,
        order_by: Option<SearchOrder>,
        group_by: Option<SearchGroupBy>,
        next_batch: Option<&str>,
    ) -> Result<SearchResults> {
        #[derive(Deserialize)]
        struct Categories {
            room_events: SearchResults,
        }
        #[derive(Deserialize)]
        struct Response {
            search_categories: Categories,
        }

        let search_term = require(search_term, "search_term")?;

        let mut criteria = Map::new();
        criteria.insert("search_term".to_owned(), search_term.into());
        if let Some(order_by) = order_by {
            criteria.insert("order_by".to_owned(), order_by.into());
        }
        if let Some(group_by) = group_by {
            criteria.insert("groupings".to_owned(), json!({ "group_by": [{ "key": group_by }] }));
        }

        let request = ApiRequest::post(&["search"])
            .query_opt("next_batch", next_batch)
            .json(json!({ "search_categories": { "room_events": criteria } }));

        let response: Response = self.send(request).await?;
        Ok(response.search_categories.room_events)
    }

    /// Information about the sessions of a user, for server admins.
    ///
    /// `GET /admin/whois/{user_id}`
    pub async fn whois(&self, user_id: &str) -> Result<JsonValue> {
        let user_id = require(user_id, "user_id")?;
        self.send(ApiRequest::get(&["admin", "whois", user_id])).await
    }

    /// The versions of the client-server API the homeserver supports.
    ///
    /// `GET /_matrix/client/versions`
    pub async fn versions(&self) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct Response {
            versions: Vec<String>,
        }

        let request = ApiRequest::get(&["versions"]).unversioned().unauthenticated();
        let response: Response = self.send(request).await?;
        Ok(response.versions)
    }

    /// Credentials for the TURN server of the homeserver.
    ///
    /// `GET /voip/turnServer`
    pub async fn turn_server(&self) -> Result<TurnServer> {
        self.send(ApiRequest::get(&["voip", "turnServer"])).await
    }
}
