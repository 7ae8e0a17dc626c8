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

use matrix_client_events::{
    enums::{RoomPreset, RoomVisibility},
    JsonObject,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::{require, Api, ApiRequest};
use crate::Result;

/// The options of a new room.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreateRoomRequest {
    /// Whether the room is listed in the room directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<RoomVisibility>,
    /// The local part of an alias to create for the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_alias_name: Option<String>,
    /// The name of the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The topic of the room.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Users to invite.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invite: Vec<String>,
    /// Extra content of the `m.room.create` event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_content: Option<JsonObject>,
    /// State events to set in the new room.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initial_state: Vec<JsonValue>,
    /// The preset of initial state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<RoomPreset>,
    /// Whether the room is a direct chat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_direct: Option<bool>,
}

/// The room an alias points to.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoomAliasResponse {
    /// The room id.
    pub room_id: String,
    /// Servers that know about the room.
    #[serde(default)]
    pub servers: Vec<String>,
}

/// An entry of the public room directory.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublicRoom {
    /// The room id.
    pub room_id: String,
    /// The aliases of the room.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// The canonical alias of the room.
    #[serde(default)]
    pub canonical_alias: Option<String>,
    /// The name of the room.
    #[serde(default)]
    pub name: Option<String>,
    /// The topic of the room.
    #[serde(default)]
    pub topic: Option<String>,
    /// The avatar of the room.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// The number of joined members.
    #[serde(default)]
    pub num_joined_members: u64,
    /// Whether the history is visible to anyone.
    #[serde(default)]
    pub world_readable: bool,
    /// Whether guests can join.
    #[serde(default)]
    pub guest_can_join: bool,
}

/// A page of the public room directory.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PublicRoomsResponse {
    /// The rooms.
    pub chunk: Vec<PublicRoom>,
    /// Token of the next page.
    #[serde(default)]
    pub next_batch: Option<String>,
    /// Token of the previous page.
    #[serde(default)]
    pub prev_batch: Option<String>,
    /// An estimate of the total number of public rooms.
    #[serde(default)]
    pub total_room_count_estimate: Option<u64>,
}

impl Api {
    /// Create a room, returning its id.
    ///
    /// `POST /createRoom`
    pub async fn create_room(&self, request: &CreateRoomRequest) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            room_id: String,
        }

        let request = ApiRequest::post(&["createRoom"]).json(serde_json::to_value(request)?);
        let response: Response = self.send(request).await?;
        Ok(response.room_id)
    }

    /// Point `alias` at a room.
    ///
    /// `PUT /directory/room/{room_alias}`
    pub async fn create_room_alias(&self, room_id: &str, alias: &str) -> Result<()> {
        let room_id = require(room_id, "room_id")?;
        let alias = require(alias, "alias")?;
        let request =
            ApiRequest::put(&["directory", "room", alias]).json(json!({ "room_id": room_id }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Remove an alias.
    ///
    /// `DELETE /directory/room/{room_alias}`
    pub async fn delete_room_alias(&self, alias: &str) -> Result<()> {
        let alias = require(alias, "alias")?;
        let _: JsonValue = self.send(ApiRequest::delete(&["directory", "room", alias])).await?;
        Ok(())
    }

    /// Resolve an alias.
    ///
    /// `GET /directory/room/{room_alias}`
    pub async fn get_room_id(&self, alias: &str) -> Result<RoomAliasResponse> {
        let alias = require(alias, "alias")?;
        self.send(ApiRequest::get(&["directory", "room", alias]).unauthenticated()).await
    }

    /// List the public rooms of a homeserver, ours if `server` is `None`.
    ///
    /// With a `search_term` the directory is searched instead.
    ///
    /// `GET /publicRooms`, `POST /publicRooms`
    pub async fn public_rooms(
        &self,
        limit: Option<u32>,
        since: Option<&str>,
        server: Option<&str>,
        search_term: Option<&str>,
    ) -> Result<PublicRoomsResponse> {
        let request = match search_term {
            None => ApiRequest::get(&["publicRooms"])
                .unauthenticated()
                .query_opt("limit", limit)
                .query_opt("since", since)
                .query_opt("server", server),
            Some(term) => {
                let mut body = Map::new();
                body.insert("filter".to_owned(), json!({ "generic_search_term": term }));
                if let Some(limit) = limit {
                    body.insert("limit".to_owned(), limit.into());
                }
                if let Some(since) = since {
                    body.insert("since".to_owned(), since.into());
                }
                ApiRequest::post(&["publicRooms"]).query_opt("server", server).json(body.into())
            }
        };

        self.send(request).await
    }

    /// Whether a room is listed in the room directory.
    ///
    /// `GET /directory/list/room/{room_id}`
    pub async fn get_room_visibility(&self, room_id: &str) -> Result<RoomVisibility> {
        #[derive(Deserialize)]
        struct Response {
            visibility: RoomVisibility,
        }

        let room_id = require(room_id, "room_id")?;
        let request = ApiRequest::get(&["directory", "list", "room", room_id]).unauthenticated();
        let response: Response = self.send(request).await?;
        Ok(response.visibility)
    }

    /// List or unlist a room in the room directory.
    ///
    /// `PUT /directory/list/room/{room_id}`
    pub async fn set_room_visibility(
        &self,
        room_id: &str,
        visibility: RoomVisibility,
    ) -> Result<()> {
        let room_id = require(room_id, "room_id")?;
        let request = ApiRequest::put(&["directory", "list", "room", room_id])
            .json(json!({ "visibility": visibility }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
