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

use matrix_client_events::enums::ThirdPartyIdMedium;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use tracing::instrument;

use super::{require, Api, ApiRequest};
use crate::Result;

impl Api {
    /// Join a room by id or alias, returning the room id.
    ///
    /// `POST /join/{room_id_or_alias}`
    #[instrument(skip(self))]
    pub async fn join_room(&self, room_id_or_alias: &str) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            room_id: String,
        }

        let room_id_or_alias = require(room_id_or_alias, "room_id_or_alias")?;
        let response: Response = self.send(ApiRequest::post(&["join", room_id_or_alias])).await?;
        Ok(response.room_id)
    }

    /// Leave a room.
    ///
    /// `POST /rooms/{room_id}/leave`
    #[instrument(skip(self))]
    pub async fn leave_room(&self, room_id: &str) -> Result<()> {
        self.membership_request(room_id, "leave", Map::new()).await
    }

    /// Forget a room the user left.
    ///
    /// `POST /rooms/{room_id}/forget`
    #[instrument(skip(self))]
    pub async fn forget_room(&self, room_id: &str) -> Result<()> {
        self.membership_request(room_id, "forget", Map::new()).await
    }

    /// Invite a user to a room.
    ///
    /// `POST /rooms/{room_id}/invite`
    pub async fn invite_user(&self, room_id: &str, user_id: &str) -> Result<()> {
        let body = user_body(user_id, None)?;
        self.membership_request(room_id, "invite", body).await
    }

    /// Invite someone to a room by a third party identifier.
    ///
    /// `POST /rooms/{room_id}/invite`
    pub async fn invite_3pid(
        &self,
        room_id: &str,
        id_server: &str,
        medium: ThirdPartyIdMedium,
        address: &str,
    ) -> Result<()> {
        let id_server = require(id_server, "id_server")?;
        let address = require(address, "address")?;

        let mut body = Map::new();
        body.insert("id_server".to_owned(), id_server.into());
        body.insert("medium".to_owned(), medium.into());
        body.insert("address".to_owned(), address.into());
        self.membership_request(room_id, "invite", body).await
    }

    /// Kick a user from a room.
    ///
    /// `POST /rooms/{room_id}/kick`
    pub async fn kick_user(
        &self,
        room_id: &str,
        user_id: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        let body = user_body(user_id, reason)?;
        self.membership_request(room_id, "kick", body).await
    }

    /// Ban a user from a room.
    ///
    /// `POST /rooms/{room_id}/ban`
    pub async fn ban_user(&self, room_id: &str, user_id: &str, reason: Option<&str>) -> Result<()> {
        let body = user_body(user_id, reason)?;
        self.membership_request(room_id, "ban", body).await
    }

    /// Lift the ban of a user.
    ///
    /// `POST /rooms/{room_id}/unban`
    pub async fn unban_user(&self, room_id: &str, user_id: &str) -> Result<()> {
        let body = user_body(user_id, None)?;
        self.membership_request(room_id, "unban", body).await
    }

    async fn membership_request(
        &self,
        room_id: &str,
        action: &str,
        body: Map<String, JsonValue>,
    ) -> Result<()> {
        let room_id = require(room_id, "room_id")?;
        let request = ApiRequest::post(&["rooms", room_id, action]).json(body.into());

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}

fn user_body(user_id: &str, reason: Option<&str>) -> Result<Map<String, JsonValue>> {
    let user_id = require(user_id, "user_id")?;

    let mut body = Map::new();
    body.insert("user_id".to_owned(), user_id.into());
    if let Some(reason) = reason {
        body.insert("reason".to_owned(), reason.into());
    }
    Ok(body)
}
