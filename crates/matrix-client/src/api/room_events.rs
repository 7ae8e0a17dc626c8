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

use std::time::Duration;

use matrix_client_events::{enums::ReceiptType, JsonObject};
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use tracing::instrument;

use super::{require, Api, ApiRequest};
use crate::Result;

#[derive(Deserialize)]
struct EventIdResponse {
    event_id: String,
}

impl Api {
    /// Send a message event, returning its event id.
    ///
    /// `txn_id` makes retries idempotent, see
    /// [`Api::next_transaction_id`].
    ///
    /// `PUT /rooms/{room_id}/send/{event_type}/{txn_id}`
    #[instrument(skip(self, content))]
    pub async fn send_event(
        &self,
        room_id: &str,
        event_type: &str,
        txn_id: &str,
        content: &JsonObject,
    ) -> Result<String> {
        let room_id = require(room_id, "room_id")?;
        let event_type = require(event_type, "event_type")?;
        let txn_id = require(txn_id, "txn_id")?;

        let request = ApiRequest::put(&["rooms", room_id, "send", event_type, txn_id])
            .json(JsonValue::Object(content.clone()));
        let response: EventIdResponse = self.send(request).await?;
        Ok(response.event_id)
    }

    /// Send a state event, returning its event id.
    ///
    /// `PUT /rooms/{room_id}/state/{event_type}/{state_key}`
    #[instrument(skip(self, content))]
    pub async fn send_state_event(
        &self,
        room_id: &str,
        event_type: &str,
        state_key: &str,
        content: &JsonObject,
    ) -> Result<String> {
        let room_id = require(room_id, "room_id")?;
        let event_type = require(event_type, "event_type")?;

        // An empty state key is valid.
        let request = ApiRequest::put(&["rooms", room_id, "state", event_type, state_key])
            .json(JsonValue::Object(content.clone()));
        let response: EventIdResponse = self.send(request).await?;
        Ok(response.event_id)
    }

    /// Get the full current state of a room.
    ///
    /// `GET /rooms/{room_id}/state`
    pub async fn get_room_state(&self, room_id: &str) -> Result<Vec<JsonValue>> {
        let room_id = require(room_id, "room_id")?;
        self.send(ApiRequest::get(&["rooms", room_id, "state"])).await
    }

    /// Get the content of a single state event.
    ///
    /// `GET /rooms/{room_id}/state/{event_type}/{state_key}`
    pub async fn get_room_state_event(
        &self,
        room_id: &str,
        event_type: &str,
        state_key: &str,
    ) -> Result<JsonObject> {
        let room_id = require(room_id, "room_id")?;
        let event_type = require(event_type, "event_type")?;

        self.send(ApiRequest::get(&["rooms", room_id, "state", event_type, state_key])).await
    }

    /// Redact an event, returning the event id of the redaction.
    ///
    /// `PUT /rooms/{room_id}/redact/{event_id}/{txn_id}`
    pub async fn redact_event(
        &self,
        room_id: &str,
        event_id: &str,
        txn_id: &str,
        reason: Option<&str>,
    ) -> Result<String> {
        let room_id = require(room_id, "room_id")?;
        let event_id = require(event_id, "event_id")?;
        let txn_id = require(txn_id, "txn_id")?;

        let mut body = Map::new();
        if let Some(reason) = reason {
            body.insert("reason".to_owned(), reason.into());
        }

        let request =
            ApiRequest::put(&["rooms", room_id, "redact", event_id, txn_id]).json(body.into());
        let response: EventIdResponse = self.send(request).await?;
        Ok(response.event_id)
    }

    /// Tell the room whether the user is typing.
    ///
    /// `timeout` is how long the typing notice lasts, it's required when
    /// `typing` is true.
    ///
    /// `PUT /rooms/{room_id}/typing/{user_id}`
    pub async fn set_typing(
        &self,
        room_id: &str,
        user_id: &str,
        typing: bool,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let room_id = require(room_id, "room_id")?;
        let user_id = require(user_id, "user_id")?;

        let body = match (typing, timeout) {
            (true, Some(timeout)) => {
                json!({ "typing": true, "timeout": timeout.as_millis() as u64 })
            }
            (true, None) => return Err(crate::Error::MissingParameter("timeout")),
            (false, _) => json!({ "typing": false }),
        };

        let request = ApiRequest::put(&["rooms", room_id, "typing", user_id]).json(body);
        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Send a receipt for an event.
    ///
    /// `POST /rooms/{room_id}/receipt/{receipt_type}/{event_id}`
    pub async fn send_receipt(
        &self,
        room_id: &str,
        receipt_type: ReceiptType,
        event_id: &str,
        receipt: Option<JsonObject>,
    ) -> Result<()> {
        let room_id = require(room_id, "room_id")?;
        let event_id = require(event_id, "event_id")?;

        let path = ["rooms", room_id, "receipt", receipt_type.as_str(), event_id];
        let request = ApiRequest::post(&path).json(JsonValue::Object(receipt.unwrap_or_default()));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
