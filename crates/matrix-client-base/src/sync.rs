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

//! The shape of a `/sync` response.
//!
//! Only the envelope is typed, the events themselves are kept as raw JSON
//! until the fold step decodes them through the
//! [`EventFactory`](matrix_client_events::EventFactory).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::Result;

/// A response to `GET /_matrix/client/r0/sync`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SyncResponse {
    /// The continuation token to pass as `since` to the next sync.
    pub next_batch: String,
    /// Updates to rooms.
    #[serde(default)]
    pub rooms: Rooms,
    /// Presence updates of other users.
    #[serde(default)]
    pub presence: Events,
    /// Global account data.
    #[serde(default)]
    pub account_data: Events,
}

impl SyncResponse {
    /// Deserialize a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Create an empty response carrying only the continuation token.
    pub fn new(next_batch: impl Into<String>) -> Self {
        Self { next_batch: next_batch.into(), ..Default::default() }
    }
}

/// A list of raw events.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Events {
    /// The events, in server order.
    #[serde(default)]
    pub events: Vec<JsonValue>,
}

/// Room updates, grouped by the user's membership.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Rooms {
    /// Rooms the user has been invited to.
    #[serde(default)]
    pub invite: BTreeMap<String, InvitedRoom>,
    /// Rooms the user has joined.
    #[serde(default)]
    pub join: BTreeMap<String, JoinedRoom>,
    /// Rooms the user has left or been banned from.
    #[serde(default)]
    pub leave: BTreeMap<String, LeftRoom>,
}

impl Rooms {
    /// No room was updated.
    pub fn is_empty(&self) -> bool {
        self.invite.is_empty() && self.join.is_empty() && self.leave.is_empty()
    }
}

/// Updates to a joined room.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct JoinedRoom {
    /// New timeline events.
    #[serde(default)]
    pub timeline: Timeline,
    /// State preceding the timeline.
    #[serde(default)]
    pub state: Events,
    /// Room account data, like tags.
    #[serde(default)]
    pub account_data: Events,
    /// Typing notifications and receipts.
    #[serde(default)]
    pub ephemeral: Events,
    /// Counts of unread notifications.
    #[serde(default)]
    pub unread_notifications: UnreadNotificationsCount,
}

/// An invite, with the stripped state of the room.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct InvitedRoom {
    /// Stripped state events describing the room.
    #[serde(default)]
    pub invite_state: Events,
}

/// Updates to a room the user has left.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LeftRoom {
    /// Timeline events up to the point the user left.
    #[serde(default)]
    pub timeline: Timeline,
    /// State preceding the timeline.
    #[serde(default)]
    pub state: Events,
    /// Room account data.
    #[serde(default)]
    pub account_data: Events,
}

/// A slice of the room timeline.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Timeline {
    /// The events, oldest first.
    #[serde(default)]
    pub events: Vec<JsonValue>,
    /// Whether events were left out between the previous sync and this one.
    #[serde(default)]
    pub limited: bool,
    /// Token to paginate backwards from the start of this slice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_batch: Option<String>,
}

/// Counts of unread notifications of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnreadNotificationsCount {
    /// Notifications that should be highlighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_count: Option<u64>,
    /// All notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use matrix_client_test::{test_json, DEFAULT_TEST_ROOM_ID};

    use super::SyncResponse;

    #[test]
    fn deserialize_sync() {
        let body = serde_json::to_vec(&*test_json::SYNC).unwrap();
        let response = SyncResponse::from_slice(&body).unwrap();

        assert_eq!(response.next_batch, "s526_47314_0_7_1_1_1_11444_1");
        assert_eq!(response.presence.events.len(), 1);

        let room = &response.rooms.join[DEFAULT_TEST_ROOM_ID];
        assert!(room.timeline.limited);
        assert_eq!(room.timeline.events.len(), 3);
        assert_eq!(room.unread_notifications.notification_count, Some(11));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let response: SyncResponse =
            serde_json::from_value(serde_json::json!({ "next_batch": "s1" })).unwrap();

        assert!(response.rooms.is_empty());
        assert!(response.account_data.events.is_empty());
    }
}
