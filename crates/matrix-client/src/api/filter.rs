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

use matrix_client_events::enums::EventFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{require, Api, ApiRequest};
use crate::Result;

/// Filter of non-room events, like presence or global account data.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct EventFilter {
    /// The maximum number of events to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Event types to include, `*` is a wildcard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    /// Event types to exclude.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_types: Vec<String>,
    /// Senders to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senders: Option<Vec<String>>,
    /// Senders to exclude.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_senders: Vec<String>,
}

/// Filter of the events of a room section.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RoomEventFilter {
    /// The filter shared with non-room events.
    #[serde(flatten)]
    pub events: EventFilter,
    /// Rooms to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<String>>,
    /// Rooms to exclude.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_rooms: Vec<String>,
    /// Only include events with, or without, a `url` in their content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_url: Option<bool>,
}

/// Filter of the `rooms` section of a sync.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RoomFilter {
    /// Rooms to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<String>>,
    /// Rooms to exclude.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_rooms: Vec<String>,
    /// Whether to include rooms the user left.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_leave: bool,
    /// Filter of timeline events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<RoomEventFilter>,
    /// Filter of state events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<RoomEventFilter>,
    /// Filter of ephemeral events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ephemeral: Option<RoomEventFilter>,
    /// Filter of room account data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_data: Option<RoomEventFilter>,
}

/// A filter, either uploaded with [`Api::create_filter`] or sent inline
/// with a sync.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FilterDefinition {
    /// Only return these fields of events, in dotted notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_fields: Option<Vec<String>>,
    /// The format of returned events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_format: Option<EventFormat>,
    /// Filter of presence events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<EventFilter>,
    /// Filter of global account data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_data: Option<EventFilter>,
    /// Filter of the rooms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomFilter>,
}

impl FilterDefinition {
    /// A filter that keeps only the last `limit` timeline events of every
    /// room.
    pub fn with_timeline_limit(limit: u32) -> Self {
        let timeline = RoomEventFilter {
            events: EventFilter { limit: Some(limit), ..Default::default() },
            ..Default::default()
        };

        Self {
            room: Some(RoomFilter { timeline: Some(timeline), ..Default::default() }),
            ..Default::default()
        }
    }
}

impl Api {
    /// Upload a filter, returning its id.
    ///
    /// `POST /user/{user_id}/filter`
    pub async fn create_filter(&self, user_id: &str, filter: &FilterDefinition) -> Result<String> {
        let user_id = require(user_id, "user_id")?;
        let request =
            ApiRequest::post(&["user", user_id, "filter"]).json(serde_json::to_value(filter)?);

        let response: JsonValue = self.send(request).await?;
        let filter_id = response
            .get("filter_id")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| {
                crate::Error::InvalidState("the response has no `filter_id`".to_owned())
            })?;

        Ok(filter_id.to_owned())
    }

    /// Download a filter uploaded before.
    ///
    /// `GET /user/{user_id}/filter/{filter_id}`
    pub async fn download_filter(
        &self,
        user_id: &str,
        filter_id: &str,
    ) -> Result<FilterDefinition> {
        let user_id = require(user_id, "user_id")?;
        let filter_id = require(filter_id, "filter_id")?;

        self.send(ApiRequest::get(&["user", user_id, "filter", filter_id])).await
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unset_fields_are_omitted() {
        let filter = FilterDefinition::with_timeline_limit(10);
        assert_json_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "room": { "timeline": { "limit": 10 } } })
        );
    }

    #[test]
    fn unknown_event_format_is_kept() {
        let filter: FilterDefinition =
            serde_json::from_value(json!({ "event_format": "org.example.compact" })).unwrap();
        assert_eq!(filter.event_format.unwrap().as_str(), "org.example.compact");
    }
}
