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

use std::collections::BTreeMap;

use crate::{
    common::{content_of, event_accessors, raw_content},
    json::{int_map, require, set, set_opt, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// The power levels of users and the levels required for actions in a
/// room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomPowerLevelsEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// Level required to ban a user.
    pub ban: Option<i64>,
    /// Level required to kick a user.
    pub kick: Option<i64>,
    /// Level required to redact an event sent by someone else.
    pub redact: Option<i64>,
    /// Level required to invite a user.
    pub invite: Option<i64>,
    /// Default level required to send a message event.
    pub events_default: Option<i64>,
    /// Default level required to send a state event.
    pub state_default: Option<i64>,
    /// Level of users not listed in `users`.
    pub users_default: Option<i64>,
    /// Level required to trigger an `@room` notification.
    pub room_notification: Option<i64>,
    /// Levels of individual users. Required.
    pub users: Option<BTreeMap<String, i64>>,
    /// Levels required to send individual event types. Required.
    pub events: Option<BTreeMap<String, i64>>,
}

impl RoomPowerLevelsEvent {
    /// A power levels event with empty user and event maps.
    pub fn new() -> Self {
        Self {
            state: StateEventFields::with_state_key(""),
            users: Some(BTreeMap::new()),
            events: Some(BTreeMap::new()),
            ..Default::default()
        }
    }

    /// The level of `user_id`, `users_default` (or 0) if not listed.
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users
            .as_ref()
            .and_then(|users| users.get(user_id).copied())
            .unwrap_or_else(|| self.users_default.unwrap_or(0))
    }

    /// Set the level of `user_id`.
    pub fn set_user_level(&mut self, user_id: impl Into<String>, level: i64) {
        self.users.get_or_insert_with(BTreeMap::new).insert(user_id.into(), level);
    }

    /// The level required to send `event_type`, if the event type is listed.
    pub fn event_level(&self, event_type: &str) -> Option<i64> {
        self.events.as_ref()?.get(event_type).copied()
    }

    /// Set the level required to send `event_type`.
    pub fn set_event_level(&mut self, event_type: impl Into<String>, level: i64) {
        self.events.get_or_insert_with(BTreeMap::new).insert(event_type.into(), level);
    }
}

impl Event for RoomPowerLevelsEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let users = require(self.users.as_ref(), Self::EVENT_TYPE, "users")?;
        let events = require(self.events.as_ref(), Self::EVENT_TYPE, "events")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "users", int_map(users));
        set(&mut content, "events", int_map(events));
        set_opt(&mut content, "ban", self.ban);
        set_opt(&mut content, "kick", self.kick);
        set_opt(&mut content, "redact", self.redact);
        set_opt(&mut content, "invite", self.invite);
        set_opt(&mut content, "events_default", self.events_default);
        set_opt(&mut content, "state_default", self.state_default);
        set_opt(&mut content, "users_default", self.users_default);

        match self.room_notification {
            Some(level) => {
                set(&mut content, "notifications", serde_json::json!({ "room": level }));
            }
            None => {
                content.remove("notifications");
            }
        }

        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomPowerLevelsEvent {
    const EVENT_TYPE: &'static str = "m.room.power_levels";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let room_notification = reader
            .object("notifications")
            .and_then(|n| FieldReader::new(n, Self::EVENT_TYPE).i64("room"));

        Ok(Self {
            ban: reader.required_i64("ban"),
            kick: reader.required_i64("kick"),
            redact: reader.required_i64("redact"),
            invite: reader.i64("invite"),
            events_default: reader.required_i64("events_default"),
            state_default: reader.required_i64("state_default"),
            users_default: reader.i64("users_default"),
            room_notification,
            users: reader.int_map("users"),
            events: reader.int_map("events"),
            state: StateEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}
