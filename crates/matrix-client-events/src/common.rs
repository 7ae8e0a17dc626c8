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

//! Fields shared by families of events, and the traits every event
//! implements.
//!
//! Events are built by composition: a concrete event embeds one of
//! [`EventFields`], [`RoomEventFields`] or [`StateEventFields`] and calls
//! their `parse` and `write` helpers around its own content.

use std::fmt;

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

use crate::{
    json::{set, set_opt, FieldReader, JsonObject},
    EventError, Result,
};

static EMPTY_OBJECT: Lazy<JsonObject> = Lazy::new(JsonObject::new);

/// An event, typed or not.
///
/// This is the object-safe part of an event's interface; it's what custom
/// events registered at runtime are handled through.
pub trait Event: fmt::Debug + Send + Sync {
    /// The wire type of the event, e.g. `m.room.topic`.
    fn event_type(&self) -> &str;

    /// The fields every event has.
    fn fields(&self) -> &EventFields;

    /// Mutable access to the fields every event has.
    fn fields_mut(&mut self) -> &mut EventFields;

    /// The room event fields, if this is a room event.
    fn room_event(&self) -> Option<&RoomEventFields> {
        None
    }

    /// The state event fields, if this is a state event.
    fn state_event(&self) -> Option<&StateEventFields> {
        None
    }

    /// Serialize the event.
    ///
    /// This fails with [`EventError::Incomplete`] if a field required by the
    /// event type isn't set.
    fn to_json(&self) -> Result<JsonObject>;
}

/// An event type with a fixed wire type string.
pub trait TypedEvent: Event + Sized {
    /// The wire type of the event.
    const EVENT_TYPE: &'static str;

    /// Decode the event from its full JSON representation.
    ///
    /// Decoding is lenient: missing fields are left unset and only logged.
    fn from_json(json: &JsonObject) -> Result<Self>;
}

/// Get the `content` of an event, checking the `type` field if there is
/// one.
pub(crate) fn content_of<'a>(
    json: &'a JsonObject,
    expected: &'static str,
) -> Result<&'a JsonObject> {
    match json.get("type") {
        None => {}
        Some(JsonValue::String(found)) if found == expected => {}
        Some(JsonValue::String(found)) => {
            return Err(EventError::UnknownType { expected, found: found.clone() })
        }
        Some(_) => return Err(EventError::InvalidFormat("`type` is not a string".to_owned())),
    }

    match json.get("content") {
        None | Some(JsonValue::Null) => {
            tracing::warn!(event_type = expected, "Event has no content");
            Ok(&EMPTY_OBJECT)
        }
        Some(JsonValue::Object(content)) => Ok(content),
        Some(_) => {
            Err(EventError::InvalidFormat(format!("content of `{expected}` is not an object")))
        }
    }
}

/// Fields every event has.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventFields {
    /// The room the event belongs to.
    ///
    /// Homeservers strip this from events inside a sync response, in that
    /// case it is filled in from the room section the event was found in.
    pub room_id: Option<String>,
    raw: JsonObject,
}

impl EventFields {
    /// Read the base fields of an event.
    pub fn parse(json: &JsonObject, event_type: &str) -> Self {
        let reader = FieldReader::new(json, event_type);
        Self { room_id: reader.string("room_id"), raw: json.clone() }
    }

    /// The JSON the event was decoded from.
    ///
    /// Empty for events created locally.
    pub fn raw(&self) -> &JsonObject {
        &self.raw
    }

    /// Write the base fields around the given content.
    ///
    /// Starts from the raw JSON so fields we don't model survive a round
    /// trip.
    pub fn write(&self, event_type: &str, content: JsonObject) -> JsonObject {
        let mut json = self.raw.clone();
        set(&mut json, "type", event_type);
        set(&mut json, "content", content);
        set_opt(&mut json, "room_id", self.room_id.clone());
        json
    }
}

/// The content object an event was decoded with, used as the starting point
/// when writing it back.
pub(crate) fn raw_content(fields: &EventFields) -> JsonObject {
    fields.raw().get("content").and_then(JsonValue::as_object).cloned().unwrap_or_default()
}

/// Fields of events that are part of a room's history.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomEventFields {
    /// Fields every event has.
    pub base: EventFields,
    /// The globally unique id of the event.
    pub event_id: Option<String>,
    /// The user who sent the event.
    pub sender: Option<String>,
    /// When the homeserver received the event, in milliseconds since the
    /// epoch.
    pub origin_server_ts: Option<u64>,
    /// Data added by the homeserver.
    pub unsigned: Option<JsonObject>,
}

impl RoomEventFields {
    /// Read the room event fields, and the base fields after them.
    pub fn parse(json: &JsonObject, event_type: &str) -> Self {
        let reader = FieldReader::new(json, event_type);
        let event_id = reader.string("event_id");
        // Older servers call the sender `user_id`.
        let sender = reader.string("sender").or_else(|| reader.string("user_id"));
        let origin_server_ts = reader.u64("origin_server_ts");
        let unsigned = reader.object("unsigned").cloned();

        let base = EventFields::parse(json, event_type);
        Self { base, event_id, sender, origin_server_ts, unsigned }
    }

    /// Write the room event fields around the given content.
    pub fn write(&self, event_type: &str, content: JsonObject) -> JsonObject {
        let mut json = self.base.write(event_type, content);
        set_opt(&mut json, "event_id", self.event_id.clone());
        set_opt(&mut json, "sender", self.sender.clone());
        set_opt(&mut json, "origin_server_ts", self.origin_server_ts);
        set_opt(&mut json, "unsigned", self.unsigned.clone());
        json
    }

    /// The age of the event as reported by the homeserver, in milliseconds.
    pub fn age(&self) -> Option<u64> {
        self.unsigned.as_ref()?.get("age")?.as_u64()
    }

    /// The id of the transaction this event was sent with, only present on
    /// events sent by this client.
    pub fn transaction_id(&self) -> Option<&str> {
        self.unsigned.as_ref()?.get("transaction_id")?.as_str()
    }
}

/// Fields of room state events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateEventFields {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// Together with the event type, identifies the piece of state.
    ///
    /// Must be set to serialize the event. An empty string is valid and
    /// denotes the single state event of that type in the room.
    pub state_key: Option<String>,
    /// The content of the state this event replaced.
    pub prev_content: Option<JsonObject>,
}

impl StateEventFields {
    /// State fields with the given state key and nothing else set.
    pub fn with_state_key(state_key: impl Into<String>) -> Self {
        Self { state_key: Some(state_key.into()), ..Default::default() }
    }

    /// Read the state event fields, warning if the state key is missing.
    pub fn parse(json: &JsonObject, event_type: &str) -> Self {
        let reader = FieldReader::new(json, event_type);
        let state_key = reader.string("state_key");
        if state_key.is_none() {
            reader.missing("state_key");
        }
        let room = RoomEventFields::parse(json, event_type);
        let prev_content = reader.object("prev_content").cloned().or_else(|| {
            FieldReader::new(room.unsigned.as_ref()?, event_type).object("prev_content").cloned()
        });

        Self { room, state_key, prev_content }
    }

    /// Write the state event fields around the given content.
    ///
    /// Fails with [`EventError::Incomplete`](crate::EventError::Incomplete)
    /// without a state key.
    pub fn write(&self, event_type: &str, content: JsonObject) -> Result<JsonObject> {
        let state_key = crate::json::require(self.state_key.as_deref(), event_type, "state_key")?;
        let mut json = self.room.write(event_type, content);
        set(&mut json, "state_key", state_key);
        set_opt(&mut json, "prev_content", self.prev_content.clone());
        Ok(json)
    }
}

/// Implements the accessor part of [`Event`] for an event embedding
/// [`EventFields`] as `base`, [`RoomEventFields`] as `room` or
/// [`StateEventFields`] as `state`.
macro_rules! event_accessors {
    (base) => {
        fn event_type(&self) -> &str {
            <Self as $crate::TypedEvent>::EVENT_TYPE
        }

        fn fields(&self) -> &$crate::EventFields {
            &self.base
        }

        fn fields_mut(&mut self) -> &mut $crate::EventFields {
            &mut self.base
        }
    };
    (room) => {
        fn event_type(&self) -> &str {
            <Self as $crate::TypedEvent>::EVENT_TYPE
        }

        fn fields(&self) -> &$crate::EventFields {
            &self.room.base
        }

        fn fields_mut(&mut self) -> &mut $crate::EventFields {
            &mut self.room.base
        }

        fn room_event(&self) -> Option<&$crate::RoomEventFields> {
            Some(&self.room)
        }
    };
    (state) => {
        fn event_type(&self) -> &str {
            <Self as $crate::TypedEvent>::EVENT_TYPE
        }

        fn fields(&self) -> &$crate::EventFields {
            &self.state.room.base
        }

        fn fields_mut(&mut self) -> &mut $crate::EventFields {
            &mut self.state.room.base
        }

        fn room_event(&self) -> Option<&$crate::RoomEventFields> {
            Some(&self.state.room)
        }

        fn state_event(&self) -> Option<&$crate::StateEventFields> {
            Some(&self.state)
        }
    };
}

pub(crate) use event_accessors;
