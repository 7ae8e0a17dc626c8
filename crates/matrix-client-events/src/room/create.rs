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

use crate::{
    common::{content_of, event_accessors, raw_content},
    json::{require, set, set_opt, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// The first event of every room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomCreateEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// The user who created the room. Required.
    pub creator: Option<String>,
    /// Whether users on other servers can join, `true` if absent.
    pub federate: Option<bool>,
    /// The version of the room.
    pub room_version: Option<String>,
    /// The room this one replaces, as `(room_id, event_id)`.
    pub predecessor: Option<(String, String)>,
}

impl RoomCreateEvent {
    /// A create event for a room created by `creator`.
    pub fn new(creator: impl Into<String>) -> Self {
        Self {
            state: StateEventFields::with_state_key(""),
            creator: Some(creator.into()),
            ..Default::default()
        }
    }

    /// Whether users on other servers can join the room.
    pub fn federate(&self) -> bool {
        self.federate.unwrap_or(true)
    }

    /// The creator of the room, or the sender of this event when `creator`
    /// is absent as in room version 11 and later.
    pub fn effective_creator(&self) -> Option<&str> {
        self.creator.as_deref().or(self.state.room.sender.as_deref())
    }
}

impl Event for RoomCreateEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let creator = require(self.creator.as_deref(), Self::EVENT_TYPE, "creator")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "creator", creator);
        set_opt(&mut content, "m.federate", self.federate);
        set_opt(&mut content, "room_version", self.room_version.clone());
        set_opt(
            &mut content,
            "predecessor",
            self.predecessor.as_ref().map(|(room_id, event_id)| {
                serde_json::json!({ "room_id": room_id, "event_id": event_id })
            }),
        );

        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomCreateEvent {
    const EVENT_TYPE: &'static str = "m.room.create";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let state = StateEventFields::parse(json, Self::EVENT_TYPE);

        let creator = reader.required_string("creator");
        let predecessor = reader.object("predecessor").and_then(|p| {
            let p = FieldReader::new(p, Self::EVENT_TYPE);
            Some((p.string("room_id")?, p.string("event_id")?))
        });

        Ok(Self {
            creator,
            federate: reader.bool("m.federate"),
            room_version: reader.string("room_version"),
            predecessor,
            state,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::EventError;

    #[test]
    fn missing_creator_is_tolerated() {
        let json = json!({ "type": "m.room.create", "state_key": "", "content": {} });
        let event = RoomCreateEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.creator, None);
        assert!(event.federate());
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "creator", .. }));
    }

    #[test]
    fn sender_is_not_the_creator() {
        let json = json!({
            "type": "m.room.create",
            "state_key": "",
            "sender": "@alice:example.org",
            "content": { "room_version": "11" }
        });
        let event = RoomCreateEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.creator, None);
        assert_eq!(event.effective_creator(), Some("@alice:example.org"));
    }

    #[test]
    fn round_trip() {
        let mut event = RoomCreateEvent::new("@alice:example.org");
        event.federate = Some(false);
        event.predecessor = Some(("!old:example.org".to_owned(), "$tombstone".to_owned()));

        let parsed = RoomCreateEvent::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(parsed, RoomCreateEvent { state: parsed.state.clone(), ..event });
        assert!(!parsed.federate());
    }
}
