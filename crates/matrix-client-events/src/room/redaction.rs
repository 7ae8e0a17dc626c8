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
    Event, Result, RoomEventFields, TypedEvent,
};

/// Removes the content of another event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomRedactionEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// The id of the redacted event. Required.
    pub redacts: Option<String>,
    /// Why the event was redacted.
    pub reason: Option<String>,
}

impl Event for RoomRedactionEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let redacts = require(self.redacts.as_deref(), Self::EVENT_TYPE, "redacts")?;

        let mut content = raw_content(self.fields());
        set_opt(&mut content, "reason", self.reason.clone());

        let mut json = self.room.write(Self::EVENT_TYPE, content);
        set(&mut json, "redacts", redacts);
        Ok(json)
    }
}

impl TypedEvent for RoomRedactionEvent {
    const EVENT_TYPE: &'static str = "m.room.redaction";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(json, Self::EVENT_TYPE);
        // Newer room versions moved `redacts` into the content.
        let redacts = reader
            .string("redacts")
            .or_else(|| FieldReader::new(content, Self::EVENT_TYPE).required_string("redacts"));

        Ok(Self {
            redacts,
            reason: FieldReader::new(content, Self::EVENT_TYPE).string("reason"),
            room: RoomEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn redacts_in_content() {
        let json = json!({
            "type": "m.room.redaction",
            "content": { "redacts": "$spam", "reason": "Spamming" }
        });
        let event = RoomRedactionEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.redacts.as_deref(), Some("$spam"));
        assert_eq!(event.reason.as_deref(), Some("Spamming"));
        assert_eq!(event.to_json().unwrap()["redacts"], "$spam");
    }
}
