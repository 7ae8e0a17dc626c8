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
    enums::FeedbackType,
    json::{require, set, FieldReader, JsonObject},
    Event, Result, RoomEventFields, TypedEvent,
};

/// Delivery or read feedback for a message.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomMessageFeedbackEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// The event the feedback is about. Required.
    pub target_event_id: Option<String>,
    /// The kind of feedback. Required.
    pub feedback_type: Option<FeedbackType>,
}

impl Event for RoomMessageFeedbackEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let target =
            require(self.target_event_id.as_deref(), Self::EVENT_TYPE, "target_event_id")?;
        let feedback_type = require(self.feedback_type.as_ref(), Self::EVENT_TYPE, "type")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "target_event_id", target);
        set(&mut content, "type", feedback_type);

        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for RoomMessageFeedbackEvent {
    const EVENT_TYPE: &'static str = "m.room.message.feedback";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);

        Ok(Self {
            target_event_id: reader.required_string("target_event_id"),
            feedback_type: reader.required_enum("type"),
            room: RoomEventFields::parse(json, Self::EVENT_TYPE),
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
    fn round_trip() {
        let json = json!({
            "type": "m.room.message.feedback",
            "event_id": "$feedback",
            "sender": "@alice:example.org",
            "content": { "target_event_id": "$message", "type": "read" }
        });
        let event = RoomMessageFeedbackEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.target_event_id.as_deref(), Some("$message"));
        assert_eq!(event.feedback_type, Some(FeedbackType::Read));
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn missing_fields_are_tolerated_on_receipt() {
        let json = json!({ "type": "m.room.message.feedback", "content": {} });
        let event = RoomMessageFeedbackEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.target_event_id, None);
        assert_eq!(event.feedback_type, None);
    }

    #[test]
    fn target_and_type_are_required() {
        let event = RoomMessageFeedbackEvent {
            feedback_type: Some(FeedbackType::Delivered),
            ..Default::default()
        };
        assert_matches!(
            event.to_json(),
            Err(EventError::Incomplete { field: "target_event_id", .. })
        );

        let event = RoomMessageFeedbackEvent {
            target_event_id: Some("$message".to_owned()),
            ..Default::default()
        };
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "type", .. }));
    }
}
