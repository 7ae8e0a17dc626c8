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

use tracing::warn;

use crate::{
    common::{content_of, event_accessors},
    json::{require, JsonObject},
    message::{AnyMessage, GenericMessage},
    Event, EventFactory, Result, RoomEventFields, TypedEvent,
};

/// A message sent to a room.
#[derive(Debug, Default)]
pub struct RoomMessageEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// The message. Unset for redacted messages. Required.
    pub message: Option<AnyMessage>,
}

impl RoomMessageEvent {
    /// An event carrying `message`.
    pub fn new(message: impl Into<AnyMessage>) -> Self {
        Self { room: RoomEventFields::default(), message: Some(message.into()) }
    }

    /// Decode the event, resolving the message type through the message
    /// registry of `factory`.
    pub fn from_json_with(json: &JsonObject, factory: &EventFactory) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let room = RoomEventFields::parse(json, Self::EVENT_TYPE);

        let message = if content.contains_key("msgtype") {
            match factory.decode_message(content) {
                Ok(message) => Some(message),
                Err(error) => {
                    warn!(
                        event_id = ?room.event_id,
                        ?error,
                        "Couldn't decode the message, keeping it as a generic one"
                    );
                    GenericMessage::from_json(content).ok().map(AnyMessage::Generic)
                }
            }
        } else {
            // Redacted messages have an empty content.
            if !content.is_empty() {
                warn!(event_id = ?room.event_id, "Message content has no `msgtype`");
            }
            None
        };

        Ok(Self { room, message })
    }
}

impl Event for RoomMessageEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let message = require(self.message.as_ref(), Self::EVENT_TYPE, "message")?;
        let content = message.to_json()?;
        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for RoomMessageEvent {
    const EVENT_TYPE: &'static str = "m.room.message";

    /// Decode the event knowing only the built-in message types.
    ///
    /// Message types registered on an [`EventFactory`] are not seen here and
    /// decode to [`AnyMessage::Generic`], use
    /// [`RoomMessageEvent::from_json_with`] or [`EventFactory::decode`] to
    /// resolve them.
    fn from_json(json: &JsonObject) -> Result<Self> {
        Self::from_json_with(json, EventFactory::builtin())
    }
}
