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

//! Decoding raw JSON into typed events through runtime registries.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::{
    call::{CallAnswerEvent, CallCandidatesEvent, CallHangupEvent, CallInviteEvent},
    ephemeral::{PresenceEvent, ReceiptEvent, TagEvent, TypingEvent},
    json::{as_object, JsonObject},
    message::{
        AnyMessage, AudioMessage, EmoteMessage, FileMessage, GenericMessage, ImageMessage,
        LocationMessage, NoticeMessage, TextMessage, TypedMessage, VideoMessage,
    },
    registry::TypeRegistry,
    room::{
        RoomAliasesEvent, RoomAvatarEvent, RoomCanonicalAliasEvent, RoomCreateEvent,
        RoomGuestAccessEvent, RoomHistoryVisibilityEvent, RoomJoinRulesEvent, RoomMemberEvent,
        RoomMessageEvent, RoomMessageFeedbackEvent, RoomNameEvent, RoomPowerLevelsEvent,
        RoomRedactionEvent, RoomThirdPartyInviteEvent, RoomTopicEvent,
    },
    AnyEvent, EventError, GenericEvent, RegistryError, Result, TypedEvent,
};

/// Constructor of an event type.
///
/// Receives the full event JSON and the factory doing the decoding, so that
/// nested payloads can be resolved through the same registries.
pub type EventConstructor =
    Arc<dyn Fn(&JsonObject, &EventFactory) -> Result<AnyEvent> + Send + Sync>;

/// Constructor of a message type, receives the content of the
/// `m.room.message` event.
pub type MessageConstructor = Arc<dyn Fn(&JsonObject) -> Result<AnyMessage> + Send + Sync>;

static BUILTIN: Lazy<EventFactory> = Lazy::new(EventFactory::with_defaults);

/// Turns raw JSON into typed events.
///
/// The factory owns two registries, one keyed by event `type` and one keyed
/// by message `msgtype`. Both start out empty with [`EventFactory::new`], or
/// populated with every built-in type with [`EventFactory::with_defaults`].
#[derive(Default)]
pub struct EventFactory {
    events: TypeRegistry<EventConstructor>,
    messages: TypeRegistry<MessageConstructor>,
}

impl EventFactory {
    /// A factory with empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory knowing all built-in event and message types.
    pub fn with_defaults() -> Self {
        let factory = Self::new();
        factory.register_builtin_types();
        factory
    }

    /// A shared factory with the built-in types, used by
    /// [`TypedEvent::from_json`] of events with nested payloads.
    pub(crate) fn builtin() -> &'static EventFactory {
        &BUILTIN
    }

    fn register_builtin_types(&self) {
        fn event<T>(factory: &EventFactory)
        where
            T: TypedEvent + Into<AnyEvent> + 'static,
        {
            let constructor: EventConstructor =
                Arc::new(|json: &JsonObject, _: &EventFactory| T::from_json(json).map(Into::into));
            // The registries are empty at this point, registration can't
            // fail.
            let _ = factory.events.register(T::EVENT_TYPE, constructor);
        }

        fn message<T>(factory: &EventFactory)
        where
            T: TypedMessage + Into<AnyMessage> + 'static,
        {
            let constructor: MessageConstructor =
                Arc::new(|json: &JsonObject| T::from_json(json).map(Into::into));
            let _ = factory.messages.register(T::MSGTYPE, constructor);
        }

        event::<RoomMemberEvent>(self);
        event::<PresenceEvent>(self);
        event::<RoomTopicEvent>(self);
        event::<TypingEvent>(self);
        event::<RoomAliasesEvent>(self);
        event::<ReceiptEvent>(self);
        event::<RoomHistoryVisibilityEvent>(self);
        event::<RoomJoinRulesEvent>(self);
        event::<RoomNameEvent>(self);
        event::<TagEvent>(self);
        event::<RoomCanonicalAliasEvent>(self);
        event::<RoomCreateEvent>(self);
        event::<RoomPowerLevelsEvent>(self);
        event::<RoomAvatarEvent>(self);
        event::<RoomMessageFeedbackEvent>(self);
        event::<RoomGuestAccessEvent>(self);
        event::<RoomRedactionEvent>(self);
        event::<RoomThirdPartyInviteEvent>(self);
        event::<CallInviteEvent>(self);
        event::<CallCandidatesEvent>(self);
        event::<CallAnswerEvent>(self);
        event::<CallHangupEvent>(self);

        let room_message: EventConstructor = Arc::new(|json: &JsonObject, factory: &EventFactory| {
            RoomMessageEvent::from_json_with(json, factory).map(AnyEvent::RoomMessage)
        });
        let _ = self.events.register(RoomMessageEvent::EVENT_TYPE, room_message);

        message::<TextMessage>(self);
        message::<EmoteMessage>(self);
        message::<NoticeMessage>(self);
        message::<FileMessage>(self);
        message::<ImageMessage>(self);
        message::<AudioMessage>(self);
        message::<VideoMessage>(self);
        message::<LocationMessage>(self);
    }

    /// The registry of event types.
    pub fn events(&self) -> &TypeRegistry<EventConstructor> {
        &self.events
    }

    /// The registry of message types.
    pub fn messages(&self) -> &TypeRegistry<MessageConstructor> {
        &self.messages
    }

    /// Bind an event type string to a constructor.
    pub fn register_event<F>(
        &self,
        event_type: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&JsonObject, &EventFactory) -> Result<AnyEvent> + Send + Sync + 'static,
    {
        self.events.register(event_type, Arc::new(constructor))
    }

    /// Register an application defined event type.
    ///
    /// Events of that type decode to [`AnyEvent::Custom`].
    pub fn register_event_type<T: TypedEvent + 'static>(&self) -> Result<(), RegistryError> {
        self.register_event(T::EVENT_TYPE, |json, _| {
            Ok(AnyEvent::Custom(Box::new(T::from_json(json)?)))
        })
    }

    /// Remove the binding of an event type string. Does nothing if there is
    /// none.
    pub fn unregister_event(&self, event_type: &str) {
        self.events.unregister(event_type);
    }

    /// Bind a message type string to a constructor.
    pub fn register_message<F>(
        &self,
        msgtype: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&JsonObject) -> Result<AnyMessage> + Send + Sync + 'static,
    {
        self.messages.register(msgtype, Arc::new(constructor))
    }

    /// Register an application defined message type.
    ///
    /// Messages of that type decode to [`AnyMessage::Custom`].
    pub fn register_message_type<T: TypedMessage + 'static>(&self) -> Result<(), RegistryError> {
        self.register_message(T::MSGTYPE, |content| {
            Ok(AnyMessage::Custom(Box::new(T::from_json(content)?)))
        })
    }

    /// Remove the binding of a message type string. Does nothing if there is
    /// none.
    pub fn unregister_message(&self, msgtype: &str) {
        self.messages.unregister(msgtype);
    }

    /// Decode an event.
    ///
    /// Events of an unregistered type are returned as
    /// [`AnyEvent::Generic`]. Fails if the JSON isn't an object or has no
    /// `type`, or if the constructor for the type rejects it.
    pub fn decode(&self, json: &JsonValue) -> Result<AnyEvent> {
        self.decode_object(as_object(json, "event")?)
    }

    /// Decode an event given as a JSON object, see [`EventFactory::decode`].
    pub fn decode_object(&self, json: &JsonObject) -> Result<AnyEvent> {
        let event_type = match json.get("type") {
            Some(JsonValue::String(t)) => t.as_str(),
            Some(_) => return Err(EventError::InvalidFormat("`type` is not a string".to_owned())),
            None => return Err(EventError::InvalidFormat("event has no `type`".to_owned())),
        };

        match self.events.lookup(event_type) {
            Ok(constructor) => constructor(json, self),
            Err(_) => {
                trace!(event_type, "No handler registered, decoding as a generic event");
                GenericEvent::from_json(json).map(AnyEvent::Generic)
            }
        }
    }

    /// Decode a string containing an event.
    pub fn decode_str(&self, json: &str) -> Result<AnyEvent> {
        let value: JsonValue = serde_json::from_str(json)?;
        self.decode(&value)
    }

    /// Decode the content of an `m.room.message` event.
    ///
    /// Messages of an unregistered type are returned as
    /// [`AnyMessage::Generic`].
    pub fn decode_message(&self, content: &JsonObject) -> Result<AnyMessage> {
        let msgtype = match content.get("msgtype") {
            Some(JsonValue::String(t)) => t.as_str(),
            Some(_) => {
                return Err(EventError::InvalidFormat("`msgtype` is not a string".to_owned()))
            }
            None => return Err(EventError::InvalidFormat("message has no `msgtype`".to_owned())),
        };

        match self.messages.lookup(msgtype) {
            Ok(constructor) => constructor(content),
            Err(_) => {
                trace!(msgtype, "No handler registered, decoding as a generic message");
                GenericMessage::from_json(content).map(AnyMessage::Generic)
            }
        }
    }
}

impl fmt::Debug for EventFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFactory")
            .field("events", &self.events)
            .field("messages", &self.messages)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use assert_json_diff::assert_json_eq;
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::{
        common::event_accessors,
        json::{set, FieldReader},
        message::{Message, MessageFields},
        Event, EventFields,
    };

    #[test]
    fn all_builtin_types_are_registered() {
        let factory = EventFactory::with_defaults();
        assert_eq!(factory.events().types().len(), 23);
        assert_eq!(factory.messages().types().len(), 8);
        assert!(factory.events().contains("m.room.message.feedback"));
        assert!(factory.messages().contains("m.location"));
    }

    #[test]
    fn topic_round_trip() {
        let factory = EventFactory::with_defaults();
        let json =
            json!({ "type": "m.room.topic", "state_key": "", "content": { "topic": "Hello" } });

        let event = factory.decode(&json).unwrap();
        let topic = assert_matches!(&event, AnyEvent::RoomTopic(topic) => topic);
        assert_eq!(topic.state.state_key.as_deref(), Some(""));
        assert_eq!(topic.topic.as_deref(), Some("Hello"));

        assert_json_eq!(JsonValue::Object(event.to_json().unwrap()), json);
    }

    #[test]
    fn power_levels() {
        let factory = EventFactory::with_defaults();
        let event = factory
            .decode(&json!({
                "type": "m.room.power_levels",
                "state_key": "",
                "content": {
                    "ban": 50,
                    "kick": 50,
                    "redact": 100,
                    "events_default": 0,
                    "state_default": 50,
                    "users": { "@alice:example.org": 100 }
                }
            }))
            .unwrap();

        let levels = assert_matches!(event, AnyEvent::RoomPowerLevels(levels) => levels);
        assert_eq!(levels.user_level("@alice:example.org"), 100);
        assert_eq!(levels.user_level("@bob:example.org"), 0);
    }

    #[test]
    fn unknown_type_is_generic() {
        let factory = EventFactory::with_defaults();
        let json = json!({ "type": "org.example.unknown", "content": { "a": 1 } });
        let event = factory.decode(&json).unwrap();

        let generic = event.as_generic().unwrap();
        assert_eq!(generic.event_type(), "org.example.unknown");
        assert_eq!(generic.content["a"], 1);
    }

    #[test]
    fn malformed_events() {
        let factory = EventFactory::with_defaults();

        assert_matches!(factory.decode(&json!([1, 2, 3])), Err(EventError::InvalidFormat(_)));
        assert_matches!(
            factory.decode(&json!({ "content": {} })),
            Err(EventError::InvalidFormat(_))
        );
        assert_matches!(factory.decode(&json!({ "type": 5 })), Err(EventError::InvalidFormat(_)));
        assert_matches!(factory.decode_str("{"), Err(EventError::Json(_)));
        assert_matches!(
            factory.decode(&json!({ "type": "m.room.topic", "content": "Hello" })),
            Err(EventError::InvalidFormat(_))
        );
    }

    #[test]
    fn empty_factory_decodes_everything_as_generic() {
        let factory = EventFactory::new();
        let event = factory.decode(&json!({ "type": "m.room.topic", "content": {} })).unwrap();
        assert_matches!(event, AnyEvent::Generic(_));
    }

    #[derive(Debug, Default)]
    struct PollMessage {
        fields: MessageFields,
        question: Option<String>,
    }

    impl Message for PollMessage {
        fn msgtype(&self) -> &str {
            "org.example.poll"
        }

        fn fields(&self) -> &MessageFields {
            &self.fields
        }

        fn to_json(&self) -> Result<JsonObject> {
            let mut content = self.fields.raw_content();
            if let Some(question) = &self.question {
                set(&mut content, "question", question.as_str());
            }
            self.fields.write("org.example.poll", content)
        }
    }

    impl TypedMessage for PollMessage {
        const MSGTYPE: &'static str = "org.example.poll";

        fn from_json(content: &JsonObject) -> Result<Self> {
            let question = FieldReader::new(content, Self::MSGTYPE).string("question");
            Ok(Self { fields: MessageFields::parse(content, Self::MSGTYPE)?, question })
        }
    }

    #[test]
    fn message_registered_twice() {
        let factory = EventFactory::with_defaults();
        factory.register_message_type::<PollMessage>().unwrap();

        let second = factory.register_message("org.example.poll", |content| {
            GenericMessage::from_json(content).map(AnyMessage::Generic)
        });
        assert_eq!(second, Err(RegistryError::AlreadyExists("org.example.poll".to_owned())));

        // The first handler stays bound.
        let content = json!({ "msgtype": "org.example.poll", "body": "Poll", "question": "Tea?" });
        let message = factory.decode_message(content.as_object().unwrap()).unwrap();
        let poll = message.downcast_ref::<PollMessage>().unwrap();
        assert_eq!(poll.question.as_deref(), Some("Tea?"));

        factory.unregister_message("org.example.poll");
        let message = factory.decode_message(content.as_object().unwrap()).unwrap();
        assert_matches!(message, AnyMessage::Generic(_));
    }

    #[test]
    fn custom_messages_are_used_inside_room_messages() {
        let factory = EventFactory::with_defaults();
        factory.register_message_type::<PollMessage>().unwrap();

        let event = factory
            .decode(&json!({
                "type": "m.room.message",
                "content": { "msgtype": "org.example.poll", "body": "Poll", "question": "Tea?" }
            }))
            .unwrap();

        let message = event.as_room_message().and_then(|e| e.message.as_ref()).unwrap();
        assert!(message.downcast_ref::<PollMessage>().is_some());
    }

    #[derive(Debug)]
    struct ScoreEvent {
        base: EventFields,
        score: i64,
    }

    impl Event for ScoreEvent {
        event_accessors!(base);

        fn to_json(&self) -> Result<JsonObject> {
            let mut content = JsonObject::new();
            set(&mut content, "score", self.score);
            Ok(self.base.write(Self::EVENT_TYPE, content))
        }
    }

    impl TypedEvent for ScoreEvent {
        const EVENT_TYPE: &'static str = "org.example.score";

        fn from_json(json: &JsonObject) -> Result<Self> {
            let content = crate::common::content_of(json, Self::EVENT_TYPE)?;
            let score =
                FieldReader::new(content, Self::EVENT_TYPE).i64("score").unwrap_or_default();
            Ok(Self { base: EventFields::parse(json, Self::EVENT_TYPE), score })
        }
    }

    #[test]
    fn custom_event_type() {
        let factory = EventFactory::with_defaults();
        factory.register_event_type::<ScoreEvent>().unwrap();
        assert_matches!(
            factory.register_event_type::<ScoreEvent>(),
            Err(RegistryError::AlreadyExists(_))
        );

        let event = factory
            .decode(&json!({ "type": "org.example.score", "content": { "score": 7 } }))
            .unwrap();
        assert_eq!(event.event_type(), "org.example.score");
        assert_eq!(event.downcast_ref::<ScoreEvent>().unwrap().score, 7);

        factory.unregister_event("org.example.score");
        factory.register_event_type::<ScoreEvent>().unwrap();
    }
}
