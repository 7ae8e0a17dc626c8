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

//! The sum type over all events the factory can produce.

use std::any::Any;

use as_variant::as_variant;

use crate::{
    call::{CallAnswerEvent, CallCandidatesEvent, CallHangupEvent, CallInviteEvent},
    ephemeral::{PresenceEvent, ReceiptEvent, TagEvent, TypingEvent},
    json::{set_opt, FieldReader, JsonObject},
    room::{
        RoomAliasesEvent, RoomAvatarEvent, RoomCanonicalAliasEvent, RoomCreateEvent,
        RoomGuestAccessEvent, RoomHistoryVisibilityEvent, RoomJoinRulesEvent, RoomMemberEvent,
        RoomMessageEvent, RoomMessageFeedbackEvent, RoomNameEvent, RoomPowerLevelsEvent,
        RoomRedactionEvent, RoomThirdPartyInviteEvent, RoomTopicEvent,
    },
    Event, EventError, EventFields, Result, RoomEventFields, StateEventFields,
};

/// An event type registered at runtime by the application.
pub trait CustomEvent: Event {
    /// Access the event as [`Any`] to downcast it to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Access the event through the [`Event`] interface.
    fn as_event(&self) -> &dyn Event;

    /// Mutable access through the [`Event`] interface.
    fn as_event_mut(&mut self) -> &mut dyn Event;
}

impl<T: Event + 'static> CustomEvent for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_event(&self) -> &dyn Event {
        self
    }

    fn as_event_mut(&mut self) -> &mut dyn Event {
        self
    }
}

/// An event of a type nobody registered.
///
/// The event is kept as it was received, the common fields are parsed for
/// convenience.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericEvent {
    event_type: String,
    /// The room event fields, all unset if this isn't a room event.
    pub room: RoomEventFields,
    /// The state key, if this is a state event.
    pub state_key: Option<String>,
    /// The content of the event.
    pub content: JsonObject,
}

impl GenericEvent {
    /// Wrap raw event JSON. Fails only if there's no `type`.
    pub fn from_json(json: &JsonObject) -> Result<Self> {
        let event_type = json
            .get("type")
            .and_then(|t| t.as_str())
            .ok_or_else(|| EventError::InvalidFormat("event has no `type`".to_owned()))?
            .to_owned();
        let reader = FieldReader::new(json, &event_type);

        Ok(Self {
            content: reader.object("content").cloned().unwrap_or_default(),
            state_key: reader.string("state_key"),
            room: RoomEventFields::parse(json, &event_type),
            event_type,
        })
    }
}

impl Event for GenericEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn fields(&self) -> &EventFields {
        &self.room.base
    }

    fn fields_mut(&mut self) -> &mut EventFields {
        &mut self.room.base
    }

    fn to_json(&self) -> Result<JsonObject> {
        let mut json = self.room.write(&self.event_type, self.content.clone());
        set_opt(&mut json, "state_key", self.state_key.clone());
        Ok(json)
    }
}

/// Any event.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyEvent {
    /// `m.presence`
    Presence(PresenceEvent),
    /// `m.typing`
    Typing(TypingEvent),
    /// `m.receipt`
    Receipt(ReceiptEvent),
    /// `m.tag`
    Tag(TagEvent),
    /// `m.room.aliases`
    RoomAliases(RoomAliasesEvent),
    /// `m.room.avatar`
    RoomAvatar(RoomAvatarEvent),
    /// `m.room.canonical_alias`
    RoomCanonicalAlias(RoomCanonicalAliasEvent),
    /// `m.room.create`
    RoomCreate(RoomCreateEvent),
    /// `m.room.guest_access`
    RoomGuestAccess(RoomGuestAccessEvent),
    /// `m.room.history_visibility`
    RoomHistoryVisibility(RoomHistoryVisibilityEvent),
    /// `m.room.join_rules`
    RoomJoinRules(RoomJoinRulesEvent),
    /// `m.room.member`
    RoomMember(RoomMemberEvent),
    /// `m.room.message`
    RoomMessage(RoomMessageEvent),
    /// `m.room.message.feedback`
    RoomMessageFeedback(RoomMessageFeedbackEvent),
    /// `m.room.name`
    RoomName(RoomNameEvent),
    /// `m.room.power_levels`
    RoomPowerLevels(RoomPowerLevelsEvent),
    /// `m.room.redaction`
    RoomRedaction(RoomRedactionEvent),
    /// `m.room.third_party_invite`
    RoomThirdPartyInvite(RoomThirdPartyInviteEvent),
    /// `m.room.topic`
    RoomTopic(RoomTopicEvent),
    /// `m.call.answer`
    CallAnswer(CallAnswerEvent),
    /// `m.call.candidates`
    CallCandidates(CallCandidatesEvent),
    /// `m.call.hangup`
    CallHangup(CallHangupEvent),
    /// `m.call.invite`
    CallInvite(CallInviteEvent),
    /// An event type registered by the application.
    Custom(Box<dyn CustomEvent>),
    /// An event type nobody registered.
    Generic(GenericEvent),
}

macro_rules! any_event_impls {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        impl AnyEvent {
            /// Access the event through its object-safe interface.
            pub fn as_event(&self) -> &dyn Event {
                match self {
                    $( Self::$variant(e) => e, )*
                    Self::Custom(e) => e.as_event(),
                    Self::Generic(e) => e,
                }
            }

            fn as_event_mut(&mut self) -> &mut dyn Event {
                match self {
                    $( Self::$variant(e) => e, )*
                    Self::Custom(e) => e.as_event_mut(),
                    Self::Generic(e) => e,
                }
            }
        }

        $(
            impl From<$ty> for AnyEvent {
                fn from(event: $ty) -> Self {
                    Self::$variant(event)
                }
            }
        )*
    };
}

any_event_impls! {
    Presence(PresenceEvent),
    Typing(TypingEvent),
    Receipt(ReceiptEvent),
    Tag(TagEvent),
    RoomAliases(RoomAliasesEvent),
    RoomAvatar(RoomAvatarEvent),
    RoomCanonicalAlias(RoomCanonicalAliasEvent),
    RoomCreate(RoomCreateEvent),
    RoomGuestAccess(RoomGuestAccessEvent),
    RoomHistoryVisibility(RoomHistoryVisibilityEvent),
    RoomJoinRules(RoomJoinRulesEvent),
    RoomMember(RoomMemberEvent),
    RoomMessage(RoomMessageEvent),
    RoomMessageFeedback(RoomMessageFeedbackEvent),
    RoomName(RoomNameEvent),
    RoomPowerLevels(RoomPowerLevelsEvent),
    RoomRedaction(RoomRedactionEvent),
    RoomThirdPartyInvite(RoomThirdPartyInviteEvent),
    RoomTopic(RoomTopicEvent),
    CallAnswer(CallAnswerEvent),
    CallCandidates(CallCandidatesEvent),
    CallHangup(CallHangupEvent),
    CallInvite(CallInviteEvent),
}

impl From<GenericEvent> for AnyEvent {
    fn from(event: GenericEvent) -> Self {
        Self::Generic(event)
    }
}

impl AnyEvent {
    /// The wire type of the event.
    pub fn event_type(&self) -> &str {
        self.as_event().event_type()
    }

    /// Serialize the event, see [`Event::to_json`].
    pub fn to_json(&self) -> Result<JsonObject> {
        self.as_event().to_json()
    }

    /// The room the event belongs to, if known.
    pub fn room_id(&self) -> Option<&str> {
        self.as_event().fields().room_id.as_deref()
    }

    /// Set the room of the event unless it already has one.
    ///
    /// Returns `true` if the room id was set.
    pub fn backfill_room_id(&mut self, room_id: &str) -> bool {
        let fields = self.as_event_mut().fields_mut();
        if fields.room_id.is_some() {
            return false;
        }
        fields.room_id = Some(room_id.to_owned());
        true
    }

    /// The room event fields, if this is a room event.
    pub fn room_event(&self) -> Option<&RoomEventFields> {
        self.as_event().room_event()
    }

    /// The state event fields, if this is a state event.
    pub fn state_event(&self) -> Option<&StateEventFields> {
        self.as_event().state_event()
    }

    /// The sender of the event, if this is a room event or presence.
    pub fn sender(&self) -> Option<&str> {
        match self {
            Self::Presence(e) => e.sender.as_deref(),
            _ => self.room_event()?.sender.as_deref(),
        }
    }

    /// Downcast a custom event to its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        as_variant!(self, Self::Custom)?.as_any().downcast_ref()
    }

    /// Get the `m.room.member` event, if this is one.
    pub fn as_room_member(&self) -> Option<&RoomMemberEvent> {
        as_variant!(self, Self::RoomMember)
    }

    /// Get the `m.room.message` event, if this is one.
    pub fn as_room_message(&self) -> Option<&RoomMessageEvent> {
        as_variant!(self, Self::RoomMessage)
    }

    /// Get the wrapped generic event, if the type wasn't registered.
    pub fn as_generic(&self) -> Option<&GenericEvent> {
        as_variant!(self, Self::Generic)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::TypedEvent;

    #[test]
    fn generic_keeps_everything() {
        let json = json!({
            "type": "org.example.custom.state",
            "state_key": "",
            "event_id": "$custom",
            "sender": "@alice:example.org",
            "content": { "answer": 42 }
        });
        let event = GenericEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.event_type(), "org.example.custom.state");
        assert_eq!(event.content["answer"], 42);
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn generic_content_removals_stick() {
        let json = json!({
            "type": "org.example.custom",
            "content": { "keep": 1, "drop": 2 }
        });
        let mut event = GenericEvent::from_json(json.as_object().unwrap()).unwrap();
        event.content.remove("drop");

        let written = event.to_json().unwrap();
        assert_eq!(written["content"], json!({ "keep": 1 }));
    }

    #[test]
    fn backfill_only_when_missing() {
        let mut event: AnyEvent = RoomTopicEvent::new("Hello").into();
        assert!(event.backfill_room_id("!a:example.org"));
        assert!(!event.backfill_room_id("!b:example.org"));
        assert_eq!(event.room_id(), Some("!a:example.org"));
    }

    #[test]
    fn classification() {
        let topic: AnyEvent = RoomTopicEvent::new("Hello").into();
        assert!(topic.state_event().is_some());
        assert_eq!(topic.event_type(), RoomTopicEvent::EVENT_TYPE);

        let typing: AnyEvent = TypingEvent::default().into();
        assert!(typing.room_event().is_none());
    }
}
