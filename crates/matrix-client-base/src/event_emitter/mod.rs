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

use async_trait::async_trait;
use matrix_client_events::{
    call::{CallAnswerEvent, CallCandidatesEvent, CallHangupEvent, CallInviteEvent},
    room::{
        RoomAliasesEvent, RoomAvatarEvent, RoomCanonicalAliasEvent, RoomCreateEvent,
        RoomMemberEvent, RoomMessageEvent, RoomMessageFeedbackEvent, RoomNameEvent,
        RoomPowerLevelsEvent, RoomRedactionEvent, RoomTopicEvent,
    },
    AnyEvent, JsonValue, PresenceEvent, ReceiptEvent, TagEvent, TypingEvent,
};

use crate::Room;

/// This trait allows any type implementing `EventEmitter` to specify event
/// callbacks for each event. The `BaseClient` calls each method when the
/// corresponding event is received.
///
/// [`EventEmitter::on_event`] fires for every event of a sync response, in
/// the order the events are applied, before the typed method of the event.
/// The typed methods receive a snapshot of the room taken after the event
/// was applied to it.
///
/// The callbacks run while the sync response is being applied, no other
/// sync can start until they return. Spawn a task to sync from a callback
/// and don't wait for it there.
///
/// # Examples
/// ```
/// use matrix_client_base::{
///     events::{message::AnyMessage, room::RoomMessageEvent},
///     async_trait, EventEmitter, Room,
/// };
///
/// struct EventCallback;
///
/// #[async_trait]
/// impl EventEmitter for EventCallback {
///     async fn on_room_message(&self, room: &Room, event: &RoomMessageEvent) {
///         if let Some(AnyMessage::Text(text)) = &event.message {
///             let sender = event.room.sender.as_deref().unwrap_or_default();
///             let name = room.get_member(sender).map(|m| m.name()).unwrap_or(sender);
///
///             println!("{name}: {}", text.fields.body.as_deref().unwrap_or_default());
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Fires for every event, whether it could be decoded or not.
    ///
    /// `room_id` is the room the event was delivered for, `None` for global
    /// events. `event` is `None` if the event failed to decode.
    async fn on_event(
        &self,
        _room_id: Option<&str>,
        _raw: &JsonValue,
        _event: Option<&AnyEvent>,
    ) {
    }

    // ROOM EVENTS
    /// Fires when the client receives an `m.room.member` event.
    async fn on_room_member(&self, _: &Room, _: &RoomMemberEvent) {}
    /// Fires when the client receives an `m.room.name` event.
    async fn on_room_name(&self, _: &Room, _: &RoomNameEvent) {}
    /// Fires when the client receives an `m.room.topic` event.
    async fn on_room_topic(&self, _: &Room, _: &RoomTopicEvent) {}
    /// Fires when the client receives an `m.room.create` event.
    async fn on_room_create(&self, _: &Room, _: &RoomCreateEvent) {}
    /// Fires when the client receives an `m.room.canonical_alias` event.
    async fn on_room_canonical_alias(&self, _: &Room, _: &RoomCanonicalAliasEvent) {}
    /// Fires when the client receives an `m.room.aliases` event.
    async fn on_room_aliases(&self, _: &Room, _: &RoomAliasesEvent) {}
    /// Fires when the client receives an `m.room.avatar` event.
    async fn on_room_avatar(&self, _: &Room, _: &RoomAvatarEvent) {}
    /// Fires when the client receives an `m.room.message` event.
    async fn on_room_message(&self, _: &Room, _: &RoomMessageEvent) {}
    /// Fires when the client receives an `m.room.message.feedback` event.
    async fn on_room_message_feedback(&self, _: &Room, _: &RoomMessageFeedbackEvent) {}
    /// Fires when the client receives an `m.room.redaction` event.
    async fn on_room_redaction(&self, _: &Room, _: &RoomRedactionEvent) {}
    /// Fires when the client receives an `m.room.power_levels` event.
    async fn on_room_power_levels(&self, _: &Room, _: &RoomPowerLevelsEvent) {}

    // CALLS
    /// Fires when the client receives an `m.call.invite` event.
    async fn on_call_invite(&self, _: &Room, _: &CallInviteEvent) {}
    /// Fires when the client receives an `m.call.candidates` event.
    async fn on_call_candidates(&self, _: &Room, _: &CallCandidatesEvent) {}
    /// Fires when the client receives an `m.call.answer` event.
    async fn on_call_answer(&self, _: &Room, _: &CallAnswerEvent) {}
    /// Fires when the client receives an `m.call.hangup` event.
    async fn on_call_hangup(&self, _: &Room, _: &CallHangupEvent) {}

    // EPHEMERAL AND ACCOUNT DATA
    /// Fires when the client receives an `m.typing` event.
    async fn on_typing(&self, _: &Room, _: &TypingEvent) {}
    /// Fires when the client receives an `m.receipt` event.
    async fn on_receipt(&self, _: &Room, _: &ReceiptEvent) {}
    /// Fires when the client receives an `m.tag` event.
    async fn on_tag(&self, _: &Room, _: &TagEvent) {}

    // `PresenceEvent` is global, there is no room to pass
    /// Fires when the client receives an `m.presence` event.
    async fn on_presence(&self, _: &PresenceEvent) {}

    /// Fires for events decoded by a constructor registered by the
    /// application, see
    /// [`EventFactory::register_event_type`](matrix_client_events::EventFactory::register_event_type).
    async fn on_custom_event(&self, _room: Option<&Room>, _: &AnyEvent) {}
}

/// Call the typed method of the emitter matching the event.
pub(crate) async fn emit_typed(emitter: &dyn EventEmitter, room: Option<&Room>, event: &AnyEvent) {
    if let AnyEvent::Presence(e) = event {
        return emitter.on_presence(e).await;
    }
    if let AnyEvent::Custom(_) = event {
        return emitter.on_custom_event(room, event).await;
    }

    let Some(room) = room else { return };

    match event {
        AnyEvent::RoomMember(e) => emitter.on_room_member(room, e).await,
        AnyEvent::RoomName(e) => emitter.on_room_name(room, e).await,
        AnyEvent::RoomTopic(e) => emitter.on_room_topic(room, e).await,
        AnyEvent::RoomCreate(e) => emitter.on_room_create(room, e).await,
        AnyEvent::RoomCanonicalAlias(e) => emitter.on_room_canonical_alias(room, e).await,
        AnyEvent::RoomAliases(e) => emitter.on_room_aliases(room, e).await,
        AnyEvent::RoomAvatar(e) => emitter.on_room_avatar(room, e).await,
        AnyEvent::RoomMessage(e) => emitter.on_room_message(room, e).await,
        AnyEvent::RoomMessageFeedback(e) => emitter.on_room_message_feedback(room, e).await,
        AnyEvent::RoomRedaction(e) => emitter.on_room_redaction(room, e).await,
        AnyEvent::RoomPowerLevels(e) => emitter.on_room_power_levels(room, e).await,
        AnyEvent::CallInvite(e) => emitter.on_call_invite(room, e).await,
        AnyEvent::CallCandidates(e) => emitter.on_call_candidates(room, e).await,
        AnyEvent::CallAnswer(e) => emitter.on_call_answer(room, e).await,
        AnyEvent::CallHangup(e) => emitter.on_call_hangup(room, e).await,
        AnyEvent::Typing(e) => emitter.on_typing(room, e).await,
        AnyEvent::Receipt(e) => emitter.on_receipt(room, e).await,
        AnyEvent::Tag(e) => emitter.on_tag(room, e).await,
        _ => {}
    }
}
