use serde_json::{json, Value as JsonValue};

use super::StateTestEvent;

/// Builder for the `rooms.invite.<room_id>` section of a sync response.
pub struct InvitedRoomBuilder {
    pub(super) room_id: String,
    pub(super) inner: JsonValue,
}

impl InvitedRoomBuilder {
    /// Create a new `InvitedRoomBuilder` for the given room ID.
    pub fn new(room_id: &str) -> Self {
        Self { room_id: room_id.to_owned(), inner: json!({ "invite_state": { "events": [] } }) }
    }

    /// Add an event to the stripped invite state.
    pub fn add_state_event(mut self, event: StateTestEvent) -> Self {
        if let Some(events) = self.inner["invite_state"]["events"].as_array_mut() {
            events.push(event.into());
        }
        self
    }

    /// Add events in bulk to the stripped invite state.
    pub fn add_state_bulk<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = JsonValue>,
    {
        if let Some(list) = self.inner["invite_state"]["events"].as_array_mut() {
            list.extend(events);
        }
        self
    }
}
