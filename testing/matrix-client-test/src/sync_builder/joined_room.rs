use serde_json::{json, Value as JsonValue};

use super::{EphemeralTestEvent, RoomAccountDataTestEvent, StateTestEvent};
use crate::DEFAULT_TEST_ROOM_ID;

/// Builder for the `rooms.join.<room_id>` section of a sync response.
pub struct JoinedRoomBuilder {
    pub(super) room_id: String,
    pub(super) inner: JsonValue,
}

impl JoinedRoomBuilder {
    /// Create a new `JoinedRoomBuilder` for the given room ID.
    ///
    /// If the room ID is [`DEFAULT_TEST_ROOM_ID`],
    /// [`JoinedRoomBuilder::default()`] can be used instead.
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_owned(),
            inner: json!({
                "account_data": { "events": [] },
                "ephemeral": { "events": [] },
                "state": { "events": [] },
                "timeline": { "events": [], "limited": false },
                "unread_notifications": {},
            }),
        }
    }

    fn events_mut(&mut self, section: &str) -> &mut Vec<JsonValue> {
        self.inner[section]["events"].as_array_mut().expect("sections are always arrays")
    }

    /// Add an event to the timeline.
    pub fn add_timeline_event(mut self, event: impl Into<JsonValue>) -> Self {
        self.events_mut("timeline").push(event.into());
        self
    }

    /// Add events in bulk to the timeline.
    pub fn add_timeline_bulk<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = JsonValue>,
    {
        self.events_mut("timeline").extend(events);
        self
    }

    /// Set the timeline as limited.
    pub fn set_timeline_limited(mut self) -> Self {
        self.inner["timeline"]["limited"] = true.into();
        self
    }

    /// Set the `prev_batch` of the timeline.
    pub fn set_timeline_prev_batch(mut self, prev_batch: impl Into<String>) -> Self {
        self.inner["timeline"]["prev_batch"] = prev_batch.into().into();
        self
    }

    /// Add an event to the state.
    pub fn add_state_event(mut self, event: StateTestEvent) -> Self {
        self.events_mut("state").push(event.into());
        self
    }

    /// Add events in bulk to the state.
    pub fn add_state_bulk<I>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = JsonValue>,
    {
        self.events_mut("state").extend(events);
        self
    }

    /// Add room account data.
    pub fn add_account_data(mut self, event: RoomAccountDataTestEvent) -> Self {
        self.events_mut("account_data").push(event.into());
        self
    }

    /// Add an ephemeral event.
    pub fn add_ephemeral_event(mut self, event: EphemeralTestEvent) -> Self {
        self.events_mut("ephemeral").push(event.into());
        self
    }

    /// Set the room's unread notification counts.
    pub fn set_unread_notifications(
        mut self,
        highlight_count: u64,
        notification_count: u64,
    ) -> Self {
        self.inner["unread_notifications"] = json!({
            "highlight_count": highlight_count,
            "notification_count": notification_count,
        });
        self
    }
}

impl Default for JoinedRoomBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_ROOM_ID)
    }
}
