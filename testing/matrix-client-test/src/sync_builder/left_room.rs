use serde_json::{json, Value as JsonValue};

use super::{RoomAccountDataTestEvent, StateTestEvent};
use crate::DEFAULT_TEST_ROOM_ID;

/// Builder for the `rooms.leave.<room_id>` section of a sync response.
pub struct LeftRoomBuilder {
    pub(super) room_id: String,
    pub(super) inner: JsonValue,
}

impl LeftRoomBuilder {
    /// Create a new `LeftRoomBuilder` for the given room ID.
    ///
    /// If the room ID is [`DEFAULT_TEST_ROOM_ID`],
    /// [`LeftRoomBuilder::default()`] can be used instead.
    pub fn new(room_id: &str) -> Self {
        Self {
            room_id: room_id.to_owned(),
            inner: json!({
                "account_data": { "events": [] },
                "state": { "events": [] },
                "timeline": { "events": [], "limited": false },
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

    /// Set the timeline as limited.
    pub fn set_timeline_limited(mut self) -> Self {
        self.inner["timeline"]["limited"] = true.into();
        self
    }

    /// Add an event to the state.
    pub fn add_state_event(mut self, event: StateTestEvent) -> Self {
        self.events_mut("state").push(event.into());
        self
    }

    /// Add room account data.
    pub fn add_account_data(mut self, event: RoomAccountDataTestEvent) -> Self {
        self.events_mut("account_data").push(event.into());
        self
    }
}

impl Default for LeftRoomBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TEST_ROOM_ID)
    }
}
