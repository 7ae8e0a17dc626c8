use std::collections::BTreeMap;

use serde_json::{json, Value as JsonValue};

mod invited_room;
mod joined_room;
mod left_room;
mod test_event;

pub use invited_room::InvitedRoomBuilder;
pub use joined_room::JoinedRoomBuilder;
pub use left_room::LeftRoomBuilder;
pub use test_event::{
    EphemeralTestEvent, PresenceTestEvent, RoomAccountDataTestEvent, StateTestEvent,
};

/// The `SyncResponseBuilder` struct can be used to easily generate valid sync
/// responses for testing. These can then be served by a mock homeserver or fed
/// into `BaseClient::receive_sync_response`.
///
/// It supports a number of canned events, such as a member entering a room,
/// their power level and display name changing and similar. It also supports
/// insertion of custom events in the form of JSON values.
#[derive(Default)]
pub struct SyncResponseBuilder {
    /// Updates to joined rooms.
    joined_rooms: BTreeMap<String, JsonValue>,
    /// Updates to invited rooms.
    invited_rooms: BTreeMap<String, JsonValue>,
    /// Updates to left rooms.
    left_rooms: BTreeMap<String, JsonValue>,
    /// Events that determine the presence state of a user.
    presence: Vec<JsonValue>,
    /// Global account data events.
    account_data: Vec<JsonValue>,
    /// Internal counter to enable the `prev_batch` and `next_batch` of each
    /// sync response to vary.
    batch_counter: i64,
}

impl SyncResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a joined room to the next sync response.
    ///
    /// If a room with the same room ID already exists, it is replaced by this
    /// one.
    pub fn add_joined_room(&mut self, room: JoinedRoomBuilder) -> &mut Self {
        self.invited_rooms.remove(&room.room_id);
        self.left_rooms.remove(&room.room_id);
        self.joined_rooms.insert(room.room_id, room.inner);
        self
    }

    /// Add an invited room to the next sync response.
    ///
    /// If a room with the same room ID already exists, it is replaced by this
    /// one.
    pub fn add_invited_room(&mut self, room: InvitedRoomBuilder) -> &mut Self {
        self.joined_rooms.remove(&room.room_id);
        self.left_rooms.remove(&room.room_id);
        self.invited_rooms.insert(room.room_id, room.inner);
        self
    }

    /// Add a left room to the next sync response.
    ///
    /// If a room with the same room ID already exists, it is replaced by this
    /// one.
    pub fn add_left_room(&mut self, room: LeftRoomBuilder) -> &mut Self {
        self.joined_rooms.remove(&room.room_id);
        self.invited_rooms.remove(&room.room_id);
        self.left_rooms.insert(room.room_id, room.inner);
        self
    }

    /// Add a presence event.
    pub fn add_presence_event(&mut self, event: PresenceTestEvent) -> &mut Self {
        self.presence.push(event.into());
        self
    }

    /// Add global account data based on a JSON value.
    pub fn add_global_account_data(&mut self, event: JsonValue) -> &mut Self {
        self.account_data.push(event);
        self
    }

    /// Builds a sync response as a JSON value containing the events we queued
    /// so far.
    ///
    /// The next response returned by `build_json_sync_response` will then be
    /// empty if no further events were queued.
    pub fn build_json_sync_response(&mut self) -> JsonValue {
        self.batch_counter += 1;
        let next_batch = self.generate_sync_token();

        let body = json!({
            "next_batch": next_batch,
            "rooms": {
                "invite": self.invited_rooms,
                "join": self.joined_rooms,
                "leave": self.left_rooms,
            },
            "presence": {
                "events": self.presence,
            },
            "account_data": {
                "events": self.account_data,
            },
        });

        // Clear state so that the next sync response will be empty if nothing
        // was added.
        self.clear();

        body
    }

    /// The `next_batch` token of the last built response.
    pub fn sync_token(&self) -> String {
        self.generate_sync_token()
    }

    fn generate_sync_token(&self) -> String {
        format!("t392-516_47314_0_7_1_1_1_11444_{}", self.batch_counter)
    }

    pub fn clear(&mut self) {
        self.account_data.clear();
        self.invited_rooms.clear();
        self.joined_rooms.clear();
        self.left_rooms.clear();
        self.presence.clear();
    }
}
