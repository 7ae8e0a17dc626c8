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

use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, RwLock},
};

use matrix_client_events::{enums::Presence, AnyEvent, Event, EventFactory, JsonValue};
use tracing::{debug, instrument, trace, warn};

use crate::{
    event_emitter::{emit_typed, EventEmitter},
    rooms::{Room, RoomState},
    sync::SyncResponse,
    Error, Profile, Result,
};

/// A no (network) IO client implementation.
///
/// This client is a state machine that receives responses and events and
/// accordingly updates its state: the room cache, the global profile and
/// presence caches and the sync continuation token.
///
/// The caches are only ever mutated by the fold step driven from
/// [`BaseClient::receive_sync_response`] and the explicit setters; reads
/// return snapshots.
pub struct BaseClient {
    factory: Arc<EventFactory>,
    user_id: RwLock<Option<String>>,
    sync_token: RwLock<Option<String>>,
    rooms: RwLock<BTreeMap<String, Room>>,
    profiles: RwLock<BTreeMap<String, Profile>>,
    presence: RwLock<BTreeMap<String, Presence>>,
    account_data: RwLock<BTreeMap<String, JsonValue>>,
    event_emitter: RwLock<Option<Arc<dyn EventEmitter>>>,
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for BaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseClient")
            .field("user_id", &self.user_id)
            .field("sync_token", &self.sync_token)
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

impl Default for BaseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseClient {
    /// Create a new client decoding events with the built-in types.
    pub fn new() -> Self {
        Self::with_event_factory(Arc::new(EventFactory::with_defaults()))
    }

    /// Create a new client decoding events with the given factory.
    ///
    /// Types registered on the factory later on are picked up by the next
    /// decoded event.
    pub fn with_event_factory(factory: Arc<EventFactory>) -> Self {
        Self {
            factory,
            user_id: Default::default(),
            sync_token: Default::default(),
            rooms: Default::default(),
            profiles: Default::default(),
            presence: Default::default(),
            account_data: Default::default(),
            event_emitter: Default::default(),
        }
    }

    /// The factory used to decode events.
    pub fn event_factory(&self) -> &Arc<EventFactory> {
        &self.factory
    }

    /// Add `EventEmitter` to `BaseClient`.
    ///
    /// The methods of `EventEmitter` are called when the respective events
    /// are received during sync. Replaces any previous emitter.
    pub fn add_event_emitter(&self, emitter: Box<dyn EventEmitter>) {
        *self.event_emitter.write().unwrap() = Some(Arc::from(emitter));
    }

    /// Set the user the client is logged in as, `None` after logging out.
    pub fn set_user_id(&self, user_id: Option<String>) {
        *self.user_id.write().unwrap() = user_id;
    }

    /// The user the client is logged in as.
    pub fn user_id(&self) -> Result<String> {
        self.user_id.read().unwrap().clone().ok_or(Error::NotLoggedIn)
    }

    /// Is the client logged in.
    pub fn logged_in(&self) -> bool {
        self.user_id.read().unwrap().is_some()
    }

    /// The current sync continuation token.
    pub fn sync_token(&self) -> Option<String> {
        self.sync_token.read().unwrap().clone()
    }

    /// Replace the sync continuation token, e.g. when restoring a session.
    pub fn set_sync_token(&self, token: Option<String>) {
        *self.sync_token.write().unwrap() = token;
    }

    /// Get a snapshot of a room.
    pub fn get_room(&self, room_id: &str) -> Option<Room> {
        self.rooms.read().unwrap().get(room_id).cloned()
    }

    /// Get a snapshot of a room, creating an empty cache entry if the room
    /// is unknown.
    pub fn get_or_create_room(&self, room_id: &str) -> Room {
        self.rooms
            .write()
            .unwrap()
            .entry(room_id.to_owned())
            .or_insert_with(|| Room::new(room_id))
            .clone()
    }

    /// Find a room by its canonical alias or one of its published aliases.
    pub fn get_room_by_alias(&self, alias: &str) -> Option<Room> {
        self.rooms.read().unwrap().values().find(|room| room.has_alias(alias)).cloned()
    }

    /// Snapshots of all known rooms.
    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.read().unwrap().values().cloned().collect()
    }

    /// Remove a room from the cache, returning its last state.
    ///
    /// Left rooms otherwise stay cached with [`RoomState::Left`].
    pub fn forget_room(&self, room_id: &str) -> Option<Room> {
        self.rooms.write().unwrap().remove(room_id)
    }

    /// The last known presence of a user.
    pub fn presence(&self, user_id: &str) -> Option<Presence> {
        self.presence.read().unwrap().get(user_id).cloned()
    }

    /// Record the presence of a user.
    pub fn set_presence(&self, user_id: &str, presence: Presence) {
        self.presence.write().unwrap().insert(user_id.to_owned(), presence);
    }

    /// The global profile of a user.
    pub fn profile(&self, user_id: &str) -> Option<Profile> {
        self.profiles.read().unwrap().get(user_id).cloned()
    }

    /// Record the global profile of a user.
    pub fn set_profile(&self, user_id: &str, profile: Profile) {
        self.profiles.write().unwrap().insert(user_id.to_owned(), profile);
    }

    /// The profile of a user in a room.
    pub fn member_profile(&self, room_id: &str, user_id: &str) -> Option<Profile> {
        let rooms = self.rooms.read().unwrap();
        rooms.get(room_id)?.get_member(user_id).map(|m| m.profile.clone())
    }

    /// The content of a global account data event.
    pub fn account_data(&self, event_type: &str) -> Option<JsonValue> {
        self.account_data.read().unwrap().get(event_type).cloned()
    }

    /// Drop all cached state, keeping the factory and the emitter.
    pub fn clear(&self) {
        self.set_user_id(None);
        self.set_sync_token(None);
        self.rooms.write().unwrap().clear();
        self.profiles.write().unwrap().clear();
        self.presence.write().unwrap().clear();
        self.account_data.write().unwrap().clear();
    }

    /// Receive a response from a sync call.
    ///
    /// Events are applied in this order: global account data, presence,
    /// then the invite state of invited rooms, the timeline, state, account
    /// data and ephemeral events of joined rooms and finally the timeline and
    /// state of left rooms. Within a section events are applied in server
    /// order. An event that fails to decode is logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `response` - The response that we received after a successful sync.
    #[instrument(skip_all, fields(next_batch = %response.next_batch))]
    pub async fn receive_sync_response(&self, response: SyncResponse) {
        // The server might respond multiple times with the same sync token, in
        // that case we already received this response and there's nothing to
        // do.
        if self.sync_token().as_deref() == Some(response.next_batch.as_str()) {
            debug!("Sync response already received, ignoring it");
            return;
        }

        let SyncResponse { next_batch, rooms, presence, account_data } = response;

        self.receive_events(None, &account_data.events).await;
        self.receive_events(None, &presence.events).await;

        for (room_id, invited) in &rooms.invite {
            self.set_room_state(room_id, RoomState::Invited);
            self.receive_events(Some(room_id), &invited.invite_state.events).await;
        }

        for (room_id, joined) in &rooms.join {
            self.update_room(room_id, |room| {
                room.state = RoomState::Joined;
                room.unread_notifications = joined.unread_notifications;
                if joined.timeline.prev_batch.is_some() {
                    room.prev_batch = joined.timeline.prev_batch.clone();
                }
            });

            self.receive_events(Some(room_id), &joined.timeline.events).await;
            self.receive_events(Some(room_id), &joined.state.events).await;
            self.receive_events(Some(room_id), &joined.account_data.events).await;
            self.receive_events(Some(room_id), &joined.ephemeral.events).await;
        }

        for (room_id, left) in &rooms.leave {
            self.set_room_state(room_id, RoomState::Left);
            self.receive_events(Some(room_id), &left.timeline.events).await;
            self.receive_events(Some(room_id), &left.state.events).await;
        }

        self.set_sync_token(Some(next_batch));
    }

    async fn receive_events(&self, room_id: Option<&str>, events: &[JsonValue]) {
        for raw in events {
            if let Err(error) = self.receive_event(room_id, raw).await {
                warn!(room_id, %error, "Skipping an event that failed to decode");
            }
        }
    }

    /// Decode a single event and fold it into the caches.
    ///
    /// `room_id` is the room the event was delivered for, it's set on the
    /// event if the server stripped it. The
    /// [`EventEmitter::on_event`] notification fires even if decoding fails,
    /// the error is returned after it.
    pub async fn receive_event(&self, room_id: Option<&str>, raw: &JsonValue) -> Result<()> {
        let emitter = self.event_emitter.read().unwrap().clone();

        let mut event = match self.factory.decode(raw) {
            Ok(event) => event,
            Err(error) => {
                if let Some(emitter) = &emitter {
                    emitter.on_event(room_id, raw, None).await;
                }
                return Err(error.into());
            }
        };

        if let Some(room_id) = room_id {
            event.backfill_room_id(room_id);
        }

        self.apply_event(&event);

        if let Some(emitter) = emitter {
            let room_id = event.room_id();
            emitter.on_event(room_id, raw, Some(&event)).await;

            let room = room_id.and_then(|id| self.get_room(id));
            emit_typed(emitter.as_ref(), room.as_ref(), &event).await;
        }

        Ok(())
    }

    fn apply_event(&self, event: &AnyEvent) {
        if let AnyEvent::Presence(presence) = event {
            let Some(user_id) = presence.sender.as_deref() else {
                warn!("Presence event without a sender");
                return;
            };

            if let Some(state) = &presence.presence {
                self.set_presence(user_id, state.clone());
            }

            let mut profiles = self.profiles.write().unwrap();
            let profile = profiles.entry(user_id.to_owned()).or_default();
            if presence.displayname.is_some() {
                profile.display_name = presence.displayname.clone();
            }
            if presence.avatar_url.is_some() {
                profile.avatar_url = presence.avatar_url.clone();
            }
            profile.touch();
            return;
        }

        if let AnyEvent::Generic(generic) = event {
            if event.room_id().is_none() {
                // Global account data, keep the content around.
                self.account_data
                    .write()
                    .unwrap()
                    .insert(generic.event_type().to_owned(), generic.content.clone().into());
                return;
            }
        }

        let Some(room_id) = event.room_id() else {
            trace!(event_type = event.event_type(), "Event without a room, nothing to update");
            return;
        };

        let changed = self.update_room(room_id, |room| room.handle_event(event));
        trace!(room_id, event_type = event.event_type(), changed, "Applied event");
    }

    fn set_room_state(&self, room_id: &str, state: RoomState) {
        self.update_room(room_id, |room| room.state = state);
    }

    fn update_room<T>(&self, room_id: &str, f: impl FnOnce(&mut Room) -> T) -> T {
        let mut rooms = self.rooms.write().unwrap();
        let room = rooms.entry(room_id.to_owned()).or_insert_with(|| Room::new(room_id));
        f(room)
    }
}
