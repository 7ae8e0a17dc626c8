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

use std::collections::BTreeMap;

use matrix_client_events::room::RoomPowerLevelsEvent;

/// The cached power levels of a room.
///
/// Rebuilt wholesale from every `m.room.power_levels` event, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerLevels {
    /// Level required to ban a user.
    pub ban: Option<i64>,
    /// Level required to kick a user.
    pub kick: Option<i64>,
    /// Level required to redact an event sent by another user.
    pub redact: Option<i64>,
    /// Level required to invite a user.
    pub invite: Option<i64>,
    /// Default level required to send message events.
    pub events_default: Option<i64>,
    /// Default level required to send state events.
    pub state_default: Option<i64>,
    /// Default level of users absent from the user map.
    pub users_default: Option<i64>,
    /// Level required to trigger an `@room` notification.
    pub room_notification: Option<i64>,
    users: BTreeMap<String, i64>,
    events: BTreeMap<String, i64>,
}

impl PowerLevels {
    /// Overwrite every level with the ones of the event.
    pub fn apply(&mut self, event: &RoomPowerLevelsEvent) {
        self.ban = event.ban;
        self.kick = event.kick;
        self.redact = event.redact;
        self.invite = event.invite;
        self.events_default = event.events_default;
        self.state_default = event.state_default;
        self.users_default = event.users_default;
        self.room_notification = event.room_notification;

        self.users.clear();
        self.users.extend(event.users.iter().flatten().map(|(k, v)| (k.clone(), *v)));
        self.events.clear();
        self.events.extend(event.events.iter().flatten().map(|(k, v)| (k.clone(), *v)));
    }

    /// The level of a user, `users_default` (or 0) if they have none.
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.users.get(user_id).copied().unwrap_or_else(|| self.users_default.unwrap_or(0))
    }

    /// The level explicitly required to send events of the given type.
    ///
    /// `None` if the type has no entry, [`PowerLevels::required_level`]
    /// applies the defaults.
    pub fn event_level(&self, event_type: &str) -> Option<i64> {
        self.events.get(event_type).copied()
    }

    /// The level required to send an event of the given type, falling back to
    /// `state_default` or `events_default` (0 when absent).
    pub fn required_level(&self, event_type: &str, is_state: bool) -> i64 {
        self.event_level(event_type).unwrap_or_else(|| {
            if is_state {
                self.state_default.unwrap_or(0)
            } else {
                self.events_default.unwrap_or(0)
            }
        })
    }

    /// The user level map.
    pub fn users(&self) -> &BTreeMap<String, i64> {
        &self.users
    }

    /// The event level map.
    pub fn events(&self) -> &BTreeMap<String, i64> {
        &self.events
    }
}
