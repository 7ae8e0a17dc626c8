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

//! The client side view of rooms.

mod members;
mod power_levels;

use std::{collections::BTreeMap, sync::Arc};

use matrix_client_events::{
    enums::{GuestAccess, HistoryVisibility, JoinRules},
    info::ImageInfo,
    AnyEvent, TagInfo,
};
pub use members::RoomMember;
pub use power_levels::PowerLevels;
use tracing::trace;

use crate::sync::UnreadNotificationsCount;

/// The membership of the logged in user in a room, as given by the section
/// of the sync response the room was last delivered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoomState {
    /// The room is known, but wasn't part of any sync response yet.
    #[default]
    Unknown,
    /// A room from the `join` section of a sync response.
    Joined,
    /// A room from the `invite` section of a sync response.
    Invited,
    /// A room from the `leave` section of a sync response.
    Left,
}

/// The picture of a room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomAvatar {
    /// The `mxc://` URI of the picture.
    pub url: Option<String>,
    /// Metadata of the picture.
    pub info: Option<Arc<ImageInfo>>,
    /// The `mxc://` URI of a thumbnail.
    pub thumbnail_url: Option<String>,
    /// Metadata of the thumbnail.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

/// A cached room.
#[derive(Clone, Debug)]
pub struct Room {
    room_id: String,
    /// The membership of the own user in the room.
    pub state: RoomState,
    /// Published aliases, in the order of the last `m.room.aliases` event.
    pub aliases: Vec<String>,
    /// The canonical alias.
    pub canonical_alias: Option<String>,
    /// The explicit room name.
    pub name: Option<String>,
    /// The room topic.
    pub topic: Option<String>,
    /// The room picture.
    pub avatar: RoomAvatar,
    /// The user who created the room.
    pub creator: Option<String>,
    /// Whether users of other homeservers may join.
    pub federate: bool,
    /// The room version.
    pub room_version: Option<String>,
    /// Whether guests may join.
    pub guest_access: Option<GuestAccess>,
    /// Who can read the room history.
    pub history_visibility: Option<HistoryVisibility>,
    /// Who can join the room.
    pub join_rules: Option<JoinRules>,
    /// The power levels of the room.
    pub power_levels: PowerLevels,
    /// Users currently typing.
    pub typing_users: Vec<String>,
    /// Members by user ID.
    pub members: BTreeMap<String, RoomMember>,
    /// Tags the own user gave the room.
    pub tags: BTreeMap<String, TagInfo>,
    /// Unread notification counts.
    pub unread_notifications: UnreadNotificationsCount,
    /// Token to paginate backwards from the start of the last timeline slice.
    pub prev_batch: Option<String>,
}

impl Room {
    /// Create an empty room cache entry.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            state: RoomState::Unknown,
            aliases: Vec::new(),
            canonical_alias: None,
            name: None,
            topic: None,
            avatar: RoomAvatar::default(),
            creator: None,
            federate: true,
            room_version: None,
            guest_access: None,
            history_visibility: None,
            join_rules: None,
            power_levels: PowerLevels::default(),
            typing_users: Vec::new(),
            members: BTreeMap::new(),
            tags: BTreeMap::new(),
            unread_notifications: UnreadNotificationsCount::default(),
            prev_batch: None,
        }
    }

    /// The ID of the room.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// The room was last delivered in the `leave` section.
    pub fn is_left(&self) -> bool {
        self.state == RoomState::Left
    }

    /// The room was last delivered in the `invite` section.
    pub fn is_invited(&self) -> bool {
        self.state == RoomState::Invited
    }

    /// Get a member by user ID.
    pub fn get_member(&self, user_id: &str) -> Option<&RoomMember> {
        self.members.get(user_id)
    }

    /// Get a member, creating an empty entry if the user is unknown.
    pub fn get_or_create_member(&mut self, user_id: &str) -> &mut RoomMember {
        self.members.entry(user_id.to_owned()).or_insert_with(|| RoomMember::new(user_id))
    }

    /// Add or replace a member.
    pub fn add_member(&mut self, member: RoomMember) {
        self.members.insert(member.user_id.clone(), member);
    }

    /// Remove a member, returning it.
    pub fn remove_member(&mut self, user_id: &str) -> Option<RoomMember> {
        self.members.remove(user_id)
    }

    /// Remove every member.
    pub fn clear_members(&mut self) {
        self.members.clear();
    }

    /// The power level of a user in this room.
    pub fn user_level(&self, user_id: &str) -> i64 {
        self.power_levels.user_level(user_id)
    }

    /// The level explicitly required for an event type, if any.
    pub fn event_level(&self, event_type: &str) -> Option<i64> {
        self.power_levels.event_level(event_type)
    }

    /// Whether a room alias refers to this room.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.canonical_alias.as_deref() == Some(alias) || self.aliases.iter().any(|a| a == alias)
    }

    /// Calculate a name to show for the room.
    ///
    /// Uses the explicit name, then the canonical alias, then the first
    /// alias, then the names of up to three other active members.
    pub fn display_name(&self, own_user_id: Option<&str>) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_owned();
        }
        if let Some(alias) = &self.canonical_alias {
            return alias.clone();
        }
        if let Some(alias) = self.aliases.first() {
            return alias.clone();
        }

        let others: Vec<&RoomMember> = self
            .members
            .values()
            .filter(|m| m.is_active() && Some(m.user_id.as_str()) != own_user_id)
            .collect();
        let names: Vec<&str> = others.iter().take(3).map(|m| m.name()).collect();

        match (names.as_slice(), others.len()) {
            ([], _) => "Empty room".to_owned(),
            ([a], _) => (*a).to_owned(),
            ([a, b], _) => format!("{a} and {b}"),
            ([a, b, c], 3) => format!("{a}, {b} and {c}"),
            (names, n) => format!("{} and {} others", names.join(", "), n - names.len()),
        }
    }

    /// Update the room from an event delivered for it.
    ///
    /// Returns whether the event changed the cached state.
    pub fn handle_event(&mut self, event: &AnyEvent) -> bool {
        match event {
            AnyEvent::RoomMember(e) => {
                let Some(user_id) = e.user_id() else {
                    trace!(room_id = self.room_id.as_str(), "Membership event without a state key");
                    return false;
                };
                self.get_or_create_member(user_id).apply(e);
            }
            AnyEvent::RoomAliases(e) => self.aliases = e.aliases.clone(),
            AnyEvent::RoomAvatar(e) => {
                self.avatar = RoomAvatar {
                    url: e.url.clone(),
                    info: e.info.clone(),
                    thumbnail_url: e.thumbnail_url.clone(),
                    thumbnail_info: e.thumbnail_info.clone(),
                };
            }
            AnyEvent::RoomCanonicalAlias(e) => self.canonical_alias = e.alias.clone(),
            AnyEvent::RoomCreate(e) => {
                self.creator = e.creator.clone();
                self.federate = e.federate();
                self.room_version = e.room_version.clone();
            }
            AnyEvent::RoomGuestAccess(e) => self.guest_access = e.guest_access.clone(),
            AnyEvent::RoomHistoryVisibility(e) => {
                self.history_visibility = e.history_visibility.clone();
            }
            AnyEvent::RoomJoinRules(e) => self.join_rules = e.join_rule.clone(),
            AnyEvent::RoomName(e) => self.name = e.name.clone(),
            AnyEvent::RoomTopic(e) => self.topic = e.topic.clone(),
            AnyEvent::RoomPowerLevels(e) => self.power_levels.apply(e),
            AnyEvent::Typing(e) => self.typing_users = e.user_ids.clone(),
            AnyEvent::Tag(e) => self.tags = e.tags.clone(),
            _ => return false,
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use matrix_client_events::{enums::RoomMembership, EventFactory};
    use matrix_client_test::test_json;
    use serde_json::json;

    use super::*;

    fn apply(room: &mut Room, json: &serde_json::Value) -> bool {
        let event = EventFactory::with_defaults().decode(json).unwrap();
        room.handle_event(&event)
    }

    #[test]
    fn state_events_update_fields() {
        let mut room = Room::new("!abc:example.org");

        assert!(apply(&mut room, &test_json::CREATE));
        assert!(apply(&mut room, &test_json::NAME));
        assert!(apply(&mut room, &test_json::TOPIC));
        assert!(apply(&mut room, &test_json::JOIN_RULES));
        assert!(apply(&mut room, &test_json::HISTORY_VISIBILITY));
        assert!(apply(&mut room, &test_json::GUEST_ACCESS));
        assert!(apply(&mut room, &test_json::ROOM_AVATAR));

        assert_eq!(room.creator.as_deref(), Some("@example:localhost"));
        assert!(room.federate);
        assert_eq!(room.name.as_deref(), Some("room name"));
        assert_eq!(room.topic.as_deref(), Some("😀"));
        assert_eq!(room.join_rules, Some(JoinRules::Public));
        assert_eq!(room.history_visibility, Some(HistoryVisibility::WorldReadable));
        assert_eq!(room.guest_access, Some(GuestAccess::CanJoin));
        assert_eq!(room.avatar.url.as_deref(), Some("mxc://domain.com/JWEIFJgwEIhweiWJE"));
        assert_eq!(room.avatar.thumbnail_info.as_ref().and_then(|i| i.width), Some(96));
    }

    #[test]
    fn creator_is_never_taken_from_the_sender() {
        let mut room = Room::new("!abc:example.org");
        apply(
            &mut room,
            &json!({
                "type": "m.room.create",
                "state_key": "",
                "sender": "@mallory:example.org",
                "content": {}
            }),
        );

        assert_eq!(room.creator, None);
    }

    #[test]
    fn aliases_are_replaced_wholesale() {
        let mut room = Room::new("!abc:example.org");
        room.aliases = vec!["#old:localhost".to_owned(), "#older:localhost".to_owned()];

        apply(&mut room, &test_json::ALIASES);
        assert_eq!(room.aliases, ["#tutorial:localhost"]);
        assert!(room.has_alias("#tutorial:localhost"));
        assert!(!room.has_alias("#old:localhost"));
    }

    #[test]
    fn membership_updates_member_profile() {
        let mut room = Room::new("!abc:example.org");

        apply(&mut room, &test_json::MEMBER);
        apply(&mut room, &test_json::MEMBER_NAME_CHANGE);
        apply(&mut room, &test_json::MEMBER_THIRD_PARTY_INVITE);
        apply(&mut room, &test_json::MEMBER_BAN);

        let member = room.get_member("@example:localhost").unwrap();
        assert_eq!(member.profile.display_name.as_deref(), Some("changed"));
        assert_eq!(member.membership, Some(RoomMembership::Join));
        assert!(!member.third_party_pending);

        assert!(room.get_member("@carol:localhost").unwrap().third_party_pending);
        assert_eq!(
            room.get_member("@banned:localhost").unwrap().membership,
            Some(RoomMembership::Ban)
        );
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let mut room = Room::new("!abc:example.org");
        assert!(!apply(&mut room, &test_json::MESSAGE_TEXT));
        assert!(!apply(&mut room, &test_json::CUSTOM_STATE));
    }

    #[test]
    fn display_name_calculation() {
        let mut room = Room::new("!abc:example.org");
        assert_eq!(room.display_name(None), "Empty room");

        for (user, name) in [
            ("@alice:localhost", "Alice"),
            ("@bob:localhost", "Bob"),
            ("@carol:localhost", "Carol"),
            ("@dave:localhost", "Dave"),
            ("@example:localhost", "Me"),
        ] {
            apply(
                &mut room,
                &json!({
                    "type": "m.room.member",
                    "state_key": user,
                    "sender": user,
                    "content": { "membership": "join", "displayname": name }
                }),
            );
        }

        let own = Some("@example:localhost");
        assert_eq!(room.display_name(own), "Alice, Bob, Carol and 1 others");

        room.remove_member("@dave:localhost");
        assert_eq!(room.display_name(own), "Alice, Bob and Carol");

        room.remove_member("@carol:localhost");
        assert_eq!(room.display_name(own), "Alice and Bob");

        room.aliases = vec!["#alias:localhost".to_owned()];
        assert_eq!(room.display_name(own), "#alias:localhost");

        room.canonical_alias = Some("#canonical:localhost".to_owned());
        assert_eq!(room.display_name(own), "#canonical:localhost");

        room.name = Some("Named".to_owned());
        assert_eq!(room.display_name(own), "Named");
    }
}
