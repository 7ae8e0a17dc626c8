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

use matrix_client_events::{enums::RoomMembership, room::RoomMemberEvent};

use crate::Profile;

/// A member of a room, as seen by the room's membership events.
#[derive(Clone, Debug, Default)]
pub struct RoomMember {
    /// The user ID of the member.
    pub user_id: String,
    /// The per-room profile of the member.
    pub profile: Profile,
    /// The current membership, `None` until a membership event arrived.
    pub membership: Option<RoomMembership>,
    /// The member was invited through a third party identifier and hasn't
    /// joined yet.
    pub third_party_pending: bool,
}

impl RoomMember {
    /// A member without any known state.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), ..Default::default() }
    }

    /// Update the member from an `m.room.member` event about them.
    pub(crate) fn apply(&mut self, event: &RoomMemberEvent) {
        self.profile.update(event.displayname.clone(), event.avatar_url.clone());
        self.membership = event.membership.clone();
        self.third_party_pending = event.third_party_invite.is_some()
            && matches!(self.membership, Some(RoomMembership::Invite));
    }

    /// The display name of the member, or their user ID.
    pub fn name(&self) -> &str {
        self.profile.display_name.as_deref().unwrap_or(&self.user_id)
    }

    /// The member is currently joined or invited.
    pub fn is_active(&self) -> bool {
        matches!(self.membership, Some(RoomMembership::Join | RoomMembership::Invite))
    }
}
