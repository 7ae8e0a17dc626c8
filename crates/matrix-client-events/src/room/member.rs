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

use serde_json::Value as JsonValue;

use crate::{
    common::{content_of, event_accessors, raw_content},
    enums::RoomMembership,
    json::{require, set, set_opt, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// A third party invite a membership was created from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThirdPartyInvite {
    /// A name to show for the invited identity.
    pub display_name: Option<String>,
    /// The block signed by the identity server.
    pub signed: Option<JsonObject>,
}

/// The membership of a user in a room. The state key is the user id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomMemberEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// The membership. Required.
    pub membership: Option<RoomMembership>,
    /// The display name of the user in this room.
    pub displayname: Option<String>,
    /// The avatar of the user in this room.
    pub avatar_url: Option<String>,
    /// Whether the room is a direct chat, set on invites.
    pub is_direct: Option<bool>,
    /// Why the membership changed.
    pub reason: Option<String>,
    /// Set if the membership originates from a third party invite.
    pub third_party_invite: Option<ThirdPartyInvite>,
}

impl RoomMemberEvent {
    /// A membership event for `user_id`.
    pub fn new(user_id: impl Into<String>, membership: RoomMembership) -> Self {
        Self {
            state: StateEventFields::with_state_key(user_id),
            membership: Some(membership),
            ..Default::default()
        }
    }

    /// The user the membership is about.
    pub fn user_id(&self) -> Option<&str> {
        self.state.state_key.as_deref()
    }

    /// Stripped state of the room the user is invited to, sent along with
    /// invites.
    pub fn invite_room_state(&self) -> &[JsonValue] {
        self.state
            .room
            .unsigned
            .as_ref()
            .and_then(|u| u.get("invite_room_state"))
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl Event for RoomMemberEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let membership = require(self.membership.as_ref(), Self::EVENT_TYPE, "membership")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "membership", membership);
        set_opt(&mut content, "displayname", self.displayname.clone());
        set_opt(&mut content, "avatar_url", self.avatar_url.clone());
        set_opt(&mut content, "is_direct", self.is_direct);
        set_opt(&mut content, "reason", self.reason.clone());
        set_opt(
            &mut content,
            "third_party_invite",
            self.third_party_invite.as_ref().map(|invite| {
                let mut object = JsonObject::new();
                set_opt(&mut object, "display_name", invite.display_name.clone());
                set_opt(&mut object, "signed", invite.signed.clone());
                object
            }),
        );

        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomMemberEvent {
    const EVENT_TYPE: &'static str = "m.room.member";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let third_party_invite = reader.object("third_party_invite").map(|invite| {
            let invite = FieldReader::new(invite, Self::EVENT_TYPE);
            ThirdPartyInvite {
                display_name: invite.string("display_name"),
                signed: invite.object("signed").cloned(),
            }
        });

        Ok(Self {
            membership: reader.required_enum("membership"),
            displayname: reader.string("displayname"),
            avatar_url: reader.string("avatar_url"),
            is_direct: reader.bool("is_direct"),
            reason: reader.string("reason"),
            third_party_invite,
            state: StateEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}
