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

//! Events of the `m.room.*` namespace.

mod aliases;
mod avatar;
mod canonical_alias;
mod create;
mod member;
mod message;
mod message_feedback;
mod power_levels;
mod redaction;
mod third_party_invite;

pub use aliases::RoomAliasesEvent;
pub use avatar::RoomAvatarEvent;
pub use canonical_alias::RoomCanonicalAliasEvent;
pub use create::RoomCreateEvent;
pub use member::{RoomMemberEvent, ThirdPartyInvite};
pub use message::RoomMessageEvent;
pub use message_feedback::RoomMessageFeedbackEvent;
pub use power_levels::RoomPowerLevelsEvent;
pub use redaction::RoomRedactionEvent;
pub use third_party_invite::{PublicKey, RoomThirdPartyInviteEvent};

use crate::{
    common::{event_accessors, content_of, raw_content},
    enums::{GuestAccess, HistoryVisibility, JoinRules},
    json::{require, set, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// Defines a state event whose content is a single required field.
macro_rules! single_field_state_event {
    (
        $(#[$meta:meta])*
        $name:ident($event_type:literal) {
            $(#[$field_meta:meta])*
            $field:ident: $ty:ty = $key:literal via $reader:ident
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            /// Fields of state events.
            pub state: StateEventFields,
            $(#[$field_meta])*
            pub $field: Option<$ty>,
        }

        impl $name {
            #[doc = concat!("A `", $event_type, "` event with an empty state key.")]
            pub fn new($field: impl Into<$ty>) -> Self {
                Self { state: StateEventFields::with_state_key(""), $field: Some($field.into()) }
            }
        }

        impl Event for $name {
            event_accessors!(state);

            fn to_json(&self) -> Result<JsonObject> {
                let value = require(self.$field.clone(), Self::EVENT_TYPE, $key)?;
                let mut content = raw_content(self.fields());
                set(&mut content, $key, value);
                self.state.write(Self::EVENT_TYPE, content)
            }
        }

        impl TypedEvent for $name {
            const EVENT_TYPE: &'static str = $event_type;

            fn from_json(json: &JsonObject) -> Result<Self> {
                let content = content_of(json, Self::EVENT_TYPE)?;
                let $field = FieldReader::new(content, Self::EVENT_TYPE).$reader($key);

                Ok(Self { state: StateEventFields::parse(json, Self::EVENT_TYPE), $field })
            }
        }
    };
}

single_field_state_event! {
    /// The human readable name of a room.
    RoomNameEvent("m.room.name") {
        /// The name. Required.
        name: String = "name" via required_string
    }
}

single_field_state_event! {
    /// The topic of a room.
    RoomTopicEvent("m.room.topic") {
        /// The topic. Required.
        topic: String = "topic" via required_string
    }
}

single_field_state_event! {
    /// Whether guests can join a room.
    RoomGuestAccessEvent("m.room.guest_access") {
        /// The guest access setting. Required.
        guest_access: GuestAccess = "guest_access" via required_enum
    }
}

single_field_state_event! {
    /// Who can see the history of a room.
    RoomHistoryVisibilityEvent("m.room.history_visibility") {
        /// The visibility setting. Required.
        history_visibility: HistoryVisibility = "history_visibility" via required_enum
    }
}

single_field_state_event! {
    /// Who can join a room.
    RoomJoinRulesEvent("m.room.join_rules") {
        /// The join rule. Required.
        join_rule: JoinRules = "join_rule" via required_enum
    }
}
