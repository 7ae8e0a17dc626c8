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

//! Enumerations carried as plain strings on the wire.
//!
//! Every enum keeps strings it doesn't know in a hidden `_Custom` variant so
//! that values introduced by newer homeservers survive a round trip.

use std::fmt;

/// Common interface of the wire-string enums.
pub trait StringEnum {
    /// The string this value is represented by on the wire.
    fn as_str(&self) -> &str;

    /// Whether the value is one of the known variants.
    fn is_known(&self) -> bool;
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $wire:literal,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
            #[doc(hidden)]
            _Custom(String),
        }

        impl $name {
            /// The string this value is represented by on the wire.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )*
                    Self::_Custom(value) => value,
                }
            }
        }

        impl StringEnum for $name {
            fn as_str(&self) -> &str {
                $name::as_str(self)
            }

            fn is_known(&self) -> bool {
                !matches!(self, Self::_Custom(_))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $( $wire => Self::$variant, )*
                    _ => Self::_Custom(value.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $( $wire => Self::$variant, )*
                    _ => Self::_Custom(value),
                }
            }
        }

        impl From<$name> for serde_json::Value {
            fn from(value: $name) -> Self {
                serde_json::Value::String(value.as_str().to_owned())
            }
        }

        impl From<&$name> for serde_json::Value {
            fn from(value: &$name) -> Self {
                serde_json::Value::String(value.as_str().to_owned())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(value))
            }
        }
    };
}

string_enum! {
    /// The presence state of a user.
    pub enum Presence {
        /// The user is online.
        Online => "online",
        /// The user is offline.
        Offline => "offline",
        /// The user is connected but idle.
        Unavailable => "unavailable",
        /// The user is online and actively looking to chat.
        FreeForChat => "free_for_chat",
        /// The user is online but doesn't want to be seen.
        Hidden => "hidden",
    }
}

string_enum! {
    /// Who can join a room.
    pub enum JoinRules {
        /// Anyone can join.
        Public => "public",
        /// Only invited users can join.
        Invite => "invite",
        /// Reserved.
        Private => "private",
        /// Users can ask to be invited.
        Knock => "knock",
    }
}

string_enum! {
    /// Who can see the room history.
    pub enum HistoryVisibility {
        /// Members, from the point they were invited.
        Invited => "invited",
        /// Members, from the point they joined.
        Joined => "joined",
        /// Members, all of it.
        Shared => "shared",
        /// Anyone, including guests and non-members.
        WorldReadable => "world_readable",
    }
}

string_enum! {
    /// Whether guest users may join a room.
    pub enum GuestAccess {
        /// Guests can join.
        CanJoin => "can_join",
        /// Guests can't join.
        Forbidden => "forbidden",
    }
}

string_enum! {
    /// The membership state of a user in a room.
    pub enum RoomMembership {
        /// The user was invited.
        Invite => "invite",
        /// The user joined.
        Join => "join",
        /// The user left or was kicked.
        Leave => "leave",
        /// The user was banned.
        Ban => "ban",
        /// The user asked to join.
        Knock => "knock",
    }
}

string_enum! {
    /// Kind of a receipt.
    pub enum ReceiptType {
        /// A read receipt.
        Read => "m.read",
    }
}

string_enum! {
    /// Kind of a session description in call signalling.
    pub enum CallOfferType {
        /// An offer, sent with `m.call.invite`.
        Offer => "offer",
        /// An answer, sent with `m.call.answer`.
        Answer => "answer",
    }
}

string_enum! {
    /// Why a call was hung up.
    pub enum CallHangupReason {
        /// ICE negotiation failed.
        IceFailed => "ice_failed",
        /// The invite wasn't answered in time.
        InviteTimeout => "invite_timeout",
    }
}

string_enum! {
    /// Kind of a message feedback.
    pub enum FeedbackType {
        /// The message was delivered.
        Delivered => "delivered",
        /// The message was read.
        Read => "read",
    }
}

string_enum! {
    /// Whether a room is listed in the public room directory.
    pub enum RoomVisibility {
        /// Listed.
        Public => "public",
        /// Not listed.
        Private => "private",
    }
}

string_enum! {
    /// A preset of initial state used when creating a room.
    pub enum RoomPreset {
        /// Invite only, shared history, guests allowed.
        PrivateChat => "private_chat",
        /// Public, shared history, no guests.
        PublicChat => "public_chat",
        /// Like `PrivateChat`, with all invitees at the creator's power level.
        TrustedPrivateChat => "trusted_private_chat",
    }
}

string_enum! {
    /// How the media repository resizes a thumbnail.
    pub enum ResizeMethod {
        /// Crop to the requested size.
        Crop => "crop",
        /// Scale, keeping the aspect ratio.
        Scale => "scale",
    }
}

string_enum! {
    /// Medium of a third party identifier.
    pub enum ThirdPartyIdMedium {
        /// An email address.
        Email => "email",
        /// A phone number.
        Msisdn => "msisdn",
    }
}

string_enum! {
    /// The kind of account to register.
    pub enum AccountKind {
        /// A regular user account.
        User => "user",
        /// A guest account.
        Guest => "guest",
    }
}

string_enum! {
    /// Ordering of search results.
    pub enum SearchOrder {
        /// Most recent first.
        Recent => "recent",
        /// Most relevant first.
        Rank => "rank",
    }
}

string_enum! {
    /// Grouping of search results.
    pub enum SearchGroupBy {
        /// Group by room.
        RoomId => "room_id",
        /// Group by sender.
        Sender => "sender",
    }
}

string_enum! {
    /// The format of events returned by a filtered sync.
    pub enum EventFormat {
        /// The client event format.
        Client => "client",
        /// The raw federation format.
        Federation => "federation",
    }
}

string_enum! {
    /// The kind of a push rule.
    pub enum PushRuleKind {
        /// Rules evaluated before all others.
        Override => "override",
        /// Rules evaluated after all others.
        Underride => "underride",
        /// Rules matching a sender.
        Sender => "sender",
        /// Rules matching a room.
        Room => "room",
        /// Rules matching message content.
        Content => "content",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(Presence::from("free_for_chat"), Presence::FreeForChat);
        assert_eq!(JoinRules::Knock.as_str(), "knock");
        assert_eq!(ReceiptType::from("m.read"), ReceiptType::Read);
        assert!(HistoryVisibility::WorldReadable.is_known());
    }

    #[test]
    fn unknown_values_are_kept() {
        let rule = JoinRules::from("restricted");
        assert!(!rule.is_known());
        assert_eq!(rule.as_str(), "restricted");
        assert_eq!(rule.to_string(), "restricted");
    }

    #[test]
    fn serde_uses_the_wire_string() {
        let json = serde_json::to_value(RoomPreset::TrustedPrivateChat).unwrap();
        assert_eq!(json, "trusted_private_chat");

        let membership: RoomMembership = serde_json::from_value("ban".into()).unwrap();
        assert_eq!(membership, RoomMembership::Ban);
    }
}
