use serde_json::Value as JsonValue;

use crate::test_json;

/// Test events that can be added to the state.
pub enum StateTestEvent {
    Alias,
    Aliases,
    Create,
    GuestAccess,
    HistoryVisibility,
    JoinRules,
    Member,
    MemberAdditional,
    MemberBan,
    MemberInvite,
    MemberLeave,
    MemberNameChange,
    MemberThirdPartyInvite,
    PowerLevels,
    RoomAvatar,
    RoomName,
    RoomTopic,
    Custom(JsonValue),
}

impl From<StateTestEvent> for JsonValue {
    fn from(val: StateTestEvent) -> Self {
        match val {
            StateTestEvent::Alias => test_json::sync_events::ALIAS.to_owned(),
            StateTestEvent::Aliases => test_json::sync_events::ALIASES.to_owned(),
            StateTestEvent::Create => test_json::sync_events::CREATE.to_owned(),
            StateTestEvent::GuestAccess => test_json::sync_events::GUEST_ACCESS.to_owned(),
            StateTestEvent::HistoryVisibility => {
                test_json::sync_events::HISTORY_VISIBILITY.to_owned()
            }
            StateTestEvent::JoinRules => test_json::sync_events::JOIN_RULES.to_owned(),
            StateTestEvent::Member => test_json::sync_events::MEMBER.to_owned(),
            StateTestEvent::MemberAdditional => {
                test_json::sync_events::MEMBER_ADDITIONAL.to_owned()
            }
            StateTestEvent::MemberBan => test_json::sync_events::MEMBER_BAN.to_owned(),
            StateTestEvent::MemberInvite => test_json::sync_events::MEMBER_INVITE.to_owned(),
            StateTestEvent::MemberLeave => test_json::sync_events::MEMBER_LEAVE.to_owned(),
            StateTestEvent::MemberNameChange => {
                test_json::sync_events::MEMBER_NAME_CHANGE.to_owned()
            }
            StateTestEvent::MemberThirdPartyInvite => {
                test_json::sync_events::MEMBER_THIRD_PARTY_INVITE.to_owned()
            }
            StateTestEvent::PowerLevels => test_json::sync_events::POWER_LEVELS.to_owned(),
            StateTestEvent::RoomAvatar => test_json::sync_events::ROOM_AVATAR.to_owned(),
            StateTestEvent::RoomName => test_json::sync_events::NAME.to_owned(),
            StateTestEvent::RoomTopic => test_json::sync_events::TOPIC.to_owned(),
            StateTestEvent::Custom(json) => json,
        }
    }
}

/// Test events that can be added to the ephemeral events.
pub enum EphemeralTestEvent {
    ReadReceipt,
    Typing,
    Custom(JsonValue),
}

impl From<EphemeralTestEvent> for JsonValue {
    fn from(val: EphemeralTestEvent) -> Self {
        match val {
            EphemeralTestEvent::ReadReceipt => test_json::sync_events::READ_RECEIPT.to_owned(),
            EphemeralTestEvent::Typing => test_json::sync_events::TYPING.to_owned(),
            EphemeralTestEvent::Custom(json) => json,
        }
    }
}

/// Test events that can be added to the room account data.
pub enum RoomAccountDataTestEvent {
    Tags,
    Custom(JsonValue),
}

impl From<RoomAccountDataTestEvent> for JsonValue {
    fn from(val: RoomAccountDataTestEvent) -> Self {
        match val {
            RoomAccountDataTestEvent::Tags => test_json::sync_events::TAG.to_owned(),
            RoomAccountDataTestEvent::Custom(json) => json,
        }
    }
}

/// Test events that can be added to the presence events.
pub enum PresenceTestEvent {
    Presence,
    Custom(JsonValue),
}

impl From<PresenceTestEvent> for JsonValue {
    fn from(val: PresenceTestEvent) -> Self {
        match val {
            PresenceTestEvent::Presence => test_json::sync_events::PRESENCE.to_owned(),
            PresenceTestEvent::Custom(json) => json,
        }
    }
}
