//! Test data for the matrix-client crates.
//!
//! Exporting each const allows all the test data to have a single source of
//! truth across the crates of the workspace.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

pub mod api_responses;
pub mod sync;
pub mod sync_events;

pub use api_responses::{
    CREATE_ROOM, FILTER, FORBIDDEN, GET_ALIAS, JOIN_ROOM, LOGIN, LOGIN_WITH_REFRESH_TOKEN,
    NOT_FOUND, PRESENCE_STATUS, PROFILE, PUBLIC_ROOMS, PUSH_RULES_RESPONSE, REFRESH_TOKEN,
    REFRESH_TOKEN_WITHOUT_TOKEN, REGISTRATION, SEARCH, TURN_SERVER, UNKNOWN_ERRCODE,
    UNKNOWN_TOKEN, UNSPECIFIED_ERROR, UPLOAD, VERSIONS, WHOIS,
};
pub use sync::{DEFAULT_SYNC_ROOM_ID, INVITE_SYNC, LEAVE_SYNC, SYNC};
pub use sync_events::{
    ALIAS, ALIASES, CALL_INVITE, CREATE, CUSTOM_STATE, GUEST_ACCESS, HISTORY_VISIBILITY,
    JOIN_RULES, MEMBER, MEMBER_ADDITIONAL, MEMBER_BAN, MEMBER_INVITE, MEMBER_LEAVE,
    MEMBER_NAME_CHANGE, MEMBER_THIRD_PARTY_INVITE, MESSAGE_EMOTE, MESSAGE_TEXT, NAME,
    NAME_STRIPPED, POWER_LEVELS, PRESENCE, PUSH_RULES, READ_RECEIPT, REDACTION, ROOM_AVATAR, TAG,
    TOPIC, TYPING,
};

/// An empty response.
pub static EMPTY: Lazy<JsonValue> = Lazy::new(|| json!({}));

/// A response with only an event ID.
pub static EVENT_ID: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "event_id": "$h29iv0s8:example.com"
    })
});

/// A response with only a room ID.
pub static ROOM_ID: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "room_id": "!testroom:example.org"
    })
});
