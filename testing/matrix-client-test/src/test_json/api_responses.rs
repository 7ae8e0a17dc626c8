//! Responses of the non-sync REST endpoints.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

/// Successful call to `POST /_matrix/client/r0/login`.
pub static LOGIN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "access_token": "abc123",
        "device_id": "GHTYAJCE",
        "home_server": "localhost",
        "user_id": "@example:localhost"
    })
});

/// Successful call to `POST /_matrix/client/r0/login` that hands out a
/// refresh token.
pub static LOGIN_WITH_REFRESH_TOKEN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "access_token": "abc123",
        "device_id": "GHTYAJCE",
        "home_server": "localhost",
        "user_id": "@example:localhost",
        "refresh_token": "zyx987"
    })
});

/// Successful call to `POST /_matrix/client/r0/register`.
pub static REGISTRATION: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "access_token": "abc123",
        "device_id": "GHTYAJCE",
        "home_server": "localhost",
        "user_id": "@newcomer:localhost"
    })
});

/// `POST /_matrix/client/r0/tokenrefresh`.
pub static REFRESH_TOKEN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "access_token": "5678",
        "refresh_token": "wxyz"
    })
});

/// `POST /_matrix/client/r0/tokenrefresh` answered without a new access
/// token.
pub static REFRESH_TOKEN_WITHOUT_TOKEN: Lazy<JsonValue> = Lazy::new(|| json!({}));

/// A request rejected because of an unknown or expired access token.
pub static UNKNOWN_TOKEN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "errcode": "M_UNKNOWN_TOKEN",
        "error": "Unrecognised access token."
    })
});

/// A request rejected because the user lacks the permission.
pub static FORBIDDEN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "errcode": "M_FORBIDDEN",
        "error": "You are not allowed to do that."
    })
});

/// A request for a resource that doesn't exist.
pub static NOT_FOUND: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "errcode": "M_NOT_FOUND",
        "error": "Event not found."
    })
});

/// An error without any `errcode`.
pub static UNSPECIFIED_ERROR: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "error": "Something went wrong."
    })
});

/// An error whose `errcode` isn't part of the known set.
pub static UNKNOWN_ERRCODE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "errcode": "ORG_EXAMPLE_TEAPOT",
        "error": "I'm a teapot."
    })
});

/// `GET /_matrix/client/versions`.
pub static VERSIONS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "versions": [
            "r0.0.1",
            "r0.1.0",
            "r0.2.0",
            "r0.3.0",
            "r0.4.0",
            "r0.5.0",
            "r0.6.0"
        ],
        "unstable_features": {}
    })
});

/// `GET /_matrix/client/r0/profile/{user_id}`.
pub static PROFILE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "avatar_url": "mxc://localhost/wefuiwegh8742w",
        "displayname": "Alice Margatroid"
    })
});

/// `GET /_matrix/client/r0/presence/{user_id}/status`.
pub static PRESENCE_STATUS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "presence": "unavailable",
        "last_active_ago": 420845,
        "status_msg": "Away"
    })
});

/// `GET /_matrix/client/r0/publicRooms`.
pub static PUBLIC_ROOMS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "chunk": [
            {
                "aliases": [
                    "#murrays:cheese.bar"
                ],
                "avatar_url": "mxc://bleeker.street/CHEDDARandBRIE",
                "guest_can_join": false,
                "name": "CHEESE",
                "num_joined_members": 37,
                "room_id": "!ol19s:bleecker.street",
                "topic": "Tasty tasty cheese",
                "world_readable": true
            }
        ],
        "next_batch": "p190q",
        "prev_batch": "p1902",
        "total_room_count_estimate": 115
    })
});

/// `POST /_matrix/client/r0/createRoom`.
pub static CREATE_ROOM: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "room_id": "!sefiuhWgwghwWgh:localhost"
    })
});

/// `POST /_matrix/client/r0/join/{room_id_or_alias}`.
pub static JOIN_ROOM: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "room_id": "!testroom:example.org"
    })
});

/// `GET /_matrix/client/r0/directory/room/{room_alias}`.
pub static GET_ALIAS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "room_id": "!lUbmUPdxdXxEQurqOs:example.com",
        "servers": [
            "example.org",
            "example.com"
        ]
    })
});

/// `POST /_matrix/media/r0/upload`.
pub static UPLOAD: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content_uri": "mxc://example.com/AQwafuaFswefuhsfAFAgsw"
    })
});

/// `POST /_matrix/client/r0/user/{user_id}/filter`.
pub static FILTER: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "filter_id": "66696p746572"
    })
});

/// `GET /_matrix/client/r0/voip/turnServer`.
pub static TURN_SERVER: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "username": "1443779631:@user:example.com",
        "password": "JlKfBy1QwLrO20385QyAtEyIv0=",
        "uris": [
            "turn:turn.example.com:3478?transport=udp",
            "turn:10.20.30.40:3478?transport=tcp",
            "turns:10.20.30.40:443?transport=tcp"
        ],
        "ttl": 86400
    })
});

/// `GET /_matrix/client/r0/pushrules/`.
pub static PUSH_RULES_RESPONSE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "global": {
            "content": [],
            "override": [
                {
                    "actions": ["dont_notify"],
                    "conditions": [],
                    "default": true,
                    "enabled": false,
                    "rule_id": ".m.rule.master"
                }
            ],
            "room": [],
            "sender": [],
            "underride": []
        }
    })
});

/// `GET /_matrix/client/r0/admin/whois/{user_id}`.
pub static WHOIS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "user_id": "@peter:rabbit.rocks",
        "devices": {
            "teapot": {
                "sessions": [
                    {
                        "connections": [
                            {
                                "ip": "127.0.0.1",
                                "last_seen": 1411996332123u64,
                                "user_agent": "curl/7.31.0-DEV"
                            }
                        ]
                    }
                ]
            }
        }
    })
});

/// `POST /_matrix/client/r0/search`.
pub static SEARCH: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "search_categories": {
            "room_events": {
                "count": 1,
                "highlights": ["martians", "men"],
                "next_batch": "5FdgFsd234dfgsdfFD",
                "results": [
                    {
                        "rank": 0.00424866,
                        "result": {
                            "content": {
                                "body": "This is an example text message",
                                "msgtype": "m.text"
                            },
                            "event_id": "$144429830826TWwbB:localhost",
                            "origin_server_ts": 1432735824653u64,
                            "room_id": "!qPewotXpIctQySfjSy:localhost",
                            "sender": "@example:example.org",
                            "type": "m.room.message"
                        }
                    }
                ]
            }
        }
    })
});
