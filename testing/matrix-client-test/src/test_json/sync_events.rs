//! Discrete events found in a sync response.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

pub static MEMBER: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "avatar_url": null,
            "displayname": "example",
            "membership": "join"
        },
        "event_id": "$151800140517rfvjc:localhost",
        "origin_server_ts": 151800140,
        "sender": "@example:localhost",
        "state_key": "@example:localhost",
        "type": "m.room.member",
        "unsigned": {
            "age": 297036,
            "replaces_state": "$151800111315tsynI:localhost",
            "prev_content": {
                "avatar_url": null,
                "displayname": "example",
                "membership": "invite"
            }
        }
    })
});

pub static MEMBER_NAME_CHANGE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "avatar_url": "mxc://localhost/wefuiwegh8742w",
            "displayname": "changed",
            "membership": "join"
        },
        "event_id": "$151800234427abgho:localhost",
        "origin_server_ts": 151800152,
        "sender": "@example:localhost",
        "state_key": "@example:localhost",
        "type": "m.room.member",
        "unsigned": {
            "age": 297032,
            "replaces_state": "$151800140517rfvjc:localhost",
            "prev_content": {
                "avatar_url": null,
                "displayname": "example",
                "membership": "join"
            }
        }
    })
});

pub static MEMBER_ADDITIONAL: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "displayname": "Alice Margatroid",
            "membership": "join"
        },
        "event_id": "$151800140517rfvja:localhost",
        "origin_server_ts": 151800146,
        "sender": "@alice:localhost",
        "state_key": "@alice:localhost",
        "type": "m.room.member"
    })
});

pub static MEMBER_INVITE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "avatar_url": "mxc://localhost/SEsfnsuifSDFSSEF",
            "displayname": "invited",
            "membership": "invite",
            "reason": "Looking for support"
        },
        "event_id": "$143273582443PhrSn:localhost",
        "origin_server_ts": 1432735824,
        "sender": "@example:localhost",
        "state_key": "@invited:localhost",
        "type": "m.room.member"
    })
});

pub static MEMBER_THIRD_PARTY_INVITE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "displayname": "carol@example.org",
            "membership": "invite",
            "third_party_invite": {
                "display_name": "carol@example.org",
                "signed": {
                    "mxid": "@carol:localhost",
                    "token": "abc123",
                    "signatures": {}
                }
            }
        },
        "event_id": "$143273582443PhrSx:localhost",
        "origin_server_ts": 1432735830,
        "sender": "@example:localhost",
        "state_key": "@carol:localhost",
        "type": "m.room.member"
    })
});

pub static MEMBER_LEAVE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "membership": "leave"
        },
        "event_id": "$151803140217rkvjc:localhost",
        "origin_server_ts": 151800190,
        "sender": "@alice:localhost",
        "state_key": "@alice:localhost",
        "type": "m.room.member"
    })
});

pub static MEMBER_BAN: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "membership": "ban",
            "reason": "Spamming"
        },
        "event_id": "$151800140517rfvjb:localhost",
        "origin_server_ts": 151800195,
        "sender": "@example:localhost",
        "state_key": "@banned:localhost",
        "type": "m.room.member"
    })
});

pub static NAME: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "name": "room name"
        },
        "event_id": "$15139375513VdeRF:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.name",
        "unsigned": {
            "age": 703422
        }
    })
});

pub static NAME_STRIPPED: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "name": "invited room name"
        },
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.name"
    })
});

pub static TOPIC: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "topic": "😀"
        },
        "event_id": "$151957878228ssqrJ:localhost",
        "origin_server_ts": 151957878,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.topic",
        "unsigned": {
            "age": 1392989709,
            "prev_content": {
                "topic": "test"
            },
            "prev_sender": "@example:localhost",
            "replaces_state": "$151957069225EVYKm:localhost"
        }
    })
});

pub static CREATE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "creator": "@example:localhost",
            "m.federate": true,
            "room_version": "1"
        },
        "event_id": "$151957878228ekrDs:localhost",
        "origin_server_ts": 15195787,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.create",
        "unsigned": {
            "age": 139298
        }
    })
});

pub static ALIASES: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "aliases": [
                "#tutorial:localhost"
            ]
        },
        "event_id": "$15139375516NUgtD:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "localhost",
        "type": "m.room.aliases",
        "unsigned": {
            "age": 703422
        }
    })
});

pub static ALIAS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "alias": "#tutorial:localhost"
        },
        "event_id": "$15139375513VdeRF:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.canonical_alias",
        "unsigned": {
            "age": 703422
        }
    })
});

pub static POWER_LEVELS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "ban": 50,
            "events": {
                "m.room.avatar": 50,
                "m.room.canonical_alias": 50,
                "m.room.history_visibility": 100,
                "m.room.name": 50,
                "m.room.power_levels": 100,
                "m.room.message": 25
            },
            "events_default": 0,
            "invite": 0,
            "kick": 50,
            "redact": 50,
            "state_default": 50,
            "notifications": {
                "room": 0
            },
            "users": {
                "@example:localhost": 100,
                "@bob:localhost": 0
            },
            "users_default": 0
        },
        "event_id": "$15139375512JaHAW:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.power_levels",
        "unsigned": {
            "age": 703422
        }
    })
});

pub static JOIN_RULES: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "join_rule": "public"
        },
        "event_id": "$15139375514WsgmR:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.join_rules",
        "unsigned": {
            "age": 703422
        }
    })
});

pub static HISTORY_VISIBILITY: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "history_visibility": "world_readable"
        },
        "event_id": "$151957878235ricnD:localhost",
        "origin_server_ts": 151957878,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.history_visibility",
        "unsigned": {
            "age": 1392989
        }
    })
});

pub static GUEST_ACCESS: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "guest_access": "can_join"
        },
        "event_id": "$151957878235ricnE:localhost",
        "origin_server_ts": 151957878,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "m.room.guest_access"
    })
});

pub static ROOM_AVATAR: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "info": {
                "h": 398,
                "mimetype": "image/jpeg",
                "size": 31037,
                "w": 394,
                "thumbnail_url": "mxc://domain.com/JWEIFJgwEIhweiWJE-thumb",
                "thumbnail_info": {
                    "h": 96,
                    "w": 96,
                    "mimetype": "image/jpeg",
                    "size": 4011
                }
            },
            "url": "mxc://domain.com/JWEIFJgwEIhweiWJE"
        },
        "event_id": "$143273582443PhrSn:domain.com",
        "origin_server_ts": 143273582,
        "room_id": "!jEsUZKDJdhlrceRyVU:domain.com",
        "sender": "@example:domain.com",
        "state_key": "",
        "type": "m.room.avatar",
        "unsigned": {
            "age": 1234
        }
    })
});

pub static MESSAGE_TEXT: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "body": "is dancing",
            "format": "org.matrix.custom.html",
            "formatted_body": "<strong>is dancing</strong>",
            "msgtype": "m.text"
        },
        "event_id": "$152037280074GZeOm:localhost",
        "origin_server_ts": 152037280,
        "sender": "@example:localhost",
        "type": "m.room.message",
        "unsigned": {
            "age": 598971425
        }
    })
});

pub static MESSAGE_EMOTE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "body": "is dancing",
            "msgtype": "m.emote"
        },
        "event_id": "$152037280074GZeOn:localhost",
        "origin_server_ts": 152037281,
        "sender": "@example:localhost",
        "type": "m.room.message",
        "unsigned": {
            "age": 598971420
        }
    })
});

pub static REDACTION: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "reason": "😀"
        },
        "event_id": "$151957878228ssqrJ:localhost",
        "origin_server_ts": 151957878,
        "redacts": "$152037280074GZeOn:localhost",
        "sender": "@example:localhost",
        "type": "m.room.redaction"
    })
});

pub static CALL_INVITE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "call_id": "12345",
            "lifetime": 60000,
            "offer": {
                "sdp": "v=0\r\no=- 6584580628695956864 2 IN IP4 127.0.0.1[...]",
                "type": "offer"
            },
            "version": 0
        },
        "event_id": "$143273582443PhrSn:example.org",
        "origin_server_ts": 143273582,
        "sender": "@example:example.org",
        "type": "m.call.invite"
    })
});

pub static CUSTOM_STATE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "level": "over 9000"
        },
        "event_id": "$15139375514XsgmR:localhost",
        "origin_server_ts": 151393755,
        "sender": "@example:localhost",
        "state_key": "",
        "type": "org.example.custom.state"
    })
});

pub static PRESENCE: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "avatar_url": "mxc://localhost/wefuiwegh8742w",
            "currently_active": false,
            "displayname": "example",
            "last_active_ago": 1,
            "presence": "online",
            "status_msg": "Making cupcakes"
        },
        "sender": "@example:localhost",
        "type": "m.presence"
    })
});

pub static TYPING: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "user_ids": [
                "@alice:localhost"
            ]
        },
        "type": "m.typing"
    })
});

pub static READ_RECEIPT: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "$151957878228ssqrJ:localhost": {
                "m.read": {
                    "@example:localhost": {
                        "ts": 1436451550
                    }
                }
            }
        },
        "type": "m.receipt"
    })
});

pub static TAG: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "tags": {
                "m.favourite": {
                    "order": 0.0
                },
                "u.work": {}
            }
        },
        "type": "m.tag"
    })
});

pub static PUSH_RULES: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "content": {
            "global": {
                "content": [],
                "override": [],
                "room": [],
                "sender": [],
                "underride": []
            }
        },
        "type": "m.push_rules"
    })
});
