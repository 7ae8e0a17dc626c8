//! Complete sync responses.

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

use crate::DEFAULT_TEST_ROOM_ID;

/// The room id the canned sync responses deliver their room under.
pub const DEFAULT_SYNC_ROOM_ID: &str = DEFAULT_TEST_ROOM_ID;

/// An initial sync with one joined room carrying the usual room state, a
/// couple of timeline messages, ephemeral and account data.
pub static SYNC: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "account_data": {
            "events": [
                {
                    "content": {
                        "ignored_users": {
                            "@someone:example.org": {}
                        }
                    },
                    "type": "m.ignored_user_list"
                }
            ]
        },
        "next_batch": "s526_47314_0_7_1_1_1_11444_1",
        "presence": {
            "events": [
                {
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
                }
            ]
        },
        "rooms": {
            "invite": {},
            "join": {
                DEFAULT_TEST_ROOM_ID: {
                    "summary": {},
                    "account_data": {
                        "events": [
                            {
                                "content": {
                                    "tags": {
                                        "m.favourite": {
                                            "order": 0.5
                                        }
                                    }
                                },
                                "type": "m.tag"
                            }
                        ]
                    },
                    "ephemeral": {
                        "events": [
                            {
                                "content": {
                                    "$151680659217152dPKjd:localhost": {
                                        "m.read": {
                                            "@example:localhost": {
                                                "ts": 151680989
                                            }
                                        }
                                    }
                                },
                                "type": "m.receipt"
                            },
                            {
                                "content": {
                                    "user_ids": [
                                        "@alice:localhost"
                                    ]
                                },
                                "type": "m.typing"
                            }
                        ]
                    },
                    "state": {
                        "events": [
                            {
                                "content": {
                                    "creator": "@example:localhost",
                                    "m.federate": true,
                                    "room_version": "1"
                                },
                                "event_id": "$151957878228ekrDs:localhost",
                                "origin_server_ts": 15195787,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.create"
                            },
                            {
                                "content": {
                                    "join_rule": "public"
                                },
                                "event_id": "$15139375514WsgmR:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.join_rules"
                            },
                            {
                                "content": {
                                    "avatar_url": null,
                                    "displayname": "example",
                                    "membership": "join"
                                },
                                "event_id": "$151800140517rfvjc:localhost",
                                "origin_server_ts": 151800140,
                                "sender": "@example:localhost",
                                "state_key": "@example:localhost",
                                "type": "m.room.member"
                            },
                            {
                                "content": {
                                    "displayname": "Alice Margatroid",
                                    "membership": "join"
                                },
                                "event_id": "$151800140517rfvja:localhost",
                                "origin_server_ts": 151800146,
                                "sender": "@alice:localhost",
                                "state_key": "@alice:localhost",
                                "type": "m.room.member"
                            },
                            {
                                "content": {
                                    "history_visibility": "shared"
                                },
                                "event_id": "$15139375515VaJEY:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.history_visibility"
                            },
                            {
                                "content": {
                                    "aliases": [
                                        "#tutorial:localhost"
                                    ]
                                },
                                "event_id": "$15139375516NUgtD:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "localhost",
                                "type": "m.room.aliases"
                            },
                            {
                                "content": {
                                    "alias": "#tutorial:localhost"
                                },
                                "event_id": "$15139375513VdeRF:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.canonical_alias"
                            },
                            {
                                "content": {
                                    "ban": 50,
                                    "events": {
                                        "m.room.avatar": 50,
                                        "m.room.name": 50,
                                        "m.room.power_levels": 100
                                    },
                                    "events_default": 0,
                                    "invite": 0,
                                    "kick": 50,
                                    "redact": 50,
                                    "state_default": 50,
                                    "users": {
                                        "@example:localhost": 100
                                    },
                                    "users_default": 0
                                },
                                "event_id": "$15139375512JaHAW:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.power_levels"
                            }
                        ]
                    },
                    "timeline": {
                        "events": [
                            {
                                "content": {
                                    "name": "room name"
                                },
                                "event_id": "$15139375513VdeRF:localhost",
                                "origin_server_ts": 151393755,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.name"
                            },
                            {
                                "content": {
                                    "topic": "😀"
                                },
                                "event_id": "$151957878228ssqrJ:localhost",
                                "origin_server_ts": 151957878,
                                "sender": "@example:localhost",
                                "state_key": "",
                                "type": "m.room.topic"
                            },
                            {
                                "content": {
                                    "body": "baba",
                                    "format": "org.matrix.custom.html",
                                    "formatted_body": "<strong>baba</strong>",
                                    "msgtype": "m.text"
                                },
                                "event_id": "$152037280074GZeOm:localhost",
                                "origin_server_ts": 152037280,
                                "sender": "@example:localhost",
                                "type": "m.room.message"
                            }
                        ],
                        "limited": true,
                        "prev_batch": "t392-516_47314_0_7_1_1_1_11444_1"
                    },
                    "unread_notifications": {
                        "highlight_count": 1,
                        "notification_count": 11
                    }
                }
            },
            "leave": {}
        },
        "to_device": {
            "events": []
        }
    })
});

/// A sync delivering an invite into `!696r7674:example.com`.
pub static INVITE_SYNC: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "account_data": {
            "events": []
        },
        "next_batch": "s526_47314_0_7_1_1_1_11444_2",
        "presence": {
            "events": []
        },
        "rooms": {
            "invite": {
                "!696r7674:example.com": {
                    "invite_state": {
                        "events": [
                            {
                                "content": {
                                    "name": "My Room Name"
                                },
                                "sender": "@alice:example.com",
                                "state_key": "",
                                "type": "m.room.name"
                            },
                            {
                                "content": {
                                    "membership": "invite"
                                },
                                "sender": "@alice:example.com",
                                "state_key": "@example:localhost",
                                "type": "m.room.member"
                            }
                        ]
                    }
                }
            },
            "join": {},
            "leave": {}
        }
    })
});

/// A sync in which the user left [`DEFAULT_SYNC_ROOM_ID`].
pub static LEAVE_SYNC: Lazy<JsonValue> = Lazy::new(|| {
    json!({
        "account_data": {
            "events": []
        },
        "next_batch": "s526_47314_0_7_1_1_1_11444_3",
        "presence": {
            "events": []
        },
        "rooms": {
            "invite": {},
            "join": {},
            "leave": {
                DEFAULT_TEST_ROOM_ID: {
                    "account_data": {
                        "events": []
                    },
                    "state": {
                        "events": []
                    },
                    "timeline": {
                        "events": [
                            {
                                "content": {
                                    "membership": "leave"
                                },
                                "event_id": "$151803140217rkvjc:localhost",
                                "origin_server_ts": 151800190,
                                "sender": "@example:localhost",
                                "state_key": "@example:localhost",
                                "type": "m.room.member"
                            }
                        ],
                        "limited": false,
                        "prev_batch": "t392-516_47314_0_7_1_1_1_11444_2"
                    }
                }
            }
        }
    })
});
