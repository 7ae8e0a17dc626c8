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

//! Events outside of any room's history: presence, typing notifications,
//! receipts and tags.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{
    common::{content_of, event_accessors, raw_content},
    enums::{Presence, ReceiptType},
    json::{require, set, set_opt, string_list, FieldReader, JsonObject},
    Event, EventFields, Result, TypedEvent,
};

/// The presence of a user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresenceEvent {
    /// Fields every event has.
    pub base: EventFields,
    /// The user the presence is about. Required.
    pub sender: Option<String>,
    /// The presence state. Required.
    pub presence: Option<Presence>,
    /// The current display name of the user.
    pub displayname: Option<String>,
    /// The current avatar of the user.
    pub avatar_url: Option<String>,
    /// Milliseconds since the user was last active.
    pub last_active_ago: Option<u64>,
    /// Whether the user is currently active.
    pub currently_active: Option<bool>,
    /// A free form status message.
    pub status_msg: Option<String>,
}

impl Event for PresenceEvent {
    event_accessors!(base);

    fn to_json(&self) -> Result<JsonObject> {
        let sender = require(self.sender.as_deref(), Self::EVENT_TYPE, "sender")?;
        let presence = require(self.presence.as_ref(), Self::EVENT_TYPE, "presence")?;

        let mut content = raw_content(&self.base);
        set(&mut content, "presence", presence);
        set_opt(&mut content, "displayname", self.displayname.clone());
        set_opt(&mut content, "avatar_url", self.avatar_url.clone());
        set_opt(&mut content, "last_active_ago", self.last_active_ago);
        set_opt(&mut content, "currently_active", self.currently_active);
        set_opt(&mut content, "status_msg", self.status_msg.clone());

        let mut json = self.base.write(Self::EVENT_TYPE, content);
        set(&mut json, "sender", sender);
        Ok(json)
    }
}

impl TypedEvent for PresenceEvent {
    const EVENT_TYPE: &'static str = "m.presence";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        // Older servers put the user into the content.
        let sender = FieldReader::new(json, Self::EVENT_TYPE)
            .string("sender")
            .or_else(|| reader.required_string("user_id"));

        Ok(Self {
            sender,
            presence: reader.required_enum("presence"),
            displayname: reader.string("displayname"),
            avatar_url: reader.string("avatar_url"),
            last_active_ago: reader.u64("last_active_ago"),
            currently_active: reader.bool("currently_active"),
            status_msg: reader.string("status_msg"),
            base: EventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

/// The users currently typing in a room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypingEvent {
    /// Fields every event has.
    pub base: EventFields,
    /// The typing users.
    pub user_ids: Vec<String>,
}

impl Event for TypingEvent {
    event_accessors!(base);

    fn to_json(&self) -> Result<JsonObject> {
        let mut content = raw_content(&self.base);
        set(&mut content, "user_ids", string_list(&self.user_ids));
        Ok(self.base.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for TypingEvent {
    const EVENT_TYPE: &'static str = "m.typing";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let user_ids =
            FieldReader::new(content, Self::EVENT_TYPE).string_list("user_ids").unwrap_or_default();

        Ok(Self { user_ids, base: EventFields::parse(json, Self::EVENT_TYPE) })
    }
}

/// A single receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The event the receipt is for.
    pub event_id: String,
    /// The kind of receipt.
    pub receipt_type: ReceiptType,
    /// The user who sent the receipt.
    pub user_id: String,
    /// When the receipt was sent, in milliseconds since the epoch.
    pub ts: Option<u64>,
}

/// Receipts of the users in a room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReceiptEvent {
    /// Fields every event has.
    pub base: EventFields,
    /// The receipts, grouped by event id on the wire.
    pub receipts: Vec<Receipt>,
}

impl ReceiptEvent {
    /// The receipts for `event_id`.
    pub fn receipts_for<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = &'a Receipt> + 'a {
        self.receipts.iter().filter(move |r| r.event_id == event_id)
    }
}

impl Event for ReceiptEvent {
    event_accessors!(base);

    fn to_json(&self) -> Result<JsonObject> {
        let mut content = JsonObject::new();

        for receipt in &self.receipts {
            let by_type = content
                .entry(receipt.event_id.clone())
                .or_insert_with(|| JsonValue::Object(JsonObject::new()));
            let by_user = by_type
                .as_object_mut()
                .map(|by_type| {
                    by_type
                        .entry(receipt.receipt_type.as_str().to_owned())
                        .or_insert_with(|| JsonValue::Object(JsonObject::new()))
                })
                .and_then(JsonValue::as_object_mut);

            if let Some(by_user) = by_user {
                let mut data = JsonObject::new();
                set_opt(&mut data, "ts", receipt.ts);
                by_user.insert(receipt.user_id.clone(), data.into());
            }
        }

        Ok(self.base.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for ReceiptEvent {
    const EVENT_TYPE: &'static str = "m.receipt";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let mut receipts = Vec::new();

        for (event_id, by_type) in content {
            let Some(by_type) = by_type.as_object() else {
                warn!(event_type = Self::EVENT_TYPE, event_id, "Ignoring malformed receipts");
                continue;
            };

            for (receipt_type, by_user) in by_type {
                let Some(by_user) = by_user.as_object() else { continue };

                for (user_id, data) in by_user {
                    receipts.push(Receipt {
                        event_id: event_id.clone(),
                        receipt_type: ReceiptType::from(receipt_type.as_str()),
                        user_id: user_id.clone(),
                        ts: data.get("ts").and_then(JsonValue::as_u64),
                    });
                }
            }
        }

        Ok(Self { receipts, base: EventFields::parse(json, Self::EVENT_TYPE) })
    }
}

/// A tag on a room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagInfo {
    /// Position of the room among the rooms with the same tag, from 0 to 1.
    pub order: Option<f64>,
}

/// The tags of a room, sent as room account data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagEvent {
    /// Fields every event has.
    pub base: EventFields,
    /// The tags, by name.
    pub tags: BTreeMap<String, TagInfo>,
}

impl Event for TagEvent {
    event_accessors!(base);

    fn to_json(&self) -> Result<JsonObject> {
        let tags: JsonObject = self
            .tags
            .iter()
            .map(|(name, info)| {
                let mut object = JsonObject::new();
                set_opt(&mut object, "order", info.order);
                (name.clone(), JsonValue::Object(object))
            })
            .collect();

        let mut content = raw_content(&self.base);
        set(&mut content, "tags", tags);
        Ok(self.base.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for TagEvent {
    const EVENT_TYPE: &'static str = "m.tag";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let tags = FieldReader::new(content, Self::EVENT_TYPE)
            .object("tags")
            .map(|tags| {
                tags.iter()
                    .map(|(name, info)| {
                        let order = info.as_object().and_then(|info| {
                            FieldReader::new(info, Self::EVENT_TYPE).f64("order")
                        });
                        (name.clone(), TagInfo { order })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { tags, base: EventFields::parse(json, Self::EVENT_TYPE) })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::EventError;

    #[test]
    fn presence() {
        let json = json!({
            "type": "m.presence",
            "sender": "@example:localhost",
            "content": {
                "avatar_url": "mxc://localhost/wefuiwegh8742w",
                "currently_active": false,
                "last_active_ago": 1,
                "presence": "online",
                "status_msg": "Making cupcakes"
            }
        });
        let event = PresenceEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.presence, Some(Presence::Online));
        assert_eq!(event.status_msg.as_deref(), Some("Making cupcakes"));
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn presence_requires_a_sender() {
        let event = PresenceEvent { presence: Some(Presence::Offline), ..Default::default() };
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "sender", .. }));
    }

    #[test]
    fn receipts() {
        let json = json!({
            "type": "m.receipt",
            "content": {
                "$event:localhost": {
                    "m.read": {
                        "@alice:localhost": { "ts": 1436451550453u64 },
                        "@bob:localhost": { "ts": 1436451550454u64 }
                    }
                }
            }
        });
        let event = ReceiptEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.receipts.len(), 2);
        assert_eq!(event.receipts_for("$event:localhost").count(), 2);
        assert_eq!(event.receipts[0].receipt_type, ReceiptType::Read);
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn tags() {
        let json = json!({
            "type": "m.tag",
            "content": { "tags": { "m.favourite": { "order": 0.5 }, "u.work": {} } }
        });
        let event = TagEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.tags["m.favourite"].order, Some(0.5));
        assert_eq!(event.tags["u.work"].order, None);
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn typing() {
        let json = json!({
            "type": "m.typing",
            "room_id": "!jEsUZKDJdhlrceRyVU:localhost",
            "content": { "user_ids": ["@alice:localhost"] }
        });
        let event = TypingEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.user_ids, ["@alice:localhost"]);
        assert_eq!(event.base.room_id.as_deref(), Some("!jEsUZKDJdhlrceRyVU:localhost"));
    }
}
