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
    json::{require, set, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// A key an invite can be validated with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicKey {
    /// The key, base64 encoded.
    pub public_key: String,
    /// URL to check whether the key is still valid.
    pub key_validity_url: Option<String>,
}

/// An invite for someone identified by a third party identifier. The state
/// key is the invite token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomThirdPartyInviteEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// A name to show for the invited identity. Required.
    pub display_name: Option<String>,
    /// URL to check whether `public_key` is still valid. Required.
    pub key_validity_url: Option<String>,
    /// The key used to sign the invite. Required.
    pub public_key: Option<String>,
    /// More keys the invite can be validated with.
    pub public_keys: Vec<PublicKey>,
}

impl Event for RoomThirdPartyInviteEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let display_name = require(self.display_name.as_deref(), Self::EVENT_TYPE, "display_name")?;
        let key_validity_url =
            require(self.key_validity_url.as_deref(), Self::EVENT_TYPE, "key_validity_url")?;
        let public_key = require(self.public_key.as_deref(), Self::EVENT_TYPE, "public_key")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "display_name", display_name);
        set(&mut content, "key_validity_url", key_validity_url);
        set(&mut content, "public_key", public_key);

        if self.public_keys.is_empty() {
            content.remove("public_keys");
        } else {
            let keys: Vec<JsonValue> = self
                .public_keys
                .iter()
                .map(|key| {
                    let mut object = JsonObject::new();
                    set(&mut object, "public_key", key.public_key.as_str());
                    let key_validity_url = key.key_validity_url.clone();
                    crate::json::set_opt(&mut object, "key_validity_url", key_validity_url);
                    JsonValue::Object(object)
                })
                .collect();
            set(&mut content, "public_keys", keys);
        }

        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomThirdPartyInviteEvent {
    const EVENT_TYPE: &'static str = "m.room.third_party_invite";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let public_keys = reader
            .array("public_keys")
            .map(|keys| {
                keys.iter()
                    .filter_map(JsonValue::as_object)
                    .filter_map(|key| {
                        let key = FieldReader::new(key, Self::EVENT_TYPE);
                        Some(PublicKey {
                            public_key: key.string("public_key")?,
                            key_validity_url: key.string("key_validity_url"),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            display_name: reader.required_string("display_name"),
            key_validity_url: reader.required_string("key_validity_url"),
            public_key: reader.required_string("public_key"),
            public_keys,
            state: StateEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}
