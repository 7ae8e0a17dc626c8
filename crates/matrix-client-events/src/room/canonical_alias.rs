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

use crate::{
    common::{content_of, event_accessors, raw_content},
    json::{set, set_opt, string_list, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// The preferred alias of a room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomCanonicalAliasEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// The canonical alias, unset if the room doesn't have one any more.
    pub alias: Option<String>,
    /// Other aliases the room advertises.
    pub alt_aliases: Vec<String>,
}

impl RoomCanonicalAliasEvent {
    /// A canonical alias event pointing to `alias`.
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            state: StateEventFields::with_state_key(""),
            alias: Some(alias.into()),
            alt_aliases: Vec::new(),
        }
    }
}

impl Event for RoomCanonicalAliasEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let mut content = raw_content(self.fields());
        set_opt(&mut content, "alias", self.alias.clone());
        if self.alt_aliases.is_empty() {
            content.remove("alt_aliases");
        } else {
            set(&mut content, "alt_aliases", string_list(&self.alt_aliases));
        }
        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomCanonicalAliasEvent {
    const EVENT_TYPE: &'static str = "m.room.canonical_alias";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);

        Ok(Self {
            alias: reader.string("alias"),
            alt_aliases: reader.string_list("alt_aliases").unwrap_or_default(),
            state: StateEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::EventError;

    #[test]
    fn round_trip() {
        let mut event = RoomCanonicalAliasEvent::new("#main:example.org");
        event.alt_aliases = vec!["#other:example.org".to_owned()];

        let json = event.to_json().unwrap();
        assert_eq!(
            json["content"],
            json!({ "alias": "#main:example.org", "alt_aliases": ["#other:example.org"] })
        );

        let parsed = RoomCanonicalAliasEvent::from_json(&json).unwrap();
        assert_eq!(parsed.alias, event.alias);
        assert_eq!(parsed.alt_aliases, event.alt_aliases);
        assert_eq!(parsed.state.state_key.as_deref(), Some(""));
    }

    #[test]
    fn removed_alias() {
        let json = json!({
            "type": "m.room.canonical_alias",
            "state_key": "",
            "content": { "alias": "#main:example.org", "alt_aliases": ["#other:example.org"] }
        });
        let mut event = RoomCanonicalAliasEvent::from_json(json.as_object().unwrap()).unwrap();
        event.alias = None;
        event.alt_aliases.clear();

        assert_eq!(event.to_json().unwrap()["content"], json!({}));
    }

    #[test]
    fn state_key_is_required() {
        let event = RoomCanonicalAliasEvent {
            alias: Some("#main:example.org".to_owned()),
            ..Default::default()
        };
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "state_key", .. }));
    }
}
