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
    json::{set, string_list, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// The aliases a homeserver knows for a room. The state key is the server
/// name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomAliasesEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// The aliases, in the order the server lists them.
    pub aliases: Vec<String>,
}

impl RoomAliasesEvent {
    /// An aliases event for the given server.
    pub fn new(server_name: impl Into<String>, aliases: Vec<String>) -> Self {
        Self { state: StateEventFields::with_state_key(server_name), aliases }
    }
}

impl Event for RoomAliasesEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let mut content = raw_content(self.fields());
        set(&mut content, "aliases", string_list(&self.aliases));
        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomAliasesEvent {
    const EVENT_TYPE: &'static str = "m.room.aliases";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let aliases = reader.string_list("aliases").unwrap_or_else(|| {
            reader.missing("aliases");
            Vec::new()
        });

        Ok(Self { state: StateEventFields::parse(json, Self::EVENT_TYPE), aliases })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn order_is_kept() {
        let json = json!({
            "type": "m.room.aliases",
            "state_key": "example.org",
            "content": { "aliases": ["#b:example.org", "#a:example.org", 7] }
        });
        let event = RoomAliasesEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.aliases, ["#b:example.org", "#a:example.org"]);
        assert_eq!(event.state.state_key.as_deref(), Some("example.org"));
    }
}
