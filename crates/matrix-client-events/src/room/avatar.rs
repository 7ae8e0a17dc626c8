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

use std::sync::Arc;

use crate::{
    common::{content_of, event_accessors, raw_content},
    info::{ImageInfo, MediaInfo},
    json::{require, set, FieldReader, JsonObject},
    Event, Result, StateEventFields, TypedEvent,
};

/// The picture of a room.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomAvatarEvent {
    /// Fields of state events.
    pub state: StateEventFields,
    /// The `mxc://` URI of the picture. Required.
    pub url: Option<String>,
    /// Metadata of the picture.
    pub info: Option<Arc<ImageInfo>>,
    /// The `mxc://` URI of a thumbnail.
    pub thumbnail_url: Option<String>,
    /// Metadata of the thumbnail.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

impl RoomAvatarEvent {
    /// An avatar event with the given picture.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            state: StateEventFields::with_state_key(""),
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

impl Event for RoomAvatarEvent {
    event_accessors!(state);

    fn to_json(&self) -> Result<JsonObject> {
        let url = require(self.url.as_deref(), Self::EVENT_TYPE, "url")?;

        let mut content = raw_content(self.fields());
        set(&mut content, "url", url);
        MediaInfo::write(
            &mut content,
            self.info.as_ref(),
            self.thumbnail_url.as_ref(),
            self.thumbnail_info.as_ref(),
        );

        self.state.write(Self::EVENT_TYPE, content)
    }
}

impl TypedEvent for RoomAvatarEvent {
    const EVENT_TYPE: &'static str = "m.room.avatar";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let url = FieldReader::new(content, Self::EVENT_TYPE).required_string("url");
        let media = MediaInfo::<ImageInfo>::parse(content, Self::EVENT_TYPE);

        Ok(Self {
            state: StateEventFields::parse(json, Self::EVENT_TYPE),
            url,
            info: media.info,
            thumbnail_url: media.thumbnail_url,
            thumbnail_info: media.thumbnail_info,
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
    fn avatar() {
        let json = json!({
            "type": "m.room.avatar",
            "state_key": "",
            "content": {
                "url": "mxc://example.org/avatar",
                "info": {
                    "h": 398,
                    "w": 394,
                    "mimetype": "image/jpeg",
                    "size": 31037,
                    "thumbnail_url": "mxc://example.org/avatar-thumb",
                    "thumbnail_info": { "h": 96, "w": 96, "mimetype": "image/jpeg", "size": 4000 }
                }
            }
        });
        let event = RoomAvatarEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.info.as_ref().unwrap().size, Some(31037));
        assert_eq!(event.thumbnail_info.as_ref().unwrap().height, Some(96));
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn url_is_required() {
        let mut event = RoomAvatarEvent::new("mxc://example.org/avatar");
        event.url = None;
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "url", .. }));
    }
}
