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

use super::{message_accessors, Message, MessageFields, TypedMessage};
use crate::{
    info::{ImageInfo, MediaInfo},
    json::{require, set, FieldReader, JsonObject},
    Result,
};

/// A location.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocationMessage {
    /// The fields every message has.
    pub fields: MessageFields,
    /// A `geo:` URI of the location. Required.
    pub geo_uri: Option<String>,
    /// The `mxc://` URI of an image of the location.
    pub thumbnail_url: Option<String>,
    /// Metadata of the image.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

impl LocationMessage {
    /// A location message with the given description and `geo:` URI.
    pub fn new(body: impl Into<String>, geo_uri: impl Into<String>) -> Self {
        Self {
            fields: MessageFields::with_body(body),
            geo_uri: Some(geo_uri.into()),
            ..Default::default()
        }
    }
}

impl Message for LocationMessage {
    message_accessors!();

    fn to_json(&self) -> Result<JsonObject> {
        let geo_uri = require(self.geo_uri.as_deref(), Self::MSGTYPE, "geo_uri")?;

        let mut content = self.fields.raw_content();
        set(&mut content, "geo_uri", geo_uri);
        MediaInfo::<ImageInfo>::write(
            &mut content,
            None,
            self.thumbnail_url.as_ref(),
            self.thumbnail_info.as_ref(),
        );

        self.fields.write(Self::MSGTYPE, content)
    }
}

impl TypedMessage for LocationMessage {
    const MSGTYPE: &'static str = "m.location";

    fn from_json(content: &JsonObject) -> Result<Self> {
        let geo_uri = FieldReader::new(content, Self::MSGTYPE).required_string("geo_uri");
        let media = MediaInfo::<ImageInfo>::parse(content, Self::MSGTYPE);

        Ok(Self {
            fields: MessageFields::parse(content, Self::MSGTYPE)?,
            geo_uri,
            thumbnail_url: media.thumbnail_url,
            thumbnail_info: media.thumbnail_info,
        })
    }
}
