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

//! Image, audio and video messages.

use std::sync::Arc;

use super::{message_accessors, Message, MessageFields, TypedMessage};
use crate::{
    info::{AudioInfo, ImageInfo, MediaInfo, VideoInfo},
    json::{require, set, FieldReader, JsonObject},
    Result,
};

/// An image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageMessage {
    /// The fields every message has.
    pub fields: MessageFields,
    /// The `mxc://` URI of the image. Required.
    pub url: Option<String>,
    /// Metadata of the image.
    pub info: Option<Arc<ImageInfo>>,
    /// The `mxc://` URI of a thumbnail.
    pub thumbnail_url: Option<String>,
    /// Metadata of the thumbnail.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

impl Message for ImageMessage {
    message_accessors!();

    fn to_json(&self) -> Result<JsonObject> {
        let url = require(self.url.as_deref(), Self::MSGTYPE, "url")?;

        let mut content = self.fields.raw_content();
        set(&mut content, "url", url);
        MediaInfo::write(
            &mut content,
            self.info.as_ref(),
            self.thumbnail_url.as_ref(),
            self.thumbnail_info.as_ref(),
        );

        self.fields.write(Self::MSGTYPE, content)
    }
}

impl TypedMessage for ImageMessage {
    const MSGTYPE: &'static str = "m.image";

    fn from_json(content: &JsonObject) -> Result<Self> {
        let url = FieldReader::new(content, Self::MSGTYPE).required_string("url");
        let media = MediaInfo::<ImageInfo>::parse(content, Self::MSGTYPE);

        Ok(Self {
            fields: MessageFields::parse(content, Self::MSGTYPE)?,
            url,
            info: media.info,
            thumbnail_url: media.thumbnail_url,
            thumbnail_info: media.thumbnail_info,
        })
    }
}

/// An audio clip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioMessage {
    /// The fields every message has.
    pub fields: MessageFields,
    /// The `mxc://` URI of the clip. Required.
    pub url: Option<String>,
    /// Metadata of the clip.
    pub info: Option<Arc<AudioInfo>>,
}

impl Message for AudioMessage {
    message_accessors!();

    fn to_json(&self) -> Result<JsonObject> {
        let url = require(self.url.as_deref(), Self::MSGTYPE, "url")?;

        let mut content = self.fields.raw_content();
        set(&mut content, "url", url);
        MediaInfo::write(&mut content, self.info.as_ref(), None, None);

        self.fields.write(Self::MSGTYPE, content)
    }
}

impl TypedMessage for AudioMessage {
    const MSGTYPE: &'static str = "m.audio";

    fn from_json(content: &JsonObject) -> Result<Self> {
        let url = FieldReader::new(content, Self::MSGTYPE).required_string("url");
        let media = MediaInfo::<AudioInfo>::parse(content, Self::MSGTYPE);

        Ok(Self { fields: MessageFields::parse(content, Self::MSGTYPE)?, url, info: media.info })
    }
}

/// A video clip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VideoMessage {
    /// The fields every message has.
    pub fields: MessageFields,
    /// The `mxc://` URI of the clip. Required.
    pub url: Option<String>,
    /// Metadata of the clip.
    pub info: Option<Arc<VideoInfo>>,
    /// The `mxc://` URI of a still image of the clip.
    pub thumbnail_url: Option<String>,
    /// Metadata of the still image.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

impl Message for VideoMessage {
    message_accessors!();

    fn to_json(&self) -> Result<JsonObject> {
        let url = require(self.url.as_deref(), Self::MSGTYPE, "url")?;

        let mut content = self.fields.raw_content();
        set(&mut content, "url", url);
        MediaInfo::write(
            &mut content,
            self.info.as_ref(),
            self.thumbnail_url.as_ref(),
            self.thumbnail_info.as_ref(),
        );

        self.fields.write(Self::MSGTYPE, content)
    }
}

impl TypedMessage for VideoMessage {
    const MSGTYPE: &'static str = "m.video";

    fn from_json(content: &JsonObject) -> Result<Self> {
        let url = FieldReader::new(content, Self::MSGTYPE).required_string("url");
        let media = MediaInfo::<VideoInfo>::parse(content, Self::MSGTYPE);

        Ok(Self {
            fields: MessageFields::parse(content, Self::MSGTYPE)?,
            url,
            info: media.info,
            thumbnail_url: media.thumbnail_url,
            thumbnail_info: media.thumbnail_info,
        })
    }
}
