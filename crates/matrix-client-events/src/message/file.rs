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
    info::{FileInfo, ImageInfo, MediaInfo},
    json::{require, set, set_opt, FieldReader, JsonObject},
    Result,
};

/// A generic file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileMessage {
    /// The fields every message has.
    pub fields: MessageFields,
    /// The original name of the file.
    pub filename: Option<String>,
    /// The `mxc://` URI of the file. Required.
    pub url: Option<String>,
    /// Metadata of the file. Required.
    pub info: Option<Arc<FileInfo>>,
    /// The `mxc://` URI of a thumbnail.
    pub thumbnail_url: Option<String>,
    /// Metadata of the thumbnail.
    pub thumbnail_info: Option<Arc<ImageInfo>>,
}

impl Message for FileMessage {
    message_accessors!();

    fn to_json(&self) -> Result<JsonObject> {
        let url = require(self.url.as_deref(), Self::MSGTYPE, "url")?;
        let info = require(self.info.as_ref(), Self::MSGTYPE, "info")?;

        let mut content = self.fields.raw_content();
        set(&mut content, "url", url);
        set_opt(&mut content, "filename", self.filename.clone());
        MediaInfo::write(
            &mut content,
            Some(info),
            self.thumbnail_url.as_ref(),
            self.thumbnail_info.as_ref(),
        );

        self.fields.write(Self::MSGTYPE, content)
    }
}

impl TypedMessage for FileMessage {
    const MSGTYPE: &'static str = "m.file";

    fn from_json(content: &JsonObject) -> Result<Self> {
        let reader = FieldReader::new(content, Self::MSGTYPE);
        let filename = reader.string("filename");
        let url = reader.required_string("url");
        let media = MediaInfo::<FileInfo>::parse(content, Self::MSGTYPE);

        Ok(Self {
            fields: MessageFields::parse(content, Self::MSGTYPE)?,
            filename,
            url,
            info: media.info,
            thumbnail_url: media.thumbnail_url,
            thumbnail_info: media.thumbnail_info,
        })
    }
}
