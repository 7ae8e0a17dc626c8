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

//! Metadata blobs describing media attached to messages and room avatars.
//!
//! The blobs are shared behind an [`Arc`], a thumbnail's [`ImageInfo`] may be
//! the same value as the one describing the full image.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::json::{set_opt, FieldReader, JsonObject};

pub(crate) trait InfoBlob: Sized {
    fn parse(reader: FieldReader<'_>) -> Self;
    fn write(&self, object: &mut JsonObject);
}

/// Metadata of an image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageInfo {
    /// Height in pixels.
    pub height: Option<u64>,
    /// Width in pixels.
    pub width: Option<u64>,
    /// The mimetype, e.g. `image/png`.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl InfoBlob for ImageInfo {
    fn parse(reader: FieldReader<'_>) -> Self {
        Self {
            height: reader.u64("h"),
            width: reader.u64("w"),
            mimetype: reader.string("mimetype"),
            size: reader.u64("size"),
        }
    }

    fn write(&self, object: &mut JsonObject) {
        set_opt(object, "h", self.height);
        set_opt(object, "w", self.width);
        set_opt(object, "mimetype", self.mimetype.clone());
        set_opt(object, "size", self.size);
    }
}

/// Metadata of a generic file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// The mimetype.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl InfoBlob for FileInfo {
    fn parse(reader: FieldReader<'_>) -> Self {
        Self { mimetype: reader.string("mimetype"), size: reader.u64("size") }
    }

    fn write(&self, object: &mut JsonObject) {
        set_opt(object, "mimetype", self.mimetype.clone());
        set_opt(object, "size", self.size);
    }
}

/// Metadata of an audio clip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioInfo {
    /// Duration in milliseconds.
    pub duration: Option<u64>,
    /// The mimetype.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl InfoBlob for AudioInfo {
    fn parse(reader: FieldReader<'_>) -> Self {
        Self {
            duration: reader.u64("duration"),
            mimetype: reader.string("mimetype"),
            size: reader.u64("size"),
        }
    }

    fn write(&self, object: &mut JsonObject) {
        set_opt(object, "duration", self.duration);
        set_opt(object, "mimetype", self.mimetype.clone());
        set_opt(object, "size", self.size);
    }
}

/// Metadata of a video clip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoInfo {
    /// Duration in milliseconds.
    pub duration: Option<u64>,
    /// Height in pixels.
    pub height: Option<u64>,
    /// Width in pixels.
    pub width: Option<u64>,
    /// The mimetype.
    pub mimetype: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
}

impl InfoBlob for VideoInfo {
    fn parse(reader: FieldReader<'_>) -> Self {
        Self {
            duration: reader.u64("duration"),
            height: reader.u64("h"),
            width: reader.u64("w"),
            mimetype: reader.string("mimetype"),
            size: reader.u64("size"),
        }
    }

    fn write(&self, object: &mut JsonObject) {
        set_opt(object, "duration", self.duration);
        set_opt(object, "h", self.height);
        set_opt(object, "w", self.width);
        set_opt(object, "mimetype", self.mimetype.clone());
        set_opt(object, "size", self.size);
    }
}

/// A media `info` object as found in message and avatar content, with the
/// thumbnail nested inside it.
pub(crate) struct MediaInfo<T> {
    pub(crate) info: Option<Arc<T>>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) thumbnail_info: Option<Arc<ImageInfo>>,
}

impl<T: InfoBlob> MediaInfo<T> {
    pub(crate) fn parse(content: &JsonObject, event_type: &str) -> Self {
        let reader = FieldReader::new(content, event_type);
        let Some(info) = reader.object("info") else {
            // Some old clients put the thumbnail next to the info.
            return Self {
                info: None,
                thumbnail_url: reader.string("thumbnail_url"),
                thumbnail_info: reader
                    .object("thumbnail_info")
                    .map(|t| Arc::new(ImageInfo::parse(FieldReader::new(t, event_type)))),
            };
        };

        let info_reader = FieldReader::new(info, event_type);
        let thumbnail_url =
            info_reader.string("thumbnail_url").or_else(|| reader.string("thumbnail_url"));
        let thumbnail_info = info_reader
            .object("thumbnail_info")
            .or_else(|| reader.object("thumbnail_info"))
            .map(|t| Arc::new(ImageInfo::parse(FieldReader::new(t, event_type))));

        let has_info = info.keys().any(|key| key != "thumbnail_url" && key != "thumbnail_info");
        let info = has_info.then(|| Arc::new(T::parse(info_reader)));

        Self { info, thumbnail_url, thumbnail_info }
    }

    pub(crate) fn write(
        content: &mut JsonObject,
        info: Option<&Arc<T>>,
        thumbnail_url: Option<&String>,
        thumbnail_info: Option<&Arc<ImageInfo>>,
    ) {
        // Unknown keys of the received `info` survive only while `info` is set.
        let mut object = match info {
            Some(info) => {
                let mut object = content
                    .get("info")
                    .and_then(JsonValue::as_object)
                    .cloned()
                    .unwrap_or_default();
                info.write(&mut object);
                object
            }
            None => JsonObject::new(),
        };
        set_opt(&mut object, "thumbnail_url", thumbnail_url.cloned());
        set_opt(
            &mut object,
            "thumbnail_info",
            thumbnail_info.map(|t| {
                let mut thumbnail = JsonObject::new();
                t.write(&mut thumbnail);
                thumbnail
            }),
        );
        content.remove("thumbnail_url");
        content.remove("thumbnail_info");

        if object.is_empty() {
            content.remove("info");
        } else {
            content.insert("info".to_owned(), object.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn thumbnail_inside_info() {
        let content = json!({
            "info": {
                "h": 100,
                "w": 200,
                "mimetype": "image/png",
                "thumbnail_url": "mxc://example.org/thumb",
                "thumbnail_info": { "h": 10, "w": 20 }
            }
        });
        let media = MediaInfo::<ImageInfo>::parse(content.as_object().unwrap(), "m.image");

        assert_eq!(media.info.unwrap().width, Some(200));
        assert_eq!(media.thumbnail_url.as_deref(), Some("mxc://example.org/thumb"));
        assert_eq!(media.thumbnail_info.unwrap().height, Some(10));
    }

    #[test]
    fn empty_info_is_not_written() {
        let mut content = JsonObject::new();
        MediaInfo::<FileInfo>::write(&mut content, None, None, None);
        assert!(content.is_empty());
    }

    #[test]
    fn cleared_info_is_dropped() {
        let mut content = json!({
            "info": { "h": 1, "w": 2, "xyz.custom": true, "thumbnail_url": "mxc://a/b" }
        })
        .as_object()
        .unwrap()
        .clone();
        MediaInfo::<ImageInfo>::write(&mut content, None, Some(&"mxc://a/b".to_owned()), None);

        assert_eq!(content["info"], json!({ "thumbnail_url": "mxc://a/b" }));

        let media = MediaInfo::<ImageInfo>::parse(&content, "m.image");
        assert_eq!(media.info, None);
        assert_eq!(media.thumbnail_url.as_deref(), Some("mxc://a/b"));
    }

    #[test]
    fn shared_thumbnail_info() {
        let info = Arc::new(ImageInfo { height: Some(1), width: Some(1), ..Default::default() });
        let mut content = JsonObject::new();
        MediaInfo::write(&mut content, Some(&info), Some(&"mxc://a/b".to_owned()), Some(&info));

        assert_eq!(content["info"]["thumbnail_info"], json!({ "h": 1, "w": 1 }));
        assert_eq!(content["info"]["h"], 1);
    }
}
