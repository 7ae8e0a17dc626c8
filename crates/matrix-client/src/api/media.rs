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

use bytes::Bytes;
use matrix_client_events::enums::ResizeMethod;
use mime::Mime;
use serde::Deserialize;
use tracing::instrument;

use super::{require, Api, ApiRequest};
use crate::{Error, Result};

/// Split an `mxc://server/media_id` URI into its server name and media id.
pub fn parse_mxc_uri(uri: &str) -> Option<(&str, &str)> {
    let (server_name, media_id) = uri.strip_prefix("mxc://")?.split_once('/')?;
    if server_name.is_empty() || media_id.is_empty() || media_id.contains('/') {
        return None;
    }
    Some((server_name, media_id))
}

impl Api {
    /// Upload some media, returning its `mxc://` URI.
    ///
    /// `POST /_matrix/media/r0/upload`
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(
        &self,
        content_type: &Mime,
        filename: Option<&str>,
        data: Bytes,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            content_uri: String,
        }

        let request = ApiRequest::post(&["upload"])
            .media()
            .query_opt("filename", filename)
            .bytes(content_type, data);
        let response: Response = self.send(request).await?;
        Ok(response.content_uri)
    }

    /// Download some media.
    ///
    /// `GET /_matrix/media/r0/download/{server_name}/{media_id}`
    pub async fn download(&self, server_name: &str, media_id: &str) -> Result<Bytes> {
        let server_name = require(server_name, "server_name")?;
        let media_id = require(media_id, "media_id")?;

        let request =
            ApiRequest::get(&["download", server_name, media_id]).media().unauthenticated();
        self.send_for_bytes(request).await
    }

    /// Download the media behind an `mxc://` URI.
    pub async fn download_mxc(&self, uri: &str) -> Result<Bytes> {
        let (server_name, media_id) = parse_mxc_uri(uri)
            .ok_or_else(|| Error::InvalidArgument(format!("`{uri}` isn't an mxc URI")))?;
        self.download(server_name, media_id).await
    }

    /// Download a thumbnail of some media.
    ///
    /// The homeserver picks the size when `width` or `height` is `None`, and
    /// the resize method when `method` is `None`.
    ///
    /// `GET /_matrix/media/r0/thumbnail/{server_name}/{media_id}`
    pub async fn thumbnail(
        &self,
        server_name: &str,
        media_id: &str,
        width: Option<u32>,
        height: Option<u32>,
        method: Option<ResizeMethod>,
    ) -> Result<Bytes> {
        let server_name = require(server_name, "server_name")?;
        let media_id = require(media_id, "media_id")?;

        let request = ApiRequest::get(&["thumbnail", server_name, media_id])
            .media()
            .unauthenticated()
            .query_opt("width", width)
            .query_opt("height", height)
            .query_opt("method", method);

        self.send_for_bytes(request).await
    }
}
