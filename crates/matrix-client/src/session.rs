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

//! The session file a client can be saved to and restored from.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{api::SessionTokens, Result};

/// The persisted state of a [`Client`](crate::Client).
///
/// This is a single JSON object:
///
/// ```json
/// {
///     "base_url": "https://example.org",
///     "validate_certificate": true,
///     "user_id": "@example:example.org",
///     "homeserver_name": "example.org",
///     "access_token": "abc123",
///     "refresh_token": "def456"
/// }
/// ```
///
/// `base_url` and `validate_certificate` are required, the other fields are
/// left out when unset.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionFile {
    /// The URL of the homeserver.
    pub base_url: String,
    /// Whether the certificate of the homeserver is checked.
    pub validate_certificate: bool,
    /// The user the session belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// The server name of the homeserver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeserver_name: Option<String>,
    /// The access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// The refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[cfg(not(tarpaulin_include))]
impl std::fmt::Debug for SessionFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFile")
            .field("base_url", &self.base_url)
            .field("validate_certificate", &self.validate_certificate)
            .field("user_id", &self.user_id)
            .field("homeserver_name", &self.homeserver_name)
            .finish_non_exhaustive()
    }
}

impl SessionFile {
    /// Read a session file.
    ///
    /// Fails if the file isn't a JSON object or lacks `base_url` or
    /// `validate_certificate`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading the session");

        let content = fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Write the session file, replacing any previous content.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Saving the session");

        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// The tokens to restore into a client.
    pub(crate) fn tokens(&self) -> SessionTokens {
        SessionTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            user_id: self.user_id.clone(),
            homeserver_name: self.homeserver_name.clone(),
            device_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::Error;

    #[test]
    fn optional_fields_are_omitted() {
        let file = SessionFile {
            base_url: "https://example.org".to_owned(),
            validate_certificate: false,
            user_id: None,
            homeserver_name: None,
            access_token: Some("abc123".to_owned()),
            refresh_token: None,
        };

        assert_eq!(
            serde_json::to_value(&file).unwrap(),
            json!({
                "base_url": "https://example.org",
                "validate_certificate": false,
                "access_token": "abc123",
            })
        );
    }

    #[test]
    fn required_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        fs::write(&path, r#"{ "base_url": "https://example.org" }"#).unwrap();
        assert_matches!(SessionFile::load(&path), Err(Error::SerdeJson(_)));

        fs::write(&path, r#"{ "validate_certificate": true }"#).unwrap();
        assert_matches!(SessionFile::load(&path), Err(Error::SerdeJson(_)));

        let content = r#"{ "base_url": "https://example.org", "validate_certificate": true }"#;
        fs::write(&path, content).unwrap();
        let file = SessionFile::load(&path).unwrap();
        assert!(file.validate_certificate);
        assert_eq!(file.access_token, None);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_matches!(SessionFile::load(dir.path().join("nope.json")), Err(Error::Io(_)));
    }
}
