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

use std::{fmt, sync::Arc, time::Duration};

use http::HeaderValue;
use matrix_client_events::EventFactory;

use crate::Result;

/// The default timeout of a single request.
pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the creation of the [`Client`].
///
/// # Examples
///
/// ```
/// # use matrix_client::config::ClientConfig;
/// // To pass all the request through mitmproxy set the proxy and disable SSL
/// // verification
/// let client_config = ClientConfig::new()
///     .proxy("http://localhost:8080")
///     .unwrap()
///     .disable_ssl_verification();
/// ```
///
/// [`Client`]: crate::Client
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) proxy: Option<reqwest::Proxy>,
    pub(crate) user_agent: Option<HeaderValue>,
    pub(crate) validate_certificate: bool,
    pub(crate) timeout: Duration,
    pub(crate) event_factory: Option<Arc<EventFactory>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            user_agent: None,
            validate_certificate: true,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            event_factory: None,
        }
    }
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for ClientConfig {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("ClientConfig")
            .field("proxy", &self.proxy)
            .field("user_agent", &self.user_agent)
            .field("validate_certificate", &self.validate_certificate)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Create a new default `ClientConfig`.
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the proxy through which all the HTTP requests should go.
    ///
    /// Note, only HTTP proxies are supported.
    ///
    /// # Arguments
    ///
    /// * `proxy` - The HTTP URL of the proxy.
    pub fn proxy(mut self, proxy: &str) -> Result<Self> {
        self.proxy = Some(reqwest::Proxy::all(proxy).map_err(crate::HttpError::from)?);
        Ok(self)
    }

    /// Disable SSL verification for the HTTP requests.
    #[must_use]
    pub fn disable_ssl_verification(self) -> Self {
        self.validate_certificate(false)
    }

    /// Whether the certificate of the homeserver is checked.
    ///
    /// This is stored in the session file together with the homeserver URL.
    #[must_use]
    pub fn validate_certificate(mut self, validate: bool) -> Self {
        self.validate_certificate = validate;
        self
    }

    /// Set a custom HTTP user agent for the client.
    pub fn user_agent(mut self, user_agent: &str) -> Result<Self> {
        let value = HeaderValue::from_str(user_agent)
            .map_err(|e| crate::Error::InvalidArgument(format!("invalid user agent: {e}")))?;
        self.user_agent = Some(value);
        Ok(self)
    }

    /// Set the timeout of a single request. The default is 30 seconds.
    ///
    /// Sync requests wait for the long-poll timeout on top of this.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Decode events with `factory` instead of one with only the built-in
    /// event types.
    ///
    /// Custom event and message types are registered on the factory, which
    /// can be done before or after the client is created.
    #[must_use]
    pub fn event_factory(mut self, factory: Arc<EventFactory>) -> Self {
        self.event_factory = Some(factory);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::new();
        assert!(config.validate_certificate);
        assert_eq!(config.timeout, DEFAULT_REQUEST_TIMEOUT);

        let config = config.disable_ssl_verification().timeout(Duration::from_secs(5));
        assert!(!config.validate_certificate);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_user_agent() {
        ClientConfig::new().user_agent("bad\nagent").unwrap_err();
        ClientConfig::new().user_agent("my-bot/1.0").unwrap();
    }
}
