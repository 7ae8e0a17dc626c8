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

use std::{fmt, time::Duration};

use matrix_client_events::enums::Presence;

use crate::api::FilterDefinition;

pub(crate) const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// Token to be used in the next sync request.
#[derive(Clone, Default, Debug)]
pub enum SyncToken {
    /// Provide a specific token.
    Specific(String),
    /// Enforce no tokens at all.
    NoToken,
    /// Use a previous token if the client saw one in the past, and none
    /// otherwise.
    ///
    /// This is the default value.
    #[default]
    ReusePrevious,
}

impl<T> From<T> for SyncToken
where
    T: Into<String>,
{
    fn from(token: T) -> SyncToken {
        SyncToken::Specific(token.into())
    }
}

/// The filter applied to a sync, either uploaded beforehand or inline.
#[derive(Clone, Debug)]
pub enum SyncFilter {
    /// The id of a filter created with [`Api::create_filter`].
    ///
    /// [`Api::create_filter`]: crate::api::Api::create_filter
    FilterId(String),
    /// A filter definition sent along with the request.
    Definition(Box<FilterDefinition>),
}

impl From<FilterDefinition> for SyncFilter {
    fn from(definition: FilterDefinition) -> Self {
        Self::Definition(Box::new(definition))
    }
}

/// Settings for a sync call.
#[derive(Clone)]
pub struct SyncSettings {
    pub(crate) filter: Option<SyncFilter>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) ignore_timeout_on_first_sync: bool,
    pub(crate) token: SyncToken,
    pub(crate) full_state: bool,
    pub(crate) set_presence: Presence,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(tarpaulin_include))]
impl fmt::Debug for SyncSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            filter,
            timeout,
            ignore_timeout_on_first_sync,
            token: _,
            full_state,
            set_presence,
        } = self;
        f.debug_struct("SyncSettings")
            .field("filter", filter)
            .field("timeout", timeout)
            .field("ignore_timeout_on_first_sync", ignore_timeout_on_first_sync)
            .field("full_state", full_state)
            .field("set_presence", set_presence)
            .finish()
    }
}

impl SyncSettings {
    /// Create new default sync settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: None,
            timeout: Some(DEFAULT_SYNC_TIMEOUT),
            ignore_timeout_on_first_sync: true,
            token: SyncToken::default(),
            full_state: false,
            set_presence: Presence::Online,
        }
    }

    /// Set the sync token.
    ///
    /// # Arguments
    ///
    /// * `token` - The sync token that should be used for the sync call.
    #[must_use]
    pub fn token(mut self, token: impl Into<SyncToken>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the maximum time the server can wait before responding to the sync
    /// request.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The time the server is allowed to wait.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether to ignore the `timeout` the first time that the `/sync` endpoint
    /// is called by a polling run.
    ///
    /// The homeserver then replies immediately to the first request, whether
    /// there is new data or not. Enabled by default.
    ///
    /// This is ignored by [`Client::sync_once()`], because there is no loop
    /// happening.
    ///
    /// [`Client::sync_once()`]: crate::Client::sync_once
    #[must_use]
    pub fn ignore_timeout_on_first_sync(mut self, ignore: bool) -> Self {
        self.ignore_timeout_on_first_sync = ignore;
        self
    }

    /// Set the sync filter.
    /// It can be either the filter ID, or the definition for the filter.
    ///
    /// # Arguments
    ///
    /// * `filter` - The filter configuration that should be used for the sync
    ///   call.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<SyncFilter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Should the server return the full state from the start of the timeline.
    ///
    /// This does nothing if no sync token is set.
    #[must_use]
    pub fn full_state(mut self, full_state: bool) -> Self {
        self.full_state = full_state;
        self
    }

    /// Set the presence the server sets for the user while syncing.
    ///
    /// Defaults to [`Presence::Online`].
    #[must_use]
    pub fn set_presence(mut self, presence: Presence) -> Self {
        self.set_presence = presence;
        self
    }

    /// The long-poll timeout of a request, `first` being whether it's the
    /// first request of a polling run.
    pub(crate) fn poll_timeout(&self, first: bool) -> Option<Duration> {
        if first && self.ignore_timeout_on_first_sync {
            Some(Duration::ZERO)
        } else {
            self.timeout
        }
    }
}
