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

use std::time::Duration;

use matrix_client_base::sync::SyncResponse;
use matrix_client_events::enums::Presence;
use tracing::instrument;

use super::{Api, ApiRequest};
use crate::{config::SyncFilter, Result};

impl Api {
    /// Get the events since `since`, or a snapshot of the account without a
    /// token.
    ///
    /// `timeout` is how long the homeserver waits for new events before
    /// answering with an empty response. The request itself is given that
    /// long on top of the usual request timeout.
    ///
    /// `GET /sync`
    #[instrument(skip(self, filter))]
    pub async fn sync(
        &self,
        filter: Option<&SyncFilter>,
        since: Option<&str>,
        full_state: bool,
        set_presence: Option<&Presence>,
        timeout: Option<Duration>,
    ) -> Result<SyncResponse> {
        let filter = match filter {
            Some(SyncFilter::FilterId(id)) => Some(super::require(id, "filter_id")?.to_owned()),
            Some(SyncFilter::Definition(definition)) => Some(serde_json::to_string(definition)?),
            None => None,
        };

        let mut request = ApiRequest::get(&["sync"])
            .query_opt("filter", filter)
            .query_opt("since", since)
            .query_opt("set_presence", set_presence)
            .query_opt("timeout", timeout.map(|t| t.as_millis()));

        if full_state {
            request = request.query("full_state", true);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(self.request_timeout + timeout);
        }

        self.send(request).await
    }
}
