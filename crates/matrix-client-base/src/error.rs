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

//! Error conditions.

use matrix_client_events::EventError;
use thiserror::Error;

/// Result type of the base client.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Internal representation of errors.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// An event couldn't be decoded.
    #[error(transparent)]
    Event(#[from] EventError),

    /// A sync response or event wasn't valid JSON of the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The operation needs a logged in user.
    #[error("the client isn't logged in")]
    NotLoggedIn,
}
