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

//! Error conditions of the event layer.

use thiserror::Error;

/// Result type of the event layer.
pub type Result<T, E = EventError> = std::result::Result<T, E>;

/// Errors that can happen while decoding or encoding an event.
#[derive(Debug, Error)]
pub enum EventError {
    /// A field which must be set before the event can be serialized is
    /// missing.
    #[error("`{event_type}` event is incomplete: `{field}` is not set")]
    Incomplete {
        /// The wire type of the event (or `msgtype` of the message).
        event_type: String,
        /// The name of the missing field.
        field: &'static str,
    },

    /// The JSON doesn't have the shape of an event at all.
    #[error("invalid event format: {0}")]
    InvalidFormat(String),

    /// A constructor was asked to decode an event of a different type.
    #[error("unexpected event type `{found}`, expected `{expected}`")]
    UnknownType {
        /// The type the constructor handles.
        expected: &'static str,
        /// The type found in the JSON.
        found: String,
    },

    /// The raw input couldn't be parsed as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EventError {
    pub(crate) fn incomplete(event_type: &str, field: &'static str) -> Self {
        Self::Incomplete { event_type: event_type.to_owned(), field }
    }

    /// Is this the error returned by a strict `to_json` with a required field
    /// unset?
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

/// Errors of the runtime type registries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The type string is already bound to a constructor.
    #[error("a handler for `{0}` is already registered")]
    AlreadyExists(String),

    /// No constructor is bound to the type string.
    #[error("no handler registered for `{0}`")]
    NotFound(String),
}
