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

#![doc = include_str!("../README.md")]
#![warn(missing_docs, missing_debug_implementations)]

pub use matrix_client_base::{
    self as base, async_trait, BaseClient, EventEmitter, PowerLevels, Profile, Room, RoomMember,
    RoomState,
};
pub use matrix_client_events as events;
pub use reqwest;

pub mod api;
mod client;
pub mod config;
mod error;
pub mod http_client;
mod session;

pub use client::{Client, PollingNotice, PollingState};
pub use error::{ApiError, Error, ErrorKind, HttpError, HttpResult, RefreshTokenError, Result};
pub use http_client::{ReqwestTransport, Transport};
pub use session::SessionFile;

#[cfg(test)]
matrix_client_test::init_tracing_for_tests!();
