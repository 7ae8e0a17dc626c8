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

mod any;
pub mod call;
mod common;
pub mod enums;
mod ephemeral;
mod error;
mod factory;
pub mod info;
mod json;
pub mod message;
mod registry;
pub mod room;

pub use any::{AnyEvent, CustomEvent, GenericEvent};
pub use common::{Event, EventFields, RoomEventFields, StateEventFields, TypedEvent};
pub use ephemeral::{PresenceEvent, Receipt, ReceiptEvent, TagEvent, TagInfo, TypingEvent};
pub use error::{EventError, RegistryError, Result};
pub use factory::{EventConstructor, EventFactory, MessageConstructor};
pub use json::{as_object, JsonObject};
pub use registry::TypeRegistry;
pub use serde_json::Value as JsonValue;
