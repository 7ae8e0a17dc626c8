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

//! Helpers for reading and writing event JSON.
//!
//! Reading is lenient: a field with an unexpected JSON type is reported with
//! a warning and treated as absent. Writing is strict, see [`require`].

use serde_json::Value as JsonValue;
use tracing::warn;

use crate::{enums::StringEnum, EventError};

/// A JSON object, the unit every event and message is read from and written
/// to.
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Lenient reader over one JSON object of an event.
#[derive(Clone, Copy)]
pub(crate) struct FieldReader<'a> {
    object: &'a JsonObject,
    event_type: &'a str,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(object: &'a JsonObject, event_type: &'a str) -> Self {
        Self { object, event_type }
    }

    fn wrong_type(&self, field: &str, expected: &str) {
        warn!(event_type = self.event_type, field, "Ignoring field, expected {expected}");
    }

    fn get(&self, field: &str) -> Option<&'a JsonValue> {
        match self.object.get(field) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some(value),
        }
    }

    pub(crate) fn string(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            JsonValue::String(s) => Some(s.clone()),
            _ => {
                self.wrong_type(field, "a string");
                None
            }
        }
    }

    /// Like [`FieldReader::string`], but the field is expected to be present
    /// on every event received from a homeserver.
    pub(crate) fn required_string(&self, field: &str) -> Option<String> {
        let value = self.string(field);
        if value.is_none() {
            self.missing(field);
        }
        value
    }

    pub(crate) fn missing(&self, field: &str) {
        warn!(event_type = self.event_type, field, "Required field is missing");
    }

    pub(crate) fn i64(&self, field: &str) -> Option<i64> {
        let value = self.get(field)?;
        let int = value.as_i64();
        if int.is_none() {
            self.wrong_type(field, "an integer");
        }
        int
    }

    pub(crate) fn required_i64(&self, field: &str) -> Option<i64> {
        let value = self.i64(field);
        if value.is_none() {
            self.missing(field);
        }
        value
    }

    pub(crate) fn u64(&self, field: &str) -> Option<u64> {
        let value = self.get(field)?;
        let int = value.as_u64();
        if int.is_none() {
            self.wrong_type(field, "a non-negative integer");
        }
        int
    }

    pub(crate) fn f64(&self, field: &str) -> Option<f64> {
        let value = self.get(field)?;
        let float = value.as_f64();
        if float.is_none() {
            self.wrong_type(field, "a number");
        }
        float
    }

    pub(crate) fn bool(&self, field: &str) -> Option<bool> {
        let value = self.get(field)?;
        let b = value.as_bool();
        if b.is_none() {
            self.wrong_type(field, "a boolean");
        }
        b
    }

    pub(crate) fn object(&self, field: &str) -> Option<&'a JsonObject> {
        let value = self.get(field)?;
        let object = value.as_object();
        if object.is_none() {
            self.wrong_type(field, "an object");
        }
        object
    }

    pub(crate) fn array(&self, field: &str) -> Option<&'a Vec<JsonValue>> {
        let value = self.get(field)?;
        let array = value.as_array();
        if array.is_none() {
            self.wrong_type(field, "an array");
        }
        array
    }

    /// Reads an array of strings, skipping entries that aren't strings.
    pub(crate) fn string_list(&self, field: &str) -> Option<Vec<String>> {
        let array = self.array(field)?;
        let list = array
            .iter()
            .filter_map(|entry| {
                let s = entry.as_str();
                if s.is_none() {
                    self.wrong_type(field, "an array of strings");
                }
                s.map(ToOwned::to_owned)
            })
            .collect();
        Some(list)
    }

    /// Reads an object whose values are all integers.
    pub(crate) fn int_map(&self, field: &str) -> Option<std::collections::BTreeMap<String, i64>> {
        let object = self.object(field)?;
        let map = object
            .iter()
            .filter_map(|(key, value)| match value.as_i64() {
                Some(level) => Some((key.clone(), level)),
                None => {
                    warn!(event_type = self.event_type, field, key, "Ignoring non-integer entry");
                    None
                }
            })
            .collect();
        Some(map)
    }

    pub(crate) fn enum_value<E>(&self, field: &str) -> Option<E>
    where
        E: StringEnum + for<'s> From<&'s str>,
    {
        let raw = self.string(field)?;
        let value = E::from(raw.as_str());
        if !value.is_known() {
            warn!(event_type = self.event_type, field, value = raw, "Unknown enum value");
        }
        Some(value)
    }

    pub(crate) fn required_enum<E>(&self, field: &str) -> Option<E>
    where
        E: StringEnum + for<'s> From<&'s str>,
    {
        let value = self.enum_value(field);
        if value.is_none() {
            self.missing(field);
        }
        value
    }
}

/// Unwraps a field that must be set for serialization.
pub(crate) fn require<T>(
    value: Option<T>,
    event_type: &str,
    field: &'static str,
) -> Result<T, EventError> {
    value.ok_or_else(|| EventError::incomplete(event_type, field))
}

/// Inserts `value` under `key`, or removes the key if there's no value.
pub(crate) fn set_opt<T: Into<JsonValue>>(object: &mut JsonObject, key: &str, value: Option<T>) {
    match value {
        Some(value) => {
            object.insert(key.to_owned(), value.into());
        }
        None => {
            object.remove(key);
        }
    }
}

pub(crate) fn set<T: Into<JsonValue>>(object: &mut JsonObject, key: &str, value: T) {
    object.insert(key.to_owned(), value.into());
}

pub(crate) fn string_list(list: &[String]) -> JsonValue {
    JsonValue::Array(list.iter().cloned().map(JsonValue::String).collect())
}

pub(crate) fn int_map(map: &std::collections::BTreeMap<String, i64>) -> JsonValue {
    JsonValue::Object(map.iter().map(|(k, v)| (k.clone(), JsonValue::from(*v))).collect())
}

/// Turns an arbitrary JSON value into an object, or fails with
/// [`EventError::InvalidFormat`].
pub fn as_object<'a>(json: &'a JsonValue, what: &str) -> Result<&'a JsonObject, EventError> {
    json.as_object()
        .ok_or_else(|| EventError::InvalidFormat(format!("{what} is not a JSON object")))
}
