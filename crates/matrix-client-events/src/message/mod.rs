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

//! Messages, the content of `m.room.message` events.
//!
//! The concrete message type is selected by the `msgtype` field of the
//! content. Message types are resolved through the message registry of an
//! [`EventFactory`](crate::EventFactory), unknown ones decode to a
//! [`GenericMessage`].

use std::{any::Any, fmt};

use as_variant::as_variant;
use serde_json::Value as JsonValue;

use crate::{
    json::{require, set, FieldReader, JsonObject},
    EventError, Result,
};

mod file;
mod location;
mod media;
mod text;

pub use file::FileMessage;
pub use location::LocationMessage;
pub use media::{AudioMessage, ImageMessage, VideoMessage};
pub use text::{EmoteMessage, NoticeMessage, TextMessage};

/// A message, typed or not.
pub trait Message: fmt::Debug + Send + Sync {
    /// The `msgtype` of the message, e.g. `m.text`.
    fn msgtype(&self) -> &str;

    /// The fields every message has.
    fn fields(&self) -> &MessageFields;

    /// Serialize the message into the content of an `m.room.message` event.
    ///
    /// This fails with [`EventError::Incomplete`] if a field required by the
    /// message type isn't set.
    fn to_json(&self) -> Result<JsonObject>;
}

/// A message type with a fixed `msgtype`.
pub trait TypedMessage: Message + Sized {
    /// The `msgtype` of the message.
    const MSGTYPE: &'static str;

    /// Decode the message from the content of an `m.room.message` event.
    fn from_json(content: &JsonObject) -> Result<Self>;
}

/// A message type registered at runtime by the application.
pub trait CustomMessage: Message {
    /// Access the message as [`Any`] to downcast it to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Access the message through the [`Message`] interface.
    fn as_message(&self) -> &dyn Message;
}

impl<T: Message + 'static> CustomMessage for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_message(&self) -> &dyn Message {
        self
    }
}

/// Fields every message has.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageFields {
    /// The textual representation of the message, used as a fallback by
    /// clients that don't understand the message type.
    pub body: Option<String>,
    raw: JsonObject,
}

impl MessageFields {
    /// Fields with the given body.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self { body: Some(body.into()), raw: JsonObject::new() }
    }

    pub(crate) fn parse(content: &JsonObject, msgtype: &'static str) -> Result<Self> {
        match content.get("msgtype") {
            None => {}
            Some(JsonValue::String(found)) if found == msgtype => {}
            Some(JsonValue::String(found)) => {
                return Err(EventError::UnknownType { expected: msgtype, found: found.clone() })
            }
            Some(_) => {
                return Err(EventError::InvalidFormat("`msgtype` is not a string".to_owned()))
            }
        }

        let reader = FieldReader::new(content, msgtype);
        Ok(Self { body: reader.required_string("body"), raw: content.clone() })
    }

    /// The content the message was decoded from.
    pub fn raw(&self) -> &JsonObject {
        &self.raw
    }

    /// The raw content to write the message fields into.
    pub(crate) fn raw_content(&self) -> JsonObject {
        self.raw.clone()
    }

    pub(crate) fn write(&self, msgtype: &str, mut content: JsonObject) -> Result<JsonObject> {
        set(&mut content, "body", require(self.body.as_deref(), msgtype, "body")?);
        set(&mut content, "msgtype", msgtype);
        Ok(content)
    }
}

macro_rules! message_accessors {
    () => {
        fn msgtype(&self) -> &str {
            <Self as $crate::message::TypedMessage>::MSGTYPE
        }

        fn fields(&self) -> &$crate::message::MessageFields {
            &self.fields
        }
    };
}

pub(crate) use message_accessors;

/// A message with a `msgtype` nobody registered.
#[derive(Clone, Debug, PartialEq)]
pub struct GenericMessage {
    msgtype: String,
    /// The fields every message has.
    pub fields: MessageFields,
}

impl GenericMessage {
    pub(crate) fn from_json(content: &JsonObject) -> Result<Self> {
        let msgtype = content
            .get("msgtype")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| EventError::InvalidFormat("message has no `msgtype`".to_owned()))?
            .to_owned();
        let body = FieldReader::new(content, &msgtype).string("body");

        Ok(Self { msgtype, fields: MessageFields { body, raw: content.clone() } })
    }

    /// The full message content.
    pub fn content(&self) -> &JsonObject {
        &self.fields.raw
    }
}

impl Message for GenericMessage {
    fn msgtype(&self) -> &str {
        &self.msgtype
    }

    fn fields(&self) -> &MessageFields {
        &self.fields
    }

    fn to_json(&self) -> Result<JsonObject> {
        let mut content = self.fields.raw_content();
        set(&mut content, "msgtype", self.msgtype.as_str());
        crate::json::set_opt(&mut content, "body", self.fields.body.clone());
        Ok(content)
    }
}

/// Any message.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyMessage {
    /// `m.text`
    Text(TextMessage),
    /// `m.emote`
    Emote(EmoteMessage),
    /// `m.notice`
    Notice(NoticeMessage),
    /// `m.file`
    File(FileMessage),
    /// `m.image`
    Image(ImageMessage),
    /// `m.audio`
    Audio(AudioMessage),
    /// `m.video`
    Video(VideoMessage),
    /// `m.location`
    Location(LocationMessage),
    /// A message type registered by the application.
    Custom(Box<dyn CustomMessage>),
    /// A message type nobody registered.
    Generic(GenericMessage),
}

impl AnyMessage {
    /// Access the message through its object-safe interface.
    pub fn as_message(&self) -> &dyn Message {
        match self {
            Self::Text(m) => m,
            Self::Emote(m) => m,
            Self::Notice(m) => m,
            Self::File(m) => m,
            Self::Image(m) => m,
            Self::Audio(m) => m,
            Self::Video(m) => m,
            Self::Location(m) => m,
            Self::Custom(m) => m.as_message(),
            Self::Generic(m) => m,
        }
    }

    /// The `msgtype` of the message.
    pub fn msgtype(&self) -> &str {
        self.as_message().msgtype()
    }

    /// The fallback text of the message.
    pub fn body(&self) -> Option<&str> {
        self.as_message().fields().body.as_deref()
    }

    /// Serialize the message into event content.
    pub fn to_json(&self) -> Result<JsonObject> {
        self.as_message().to_json()
    }

    /// Downcast a custom message to its concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        as_variant!(self, Self::Custom)?.as_any().downcast_ref()
    }

    /// Get the `m.text` message, if this is one.
    pub fn as_text(&self) -> Option<&TextMessage> {
        as_variant!(self, Self::Text)
    }
}

macro_rules! impl_from_message {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyMessage {
                fn from(message: $ty) -> Self {
                    Self::$variant(message)
                }
            }
        )*
    };
}

impl_from_message! {
    Text(TextMessage),
    Emote(EmoteMessage),
    Notice(NoticeMessage),
    File(FileMessage),
    Image(ImageMessage),
    Audio(AudioMessage),
    Video(VideoMessage),
    Location(LocationMessage),
    Generic(GenericMessage),
}
