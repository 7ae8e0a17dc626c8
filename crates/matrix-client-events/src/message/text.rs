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

//! Text-like messages: `m.text`, `m.emote` and `m.notice`.

use super::{message_accessors, Message, MessageFields, TypedMessage};
use crate::{
    json::{set_opt, FieldReader, JsonObject},
    Result,
};

macro_rules! text_message {
    ($(#[$meta:meta])* $name:ident => $msgtype:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            /// The fields every message has.
            pub fields: MessageFields,
            /// The format of `formatted_body`, `org.matrix.custom.html` for
            /// HTML.
            pub format: Option<String>,
            /// The formatted version of the body.
            pub formatted_body: Option<String>,
        }

        impl $name {
            /// A plain text message.
            pub fn plain(body: impl Into<String>) -> Self {
                Self { fields: MessageFields::with_body(body), ..Default::default() }
            }

            /// A message with an HTML formatted body.
            pub fn html(body: impl Into<String>, html_body: impl Into<String>) -> Self {
                Self {
                    fields: MessageFields::with_body(body),
                    format: Some(HTML_FORMAT.to_owned()),
                    formatted_body: Some(html_body.into()),
                }
            }
        }

        impl Message for $name {
            message_accessors!();

            fn to_json(&self) -> Result<JsonObject> {
                let mut content = self.fields.raw_content();
                set_opt(&mut content, "format", self.format.clone());
                set_opt(&mut content, "formatted_body", self.formatted_body.clone());
                self.fields.write(Self::MSGTYPE, content)
            }
        }

        impl TypedMessage for $name {
            const MSGTYPE: &'static str = $msgtype;

            fn from_json(content: &JsonObject) -> Result<Self> {
                let reader = FieldReader::new(content, Self::MSGTYPE);
                let format = reader.string("format");
                let formatted_body = reader.string("formatted_body");

                let fields = MessageFields::parse(content, Self::MSGTYPE)?;
                Ok(Self { fields, format, formatted_body })
            }
        }
    };
}

/// The `format` of an HTML formatted body.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

text_message! {
    /// A plain text message.
    TextMessage => "m.text"
}

text_message! {
    /// An action, like `/me` on IRC.
    EmoteMessage => "m.emote"
}

text_message! {
    /// A message sent by a bot, clients shouldn't reply to it automatically.
    NoticeMessage => "m.notice"
}
