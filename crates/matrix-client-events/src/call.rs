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

//! VoIP call signalling events.

use serde_json::Value as JsonValue;

use crate::{
    common::{content_of, event_accessors, raw_content},
    enums::{CallHangupReason, CallOfferType},
    json::{require, set, set_opt, FieldReader, JsonObject},
    Event, Result, RoomEventFields, TypedEvent,
};

/// A WebRTC session description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionDescription {
    /// Whether this is an offer or an answer.
    pub kind: CallOfferType,
    /// The SDP text.
    pub sdp: String,
}

impl SessionDescription {
    fn parse(object: &JsonObject, event_type: &str) -> Option<Self> {
        let reader = FieldReader::new(object, event_type);
        Some(Self { kind: reader.required_enum("type")?, sdp: reader.required_string("sdp")? })
    }

    fn to_json(&self) -> JsonValue {
        serde_json::json!({ "type": self.kind.as_str(), "sdp": self.sdp })
    }
}

/// An ICE candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallCandidate {
    /// The SDP media type the candidate is for.
    pub sdp_mid: Option<String>,
    /// The index of the SDP media line the candidate is for.
    pub sdp_m_line_index: Option<u64>,
    /// The SDP `a` line of the candidate.
    pub candidate: String,
}

/// Reads the fields every call event has.
fn call_fields(reader: &FieldReader<'_>) -> (Option<String>, Option<i64>) {
    (reader.required_string("call_id"), reader.i64("version"))
}

fn write_call_fields(content: &mut JsonObject, call_id: &str, version: Option<i64>) {
    set(content, "call_id", call_id);
    set(content, "version", version.unwrap_or(0));
}

/// An invitation to a call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallInviteEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// Identifies the call. Required.
    pub call_id: Option<String>,
    /// The version of the signalling protocol, 0 if absent.
    pub version: Option<i64>,
    /// Milliseconds after which the invite is no longer valid. Required.
    pub lifetime: Option<u64>,
    /// The session description offer. Required.
    pub offer: Option<SessionDescription>,
}

impl Event for CallInviteEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let call_id = require(self.call_id.as_deref(), Self::EVENT_TYPE, "call_id")?;
        let lifetime = require(self.lifetime, Self::EVENT_TYPE, "lifetime")?;
        let offer = require(self.offer.as_ref(), Self::EVENT_TYPE, "offer")?;

        let mut content = raw_content(self.fields());
        write_call_fields(&mut content, call_id, self.version);
        set(&mut content, "lifetime", lifetime);
        set(&mut content, "offer", offer.to_json());

        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for CallInviteEvent {
    const EVENT_TYPE: &'static str = "m.call.invite";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let (call_id, version) = call_fields(&reader);

        Ok(Self {
            call_id,
            version,
            lifetime: reader.u64("lifetime"),
            offer: reader
                .object("offer")
                .and_then(|o| SessionDescription::parse(o, Self::EVENT_TYPE)),
            room: RoomEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

/// ICE candidates for a call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallCandidatesEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// Identifies the call. Required.
    pub call_id: Option<String>,
    /// The version of the signalling protocol, 0 if absent.
    pub version: Option<i64>,
    /// The candidates. At least one is required.
    pub candidates: Vec<CallCandidate>,
}

impl Event for CallCandidatesEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let call_id = require(self.call_id.as_deref(), Self::EVENT_TYPE, "call_id")?;
        if self.candidates.is_empty() {
            return Err(crate::EventError::incomplete(Self::EVENT_TYPE, "candidates"));
        }

        let candidates: Vec<JsonValue> = self
            .candidates
            .iter()
            .map(|c| {
                let mut object = JsonObject::new();
                set(&mut object, "candidate", c.candidate.as_str());
                set_opt(&mut object, "sdpMid", c.sdp_mid.clone());
                set_opt(&mut object, "sdpMLineIndex", c.sdp_m_line_index);
                JsonValue::Object(object)
            })
            .collect();

        let mut content = raw_content(self.fields());
        write_call_fields(&mut content, call_id, self.version);
        set(&mut content, "candidates", candidates);

        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for CallCandidatesEvent {
    const EVENT_TYPE: &'static str = "m.call.candidates";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let (call_id, version) = call_fields(&reader);
        let candidates = reader
            .array("candidates")
            .map(|list| {
                list.iter()
                    .filter_map(JsonValue::as_object)
                    .filter_map(|c| {
                        let c = FieldReader::new(c, Self::EVENT_TYPE);
                        Some(CallCandidate {
                            sdp_mid: c.string("sdpMid"),
                            sdp_m_line_index: c.u64("sdpMLineIndex"),
                            candidate: c.string("candidate")?,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let room = RoomEventFields::parse(json, Self::EVENT_TYPE);
        Ok(Self { call_id, version, candidates, room })
    }
}

/// The answer to a call invitation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallAnswerEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// Identifies the call. Required.
    pub call_id: Option<String>,
    /// The version of the signalling protocol, 0 if absent.
    pub version: Option<i64>,
    /// The session description answer. Required.
    pub answer: Option<SessionDescription>,
}

impl Event for CallAnswerEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let call_id = require(self.call_id.as_deref(), Self::EVENT_TYPE, "call_id")?;
        let answer = require(self.answer.as_ref(), Self::EVENT_TYPE, "answer")?;

        let mut content = raw_content(self.fields());
        write_call_fields(&mut content, call_id, self.version);
        set(&mut content, "answer", answer.to_json());

        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for CallAnswerEvent {
    const EVENT_TYPE: &'static str = "m.call.answer";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let (call_id, version) = call_fields(&reader);

        Ok(Self {
            call_id,
            version,
            answer: reader
                .object("answer")
                .and_then(|a| SessionDescription::parse(a, Self::EVENT_TYPE)),
            room: RoomEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

/// The end of a call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallHangupEvent {
    /// Fields of room events.
    pub room: RoomEventFields,
    /// Identifies the call. Required.
    pub call_id: Option<String>,
    /// The version of the signalling protocol, 0 if absent.
    pub version: Option<i64>,
    /// Why the call ended, unset for a normal hangup.
    pub reason: Option<CallHangupReason>,
}

impl Event for CallHangupEvent {
    event_accessors!(room);

    fn to_json(&self) -> Result<JsonObject> {
        let call_id = require(self.call_id.as_deref(), Self::EVENT_TYPE, "call_id")?;

        let mut content = raw_content(self.fields());
        write_call_fields(&mut content, call_id, self.version);
        set_opt(&mut content, "reason", self.reason.as_ref());

        Ok(self.room.write(Self::EVENT_TYPE, content))
    }
}

impl TypedEvent for CallHangupEvent {
    const EVENT_TYPE: &'static str = "m.call.hangup";

    fn from_json(json: &JsonObject) -> Result<Self> {
        let content = content_of(json, Self::EVENT_TYPE)?;
        let reader = FieldReader::new(content, Self::EVENT_TYPE);
        let (call_id, version) = call_fields(&reader);

        Ok(Self {
            call_id,
            version,
            reason: reader.enum_value("reason"),
            room: RoomEventFields::parse(json, Self::EVENT_TYPE),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::EventError;

    #[test]
    fn invite() {
        let json = json!({
            "type": "m.call.invite",
            "event_id": "$143273582443PhrSn:example.org",
            "sender": "@example:example.org",
            "room_id": "!jEsUZKDJdhlrceRyVU:example.org",
            "content": {
                "call_id": "12345",
                "lifetime": 60000,
                "offer": {
                    "sdp": "v=0\r\no=- 6584580628695956864 2 IN IP4 127.0.0.1[...]",
                    "type": "offer"
                },
                "version": 0
            }
        });
        let event = CallInviteEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.offer.as_ref().unwrap().kind, CallOfferType::Offer);
        assert_eq!(event.lifetime, Some(60000));
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());
    }

    #[test]
    fn candidates() {
        let json = json!({
            "type": "m.call.candidates",
            "content": {
                "call_id": "12345",
                "version": 0,
                "candidates": [{
                    "candidate": "candidate:863018703 1 udp 2122260223 10.9.64.156 43670 typ host generation 0",
                    "sdpMLineIndex": 0,
                    "sdpMid": "audio"
                }]
            }
        });
        let event = CallCandidatesEvent::from_json(json.as_object().unwrap()).unwrap();

        assert_eq!(event.candidates[0].sdp_mid.as_deref(), Some("audio"));
        assert_eq!(event.to_json().unwrap(), *json.as_object().unwrap());

        let empty = CallCandidatesEvent { call_id: Some("12345".to_owned()), ..Default::default() };
        assert_matches!(empty.to_json(), Err(EventError::Incomplete { field: "candidates", .. }));
    }

    #[test]
    fn answer_requires_an_answer() {
        let event = CallAnswerEvent { call_id: Some("12345".to_owned()), ..Default::default() };
        assert_matches!(event.to_json(), Err(EventError::Incomplete { field: "answer", .. }));
    }

    #[test]
    fn hangup() {
        let event = CallHangupEvent {
            call_id: Some("12345".to_owned()),
            reason: Some(CallHangupReason::InviteTimeout),
            ..Default::default()
        };
        let json = event.to_json().unwrap();
        assert_eq!(
            json["content"],
            json!({ "call_id": "12345", "version": 0, "reason": "invite_timeout" })
        );

        let parsed = CallHangupEvent::from_json(&json).unwrap();
        assert_eq!(parsed.reason, Some(CallHangupReason::InviteTimeout));
    }
}
