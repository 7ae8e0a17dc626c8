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

use std::{fmt, io::Error as IoError, sync::Arc};

use as_variant::as_variant;
use http::StatusCode;
use matrix_client_events::EventError;
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

/// Result type of the matrix-client.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Result type of a pure HTTP request.
pub type HttpResult<T> = std::result::Result<T, HttpError>;

macro_rules! error_kinds {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => $errcode:literal,
        )*
    ) => {
        /// The symbolic kind of an error returned by the homeserver.
        ///
        /// Known `M_*` codes map to a variant of the same name; other codes are
        /// kept in [`ErrorKind::UnknownHomeserverError`].
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum ErrorKind {
            $(
                $(#[$meta])*
                $variant,
            )*
            /// An `errcode` we don't know about.
            UnknownHomeserverError(String),
            /// The homeserver returned an `error` without an `errcode`.
            Unspecified,
        }

        impl ErrorKind {
            /// Map an `errcode` to its kind.
            pub fn from_errcode(errcode: &str) -> Self {
                match errcode {
                    $( $errcode => Self::$variant, )*
                    _ => Self::UnknownHomeserverError(errcode.to_owned()),
                }
            }

            /// The `errcode` of this kind, if it has one.
            pub fn errcode(&self) -> Option<&str> {
                match self {
                    $( Self::$variant => Some($errcode), )*
                    Self::UnknownHomeserverError(errcode) => Some(errcode),
                    Self::Unspecified => None,
                }
            }
        }
    };
}

error_kinds! {
    /// The request is not allowed.
    Forbidden => "M_FORBIDDEN",
    /// The access token is unknown or was revoked.
    UnknownToken => "M_UNKNOWN_TOKEN",
    /// No access token was given.
    MissingToken => "M_MISSING_TOKEN",
    /// The request wasn't authorized.
    Unauthorized => "M_UNAUTHORIZED",
    /// The request body was malformed JSON.
    BadJson => "M_BAD_JSON",
    /// The request body wasn't JSON.
    NotJson => "M_NOT_JSON",
    /// No resource was found.
    NotFound => "M_NOT_FOUND",
    /// Too many requests were sent.
    LimitExceeded => "M_LIMIT_EXCEEDED",
    /// The endpoint isn't implemented by the homeserver.
    Unrecognized => "M_UNRECOGNIZED",
    /// An unknown error.
    Unknown => "M_UNKNOWN",
    /// The user id is already taken.
    UserInUse => "M_USER_IN_USE",
    /// The user id is invalid.
    InvalidUsername => "M_INVALID_USERNAME",
    /// The room alias is already taken.
    RoomInUse => "M_ROOM_IN_USE",
    /// The room is in a state that doesn't allow the request.
    InvalidRoomState => "M_INVALID_ROOM_STATE",
    /// The pagination parameters are invalid.
    BadPagination => "M_BAD_PAGINATION",
    /// A required parameter is missing.
    MissingParam => "M_MISSING_PARAM",
    /// A parameter has an invalid value.
    InvalidParam => "M_INVALID_PARAM",
    /// The request or upload is too large.
    TooLarge => "M_TOO_LARGE",
    /// The third party identifier is already in use.
    ThreepidInUse => "M_THREEPID_IN_USE",
    /// The third party identifier isn't bound to an account.
    ThreepidNotFound => "M_THREEPID_NOT_FOUND",
    /// Validating the third party identifier failed.
    ThreepidAuthFailed => "M_THREEPID_AUTH_FAILED",
    /// The homeserver doesn't allow this third party identifier.
    ThreepidDenied => "M_THREEPID_DENIED",
    /// Guests can't access the resource.
    GuestAccessForbidden => "M_GUEST_ACCESS_FORBIDDEN",
    /// The room version isn't supported by the homeserver.
    UnsupportedRoomVersion => "M_UNSUPPORTED_ROOM_VERSION",
    /// The client is too old for the homeserver.
    OldVersion => "M_OLD_VERSION",
}

impl ErrorKind {
    /// Whether the error means the access token isn't usable anymore.
    ///
    /// These errors put the sync loop into reauthentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Forbidden | Self::UnknownToken | Self::Unauthorized)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.errcode().unwrap_or("unspecified"))
    }
}

/// An error in the `errcode` + `error` format returned by the homeserver.
#[derive(Clone, Debug, Error)]
#[error("[{status}] {kind}: {message}")]
pub struct ApiError {
    /// The kind of the error.
    pub kind: ErrorKind,
    /// The human readable message, empty if the homeserver sent none.
    pub message: String,
    /// The status code of the response.
    pub status: StatusCode,
}

impl ApiError {
    /// Read the error envelope from a response body.
    ///
    /// Returns `None` if the body has neither an `errcode` nor an `error`.
    pub fn from_body(status: StatusCode, body: &serde_json::Value) -> Option<Self> {
        let errcode = body.get("errcode").and_then(serde_json::Value::as_str);
        let error = body.get("error").and_then(serde_json::Value::as_str);

        let kind = match (errcode, error) {
            (Some(errcode), _) => ErrorKind::from_errcode(errcode),
            (None, Some(_)) => ErrorKind::Unspecified,
            (None, None) => return None,
        };

        Some(Self { kind, message: error.unwrap_or_default().to_owned(), status })
    }
}

/// An HTTP error, representing either a connection error or an error while
/// converting the raw HTTP response into a Matrix response.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HttpError {
    /// Error at the HTTP layer.
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The request couldn't be built.
    #[error(transparent)]
    Http(#[from] http::Error),

    /// Queried endpoint requires authentication but was called on an
    /// anonymous client.
    #[error("the queried endpoint requires authentication but was called before logging in")]
    AuthenticationRequired,

    /// The homeserver answered with an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The homeserver answered with a non-success status and a body that
    /// isn't a Matrix error.
    #[error("the homeserver answered with status {0}")]
    Status(StatusCode),

    /// The response body couldn't be deserialized.
    #[error(transparent)]
    Json(#[from] JsonError),

    /// The request was cancelled before a response arrived.
    #[error("the request was aborted")]
    Aborted,
}

#[rustfmt::skip] // stop rustfmt breaking the `<code>` in docs across multiple lines
impl HttpError {
    /// If `self` is <code>[Api](Self::Api)(e)</code>, returns `Some(e)`.
    ///
    /// Otherwise, returns `None`.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        as_variant!(self, Self::Api)
    }

    /// Shorthand for
    /// <code>.[as_api_error](Self::as_api_error)().[map](Option::map)(|e| &e.kind)</code>.
    pub fn api_error_kind(&self) -> Option<&ErrorKind> {
        self.as_api_error().map(|e| &e.kind)
    }
}

/// Errors that can happen when refreshing an access token.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum RefreshTokenError {
    /// Tried to send a refresh token request without a refresh token.
    #[error("missing refresh token")]
    RefreshTokenRequired,

    /// The homeserver answered without a new access token.
    #[error("the homeserver didn't return a new access token")]
    NoAccessToken,

    /// The refresh request failed.
    #[error("the refresh request failed: {0}")]
    Request(Arc<Error>),
}

/// Internal representation of errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Error doing an HTTP request.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// An event couldn't be decoded or serialized.
    #[error(transparent)]
    Event(#[from] EventError),

    /// An error de/serializing type for the session file or a response.
    #[error(transparent)]
    SerdeJson(#[from] JsonError),

    /// An IO error happened.
    #[error(transparent)]
    Io(#[from] IoError),

    /// An error encountered when trying to parse a url.
    #[error(transparent)]
    Url(#[from] UrlParseError),

    /// A required argument was empty.
    #[error("the required parameter `{0}` is missing")]
    MissingParameter(&'static str),

    /// Two arguments conflict, or an argument has an unusable value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The client is in a state that doesn't allow the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Refreshing the access token failed.
    #[error(transparent)]
    RefreshToken(#[from] RefreshTokenError),
}

#[rustfmt::skip] // stop rustfmt breaking the `<code>` in docs across multiple lines
impl Error {
    /// If `self` is
    /// <code>[Http](Self::Http)([Api](HttpError::Api)(e))</code>,
    /// returns `Some(e)`.
    ///
    /// Otherwise, returns `None`.
    pub fn as_api_error(&self) -> Option<&ApiError> {
        as_variant!(self, Self::Http).and_then(HttpError::as_api_error)
    }

    /// If `self` is an error in the `errcode` + `error` format, returns its
    /// kind.
    pub fn api_error_kind(&self) -> Option<&ErrorKind> {
        self.as_api_error().map(|e| &e.kind)
    }

    /// Whether the homeserver rejected the access token.
    pub fn is_auth_error(&self) -> bool {
        self.api_error_kind().is_some_and(ErrorKind::is_auth_error)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn errcode_mapping() {
        assert_eq!(ErrorKind::from_errcode("M_UNKNOWN_TOKEN"), ErrorKind::UnknownToken);
        assert_eq!(ErrorKind::from_errcode("M_LIMIT_EXCEEDED"), ErrorKind::LimitExceeded);
        assert_eq!(
            ErrorKind::from_errcode("ORG_EXAMPLE_TEAPOT"),
            ErrorKind::UnknownHomeserverError("ORG_EXAMPLE_TEAPOT".to_owned())
        );
        assert_eq!(ErrorKind::NotFound.errcode(), Some("M_NOT_FOUND"));
    }

    #[test]
    fn envelope_without_errcode_is_unspecified() {
        let body = json!({ "error": "Something went wrong" });
        let error = ApiError::from_body(StatusCode::INTERNAL_SERVER_ERROR, &body).unwrap();

        assert_eq!(error.kind, ErrorKind::Unspecified);
        assert_eq!(error.message, "Something went wrong");
        assert!(ApiError::from_body(StatusCode::OK, &json!({ "event_id": "$1" })).is_none());
    }

    #[test]
    fn auth_errors() {
        let error = Error::Http(HttpError::Api(ApiError {
            kind: ErrorKind::UnknownToken,
            message: String::new(),
            status: StatusCode::UNAUTHORIZED,
        }));

        assert!(error.is_auth_error());
        assert!(!ErrorKind::NotFound.is_auth_error());
        assert!(!Error::MissingParameter("room_id").is_auth_error());
    }
}
