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

//! The transport the [`Api`](crate::api::Api) sends its requests through.

use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderValue;
use tracing::{debug, field::debug, instrument, trace};

use crate::{config::ClientConfig, HttpError, HttpResult};

/// Abstraction around the http layer.
///
/// Any type implementing this can be handed to
/// [`Client::with_transport`](crate::Client::with_transport) to send the
/// requests, e.g. to route them through an application's own HTTP stack.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Send an `http::Request` and get back an `http::Response`.
    ///
    /// `timeout` is the time the whole request may take.
    ///
    /// Non-success statuses are not errors at this level, the response is
    /// returned as is.
    async fn send_request(
        &self,
        request: http::Request<Bytes>,
        timeout: Duration,
    ) -> HttpResult<http::Response<Bytes>>;
}

/// The default [`Transport`], backed by `reqwest`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    next_request_id: Arc<AtomicU64>,
}

impl ReqwestTransport {
    /// Build a transport with the specified configuration.
    pub fn with_config(config: &ClientConfig) -> HttpResult<Self> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        if !config.validate_certificate {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(proxy.clone());
        }

        let user_agent = match &config.user_agent {
            Some(user_agent) => user_agent.clone(),
            None => HeaderValue::from_static(concat!("matrix-client ", env!("CARGO_PKG_VERSION"))),
        };

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        Ok(Self {
            inner: builder.default_headers(headers).build()?,
            next_request_id: Arc::new(AtomicU64::new(0)),
        })
    }

    fn get_request_id(&self) -> String {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        format!("REQ-{request_id}")
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method, path, request_id, status))]
    async fn send_request(
        &self,
        request: http::Request<Bytes>,
        timeout: Duration,
    ) -> HttpResult<http::Response<Bytes>> {
        let span = tracing::Span::current();
        // Only the path is recorded, the query carries the access token.
        span.record("method", debug(request.method()))
            .record("path", request.uri().path())
            .record("request_id", self.get_request_id());

        debug!("Sending request");

        let mut request = reqwest::Request::try_from(request)?;
        *request.timeout_mut() = Some(timeout);

        let response = match self.inner.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Error while sending request: {e:?}");
                return Err(e.into());
            }
        };

        span.record("status", response.status().as_u16());
        trace!("Got response");

        response_to_http_response(response).await
    }
}

async fn response_to_http_response(
    mut response: reqwest::Response,
) -> HttpResult<http::Response<Bytes>> {
    let status = response.status();

    let mut http_builder = http::Response::builder().status(status);
    if let Some(headers) = http_builder.headers_mut() {
        for (k, v) in response.headers_mut().drain() {
            if let Some(key) = k {
                headers.insert(key, v);
            }
        }
    }

    let body = response.bytes().await?;

    Ok(http_builder.body(body)?)
}
