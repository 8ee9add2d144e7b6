//! `fetch`-backed [`HttpClient`] for the speech endpoint.
//!
//! The playback core sends a single kind of request: a JSON `POST` carrying
//! a bearer token, answered with an audio body. Only the headers that
//! request needs are forwarded, and `Content-Type` is the only response
//! header copied back.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse},
};
use bytes::Bytes;
use futures::future::{self, Either};
use gloo_timers::future::TimeoutFuture;
use js_sys::Uint8Array;
use std::collections::HashMap;
use std::pin::pin;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, RequestMode, Response, Window};

use crate::error::{js_error, window};

const FORWARDED_HEADERS: [&str; 2] = ["Authorization", "Content-Type"];

#[derive(Clone)]
pub struct FetchHttpClient {
    window: Window,
}

impl FetchHttpClient {
    pub fn new() -> BridgeResult<Self> {
        Ok(Self { window: window()? })
    }

    fn speech_request(request: &HttpRequest, controller: &AbortController) -> BridgeResult<Request> {
        let headers = Headers::new().map_err(|err| js_error("new Headers", err))?;
        for name in FORWARDED_HEADERS {
            if let Some(value) = request.headers.get(name) {
                headers
                    .set(name, value)
                    .map_err(|err| js_error("Headers.set", err))?;
            }
        }

        let init = RequestInit::new();
        init.set_method("POST");
        init.set_mode(RequestMode::Cors);
        init.set_headers(&headers);
        init.set_signal(Some(&controller.signal()));
        if let Some(body) = &request.body {
            init.set_body(&Uint8Array::from(body.as_ref()).into());
        }

        Request::new_with_str_and_init(&request.url, &init)
            .map_err(|err| js_error("new Request", err))
    }

    /// Resolve the fetch, aborting it once `timeout_ms` elapses.
    async fn send(
        &self,
        request: &Request,
        controller: &AbortController,
        timeout_ms: Option<u32>,
    ) -> BridgeResult<Response> {
        let fetch = JsFuture::from(self.window.fetch_with_request(request));
        let settled = match timeout_ms {
            None => fetch.await,
            Some(ms) => match future::select(pin!(fetch), pin!(TimeoutFuture::new(ms))).await {
                Either::Left((settled, _)) => settled,
                Either::Right(((), _)) => {
                    controller.abort();
                    return Err(BridgeError::OperationFailed(format!(
                        "speech request timed out after {} ms",
                        ms
                    )));
                }
            },
        };

        settled
            .map_err(|err| js_error("fetch", err))?
            .dyn_into::<Response>()
            .map_err(|_| BridgeError::OperationFailed("fetch resolved to a non-Response".into()))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        if request.method != HttpMethod::Post {
            return Err(BridgeError::NotAvailable(format!(
                "fetch client only sends POST, got {:?}",
                request.method
            )));
        }

        let controller =
            AbortController::new().map_err(|err| js_error("new AbortController", err))?;
        let fetch_request = Self::speech_request(&request, &controller)?;
        let timeout_ms = request
            .timeout
            .map(|timeout| timeout.as_millis().min(u32::MAX as u128) as u32);
        let response = self.send(&fetch_request, &controller, timeout_ms).await?;

        let buffer = JsFuture::from(
            response
                .array_buffer()
                .map_err(|err| js_error("Response.arrayBuffer", err))?,
        )
        .await
        .map_err(|err| js_error("Response.arrayBuffer", err))?;
        let body = Bytes::from(Uint8Array::new(&buffer).to_vec());

        let mut headers = HashMap::new();
        if let Ok(Some(content_type)) = response.headers().get("content-type") {
            headers.insert("Content-Type".to_string(), content_type);
        }

        debug!(url = %request.url, status = response.status(), bytes = body.len(), "Speech fetch completed");
        Ok(HttpResponse {
            status: response.status(),
            headers,
            body,
        })
    }
}
