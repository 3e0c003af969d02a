//! `Fetch` over `window.fetch`, with `AbortController` timeouts.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::js_error;
use crate::fetch::{Fetch, FetchError, Request, Response};

#[derive(Debug, Clone)]
pub struct WebFetcher {
    window: web_sys::Window,
}

impl WebFetcher {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    async fn send(
        &self,
        request: &Request,
        signal: Option<&web_sys::AbortSignal>,
    ) -> Result<Response, JsValue> {
        let init = web_sys::RequestInit::new();
        init.set_method("GET");
        init.set_signal(signal);

        let js_request = web_sys::Request::new_with_str_and_init(request.url.as_str(), &init)?;
        for (name, value) in &request.headers {
            js_request.headers().set(name, value)?;
        }

        let response: web_sys::Response = JsFuture::from(self.window.fetch_with_request(&js_request))
            .await?
            .dyn_into()?;
        let body = JsFuture::from(response.text()?).await?;
        Ok(Response::new(response.status(), body.as_string().unwrap_or_default()))
    }
}

impl Fetch for WebFetcher {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        let network = |err: JsValue| FetchError::Network {
            url: request.url.clone(),
            message: js_error(&err),
        };

        let Some(timeout) = request.timeout else {
            return self.send(&request, None).await.map_err(network);
        };

        let controller = web_sys::AbortController::new().map_err(network)?;
        let timed_out = Rc::new(Cell::new(false));
        let on_timeout = {
            let controller = controller.clone();
            let timed_out = timed_out.clone();
            Closure::<dyn FnMut()>::new(move || {
                timed_out.set(true);
                controller.abort();
            })
        };
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                on_timeout.as_ref().unchecked_ref(),
                millis,
            )
            .map_err(network)?;

        let result = self.send(&request, Some(&controller.signal())).await;
        self.window.clear_timeout_with_handle(handle);
        drop(on_timeout);

        match result {
            Ok(response) => Ok(response),
            Err(_) if timed_out.get() => Err(FetchError::Timeout {
                url: request.url.clone(),
                timeout,
            }),
            Err(err) => Err(network(err)),
        }
    }
}
