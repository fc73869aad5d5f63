//! `MediaGateway` over `window.fetch`, plus the localStorage credential read.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use glancefin_core::credentials;
use glancefin_core::display::item_detail_path;
use glancefin_core::error::GlancefinError;
use glancefin_core::gateway::MediaGateway;
use glancefin_core::models::{ItemDetail, Session};

/// Fetch-backed gateway bound to one overlay open: the sessions URL from
/// config and the access token resolved at click time.
pub struct FetchGateway {
    now_playing_url: String,
    token: String,
}

impl FetchGateway {
    pub fn new(now_playing_url: String, token: String) -> Self {
        Self {
            now_playing_url,
            token,
        }
    }

    /// GET a URL and deserialize the JSON body. Non-2xx statuses become
    /// [`GlancefinError::Http`]; JS-level rejections become `Network`.
    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, GlancefinError> {
        let window =
            web_sys::window().ok_or_else(|| GlancefinError::Network("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| GlancefinError::Network("fetch returned a non-Response".into()))?;
        if !response.ok() {
            return Err(GlancefinError::Http(response.status()));
        }
        let body = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;
        let body = body.as_string().unwrap_or_default();
        Ok(serde_json::from_str(&body)?)
    }
}

impl MediaGateway for FetchGateway {
    type Error = GlancefinError;

    async fn sessions(&self) -> Result<Vec<Session>, Self::Error> {
        self.fetch_json(&self.now_playing_url).await
    }

    async fn item_detail(&self, id: &str) -> Result<ItemDetail, Self::Error> {
        self.fetch_json(&item_detail_path(id, &self.token)).await
    }
}

/// Read the web client's credential blob from localStorage, if present.
pub fn read_credential_blob() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok().flatten()?;
    storage.get_item(credentials::STORAGE_KEY).ok().flatten()
}

fn js_err(err: JsValue) -> GlancefinError {
    GlancefinError::Network(err.as_string().unwrap_or_else(|| "unknown js error".into()))
}
