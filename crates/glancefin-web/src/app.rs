//! The app instance: one object owns the config, the overlay node, and the
//! injected trigger button, shared into event closures as `Rc<RefCell<_>>`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{console, Document};

use glancefin_core::config::OverlayConfig;
use glancefin_core::credentials;
use glancefin_core::display::{LOAD_FAILED_MESSAGE, NO_TOKEN_MESSAGE};
use glancefin_core::enrich::Enricher;
use glancefin_core::gateway::MediaGateway;

use crate::fetch::{read_credential_blob, FetchGateway};
use crate::overlay::Overlay;
use crate::watcher::{self, ScanHandles};

/// All mutable state of one overlay installation.
pub struct App {
    pub config: OverlayConfig,
    /// Created on first injection, then reused across re-arms.
    pub overlay: Option<Overlay>,
    /// The injected trigger button; replaced on every re-injection.
    pub trigger: Option<web_sys::HtmlElement>,
    /// Keeps the current trigger's click listener alive.
    pub trigger_click: Option<Closure<dyn FnMut()>>,
    /// Present while SCANNING, absent while IDLE.
    pub scan: Option<ScanHandles>,
}

pub type SharedApp = Rc<RefCell<App>>;

/// Parse options, create the instance, and start watching the header.
pub fn boot(options: JsValue) -> Result<(), JsValue> {
    let config: OverlayConfig = if options.is_undefined() || options.is_null() {
        OverlayConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|err| JsValue::from_str(&format!("invalid glancefin options: {err}")))?
    };

    let app: SharedApp = Rc::new(RefCell::new(App {
        config,
        overlay: None,
        trigger: None,
        trigger_click: None,
        scan: None,
    }));

    watcher::start_scanning(&app)?;
    watcher::install_home_hook(app);
    Ok(())
}

/// The trigger-button click sequence: token, session list, enrichment,
/// render. Every failure path still shows the overlay with a message, and
/// the trigger stays clickable for a retry.
pub async fn open_overlay(app: SharedApp) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = app.borrow().config.clone();

    let Some(token) = credentials::access_token(read_credential_blob().as_deref()) else {
        show_error(&app, &document, NO_TOKEN_MESSAGE);
        return;
    };

    let gateway = FetchGateway::new(config.now_playing_url.clone(), token.clone());
    let sessions = match gateway.sessions().await {
        Ok(sessions) => sessions,
        Err(err) => {
            console::error_1(&JsValue::from_str(&format!(
                "glancefin: session fetch failed: {err}"
            )));
            show_error(&app, &document, LOAD_FAILED_MESSAGE);
            return;
        }
    };

    let records = Enricher::new(&gateway, &token)
        .enrich_sessions(sessions)
        .await;

    let mut state = app.borrow_mut();
    let show_user_names = state.config.show_user_names;
    if let Some(overlay) = state.overlay.as_mut() {
        if let Err(err) = overlay.render(&document, &records, show_user_names) {
            console::error_1(&err);
        }
        overlay.show();
    }
}

fn show_error(app: &SharedApp, document: &Document, message: &str) {
    let mut state = app.borrow_mut();
    if let Some(overlay) = state.overlay.as_mut() {
        if let Err(err) = overlay.show_error(document, message) {
            console::error_1(&err);
        }
        overlay.show();
    }
}
