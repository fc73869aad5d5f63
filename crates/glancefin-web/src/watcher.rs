//! Header watcher: waits for the cast button, injects the trigger button
//! beside it, and re-arms after home-button navigation.
//!
//! Two states. SCANNING: a MutationObserver on the body (with a fixed
//! interval as fallback for changes the observer config misses) checks for a
//! visible anchor. IDLE: anchor found, trigger injected, machinery torn down.
//! The home-button hook re-enters SCANNING after a short settling delay; a
//! re-entry replaces the previous trigger button but reuses the overlay node.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, HtmlElement, MutationObserver, MutationObserverInit, Window};

use crate::app::SharedApp;
use crate::overlay::Overlay;

const ANCHOR_SELECTOR: &str = ".headerCastButton";
const HOME_SELECTOR: &str = ".headerHomeButton";

const SCAN_INTERVAL_MS: i32 = 1_000;
const HOME_RETRY_MS: i32 = 1_000;
/// Delay before rescanning after navigation, so the DOM can settle.
const RESCAN_DELAY_MS: i32 = 500;

/// Live scan machinery, dropped as a unit on the SCANNING→IDLE transition.
pub struct ScanHandles {
    observer: MutationObserver,
    interval_id: i32,
    _observer_cb: Closure<dyn FnMut()>,
    _interval_cb: Closure<dyn FnMut()>,
}

impl ScanHandles {
    fn teardown(self, window: &Window) {
        self.observer.disconnect();
        window.clear_interval_with_handle(self.interval_id);
    }
}

/// Enter SCANNING (tearing down any previous scan first). Injects
/// immediately when the anchor is already present and visible.
pub fn start_scanning(app: &SharedApp) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if let Some(handles) = app.borrow_mut().scan.take() {
        handles.teardown(&window);
    }
    if try_inject(app, &document)? {
        return Ok(());
    }

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let observer_app = app.clone();
    let observer_cb = Closure::<dyn FnMut()>::new(move || scan_tick(&observer_app));
    let observer = MutationObserver::new(observer_cb.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    options.set_attributes(true);
    observer.observe_with_options(&body, &options)?;

    let interval_app = app.clone();
    let interval_cb = Closure::<dyn FnMut()>::new(move || scan_tick(&interval_app));
    let interval_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        interval_cb.as_ref().unchecked_ref(),
        SCAN_INTERVAL_MS,
    )?;

    app.borrow_mut().scan = Some(ScanHandles {
        observer,
        interval_id,
        _observer_cb: observer_cb,
        _interval_cb: interval_cb,
    });
    Ok(())
}

/// One SCANNING check; transitions to IDLE on success.
fn scan_tick(app: &SharedApp) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    match try_inject(app, &document) {
        Ok(true) => {
            if let Some(handles) = app.borrow_mut().scan.take() {
                handles.teardown(&window);
            }
        }
        Ok(false) => {}
        Err(err) => console::error_1(&err),
    }
}

/// Inject the trigger button when the anchor exists and is laid out
/// (non-null offsetParent). Returns whether injection happened.
fn try_inject(app: &SharedApp, document: &Document) -> Result<bool, JsValue> {
    let Some(anchor) = document.query_selector(ANCHOR_SELECTOR)? else {
        return Ok(false);
    };
    let Ok(anchor) = anchor.dyn_into::<HtmlElement>() else {
        return Ok(false);
    };
    if anchor.offset_parent().is_none() {
        return Ok(false);
    }
    inject_trigger(app, document, &anchor)?;
    Ok(true)
}

/// Create the trigger button next to the anchor. The previous trigger (if
/// any) is removed first; the overlay node is created once and reused.
fn inject_trigger(
    app: &SharedApp,
    document: &Document,
    anchor: &HtmlElement,
) -> Result<(), JsValue> {
    let mut state = app.borrow_mut();

    if let Some(old) = state.trigger.take() {
        old.remove();
    }

    let button: HtmlElement = document.create_element("button")?.dyn_into()?;
    button.set_attribute("is", "paper-icon-button-light")?;
    button.set_class_name(
        "headerNowPlayingButton headerButton headerButtonRight paper-icon-button-light",
    );
    button.set_title("Now Playing");
    button.set_inner_html("<span class=\"material-icons play_arrow\" aria-hidden=\"true\"></span>");
    let _ = button.style().set_property("background-color", "#00ff0000");

    // Size 1.2x the anchor so the icon reads at a glance.
    if let Some(window) = web_sys::window() {
        if let Ok(Some(style)) = window.get_computed_style(anchor) {
            for dimension in ["width", "height"] {
                if let Some(scaled) = style
                    .get_property_value(dimension)
                    .ok()
                    .as_deref()
                    .and_then(scale_px)
                {
                    let _ = button.style().set_property(dimension, &scaled);
                }
            }
        }
    }

    let parent = anchor
        .parent_node()
        .ok_or_else(|| JsValue::from_str("anchor has no parent"))?;
    parent.insert_before(&button, Some(anchor.unchecked_ref()))?;

    if state.overlay.is_none() {
        state.overlay = Some(Overlay::create(document)?);
    }

    let click_app = app.clone();
    let on_click = Closure::<dyn FnMut()>::new(move || {
        let app = click_app.clone();
        wasm_bindgen_futures::spawn_local(async move {
            crate::app::open_overlay(app).await;
        });
    });
    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

    state.trigger = Some(button);
    // Replacing the stored closure drops the old button's listener with it.
    state.trigger_click = Some(on_click);
    Ok(())
}

/// Scale a computed "Npx" value by 1.2.
fn scale_px(value: &str) -> Option<String> {
    let pixels: f64 = value.strip_suffix("px")?.trim().parse().ok()?;
    Some(format!("{}px", pixels * 1.2))
}

/// Wait for the home button and hook its clicks to re-enter SCANNING.
/// Re-queues itself until the button appears.
pub fn install_home_hook(app: SharedApp) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    match document.query_selector(HOME_SELECTOR) {
        Ok(Some(home)) => {
            let click_app = app.clone();
            let on_click = Closure::<dyn FnMut()>::new(move || {
                let app = click_app.clone();
                let rescan = Closure::once_into_js(move || {
                    if let Err(err) = start_scanning(&app) {
                        console::error_1(&err);
                    }
                });
                if let Some(window) = web_sys::window() {
                    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                        rescan.unchecked_ref(),
                        RESCAN_DELAY_MS,
                    );
                }
            });
            let _ = home.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            // The hook outlives this call by design.
            on_click.forget();
        }
        _ => {
            let retry = Closure::once_into_js(move || install_home_hook(app));
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                retry.unchecked_ref(),
                HOME_RETRY_MS,
            );
        }
    }
}
