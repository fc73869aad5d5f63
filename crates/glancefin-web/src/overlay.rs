//! The overlay panel: singleton node, card list, error and empty states.
//!
//! The panel is created once per [`crate::app::App`] and appended to the
//! document body; every open rebuilds its children (heading, close control,
//! list) from the enriched records.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use glancefin_core::display::{DisplayRecord, TitleBlock, EMPTY_STATE};

const PANEL_STYLE: &str = "display: none; position: fixed; top: 5px; left: 5px; \
    width: calc(100% - 10px); height: calc(100% - 10px); background: rgba(0,0,0,0.8); \
    z-index: 1000; color: white; padding: 20px; overflow-y: auto; \
    border: 5px solid #333; box-sizing: border-box;";

const CLOSE_STYLE: &str = "position: absolute; top: 10px; right: 10px; background: #ff4444; \
    color: white; border: none; border-radius: 50%; width: 30px; height: 30px; \
    display: flex; align-items: center; justify-content: center; cursor: pointer;";

const CARD_STYLE: &str = "background: #222; padding: 15px; border-radius: 8px; \
    box-shadow: 0 2px 4px rgba(0,0,0,0.3); display: flex; align-items: center; \
    justify-content: space-between;";

const LINK_STYLE: &str = "display: flex; align-items: center; justify-content: space-between; \
    text-decoration: none; color: inherit; width: 100%;";

const PRIMARY_TITLE_STYLE: &str = "margin: 0; color: #00ff00; font-size: 1.2em;";
const SEASON_LINE_STYLE: &str = "margin: 2px 0; color: #ccc; font-size: 1em;";
const EPISODE_TITLE_STYLE: &str = "margin: 2px 0; color: #fff; font-size: 1em;";
const PLOT_STYLE: &str = "margin: 5px 0 0 0; color: #ccc;";
const USER_STYLE: &str = "margin: 5px 0 0 0; font-style: italic;";

/// The singleton overlay panel and the listener closures keeping it alive.
pub struct Overlay {
    panel: HtmlElement,
    close_button: HtmlElement,
    /// Card-link click listeners, replaced wholesale on each render.
    card_closures: Vec<Closure<dyn FnMut()>>,
    /// Close-control and backdrop listeners, wired once.
    _static_closures: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Overlay {
    /// Create the panel, wire close and backdrop dismissal, and append it to
    /// the document body. Called at most once per app instance.
    pub fn create(document: &Document) -> Result<Self, JsValue> {
        let panel: HtmlElement = document.create_element("div")?.dyn_into()?;
        panel.set_attribute("style", PANEL_STYLE)?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&panel)?;

        let close_button: HtmlElement = document.create_element("button")?.dyn_into()?;
        close_button.set_inner_html("<span class=\"material-icons\">close</span>");
        close_button.set_attribute("style", CLOSE_STYLE)?;
        panel.append_child(&close_button)?;

        let mut static_closures = Vec::new();

        let close_target = panel.clone();
        let on_close = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
            hide_panel(&close_target);
        });
        close_button
            .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())?;
        static_closures.push(on_close);

        // Backdrop dismissal: only clicks on the panel itself, not on cards.
        let backdrop = panel.clone();
        let on_backdrop = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            let hit_backdrop = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .is_some_and(|element| element == *backdrop);
            if hit_backdrop {
                hide_panel(&backdrop);
            }
        });
        panel.add_event_listener_with_callback("click", on_backdrop.as_ref().unchecked_ref())?;
        static_closures.push(on_backdrop);

        Ok(Self {
            panel,
            close_button,
            card_closures: Vec::new(),
            _static_closures: static_closures,
        })
    }

    pub fn show(&self) {
        let _ = self.panel.style().set_property("display", "block");
    }

    pub fn hide(&self) {
        hide_panel(&self.panel);
    }

    /// Replace the panel's content with an error heading and message.
    pub fn show_error(&mut self, document: &Document, message: &str) -> Result<(), JsValue> {
        self.reset(document, "Error")?;
        let body = document.create_element("p")?;
        body.set_text_content(Some(message));
        self.panel.append_child(&body)?;
        Ok(())
    }

    /// Render the card list (or the single empty-state entry).
    pub fn render(
        &mut self,
        document: &Document,
        records: &[DisplayRecord],
        show_user_names: bool,
    ) -> Result<(), JsValue> {
        self.reset(document, "Currently Playing")?;

        let list = document.create_element("ul")?;
        list.set_attribute("style", "list-style: none; padding: 0;")?;

        if records.is_empty() {
            let entry = document.create_element("li")?;
            entry.set_text_content(Some(EMPTY_STATE));
            list.append_child(&entry)?;
        } else {
            for record in records {
                let entry = self.build_card(document, record, show_user_names)?;
                list.append_child(&entry)?;
            }
        }

        self.panel.append_child(&list)?;
        Ok(())
    }

    /// Clear the panel, re-attach the close control, and set the heading.
    fn reset(&mut self, document: &Document, heading: &str) -> Result<(), JsValue> {
        self.card_closures.clear();
        self.panel.set_inner_html("");
        self.panel.append_child(&self.close_button)?;
        let title = document.create_element("h2")?;
        title.set_text_content(Some(heading));
        self.panel.append_child(&title)?;
        Ok(())
    }

    /// One list entry: logo, title block, description, optional user line,
    /// thumbnail, all wrapped in a details link that closes the overlay.
    fn build_card(
        &mut self,
        document: &Document,
        record: &DisplayRecord,
        show_user_names: bool,
    ) -> Result<Element, JsValue> {
        let entry = document.create_element("li")?;
        entry.set_attribute("style", "margin-bottom: 20px;")?;

        let card = document.create_element("div")?;
        card.set_class_name("item-card");
        card.set_attribute("style", CARD_STYLE)?;

        let link = document.create_element("a")?;
        link.set_attribute("href", record.details_href.as_deref().unwrap_or("#"))?;
        link.set_attribute("style", LINK_STYLE)?;
        let panel = self.panel.clone();
        let on_link = Closure::<dyn FnMut()>::new(move || hide_panel(&panel));
        link.add_event_listener_with_callback("click", on_link.as_ref().unchecked_ref())?;
        self.card_closures.push(on_link);

        let logo_box = document.create_element("div")?;
        logo_box.set_class_name("item-logo");
        if let Some(logo_url) = &record.logo_url {
            let logo = document.create_element("img")?;
            logo.set_attribute("src", logo_url)?;
            logo.set_attribute("alt", &format!("{} logo", record.item_name))?;
            logo.set_attribute("style", "height: 10vh; width: auto; margin-right: 10px;")?;
            logo_box.append_child(&logo)?;
        }

        let content = document.create_element("div")?;
        content.set_class_name("item-content");
        content.set_attribute("style", "flex: 1; text-align: center;")?;

        if show_user_names {
            let user_line = format!(
                "Playing for: {}",
                record.user_name.as_deref().unwrap_or("Unknown User")
            );
            let user = styled_p(document, &user_line, USER_STYLE)?;
            content.append_child(&user)?;
        }

        let title = document.create_element("div")?;
        match &record.title {
            TitleBlock::Episode {
                series_name,
                season_episode,
                episode_title,
            } => {
                let series_line = styled_p(document, series_name, PRIMARY_TITLE_STYLE)?;
                title.append_child(&series_line)?;
                if let Some(line) = season_episode {
                    let season_line = styled_p(document, line, SEASON_LINE_STYLE)?;
                    title.append_child(&season_line)?;
                }
                let episode_line = styled_p(document, episode_title, EPISODE_TITLE_STYLE)?;
                title.append_child(&episode_line)?;
            }
            TitleBlock::Single { title: single } => {
                let title_line = styled_p(document, single, PRIMARY_TITLE_STYLE)?;
                title.append_child(&title_line)?;
            }
        }
        content.append_child(&title)?;

        let plot = document.create_element("div")?;
        plot.set_class_name("item-plot");
        let description = styled_p(document, &record.description, PLOT_STYLE)?;
        plot.append_child(&description)?;
        content.append_child(&plot)?;

        let thumb_box = document.create_element("div")?;
        thumb_box.set_class_name("item-thumbnail");
        let thumb = document.create_element("img")?;
        thumb.set_attribute("src", &record.thumbnail_url)?;
        thumb.set_attribute("alt", &format!("{} thumbnail", record.item_name))?;
        thumb.set_attribute("style", "height: 39vh; width: auto; margin-left: 10px;")?;
        thumb_box.append_child(&thumb)?;

        link.append_child(&logo_box)?;
        link.append_child(&content)?;
        link.append_child(&thumb_box)?;
        card.append_child(&link)?;
        entry.append_child(&card)?;
        Ok(entry)
    }
}

fn hide_panel(panel: &HtmlElement) {
    let _ = panel.style().set_property("display", "none");
}

fn styled_p(document: &Document, text: &str, style: &str) -> Result<Element, JsValue> {
    let p = document.create_element("p")?;
    p.set_text_content(Some(text));
    p.set_attribute("style", style)?;
    Ok(p)
}
