//! Browser backend: the content script the extension loads into the
//! webmail tab.

use crate::control::{ControlId, ControlView};
use crate::dom::{ControlElements, DomError, HostDocument};
use crate::geometry::{Rect, Viewport};
use crate::menu::{FadeTicket, FADE_DURATION};
use crate::poll::{complete_fade, poll_once, POLL_INTERVAL};
use crate::reply::{run_reply, Notice, Notifier};
use crate::script::{ContentScript, TickOutcome};
use crate::selectors::{
    ACTIVE_CLASS, CONTAINER_CLASS, DROPDOWN_CLASS, MENU_CLASS, MENU_ITEM_CLASS, PRIMARY_CLASS,
    TONE_ATTRIBUTE,
};
use draftai_api::client::DEFAULT_API_BASE;
use draftai_api::{GenerationClient, Tone};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, HtmlDocument, HtmlElement, Window};

const API_BASE: &str = match option_env!("DRAFTAI_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_BASE,
};

const STYLE_ID: &str = "draftai-style";
const STYLE: &str = r#"
.ai-reply-container { display: inline-flex !important; align-items: center !important; margin-right: 12px !important; height: 36px !important; }
.ai-main-btn, .ai-dropdown-btn { height: 100% !important; cursor: pointer !important; border: none !important; color: white !important; background: #4f46e5 !important; }
.ai-main-btn { padding: 0 16px 0 12px !important; border-radius: 24px 0 0 24px !important; font-weight: 700 !important; }
.ai-dropdown-btn { width: 32px !important; border-radius: 0 24px 24px 0 !important; }
.ai-tone-menu { position: fixed !important; min-width: 160px !important; padding: 6px !important; background: white !important; border-radius: 12px !important; z-index: 2147483647 !important; transition: opacity 0.2s ease !important; }
.ai-menu-item { padding: 10px 14px !important; cursor: pointer !important; border-radius: 8px !important; }
.ai-menu-item.active { background-color: #eef2ff !important; color: #4f46e5 !important; }
@keyframes ai-spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
.ai-spinner { display: inline-block; width: 14px; height: 14px; border: 2px solid rgba(255,255,255,0.3); border-top-color: white; border-radius: 50%; animation: ai-spin 1s linear infinite; }
"#;

fn js_err(context: &str) -> impl Fn(JsValue) -> DomError + '_ {
    move |e| DomError::Edit(format!("{context}: {e:?}"))
}

#[derive(Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    fn create(&self, tag: &str, class: &str) -> Result<Element, DomError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| DomError::Create(format!("{tag}.{class}: {e:?}")))?;
        element.set_class_name(class);
        Ok(element)
    }

    fn set_style(element: &Element, property: &str, value: &str) -> Result<(), DomError> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::Edit("element is not an HtmlElement".to_string()))?;
        html.style()
            .set_property(property, value)
            .map_err(js_err("failed to set style"))
    }

    fn inject_styles(&self) -> Result<(), DomError> {
        if self.document.get_element_by_id(STYLE_ID).is_some() {
            return Ok(());
        }
        let style = self.create("style", "")?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(STYLE));
        let head = self
            .document
            .head()
            .ok_or_else(|| DomError::Insert("document has no head".to_string()))?;
        head.append_child(&style)
            .map_err(|e| DomError::Insert(format!("style: {e:?}")))?;
        Ok(())
    }
}

impl HostDocument for WebDocument {
    type Element = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_selector_within(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn inner_text(&self, element: &Element) -> String {
        match element.dyn_ref::<HtmlElement>() {
            Some(html) => html.inner_text(),
            None => element.text_content().unwrap_or_default(),
        }
    }

    fn bounding_rect(&self, element: &Element) -> Rect {
        let r = element.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn viewport(&self) -> Viewport {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Viewport::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
    }

    fn mount_control(
        &mut self,
        toolbar: &Element,
        view: &ControlView,
    ) -> Result<ControlElements<Element>, DomError> {
        let container = self.create("div", CONTAINER_CLASS)?;
        let primary = self.create("button", PRIMARY_CLASS)?;
        let dropdown = self.create("button", DROPDOWN_CLASS)?;
        dropdown.set_inner_html("&#9662;");
        container
            .append_child(&primary)
            .map_err(|e| DomError::Insert(format!("primary: {e:?}")))?;
        container
            .append_child(&dropdown)
            .map_err(|e| DomError::Insert(format!("dropdown: {e:?}")))?;

        let menu = self.create("div", MENU_CLASS)?;
        let mut items = Vec::with_capacity(view.tones.len());
        for &tone in view.tones {
            let item = self.create("div", MENU_ITEM_CLASS)?;
            item.set_attribute(TONE_ATTRIBUTE, tone.wire_value())
                .map_err(js_err("failed to tag menu item"))?;
            item.set_text_content(Some(tone.label()));
            menu.append_child(&item)
                .map_err(|e| DomError::Insert(format!("menu item: {e:?}")))?;
            items.push((tone, item));
        }

        toolbar
            .insert_before(&container, toolbar.first_child().as_ref())
            .map_err(|e| DomError::Insert(format!("toolbar: {e:?}")))?;
        let body = self
            .document
            .body()
            .ok_or_else(|| DomError::Insert("document has no body".to_string()))?;
        body.append_child(&menu)
            .map_err(|e| DomError::Insert(format!("menu: {e:?}")))?;

        let elements = ControlElements {
            container,
            primary,
            dropdown,
            menu,
            items,
        };
        self.render_control(&elements, view)?;
        Ok(elements)
    }

    fn render_control(
        &mut self,
        elements: &ControlElements<Element>,
        view: &ControlView,
    ) -> Result<(), DomError> {
        if view.busy {
            elements
                .primary
                .set_inner_html(&format!("<span class=\"ai-spinner\"></span> <span>{}</span>", view.label));
            Self::set_style(&elements.primary, "pointer-events", "none")?;
        } else {
            elements
                .primary
                .set_inner_html(&format!("<span>{}</span>", view.label));
            Self::set_style(&elements.primary, "pointer-events", "auto")?;
        }

        let menu = &elements.menu;
        Self::set_style(menu, "display", if view.menu_displayed { "block" } else { "none" })?;
        if let Some(position) = view.menu_position {
            Self::set_style(menu, "top", &format!("{}px", position.top))?;
            Self::set_style(menu, "left", &format!("{}px", position.left))?;
        }
        if view.menu_displayed {
            // Let the display change land before the opacity transition starts.
            let menu = menu.clone();
            let opacity = view.menu_opacity.to_string();
            let apply = Closure::once_into_js(move || {
                let _ = WebDocument::set_style(&menu, "opacity", &opacity);
            });
            self.window
                .request_animation_frame(apply.unchecked_ref())
                .map_err(js_err("failed to schedule frame"))?;
        } else {
            Self::set_style(menu, "opacity", "0")?;
        }

        for (tone, item) in &elements.items {
            item.class_list()
                .toggle_with_force(ACTIVE_CLASS, *tone == view.active_tone)
                .map_err(js_err("failed to mark active tone"))?;
        }
        Ok(())
    }

    fn remove_control(&mut self, elements: &ControlElements<Element>) {
        elements.container.remove();
        elements.menu.remove();
    }

    fn focus(&mut self, element: &Element) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            let _ = html.focus();
        }
    }

    fn insert_text(&mut self, _element: &Element, text: &str) -> Result<(), DomError> {
        let html: HtmlDocument = self
            .document
            .clone()
            .dyn_into()
            .map_err(|_| DomError::Edit("document is not an HtmlDocument".to_string()))?;
        html.exec_command_with_show_ui_and_value("insertText", false, text)
            .map_err(js_err("insertText failed"))?;
        Ok(())
    }
}

struct Extension {
    script: RefCell<ContentScript<WebDocument>>,
    client: GenerationClient,
    window: Window,
}

impl Notifier for Extension {
    fn notify(&self, notice: Notice) {
        if notice == Notice::GenerationFailed {
            console::error_1(&notice.message().into());
        }
        let _ = self.window.alert_with_message(notice.message());
    }
}

impl Extension {
    fn tick(self: &Rc<Self>) {
        let outcome = poll_once(&self.script);
        if let TickOutcome::Mounted(id) = outcome {
            if let Err(e) = self.wire_control(id) {
                console::error_1(&format!("Draft AI: failed to wire control: {e:?}").into());
            }
        }
    }

    fn wire_control(self: &Rc<Self>, id: ControlId) -> Result<(), JsValue> {
        let Some(elements) = self.script.borrow().elements(id).cloned() else {
            return Ok(());
        };

        let ext = Rc::clone(self);
        let on_primary = Closure::<dyn FnMut()>::new(move || {
            let ext = Rc::clone(&ext);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = run_reply(&ext.script, id, &ext.client, &*ext).await {
                    console::error_1(&format!("Draft AI: {e}").into());
                }
            });
        });
        elements
            .primary
            .add_event_listener_with_callback("click", on_primary.as_ref().unchecked_ref())?;
        on_primary.forget();

        let ext = Rc::clone(self);
        let on_dropdown = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
            event.stop_propagation();
            ext.script.borrow_mut().toggle_menu(id);
        });
        elements
            .dropdown
            .add_event_listener_with_callback("click", on_dropdown.as_ref().unchecked_ref())?;
        on_dropdown.forget();

        for (tone, item) in &elements.items {
            let ext = Rc::clone(self);
            let tone: Tone = *tone;
            let on_item = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
                event.stop_propagation();
                let ticket = ext.script.borrow_mut().select_tone(id, tone);
                if let Some(ticket) = ticket {
                    ext.hide_later(id, ticket);
                }
            });
            item.add_event_listener_with_callback("click", on_item.as_ref().unchecked_ref())?;
            on_item.forget();
        }
        Ok(())
    }

    fn dismiss(self: &Rc<Self>) {
        let fades = self.script.borrow_mut().dismiss_menus();
        for (id, ticket) in fades {
            self.hide_later(id, ticket);
        }
    }

    fn hide_later(self: &Rc<Self>, id: ControlId, ticket: FadeTicket) {
        let ext = Rc::clone(self);
        let hide = Closure::once_into_js(move || {
            complete_fade(&ext.script, id, ticket);
        });
        let _ = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                hide.unchecked_ref::<js_sys::Function>(),
                FADE_DURATION.as_millis() as i32,
            );
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let web = WebDocument {
        window: window.clone(),
        document: document.clone(),
    };
    web.inject_styles()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let client = GenerationClient::new(API_BASE).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let extension = Rc::new(Extension {
        script: RefCell::new(ContentScript::new(web)),
        client,
        window: window.clone(),
    });

    let ext = Rc::clone(&extension);
    let on_tick = Closure::<dyn FnMut()>::new(move || ext.tick());
    window.set_interval_with_callback_and_timeout_and_arguments_0(
        on_tick.as_ref().unchecked_ref(),
        POLL_INTERVAL.as_millis() as i32,
    )?;
    on_tick.forget();

    let ext = Rc::clone(&extension);
    let on_click = Closure::<dyn FnMut()>::new(move || ext.dismiss());
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    let ext = Rc::clone(&extension);
    let on_resize = Closure::<dyn FnMut()>::new(move || ext.script.borrow_mut().on_resize());
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    console::log_1(&"Draft AI - Email Writer Extension Loaded".into());
    Ok(())
}
