//! `web_sys` bindings: the real document, `localStorage`, and the event
//! listeners that feed [`Site::dispatch`].

use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::dom::{Display, Dom, ReadyState};
use crate::error::StoreError;
use crate::posts::KeyStroke;
use crate::site::{EventOutcome, Site, SiteEvent, claim_page_boot};
use crate::theme::{PreferenceStore, SystemScheme};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement,
    KeyboardEvent, Storage, Window,
};

pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn ready_state(&self) -> ReadyState {
        ReadyState::from_document_state(&self.document.ready_state())
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn elements_by_classes(&self, classes: &[String]) -> Vec<Element> {
        let selector = classes
            .iter()
            .map(|class| format!(".{class}"))
            .collect::<Vec<_>>()
            .join(", ");
        let Ok(list) = self.document.query_selector_all(&selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|idx| list.item(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text(&self, node: &Element) -> String {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => el.inner_text(),
            None => node.text_content().unwrap_or_default(),
        }
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_display(&mut self, node: &Element, display: Display) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property("display", display.as_css());
        }
    }

    fn set_class(&mut self, node: &Element, class: &str, on: bool) {
        let _ = node.class_list().toggle_with_force(class, on);
    }

    fn input_value(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlInputElement>()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    fn set_input_value(&mut self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn focus(&mut self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.focus();
        }
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.document
            .document_element()
            .and_then(|root| root.get_attribute(name))
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(name, value);
        }
    }
}

/// `window.localStorage`; absent when the browser denies storage.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".to_string()))?;
        storage
            .set_item(key, value)
            .map_err(|err| StoreError::Unavailable(format!("{err:?}")))
    }
}

fn system_scheme(window: &Window) -> SystemScheme {
    let dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .is_some_and(|query| query.matches());
    if dark {
        SystemScheme::Dark
    } else {
        SystemScheme::Light
    }
}

struct App {
    site: Site<'static, WebDom, LocalStorage>,
    dom: WebDom,
}

type SharedApp = Rc<RefCell<App>>;

/// Installs the site scripts on the current page.
#[wasm_bindgen]
pub fn boot() -> Result<(), JsValue> {
    if !claim_page_boot() {
        debug!("site scripts already booted");
        return Ok(());
    }
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = SiteConfig::default();
    let site = Site::new(
        Catalog::builtin(),
        LocalStorage::from_window(&window),
        system_scheme(&window),
        config.clone(),
    );
    let app = Rc::new(RefCell::new(App {
        site,
        dom: WebDom::new(document.clone()),
    }));

    let loading =
        ReadyState::from_document_state(&document.ready_state()) == ReadyState::Loading;
    {
        let mut guard = app.borrow_mut();
        let App { site, dom } = &mut *guard;
        site.boot(dom).map_err(|err| JsValue::from_str(&err.to_string()))?;
    }

    if loading {
        let ready_app = Rc::clone(&app);
        let ready_window = window.clone();
        let ready_document = document.clone();
        let on_ready = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            dispatch(&ready_app, SiteEvent::DocumentReady, None);
            if let Err(err) = bind_listeners(&ready_app, &ready_window, &ready_document, &config) {
                error!(error = ?err, "failed to bind site listeners");
            }
        });
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
        Ok(())
    } else {
        bind_listeners(&app, &window, &document, &config)
    }
}

fn dispatch(app: &SharedApp, event: SiteEvent, source: Option<&Event>) {
    let mut guard = app.borrow_mut();
    let App { site, dom } = &mut *guard;
    match site.dispatch(dom, event) {
        Ok(EventOutcome::PreventDefault) => {
            if let Some(source) = source {
                source.prevent_default();
            }
        }
        Ok(EventOutcome::Continue) => {}
        Err(err) => error!(error = %err, "site event handler failed"),
    }
}

fn listen<F>(app: &SharedApp, target: &EventTarget, kind: &str, translate: F) -> Result<(), JsValue>
where
    F: Fn(&Event) -> Option<SiteEvent> + 'static,
{
    let app = Rc::clone(app);
    let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(site_event) = translate(&event) {
            dispatch(&app, site_event, Some(&event));
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn input_value(event: &Event) -> Option<String> {
    event
        .target()
        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

fn bind_listeners(
    app: &SharedApp,
    window: &Window,
    document: &Document,
    config: &SiteConfig,
) -> Result<(), JsValue> {
    let toggle_selector = format!(".{}", config.theme.toggle_class);
    if let Some(toggle) = document.query_selector(&toggle_selector)? {
        listen(app, &toggle, "click", |_| Some(SiteEvent::ThemeToggleClicked))?;
    }

    if let Some(search) = document.get_element_by_id(&config.posts.search) {
        listen(app, &search, "input", |event| {
            input_value(event).map(SiteEvent::PostSearchInput)
        })?;
        if let Some(clear) = document.get_element_by_id(&config.posts.clear) {
            listen(app, &clear, "click", |_| Some(SiteEvent::PostSearchCleared))?;
        }
        listen(app, window, "keydown", |event| {
            event.dyn_ref::<KeyboardEvent>().map(|key| {
                SiteEvent::KeyDown(KeyStroke {
                    key: key.key(),
                    ctrl: key.ctrl_key(),
                    meta: key.meta_key(),
                })
            })
        })?;
    }

    let tag_selector = format!(".{}", config.posts.tag_button_class);
    let buttons = document.query_selector_all(&tag_selector)?;
    for idx in 0..buttons.length() {
        let Some(button) = buttons.item(idx) else {
            continue;
        };
        let Ok(button) = button.dyn_into::<Element>() else {
            continue;
        };
        let attribute = config.posts.tag_attribute.clone();
        let tag_source = button.clone();
        listen(app, &button, "click", move |_| {
            tag_source
                .get_attribute(&attribute)
                .map(SiteEvent::PostTagClicked)
        })?;
    }

    if let Some(search) = document.get_element_by_id(&config.catalog.search) {
        listen(app, &search, "input", |event| {
            input_value(event).map(SiteEvent::CatalogSearchInput)
        })?;
    }

    // One delegated listener; the buttons inside are replaced on every render.
    if let Some(container) = document.get_element_by_id(&config.catalog.tags) {
        let attribute = config.catalog.tag_attribute.clone();
        let selector = format!("[{attribute}]");
        listen(app, &container, "click", move |event| {
            event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(&selector).ok().flatten())
                .and_then(|button| button.get_attribute(&attribute))
                .map(SiteEvent::CatalogTagClicked)
        })?;
    }
    Ok(())
}
