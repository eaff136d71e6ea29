//! Browser glue: owns the one `Session`, decodes DOM events into actions and
//! projects the rendered section into the content container.
//!
//! Listeners are installed once on the document and delegate by `data-*`
//! attributes, so re-rendering a section never leaks handlers.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DragEvent, Element, Event, HtmlImageElement, KeyboardEvent, MouseEvent, window};

use crate::audio::ClipId;
use crate::config::AppConfig;
use crate::markup;
use crate::rng;
use crate::section::Section;
use crate::session::{Action, Session};

mod audio;
mod fetch;
mod patch;
mod storage;

pub use audio::HtmlAudioBackend;
pub use patch::patch_html;
pub use storage::LocalStore;

type App = Session<HtmlAudioBackend, LocalStore>;

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Asynchronous outcome reported by a media element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MediaEvent {
    Playing,
    Ended,
    Error(String),
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Start with the built-in configuration and open the alphabet section.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    start_with(AppConfig::default())
}

/// Like [`start_app`], with a JSON object overriding any configuration field.
#[wasm_bindgen]
pub fn start_app_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("invalid configuration: {e}")))?;
    start_with(config)
}

fn start_with(config: AppConfig) -> Result<(), JsValue> {
    let _ = console_log::init_with_level(config.log_level());
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("app already started");
        return Ok(());
    }
    let doc = document().ok_or_else(|| JsValue::from_str("no document"))?;

    let rng = rng::from_entropy(now_ms().to_bits());
    let session = Session::new(config, HtmlAudioBackend::new(), LocalStore, rng);
    APP.with(|cell| *cell.borrow_mut() = Some(session));

    install_click_listener(&doc)?;
    install_key_listener(&doc)?;
    install_drag_listeners(&doc)?;
    install_image_fallback(&doc)?;
    start_tick_loop();

    wasm_bindgen_futures::spawn_local(async {
        load_section(Section::Alphabet.name().to_string()).await;
    });
    log::info!("app started");
    Ok(())
}

/// Show section `name` in the content container, fetching the lesson
/// document on first use. Returns false (after rendering an error message
/// where possible) on an unknown name, a missing container or a failed load.
#[wasm_bindgen]
pub async fn load_section(name: String) -> bool {
    let Some(config) = with_app(|app| app.config().clone()) else {
        log::error!("load_section called before start_app");
        return false;
    };
    let Some(container) = document().and_then(|d| d.get_element_by_id(&config.content_id)) else {
        log::error!("content container #{} not found", config.content_id);
        return false;
    };
    let section: Section = match name.parse() {
        Ok(section) => section,
        Err(e) => {
            log::error!("Error loading section: {e}");
            container.set_inner_html(&markup::load_error(&name));
            return false;
        }
    };
    mark_menu(section);

    if !with_app(|app| app.has_lessons()).unwrap_or(false) {
        container.set_inner_html(&markup::loading(&name));
        match fetch::load_lessons(&config).await {
            Ok(lessons) => {
                with_app(|app| {
                    // A concurrent navigation may have installed them first.
                    if !app.has_lessons() {
                        app.set_lessons(lessons);
                    }
                });
            }
            Err(e) => {
                log::error!("Error loading section: {e}");
                container.set_inner_html(&markup::load_error(&name));
                return false;
            }
        }
    }

    let entered = with_app(|app| {
        let ok = app.enter(section, now_ms());
        if ok {
            refresh(app);
        }
        ok
    });
    entered.unwrap_or(false)
}

fn refresh(app: &App) {
    let Some(doc) = document() else {
        return;
    };
    match doc.get_element_by_id(&app.config().content_id) {
        Some(container) => patch_html(&container, &app.render()),
        None => log::error!("content container #{} disappeared", app.config().content_id),
    }
    if let Some(body) = doc.body() {
        let classes = body.class_list();
        let res = if app.modal_open() {
            classes.add_1("modal-open")
        } else {
            classes.remove_1("modal-open")
        };
        if let Err(e) = res {
            log::warn!("could not toggle modal-open: {e:?}");
        }
    }
}

/// Active/inactive classes on the `.menu-item[data-section]` buttons.
fn mark_menu(section: Section) {
    let Some(doc) = document() else {
        return;
    };
    let Ok(items) = doc.query_selector_all(".menu-item[data-section]") else {
        return;
    };
    for i in 0..items.length() {
        let Some(item) = items.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let active = item
            .get_attribute("data-section")
            .is_some_and(|s| s.eq_ignore_ascii_case(section.name()));
        let classes = item.class_list();
        let (add, remove) = if active {
            ("active", "inactive")
        } else {
            ("inactive", "active")
        };
        if let Err(e) = classes.add_1(add).and_then(|()| classes.remove_1(remove)) {
            log::warn!("could not mark menu item {add}: {e:?}");
        }
    }
}

fn event_element(evt: &Event) -> Option<Element> {
    evt.target().and_then(|t| t.dyn_into::<Element>().ok())
}

fn closest(evt: &Event, selector: &str) -> Option<Element> {
    event_element(evt).and_then(|el| el.closest(selector).ok().flatten())
}

fn index_attr(el: &Element, name: &str) -> Option<usize> {
    el.get_attribute(name).and_then(|v| v.parse().ok())
}

fn dispatch(action: Action) {
    with_app(|app| {
        if app.dispatch(action, now_ms()) {
            refresh(app);
        }
    });
}

pub(crate) fn media_event(id: ClipId, event: MediaEvent) {
    with_app(|app| match event {
        MediaEvent::Playing => {
            if app.on_audio_playing(id, now_ms()) {
                refresh(app);
            }
        }
        MediaEvent::Ended => app.on_audio_ended(id),
        MediaEvent::Error(reason) => app.on_audio_error(id, &reason),
    });
}

fn install_click_listener(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: MouseEvent| {
        if let Some(item) = closest(&evt, ".menu-item[data-section]") {
            if let Some(name) = item.get_attribute("data-section") {
                wasm_bindgen_futures::spawn_local(async move {
                    load_section(name).await;
                });
            }
            return;
        }
        let Some(el) = closest(&evt, "[data-action]") else {
            return;
        };
        let Some(name) = el.get_attribute("data-action") else {
            return;
        };
        if let Some(action) = Action::decode(&name, index_attr(&el, "data-index")) {
            dispatch(action);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_key_listener(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        if evt.key() == "Escape" {
            dispatch(Action::Escape);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_drag_listeners(doc: &Document) -> Result<(), JsValue> {
    let dragstart = Closure::wrap(Box::new(move |evt: DragEvent| {
        let Some(tile) = closest(&evt, "[data-bank-index]") else {
            return;
        };
        if let (Some(dt), Some(index)) = (evt.data_transfer(), tile.get_attribute("data-bank-index")) {
            if let Err(e) = dt.set_data("text/plain", &index) {
                log::warn!("dragstart: {e:?}");
            }
        }
    }) as Box<dyn FnMut(_)>);

    let dragover = Closure::wrap(Box::new(move |evt: DragEvent| {
        if let Some(slot) = closest(&evt, "[data-slot]") {
            evt.prevent_default();
            if let Err(e) = slot.class_list().add_1("drag-over") {
                log::warn!("dragover: {e:?}");
            }
        }
    }) as Box<dyn FnMut(_)>);

    let dragleave = Closure::wrap(Box::new(move |evt: DragEvent| {
        if let Some(slot) = closest(&evt, "[data-slot]") {
            if let Err(e) = slot.class_list().remove_1("drag-over") {
                log::warn!("dragleave: {e:?}");
            }
        }
    }) as Box<dyn FnMut(_)>);

    let drop = Closure::wrap(Box::new(move |evt: DragEvent| {
        let Some(slot_el) = closest(&evt, "[data-slot]") else {
            return;
        };
        evt.prevent_default();
        if let Err(e) = slot_el.class_list().remove_1("drag-over") {
            log::warn!("drop: {e:?}");
        }
        let tile = evt
            .data_transfer()
            .and_then(|dt| dt.get_data("text/plain").ok())
            .and_then(|v| v.parse().ok());
        if let (Some(tile), Some(slot)) = (tile, index_attr(&slot_el, "data-slot")) {
            dispatch(Action::DropTile { tile, slot });
        }
    }) as Box<dyn FnMut(_)>);

    doc.add_event_listener_with_callback("dragstart", dragstart.as_ref().unchecked_ref())?;
    doc.add_event_listener_with_callback("dragover", dragover.as_ref().unchecked_ref())?;
    doc.add_event_listener_with_callback("dragleave", dragleave.as_ref().unchecked_ref())?;
    doc.add_event_listener_with_callback("drop", drop.as_ref().unchecked_ref())?;
    dragstart.forget();
    dragover.forget();
    dragleave.forget();
    drop.forget();
    Ok(())
}

/// Image `error` does not bubble, so this listens in the capture phase. The
/// swap happens once per element; a missing placeholder is left broken. The
/// marker keeps the failed `src` so re-renders leave the placeholder up.
fn install_image_fallback(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: Event| {
        let Some(img) = evt
            .target()
            .and_then(|t| t.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        if img.has_attribute(patch::FALLBACK_ATTR) {
            return;
        }
        if let Some(placeholder) = img.get_attribute("data-placeholder") {
            let failed = img.get_attribute("src").unwrap_or_default();
            if let Err(e) = img.set_attribute(patch::FALLBACK_ATTR, &failed) {
                log::warn!("could not mark image fallback: {e:?}");
                return;
            }
            log::debug!("image {failed} failed; showing {placeholder}");
            img.set_src(&placeholder);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback_and_bool("error", closure.as_ref().unchecked_ref(), true)?;
    closure.forget();
    Ok(())
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Drives the session's virtual clock from animation frames.
fn start_tick_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| {
            if app.tick(ts) {
                refresh(app);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    let Some(w) = window() else {
        return;
    };
    let cb = callback.borrow();
    let Some(cb) = cb.as_ref() else {
        return;
    };
    if let Err(e) = w.request_animation_frame(cb.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}
