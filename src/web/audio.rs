//! `HtmlAudioElement` backend.
//!
//! Each started clip gets its own element. Media events are routed back to
//! the session by clip id; elements that have gone quiet are released on the
//! next start.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlAudioElement};

use super::MediaEvent;
use crate::audio::{AudioBackend, ClipId};
use crate::error::AudioError;

type Listener = Closure<dyn FnMut(Event)>;

struct MediaClip {
    element: HtmlAudioElement,
    _listeners: [Listener; 3],
}

impl MediaClip {
    fn detach(&self) {
        self.element.set_onplaying(None);
        self.element.set_onended(None);
        self.element.set_onerror(None);
    }
}

#[derive(Default)]
pub struct HtmlAudioBackend {
    clips: HashMap<ClipId, MediaClip>,
}

impl HtmlAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn release_idle(&mut self) {
        self.clips.retain(|_, clip| {
            let keep = !clip.element.paused();
            if !keep {
                clip.detach();
            }
            keep
        });
    }
}

fn listener(id: ClipId, make: fn(&Event) -> MediaEvent) -> Listener {
    Closure::wrap(Box::new(move |evt: Event| {
        super::media_event(id, make(&evt));
    }) as Box<dyn FnMut(Event)>)
}

fn media_error(evt: &Event) -> MediaEvent {
    let detail = evt
        .target()
        .and_then(|t| t.dyn_into::<HtmlAudioElement>().ok())
        .and_then(|el| el.error())
        .map(|e| format!("media error code {}", e.code()))
        .unwrap_or_else(|| "media error".to_string());
    MediaEvent::Error(detail)
}

impl AudioBackend for HtmlAudioBackend {
    fn start(&mut self, id: ClipId, path: &str) -> Result<(), AudioError> {
        self.release_idle();
        let start_err = |e: JsValue| AudioError::Start {
            path: path.to_string(),
            reason: format!("{e:?}"),
        };
        let element = HtmlAudioElement::new_with_src(path).map_err(start_err)?;

        let listeners = [
            listener(id, |_| MediaEvent::Playing),
            listener(id, |_| MediaEvent::Ended),
            listener(id, media_error),
        ];
        element.set_onplaying(Some(listeners[0].as_ref().unchecked_ref()));
        element.set_onended(Some(listeners[1].as_ref().unchecked_ref()));
        element.set_onerror(Some(listeners[2].as_ref().unchecked_ref()));

        let promise = element.play().map_err(start_err)?;
        // Autoplay blocks and unsupported sources reject the promise without
        // necessarily firing `error`.
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                super::media_event(id, MediaEvent::Error(format!("{e:?}")));
            }
        });

        self.clips.insert(
            id,
            MediaClip {
                element,
                _listeners: listeners,
            },
        );
        Ok(())
    }

    fn stop(&mut self, id: ClipId) {
        if let Some(clip) = self.clips.remove(&id) {
            clip.detach();
            if let Err(e) = clip.element.pause() {
                log::warn!("pause failed: {e:?}");
            }
            clip.element.set_current_time(0.0);
        }
    }
}
