//! Lesson document download.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::AppConfig;
use crate::error::LoadError;
use crate::lesson::Lessons;

fn js_error_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
    let network = |err: JsValue| LoadError::Network {
        url: url.to_string(),
        reason: js_error_message(&err),
    };
    let window = web_sys::window().ok_or_else(|| network(JsValue::from_str("no window")))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &opts).map_err(network)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network)?
        .dyn_into()
        .map_err(network)?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let text = JsFuture::from(response.text().map_err(network)?)
        .await
        .map_err(network)?;
    text.as_string()
        .ok_or_else(|| network(JsValue::from_str("response body is not text")))
}

async fn fetch_lessons(url: &str) -> Result<Lessons, LoadError> {
    let body = fetch_text(url).await?;
    Ok(Lessons::from_json(&body)?)
}

/// Relative URL first, then the absolute fallback once.
pub async fn load_lessons(config: &AppConfig) -> Result<Lessons, LoadError> {
    match fetch_lessons(&config.lesson_url).await {
        Ok(lessons) => Ok(lessons),
        Err(first) => {
            log::warn!("{first}; trying {}", config.fallback_lesson_url);
            fetch_lessons(&config.fallback_lesson_url).await
        }
    }
}
