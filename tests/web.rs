// Browser tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use fidel_kids::Section;
use fidel_kids::score::{KeyValueStore, load_scores, save_score};
use fidel_kids::web::{LocalStore, patch_html};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, HtmlImageElement};

wasm_bindgen_test_configure!(run_in_browser);

const KEY: &str = "fidelKidsTestScores";
const PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// The app lives for the whole wasm instance, so every test shares one start
/// with both lesson URLs unreachable.
fn content() -> Element {
    let doc = doc();
    if let Some(el) = doc.get_element_by_id("content") {
        return el;
    }
    let content = doc.create_element("div").unwrap();
    content.set_id("content");
    doc.body().unwrap().append_child(&content).unwrap();
    fidel_kids::web::start_app_with_config(
        r#"{"lessonUrl":"missing.json","fallbackLessonUrl":"http://127.0.0.1:9/missing.json"}"#,
    )
    .unwrap();
    content
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn image(src: &str, placeholder: &str) -> HtmlImageElement {
    let img: HtmlImageElement = doc().create_element("img").unwrap().dyn_into().unwrap();
    img.set_attribute("data-placeholder", placeholder).unwrap();
    img.set_attribute("src", src).unwrap();
    doc().body().unwrap().append_child(&img).unwrap();
    img
}

async fn wait_for_fallback(img: &HtmlImageElement) {
    for _ in 0..40 {
        if img.has_attribute("data-fallback-applied") {
            return;
        }
        sleep(50).await;
    }
    panic!("placeholder was never applied");
}

#[wasm_bindgen_test]
fn local_store_round_trips_best_scores() {
    let store = LocalStore;
    store.set_item(KEY, "{}").unwrap();
    save_score(&store, KEY, Section::Phrases, 4);
    save_score(&store, KEY, Section::Phrases, 2);
    assert_eq!(load_scores(&store, KEY).get("phrases"), Some(&4));
}

#[wasm_bindgen_test]
async fn unknown_section_reports_failure() {
    let content = content();
    assert!(!fidel_kids::web::load_section("games".into()).await);
    assert!(content.inner_html().contains("Failed to load games section"));
}

#[wasm_bindgen_test]
async fn unreachable_lessons_fail_the_load() {
    let content = content();
    assert!(!fidel_kids::web::load_section("alphabet".into()).await);
    assert!(content.inner_html().contains("Failed to load alphabet section"));
    // Failures are not cached: a second attempt fetches and fails again.
    assert!(!fidel_kids::web::load_section("alphabet".into()).await);
}

#[wasm_bindgen_test]
async fn broken_image_shows_placeholder() {
    content();
    let img = image("missing-image.png", PIXEL);
    wait_for_fallback(&img).await;
    assert_eq!(img.get_attribute("src").as_deref(), Some(PIXEL));
    assert_eq!(img.get_attribute("data-fallback-applied").as_deref(), Some("missing-image.png"));
}

#[wasm_bindgen_test]
async fn broken_placeholder_is_swapped_in_once() {
    content();
    let img = image("missing-image.png", "missing-placeholder.png");
    wait_for_fallback(&img).await;
    sleep(300).await;
    assert_eq!(img.get_attribute("src").as_deref(), Some("missing-placeholder.png"));
    // A second swap would have recorded the placeholder as the failed source.
    assert_eq!(img.get_attribute("data-fallback-applied").as_deref(), Some("missing-image.png"));
}

fn host() -> Element {
    let host = doc().create_element("div").unwrap();
    doc().body().unwrap().append_child(&host).unwrap();
    host
}

#[wasm_bindgen_test]
fn patch_keeps_modal_node_and_toggles_class() {
    let host = host();
    patch_html(&host, r#"<div class="letter-modal" data-action="modal-backdrop"><h3>ሀ</h3></div>"#);
    let modal = host.first_element_child().unwrap();
    patch_html(&host, r#"<div class="letter-modal active show" data-action="modal-backdrop"><h3>ለ</h3></div>"#);
    assert_eq!(host.first_element_child().unwrap(), modal);
    assert!(modal.class_list().contains("active"));
    assert_eq!(modal.text_content().as_deref(), Some("ለ"));
}

#[wasm_bindgen_test]
fn patch_keeps_drag_hover_and_drops_stale_attributes() {
    let host = host();
    patch_html(&host, r#"<div class="letter-slot" data-slot="0" data-action="x"></div>"#);
    let slot = host.first_element_child().unwrap();
    slot.class_list().add_1("drag-over").unwrap();
    patch_html(&host, r#"<div class="letter-slot filled" data-slot="0"></div>"#);
    assert!(slot.class_list().contains("drag-over"));
    assert!(slot.class_list().contains("filled"));
    assert!(!slot.has_attribute("data-action"));
}

#[wasm_bindgen_test]
fn patch_replaces_mismatched_and_trims_extra_nodes() {
    let host = host();
    patch_html(&host, "<p>a</p><span>b</span><i>c</i>");
    let first = host.first_element_child().unwrap();
    patch_html(&host, "<p>a</p><button>b</button>");
    assert_eq!(host.first_element_child().unwrap(), first);
    assert_eq!(host.inner_html(), "<p>a</p><button>b</button>");
}

#[wasm_bindgen_test]
fn patch_leaves_fallen_back_image_alone() {
    let host = host();
    let markup = format!(r#"<img src="missing-image.png" data-placeholder="{PIXEL}" alt="cat">"#);
    patch_html(&host, &markup);
    let img = host.first_element_child().unwrap();
    img.set_attribute("data-fallback-applied", "missing-image.png").unwrap();
    img.set_attribute("src", PIXEL).unwrap();
    patch_html(&host, &markup);
    assert_eq!(host.first_element_child().unwrap(), img);
    assert_eq!(img.get_attribute("src").as_deref(), Some(PIXEL));

    // A different picture resets the fallback.
    patch_html(&host, r#"<img src="other.png" data-placeholder="p.png" alt="dog">"#);
    assert_eq!(img.get_attribute("src").as_deref(), Some("other.png"));
    assert!(!img.has_attribute("data-fallback-applied"));
}
