//! Fidel Kids core crate.
//!
//! A single-page lesson app for the Amharic (Ethiopic) script: an alphabet
//! browser with a letter-detail modal, a sound quiz, a word builder and a
//! phrase-matching board. Game logic, scoring and timing are plain Rust and
//! run natively under `cargo test`; the `web` module binds them to the DOM.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod error;
pub mod games;
pub mod lesson;
pub mod markup;
pub mod rng;
pub mod score;
pub mod section;
pub mod session;
pub mod timers;
pub mod web;

pub use config::AppConfig;
pub use error::{AudioError, LessonError, LoadError, StorageError, UnknownSection};
pub use lesson::Lessons;
pub use section::Section;
pub use session::{Action, Session};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
