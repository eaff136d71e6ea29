//! Alphabet browser and letter-detail modal.
//!
//! The modal cycles: Closed -> Open -> Closing -> Closed. Closing keeps the
//! detail content on screen until the transition timer fires, unless the
//! modal is re-opened first (the bumped generation makes the timer stale).

use std::fmt::Write;
use std::rc::Rc;

use rand::seq::SliceRandom;

use super::fidel_tables::{
    FALLBACK_SOUNDS, FORM_EXAMPLES, LETTER_AUDIO, PANEL_DEFAULT, PANEL_EXAMPLES, VOWEL_ORDER,
    lookup,
};
use super::{Delay, Effect, GameTimer, play};
use crate::lesson::{LetterRecord, Lessons};
use crate::markup::{RenderCtx, action_attr, escape, section_header};
use crate::rng::LessonRng;
use crate::section::Section;

/// Transliteration of form `k` given the base (1st order) transliteration.
pub fn derive_transliteration(base: &str, k: usize) -> String {
    match VOWEL_ORDER.get(k) {
        Some(_) if k == 0 => base.to_string(),
        Some(vowel) => {
            let consonant: String = base.chars().filter(|c| !"aeiou".contains(*c)).collect();
            format!("{consonant}{vowel}")
        }
        None => base.to_string(),
    }
}

/// Re-gloss `word (translit - meaning)` with a new transliteration.
pub fn rewrite_example(example: &str, transliteration: &str) -> String {
    let Some((word, gloss)) = example.split_once('(') else {
        return example.to_string();
    };
    let meaning = gloss
        .split('-')
        .nth(1)
        .map(|m| m.trim().replace(')', ""))
        .unwrap_or_default();
    if meaning.is_empty() {
        format!("{} ({transliteration})", word.trim())
    } else {
        format!("{} ({transliteration} - {meaning})", word.trim())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelExample {
    pub word: String,
    pub text: String,
}

impl PanelExample {
    fn for_glyph(glyph: &str) -> Self {
        let text = lookup(PANEL_EXAMPLES, glyph).unwrap_or(PANEL_DEFAULT);
        let word = text.split('(').next().unwrap_or_default().trim();
        Self {
            word: word.to_string(),
            text: text.to_string(),
        }
    }
}

/// What the modal currently displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterDetail {
    pub index: usize,
    pub forms: Vec<String>,
    pub selected_form: Option<usize>,
    pub glyph: String,
    pub transliteration: String,
    pub example: String,
    /// `None` until a form is picked.
    pub panel: Option<PanelExample>,
}

impl LetterDetail {
    fn new(index: usize, letter: &LetterRecord) -> Self {
        Self {
            index,
            forms: letter.form_glyphs(),
            selected_form: None,
            glyph: letter.glyph.clone(),
            transliteration: letter.transliteration.clone(),
            example: letter.example.clone(),
            panel: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Modal {
    Closed,
    Open(LetterDetail),
    Closing(LetterDetail),
}

pub struct AlphabetBrowser {
    lessons: Rc<Lessons>,
    modal: Modal,
    generation: u32,
}

impl AlphabetBrowser {
    pub fn new(lessons: Rc<Lessons>) -> Self {
        Self {
            lessons,
            modal: Modal::Closed,
            generation: 0,
        }
    }

    fn letters(&self) -> &[LetterRecord] {
        &self.lessons.alphabet
    }

    pub fn is_open(&self) -> bool {
        matches!(self.modal, Modal::Open(_))
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.modal, Modal::Closing(_))
    }

    /// Detail shown while open or closing.
    pub fn detail(&self) -> Option<&LetterDetail> {
        match &self.modal {
            Modal::Open(d) | Modal::Closing(d) => Some(d),
            Modal::Closed => None,
        }
    }

    pub fn open(&mut self, index: usize) {
        let Some(detail) = self.letters().get(index).map(|l| LetterDetail::new(index, l)) else {
            log::warn!("no letter at index {index}");
            return;
        };
        self.generation = self.generation.wrapping_add(1);
        self.modal = Modal::Open(detail);
    }

    pub fn next(&mut self) {
        if let Modal::Open(d) = &self.modal {
            let n = self.letters().len();
            self.open((d.index + 1) % n);
        }
    }

    pub fn prev(&mut self) {
        if let Modal::Open(d) = &self.modal {
            let n = self.letters().len();
            self.open((d.index + n - 1) % n);
        }
    }

    pub fn play_letter(&self, index: usize, out: &mut Vec<Effect>) {
        if let Some(letter) = self.letters().get(index) {
            play(out, &letter.audio_file, format!("letter-{index}"));
        }
    }

    /// Pick vowel-order form `k`: play it and swap the displayed glyph,
    /// transliteration, example and panel.
    pub fn select_form(&mut self, k: usize, rng: &mut LessonRng, out: &mut Vec<Effect>) {
        let Modal::Open(detail) = &mut self.modal else {
            return;
        };
        let Some(form) = detail.forms.get(k).cloned() else {
            return;
        };
        let letter = &self.lessons.alphabet[detail.index];

        let audio = lookup(LETTER_AUDIO, &form)
            .or_else(|| letter.form_audio(&form))
            .or_else(|| FALLBACK_SOUNDS.choose(rng).copied())
            .unwrap_or_default();
        log::debug!("form {form} selected, playing {audio}");
        play(out, audio, format!("form-{k}"));

        detail.transliteration = derive_transliteration(&letter.transliteration, k);
        detail.example = match lookup(FORM_EXAMPLES, &form) {
            Some(ex) => ex.to_string(),
            None => rewrite_example(&letter.example, &detail.transliteration),
        };
        detail.panel = Some(PanelExample::for_glyph(&form));
        detail.glyph = form;
        detail.selected_form = Some(k);
    }

    /// Close control, Escape or backdrop click.
    pub fn close(&mut self, out: &mut Vec<Effect>) {
        let modal = std::mem::replace(&mut self.modal, Modal::Closed);
        self.modal = match modal {
            Modal::Open(d) => {
                self.generation = self.generation.wrapping_add(1);
                out.push(Effect::Schedule {
                    delay: Delay::ModalClose,
                    timer: GameTimer::ClearModal {
                        generation: self.generation,
                    },
                });
                Modal::Closing(d)
            }
            other => other,
        };
    }

    pub fn on_timer(&mut self, timer: GameTimer) {
        if let GameTimer::ClearModal { generation } = timer {
            if generation == self.generation && self.is_closing() {
                self.modal = Modal::Closed;
            }
        }
    }

    pub fn render(&self, ctx: &RenderCtx) -> String {
        let mut out = String::new();
        section_header(&mut out, Section::Alphabet);
        out.push_str(r#"<div class="alphabet-container">"#);
        for (i, letter) in self.letters().iter().enumerate() {
            let key = format!("letter-{i}");
            let _ = write!(
                out,
                r#"<div class="letter-card{playing}" {open}><div class="letter">{glyph}</div><div class="transliteration">{tr}</div><div class="example">{ex}</div><button class="play-button" {play}><span class="play-icon">▶</span> Play Sound</button><button class="see-more-button" {open}><span class="expand-icon">+</span> Click to see more</button>"#,
                playing = ctx.playing_class(&key),
                open = action_attr("open-letter", Some(i)),
                play = action_attr("play-letter", Some(i)),
                glyph = escape(&letter.glyph),
                tr = escape(&letter.transliteration),
                ex = escape(&letter.example),
            );
            ctx.badge(&mut out, &key);
            out.push_str("</div>");
        }
        out.push_str("</div>");

        let active = if self.is_open() { " active show" } else { "" };
        let _ = write!(
            out,
            r#"<div class="letter-modal{active}" {backdrop}><div class="modal-content" data-action="none"><button class="close-expanded close-modal" {close}>&times;</button>"#,
            backdrop = action_attr("modal-backdrop", None),
            close = action_attr("close-modal", None),
        );
        if let Some(d) = self.detail() {
            render_detail(&mut out, d, ctx);
        }
        out.push_str("</div></div>");
        out
    }
}

fn render_detail(out: &mut String, d: &LetterDetail, ctx: &RenderCtx) {
    let _ = write!(
        out,
        r#"<div class="letter-top-container"><div class="expanded-letter-container modal-letter-container"><div class="expanded-letter modal-letter">{glyph}</div><div class="expanded-transliteration">{tr}</div><div class="expanded-example">{ex}</div><div class="expanded-buttons"><button class="prev-letter-button" {prev}>Previous letter</button><button class="next-letter-button" {next}>Next letter</button></div></div><div class="letter-image-container">"#,
        glyph = escape(&d.glyph),
        tr = escape(&d.transliteration),
        ex = escape(&d.example),
        prev = action_attr("prev-letter", None),
        next = action_attr("next-letter", None),
    );
    match &d.panel {
        Some(p) => {
            let _ = write!(
                out,
                r#"<div class="letter-example-word">{}</div><div class="letter-example-text">{}</div>"#,
                escape(&p.word),
                escape(&p.text)
            );
        }
        None => out.push_str(
            r#"<div class="letter-example-image">Click a letter form to see an example</div>"#,
        ),
    }
    out.push_str(r#"</div></div><div class="expanded-forms-container modal-forms-container"><div class="modal-form-content-wrapper"><div class="letter-forms-container">"#);
    for (k, form) in d.forms.iter().enumerate() {
        let key = format!("form-{k}");
        let selected = if d.selected_form == Some(k) { " selected-form" } else { "" };
        let _ = write!(
            out,
            r#"<div class="letter-form{selected}{playing}" {attr}><div class="form-letter">{form}</div>"#,
            playing = ctx.playing_class(&key),
            attr = action_attr("select-form", Some(k)),
            form = escape(form),
        );
        ctx.badge(out, &key);
        out.push_str("</div>");
    }
    out.push_str("</div></div></div>");
}
