//! Explicit application context: the live section, its game state, pending
//! timers, the audio helper and the score store.
//!
//! The browser layer owns exactly one `Session` and forwards decoded user
//! input, media callbacks and animation-frame timestamps into it. Nothing in
//! here touches the DOM, so whole flows run natively under `cargo test`.

use std::rc::Rc;

use crate::audio::{AudioBackend, AudioPlayer, ClipId};
use crate::config::AppConfig;
use crate::games::phrases::Column;
use crate::games::{
    AlphabetBrowser, Delay, Effect, GameTimer, PhraseMatch, SoundQuiz, WordBuilder,
};
use crate::lesson::Lessons;
use crate::markup::RenderCtx;
use crate::rng::LessonRng;
use crate::score::{self, KeyValueStore, ScoreMap};
use crate::section::Section;
use crate::timers::Scheduler;

/// User input decoded from `data-action` / `data-index` attributes, drag and
/// drop, or the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    OpenLetter(usize),
    PlayLetter(usize),
    ModalBackdrop,
    CloseModal,
    PrevLetter,
    NextLetter,
    SelectForm(usize),
    PlaySound,
    Answer(usize),
    NextSound,
    PlayWord(usize),
    PlayTarget,
    DropTile { tile: usize, slot: usize },
    CheckWord,
    NextWord,
    SelectPhrase(usize),
    SelectImage(usize),
    CheckPhrases,
    ResetPhrases,
    PlayPhrase(usize),
    Escape,
}

impl Action {
    /// Decode a click target. `"none"` marks elements that swallow clicks
    /// (the modal body) and decodes to nothing, as do unknown names and
    /// indexed actions without an index.
    pub fn decode(action: &str, index: Option<usize>) -> Option<Self> {
        let indexed = |f: fn(usize) -> Action| index.map(f);
        match action {
            "open-letter" => indexed(Action::OpenLetter),
            "play-letter" => indexed(Action::PlayLetter),
            "modal-backdrop" => Some(Action::ModalBackdrop),
            "close-modal" => Some(Action::CloseModal),
            "prev-letter" => Some(Action::PrevLetter),
            "next-letter" => Some(Action::NextLetter),
            "select-form" => indexed(Action::SelectForm),
            "play-sound" => Some(Action::PlaySound),
            "answer" => indexed(Action::Answer),
            "next-sound" => Some(Action::NextSound),
            "play-word" => indexed(Action::PlayWord),
            "play-target" => Some(Action::PlayTarget),
            "check-word" => Some(Action::CheckWord),
            "next-word" => Some(Action::NextWord),
            "select-phrase" => indexed(Action::SelectPhrase),
            "select-image" => indexed(Action::SelectImage),
            "check-phrases" => Some(Action::CheckPhrases),
            "reset-phrases" => Some(Action::ResetPhrases),
            "play-phrase" => indexed(Action::PlayPhrase),
            "none" => None,
            other => {
                log::debug!("ignoring unknown action '{other}'");
                None
            }
        }
    }
}

/// Game state of the live section.
pub enum SectionView {
    Alphabet(AlphabetBrowser),
    Sounds(SoundQuiz),
    Words(WordBuilder),
    Phrases(PhraseMatch),
}

impl SectionView {
    pub fn section(&self) -> Section {
        match self {
            SectionView::Alphabet(_) => Section::Alphabet,
            SectionView::Sounds(_) => Section::Sounds,
            SectionView::Words(_) => Section::Words,
            SectionView::Phrases(_) => Section::Phrases,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionTimer {
    Game(GameTimer),
    BadgeExpiry(ClipId),
}

pub struct Session<A: AudioBackend, S: KeyValueStore> {
    config: AppConfig,
    lessons: Option<Rc<Lessons>>,
    view: Option<SectionView>,
    timers: Scheduler<SessionTimer>,
    audio: AudioPlayer<A>,
    store: S,
    rng: LessonRng,
}

impl<A: AudioBackend, S: KeyValueStore> Session<A, S> {
    pub fn new(config: AppConfig, backend: A, store: S, rng: LessonRng) -> Self {
        let audio = AudioPlayer::new(backend, config.audio_dir.clone(), config.fallback_clip.clone());
        Self {
            config,
            lessons: None,
            view: None,
            timers: Scheduler::new(),
            audio,
            store,
            rng,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn has_lessons(&self) -> bool {
        self.lessons.is_some()
    }

    /// Install the lesson document. Kept for the lifetime of the session.
    pub fn set_lessons(&mut self, lessons: Lessons) {
        log::info!(
            "lessons loaded: {} letters, {} words, {} phrases",
            lessons.alphabet.len(),
            lessons.words.len(),
            lessons.phrases.len()
        );
        self.lessons = Some(Rc::new(lessons));
    }

    pub fn section(&self) -> Option<Section> {
        self.view.as_ref().map(SectionView::section)
    }

    pub fn view(&self) -> Option<&SectionView> {
        self.view.as_ref()
    }

    pub fn audio(&self) -> &AudioPlayer<A> {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scores(&self) -> ScoreMap {
        score::load_scores(&self.store, &self.config.storage_key)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether the page body should carry the `modal-open` class.
    pub fn modal_open(&self) -> bool {
        matches!(&self.view, Some(SectionView::Alphabet(a)) if a.is_open())
    }

    /// Replace the live section with fresh round state. Returns false until
    /// lessons are installed.
    pub fn enter(&mut self, section: Section, _now_ms: f64) -> bool {
        let Some(lessons) = self.lessons.clone() else {
            log::warn!("cannot enter {section} before lessons are loaded");
            return false;
        };
        self.timers.clear();
        self.audio.dismiss_badge();
        let rng = &mut self.rng;
        self.view = Some(match section {
            Section::Alphabet => SectionView::Alphabet(AlphabetBrowser::new(lessons)),
            Section::Sounds => SectionView::Sounds(SoundQuiz::new(lessons, rng)),
            Section::Words => SectionView::Words(WordBuilder::new(lessons, rng)),
            Section::Phrases => SectionView::Phrases(PhraseMatch::new(lessons, rng)),
        });
        log::info!("entered {section} section");
        true
    }

    /// Route one input to the live game. Returns true when the view changed
    /// and should be re-rendered.
    pub fn dispatch(&mut self, action: Action, now_ms: f64) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        let rng = &mut self.rng;
        let mut effects = Vec::new();
        let handled = match (view, action) {
            (SectionView::Alphabet(a), Action::OpenLetter(i)) => {
                a.open(i);
                true
            }
            (SectionView::Alphabet(a), Action::PlayLetter(i)) => {
                a.play_letter(i, &mut effects);
                true
            }
            (SectionView::Alphabet(a), Action::PrevLetter) => {
                a.prev();
                true
            }
            (SectionView::Alphabet(a), Action::NextLetter) => {
                a.next();
                true
            }
            (SectionView::Alphabet(a), Action::SelectForm(k)) => {
                a.select_form(k, rng, &mut effects);
                true
            }
            (
                SectionView::Alphabet(a),
                Action::CloseModal | Action::ModalBackdrop | Action::Escape,
            ) => {
                let was_open = a.is_open();
                a.close(&mut effects);
                was_open
            }
            (SectionView::Sounds(q), Action::PlaySound) => {
                q.play_target(&mut effects);
                true
            }
            (SectionView::Sounds(q), Action::Answer(pos)) => {
                q.answer(pos, &mut effects);
                true
            }
            (SectionView::Sounds(q), Action::NextSound) => {
                q.next(rng);
                true
            }
            (SectionView::Words(w), Action::PlayWord(i)) => {
                w.play_word(i, &mut effects);
                true
            }
            (SectionView::Words(w), Action::PlayTarget) => {
                w.play_target(&mut effects);
                true
            }
            (SectionView::Words(w), Action::DropTile { tile, slot }) => w.drop_tile(tile, slot),
            (SectionView::Words(w), Action::CheckWord) => {
                w.check(&mut effects);
                true
            }
            (SectionView::Words(w), Action::NextWord) => {
                w.next(rng);
                true
            }
            (SectionView::Phrases(p), Action::SelectPhrase(pos)) => {
                p.select(Column::Phrases, pos, &mut effects);
                true
            }
            (SectionView::Phrases(p), Action::SelectImage(pos)) => {
                p.select(Column::Images, pos, &mut effects);
                true
            }
            (SectionView::Phrases(p), Action::CheckPhrases) => {
                p.check();
                true
            }
            (SectionView::Phrases(p), Action::ResetPhrases) => {
                p.reset(rng);
                true
            }
            (SectionView::Phrases(p), Action::PlayPhrase(i)) => {
                p.play_phrase(i, &mut effects);
                true
            }
            (_, action) => {
                log::trace!("{action:?} does not apply to the live section");
                false
            }
        };
        let applied = !effects.is_empty();
        self.apply(effects, now_ms);
        handled || applied
    }

    /// Fire every timer due at `now_ms`. Returns true when anything fired.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let due = self.timers.drain_due(now_ms);
        if due.is_empty() {
            return false;
        }
        for timer in due {
            match timer {
                SessionTimer::BadgeExpiry(clip) => self.audio.clear_badge(clip),
                SessionTimer::Game(timer) => {
                    let rng = &mut self.rng;
                    match self.view.as_mut() {
                        Some(SectionView::Alphabet(a)) => a.on_timer(timer),
                        Some(SectionView::Words(w)) => w.on_timer(timer, rng),
                        Some(SectionView::Phrases(p)) => p.on_timer(timer),
                        Some(SectionView::Sounds(_)) | None => {}
                    }
                }
            }
        }
        true
    }

    /// Media callback: playback of `clip` began. The badge stays for the
    /// configured time even if the clip ends sooner.
    pub fn on_audio_playing(&mut self, clip: ClipId, now_ms: f64) -> bool {
        match self.audio.on_playing(clip) {
            Some(badge) => {
                self.timers.schedule(
                    now_ms,
                    self.config.badge_ms,
                    SessionTimer::BadgeExpiry(badge.clip),
                );
                true
            }
            None => false,
        }
    }

    pub fn on_audio_ended(&mut self, clip: ClipId) {
        self.audio.on_ended(clip);
    }

    pub fn on_audio_error(&mut self, clip: ClipId, reason: &str) {
        self.audio.on_error(clip, reason);
    }

    pub fn render(&self) -> String {
        let ctx = RenderCtx {
            now_playing: self.audio.badge().map(|b| b.target.as_str()),
            placeholder_image: &self.config.placeholder_image,
        };
        match &self.view {
            Some(SectionView::Alphabet(a)) => a.render(&ctx),
            Some(SectionView::Sounds(q)) => q.render(&ctx),
            Some(SectionView::Words(w)) => w.render(&ctx),
            Some(SectionView::Phrases(p)) => p.render(&ctx),
            None => String::new(),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, now_ms: f64) {
        for effect in effects {
            match effect {
                Effect::Play { file, target } => {
                    self.audio.play(&file, target.as_deref());
                }
                Effect::SaveScore { section, score } => {
                    score::save_score(&self.store, &self.config.storage_key, section, score);
                }
                Effect::Schedule { delay, timer } => {
                    let ms = self.delay_ms(delay);
                    self.timers.schedule(now_ms, ms, SessionTimer::Game(timer));
                }
            }
        }
    }

    fn delay_ms(&self, delay: Delay) -> f64 {
        match delay {
            Delay::ModalClose => self.config.modal_close_ms,
            Delay::Feedback => self.config.feedback_ms,
            Delay::WordReset => self.config.word_reset_ms,
        }
    }
}
