//! Word builder: drag shuffled letter tiles into positional slots.

use std::fmt::Write;
use std::rc::Rc;

use rand::seq::SliceRandom;

use super::{Delay, Effect, GameTimer, play};
use crate::lesson::{Lessons, WordRecord};
use crate::markup::{RenderCtx, action_attr, escape, hidden, section_header};
use crate::rng::LessonRng;
use crate::section::Section;

/// Score credited per solved word.
pub const WORD_SCORE: u32 = 1;
const LISTEN_KEY: &str = "word-listen";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordFeedback {
    None,
    /// Check pressed with empty slots.
    Incomplete,
    Correct,
    /// Wrong order; slots reset when the retry timer fires.
    Retry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankTile {
    pub letter: String,
    pub placed: bool,
}

#[derive(Clone, Debug)]
struct BuildRound {
    target: usize,
    bank: Vec<BankTile>,
    /// Bank tile index per slot.
    slots: Vec<Option<usize>>,
}

pub struct WordBuilder {
    lessons: Rc<Lessons>,
    queue: Vec<usize>,
    round: Option<BuildRound>,
    round_no: u32,
    feedback: WordFeedback,
}

impl WordBuilder {
    pub fn new(lessons: Rc<Lessons>, rng: &mut LessonRng) -> Self {
        let mut queue: Vec<usize> = (0..lessons.words.len()).collect();
        queue.shuffle(rng);
        let mut builder = Self {
            lessons,
            queue,
            round: None,
            round_no: 0,
            feedback: WordFeedback::None,
        };
        builder.start_round(rng);
        builder
    }

    pub fn target(&self) -> Option<&WordRecord> {
        self.round.as_ref().map(|r| &self.lessons.words[r.target])
    }

    pub fn feedback(&self) -> WordFeedback {
        self.feedback
    }

    pub fn solved(&self) -> bool {
        self.feedback == WordFeedback::Correct
    }

    pub fn bank(&self) -> &[BankTile] {
        self.round.as_ref().map(|r| r.bank.as_slice()).unwrap_or_default()
    }

    /// Letters currently sitting in the slots, positional.
    pub fn slots(&self) -> Vec<Option<&str>> {
        let Some(round) = &self.round else {
            return Vec::new();
        };
        round
            .slots
            .iter()
            .map(|s| s.map(|t| round.bank[t].letter.as_str()))
            .collect()
    }

    fn start_round(&mut self, rng: &mut LessonRng) {
        self.round_no = self.round_no.wrapping_add(1);
        self.feedback = WordFeedback::None;
        self.round = self.queue.first().map(|&target| {
            let mut round = BuildRound {
                target,
                bank: Vec::new(),
                slots: Vec::new(),
            };
            self.deal(&mut round, rng);
            round
        });
    }

    /// One empty slot per character, bank reshuffled.
    fn deal(&self, round: &mut BuildRound, rng: &mut LessonRng) {
        let mut letters: Vec<String> = self.lessons.words[round.target]
            .word
            .chars()
            .map(String::from)
            .collect();
        round.slots = vec![None; letters.len()];
        letters.shuffle(rng);
        round.bank = letters
            .into_iter()
            .map(|letter| BankTile {
                letter,
                placed: false,
            })
            .collect();
    }

    /// Drop bank tile `tile` on slot `slot`. Filled slots and already placed
    /// tiles reject the drop; there is no undo.
    pub fn drop_tile(&mut self, tile: usize, slot: usize) -> bool {
        if self.solved() {
            return false;
        }
        let Some(round) = &mut self.round else {
            return false;
        };
        let free_slot = matches!(round.slots.get(slot), Some(None));
        let free_tile = round.bank.get(tile).is_some_and(|t| !t.placed);
        if !(free_slot && free_tile) {
            return false;
        }
        round.slots[slot] = Some(tile);
        round.bank[tile].placed = true;
        if self.feedback == WordFeedback::Incomplete {
            self.feedback = WordFeedback::None;
        }
        true
    }

    pub fn check(&mut self, out: &mut Vec<Effect>) {
        if matches!(self.feedback, WordFeedback::Correct | WordFeedback::Retry) {
            return;
        }
        let Some(target) = self.target() else {
            return;
        };
        let slots = self.slots();
        if slots.iter().any(Option::is_none) {
            self.feedback = WordFeedback::Incomplete;
            return;
        }
        let built: String = slots.into_iter().flatten().collect();
        if built == target.word {
            log::info!("word built: {built}");
            self.feedback = WordFeedback::Correct;
            out.push(Effect::SaveScore {
                section: Section::Words,
                score: WORD_SCORE,
            });
        } else {
            log::debug!("word attempt {built} != {}", target.word);
            self.feedback = WordFeedback::Retry;
            out.push(Effect::Schedule {
                delay: Delay::WordReset,
                timer: GameTimer::ResetWord {
                    round: self.round_no,
                },
            });
        }
    }

    /// Retry delay elapsed: clear the slots and reshuffle the same word.
    pub fn on_timer(&mut self, timer: GameTimer, rng: &mut LessonRng) {
        let GameTimer::ResetWord { round } = timer else {
            return;
        };
        if round != self.round_no || self.feedback != WordFeedback::Retry {
            return;
        }
        if let Some(mut r) = self.round.take() {
            self.deal(&mut r, rng);
            self.round = Some(r);
        }
        self.feedback = WordFeedback::None;
    }

    /// Only available once the current word is solved.
    pub fn next(&mut self, rng: &mut LessonRng) {
        if !self.solved() {
            return;
        }
        self.queue.rotate_left(1);
        self.start_round(rng);
    }

    pub fn play_word(&self, index: usize, out: &mut Vec<Effect>) {
        if let Some(word) = self.lessons.words.get(index) {
            play(out, &word.audio_file, format!("word-{index}"));
        }
    }

    pub fn play_target(&self, out: &mut Vec<Effect>) {
        if let Some(word) = self.target() {
            play(out, &word.audio_file, LISTEN_KEY);
        }
    }

    pub fn render(&self, ctx: &RenderCtx) -> String {
        let mut out = String::new();
        section_header(&mut out, Section::Words);
        out.push_str(r#"<div class="words-container"><div class="word-cards">"#);
        for (i, word) in self.lessons.words.iter().enumerate() {
            let key = format!("word-{i}");
            let _ = write!(out, r#"<div class="word-card{}"><div class="word-card-image">"#, ctx.playing_class(&key));
            ctx.image(&mut out, &word.image_file, &word.meaning);
            let _ = write!(
                out,
                r#"</div><div class="word-card-text"><div class="word-text">{w}</div><div class="word-transliteration">{tr}</div><div class="word-meaning">{m}</div></div><button class="play-button" {attr}><span class="play-icon">▶</span> Play Sound</button>"#,
                w = escape(&word.word),
                tr = escape(&word.transliteration),
                m = escape(&word.meaning),
                attr = action_attr("play-word", Some(i)),
            );
            ctx.badge(&mut out, &key);
            out.push_str("</div>");
        }
        out.push_str(r#"</div><div class="word-game"><h3>ቃላቱን ይመስርቱ (Build the Word)</h3>"#);

        let Some(target) = self.target() else {
            out.push_str(r#"<div class="word-feedback">No words to build yet.</div></div></div>"#);
            return out;
        };
        out.push_str(r#"<div class="current-word-display"><div class="word-image">"#);
        ctx.image(&mut out, &target.image_file, &target.meaning);
        let _ = write!(
            out,
            r#"</div><div class="word-audio-box"><div class="word-meaning">{m}</div><button class="play-word-audio{playing}" {attr}>▶ ያዳምጡ (Listen)</button>"#,
            m = escape(&target.meaning),
            playing = ctx.playing_class(LISTEN_KEY),
            attr = action_attr("play-target", None),
        );
        ctx.badge(&mut out, LISTEN_KEY);
        let success = if self.solved() { " success" } else { "" };
        let _ = write!(out, r#"</div></div><div class="letter-drop-area{success}">"#);
        for (i, slot) in self.slots().into_iter().enumerate() {
            let _ = write!(out, r#"<div class="letter-drop-box" data-slot="{i}">"#);
            if let Some(letter) = slot {
                let _ = write!(out, r#"<div class="bank-letter dropped" draggable="false">{}</div>"#, escape(letter));
            }
            out.push_str("</div>");
        }
        out.push_str(r#"</div><div class="letter-bank">"#);
        for (i, tile) in self.bank().iter().enumerate() {
            let vis = if tile.placed { r#" style="visibility:hidden;""# } else { "" };
            let _ = write!(
                out,
                r#"<div class="bank-letter" draggable="{drag}" data-bank-index="{i}"{vis}>{l}</div>"#,
                drag = !tile.placed,
                l = escape(&tile.letter),
            );
        }
        out.push_str(r#"</div><div class="word-feedback">"#);
        out.push_str(match self.feedback {
            WordFeedback::None => "",
            WordFeedback::Incomplete => {
                r#"<div class="incorrect-feedback">ሁሉንም ፊደሎች ሳጥኑ ውስጥ ያስገቡ! (Drop all letters first!)</div>"#
            }
            WordFeedback::Correct => r#"<div class="correct-feedback">ትክክል! (Good job!)</div>"#,
            WordFeedback::Retry => r#"<div class="incorrect-feedback">ድጋሚ ይሞክሩ! (Try again!)</div>"#,
        });
        let _ = write!(
            out,
            r#"</div><button class="check-word-btn" {check}{hide_check}>ያረጋግጡ (Check)</button><button class="next-word-btn" {next}{hide_next}>ቀጣይ (Next)</button></div></div>"#,
            check = action_attr("check-word", None),
            hide_check = hidden(!self.solved()),
            next = action_attr("next-word", None),
            hide_next = hidden(self.solved()),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn lessons(words: &[&str]) -> Rc<Lessons> {
        Rc::new(Lessons {
            words: words
                .iter()
                .map(|w| WordRecord {
                    word: w.to_string(),
                    transliteration: "t".into(),
                    meaning: format!("meaning of {w}"),
                    audio_file: format!("static/audio/words/{w}.mp3"),
                    image_file: format!("static/images/{w}.png"),
                })
                .collect(),
            ..Lessons::default()
        })
    }

    /// Place every tile so the slots spell `target`.
    fn spell(b: &mut WordBuilder, target: &str) {
        for (slot, ch) in target.chars().enumerate() {
            let tile = b
                .bank()
                .iter()
                .position(|t| !t.placed && t.letter == ch.to_string())
                .unwrap();
            assert!(b.drop_tile(tile, slot));
        }
    }

    #[test]
    fn slots_and_bank_match_word_length() {
        let b = WordBuilder::new(lessons(&["ቤት"]), &mut LessonRng::seed_from_u64(1));
        assert_eq!(b.slots(), vec![None, None]);
        let mut bank: Vec<_> = b.bank().iter().map(|t| t.letter.clone()).collect();
        bank.sort();
        let mut expected = vec!["ቤ".to_string(), "ት".to_string()];
        expected.sort();
        assert_eq!(bank, expected);
    }

    #[test]
    fn filled_slot_rejects_drop() {
        let mut b = WordBuilder::new(lessons(&["ቡና"]), &mut LessonRng::seed_from_u64(2));
        assert!(b.drop_tile(0, 0));
        assert!(!b.drop_tile(1, 0));
        assert!(!b.drop_tile(0, 1));
        assert!(!b.drop_tile(7, 1));
        assert!(b.bank()[0].placed);
        assert!(!b.bank()[1].placed);
    }

    #[test]
    fn incomplete_check_changes_nothing() {
        let mut b = WordBuilder::new(lessons(&["ቡና"]), &mut LessonRng::seed_from_u64(3));
        b.drop_tile(0, 0);
        let mut out = Vec::new();
        b.check(&mut out);
        assert_eq!(b.feedback(), WordFeedback::Incomplete);
        assert!(out.is_empty());
        assert_eq!(b.slots().iter().filter(|s| s.is_some()).count(), 1);
    }

    #[test]
    fn correct_build_saves_and_reveals_next() {
        let mut b = WordBuilder::new(lessons(&["ቡና", "ዳቦ"]), &mut LessonRng::seed_from_u64(4));
        let word = b.target().unwrap().word.clone();
        spell(&mut b, &word);
        let mut out = Vec::new();
        b.check(&mut out);
        assert!(b.solved());
        assert_eq!(
            out,
            vec![Effect::SaveScore {
                section: Section::Words,
                score: WORD_SCORE
            }]
        );
        let html = b.render(&RenderCtx::default());
        assert!(html.contains("letter-drop-area success"));
        assert!(html.contains(r#"data-action="check-word" style="display:none;""#));
        assert!(!html.contains(r#"data-action="next-word" style="display:none;""#));
    }

    #[test]
    fn wrong_build_schedules_reset_of_same_word() {
        let mut rng = LessonRng::seed_from_u64(5);
        let mut b = WordBuilder::new(lessons(&["ቡና"]), &mut rng);
        let reversed: String = "ቡና".chars().rev().collect();
        spell(&mut b, &reversed);
        let mut out = Vec::new();
        b.check(&mut out);
        assert_eq!(b.feedback(), WordFeedback::Retry);
        let Some(Effect::Schedule { delay, timer }) = out.pop() else {
            panic!("retry must schedule a reset");
        };
        assert_eq!(delay, Delay::WordReset);
        // Still showing the wrong attempt until the timer fires.
        assert!(b.slots().iter().all(Option::is_some));
        b.on_timer(timer, &mut rng);
        assert_eq!(b.feedback(), WordFeedback::None);
        assert!(b.slots().iter().all(Option::is_none));
        assert!(b.bank().iter().all(|t| !t.placed));
        assert_eq!(b.target().unwrap().word, "ቡና");
    }

    #[test]
    fn next_rotates_queue_after_success_only() {
        let mut rng = LessonRng::seed_from_u64(6);
        let mut b = WordBuilder::new(lessons(&["ቡና", "ዳቦ", "ልጅ"]), &mut rng);
        let first = b.target().unwrap().word.clone();
        b.next(&mut rng);
        assert_eq!(b.target().unwrap().word, first);
        spell(&mut b, &first);
        b.check(&mut Vec::new());
        b.next(&mut rng);
        assert_ne!(b.target().unwrap().word, first);
        assert_eq!(b.feedback(), WordFeedback::None);
    }

    #[test]
    fn stale_reset_is_ignored_after_next() {
        let mut rng = LessonRng::seed_from_u64(7);
        let mut b = WordBuilder::new(lessons(&["ቡና", "ዳቦ"]), &mut rng);
        let stale = GameTimer::ResetWord { round: 0 };
        b.drop_tile(0, 0);
        b.on_timer(stale, &mut rng);
        assert_eq!(b.slots().iter().filter(|s| s.is_some()).count(), 1);
    }

    #[test]
    fn empty_word_list_renders_placeholder() {
        let b = WordBuilder::new(lessons(&[]), &mut LessonRng::seed_from_u64(1));
        assert!(b.target().is_none());
        assert!(b.render(&RenderCtx::default()).contains("No words to build yet."));
    }
}
