//! Phrase-to-image matching board.

use std::fmt::Write;
use std::rc::Rc;

use rand::seq::SliceRandom;

use super::{Delay, Effect, GameTimer, play};
use crate::lesson::{Lessons, PhraseRecord};
use crate::markup::{RenderCtx, action_attr, escape, section_header};
use crate::rng::LessonRng;
use crate::section::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhraseFeedback {
    None,
    /// Transient, cleared by timer.
    TryAgain,
    Complete,
    /// Answer to the check button while pairs remain.
    Progress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Phrases,
    Images,
}

pub struct PhraseMatch {
    lessons: Rc<Lessons>,
    /// Record indices in display order per column.
    phrase_order: Vec<usize>,
    image_order: Vec<usize>,
    /// Per record and column. Records sharing phrase text can pair across,
    /// so a phrase and its own image are not necessarily matched together.
    phrase_matched: Vec<bool>,
    image_matched: Vec<bool>,
    selected_phrase: Option<usize>,
    selected_image: Option<usize>,
    matched_count: usize,
    feedback: PhraseFeedback,
    generation: u32,
}

impl PhraseMatch {
    pub fn new(lessons: Rc<Lessons>, rng: &mut LessonRng) -> Self {
        let n = lessons.phrases.len();
        let mut game = Self {
            lessons,
            phrase_order: Vec::new(),
            image_order: Vec::new(),
            phrase_matched: vec![false; n],
            image_matched: vec![false; n],
            selected_phrase: None,
            selected_image: None,
            matched_count: 0,
            feedback: PhraseFeedback::None,
            generation: 0,
        };
        game.reset(rng);
        game
    }

    fn phrases(&self) -> &[PhraseRecord] {
        &self.lessons.phrases
    }

    pub fn total(&self) -> usize {
        self.phrases().len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn feedback(&self) -> PhraseFeedback {
        self.feedback
    }

    pub fn phrase_order(&self) -> &[usize] {
        &self.phrase_order
    }

    pub fn image_order(&self) -> &[usize] {
        &self.image_order
    }

    pub fn is_matched(&self, column: Column, record: usize) -> bool {
        let matched = match column {
            Column::Phrases => &self.phrase_matched,
            Column::Images => &self.image_matched,
        };
        matched.get(record).copied().unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.total() > 0 && self.matched_count == self.total()
    }

    /// Fresh independent shuffles of both columns; all matches cleared.
    pub fn reset(&mut self, rng: &mut LessonRng) {
        let n = self.total();
        self.phrase_order = (0..n).collect();
        self.image_order = (0..n).collect();
        self.phrase_order.shuffle(rng);
        self.image_order.shuffle(rng);
        self.phrase_matched = vec![false; n];
        self.image_matched = vec![false; n];
        self.matched_count = 0;
        self.selected_phrase = None;
        self.selected_image = None;
        self.feedback = PhraseFeedback::None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Click on the `pos`-th element of `column`. Evaluates as soon as both
    /// columns hold a selection.
    pub fn select(&mut self, column: Column, pos: usize, out: &mut Vec<Effect>) {
        let order = match column {
            Column::Phrases => &self.phrase_order,
            Column::Images => &self.image_order,
        };
        let Some(&record) = order.get(pos) else {
            return;
        };
        if self.is_matched(column, record) {
            return;
        }
        match column {
            Column::Phrases => self.selected_phrase = Some(record),
            Column::Images => self.selected_image = Some(record),
        }
        if let (Some(p), Some(i)) = (self.selected_phrase, self.selected_image) {
            self.evaluate(p, i, out);
        }
    }

    fn evaluate(&mut self, phrase: usize, image: usize, out: &mut Vec<Effect>) {
        let is_match = self.phrases()[phrase].phrase == self.phrases()[image].phrase;
        if is_match {
            self.phrase_matched[phrase] = true;
            self.image_matched[image] = true;
            self.matched_count += 1;
            if self.is_complete() {
                log::info!("all {} phrases matched", self.total());
                self.feedback = PhraseFeedback::Complete;
                out.push(Effect::SaveScore {
                    section: Section::Phrases,
                    score: self.total() as u32,
                });
            }
        } else {
            self.feedback = PhraseFeedback::TryAgain;
            self.generation = self.generation.wrapping_add(1);
            out.push(Effect::Schedule {
                delay: Delay::Feedback,
                timer: GameTimer::ClearPhraseFeedback {
                    generation: self.generation,
                },
            });
        }
        self.selected_phrase = None;
        self.selected_image = None;
    }

    pub fn check(&mut self) {
        self.feedback = if self.is_complete() {
            PhraseFeedback::Complete
        } else {
            PhraseFeedback::Progress
        };
    }

    pub fn on_timer(&mut self, timer: GameTimer) {
        if let GameTimer::ClearPhraseFeedback { generation } = timer {
            if generation == self.generation && self.feedback == PhraseFeedback::TryAgain {
                self.feedback = PhraseFeedback::None;
            }
        }
    }

    pub fn play_phrase(&self, index: usize, out: &mut Vec<Effect>) {
        if let Some(p) = self.phrases().get(index) {
            play(out, &p.audio_file, format!("phrase-{index}"));
        }
    }

    pub fn render(&self, ctx: &RenderCtx) -> String {
        let mut out = String::new();
        section_header(&mut out, Section::Phrases);
        out.push_str(r#"<div class="phrases-container"><div class="phrase-cards">"#);
        for (i, p) in self.phrases().iter().enumerate() {
            let key = format!("phrase-{i}");
            let _ = write!(
                out,
                r#"<div class="phrase-card{playing}"><div class="phrase-card-content"><div class="phrase-text">{ph}</div><div class="phrase-transliteration">{tr}</div><div class="phrase-meaning">{m}</div></div><div class="phrase-card-image">"#,
                playing = ctx.playing_class(&key),
                ph = escape(&p.phrase),
                tr = escape(&p.transliteration),
                m = escape(&p.meaning),
            );
            ctx.image(&mut out, &p.image_file, &p.meaning);
            let _ = write!(
                out,
                r#"</div><button class="play-button" {}><span class="play-icon">▶</span> Play Sound</button>"#,
                action_attr("play-phrase", Some(i))
            );
            ctx.badge(&mut out, &key);
            out.push_str("</div>");
        }
        out.push_str(r#"</div><div class="phrase-game"><h3>ቃላቱን ከምስሉ ጋር ያዛምዱ (Match the phrases with their images)</h3><div class="match-game-container"><div class="phrases-column">"#);
        for (pos, &r) in self.phrase_order.iter().enumerate() {
            let p = &self.phrases()[r];
            let _ = write!(
                out,
                r#"<div class="match-phrase{state}" data-id="{id}" {attr}><div class="phrase-text">{id}</div><div class="phrase-transliteration">{tr}</div></div>"#,
                state = self.item_class(Column::Phrases, r, self.selected_phrase),
                id = escape(&p.phrase),
                tr = escape(&p.transliteration),
                attr = self.item_attr(Column::Phrases, "select-phrase", r, pos),
            );
        }
        out.push_str(r#"</div><div class="images-column">"#);
        for (pos, &r) in self.image_order.iter().enumerate() {
            let p = &self.phrases()[r];
            let _ = write!(
                out,
                r#"<div class="match-image{state}" data-id="{id}" {attr}>"#,
                state = self.item_class(Column::Images, r, self.selected_image),
                id = escape(&p.phrase),
                attr = self.item_attr(Column::Images, "select-image", r, pos),
            );
            ctx.image(&mut out, &p.image_file, &p.meaning);
            out.push_str("</div>");
        }
        out.push_str(r#"</div></div><div class="phrase-feedback">"#);
        match self.feedback {
            PhraseFeedback::None => {}
            PhraseFeedback::TryAgain => {
                out.push_str(r#"<div class="incorrect-feedback"> ዳግም ይሞክሩ! (Try again!)</div>"#)
            }
            PhraseFeedback::Complete => out.push_str(
                r#"<div class="correct-feedback">ትክክል! ሁሉንም አዛምደዋል! (Great! You matched all the phrases!)</div>"#,
            ),
            PhraseFeedback::Progress => {
                let _ = write!(
                    out,
                    r#"<div class="in-progress-feedback"> ድጋሚ ይሞክሩ! (Keep trying! {} of {} matched.)</div>"#,
                    self.matched_count,
                    self.total()
                );
            }
        }
        let _ = write!(
            out,
            r#"</div><button class="check-phrases-btn" {}>ያረጋግጡ (Check)</button><button class="reset-phrases-btn" {}>በድጋሚ አስጀምር (Reset)</button></div></div>"#,
            action_attr("check-phrases", None),
            action_attr("reset-phrases", None),
        );
        out
    }

    fn item_class(&self, column: Column, record: usize, selected: Option<usize>) -> &'static str {
        if self.is_matched(column, record) {
            " matched"
        } else if selected == Some(record) {
            " selected"
        } else {
            ""
        }
    }

    /// Matched items are inert: no action attribute.
    fn item_attr(&self, column: Column, action: &str, record: usize, pos: usize) -> String {
        if self.is_matched(column, record) {
            String::new()
        } else {
            action_attr(action, Some(pos))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn lessons(phrases: &[&str]) -> Rc<Lessons> {
        Rc::new(Lessons {
            phrases: phrases
                .iter()
                .map(|p| PhraseRecord {
                    phrase: p.to_string(),
                    transliteration: "t".into(),
                    meaning: format!("meaning of {p}"),
                    audio_file: format!("static/audio/phrases/{p}.mp3"),
                    image_file: format!("static/images/{p}.png"),
                })
                .collect(),
            ..Lessons::default()
        })
    }

    fn pos_of(order: &[usize], record: usize) -> usize {
        order.iter().position(|&r| r == record).unwrap()
    }

    #[test]
    fn columns_are_permutations_of_records() {
        let g = PhraseMatch::new(lessons(&["ሰላም", "እንደምን ነህ", "አመሰግናለሁ"]), &mut LessonRng::seed_from_u64(1));
        for order in [g.phrase_order(), g.image_order()] {
            let mut sorted = order.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec![0, 1, 2]);
        }
    }

    #[test]
    fn mismatch_never_counts() {
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ"]), &mut LessonRng::seed_from_u64(2));
        let mut out = Vec::new();
        let p = pos_of(g.phrase_order(), 0);
        let i = pos_of(g.image_order(), 1);
        g.select(Column::Phrases, p, &mut out);
        g.select(Column::Images, i, &mut out);
        assert_eq!(g.matched_count(), 0);
        assert_eq!(g.feedback(), PhraseFeedback::TryAgain);
        let Some(Effect::Schedule { timer, .. }) = out.pop() else {
            panic!("mismatch must schedule feedback expiry");
        };
        g.on_timer(timer);
        assert_eq!(g.feedback(), PhraseFeedback::None);
    }

    #[test]
    fn match_counts_once_and_disables_both() {
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ"]), &mut LessonRng::seed_from_u64(3));
        let mut out = Vec::new();
        let p = pos_of(g.phrase_order(), 1);
        let i = pos_of(g.image_order(), 1);
        g.select(Column::Images, i, &mut out);
        g.select(Column::Phrases, p, &mut out);
        assert_eq!(g.matched_count(), 1);
        assert!(g.is_matched(Column::Phrases, 1));
        assert!(g.is_matched(Column::Images, 1));
        // Matched elements ignore further clicks.
        g.select(Column::Phrases, p, &mut out);
        g.select(Column::Images, i, &mut out);
        assert_eq!(g.matched_count(), 1);
        assert!(out.is_empty());
        let html = g.render(&RenderCtx::default());
        assert_eq!(html.matches(" matched\"").count(), 2);
    }

    #[test]
    fn selection_replaces_within_column() {
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ", "ቡና"]), &mut LessonRng::seed_from_u64(4));
        let mut out = Vec::new();
        g.select(Column::Phrases, pos_of(g.phrase_order(), 0), &mut out);
        g.select(Column::Phrases, pos_of(g.phrase_order(), 2), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 2), &mut out);
        assert!(g.is_matched(Column::Images, 2));
        assert!(!g.is_matched(Column::Phrases, 0));
    }

    #[test]
    fn completion_saves_total() {
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ"]), &mut LessonRng::seed_from_u64(5));
        let mut out = Vec::new();
        for r in 0..2 {
            g.select(Column::Phrases, pos_of(g.phrase_order(), r), &mut out);
            g.select(Column::Images, pos_of(g.image_order(), r), &mut out);
        }
        assert!(g.is_complete());
        assert_eq!(g.feedback(), PhraseFeedback::Complete);
        assert_eq!(
            out,
            vec![Effect::SaveScore {
                section: Section::Phrases,
                score: 2
            }]
        );
    }

    #[test]
    fn duplicate_phrase_text_pairs_across_records() {
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "ሰላም", "ቡና"]), &mut LessonRng::seed_from_u64(8));
        let mut out = Vec::new();
        g.select(Column::Phrases, pos_of(g.phrase_order(), 0), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 1), &mut out);
        assert_eq!(g.matched_count(), 1);
        assert!(g.is_matched(Column::Phrases, 0) && g.is_matched(Column::Images, 1));
        assert!(!g.is_matched(Column::Phrases, 1) && !g.is_matched(Column::Images, 0));
        let html = g.render(&RenderCtx::default());
        assert_eq!(html.matches(" matched\"").count(), 2);

        // The leftover twin of each column still pairs up.
        g.select(Column::Phrases, pos_of(g.phrase_order(), 1), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 0), &mut out);
        g.select(Column::Phrases, pos_of(g.phrase_order(), 2), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 2), &mut out);
        assert!(g.is_complete());
        assert_eq!(
            out,
            vec![Effect::SaveScore {
                section: Section::Phrases,
                score: 3
            }]
        );
    }

    #[test]
    fn check_reports_progress_and_reset_clears() {
        let mut rng = LessonRng::seed_from_u64(6);
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ"]), &mut rng);
        let mut out = Vec::new();
        g.select(Column::Phrases, pos_of(g.phrase_order(), 0), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 0), &mut out);
        g.check();
        assert_eq!(g.feedback(), PhraseFeedback::Progress);
        assert!(g.render(&RenderCtx::default()).contains("Keep trying! 1 of 2 matched."));
        g.reset(&mut rng);
        assert_eq!(g.matched_count(), 0);
        assert!(!g.is_matched(Column::Phrases, 0));
        assert_eq!(g.feedback(), PhraseFeedback::None);
    }

    #[test]
    fn stale_feedback_timer_after_reset_is_ignored() {
        let mut rng = LessonRng::seed_from_u64(7);
        let mut g = PhraseMatch::new(lessons(&["ሰላም", "እባክዎ"]), &mut rng);
        let mut out = Vec::new();
        g.select(Column::Phrases, pos_of(g.phrase_order(), 0), &mut out);
        g.select(Column::Images, pos_of(g.image_order(), 1), &mut out);
        let Some(Effect::Schedule { timer, .. }) = out.pop() else {
            panic!("expected timer");
        };
        g.reset(&mut rng);
        g.check();
        g.on_timer(timer);
        assert_eq!(g.feedback(), PhraseFeedback::Progress);
    }
}
