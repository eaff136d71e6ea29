//! Sound-matching quiz: hear a letter, pick it from three options.

use std::fmt::Write;
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{Effect, play};
use crate::lesson::{LetterRecord, Lessons};
use crate::markup::{RenderCtx, action_attr, escape, hidden, section_header};
use crate::rng::LessonRng;
use crate::section::Section;

const OPTION_COUNT: usize = 3;
const PLAY_KEY: &str = "play-sound";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    /// No round (not enough distinct letters).
    Idle,
    RoundActive,
    Answered,
}

/// Highlight on an option button after answering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    Plain,
    Correct,
    Incorrect,
}

#[derive(Clone, Debug)]
struct Round {
    target: usize,
    /// Indices into the alphabet, display order.
    options: Vec<usize>,
    chosen: Option<usize>,
}

pub struct SoundQuiz {
    lessons: Rc<Lessons>,
    pool: Vec<usize>,
    round: Option<Round>,
    state: QuizState,
    score: u32,
}

impl SoundQuiz {
    pub fn new(lessons: Rc<Lessons>, rng: &mut LessonRng) -> Self {
        let pool = (0..lessons.alphabet.len()).collect();
        let mut quiz = Self {
            lessons,
            pool,
            round: None,
            state: QuizState::Idle,
            score: 0,
        };
        quiz.start_round(rng);
        quiz
    }

    fn letter(&self, i: usize) -> &LetterRecord {
        &self.lessons.alphabet[i]
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target(&self) -> Option<&LetterRecord> {
        self.round.as_ref().map(|r| self.letter(r.target))
    }

    pub fn options(&self) -> Vec<&LetterRecord> {
        self.round
            .iter()
            .flat_map(|r| r.options.iter().map(|&i| self.letter(i)))
            .collect()
    }

    pub fn marks(&self) -> Vec<Mark> {
        let Some(round) = &self.round else {
            return Vec::new();
        };
        round
            .options
            .iter()
            .enumerate()
            .map(|(pos, &i)| match round.chosen {
                None => Mark::Plain,
                Some(_) if self.same_glyph(i, round.target) => Mark::Correct,
                Some(c) if c == pos => Mark::Incorrect,
                Some(_) => Mark::Plain,
            })
            .collect()
    }

    fn same_glyph(&self, a: usize, b: usize) -> bool {
        self.letter(a).glyph == self.letter(b).glyph
    }

    fn distinct_glyphs(&self) -> usize {
        let mut glyphs: Vec<&str> = self.pool.iter().map(|&i| self.letter(i).glyph.as_str()).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        glyphs.len()
    }

    /// Shuffle, take the first letter as target and draw two distinct
    /// distractors.
    pub fn start_round(&mut self, rng: &mut LessonRng) {
        if self.distinct_glyphs() < OPTION_COUNT {
            log::warn!("sound quiz needs {OPTION_COUNT} distinct letters");
            self.round = None;
            self.state = QuizState::Idle;
            return;
        }
        self.pool.shuffle(rng);
        let target = self.pool[0];
        let mut options = vec![target];
        while options.len() < OPTION_COUNT {
            let candidate = self.pool[rng.gen_range(0..self.pool.len())];
            if !options.iter().any(|&o| self.same_glyph(o, candidate)) {
                options.push(candidate);
            }
        }
        options.shuffle(rng);
        self.round = Some(Round {
            target,
            options,
            chosen: None,
        });
        self.state = QuizState::RoundActive;
    }

    /// Click on option `pos`. Only the first answer of a round counts.
    pub fn answer(&mut self, pos: usize, out: &mut Vec<Effect>) {
        if self.state != QuizState::RoundActive {
            return;
        }
        let Some(round) = &self.round else {
            return;
        };
        let Some(&picked) = round.options.get(pos) else {
            return;
        };
        let correct = self.same_glyph(picked, round.target);
        if let Some(round) = &mut self.round {
            round.chosen = Some(pos);
        }
        self.state = QuizState::Answered;
        if correct {
            self.score += 1;
            out.push(Effect::SaveScore {
                section: Section::Sounds,
                score: self.score,
            });
        }
    }

    pub fn next(&mut self, rng: &mut LessonRng) {
        if self.state == QuizState::Answered {
            self.start_round(rng);
        }
    }

    pub fn play_target(&self, out: &mut Vec<Effect>) {
        if let Some(target) = self.target() {
            play(out, &target.audio_file, PLAY_KEY);
        }
    }

    pub fn render(&self, ctx: &RenderCtx) -> String {
        let mut out = String::new();
        section_header(&mut out, Section::Sounds);
        let answered = self.state == QuizState::Answered;
        let revealed = match (&self.round, answered) {
            (Some(r), true) => escape(&self.letter(r.target).glyph),
            _ => String::new(),
        };
        let _ = write!(
            out,
            r#"<div class="sounds-container"><div class="score-display">ነጥብ (Score): <span id="current-score">{score}</span></div><div class="sound-game"><div class="game-prompt">ይህን ድምጽ ያድምጡ (Listen to this sound)</div><div class="letter-to-guess">{revealed}</div><button class="play-sound-btn{playing}" {play}>▶ ድምጽ ያድምጡ (Play Sound)</button>"#,
            score = self.score,
            playing = ctx.playing_class(PLAY_KEY),
            play = action_attr("play-sound", None),
        );
        ctx.badge(&mut out, PLAY_KEY);
        out.push_str(r#"<div class="options-container">"#);
        for (pos, (letter, mark)) in self.options().into_iter().zip(self.marks()).enumerate() {
            let class = match mark {
                Mark::Plain => "",
                Mark::Correct => " correct",
                Mark::Incorrect => " incorrect",
            };
            let glyph = escape(&letter.glyph);
            let _ = write!(
                out,
                r#"<button class="letter-option{class}" data-letter="{glyph}" {attr}>{glyph}</button>"#,
                attr = action_attr("answer", Some(pos)),
            );
        }
        out.push_str(r#"</div><div class="feedback">"#);
        match (self.state, self.marks().contains(&Mark::Incorrect)) {
            (QuizState::Idle, _) => out.push_str(
                r#"<div class="incorrect-feedback">Not enough letters for a quiz yet.</div>"#,
            ),
            (QuizState::Answered, false) => {
                out.push_str(r#"<div class="correct-feedback">ትክክል! (Good job!)</div>"#)
            }
            (QuizState::Answered, true) => {
                out.push_str(r#"<div class="incorrect-feedback">ድጋሚ ይሞክሩ (Try again)</div>"#)
            }
            (QuizState::RoundActive, _) => {}
        }
        let _ = write!(
            out,
            r#"</div><button class="next-sound-btn" {attr}{hide}>ቀጣይ (Next)</button></div></div>"#,
            attr = action_attr("next-sound", None),
            hide = hidden(answered),
        );
        out
    }
}
