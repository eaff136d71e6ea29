//! Mini-game state machines, one per lesson section.
//!
//! Games never touch the DOM, storage or the media pipeline directly. Input
//! handlers mutate in-memory state and push [`Effect`]s that the session
//! applies; views are rendered from state alone.

use crate::section::Section;

pub mod alphabet;
pub mod fidel_tables;
pub mod phrases;
pub mod sounds;
pub mod words;

pub use alphabet::AlphabetBrowser;
pub use phrases::PhraseMatch;
pub use sounds::SoundQuiz;
pub use words::WordBuilder;

/// Side effects requested by a game handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Play `file` (resolved by the audio helper); badge goes on `target`.
    Play { file: String, target: Option<String> },
    SaveScore { section: Section, score: u32 },
    Schedule { delay: Delay, timer: GameTimer },
}

/// Named delays, resolved to milliseconds from `AppConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delay {
    ModalClose,
    Feedback,
    WordReset,
}

/// Deferred transitions. Each carries the generation it was scheduled in so a
/// timer that outlived its round is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameTimer {
    ClearModal { generation: u32 },
    ResetWord { round: u32 },
    ClearPhraseFeedback { generation: u32 },
}

pub(crate) fn play(out: &mut Vec<Effect>, file: &str, target: impl Into<String>) {
    out.push(Effect::Play {
        file: file.to_string(),
        target: Some(target.into()),
    });
}
