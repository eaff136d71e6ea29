// Lesson document and built-in content table invariants.
// Native-friendly; no wasm/browser APIs.

use std::collections::HashSet;

use fidel_kids::games::alphabet::derive_transliteration;
use fidel_kids::games::fidel_tables::{FORM_EXAMPLES, LETTER_AUDIO, PANEL_EXAMPLES, VOWEL_ORDER};
use fidel_kids::{AppConfig, Lessons};

const FIXTURE: &str = include_str!("fixtures/lessons.json");

#[test]
fn fixture_parses_with_all_collections() {
    let l = Lessons::from_json(FIXTURE).unwrap();
    assert_eq!(l.alphabet.len(), 5);
    assert_eq!(l.words.len(), 3);
    assert_eq!(l.phrases.len(), 3);
}

#[test]
fn every_letter_has_seven_forms() {
    let l = Lessons::from_json(FIXTURE).unwrap();
    for letter in &l.alphabet {
        let forms = letter.form_glyphs();
        assert_eq!(forms.len(), 7, "letter '{}'", letter.glyph);
        assert_eq!(forms[0], letter.glyph);
    }
}

#[test]
fn transliteration_follows_vowel_order() {
    assert_eq!(VOWEL_ORDER.len(), 7);
    assert_eq!(derive_transliteration("le", 0), "le");
    assert_eq!(derive_transliteration("le", 1), "lu");
    assert_eq!(derive_transliteration("le", 5), "l");
    assert_eq!(derive_transliteration("she", 6), "sho");
}

#[test]
fn panel_examples_cover_known_forms_only() {
    let forms: HashSet<&str> = FORM_EXAMPLES.iter().map(|(g, _)| *g).collect();
    for (glyph, _) in PANEL_EXAMPLES {
        assert!(forms.contains(glyph), "panel glyph '{glyph}' has no form example");
    }
}

#[test]
fn form_examples_gloss_their_own_glyph() {
    for (glyph, example) in FORM_EXAMPLES {
        let word = example.split('(').next().unwrap().trim();
        assert!(
            word.starts_with(glyph),
            "example '{example}' does not start with '{glyph}'"
        );
        assert!(example.ends_with(')'), "example '{example}' is not glossed");
    }
}

#[test]
fn letter_audio_points_under_audio_dir() {
    let cfg = AppConfig::default();
    for (glyph, path) in LETTER_AUDIO {
        assert!(
            path.starts_with(&cfg.audio_dir),
            "audio for '{glyph}' outside {}",
            cfg.audio_dir
        );
    }
}
