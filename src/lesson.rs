//! Lesson document model.
//!
//! The document is static JSON with three ordered collections. Field names on
//! the wire are camelCase (`audioFile`, `imageFile`) and the letter glyph is
//! stored under `letter`.

use serde::{Deserialize, Serialize};

use crate::error::LessonError;

/// First and last base code points whose vowel family can be derived by
/// arithmetic (families of eight, first seven used).
const FIDEL_DERIVABLE: std::ops::RangeInclusive<u32> = 0x1200..=0x1357;
const FIDEL_LAST: u32 = 0x137C;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterForm {
    pub form: String,
    #[serde(default)]
    pub audio_file: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRecord {
    #[serde(rename = "letter")]
    pub glyph: String,
    pub transliteration: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub forms: Vec<LetterForm>,
}

impl LetterRecord {
    /// The vowel-order forms shown in the detail modal. Uses the record's own
    /// list when present, otherwise derives the family from the code point.
    pub fn form_glyphs(&self) -> Vec<String> {
        if !self.forms.is_empty() {
            return self.forms.iter().map(|f| f.form.clone()).collect();
        }
        let Some(base) = self.glyph.chars().next() else {
            return Vec::new();
        };
        let cp = base as u32;
        if !FIDEL_DERIVABLE.contains(&cp) {
            return vec![self.glyph.clone()];
        }
        let family = cp / 8 * 8;
        (0..7)
            .map(|i| family + i)
            .filter(|&c| c <= FIDEL_LAST)
            .filter_map(char::from_u32)
            .map(String::from)
            .collect()
    }

    /// Audio file the record maps to `form`, if any.
    pub fn form_audio(&self, form: &str) -> Option<&str> {
        self.forms
            .iter()
            .find(|f| f.form == form && !f.audio_file.is_empty())
            .map(|f| f.audio_file.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub word: String,
    pub transliteration: String,
    pub meaning: String,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub image_file: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseRecord {
    pub phrase: String,
    pub transliteration: String,
    pub meaning: String,
    #[serde(default)]
    pub audio_file: String,
    #[serde(default)]
    pub image_file: String,
}

/// The whole lesson document. Immutable once loaded; shared by `Rc`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lessons {
    #[serde(default)]
    pub alphabet: Vec<LetterRecord>,
    #[serde(default)]
    pub words: Vec<WordRecord>,
    #[serde(default)]
    pub phrases: Vec<PhraseRecord>,
}

impl Lessons {
    pub fn from_json(json: &str) -> Result<Self, LessonError> {
        let lessons: Lessons = serde_json::from_str(json)?;
        log::debug!(
            "lessons parsed: {} letters, {} words, {} phrases",
            lessons.alphabet.len(),
            lessons.words.len(),
            lessons.phrases.len()
        );
        Ok(lessons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(glyph: &str) -> LetterRecord {
        LetterRecord {
            glyph: glyph.into(),
            transliteration: "le".into(),
            example: String::new(),
            audio_file: String::new(),
            forms: Vec::new(),
        }
    }

    #[test]
    fn parses_wire_names() {
        let json = r#"{
            "alphabet": [{"letter": "ለ", "transliteration": "le", "example": "ለምለም (lemlem - green)",
                          "audioFile": "le.mp3",
                          "forms": [{"form": "ለ", "audioFile": "static/audio/forms/le.mp3"}]}],
            "words": [{"word": "ቤት", "transliteration": "bet", "meaning": "house",
                       "audioFile": "bet.mp3", "imageFile": "static/images/bet.png"}]
        }"#;
        let l = Lessons::from_json(json).unwrap();
        assert_eq!(l.alphabet[0].glyph, "ለ");
        assert_eq!(l.alphabet[0].form_audio("ለ"), Some("static/audio/forms/le.mp3"));
        assert_eq!(l.words[0].image_file, "static/images/bet.png");
        assert!(l.phrases.is_empty());
    }

    #[test]
    fn rejects_malformed_document() {
        assert!(Lessons::from_json("{\"alphabet\": 3}").is_err());
        assert!(Lessons::from_json("not json").is_err());
    }

    #[test]
    fn derives_family_when_forms_missing() {
        assert_eq!(
            letter("ለ").form_glyphs(),
            vec!["ለ", "ሉ", "ሊ", "ላ", "ሌ", "ል", "ሎ"]
        );
    }

    #[test]
    fn non_fidel_glyph_has_single_form() {
        assert_eq!(letter("A").form_glyphs(), vec!["A"]);
        assert!(letter("").form_glyphs().is_empty());
    }
}
