//! Runtime configuration.
//!
//! Every field has a default matching the deployed site, so the host page can
//! override any subset with a JSON object passed to `start_app_with_config`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Relative lesson document URL, tried first.
    pub lesson_url: String,
    /// Absolute URL tried once when the relative fetch fails.
    pub fallback_lesson_url: String,
    /// Id of the element whose content is replaced per section.
    pub content_id: String,
    /// Directory bare audio filenames are resolved against.
    pub audio_dir: String,
    /// Clip attempted once when a requested clip fails.
    pub fallback_clip: String,
    pub placeholder_image: String,
    /// localStorage key holding the best-score map.
    pub storage_key: String,
    pub modal_close_ms: f64,
    pub feedback_ms: f64,
    pub word_reset_ms: f64,
    pub badge_ms: f64,
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lesson_url: "static/js/lessons.json".into(),
            fallback_lesson_url:
                "https://buch-max.github.io/amharic-kids-app2/static/js/lessons.json".into(),
            content_id: "content".into(),
            audio_dir: "static/audio".into(),
            fallback_clip: "static/audio/ui/click.mp3".into(),
            placeholder_image: "static/images/placeholder.png".into(),
            storage_key: "amharicAppScores".into(),
            modal_close_ms: 300.0,
            feedback_ms: 1_500.0,
            word_reset_ms: 1_500.0,
            badge_ms: 2_000.0,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Parse a partial JSON override; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = AppConfig::from_json(r#"{"storageKey":"test-scores","feedbackMs":10}"#).unwrap();
        assert_eq!(cfg.storage_key, "test-scores");
        assert_eq!(cfg.feedback_ms, 10.0);
        assert_eq!(cfg.audio_dir, AppConfig::default().audio_dir);
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let cfg = AppConfig {
            log_level: "chatty".into(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Info);
        let cfg = AppConfig {
            log_level: "debug".into(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.log_level(), log::Level::Debug);
    }
}
