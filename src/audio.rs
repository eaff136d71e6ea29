//! Audio playback helper.
//!
//! At most one requested clip is audible: every `play` stops and rewinds the
//! tracked clip before starting the next. Failures fall back to one fixed clip
//! and are otherwise only logged.

use crate::error::AudioError;

/// Exact paths shipped with the site.
const KNOWN_CLIPS: &[&str] = &[
    "static/audio/ha.mp3",
    "static/audio/le.mp3",
    "static/audio/me.mp3",
    "static/audio/se.mp3",
    "static/audio/re.mp3",
    "static/audio/she.mp3",
    "static/audio/ui/click.mp3",
];

/// Directories whose clips follow the asset naming convention.
const KNOWN_DIRS: &[&str] = &[
    "static/audio/forms/",
    "static/audio/words/",
    "static/audio/phrases/",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipId(pub u64);

/// Media pipeline seam. The browser implementation wraps `HtmlAudioElement`;
/// asynchronous outcomes come back through [`AudioPlayer::on_playing`],
/// [`AudioPlayer::on_error`] and [`AudioPlayer::on_ended`].
pub trait AudioBackend {
    fn start(&mut self, id: ClipId, path: &str) -> Result<(), AudioError>;
    /// Pause and rewind to zero.
    fn stop(&mut self, id: ClipId);
}

/// Bare filenames live in `audio_dir`; anything with a directory component is
/// used as given.
pub fn resolve_path(audio_dir: &str, file: &str) -> String {
    if file.contains('/') {
        file.to_string()
    } else {
        format!("{}/{}", audio_dir.trim_end_matches('/'), file)
    }
}

pub fn is_known_clip(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    KNOWN_CLIPS.contains(&path) || KNOWN_DIRS.iter().any(|d| path.starts_with(d))
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Clip {
    id: ClipId,
    target: Option<String>,
}

/// "Now playing" indicator attached to one UI element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub target: String,
    pub clip: ClipId,
}

pub struct AudioPlayer<B: AudioBackend> {
    backend: B,
    audio_dir: String,
    fallback_clip: String,
    current: Option<Clip>,
    badge: Option<Badge>,
    next_id: u64,
}

impl<B: AudioBackend> AudioPlayer<B> {
    pub fn new(backend: B, audio_dir: impl Into<String>, fallback_clip: impl Into<String>) -> Self {
        Self {
            backend,
            audio_dir: audio_dir.into(),
            fallback_clip: fallback_clip.into(),
            current: None,
            badge: None,
            next_id: 1,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn current(&self) -> Option<ClipId> {
        self.current.as_ref().map(|c| c.id)
    }

    pub fn badge(&self) -> Option<&Badge> {
        self.badge.as_ref()
    }

    /// Stop whatever is playing, then start `file`. `target` names the UI
    /// element that gets the badge once playback actually begins.
    pub fn play(&mut self, file: &str, target: Option<&str>) -> Option<ClipId> {
        self.stop_current();
        if file.trim().is_empty() {
            log::error!("{}", AudioError::EmptyPath);
            return None;
        }
        let path = resolve_path(&self.audio_dir, file);
        if !is_known_clip(&path) {
            log::debug!("playing unlisted clip {path}; fallback may be needed");
        }
        let id = self.alloc_id();
        log::info!("Playing audio: {path}");
        match self.backend.start(id, &path) {
            Ok(()) => {
                self.current = Some(Clip {
                    id,
                    target: target.map(str::to_string),
                });
                Some(id)
            }
            Err(e) => {
                log::error!("Error playing audio: {e}");
                self.play_fallback();
                None
            }
        }
    }

    /// Playback began. Returns the badge to expire later, if one was attached.
    pub fn on_playing(&mut self, id: ClipId) -> Option<Badge> {
        let clip = self.current.as_ref().filter(|c| c.id == id)?;
        let target = clip.target.clone()?;
        let badge = Badge { target, clip: id };
        self.badge = Some(badge.clone());
        Some(badge)
    }

    pub fn on_ended(&mut self, id: ClipId) {
        if self.current() == Some(id) {
            self.current = None;
        }
    }

    /// Asynchronous failure (404, unsupported format, autoplay block).
    pub fn on_error(&mut self, id: ClipId, reason: &str) {
        if self.current() != Some(id) {
            // Fallback clips and interrupted clips are never retried.
            log::error!("Audio error on clip {}: {reason}", id.0);
            return;
        }
        log::error!("Audio error: {reason}; using fallback");
        self.current = None;
        self.play_fallback();
    }

    pub fn clear_badge(&mut self, clip: ClipId) {
        if self.badge.as_ref().is_some_and(|b| b.clip == clip) {
            self.badge = None;
        }
    }

    /// Drop the badge regardless of which clip owns it.
    pub fn dismiss_badge(&mut self) {
        self.badge = None;
    }

    pub fn stop_current(&mut self) {
        if let Some(clip) = self.current.take() {
            self.backend.stop(clip.id);
        }
    }

    fn play_fallback(&mut self) {
        let id = self.alloc_id();
        let path = self.fallback_clip.clone();
        if let Err(e) = self.backend.start(id, &path) {
            log::error!("Fallback audio also failed: {e}");
        }
    }

    fn alloc_id(&mut self) -> ClipId {
        let id = ClipId(self.next_id);
        self.next_id += 1;
        id
    }
}
