//! HTML fragments shared by the section views.
//!
//! Views are plain strings assigned with `innerHTML`. Class names are the
//! contract with the page stylesheet; `data-action` / `data-index` attributes
//! are the contract with the event decoder in `session::Action`.

use std::fmt::Write;

use crate::section::Section;

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// What a view needs from the session besides its own state.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenderCtx<'a> {
    /// UI key currently showing the "now playing" badge.
    pub now_playing: Option<&'a str>,
    pub placeholder_image: &'a str,
}

impl RenderCtx<'_> {
    pub fn badge(&self, out: &mut String, key: &str) {
        if self.now_playing == Some(key) {
            out.push_str(r#"<div class="audio-playing-indicator">🔊 Playing...</div>"#);
        }
    }

    pub fn playing_class(&self, key: &str) -> &'static str {
        if self.now_playing == Some(key) {
            " playing"
        } else {
            ""
        }
    }

    /// `<img>` that swaps to the placeholder once on error (see the web
    /// module's capturing error listener).
    pub fn image(&self, out: &mut String, src: &str, alt: &str) {
        let _ = write!(
            out,
            r#"<img src="{}" alt="{}" data-placeholder="{}">"#,
            escape(src),
            escape(alt),
            escape(self.placeholder_image)
        );
    }
}

/// Section heading plus the hidden title element the page tests look for.
pub fn section_header(out: &mut String, section: Section) {
    let _ = write!(
        out,
        r#"<h2>{title}</h2><div class="section-title" style="display:none;">{title}</div>"#,
        title = section.title()
    );
}

pub fn loading(name: &str) -> String {
    format!("<h2>Loading {}...</h2>", escape(name))
}

pub fn load_error(name: &str) -> String {
    format!(
        "<h2>Error</h2><p>Failed to load {} section. Please try again later.</p>",
        escape(name)
    )
}

/// Button or clickable element attributes for a decoded action.
pub fn action_attr(action: &str, index: Option<usize>) -> String {
    match index {
        Some(i) => format!(r#"data-action="{action}" data-index="{i}""#),
        None => format!(r#"data-action="{action}""#),
    }
}

pub fn hidden(visible: bool) -> &'static str {
    if visible { "" } else { r#" style="display:none;""# }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("ሰላም"), "ሰላም");
    }

    #[test]
    fn header_carries_title_twice() {
        let mut s = String::new();
        section_header(&mut s, Section::Words);
        assert_eq!(s.matches("Words").count(), 2);
    }

    #[test]
    fn badge_only_on_matching_key() {
        let ctx = RenderCtx {
            now_playing: Some("word-1"),
            placeholder_image: "p.png",
        };
        let mut s = String::new();
        ctx.badge(&mut s, "word-0");
        assert!(s.is_empty());
        ctx.badge(&mut s, "word-1");
        assert!(s.contains("audio-playing-indicator"));
        assert_eq!(ctx.playing_class("word-1"), " playing");
    }

    #[test]
    fn image_escapes_attributes() {
        let ctx = RenderCtx {
            now_playing: None,
            placeholder_image: "static/images/placeholder.png",
        };
        let mut s = String::new();
        ctx.image(&mut s, "a\".png", "house");
        assert!(s.contains(r#"src="a&quot;.png""#));
        assert!(s.contains(r#"data-placeholder="static/images/placeholder.png""#));
    }
}
