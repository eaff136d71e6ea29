//! The four lesson sections and their menu names.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownSection;

/// The four lesson modes reachable from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Alphabet,
    Sounds,
    Words,
    Phrases,
}

impl Section {
    /// Menu order.
    pub const ALL: [Section; 4] = [
        Section::Alphabet,
        Section::Sounds,
        Section::Words,
        Section::Phrases,
    ];

    /// Name used in `data-section` attributes and as the score cache key.
    pub fn name(self) -> &'static str {
        match self {
            Section::Alphabet => "alphabet",
            Section::Sounds => "sounds",
            Section::Words => "words",
            Section::Phrases => "phrases",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Alphabet => "Alphabet",
            Section::Sounds => "Sounds",
            Section::Words => "Words",
            Section::Phrases => "Phrases",
        }
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|sec| sec.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_names() {
        for sec in Section::ALL {
            assert_eq!(sec.name().parse::<Section>(), Ok(sec));
        }
        assert_eq!(" Words ".parse::<Section>(), Ok(Section::Words));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "games".parse::<Section>().unwrap_err();
        assert_eq!(err, UnknownSection("games".into()));
    }

    #[test]
    fn title_matches_name_case_insensitively() {
        for sec in Section::ALL {
            assert!(sec.title().eq_ignore_ascii_case(sec.name()));
        }
    }
}
