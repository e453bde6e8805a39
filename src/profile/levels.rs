use std::fmt;

use crate::classify::HONORS_MARKER;

/// World language level read from a course title, ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageLevel {
    I,
    II,
    IIHonors,
    III,
    IIIHonors,
    IV,
    IVHonors,
    V,
    VHonors,
}

impl LanguageLevel {
    pub fn label(&self) -> &'static str {
        match self {
            LanguageLevel::I => "I",
            LanguageLevel::II => "II",
            LanguageLevel::IIHonors => "II (H)",
            LanguageLevel::III => "III",
            LanguageLevel::IIIHonors => "III (H)",
            LanguageLevel::IV => "IV",
            LanguageLevel::IVHonors => "IV (H)",
            LanguageLevel::V => "V",
            LanguageLevel::VHonors => "V (H)",
        }
    }

    fn from_numeral(numeral: &str, honors: bool) -> Option<LanguageLevel> {
        let level = match (numeral, honors) {
            ("I", _) => LanguageLevel::I,
            ("II", false) => LanguageLevel::II,
            ("II", true) => LanguageLevel::IIHonors,
            ("III", false) => LanguageLevel::III,
            ("III", true) => LanguageLevel::IIIHonors,
            ("IV", false) => LanguageLevel::IV,
            ("IV", true) => LanguageLevel::IVHonors,
            ("V", false) => LanguageLevel::V,
            ("V", true) => LanguageLevel::VHonors,
            _ => return None,
        };
        Some(level)
    }

    /// Read the level from a title such as "Spanish IV (H)". Honors must be a
    /// separate "(H)" token; "Latin III(H)" has no level.
    ///
    /// Only a standalone numeral token counts, so "Spanish III" is never read
    /// as level II.
    pub fn parse(title: &str) -> Option<LanguageLevel> {
        let tokens: Vec<&str> = title.split_whitespace().collect();
        tokens.iter().enumerate().find_map(|(i, token)| {
            let honors = tokens.get(i + 1) == Some(&HONORS_MARKER);
            LanguageLevel::from_numeral(token, honors)
        })
    }

    /// Highest level among `titles`.
    pub fn highest<'a, I>(titles: I) -> Option<LanguageLevel>
    where
        I: IntoIterator<Item = &'a str>,
    {
        titles.into_iter().filter_map(LanguageLevel::parse).max()
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
