//! Alphabet bin support: language routing by file name and curated sound examples.
//!
//! Each letter gets two recordings. The "name" recording speaks the letter
//! itself; the "sound" recording speaks a short example that isolates the
//! letter's sound, taken from the tables below or, failing that, from the
//! pronunciation written in the source file.

use crate::Language;

/// Which audio trees an alphabet category file feeds, from its file name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageHint {
    English,
    Korean,
    None,
}

impl LanguageHint {
    /// Derive the hint from a category name such as `korean_consonants`.
    pub fn from_category(category: &str) -> Self {
        if category.starts_with(Language::English.file_prefix()) {
            LanguageHint::English
        } else if category.starts_with(Language::Korean.file_prefix()) {
            LanguageHint::Korean
        } else {
            LanguageHint::None
        }
    }

    /// Output languages for the hint. Unprefixed categories go to both trees.
    pub fn languages(self) -> Vec<Language> {
        match self {
            LanguageHint::English => vec![Language::English],
            LanguageHint::Korean => vec![Language::Korean],
            LanguageHint::None => Language::ALL.to_vec(),
        }
    }
}

/// Category name with any `english_`/`korean_` prefix removed.
pub fn base_category(category: &str) -> &str {
    Language::ALL
        .iter()
        .find_map(|lang| category.strip_prefix(lang.file_prefix()))
        .unwrap_or(category)
}

/// Whether sound examples in `base` are spelled-out letter sounds, which are
/// always spoken slowly.
pub fn is_sound_category(base: &str) -> bool {
    base.eq_ignore_ascii_case("consonants") || base.eq_ignore_ascii_case("vowels")
}

/// Curated sound example for `character` in the `base` category.
pub fn sound_example(base: &str, character: &str) -> Option<&'static str> {
    let table = if base.eq_ignore_ascii_case("consonants") {
        CONSONANT_EXAMPLES
    } else if base.eq_ignore_ascii_case("vowels") {
        VOWEL_EXAMPLES
    } else {
        return None;
    };

    table
        .iter()
        .find(|(ch, _)| ch.eq_ignore_ascii_case(character))
        .map(|&(_, example)| example)
}

const CONSONANT_EXAMPLES: &[(&str, &str)] = &[
    // Hangul consonants paired with ㅏ
    ("ㄱ", "가"),
    ("ㄴ", "나"),
    ("ㄷ", "다"),
    ("ㄹ", "라"),
    ("ㅁ", "마"),
    ("ㅂ", "바"),
    ("ㅅ", "사"),
    ("ㅇ", "아"),
    ("ㅈ", "자"),
    ("ㅊ", "차"),
    ("ㅋ", "카"),
    ("ㅌ", "타"),
    ("ㅍ", "파"),
    ("ㅎ", "하"),
    ("ㄲ", "까"),
    ("ㄸ", "따"),
    ("ㅃ", "빠"),
    ("ㅆ", "싸"),
    ("ㅉ", "짜"),
    // Latin consonants
    ("B", "b, as in ball"),
    ("C", "c, as in cat"),
    ("D", "d, as in dog"),
    ("F", "f, as in fish"),
    ("G", "g, as in goat"),
    ("H", "h, as in hat"),
    ("J", "j, as in jam"),
    ("K", "k, as in kite"),
    ("L", "l, as in lion"),
    ("M", "m, as in moon"),
    ("N", "n, as in nest"),
    ("P", "p, as in pig"),
    ("Q", "q, as in queen"),
    ("R", "r, as in rabbit"),
    ("S", "s, as in sun"),
    ("T", "t, as in top"),
    ("V", "v, as in van"),
    ("W", "w, as in water"),
    ("X", "x, as in box"),
    ("Y", "y, as in yellow"),
    ("Z", "z, as in zebra"),
];

const VOWEL_EXAMPLES: &[(&str, &str)] = &[
    ("ㅏ", "아"),
    ("ㅑ", "야"),
    ("ㅓ", "어"),
    ("ㅕ", "여"),
    ("ㅗ", "오"),
    ("ㅛ", "요"),
    ("ㅜ", "우"),
    ("ㅠ", "유"),
    ("ㅡ", "으"),
    ("ㅣ", "이"),
    ("ㅐ", "애"),
    ("ㅒ", "얘"),
    ("ㅔ", "에"),
    ("ㅖ", "예"),
    ("ㅘ", "와"),
    ("ㅙ", "왜"),
    ("ㅚ", "외"),
    ("ㅝ", "워"),
    ("ㅞ", "웨"),
    ("ㅟ", "위"),
    ("ㅢ", "의"),
    ("A", "a, as in apple"),
    ("E", "e, as in egg"),
    ("I", "i, as in igloo"),
    ("O", "o, as in octopus"),
    ("U", "u, as in umbrella"),
];

#[cfg(test)]
mod tests {
    use super::{base_category, is_sound_category, sound_example, LanguageHint};
    use crate::Language;

    #[test]
    fn prefix_routes_to_a_single_tree() {
        assert_eq!(
            LanguageHint::from_category("english_vowels").languages(),
            vec![Language::English]
        );
        assert_eq!(
            LanguageHint::from_category("korean_consonants").languages(),
            vec![Language::Korean]
        );
        assert_eq!(
            LanguageHint::from_category("numbers").languages(),
            vec![Language::Korean, Language::English]
        );
    }

    #[test]
    fn base_category_drops_language_prefix() {
        assert_eq!(base_category("english_vowels"), "vowels");
        assert_eq!(base_category("korean_consonants"), "consonants");
        assert_eq!(base_category("numbers"), "numbers");
    }

    #[test]
    fn curated_examples_are_keyed_by_category() {
        assert_eq!(sound_example("consonants", "ㄱ"), Some("가"));
        assert_eq!(sound_example("vowels", "ㅏ"), Some("아"));
        assert_eq!(sound_example("vowels", "a"), Some("a, as in apple"));
        assert_eq!(sound_example("consonants", "ㅏ"), None);
        assert_eq!(sound_example("numbers", "ㄱ"), None);
    }

    #[test]
    fn letter_categories_are_sound_categories() {
        assert!(is_sound_category("vowels"));
        assert!(is_sound_category("Consonants"));
        assert!(!is_sound_category("numbers"));
    }
}
