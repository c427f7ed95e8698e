//! Transliteration capability used by the anonymizer.
//!
//! Implementations render arbitrary text as lowercase ASCII Latin. They may
//! apply context-sensitive rules, so transliterating a whole string and
//! transliterating it one character at a time can produce different output;
//! `mapping` reconciles the two.

use crate::error::BoxError;

/// Deterministic, side-effect-free text to ASCII-lowercase rendering.
///
/// The anonymizer shares one instance across calls, so implementations must
/// be safe for concurrent read-only use.
pub trait Transliterate: Send + Sync {
    fn transliterate(&self, input: &str) -> Result<String, BoxError>;
}

/// Cyrillic via the Ukrainian national romanization, everything else via
/// `deunicode`, then ASCII lowercase.
///
/// Context rules: `є ї й ю я` are `ye yi y yu ya` at the start of a word and
/// `ie i i iu ia` inside it, `г` after `з` is `gh`, and an apostrophe between
/// two Cyrillic letters is dropped. `ь` and `ъ` render as `'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTransliterator;

impl Transliterate for BuiltinTransliterator {
    fn transliterate(&self, input: &str) -> Result<String, BoxError> {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());

        for (idx, &ch) in chars.iter().enumerate() {
            let prev = idx.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(idx + 1).copied();
            push_transliterated(&mut out, ch, prev, next);
        }

        Ok(out)
    }
}

fn push_transliterated(out: &mut String, ch: char, prev: Option<char>, next: Option<char>) {
    if is_apostrophe(ch) {
        if prev.is_some_and(is_cyrillic) && next.is_some_and(is_cyrillic) {
            return;
        }
        out.push('\'');
        return;
    }

    if is_cyrillic(ch) {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        let prev_lower = prev.and_then(|p| p.to_lowercase().next());
        out.extend(cyrillic(lower, prev_lower).chars().map(|c| c.to_ascii_lowercase()));
        return;
    }

    if ch.is_ascii() {
        out.push(ch.to_ascii_lowercase());
        return;
    }

    if let Some(ascii) = deunicode::deunicode_char(ch) {
        for c in ascii.chars().filter(char::is_ascii) {
            out.push(c.to_ascii_lowercase());
        }
    }
}

fn is_apostrophe(ch: char) -> bool {
    matches!(ch, '\'' | '\u{2019}' | '\u{02BC}')
}

fn is_cyrillic(ch: char) -> bool {
    matches!(ch, '\u{0400}'..='\u{04FF}')
}

fn starts_word(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(p) => !p.is_alphabetic() && !is_apostrophe(p),
    }
}

fn cyrillic(lower: char, prev: Option<char>) -> &'static str {
    let initial = starts_word(prev);
    match lower {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' if prev == Some('з') => "gh",
        'г' => "h",
        'ґ' => "g",
        'д' => "d",
        'е' => "e",
        'є' if initial => "ye",
        'є' => "ie",
        'ж' => "zh",
        'з' => "z",
        'и' => "y",
        'і' => "i",
        'ї' if initial => "yi",
        'ї' => "i",
        'й' if initial => "y",
        'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ю' if initial => "yu",
        'ю' => "iu",
        'я' if initial => "ya",
        'я' => "ia",
        'ё' => "yo",
        'ы' => "y",
        'э' => "e",
        // soft and hard signs keep a mark so spans can end on them
        'ь' | 'ъ' => "'",
        // Remaining Cyrillic blocks (Serbian, Macedonian, historic letters)
        other => deunicode::deunicode_char(other).unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translit(s: &str) -> String {
        BuiltinTransliterator.transliterate(s).unwrap()
    }

    #[test]
    fn renders_ukrainian_names() {
        assert_eq!(translit("Іван Петренко"), "ivan petrenko");
        assert_eq!(translit("Олена Шевченко"), "olena shevchenko");
        assert_eq!(translit("Євген"), "yevhen");
    }

    #[test]
    fn strips_latin_diacritics() {
        assert_eq!(translit("Müller"), "muller");
        assert_eq!(translit("Łukasz Wójcik"), "lukasz wojcik");
        assert_eq!(translit("Jiří Dvořák"), "jiri dvorak");
        assert_eq!(translit("Ștefan"), "stefan");
        assert_eq!(translit("João Gonçalves"), "joao goncalves");
    }

    #[test]
    fn iotated_vowels_depend_on_position() {
        assert_eq!(translit("є"), "ye");
        assert_eq!(translit("Пацієнт"), "patsiient");
        assert_eq!(translit("Юрій"), "yurii");
    }

    #[test]
    fn apostrophe_inside_cyrillic_word_is_dropped() {
        assert_eq!(translit("Мар'ян"), "marian");
        assert_eq!(translit("'"), "'");
        assert_eq!(translit("don't"), "don't");
    }

    #[test]
    fn zgh_cluster() {
        assert_eq!(translit("Згурський"), "zghurs'kyi");
        assert_eq!(translit("г"), "h");
    }

    #[test]
    fn soft_sign_renders_as_apostrophe() {
        assert_eq!(translit("Коваль"), "koval'");
        assert_eq!(translit("ь"), "'");
        assert_eq!(translit("об'єкт"), "obiekt");
    }

    #[test]
    fn output_is_ascii_lowercase() {
        let out = translit("Straße ÆØÅ Ванька");
        assert!(out.is_ascii());
        assert_eq!(out, out.to_ascii_lowercase());
    }
}
