// File: src/core/jamo.rs
//! Classification of single decomposed jamo and the fixed phonological
//! tables the matcher relies on.

use crate::core::types::JamoClass;
use crate::error::{Error, Result};

const LEADING_FIRST: u32 = 0x1100;
const LEADING_LAST: u32 = 0x1112;
const VOWEL_FIRST: u32 = 0x1161;
const VOWEL_LAST: u32 = 0x1175;
const TRAILING_FIRST: u32 = 0x11A8;
const TRAILING_LAST: u32 = 0x11C2;

/// The placeholder onset 'ᄋ' of a syllable that starts with a vowel.
pub const SILENT_ONSET: char = '\u{110B}';

/// The eleven consonant clusters that can close a syllable.
const DOUBLE_TRAILING: [char; 11] = [
    '\u{11AA}', // ㄳ
    '\u{11AC}', // ㄵ
    '\u{11AD}', // ㄶ
    '\u{11B0}', // ㄺ
    '\u{11B1}', // ㄻ
    '\u{11B2}', // ㄼ
    '\u{11B3}', // ㄽ
    '\u{11B4}', // ㄾ
    '\u{11B5}', // ㄿ
    '\u{11B6}', // ㅀ
    '\u{11B9}', // ㅄ
];

/// Simple vowels that may stand for a stretched syllable:
/// ㅏ ㅓ ㅗ ㅜ ㅐ ㅔ ㅣ ㅡ
pub const CANONICAL_VOWELS: [char; 8] = [
    '\u{1161}', '\u{1165}', '\u{1169}', '\u{116E}', '\u{1162}', '\u{1166}', '\u{1175}', '\u{1173}',
];

/// Categorizes one decomposed jamo.
pub fn classify(c: char) -> JamoClass {
    let code = c as u32;
    if !is_jamo_block(code) {
        return JamoClass::NotAPhoneme;
    }
    match code {
        LEADING_FIRST..=LEADING_LAST => JamoClass::Leading,
        VOWEL_FIRST..=VOWEL_LAST => JamoClass::Vowel,
        TRAILING_FIRST..=TRAILING_LAST => JamoClass::Trailing,
        _ => JamoClass::UnknownType,
    }
}

/// Like [`classify`], for callers holding text. Fails unless `s` is exactly
/// one character.
pub fn classify_str(s: &str) -> Result<JamoClass> {
    Ok(classify(single_char(s)?))
}

/// Extracts the only character of `s`.
pub fn single_char(s: &str) -> Result<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(Error::Classification {
            input: s.to_string(),
        }),
    }
}

// Conjoining jamo, both extended blocks and the compatibility block.
fn is_jamo_block(code: u32) -> bool {
    matches!(code, 0x1100..=0x11FF | 0xA960..=0xA97F | 0xD7B0..=0xD7FF | 0x3131..=0x318E)
}

pub fn is_leading(c: char) -> bool {
    (LEADING_FIRST..=LEADING_LAST).contains(&(c as u32))
}

pub fn is_vowel(c: char) -> bool {
    (VOWEL_FIRST..=VOWEL_LAST).contains(&(c as u32))
}

pub fn is_trailing(c: char) -> bool {
    (TRAILING_FIRST..=TRAILING_LAST).contains(&(c as u32))
}

pub fn is_double_trailing(c: char) -> bool {
    DOUBLE_TRAILING.contains(&c)
}

pub fn is_single_trailing(c: char) -> bool {
    is_trailing(c) && !is_double_trailing(c)
}

pub fn is_silent_onset(c: char) -> bool {
    c == SILENT_ONSET
}

pub fn is_space(c: char) -> bool {
    c == ' '
}

pub fn is_canonical_vowel(c: char) -> bool {
    CANONICAL_VOWELS.contains(&c)
}

/// The representative onset a trailing consonant turns into when it moves
/// to the next syllable.
pub fn trailing_to_leading(c: char) -> Option<char> {
    let leading = match c {
        '\u{11A8}' => '\u{1100}', // ㄱ
        '\u{11A9}' => '\u{1101}', // ㄲ
        '\u{11AB}' => '\u{1102}', // ㄴ
        '\u{11AE}' => '\u{1103}', // ㄷ
        '\u{11AF}' => '\u{1105}', // ㄹ
        '\u{11B7}' => '\u{1106}', // ㅁ
        '\u{11B8}' => '\u{1107}', // ㅂ
        '\u{11BA}' => '\u{1109}', // ㅅ
        '\u{11BB}' => '\u{110A}', // ㅆ
        '\u{11BD}' => '\u{110C}', // ㅈ
        '\u{11BE}' => '\u{110E}', // ㅊ
        '\u{11BF}' => '\u{110F}', // ㅋ
        '\u{11C0}' => '\u{1110}', // ㅌ
        '\u{11C1}' => '\u{1111}', // ㅍ
        '\u{11AA}' => '\u{110A}', // ㄳ
        '\u{11AC}' => '\u{110C}', // ㄵ
        '\u{11B0}' => '\u{1100}', // ㄺ
        '\u{11B1}' => '\u{1106}', // ㄻ
        '\u{11B2}' => '\u{1107}', // ㄼ
        '\u{11B3}' => '\u{110A}', // ㄽ
        '\u{11B4}' => '\u{1110}', // ㄾ
        '\u{11B5}' => '\u{1111}', // ㄿ
        '\u{11B9}' => '\u{110A}', // ㅄ
        '\u{11AD}' => '\u{1102}', // ㄶ
        '\u{11B6}' => '\u{1105}', // ㅀ
        '\u{11BC}' => SILENT_ONSET, // ㅇ
        '\u{11C2}' => SILENT_ONSET, // ㅎ
        _ => return None,
    };
    Some(leading)
}

/// Splits a double trailing consonant into the part that stays in the
/// syllable and the onset the other part becomes before a silent onset.
pub fn split_double_trailing(c: char) -> Option<(char, char)> {
    let parts = match c {
        '\u{11AA}' => ('\u{11A8}', '\u{1109}'), // ㄳ -> ㄱ + ㅅ
        '\u{11AC}' => ('\u{11AB}', '\u{110C}'), // ㄵ -> ㄴ + ㅈ
        '\u{11AD}' => ('\u{11AB}', '\u{1112}'), // ㄶ -> ㄴ + ㅎ
        '\u{11B0}' => ('\u{11AF}', '\u{1100}'), // ㄺ -> ㄹ + ㄱ
        '\u{11B1}' => ('\u{11AF}', '\u{1106}'), // ㄻ -> ㄹ + ㅁ
        '\u{11B2}' => ('\u{11AF}', '\u{1107}'), // ㄼ -> ㄹ + ㅂ
        '\u{11B3}' => ('\u{11AF}', '\u{1109}'), // ㄽ -> ㄹ + ㅅ
        '\u{11B4}' => ('\u{11AF}', '\u{1110}'), // ㄾ -> ㄹ + ㅌ
        '\u{11B5}' => ('\u{11AF}', '\u{1111}'), // ㄿ -> ㄹ + ㅍ
        '\u{11B6}' => ('\u{11AF}', '\u{1112}'), // ㅀ -> ㄹ + ㅎ
        '\u{11B9}' => ('\u{11B8}', '\u{1109}'), // ㅄ -> ㅂ + ㅅ
        _ => return None,
    };
    Some(parts)
}

/// Base vowels a (possibly glided) vowel may be stretched into.
/// Every modern vowel has a group; anything else has none.
pub fn vowel_group(v: char) -> Option<&'static [char]> {
    const A: &[char] = &['\u{1161}'];
    const EO: &[char] = &['\u{1165}'];
    const YO: &[char] = &['\u{1169}'];
    const O: &[char] = &['\u{1169}', '\u{1165}'];
    const U: &[char] = &['\u{116E}', '\u{1173}'];
    const E: &[char] = &['\u{1166}', '\u{1162}'];
    const I: &[char] = &['\u{1175}'];
    const EU: &[char] = &['\u{1173}'];
    const UI: &[char] = &['\u{1173}', '\u{1175}'];

    let group = match v {
        '\u{116A}' | '\u{1161}' | '\u{1163}' => A, // ㅘ ㅏ ㅑ
        '\u{1171}' | '\u{1175}' => I,              // ㅟ ㅣ
        '\u{116F}' | '\u{1165}' | '\u{1167}' => EO, // ㅝ ㅓ ㅕ
        '\u{116D}' => YO,                          // ㅛ
        '\u{1169}' => O,                           // ㅗ
        '\u{1172}' | '\u{116E}' => U,              // ㅠ ㅜ
        '\u{1170}' | '\u{116B}' | '\u{116C}' | '\u{1168}' | '\u{1166}' | '\u{1164}'
        | '\u{1162}' => E, // ㅞ ㅙ ㅚ ㅖ ㅔ ㅒ ㅐ
        '\u{1174}' => UI, // ㅢ
        '\u{1173}' => EU, // ㅡ
        _ => return None,
    };
    Some(group)
}

/// Whether `candidate` belongs to the equivalence group of `vowel`.
pub fn in_vowel_group(vowel: char, candidate: char) -> bool {
    vowel_group(vowel).is_some_and(|group| group.contains(&candidate))
}
