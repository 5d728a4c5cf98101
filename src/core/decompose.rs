// File: src/core/decompose.rs
//! Sanitizing raw input and decomposing Hangul syllables into jamo.

const SYLLABLE_FIRST: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const COMPAT_CONSONANT_FIRST: u32 = 0x3131;
const COMPAT_CONSONANT_LAST: u32 = 0x314E;

const LEADING_BASE: u32 = 0x1100;
const VOWEL_BASE: u32 = 0x1161;
// One below the first trailing consonant; a coda index of 0 means "none".
const TRAILING_BASE: u32 = 0x11A7;
const VOWEL_COUNT: u32 = 21;
const TRAILING_COUNT: u32 = 28;

fn is_kept(c: char) -> bool {
    let code = c as u32;
    (SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&code)
        || (COMPAT_CONSONANT_FIRST..=COMPAT_CONSONANT_LAST).contains(&code)
}

/// Drops everything but Hangul syllables and compatibility consonants.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|&c| is_kept(c)).collect()
}

/// Like [`sanitize`] but keeps word boundaries; every whitespace character
/// becomes a single ASCII space.
pub fn sanitize_keep_spaces(text: &str) -> String {
    text.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some(' ')
            } else if is_kept(c) {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Decomposes one character. Syllable blocks yield 2 or 3 conjoining jamo;
/// anything else is passed through unchanged.
pub fn decompose_char(c: char, out: &mut Vec<char>) {
    let code = c as u32;
    if !(SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&code) {
        out.push(c);
        return;
    }
    let offset = code - SYLLABLE_FIRST;
    let leading = offset / (VOWEL_COUNT * TRAILING_COUNT);
    let vowel = (offset % (VOWEL_COUNT * TRAILING_COUNT)) / TRAILING_COUNT;
    let trailing = offset % TRAILING_COUNT;

    // All three lie inside the conjoining jamo block by construction.
    out.extend(char::from_u32(LEADING_BASE + leading));
    out.extend(char::from_u32(VOWEL_BASE + vowel));
    if trailing > 0 {
        out.extend(char::from_u32(TRAILING_BASE + trailing));
    }
}

/// Number of jamo `c` decomposes into.
pub fn decomposed_len(c: char) -> usize {
    let code = c as u32;
    if !(SYLLABLE_FIRST..=SYLLABLE_LAST).contains(&code) {
        1
    } else if (code - SYLLABLE_FIRST) % TRAILING_COUNT == 0 {
        2
    } else {
        3
    }
}

/// Decomposes a whole text, syllable by syllable.
pub fn decompose(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        decompose_char(c, &mut out);
    }
    out
}

/// The raw side of an alignment: its jamo without spaces, the same jamo with
/// spaces, and where each unspaced jamo sits in the spaced sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSequence {
    jamo: Vec<char>,
    spaced: Vec<char>,
    spaced_index: Vec<usize>,
}

impl RawSequence {
    /// Builds both views from the space-preserving sanitized text.
    pub fn from_spaced_text(spaced_text: &str) -> Self {
        let spaced = decompose(spaced_text);
        let mut jamo = Vec::with_capacity(spaced.len());
        let mut spaced_index = Vec::with_capacity(spaced.len());
        for (pos, &c) in spaced.iter().enumerate() {
            if c != ' ' {
                jamo.push(c);
                spaced_index.push(pos);
            }
        }
        Self {
            jamo,
            spaced,
            spaced_index,
        }
    }

    pub fn jamo(&self) -> &[char] {
        &self.jamo
    }

    pub fn spaced(&self) -> &[char] {
        &self.spaced
    }

    /// Position of the `index`-th unspaced jamo inside the spaced sequence.
    pub fn spaced_position(&self, index: usize) -> Option<usize> {
        self.spaced_index.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.jamo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jamo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_open_and_closed_syllables() {
        assert_eq!(decompose("가"), vec!['\u{1100}', '\u{1161}']);
        assert_eq!(decompose("각"), vec!['\u{1100}', '\u{1161}', '\u{11A8}']);
        assert_eq!(decompose("힣"), vec!['\u{1112}', '\u{1175}', '\u{11C2}']);
        assert_eq!(decompose("사랑").len(), 5);
    }

    #[test]
    fn decomposed_len_agrees_with_decompose() {
        for c in ['가', '각', '읽', 'ㄱ', ' '] {
            assert_eq!(decomposed_len(c), decompose(&c.to_string()).len(), "{c}");
        }
    }

    #[test]
    fn sanitize_strips_non_hangul() {
        assert_eq!(sanitize("a가, b나!"), "가나");
        assert_eq!(sanitize("ㅋㅋ 좋아"), "ㅋㅋ좋아");
        // compatibility vowels are outside the kept range
        assert_eq!(sanitize("ㅏ"), "");
        assert_eq!(sanitize_keep_spaces("가\t나  다."), "가 나  다");
    }

    #[test]
    fn raw_sequence_maps_unspaced_to_spaced() {
        let raw = RawSequence::from_spaced_text("가 나");
        assert_eq!(raw.len(), 4);
        assert_eq!(raw.spaced().len(), 5);
        assert_eq!(raw.spaced_position(0), Some(0));
        assert_eq!(raw.spaced_position(1), Some(1));
        assert_eq!(raw.spaced_position(2), Some(3));
        assert_eq!(raw.spaced_position(3), Some(4));
        assert_eq!(raw.spaced_position(4), None);
        assert_eq!(raw.jamo(), &decompose("가나")[..]);
    }
}
