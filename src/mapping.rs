// File: src/mapping.rs
//! Turning a matrix path into jamo pairs and a syllable mapping.

use crate::core::decompose::decomposed_len;
use crate::core::jamo::is_vowel;
use crate::core::types::{AlignedPair, Cell, IndexedJamo, JamoAlignment, SyllableMapping};
use crate::error::{Error, Result};

/// One pair per path cell off the matrix border. Cell `(i, j)` pairs
/// `reference[i - 1]` with `raw[j - 1]`.
pub fn from_path(path: &[Cell], reference: &[char], raw: &[char]) -> Result<JamoAlignment> {
    let mut alignment = Vec::with_capacity(path.len());
    for &(row, col) in path {
        if row == 0 || col == 0 {
            continue;
        }
        let ref_jamo = *reference.get(row - 1).ok_or_else(|| Error::Mapping {
            index: row - 1,
            len: reference.len(),
            context: format!("reading reference jamo for path cell ({row}, {col})"),
        })?;
        let raw_jamo = *raw.get(col - 1).ok_or_else(|| Error::Mapping {
            index: col - 1,
            len: raw.len(),
            context: format!("reading raw jamo for path cell ({row}, {col})"),
        })?;
        alignment.push(AlignedPair::new(
            IndexedJamo::new(ref_jamo, row - 1),
            IndexedJamo::new(raw_jamo, col - 1),
        ));
    }
    Ok(alignment)
}

/// Fills gaps on the raw side so that every raw index from 0 up to the
/// largest referenced one appears, in order. A skipped raw jamo is paired
/// with the reference jamo of the entry that jumped over it.
pub fn normalize(alignment: &[AlignedPair], raw: &[char]) -> JamoAlignment {
    let mut normalized = Vec::with_capacity(alignment.len().max(raw.len()));
    let mut cursor = 0;

    for pair in alignment {
        let raw_idx = pair.raw.index;
        if raw_idx == cursor {
            normalized.push(*pair);
            cursor += 1;
        } else if raw_idx > cursor {
            for missing in cursor..raw_idx {
                let Some(&jamo) = raw.get(missing) else {
                    break;
                };
                normalized.push(AlignedPair::new(pair.reference, IndexedJamo::new(jamo, missing)));
            }
            if let Some(&jamo) = raw.get(raw_idx) {
                normalized.push(AlignedPair::new(pair.reference, IndexedJamo::new(jamo, raw_idx)));
            }
            cursor = raw_idx + 1;
        } else {
            // Already covered; several reference jamo share this raw one.
            normalized.push(*pair);
            cursor = cursor.max(raw_idx + 1);
        }
    }
    normalized
}

/// Index of the syllable of `text` whose decomposition contains jamo
/// `index`. `text` must be the same sanitized text the sequence was
/// decomposed from.
pub fn syllable_index(index: usize, text: &str) -> Result<usize> {
    let mut start = 0;
    for (syllable, c) in text.chars().enumerate() {
        let end = start + decomposed_len(c);
        if (start..end).contains(&index) {
            return Ok(syllable);
        }
        start = end;
    }
    Err(Error::Mapping {
        index,
        len: start,
        context: format!("locating the syllable in {text:?}"),
    })
}

/// Reference syllable -> raw syllables, built from vowel-against-vowel
/// pairs only. A syllable has one vowel, so consonant pairs add nothing.
pub fn to_syllable_mapping(
    alignment: &[AlignedPair],
    reference_text: &str,
    raw_text: &str,
) -> Result<SyllableMapping> {
    let mut mapping = SyllableMapping::new();
    for pair in alignment {
        if !(is_vowel(pair.reference.jamo) && is_vowel(pair.raw.jamo)) {
            continue;
        }
        let ref_syllable = syllable_index(pair.reference.index, reference_text)?;
        let raw_syllable = syllable_index(pair.raw.index, raw_text)?;
        let targets = mapping.entry(ref_syllable).or_default();
        if !targets.contains(&raw_syllable) {
            targets.push(raw_syllable);
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decompose::decompose;

    fn pair(r: char, ri: usize, w: char, wi: usize) -> AlignedPair {
        AlignedPair::new(IndexedJamo::new(r, ri), IndexedJamo::new(w, wi))
    }

    #[test]
    fn from_path_skips_the_border() {
        let reference = decompose("가");
        let raw = decompose("가");
        let alignment = from_path(&[(0, 0), (1, 1), (2, 2)], &reference, &raw).unwrap();
        assert_eq!(
            alignment,
            vec![
                pair('\u{1100}', 0, '\u{1100}', 0),
                pair('\u{1161}', 1, '\u{1161}', 1),
            ]
        );
    }

    #[test]
    fn from_path_rejects_out_of_range_cells() {
        let reference = decompose("가");
        let raw = decompose("가");
        let err = from_path(&[(0, 0), (3, 1)], &reference, &raw).unwrap_err();
        assert!(matches!(err, Error::Mapping { index: 2, len: 2, .. }));
    }

    #[test]
    fn normalize_fills_skipped_raw_jamo() {
        let raw = decompose("가아아");
        let alignment = vec![
            pair('\u{1100}', 0, raw[0], 0),
            pair('\u{1161}', 1, raw[5], 5),
        ];
        let normalized = normalize(&alignment, &raw);
        let raw_indices: Vec<usize> = normalized.iter().map(|p| p.raw.index).collect();
        assert_eq!(raw_indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(normalized[1..].iter().all(|p| p.reference.index == 1));
        assert_eq!(normalized[2].raw.jamo, '\u{110B}');
    }

    #[test]
    fn normalize_keeps_repeated_raw_indices() {
        let raw = decompose("머거");
        // 먹어 against 머거: ㄱ and ㅇ both land on the raw ㄱ
        let alignment = vec![
            pair('\u{1106}', 0, raw[0], 0),
            pair('\u{1165}', 1, raw[1], 1),
            pair('\u{11A8}', 2, raw[2], 2),
            pair('\u{110B}', 3, raw[2], 2),
            pair('\u{1165}', 4, raw[3], 3),
        ];
        let normalized = normalize(&alignment, &raw);
        assert_eq!(normalized, alignment);
        assert_eq!(normalize(&normalized, &raw), normalized);
    }

    #[test]
    fn normalize_of_nothing_is_nothing() {
        assert!(normalize(&[], &decompose("가")).is_empty());
    }

    #[test]
    fn syllable_index_walks_decomposed_lengths() {
        // 읽(3) 어(2) 요(2)
        let text = "읽어요";
        let expected = [0, 0, 0, 1, 1, 2, 2];
        for (index, &syllable) in expected.iter().enumerate() {
            assert_eq!(syllable_index(index, text).unwrap(), syllable, "jamo {index}");
        }
        assert!(matches!(
            syllable_index(7, text),
            Err(Error::Mapping { index: 7, len: 7, .. })
        ));
    }

    #[test]
    fn syllable_mapping_uses_vowel_pairs_once() {
        let raw = decompose("가아아");
        let alignment = normalize(
            &[pair('\u{1100}', 0, raw[0], 0), pair('\u{1161}', 1, raw[5], 5)],
            &raw,
        );
        let mapping = to_syllable_mapping(&alignment, "가", "가아아").unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping[&0], vec![0, 1, 2]);
    }

    #[test]
    fn consonant_pairs_do_not_map_syllables() {
        let alignment = vec![pair('\u{1100}', 0, '\u{1100}', 0)];
        assert!(to_syllable_mapping(&alignment, "가", "가").unwrap().is_empty());
    }
}
