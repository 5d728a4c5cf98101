// File: src/fuzzy/window.rs
use crate::core::jamo::{
    classify, in_vowel_group, is_canonical_vowel, is_silent_onset, is_space, is_vowel,
};
use crate::core::types::JamoClass;
use crate::fuzzy::cost::CostModel;
use tracing::trace;

/// Decides, per matrix cell, how many preceding raw jamo may be folded into
/// one match. Only vowel-against-vowel cells ever get a window wider than 1;
/// that is how a stretched vowel ("가아아") collapses onto a single
/// reference vowel.
#[derive(Debug, Clone, Copy)]
pub struct WindowFinder<'t> {
    model: CostModel<'t>,
}

impl<'t> WindowFinder<'t> {
    pub fn new(model: CostModel<'t>) -> Self {
        Self { model }
    }

    /// Returns `(reference_window, raw_window)` for the cell pairing
    /// `reference[ref_idx]` with `raw_spaced[raw_idx]`. The raw side is the
    /// space-preserving sequence so a word boundary ends the window.
    pub fn max_offset(
        &self,
        reference: &[char],
        ref_idx: usize,
        raw_spaced: &[char],
        raw_idx: usize,
    ) -> (usize, usize) {
        match (reference.get(ref_idx), raw_spaced.get(raw_idx)) {
            (Some(&ref_vowel), Some(&raw_vowel)) if is_vowel(ref_vowel) && is_vowel(raw_vowel) => {
                let window = self.vowel_window(ref_vowel, raw_spaced, raw_idx);
                trace!(ref_idx, raw_idx, window, "vowel window");
                (1, window)
            }
            _ => (1, 1),
        }
    }

    /// Complexity: O(k) where k is the length of the run being scanned.
    fn vowel_window(&self, ref_vowel: char, raw: &[char], raw_idx: usize) -> usize {
        let raw_vowel = raw[raw_idx];
        let matches_reference = is_canonical_vowel(raw_vowel)
            && (self.model.similar(ref_vowel, raw_vowel) || in_vowel_group(ref_vowel, raw_vowel));
        if !matches_reference {
            return 1;
        }

        // Walk back over silent onsets and vowels of the reference's group.
        let mut steps = 1;
        loop {
            let Some(prev_idx) = raw_idx.checked_sub(steps) else {
                return steps;
            };
            let prev = raw[prev_idx];
            if in_vowel_group(ref_vowel, prev) || is_silent_onset(prev) {
                steps += 1;
                continue;
            }
            return match classify(prev) {
                JamoClass::Leading => steps,
                JamoClass::Vowel
                    if self.model.similar(prev, raw_vowel) || in_vowel_group(raw_vowel, prev) =>
                {
                    steps + 1
                }
                JamoClass::Trailing | JamoClass::Vowel => steps,
                _ if is_space(prev) => steps,
                _ => 1,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decompose::decompose;
    use crate::core::tables::CostTables;
    use crate::fuzzy::cost::Thresholds;

    const A: char = '\u{1161}';
    const EO: char = '\u{1165}';
    const YA: char = '\u{1163}';
    const IEUNG: char = '\u{110B}';
    const K_CODA: char = '\u{11A8}';

    fn tables() -> CostTables {
        let mut tables = CostTables::uniform();
        tables.vowel.insert(EO, A, 0.2);
        tables
    }

    fn window(
        tables: &CostTables,
        reference: &[char],
        ref_idx: usize,
        raw: &[char],
        raw_idx: usize,
    ) -> (usize, usize) {
        let finder = WindowFinder::new(CostModel::new(tables, Thresholds::default()));
        finder.max_offset(reference, ref_idx, raw, raw_idx)
    }

    #[test]
    fn stretched_vowel_spans_back_to_the_onset() {
        let tables = tables();
        let reference = decompose("가");
        let raw = decompose("가아아");
        assert_eq!(window(&tables, &reference, 1, &raw, 5), (1, 5));
        assert_eq!(window(&tables, &reference, 1, &raw, 3), (1, 3));
        assert_eq!(window(&tables, &reference, 1, &raw, 1), (1, 1));
    }

    #[test]
    fn consonant_cells_use_unit_windows() {
        let tables = tables();
        let reference = decompose("가");
        let raw = decompose("가아아");
        assert_eq!(window(&tables, &reference, 0, &raw, 4), (1, 1));
        assert_eq!(window(&tables, &reference, 1, &raw, 4), (1, 1));
    }

    #[test]
    fn space_ends_the_window() {
        let tables = tables();
        let reference = decompose("가");
        let raw = decompose("가 아아");
        assert_eq!(window(&tables, &reference, 1, &raw, 6), (1, 4));
    }

    #[test]
    fn glided_raw_vowel_gets_no_window() {
        let tables = tables();
        assert_eq!(window(&tables, &[A], 0, &[IEUNG, YA], 1), (1, 1));
    }

    #[test]
    fn stopping_unit_decides_the_width() {
        let tables = tables();
        // a similar vowel is folded in as well
        assert_eq!(window(&tables, &[A], 0, &[EO, IEUNG, A], 2), (1, 3));
        // start of sequence
        assert_eq!(window(&tables, &[A], 0, &[IEUNG, A], 1), (1, 2));
        // coda
        assert_eq!(window(&tables, &[A], 0, &[K_CODA, IEUNG, A], 2), (1, 2));
        // anything outside the jamo bands resets the window
        assert_eq!(window(&tables, &[A], 0, &['x', IEUNG, A], 2), (1, 1));
    }
}
