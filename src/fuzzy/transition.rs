// File: src/fuzzy/transition.rs
//! Cost of reaching a matrix cell from one of its predecessors.
//!
//! Three phenomena get special treatment before falling back to the plain
//! pairwise cost:
//!
//! - stretched vowels: `가아아` written for a long `가`, where a run of
//!   (silent onset, vowel) pairs collapses onto one reference vowel;
//! - resyllabification: a coda that moved into the next onset (`먹어` as
//!   `머거`), including clusters that split (`읽어` as `일거`);
//! - cluster simplification through the conversion table.
//!
//! Lookup failures on this path never escape: a missing or malformed
//! conversion rule just makes the move unreachable (infinite cost).

use crate::core::jamo::{
    is_canonical_vowel, is_double_trailing, is_leading, is_silent_onset, is_single_trailing,
    is_trailing, trailing_to_leading, vowel_group,
};
use crate::fuzzy::cost::CostModel;

const UNREACHABLE: f64 = f64::INFINITY;

/// Transition costs over one pair of sequences. The raw side here is the
/// sequence without spaces.
#[derive(Debug, Clone, Copy)]
pub struct TransitionCost<'a, 't> {
    model: CostModel<'t>,
    reference: &'a [char],
    raw: &'a [char],
}

impl<'a, 't> TransitionCost<'a, 't> {
    pub fn new(model: CostModel<'t>, reference: &'a [char], raw: &'a [char]) -> Self {
        Self {
            model,
            reference,
            raw,
        }
    }

    /// Cost of a step that consumes `ref_offset` reference jamo and
    /// `raw_offset` raw jamo, ending at `reference[ref_idx]` /
    /// `raw[raw_idx]`.
    pub fn transition_cost(
        &self,
        ref_offset: usize,
        ref_idx: usize,
        raw_offset: usize,
        raw_idx: usize,
    ) -> f64 {
        let (Some(&ref_cur), Some(&raw_cur)) = (self.reference.get(ref_idx), self.raw.get(raw_idx))
        else {
            return UNREACHABLE;
        };
        let ref_prev = ref_idx.checked_sub(1).map(|i| self.reference[i]);
        let raw_prev = raw_idx.checked_sub(1).map(|i| self.raw[i]);

        if raw_offset > 1 && raw_prev.is_some_and(is_silent_onset) && is_canonical_vowel(raw_cur) {
            return self.stretched_vowel(ref_cur, raw_offset, raw_idx);
        }

        match (ref_offset, raw_offset) {
            (1, 1) => self.one_to_one(ref_prev, ref_cur, raw_prev, raw_cur),
            (1, 0) => self.without_raw_advance(ref_prev, ref_cur, raw_cur),
            (r, w) if r <= 1 && w <= 1 => self.model.cost(ref_cur, raw_cur),
            _ => UNREACHABLE,
        }
    }

    /// The window ending at `raw_idx` must be `raw_offset / 2` (silent onset,
    /// vowel) pairs whose vowels all belong to the reference vowel's group.
    /// The match is then priced against the earliest unit of the window.
    fn stretched_vowel(&self, ref_vowel: char, raw_offset: usize, raw_idx: usize) -> f64 {
        let Some(group) = vowel_group(ref_vowel) else {
            return UNREACHABLE;
        };
        if !self.repeats_stretched(raw_offset, raw_idx, group) {
            return UNREACHABLE;
        }
        match (raw_idx + 1).checked_sub(raw_offset) {
            Some(first) => self.model.cost(ref_vowel, self.raw[first]),
            None => UNREACHABLE,
        }
    }

    fn repeats_stretched(&self, window: usize, raw_idx: usize, group: &[char]) -> bool {
        if window <= 1 {
            return false;
        }
        (0..window / 2).all(|pair| match raw_idx.checked_sub(pair * 2) {
            Some(vowel_idx) if vowel_idx >= 1 => {
                is_silent_onset(self.raw[vowel_idx - 1]) && group.contains(&self.raw[vowel_idx])
            }
            _ => false,
        })
    }

    fn one_to_one(
        &self,
        ref_prev: Option<char>,
        ref_cur: char,
        raw_prev: Option<char>,
        raw_cur: char,
    ) -> f64 {
        let plain = self.model.cost(ref_cur, raw_cur);
        let Some(coda) = ref_prev.filter(|_| is_leading(ref_cur)) else {
            return plain;
        };

        if is_double_trailing(coda) {
            // The cluster split: its kept part stays as the raw coda and the
            // rest became the raw onset.
            let Some(raw_coda) = raw_prev.filter(|&p| self.model.similar(coda, p)) else {
                return UNREACHABLE;
            };
            let coda_cost = self.model.cost(coda, raw_coda);
            let Some(onsets) = self.model.converted_leading(coda, ref_cur) else {
                return UNREACHABLE;
            };
            let onset_cost = if onsets.contains(&raw_cur) {
                self.model.min_cost_to_any(raw_cur, &onsets)
            } else {
                UNREACHABLE
            };
            if coda_cost.is_finite() && onset_cost.is_finite() {
                coda_cost + onset_cost
            } else {
                UNREACHABLE
            }
        } else if is_single_trailing(coda) {
            let Some(onsets) = self.model.converted_leading(coda, ref_cur) else {
                return UNREACHABLE;
            };
            let coda_kept = raw_prev.is_some_and(|p| self.model.similar(coda, p));
            if coda_kept && onsets.contains(&raw_cur) {
                self.model.min_cost_to_any(raw_cur, &onsets)
            } else {
                plain
            }
        } else {
            plain
        }
    }

    fn without_raw_advance(&self, ref_prev: Option<char>, ref_cur: char, raw_cur: char) -> f64 {
        let Some(coda) = ref_prev.filter(|&p| is_trailing(p)) else {
            return self.model.cost(ref_cur, raw_cur);
        };

        // The coda moved into the empty onset that follows it.
        if is_silent_onset(ref_cur) && is_leading(raw_cur) {
            if let Some(onset) = trailing_to_leading(coda) {
                if self.model.similar(onset, raw_cur) {
                    return self.model.cost(onset, raw_cur);
                }
            }
        }

        if is_leading(ref_cur) && is_leading(raw_cur) {
            return match self.model.converted_leading(coda, ref_cur) {
                Some(onsets) => self.model.min_cost_to_any(raw_cur, &onsets),
                None => UNREACHABLE,
            };
        }
        self.model.cost(ref_cur, raw_cur)
    }
}
