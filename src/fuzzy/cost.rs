// File: src/fuzzy/cost.rs
use crate::core::jamo::classify;
use crate::core::tables::{ConversionRule, CostTables};
use crate::core::types::JamoClass;
use crate::error::{ConversionFailure, Error, Result};

/// Fixed cost of matching an onset against a coda (either order).
pub const ONSET_CODA_COST: f64 = 1.0;

/// Similarity cut-offs: a pair is "similar" when its cost is at most the
/// threshold of its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub vowel: f64,
    pub consonant: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            vowel: 0.3,
            consonant: 0.2,
        }
    }
}

/// Pairwise substitution costs over a borrowed, immutable set of tables.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'t> {
    tables: &'t CostTables,
    thresholds: Thresholds,
}

impl<'t> CostModel<'t> {
    pub fn new(tables: &'t CostTables, thresholds: Thresholds) -> Self {
        Self { tables, thresholds }
    }

    pub fn tables(&self) -> &'t CostTables {
        self.tables
    }

    /// Cost of matching reference jamo `a` with raw jamo `b`.
    /// Same-category pairs come from the tables; an onset against a coda is
    /// a fixed [`ONSET_CODA_COST`]; everything else is unmatchable.
    pub fn cost(&self, a: char, b: char) -> f64 {
        match (classify(a), classify(b)) {
            (ca, cb) if ca == cb && ca.is_phoneme() => {
                self.tables.lookup(ca, a, b).unwrap_or(f64::INFINITY)
            }
            (JamoClass::Leading, JamoClass::Trailing) | (JamoClass::Trailing, JamoClass::Leading) => {
                ONSET_CODA_COST
            }
            _ => f64::INFINITY,
        }
    }

    /// True when `a` and `b` share a category and their cost is finite and
    /// within that category's threshold.
    pub fn similar(&self, a: char, b: char) -> bool {
        let cost = self.cost(a, b);
        if !cost.is_finite() {
            return false;
        }
        match (classify(a), classify(b)) {
            (JamoClass::Vowel, JamoClass::Vowel) => cost <= self.thresholds.vowel,
            (JamoClass::Leading, JamoClass::Leading) | (JamoClass::Trailing, JamoClass::Trailing) => {
                cost <= self.thresholds.consonant
            }
            _ => false,
        }
    }

    /// Looks up and parses the conversion rule for a coda followed by an
    /// onset.
    pub fn convert(&self, trailing: char, leading: char) -> Result<ConversionRule> {
        let fail = |reason| Error::Conversion {
            trailing,
            leading,
            reason,
        };
        if classify(trailing) != JamoClass::Trailing {
            return Err(fail(ConversionFailure::NotTrailing));
        }
        if classify(leading) != JamoClass::Leading {
            return Err(fail(ConversionFailure::NotLeading));
        }
        let rule = self
            .tables
            .lookup_conversion(trailing, leading)
            .ok_or_else(|| fail(ConversionFailure::MissingRule))?;
        ConversionRule::parse(rule).map_err(fail)
    }

    /// Onset candidates of [`convert`](Self::convert), or `None` when the
    /// lookup fails for any reason.
    pub fn converted_leading(&self, trailing: char, leading: char) -> Option<Vec<char>> {
        self.convert(trailing, leading).ok().map(|rule| rule.leading)
    }

    /// Cheapest `cost(raw, candidate)` over the candidates; infinite when
    /// there are none.
    pub fn min_cost_to_any(&self, raw: char, candidates: &[char]) -> f64 {
        candidates
            .iter()
            .map(|&candidate| self.cost(raw, candidate))
            .fold(f64::INFINITY, f64::min)
    }
}
