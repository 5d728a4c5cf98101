// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category of a single decomposed jamo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JamoClass {
    /// Syllable onset (초성), U+1100..=U+1112.
    Leading,
    /// Syllable nucleus (중성), U+1161..=U+1175.
    Vowel,
    /// Syllable coda (종성), U+11A8..=U+11C2.
    Trailing,
    /// A jamo code point outside the three modern bands.
    UnknownType,
    /// Not a jamo at all.
    NotAPhoneme,
}

impl JamoClass {
    /// Only the three modern bands take part in cost lookups.
    pub fn is_phoneme(self) -> bool {
        matches!(self, JamoClass::Leading | JamoClass::Vowel | JamoClass::Trailing)
    }
}

/// A coordinate in the DTW matrix: `(row, col)` = (reference prefix length,
/// raw prefix length).
pub type Cell = (usize, usize);

/// A jamo together with its position in its decomposed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexedJamo {
    pub jamo: char,
    pub index: usize,
}

impl IndexedJamo {
    pub fn new(jamo: char, index: usize) -> Self {
        Self { jamo, index }
    }
}

/// One reference jamo matched with one raw jamo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignedPair {
    pub reference: IndexedJamo,
    pub raw: IndexedJamo,
}

impl AlignedPair {
    pub fn new(reference: IndexedJamo, raw: IndexedJamo) -> Self {
        Self { reference, raw }
    }
}

/// Phoneme-level alignment, in path order.
pub type JamoAlignment = Vec<AlignedPair>;

/// Reference syllable index -> raw syllable indices, deduplicated and kept
/// in the order they were first seen.
pub type SyllableMapping = BTreeMap<usize, Vec<usize>>;
