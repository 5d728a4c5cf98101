// --- File: src/core/tables.rs
//! Immutable cost and conversion tables.
//!
//! A [`CostTables`] value is built once (from a JSON document, a bincode
//! cache, or [`CostTables::uniform`]) and then shared read-only by every
//! alignment. Nothing in the engine mutates it.

use crate::core::jamo::{self, SILENT_ONSET};
use crate::core::types::JamoClass;
use crate::error::{ConversionFailure, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::warn;

/// Pairwise substitution costs for one jamo category, keyed by
/// `(reference, raw)`. A missing entry means "unmatchable".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    costs: HashMap<(char, char), f64>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: char, raw: char) -> Option<f64> {
        self.costs.get(&(reference, raw)).copied()
    }

    pub fn insert(&mut self, reference: char, raw: char, cost: f64) {
        self.costs.insert((reference, raw), cost);
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Phonological conversion rules keyed by `(trailing, following leading)`.
/// Rules are kept as written (`"TRAILINGS/LEADINGS"`) and parsed on use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionTable {
    rules: HashMap<(char, char), String>,
}

impl ConversionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, trailing: char, leading: char) -> Option<&str> {
        self.rules.get(&(trailing, leading)).map(String::as_str)
    }

    pub fn insert(&mut self, trailing: char, leading: char, rule: impl Into<String>) {
        self.rules.insert((trailing, leading), rule.into());
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Alternate spellings produced by one conversion rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionRule {
    pub trailing: Vec<char>,
    pub leading: Vec<char>,
}

/// Placeholder for "no consonant" inside a rule list.
const NO_CONSONANT: char = '.';

impl ConversionRule {
    /// Parses `"a,b/c,d"`. Entries are trimmed, empty entries dropped and the
    /// `.` placeholder skipped. An entry longer than one jamo can never equal
    /// a raw jamo, so it is dropped too; only a rule without exactly one `/`
    /// is malformed.
    pub fn parse(rule: &str) -> std::result::Result<Self, ConversionFailure> {
        let mut parts = rule.split('/');
        let (Some(trailing), Some(leading), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ConversionFailure::Malformed(rule.to_string()));
        };
        Ok(Self {
            trailing: parse_list(trailing),
            leading: parse_list(leading),
        })
    }
}

fn parse_list(list: &str) -> Vec<char> {
    list.split(',')
        .map(str::trim)
        .filter_map(|entry| {
            let mut chars = entry.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != NO_CONSONANT => Some(c),
                _ => None,
            }
        })
        .collect()
}

/// The three category cost tables plus the conversion table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTables {
    pub vowel: CostTable,
    pub leading: CostTable,
    pub trailing: CostTable,
    pub conversion: ConversionTable,
}

impl CostTables {
    /// The table for a category, if it has one.
    pub fn table(&self, class: JamoClass) -> Option<&CostTable> {
        match class {
            JamoClass::Vowel => Some(&self.vowel),
            JamoClass::Leading => Some(&self.leading),
            JamoClass::Trailing => Some(&self.trailing),
            JamoClass::UnknownType | JamoClass::NotAPhoneme => None,
        }
    }

    pub fn lookup(&self, class: JamoClass, reference: char, raw: char) -> Option<f64> {
        self.table(class)?.get(reference, raw)
    }

    pub fn lookup_conversion(&self, trailing: char, leading: char) -> Option<&str> {
        self.conversion.get(trailing, leading)
    }

    /// Fallback tables for when no measured costs are available: identical
    /// jamo cost 0, any other pair of the same category costs 1, and a
    /// double trailing consonant is close (0.2) to the part it keeps.
    /// Conversion rules keep the coda unchanged, and before a silent onset
    /// also allow it (or the second half of a cluster) to move into the
    /// onset.
    pub fn uniform() -> Self {
        let leading: Vec<char> = band(0x1100, 0x1112);
        let vowels: Vec<char> = band(0x1161, 0x1175);
        let trailing: Vec<char> = band(0x11A8, 0x11C2);

        let mut tables = CostTables {
            vowel: identity_table(&vowels),
            leading: identity_table(&leading),
            trailing: identity_table(&trailing),
            conversion: ConversionTable::new(),
        };

        for &lc in &trailing {
            if let Some((kept, _)) = jamo::split_double_trailing(lc) {
                tables.trailing.insert(lc, kept, 0.2);
                tables.trailing.insert(kept, lc, 0.2);
            }
            for &fc in &leading {
                let rule = if fc != SILENT_ONSET {
                    format!("{lc}/{fc}")
                } else if let Some((kept, moved)) = jamo::split_double_trailing(lc) {
                    format!("{lc},{kept}/{fc},{moved}")
                } else {
                    match jamo::trailing_to_leading(lc) {
                        // ㅇ and ㅎ have nothing to carry over
                        Some(SILENT_ONSET) | None => format!("{lc}/{fc}"),
                        Some(moved) => format!("{lc},{}/{fc},{moved}", NO_CONSONANT),
                    }
                };
                tables.conversion.insert(lc, fc, rule);
            }
        }
        tables
    }

    /// Parses a JSON table document (see [`TableDocument`]).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: TableDocument = serde_json::from_str(json)?;
        document.compile()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

fn band(first: u32, last: u32) -> Vec<char> {
    (first..=last).filter_map(char::from_u32).collect()
}

fn identity_table(members: &[char]) -> CostTable {
    let mut table = CostTable::new();
    for &a in members {
        for &b in members {
            table.insert(a, b, if a == b { 0.0 } else { 1.0 });
        }
    }
    table
}

/// On-disk form of [`CostTables`]: nested `row -> column -> value` maps,
/// rows being reference-side jamo and columns raw-side jamo.
///
/// ```json
/// { "vowel": { "ᅡ": { "ᅡ": 0.0, "ᅥ": 0.4 } },
///   "leading": {}, "trailing": {},
///   "conversion": { "ᆨ": { "ᄋ": "./ᄀ" } } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableDocument {
    #[serde(default)]
    pub vowel: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub leading: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub trailing: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub conversion: BTreeMap<String, BTreeMap<String, String>>,
}

impl TableDocument {
    /// Validates every key and builds the lookup tables.
    pub fn compile(&self) -> Result<CostTables> {
        let mut conversion = ConversionTable::new();
        for (row, columns) in &self.conversion {
            let trailing = expect_class(row, JamoClass::Trailing, "conversion")?;
            for (column, rule) in columns {
                let leading = expect_class(column, JamoClass::Leading, "conversion")?;
                conversion.insert(trailing, leading, rule.clone());
            }
        }
        Ok(CostTables {
            vowel: compile_costs(&self.vowel, JamoClass::Vowel, "vowel")?,
            leading: compile_costs(&self.leading, JamoClass::Leading, "leading")?,
            trailing: compile_costs(&self.trailing, JamoClass::Trailing, "trailing")?,
            conversion,
        })
    }
}

fn compile_costs(
    rows: &BTreeMap<String, BTreeMap<String, f64>>,
    class: JamoClass,
    name: &str,
) -> Result<CostTable> {
    let mut table = CostTable::new();
    for (row, columns) in rows {
        let reference = expect_class(row, class, name)?;
        for (column, &cost) in columns {
            let raw = expect_class(column, class, name)?;
            if !cost.is_finite() || cost < 0.0 {
                warn!(table = name, row = %row, column = %column, cost, "skipping unusable cost");
                continue;
            }
            table.insert(reference, raw, cost);
        }
    }
    Ok(table)
}

fn expect_class(key: &str, class: JamoClass, name: &str) -> Result<char> {
    let c = jamo::single_char(key)?;
    if jamo::classify(c) != class {
        return Err(Error::Table(format!(
            "key {key:?} in the {name} table is not a {class:?} jamo"
        )));
    }
    Ok(c)
}
